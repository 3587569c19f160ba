use crate::checklist::normalize::matches_phrase;
use crate::error::JobError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Marks an AC Gold page as void BMD works.
pub const BMD_WORKS_TRIGGER: &str = "BMD WORKS REQUIRED";
/// Marks a BMD pack page as void rechargeable works.
pub const RECHARGE_TRIGGER: &str = "RECHARGE WORK";

/// Which rule-set classifies pages 2..N.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PackType {
    #[serde(rename = "AC_GOLD")]
    AcGold,
    #[serde(rename = "BMD_PACK")]
    BmdPack,
}

impl PackType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackType::AcGold => "AC_GOLD",
            PackType::BmdPack => "BMD_PACK",
        }
    }
}

impl fmt::Display for PackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackType {
    type Err = JobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "AC_GOLD" => Ok(PackType::AcGold),
            "BMD_PACK" => Ok(PackType::BmdPack),
            other => Err(JobError::InvalidInput(format!(
                "Unsupported pack type '{}' (expected AC_GOLD or BMD_PACK)",
                other
            ))),
        }
    }
}

/// What a page turned out to be. Numbered variants carry their number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "number")]
pub enum Category {
    Checklist,
    VoidBmdWorks,
    AcGoldMtw(u32),
    VoidRechargeableWorks,
    VoidBmdWorksNumbered(u32),
}

impl Category {
    /// Templated file name, before uniquification.
    pub fn file_name(&self, address: &str) -> String {
        match self {
            Category::Checklist => format!("{} - INSPECTION CHECKLIST.pdf", address),
            Category::VoidBmdWorks => format!("{} - VOID BMD WORKS.pdf", address),
            Category::AcGoldMtw(n) => format!("{} - AC GOLD MTW ({}).pdf", address, n),
            Category::VoidRechargeableWorks => {
                format!("{} - VOID RECHARGEABLE WORKS.pdf", address)
            }
            Category::VoidBmdWorksNumbered(n) => {
                format!("{} - VOID BMD WORKS ({}).pdf", address, n)
            }
        }
    }

    #[cfg(test)]
    pub fn number(&self) -> Option<u32> {
        match self {
            Category::AcGoldMtw(n) | Category::VoidBmdWorksNumbered(n) => Some(*n),
            _ => None,
        }
    }
}

/// Per-job numbering for the two numbered categories.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    pub ac_gold_mtw: u32,
    pub bmd: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub category: Category,
    pub templated_name: String,
}

/// Decide the category of a non-blank page. The first matching row wins:
///
/// | pack     | text contains        | category                   |
/// |----------|----------------------|----------------------------|
/// | AC_GOLD  | `BMD WORKS REQUIRED` | `VoidBmdWorks`             |
/// | AC_GOLD  | otherwise            | `AcGoldMtw(++ac_gold_mtw)` |
/// | BMD_PACK | `RECHARGE WORK`      | `VoidRechargeableWorks`    |
/// | BMD_PACK | otherwise            | `VoidBmdWorksNumbered(++bmd)` |
pub fn classify(text: &str, pack: PackType, counters: &mut Counters) -> Category {
    match pack {
        PackType::AcGold => {
            if matches_phrase(text, BMD_WORKS_TRIGGER) {
                Category::VoidBmdWorks
            } else {
                counters.ac_gold_mtw += 1;
                Category::AcGoldMtw(counters.ac_gold_mtw)
            }
        }
        PackType::BmdPack => {
            if matches_phrase(text, RECHARGE_TRIGGER) {
                Category::VoidRechargeableWorks
            } else {
                counters.bmd += 1;
                Category::VoidBmdWorksNumbered(counters.bmd)
            }
        }
    }
}

pub fn classify_page(
    text: &str,
    pack: PackType,
    address: &str,
    counters: &mut Counters,
) -> Classified {
    let category = classify(text, pack, counters);
    Classified {
        category,
        templated_name: category.file_name(address),
    }
}
