use std::collections::HashSet;

/// File names already handed out during one job.
#[derive(Debug, Default, Clone)]
pub struct UsedNames {
    names: HashSet<String>,
}

impl UsedNames {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Reserve `candidate`, or the first free `"{base} ({i}){ext}"` with
    /// `i >= 2` if it is taken, and return the reserved name.
    pub fn uniquify(&mut self, candidate: &str) -> String {
        if self.names.insert(candidate.to_string()) {
            return candidate.to_string();
        }

        let (base, ext) = match candidate.rfind('.') {
            Some(idx) => candidate.split_at(idx),
            None => (candidate, ""),
        };

        let mut i = 2u32;
        loop {
            let name = format!("{} ({}){}", base, i, ext);
            if self.names.insert(name.clone()) {
                return name;
            }
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_name_unchanged() {
        let mut used = UsedNames::new();
        assert_eq!(used.uniquify("X - VOID BMD WORKS.pdf"), "X - VOID BMD WORKS.pdf");
        assert!(used.contains("X - VOID BMD WORKS.pdf"));
    }

    #[test]
    fn test_collision_inserts_before_extension() {
        let mut used = UsedNames::new();
        used.uniquify("X - VOID BMD WORKS.pdf");
        assert_eq!(
            used.uniquify("X - VOID BMD WORKS.pdf"),
            "X - VOID BMD WORKS (2).pdf"
        );
        assert_eq!(
            used.uniquify("X - VOID BMD WORKS.pdf"),
            "X - VOID BMD WORKS (3).pdf"
        );
    }

    #[test]
    fn test_skips_taken_suffixes() {
        let mut used = UsedNames::new();
        used.uniquify("a.pdf");
        used.uniquify("a (2).pdf");
        used.uniquify("a (3).pdf");
        assert_eq!(used.uniquify("a.pdf"), "a (4).pdf");
    }

    #[test]
    fn test_no_extension() {
        let mut used = UsedNames::new();
        used.uniquify("README");
        assert_eq!(used.uniquify("README"), "README (2)");
    }

    #[test]
    fn test_splits_at_last_dot() {
        let mut used = UsedNames::new();
        used.uniquify("10 ST. JOHNS RD.pdf");
        assert_eq!(used.uniquify("10 ST. JOHNS RD.pdf"), "10 ST. JOHNS RD (2).pdf");
    }

    #[test]
    fn test_set_grows_by_one_per_call() {
        let mut used = UsedNames::new();
        let candidates = ["a.pdf", "a.pdf", "b.pdf", "a (2).pdf", "a.pdf", "b.pdf"];
        for (i, candidate) in candidates.iter().enumerate() {
            let before = used.len();
            let name = used.uniquify(candidate);
            assert_eq!(used.len(), before + 1, "call {}", i);
            assert!(used.contains(&name));
        }
        assert!(used.contains("a (2) (2).pdf"));
        assert!(used.contains("a (3).pdf"));
        assert!(used.contains("b (2).pdf"));
    }
}
