pub mod archive;
pub mod classify;
pub mod job;
pub mod normalize;
pub mod uniquify;

pub use classify::PackType;
pub use job::{plan_job, run_job, validate_address, JobPlan, NamedBlob, PageSource};
