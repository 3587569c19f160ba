pub mod preview;
pub mod process;
