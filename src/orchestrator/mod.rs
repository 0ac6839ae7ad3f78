pub mod orchestrator;

pub use orchestrator::{execute, run};
