pub mod config;
pub mod logging;

pub mod orchestrator;
pub mod validate;
pub mod worker;
