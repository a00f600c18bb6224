pub mod error;
pub mod fetcher;
pub mod orchestrator;
pub mod separator;
