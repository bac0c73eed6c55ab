pub mod config;
pub mod logging;

// Pipeline: feed → links → probe → policy → fetch, driven by the coordinator.
pub mod coordinator;
pub mod feed;
pub mod fetch;
pub mod links;
pub mod policy;
pub mod probe;
pub mod process;
