pub mod cli;
pub mod conf;
pub mod event;
pub mod ingest;
pub mod logging;
pub mod runtime;
pub mod stats;
pub mod store;
