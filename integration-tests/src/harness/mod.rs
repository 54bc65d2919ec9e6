pub mod logfile;
pub mod store;
pub mod tracing;
