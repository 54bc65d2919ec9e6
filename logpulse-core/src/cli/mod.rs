pub mod conf;
pub mod generate;
pub mod run;
pub mod stats;

#[cfg(test)]
mod tests;

pub use generate::{GenerateArgs, LogGenerator, generate};
pub use run::run;
pub use stats::{StatsArgs, stats};
