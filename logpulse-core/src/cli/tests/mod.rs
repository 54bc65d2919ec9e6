mod conf_tests;
mod stats_tests;
