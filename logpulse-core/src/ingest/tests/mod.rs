mod batch_tests;
mod support;
mod writer_tests;
