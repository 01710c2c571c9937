// Library root: re-exports the CLI modules so integration tests can drive
// the same code paths as the binary.

pub mod app;
pub mod config;
pub mod report;
pub mod standings;
