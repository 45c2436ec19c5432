//! Command implementations for the Nihongo DoJo CLI.

pub mod datasets;
pub mod score;

pub use datasets::DatasetsCommand;
