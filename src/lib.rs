//! jobfit library: keyword-overlap fit scoring of a resume against a job description

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod llm;
pub mod output;

pub use error::{Result, JobFitError};
pub use config::Config;
