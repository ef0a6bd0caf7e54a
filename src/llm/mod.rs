//! Natural-language feedback from a language model

pub mod client;
pub mod feedback;
pub mod prompts;
