//! Keyword extraction, scoring and the analysis engine

pub mod text_processor;
pub mod keyword_matcher;
pub mod analyzer;
