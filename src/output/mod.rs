//! Report assembly and rendering

pub mod report;
pub mod formatter;
