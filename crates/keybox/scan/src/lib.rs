//! Keybox Scan Service
//!
//! Classifies keybox files against a status list and moves the valid ones.

mod options;
mod scanner;

pub use options::*;
pub use scanner::*;
