//! Keybox Core Types
//!
//! Domain types for Android attestation keyboxes: XML extraction,
//! certificate serials and per-file verdicts.

mod encoding;
mod keybox;
mod report;
mod serial;
mod verdict;

pub use encoding::*;
pub use keybox::*;
pub use report::*;
pub use serial::*;
pub use verdict::*;
