//! Keybox Crypto Utilities
//!
//! Certificate decoding and serial number extraction.

mod cert;

pub use cert::*;
