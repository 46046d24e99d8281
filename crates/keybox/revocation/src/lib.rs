//! Keybox Revocation
//!
//! Attestation status list model and sources.

mod file;
mod http;
mod list;
mod traits;

pub use file::*;
pub use http::*;
pub use list::*;
pub use traits::*;
