//! Status source traits.

use crate::RevocationList;

/// Somewhere a revocation list can be loaded from.
#[trait_variant::make(Send)]
pub trait StatusSource: Send + Sync {
    /// Load the current revocation list.
    async fn fetch(&self) -> color_eyre::eyre::Result<RevocationList>;
}
