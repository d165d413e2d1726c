//! Provider adapters for fetching book metadata from external catalogs
//!
//! Each adapter pairs one HTTP endpoint with the normalizer for its response
//! schema. Normalizers are plain functions over `serde_json::Value` so they
//! can be exercised without a network.

pub mod commerce;
pub(crate) mod fields;
pub mod generic_index;
pub mod registry;
pub mod traits;

pub use commerce::CommerceSource;
pub use generic_index::GenericIndexSource;
pub use registry::RegistrySource;
pub use traits::*;

/// Metadata for every built-in provider, in ISBN resolution priority order
pub fn all_metadata() -> Vec<SourceMetadata> {
    vec![
        CommerceSource::metadata(),
        RegistrySource::metadata(),
        GenericIndexSource::metadata(),
    ]
}
