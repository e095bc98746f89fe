//! The package catalog consulted during resolution, and validation of the
//! descriptors published into it.

pub mod catalog;
pub mod validate;

pub use catalog::CatalogRegistry;
pub use validate::ValidationError;
