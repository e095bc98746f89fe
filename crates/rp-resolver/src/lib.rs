//! Version algebra and transitive dependency resolution: version ordering,
//! range normalization, conflict arbitration and cycle handling.

pub mod conflict;
pub mod engine;
pub mod error;
pub mod graph;
pub mod range;
pub mod registry;
pub mod resolved;
pub mod resolver;
pub mod version;
pub mod visited;

pub use error::ResolveError;
pub use range::{Range, RangeError};
pub use registry::Registry;
pub use resolver::Resolver;
pub use version::{Version, VersionError};
