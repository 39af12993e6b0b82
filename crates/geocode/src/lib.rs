//! Geocoding sources and ordered-fallback address resolution.
//!
//! A `GeoSource` issues a single resolution or suggestion request to one
//! provider; `AddressResolver` tries configured sources in priority order.
//! New providers are added by implementing the `GeoSource` trait.

pub mod backend;
pub mod error;
pub mod memory;
pub mod nominatim;
pub mod resolver;
pub mod source;

pub use backend::BackendSource;
pub use error::GeoSourceError;
pub use memory::MemorySource;
pub use nominatim::NominatimSource;
pub use resolver::{AddressResolver, ResolutionFailed};
pub use source::{BoxFuture, GeoSource, Suggestion};
