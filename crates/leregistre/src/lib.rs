// leregistre - Content Registry
//
// *Le Registre* (The Register) - Typed content pages and the link policy that governs them

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

//! Registry typing for LeMaillage.
//!
//! The registry is an immutable, already-built list of content pages. This
//! crate only knows its shape: it never enumerates content files itself.

/// Link-policy configuration.
pub mod config;
/// Content page descriptors and their closed enumerations.
pub mod entry;
/// Validated registry snapshot.
pub mod registry;

pub use config::{LinkCaps, RecommendationConfig};
pub use entry::{normalise_url, ContentEntry, Locale, PageType};
pub use registry::{Registry, RegistryError};
