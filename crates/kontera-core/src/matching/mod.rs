//! Fuzzy cost-bearer matching against the registry.

mod cache;
mod matcher;

pub use cache::{RegistryCache, RegistryCacheKey};
pub use matcher::{normalize_for_match, CostBearerMatcher};
