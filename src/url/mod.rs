//! URL handling module for Dredge
//!
//! Provides the canonical URL form used as the document identity key,
//! plus host and origin helpers.

mod domain;
mod normalize;

pub use domain::{extract_domain, origin_of};
pub use normalize::normalize_url;
