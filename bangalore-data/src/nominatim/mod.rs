//! HTTP geocoder backed by the Nominatim search API.
//!
//! This module provides [`NominatimGeocoder`], an implementation of
//! [`bangalore_core::Geocoder`] that queries a Nominatim instance.
//!
//! # Architecture
//!
//! The [`Geocoder`](bangalore_core::Geocoder) trait is synchronous so the
//! fetcher stays a plain function. The geocoder bridges its async HTTP call
//! to that interface by blocking on a Tokio runtime it owns.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use bangalore_core::Geocoder;
//! use bangalore_data::nominatim::{NominatimConfig, NominatimGeocoder};
//!
//! let config = NominatimConfig::new("https://nominatim.openstreetmap.org")
//!     .with_timeout(Duration::from_secs(30))
//!     .with_user_agent("my-tool/1.0");
//! let geocoder = NominatimGeocoder::with_config(config)?;
//!
//! let candidates = geocoder.search("Bengaluru, Karnataka, India")?;
//! println!("{} candidates", candidates.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod provider;
mod response;

#[doc(hidden)]
pub mod test_support;

pub use provider::{
    DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, NominatimConfig,
    NominatimGeocoder, ProviderBuildError, RESULT_LIMIT,
};
