//! Look up places by name.
//!
//! The [`Geocoder`] trait abstracts a free-text place search. Callers supply
//! a query string and receive the provider's candidates in ranking order.
//! [`fetch_boundary`] and [`fetch_first_boundary`] layer the
//! boundary-selection heuristic and the query fallback list on top.

mod error;
mod fetch;
mod provider;

pub use error::GeocodeError;
pub use fetch::{FetchError, FetchOutcome, fetch_boundary, fetch_first_boundary};
pub use provider::Geocoder;
