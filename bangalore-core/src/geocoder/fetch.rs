//! Boundary fetching on top of a [`Geocoder`].

use log::{info, warn};
use thiserror::Error;

use crate::selection::{RegionFilter, select_best};
use crate::BoundaryResult;

use super::error::GeocodeError;
use super::provider::Geocoder;

/// Errors returned while fetching a boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No query strings were supplied.
    #[error("no boundary queries to try")]
    NoQueries,
    /// The provider returned no usable candidates for the query.
    #[error("no geocoding results for {query:?}")]
    NoResults {
        /// Query that produced no candidates.
        query: String,
    },
    /// The provider request itself failed.
    #[error("geocoding {query:?} failed: {source}")]
    Geocode {
        /// Query being searched.
        query: String,
        /// Provider error.
        #[source]
        source: GeocodeError,
    },
}

/// Result of a successful fallback search.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    /// Query that produced the boundary.
    pub query: String,
    /// Relevance score of the chosen candidate.
    pub score: u8,
    /// The selected boundary.
    pub boundary: BoundaryResult,
}

/// Search `query` and return the most relevant boundary.
pub fn fetch_boundary<G>(
    geocoder: &G,
    query: &str,
    filter: &RegionFilter,
) -> Result<BoundaryResult, FetchError>
where
    G: Geocoder + ?Sized,
{
    fetch_scored(geocoder, query, filter).map(|outcome| outcome.boundary)
}

/// Try each query in order and return the first boundary found.
///
/// Both provider failures and empty results move on to the next query. When
/// every query fails, the error from the last one is returned.
///
/// # Examples
///
/// ```
/// use bangalore_core::{
///     FetchError, GeocodeError, Geocoder, PlaceCandidate, RegionFilter, fetch_first_boundary,
/// };
///
/// struct EmptyGeocoder;
///
/// impl Geocoder for EmptyGeocoder {
///     fn search(&self, _query: &str) -> Result<Vec<PlaceCandidate>, GeocodeError> {
///         Ok(Vec::new())
///     }
/// }
///
/// let err = fetch_first_boundary(&EmptyGeocoder, &["Bengaluru", "Bangalore"], &RegionFilter::default())
///     .expect_err("nothing to select");
/// assert!(matches!(err, FetchError::NoResults { query } if query == "Bangalore"));
/// ```
pub fn fetch_first_boundary<G, Q>(
    geocoder: &G,
    queries: &[Q],
    filter: &RegionFilter,
) -> Result<FetchOutcome, FetchError>
where
    G: Geocoder + ?Sized,
    Q: AsRef<str>,
{
    let mut last_error = FetchError::NoQueries;
    for query in queries {
        match fetch_scored(geocoder, query.as_ref(), filter) {
            Ok(outcome) => return Ok(outcome),
            Err(error) => {
                warn!("boundary query failed: {error}");
                last_error = error;
            }
        }
    }
    Err(last_error)
}

fn fetch_scored<G>(
    geocoder: &G,
    query: &str,
    filter: &RegionFilter,
) -> Result<FetchOutcome, FetchError>
where
    G: Geocoder + ?Sized,
{
    let raw = geocoder
        .search(query)
        .map_err(|source| FetchError::Geocode {
            query: query.to_owned(),
            source,
        })?;
    let total = raw.len();
    let best = select_best(raw, filter).map_err(|_| FetchError::NoResults {
        query: query.to_owned(),
    })?;
    info!(
        "selected {:?} (score {}) from {total} result(s) for {query:?}",
        best.candidate.display_name.as_deref().unwrap_or("<unnamed>"),
        best.score,
    );
    Ok(FetchOutcome {
        query: query.to_owned(),
        score: best.score,
        boundary: BoundaryResult::from_candidate(best.candidate),
    })
}
