//! Geocoder trait for free-text place searches.

use crate::PlaceCandidate;

use super::error::GeocodeError;

/// Search for places matching a free-text query.
///
/// Implementers return candidates in the provider's ranking order and must
/// return `Err(GeocodeError::EmptyQuery)` for blank queries. An empty `Ok`
/// vector means the provider knew of no match.
///
/// # Examples
///
/// ```rust
/// use bangalore_core::{GeocodeError, Geocoder, PlaceCandidate};
///
/// struct EchoGeocoder;
///
/// impl Geocoder for EchoGeocoder {
///     fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, GeocodeError> {
///         if query.trim().is_empty() {
///             return Err(GeocodeError::EmptyQuery);
///         }
///         Ok(vec![PlaceCandidate {
///             display_name: Some(query.to_owned()),
///             ..PlaceCandidate::default()
///         }])
///     }
/// }
///
/// let found = EchoGeocoder.search("Bengaluru")?;
/// assert_eq!(found.len(), 1);
/// # Ok::<(), GeocodeError>(())
/// ```
pub trait Geocoder {
    /// Return the candidates matching `query`.
    fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, GeocodeError>;
}

impl<G: Geocoder + ?Sized> Geocoder for &G {
    fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, GeocodeError> {
        (**self).search(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::test_support::ScriptedGeocoder;

    #[rstest]
    fn scripted_geocoder_rejects_blank_queries() {
        let geocoder = ScriptedGeocoder::default();

        let err = geocoder.search("   ").expect_err("blank query should fail");

        assert_eq!(err, GeocodeError::EmptyQuery);
    }

    #[rstest]
    fn references_forward_to_the_inner_geocoder() {
        let geocoder = ScriptedGeocoder::default().with_candidates(
            "Bengaluru",
            vec![PlaceCandidate::default()],
        );
        let by_ref: &dyn Geocoder = &geocoder;

        let found = (&by_ref).search("Bengaluru").expect("search should succeed");

        assert_eq!(found.len(), 1);
    }
}
