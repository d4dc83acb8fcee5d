//! Nominatim `/search` response bodies.

use bangalore_core::{GeocodeError, PlaceCandidate};
use serde::Deserialize;

/// Body of a `/search` reply: a result array, or an error object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum SearchResponse {
    Results(Vec<PlaceCandidate>),
    Failure { error: ErrorBody },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum ErrorBody {
    Detailed { message: String },
    Plain(String),
}

impl SearchResponse {
    /// Parse a raw body into candidates.
    pub(super) fn parse(body: &str) -> Result<Vec<PlaceCandidate>, GeocodeError> {
        let response: Self =
            serde_json::from_str(body).map_err(|err| GeocodeError::ParseError {
                message: err.to_string(),
            })?;
        match response {
            Self::Results(candidates) => Ok(candidates),
            Self::Failure { error } => Err(GeocodeError::ParseError {
                message: match error {
                    ErrorBody::Detailed { message } | ErrorBody::Plain(message) => message,
                },
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn parses_jsonv2_results() {
        let body = r#"[{
            "place_id": 1,
            "osm_type": "relation",
            "osm_id": 7902476,
            "category": "boundary",
            "type": "administrative",
            "display_name": "Bengaluru, Bangalore North, Bangalore Urban, Karnataka, India",
            "address": {"state_district": "Bangalore Urban", "state": "Karnataka", "country": "India"},
            "geojson": {"type": "Polygon", "coordinates": [[[77.4, 12.8], [77.8, 12.8], [77.8, 13.1], [77.4, 12.8]]]}
        }]"#;

        let candidates = SearchResponse::parse(body).expect("should parse");

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].class.as_deref(), Some("boundary"));
        assert_eq!(candidates[0].region(), Some("Karnataka"));
    }

    #[rstest]
    fn parses_empty_array() {
        assert_eq!(SearchResponse::parse("[]"), Ok(Vec::new()));
    }

    #[rstest]
    #[case(r#"{"error": {"code": 400, "message": "Nothing to search for."}}"#, "Nothing to search for.")]
    #[case(r#"{"error": "Unable to geocode"}"#, "Unable to geocode")]
    fn reports_service_errors(#[case] body: &str, #[case] expected: &str) {
        let err = SearchResponse::parse(body).expect_err("should fail");

        assert_eq!(
            err,
            GeocodeError::ParseError {
                message: expected.to_owned()
            }
        );
    }

    #[rstest]
    fn rejects_non_json() {
        let err = SearchResponse::parse("<html>busy</html>").expect_err("should fail");

        assert!(matches!(err, GeocodeError::ParseError { .. }));
    }
}
