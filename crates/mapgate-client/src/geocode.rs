//! Payload parsing for suggest and geocode responses.

use serde_json::Value;

use crate::error::ClientError;
use crate::model::{Location, Suggestion, RESOLVED_ZOOM};

const FIRST_POINT: &str = "/response/GeoObjectCollection/featureMember/0/GeoObject/Point/pos";

/// `results` of a suggest response. Anything malformed yields an empty list;
/// individual entries that do not parse are skipped.
pub fn parse_suggestions(body: &Value) -> Vec<Suggestion> {
    body.get("results")
        .and_then(Value::as_array)
        .map(|results| {
            results
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Location of the first feature in a geocode response.
pub fn parse_geocode_location(body: &Value) -> Result<Location, ClientError> {
    let pos = body
        .pointer(FIRST_POINT)
        .and_then(Value::as_str)
        .ok_or_else(|| ClientError::Parse("geocode response has no point".to_string()))?;

    Ok(Location {
        center: parse_point(pos)?,
        zoom: RESOLVED_ZOOM,
    })
}

/// `"lon lat"` as `[lon, lat]`.
pub fn parse_point(pos: &str) -> Result<[f64; 2], ClientError> {
    let mut parts = pos.split_whitespace();
    let (Some(lon), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ClientError::Parse(format!("malformed point: {:?}", pos)));
    };

    let coordinate = |raw: &str| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ClientError::Parse(format!("malformed coordinate: {:?}", raw)))
    };
    Ok([coordinate(lon)?, coordinate(lat)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn geocode_body(pos: &str) -> Value {
        json!({
            "response": { "GeoObjectCollection": { "featureMember": [
                { "GeoObject": { "name": "Dubai", "Point": { "pos": pos } } },
                { "GeoObject": { "Point": { "pos": "0 0" } } }
            ] } }
        })
    }

    #[test]
    fn test_point_keeps_longitude_latitude_order() {
        let location = parse_geocode_location(&geocode_body("25.229762 55.289311")).unwrap();
        assert_eq!(location.center, [25.229762, 55.289311]);
        assert_eq!(location.zoom, 15.0);
    }

    #[test]
    fn test_malformed_points() {
        for pos in ["", "25.2", "25.2 55.2 1.0", "abc 55.2", "NaN 1", "inf 2"] {
            assert!(parse_point(pos).is_err(), "{pos:?} should be rejected");
        }
    }

    #[test]
    fn test_missing_feature_is_parse_error() {
        let empty = json!({ "response": { "GeoObjectCollection": { "featureMember": [] } } });
        assert!(matches!(parse_geocode_location(&empty), Err(ClientError::Parse(_))));
        assert!(parse_geocode_location(&json!({})).is_err());
        assert!(parse_geocode_location(&json!(null)).is_err());
    }

    #[test]
    fn test_parse_suggestions() {
        let body = json!({
            "results": [
                { "title": { "text": "Dubai", "hl": [] }, "uri": "ymapsbm1://geo?text=Dubai", "distance": { "value": 1 } },
                { "title": "Dubai Marina" },
                { "no_title": true }
            ]
        });
        let suggestions = parse_suggestions(&body);

        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].label(), "Dubai");
        assert!(suggestions[0].is_selectable());
        assert!(suggestions[0].extra.contains_key("distance"));
        assert_eq!(suggestions[1].label(), "Dubai Marina");
        assert!(!suggestions[1].is_selectable());
    }

    #[test]
    fn test_parse_suggestions_malformed_is_empty() {
        assert!(parse_suggestions(&json!({})).is_empty());
        assert!(parse_suggestions(&json!({ "results": "nope" })).is_empty());
        assert!(parse_suggestions(&json!([1, 2])).is_empty());
    }
}
