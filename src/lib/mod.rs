use log::debug;
use output::{JSONError, Report};
use rayon::prelude::*;
use serde_json::Value;
use std::io::{self, BufRead};

pub use self::error::{ErrorKind, Path, PathSegment, ValidationError, ValidationErrors};
pub use self::geo::Extent;
pub use self::geojson::{
    Bbox, Feature, FeatureCollection, FeatureId, GeoJson, GeoJsonType, Geometry, Position,
};
pub use self::validate::{Rules, Validator};

pub mod error;
mod geo;
mod geojson;
pub mod output;
pub mod routes;
mod validate;

/// Validate a geometry object of any of the seven geometry types.
///
/// # Example
///
/// ```
/// use geojson_validate::{validate_geometry, ErrorKind};
/// use serde_json::json;
///
/// let point = json!({"type": "Point", "coordinates": [13.4, 52.5]});
/// assert!(validate_geometry(&point).is_ok());
///
/// let circle = json!({"type": "Circle", "coordinates": [13.4, 52.5]});
/// let error = validate_geometry(&circle).unwrap_err();
/// assert_eq!(error.kind, ErrorKind::InvalidType);
/// ```
pub fn validate_geometry(value: &Value) -> Result<Geometry, ValidationError> {
    Validator::new()
        .geometry(value)
        .map_err(ValidationErrors::into_first)
}

/// Validate a feature. A `null` geometry is accepted.
pub fn validate_feature(value: &Value) -> Result<Feature, ValidationError> {
    Validator::new()
        .feature(value)
        .map_err(ValidationErrors::into_first)
}

/// Validate a feature collection, stopping at the first malformed feature.
pub fn validate_feature_collection(value: &Value) -> Result<FeatureCollection, ValidationError> {
    Validator::new()
        .feature_collection(value)
        .map_err(ValidationErrors::into_first)
}

pub fn validate_bbox(value: &Value) -> Result<Bbox, ValidationError> {
    Validator::new()
        .bbox(value)
        .map_err(ValidationErrors::into_first)
}

/// Validate any GeoJSON object, dispatching on its `type`.
pub fn validate(value: &Value) -> Result<GeoJson, ValidationError> {
    Validator::new()
        .any(value)
        .map_err(ValidationErrors::into_first)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// The whole input is a single JSON document.
    Document,
    /// One GeoJSON object per line, blank lines are skipped.
    Lines,
}

fn check_slice(line: usize, json: &[u8], validator: &Validator) -> Report {
    let report = match serde_json::from_slice::<Value>(json) {
        Ok(value) => Report::new(line, validator.any(&value)),
        Err(err) => Report::invalid(line, vec![JSONError::malformed(&err)]),
    };
    debug!("line {}: valid={}", report.line, report.valid);
    report
}

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

/// Check every document of `reader`, one report per document in input order.
///
/// Bytes that are not UTF-8 or not JSON yield an invalid report for their
/// document, only read failures of `reader` itself are returned as errors.
pub fn check(
    mut reader: impl BufRead,
    validator: &Validator,
    input: Input,
) -> io::Result<Vec<Report>> {
    match input {
        Input::Document => {
            let mut json = Vec::new();
            reader.read_to_end(&mut json)?;
            Ok(vec![check_slice(1, &json, validator)])
        }
        Input::Lines => {
            let lines: Vec<(usize, Vec<u8>)> = reader
                .split(b'\n')
                .enumerate()
                .map(|(idx, line)| line.map(|line| (idx + 1, line)))
                .collect::<io::Result<_>>()?;
            let reports = lines
                .par_iter()
                .filter(|(_, line)| !is_blank(line))
                .map(|(idx, line)| check_slice(*idx, line, validator))
                .collect();
            Ok(reports)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};
    use std::io::Cursor;

    #[test]
    fn null_geometry_feature() {
        let value = json!({"type": "Feature", "geometry": null, "properties": {}});
        let feature = validate_feature(&value).unwrap();
        assert_eq!(feature.geometry, None);
    }

    #[test]
    fn invalid_feature_index() {
        let value = json!({
            "type": "FeatureCollection",
            "features": [{"type": "Feature", "properties": {}}]
        });
        let error = validate_feature_collection(&value).unwrap_err();
        assert_eq!(error.feature_index(), Some(0));
    }

    #[test]
    fn bbox_helper() {
        let error = validate_bbox(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(error.kind, ErrorKind::InvalidBbox);
        assert!(validate_bbox(&json!([1, 2, 3, 4])).is_ok());
    }

    #[test]
    fn round_trip_is_idempotent() {
        let value = json!({
            "type": "FeatureCollection",
            "bbox": [0, 0, 4, 4],
            "features": [
                {
                    "type": "Feature",
                    "id": "a",
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0, 0], [4, 0], [4, 4], [0, 0]]]
                    },
                    "properties": {"name": "triangle"},
                    "foreign": true
                },
                {"type": "Feature", "id": 7, "geometry": null, "properties": null}
            ]
        });
        let first = validate(&value).unwrap();
        let serialized = to_value(&first).unwrap();
        let second = validate(&serialized).unwrap();
        assert_eq!(first, second);
        assert_eq!(serialized["features"][0].get("foreign"), None);
    }

    #[test]
    fn check_document() {
        let reader = Cursor::new(r#"{"type": "Point", "coordinates": [1, 2]}"#);
        let reports = check(reader, &Validator::new(), Input::Document).unwrap();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].valid);
    }

    #[test]
    fn check_lines_keeps_order_and_line_numbers() {
        let input = [
            r#"{"type": "Point", "coordinates": [1, 2]}"#,
            "",
            r#"{"type": "Point", "coordinates": [[1, 2]]}"#,
            "{broken",
            r#"{"type": "Feature", "geometry": null, "properties": {}}"#,
        ]
        .join("\n");
        let reports = check(Cursor::new(input), &Validator::new(), Input::Lines).unwrap();
        let lines: Vec<_> = reports.iter().map(|r| (r.line, r.valid)).collect();
        assert_eq!(lines, vec![(1, true), (3, false), (4, false), (5, true)]);
        assert_eq!(reports[2].errors[0].kind, "malformed json");
    }

    #[test]
    fn check_lines_reports_invalid_utf8_per_line() {
        let mut input = br#"{"type": "Point", "coordinates": [1, 2]}"#.to_vec();
        input.extend_from_slice(b"\n\xff\xfe\r\n");
        input.extend_from_slice(br#"{"type": "Point", "coordinates": [3, 4]}"#);
        input.extend_from_slice(b"\r\n");

        let reports = check(Cursor::new(input), &Validator::new(), Input::Lines).unwrap();
        let lines: Vec<_> = reports.iter().map(|r| (r.line, r.valid)).collect();
        assert_eq!(lines, vec![(1, true), (2, false), (3, true)]);
        assert_eq!(reports[1].errors[0].kind, "malformed json");
    }

    #[test]
    fn check_document_with_invalid_utf8() {
        let reader = Cursor::new(b"{\"type\": \"\xff\"}".to_vec());
        let reports = check(reader, &Validator::new(), Input::Document).unwrap();
        assert_eq!(reports.len(), 1);
        assert!(!reports[0].valid);
        assert_eq!(reports[0].errors[0].kind, "malformed json");
    }
}
