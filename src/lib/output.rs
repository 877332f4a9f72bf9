use super::error::{ValidationError, ValidationErrors};
use super::geo::Extent;
use super::geojson::{Bbox, GeoJson};
use log::warn;
use serde::Serialize;
use serde_json::to_string;
use std::error::Error;
use std::io::Write;

pub trait Output {
    fn write_json_lines(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>>;
    fn write_text(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>>;
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct JSONError {
    pub kind: &'static str,
    pub path: String,
    pub message: String,
}

impl From<&ValidationError> for JSONError {
    fn from(error: &ValidationError) -> Self {
        JSONError {
            kind: error.kind.as_str(),
            path: error.path.to_string(),
            message: format!("expected {}", error.expected),
        }
    }
}

impl JSONError {
    pub fn malformed(err: &serde_json::Error) -> Self {
        JSONError {
            kind: "malformed json",
            path: "/".into(),
            message: err.to_string(),
        }
    }
}

/// Outcome of checking one document.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Report {
    pub line: usize,
    pub valid: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Bbox>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JSONError>,
}

fn declared_bbox(object: &GeoJson) -> Option<&Bbox> {
    match object {
        GeoJson::Geometry(geometry) => geometry.bbox(),
        GeoJson::Feature(feature) => feature.bbox.as_ref(),
        GeoJson::FeatureCollection(collection) => collection.bbox.as_ref(),
    }
}

fn computed_bbox(object: &GeoJson) -> Option<Bbox> {
    match object {
        GeoJson::Geometry(geometry) => geometry.compute_bbox(),
        GeoJson::Feature(feature) => feature.compute_bbox(),
        GeoJson::FeatureCollection(collection) => collection.compute_bbox(),
    }
}

impl Report {
    pub fn new(line: usize, result: Result<GeoJson, ValidationErrors>) -> Self {
        match result {
            Ok(object) => {
                let bbox = computed_bbox(&object);
                if let (Some(declared), Some(computed)) = (declared_bbox(&object), &bbox) {
                    if !declared.covers(computed) {
                        warn!("line {}: declared bbox does not cover all positions", line);
                    }
                }
                Report {
                    line,
                    valid: true,
                    kind: Some(object.kind().as_str()),
                    bbox,
                    errors: vec![],
                }
            }
            Err(errors) => Report::invalid(line, errors.iter().map(JSONError::from).collect()),
        }
    }

    pub fn invalid(line: usize, errors: Vec<JSONError>) -> Self {
        Report {
            line,
            valid: false,
            kind: None,
            bbox: None,
            errors,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub valid: usize,
    pub invalid: usize,
}

impl From<&[Report]> for Summary {
    fn from(reports: &[Report]) -> Self {
        let valid = reports.iter().filter(|r| r.valid).count();
        Summary {
            valid,
            invalid: reports.len() - valid,
        }
    }
}

impl Output for Vec<Report> {
    fn write_json_lines(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        for report in self.iter() {
            let json = to_string(report)?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    fn write_text(&self, writer: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        for report in self.iter() {
            if report.valid {
                let kind = report.kind.unwrap_or("GeoJSON");
                writeln!(writer, "line {}: valid {}", report.line, kind)?;
                continue;
            }
            for error in report.errors.iter() {
                writeln!(
                    writer,
                    "line {}: {} at {}: {}",
                    report.line, error.kind, error.path, error.message
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::Validator;
    use serde_json::json;

    fn report(value: serde_json::Value) -> Report {
        Report::new(1, Validator::new().any(&value))
    }

    #[test]
    fn valid_report_carries_type_and_extent() {
        let report = report(json!({"type": "LineString", "coordinates": [[0, 0], [2, 1]]}));
        let json = to_string(&report).unwrap();
        assert_eq!(
            json,
            r#"{"line":1,"valid":true,"type":"LineString","bbox":[0.0,0.0,2.0,1.0]}"#
        );
    }

    #[test]
    fn invalid_report_lists_errors() {
        let report = report(json!({"type": "Point", "coordinates": [[0, 0]]}));
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].path, "/coordinates");
    }

    #[test]
    fn text_output() {
        let reports = vec![
            report(json!({"type": "Point", "coordinates": [0, 0]})),
            Report::new(2, Validator::new().any(&json!({"type": "Circle"}))),
        ];
        let mut out = Vec::new();
        reports.write_text(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.trim().split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "line 1: valid Point");
        assert!(lines[1].starts_with("line 2: invalid type at /type"));
    }

    #[test]
    fn summary_counts() {
        let reports = vec![
            report(json!({"type": "Point", "coordinates": [0, 0]})),
            report(json!({"type": "Point"})),
            report(json!({"type": "FeatureCollection", "features": []})),
        ];
        let summary = Summary::from(reports.as_slice());
        assert_eq!(summary, Summary { valid: 2, invalid: 1 });
    }
}
