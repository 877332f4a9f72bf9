//! Structured validation errors.
//!
//! Every error carries the [`Path`] of the offending member, so a caller can
//! point at the exact field that failed instead of rejecting the whole body.

use itertools::Itertools;
use smartstring::alias::String;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// `type` is missing, not a string, or not allowed at this position.
    InvalidType,
    /// A member is present (or required) but has the wrong arity or nesting.
    ShapeMismatch,
    /// `bbox` is not an even-length numeric array with `min <= max` per axis.
    InvalidBbox,
    /// The caller requires a located feature but `geometry` is `null`.
    NullGeometryNotAllowed,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidType => "invalid type",
            ErrorKind::ShapeMismatch => "shape mismatch",
            ErrorKind::InvalidBbox => "invalid bbox",
            ErrorKind::NullGeometryNotAllowed => "null geometry not allowed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index(idx) => write!(f, "{}", idx),
        }
    }
}

/// Location of a member inside a JSON document, rendered as a JSON pointer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    pub fn root() -> Self {
        Path::default()
    }

    pub fn key(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.into()));
        Path { segments }
    }

    pub fn index(&self, idx: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(idx));
        Path { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Index following the first occurrence of `key`, e.g. the failing
    /// feature for `key = "features"`.
    pub fn index_after(&self, key: &str) -> Option<usize> {
        self.segments
            .iter()
            .tuple_windows()
            .find_map(|(a, b)| match (a, b) {
                (PathSegment::Key(k), PathSegment::Index(idx)) if k.as_str() == key => Some(*idx),
                _ => None,
            })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        write!(f, "/{}", self.segments.iter().join("/"))
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {path}: expected {expected}")]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub path: Path,
    pub expected: &'static str,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, path: Path, expected: &'static str) -> Self {
        ValidationError {
            kind,
            path,
            expected,
        }
    }

    pub fn invalid_type(path: Path, expected: &'static str) -> Self {
        ValidationError::new(ErrorKind::InvalidType, path, expected)
    }

    pub fn shape_mismatch(path: Path, expected: &'static str) -> Self {
        ValidationError::new(ErrorKind::ShapeMismatch, path, expected)
    }

    pub fn invalid_bbox(path: Path, expected: &'static str) -> Self {
        ValidationError::new(ErrorKind::InvalidBbox, path, expected)
    }

    /// Position of the failing entry in a `FeatureCollection`.
    pub fn feature_index(&self) -> Option<usize> {
        self.path.index_after("features")
    }
}

/// A non-empty list of validation errors, in document order.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", .0.iter().join("; "))]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn first(&self) -> &ValidationError {
        &self.0[0]
    }

    pub fn into_first(mut self) -> ValidationError {
        self.0.swap_remove(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        ValidationErrors(vec![error])
    }
}
