use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::fmt;
use std::str::FromStr;

/// The nine type literals of RFC 7946.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeoJsonType {
    Feature,
    FeatureCollection,
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
    GeometryCollection,
}

impl GeoJsonType {
    pub fn as_str(self) -> &'static str {
        use GeoJsonType::*;

        match self {
            Feature => "Feature",
            FeatureCollection => "FeatureCollection",
            Point => "Point",
            MultiPoint => "MultiPoint",
            LineString => "LineString",
            MultiLineString => "MultiLineString",
            Polygon => "Polygon",
            MultiPolygon => "MultiPolygon",
            GeometryCollection => "GeometryCollection",
        }
    }

    pub fn is_geometry(self) -> bool {
        !matches!(self, GeoJsonType::Feature | GeoJsonType::FeatureCollection)
    }
}

impl FromStr for GeoJsonType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use GeoJsonType::*;

        let kind = match s {
            "Feature" => Feature,
            "FeatureCollection" => FeatureCollection,
            "Point" => Point,
            "MultiPoint" => MultiPoint,
            "LineString" => LineString,
            "MultiLineString" => MultiLineString,
            "Polygon" => Polygon,
            "MultiPolygon" => MultiPolygon,
            "GeometryCollection" => GeometryCollection,
            _ => return Err(()),
        };
        Ok(kind)
    }
}

impl fmt::Display for GeoJsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Longitude, latitude and an optional altitude.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct Position(pub Vec<f64>);

impl Position {
    pub fn lon(&self) -> f64 {
        self.0[0]
    }

    pub fn lat(&self) -> f64 {
        self.0[1]
    }

    pub fn alt(&self) -> Option<f64> {
        self.0.get(2).copied()
    }
}

impl From<(f64, f64)> for Position {
    fn from(coordinates: (f64, f64)) -> Self {
        Position(vec![coordinates.0, coordinates.1])
    }
}

impl From<&Position> for (f64, f64) {
    fn from(position: &Position) -> Self {
        (position.lon(), position.lat())
    }
}

/// Flat `[min_0, .., min_n, max_0, .., max_n]` bounding box.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct Bbox(pub Vec<f64>);

impl Bbox {
    pub fn dimensions(&self) -> usize {
        self.0.len() / 2
    }

    pub fn min(&self, axis: usize) -> f64 {
        self.0[axis]
    }

    pub fn max(&self, axis: usize) -> f64 {
        self.0[self.dimensions() + axis]
    }
}

pub type LineStringCoordinates = Vec<Position>;
pub type LinearRing = Vec<Position>;
pub type PolygonCoordinates = Vec<LinearRing>;

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: Position,
        #[serde(skip_serializing_if = "Option::is_none")]
        bbox: Option<Bbox>,
    },
    MultiPoint {
        coordinates: Vec<Position>,
        #[serde(skip_serializing_if = "Option::is_none")]
        bbox: Option<Bbox>,
    },
    LineString {
        coordinates: LineStringCoordinates,
        #[serde(skip_serializing_if = "Option::is_none")]
        bbox: Option<Bbox>,
    },
    MultiLineString {
        coordinates: Vec<LineStringCoordinates>,
        #[serde(skip_serializing_if = "Option::is_none")]
        bbox: Option<Bbox>,
    },
    Polygon {
        coordinates: PolygonCoordinates,
        #[serde(skip_serializing_if = "Option::is_none")]
        bbox: Option<Bbox>,
    },
    MultiPolygon {
        coordinates: Vec<PolygonCoordinates>,
        #[serde(skip_serializing_if = "Option::is_none")]
        bbox: Option<Bbox>,
    },
    GeometryCollection {
        geometries: Vec<Geometry>,
        #[serde(skip_serializing_if = "Option::is_none")]
        bbox: Option<Bbox>,
    },
}

impl Geometry {
    pub fn kind(&self) -> GeoJsonType {
        match self {
            Geometry::Point { .. } => GeoJsonType::Point,
            Geometry::MultiPoint { .. } => GeoJsonType::MultiPoint,
            Geometry::LineString { .. } => GeoJsonType::LineString,
            Geometry::MultiLineString { .. } => GeoJsonType::MultiLineString,
            Geometry::Polygon { .. } => GeoJsonType::Polygon,
            Geometry::MultiPolygon { .. } => GeoJsonType::MultiPolygon,
            Geometry::GeometryCollection { .. } => GeoJsonType::GeometryCollection,
        }
    }

    pub fn bbox(&self) -> Option<&Bbox> {
        match self {
            Geometry::Point { bbox, .. }
            | Geometry::MultiPoint { bbox, .. }
            | Geometry::LineString { bbox, .. }
            | Geometry::MultiLineString { bbox, .. }
            | Geometry::Polygon { bbox, .. }
            | Geometry::MultiPolygon { bbox, .. }
            | Geometry::GeometryCollection { bbox, .. } => bbox.as_ref(),
        }
    }

    /// Every position of the geometry, depth first.
    pub fn positions(&self) -> Vec<&Position> {
        match self {
            Geometry::Point { coordinates, .. } => vec![coordinates],
            Geometry::MultiPoint { coordinates, .. } | Geometry::LineString { coordinates, .. } => {
                coordinates.iter().collect()
            }
            Geometry::MultiLineString { coordinates, .. } | Geometry::Polygon { coordinates, .. } => {
                coordinates.iter().flatten().collect()
            }
            Geometry::MultiPolygon { coordinates, .. } => {
                coordinates.iter().flatten().flatten().collect()
            }
            Geometry::GeometryCollection { geometries, .. } => {
                geometries.iter().flat_map(Geometry::positions).collect()
            }
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum FeatureId {
    String(String),
    Number(Number),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<FeatureId>,
    pub geometry: Option<Geometry>,
    pub properties: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Bbox>,
}

impl Feature {
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref()?.get(key)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Bbox>,
}

/// Any top-level GeoJSON object.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum GeoJson {
    Geometry(Geometry),
    Feature(Feature),
    FeatureCollection(FeatureCollection),
}

impl GeoJson {
    pub fn kind(&self) -> GeoJsonType {
        match self {
            GeoJson::Geometry(geometry) => geometry.kind(),
            GeoJson::Feature(_) => GeoJsonType::Feature,
            GeoJson::FeatureCollection(_) => GeoJsonType::FeatureCollection,
        }
    }
}
