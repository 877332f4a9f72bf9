use super::geojson::{Bbox, Feature, FeatureCollection, Geometry, Position};
use geo::prelude::*;
use geo_types::{self as gt, Coordinate, LineString, Point};
use itertools::{Itertools, MinMaxResult};

impl From<&Position> for Coordinate<f64> {
    fn from(position: &Position) -> Self {
        Coordinate {
            x: position.lon(),
            y: position.lat(),
        }
    }
}

impl From<&Position> for Point<f64> {
    fn from(position: &Position) -> Self {
        Point::new(position.lon(), position.lat())
    }
}

fn get_line_string(positions: &[Position]) -> LineString<f64> {
    LineString(positions.iter().map(Coordinate::from).collect())
}

fn get_polygon(rings: &[Vec<Position>]) -> gt::Polygon<f64> {
    let mut rings = rings.iter().map(|ring| get_line_string(ring));
    let exterior = rings.next().unwrap_or_else(|| LineString(vec![]));
    gt::Polygon::new(exterior, rings.collect())
}

/// Altitude is dropped, `geo_types` is planar.
impl From<&Geometry> for gt::Geometry<f64> {
    fn from(geometry: &Geometry) -> Self {
        match geometry {
            Geometry::Point { coordinates, .. } => gt::Geometry::Point(coordinates.into()),
            Geometry::MultiPoint { coordinates, .. } => {
                let points = coordinates.iter().map(Point::from).collect();
                gt::Geometry::MultiPoint(gt::MultiPoint(points))
            }
            Geometry::LineString { coordinates, .. } => {
                gt::Geometry::LineString(get_line_string(coordinates))
            }
            Geometry::MultiLineString { coordinates, .. } => {
                let lines = coordinates.iter().map(|l| get_line_string(l)).collect();
                gt::Geometry::MultiLineString(gt::MultiLineString(lines))
            }
            Geometry::Polygon { coordinates, .. } => gt::Geometry::Polygon(get_polygon(coordinates)),
            Geometry::MultiPolygon { coordinates, .. } => {
                let polygons = coordinates.iter().map(|p| get_polygon(p)).collect();
                gt::Geometry::MultiPolygon(gt::MultiPolygon(polygons))
            }
            Geometry::GeometryCollection { geometries, .. } => {
                let geometries = geometries.iter().map(gt::Geometry::from).collect();
                gt::Geometry::GeometryCollection(gt::GeometryCollection(geometries))
            }
        }
    }
}

fn get_bbox<'a>(positions: impl IntoIterator<Item = &'a Position>) -> Option<Bbox> {
    let positions: Vec<&Position> = positions.into_iter().collect();
    let coordinates: Vec<(f64, f64)> = positions.iter().map(|&p| p.into()).collect();
    let line_string: LineString<f64> = coordinates.into();
    let rect = line_string.bounding_rect()?;
    let (min, max) = (rect.min(), rect.max());

    let altitudes: Option<Vec<f64>> = positions.iter().map(|p| p.alt()).collect();
    let bbox = match altitudes.map(|alts| alts.into_iter().minmax()) {
        Some(MinMaxResult::MinMax(low, high)) => vec![min.x, min.y, low, max.x, max.y, high],
        Some(MinMaxResult::OneElement(alt)) => vec![min.x, min.y, alt, max.x, max.y, alt],
        _ => vec![min.x, min.y, max.x, max.y],
    };
    Some(Bbox(bbox))
}

/// The extent of every position an object carries.
pub trait Extent {
    fn compute_bbox(&self) -> Option<Bbox>;
}

impl Extent for Geometry {
    fn compute_bbox(&self) -> Option<Bbox> {
        get_bbox(self.positions())
    }
}

impl Extent for Feature {
    fn compute_bbox(&self) -> Option<Bbox> {
        self.geometry.as_ref()?.compute_bbox()
    }
}

impl Extent for FeatureCollection {
    fn compute_bbox(&self) -> Option<Bbox> {
        let positions = self
            .features
            .iter()
            .filter_map(|feature| feature.geometry.as_ref())
            .flat_map(Geometry::positions);
        get_bbox(positions)
    }
}

impl Bbox {
    /// Whether every axis of `other` lies within this box. Axes only one of
    /// the boxes carries are ignored.
    pub fn covers(&self, other: &Bbox) -> bool {
        let dimensions = self.dimensions().min(other.dimensions());
        (0..dimensions)
            .all(|axis| self.min(axis) <= other.min(axis) && other.max(axis) <= self.max(axis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::*;

    fn position(lon: f64, lat: f64) -> Position {
        (lon, lat).into()
    }

    fn assert_bbox(expected: &[f64], bbox: Option<Bbox>) {
        let bbox = bbox.unwrap();
        assert_eq!(bbox.0.len(), expected.len());
        for (a, b) in expected.iter().zip(bbox.0.iter()) {
            assert!(relative_eq!(*a, *b, epsilon = f64::EPSILON));
        }
    }

    #[test]
    fn bbox_for_line() {
        let line = Geometry::LineString {
            coordinates: vec![position(9., 50.), position(9., 51.), position(10., 51.)],
            bbox: None,
        };
        assert_bbox(&[9., 50., 10., 51.], line.compute_bbox());
    }

    #[test]
    fn bbox_for_point_is_degenerate() {
        let point = Geometry::Point {
            coordinates: position(13.4, 52.5),
            bbox: None,
        };
        assert_bbox(&[13.4, 52.5, 13.4, 52.5], point.compute_bbox());
    }

    #[test]
    fn bbox_with_altitude() {
        let points = Geometry::MultiPoint {
            coordinates: vec![Position(vec![5., 49., 100.]), Position(vec![7., 50., 20.])],
            bbox: None,
        };
        assert_bbox(&[5., 49., 20., 7., 50., 100.], points.compute_bbox());
    }

    #[test]
    fn bbox_ignores_altitude_unless_everywhere() {
        let points = Geometry::MultiPoint {
            coordinates: vec![Position(vec![5., 49., 100.]), position(7., 50.)],
            bbox: None,
        };
        assert_bbox(&[5., 49., 7., 50.], points.compute_bbox());
    }

    #[test]
    fn bbox_for_collection_skips_unlocated_features() {
        let located = Feature {
            id: None,
            geometry: Some(Geometry::Point {
                coordinates: position(-3., 2.),
                bbox: None,
            }),
            properties: None,
            bbox: None,
        };
        let unlocated = Feature {
            geometry: None,
            ..located.clone()
        };
        let other = Feature {
            geometry: Some(Geometry::Point {
                coordinates: position(4., -1.),
                bbox: None,
            }),
            ..located.clone()
        };
        let collection = FeatureCollection {
            features: vec![located, unlocated.clone(), other],
            bbox: None,
        };
        assert_bbox(&[-3., -1., 4., 2.], collection.compute_bbox());
        assert_eq!(unlocated.compute_bbox(), None);
    }

    #[test]
    fn empty_geometry_has_no_bbox() {
        let line = Geometry::LineString {
            coordinates: vec![],
            bbox: None,
        };
        assert_eq!(line.compute_bbox(), None);
    }

    #[test]
    fn covers() {
        let outer = Bbox(vec![0., 0., 10., 10.]);
        assert!(outer.covers(&Bbox(vec![1., 1., 2., 2.])));
        assert!(outer.covers(&Bbox(vec![1., 1., 0., 2., 2., 5.])));
        assert!(!outer.covers(&Bbox(vec![-1., 1., 2., 2.])));
    }

    #[test]
    fn convert_polygon_with_hole() {
        let ring = vec![
            position(0., 0.),
            position(4., 0.),
            position(4., 4.),
            position(0., 0.),
        ];
        let hole = vec![
            position(1., 1.),
            position(2., 1.),
            position(2., 2.),
            position(1., 1.),
        ];
        let polygon = Geometry::Polygon {
            coordinates: vec![ring, hole],
            bbox: None,
        };
        match gt::Geometry::from(&polygon) {
            gt::Geometry::Polygon(p) => {
                assert_eq!(p.exterior().0.len(), 4);
                assert_eq!(p.interiors().len(), 1);
            }
            _ => panic!("expected a polygon"),
        }
    }
}
