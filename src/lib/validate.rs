use super::error::{ErrorKind, Path, ValidationError, ValidationErrors};
use super::geojson::{
    Bbox, Feature, FeatureCollection, FeatureId, GeoJson, GeoJsonType, Geometry, LinearRing,
    Position,
};
use serde_json::{Map, Value};

type Checked<T> = Result<T, ValidationErrors>;

const GEOMETRY_TYPE: &str = "one of the seven geometry type names";
const ANY_TYPE: &str = "one of the nine GeoJSON type names";
const POSITION: &str = "position (array of 2 or 3 numbers)";
const LOOSE_POSITION: &str = "position (array of at least 2 numbers)";
const POSITIONS: &str = "array of positions";
const LINE_STRING: &str = "array of 2 or more positions";
const LINE_STRINGS: &str = "array of line strings";
const RING: &str = "linear ring (array of 4 or more positions)";
const CLOSED_RING: &str = "closed linear ring (first and last positions equal)";
const RINGS: &str = "array of linear rings";
const POLYGONS: &str = "array of polygons";
const GEOMETRIES: &str = "array of geometries";
const FEATURES: &str = "array of features";
const OBJECT: &str = "object";
const BBOX: &str = "array of numbers with even length of at least 4";
const BBOX_ORDER: &str = "min <= max for every axis";

/// Which conformance level the validator enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rules {
    /// RFC 7946: bounded position arity, line and ring minimum sizes, closed rings.
    Strict,
    /// Nesting depth and numeric positions only.
    Permissive,
}

impl Default for Rules {
    fn default() -> Self {
        Rules::Strict
    }
}

/// Validates parsed JSON values against the GeoJSON object model.
///
/// Validation reads the `type` discriminant first and dispatches to exactly one
/// variant. The shared members (`type`, `bbox`) and the variant members are
/// checked independently and both must pass.
///
/// # Example
///
/// ```
/// use geojson_validate::Validator;
/// use serde_json::json;
///
/// let validator = Validator::new().collect_all();
/// let value = json!({
///     "type": "FeatureCollection",
///     "features": [
///         {"type": "Feature", "geometry": null},
///         {"type": "Feature", "geometry": {"type": "Circle"}, "properties": {}},
///     ],
/// });
/// let errors = validator.feature_collection(&value).unwrap_err();
/// assert_eq!(errors.len(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    rules: Rules,
    collect_all: bool,
}

impl Validator {
    pub fn new() -> Self {
        Validator::default()
    }

    pub fn permissive(mut self) -> Self {
        self.rules = Rules::Permissive;
        self
    }

    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    /// Keep going after the first malformed child and report all of them.
    pub fn collect_all(mut self) -> Self {
        self.collect_all = true;
        self
    }

    pub fn rules(&self) -> Rules {
        self.rules
    }

    pub fn geometry(&self, value: &Value) -> Checked<Geometry> {
        self.geometry_at(value, &Path::root())
    }

    pub fn feature(&self, value: &Value) -> Checked<Feature> {
        self.feature_at(value, &Path::root())
    }

    pub fn feature_collection(&self, value: &Value) -> Checked<FeatureCollection> {
        self.feature_collection_at(value, &Path::root())
    }

    pub fn bbox(&self, value: &Value) -> Checked<Bbox> {
        bbox(value, &Path::root()).map_err(ValidationErrors::from)
    }

    /// Validates any of the nine GeoJSON object types.
    pub fn any(&self, value: &Value) -> Checked<GeoJson> {
        let path = Path::root();
        let kind = discriminant(object(value, &path)?, &path, ANY_TYPE)?;
        match kind {
            GeoJsonType::Feature => self.feature_at(value, &path).map(GeoJson::Feature),
            GeoJsonType::FeatureCollection => self
                .feature_collection_at(value, &path)
                .map(GeoJson::FeatureCollection),
            _ => self.geometry_at(value, &path).map(GeoJson::Geometry),
        }
    }

    fn geometry_at(&self, value: &Value, path: &Path) -> Checked<Geometry> {
        let object = object(value, path)?;
        let kind = discriminant(object, path, GEOMETRY_TYPE)?;
        if !kind.is_geometry() {
            return Err(ValidationError::invalid_type(path.key("type"), GEOMETRY_TYPE).into());
        }
        let bbox = optional_bbox(object, path);
        let variant = self.variant(kind, object, path);
        let (bbox, mut geometry) = both(bbox, variant)?;
        attach_bbox(&mut geometry, bbox);
        Ok(geometry)
    }

    /// Checks the members specific to `kind`, leaving `bbox` unset.
    fn variant(
        &self,
        kind: GeoJsonType,
        object: &Map<String, Value>,
        path: &Path,
    ) -> Checked<Geometry> {
        if kind == GeoJsonType::GeometryCollection {
            let geometries = self.each(object, path, "geometries", GEOMETRIES, |v, p| {
                self.geometry_at(v, p)
            })?;
            return Ok(Geometry::GeometryCollection {
                geometries,
                bbox: None,
            });
        }

        let at = path.key("coordinates");
        let coordinates = object.get("coordinates").ok_or_else(|| {
            ValidationError::shape_mismatch(at.clone(), expected_coordinates(kind))
        })?;

        let geometry = match kind {
            GeoJsonType::Point => Geometry::Point {
                coordinates: self.position(coordinates, &at)?,
                bbox: None,
            },
            GeoJsonType::MultiPoint => Geometry::MultiPoint {
                coordinates: self.positions(coordinates, &at)?,
                bbox: None,
            },
            GeoJsonType::LineString => Geometry::LineString {
                coordinates: self.line_string(coordinates, &at, true)?,
                bbox: None,
            },
            GeoJsonType::MultiLineString => Geometry::MultiLineString {
                coordinates: array(coordinates, &at, LINE_STRINGS)?
                    .iter()
                    .enumerate()
                    .map(|(idx, line)| self.line_string(line, &at.index(idx), false))
                    .collect::<Result<_, _>>()?,
                bbox: None,
            },
            GeoJsonType::Polygon => Geometry::Polygon {
                coordinates: self.polygon(coordinates, &at)?,
                bbox: None,
            },
            GeoJsonType::MultiPolygon => Geometry::MultiPolygon {
                coordinates: array(coordinates, &at, POLYGONS)?
                    .iter()
                    .enumerate()
                    .map(|(idx, polygon)| self.polygon(polygon, &at.index(idx)))
                    .collect::<Result<_, _>>()?,
                bbox: None,
            },
            GeoJsonType::GeometryCollection
            | GeoJsonType::Feature
            | GeoJsonType::FeatureCollection => {
                return Err(ValidationError::invalid_type(path.key("type"), GEOMETRY_TYPE).into())
            }
        };
        Ok(geometry)
    }

    fn feature_at(&self, value: &Value, path: &Path) -> Checked<Feature> {
        let object = object(value, path)?;
        let kind = discriminant(object, path, "\"Feature\"")?;
        if kind != GeoJsonType::Feature {
            return Err(ValidationError::invalid_type(path.key("type"), "\"Feature\"").into());
        }
        let bbox = optional_bbox(object, path);

        let geometry = match object.get("geometry") {
            None => Err(ValidationError::shape_mismatch(
                path.key("geometry"),
                "geometry object or null",
            )
            .into()),
            Some(Value::Null) => Ok(None),
            Some(geometry) => self.geometry_at(geometry, &path.key("geometry")).map(Some),
        };

        let properties = match object.get("properties") {
            Some(Value::Object(properties)) => Ok(Some(properties.clone())),
            Some(Value::Null) => Ok(None),
            _ => Err(ValidationErrors::from(ValidationError::shape_mismatch(
                path.key("properties"),
                "object or null",
            ))),
        };

        let id = match object.get("id") {
            None => Ok(None),
            Some(Value::String(id)) => Ok(Some(FeatureId::String(id.clone()))),
            Some(Value::Number(id)) => Ok(Some(FeatureId::Number(id.clone()))),
            Some(_) => Err(ValidationErrors::from(ValidationError::shape_mismatch(
                path.key("id"),
                "string or number",
            ))),
        };

        let ((bbox, geometry), (properties, id)) =
            both(both(bbox, geometry), both(properties, id))?;
        Ok(Feature {
            id,
            geometry,
            properties,
            bbox,
        })
    }

    fn feature_collection_at(&self, value: &Value, path: &Path) -> Checked<FeatureCollection> {
        let object = object(value, path)?;
        let kind = discriminant(object, path, "\"FeatureCollection\"")?;
        if kind != GeoJsonType::FeatureCollection {
            return Err(
                ValidationError::invalid_type(path.key("type"), "\"FeatureCollection\"").into(),
            );
        }
        let bbox = optional_bbox(object, path);
        let features = self.each(object, path, "features", FEATURES, |v, p| {
            self.feature_at(v, p)
        });
        let (bbox, features) = both(bbox, features)?;
        Ok(FeatureCollection { features, bbox })
    }

    /// Validates every entry of the array member `key`, tagging errors with
    /// the entry index.
    fn each<T>(
        &self,
        object: &Map<String, Value>,
        path: &Path,
        key: &str,
        expected: &'static str,
        validate: impl Fn(&Value, &Path) -> Checked<T>,
    ) -> Checked<Vec<T>> {
        let at = path.key(key);
        let entries = match object.get(key) {
            Some(Value::Array(entries)) => entries,
            _ => return Err(ValidationError::shape_mismatch(at, expected).into()),
        };

        let mut items = Vec::with_capacity(entries.len());
        let mut errors: Option<ValidationErrors> = None;
        for (idx, entry) in entries.iter().enumerate() {
            match validate(entry, &at.index(idx)) {
                Ok(item) => items.push(item),
                Err(err) if !self.collect_all => return Err(err),
                Err(err) => {
                    errors = Some(match errors.take() {
                        Some(mut all) => {
                            all.extend(err);
                            all
                        }
                        None => err,
                    })
                }
            }
        }
        match errors {
            Some(errors) => Err(errors),
            None => Ok(items),
        }
    }

    fn position(&self, value: &Value, path: &Path) -> Result<Position, ValidationError> {
        let (expected, max) = match self.rules {
            Rules::Strict => (POSITION, 3),
            Rules::Permissive => (LOOSE_POSITION, usize::MAX),
        };
        let numbers = numbers(value)
            .ok_or_else(|| ValidationError::shape_mismatch(path.clone(), expected))?;
        if numbers.len() < 2 || numbers.len() > max {
            return Err(ValidationError::shape_mismatch(path.clone(), expected));
        }
        Ok(Position(numbers))
    }

    fn positions(&self, value: &Value, path: &Path) -> Result<Vec<Position>, ValidationError> {
        array(value, path, POSITIONS)?
            .iter()
            .enumerate()
            .map(|(idx, position)| self.position(position, &path.index(idx)))
            .collect()
    }

    /// An empty line is only a valid LineString geometry, never a member of a
    /// MultiLineString.
    fn line_string(
        &self,
        value: &Value,
        path: &Path,
        allow_empty: bool,
    ) -> Result<Vec<Position>, ValidationError> {
        let positions = self.positions(value, path)?;
        let too_short = positions.len() == 1 || (positions.is_empty() && !allow_empty);
        if self.rules == Rules::Strict && too_short {
            return Err(ValidationError::shape_mismatch(path.clone(), LINE_STRING));
        }
        Ok(positions)
    }

    fn ring(&self, value: &Value, path: &Path) -> Result<LinearRing, ValidationError> {
        let positions = self.positions(value, path)?;
        if self.rules == Rules::Strict {
            if positions.len() < 4 {
                return Err(ValidationError::shape_mismatch(path.clone(), RING));
            }
            if positions.first() != positions.last() {
                return Err(ValidationError::shape_mismatch(path.clone(), CLOSED_RING));
            }
        }
        Ok(positions)
    }

    fn polygon(&self, value: &Value, path: &Path) -> Result<Vec<LinearRing>, ValidationError> {
        array(value, path, RINGS)?
            .iter()
            .enumerate()
            .map(|(idx, ring)| self.ring(ring, &path.index(idx)))
            .collect()
    }
}

fn object<'a>(value: &'a Value, path: &Path) -> Checked<&'a Map<String, Value>> {
    match value {
        Value::Object(object) => Ok(object),
        _ => Err(ValidationError::invalid_type(path.clone(), OBJECT).into()),
    }
}

fn discriminant(
    object: &Map<String, Value>,
    path: &Path,
    expected: &'static str,
) -> Checked<GeoJsonType> {
    object
        .get("type")
        .and_then(Value::as_str)
        .and_then(|name| name.parse().ok())
        .ok_or_else(|| ValidationError::invalid_type(path.key("type"), expected).into())
}

fn optional_bbox(object: &Map<String, Value>, path: &Path) -> Checked<Option<Bbox>> {
    match object.get("bbox") {
        None => Ok(None),
        Some(value) => bbox(value, &path.key("bbox"))
            .map(Some)
            .map_err(ValidationErrors::from),
    }
}

fn bbox(value: &Value, path: &Path) -> Result<Bbox, ValidationError> {
    let numbers =
        numbers(value).ok_or_else(|| ValidationError::invalid_bbox(path.clone(), BBOX))?;
    if numbers.len() < 4 || numbers.len() % 2 != 0 {
        return Err(ValidationError::invalid_bbox(path.clone(), BBOX));
    }
    let bbox = Bbox(numbers);
    if (0..bbox.dimensions()).any(|axis| bbox.min(axis) > bbox.max(axis)) {
        return Err(ValidationError::invalid_bbox(path.clone(), BBOX_ORDER));
    }
    Ok(bbox)
}

fn array<'a>(
    value: &'a Value,
    path: &Path,
    expected: &'static str,
) -> Result<&'a Vec<Value>, ValidationError> {
    value
        .as_array()
        .ok_or_else(|| ValidationError::shape_mismatch(path.clone(), expected))
}

fn numbers(value: &Value) -> Option<Vec<f64>> {
    value.as_array()?.iter().map(Value::as_f64).collect()
}

fn expected_coordinates(kind: GeoJsonType) -> &'static str {
    match kind {
        GeoJsonType::Point => POSITION,
        GeoJsonType::MultiPoint => POSITIONS,
        GeoJsonType::LineString => LINE_STRING,
        GeoJsonType::MultiLineString => LINE_STRINGS,
        GeoJsonType::Polygon => RINGS,
        GeoJsonType::MultiPolygon => POLYGONS,
        _ => GEOMETRIES,
    }
}

fn attach_bbox(geometry: &mut Geometry, value: Option<Bbox>) {
    match geometry {
        Geometry::Point { bbox, .. }
        | Geometry::MultiPoint { bbox, .. }
        | Geometry::LineString { bbox, .. }
        | Geometry::MultiLineString { bbox, .. }
        | Geometry::Polygon { bbox, .. }
        | Geometry::MultiPolygon { bbox, .. }
        | Geometry::GeometryCollection { bbox, .. } => *bbox = value,
    }
}

/// Logical AND of two independent checks; errors of both sides are kept.
fn both<A, B>(a: Checked<A>, b: Checked<B>) -> Checked<(A, B)> {
    match (a, b) {
        (Ok(a), Ok(b)) => Ok((a, b)),
        (Err(err), Ok(_)) | (Ok(_), Err(err)) => Err(err),
        (Err(mut a), Err(b)) => {
            a.extend(b);
            Err(a)
        }
    }
}

impl Feature {
    /// Fails for unlocated features, for callers that need a geometry.
    pub fn require_geometry(&self) -> Result<&Geometry, ValidationError> {
        self.geometry.as_ref().ok_or_else(|| {
            ValidationError::new(
                ErrorKind::NullGeometryNotAllowed,
                Path::root().key("geometry"),
                "geometry object",
            )
        })
    }
}
