/*
This file is part of the GeoScript Binding Layer
Copyright (C) 2022 Novel-T

The GeoScript Binding Layer is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/
use std::rc::Rc;

use anyhow::Result;
use feature_engine::EngineGeometry;
use geo_types::{
    Coord, Geometry as GeoGeometry, GeometryCollection, LineString, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cache::LazyCache;
use crate::config::{get_str, normalize, require_array, type_is, ConfigMap};
use crate::errors::ErrorKind;
use crate::factory::{Context, Factory, Kind, Wrapper};
use crate::geom::Bounds;

type Position = Vec<f64>;

fn decode<T: DeserializeOwned>(kind: Kind, coordinates: &Value) -> Result<T> {
    match serde_json::from_value(coordinates.clone()) {
        Ok(decoded) => Ok(decoded),
        Err(e) => Err(ErrorKind::invalid(
            "coordinates",
            format!("not valid {} coordinates: {}", kind, e),
        ))?,
    }
}

fn coord(position: &[f64]) -> Result<Coord<f64>> {
    match position {
        [x, y] => Ok(Coord { x: *x, y: *y }),
        _ => Err(ErrorKind::invalid(
            "coordinates",
            format!("a position needs 2 numbers, got {}", position.len()),
        ))?,
    }
}

fn line_string(positions: &[Position]) -> Result<LineString<f64>> {
    let coords = positions
        .iter()
        .map(|p| coord(p))
        .collect::<Result<Vec<_>>>()?;
    Ok(LineString::new(coords))
}

fn polygon(rings: &[Vec<Position>]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(|r| line_string(r));
    let exterior = match rings.next() {
        Some(ring) => ring?,
        None => LineString::new(vec![]),
    };
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Decodes `coordinates` for every kind except collections
fn geo_geometry(kind: Kind, coordinates: &Value) -> Result<GeoGeometry<f64>> {
    let geometry = match kind {
        Kind::Point => {
            let position: Position = decode(kind, coordinates)?;
            GeoGeometry::Point(Point::from(coord(&position)?))
        }
        Kind::LineString => {
            let positions: Vec<Position> = decode(kind, coordinates)?;
            GeoGeometry::LineString(line_string(&positions)?)
        }
        Kind::Polygon => {
            let rings: Vec<Vec<Position>> = decode(kind, coordinates)?;
            GeoGeometry::Polygon(polygon(&rings)?)
        }
        Kind::MultiPoint => {
            let positions: Vec<Position> = decode(kind, coordinates)?;
            let points = positions
                .iter()
                .map(|p| coord(p).map(Point::from))
                .collect::<Result<Vec<_>>>()?;
            GeoGeometry::MultiPoint(MultiPoint::new(points))
        }
        Kind::MultiLineString => {
            let lines: Vec<Vec<Position>> = decode(kind, coordinates)?;
            let lines = lines
                .iter()
                .map(|l| line_string(l))
                .collect::<Result<Vec<_>>>()?;
            GeoGeometry::MultiLineString(MultiLineString::new(lines))
        }
        Kind::MultiPolygon => {
            let polygons: Vec<Vec<Vec<Position>>> = decode(kind, coordinates)?;
            let polygons = polygons
                .iter()
                .map(|p| polygon(p))
                .collect::<Result<Vec<_>>>()?;
            GeoGeometry::MultiPolygon(MultiPolygon::new(polygons))
        }
        other => Err(ErrorKind::invalid(
            "type",
            format!("{} is not a coordinate geometry", other),
        ))?,
    };
    Ok(geometry)
}

fn encode_coord(c: &Coord<f64>) -> Value {
    Value::from(vec![c.x, c.y])
}

fn encode_line_string(line_string: &LineString<f64>) -> Value {
    Value::Array(line_string.coords().map(encode_coord).collect())
}

fn encode_polygon(polygon: &Polygon<f64>) -> Value {
    if polygon.exterior().0.is_empty() {
        return Value::Array(vec![]);
    }
    Value::Array(
        std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .map(encode_line_string)
            .collect(),
    )
}

/// GeoJSON-like configuration of an engine side geometry
fn encode(geometry: &GeoGeometry<f64>) -> ConfigMap {
    let (kind, coordinates) = match geometry {
        GeoGeometry::Point(p) => (Kind::Point, encode_coord(&p.0)),
        GeoGeometry::Line(l) => (
            Kind::LineString,
            Value::Array(vec![encode_coord(&l.start), encode_coord(&l.end)]),
        ),
        GeoGeometry::LineString(ls) => (Kind::LineString, encode_line_string(ls)),
        GeoGeometry::Polygon(p) => (Kind::Polygon, encode_polygon(p)),
        GeoGeometry::Rect(r) => (Kind::Polygon, encode_polygon(&r.to_polygon())),
        GeoGeometry::Triangle(t) => (Kind::Polygon, encode_polygon(&t.to_polygon())),
        GeoGeometry::MultiPoint(mp) => (
            Kind::MultiPoint,
            Value::Array(mp.iter().map(|p| encode_coord(&p.0)).collect()),
        ),
        GeoGeometry::MultiLineString(mls) => (
            Kind::MultiLineString,
            Value::Array(mls.iter().map(encode_line_string).collect()),
        ),
        GeoGeometry::MultiPolygon(mp) => (
            Kind::MultiPolygon,
            Value::Array(mp.iter().map(encode_polygon).collect()),
        ),
        GeoGeometry::GeometryCollection(gc) => {
            let members = gc.iter().map(|g| Value::Object(encode(g))).collect();
            let mut config = ConfigMap::new();
            config.insert("type".to_string(), Value::from(Kind::GeometryCollection.name()));
            config.insert("geometries".to_string(), Value::Array(members));
            return config;
        }
    };

    let mut config = ConfigMap::new();
    config.insert("type".to_string(), Value::from(kind.name()));
    config.insert("coordinates".to_string(), coordinates);
    config
}

fn kind_of(geometry: &GeoGeometry<f64>) -> Kind {
    match geometry {
        GeoGeometry::Point(_) => Kind::Point,
        GeoGeometry::Line(_) | GeoGeometry::LineString(_) => Kind::LineString,
        GeoGeometry::Polygon(_) | GeoGeometry::Rect(_) | GeoGeometry::Triangle(_) => Kind::Polygon,
        GeoGeometry::MultiPoint(_) => Kind::MultiPoint,
        GeoGeometry::MultiLineString(_) => Kind::MultiLineString,
        GeoGeometry::MultiPolygon(_) => Kind::MultiPolygon,
        GeoGeometry::GeometryCollection(_) => Kind::GeometryCollection,
    }
}

/// Geometry
///
/// Wraps an engine geometry of one of the seven geometry kinds.  Positions
/// are 2D.  Bounds and centroid are computed by the engine on first use and
/// cached.
#[derive(Debug, Clone)]
pub struct Geometry {
    kind: Kind,
    geometry: EngineGeometry,
    context: Context,
    cache: LazyCache,
}

impl Geometry {
    /// Builds a geometry from a configuration, which must describe a geometry
    pub fn new(context: &Context, config: &Value) -> Result<Geometry> {
        context.create_as::<Geometry>(config)
    }

    /// Wraps a `geo-types` geometry, passing it through the engine
    pub fn from_geo(context: &Context, geometry: GeoGeometry<f64>) -> Result<Geometry> {
        let geometry = context.engine().create_geometry(geometry)?;
        Ok(Geometry::from_(context, geometry))
    }

    /// Wraps an existing engine geometry as is
    pub fn from_(context: &Context, geometry: EngineGeometry) -> Geometry {
        Geometry {
            kind: kind_of(geometry.geometry()),
            geometry,
            context: context.clone(),
            cache: LazyCache::default(),
        }
    }

    /// Registry entry building geometries of `kind`
    pub fn factory(kind: Kind) -> Factory {
        Factory::new(
            kind,
            move |config| Geometry::handles(kind, config),
            move |config, context| Ok(Wrapper::Geometry(Geometry::from_config(kind, config, context)?)),
        )
    }

    fn handles(kind: Kind, config: &ConfigMap) -> bool {
        let payload = match kind {
            Kind::GeometryCollection => "geometries",
            _ => "coordinates",
        };
        type_is(config, kind.name()) && config.contains_key(payload)
    }

    fn from_config(kind: Kind, config: ConfigMap, context: &Context) -> Result<Geometry> {
        let projection = get_str(&config, "projection")?;

        // Decode everything before the engine sees the geometry
        let geometry = match kind {
            Kind::GeometryCollection => {
                let members = require_array(&config, "geometries")?
                    .iter()
                    .map(|m| {
                        let member = context.create_as::<Geometry>(m)?;
                        Ok(member.geometry.geometry().clone())
                    })
                    .collect::<Result<Vec<_>>>()?;
                GeoGeometry::GeometryCollection(GeometryCollection(members))
            }
            _ => match config.get("coordinates") {
                Some(coordinates) => geo_geometry(kind, coordinates)?,
                None => Err(ErrorKind::invalid("coordinates", "coordinates must be present"))?,
            },
        };

        let mut geometry = context.engine().create_geometry(geometry)?;
        geometry.set_srs(projection);
        Ok(Geometry::from_(context, geometry))
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn engine_geometry(&self) -> &EngineGeometry {
        &self.geometry
    }

    pub fn geo(&self) -> &GeoGeometry<f64> {
        self.geometry.geometry()
    }

    /// GeoJSON style coordinates, or the member configurations of a collection
    pub fn coordinates(&self) -> Value {
        let mut config = encode(self.geo());
        config
            .remove("coordinates")
            .or_else(|| config.remove("geometries"))
            .unwrap_or(Value::Null)
    }

    pub fn projection(&self) -> Option<&str> {
        self.geometry.srs()
    }

    pub fn set_projection(&mut self, projection: Option<&str>) {
        self.geometry.set_srs(projection);
        // derived values carry the projection
        self.cache = LazyCache::default();
    }

    pub fn length(&self) -> f64 {
        self.geometry.length()
    }

    pub fn area(&self) -> f64 {
        self.geometry.area()
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }

    /// None for empty geometries
    pub fn bounds(&self) -> Option<Rc<Bounds>> {
        if let Some(bounds) = self.cache.get::<Bounds>("bounds") {
            return Some(bounds);
        }
        let envelope = self.geometry.envelope()?;
        Some(self.cache.get_or_init("bounds", || {
            Bounds::from_envelope(envelope, self.projection())
        }))
    }

    /// None for empty geometries
    pub fn centroid(&self) -> Option<Rc<Geometry>> {
        if let Some(centroid) = self.cache.get::<Geometry>("centroid") {
            return Some(centroid);
        }
        let centroid = self.geometry.centroid()?;
        Some(self.cache.get_or_init("centroid", || {
            Geometry::from_(&self.context, centroid)
        }))
    }

    pub fn config(&self) -> ConfigMap {
        let mut config = encode(self.geo());
        if let Some(projection) = self.projection() {
            config.insert("projection".to_string(), Value::from(projection));
        }
        config
    }

    /// Is `config` something the geometry factories accept
    pub(crate) fn is_geometry_config(config: &Value) -> Option<Kind> {
        let config = match config {
            Value::Object(_) => normalize(config),
            _ => return None,
        };
        crate::factory::GEOMETRY_KINDS
            .iter()
            .find(|kind| Geometry::handles(**kind, &config))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::counting_context;
    use serde_json::json;

    fn square(context: &Context) -> Geometry {
        Geometry::new(
            context,
            &json!({
                "type": "Polygon",
                "coordinates": [[[0, 0], [0, 2], [2, 2], [2, 0], [0, 0]]],
                "projection": "EPSG:3857"
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_polygon() {
        let geom = square(&Context::default());

        assert_eq!(geom.kind(), Kind::Polygon);
        assert_eq!(geom.area(), 4.0);
        assert_eq!(geom.length(), 8.0);
        assert_eq!(geom.projection(), Some("EPSG:3857"));
        assert!(!geom.is_empty());
    }

    #[test]
    fn test_bounds_and_centroid_are_cached() {
        let geom = square(&Context::default());

        let bounds = geom.bounds().unwrap();
        assert_eq!(bounds.width(), 2.0);
        assert_eq!(bounds.projection.as_deref(), Some("EPSG:3857"));
        assert!(Rc::ptr_eq(&bounds, &geom.bounds().unwrap()));

        let centroid = geom.centroid().unwrap();
        assert_eq!(centroid.kind(), Kind::Point);
        assert_eq!(centroid.coordinates(), json!([1.0, 1.0]));
        assert!(Rc::ptr_eq(&centroid, &geom.centroid().unwrap()));

        // a clone computes its own
        let cloned = geom.clone();
        assert!(!Rc::ptr_eq(&bounds, &cloned.bounds().unwrap()));
    }

    #[test]
    fn test_set_projection() {
        let mut geom = square(&Context::default());
        assert_eq!(geom.bounds().unwrap().projection.as_deref(), Some("EPSG:3857"));

        geom.set_projection(Some("EPSG:4326"));
        assert_eq!(geom.bounds().unwrap().projection.as_deref(), Some("EPSG:4326"));
        assert_eq!(geom.config()["projection"], json!("EPSG:4326"));

        geom.set_projection(None);
        assert!(!geom.config().contains_key("projection"));
    }

    #[test]
    fn test_empty_geometries() {
        let context = Context::default();
        let empty = Geometry::new(&context, &json!({"type": "MultiPoint", "coordinates": []})).unwrap();
        assert!(empty.is_empty());
        assert!(empty.bounds().is_none());
        assert!(empty.centroid().is_none());

        let collection =
            Geometry::new(&context, &json!({"type": "GeometryCollection", "geometries": []})).unwrap();
        assert_eq!(collection.kind(), Kind::GeometryCollection);
        assert!(collection.is_empty());
    }

    #[test]
    fn test_collection() {
        let context = Context::default();
        let geom = Geometry::new(
            &context,
            &json!({
                "type": "GeometryCollection",
                "geometries": [
                    {"type": "Point", "coordinates": [4, 5]},
                    {"type": "LineString", "coordinates": [[0, 0], [3, 4]]}
                ]
            }),
        )
        .unwrap();

        assert_eq!(geom.length(), 5.0);
        assert_eq!(
            geom.coordinates(),
            json!([
                {"type": "Point", "coordinates": [4.0, 5.0]},
                {"type": "LineString", "coordinates": [[0.0, 0.0], [3.0, 4.0]]}
            ])
        );
        let bounds = geom.bounds().unwrap();
        assert_eq!((bounds.max_x, bounds.max_y), (4.0, 5.0));
    }

    #[test]
    fn test_invalid_coordinates_fail_before_engine() {
        let (engine, context) = counting_context();

        let cases = vec![
            json!({"type": "Point", "coordinates": [1]}),
            json!({"type": "Point", "coordinates": [1, 2, 3]}),
            json!({"type": "Point", "coordinates": "here"}),
            json!({"type": "LineString", "coordinates": [1, 2]}),
            json!({"type": "GeometryCollection", "geometries": {"type": "Point"}}),
        ];
        for config in cases {
            let err = context.create(&config).unwrap_err();
            assert!(
                matches!(
                    err.downcast_ref::<ErrorKind>(),
                    Some(ErrorKind::InvalidConfiguration { .. })
                ),
                "{} gave {}",
                config,
                err
            );
        }

        let err = context
            .create(&json!({"type": "Point", "coordinates": [1, 2], "projection": 4326}))
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ErrorKind>(),
            Some(&ErrorKind::TypeMismatch {
                property: "projection".to_string(),
                expected: "string",
                found: "number"
            })
        );
        assert_eq!(engine.calls(), 0);

        // the engine rejects what only it can check
        let err = context
            .create(&json!({"type": "LineString", "coordinates": [[1, 2]]}))
            .unwrap_err();
        assert!(err.downcast_ref::<feature_engine::EngineError>().is_some());
    }

    #[test]
    fn test_from_geo() {
        let context = Context::default();
        let line = GeoGeometry::LineString(LineString::from(vec![(0.0, 0.0), (0.0, 3.0)]));
        let geom = Geometry::from_geo(&context, line).unwrap();

        assert_eq!(geom.kind(), Kind::LineString);
        assert_eq!(geom.length(), 3.0);
        assert_eq!(geom.area(), 0.0);
    }

    #[test]
    fn test_is_geometry_config() {
        assert_eq!(
            Geometry::is_geometry_config(&json!({"type": "point", "coordinates": [0, 0]})),
            Some(Kind::Point)
        );
        assert_eq!(Geometry::is_geometry_config(&json!({"type": "Point"})), None);
        assert_eq!(Geometry::is_geometry_config(&json!("Point")), None);
    }

    #[test]
    fn test_config_round_trip() {
        let context = Context::default();
        let configs = vec![
            json!({"type": "Point", "coordinates": [1.5, -2.0], "projection": "EPSG:4326"}),
            json!({"type": "MultiLineString", "coordinates": [[[0, 0], [1, 1]], [[2, 2], [3, 3]]]}),
            json!({"type": "MultiPolygon", "coordinates": [
                [[[0, 0], [0, 1], [1, 1], [0, 0]]],
                [[[5, 5], [5, 9], [9, 9], [9, 5], [5, 5]], [[6, 6], [6, 7], [7, 7], [6, 6]]]
            ]}),
            json!({"type": "Polygon", "coordinates": []}),
        ];

        for config in configs {
            let geom = Geometry::new(&context, &config).unwrap();
            let again = Geometry::new(&context, &Value::Object(geom.config())).unwrap();
            assert_eq!(again.config(), geom.config());
            assert_eq!(again.engine_geometry(), geom.engine_geometry());
        }
    }
}
