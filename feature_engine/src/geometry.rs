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
use anyhow::Result;
use geo::{Area, BoundingRect, Centroid, EuclideanLength, HasDimensions};
use geo_types::{Geometry, LineString, Polygon};

use crate::errors::EngineError;

/// Axis aligned extent of a geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// Engine geometry.  Owns a `geo-types` geometry plus the identifier of its
/// spatial reference system, which the engine carries but never interprets.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineGeometry {
    geometry: Geometry<f64>,
    srs: Option<String>,
}

fn invalid(msg: String) -> EngineError {
    EngineError::InvalidGeometry {
        method_name: "create_geometry",
        msg,
    }
}

fn validate_line_string(line_string: &LineString<f64>) -> Result<()> {
    let n = line_string.0.len();
    if n == 1 {
        Err(invalid(format!("line string needs at least 2 positions, got {}", n)))?;
    }
    Ok(())
}

fn validate_polygon(polygon: &Polygon<f64>) -> Result<()> {
    // geo-types closes rings on construction, so only the position count is left to check
    for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
        let n = ring.0.len();
        if n != 0 && n < 4 {
            Err(invalid(format!("polygon ring needs at least 4 positions, got {}", n)))?;
        }
    }
    if polygon.exterior().0.is_empty() && !polygon.interiors().is_empty() {
        Err(invalid("polygon has holes but no shell".to_string()))?;
    }
    Ok(())
}

fn validate(geometry: &Geometry<f64>) -> Result<()> {
    match geometry {
        Geometry::LineString(ls) => validate_line_string(ls),
        Geometry::MultiLineString(mls) => mls.0.iter().try_for_each(validate_line_string),
        Geometry::Polygon(p) => validate_polygon(p),
        Geometry::MultiPolygon(mp) => mp.0.iter().try_for_each(validate_polygon),
        Geometry::GeometryCollection(gc) => gc.0.iter().try_for_each(validate),
        _ => Ok(()),
    }
}

fn perimeter(polygon: &Polygon<f64>) -> f64 {
    polygon.exterior().euclidean_length()
        + polygon
            .interiors()
            .iter()
            .map(|ring| ring.euclidean_length())
            .sum::<f64>()
}

fn length_of(geometry: &Geometry<f64>) -> f64 {
    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => 0.0,
        Geometry::Line(l) => l.euclidean_length(),
        Geometry::LineString(ls) => ls.euclidean_length(),
        Geometry::MultiLineString(mls) => mls.euclidean_length(),
        Geometry::Polygon(p) => perimeter(p),
        Geometry::MultiPolygon(mp) => mp.0.iter().map(perimeter).sum(),
        Geometry::Rect(r) => perimeter(&r.to_polygon()),
        Geometry::Triangle(t) => perimeter(&t.to_polygon()),
        Geometry::GeometryCollection(gc) => gc.0.iter().map(length_of).sum(),
    }
}

pub(crate) fn geometry_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) | Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
    }
}

impl EngineGeometry {
    pub fn new(geometry: Geometry<f64>) -> Result<EngineGeometry> {
        validate(&geometry)?;
        Ok(EngineGeometry {
            geometry,
            srs: None,
        })
    }

    pub fn geometry(&self) -> &Geometry<f64> {
        &self.geometry
    }

    pub fn geometry_name(&self) -> &'static str {
        geometry_name(&self.geometry)
    }

    pub fn srs(&self) -> Option<&str> {
        self.srs.as_deref()
    }

    pub fn set_srs(&mut self, srs: Option<&str>) {
        self.srs = srs.map(str::to_string);
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }

    /// Length of lines, perimeter of polygons, 0 for points
    pub fn length(&self) -> f64 {
        length_of(&self.geometry)
    }

    pub fn area(&self) -> f64 {
        self.geometry.unsigned_area()
    }

    pub fn envelope(&self) -> Option<Envelope> {
        self.geometry.bounding_rect().map(|rect| Envelope {
            min_x: rect.min().x,
            min_y: rect.min().y,
            max_x: rect.max().x,
            max_y: rect.max().y,
        })
    }

    /// Centroid in the same spatial reference system.  None for empty geometries.
    pub fn centroid(&self) -> Option<EngineGeometry> {
        self.geometry.centroid().map(|pt| EngineGeometry {
            geometry: Geometry::Point(pt),
            srs: self.srs.clone(),
        })
    }
}
