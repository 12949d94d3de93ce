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
//! Geometry wrappers.
//!
//! Geometries are configured the GeoJSON way, `{type, coordinates}` or
//! `{type: "GeometryCollection", geometries}`, with an optional `projection`.
//!

pub use crate::geom::bounds::Bounds;
pub use crate::geom::geometry::Geometry;

mod bounds;
#[allow(clippy::module_inception)]
mod geometry;
