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
//! GeoScript binding layer.
//!
//! Turns loosely typed configuration (JSON or TOML values) into wrappers over
//! a feature engine: schemas and fields, geometries, features, layers and
//! symbolizers.  Which wrapper a configuration becomes is decided by the
//! factories of a [`Registry`]; every wrapper can describe itself again as a
//! configuration that builds an equivalent wrapper.
//!

pub use crate::factory::{Capability, Context, Factory, FromConfig, Kind, Registry, Wrapper};
pub use crate::layer::Layer;

mod cache;
pub mod config;
pub mod errors;
mod factory;
pub mod feature;
pub mod geom;
mod layer;
pub mod style;

#[cfg(test)]
mod test_util;
