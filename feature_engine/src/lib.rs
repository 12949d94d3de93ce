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
//! Feature engine.
//!
//! The engine owns the objects the geoscript layer adapts: feature types and
//! their attribute descriptors, geometries (backed by `geo-types`), simple
//! features and style symbols. Callers reach it through the [`Engine`] trait.
//!

pub use crate::engine::{Engine, MemoryEngine};
pub use crate::errors::EngineError;
pub use crate::feature::{AttributeValue, SimpleFeature};
pub use crate::feature_type::{
    AttributeDescriptor, AttributeTypeBuilder, Binding, FeatureType, FeatureTypeBuilder,
};
pub use crate::geometry::{EngineGeometry, Envelope};
pub use crate::style::{Color, FillSymbol, Mark, StrokeSymbol};

mod engine;
pub mod errors;
mod feature;
mod feature_type;
mod geometry;
mod style;
