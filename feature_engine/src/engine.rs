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
use geo_types::Geometry;

use crate::feature::SimpleFeature;
use crate::feature_type::{AttributeTypeBuilder, FeatureType, FeatureTypeBuilder};
use crate::geometry::EngineGeometry;
use crate::style::{Color, FillSymbol, Mark, StrokeSymbol};

/// Everything the wrapper layer asks of the engine goes through here.
pub trait Engine {
    fn feature_type_builder(&self) -> FeatureTypeBuilder;

    fn attribute_builder(&self) -> AttributeTypeBuilder;

    fn create_geometry(&self, geometry: Geometry<f64>) -> Result<EngineGeometry>;

    fn create_feature(&self, feature_type: &Rc<FeatureType>) -> SimpleFeature;

    fn create_fill(&self, color: Color, opacity: f64) -> FillSymbol;

    fn create_stroke(&self, color: Color, width: f64, opacity: f64) -> StrokeSymbol;

    fn create_mark(&self, well_known_name: &str, size: f64) -> Mark;
}

/// Engine keeping everything in process memory
#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryEngine;

impl Engine for MemoryEngine {
    fn feature_type_builder(&self) -> FeatureTypeBuilder {
        FeatureTypeBuilder::default()
    }

    fn attribute_builder(&self) -> AttributeTypeBuilder {
        AttributeTypeBuilder::default()
    }

    fn create_geometry(&self, geometry: Geometry<f64>) -> Result<EngineGeometry> {
        EngineGeometry::new(geometry)
    }

    fn create_feature(&self, feature_type: &Rc<FeatureType>) -> SimpleFeature {
        SimpleFeature::new(feature_type.clone())
    }

    fn create_fill(&self, color: Color, opacity: f64) -> FillSymbol {
        FillSymbol { color, opacity }
    }

    fn create_stroke(&self, color: Color, width: f64, opacity: f64) -> StrokeSymbol {
        StrokeSymbol {
            color,
            width,
            opacity,
        }
    }

    fn create_mark(&self, well_known_name: &str, size: f64) -> Mark {
        Mark {
            well_known_name: well_known_name.to_string(),
            size,
            fill: None,
            stroke: None,
        }
    }
}
