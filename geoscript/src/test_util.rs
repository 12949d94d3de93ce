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
use std::cell::Cell;
use std::rc::Rc;

use anyhow::Result;
use feature_engine::{
    AttributeTypeBuilder, Color, Engine, EngineGeometry, FeatureType, FeatureTypeBuilder,
    FillSymbol, Mark, MemoryEngine, SimpleFeature, StrokeSymbol,
};
use geo_types::Geometry;

use crate::factory::Context;

/// Memory engine that counts how often it is called
#[derive(Debug, Default)]
pub struct CountingEngine {
    inner: MemoryEngine,
    calls: Cell<usize>,
}

impl CountingEngine {
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    fn tick(&self) {
        self.calls.set(self.calls.get() + 1);
    }
}

impl Engine for CountingEngine {
    fn feature_type_builder(&self) -> FeatureTypeBuilder {
        self.tick();
        self.inner.feature_type_builder()
    }

    fn attribute_builder(&self) -> AttributeTypeBuilder {
        self.tick();
        self.inner.attribute_builder()
    }

    fn create_geometry(&self, geometry: Geometry<f64>) -> Result<EngineGeometry> {
        self.tick();
        self.inner.create_geometry(geometry)
    }

    fn create_feature(&self, feature_type: &Rc<FeatureType>) -> SimpleFeature {
        self.tick();
        self.inner.create_feature(feature_type)
    }

    fn create_fill(&self, color: Color, opacity: f64) -> FillSymbol {
        self.tick();
        self.inner.create_fill(color, opacity)
    }

    fn create_stroke(&self, color: Color, width: f64, opacity: f64) -> StrokeSymbol {
        self.tick();
        self.inner.create_stroke(color, width, opacity)
    }

    fn create_mark(&self, well_known_name: &str, size: f64) -> Mark {
        self.tick();
        self.inner.create_mark(well_known_name, size)
    }
}

/// A default context over a counting engine
pub fn counting_context() -> (Rc<CountingEngine>, Context) {
    let engine = Rc::new(CountingEngine::default());
    let context = Context::new(engine.clone());
    (engine, context)
}
