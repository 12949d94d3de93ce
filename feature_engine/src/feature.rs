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
use chrono::NaiveDate;

use crate::errors::EngineError;
use crate::feature_type::{Binding, FeatureType};
use crate::geometry::EngineGeometry;

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Null,
    String(String),
    Integer(i32),
    Long(i64),
    Double(f64),
    Boolean(bool),
    Date(NaiveDate),
    Geometry(EngineGeometry),
}

impl AttributeValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            AttributeValue::Null => "Null",
            AttributeValue::String(_) => "String",
            AttributeValue::Integer(_) => "Integer",
            AttributeValue::Long(_) => "Long",
            AttributeValue::Double(_) => "Double",
            AttributeValue::Boolean(_) => "Boolean",
            AttributeValue::Date(_) => "Date",
            AttributeValue::Geometry(g) => g.geometry_name(),
        }
    }

    /// Null fits every binding, nillability is checked by the feature
    pub fn fits(&self, binding: Binding) -> bool {
        match self {
            AttributeValue::Null => true,
            AttributeValue::Geometry(g) => binding.accepts_geometry(g.geometry_name()),
            other => other.kind_name() == binding.name(),
        }
    }
}

/// A feature of a given feature type.  Values are stored by attribute index.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleFeature {
    feature_type: Rc<FeatureType>,
    id: Option<String>,
    values: Vec<AttributeValue>,
}

impl SimpleFeature {
    pub fn new(feature_type: Rc<FeatureType>) -> SimpleFeature {
        let values = vec![AttributeValue::Null; feature_type.attribute_count()];
        SimpleFeature {
            feature_type,
            id: None,
            values,
        }
    }

    pub fn feature_type(&self) -> &Rc<FeatureType> {
        &self.feature_type
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: Option<&str>) {
        self.id = id.map(str::to_string);
    }

    pub fn values(&self) -> &[AttributeValue] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&AttributeValue> {
        self.values.get(index)
    }

    pub fn get_by_name(&self, local_name: &str) -> Option<&AttributeValue> {
        self.feature_type
            .index_of(local_name)
            .and_then(|idx| self.values.get(idx))
    }

    pub fn set(&mut self, index: usize, value: AttributeValue) -> Result<()> {
        let descriptor = match self.feature_type.descriptors().get(index) {
            Some(d) => d,
            None => Err(EngineError::InvalidAttributeIndex {
                index,
                method_name: "SimpleFeature::set",
            })?,
        };

        if value == AttributeValue::Null && !descriptor.is_nillable() {
            Err(EngineError::NotNillable {
                name: descriptor.local_name().to_string(),
            })?;
        }

        if !value.fits(descriptor.binding()) {
            Err(EngineError::IncompatibleValue {
                name: descriptor.local_name().to_string(),
                binding: descriptor.binding().name(),
                found: value.kind_name(),
            })?;
        }

        self.values[index] = value;
        Ok(())
    }

    /// Value of the default geometry attribute, if there is one and it is set
    pub fn default_geometry(&self) -> Option<&EngineGeometry> {
        let idx = self
            .feature_type
            .descriptors()
            .iter()
            .position(|d| d.binding().is_geometry())?;
        match &self.values[idx] {
            AttributeValue::Geometry(g) => Some(g),
            _ => None,
        }
    }
}
