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
use std::fmt;
use std::rc::Rc;

use anyhow::Result;
use log::debug;

use crate::errors::EngineError;

/// Value type an attribute is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    String,
    Integer,
    Long,
    Double,
    Boolean,
    Date,
    Geometry,
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

const ALL_BINDINGS: [Binding; 14] = [
    Binding::String,
    Binding::Integer,
    Binding::Long,
    Binding::Double,
    Binding::Boolean,
    Binding::Date,
    Binding::Geometry,
    Binding::Point,
    Binding::LineString,
    Binding::Polygon,
    Binding::MultiPoint,
    Binding::MultiLineString,
    Binding::MultiPolygon,
    Binding::GeometryCollection,
];

impl Binding {
    pub fn name(&self) -> &'static str {
        match self {
            Binding::String => "String",
            Binding::Integer => "Integer",
            Binding::Long => "Long",
            Binding::Double => "Double",
            Binding::Boolean => "Boolean",
            Binding::Date => "Date",
            Binding::Geometry => "Geometry",
            Binding::Point => "Point",
            Binding::LineString => "LineString",
            Binding::Polygon => "Polygon",
            Binding::MultiPoint => "MultiPoint",
            Binding::MultiLineString => "MultiLineString",
            Binding::MultiPolygon => "MultiPolygon",
            Binding::GeometryCollection => "GeometryCollection",
        }
    }

    /// Case insensitive lookup by name.
    pub fn from_name(name: &str) -> Result<Binding> {
        match ALL_BINDINGS.iter().find(|b| b.name().eq_ignore_ascii_case(name)) {
            Some(binding) => Ok(*binding),
            None => Err(EngineError::UnknownBinding(name.to_string()))?,
        }
    }

    pub fn is_geometry(&self) -> bool {
        !matches!(
            self,
            Binding::String
                | Binding::Integer
                | Binding::Long
                | Binding::Double
                | Binding::Boolean
                | Binding::Date
        )
    }

    /// Can a geometry named `geometry_name` (e.g. "Point") be stored under this binding.
    pub fn accepts_geometry(&self, geometry_name: &str) -> bool {
        match self {
            Binding::Geometry => true,
            b if b.is_geometry() => b.name() == geometry_name,
            _ => false,
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Describes one attribute of a feature type.  Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDescriptor {
    local_name: String,
    binding: Binding,
    crs: Option<String>,
    description: Option<String>,
    nillable: bool,
}

impl AttributeDescriptor {
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn binding(&self) -> Binding {
        self.binding
    }

    pub fn crs(&self) -> Option<&str> {
        self.crs.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_nillable(&self) -> bool {
        self.nillable
    }
}

#[derive(Debug)]
pub struct AttributeTypeBuilder {
    name: Option<String>,
    binding: Option<Binding>,
    crs: Option<String>,
    description: Option<String>,
    nillable: bool,
}

impl Default for AttributeTypeBuilder {
    fn default() -> Self {
        AttributeTypeBuilder {
            name: None,
            binding: None,
            crs: None,
            description: None,
            nillable: true,
        }
    }
}

impl AttributeTypeBuilder {
    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn set_binding(&mut self, binding: Binding) -> &mut Self {
        self.binding = Some(binding);
        self
    }

    pub fn set_crs(&mut self, crs: &str) -> &mut Self {
        self.crs = Some(crs.to_string());
        self
    }

    pub fn set_description(&mut self, description: &str) -> &mut Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn set_nillable(&mut self, nillable: bool) -> &mut Self {
        self.nillable = nillable;
        self
    }

    pub fn build_descriptor(&self) -> Result<Rc<AttributeDescriptor>> {
        let local_name = match &self.name {
            Some(name) => name.clone(),
            None => Err(EngineError::MissingProperty {
                property: "name",
                method_name: "build_descriptor",
            })?,
        };
        let binding = match self.binding {
            Some(binding) => binding,
            None => Err(EngineError::MissingProperty {
                property: "binding",
                method_name: "build_descriptor",
            })?,
        };

        Ok(Rc::new(AttributeDescriptor {
            local_name,
            binding,
            crs: self.crs.clone(),
            description: self.description.clone(),
            nillable: self.nillable,
        }))
    }
}

/// Ordered attribute descriptors under a type name.
#[derive(Debug, PartialEq)]
pub struct FeatureType {
    name: String,
    descriptors: Vec<Rc<AttributeDescriptor>>,
}

impl FeatureType {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptors(&self) -> &[Rc<AttributeDescriptor>] {
        &self.descriptors
    }

    pub fn attribute_count(&self) -> usize {
        self.descriptors.len()
    }

    pub fn index_of(&self, local_name: &str) -> Option<usize> {
        self.descriptors
            .iter()
            .position(|d| d.local_name() == local_name)
    }

    pub fn descriptor(&self, local_name: &str) -> Option<&Rc<AttributeDescriptor>> {
        self.index_of(local_name).map(|idx| &self.descriptors[idx])
    }

    /// The first geometry bound attribute
    pub fn geometry_descriptor(&self) -> Option<&Rc<AttributeDescriptor>> {
        self.descriptors.iter().find(|d| d.binding().is_geometry())
    }
}

pub const DEFAULT_FEATURE_TYPE_NAME: &str = "feature";

#[derive(Debug)]
pub struct FeatureTypeBuilder {
    name: String,
    descriptors: Vec<Rc<AttributeDescriptor>>,
}

impl Default for FeatureTypeBuilder {
    fn default() -> Self {
        FeatureTypeBuilder {
            name: DEFAULT_FEATURE_TYPE_NAME.to_string(),
            descriptors: Vec::new(),
        }
    }
}

impl FeatureTypeBuilder {
    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.name = name.to_string();
        self
    }

    pub fn add(&mut self, descriptor: Rc<AttributeDescriptor>) -> &mut Self {
        self.descriptors.push(descriptor);
        self
    }

    pub fn build(self) -> Result<Rc<FeatureType>> {
        for (idx, descriptor) in self.descriptors.iter().enumerate() {
            let name = descriptor.local_name();
            if self.descriptors[..idx]
                .iter()
                .any(|d| d.local_name() == name)
            {
                Err(EngineError::DuplicateAttribute {
                    name: name.to_string(),
                    type_name: self.name.clone(),
                })?;
            }
        }

        debug!(
            "Built feature type {} with {} attributes",
            self.name,
            self.descriptors.len()
        );

        Ok(Rc::new(FeatureType {
            name: self.name,
            descriptors: self.descriptors,
        }))
    }
}
