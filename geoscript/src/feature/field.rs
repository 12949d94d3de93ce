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
use feature_engine::{AttributeDescriptor, Binding};
use serde_json::Value;

use crate::config::{get_str, require_str, ConfigMap};
use crate::errors::ErrorKind;
use crate::factory::{Context, FromConfig, Kind};

/// A field of a schema.  Wraps an engine attribute descriptor, which is
/// shared with the feature type it belongs to.
#[derive(Debug, Clone)]
pub struct Field {
    descriptor: Rc<AttributeDescriptor>,
}

impl Field {
    pub fn new(context: &Context, name: &str, binding: Binding) -> Result<Field> {
        let mut builder = context.engine().attribute_builder();
        builder.set_name(name).set_binding(binding);
        Ok(Field::from_(builder.build_descriptor()?))
    }

    /// Wraps an existing descriptor as is
    pub fn from_(descriptor: Rc<AttributeDescriptor>) -> Field {
        Field { descriptor }
    }

    pub fn descriptor(&self) -> &Rc<AttributeDescriptor> {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        self.descriptor.local_name()
    }

    /// Binding name, e.g. "String" or "Point"
    pub fn field_type(&self) -> &'static str {
        self.descriptor.binding().name()
    }

    pub fn binding(&self) -> Binding {
        self.descriptor.binding()
    }

    pub fn projection(&self) -> Option<&str> {
        self.descriptor.crs()
    }

    pub fn description(&self) -> Option<&str> {
        self.descriptor.description()
    }

    pub fn is_geometry(&self) -> bool {
        self.descriptor.binding().is_geometry()
    }

    pub fn config(&self) -> ConfigMap {
        let mut config = ConfigMap::new();
        config.insert("name".to_string(), Value::from(self.name()));
        config.insert("type".to_string(), Value::from(self.field_type()));
        if let Some(projection) = self.projection() {
            config.insert("projection".to_string(), Value::from(projection));
        }
        if let Some(description) = self.description() {
            config.insert("description".to_string(), Value::from(description));
        }
        config
    }
}

/// Checks a field configuration without involving the engine.
/// Returns the field name.
pub(crate) fn check_field_config<'a>(property: &str, config: &'a Value) -> Result<&'a str> {
    let config = match config {
        Value::Object(map) => map,
        _ => Err(ErrorKind::invalid(property, "a field must be an object with a name and a type"))?,
    };

    let name = match config.get("name") {
        Some(Value::String(name)) => name,
        _ => Err(ErrorKind::invalid(property, "a field needs a string 'name'"))?,
    };
    match config.get("type").and_then(Value::as_str) {
        Some(t) if Binding::from_name(t).is_ok() => Ok(name),
        Some(t) => Err(ErrorKind::invalid(property, format!("unknown field type '{}'", t)).into()),
        None => Err(ErrorKind::invalid(property, "a field needs a string 'type'").into()),
    }
}

impl FromConfig for Field {
    const KIND: Kind = Kind::Field;

    fn handles(config: &ConfigMap) -> bool {
        let has_name = matches!(config.get("name"), Some(Value::String(_)));
        let known_type = config
            .get("type")
            .and_then(Value::as_str)
            .map_or(false, |t| Binding::from_name(t).is_ok());

        has_name && known_type && !config.contains_key("coordinates") && !config.contains_key("fields")
    }

    fn from_config(config: ConfigMap, context: &Context) -> Result<Field> {
        let name = require_str(&config, "name")?;
        let type_name = require_str(&config, "type")?;
        let binding = match Binding::from_name(type_name) {
            Ok(b) => b,
            Err(_) => Err(ErrorKind::invalid(
                "type",
                format!("unknown type '{}' for field '{}'", type_name, name),
            ))?,
        };
        let projection = get_str(&config, "projection")?;
        let description = get_str(&config, "description")?;

        let mut builder = context.engine().attribute_builder();
        builder.set_name(name).set_binding(binding);
        if let Some(projection) = projection {
            builder.set_crs(projection);
        }
        if let Some(description) = description {
            builder.set_description(description);
        }

        Ok(Field::from_(builder.build_descriptor()?))
    }
}
