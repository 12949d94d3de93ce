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
use serde_json::Value;

use crate::config::{discriminator, require_array, type_is, ConfigMap};
use crate::errors::ErrorKind;
use crate::factory::{Context, FromConfig, Kind};
use crate::style::Symbolizer;

/// Several symbolizers applied in order
#[derive(Debug, Clone, Default)]
pub struct Composite {
    parts: Vec<Symbolizer>,
}

impl Composite {
    pub fn new(parts: Vec<Symbolizer>) -> Composite {
        Composite { parts }
    }

    pub fn parts(&self) -> &[Symbolizer] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Appends a part.  Nested composites are flattened.
    pub fn add(&mut self, part: Symbolizer) {
        match part {
            Symbolizer::Composite(nested) => self.parts.extend(nested.parts),
            other => self.parts.push(other),
        }
    }

    /// A composite has no properties of its own
    pub fn set(&mut self, property: &str, _value: &Value) -> Result<()> {
        Err(ErrorKind::invalid(
            property,
            "a Composite has no properties, set it on one of its parts",
        )
        .into())
    }

    pub fn config(&self) -> ConfigMap {
        let parts = self.parts.iter().map(|p| Value::Object(p.config())).collect();

        let mut config = ConfigMap::new();
        config.insert("type".to_string(), Value::from(Kind::Composite.name()));
        config.insert("parts".to_string(), Value::Array(parts));
        config
    }
}

impl FromConfig for Composite {
    const KIND: Kind = Kind::Composite;

    fn handles(config: &ConfigMap) -> bool {
        match discriminator(config) {
            Some(_) => type_is(config, Kind::Composite.name()),
            None => matches!(config.get("parts"), Some(Value::Array(_))),
        }
    }

    fn from_config(config: ConfigMap, context: &Context) -> Result<Composite> {
        let mut composite = Composite::default();
        for part in require_array(&config, "parts")? {
            composite.add(context.create_as::<Symbolizer>(part)?);
        }
        Ok(composite)
    }
}
