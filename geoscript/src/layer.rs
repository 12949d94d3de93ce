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
use log::debug;
use serde_json::Value;

use crate::config::{get_str, json_kind, type_is, ConfigMap};
use crate::errors::ErrorKind;
use crate::factory::{Context, FromConfig, Kind};
use crate::feature::{Feature, Schema};
use crate::geom::Bounds;

/// In memory layer: a schema and the features added to it, in order
#[derive(Debug, Clone)]
pub struct Layer {
    name: String,
    schema: Schema,
    features: Vec<Feature>,
}

impl Layer {
    pub fn new(context: &Context, config: &Value) -> Result<Layer> {
        context.create_as::<Layer>(config)
    }

    /// Empty layer over an existing schema.  Named after the schema by default.
    pub fn with_schema(name: Option<&str>, schema: Schema) -> Layer {
        Layer {
            name: name.unwrap_or_else(|| schema.name()).to_string(),
            schema,
            features: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn count(&self) -> usize {
        self.features.len()
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Adds a feature given as a feature configuration (`{id?, properties}`)
    /// or as a bare properties object.  Values are checked against the schema.
    pub fn add(&mut self, value: &Value) -> Result<&Feature> {
        let config = match value {
            Value::Object(config) => config,
            other => Err(ErrorKind::TypeMismatch {
                property: "feature".to_string(),
                expected: "object",
                found: json_kind(other),
            })?,
        };
        let feature = match config.get("properties") {
            Some(Value::Object(properties)) => {
                Feature::with_schema(&self.schema, get_str(&config, "id")?, properties)?
            }
            Some(other) => Err(ErrorKind::TypeMismatch {
                property: "properties".to_string(),
                expected: "object",
                found: json_kind(other),
            })?,
            None => Feature::with_schema(&self.schema, None, config)?,
        };

        debug!("Adding feature {} to layer {}", self.features.len(), self.name);
        self.features.push(feature);
        Ok(&self.features[self.features.len() - 1])
    }

    /// Union of the bounds of all feature geometries, None when there are none
    pub fn bounds(&self) -> Option<Bounds> {
        self.features
            .iter()
            .filter_map(|f| f.geometry()?.bounds())
            .fold(None, |acc: Option<Bounds>, b| match acc {
                Some(acc) => Some(acc.include(&b)),
                None => Some(b.as_ref().clone()),
            })
    }

    /// Name and schema.  Features are data and not part of the configuration.
    pub fn config(&self) -> ConfigMap {
        let mut config = ConfigMap::new();
        config.insert("type".to_string(), Value::from(Kind::Layer.name()));
        config.insert("name".to_string(), Value::from(self.name.as_str()));
        config.insert("schema".to_string(), Value::Object(self.schema.config()));
        config
    }
}

impl FromConfig for Layer {
    const KIND: Kind = Kind::Layer;

    fn handles(config: &ConfigMap) -> bool {
        type_is(config, Kind::Layer.name())
    }

    fn from_config(config: ConfigMap, context: &Context) -> Result<Layer> {
        let name = get_str(&config, "name")?;

        let schema = match (config.get("schema"), config.get("fields")) {
            (Some(schema), _) => context.create_as::<Schema>(schema)?,
            (None, Some(fields)) => {
                let mut schema = ConfigMap::new();
                schema.insert("type".to_string(), Value::from(Kind::Schema.name()));
                if let Some(name) = name {
                    schema.insert("name".to_string(), Value::from(name));
                }
                schema.insert("fields".to_string(), fields.clone());
                context.create_from_map::<Schema>(schema)?
            }
            (None, None) => Err(ErrorKind::invalid(
                "schema",
                "a layer needs a 'schema' or 'fields'",
            ))?,
        };

        Ok(Layer::with_schema(name, schema))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cities(context: &Context) -> Layer {
        Layer::new(
            context,
            &json!({
                "type": "Layer",
                "name": "cities",
                "fields": [
                    {"name": "geom", "type": "Point"},
                    {"name": "name", "type": "String"}
                ]
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_add_and_bounds() {
        let mut layer = cities(&Context::default());
        assert_eq!(layer.name(), "cities");
        assert_eq!(layer.schema().name(), "cities");
        assert!(layer.bounds().is_none());

        layer
            .add(&json!({"geom": {"type": "Point", "coordinates": [7, 46]}, "name": "Bern"}))
            .unwrap();
        let added = layer
            .add(&json!({
                "id": "zh",
                "properties": {"geom": {"type": "Point", "coordinates": [8.5, 47.5]}, "name": "Zurich"}
            }))
            .unwrap();
        assert_eq!(added.id(), Some("zh"));
        layer.add(&json!({"name": "Nowhere"})).unwrap();

        assert_eq!(layer.count(), 3);
        let bounds = layer.bounds().unwrap();
        assert_eq!((bounds.min_x, bounds.min_y), (7.0, 46.0));
        assert_eq!((bounds.max_x, bounds.max_y), (8.5, 47.5));
    }

    #[test]
    fn test_add_rejects_invalid_features() {
        let mut layer = cities(&Context::default());

        assert!(layer.add(&json!({"name": 4})).is_err());
        assert!(layer.add(&json!({"population": 4})).is_err());
        assert!(layer.add(&json!({"properties": "Bern"})).is_err());

        let err = layer.add(&json!("Bern")).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ErrorKind>(),
            Some(&ErrorKind::TypeMismatch {
                property: "feature".to_string(),
                expected: "object",
                found: "string"
            })
        );
        assert!(layer.add(&json!(["Bern"])).is_err());
        assert_eq!(layer.count(), 0);
    }

    #[test]
    fn test_layer_needs_a_schema() {
        let context = Context::default();

        let err = Layer::new(&context, &json!({"type": "Layer", "name": "empty"})).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ErrorKind>(),
            Some(&ErrorKind::InvalidConfiguration {
                property: "schema".to_string(),
                reason: "a layer needs a 'schema' or 'fields'".to_string()
            })
        );
        assert!(Layer::new(&context, &json!({"type": "Layer", "fields": 1})).is_err());
    }

    #[test]
    fn test_config_round_trip() {
        let context = Context::default();
        let mut layer = cities(&context);
        layer.add(&json!({"name": "Bern"})).unwrap();

        let config = layer.config();
        assert!(!config.contains_key("features"));
        assert_eq!(config["schema"]["fields"][1]["name"], json!("name"));

        let again = Layer::new(&context, &Value::Object(config.clone())).unwrap();
        assert_eq!(again.config(), config);
        assert_eq!(again.count(), 0);
    }

    #[test]
    fn test_with_schema() {
        let context = Context::default();
        let schema = Schema::new(&context, &json!([{"name": "id", "type": "Long"}])).unwrap();

        let layer = Layer::with_schema(None, schema.clone());
        assert_eq!(layer.name(), "feature");

        let layer = Layer::with_schema(Some("ids"), schema);
        assert_eq!(layer.name(), "ids");
    }
}
