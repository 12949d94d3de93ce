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
use chrono::NaiveDate;
use feature_engine::{AttributeValue, Binding, SimpleFeature};
use log::debug;
use serde_json::{Number, Value};

use crate::config::{discriminator, get_str, json_kind, normalize, type_is, ConfigMap};
use crate::errors::ErrorKind;
use crate::factory::{Context, FromConfig, Kind};
use crate::feature::{Field, Schema};
use crate::geom::Geometry;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn mismatch(field: &Field, value: &Value) -> ErrorKind {
    ErrorKind::TypeMismatch {
        property: field.name().to_string(),
        expected: field.field_type(),
        found: json_kind(value),
    }
}

fn integer(field: &Field, value: &Value, n: &Number) -> Result<i64> {
    match n.as_i64() {
        Some(i) => Ok(i),
        None if n.is_u64() => Err(ErrorKind::RangeError {
            property: field.name().to_string(),
            constraint: "must fit in a 64 bit integer",
            value: n.to_string(),
        })?,
        None => Err(mismatch(field, value))?,
    }
}

/// Converts an untyped property value to what the field is bound to
fn to_attribute(context: &Context, field: &Field, value: &Value) -> Result<AttributeValue> {
    let attribute = match (field.binding(), value) {
        (_, Value::Null) => AttributeValue::Null,
        (Binding::String, Value::String(s)) => AttributeValue::String(s.clone()),
        (Binding::Integer, Value::Number(n)) => {
            let i = integer(field, value, n)?;
            match i32::try_from(i) {
                Ok(i) => AttributeValue::Integer(i),
                Err(_) => Err(ErrorKind::RangeError {
                    property: field.name().to_string(),
                    constraint: "must fit in a 32 bit integer",
                    value: i.to_string(),
                })?,
            }
        }
        (Binding::Long, Value::Number(n)) => AttributeValue::Long(integer(field, value, n)?),
        (Binding::Double, Value::Number(n)) => match n.as_f64() {
            Some(d) => AttributeValue::Double(d),
            None => Err(mismatch(field, value))?,
        },
        (Binding::Boolean, Value::Bool(b)) => AttributeValue::Boolean(*b),
        (Binding::Date, Value::String(s)) => match NaiveDate::parse_from_str(s, DATE_FORMAT) {
            Ok(date) => AttributeValue::Date(date),
            Err(_) => Err(ErrorKind::RangeError {
                property: field.name().to_string(),
                constraint: "must be a YYYY-MM-DD date",
                value: s.clone(),
            })?,
        },
        (binding, Value::Object(_)) if binding.is_geometry() => {
            let mut geometry = context.create_as::<Geometry>(value)?;
            if !binding.accepts_geometry(geometry.kind().name()) {
                Err(ErrorKind::TypeMismatch {
                    property: field.name().to_string(),
                    expected: binding.name(),
                    found: geometry.kind().name(),
                })?;
            }
            if geometry.projection().is_none() {
                geometry.set_projection(field.projection());
            }
            AttributeValue::Geometry(geometry.engine_geometry().clone())
        }
        _ => Err(mismatch(field, value))?,
    };
    Ok(attribute)
}

fn to_json(context: &Context, attribute: &AttributeValue) -> Value {
    match attribute {
        AttributeValue::Null => Value::Null,
        AttributeValue::String(s) => Value::from(s.as_str()),
        AttributeValue::Integer(i) => Value::from(*i),
        AttributeValue::Long(l) => Value::from(*l),
        AttributeValue::Double(d) => Value::from(*d),
        AttributeValue::Boolean(b) => Value::from(*b),
        AttributeValue::Date(date) => Value::from(date.format(DATE_FORMAT).to_string()),
        AttributeValue::Geometry(g) => Value::Object(Geometry::from_(context, g.clone()).config()),
    }
}

/// Field type a property value implies when a feature comes without a schema.
/// Arrays and objects other than geometries have no attribute binding.
fn infer_field(name: &str, value: &Value) -> Result<Value> {
    let mut field = ConfigMap::new();
    field.insert("name".to_string(), Value::from(name));

    let type_name = match value {
        Value::Bool(_) => Binding::Boolean.name(),
        Value::Number(n) if n.as_i64().and_then(|i| i32::try_from(i).ok()).is_some() => {
            Binding::Integer.name()
        }
        Value::Number(n) if n.is_i64() || n.is_u64() => Binding::Long.name(),
        Value::Number(_) => Binding::Double.name(),
        Value::Object(geometry) => match Geometry::is_geometry_config(value) {
            Some(kind) => {
                if let Some(projection) = geometry.get("projection").and_then(Value::as_str) {
                    field.insert("projection".to_string(), Value::from(projection));
                }
                kind.name()
            }
            None => Err(ErrorKind::invalid(
                name,
                "nested objects have no attribute type, give the feature a schema",
            ))?,
        },
        Value::Array(_) => Err(ErrorKind::invalid(
            name,
            "arrays have no attribute type, give the feature a schema",
        ))?,
        _ => Binding::String.name(),
    };
    field.insert("type".to_string(), Value::from(type_name));
    Ok(Value::Object(field))
}

/// Feature
///
/// Wraps an engine feature together with the schema it was built against.
/// Property values are read and written as untyped configuration values and
/// checked against the field they belong to.
#[derive(Debug, Clone)]
pub struct Feature {
    feature: SimpleFeature,
    schema: Schema,
}

impl Feature {
    pub fn new(context: &Context, config: &Value) -> Result<Feature> {
        context.create_as::<Feature>(config)
    }

    /// Wraps an existing engine feature of `schema`
    pub fn from_(schema: &Schema, feature: SimpleFeature) -> Feature {
        Feature {
            feature,
            schema: schema.clone(),
        }
    }

    /// Builds a feature of `schema` from a properties object
    pub fn with_schema(schema: &Schema, id: Option<&str>, properties: &ConfigMap) -> Result<Feature> {
        let context = schema.context();

        let fields = schema.fields();
        let mut values = Vec::with_capacity(properties.len());
        for (name, value) in properties {
            let idx = match schema.feature_type().index_of(name) {
                Some(idx) => idx,
                None => Err(ErrorKind::InvalidFieldName {
                    field_name: name.clone(),
                    method_name: "Feature::with_schema",
                })?,
            };
            values.push((idx, to_attribute(context, &fields[idx], value)?));
        }

        let mut feature = context.engine().create_feature(schema.feature_type());
        feature.set_id(id);
        for (idx, value) in values {
            feature.set(idx, value)?;
        }
        Ok(Feature::from_(schema, feature))
    }

    pub fn engine_feature(&self) -> &SimpleFeature {
        &self.feature
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn id(&self) -> Option<&str> {
        self.feature.id()
    }

    pub fn set_id(&mut self, id: Option<&str>) {
        self.feature.set_id(id);
    }

    fn field_index(&self, name: &str, method_name: &'static str) -> Result<usize> {
        match self.schema.feature_type().index_of(name) {
            Some(idx) => Ok(idx),
            None => Err(ErrorKind::InvalidFieldName {
                field_name: name.to_string(),
                method_name,
            })?,
        }
    }

    /// Value of the named property
    pub fn get(&self, name: &str) -> Result<Value> {
        let idx = self.field_index(name, "Feature::get")?;
        let attribute = self.feature.get(idx).unwrap_or(&AttributeValue::Null);
        Ok(to_json(self.schema.context(), attribute))
    }

    /// Sets the named property.  Values are checked against the field type.
    pub fn set(&mut self, name: &str, value: &Value) -> Result<()> {
        let idx = self.field_index(name, "Feature::set")?;
        let fields = self.schema.fields();
        let attribute = to_attribute(self.schema.context(), &fields[idx], value)?;
        self.feature.set(idx, attribute)
    }

    /// The value of the default geometry field
    pub fn geometry(&self) -> Option<Geometry> {
        let geometry = self.feature.default_geometry()?;
        Some(Geometry::from_(self.schema.context(), geometry.clone()))
    }

    pub fn set_geometry(&mut self, geometry: &Geometry) -> Result<()> {
        let field = match self.schema.geometry() {
            Some(field) => field,
            None => Err(ErrorKind::invalid(
                "geometry",
                format!("schema '{}' has no geometry field", self.schema.name()),
            ))?,
        };
        self.set(field.name(), &Value::Object(geometry.config()))
    }

    /// All property values by field name, in schema order
    pub fn properties(&self) -> ConfigMap {
        let context = self.schema.context();
        self.schema
            .fields()
            .iter()
            .zip(self.feature.values())
            .map(|(field, value)| (field.name().to_string(), to_json(context, value)))
            .collect()
    }

    pub fn config(&self) -> ConfigMap {
        let mut config = ConfigMap::new();
        config.insert("type".to_string(), Value::from(Kind::Feature.name()));
        if let Some(id) = self.id() {
            config.insert("id".to_string(), Value::from(id));
        }
        config.insert("schema".to_string(), Value::Object(self.schema.config()));
        config.insert("properties".to_string(), Value::Object(self.properties()));
        config
    }
}

impl FromConfig for Feature {
    const KIND: Kind = Kind::Feature;

    fn handles(config: &ConfigMap) -> bool {
        match discriminator(config) {
            Some(_) => type_is(config, Kind::Feature.name()),
            None => matches!(config.get("properties"), Some(Value::Object(_))),
        }
    }

    fn from_config(config: ConfigMap, context: &Context) -> Result<Feature> {
        let properties = match config.get("properties") {
            None | Some(Value::Null) => ConfigMap::new(),
            Some(Value::Object(properties)) => properties.clone(),
            Some(other) => Err(ErrorKind::TypeMismatch {
                property: "properties".to_string(),
                expected: "object",
                found: json_kind(other),
            })?,
        };
        let id = get_str(&config, "id")?;

        let schema = match config.get("schema") {
            Some(schema) if !schema.is_null() => context.create_as::<Schema>(schema)?,
            _ => {
                debug!("Inferring the schema of a feature from {} properties", properties.len());
                let fields = properties
                    .iter()
                    .map(|(name, value)| infer_field(name, value))
                    .collect::<Result<Vec<_>>>()?;
                context.create_from_map::<Schema>(normalize(&Value::Array(fields)))?
            }
        };

        Feature::with_schema(&schema, id, &properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn city(context: &Context) -> Feature {
        Feature::new(
            context,
            &json!({
                "id": "city.1",
                "properties": {
                    "geom": {"type": "Point", "coordinates": [7.44, 46.95], "projection": "EPSG:4326"},
                    "name": "Bern",
                    "pop": 133115,
                    "area": 51.62,
                    "capital": true,
                    "mayor": null
                }
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_inferred_schema() {
        let feature = city(&Context::default());
        let schema = feature.schema();

        let types: Vec<&str> = schema.fields().iter().map(Field::field_type).collect();
        assert_eq!(types, vec!["Point", "String", "Integer", "Double", "Boolean", "String"]);
        assert_eq!(schema.get("geom").unwrap().projection(), Some("EPSG:4326"));
        assert_eq!(feature.id(), Some("city.1"));
    }

    #[test]
    fn test_infer_long_and_nested_objects() {
        let type_of = |value: Value| infer_field("n", &value).unwrap()["type"].clone();
        assert_eq!(type_of(json!(5_000_000_000i64)), json!("Long"));
        assert_eq!(type_of(json!(-3)), json!("Integer"));
        assert_eq!(type_of(json!(3.0)), json!("Double"));
        assert_eq!(type_of(json!(null)), json!("String"));
    }

    #[test]
    fn test_inferred_schema_rejects_arrays_and_objects() {
        let context = Context::default();

        for (name, value) in [("tags", json!(["a", "b"])), ("meta", json!({"a": 1}))] {
            let mut properties = ConfigMap::new();
            properties.insert(name.to_string(), value);
            let err = Feature::new(&context, &json!({ "properties": properties })).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<ErrorKind>(),
                Some(ErrorKind::InvalidConfiguration { property, .. }) if property == name
            ));
        }

        // an explicit schema still rejects them as a type mismatch
        let err = Feature::new(
            &context,
            &json!({
                "schema": [{"name": "tags", "type": "String"}],
                "properties": {"tags": ["a", "b"]}
            }),
        )
        .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ErrorKind>(),
            Some(&ErrorKind::TypeMismatch {
                property: "tags".to_string(),
                expected: "String",
                found: "array"
            })
        );
    }

    #[test]
    fn test_get_and_set() {
        let mut feature = city(&Context::default());

        assert_eq!(feature.get("name").unwrap(), json!("Bern"));
        assert_eq!(feature.get("mayor").unwrap(), Value::Null);

        feature.set("name", &json!("Berne")).unwrap();
        feature.set("pop", &json!(140000)).unwrap();
        assert_eq!(feature.get("name").unwrap(), json!("Berne"));
        assert_eq!(feature.get("pop").unwrap(), json!(140000));

        let err = feature.set("pop", &json!("many")).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ErrorKind>(),
            Some(&ErrorKind::TypeMismatch {
                property: "pop".to_string(),
                expected: "Integer",
                found: "string"
            })
        );

        let err = feature.set("pop", &json!(3_000_000_000i64)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ErrorKind>(),
            Some(ErrorKind::RangeError { property, .. }) if property == "pop"
        ));

        let err = feature.get("elevation").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid field name 'elevation' used on method Feature::get"
        );
        assert!(feature.set("elevation", &json!(540)).is_err());
    }

    #[test]
    fn test_geometry() {
        let context = Context::default();
        let mut feature = city(&context);

        let geom = feature.geometry().unwrap();
        assert_eq!(geom.kind(), Kind::Point);
        assert_eq!(geom.projection(), Some("EPSG:4326"));

        let moved = Geometry::new(&context, &json!({"type": "Point", "coordinates": [8.54, 47.37]})).unwrap();
        feature.set_geometry(&moved).unwrap();
        assert_eq!(feature.geometry().unwrap().coordinates(), json!([8.54, 47.37]));
        // the field projection applies to geometries without one
        assert_eq!(feature.geometry().unwrap().projection(), Some("EPSG:4326"));

        let line = Geometry::new(&context, &json!({"type": "LineString", "coordinates": [[0, 0], [1, 1]]})).unwrap();
        let err = feature.set_geometry(&line).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ErrorKind>(),
            Some(&ErrorKind::TypeMismatch {
                property: "geom".to_string(),
                expected: "Point",
                found: "LineString"
            })
        );
    }

    #[test]
    fn test_explicit_schema() {
        let context = Context::default();
        let feature = Feature::new(
            &context,
            &json!({
                "type": "Feature",
                "schema": [
                    {"name": "founded", "type": "Date"},
                    {"name": "pop", "type": "Long"}
                ],
                "properties": {"founded": "1191-01-01", "pop": 133115}
            }),
        )
        .unwrap();

        assert_eq!(feature.get("founded").unwrap(), json!("1191-01-01"));
        assert_eq!(feature.get("pop").unwrap(), json!(133115));
        assert!(feature.geometry().is_none());

        let err = Feature::new(
            &context,
            &json!({
                "type": "Feature",
                "schema": [{"name": "pop", "type": "Long"}],
                "properties": {"pop": 1, "name": "Bern"}
            }),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ErrorKind>(),
            Some(ErrorKind::InvalidFieldName { field_name, .. }) if field_name == "name"
        ));

        let err = Feature::new(
            &context,
            &json!({
                "type": "Feature",
                "schema": [{"name": "founded", "type": "Date"}],
                "properties": {"founded": "long ago"}
            }),
        )
        .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ErrorKind>(),
            Some(&ErrorKind::RangeError {
                property: "founded".to_string(),
                constraint: "must be a YYYY-MM-DD date",
                value: "long ago".to_string()
            })
        );

        let mut feature = feature;
        let err = feature.set("founded", &json!("long ago")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ErrorKind>(),
            Some(ErrorKind::RangeError { property, .. }) if property == "founded"
        ));
        assert_eq!(feature.get("founded").unwrap(), json!("1191-01-01"));
    }

    #[test]
    fn test_handles() {
        assert!(Feature::handles(&normalize(&json!({"properties": {}}))));
        assert!(Feature::handles(&normalize(&json!({"type": "feature"}))));
        assert!(!Feature::handles(&normalize(&json!({"type": "Layer", "properties": {}}))));
        assert!(!Feature::handles(&normalize(&json!({"properties": 3}))));
    }

    #[test]
    fn test_config_round_trip() {
        let context = Context::default();
        let feature = city(&context);
        let config = feature.config();

        assert_eq!(config["type"], json!("Feature"));
        assert_eq!(config["id"], json!("city.1"));
        assert_eq!(config["properties"]["pop"], json!(133115));
        assert_eq!(
            config["properties"]["geom"],
            json!({"type": "Point", "coordinates": [7.44, 46.95], "projection": "EPSG:4326"})
        );

        let again = Feature::new(&context, &Value::Object(config.clone())).unwrap();
        assert_eq!(again.config(), config);
    }
}
