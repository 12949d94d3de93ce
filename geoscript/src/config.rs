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
//! Configuration normalizing and typed reads of configuration properties.
//!
//! A configuration is untyped caller data ([`Value`]).  [`normalize`] turns it
//! into a fresh [`ConfigMap`] which the factories and wrappers read from.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::errors::ErrorKind;

pub type ConfigMap = Map<String, Value>;

/// Key holding the discriminator of a configuration
pub const TYPE_KEY: &str = "type";

/// Canonical form of caller supplied configuration data.
///
/// * an array becomes `{fields: [...]}`
/// * an object is copied
/// * a string is shorthand for `{name: "..."}`
/// * a number or boolean becomes `{value: ...}`
/// * null becomes an empty map
///
/// The input is never modified.
pub fn normalize(input: &Value) -> ConfigMap {
    let mut config = ConfigMap::new();
    match input {
        Value::Object(map) => return map.clone(),
        Value::Array(items) => {
            config.insert("fields".to_string(), Value::Array(items.clone()));
        }
        Value::String(s) => {
            config.insert("name".to_string(), Value::String(s.clone()));
        }
        Value::Number(_) | Value::Bool(_) => {
            config.insert("value".to_string(), input.clone());
        }
        Value::Null => {}
    }
    config
}

pub fn discriminator(config: &ConfigMap) -> Option<&str> {
    config.get(TYPE_KEY).and_then(Value::as_str)
}

/// Case insensitive check of the discriminator
pub fn type_is(config: &ConfigMap, type_name: &str) -> bool {
    discriminator(config).map_or(false, |t| t.eq_ignore_ascii_case(type_name))
}

pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub fn as_str<'a>(property: &str, value: &'a Value) -> Result<&'a str> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(ErrorKind::TypeMismatch {
            property: property.to_string(),
            expected: "string",
            found: json_kind(other),
        })?,
    }
}

pub fn as_f64(property: &str, value: &Value) -> Result<f64> {
    match value.as_f64() {
        Some(n) => Ok(n),
        None => Err(ErrorKind::TypeMismatch {
            property: property.to_string(),
            expected: "number",
            found: json_kind(value),
        })?,
    }
}

/// Optional string property.  Missing and null read as None.
pub fn get_str<'a>(config: &'a ConfigMap, property: &str) -> Result<Option<&'a str>> {
    match config.get(property) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => as_str(property, value).map(Some),
    }
}

pub fn require_str<'a>(config: &'a ConfigMap, property: &str) -> Result<&'a str> {
    match get_str(config, property)? {
        Some(s) => Ok(s),
        None => Err(ErrorKind::invalid(property, "a string value is required"))?,
    }
}

pub fn get_f64(config: &ConfigMap, property: &str) -> Result<Option<f64>> {
    match config.get(property) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => as_f64(property, value).map(Some),
    }
}

pub fn require_array<'a>(config: &'a ConfigMap, property: &str) -> Result<&'a Vec<Value>> {
    match config.get(property) {
        Some(Value::Array(items)) => Ok(items),
        None => Err(ErrorKind::invalid(property, "an array must be present"))?,
        Some(other) => Err(ErrorKind::invalid(
            property,
            format!("must be an array, found {}", json_kind(other)),
        ))?,
    }
}

/// Reads a JSON or TOML (by extension) configuration file
pub fn read_config_file(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;

    let is_toml = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("toml"));

    let value = if is_toml {
        toml::from_str::<Value>(&text).with_context(|| format!("Parsing TOML {:?}", path))?
    } else {
        serde_json::from_str::<Value>(&text).with_context(|| format!("Parsing JSON {:?}", path))?
    };
    Ok(value)
}
