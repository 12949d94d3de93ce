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
use feature_engine::FeatureType;
use itertools::Itertools;
use serde_json::Value;

use crate::cache::LazyCache;
use crate::config::{discriminator, get_str, normalize, require_array, type_is, ConfigMap};
use crate::errors::ErrorKind;
use crate::factory::{Context, FromConfig, Kind};
use crate::feature::field::check_field_config;
use crate::feature::Field;

/// Schema
///
/// Ordered, named fields describing the features of a layer.  Wraps an engine
/// feature type; the field wrappers are built from its descriptors on first
/// use and kept for the life of the schema.
#[derive(Debug, Clone)]
pub struct Schema {
    feature_type: Rc<FeatureType>,
    context: Context,
    cache: LazyCache,
}

fn check_unique<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<()> {
    if let Some(dup) = names.into_iter().duplicates().next() {
        Err(ErrorKind::invalid("fields", format!("duplicate field name '{}'", dup)))?;
    }
    Ok(())
}

impl Schema {
    pub fn new(context: &Context, config: &Value) -> Result<Schema> {
        Schema::from_config(normalize(config), context)
    }

    /// Wraps a feature type the engine already built
    pub fn from_(context: &Context, feature_type: Rc<FeatureType>) -> Schema {
        Schema {
            feature_type,
            context: context.clone(),
            cache: LazyCache::default(),
        }
    }

    /// Builds a schema from field wrappers
    pub fn from_fields(context: &Context, name: Option<&str>, fields: &[Field]) -> Result<Schema> {
        check_unique(fields.iter().map(Field::name))?;

        let mut builder = context.engine().feature_type_builder();
        if let Some(name) = name {
            builder.set_name(name);
        }
        for field in fields {
            builder.add(field.descriptor().clone());
        }
        Ok(Schema::from_(context, builder.build()?))
    }

    pub fn feature_type(&self) -> &Rc<FeatureType> {
        &self.feature_type
    }

    pub(crate) fn context(&self) -> &Context {
        &self.context
    }

    pub fn name(&self) -> &str {
        self.feature_type.name()
    }

    pub fn fields(&self) -> Rc<Vec<Field>> {
        self.cache.get_or_init("fields", || {
            self.feature_type
                .descriptors()
                .iter()
                .cloned()
                .map(Field::from_)
                .collect()
        })
    }

    pub fn len(&self) -> usize {
        self.feature_type.attribute_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields().iter().map(|f| f.name().to_string()).collect()
    }

    pub fn get(&self, name: &str) -> Option<Field> {
        let idx = self.feature_type.index_of(name)?;
        self.fields().get(idx).cloned()
    }

    /// The default geometry field
    pub fn geometry(&self) -> Option<Field> {
        self.fields().iter().find(|f| f.is_geometry()).cloned()
    }

    /// New schema with the fields of `overrides` merged in by name.
    ///
    /// An override replaces the existing field of the same name in place,
    /// overrides with new names are appended in their given order.  A `name`
    /// in the overrides renames the schema.
    pub fn clone_with(&self, overrides: &Value) -> Result<Schema> {
        let overrides = normalize(overrides);

        let override_fields = match overrides.get("fields") {
            None => Vec::new(),
            Some(_) => require_array(&overrides, "fields")?.clone(),
        };

        let mut merged: Vec<Value> = self
            .fields()
            .iter()
            .map(|f| Value::Object(f.config()))
            .collect();
        let mut appended = Vec::new();

        for (idx, field) in override_fields.into_iter().enumerate() {
            let name = check_field_config(&format!("fields[{}]", idx), &field)?;
            match self.feature_type.index_of(name) {
                Some(pos) => merged[pos] = field,
                None => appended.push(field),
            }
        }
        merged.extend(appended);

        let mut config = self.config();
        config.insert("fields".to_string(), Value::Array(merged));
        if let Some(name) = get_str(&overrides, "name")? {
            config.insert("name".to_string(), Value::from(name));
        }

        Schema::from_config(config, &self.context)
    }

    pub fn config(&self) -> ConfigMap {
        let fields = self
            .fields()
            .iter()
            .map(|f| Value::Object(f.config()))
            .collect();

        let mut config = ConfigMap::new();
        config.insert("type".to_string(), Value::from(Kind::Schema.name()));
        config.insert("name".to_string(), Value::from(self.name()));
        config.insert("fields".to_string(), Value::Array(fields));
        config
    }
}

impl FromConfig for Schema {
    const KIND: Kind = Kind::Schema;

    fn handles(config: &ConfigMap) -> bool {
        match discriminator(config) {
            Some(_) => type_is(config, Kind::Schema.name()),
            None => config.contains_key("fields"),
        }
    }

    fn from_config(config: ConfigMap, context: &Context) -> Result<Schema> {
        // Everything is checked before the engine sees anything
        let field_configs = require_array(&config, "fields")?;
        let name = get_str(&config, "name")?;
        let names = field_configs
            .iter()
            .enumerate()
            .map(|(idx, f)| check_field_config(&format!("fields[{}]", idx), f))
            .collect::<Result<Vec<&str>>>()?;
        check_unique(names)?;

        let fields = field_configs
            .iter()
            .map(|f| context.create_as::<Field>(f))
            .collect::<Result<Vec<Field>>>()?;

        Schema::from_fields(context, name, &fields)
    }
}
