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
use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use feature_engine::Mark;
use serde_json::Value;

use crate::cache::LazyCache;
use crate::config::{as_f64, as_str, discriminator, get_f64, get_str, type_is, ConfigMap};
use crate::errors::ErrorKind;
use crate::factory::{Context, FromConfig, Kind};
use crate::style::{in_range, unknown_property, Fill, Stroke};

/// Names of the marks a shape can draw
pub const SHAPE_NAMES: [&str; 6] = ["circle", "square", "triangle", "star", "cross", "x"];

const DEFAULT_SIZE: f64 = 6.0;

fn shape_name(property: &str, name: &str) -> Result<&'static str> {
    match SHAPE_NAMES.iter().copied().find(|n| n.eq_ignore_ascii_case(name)) {
        Some(n) => Ok(n),
        None => Err(ErrorKind::RangeError {
            property: property.to_string(),
            constraint: "must be one of circle, square, triangle, star, cross or x",
            value: name.to_string(),
        })?,
    }
}

/// Shape
///
/// A point marker: a well known shape of a given size, optionally filled and
/// outlined.  `{type: "Shape", name, size, fill?, stroke?}`, or just the shape
/// name such as `"circle"`.
#[derive(Debug, Clone)]
pub struct Shape {
    name: &'static str,
    size: f64,
    fill: Option<Fill>,
    stroke: Option<Stroke>,
    context: Context,
    cache: LazyCache,
}

impl Shape {
    pub fn new(context: &Context, name: &str) -> Result<Shape> {
        Ok(Shape {
            name: shape_name("name", name)?,
            size: DEFAULT_SIZE,
            fill: None,
            stroke: None,
            context: context.clone(),
            cache: LazyCache::default(),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.name = shape_name("name", name)?;
        if let Some(mark) = self.materialized() {
            mark.borrow_mut().well_known_name = self.name.to_string();
        }
        Ok(())
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn set_size(&mut self, size: f64) -> Result<()> {
        self.size = in_range("size", size, f64::MIN_POSITIVE, f64::INFINITY, "must be greater than 0")?;
        if let Some(mark) = self.materialized() {
            mark.borrow_mut().size = self.size;
        }
        Ok(())
    }

    pub fn fill(&self) -> Option<&Fill> {
        self.fill.as_ref()
    }

    pub fn set_fill(&mut self, fill: Option<Fill>) {
        if let Some(mark) = self.materialized() {
            mark.borrow_mut().fill = fill.as_ref().map(|f| f.symbol().borrow().clone());
        }
        self.fill = fill;
    }

    pub fn stroke(&self) -> Option<&Stroke> {
        self.stroke.as_ref()
    }

    pub fn set_stroke(&mut self, stroke: Option<Stroke>) {
        if let Some(mark) = self.materialized() {
            mark.borrow_mut().stroke = stroke.as_ref().map(|s| s.symbol().borrow().clone());
        }
        self.stroke = stroke;
    }

    pub fn set(&mut self, property: &str, value: &Value) -> Result<()> {
        match property {
            "name" => self.set_name(as_str(property, value)?)?,
            "size" => self.set_size(as_f64(property, value)?)?,
            "fill" if value.is_null() => self.set_fill(None),
            "fill" => {
                let fill = self.context.create_as::<Fill>(value)?;
                self.set_fill(Some(fill));
            }
            "stroke" if value.is_null() => self.set_stroke(None),
            "stroke" => {
                let stroke = self.context.create_as::<Stroke>(value)?;
                self.set_stroke(Some(stroke));
            }
            _ => Err(unknown_property(Kind::Shape, property))?,
        }
        Ok(())
    }

    /// The engine mark, created on first use together with the symbols of
    /// its fill and stroke
    pub fn symbol(&self) -> Rc<RefCell<Mark>> {
        self.cache.get_or_init("symbol", || {
            let mut mark = self.context.engine().create_mark(self.name, self.size);
            mark.fill = self.fill.as_ref().map(|f| f.symbol().borrow().clone());
            mark.stroke = self.stroke.as_ref().map(|s| s.symbol().borrow().clone());
            RefCell::new(mark)
        })
    }

    pub fn is_materialized(&self) -> bool {
        self.cache.contains("symbol")
    }

    fn materialized(&self) -> Option<Rc<RefCell<Mark>>> {
        self.cache.get("symbol")
    }

    pub fn config(&self) -> ConfigMap {
        let mut config = ConfigMap::new();
        config.insert("type".to_string(), Value::from(Kind::Shape.name()));
        config.insert("name".to_string(), Value::from(self.name));
        config.insert("size".to_string(), Value::from(self.size));
        if let Some(fill) = &self.fill {
            config.insert("fill".to_string(), Value::Object(fill.config()));
        }
        if let Some(stroke) = &self.stroke {
            config.insert("stroke".to_string(), Value::Object(stroke.config()));
        }
        config
    }
}

impl FromConfig for Shape {
    const KIND: Kind = Kind::Shape;

    fn handles(config: &ConfigMap) -> bool {
        match discriminator(config) {
            Some(_) => type_is(config, Kind::Shape.name()),
            None => get_str(config, "name")
                .ok()
                .flatten()
                .map_or(false, |name| shape_name("name", name).is_ok()),
        }
    }

    fn from_config(config: ConfigMap, context: &Context) -> Result<Shape> {
        let mut shape = Shape::new(context, get_str(&config, "name")?.unwrap_or("circle"))?;
        if let Some(size) = get_f64(&config, "size")? {
            shape.set_size(size)?;
        }
        for property in ["fill", "stroke"] {
            if let Some(value) = config.get(property) {
                shape.set(property, value)?;
            }
        }
        Ok(shape)
    }
}
