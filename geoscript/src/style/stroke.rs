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
use feature_engine::{Color, StrokeSymbol};
use serde_json::Value;

use crate::cache::LazyCache;
use crate::config::{as_f64, discriminator, get_f64, type_is, ConfigMap};
use crate::factory::{Context, FromConfig, Kind};
use crate::style::{in_range, opacity, parse_color, unknown_property};

/// Stroke
///
/// Draws lines and outlines.  `{type: "Stroke", brush, width, opacity}`; a
/// configuration without a type is a stroke when it has a `width`.
#[derive(Debug, Clone)]
pub struct Stroke {
    brush: Color,
    width: f64,
    opacity: f64,
    context: Context,
    cache: LazyCache,
}

impl Stroke {
    /// Black, one unit wide, fully opaque
    pub fn new(context: &Context) -> Stroke {
        Stroke {
            brush: Color::BLACK,
            width: 1.0,
            opacity: 1.0,
            context: context.clone(),
            cache: LazyCache::default(),
        }
    }

    pub fn brush(&self) -> Color {
        self.brush
    }

    pub fn set_brush(&mut self, brush: Color) {
        self.brush = brush;
        if let Some(symbol) = self.materialized() {
            symbol.borrow_mut().color = brush;
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn set_width(&mut self, width: f64) -> Result<()> {
        self.width = in_range("width", width, 0.0, f64::INFINITY, "must not be negative")?;
        if let Some(symbol) = self.materialized() {
            symbol.borrow_mut().width = self.width;
        }
        Ok(())
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn set_opacity(&mut self, value: f64) -> Result<()> {
        self.opacity = opacity("opacity", value)?;
        if let Some(symbol) = self.materialized() {
            symbol.borrow_mut().opacity = self.opacity;
        }
        Ok(())
    }

    pub fn set(&mut self, property: &str, value: &Value) -> Result<()> {
        match property {
            "brush" => self.set_brush(parse_color(property, value)?),
            "width" => self.set_width(as_f64(property, value)?)?,
            "opacity" => self.set_opacity(as_f64(property, value)?)?,
            _ => Err(unknown_property(Kind::Stroke, property))?,
        }
        Ok(())
    }

    /// The engine symbol, created on first use
    pub fn symbol(&self) -> Rc<RefCell<StrokeSymbol>> {
        self.cache.get_or_init("symbol", || {
            RefCell::new(
                self.context
                    .engine()
                    .create_stroke(self.brush, self.width, self.opacity),
            )
        })
    }

    pub fn is_materialized(&self) -> bool {
        self.cache.contains("symbol")
    }

    fn materialized(&self) -> Option<Rc<RefCell<StrokeSymbol>>> {
        self.cache.get("symbol")
    }

    pub fn config(&self) -> ConfigMap {
        let mut config = ConfigMap::new();
        config.insert("type".to_string(), Value::from(Kind::Stroke.name()));
        config.insert("brush".to_string(), Value::from(self.brush.to_hex()));
        config.insert("width".to_string(), Value::from(self.width));
        config.insert("opacity".to_string(), Value::from(self.opacity));
        config
    }
}

impl FromConfig for Stroke {
    const KIND: Kind = Kind::Stroke;

    fn handles(config: &ConfigMap) -> bool {
        match discriminator(config) {
            Some(_) => type_is(config, Kind::Stroke.name()),
            None => config.contains_key("width"),
        }
    }

    fn from_config(config: ConfigMap, context: &Context) -> Result<Stroke> {
        let mut stroke = Stroke::new(context);
        if let Some(brush) = config.get("brush") {
            stroke.set_brush(parse_color("brush", brush)?);
        }
        if let Some(width) = get_f64(&config, "width")? {
            stroke.set_width(width)?;
        }
        if let Some(value) = get_f64(&config, "opacity")? {
            stroke.set_opacity(value)?;
        }
        Ok(stroke)
    }
}
