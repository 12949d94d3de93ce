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
use feature_engine::{Color, FillSymbol};
use serde_json::Value;

use crate::cache::LazyCache;
use crate::config::{as_f64, discriminator, get_f64, type_is, ConfigMap};
use crate::factory::{Context, FromConfig, Kind};
use crate::style::{is_color, opacity, parse_color, unknown_property};

/// Fill
///
/// Paints the interior of polygons and marks with a solid color.  Configured
/// as `{type: "Fill", brush, opacity}` or with a color string such as
/// `"#ff0000"`.
#[derive(Debug, Clone)]
pub struct Fill {
    brush: Color,
    opacity: f64,
    context: Context,
    cache: LazyCache,
}

impl Fill {
    /// Gray, fully opaque
    pub fn new(context: &Context) -> Fill {
        Fill {
            brush: Color::GRAY,
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
            "opacity" => self.set_opacity(as_f64(property, value)?)?,
            _ => Err(unknown_property(Kind::Fill, property))?,
        }
        Ok(())
    }

    /// The engine symbol, created on first use
    pub fn symbol(&self) -> Rc<RefCell<FillSymbol>> {
        self.cache.get_or_init("symbol", || {
            RefCell::new(self.context.engine().create_fill(self.brush, self.opacity))
        })
    }

    pub fn is_materialized(&self) -> bool {
        self.cache.contains("symbol")
    }

    fn materialized(&self) -> Option<Rc<RefCell<FillSymbol>>> {
        self.cache.get("symbol")
    }

    pub fn config(&self) -> ConfigMap {
        let mut config = ConfigMap::new();
        config.insert("type".to_string(), Value::from(Kind::Fill.name()));
        config.insert("brush".to_string(), Value::from(self.brush.to_hex()));
        config.insert("opacity".to_string(), Value::from(self.opacity));
        config
    }
}

impl FromConfig for Fill {
    const KIND: Kind = Kind::Fill;

    fn handles(config: &ConfigMap) -> bool {
        match discriminator(config) {
            Some(_) => type_is(config, Kind::Fill.name()),
            None => {
                is_color(config.get("name"))
                    || (config.contains_key("brush") && !config.contains_key("width"))
            }
        }
    }

    fn from_config(config: ConfigMap, context: &Context) -> Result<Fill> {
        let mut fill = Fill::new(context);
        match (config.get("brush"), config.get("name")) {
            (Some(brush), _) => fill.set_brush(parse_color("brush", brush)?),
            (None, Some(name)) if is_color(Some(name)) => fill.set_brush(parse_color("name", name)?),
            _ => {}
        }
        if let Some(value) = get_f64(&config, "opacity")? {
            fill.set_opacity(value)?;
        }
        Ok(fill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::normalize;
    use crate::errors::ErrorKind;
    use crate::test_util::counting_context;
    use serde_json::json;

    #[test]
    fn test_string_shorthand() {
        let context = Context::default();
        let fill = Fill::from_config(normalize(&json!("#ff0000")), &context).unwrap();

        assert_eq!(fill.brush(), Color { r: 255, g: 0, b: 0 });
        assert_eq!(fill.opacity(), 1.0);
        assert_eq!(
            Value::Object(fill.config()),
            json!({"type": "Fill", "brush": "#ff0000", "opacity": 1.0})
        );
    }

    #[test]
    fn test_materializes_once_and_writes_through() {
        let (engine, context) = counting_context();
        let mut fill = Fill::from_config(normalize(&json!({"brush": "#0000ff", "opacity": 0.5})), &context).unwrap();

        assert!(!fill.is_materialized());
        assert_eq!(engine.calls(), 0);

        let symbol = fill.symbol();
        assert!(Rc::ptr_eq(&symbol, &fill.symbol()));
        assert_eq!(engine.calls(), 1);
        assert_eq!(symbol.borrow().opacity, 0.5);

        fill.set("opacity", &json!(0.25)).unwrap();
        fill.set("brush", &json!("#abc")).unwrap();
        assert_eq!(symbol.borrow().opacity, 0.25);
        assert_eq!(symbol.borrow().color.to_hex(), "#aabbcc");
        assert_eq!(engine.calls(), 1);
    }

    #[test]
    fn test_invalid_values() {
        let context = Context::default();
        let mut fill = Fill::new(&context);

        let err = fill.set("opacity", &json!(2)).unwrap_err();
        assert!(matches!(err.downcast_ref::<ErrorKind>(), Some(ErrorKind::RangeError { .. })));
        let err = fill.set("opacity", &json!("half")).unwrap_err();
        assert!(matches!(err.downcast_ref::<ErrorKind>(), Some(ErrorKind::TypeMismatch { .. })));
        assert!(fill.set("width", &json!(1)).is_err());
        assert_eq!(fill.opacity(), 1.0);

        assert!(Fill::from_config(normalize(&json!({"type": "Fill", "opacity": -1})), &context).is_err());
    }

    #[test]
    fn test_handles() {
        assert!(Fill::handles(&normalize(&json!("#fff"))));
        assert!(Fill::handles(&normalize(&json!({"brush": "#fff"}))));
        assert!(Fill::handles(&normalize(&json!({"type": "fill"}))));
        assert!(!Fill::handles(&normalize(&json!("circle"))));
        assert!(!Fill::handles(&normalize(&json!({"brush": "#fff", "width": 2}))));
    }

    #[test]
    fn test_clone_materializes_separately() {
        let context = Context::default();
        let fill = Fill::new(&context);
        let symbol = fill.symbol();

        let mut cloned = fill.clone();
        cloned.set_opacity(0.1).unwrap();
        assert_eq!(symbol.borrow().opacity, 1.0);
        assert_eq!(cloned.symbol().borrow().opacity, 0.1);
    }
}
