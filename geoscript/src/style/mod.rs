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
//! Symbolizers.
//!
//! Each symbolizer keeps its properties in the wrapper and only asks the
//! engine for a symbol the first time [`Fill::symbol`] (or the equivalent)
//! is called.  Setters validate and update the wrapper, and write through to
//! the engine symbol once it exists.
//!

use anyhow::Result;
use feature_engine::Color;
use serde_json::Value;

use crate::config::{as_str, ConfigMap};
use crate::errors::ErrorKind;
use crate::factory::{Capability, FromConfig, Kind, Wrapper};

pub use crate::style::composite::Composite;
pub use crate::style::fill::Fill;
pub use crate::style::shape::Shape;
pub use crate::style::stroke::Stroke;

mod composite;
mod fill;
mod shape;
mod stroke;

/// Any of the symbolizer wrappers
#[derive(Debug, Clone)]
pub enum Symbolizer {
    Fill(Fill),
    Stroke(Stroke),
    Shape(Shape),
    Composite(Composite),
}

impl Symbolizer {
    pub fn kind(&self) -> Kind {
        match self {
            Symbolizer::Fill(_) => Kind::Fill,
            Symbolizer::Stroke(_) => Kind::Stroke,
            Symbolizer::Shape(_) => Kind::Shape,
            Symbolizer::Composite(_) => Kind::Composite,
        }
    }

    /// Sets a property from an untyped value
    pub fn set(&mut self, property: &str, value: &Value) -> Result<()> {
        match self {
            Symbolizer::Fill(s) => s.set(property, value),
            Symbolizer::Stroke(s) => s.set(property, value),
            Symbolizer::Shape(s) => s.set(property, value),
            Symbolizer::Composite(s) => s.set(property, value),
        }
    }

    pub fn config(&self) -> ConfigMap {
        match self {
            Symbolizer::Fill(s) => s.config(),
            Symbolizer::Stroke(s) => s.config(),
            Symbolizer::Shape(s) => s.config(),
            Symbolizer::Composite(s) => s.config(),
        }
    }
}

macro_rules! symbolizer {
    ($ty:ident) => {
        impl From<$ty> for Symbolizer {
            fn from(s: $ty) -> Symbolizer {
                Symbolizer::$ty(s)
            }
        }

        impl From<$ty> for Wrapper {
            fn from(s: $ty) -> Wrapper {
                Wrapper::Symbolizer(Symbolizer::$ty(s))
            }
        }

        impl Capability for $ty {
            const NAME: &'static str = stringify!($ty);

            fn accepts(kind: Kind) -> bool {
                kind == <$ty as FromConfig>::KIND
            }

            fn from_wrapper(wrapper: Wrapper) -> Result<Self> {
                match wrapper {
                    Wrapper::Symbolizer(Symbolizer::$ty(s)) => Ok(s),
                    other => Err(ErrorKind::TypeMismatch {
                        property: "type".to_string(),
                        expected: stringify!($ty),
                        found: other.kind().name(),
                    })?,
                }
            }
        }
    };
}

symbolizer!(Fill);
symbolizer!(Stroke);
symbolizer!(Shape);
symbolizer!(Composite);

pub(crate) fn in_range(
    property: &str,
    value: f64,
    min: f64,
    max: f64,
    constraint: &'static str,
) -> Result<f64> {
    // NaN fails both comparisons
    if value >= min && value <= max {
        Ok(value)
    } else {
        Err(ErrorKind::RangeError {
            property: property.to_string(),
            constraint,
            value: value.to_string(),
        })?
    }
}

pub(crate) fn opacity(property: &str, value: f64) -> Result<f64> {
    in_range(property, value, 0.0, 1.0, "must be between 0 and 1")
}

pub(crate) fn parse_color(property: &str, value: &Value) -> Result<Color> {
    let hex = as_str(property, value)?;
    match Color::from_hex(hex) {
        Ok(color) => Ok(color),
        Err(_) => Err(ErrorKind::invalid(
            property,
            format!("'{}' is not a #rgb or #rrggbb color", hex),
        ))?,
    }
}

/// Does the string look like a color a fill can be built from
pub(crate) fn is_color(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_str)
        .map_or(false, |s| Color::from_hex(s).is_ok())
}

pub(crate) fn unknown_property(kind: Kind, property: &str) -> ErrorKind {
    ErrorKind::invalid(property, format!("{} has no such property", kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::Context;
    use serde_json::json;

    #[test]
    fn test_in_range() {
        assert_eq!(opacity("opacity", 0.5).unwrap(), 0.5);
        assert!(opacity("opacity", f64::NAN).is_err());

        let err = opacity("opacity", 1.5).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ErrorKind>(),
            Some(&ErrorKind::RangeError {
                property: "opacity".to_string(),
                constraint: "must be between 0 and 1",
                value: "1.5".to_string()
            })
        );
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("brush", &json!("#f00")).unwrap(), Color { r: 255, g: 0, b: 0 });
        assert!(parse_color("brush", &json!("red")).is_err());

        let err = parse_color("brush", &json!(3)).unwrap_err();
        assert!(matches!(err.downcast_ref::<ErrorKind>(), Some(ErrorKind::TypeMismatch { .. })));
    }

    #[test]
    fn test_narrowed_symbolizers() {
        let context = Context::default();

        let fill = context.create_as::<Fill>(&json!("#00ff00")).unwrap();
        assert_eq!(fill.brush().to_hex(), "#00ff00");

        // a stroke config never dispatches to a fill
        let err = context.create_as::<Fill>(&json!({"width": 3})).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ErrorKind>(),
            Some(ErrorKind::NoMatchingFactory { capability: "Fill", .. })
        ));

        let mut symbolizer = context.create_as::<Symbolizer>(&json!({"width": 3})).unwrap();
        assert_eq!(symbolizer.kind(), Kind::Stroke);
        symbolizer.set("width", &json!(5)).unwrap();
        assert_eq!(symbolizer.config()["width"], json!(5.0));
        assert!(symbolizer.set("width", &json!("wide")).is_err());
    }
}
