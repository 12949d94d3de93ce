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
use std::fmt;

use anyhow::Result;

use crate::errors::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const GRAY: Color = Color {
        r: 0x80,
        g: 0x80,
        b: 0x80,
    };

    /// Parses `#rrggbb` or the short form `#rgb`
    pub fn from_hex(hex: &str) -> Result<Color> {
        let digits = match hex.strip_prefix('#') {
            Some(d) if d.chars().all(|c| c.is_ascii_hexdigit()) => d,
            _ => Err(EngineError::InvalidColor(hex.to_string()))?,
        };

        let channel = |s: &str| u8::from_str_radix(s, 16);
        let parsed = match digits.len() {
            6 => (channel(&digits[0..2]), channel(&digits[2..4]), channel(&digits[4..6])),
            3 => (
                channel(digits[0..1].repeat(2).as_str()),
                channel(digits[1..2].repeat(2).as_str()),
                channel(digits[2..3].repeat(2).as_str()),
            ),
            _ => Err(EngineError::InvalidColor(hex.to_string()))?,
        };

        match parsed {
            (Ok(r), Ok(g), Ok(b)) => Ok(Color { r, g, b }),
            _ => Err(EngineError::InvalidColor(hex.to_string()))?,
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FillSymbol {
    pub color: Color,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrokeSymbol {
    pub color: Color,
    pub width: f64,
    pub opacity: f64,
}

/// Point marker drawn with a well known shape
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    pub well_known_name: String,
    pub size: f64,
    pub fill: Option<FillSymbol>,
    pub stroke: Option<StrokeSymbol>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        assert_eq!(
            Color::from_hex("#ff8000").unwrap(),
            Color {
                r: 255,
                g: 128,
                b: 0
            }
        );
        assert_eq!(Color::from_hex("#FFF").unwrap().to_hex(), "#ffffff");
        assert_eq!(Color::GRAY.to_string(), "#808080");

        for bad in ["ff8000", "#ff80", "#gg0000", "", "#"] {
            assert!(Color::from_hex(bad).is_err(), "{} should not parse", bad);
        }
    }
}
