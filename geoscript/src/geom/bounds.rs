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
use feature_engine::Envelope;
use serde_json::Value;

use crate::config::ConfigMap;

/// Axis aligned bounding box, optionally tagged with the projection of the
/// geometry it was taken from.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub projection: Option<String>,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Bounds {
        Bounds {
            min_x,
            min_y,
            max_x,
            max_y,
            projection: None,
        }
    }

    pub(crate) fn from_envelope(envelope: Envelope, projection: Option<&str>) -> Bounds {
        Bounds {
            projection: projection.map(str::to_string),
            ..Bounds::new(envelope.min_x, envelope.min_y, envelope.max_x, envelope.max_y)
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Smallest bounds covering both.  Keeps this projection.
    pub fn include(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
            projection: self.projection.clone(),
        }
    }

    pub fn config(&self) -> ConfigMap {
        let mut config = ConfigMap::new();
        config.insert("type".to_string(), Value::from("Bounds"));
        config.insert("min_x".to_string(), Value::from(self.min_x));
        config.insert("min_y".to_string(), Value::from(self.min_y));
        config.insert("max_x".to_string(), Value::from(self.max_x));
        config.insert("max_y".to_string(), Value::from(self.max_y));
        if let Some(projection) = &self.projection {
            config.insert("projection".to_string(), Value::from(projection.as_str()));
        }
        config
    }
}

impl From<Envelope> for Bounds {
    fn from(envelope: Envelope) -> Bounds {
        Bounds::from_envelope(envelope, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_include() {
        let a = Bounds::new(0.0, 0.0, 2.0, 1.0);
        let b = Bounds::new(-1.0, 0.5, 1.0, 4.0);
        let both = a.include(&b);

        assert_eq!(both, Bounds::new(-1.0, 0.0, 2.0, 4.0));
        assert_eq!(both.width(), 3.0);
        assert_eq!(both.height(), 4.0);
    }

    #[test]
    fn test_config() {
        let envelope = Envelope {
            min_x: 1.0,
            min_y: 2.0,
            max_x: 3.0,
            max_y: 4.0,
        };
        let bounds = Bounds::from_envelope(envelope, Some("EPSG:4326"));
        assert_eq!(
            Value::Object(bounds.config()),
            json!({
                "type": "Bounds",
                "min_x": 1.0,
                "min_y": 2.0,
                "max_x": 3.0,
                "max_y": 4.0,
                "projection": "EPSG:4326"
            })
        );
        assert!(Bounds::from(envelope).projection.is_none());
    }
}
