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
use thiserror::Error;

#[derive(Clone, PartialEq, Debug, Error)]
pub enum ErrorKind {
    #[error("Invalid configuration for '{}': {}", property, reason)]
    InvalidConfiguration { property: String, reason: String },
    #[error(
        "No registered {} factory handles the configuration (type: {})",
        capability,
        .discriminator.as_deref().unwrap_or("<none>")
    )]
    NoMatchingFactory {
        capability: &'static str,
        discriminator: Option<String>,
    },
    #[error("Type mismatch for '{}': expected {}, found {}", property, expected, found)]
    TypeMismatch {
        property: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Value {} for '{}' is out of range: {}", value, property, constraint)]
    RangeError {
        property: String,
        constraint: &'static str,
        value: String,
    },
    #[error("Invalid field name '{}' used on method {}", field_name, method_name)]
    InvalidFieldName {
        field_name: String,
        method_name: &'static str,
    },
}

impl ErrorKind {
    pub(crate) fn invalid(property: &str, reason: impl Into<String>) -> ErrorKind {
        ErrorKind::InvalidConfiguration {
            property: property.to_string(),
            reason: reason.into(),
        }
    }
}
