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
pub enum EngineError {
    #[error("Unknown binding '{0}'")]
    UnknownBinding(String),
    #[error("Builder method '{}' is missing required property '{}'", method_name, property)]
    MissingProperty {
        property: &'static str,
        method_name: &'static str,
    },
    #[error("Duplicate attribute '{}' in feature type '{}'", name, type_name)]
    DuplicateAttribute { name: String, type_name: String },
    #[error("Invalid geometry on method {}: {}", method_name, msg)]
    InvalidGeometry {
        method_name: &'static str,
        msg: String,
    },
    #[error(
        "Value of kind {} is not compatible with attribute '{}' bound to {}",
        found, name, binding
    )]
    IncompatibleValue {
        name: String,
        binding: &'static str,
        found: &'static str,
    },
    #[error("Attribute '{}' is not nillable", name)]
    NotNillable { name: String },
    #[error("Invalid attribute index {} used on method {}", index, method_name)]
    InvalidAttributeIndex {
        index: usize,
        method_name: &'static str,
    },
    #[error("Invalid color '{0}', expected #rgb or #rrggbb")]
    InvalidColor(String),
}
