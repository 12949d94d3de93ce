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
use geoscript::Registry;

/// One line per factory: position, kind and priority
pub fn factory_lines(registry: &Registry) -> Vec<String> {
    registry
        .factories()
        .enumerate()
        .map(|(idx, f)| format!("{:>2} {:<20} priority {}", idx, f.kind().name(), f.priority()))
        .collect()
}

pub fn print_factories() {
    for line in factory_lines(&Registry::with_defaults()) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_lines() {
        let lines = factory_lines(&Registry::with_defaults());
        assert_eq!(lines.len(), 15);
        assert!(lines[0].contains("Schema"));
        assert!(lines[14].ends_with("priority 0"));
    }
}
