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
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Result};
use geoscript::config::{read_config_file, ConfigMap};
use geoscript::feature::{Feature, Field, Schema};
use geoscript::geom::Geometry;
use geoscript::style::Symbolizer;
use geoscript::{Context, Layer};
use log::info;
use serde_json::Value;
use structopt::StructOpt;

/// Base capability the configuration must dispatch to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CapabilityArg {
    Schema,
    Field,
    Geometry,
    Feature,
    Layer,
    Symbolizer,
}

impl FromStr for CapabilityArg {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let capability = match s.to_ascii_lowercase().as_str() {
            "schema" => CapabilityArg::Schema,
            "field" => CapabilityArg::Field,
            "geometry" => CapabilityArg::Geometry,
            "feature" => CapabilityArg::Feature,
            "layer" => CapabilityArg::Layer,
            "symbolizer" => CapabilityArg::Symbolizer,
            _ => bail!(
                "Unknown capability '{}', expected schema, field, geometry, feature, layer or symbolizer",
                s
            ),
        };
        Ok(capability)
    }
}

#[derive(StructOpt)]
pub struct CreateArgs {
    #[structopt(parse(from_os_str), long)]
    config: PathBuf,

    #[structopt(long, help = "Only dispatch to factories of this capability")]
    capability: Option<CapabilityArg>,
}

pub fn create_config(
    context: &Context,
    config: &Value,
    capability: Option<CapabilityArg>,
) -> Result<ConfigMap> {
    let config = match capability {
        None => context.create(config)?.config(),
        Some(CapabilityArg::Schema) => context.create_as::<Schema>(config)?.config(),
        Some(CapabilityArg::Field) => context.create_as::<Field>(config)?.config(),
        Some(CapabilityArg::Geometry) => context.create_as::<Geometry>(config)?.config(),
        Some(CapabilityArg::Feature) => context.create_as::<Feature>(config)?.config(),
        Some(CapabilityArg::Layer) => context.create_as::<Layer>(config)?.config(),
        Some(CapabilityArg::Symbolizer) => context.create_as::<Symbolizer>(config)?.config(),
    };
    Ok(config)
}

pub fn run_create(args: &CreateArgs) -> Result<()> {
    let value = read_config_file(&args.config)?;
    info!("Read configuration from {:?}", args.config);

    let context = Context::default();
    let config = create_config(&context, &value, args.capability)?;

    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
