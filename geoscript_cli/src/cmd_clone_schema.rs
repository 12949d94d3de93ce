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

use anyhow::Result;
use geoscript::config::read_config_file;
use geoscript::feature::Schema;
use geoscript::Context;
use log::info;
use structopt::StructOpt;

#[derive(StructOpt)]
pub struct CloneSchemaArgs {
    #[structopt(parse(from_os_str), long)]
    config: PathBuf,

    #[structopt(parse(from_os_str), long = "override")]
    override_config: PathBuf,
}

pub fn clone_schema(args: &CloneSchemaArgs) -> Result<()> {
    let context = Context::default();

    let schema = Schema::new(&context, &read_config_file(&args.config)?)?;
    let overrides = read_config_file(&args.override_config)?;
    let cloned = schema.clone_with(&overrides)?;
    info!(
        "Cloned schema {} with {} fields into {} fields",
        schema.name(),
        schema.len(),
        cloned.len()
    );

    println!("{}", serde_json::to_string_pretty(&cloned.config())?);
    Ok(())
}
