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
use geoscript::config::{normalize, read_config_file};
use structopt::StructOpt;

#[derive(StructOpt)]
pub struct NormalizeArgs {
    #[structopt(parse(from_os_str), long)]
    config: PathBuf,
}

pub fn run_normalize(args: &NormalizeArgs) -> Result<()> {
    let value = read_config_file(&args.config)?;
    let config = normalize(&value);

    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
