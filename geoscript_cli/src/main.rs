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
use anyhow::Result;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use structopt::StructOpt;

use crate::cmd_clone_schema::{clone_schema, CloneSchemaArgs};
use crate::cmd_create::{run_create, CreateArgs};
use crate::cmd_factories::print_factories;
use crate::cmd_normalize::{run_normalize, NormalizeArgs};

mod cmd_clone_schema;
mod cmd_create;
mod cmd_factories;
mod cmd_normalize;

#[derive(StructOpt)]
struct Cli {
    #[structopt(long, default_value = "Warn")]
    log_level: LevelFilter,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(StructOpt)]
enum Command {
    #[structopt(help = "Builds the wrapper a configuration file describes and prints its configuration")]
    Create(CreateArgs),
    #[structopt(help = "Prints the canonical form of a configuration file")]
    Normalize(NormalizeArgs),
    #[structopt(help = "Lists the registered factories in dispatch order")]
    Factories,
    #[structopt(help = "Merges override fields into a schema and prints the new schema")]
    Clone(CloneSchemaArgs),
}

fn run() -> Result<()> {
    let args = Cli::from_args();

    SimpleLogger::new().with_level(args.log_level).init()?;

    match &args.cmd {
        Command::Create(r) => {
            run_create(r)?;
        }
        Command::Normalize(r) => {
            run_normalize(r)?;
        }
        Command::Factories => {
            print_factories();
        }
        Command::Clone(r) => {
            clone_schema(r)?;
        }
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
