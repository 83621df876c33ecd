// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::config::Config;

pub trait CommandDefinition {
    fn command(&self) -> Command;

    fn execute(&self, matches: &ArgMatches, config: &Config) -> Result<()>;
}

pub struct SubcommandDefinition {
    pub name: &'static str,
    pub about: &'static str,
    pub command_definitions: Vec<Box<dyn CommandDefinition>>,
}

impl SubcommandDefinition {
    pub fn new(
        name: &'static str,
        about: &'static str,
        command_definitions: Vec<Box<dyn CommandDefinition>>,
    ) -> Self {
        Self {
            name,
            about,
            command_definitions,
        }
    }
}

impl CommandDefinition for SubcommandDefinition {
    fn command(&self) -> Command {
        Command::new(self.name)
            .about(self.about)
            .subcommand_required(true)
            .arg_required_else_help(true)
            .disable_help_subcommand(true)
            .subcommands(
                self.command_definitions
                    .iter()
                    .map(|command_definition| command_definition.command()),
            )
    }

    fn execute(&self, matches: &ArgMatches, config: &Config) -> Result<()> {
        let (name, sub_matches) = matches
            .subcommand()
            .ok_or_else(|| anyhow!("No subcommand given"))?;

        for command_definition in &self.command_definitions {
            if command_definition.command().get_name() == name {
                return command_definition.execute(sub_matches, config);
            }
        }

        Err(anyhow!("Unknown subcommand: {}", name))
    }
}

pub fn get_required<T: Clone + Send + Sync + 'static>(
    matches: &ArgMatches,
    arg_id: &str,
) -> Result<T> {
    get(matches, arg_id).ok_or_else(|| anyhow!("Required argument `{}` is not present", arg_id))
}

pub fn get<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, arg_id: &str) -> Option<T> {
    matches.get_one::<T>(arg_id).cloned()
}

pub fn manifest_arg() -> Arg {
    Arg::new("manifest")
        .help("The path to the class manifest (TOML or JSON).")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .index(1)
}

pub fn output_arg() -> Arg {
    Arg::new("output")
        .help("Output file path")
        .long_help("If specified, the output will be written to this file path instead of stdout.")
        .short('o')
        .long("output")
        .required(false)
        .value_parser(clap::value_parser!(PathBuf))
        .num_args(1)
}

pub fn target_arg() -> Arg {
    Arg::new("target")
        .help("The URL receiving the remote calls")
        .long("target")
        .required(false)
        .num_args(1)
}

pub fn envelope_arg() -> Arg {
    Arg::new("envelope")
        .help("The envelope format (see `smd envelopes`)")
        .long("envelope")
        .required(false)
        .num_args(1)
}

pub fn transport_arg() -> Arg {
    Arg::new("transport")
        .help("The transport used by the calls")
        .long("transport")
        .required(false)
        .num_args(1)
}

pub fn content_type_arg() -> Arg {
    Arg::new("content-type")
        .help("The content type of the calls")
        .long("content-type")
        .required(false)
        .num_args(1)
}

pub fn canonical_arg() -> Arg {
    Arg::new("canonical")
        .help("Give each method its own target URL")
        .long("canonical")
        .required(false)
        .action(ArgAction::SetTrue)
}

pub fn class_arg() -> Arg {
    Arg::new("class")
        .help("Class to publish (repeatable)")
        .long_help("Class to publish. May be repeated. Defaults to every class of the manifest, in manifest order.")
        .long("class")
        .short('c')
        .required(false)
        .action(ArgAction::Append)
        .num_args(1)
}

pub fn pretty_arg() -> Arg {
    Arg::new("pretty")
        .help("Pretty-print the JSON output")
        .long("pretty")
        .required(false)
        .action(ArgAction::SetTrue)
}

pub fn collision_arg() -> Arg {
    Arg::new("collision")
        .help("What to do when two methods publish the same service name")
        .long("collision")
        .required(false)
        .value_parser(["overwrite", "fail"])
        .num_args(1)
}

pub fn name_style_arg() -> Arg {
    Arg::new("name-style")
        .help("How service names are derived")
        .long_help("How service names are derived: `short` (Calculator.add), `full` (App.Services.Calculator.add), `method` (add) or `snake` (calculator.add_numbers).")
        .long("name-style")
        .required(false)
        .value_parser(["short", "full", "method", "snake"])
        .num_args(1)
}

pub fn exclude_arg() -> Arg {
    Arg::new("exclude")
        .help("Glob pattern of class names to leave out (repeatable)")
        .long("exclude")
        .required(false)
        .action(ArgAction::Append)
        .num_args(1)
}
