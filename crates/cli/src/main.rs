// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use anyhow::Result;

use commands::{
    command::{CommandDefinition, SubcommandDefinition},
    envelopes::EnvelopesCommandDefinition,
    generate::GenerateCommandDefinition,
};

mod commands;
mod config;
mod logging;
mod util;

fn subcommand_definition() -> SubcommandDefinition {
    SubcommandDefinition::new(
        "smd",
        "Generate JSON-RPC service mapping descriptions",
        vec![
            Box::new(GenerateCommandDefinition {}),
            Box::new(EnvelopesCommandDefinition {}),
        ],
    )
}

fn main() -> Result<()> {
    logging::init()?;

    let subcommand_definition = subcommand_definition();
    let command = subcommand_definition
        .command()
        .version(env!("CARGO_PKG_VERSION"));
    let matches = command.get_matches();

    let config = config::load_config()?;

    subcommand_definition.execute(&matches, &config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_tree() {
        let command = subcommand_definition().command();
        command.clone().debug_assert();

        let names: Vec<&str> = command.get_subcommands().map(|c| c.get_name()).collect();
        assert_eq!(names, vec!["generate", "envelopes"]);
    }

    #[test]
    fn test_dispatch_to_envelopes() {
        let definition = subcommand_definition();
        let matches = definition.command().get_matches_from(["smd", "envelopes"]);

        assert!(
            definition
                .execute(&matches, &config::Config::default())
                .is_ok()
        );
    }
}
