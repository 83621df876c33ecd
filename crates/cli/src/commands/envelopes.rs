// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use anyhow::Result;
use clap::{ArgMatches, Command};
use smd_introspection::{available_formatters, resolve_formatter};

use crate::config::Config;

use super::command::CommandDefinition;

pub(crate) struct EnvelopesCommandDefinition {}

impl CommandDefinition for EnvelopesCommandDefinition {
    fn command(&self) -> Command {
        Command::new("envelopes").about("List the available envelope formats")
    }

    fn execute(&self, _matches: &ArgMatches, config: &Config) -> Result<()> {
        let configured = config.smd.envelope.as_deref();

        for name in available_formatters() {
            let formatter = resolve_formatter(name)?;
            let marker = if configured == Some(formatter.name()) {
                " (configured)"
            } else {
                ""
            };
            println!("{name}{marker}");
        }

        Ok(())
    }
}
