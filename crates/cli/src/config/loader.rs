// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::Path;

use anyhow::{Result, anyhow};
use serde::Deserialize;
use tracing::debug;

use super::model::{Config, NameStyle, SmdSettings, parse_collision_policy};

const CONFIG_FILE: &str = "smd.toml";

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigSer {
    pub smd: Option<SmdSer>,
}

#[derive(Deserialize, Debug, PartialEq, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct SmdSer {
    pub target: Option<String>,
    pub envelope: Option<String>,
    pub transport: Option<String>,
    pub content_type: Option<String>,
    pub canonical: Option<bool>,
    pub collision: Option<String>,
    pub name_style: Option<String>,
    pub exclude: Option<Vec<String>>,
}

impl TryFrom<ConfigSer> for Config {
    type Error = anyhow::Error;

    fn try_from(config: ConfigSer) -> Result<Self, Self::Error> {
        Ok(Config {
            smd: config
                .smd
                .map(SmdSettings::try_from)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

impl TryFrom<SmdSer> for SmdSettings {
    type Error = anyhow::Error;

    fn try_from(config: SmdSer) -> Result<Self, Self::Error> {
        Ok(SmdSettings {
            target: config.target,
            envelope: config.envelope,
            transport: config.transport,
            content_type: config.content_type,
            canonical: config.canonical,
            collision: config
                .collision
                .as_deref()
                .map(parse_collision_policy)
                .transpose()?,
            name_style: config
                .name_style
                .as_deref()
                .map(NameStyle::parse)
                .transpose()?,
            exclude: config.exclude.unwrap_or_default(),
        })
    }
}

fn load_config_from_file(path: &Path) -> Result<Config> {
    let toml_str = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read file '{}': {}", path.display(), e))?;
    let config: ConfigSer = toml::from_str(&toml_str)
        .map_err(|e| anyhow!("Failed to parse TOML file '{}': {}", path.display(), e))?;

    config.try_into()
}

/// Load `smd.toml` from the current directory, if present.
pub fn load_config() -> Result<Config> {
    let config_path = Path::new(CONFIG_FILE);

    if !config_path.exists() {
        return Ok(Config::default());
    }

    debug!(path = %config_path.display(), "Loading configuration");
    load_config_from_file(config_path)
}
