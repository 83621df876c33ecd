// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{ArgMatches, Command};
use smd_introspection::Smd;
use tracing::info;

use crate::config::{Config, NameStyle, SmdSettings, parse_collision_policy};
use crate::util::{load_manifest, open_file_for_output};

use super::command::{
    CommandDefinition, canonical_arg, class_arg, collision_arg, content_type_arg, envelope_arg,
    exclude_arg, get, get_required, manifest_arg, name_style_arg, output_arg, pretty_arg,
    target_arg, transport_arg,
};

pub(crate) struct GenerateCommandDefinition {}

impl CommandDefinition for GenerateCommandDefinition {
    fn command(&self) -> Command {
        Command::new("generate")
            .about("Generate the service map of the classes in a manifest")
            .arg(manifest_arg())
            .arg(target_arg())
            .arg(envelope_arg())
            .arg(transport_arg())
            .arg(content_type_arg())
            .arg(canonical_arg())
            .arg(collision_arg())
            .arg(name_style_arg())
            .arg(exclude_arg())
            .arg(class_arg())
            .arg(pretty_arg())
            .arg(output_arg())
    }

    /// Generate the service map
    fn execute(&self, matches: &ArgMatches, config: &Config) -> Result<()> {
        let manifest: PathBuf = get_required(matches, "manifest")?;
        let output: Option<PathBuf> = get(matches, "output");
        let pretty = matches.get_flag("pretty");

        let settings = config.smd.clone().merge(settings_from_matches(matches)?);
        let reflector = load_manifest(&manifest)?;

        let classes: Vec<String> = match matches.get_many::<String>("class") {
            Some(classes) => classes.cloned().collect(),
            None => reflector.class_names().map(str::to_string).collect(),
        };

        let mut smd = Smd::new(settings.to_smd_config(), Arc::new(reflector));
        smd.add_classes(&classes)?;

        let json = if pretty {
            smd.to_json_pretty()?
        } else {
            smd.to_json()?
        };

        let mut writer = open_file_for_output(output.as_deref())?;
        writeln!(writer, "{json}")?;

        info!(
            classes = smd.services().len(),
            manifest = %manifest.display(),
            "Generated service map"
        );

        Ok(())
    }
}

fn settings_from_matches(matches: &ArgMatches) -> Result<SmdSettings> {
    let collision: Option<String> = get(matches, "collision");
    let name_style: Option<String> = get(matches, "name-style");

    Ok(SmdSettings {
        target: get(matches, "target"),
        envelope: get(matches, "envelope"),
        transport: get(matches, "transport"),
        content_type: get(matches, "content-type"),
        canonical: matches.get_flag("canonical").then_some(true),
        collision: collision
            .as_deref()
            .map(parse_collision_policy)
            .transpose()?,
        name_style: name_style.as_deref().map(NameStyle::parse).transpose()?,
        exclude: matches
            .get_many::<String>("exclude")
            .map(|patterns| patterns.cloned().collect())
            .unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use smd_introspection::CollisionPolicy;

    use super::*;

    #[test]
    fn test_settings_from_matches() {
        let matches = GenerateCommandDefinition {}.command().get_matches_from([
            "generate",
            "classes.toml",
            "--target",
            "http://x/rpc",
            "--canonical",
            "--collision",
            "fail",
            "--name-style",
            "snake",
            "--exclude",
            "*Test",
            "--exclude",
            "App\\Internal\\*",
        ]);

        let settings = settings_from_matches(&matches).unwrap();
        assert_eq!(settings.target.as_deref(), Some("http://x/rpc"));
        assert_eq!(settings.envelope, None);
        assert_eq!(settings.canonical, Some(true));
        assert_eq!(settings.collision, Some(CollisionPolicy::Fail));
        assert_eq!(settings.name_style, Some(NameStyle::Snake));
        assert_eq!(settings.exclude, vec!["*Test", "App\\Internal\\*"]);
    }

    #[test]
    fn test_flags_absent() {
        let matches = GenerateCommandDefinition {}
            .command()
            .get_matches_from(["generate", "classes.toml"]);

        let settings = settings_from_matches(&matches).unwrap();
        assert_eq!(settings, SmdSettings::default());
    }

    #[test]
    fn test_generate_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("classes.toml");
        let output = dir.path().join("smd.json");
        std::fs::write(
            &manifest,
            r#"
            [[classes]]
            name = 'App\Calculator'
            methods = [{ name = "add", parameters = [{ name = "a", type = "int" }, { name = "b", type = "int" }] }]

            [[classes]]
            name = 'App\Internal\Secrets'
            methods = [{ name = "reveal" }]
            "#,
        )
        .unwrap();

        let command = GenerateCommandDefinition {};
        let matches = command.command().get_matches_from([
            "generate",
            manifest.to_str().unwrap(),
            "--target",
            "http://x/rpc",
            "--exclude",
            "App\\Internal\\*",
            "-o",
            output.to_str().unwrap(),
        ]);
        command.execute(&matches, &Config::default()).unwrap();

        let json = std::fs::read_to_string(&output).unwrap();
        assert!(json.contains("\"Calculator.add\""));
        assert!(!json.contains("Secrets.reveal"));
    }

    #[test]
    fn test_generate_without_target_fails() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("classes.json");
        std::fs::write(&manifest, r#"{"classes": [{"name": "Greeter"}]}"#).unwrap();

        let command = GenerateCommandDefinition {};
        let matches = command
            .command()
            .get_matches_from(["generate", manifest.to_str().unwrap()]);

        let error = command.execute(&matches, &Config::default()).unwrap_err();
        assert!(error.to_string().contains("target"));
    }
}
