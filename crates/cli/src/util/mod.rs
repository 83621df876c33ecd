// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use anyhow::{Result, anyhow};
use smd_introspection::StaticReflector;
use std::{
    fs::File,
    io::{Write, stdout},
    path::Path,
};

pub fn open_file_for_output(output: Option<&Path>) -> Result<Box<dyn Write + Send>> {
    match output {
        Some(output) => {
            let file = File::create(output)
                .map_err(|e| anyhow!("Failed to create '{}': {}", output.display(), e))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(stdout())),
    }
}

/// Load a class manifest. Files with a `.json` extension are read as JSON, anything else as TOML.
pub fn load_manifest(path: &Path) -> Result<StaticReflector> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read manifest '{}': {}", path.display(), e))?;

    let is_json = path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));

    let reflector = if is_json {
        StaticReflector::from_json_str(&content)
    } else {
        StaticReflector::from_toml_str(&content)
    };

    reflector.map_err(|e| anyhow!("{} ('{}')", e, path.display()))
}
