// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmdError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    Reflection(#[from] ReflectionError),

    #[error("Service '{0}' is published by more than one method")]
    DuplicateService(String),

    #[error("Unable to serialize the service map: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ReflectionError {
    #[error("Class '{0}' could not be resolved")]
    ClassNotFound(String),

    #[error("Invalid class manifest: {0}")]
    InvalidManifest(String),
}
