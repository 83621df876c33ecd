// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Envelope formatters wrap the merged service map into the final document.
//!
//! Formatters are looked up by name in a static registry. The default, `V2`, produces the
//! JSON-RPC 2.0 SMD shape; `V1` describes JSON-RPC 1.0 endpoints.

use indexmap::IndexMap;

use crate::config::SmdConfig;
use crate::document::{ServiceEntry, SmdDocument};
use crate::error::SmdError;

pub const SMD_VERSION: &str = "2.0";

pub trait EnvelopeFormatter {
    /// The registry name of this formatter
    fn name(&self) -> &'static str;

    fn format(&self, config: &SmdConfig, services: IndexMap<String, ServiceEntry>) -> SmdDocument;
}

/// JSON-RPC 2.0 envelope.
pub struct V2;

impl V2 {
    pub const PROTOCOL: &'static str = "JSON-RPC-2.0";
}

impl EnvelopeFormatter for V2 {
    fn name(&self) -> &'static str {
        "V2"
    }

    fn format(&self, config: &SmdConfig, services: IndexMap<String, ServiceEntry>) -> SmdDocument {
        let mut document = SmdDocument::new(&config.transport, Self::PROTOCOL, SMD_VERSION)
            .with_content_type(&config.content_type)
            .with_services(stamp_envelope(services, Self::PROTOCOL));

        if let Some(target) = config.target() {
            document = document.with_target(target);
        }
        document
    }
}

/// JSON-RPC 1.0 envelope. Carries no top-level content type.
pub struct V1;

impl V1 {
    pub const PROTOCOL: &'static str = "JSON-RPC-1.0";
}

impl EnvelopeFormatter for V1 {
    fn name(&self) -> &'static str {
        "V1"
    }

    fn format(&self, config: &SmdConfig, services: IndexMap<String, ServiceEntry>) -> SmdDocument {
        let mut document = SmdDocument::new(&config.transport, Self::PROTOCOL, SMD_VERSION)
            .with_services(stamp_envelope(services, Self::PROTOCOL));

        if let Some(target) = config.target() {
            document = document.with_target(target);
        }
        document
    }
}

type FormatterFactory = fn() -> Box<dyn EnvelopeFormatter>;

const FORMATTERS: &[(&str, FormatterFactory)] = &[("V1", v1), ("V2", v2)];

fn v1() -> Box<dyn EnvelopeFormatter> {
    Box::new(V1)
}

fn v2() -> Box<dyn EnvelopeFormatter> {
    Box::new(V2)
}

/// Look up an envelope formatter by name.
pub fn resolve_formatter(name: &str) -> Result<Box<dyn EnvelopeFormatter>, SmdError> {
    FORMATTERS
        .iter()
        .find(|(formatter_name, _)| *formatter_name == name)
        .map(|(_, factory)| factory())
        .ok_or_else(|| {
            SmdError::Configuration(format!(
                "Unknown envelope format '{name}' (available: {})",
                available_formatters().join(", ")
            ))
        })
}

pub fn available_formatters() -> Vec<&'static str> {
    FORMATTERS.iter().map(|(name, _)| *name).collect()
}

fn stamp_envelope(
    services: IndexMap<String, ServiceEntry>,
    protocol: &str,
) -> IndexMap<String, ServiceEntry> {
    services
        .into_iter()
        .map(|(name, mut service)| {
            service.envelope.get_or_insert_with(|| protocol.to_string());
            (name, service)
        })
        .collect()
}
