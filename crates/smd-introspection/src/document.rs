// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Service Mapping Description document types.
//!
//! See: http://www.simple-is-better.org/json-rpc/jsonrpc20-smd.html

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::reflection::deserialize_present;
use crate::types::SmdType;

/// The root SMD document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmdDocument {
    /// Transport used by the calls (e.g. "POST")
    pub transport: String,
    /// The protocol name (e.g. "JSON-RPC-2.0")
    pub envelope: String,
    #[serde(
        rename = "contentType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub content_type: Option<String>,
    /// The SMD specification version (e.g. "2.0")
    #[serde(rename = "SMDVersion")]
    pub smd_version: String,
    /// The URL receiving the calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// The available services keyed by their published name
    pub services: IndexMap<String, ServiceEntry>,
}

impl SmdDocument {
    pub fn new(
        transport: impl Into<String>,
        envelope: impl Into<String>,
        smd_version: impl Into<String>,
    ) -> Self {
        Self {
            transport: transport.into(),
            envelope: envelope.into(),
            content_type: None,
            smd_version: smd_version.into(),
            target: None,
            services: IndexMap::new(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_services(mut self, services: IndexMap<String, ServiceEntry>) -> Self {
        self.services = services;
        self
    }
}

/// A single published service (one method of a registered class).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub transport: String,
    /// Set by the envelope formatter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envelope: Option<String>,
    #[serde(
        rename = "contentType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub parameters: Vec<ServiceParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<SmdType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl ServiceEntry {
    pub fn new(transport: impl Into<String>) -> Self {
        Self {
            transport: transport.into(),
            envelope: None,
            content_type: None,
            description: None,
            parameters: Vec::new(),
            returns: None,
            target: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_parameter(mut self, parameter: ServiceParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_returns(mut self, returns: SmdType) -> Self {
        self.returns = Some(returns);
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

/// Describes a service parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceParameter {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub parameter_type: Option<SmdType>,
    pub optional: bool,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ServiceParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameter_type: None,
            optional: false,
            default: None,
            description: None,
        }
    }

    pub fn with_type(mut self, parameter_type: SmdType) -> Self {
        self.parameter_type = Some(parameter_type);
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
