// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt;
use std::sync::Arc;

use crate::reflection::{ClassShape, MethodShape};

pub const DEFAULT_TRANSPORT: &str = "POST";
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";
pub const DEFAULT_ENVELOPE: &str = "V2";

/// Decides whether a reflected class may be published. Returning `false` excludes the class.
pub type ServiceValidator = Arc<dyn Fn(&ClassShape) -> bool + Send + Sync>;

/// Produces the published service name of a method.
pub type NameResolver = Arc<dyn Fn(&ClassShape, &MethodShape) -> String + Send + Sync>;

/// What to do when two methods publish the same service name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// The later registration replaces the earlier entry
    #[default]
    Overwrite,
    /// Building the map fails with [`crate::SmdError::DuplicateService`]
    Fail,
}

/// Immutable configuration of a service map. Built with [`SmdConfig::builder`].
#[derive(Clone)]
pub struct SmdConfig {
    pub transport: String,
    pub content_type: String,
    /// Name of the envelope formatter (see [`crate::envelope::resolve_formatter`])
    pub envelope: String,
    pub target: Option<String>,
    /// Give each method its own target derived from the service name
    pub use_canonical: bool,
    pub service_validator: Option<ServiceValidator>,
    pub name_resolver: Option<NameResolver>,
    pub collision_policy: CollisionPolicy,
}

impl SmdConfig {
    pub fn builder() -> SmdConfigBuilder {
        SmdConfigBuilder::default()
    }

    /// The target, if set to a non-empty value.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref().filter(|target| !target.is_empty())
    }
}

impl Default for SmdConfig {
    fn default() -> Self {
        Self {
            transport: DEFAULT_TRANSPORT.to_string(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            envelope: DEFAULT_ENVELOPE.to_string(),
            target: None,
            use_canonical: false,
            service_validator: None,
            name_resolver: None,
            collision_policy: CollisionPolicy::default(),
        }
    }
}

impl fmt::Debug for SmdConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmdConfig")
            .field("transport", &self.transport)
            .field("content_type", &self.content_type)
            .field("envelope", &self.envelope)
            .field("target", &self.target)
            .field("use_canonical", &self.use_canonical)
            .field("service_validator", &self.service_validator.is_some())
            .field("name_resolver", &self.name_resolver.is_some())
            .field("collision_policy", &self.collision_policy)
            .finish()
    }
}

#[derive(Default)]
pub struct SmdConfigBuilder {
    config: SmdConfig,
}

impl SmdConfigBuilder {
    pub fn transport(mut self, transport: impl Into<String>) -> Self {
        self.config.transport = transport.into();
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.config.content_type = content_type.into();
        self
    }

    pub fn envelope(mut self, envelope: impl Into<String>) -> Self {
        self.config.envelope = envelope.into();
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.config.target = Some(target.into());
        self
    }

    pub fn use_canonical(mut self, use_canonical: bool) -> Self {
        self.config.use_canonical = use_canonical;
        self
    }

    pub fn service_validator(
        mut self,
        validator: impl Fn(&ClassShape) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.config.service_validator = Some(Arc::new(validator));
        self
    }

    pub fn name_resolver(
        mut self,
        resolver: impl Fn(&ClassShape, &MethodShape) -> String + Send + Sync + 'static,
    ) -> Self {
        self.config.name_resolver = Some(Arc::new(resolver));
        self
    }

    pub fn collision_policy(mut self, collision_policy: CollisionPolicy) -> Self {
        self.config.collision_policy = collision_policy;
        self
    }

    pub fn build(self) -> SmdConfig {
        self.config
    }
}
