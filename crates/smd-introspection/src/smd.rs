// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The service map assembler.
//!
//! Register classes with [`Smd::add_class`], then produce the document with
//! [`Smd::to_document`] or its JSON text with [`Smd::to_json`].

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::debug;

use crate::config::{CollisionPolicy, SmdConfig};
use crate::descriptor::{ServiceDescriptor, build_descriptor};
use crate::document::{ServiceEntry, SmdDocument};
use crate::envelope::resolve_formatter;
use crate::error::SmdError;
use crate::reflection::Reflector;

pub struct Smd {
    config: SmdConfig,
    reflector: Arc<dyn Reflector>,
    services: Vec<ServiceDescriptor>,
}

impl Smd {
    pub fn new(config: SmdConfig, reflector: Arc<dyn Reflector>) -> Self {
        Self {
            config,
            reflector,
            services: Vec::new(),
        }
    }

    pub fn config(&self) -> &SmdConfig {
        &self.config
    }

    /// Registered descriptors, in registration order.
    pub fn services(&self) -> &[ServiceDescriptor] {
        &self.services
    }

    /// Reflect and register a class.
    ///
    /// A class rejected by the configured service validator is silently left out.
    pub fn add_class(&mut self, class: &str) -> Result<&mut Self, SmdError> {
        if let Some(descriptor) = build_descriptor(self.reflector.as_ref(), class, &self.config)? {
            debug!(
                class = %descriptor.class_name,
                methods = descriptor.entries.len(),
                "Registered class"
            );
            self.services.push(descriptor);
        }
        Ok(self)
    }

    /// Register several classes, in iteration order.
    pub fn add_classes<I, S>(&mut self, classes: I) -> Result<&mut Self, SmdError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for class in classes {
            self.add_class(class.as_ref())?;
        }
        Ok(self)
    }

    /// Build the service map document.
    pub fn to_document(&self) -> Result<SmdDocument, SmdError> {
        if self.config.target().is_none() {
            return Err(SmdError::Configuration("The target is not defined".to_string()));
        }

        let formatter = resolve_formatter(&self.config.envelope)?;
        let services = self.merge_services()?;

        Ok(formatter.format(&self.config, services))
    }

    pub fn to_json(&self) -> Result<String, SmdError> {
        Ok(serde_json::to_string(&self.to_document()?)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, SmdError> {
        Ok(serde_json::to_string_pretty(&self.to_document()?)?)
    }

    fn merge_services(&self) -> Result<IndexMap<String, ServiceEntry>, SmdError> {
        let mut services = IndexMap::new();

        for entry in self.services.iter().flat_map(|d| &d.entries) {
            match services.entry(entry.name.clone()) {
                Entry::Vacant(vacant) => {
                    vacant.insert(entry.service.clone());
                }
                Entry::Occupied(mut occupied) => match self.config.collision_policy {
                    CollisionPolicy::Overwrite => {
                        debug!(service = %entry.name, "Overwriting previously registered service");
                        occupied.insert(entry.service.clone());
                    }
                    CollisionPolicy::Fail => {
                        return Err(SmdError::DuplicateService(entry.name.clone()));
                    }
                },
            }
        }

        Ok(services)
    }
}

impl fmt::Display for Smd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = self.to_json().map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

impl fmt::Debug for Smd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Smd")
            .field("config", &self.config)
            .field("services", &self.services)
            .finish()
    }
}
