// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Service Mapping Description (SMD) generation for JSON-RPC services.
//!
//! This crate provides types and utilities for:
//! - Describing classes and their methods (reflection shapes)
//! - Building per-class service descriptors from those shapes
//! - Assembling the descriptors into a JSON-RPC SMD document
//!
//! # Example
//!
//! ```
//! # fn main() -> Result<(), smd_introspection::SmdError> {
//! use std::sync::Arc;
//! use smd_introspection::{ClassShape, MethodShape, ParameterShape, Smd, SmdConfig, StaticReflector};
//!
//! let reflector = StaticReflector::new().with_class(
//!     ClassShape::new("App\\Calculator").with_method(
//!         MethodShape::new("add")
//!             .with_parameter(ParameterShape::new("a").with_type("int"))
//!             .with_parameter(ParameterShape::new("b").with_type("int")),
//!     ),
//! );
//!
//! let config = SmdConfig::builder().target("http://localhost/rpc").build();
//! let mut smd = Smd::new(config, Arc::new(reflector));
//! smd.add_class("App\\Calculator")?;
//!
//! let json = smd.to_json()?;
//! assert!(json.contains("\"Calculator.add\""));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod descriptor;
pub mod doc_comment;
pub mod document;
pub mod envelope;
pub mod error;
pub mod reflection;
pub mod smd;
pub mod types;

// Re-export commonly used types
pub use config::{CollisionPolicy, NameResolver, ServiceValidator, SmdConfig, SmdConfigBuilder};
pub use descriptor::{MethodEntry, ServiceDescriptor, build_descriptor};
pub use document::{ServiceEntry, ServiceParameter, SmdDocument};
pub use envelope::{EnvelopeFormatter, available_formatters, resolve_formatter};
pub use error::{ReflectionError, SmdError};
pub use reflection::{ClassShape, MethodShape, ParameterShape, Reflector, StaticReflector};
pub use smd::Smd;
pub use types::SmdType;
