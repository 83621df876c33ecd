// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Service descriptor builder.
//!
//! Reflects one class and turns each of its publishable methods into a [`MethodEntry`].
//! A method is publishable when it is public, declared by the class itself (not inherited)
//! and not special (constructors, destructors, `__`-prefixed magic methods).
//!
//! Types come from the declared signature first, then from the `@param`/`@return` doc tags,
//! and finally (for parameters) from the JSON kind of the default value.

use tracing::{debug, trace};
use url::Url;

use crate::config::SmdConfig;
use crate::doc_comment::DocBlock;
use crate::document::{ServiceEntry, ServiceParameter};
use crate::error::ReflectionError;
use crate::reflection::{ClassShape, MethodShape, ParameterShape, Reflector};
use crate::types::{SmdType, TypeHint};

/// The services published by one registered class.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDescriptor {
    /// The class these entries were reflected from
    pub class_name: String,
    /// Entries in the order the reflector reported the methods
    pub entries: Vec<MethodEntry>,
}

/// A published method: its service name and the service payload.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodEntry {
    pub name: String,
    pub service: ServiceEntry,
}

/// Reflect `class` and build its descriptor.
///
/// Returns `Ok(None)` if the configured service validator rejects the class.
pub fn build_descriptor(
    reflector: &dyn Reflector,
    class: &str,
    config: &SmdConfig,
) -> Result<Option<ServiceDescriptor>, ReflectionError> {
    let class_shape = reflector.reflect(class)?;

    if let Some(validator) = &config.service_validator
        && !validator(&class_shape)
    {
        debug!(class = %class_shape.name, "Class rejected by the service validator");
        return Ok(None);
    }

    let entries = class_shape
        .methods
        .iter()
        .filter(|method| is_publishable(&class_shape, method))
        .map(|method| method.build_method_entry(&class_shape, config))
        .collect();

    Ok(Some(ServiceDescriptor {
        class_name: class_shape.name,
        entries,
    }))
}

fn is_publishable(class: &ClassShape, method: &MethodShape) -> bool {
    let publishable = method.is_public() && !method.is_special() && method.is_declared_by(class);
    if !publishable {
        trace!(class = %class.name, method = %method.name, "Skipping method");
    }
    publishable
}

/// The published name of a method when no name resolver is configured.
pub fn default_service_name(class: &ClassShape, method: &MethodShape) -> String {
    format!("{}.{}", class.short_name(), method.name)
}

/// Appends the URL-escaped service name to `base` as a final path segment.
pub fn canonical_target(base: &str, service_name: &str) -> String {
    match Url::parse(base) {
        Ok(mut url) if !url.cannot_be_a_base() => {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.pop_if_empty().push(service_name);
            }
            url.to_string()
        }
        // Relative targets such as `/rpc`
        _ => format!(
            "{}/{}",
            base.trim_end_matches('/'),
            escape_path_segment(service_name)
        ),
    }
}

/// Percent-encodes `segment` the way [`Url`] encodes a pushed path segment.
fn escape_path_segment(segment: &str) -> String {
    let Ok(mut url) = Url::parse("http://localhost/") else {
        return segment.to_string();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push(segment);
    }
    url.path().trim_start_matches('/').to_string()
}

/// Trait for converting a reflected method into a [`MethodEntry`].
trait BuildMethodEntry {
    fn build_method_entry(&self, class: &ClassShape, config: &SmdConfig) -> MethodEntry;
}

/// Trait for converting a reflected parameter into a [`ServiceParameter`].
trait BuildServiceParameter {
    fn build_service_parameter(&self, doc: &DocBlock) -> ServiceParameter;
}

impl BuildMethodEntry for MethodShape {
    fn build_method_entry(&self, class: &ClassShape, config: &SmdConfig) -> MethodEntry {
        let name = match &config.name_resolver {
            Some(resolver) => resolver(class, self),
            None => default_service_name(class, self),
        };
        trace!(class = %class.name, method = %self.name, service = %name, "Building service entry");

        let doc = self.doc.as_deref().map(DocBlock::parse).unwrap_or_default();

        let mut service =
            ServiceEntry::new(&config.transport).with_content_type(&config.content_type);

        if let Some(summary) = &doc.summary {
            service = service.with_description(summary);
        }

        for parameter in &self.parameters {
            service = service.with_parameter(parameter.build_service_parameter(&doc));
        }

        let returns = first_type([
            self.return_type.as_deref(),
            doc.returns.as_ref().map(|r| r.type_name.as_str()),
        ]);
        if let Some((returns, _)) = returns {
            service = service.with_returns(returns);
        }

        if let Some(target) = config.target() {
            service = if config.use_canonical {
                service.with_target(canonical_target(target, &name))
            } else {
                service.with_target(target)
            };
        }

        MethodEntry { name, service }
    }
}

impl BuildServiceParameter for ParameterShape {
    fn build_service_parameter(&self, doc: &DocBlock) -> ServiceParameter {
        let name = self.name.trim_start_matches('$');
        let documented = doc.param(name);

        let mut parameter = ServiceParameter::new(name);

        let typed = first_type([
            self.declared_type.as_deref(),
            documented.and_then(|d| d.type_name.as_deref()),
        ]);
        let nullable = typed.as_ref().is_some_and(|(_, nullable)| *nullable);

        let parameter_type = typed
            .map(|(parameter_type, _)| parameter_type)
            .or_else(|| self.default.as_ref().and_then(SmdType::from_value));
        if let Some(parameter_type) = parameter_type {
            parameter = parameter.with_type(parameter_type);
        }

        if self.has_default() || nullable {
            parameter = parameter.optional();
        }

        if let Some(default) = &self.default {
            parameter = parameter.with_default(default.clone());
        }

        if let Some(description) = documented.and_then(|d| d.description.as_deref()) {
            parameter = parameter.with_description(description);
        }

        parameter
    }
}

/// The first annotation naming a usable type, with its nullability.
fn first_type<const N: usize>(candidates: [Option<&str>; N]) -> Option<(SmdType, bool)> {
    candidates.into_iter().flatten().find_map(|raw| {
        let hint = TypeHint::parse(raw);
        hint.to_smd_type()
            .map(|smd_type| (smd_type, hint.nullable))
    })
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::reflection::{MethodKind, StaticReflector, Visibility};

    fn single(name: &str) -> Option<SmdType> {
        Some(SmdType::Single(name.to_string()))
    }

    fn calculator() -> ClassShape {
        ClassShape::new("App\\Services\\Calculator")
            .with_method(MethodShape::new("__construct").with_kind(MethodKind::Constructor))
            .with_method(
                MethodShape::new("add")
                    .with_parameter(ParameterShape::new("a").with_type("int"))
                    .with_parameter(ParameterShape::new("b").with_type("int"))
                    .with_return_type("int"),
            )
            .with_method(
                MethodShape::new("divide")
                    .with_doc(
                        "/**\n * Divides two numbers.\n * @param float $dividend\n * @param float $divisor never zero\n * @return float\n */",
                    )
                    .with_parameter(ParameterShape::new("dividend"))
                    .with_parameter(ParameterShape::new("$divisor").with_default(1)),
            )
            .with_method(MethodShape::new("audit").with_visibility(Visibility::Protected))
            .with_method(MethodShape::new("__toString"))
            .with_method(MethodShape::new("describe").inherited_from("App\\Services\\Base"))
    }

    fn reflector() -> StaticReflector {
        StaticReflector::new().with_class(calculator())
    }

    fn config() -> SmdConfig {
        SmdConfig::builder().target("http://x/rpc").build()
    }

    #[test]
    fn test_publishable_methods() {
        let descriptor = build_descriptor(&reflector(), "App\\Services\\Calculator", &config())
            .unwrap()
            .unwrap();

        assert_eq!(descriptor.class_name, "App\\Services\\Calculator");
        let names: Vec<&str> = descriptor.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Calculator.add", "Calculator.divide"]);
    }

    #[test]
    fn test_declared_types() {
        let descriptor = build_descriptor(&reflector(), "App\\Services\\Calculator", &config())
            .unwrap()
            .unwrap();
        let add = &descriptor.entries[0].service;

        assert_eq!(add.transport, "POST");
        assert_eq!(add.content_type.as_deref(), Some("application/json"));
        assert_eq!(add.target.as_deref(), Some("http://x/rpc"));
        assert_eq!(add.returns, single("integer"));

        let parameters: Vec<(&str, bool)> = add
            .parameters
            .iter()
            .map(|p| (p.name.as_str(), p.optional))
            .collect();
        assert_eq!(parameters, vec![("a", false), ("b", false)]);
        assert_eq!(add.parameters[0].parameter_type, single("integer"));
    }

    #[test]
    fn test_documented_types() {
        let descriptor = build_descriptor(&reflector(), "App\\Services\\Calculator", &config())
            .unwrap()
            .unwrap();
        let divide = &descriptor.entries[1].service;

        assert_eq!(divide.description.as_deref(), Some("Divides two numbers."));
        assert_eq!(divide.returns, single("number"));

        let dividend = &divide.parameters[0];
        assert_eq!(dividend.parameter_type, single("number"));
        assert!(!dividend.optional);

        let divisor = &divide.parameters[1];
        assert_eq!(divisor.name, "divisor");
        assert_eq!(divisor.parameter_type, single("number"));
        assert!(divisor.optional);
        assert_eq!(divisor.default, Some(Value::from(1)));
        assert_eq!(divisor.description.as_deref(), Some("never zero"));
    }

    #[test]
    fn test_declared_type_wins_over_documented() {
        let class = ClassShape::new("Greeter").with_method(
            MethodShape::new("greet")
                .with_doc("/** @param int $who */")
                .with_parameter(ParameterShape::new("who").with_type("string")),
        );
        let reflector = StaticReflector::new().with_class(class);

        let descriptor = build_descriptor(&reflector, "Greeter", &config())
            .unwrap()
            .unwrap();
        assert_eq!(
            descriptor.entries[0].service.parameters[0].parameter_type,
            single("string")
        );
    }

    #[test]
    fn test_nullable_and_inferred_parameters() {
        let class = ClassShape::new("Greeter").with_method(
            MethodShape::new("greet")
                .with_parameter(ParameterShape::new("who").with_type("?string"))
                .with_parameter(ParameterShape::new("times").with_default(2))
                .with_parameter(ParameterShape::new("suffix").with_default(Value::Null))
                .with_parameter(ParameterShape::new("anything")),
        );
        let reflector = StaticReflector::new().with_class(class);

        let descriptor = build_descriptor(&reflector, "Greeter", &config())
            .unwrap()
            .unwrap();
        let parameters = &descriptor.entries[0].service.parameters;

        assert!(parameters[0].optional);
        assert_eq!(parameters[0].default, None);
        assert_eq!(
            parameters[0].parameter_type,
            Some(SmdType::Union(vec!["string".into(), "null".into()]))
        );

        assert!(parameters[1].optional);
        assert_eq!(parameters[1].parameter_type, single("integer"));

        assert!(parameters[2].optional);
        assert_eq!(parameters[2].parameter_type, None);
        assert_eq!(parameters[2].default, Some(Value::Null));

        assert!(!parameters[3].optional);
        assert_eq!(parameters[3].parameter_type, None);
        assert!(descriptor.entries[0].service.returns.is_none());
    }

    #[test]
    fn test_validator_rejection() {
        let config = SmdConfig::builder()
            .target("http://x/rpc")
            .service_validator(|class| !class.name.ends_with("Calculator"))
            .build();

        let descriptor =
            build_descriptor(&reflector(), "App\\Services\\Calculator", &config).unwrap();
        assert!(descriptor.is_none());
    }

    #[test]
    fn test_unknown_class() {
        let result = build_descriptor(&reflector(), "App\\Missing", &config());
        assert!(matches!(result, Err(ReflectionError::ClassNotFound(_))));
    }

    #[test]
    fn test_name_resolver() {
        let config = SmdConfig::builder()
            .target("http://x/rpc")
            .name_resolver(|class, method| format!("math/{}/{}", class.short_name(), method.name))
            .build();

        let descriptor = build_descriptor(&reflector(), "App\\Services\\Calculator", &config)
            .unwrap()
            .unwrap();
        assert_eq!(descriptor.entries[0].name, "math/Calculator/add");
    }

    #[test]
    fn test_canonical_targets() {
        let config = SmdConfig::builder()
            .target("http://x/rpc")
            .use_canonical(true)
            .build();

        let descriptor = build_descriptor(&reflector(), "App\\Services\\Calculator", &config)
            .unwrap()
            .unwrap();
        assert_eq!(
            descriptor.entries[0].service.target.as_deref(),
            Some("http://x/rpc/Calculator.add")
        );
    }

    #[test]
    fn test_canonical_target_escaping() {
        assert_eq!(
            canonical_target("http://x/rpc/?v=1", "math/Calculator add"),
            "http://x/rpc/math%2FCalculator%20add?v=1"
        );
        assert_eq!(canonical_target("http://x", "Calculator.add"), "http://x/Calculator.add");
        assert_eq!(canonical_target("/rpc/", "Calculator.add"), "/rpc/Calculator.add");
        assert_eq!(canonical_target("/rpc", "a b+c/d"), "/rpc/a%20b+c%2Fd");
    }

    #[test]
    fn test_relative_and_absolute_targets_escape_alike() {
        let absolute = canonical_target("http://x/rpc", "a b+c");
        let relative = canonical_target("/rpc", "a b+c");

        assert_eq!(absolute, "http://x/rpc/a%20b+c");
        assert_eq!(relative, "/rpc/a%20b+c");
        assert_eq!(absolute.rsplit('/').next(), relative.rsplit('/').next());
    }

    #[test]
    fn test_no_target() {
        let descriptor = build_descriptor(
            &reflector(),
            "App\\Services\\Calculator",
            &SmdConfig::default(),
        )
        .unwrap()
        .unwrap();
        assert!(descriptor.entries.iter().all(|e| e.service.target.is_none()));
    }

    #[test]
    fn test_class_without_methods() {
        let reflector = StaticReflector::new().with_class(ClassShape::new("Empty"));

        let descriptor = build_descriptor(&reflector, "Empty", &config())
            .unwrap()
            .unwrap();
        assert!(descriptor.entries.is_empty());
    }
}
