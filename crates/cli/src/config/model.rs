// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use heck::ToSnakeCase;
use smd_introspection::{ClassShape, CollisionPolicy, MethodShape, NameResolver, SmdConfig};
use wildmatch::WildMatch;

#[derive(Debug, PartialEq, Default)]
pub struct Config {
    pub smd: SmdSettings,
}

/// Settings for the generated map. Every field is optional so that file values can be
/// overridden by command line flags.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SmdSettings {
    pub target: Option<String>,
    pub envelope: Option<String>,
    pub transport: Option<String>,
    pub content_type: Option<String>,
    pub canonical: Option<bool>,
    pub collision: Option<CollisionPolicy>,
    pub name_style: Option<NameStyle>,
    /// Glob patterns of class names to leave out
    pub exclude: Vec<String>,
}

impl SmdSettings {
    /// Values set in `overrides` win over the values in `self`.
    pub fn merge(self, overrides: SmdSettings) -> SmdSettings {
        SmdSettings {
            target: overrides.target.or(self.target),
            envelope: overrides.envelope.or(self.envelope),
            transport: overrides.transport.or(self.transport),
            content_type: overrides.content_type.or(self.content_type),
            canonical: overrides.canonical.or(self.canonical),
            collision: overrides.collision.or(self.collision),
            name_style: overrides.name_style.or(self.name_style),
            exclude: self.exclude.into_iter().chain(overrides.exclude).collect(),
        }
    }

    pub fn to_smd_config(&self) -> SmdConfig {
        let mut builder = SmdConfig::builder();

        if let Some(target) = &self.target {
            builder = builder.target(target);
        }
        if let Some(envelope) = &self.envelope {
            builder = builder.envelope(envelope);
        }
        if let Some(transport) = &self.transport {
            builder = builder.transport(transport);
        }
        if let Some(content_type) = &self.content_type {
            builder = builder.content_type(content_type);
        }
        if let Some(canonical) = self.canonical {
            builder = builder.use_canonical(canonical);
        }
        if let Some(collision) = self.collision {
            builder = builder.collision_policy(collision);
        }

        if !self.exclude.is_empty() {
            let patterns: Vec<WildMatch> = self.exclude.iter().map(|p| WildMatch::new(p)).collect();
            builder = builder.service_validator(move |class: &ClassShape| {
                !patterns.iter().any(|pattern| pattern.matches(&class.name))
            });
        }

        let mut config = builder.build();
        config.name_resolver = self.name_style.and_then(NameStyle::resolver);
        config
    }
}

/// How published service names are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStyle {
    /// `Calculator.add`
    Short,
    /// `App.Services.Calculator.add`
    Full,
    /// `add`
    Method,
    /// `calculator.add_numbers`
    Snake,
}

impl NameStyle {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "short" => Ok(NameStyle::Short),
            "full" => Ok(NameStyle::Full),
            "method" => Ok(NameStyle::Method),
            "snake" => Ok(NameStyle::Snake),
            _ => Err(anyhow!(
                "Invalid name style: {}. Expected one of short, full, method, snake",
                value
            )),
        }
    }

    /// `None` for the built-in `<ShortClassName>.<method>` naming.
    pub fn resolver(self) -> Option<NameResolver> {
        let resolve: fn(&ClassShape, &MethodShape) -> String = match self {
            NameStyle::Short => return None,
            NameStyle::Full => |class, method| {
                let class_name = class
                    .name
                    .replace("::", ".")
                    .replace(['\\', '/'], ".");
                format!("{}.{}", class_name.trim_start_matches('.'), method.name)
            },
            NameStyle::Method => |_, method| method.name.clone(),
            NameStyle::Snake => |class, method| {
                format!(
                    "{}.{}",
                    class.short_name().to_snake_case(),
                    method.name.to_snake_case()
                )
            },
        };
        let resolver: NameResolver = Arc::new(resolve);
        Some(resolver)
    }
}

pub fn parse_collision_policy(value: &str) -> Result<CollisionPolicy> {
    match value {
        "overwrite" => Ok(CollisionPolicy::Overwrite),
        "fail" => Ok(CollisionPolicy::Fail),
        _ => Err(anyhow!(
            "Invalid collision policy: {}. Expected overwrite or fail",
            value
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(style: NameStyle, class: &str, method: &str) -> Option<String> {
        style
            .resolver()
            .map(|resolver| resolver(&ClassShape::new(class), &MethodShape::new(method)))
    }

    #[test]
    fn test_name_styles() {
        assert_eq!(resolve(NameStyle::Short, "App\\Calculator", "add"), None);
        assert_eq!(
            resolve(NameStyle::Full, "\\App\\Services\\Calculator", "add").as_deref(),
            Some("App.Services.Calculator.add")
        );
        assert_eq!(
            resolve(NameStyle::Full, "app::Calculator", "add").as_deref(),
            Some("app.Calculator.add")
        );
        assert_eq!(
            resolve(NameStyle::Method, "App\\Calculator", "add").as_deref(),
            Some("add")
        );
        assert_eq!(
            resolve(NameStyle::Snake, "App\\MathTools", "addNumbers").as_deref(),
            Some("math_tools.add_numbers")
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!(NameStyle::parse("full").unwrap(), NameStyle::Full);
        assert!(NameStyle::parse("kebab").is_err());
        assert_eq!(parse_collision_policy("fail").unwrap(), CollisionPolicy::Fail);
        assert!(parse_collision_policy("merge").is_err());
    }

    #[test]
    fn test_merge() {
        let file = SmdSettings {
            target: Some("http://file/rpc".to_string()),
            envelope: Some("V1".to_string()),
            exclude: vec!["App\\Internal\\*".to_string()],
            ..Default::default()
        };
        let flags = SmdSettings {
            target: Some("http://flag/rpc".to_string()),
            canonical: Some(true),
            exclude: vec!["*Test".to_string()],
            ..Default::default()
        };

        let merged = file.merge(flags);
        assert_eq!(merged.target.as_deref(), Some("http://flag/rpc"));
        assert_eq!(merged.envelope.as_deref(), Some("V1"));
        assert_eq!(merged.canonical, Some(true));
        assert_eq!(merged.exclude, vec!["App\\Internal\\*", "*Test"]);
    }

    #[test]
    fn test_to_smd_config() {
        let settings = SmdSettings {
            target: Some("http://x/rpc".to_string()),
            collision: Some(CollisionPolicy::Fail),
            name_style: Some(NameStyle::Method),
            exclude: vec!["App\\Internal\\*".to_string()],
            ..Default::default()
        };

        let config = settings.to_smd_config();
        assert_eq!(config.target(), Some("http://x/rpc"));
        assert_eq!(config.envelope, "V2");
        assert_eq!(config.collision_policy, CollisionPolicy::Fail);
        assert!(config.name_resolver.is_some());

        let validator = config.service_validator.unwrap();
        assert!(!validator(&ClassShape::new("App\\Internal\\Secrets")));
        assert!(validator(&ClassShape::new("App\\Calculator")));
    }
}
