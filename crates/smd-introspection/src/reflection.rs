// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Reflected class shapes and the capability that produces them.
//!
//! The map builder never inspects code by itself. It asks a [`Reflector`] for the shape of a
//! class: its public methods, their parameters (names, declared types, defaults) and their
//! documentation text. [`StaticReflector`] is an in-memory implementation whose shapes are
//! declared in code or loaded from a TOML/JSON manifest.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ReflectionError;

/// Produces the shape of a class given its identifier.
pub trait Reflector: Send + Sync {
    fn reflect(&self, class: &str) -> Result<ClassShape, ReflectionError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ClassShape {
    /// Fully qualified class name (e.g. `App\Services\Calculator` or `app::Calculator`)
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /// Methods in declaration order, including inherited and non-public ones
    #[serde(default)]
    pub methods: Vec<MethodShape>,
}

impl ClassShape {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_name: None,
            doc: None,
            methods: Vec::new(),
        }
    }

    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = Some(short_name.into());
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_method(mut self, method: MethodShape) -> Self {
        self.methods.push(method);
        self
    }

    /// The class name without its namespace.
    ///
    /// Uses the explicit short name if one was provided, otherwise the last segment of the
    /// name when split on `\`, `::`, `.` or `/`.
    pub fn short_name(&self) -> &str {
        if let Some(short_name) = &self.short_name {
            return short_name;
        }

        let name = self.name.as_str();
        name.rsplit(['\\', '.', '/', ':'])
            .find(|segment| !segment.is_empty())
            .unwrap_or(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    #[default]
    Regular,
    Constructor,
    Destructor,
    /// Operator overloads, runtime generated accessors and similar language hooks
    Special,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct MethodShape {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub kind: MethodKind,
    /// The class that declares this method. `None` means the reflected class itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaring_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterShape>,
}

impl MethodShape {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            kind: MethodKind::Regular,
            declaring_class: None,
            doc: None,
            return_type: None,
            parameters: Vec::new(),
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_kind(mut self, kind: MethodKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn inherited_from(mut self, declaring_class: impl Into<String>) -> Self {
        self.declaring_class = Some(declaring_class.into());
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_return_type(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = Some(return_type.into());
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterShape) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// Constructors, destructors, language hooks and `__`-prefixed (magic) methods.
    pub fn is_special(&self) -> bool {
        self.kind != MethodKind::Regular || self.name.starts_with("__")
    }

    pub fn is_declared_by(&self, class: &ClassShape) -> bool {
        match &self.declaring_class {
            Some(declaring_class) => {
                normalize_class_name(declaring_class) == normalize_class_name(&class.name)
            }
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterShape {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<String>,
    /// `Some(Value::Null)` is a parameter whose default is `null`; `None` has no default.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,
}

impl ParameterShape {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
            default: None,
        }
    }

    pub fn with_type(mut self, declared_type: impl Into<String>) -> Self {
        self.declared_type = Some(declared_type.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Distinguishes an explicit `null` from an absent field.
pub(crate) fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn normalize_class_name(name: &str) -> &str {
    name.trim_start_matches('\\')
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct ManifestSer {
    #[serde(default)]
    classes: Vec<ClassShape>,
}

/// A reflector backed by class shapes held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticReflector {
    classes: IndexMap<String, ClassShape>,
}

impl StaticReflector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, class: ClassShape) -> Self {
        self.add_class(class);
        self
    }

    /// Adds (or replaces) a class shape, keyed by its name.
    pub fn add_class(&mut self, class: ClassShape) {
        self.classes
            .insert(normalize_class_name(&class.name).to_string(), class);
    }

    /// Names of all known classes, in the order they were added.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.values().map(|class| class.name.as_str())
    }

    pub fn from_toml_str(manifest: &str) -> Result<Self, ReflectionError> {
        let manifest: ManifestSer = toml::from_str(manifest)
            .map_err(|e| ReflectionError::InvalidManifest(e.to_string()))?;
        Ok(Self::from_manifest(manifest))
    }

    pub fn from_json_str(manifest: &str) -> Result<Self, ReflectionError> {
        let manifest: ManifestSer = serde_json::from_str(manifest)
            .map_err(|e| ReflectionError::InvalidManifest(e.to_string()))?;
        Ok(Self::from_manifest(manifest))
    }

    fn from_manifest(manifest: ManifestSer) -> Self {
        manifest
            .classes
            .into_iter()
            .fold(Self::new(), |reflector, class| reflector.with_class(class))
    }
}

impl Reflector for StaticReflector {
    fn reflect(&self, class: &str) -> Result<ClassShape, ReflectionError> {
        self.classes
            .get(normalize_class_name(class))
            .cloned()
            .ok_or_else(|| ReflectionError::ClassNotFound(class.to_string()))
    }
}
