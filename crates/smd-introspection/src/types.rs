// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Normalization of declared and documented type names into SMD type hints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `type` of a parameter or the `returns` of a service.
///
/// Serialized as a plain string for a single type (`"integer"`) and as an array for a union
/// (`["integer", "null"]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SmdType {
    Single(String),
    Union(Vec<String>),
}

impl SmdType {
    /// The JSON kind of a default value. Has no answer for `null`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let type_name = match value {
            Value::Null => return None,
            Value::Bool(_) => "boolean",
            Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        };
        Some(Self::Single(type_name.to_string()))
    }
}

/// A parsed type annotation such as `?int`, `string|null` or `Option<Vec<u8>>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeHint {
    /// Normalized member types, excluding `null`, without duplicates
    pub types: Vec<String>,
    pub nullable: bool,
}

impl TypeHint {
    pub fn parse(raw: &str) -> Self {
        let mut hint = TypeHint {
            types: vec![],
            nullable: false,
        };
        hint.add_members(raw);
        hint
    }

    /// `None` when the annotation names no usable type (empty, or only `null`).
    pub fn to_smd_type(&self) -> Option<SmdType> {
        let mut types = self.types.clone();
        if types.is_empty() {
            return self
                .nullable
                .then(|| SmdType::Single("null".to_string()));
        }
        if self.nullable {
            types.push("null".to_string());
        }

        match types.len() {
            1 => types.pop().map(SmdType::Single),
            _ => Some(SmdType::Union(types)),
        }
    }

    fn add_members(&mut self, raw: &str) {
        let raw = raw.trim();
        let raw = match raw.strip_prefix('?') {
            Some(inner) => {
                self.nullable = true;
                inner
            }
            None => raw,
        };

        if let Some(inner) = generic_argument(raw, "Option") {
            self.nullable = true;
            self.add_members(inner);
            return;
        }

        for member in split_union(raw) {
            let member = member.trim().trim_start_matches('\\');
            if member.is_empty() {
                continue;
            }
            match normalize(member) {
                Some("null") => self.nullable = true,
                Some(type_name) => {
                    if !self.types.iter().any(|t| t == type_name) {
                        self.types.push(type_name.to_string());
                    }
                }
                None => {}
            }
        }
    }
}

fn normalize(type_name: &str) -> Option<&'static str> {
    let lower = type_name.trim_start_matches('&').to_ascii_lowercase();

    let normalized = match lower.as_str() {
        "" => return None,
        "int" | "integer" | "long" | "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8"
        | "u16" | "u32" | "u64" | "u128" | "usize" => "integer",
        "float" | "double" | "real" | "number" | "f32" | "f64" | "decimal" => "number",
        "bool" | "boolean" | "true" | "false" => "boolean",
        "string" | "str" | "char" => "string",
        "array" | "iterable" | "list" => "array",
        "null" | "void" | "()" => "null",
        "mixed" | "any" => "any",
        _ if lower.ends_with("[]")
            || lower.starts_with('[')
            || lower.starts_with("array<")
            || lower.starts_with("list<")
            || lower.starts_with("vec<") =>
        {
            "array"
        }
        _ => "object",
    };
    Some(normalized)
}

/// The inner text of `Wrapper<inner>`, if `raw` has that form.
fn generic_argument<'a>(raw: &'a str, wrapper: &str) -> Option<&'a str> {
    raw.strip_prefix(wrapper)?
        .strip_prefix('<')?
        .strip_suffix('>')
}

/// Splits on `|` outside of generic brackets.
fn split_union(raw: &str) -> Vec<&str> {
    let mut members = vec![];
    let mut depth = 0usize;
    let mut start = 0;

    for (index, c) in raw.char_indices() {
        match c {
            '<' | '[' | '(' => depth += 1,
            '>' | ']' | ')' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => {
                members.push(&raw[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    members.push(&raw[start..]);
    members
}
