// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! A minimal parser for documentation comments.
//!
//! Understands `/** ... */` blocks and `///` line comments. Only the leading free text and the
//! `@param` and `@return` (or `@returns`) tags are extracted; every other tag is ignored.
//!
//! ```text
//! /**
//!  * Adds two numbers.
//!  *
//!  * @param int $a The first operand
//!  * @param int $b
//!  * @return int
//!  */
//! ```

use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocBlock {
    /// The first paragraph of free text
    pub summary: Option<String>,
    /// All free text preceding the first tag
    pub description: Option<String>,
    /// `@param` tags keyed by parameter name (without the `$` sigil)
    pub params: IndexMap<String, DocParam>,
    pub returns: Option<DocReturn>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocParam {
    pub type_name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocReturn {
    pub type_name: String,
    pub description: Option<String>,
}

enum OpenTag {
    Param(String),
    Return,
    Other,
}

impl DocBlock {
    pub fn parse(text: &str) -> Self {
        let mut block = DocBlock::default();
        let mut paragraphs: Vec<Vec<&str>> = vec![vec![]];
        let mut open_tag: Option<OpenTag> = None;

        for line in text.lines().map(strip_comment_markers) {
            if let Some(tag_line) = line.strip_prefix('@') {
                open_tag = Some(block.parse_tag(tag_line));
                continue;
            }

            match &open_tag {
                None if line.is_empty() => {
                    if paragraphs.last().is_some_and(|p| !p.is_empty()) {
                        paragraphs.push(vec![]);
                    }
                }
                None => {
                    if let Some(paragraph) = paragraphs.last_mut() {
                        paragraph.push(line);
                    }
                }
                Some(_) if line.is_empty() => {}
                Some(tag) => block.continue_tag(tag, line),
            }
        }

        let paragraphs: Vec<String> = paragraphs
            .into_iter()
            .filter(|p| !p.is_empty())
            .map(|p| p.join(" "))
            .collect();

        block.summary = paragraphs.first().cloned();
        if !paragraphs.is_empty() {
            block.description = Some(paragraphs.join("\n\n"));
        }

        block
    }

    pub fn param(&self, name: &str) -> Option<&DocParam> {
        self.params.get(variable_name(name))
    }

    fn parse_tag(&mut self, tag_line: &str) -> OpenTag {
        let (tag, rest) = split_word(tag_line);

        match tag {
            "param" => {
                let (first, rest) = split_word(rest);
                let is_variable = first.trim_start_matches(['&', '.']).starts_with('$');
                let (type_name, name, rest) = if is_variable {
                    (None, first, rest)
                } else {
                    let (name, rest) = split_word(rest);
                    (non_empty(first), name, rest)
                };

                let name = variable_name(name);
                if name.is_empty() {
                    return OpenTag::Other;
                }

                self.params.insert(
                    name.to_string(),
                    DocParam {
                        type_name: type_name.map(str::to_string),
                        description: non_empty(rest).map(str::to_string),
                    },
                );
                OpenTag::Param(name.to_string())
            }
            "return" | "returns" => {
                let (type_name, rest) = split_word(rest);
                match non_empty(type_name) {
                    Some(type_name) => {
                        self.returns = Some(DocReturn {
                            type_name: type_name.to_string(),
                            description: non_empty(rest).map(str::to_string),
                        });
                        OpenTag::Return
                    }
                    None => OpenTag::Other,
                }
            }
            _ => OpenTag::Other,
        }
    }

    fn continue_tag(&mut self, tag: &OpenTag, line: &str) {
        let description = match tag {
            OpenTag::Param(name) => self
                .params
                .get_mut(name)
                .map(|param| &mut param.description),
            OpenTag::Return => self.returns.as_mut().map(|returns| &mut returns.description),
            OpenTag::Other => None,
        };

        if let Some(description) = description {
            match description {
                Some(existing) => {
                    existing.push(' ');
                    existing.push_str(line);
                }
                None => *description = Some(line.to_string()),
            }
        }
    }
}

fn strip_comment_markers(line: &str) -> &str {
    let line = line.trim();
    let line = line.strip_suffix("*/").unwrap_or(line).trim_end();
    let line = line
        .strip_prefix("/**")
        .or_else(|| line.strip_prefix("/*"))
        .or_else(|| line.strip_prefix("///"))
        .or_else(|| line.strip_prefix("//!"))
        .unwrap_or(line);
    let line = line.trim_start();
    line.strip_prefix('*').unwrap_or(line).trim()
}

/// Strips the by-reference, variadic and `$` markers of a parameter name (`&...$args`).
fn variable_name(word: &str) -> &str {
    let word = word.trim_start_matches('&');
    let word = word.strip_prefix("...").unwrap_or(word);
    word.trim_start_matches('$')
}

fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    }
}

fn non_empty(text: &str) -> Option<&str> {
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_comment() {
        let doc = DocBlock::parse(
            r#"/**
              * Adds two numbers.
              * Works with negatives too.
              *
              * Second paragraph.
              *
              * @param int $a The first operand
              * @param int|null $b
              *        defaults to zero
              * @throws \InvalidArgumentException
              * @return int the sum
              */"#,
        );

        assert_eq!(
            doc.summary.as_deref(),
            Some("Adds two numbers. Works with negatives too.")
        );
        assert_eq!(
            doc.description.as_deref(),
            Some("Adds two numbers. Works with negatives too.\n\nSecond paragraph.")
        );

        let names: Vec<&str> = doc.params.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["a", "b"]);

        let a = doc.param("$a").unwrap();
        assert_eq!(a.type_name.as_deref(), Some("int"));
        assert_eq!(a.description.as_deref(), Some("The first operand"));

        let b = doc.param("b").unwrap();
        assert_eq!(b.type_name.as_deref(), Some("int|null"));
        assert_eq!(b.description.as_deref(), Some("defaults to zero"));

        let returns = doc.returns.unwrap();
        assert_eq!(returns.type_name, "int");
        assert_eq!(returns.description.as_deref(), Some("the sum"));
    }

    #[test]
    fn test_line_comments() {
        let doc = DocBlock::parse(
            "/// Greets someone.\n/// @param $name who to greet\n/// @returns string",
        );

        assert_eq!(doc.summary.as_deref(), Some("Greets someone."));
        let name = doc.param("name").unwrap();
        assert_eq!(name.type_name, None);
        assert_eq!(name.description.as_deref(), Some("who to greet"));
        assert_eq!(doc.returns.unwrap().type_name, "string");
    }

    #[test]
    fn test_single_line_block() {
        let doc = DocBlock::parse("/** @return bool */");

        assert_eq!(doc.summary, None);
        assert_eq!(doc.description, None);
        assert_eq!(doc.returns.unwrap().type_name, "bool");
    }

    #[test]
    fn test_incomplete_tags_ignored() {
        let doc = DocBlock::parse("/**\n * @param int\n * @return\n */");

        assert!(doc.params.is_empty());
        assert!(doc.returns.is_none());
    }

    #[test]
    fn test_variadic_and_reference_params() {
        let doc = DocBlock::parse(
            "/**\n * @param int ...$values numbers to add\n * @param array &$out\n * @param ...$rest\n */",
        );

        let values = doc.param("values").unwrap();
        assert_eq!(values.type_name.as_deref(), Some("int"));
        assert_eq!(values.description.as_deref(), Some("numbers to add"));
        assert_eq!(doc.param("out").unwrap().type_name.as_deref(), Some("array"));
        assert_eq!(doc.param("$rest").unwrap().type_name, None);
    }

    #[test]
    fn test_empty() {
        assert_eq!(DocBlock::parse(""), DocBlock::default());
    }
}
