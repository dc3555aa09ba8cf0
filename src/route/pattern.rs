//! Placeholder pattern grammar shared by [`Segment`](super::Segment) and
//! [`Hostname`](super::Hostname) routes.
//!
//! ```text
//! /blog/:slug                 required placeholder
//! /users/:id<int>             inline constraint (int, alpha, alnum, slug, uuid or a regex)
//! /files/:path*               wildcard consuming the rest, slashes included
//! /:controller[/:action]      optional group, may nest: [/:a[/:b]]
//! :sub.example.com            hostname form, `.` separates labels
//! \[literal\]                 backslash escapes the next character
//! ```
//!
//! A pattern is compiled once into two regexes: one anchored at both ends for
//! whole-input matching and one anchored only at the start for matching from
//! an offset.

use crate::encoding;
use crate::error::RouterError;
use crate::params::{ParamValue, Params};
use crate::route::Assembly;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

/// Value constraint on a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// One or more ASCII digits
    Int,
    /// One or more ASCII letters
    Alpha,
    /// One or more ASCII letters or digits
    Alnum,
    /// Letters, digits, `-` and `_`
    Slug,
    /// Hyphenated hexadecimal UUID
    Uuid,
    /// Any regular expression
    Custom(String),
}

impl Constraint {
    /// Parse a keyword (`int`, `alpha`, `alnum`, `slug`, `uuid`); anything
    /// else is taken as a regex.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "int" => Constraint::Int,
            "alpha" => Constraint::Alpha,
            "alnum" => Constraint::Alnum,
            "slug" => Constraint::Slug,
            "uuid" => Constraint::Uuid,
            other => Constraint::Custom(other.to_string()),
        }
    }

    fn regex(&self) -> String {
        match self {
            Constraint::Int => r"[0-9]+".to_string(),
            Constraint::Alpha => r"[A-Za-z]+".to_string(),
            Constraint::Alnum => r"[A-Za-z0-9]+".to_string(),
            Constraint::Slug => r"[A-Za-z0-9_-]+".to_string(),
            Constraint::Uuid => {
                r"[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}"
                    .to_string()
            }
            Constraint::Custom(re) => format!("(?:{re})"),
        }
    }
}

/// Which URI component a pattern describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Component {
    Path,
    Host,
}

impl Component {
    fn default_regex(self) -> &'static str {
        match self {
            Component::Path => "[^/]+",
            Component::Host => r"[^.]+",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Literal(String),
    Param {
        name: Arc<str>,
        constraint: Option<Constraint>,
        wildcard: bool,
    },
    Optional(Vec<Token>),
}

fn parse(source: &str) -> Result<Vec<Token>, RouterError> {
    let mut stack: Vec<Vec<Token>> = vec![Vec::new()];
    let mut literal = String::new();
    let mut chars = source.chars().peekable();

    fn flush(literal: &mut String, stack: &mut [Vec<Token>]) {
        if literal.is_empty() {
            return;
        }
        if let Some(top) = stack.last_mut() {
            top.push(Token::Literal(std::mem::take(literal)));
        }
    }

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => literal.push(escaped),
                None => return Err(RouterError::invalid_pattern(source, "trailing escape")),
            },
            ':' => {
                flush(&mut literal, &mut stack);
                let mut name = String::new();
                while let Some(&n) = chars.peek() {
                    if n.is_ascii_alphanumeric() || n == '_' {
                        name.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if name.is_empty() {
                    return Err(RouterError::invalid_pattern(
                        source,
                        "found empty parameter name",
                    ));
                }
                let mut constraint = None;
                if chars.peek() == Some(&'<') {
                    chars.next();
                    let mut depth = 1usize;
                    let mut body = String::new();
                    for n in chars.by_ref() {
                        match n {
                            '<' => depth += 1,
                            '>' => {
                                depth -= 1;
                                if depth == 0 {
                                    break;
                                }
                            }
                            _ => {}
                        }
                        body.push(n);
                    }
                    if depth != 0 || body.is_empty() {
                        return Err(RouterError::invalid_pattern(
                            source,
                            format!("unterminated constraint for parameter \"{name}\""),
                        ));
                    }
                    constraint = Some(Constraint::parse(&body));
                }
                let wildcard = chars.peek() == Some(&'*');
                if wildcard {
                    chars.next();
                }
                if let Some(top) = stack.last_mut() {
                    top.push(Token::Param {
                        name: Arc::from(name),
                        constraint,
                        wildcard,
                    });
                }
            }
            '[' => {
                flush(&mut literal, &mut stack);
                stack.push(Vec::new());
            }
            ']' => {
                flush(&mut literal, &mut stack);
                if stack.len() == 1 {
                    return Err(RouterError::invalid_pattern(source, "found unbalanced brackets"));
                }
                if let Some(group) = stack.pop() {
                    if let Some(top) = stack.last_mut() {
                        top.push(Token::Optional(group));
                    }
                }
            }
            other => literal.push(other),
        }
    }
    flush(&mut literal, &mut stack);

    if stack.len() != 1 {
        return Err(RouterError::invalid_pattern(source, "found unbalanced brackets"));
    }
    Ok(stack.pop().unwrap_or_default())
}

/// A parsed and compiled placeholder pattern.
#[derive(Debug, Clone)]
pub(crate) struct CompiledPattern {
    source: String,
    tokens: Vec<Token>,
    full: Regex,
    prefix: Regex,
    param_names: Vec<Arc<str>>,
    component: Component,
}

impl CompiledPattern {
    pub(crate) fn compile(
        source: &str,
        component: Component,
        constraints: &HashMap<String, Constraint>,
    ) -> Result<Self, RouterError> {
        let tokens = parse(source)?;
        let mut body = String::with_capacity(source.len() * 2);
        let mut param_names = Vec::new();
        write_regex(&tokens, component, constraints, &mut body, &mut param_names);

        let flags = match component {
            Component::Path => "",
            Component::Host => "(?i)",
        };
        let full = Regex::new(&format!("{flags}^(?:{body})$"))
            .map_err(|e| RouterError::invalid_pattern(source, e))?;
        let prefix = Regex::new(&format!("{flags}^(?:{body})"))
            .map_err(|e| RouterError::invalid_pattern(source, e))?;

        Ok(Self {
            source: source.to_string(),
            tokens,
            full,
            prefix,
            param_names,
            component,
        })
    }

    pub(crate) fn source(&self) -> &str {
        &self.source
    }

    /// Match `haystack` and extract params.
    ///
    /// With `whole` the pattern must span the input; otherwise it only has to
    /// start at its beginning. Returns the matched length and the non-empty
    /// captures.
    pub(crate) fn captures(&self, haystack: &str, whole: bool) -> Option<(usize, Params)> {
        let regex = if whole { &self.full } else { &self.prefix };
        let caps = regex.captures(haystack)?;
        let length = caps.get(0).map_or(0, |m| m.len());
        let mut params = Params::new();
        for name in &self.param_names {
            let Some(m) = caps.name(name) else {
                continue;
            };
            if m.as_str().is_empty() {
                continue;
            }
            let value = match self.component {
                Component::Path => encoding::decode(m.as_str()).into_owned(),
                Component::Host => m.as_str().to_string(),
            };
            params.insert(Arc::clone(name), ParamValue::from_captured(value));
        }
        Some((length, params))
    }

    /// Build the concrete text for `params` (already merged over defaults).
    pub(crate) fn build(
        &self,
        params: &Params,
        defaults: &Params,
        has_child: bool,
    ) -> Result<Assembly, RouterError> {
        let mut used = Vec::new();
        let text = self
            .build_tokens(&self.tokens, params, defaults, false, has_child, &mut used)?
            .unwrap_or_default();
        Ok(Assembly::new(text, used))
    }

    fn encode(&self, value: &str, wildcard: bool) -> String {
        match (self.component, wildcard) {
            (Component::Host, _) => value.to_string(),
            (Component::Path, true) => encoding::encode_path(value),
            (Component::Path, false) => encoding::encode_segment(value),
        }
    }

    fn build_tokens(
        &self,
        tokens: &[Token],
        params: &Params,
        defaults: &Params,
        optional: bool,
        has_child: bool,
        used: &mut Vec<Arc<str>>,
    ) -> Result<Option<String>, RouterError> {
        let mut text = String::new();
        let mut skippable = false;
        let mut skip = true;

        for token in tokens {
            match token {
                Token::Literal(literal) => text.push_str(literal),
                Token::Param { name, wildcard, .. } => {
                    skippable = true;
                    let Some(value) = params.get(name) else {
                        if !optional || has_child {
                            return Err(RouterError::MissingParameter(name.to_string()));
                        }
                        return Ok(None);
                    };
                    if !optional || has_child || defaults.get(name) != Some(value) {
                        skip = false;
                    }
                    text.push_str(&self.encode(&value.to_string(), *wildcard));
                    if !used.contains(name) {
                        used.push(Arc::clone(name));
                    }
                }
                Token::Optional(group) => {
                    skippable = true;
                    let mark = used.len();
                    match self.build_tokens(group, params, defaults, true, has_child, used)? {
                        Some(fragment) if !fragment.is_empty() => {
                            text.push_str(&fragment);
                            skip = false;
                        }
                        _ => used.truncate(mark),
                    }
                }
            }
        }

        if optional && skippable && skip {
            return Ok(None);
        }
        Ok(Some(text))
    }
}

fn write_regex(
    tokens: &[Token],
    component: Component,
    constraints: &HashMap<String, Constraint>,
    out: &mut String,
    names: &mut Vec<Arc<str>>,
) {
    for token in tokens {
        match token {
            Token::Literal(literal) => out.push_str(&regex::escape(literal)),
            Token::Param {
                name,
                constraint,
                wildcard,
            } => {
                let body = match constraints.get(name.as_ref()).or(constraint.as_ref()) {
                    Some(constraint) => constraint.regex(),
                    None if *wildcard => ".+".to_string(),
                    None => component.default_regex().to_string(),
                };
                out.push_str(&format!("(?P<{name}>{body})"));
                names.push(Arc::clone(name));
            }
            Token::Optional(group) => {
                out.push_str("(?:");
                write_regex(group, component, constraints, out, names);
                out.push_str(")?");
            }
        }
    }
}
