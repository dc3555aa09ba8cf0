use super::{Assembly, RouteMatch};
use crate::encoding;
use crate::error::RouterError;
use crate::params::{ParamValue, Params};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

// Constant pattern, exercised by the template tests below.
#[allow(clippy::expect_used)]
static TEMPLATE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"%([A-Za-z0-9_]+)%").expect("template token regex should be valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
enum TemplatePart {
    Literal(String),
    Param(Arc<str>),
}

fn parse_template(spec: &str) -> Vec<TemplatePart> {
    let mut parts = Vec::new();
    let mut last = 0;
    for caps in TEMPLATE_TOKEN.captures_iter(spec) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            parts.push(TemplatePart::Literal(spec[last..whole.start()].to_string()));
        }
        parts.push(TemplatePart::Param(Arc::from(name.as_str())));
        last = whole.end();
    }
    if last < spec.len() {
        parts.push(TemplatePart::Literal(spec[last..].to_string()));
    }
    parts
}

/// Route defined by a regular expression with named groups, assembled from a
/// `%name%` template.
///
/// ```rust
/// use routestack::{Params, route::RegexRoute};
///
/// let route = RegexRoute::new("/(?<foo>[^/]+)", "/%foo%", Params::new()).unwrap();
/// let m = route.match_path("/bar", None).unwrap();
/// assert_eq!(m.length(), 4);
/// assert_eq!(m.param("foo").unwrap(), "bar");
/// ```
#[derive(Debug, Clone)]
pub struct RegexRoute {
    regex: String,
    full: Regex,
    prefix: Regex,
    group_names: Vec<Arc<str>>,
    spec: String,
    template: Vec<TemplatePart>,
    defaults: Params,
}

impl RegexRoute {
    pub fn new(regex: &str, spec: &str, defaults: Params) -> Result<Self, RouterError> {
        let full = Regex::new(&format!("^(?:{regex})$"))
            .map_err(|e| RouterError::invalid_pattern(regex, e))?;
        let prefix = Regex::new(&format!("^(?:{regex})"))
            .map_err(|e| RouterError::invalid_pattern(regex, e))?;
        let group_names = full.capture_names().flatten().map(Arc::from).collect();
        Ok(Self {
            regex: regex.to_string(),
            full,
            prefix,
            group_names,
            spec: spec.to_string(),
            template: parse_template(spec),
            defaults,
        })
    }

    #[must_use]
    pub fn regex(&self) -> &str {
        &self.regex
    }

    #[must_use]
    pub fn spec(&self) -> &str {
        &self.spec
    }

    /// Without an offset the regex must span the whole path; with one it must
    /// begin at the offset and may end anywhere.
    pub fn match_path(&self, path: &str, offset: Option<usize>) -> Option<RouteMatch> {
        let caps = match offset {
            None => self.full.captures(path)?,
            Some(offset) => self.prefix.captures(path.get(offset..)?)?,
        };
        let length = caps.get(0).map_or(0, |m| m.len());

        let mut params = Params::new();
        for name in &self.group_names {
            match caps.name(name) {
                Some(m) if !m.as_str().is_empty() => {
                    let value = encoding::decode(m.as_str()).into_owned();
                    params.insert(Arc::clone(name), ParamValue::from_captured(value));
                }
                _ => {}
            }
        }
        params.merge_missing(&self.defaults);
        Some(RouteMatch::new(params, length))
    }

    /// Substitute every `%name%` token, falling back to route defaults.
    ///
    /// The returned [`Assembly`] lists exactly the params that were
    /// substituted; a token with no value is a [`RouterError::MissingParameter`].
    pub fn assemble(&self, params: &Params) -> Result<Assembly, RouterError> {
        let mut path = String::with_capacity(self.spec.len());
        let mut used: Vec<Arc<str>> = Vec::new();
        for part in &self.template {
            match part {
                TemplatePart::Literal(text) => path.push_str(text),
                TemplatePart::Param(name) => {
                    let value = params
                        .get(name)
                        .or_else(|| self.defaults.get(name))
                        .ok_or_else(|| RouterError::MissingParameter(name.to_string()))?;
                    path.push_str(&encoding::encode_segment(&value.to_string()));
                    if !used.contains(name) {
                        used.push(Arc::clone(name));
                    }
                }
            }
        }
        Ok(Assembly::new(path, used))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_tokens() {
        assert_eq!(
            parse_template("/a/%x%-%y%.json"),
            vec![
                TemplatePart::Literal("/a/".into()),
                TemplatePart::Param(Arc::from("x")),
                TemplatePart::Literal("-".into()),
                TemplatePart::Param(Arc::from("y")),
                TemplatePart::Literal(".json".into()),
            ]
        );
    }

    #[test]
    fn template_without_tokens_is_one_literal() {
        assert_eq!(
            parse_template("/static/path"),
            vec![TemplatePart::Literal("/static/path".into())]
        );
        assert!(parse_template("").is_empty());
    }

    #[test]
    fn invalid_regex_is_a_configuration_error() {
        let err = RegexRoute::new("/(?<x>", "/%x%", Params::new()).unwrap_err();
        assert!(matches!(err, RouterError::InvalidPattern { .. }));
    }

    #[test]
    fn unsubstituted_token_is_missing_parameter() {
        let route = RegexRoute::new("/(?<x>[^/]+)", "/%x%", Params::new()).unwrap();
        assert_eq!(
            route.assemble(&Params::new()).unwrap_err(),
            RouterError::MissingParameter("x".into())
        );
    }
}
