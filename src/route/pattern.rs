//! Path pattern grammar.
//!
//! A pattern is an absolute, `/`-separated path. Segments are either literal,
//! a named parameter (`:group`), a parameter restricted by a regular
//! expression (`:schema(measure)`), or the greedy catch-all `:pathMatch(.*)`
//! which swallows every remaining segment and must come last.

use regex::{Regex, RegexBuilder};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while parsing a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern `{0}` must start with `/`")]
    NotAbsolute(String),
    #[error("pattern `{pattern}` has an empty or invalid parameter name in `{segment}`")]
    InvalidParamName { pattern: String, segment: String },
    #[error("pattern `{pattern}` has an unterminated constraint in `{segment}`")]
    UnterminatedConstraint { pattern: String, segment: String },
    #[error("pattern `{pattern}` has an invalid constraint `{constraint}`: {reason}")]
    InvalidConstraint {
        pattern: String,
        constraint: String,
        reason: String,
    },
    #[error("pattern `{0}` has a catch-all that is not the last segment")]
    CatchAllNotLast(String),
}

/// Errors raised while building a concrete path from a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("missing value for parameter `{0}`")]
    Missing(String),
    #[error("value `{value}` does not satisfy the constraint of parameter `{param}`")]
    Invalid { param: String, value: String },
}

/// Regex restriction on a single parameter segment.
#[derive(Debug, Clone)]
pub struct Constraint {
    source: String,
    regex: Regex,
    /// Same expression compiled case-insensitively, for routers that fold case.
    folded: Regex,
}

impl Constraint {
    fn compile(source: &str) -> Result<Self, regex::Error> {
        let anchored = format!("^(?:{source})$");
        Ok(Self {
            source: source.to_string(),
            regex: Regex::new(&anchored)?,
            folded: RegexBuilder::new(&anchored).case_insensitive(true).build()?,
        })
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    /// Match honouring the router's case mode; `sensitive = false` folds case.
    #[must_use]
    pub fn matches(&self, value: &str, sensitive: bool) -> bool {
        if sensitive {
            self.regex.is_match(value)
        } else {
            self.folded.is_match(value)
        }
    }
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Constraint {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Static(String),
    Param {
        name: Arc<str>,
        constraint: Option<Constraint>,
    },
    CatchAll {
        name: Arc<str>,
    },
}

impl Segment {
    #[must_use]
    pub fn param_name(&self) -> Option<&str> {
        match self {
            Segment::Static(_) => None,
            Segment::Param { name, .. } | Segment::CatchAll { name } => Some(name),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Static(s) => f.write_str(s),
            Segment::Param {
                name,
                constraint: None,
            } => write!(f, ":{name}"),
            Segment::Param {
                name,
                constraint: Some(c),
            } => write!(f, ":{name}({})", c.source()),
            Segment::CatchAll { name } => write!(f, ":{name}(.*)"),
        }
    }
}

/// A parsed route path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a pattern such as `/banyandb/:schema/index-rule/operator-create/:type/:operator/:group`.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        if !raw.starts_with('/') {
            return Err(PatternError::NotAbsolute(raw.to_string()));
        }

        let parts: Vec<&str> = raw.split('/').filter(|s| !s.is_empty()).collect();
        let mut segments = Vec::with_capacity(parts.len());

        for (i, part) in parts.iter().enumerate() {
            let Some(param) = part.strip_prefix(':') else {
                segments.push(Segment::Static((*part).to_string()));
                continue;
            };

            let (name, constraint) = match param.find('(') {
                Some(open) => {
                    let Some(inner) = param[open + 1..].strip_suffix(')') else {
                        return Err(PatternError::UnterminatedConstraint {
                            pattern: raw.to_string(),
                            segment: (*part).to_string(),
                        });
                    };
                    (&param[..open], Some(inner))
                }
                None => (param, None),
            };

            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(PatternError::InvalidParamName {
                    pattern: raw.to_string(),
                    segment: (*part).to_string(),
                });
            }

            let segment = match constraint {
                Some(".*") => {
                    if i + 1 != parts.len() {
                        return Err(PatternError::CatchAllNotLast(raw.to_string()));
                    }
                    Segment::CatchAll { name: name.into() }
                }
                Some(source) => {
                    let constraint = Constraint::compile(source).map_err(|e| {
                        PatternError::InvalidConstraint {
                            pattern: raw.to_string(),
                            constraint: source.to_string(),
                            reason: e.to_string(),
                        }
                    })?;
                    Segment::Param {
                        name: name.into(),
                        constraint: Some(constraint),
                    }
                }
                None => Segment::Param {
                    name: name.into(),
                    constraint: None,
                },
            };
            segments.push(segment);
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Parameter names in path order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(Segment::param_name)
    }

    #[must_use]
    pub fn has_param(&self, name: &str) -> bool {
        self.param_names().any(|p| p == name)
    }

    /// True for a pattern made of nothing but a catch-all (`/:pathMatch(.*)`).
    #[must_use]
    pub fn is_catch_all_only(&self) -> bool {
        matches!(self.segments.as_slice(), [Segment::CatchAll { .. }])
    }

    /// Literal segments before the first parameter.
    pub fn static_prefix(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map_while(|s| match s {
            Segment::Static(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Shape of the pattern with parameter names erased; two patterns with
    /// the same shape match exactly the same paths.
    #[must_use]
    pub fn shape(&self, sensitive: bool) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        let mut out = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            out.push('/');
            match segment {
                Segment::Static(s) if sensitive => out.push_str(s),
                Segment::Static(s) => out.push_str(&s.to_ascii_lowercase()),
                Segment::Param {
                    constraint: None, ..
                } => out.push(':'),
                Segment::Param {
                    constraint: Some(c),
                    ..
                } => {
                    out.push_str(":(");
                    out.push_str(c.source());
                    out.push(')');
                }
                Segment::CatchAll { .. } => out.push('*'),
            }
        }
        out
    }

    /// Fill the pattern's parameters and return the percent-encoded path.
    ///
    /// Later pairs win over earlier ones with the same name. A catch-all
    /// value is a path as written: `/` separates segments and each segment
    /// is re-encoded, so `a%2Fb` stays one segment.
    pub fn build(&self, params: &[(String, String)]) -> Result<String, BuildError> {
        if self.segments.is_empty() {
            return Ok("/".to_string());
        }

        let lookup = |name: &str| {
            params
                .iter()
                .rfind(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        };

        let mut path = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Static(s) => {
                    path.push('/');
                    path.push_str(s);
                }
                Segment::Param { name, constraint } => {
                    let value = lookup(name)
                        .filter(|v| !v.is_empty())
                        .ok_or_else(|| BuildError::Missing(name.to_string()))?;
                    if let Some(c) = constraint {
                        if !c.is_match(value) {
                            return Err(BuildError::Invalid {
                                param: name.to_string(),
                                value: value.to_string(),
                            });
                        }
                    }
                    path.push('/');
                    path.push_str(&urlencoding::encode(value));
                }
                Segment::CatchAll { name } => {
                    let value = lookup(name).ok_or_else(|| BuildError::Missing(name.to_string()))?;
                    for piece in value.split('/').filter(|p| !p.is_empty()) {
                        let decoded = urlencoding::decode(piece).unwrap_or(Cow::Borrowed(piece));
                        path.push('/');
                        path.push_str(&urlencoding::encode(&decoded));
                    }
                }
            }
        }

        if path.is_empty() {
            path.push('/');
        }
        Ok(path)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_root() {
        let pattern = PathPattern::parse("/").unwrap();
        assert!(pattern.segments().is_empty());
        assert_eq!(pattern.shape(false), "/");
    }

    #[test]
    fn test_parse_params_and_statics() {
        let pattern =
            PathPattern::parse("/banyandb/stream/operator-read/:type/:operator/:group/:name")
                .unwrap();
        assert_eq!(pattern.segments().len(), 7);
        assert_eq!(
            pattern.param_names().collect::<Vec<_>>(),
            vec!["type", "operator", "group", "name"]
        );
        assert_eq!(
            pattern.static_prefix().collect::<Vec<_>>(),
            vec!["banyandb", "stream", "operator-read"]
        );
    }

    #[test]
    fn test_parse_catch_all() {
        let pattern = PathPattern::parse("/:pathMatch(.*)").unwrap();
        assert!(pattern.is_catch_all_only());
        assert_eq!(pattern.to_string(), "/:pathMatch(.*)");
    }

    #[test]
    fn test_parse_constrained_param() {
        let pattern = PathPattern::parse("/banyandb/:schema(measure)/topn-agg").unwrap();
        match &pattern.segments()[1] {
            Segment::Param {
                name,
                constraint: Some(c),
            } => {
                assert_eq!(name.as_ref(), "schema");
                assert!(c.is_match("measure"));
                assert!(!c.is_match("stream"));
                assert!(!c.is_match("measures"));
                assert!(!c.is_match("Measure"));
                assert!(c.matches("Measure", false));
                assert!(!c.matches("Measure", true));
                assert!(!c.matches("Stream", false));
            }
            other => panic!("unexpected segment {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_patterns() {
        assert!(matches!(
            PathPattern::parse("banyandb"),
            Err(PatternError::NotAbsolute(_))
        ));
        assert!(matches!(
            PathPattern::parse("/a/:"),
            Err(PatternError::InvalidParamName { .. })
        ));
        assert!(matches!(
            PathPattern::parse("/a/:x(abc"),
            Err(PatternError::UnterminatedConstraint { .. })
        ));
        assert!(matches!(
            PathPattern::parse("/a/:x([)"),
            Err(PatternError::InvalidConstraint { .. })
        ));
        assert!(matches!(
            PathPattern::parse("/:rest(.*)/tail"),
            Err(PatternError::CatchAllNotLast(_))
        ));
    }

    #[test]
    fn test_shape_ignores_param_names() {
        let a = PathPattern::parse("/banyandb/:schema/index-rule/operator-create/:type").unwrap();
        let b = PathPattern::parse("/BanyanDB/:other/index-rule/operator-create/:kind").unwrap();
        assert_eq!(a.shape(false), b.shape(false));
        assert_ne!(a.shape(true), b.shape(true));
    }

    #[test]
    fn test_build_encodes_values() {
        let pattern = PathPattern::parse("/banyandb/stream/operator-read/:type/:operator/:group/:name")
            .unwrap();
        let path = pattern
            .build(&p(&[
                ("type", "stream"),
                ("operator", "read"),
                ("group", "sw metrics"),
                ("name", "a/b"),
            ]))
            .unwrap();
        assert_eq!(
            path,
            "/banyandb/stream/operator-read/stream/read/sw%20metrics/a%2Fb"
        );
    }

    #[test]
    fn test_build_missing_and_invalid() {
        let pattern = PathPattern::parse("/banyandb/:schema(measure)/topn-agg/:group").unwrap();
        assert_eq!(
            pattern.build(&p(&[("schema", "measure")])),
            Err(BuildError::Missing("group".to_string()))
        );
        assert_eq!(
            pattern.build(&p(&[("schema", "stream"), ("group", "g")])),
            Err(BuildError::Invalid {
                param: "schema".to_string(),
                value: "stream".to_string()
            })
        );
    }

    #[test]
    fn test_build_catch_all_keeps_slashes() {
        let pattern = PathPattern::parse("/:pathMatch(.*)").unwrap();
        assert_eq!(
            pattern.build(&p(&[("pathMatch", "does/not/exist")])).unwrap(),
            "/does/not/exist"
        );
        assert_eq!(pattern.build(&p(&[("pathMatch", "")])).unwrap(), "/");
        assert_eq!(
            pattern.build(&p(&[("pathMatch", "a%2Fb/c d")])).unwrap(),
            "/a%2Fb/c%20d"
        );
    }
}
