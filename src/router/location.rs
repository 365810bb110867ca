use std::borrow::Cow;
use std::fmt;

use url::{form_urlencoded, Url};

/// Origin every console location is resolved against. Only its path, query
/// and fragment survive.
const ORIGIN: &str = "http://console.local/";

/// A parsed navigation location: path, decoded query pairs and hash.
///
/// The path stays percent-encoded; the matcher decodes parameter values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub hash: Option<String>,
}

impl Location {
    /// Parse a path (`/a/b?x=1#h`), a relative path or an absolute URL.
    ///
    /// Dot segments are normalised and relative input resolves against `/`.
    /// A leading `//` is a doubled slash, not a host.
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        let input: Cow<'_, str> = if input.starts_with("//") {
            Cow::Owned(format!("/{}", input.trim_start_matches('/')))
        } else {
            Cow::Borrowed(input)
        };
        let url = Url::parse(ORIGIN)?.join(&input)?;
        Ok(Self {
            path: url.path().to_string(),
            query: url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
            hash: url.fragment().filter(|h| !h.is_empty()).map(str::to_string),
        })
    }

    /// Remove the history base (`/ui`) from the front of the path.
    ///
    /// Paths outside the base are left untouched.
    pub fn strip_base(&mut self, base: &str) {
        let base = base.trim_end_matches('/');
        if base.is_empty() {
            return;
        }
        if self.path == base {
            self.path = "/".to_string();
        } else if let Some(rest) = self.path.strip_prefix(base) {
            if rest.starts_with('/') {
                self.path = rest.to_string();
            }
        }
    }

    /// First query value for `key`.
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Path plus encoded query and hash.
    #[must_use]
    pub fn full_path(&self) -> String {
        let mut out = self.path.clone();
        if !self.query.is_empty() {
            out.push('?');
            out.push_str(
                &form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(&self.query)
                    .finish(),
            );
        }
        if let Some(hash) = &self.hash {
            out.push('#');
            out.push_str(hash);
        }
        out
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_path())
    }
}
