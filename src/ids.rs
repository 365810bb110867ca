use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Strongly typed navigation identifier backed by ULID.
///
/// Every navigation request gets one so its resolve, load and activation
/// log lines can be correlated, and views can tell activations apart.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct NavigationId(pub ulid::Ulid);

impl NavigationId {
    #[must_use]
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    #[must_use]
    pub fn from_ulid(id: ulid::Ulid) -> Self {
        Self(id)
    }
}

impl Default for NavigationId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for NavigationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NavigationId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = ulid::Ulid::from_string(s)?;
        Ok(NavigationId(id))
    }
}
