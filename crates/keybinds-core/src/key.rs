/// Key identity types.
///
/// Keys are identified by their engine name string (e.g. `"A"`,
/// `"LeftMouseButton"`, `"XboxTypeS_A"`). Equality is exact identity
/// equality with no normalization.
use std::fmt;

/// Opaque token naming a physical input control.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyName(Box<str>);

impl KeyName {
    pub fn new(name: impl Into<Box<str>>) -> Self {
        Self(name.into())
    }

    /// The display-safe string form handed to wildcard callbacks.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for KeyName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// What a subscription is registered against.
///
/// The wildcard is a dedicated variant rather than a reserved key value,
/// so it can never collide with a real key identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindTarget {
    /// Matches every key (wildcard subscription).
    AnyKey,
    /// Matches exactly one key.
    Key(KeyName),
}

impl BindTarget {
    /// `None` registers a wildcard, mirroring the registration API.
    pub fn from_key(key: Option<KeyName>) -> Self {
        match key {
            Some(k) => BindTarget::Key(k),
            None => BindTarget::AnyKey,
        }
    }

    pub fn is_any_key(&self) -> bool {
        matches!(self, BindTarget::AnyKey)
    }
}
