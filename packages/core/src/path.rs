//! Normalized hierarchical paths.

use std::fmt;

use thiserror::Error;

/// Maximum number of components in a path.
pub const MAX_DEPTH: usize = 32;

/// Maximum length of a single key, in UTF-8 bytes.
pub const MAX_KEY_BYTES: usize = 768;

/// Errors related to key and path validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// A path component is not a valid key.
    #[error("invalid key '{key}' at position {position}: {message}")]
    InvalidKey {
        key: String,
        position: usize,
        message: String,
    },

    /// The path has more components than the database accepts.
    #[error("path is {depth} components deep (maximum {max})", max = MAX_DEPTH)]
    TooDeep { depth: usize },
}

/// A location in the hierarchical store.
///
/// Parsing never fails: components are split on `/` and empty components are
/// dropped, so `"/users//alice/"` and `"users/alice"` are the same path. Key
/// validity is a property of the database, checked with [`Path::validate`]
/// when an operation actually runs.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Path {
    pub components: Vec<String>,
}

impl Path {
    /// The root path.
    pub fn root() -> Self {
        Path {
            components: Vec::new(),
        }
    }

    /// Parse a slash-delimited path string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pathdb_core::Path;
    ///
    /// let path = Path::parse("users/123/name");
    /// assert_eq!(path.len(), 3);
    ///
    /// // Leading, trailing and doubled slashes are normalized
    /// assert_eq!(Path::parse("/users//123/"), Path::parse("users/123"));
    /// ```
    pub fn parse(s: &str) -> Self {
        Path {
            components: s
                .split('/')
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Check every component against the key rules and the depth limit.
    pub fn validate(&self) -> Result<(), PathError> {
        if self.components.len() > MAX_DEPTH {
            return Err(PathError::TooDeep {
                depth: self.components.len(),
            });
        }
        for (i, component) in self.components.iter().enumerate() {
            validate_key(component, i)?;
        }
        Ok(())
    }

    /// Check if this path is the root.
    pub fn is_root(&self) -> bool {
        self.components.is_empty()
    }

    /// Get the number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Same as [`Path::is_root`].
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Iterate over components.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.components.iter()
    }

    /// The last component, or `None` for the root.
    pub fn key(&self) -> Option<&str> {
        self.components.last().map(String::as_str)
    }

    /// The parent path, or `None` for the root.
    pub fn parent(&self) -> Option<Path> {
        if self.is_root() {
            return None;
        }
        Some(Path {
            components: self.components[..self.components.len() - 1].to_vec(),
        })
    }

    /// Join this path with another.
    #[must_use]
    pub fn join(&self, other: &Path) -> Path {
        let mut components = self.components.clone();
        components.extend(other.components.iter().cloned());
        Path { components }
    }

    /// Descend to a relative, slash-delimited child path.
    #[must_use]
    pub fn child(&self, relative: &str) -> Path {
        self.join(&Path::parse(relative))
    }

    /// Check if this path has the given prefix.
    pub fn has_prefix(&self, prefix: &Path) -> bool {
        prefix.components.len() <= self.components.len()
            && prefix.components == self.components[..prefix.components.len()]
    }

    /// Check whether one path is an ancestor of (or equal to) the other.
    pub fn overlaps(&self, other: &Path) -> bool {
        self.has_prefix(other) || other.has_prefix(self)
    }

    /// Strip a prefix from this path.
    ///
    /// Returns `None` if the prefix doesn't match.
    #[must_use]
    pub fn strip_prefix(&self, prefix: &Path) -> Option<Path> {
        if self.has_prefix(prefix) {
            Some(Path {
                components: self.components[prefix.components.len()..].to_vec(),
            })
        } else {
            None
        }
    }
}

/// Validate a single key.
///
/// Keys are non-empty, at most [`MAX_KEY_BYTES`] long, and contain none of
/// `.` `#` `$` `[` `]` or ASCII control characters.
pub fn validate_key(key: &str, position: usize) -> Result<(), PathError> {
    let invalid = |message: String| PathError::InvalidKey {
        key: key.to_string(),
        position,
        message,
    };

    if key.is_empty() {
        return Err(invalid("empty key".to_string()));
    }
    if key.len() > MAX_KEY_BYTES {
        return Err(invalid(format!(
            "key is {} bytes (maximum {})",
            key.len(),
            MAX_KEY_BYTES
        )));
    }
    if let Some(c) = key
        .chars()
        .find(|c| matches!(*c, '.' | '#' | '$' | '[' | ']') || c.is_ascii_control())
    {
        return Err(invalid(format!("forbidden character {:?}", c)));
    }
    Ok(())
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join("/"))
    }
}

impl std::ops::Index<usize> for Path {
    type Output = String;

    fn index(&self, i: usize) -> &Self::Output {
        &self.components[i]
    }
}

impl From<&str> for Path {
    fn from(s: &str) -> Self {
        Path::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic_paths() {
        assert_eq!(Path::parse("").len(), 0);
        assert_eq!(Path::parse("foo").len(), 1);
        assert_eq!(Path::parse("foo/bar").len(), 2);
        assert_eq!(Path::parse("foo/bar/baz").len(), 3);
    }

    #[test]
    fn normalize_slashes() {
        assert_eq!(Path::parse("foo/bar/"), Path::parse("foo/bar"));
        assert_eq!(Path::parse("foo//bar"), Path::parse("foo/bar"));
        assert_eq!(Path::parse("/foo/bar"), Path::parse("foo/bar"));
        assert!(Path::parse("///").is_root());
    }

    #[test]
    fn display_round_trips_clean_paths() {
        for s in ["foo", "foo/bar/baz", "users/-Nabc123/name", "名前/0"] {
            assert_eq!(Path::parse(s).to_string(), s);
        }
        assert_eq!(Path::root().to_string(), "");
    }

    #[test]
    fn key_and_parent() {
        let p = Path::parse("a/b/c");
        assert_eq!(p.key(), Some("c"));
        assert_eq!(p.parent(), Some(Path::parse("a/b")));
        assert_eq!(Path::root().key(), None);
        assert_eq!(Path::root().parent(), None);
        assert_eq!(Path::parse("a").parent(), Some(Path::root()));
    }

    #[test]
    fn child_descends_relative_paths() {
        let p = Path::parse("users");
        assert_eq!(p.child("alice/name"), Path::parse("users/alice/name"));
        assert_eq!(p.child(""), p);
        assert_eq!(Path::root().child("x"), Path::parse("x"));
    }

    #[test]
    fn has_prefix_and_overlaps() {
        let p = Path::parse("foo/bar/baz");
        assert!(p.has_prefix(&Path::root()));
        assert!(p.has_prefix(&Path::parse("foo/bar")));
        assert!(!p.has_prefix(&Path::parse("bar")));
        assert!(p.overlaps(&Path::parse("foo")));
        assert!(Path::parse("foo").overlaps(&p));
        assert!(!p.overlaps(&Path::parse("foo/qux")));
    }

    #[test]
    fn strip_prefix_works() {
        let p = Path::parse("foo/bar/baz");
        assert_eq!(p.strip_prefix(&Path::parse("foo")), Some(Path::parse("bar/baz")));
        assert_eq!(p.strip_prefix(&Path::parse("other")), None);
    }

    #[test]
    fn validate_accepts_ordinary_keys() {
        assert!(Path::parse("users/alice-smith/score_1/0").validate().is_ok());
        assert!(Path::parse("usuarios/名前 con espacio").validate().is_ok());
        assert!(Path::root().validate().is_ok());
    }

    #[test]
    fn validate_rejects_forbidden_characters() {
        for bad in ["a.b", "a#b", "a$b", "a[0]", "a\u{7}b"] {
            let err = Path::parse(&format!("ok/{}", bad)).validate().unwrap_err();
            assert!(matches!(err, PathError::InvalidKey { position: 1, .. }), "{bad}");
        }
    }

    #[test]
    fn validate_rejects_long_keys_and_deep_paths() {
        let long = "k".repeat(MAX_KEY_BYTES + 1);
        assert!(Path::parse(&long).validate().is_err());
        assert!(Path::parse(&"k".repeat(MAX_KEY_BYTES)).validate().is_ok());

        let deep = vec!["d"; MAX_DEPTH + 1].join("/");
        assert_eq!(
            Path::parse(&deep).validate(),
            Err(PathError::TooDeep { depth: MAX_DEPTH + 1 })
        );
    }

    #[test]
    fn empty_key_rejected() {
        let err = validate_key("", 0).unwrap_err();
        assert!(err.to_string().contains("empty key"));
    }

    #[test]
    fn path_error_display() {
        let err = PathError::InvalidKey {
            key: "a.b".to_string(),
            position: 2,
            message: "forbidden character '.'".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("a.b"));
        assert!(display.contains("position 2"));
    }

    #[test]
    fn index_trait() {
        let p = Path::parse("foo/bar");
        assert_eq!(&p[0], "foo");
        assert_eq!(&p[1], "bar");
    }
}
