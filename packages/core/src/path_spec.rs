//! Loose path input accepted by the client helpers.

use crate::Path;

/// How a caller names a location: a slash-delimited string, or an ordered
/// list of segments that are joined with `/`.
///
/// Empty strings, empty segment lists, `()` and `None` all name the root.
///
/// ```rust
/// use pathdb_core::{Path, PathSpec};
///
/// assert_eq!(PathSpec::from("foo/bar").to_path(), Path::parse("foo/bar"));
/// assert_eq!(PathSpec::from(["foo", "bar"]).to_path(), Path::parse("foo/bar"));
/// assert!(PathSpec::from(None::<&str>).to_path().is_root());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PathSpec {
    #[default]
    Root,
    Str(String),
    Segments(Vec<String>),
}

impl PathSpec {
    /// Resolve to a normalized [`Path`].
    pub fn to_path(&self) -> Path {
        match self {
            PathSpec::Segments(segments) if !segments.is_empty() => {
                Path::root().child(&segments.join("/"))
            }
            PathSpec::Str(s) if !s.is_empty() => Path::root().child(s),
            _ => Path::root(),
        }
    }

    /// True when this spec names the root location.
    pub fn is_root(&self) -> bool {
        self.to_path().is_root()
    }
}

impl From<&str> for PathSpec {
    fn from(s: &str) -> Self {
        PathSpec::Str(s.to_string())
    }
}

impl From<String> for PathSpec {
    fn from(s: String) -> Self {
        PathSpec::Str(s)
    }
}

impl From<&String> for PathSpec {
    fn from(s: &String) -> Self {
        PathSpec::Str(s.clone())
    }
}

impl From<Vec<String>> for PathSpec {
    fn from(segments: Vec<String>) -> Self {
        PathSpec::Segments(segments)
    }
}

impl From<Vec<&str>> for PathSpec {
    fn from(segments: Vec<&str>) -> Self {
        PathSpec::Segments(segments.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for PathSpec {
    fn from(segments: &[&str]) -> Self {
        PathSpec::Segments(segments.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for PathSpec {
    fn from(segments: [&str; N]) -> Self {
        PathSpec::Segments(segments.iter().map(|s| s.to_string()).collect())
    }
}

impl From<Path> for PathSpec {
    fn from(path: Path) -> Self {
        PathSpec::Segments(path.components)
    }
}

impl From<&Path> for PathSpec {
    fn from(path: &Path) -> Self {
        PathSpec::Segments(path.components.clone())
    }
}

impl From<()> for PathSpec {
    fn from(_: ()) -> Self {
        PathSpec::Root
    }
}

impl<T: Into<PathSpec>> From<Option<T>> for PathSpec {
    fn from(spec: Option<T>) -> Self {
        spec.map(Into::into).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_resolve_to_their_path() {
        assert_eq!(PathSpec::from("foo").to_path().to_string(), "foo");
        assert_eq!(PathSpec::from("foo/bar/baz").to_path().to_string(), "foo/bar/baz");
        assert_eq!(
            PathSpec::from(String::from("a/b")).to_path(),
            Path::parse("a/b")
        );
    }

    #[test]
    fn segments_are_joined_in_order() {
        assert_eq!(PathSpec::from(vec!["foo"]).to_path().to_string(), "foo");
        assert_eq!(
            PathSpec::from(vec!["foo", "bar", "baz"]).to_path().to_string(),
            "foo/bar/baz"
        );
        assert_eq!(
            PathSpec::from(vec!["c".to_string(), "a".to_string()]).to_path(),
            Path::parse("c/a")
        );
        let slice: &[&str] = &["x", "y"];
        assert_eq!(PathSpec::from(slice).to_path(), Path::parse("x/y"));
    }

    #[test]
    fn segments_may_contain_separators() {
        assert_eq!(
            PathSpec::from(["users/alice", "name"]).to_path(),
            Path::parse("users/alice/name")
        );
    }

    #[test]
    fn empty_inputs_resolve_to_root() {
        assert!(PathSpec::from("").is_root());
        assert!(PathSpec::from(Vec::<String>::new()).is_root());
        assert!(PathSpec::from(None::<&str>).is_root());
        assert!(PathSpec::from(()).is_root());
        assert!(PathSpec::Root.is_root());
        assert!(PathSpec::from(vec!["", ""]).is_root());
    }

    #[test]
    fn option_some_delegates() {
        assert_eq!(
            PathSpec::from(Some("foo/bar")).to_path(),
            Path::parse("foo/bar")
        );
    }

    #[test]
    fn paths_convert_back() {
        let path = Path::parse("a/b/c");
        assert_eq!(PathSpec::from(&path).to_path(), path);
        assert_eq!(PathSpec::from(path.clone()).to_path(), path);
    }

    #[test]
    fn resolution_is_stable() {
        let spec = PathSpec::from(["foo", "bar"]);
        assert_eq!(spec.to_path(), spec.to_path());
    }
}
