//! Point-in-time views of a location.

use crate::{Path, Value};

/// The value at a location, as observed at one moment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    path: Path,
    value: Value,
}

impl Snapshot {
    pub fn new(path: Path, value: Value) -> Self {
        Self { path, value }
    }

    /// Materialize the snapshot as a plain value (`Null` when empty).
    pub fn val(&self) -> Value {
        self.value.clone()
    }

    /// Borrow the value without cloning.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Take the value out of the snapshot.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// True when the location holds data.
    pub fn exists(&self) -> bool {
        !self.value.is_null()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The last path component, or `None` for the root.
    pub fn key(&self) -> Option<&str> {
        self.path.key()
    }

    /// Snapshot of a descendant location.
    pub fn child(&self, relative: &str) -> Snapshot {
        let relative = Path::parse(relative);
        Snapshot {
            value: self.value.get_or_null(&relative),
            path: self.path.join(&relative),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_does_not_exist() {
        let snap = Snapshot::new(Path::parse("missing"), Value::Null);
        assert!(!snap.exists());
        assert_eq!(snap.val(), Value::Null);
        assert_eq!(snap.key(), Some("missing"));
    }

    #[test]
    fn child_snapshot_descends() {
        let mut value = Value::map();
        value.set(&Path::parse("alice/age"), Value::from(30));
        let snap = Snapshot::new(Path::parse("users"), value);

        let age = snap.child("alice/age");
        assert_eq!(age.path(), &Path::parse("users/alice/age"));
        assert_eq!(age.val(), Value::from(30));
        assert!(!snap.child("bob").exists());
    }
}
