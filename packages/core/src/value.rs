//! The Value type - a JSON-shaped tree.

use std::collections::BTreeMap;

use crate::path::{validate_key, PathError, MAX_DEPTH};
use crate::{ClientError, Path};

/// A multi-key partial update: child key (or relative path) to new value.
pub type Mapping = BTreeMap<String, Value>;

/// A tree-shaped value stored at a location.
///
/// `Null` doubles as the absence-of-data sentinel: reading a location that
/// holds nothing yields `Null`, and writing `Null` deletes.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// No data.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed 64-bit integer.
    Integer(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Ordered sequence of values.
    Array(Vec<Value>),
    /// Key-value map with string keys.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Create an empty map.
    pub fn map() -> Self {
        Value::Map(BTreeMap::new())
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is a map.
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Get the integer if this is an `Integer`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the string slice if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get a reference to a nested value by path.
    ///
    /// Returns `None` if the path doesn't exist or can't be navigated
    /// (e.g., trying to index into a string).
    pub fn get(&self, path: &Path) -> Option<&Value> {
        let mut current = self;
        for component in path.iter() {
            current = match current {
                Value::Map(map) => map.get(component)?,
                Value::Array(arr) => {
                    let index: usize = component.parse().ok()?;
                    arr.get(index)?
                }
                _ => return None,
            };
        }
        Some(current)
    }

    /// The value at `path`, or `Null` when nothing is stored there.
    pub fn get_or_null(&self, path: &Path) -> Value {
        self.get(path).cloned().unwrap_or_default()
    }

    /// Set a value at a path, creating intermediate maps as needed.
    ///
    /// Scalars found on the way are replaced by maps, matching how the
    /// database treats a deep write below a leaf.
    pub fn set(&mut self, path: &Path, value: Value) {
        let mut current = self;
        for component in path.iter() {
            if let Value::Array(arr) = current {
                *current = Value::Map(index_keyed(std::mem::take(arr)));
            }
            if !current.is_map() {
                *current = Value::map();
            }
            let Value::Map(map) = current else {
                unreachable!("converted to a map above");
            };
            current = map.entry(component.clone()).or_default();
        }
        *current = value;
    }

    /// Remove the value at a path, returning it if it existed.
    pub fn remove(&mut self, path: &Path) -> Option<Value> {
        let Some(parent_path) = path.parent() else {
            return Some(std::mem::take(self));
        };
        let key = path.key()?;

        let mut parent = self;
        for component in parent_path.iter() {
            parent = match parent {
                Value::Map(map) => map.get_mut(component)?,
                Value::Array(arr) => arr.get_mut(component.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        // Siblings keep their indices: the array becomes an index-keyed map.
        if let Value::Array(arr) = &mut *parent {
            key.parse::<usize>().ok().filter(|i| *i < arr.len())?;
            *parent = Value::Map(index_keyed(std::mem::take(arr)));
        }
        match parent {
            Value::Map(map) => map.remove(key),
            _ => None,
        }
    }

    /// Drop nulls and empty maps recursively; an empty tree becomes `Null`.
    ///
    /// An array holding nulls turns into an index-keyed map of its remaining
    /// elements, so no element changes index.
    pub fn prune(&mut self) {
        match self {
            Value::Map(map) => {
                for child in map.values_mut() {
                    child.prune();
                }
                map.retain(|_, v| !v.is_null());
                if map.is_empty() {
                    *self = Value::Null;
                }
            }
            Value::Array(arr) => {
                for child in arr.iter_mut() {
                    child.prune();
                }
                if arr.iter().any(Value::is_null) {
                    let mut map = index_keyed(std::mem::take(arr));
                    map.retain(|_, v| !v.is_null());
                    *self = if map.is_empty() {
                        Value::Null
                    } else {
                        Value::Map(map)
                    };
                } else if arr.is_empty() {
                    *self = Value::Null;
                }
            }
            _ => {}
        }
    }

    /// Check every map key, number and nesting depth in this tree, as if it
    /// were stored at the root.
    pub fn validate(&self) -> Result<(), ClientError> {
        self.validate_under(&Path::root())
    }

    /// Check this tree as it would be stored at `base`.
    ///
    /// Key positions and depths count from the root of the database, so a
    /// value that passes can be read back from every location inside it.
    pub fn validate_under(&self, base: &Path) -> Result<(), ClientError> {
        self.validate_at(base.len())
    }

    fn validate_at(&self, depth: usize) -> Result<(), ClientError> {
        let descend = |child: &Value| -> Result<(), ClientError> {
            if depth + 1 > MAX_DEPTH {
                return Err(PathError::TooDeep { depth: depth + 1 }.into());
            }
            child.validate_at(depth + 1)
        };
        match self {
            Value::Map(map) => {
                for (key, child) in map {
                    validate_key(key, depth)?;
                    descend(child)?;
                }
                Ok(())
            }
            Value::Array(arr) => arr.iter().try_for_each(descend),
            Value::Float(f) if !f.is_finite() => Err(ClientError::InvalidData {
                message: format!("non-finite number {}", f),
            }),
            _ => Ok(()),
        }
    }
}

/// Array elements keyed by their index.
fn index_keyed(arr: Vec<Value>) -> Mapping {
    arr.into_iter()
        .enumerate()
        .map(|(i, v)| (i.to_string(), v))
        .collect()
}

// Conversion from common types

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Map(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or_default()
    }
}
