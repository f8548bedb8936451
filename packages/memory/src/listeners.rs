//! Value listeners.

use std::collections::BTreeMap;
use std::sync::Arc;

use pathdb_core::{Path, Snapshot, Value};

use crate::rules::AccessRules;

/// Identifies a registered listener; pass it to
/// [`crate::MemoryDatabase::off`] to unregister.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Delivered to a listener when the value at its location may have changed.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueEvent {
    pub snapshot: Snapshot,
    /// True for values proposed by a transaction that has not committed yet.
    pub speculative: bool,
}

pub(crate) type ListenerFn = Arc<dyn Fn(&ValueEvent) + Send + Sync>;

/// A listener call prepared under the lock and run after it is released.
pub(crate) type Delivery = (ListenerFn, ValueEvent);

#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: BTreeMap<ListenerId, (Path, ListenerFn)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, path: Path, callback: ListenerFn) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, (path, callback));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Events for every listener whose location overlaps one of `changed`
    /// and is readable under `rules`, read from `tree`.
    pub(crate) fn deliveries(
        &self,
        tree: &Value,
        changed: &[Path],
        speculative: bool,
        rules: &AccessRules,
    ) -> Vec<Delivery> {
        self.entries
            .values()
            .filter(|(path, _)| changed.iter().any(|c| c.overlaps(path)))
            .filter(|(path, _)| rules.can_read(path))
            .map(|(path, callback)| {
                let event = ValueEvent {
                    snapshot: Snapshot::new(path.clone(), tree.get_or_null(path)),
                    speculative,
                };
                (Arc::clone(callback), event)
            })
            .collect()
    }
}

/// Run prepared listener calls. Must be called without holding the lock.
pub(crate) fn dispatch(deliveries: Vec<Delivery>) {
    for (callback, event) in deliveries {
        callback(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recorder() -> (ListenerFn, Arc<Mutex<Vec<ValueEvent>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callback: ListenerFn = Arc::new(move |event: &ValueEvent| {
            sink.lock().unwrap().push(event.clone());
        });
        (callback, seen)
    }

    #[test]
    fn only_overlapping_listeners_fire() {
        let mut listeners = Listeners::default();
        let (users, users_seen) = recorder();
        let (posts, posts_seen) = recorder();
        listeners.add(Path::parse("users"), users);
        listeners.add(Path::parse("posts"), posts);

        let mut tree = Value::map();
        tree.set(&Path::parse("users/alice"), Value::from(1));

        dispatch(listeners.deliveries(
            &tree,
            &[Path::parse("users/alice")],
            false,
            &AccessRules::default(),
        ));

        let seen = users_seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].snapshot.child("alice").val(), Value::from(1));
        assert!(!seen[0].speculative);
        assert!(posts_seen.lock().unwrap().is_empty());
    }

    #[test]
    fn descendant_listeners_fire_on_ancestor_writes() {
        let mut listeners = Listeners::default();
        let (deep, seen) = recorder();
        listeners.add(Path::parse("a/b/c"), deep);

        dispatch(listeners.deliveries(
            &Value::Null,
            &[Path::root()],
            true,
            &AccessRules::default(),
        ));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(!seen[0].snapshot.exists());
        assert!(seen[0].speculative);
    }

    #[test]
    fn removed_listeners_stop_firing() {
        let mut listeners = Listeners::default();
        let (callback, seen) = recorder();
        let id = listeners.add(Path::root(), callback);
        assert_eq!(listeners.len(), 1);

        assert!(listeners.remove(id));
        assert!(!listeners.remove(id));
        dispatch(listeners.deliveries(
            &Value::Null,
            &[Path::root()],
            false,
            &AccessRules::default(),
        ));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn read_denied_listeners_get_nothing() {
        let mut listeners = Listeners::default();
        let (secret, secret_seen) = recorder();
        let (public, public_seen) = recorder();
        listeners.add(Path::parse("secret/token"), secret);
        listeners.add(Path::parse("public"), public);

        let mut rules = AccessRules::default();
        rules.deny_read(Path::parse("secret"));
        let mut tree = Value::map();
        tree.set(&Path::parse("secret/token"), Value::from("s3cret"));
        tree.set(&Path::parse("public"), Value::from(1));

        dispatch(listeners.deliveries(&tree, &[Path::root()], false, &rules));

        assert!(secret_seen.lock().unwrap().is_empty());
        assert_eq!(public_seen.lock().unwrap().len(), 1);
    }
}
