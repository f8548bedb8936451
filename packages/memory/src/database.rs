//! In-process database client.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pathdb_core::{
    json_to_value, ClientError, DatabaseClient, Mapping, Path, PathError, ReadCallback, Snapshot,
    TransactionCallback, TransactionResult, UpdateFunction, Value, WriteCallback,
};

use crate::config::{ConfigError, MemoryConfig};
use crate::listeners::{dispatch, Delivery, ListenerId, Listeners, ValueEvent};
use crate::rules::AccessRules;

/// A realtime database held in memory.
///
/// Implements [`DatabaseClient`] with the same observable contract as a
/// networked client: partial updates, optimistic transactions that retry
/// against concurrent writers, value listeners, and access rules. Callbacks
/// run on the calling thread before the operation returns, never while the
/// internal lock is held.
///
/// Clones share the same data.
///
/// # Example
///
/// ```rust
/// use pathdb_core::{Path, Value};
/// use pathdb_memory::MemoryDatabase;
///
/// let db = MemoryDatabase::new();
/// db.set(&Path::parse("users/alice/name"), Value::from("Alice")).unwrap();
/// assert_eq!(db.get(&Path::parse("users/alice/name")), Value::from("Alice"));
/// ```
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    config: MemoryConfig,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    root: Value,
    rules: AccessRules,
    listeners: Listeners,
    fail_next_read: Option<ClientError>,
    fail_next_update: Option<ClientError>,
    fail_next_transaction: Option<ClientError>,
}

impl MemoryDatabase {
    /// Create an empty database with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a database from configuration, seeding `initial_data`.
    pub fn with_config(config: MemoryConfig) -> Result<Self, ConfigError> {
        let mut root = match config.initial_data.clone() {
            Some(json) => json_to_value(json).map_err(|e| ClientError::InvalidData {
                message: e.to_string(),
            })?,
            None => Value::Null,
        };
        root.validate()?;
        root.prune();

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                state: Mutex::new(State {
                    root,
                    ..State::default()
                }),
            }),
        })
    }

    /// Create a database holding `root`.
    pub fn with_data(root: Value) -> Result<Self, ClientError> {
        let db = Self::new();
        db.set(&Path::root(), root)?;
        Ok(db)
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.inner.config
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // === Direct access (no rules, no injected failures) ===

    /// The value at `path`, `Null` when absent.
    pub fn get(&self, path: &Path) -> Value {
        self.lock().root.get_or_null(path)
    }

    /// A copy of the whole tree.
    pub fn root(&self) -> Value {
        self.lock().root.clone()
    }

    /// Overwrite the value at `path` and notify listeners.
    pub fn set(&self, path: &Path, value: Value) -> Result<(), ClientError> {
        path.validate()?;
        value.validate_under(path)?;

        let deliveries = {
            let state = &mut *self.lock();
            write(&mut state.root, path, value);
            state.listeners.deliveries(
                &state.root,
                std::slice::from_ref(path),
                false,
                &state.rules,
            )
        };
        tracing::trace!(path = %path, "set");
        dispatch(deliveries);
        Ok(())
    }

    // === Listeners ===

    /// Listen for value changes at `path`.
    ///
    /// The callback runs once right away with the current value, then after
    /// every write that touches `path`, one of its ancestors, or one of its
    /// descendants. Listening needs read access: it fails on read-denied
    /// locations, and events stop while a later rule denies the location.
    pub fn on_value(
        &self,
        path: &Path,
        callback: impl Fn(&ValueEvent) + Send + Sync + 'static,
    ) -> Result<ListenerId, ClientError> {
        path.validate()?;
        let callback: Arc<dyn Fn(&ValueEvent) + Send + Sync> = Arc::new(callback);
        let (id, initial) = {
            let mut state = self.lock();
            state.rules.check_read(path)?;
            let initial = ValueEvent {
                snapshot: Snapshot::new(path.clone(), state.root.get_or_null(path)),
                speculative: false,
            };
            (state.listeners.add(path.clone(), Arc::clone(&callback)), initial)
        };
        callback(&initial);
        Ok(id)
    }

    /// Unregister a listener. Returns false if it was not registered.
    pub fn off(&self, id: ListenerId) -> bool {
        self.lock().listeners.remove(id)
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    // === Access rules ===

    /// Refuse reads at, above, or below `path`.
    pub fn deny_read(&self, path: &Path) {
        self.lock().rules.deny_read(path.clone());
    }

    /// Refuse writes at, above, or below `path`.
    pub fn deny_write(&self, path: &Path) {
        self.lock().rules.deny_write(path.clone());
    }

    /// Drop every access rule.
    pub fn allow_all(&self) {
        self.lock().rules = AccessRules::default();
    }

    // === Failure injection ===

    /// Make the next `once_value` fail with `error`.
    pub fn fail_next_read(&self, error: ClientError) {
        self.lock().fail_next_read = Some(error);
    }

    /// Make the next `update` fail with `error`.
    pub fn fail_next_update(&self, error: ClientError) {
        self.lock().fail_next_update = Some(error);
    }

    /// Make the next `transaction` fail with `error`.
    pub fn fail_next_transaction(&self, error: ClientError) {
        self.lock().fail_next_transaction = Some(error);
    }

    // === Operations ===

    fn read(&self, path: &Path) -> Result<Snapshot, ClientError> {
        path.validate()?;
        let state = &mut *self.lock();
        if let Some(error) = state.fail_next_read.take() {
            return Err(error);
        }
        state.rules.check_read(path)?;
        Ok(Snapshot::new(path.clone(), state.root.get_or_null(path)))
    }

    fn apply_update(&self, path: &Path, data: Mapping) -> Result<(), ClientError> {
        path.validate()?;

        let mut writes = Vec::with_capacity(data.len());
        for (key, value) in data {
            let relative = Path::parse(&key);
            if relative.is_root() {
                return Err(PathError::InvalidKey {
                    key,
                    position: path.len(),
                    message: "update key names no child".to_string(),
                }
                .into());
            }
            let target = path.join(&relative);
            target.validate()?;
            value.validate_under(&target)?;
            writes.push((target, value));
        }
        for (i, (a, _)) in writes.iter().enumerate() {
            if let Some((b, _)) = writes[i + 1..].iter().find(|(b, _)| a.overlaps(b)) {
                return Err(ClientError::InvalidData {
                    message: format!("update paths '{}' and '{}' overlap", a, b),
                });
            }
        }

        let deliveries = {
            let state = &mut *self.lock();
            if let Some(error) = state.fail_next_update.take() {
                return Err(error);
            }
            for (target, _) in &writes {
                state.rules.check_write(target)?;
            }
            let changed: Vec<Path> = writes.iter().map(|(target, _)| target.clone()).collect();
            for (target, value) in writes {
                write(&mut state.root, &target, value);
            }
            state
                .listeners
                .deliveries(&state.root, &changed, false, &state.rules)
        };
        tracing::trace!(path = %path, "update");
        dispatch(deliveries);
        Ok(())
    }

    fn run_transaction(
        &self,
        path: &Path,
        update: &mut UpdateFunction,
        apply_locally: bool,
    ) -> Result<TransactionResult, ClientError> {
        path.validate()?;
        {
            let state = &mut *self.lock();
            if let Some(error) = state.fail_next_transaction.take() {
                return Err(error);
            }
            state.rules.check_read(path)?;
            state.rules.check_write(path)?;
        }

        let attempts = self.inner.config.attempts();
        let mut shown_speculative = false;
        let result = self.transaction_attempts(
            path,
            update,
            apply_locally,
            attempts,
            &mut shown_speculative,
        );

        let committed = matches!(result, Ok(TransactionResult { committed: true, .. }));
        if shown_speculative && !committed {
            // Listeners saw a value that never landed; show them the stored one.
            let deliveries = {
                let state = self.lock();
                state.listeners.deliveries(
                    &state.root,
                    std::slice::from_ref(path),
                    false,
                    &state.rules,
                )
            };
            dispatch(deliveries);
        }
        result
    }

    fn transaction_attempts(
        &self,
        path: &Path,
        update: &mut UpdateFunction,
        apply_locally: bool,
        attempts: u32,
        shown_speculative: &mut bool,
    ) -> Result<TransactionResult, ClientError> {
        for attempt in 1..=attempts {
            let current = self.lock().root.get_or_null(path);

            let Some(next) = update(current.clone()) else {
                tracing::debug!(path = %path, attempt, "transaction aborted by update function");
                return Ok(TransactionResult {
                    committed: false,
                    snapshot: Snapshot::new(path.clone(), self.get(path)),
                });
            };
            next.validate_under(path)?;

            if apply_locally {
                let deliveries = {
                    let state = self.lock();
                    let mut proposed = state.root.clone();
                    write(&mut proposed, path, next.clone());
                    state.listeners.deliveries(
                        &proposed,
                        std::slice::from_ref(path),
                        true,
                        &state.rules,
                    )
                };
                *shown_speculative |= !deliveries.is_empty();
                dispatch(deliveries);
            }

            let committed: Option<(Snapshot, Vec<Delivery>)> = {
                let state = &mut *self.lock();
                if state.root.get_or_null(path) == current {
                    write(&mut state.root, path, next);
                    let snapshot = Snapshot::new(path.clone(), state.root.get_or_null(path));
                    let deliveries = state.listeners.deliveries(
                        &state.root,
                        std::slice::from_ref(path),
                        false,
                        &state.rules,
                    );
                    Some((snapshot, deliveries))
                } else {
                    None
                }
            };

            match committed {
                Some((snapshot, deliveries)) => {
                    tracing::trace!(path = %path, attempt, "transaction committed");
                    dispatch(deliveries);
                    return Ok(TransactionResult {
                        committed: true,
                        snapshot,
                    });
                }
                None => {
                    tracing::debug!(path = %path, attempt, "transaction lost a race, retrying");
                }
            }
        }

        tracing::debug!(path = %path, attempts, "transaction gave up");
        Err(ClientError::MaxRetries {
            path: path.clone(),
            attempts,
        })
    }
}

/// Store `value` at `path` (deleting on `Null`) and prune empty branches.
fn write(root: &mut Value, path: &Path, value: Value) {
    if value.is_null() {
        root.remove(path);
    } else {
        root.set(path, value);
    }
    root.prune();
}

impl DatabaseClient for MemoryDatabase {
    fn once_value(&self, path: &Path, callback: ReadCallback) {
        tracing::trace!(path = %path, "once value");
        callback(self.read(path));
    }

    fn update(&self, path: &Path, data: Mapping, callback: WriteCallback) {
        callback(self.apply_update(path, data));
    }

    fn transaction(
        &self,
        path: &Path,
        mut update: UpdateFunction,
        callback: TransactionCallback,
        apply_locally: bool,
    ) {
        callback(self.run_transaction(path, &mut update, apply_locally));
    }
}
