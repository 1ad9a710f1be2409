use crate::error::{Result, StoreError};
use crate::event::{subscribe, EventTarget, ListenerOptions, Subscription};
use crate::signal::{Effect, Projection, Signal};
use crate::storage::{StorageArea, StorageEvent, STORAGE_EVENT};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A reactive value bound to a record in durable storage and kept in sync
/// with other execution contexts sharing that storage.
///
/// [`open`](PersistentSignal::open) seeds the value from the stored JSON
/// record (backfilling missing top-level fields from the supplied
/// template), then:
///
/// - every local mutation serializes the full value and writes it back
///   under the key, one unconditional write per mutation;
/// - a change event for the same key from another context replaces the
///   local value wholesale without re-running the write-back, so syncing
///   never bounces the update back into storage. Deletions from other
///   contexts are ignored: the local value stays as it is.
///
/// The conflict policy across contexts is last-write-wins at whole-value
/// granularity, ordered by event delivery.
///
/// Dropping the `PersistentSignal` detaches both the write-back observer
/// and the sync listener; the stored record outlives it. Use
/// [`unbind`](PersistentSignal::unbind) to detach only the sync listener.
///
/// # Examples
///
/// ```
/// use satchel::{MemoryStorage, PersistentSignal, StorageArea};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// struct Settings {
///     theme: String,
///     volume: u32,
/// }
///
/// let storage = MemoryStorage::new();
/// let defaults = Settings { theme: "light".into(), volume: 50 };
///
/// let settings = PersistentSignal::open(&storage, "settings", &defaults).unwrap();
/// assert_eq!(settings.get(), defaults);
///
/// settings.update(|s| s.volume = 80);
/// assert_eq!(
///     storage.get_item("settings").as_deref(),
///     Some(r#"{"theme":"light","volume":80}"#),
/// );
/// ```
pub struct PersistentSignal<T> {
    key: String,
    signal: Signal<T>,
    _persist: Effect,
    sync: Option<Subscription>,
}

impl<T> PersistentSignal<T>
where
    T: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    /// Bind the record under `key` in `storage` to a reactive value.
    ///
    /// If a record exists its JSON text is parsed (a malformed record is
    /// a [`StoreError::Parse`], not a fallback to defaults); otherwise
    /// `initial` is used. Either way, top-level fields of `initial`
    /// missing from the loaded object are backfilled from it. This is a
    /// one-level fill, not a recursive merge, and fields present in
    /// storage but unknown to `initial` are preserved. The resulting
    /// value is written back immediately, so the record exists as soon as
    /// `open` returns.
    pub fn open<S>(storage: &S, key: impl Into<String>, initial: &T) -> Result<Self>
    where
        S: StorageArea + EventTarget<StorageEvent> + Clone + Send + Sync + 'static,
    {
        let key = key.into();

        let template = serde_json::to_value(initial).map_err(|e| StoreError::Serialize {
            key: key.clone(),
            source: e,
        })?;

        let mut loaded = match storage.get_item(&key) {
            Some(text) => {
                log::debug!("loading {key:?} from storage ({} bytes)", text.len());
                serde_json::from_str(&text).map_err(|e| StoreError::Parse {
                    key: key.clone(),
                    source: e,
                })?
            }
            None => {
                log::debug!("no record for {key:?}, starting from defaults");
                template.clone()
            }
        };

        // One-level backfill: fill template fields the record is missing,
        // leave everything else (unknown fields included) untouched.
        if let (Value::Object(loaded), Value::Object(template)) = (&mut loaded, &template) {
            for (field, fallback) in template {
                if !loaded.contains_key(field) {
                    loaded.insert(field.clone(), fallback.clone());
                }
            }
        }

        let value: T = serde_json::from_value(loaded).map_err(|e| StoreError::Parse {
            key: key.clone(),
            source: e,
        })?;
        let signal = Signal::new(value);

        // Write-back observer: one storage write per mutation, no
        // coalescing. The immediate first run persists the value loaded
        // above.
        let persist = Effect::new({
            let signal = signal.clone();
            let storage = storage.clone();
            let key = key.clone();
            move || {
                let text = signal
                    .with(serde_json::to_string)
                    .unwrap_or_else(|e| panic!("value for {key:?} stopped being JSON: {e}"));
                storage.set_item(&key, &text);
                log::trace!("persisted {key:?} ({} bytes)", text.len());
            }
        });

        // Sync listener: replace the local value when another context
        // writes this key. `set_silent` keeps the write-back observer
        // from firing, so the update is not echoed into storage; a
        // deletion elsewhere (no new value) leaves the local value alone.
        let sync = subscribe(
            storage,
            STORAGE_EVENT,
            {
                let signal = signal.clone();
                let key = key.clone();
                move |event: &StorageEvent| {
                    if event.key != key {
                        return;
                    }
                    let Some(text) = event.new_value.as_deref() else {
                        return;
                    };
                    let value: T = serde_json::from_str(text).unwrap_or_else(|e| {
                        panic!("malformed JSON for {key:?} from another context: {e}")
                    });
                    log::debug!("applying external update for {key:?}");
                    signal.set_silent(value);
                }
            },
            ListenerOptions::default(),
        );

        Ok(Self {
            key,
            signal,
            _persist: persist,
            sync: Some(sync),
        })
    }

    /// Get a clone of the current value (tracked read).
    pub fn get(&self) -> T {
        self.signal.get()
    }

    /// Borrow the current value without cloning (tracked read).
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.signal.with(f)
    }

    /// Replace the value; observers run and the record is rewritten.
    pub fn set(&self, value: T) {
        self.signal.set(value);
    }

    /// Mutate the value in place; observers run and the record is
    /// rewritten.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.signal.update(f);
    }

    /// A handle to the underlying signal, e.g. for building effects or
    /// projections on top of it. Writes through the handle persist like
    /// writes through `self`.
    pub fn signal(&self) -> Signal<T> {
        self.signal.clone()
    }

    /// Present the stored value through a bidirectional transform.
    pub fn project<U, To, From>(&self, to: To, from: From) -> Projection<T, U>
    where
        U: Clone + Send + Sync + 'static,
        To: Fn(&T) -> U + Send + Sync + 'static,
        From: Fn(U) -> T + Send + Sync + 'static,
    {
        self.signal.project(to, from)
    }

    /// The storage key this value is bound to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Detach the cross-context sync listener.
    ///
    /// The value stays readable and writable, and local writes still
    /// persist; it just no longer reacts to changes made by other
    /// contexts. Idempotent.
    pub fn unbind(&mut self) {
        self.sync = None;
    }
}
