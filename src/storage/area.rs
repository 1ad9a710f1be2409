/// Name of the event a storage area fires when one of its records changes.
pub const STORAGE_EVENT: &str = "storage";

/// A durable key-value text store.
///
/// Records are opaque strings keyed by opaque strings; this crate writes
/// JSON text into them but the area itself imposes no format. Reads and
/// writes are synchronous from the caller's point of view.
pub trait StorageArea {
    /// The stored text for `key`, if any.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `text` under `key`, overwriting any prior record.
    fn set_item(&self, key: &str, text: &str);

    /// Delete the record for `key`, if present.
    fn remove_item(&self, key: &str);
}

/// Notification of a record change in a shared storage area.
///
/// Delivered to listeners in every execution context except the one that
/// performed the write. `new_value` is `None` when the record was deleted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageEvent {
    /// The key whose record changed.
    pub key: String,
    /// The text now stored, or `None` for a deletion.
    pub new_value: Option<String>,
    /// The text previously stored, or `None` if the key was absent.
    pub old_value: Option<String>,
}
