//! Persisted settings example

use satchel::{MemoryStorage, PersistentSignal, StorageArea};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Settings {
    theme: String,
    volume: u32,
}

fn main() -> satchel::Result<()> {
    env_logger::init();
    println!("=== Persisted Settings Example ===\n");

    let storage = MemoryStorage::new();

    // Pretend a previous run left a partial record behind.
    storage.set_item("settings", r#"{"volume":80}"#);

    let defaults = Settings {
        theme: "light".to_string(),
        volume: 50,
    };
    let settings = PersistentSignal::open(&storage, "settings", &defaults)?;

    // The missing theme was backfilled; the stored volume survived.
    println!("Loaded: {:?}", settings.get());

    settings.update(|s| s.theme = "dark".to_string());
    println!(
        "After update, storage holds: {}",
        storage.get_item("settings").unwrap()
    );

    Ok(())
}
