//! Two execution contexts sharing one storage area, converging on writes

use satchel::{MemoryStorage, PersistentSignal};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Settings {
    theme: String,
    volume: u32,
}

fn main() -> satchel::Result<()> {
    env_logger::init();
    println!("=== Two Contexts Example ===\n");

    let storage = MemoryStorage::new();
    let defaults = Settings {
        theme: "light".to_string(),
        volume: 50,
    };

    // Two handles onto the same storage, as two tabs would have.
    let tab_a = PersistentSignal::open(&storage, "settings", &defaults)?;
    let tab_b = PersistentSignal::open(&storage.handle(), "settings", &defaults)?;

    println!("A writes theme=dark...");
    tab_a.update(|s| s.theme = "dark".to_string());
    println!("B now sees: {:?}", tab_b.get());

    println!("\nB writes volume=5...");
    tab_b.update(|s| s.volume = 5);
    println!("A now sees: {:?}", tab_a.get());

    Ok(())
}
