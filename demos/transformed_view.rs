//! Transformed view example: presenting one value through another shape

use satchel::Signal;

fn main() {
    println!("=== Transformed View Example ===\n");

    // The source keeps volume as 0..=100; the view exposes it as 0.0..=1.0.
    let volume = Signal::new(50_u32);
    let gain = volume.project(
        |v| f64::from(*v) / 100.0,
        |g: f64| (g * 100.0).round() as u32,
    );

    println!("volume = {}, gain = {}", volume.get(), gain.get());

    gain.set(0.8);
    println!("after gain.set(0.8): volume = {}", volume.get());

    volume.set(25);
    println!("after volume.set(25): gain = {}", gain.get());
}
