//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `prodcat_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("prodcat_core ping={}", prodcat_core::ping());
    println!("prodcat_core version={}", prodcat_core::core_version());
}
