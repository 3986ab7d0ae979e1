//! Build script for breath-cli
//!
//! Validates the embedded session.toml at compile time.

use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=session.toml");
    println!("cargo:rerun-if-changed=build.rs");

    let config_path = Path::new("session.toml");
    let content = match std::fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => panic!("Cannot read session.toml: {}", e),
    };

    let value: toml::Table = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => panic!("session.toml is not valid TOML: {}", e),
    };

    let has_steps = value
        .get("steps")
        .and_then(|s| s.as_array())
        .map(|s| !s.is_empty())
        .unwrap_or(false);
    let has_pattern = value.contains_key("pattern") || value.contains_key("preset");

    if !has_steps && !has_pattern {
        panic!("session.toml must define [[steps]], [pattern] or preset");
    }
}
