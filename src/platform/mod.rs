//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Key/value storage (LocalStorage on web, nothing natively)

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Seed for a new run derived from the clock
pub fn time_seed() -> u64 {
    now_ms() as u64
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Read a raw string from storage
#[cfg(target_arch = "wasm32")]
pub fn storage_get(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok()?
}

/// Write a raw string to storage; returns false if storage is unavailable
#[cfg(target_arch = "wasm32")]
pub fn storage_set(key: &str, value: &str) -> bool {
    local_storage()
        .map(|s| s.set_item(key, value).is_ok())
        .unwrap_or(false)
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn storage_get(_key: &str) -> Option<String> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn storage_set(_key: &str, _value: &str) -> bool {
    false
}

/// Load a JSON value from storage, falling back to `None` on any problem
pub fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    let json = storage_get(key)?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring corrupt `{}` in storage: {}", key, e);
            None
        }
    }
}

/// Save a JSON value to storage
pub fn save_json<T: Serialize>(key: &str, value: &T) -> bool {
    match serde_json::to_string(value) {
        Ok(json) => storage_set(key, &json),
        Err(e) => {
            log::warn!("Could not serialize `{}`: {}", key, e);
            false
        }
    }
}
