//! Session Storage
//!
//! Access token and username in `localStorage`. Both keys are written on
//! login and removed together on logout.

use web_sys::{window, Storage};

/// Storage key for the bearer token
pub const TOKEN_KEY: &str = "access_token";

/// Storage key for the display name
pub const USERNAME_KEY: &str = "username";

fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok()?
}

fn get(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok()?
}

/// Persisted access token, if any
pub fn token() -> Option<String> {
    get(TOKEN_KEY)
}

/// Persisted username, if any
pub fn username() -> Option<String> {
    get(USERNAME_KEY)
}

/// Any stored token counts; the server is the judge of validity
pub fn is_authenticated() -> bool {
    token().is_some()
}

/// Store both session keys
pub fn save(token: &str, username: &str) -> Result<(), String> {
    let storage = local_storage().ok_or("localStorage unavailable")?;
    storage
        .set_item(TOKEN_KEY, token)
        .map_err(|_| "Failed to store access token".to_string())?;
    if storage.set_item(USERNAME_KEY, username).is_err() {
        // A token without its username would still pass the guard
        let _ = storage.remove_item(TOKEN_KEY);
        return Err("Failed to store username".to_string());
    }
    Ok(())
}

/// Remove both session keys
pub fn clear() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(TOKEN_KEY);
        let _ = storage.remove_item(USERNAME_KEY);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_save_then_clear() {
        clear();
        assert!(!is_authenticated());

        save("tok-1", "erin").unwrap();
        assert!(is_authenticated());
        assert_eq!(token().as_deref(), Some("tok-1"));
        assert_eq!(username().as_deref(), Some("erin"));

        clear();
        assert!(token().is_none());
        assert!(username().is_none());
        assert!(!is_authenticated());
    }

    #[wasm_bindgen_test]
    fn test_guard_follows_storage() {
        clear();
        assert_eq!(
            crate::components::private_route::redirect_target(is_authenticated()),
            Some("/")
        );

        save("tok-2", "frank").unwrap();
        assert_eq!(
            crate::components::private_route::redirect_target(is_authenticated()),
            None
        );
        clear();
    }
}
