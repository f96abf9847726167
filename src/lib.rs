mod analytics;
mod api;
mod app;
mod components;
mod download;
mod leads;
mod listings;
mod logging;
mod models;
mod pages;
mod settings;
mod state;
mod storage;
mod util;

use crate::api::EnvConfig;
use crate::app::App;
use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use crate::api::ApiClient;
    use crate::models::AccountInfo;
    use crate::storage::{load_flag, load_user_from_storage, save_flag, save_user_to_storage};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_api_client_storage_roundtrip_token() {
        ApiClient::clear_storage();

        let mut c = ApiClient::load_from_storage();
        assert!(!c.is_authenticated());

        c.set_token("t1".to_string());
        c.save_to_storage();

        let c2 = ApiClient::load_from_storage();
        assert_eq!(c2.token.as_deref(), Some("t1"));

        ApiClient::clear_storage();
        let c3 = ApiClient::load_from_storage();
        assert!(c3.token.is_none());
    }

    #[wasm_bindgen_test]
    fn test_account_storage_roundtrip() {
        let user = AccountInfo {
            extra: serde_json::json!({"id": 3, "businessName": "Happy Paws", "locale": "fr"}),
        };
        save_user_to_storage(&user);
        let loaded = load_user_from_storage().expect("should load account from localStorage");
        assert_eq!(loaded.business_name(), "Happy Paws");
        assert_eq!(loaded.locale().as_deref(), Some("fr"));
    }

    #[wasm_bindgen_test]
    fn test_flag_roundtrip() {
        save_flag("pawdir_test_flag", true);
        assert!(load_flag("pawdir_test_flag"));
        save_flag("pawdir_test_flag", false);
        assert!(!load_flag("pawdir_test_flag"));
    }
}

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    let env = EnvConfig::new();
    logging::init(&env.log_level);
    tracing::info!(api_url = %env.api_url, "dashboard starting");
    mount_to_body(App);
}
