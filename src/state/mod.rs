use crate::api::{ApiClient, ApiError, EnvConfig};
use crate::models::{AccountInfo, ListingSummary};
use crate::storage::{load_flag, load_user_from_storage, SIDEBAR_COLLAPSED_KEY};
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,
    pub current_user: RwSignal<Option<AccountInfo>>,

    /// Dashboard locale. Starts from the account, then `window.ENV`.
    pub locale: RwSignal<String>,

    /// Listings owned by the current account.
    pub listings: RwSignal<Vec<ListingSummary>>,
    pub listings_loading: RwSignal<bool>,
    pub listings_error: RwSignal<Option<String>>,

    /// Bumped to ask server-backed views to re-fetch (after a listing save).
    pub data_version: RwSignal<u64>,

    pub sidebar_collapsed: RwSignal<bool>,
}

impl AppState {
    pub fn new() -> Self {
        let env = EnvConfig::new();
        let stored_client = ApiClient::load_from_storage();
        let stored_user = load_user_from_storage();

        let locale = stored_user
            .as_ref()
            .and_then(|u| u.locale())
            .unwrap_or(env.default_locale);

        Self {
            api_client: RwSignal::new(stored_client),
            current_user: RwSignal::new(stored_user),
            locale: RwSignal::new(locale),
            listings: RwSignal::new(vec![]),
            listings_loading: RwSignal::new(false),
            listings_error: RwSignal::new(None),
            data_version: RwSignal::new(0),
            sidebar_collapsed: RwSignal::new(load_flag(SIDEBAR_COLLAPSED_KEY)),
        }
    }

    /// Re-fetch server-rendered dashboard data without a full reload.
    pub fn refresh(&self) {
        self.data_version.update(|v| *v += 1);
    }

    /// Drop the session and go to the login page.
    pub fn force_login(&self) {
        let mut c = self.api_client.get_untracked();
        c.logout();
        self.api_client.set(c);
        self.current_user.set(None);
        let _ = window().location().set_href("/login");
    }

    /// Common error path for page loads: 401 logs out, anything else is shown.
    pub fn handle_error(&self, e: ApiError, error: RwSignal<Option<String>>) {
        if e.is_unauthorized() {
            self.force_login();
        } else {
            error.set(Some(e.to_string()));
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);
