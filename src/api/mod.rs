use crate::listings::ListingUpdateRequest;
use crate::models::{AccountInfo, LeadsPage, Listing, ListingSummary};
use crate::settings::{NotificationSettingsData, NotificationSettingsPatch, UpdateResult};
use crate::storage::{TOKEN_KEY, USER_KEY};
use reqwest::Method;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Unauthorized,
    Network,
    Http,
    Parse,
}

/// Every remote failure is one opaque message plus a coarse kind.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn unauthorized() -> Self {
        Self {
            kind: ApiErrorKind::Unauthorized,
            message: "Unauthorized".to_string(),
        }
    }

    /// Prefers the server's `{"error": "..."}` message when the body carries one.
    fn http(status: u16, body: &str, ctx: &str) -> Self {
        match error_message_from_body(body) {
            Some(message) => Self {
                kind: ApiErrorKind::Http,
                message,
            },
            None => Self::http_status(status, ctx),
        }
    }

    pub(crate) fn http_status(status: u16, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status})"),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

/// Fold a settings update into the `{success, error}` shape the settings panel
/// expects. A rejected session also runs `on_unauthorized`.
pub(crate) fn settings_update_outcome(
    res: ApiResult<UpdateResult>,
    on_unauthorized: impl FnOnce(),
) -> UpdateResult {
    match res {
        Ok(r) => r,
        Err(e) => {
            if e.is_unauthorized() {
                on_unauthorized();
            }
            UpdateResult::failed(e.message)
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

pub(crate) fn error_message_from_body(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.error)
        .filter(|e| !e.trim().is_empty())
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
    pub default_locale: String,
    pub log_level: String,
}

impl EnvConfig {
    const DEFAULT_API_URL: &'static str = "http://localhost:8787";

    pub fn new() -> Self {
        let mut cfg = Self {
            api_url: Self::DEFAULT_API_URL.to_string(),
            default_locale: "en".to_string(),
            log_level: "info".to_string(),
        };

        // Both `window.ENV.API_URL` and `window.ENV.api_url` are accepted.
        if let Some(v) = read_env_string(&["API_URL", "api_url"]) {
            cfg.api_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = read_env_string(&["DEFAULT_LOCALE", "default_locale"]) {
            cfg.default_locale = v;
        }
        if let Some(v) = read_env_string(&["LOG_LEVEL", "log_level"]) {
            cfg.log_level = v;
        }

        cfg
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
fn read_env_string(keys: &[&str]) -> Option<String> {
    let window = web_sys::window()?;
    let env = window.get("ENV")?;
    if env.is_undefined() || !env.is_object() {
        return None;
    }
    keys.iter().find_map(|k| {
        js_sys::Reflect::get(&env, &(*k).into())
            .ok()
            .and_then(|v| v.as_string())
            .filter(|s| !s.trim().is_empty())
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn read_env_string(_keys: &[&str]) -> Option<String> {
    None
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct LoginResponse {
    pub token: String,
    pub account: AccountInfo,
}

#[derive(Deserialize, Clone, Debug, Default)]
struct ListingsResponse {
    #[serde(default)]
    listings: Vec<ListingSummary>,
}

#[derive(Clone)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) token: Option<String>,
}

impl ApiClient {
    #[allow(dead_code)]
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            token: None,
        }
    }

    pub fn load_from_storage() -> Self {
        let base_url = EnvConfig::new().api_url;
        let token = crate::storage::local_storage().and_then(|s| s.get_item(TOKEN_KEY).ok().flatten());

        Self { base_url, token }
    }

    pub fn save_to_storage(&self) {
        if let Some(storage) = crate::storage::local_storage() {
            if let Some(token) = &self.token {
                let _ = storage.set_item(TOKEN_KEY, token);
            }
        }
    }

    pub fn clear_storage() {
        if let Some(storage) = crate::storage::local_storage() {
            let _ = storage.remove_item(TOKEN_KEY);
            let _ = storage.remove_item(USER_KEY);
        }
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub(crate) fn get_auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    pub fn logout(&mut self) {
        self.token = None;
        Self::clear_storage();
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn build(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut req = reqwest::Client::new().request(method, self.url(path));
        if let Some(header) = self.get_auth_header() {
            req = req.header("Authorization", header);
        }
        req
    }

    async fn send(&self, req: reqwest::RequestBuilder, ctx: &str) -> ApiResult<reqwest::Response> {
        let res = req.send().await.map_err(ApiError::network)?;

        let status = res.status();
        if status.is_success() {
            Ok(res)
        } else if status.as_u16() == 401 {
            tracing::warn!(ctx, "request unauthorized");
            Err(ApiError::unauthorized())
        } else {
            let body = res.text().await.unwrap_or_default();
            tracing::warn!(ctx, status = status.as_u16(), "request failed");
            Err(ApiError::http(status.as_u16(), &body, ctx))
        }
    }

    async fn request_json<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
        ctx: &str,
    ) -> ApiResult<T> {
        let mut req = self.build(method, path);
        if let Some(b) = body {
            req = req.json(b);
        }
        let res = self.send(req, ctx).await?;
        res.json().await.map_err(ApiError::parse)
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        self.request_json(
            Method::POST,
            "/api/auth/login",
            Some(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            }),
            "Login failed",
        )
        .await
    }

    pub async fn get_notification_settings(&self) -> ApiResult<NotificationSettingsData> {
        self.request_json(
            Method::GET,
            "/api/dashboard/notification-settings",
            None::<&()>,
            "Failed to load notification settings",
        )
        .await
    }

    /// Sends only the keys present in `patch`.
    pub async fn update_notification_settings(
        &self,
        patch: &NotificationSettingsPatch,
    ) -> ApiResult<UpdateResult> {
        self.request_json(
            Method::POST,
            "/api/dashboard/notification-settings",
            Some(patch),
            "Failed to save notification settings",
        )
        .await
    }

    pub async fn get_listings(&self) -> ApiResult<Vec<ListingSummary>> {
        let data: ListingsResponse = self
            .request_json(
                Method::GET,
                "/api/dashboard/listings",
                None::<&()>,
                "Failed to load listings",
            )
            .await?;
        Ok(data.listings)
    }

    pub async fn get_listing(&self, listing_id: &str) -> ApiResult<Listing> {
        self.request_json(
            Method::GET,
            &format!(
                "/api/dashboard/listings/{}",
                urlencoding::encode(listing_id)
            ),
            None::<&()>,
            "Failed to load listing",
        )
        .await
    }

    /// Full field set, not a diff. The response body is not used.
    pub async fn update_listing(&self, req: &ListingUpdateRequest) -> ApiResult<()> {
        let builder = self.build(Method::PUT, "/api/dashboard/listings").json(req);
        self.send(builder, "Failed to update listing").await?;
        tracing::info!(listing_id = %req.listing_id, "listing updated");
        Ok(())
    }

    /// `query` is an encoded query string (`?listingId=..`) or empty.
    pub async fn get_leads(&self, query: &str) -> ApiResult<LeadsPage> {
        self.request_json(
            Method::GET,
            &format!("/api/dashboard/leads{query}"),
            None::<&()>,
            "Failed to load leads",
        )
        .await
    }

    /// Raw CSV bytes for the filtered leads.
    pub async fn export_leads(&self, query: String) -> ApiResult<Vec<u8>> {
        let req = self.build(Method::GET, &format!("/api/dashboard/leads/export{query}"));
        let res = self.send(req, "Export failed").await?;
        let bytes = res.bytes().await.map_err(ApiError::network)?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_contract_deserialize() {
        let json = r#"{
            "token": "jwt-token",
            "account": {"id": 1, "businessName": "Happy Paws", "locale": "fr"}
        }"#;
        let parsed: LoginResponse =
            serde_json::from_str(json).expect("login response should parse");
        assert_eq!(parsed.token, "jwt-token");
        assert_eq!(parsed.account.business_name(), "Happy Paws");
    }

    #[test]
    fn test_error_message_from_body() {
        assert_eq!(
            error_message_from_body(r#"{"error": "Listing not found"}"#).as_deref(),
            Some("Listing not found")
        );
        assert!(error_message_from_body("<html>502</html>").is_none());
        assert!(error_message_from_body(r#"{"error": ""}"#).is_none());
    }

    #[test]
    fn test_http_error_prefers_server_message() {
        let e = ApiError::http(400, r#"{"error":"Name too long"}"#, "Failed to update listing");
        assert_eq!(e.to_string(), "Name too long");
        assert_eq!(e.kind, ApiErrorKind::Http);

        let e = ApiError::http(500, "oops", "Export failed");
        assert_eq!(e.to_string(), "Export failed (500)");
    }

    #[test]
    fn test_unauthorized_kind() {
        assert!(ApiError::unauthorized().is_unauthorized());
        assert!(!ApiError::http_status(500, "x").is_unauthorized());
    }

    #[test]
    fn test_settings_update_outcome_logs_out_on_unauthorized() {
        let mut logged_out = false;
        let r = settings_update_outcome(Err(ApiError::unauthorized()), || logged_out = true);
        assert!(logged_out);
        assert_eq!(r.into_result(), Err("Unauthorized".to_string()));

        let mut logged_out = false;
        let r = settings_update_outcome(
            Err(ApiError::http_status(503, "Failed to save notification settings")),
            || logged_out = true,
        );
        assert!(!logged_out);
        assert!(r.into_result().is_err_and(|e| e.contains("503")));

        let r = settings_update_outcome(Ok(UpdateResult::ok()), || panic!("not expected"));
        assert_eq!(r.into_result(), Ok(()));
    }

    #[test]
    fn test_api_client_auth_header() {
        let mut client = ApiClient::new("http://localhost:8787".to_string());
        assert!(client.get_auth_header().is_none());
        assert!(!client.is_authenticated());

        client.set_token("my-jwt-token".to_string());
        assert_eq!(client.get_auth_header().as_deref(), Some("Bearer my-jwt-token"));
        assert!(client.is_authenticated());
    }

    #[test]
    fn test_api_client_url_join() {
        let client = ApiClient::new("http://localhost:8787".to_string());
        assert_eq!(
            client.url("/api/dashboard/leads?period=7days"),
            "http://localhost:8787/api/dashboard/leads?period=7days"
        );
    }

    #[test]
    fn test_env_config_defaults_outside_browser() {
        let cfg = EnvConfig::new();
        assert_eq!(cfg.api_url, "http://localhost:8787");
        assert_eq!(cfg.default_locale, "en");
        assert_eq!(cfg.log_level, "info");
    }
}
