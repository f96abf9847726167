use serde::{Deserialize, Serialize};

pub(crate) const WEEKLY_CAP_MIN: u16 = 1;
pub(crate) const WEEKLY_CAP_MAX: u16 = 1000;
pub(crate) const HOURS_PER_DAY: u8 = 24;

/// Per-account notification preferences.
///
/// Wire names are camelCase (`emailReviews`, `quietHoursStart`, ...).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NotificationSettingsData {
    pub email_general: bool,
    pub email_reviews: bool,
    pub email_favorites: bool,
    pub email_leads: bool,
    pub email_business: bool,
    pub email_digest: bool,

    #[serde(default)]
    pub locale: Option<String>,

    #[serde(default)]
    pub quiet_hours_enabled: bool,
    /// 0-23. Ignored unless `quiet_hours_enabled`.
    #[serde(default)]
    pub quiet_hours_start: Option<u8>,
    /// 0-23. Ignored unless `quiet_hours_enabled`.
    #[serde(default)]
    pub quiet_hours_end: Option<u8>,
    /// IANA zone name, e.g. `Europe/Madrid`.
    #[serde(default)]
    pub timezone: Option<String>,

    /// 1-1000.
    #[serde(default)]
    pub max_emails_per_week: Option<u16>,
}

impl NotificationSettingsData {
    /// Quiet-hours window, only when the feature is switched on and both ends are set.
    pub fn effective_quiet_hours(&self) -> Option<(u8, u8)> {
        if !self.quiet_hours_enabled {
            return None;
        }
        match (self.quiet_hours_start, self.quiet_hours_end) {
            (Some(s), Some(e)) => Some((s, e)),
            _ => None,
        }
    }

    pub fn apply(&mut self, p: &NotificationSettingsPatch) {
        if let Some(v) = p.email_general {
            self.email_general = v;
        }
        if let Some(v) = p.email_reviews {
            self.email_reviews = v;
        }
        if let Some(v) = p.email_favorites {
            self.email_favorites = v;
        }
        if let Some(v) = p.email_leads {
            self.email_leads = v;
        }
        if let Some(v) = p.email_business {
            self.email_business = v;
        }
        if let Some(v) = p.email_digest {
            self.email_digest = v;
        }
        if let Some(v) = &p.locale {
            self.locale = v.clone();
        }
        if let Some(v) = p.quiet_hours_enabled {
            self.quiet_hours_enabled = v;
        }
        if let Some(v) = p.quiet_hours_start {
            self.quiet_hours_start = v;
        }
        if let Some(v) = p.quiet_hours_end {
            self.quiet_hours_end = v;
        }
        if let Some(v) = &p.timezone {
            self.timezone = v.clone();
        }
        if let Some(v) = p.max_emails_per_week {
            self.max_emails_per_week = v;
        }
    }

    /// Current values of exactly the keys `p` touches. Applying the result undoes `p`.
    pub fn previous_values(&self, p: &NotificationSettingsPatch) -> NotificationSettingsPatch {
        NotificationSettingsPatch {
            email_general: p.email_general.map(|_| self.email_general),
            email_reviews: p.email_reviews.map(|_| self.email_reviews),
            email_favorites: p.email_favorites.map(|_| self.email_favorites),
            email_leads: p.email_leads.map(|_| self.email_leads),
            email_business: p.email_business.map(|_| self.email_business),
            email_digest: p.email_digest.map(|_| self.email_digest),
            locale: p.locale.as_ref().map(|_| self.locale.clone()),
            quiet_hours_enabled: p.quiet_hours_enabled.map(|_| self.quiet_hours_enabled),
            quiet_hours_start: p.quiet_hours_start.map(|_| self.quiet_hours_start),
            quiet_hours_end: p.quiet_hours_end.map(|_| self.quiet_hours_end),
            timezone: p.timezone.as_ref().map(|_| self.timezone.clone()),
            max_emails_per_week: p.max_emails_per_week.map(|_| self.max_emails_per_week),
        }
    }
}

/// Partial update. Absent fields are not serialized; nullable fields use
/// `Some(None)` to send an explicit `null`.
#[derive(Serialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NotificationSettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_general: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_reviews: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_favorites: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_leads: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_business: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_digest: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiet_hours_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiet_hours_start: Option<Option<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiet_hours_end: Option<Option<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_emails_per_week: Option<Option<u16>>,
}

impl NotificationSettingsPatch {
    /// Wire names of the keys this patch carries.
    pub fn keys(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.email_general.is_some() {
            out.push("emailGeneral");
        }
        if self.email_reviews.is_some() {
            out.push("emailReviews");
        }
        if self.email_favorites.is_some() {
            out.push("emailFavorites");
        }
        if self.email_leads.is_some() {
            out.push("emailLeads");
        }
        if self.email_business.is_some() {
            out.push("emailBusiness");
        }
        if self.email_digest.is_some() {
            out.push("emailDigest");
        }
        if self.locale.is_some() {
            out.push("locale");
        }
        if self.quiet_hours_enabled.is_some() {
            out.push("quietHoursEnabled");
        }
        if self.quiet_hours_start.is_some() {
            out.push("quietHoursStart");
        }
        if self.quiet_hours_end.is_some() {
            out.push("quietHoursEnd");
        }
        if self.timezone.is_some() {
            out.push("timezone");
        }
        if self.max_emails_per_week.is_some() {
            out.push("maxEmailsPerWeek");
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    /// Drop every key for which `keep` returns false.
    pub fn retain_keys(&mut self, keep: impl Fn(&str) -> bool) {
        if !keep("emailGeneral") {
            self.email_general = None;
        }
        if !keep("emailReviews") {
            self.email_reviews = None;
        }
        if !keep("emailFavorites") {
            self.email_favorites = None;
        }
        if !keep("emailLeads") {
            self.email_leads = None;
        }
        if !keep("emailBusiness") {
            self.email_business = None;
        }
        if !keep("emailDigest") {
            self.email_digest = None;
        }
        if !keep("locale") {
            self.locale = None;
        }
        if !keep("quietHoursEnabled") {
            self.quiet_hours_enabled = None;
        }
        if !keep("quietHoursStart") {
            self.quiet_hours_start = None;
        }
        if !keep("quietHoursEnd") {
            self.quiet_hours_end = None;
        }
        if !keep("timezone") {
            self.timezone = None;
        }
        if !keep("maxEmailsPerWeek") {
            self.max_emails_per_week = None;
        }
    }
}

/// Body returned by the settings update endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct UpdateResult {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl UpdateResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
        }
    }

    pub fn into_result(self) -> Result<(), String> {
        if self.success {
            Ok(())
        } else {
            Err(self
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| "Failed to save settings".to_string()))
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NotificationChannel {
    General,
    Reviews,
    Favorites,
    Leads,
    Business,
    Digest,
}

impl NotificationChannel {
    pub const ALL: [NotificationChannel; 6] = [
        NotificationChannel::General,
        NotificationChannel::Reviews,
        NotificationChannel::Favorites,
        NotificationChannel::Leads,
        NotificationChannel::Business,
        NotificationChannel::Digest,
    ];

    pub fn is_enabled(self, s: &NotificationSettingsData) -> bool {
        match self {
            NotificationChannel::General => s.email_general,
            NotificationChannel::Reviews => s.email_reviews,
            NotificationChannel::Favorites => s.email_favorites,
            NotificationChannel::Leads => s.email_leads,
            NotificationChannel::Business => s.email_business,
            NotificationChannel::Digest => s.email_digest,
        }
    }

    pub fn patch(self, enabled: bool) -> NotificationSettingsPatch {
        let mut p = NotificationSettingsPatch::default();
        match self {
            NotificationChannel::General => p.email_general = Some(enabled),
            NotificationChannel::Reviews => p.email_reviews = Some(enabled),
            NotificationChannel::Favorites => p.email_favorites = Some(enabled),
            NotificationChannel::Leads => p.email_leads = Some(enabled),
            NotificationChannel::Business => p.email_business = Some(enabled),
            NotificationChannel::Digest => p.email_digest = Some(enabled),
        }
        p
    }

    /// Stable DOM id for the toggle.
    pub fn input_id(self) -> &'static str {
        match self {
            NotificationChannel::General => "notify-general",
            NotificationChannel::Reviews => "notify-reviews",
            NotificationChannel::Favorites => "notify-favorites",
            NotificationChannel::Leads => "notify-leads",
            NotificationChannel::Business => "notify-business",
            NotificationChannel::Digest => "notify-digest",
        }
    }
}

/// Parse the weekly cap input. Anything that is not an integer in range is rejected.
pub(crate) fn parse_weekly_cap(input: &str) -> Option<u16> {
    let n: u32 = input.trim().parse().ok()?;
    if (WEEKLY_CAP_MIN as u32..=WEEKLY_CAP_MAX as u32).contains(&n) {
        Some(n as u16)
    } else {
        None
    }
}

pub(crate) fn parse_hour(input: &str) -> Option<u8> {
    let h: u8 = input.trim().parse().ok()?;
    (h < HOURS_PER_DAY).then_some(h)
}

pub(crate) fn format_hour(h: u8) -> String {
    format!("{:02}:00", h)
}

/// Zones offered by the timezone select. The stored value may be any IANA name.
pub(crate) const COMMON_TIMEZONES: &[&str] = &[
    "UTC",
    "Europe/London",
    "Europe/Madrid",
    "Europe/Paris",
    "Europe/Berlin",
    "America/New_York",
    "America/Chicago",
    "America/Denver",
    "America/Los_Angeles",
    "America/Mexico_City",
    "America/Bogota",
    "America/Buenos_Aires",
    "America/Montreal",
    "Australia/Sydney",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_serializes_only_changed_keys() {
        let p = NotificationChannel::Reviews.patch(true);
        let v = serde_json::to_value(&p).expect("should serialize");
        assert_eq!(v, serde_json::json!({"emailReviews": true}));
    }

    #[test]
    fn test_patch_explicit_null_for_cleared_timezone() {
        let p = NotificationSettingsPatch {
            timezone: Some(None),
            ..Default::default()
        };
        let v = serde_json::to_value(&p).expect("should serialize");
        assert_eq!(v, serde_json::json!({"timezone": null}));
    }

    #[test]
    fn test_settings_contract_deserialize() {
        let json = r#"{
            "emailGeneral": true,
            "emailReviews": false,
            "emailFavorites": true,
            "emailLeads": true,
            "emailBusiness": false,
            "emailDigest": true,
            "locale": "fr",
            "quietHoursEnabled": true,
            "quietHoursStart": 22,
            "quietHoursEnd": 8,
            "timezone": "Europe/Paris",
            "maxEmailsPerWeek": 20
        }"#;
        let s: NotificationSettingsData = serde_json::from_str(json).expect("should parse");
        assert_eq!(s.locale.as_deref(), Some("fr"));
        assert_eq!(s.effective_quiet_hours(), Some((22, 8)));
        assert_eq!(s.max_emails_per_week, Some(20));
    }

    #[test]
    fn test_quiet_hours_ignored_when_disabled() {
        let s = NotificationSettingsData {
            quiet_hours_enabled: false,
            quiet_hours_start: Some(22),
            quiet_hours_end: Some(8),
            ..Default::default()
        };
        assert_eq!(s.effective_quiet_hours(), None);
    }

    #[test]
    fn test_previous_values_undo_patch() {
        let original = NotificationSettingsData {
            email_leads: true,
            timezone: Some("UTC".to_string()),
            ..Default::default()
        };
        let p = NotificationSettingsPatch {
            email_leads: Some(false),
            timezone: Some(Some("Europe/Madrid".to_string())),
            ..Default::default()
        };

        let undo = original.previous_values(&p);
        assert_eq!(undo.keys(), p.keys());

        let mut s = original.clone();
        s.apply(&p);
        assert!(!s.email_leads);
        s.apply(&undo);
        assert_eq!(s, original);
    }

    #[test]
    fn test_retain_keys() {
        let mut p = NotificationSettingsPatch {
            email_general: Some(true),
            quiet_hours_start: Some(Some(3)),
            ..Default::default()
        };
        p.retain_keys(|k| k != "emailGeneral");
        assert_eq!(p.keys(), vec!["quietHoursStart"]);
    }

    #[test]
    fn test_parse_weekly_cap_bounds() {
        assert_eq!(parse_weekly_cap("1"), Some(1));
        assert_eq!(parse_weekly_cap(" 1000 "), Some(1000));
        assert_eq!(parse_weekly_cap("0"), None);
        assert_eq!(parse_weekly_cap("1001"), None);
        assert_eq!(parse_weekly_cap("-5"), None);
        assert_eq!(parse_weekly_cap("12a"), None);
        assert_eq!(parse_weekly_cap(""), None);
    }

    #[test]
    fn test_parse_hour() {
        assert_eq!(parse_hour("0"), Some(0));
        assert_eq!(parse_hour("23"), Some(23));
        assert_eq!(parse_hour("24"), None);
        assert_eq!(format_hour(8), "08:00");
    }

    #[test]
    fn test_update_result_into_result() {
        assert_eq!(UpdateResult::ok().into_result(), Ok(()));
        assert_eq!(
            UpdateResult::failed("quota").into_result(),
            Err("quota".to_string())
        );
        let blank = UpdateResult {
            success: false,
            error: None,
        };
        assert_eq!(blank.into_result(), Err("Failed to save settings".to_string()));
    }
}
