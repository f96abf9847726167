use super::model::{
    parse_hour, parse_weekly_cap, NotificationChannel, NotificationSettingsData,
    NotificationSettingsPatch,
};
use std::collections::BTreeMap;

/// How long the "saved" indicator stays up after a successful update.
pub(crate) const SAVED_INDICATOR_MS: i64 = 2_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SaveStatus {
    Idle,
    Saving,
    Saved { until_ms: i64 },
    Failed(String),
}

/// An update that was applied locally and is waiting for the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PendingUpdate {
    pub seq: u64,
    pub patch: NotificationSettingsPatch,
}

/// Local state of the notification settings panel.
///
/// Every change goes through two phases:
/// - `begin`: apply the patch locally and hand back a `PendingUpdate` to send.
/// - `finish`: reconcile with the server outcome. Failures roll the touched keys
///   back to the last value the server accepted, unless a newer change has
///   touched them in the meantime. A failure stays on screen until the next
///   change, even if an older update succeeds afterwards.
#[derive(Clone, Debug)]
pub(crate) struct SettingsPanelModel {
    settings: NotificationSettingsData,
    /// Last values the server accepted, per key.
    confirmed: NotificationSettingsData,
    status: SaveStatus,
    next_seq: u64,
    in_flight: usize,
    /// Last update seq that touched each wire key.
    key_seq: BTreeMap<&'static str, u64>,
}

impl SettingsPanelModel {
    pub fn new(initial: NotificationSettingsData) -> Self {
        Self {
            confirmed: initial.clone(),
            settings: initial,
            status: SaveStatus::Idle,
            next_seq: 1,
            in_flight: 0,
            key_seq: BTreeMap::new(),
        }
    }

    pub fn settings(&self) -> &NotificationSettingsData {
        &self.settings
    }

    pub fn status(&self) -> &SaveStatus {
        &self.status
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight > 0
    }

    pub fn show_quiet_hours(&self) -> bool {
        self.settings.quiet_hours_enabled
    }

    pub fn saved_indicator_visible(&self, now_ms: i64) -> bool {
        matches!(self.status, SaveStatus::Saved { until_ms } if now_ms < until_ms)
    }

    /// Phase one. Returns `None` for an empty patch.
    pub fn begin(&mut self, patch: NotificationSettingsPatch) -> Option<PendingUpdate> {
        if patch.is_empty() {
            return None;
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        self.settings.apply(&patch);
        for k in patch.keys() {
            self.key_seq.insert(k, seq);
        }

        self.in_flight += 1;
        self.status = SaveStatus::Saving;

        Some(PendingUpdate { seq, patch })
    }

    /// Phase two.
    pub fn finish(&mut self, pending: PendingUpdate, outcome: Result<(), String>, now_ms: i64) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match outcome {
            Ok(()) => {
                self.confirmed.apply(&pending.patch);
                if !matches!(self.status, SaveStatus::Failed(_)) {
                    self.status = SaveStatus::Saved {
                        until_ms: now_ms + SAVED_INDICATOR_MS,
                    };
                }
            }
            Err(msg) => {
                let mut undo = self.confirmed.previous_values(&pending.patch);
                let key_seq = &self.key_seq;
                undo.retain_keys(|k| key_seq.get(k).copied() == Some(pending.seq));
                self.settings.apply(&undo);
                self.status = SaveStatus::Failed(msg);
            }
        }
    }

    /// Hide an expired "saved" indicator. Errors stay until the next change.
    pub fn expire_status(&mut self, now_ms: i64) {
        if let SaveStatus::Saved { until_ms } = self.status {
            if now_ms >= until_ms {
                self.status = SaveStatus::Idle;
            }
        }
    }

    pub fn toggle_channel(
        &mut self,
        channel: NotificationChannel,
        enabled: bool,
    ) -> Option<PendingUpdate> {
        self.begin(channel.patch(enabled))
    }

    pub fn set_quiet_hours_enabled(&mut self, enabled: bool) -> Option<PendingUpdate> {
        self.begin(NotificationSettingsPatch {
            quiet_hours_enabled: Some(enabled),
            ..Default::default()
        })
    }

    pub fn set_quiet_hours_start(&mut self, input: &str) -> Option<PendingUpdate> {
        let h = parse_hour(input)?;
        self.begin(NotificationSettingsPatch {
            quiet_hours_start: Some(Some(h)),
            ..Default::default()
        })
    }

    pub fn set_quiet_hours_end(&mut self, input: &str) -> Option<PendingUpdate> {
        let h = parse_hour(input)?;
        self.begin(NotificationSettingsPatch {
            quiet_hours_end: Some(Some(h)),
            ..Default::default()
        })
    }

    /// Empty input clears the zone.
    pub fn set_timezone(&mut self, input: &str) -> Option<PendingUpdate> {
        let tz = input.trim();
        let value = (!tz.is_empty()).then(|| tz.to_string());
        self.begin(NotificationSettingsPatch {
            timezone: Some(value),
            ..Default::default()
        })
    }

    pub fn set_locale(&mut self, code: &str) -> Option<PendingUpdate> {
        let code = code.trim();
        let value = (!code.is_empty()).then(|| code.to_string());
        self.begin(NotificationSettingsPatch {
            locale: Some(value),
            ..Default::default()
        })
    }

    /// Out-of-range or non-numeric input is ignored: no patch, value unchanged.
    pub fn set_weekly_cap(&mut self, input: &str) -> Option<PendingUpdate> {
        let cap = parse_weekly_cap(input)?;
        self.begin(NotificationSettingsPatch {
            max_emails_per_week: Some(Some(cap)),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::model::UpdateResult;
    use futures::executor::block_on;
    use std::cell::RefCell;

    /// Records every patch it receives and answers with a canned result.
    struct FakeUpdater {
        calls: RefCell<Vec<serde_json::Value>>,
        reply: UpdateResult,
    }

    impl FakeUpdater {
        fn new(reply: UpdateResult) -> Self {
            Self {
                calls: RefCell::new(vec![]),
                reply,
            }
        }

        async fn update(&self, patch: NotificationSettingsPatch) -> UpdateResult {
            self.calls
                .borrow_mut()
                .push(serde_json::to_value(&patch).expect("patch should serialize"));
            self.reply.clone()
        }
    }

    fn run(
        model: &mut SettingsPanelModel,
        updater: &FakeUpdater,
        pending: Option<PendingUpdate>,
        now_ms: i64,
    ) {
        let pending = pending.expect("change should produce an update");
        let outcome = block_on(updater.update(pending.patch.clone())).into_result();
        model.finish(pending, outcome, now_ms);
    }

    #[test]
    fn test_each_toggle_sends_one_call_with_only_that_key() {
        let mut m = SettingsPanelModel::new(NotificationSettingsData::default());
        let updater = FakeUpdater::new(UpdateResult::ok());

        for (i, ch) in NotificationChannel::ALL.iter().enumerate() {
            let p = m.toggle_channel(*ch, true);
            run(&mut m, &updater, p, i as i64);
        }
        let p = m.toggle_channel(NotificationChannel::Reviews, false);
        run(&mut m, &updater, p, 10);

        let calls = updater.calls.borrow();
        assert_eq!(calls.len(), 7);
        for c in calls.iter() {
            assert_eq!(c.as_object().map(|o| o.len()), Some(1));
        }
        assert_eq!(calls[6], serde_json::json!({"emailReviews": false}));
    }

    #[test]
    fn test_quiet_hours_controls_follow_enabled_flag() {
        let mut m = SettingsPanelModel::new(NotificationSettingsData::default());
        assert!(!m.show_quiet_hours());

        let p = m.set_quiet_hours_enabled(true);
        assert!(m.show_quiet_hours());
        let updater = FakeUpdater::new(UpdateResult::ok());
        run(&mut m, &updater, p, 0);
        assert!(m.show_quiet_hours());

        m.set_quiet_hours_enabled(false);
        assert!(!m.show_quiet_hours());
    }

    #[test]
    fn test_overnight_quiet_hours_accepted() {
        let mut m = SettingsPanelModel::new(NotificationSettingsData {
            quiet_hours_enabled: true,
            ..Default::default()
        });
        assert!(m.set_quiet_hours_start("22").is_some());
        assert!(m.set_quiet_hours_end("8").is_some());
        assert!(m.set_quiet_hours_end("24").is_none());
        assert_eq!(m.settings().effective_quiet_hours(), Some((22, 8)));
    }

    #[test]
    fn test_weekly_cap_out_of_range_keeps_last_valid_value() {
        let mut m = SettingsPanelModel::new(NotificationSettingsData {
            max_emails_per_week: Some(50),
            ..Default::default()
        });

        assert!(m.set_weekly_cap("0").is_none());
        assert!(m.set_weekly_cap("1001").is_none());
        assert!(m.set_weekly_cap("abc").is_none());
        assert_eq!(m.settings().max_emails_per_week, Some(50));
        assert!(!m.is_saving());

        let p = m.set_weekly_cap("1000").expect("in range");
        assert_eq!(
            serde_json::to_value(&p.patch).expect("should serialize"),
            serde_json::json!({"maxEmailsPerWeek": 1000})
        );
        assert_eq!(m.settings().max_emails_per_week, Some(1000));
    }

    #[test]
    fn test_reviews_toggle_shows_saved_then_hides_after_two_seconds() {
        let mut m = SettingsPanelModel::new(NotificationSettingsData {
            email_reviews: false,
            email_leads: true,
            ..Default::default()
        });
        let updater = FakeUpdater::new(UpdateResult::ok());

        let p = m.toggle_channel(NotificationChannel::Reviews, true);
        assert!(m.settings().email_reviews);
        assert!(m.is_saving());
        run(&mut m, &updater, p, 1_000);

        assert_eq!(
            updater.calls.borrow().as_slice(),
            &[serde_json::json!({"emailReviews": true})]
        );
        assert!(m.saved_indicator_visible(1_001));
        assert!(m.saved_indicator_visible(2_999));
        assert!(!m.saved_indicator_visible(3_000));

        m.expire_status(2_500);
        assert!(matches!(m.status(), SaveStatus::Saved { .. }));
        m.expire_status(3_000);
        assert_eq!(m.status(), &SaveStatus::Idle);
    }

    #[test]
    fn test_failed_update_rolls_back_and_surfaces_error() {
        let mut m = SettingsPanelModel::new(NotificationSettingsData::default());
        let updater = FakeUpdater::new(UpdateResult::failed("Service unavailable"));

        let p = m.toggle_channel(NotificationChannel::Digest, true);
        assert!(m.settings().email_digest);
        run(&mut m, &updater, p, 0);

        assert!(!m.settings().email_digest);
        assert_eq!(m.status(), &SaveStatus::Failed("Service unavailable".to_string()));
        assert!(!m.saved_indicator_visible(1));
        assert!(!m.is_saving());
    }

    #[test]
    fn test_failure_does_not_clobber_newer_change_to_same_key() {
        let mut m = SettingsPanelModel::new(NotificationSettingsData::default());

        let first = m.toggle_channel(NotificationChannel::Leads, true).expect("p1");
        let second = m.toggle_channel(NotificationChannel::Leads, false).expect("p2");
        let other = m.toggle_channel(NotificationChannel::General, true).expect("p3");

        m.finish(first, Err("boom".to_string()), 0);
        assert!(!m.settings().email_leads);

        m.finish(second, Ok(()), 1);
        m.finish(other, Ok(()), 2);
        assert!(m.settings().email_general);
        assert!(!m.is_saving());
        assert_eq!(m.status(), &SaveStatus::Failed("boom".to_string()));
    }

    #[test]
    fn test_overlapping_failures_restore_last_accepted_value() {
        let mut m = SettingsPanelModel::new(NotificationSettingsData::default());

        let on = m.toggle_channel(NotificationChannel::Leads, true).expect("p1");
        let off = m.toggle_channel(NotificationChannel::Leads, false).expect("p2");
        let again = m.toggle_channel(NotificationChannel::Leads, true).expect("p3");

        m.finish(on, Err("rejected".to_string()), 0);
        m.finish(off, Err("rejected".to_string()), 1);
        assert!(m.settings().email_leads);

        m.finish(again, Err("rejected".to_string()), 2);
        assert!(!m.settings().email_leads);
        assert!(!m.is_saving());
    }

    #[test]
    fn test_failure_rolls_back_to_value_confirmed_by_earlier_update() {
        let mut m = SettingsPanelModel::new(NotificationSettingsData::default());

        let on = m.toggle_channel(NotificationChannel::Leads, true).expect("p1");
        let off = m.toggle_channel(NotificationChannel::Leads, false).expect("p2");

        m.finish(on, Ok(()), 0);
        m.finish(off, Err("rejected".to_string()), 1);
        assert!(m.settings().email_leads);
        assert_eq!(m.status(), &SaveStatus::Failed("rejected".to_string()));
    }

    #[test]
    fn test_late_success_does_not_hide_earlier_failure() {
        let mut m = SettingsPanelModel::new(NotificationSettingsData::default());

        let general = m.toggle_channel(NotificationChannel::General, true).expect("a");
        let digest = m.toggle_channel(NotificationChannel::Digest, true).expect("b");

        m.finish(digest, Err("digest rejected".to_string()), 0);
        m.finish(general, Ok(()), 1);

        assert!(m.settings().email_general);
        assert!(!m.settings().email_digest);
        assert_eq!(m.status(), &SaveStatus::Failed("digest rejected".to_string()));
        m.expire_status(10_000);
        assert_eq!(m.status(), &SaveStatus::Failed("digest rejected".to_string()));

        // The next change clears it.
        let p = m.toggle_channel(NotificationChannel::Reviews, true).expect("c");
        assert_eq!(m.status(), &SaveStatus::Saving);
        m.finish(p, Ok(()), 20);
        assert!(m.saved_indicator_visible(21));
    }

    #[test]
    fn test_timezone_and_locale_changes() {
        let mut m = SettingsPanelModel::new(NotificationSettingsData::default());
        let p = m.set_timezone("Europe/Madrid").expect("tz");
        assert_eq!(p.patch.keys(), vec!["timezone"]);
        assert_eq!(m.settings().timezone.as_deref(), Some("Europe/Madrid"));

        m.set_timezone("");
        assert!(m.settings().timezone.is_none());

        m.set_locale("es");
        assert_eq!(m.settings().locale.as_deref(), Some("es"));
    }
}
