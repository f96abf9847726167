mod labels;
mod model;
mod panel;

pub(crate) use labels::{labels_for, SUPPORTED_LOCALES};
pub(crate) use model::{
    format_hour, NotificationChannel, NotificationSettingsData, NotificationSettingsPatch,
    UpdateResult, COMMON_TIMEZONES, HOURS_PER_DAY, WEEKLY_CAP_MAX, WEEKLY_CAP_MIN,
};
pub(crate) use panel::{PendingUpdate, SaveStatus, SettingsPanelModel, SAVED_INDICATOR_MS};
