use serde::Serialize;

/// Product analytics events emitted by the dashboard.
///
/// Delivery is fire-and-forget: nothing in the dashboard waits on or reacts to
/// whether an event reached the collector.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub(crate) enum AnalyticsEvent {
    LeadsFilterChanged {
        dimension: String,
        value: String,
        /// Count shown before the change took effect.
        result_count: usize,
    },
    LeadsExported {
        listing_id: Option<String>,
        period: String,
    },
    NotificationSettingChanged {
        keys: Vec<String>,
    },
    ListingUpdated {
        listing_id: String,
    },
}

impl AnalyticsEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AnalyticsEvent::LeadsFilterChanged { .. } => "leads_filter_changed",
            AnalyticsEvent::LeadsExported { .. } => "leads_exported",
            AnalyticsEvent::NotificationSettingChanged { .. } => "notification_setting_changed",
            AnalyticsEvent::ListingUpdated { .. } => "listing_updated",
        }
    }
}

/// Hand an event to the page's analytics collector (`window.dataLayer`).
pub(crate) fn track(event: AnalyticsEvent) {
    tracing::debug!(event = event.name(), "analytics");

    #[cfg(target_arch = "wasm32")]
    push_to_data_layer(&event);
}

#[cfg(target_arch = "wasm32")]
fn push_to_data_layer(event: &AnalyticsEvent) {
    let Ok(json) = serde_json::to_string(event) else {
        return;
    };
    let Ok(value) = js_sys::JSON::parse(&json) else {
        return;
    };
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(layer) = js_sys::Reflect::get(&window, &"dataLayer".into()) else {
        return;
    };
    if let Some(arr) = wasm_bindgen::JsCast::dyn_ref::<js_sys::Array>(&layer) {
        arr.push(&value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_event_serialization() {
        let e = AnalyticsEvent::LeadsFilterChanged {
            dimension: "period".to_string(),
            value: "7days".to_string(),
            result_count: 42,
        };
        let v = serde_json::to_value(&e).expect("should serialize");
        assert_eq!(v["event"], "leads_filter_changed");
        assert_eq!(v["result_count"], 42);
        assert_eq!(e.name(), "leads_filter_changed");
    }

    #[test]
    fn test_track_is_harmless_outside_browser() {
        track(AnalyticsEvent::ListingUpdated {
            listing_id: "12".to_string(),
        });
    }
}
