use crate::analytics::AnalyticsEvent;
use strum::{AsRefStr, Display, EnumString};

pub(crate) const LISTING_ID_KEY: &str = "listingId";
pub(crate) const PERIOD_KEY: &str = "period";

/// Sentinel used by the selects for "no filter". Never written to the URL.
pub(crate) const ALL_VALUE: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, AsRefStr, EnumString)]
pub(crate) enum LeadsPeriod {
    #[default]
    #[strum(serialize = "all")]
    All,
    #[strum(serialize = "7days")]
    SevenDays,
    #[strum(serialize = "30days")]
    ThirtyDays,
}

impl LeadsPeriod {
    pub const ALL: [LeadsPeriod; 3] = [
        LeadsPeriod::All,
        LeadsPeriod::SevenDays,
        LeadsPeriod::ThirtyDays,
    ];

    /// Unknown values mean "all".
    pub fn parse(s: &str) -> Self {
        s.trim().parse().unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        match self {
            LeadsPeriod::All => "All time",
            LeadsPeriod::SevenDays => "Last 7 days",
            LeadsPeriod::ThirtyDays => "Last 30 days",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub(crate) enum FilterKey {
    #[strum(serialize = "listingId")]
    ListingId,
    #[strum(serialize = "period")]
    Period,
}

/// Filter for the leads list. Lives only in the query string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct LeadsFilterState {
    pub listing_id: Option<String>,
    pub period: LeadsPeriod,
}

impl LeadsFilterState {
    pub fn from_query(search: &str) -> Self {
        let pairs = parse_query(search);
        let get = |k: &str| {
            pairs
                .iter()
                .find(|(key, _)| key == k)
                .map(|(_, v)| v.trim().to_string())
                .filter(|v| !v.is_empty() && v != ALL_VALUE)
        };

        Self {
            listing_id: get(LISTING_ID_KEY),
            period: get(PERIOD_KEY)
                .map(|p| LeadsPeriod::parse(&p))
                .unwrap_or_default(),
        }
    }

    /// Canonical pairs: absent filters are omitted.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        if let Some(id) = &self.listing_id {
            out.push((LISTING_ID_KEY.to_string(), id.clone()));
        }
        if self.period != LeadsPeriod::All {
            out.push((PERIOD_KEY.to_string(), self.period.to_string()));
        }
        out
    }

    /// Encoded query string for these filters, empty when unfiltered.
    pub fn query_string(&self) -> String {
        encode_query(&self.to_pairs())
    }

    pub fn is_filtered(&self) -> bool {
        self.listing_id.is_some() || self.period != LeadsPeriod::All
    }
}

/// Split `?a=1&b=2` (leading `?` optional) into decoded pairs.
pub(crate) fn parse_query(search: &str) -> Vec<(String, String)> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|kv| {
            let (k, v) = kv.split_once('=').unwrap_or((kv, ""));
            (decode(k), decode(v))
        })
        .collect()
}

fn decode(s: &str) -> String {
    let s = s.replace('+', " ");
    urlencoding::decode(&s)
        .map(|c| c.into_owned())
        .unwrap_or_else(|_| s.clone())
}

/// `?a=1&b=2`, or an empty string when there are no pairs.
pub(crate) fn encode_query(pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return String::new();
    }
    let body = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("?{body}")
}

/// Set or remove one filter key, keeping every other query pair in place.
/// `"all"` or an empty value removes the key.
pub(crate) fn update_filter(
    current: &[(String, String)],
    key: FilterKey,
    value: &str,
) -> Vec<(String, String)> {
    let key_str = key.as_ref();
    let value = value.trim();
    let remove = value.is_empty() || value == ALL_VALUE;

    let mut out: Vec<(String, String)> = Vec::with_capacity(current.len() + 1);
    let mut replaced = false;
    for (k, v) in current {
        if k != key_str {
            out.push((k.clone(), v.clone()));
        } else if !remove && !replaced {
            out.push((k.clone(), value.to_string()));
            replaced = true;
        }
    }

    if !remove && !replaced {
        out.push((key_str.to_string(), value.to_string()));
    }

    out
}

/// Result of a filter select change: where to navigate and what to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FilterChange {
    pub href: String,
    pub event: AnalyticsEvent,
}

/// `result_count` is the count currently on screen, i.e. before the new
/// filter is applied by the server.
pub(crate) fn filter_change(
    pathname: &str,
    search: &str,
    key: FilterKey,
    value: &str,
    result_count: usize,
) -> FilterChange {
    let next = update_filter(&parse_query(search), key, value);
    FilterChange {
        href: format!("{}{}", pathname, encode_query(&next)),
        event: AnalyticsEvent::LeadsFilterChanged {
            dimension: key.to_string(),
            value: value.to_string(),
            result_count,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_missing_keys_mean_all() {
        let f = LeadsFilterState::from_query("");
        assert_eq!(f, LeadsFilterState::default());
        assert!(!f.is_filtered());
    }

    #[test]
    fn test_from_query_reads_both_dimensions() {
        let f = LeadsFilterState::from_query("?listingId=12&period=30days");
        assert_eq!(f.listing_id.as_deref(), Some("12"));
        assert_eq!(f.period, LeadsPeriod::ThirtyDays);
    }

    #[test]
    fn test_unknown_period_is_all() {
        let f = LeadsFilterState::from_query("period=90days&listingId=all");
        assert_eq!(f.period, LeadsPeriod::All);
        assert!(f.listing_id.is_none());
    }

    #[test]
    fn test_period_all_removes_key_instead_of_writing_all() {
        let next = update_filter(
            &pairs(&[("listingId", "12"), ("period", "7days")]),
            FilterKey::Period,
            "all",
        );
        assert_eq!(next, pairs(&[("listingId", "12")]));
        assert_eq!(encode_query(&next), "?listingId=12");
    }

    #[test]
    fn test_empty_value_removes_key() {
        let next = update_filter(&pairs(&[("listingId", "12")]), FilterKey::ListingId, "");
        assert!(next.is_empty());
        assert_eq!(encode_query(&next), "");
    }

    #[test]
    fn test_update_replaces_in_place_and_keeps_other_params() {
        let next = update_filter(
            &pairs(&[("period", "7days"), ("page", "2")]),
            FilterKey::Period,
            "30days",
        );
        assert_eq!(next, pairs(&[("period", "30days"), ("page", "2")]));

        let next = update_filter(&next, FilterKey::ListingId, "5");
        assert_eq!(encode_query(&next), "?period=30days&page=2&listingId=5");
    }

    #[test]
    fn test_filter_change_reports_pre_change_count() {
        // The count comes from what is on screen; the server has not re-queried yet.
        let change = filter_change("/dashboard/leads", "?period=30days", FilterKey::Period, "7days", 57);
        assert_eq!(change.href, "/dashboard/leads?period=7days");
        assert_eq!(
            change.event,
            AnalyticsEvent::LeadsFilterChanged {
                dimension: "period".to_string(),
                value: "7days".to_string(),
                result_count: 57,
            }
        );
    }

    #[test]
    fn test_query_roundtrip_with_encoding() {
        let parsed = parse_query("?q=dog+walker&listingId=7");
        assert_eq!(parsed, pairs(&[("q", "dog walker"), ("listingId", "7")]));
        assert_eq!(encode_query(&pairs(&[("q", "a&b")])), "?q=a%26b");
    }

    #[test]
    fn test_state_to_pairs_is_canonical() {
        let f = LeadsFilterState {
            listing_id: Some("3".to_string()),
            period: LeadsPeriod::SevenDays,
        };
        assert_eq!(f.to_pairs(), pairs(&[("listingId", "3"), ("period", "7days")]));
        assert!(LeadsFilterState::default().to_pairs().is_empty());
    }
}
