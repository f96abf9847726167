use super::filter::LeadsFilterState;
use crate::analytics::AnalyticsEvent;
use crate::api::ApiError;
use std::future::Future;

pub(crate) const EXPORT_MIME: &str = "text/csv";

/// `leads-export-YYYY-MM-DD.csv` for the given local date.
pub(crate) fn export_filename(iso_date: &str) -> String {
    format!("leads-export-{iso_date}.csv")
}

/// Query string mirroring the active filters (empty when unfiltered).
pub(crate) fn export_query(filter: &LeadsFilterState) -> String {
    filter.query_string()
}

/// Advisory in-flight flag behind the export button.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ExportState {
    exporting: bool,
    last_error: Option<String>,
}

impl ExportState {
    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// False when an export is already running.
    pub fn try_start(&mut self) -> bool {
        if self.exporting {
            return false;
        }
        self.exporting = true;
        self.last_error = None;
        true
    }

    /// Always clears the in-flight flag.
    pub fn finish(&mut self, result: &Result<String, String>) {
        self.exporting = false;
        self.last_error = result.as_ref().err().cloned();
    }
}

/// Run one export: report it, fetch the CSV, hand the bytes to `save`.
///
/// The analytics event goes out before the request, so it is recorded even
/// when the download later fails. Returns the saved file name.
pub(crate) async fn run_export<F, Fut, S>(
    filter: &LeadsFilterState,
    iso_date: &str,
    track: impl FnOnce(AnalyticsEvent),
    fetch: F,
    save: S,
) -> Result<String, String>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<Vec<u8>, ApiError>>,
    S: FnOnce(&[u8], &str) -> Result<(), String>,
{
    track(AnalyticsEvent::LeadsExported {
        listing_id: filter.listing_id.clone(),
        period: filter.period.to_string(),
    });

    let bytes = fetch(export_query(filter)).await.map_err(|e| {
        tracing::warn!(error = %e, "leads export failed");
        format!("Export failed: {e}")
    })?;

    let filename = export_filename(iso_date);
    save(&bytes, &filename)?;
    tracing::info!(filename = %filename, bytes = bytes.len(), "leads export saved");
    Ok(filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::filter::LeadsPeriod;
    use futures::executor::block_on;
    use std::cell::RefCell;

    #[test]
    fn test_export_filename_uses_iso_date() {
        assert_eq!(export_filename("2026-10-19"), "leads-export-2026-10-19.csv");
    }

    #[test]
    fn test_export_query_mirrors_filters() {
        let f = LeadsFilterState {
            listing_id: Some("12".to_string()),
            period: LeadsPeriod::SevenDays,
        };
        assert_eq!(export_query(&f), "?listingId=12&period=7days");
        assert_eq!(export_query(&LeadsFilterState::default()), "");
    }

    #[test]
    fn test_successful_export_saves_named_file_after_tracking() {
        let log: RefCell<Vec<String>> = RefCell::new(vec![]);
        let saved: RefCell<Option<(Vec<u8>, String)>> = RefCell::new(None);
        let mut state = ExportState::default();
        assert!(state.try_start());

        let filter = LeadsFilterState {
            listing_id: None,
            period: LeadsPeriod::ThirtyDays,
        };
        let res = block_on(run_export(
            &filter,
            "2026-10-19",
            |e| log.borrow_mut().push(e.name().to_string()),
            |q| {
                log.borrow_mut().push(format!("GET {q}"));
                async { Ok(b"id,name\n1,Dana\n".to_vec()) }
            },
            |bytes, name| {
                *saved.borrow_mut() = Some((bytes.to_vec(), name.to_string()));
                Ok(())
            },
        ));
        state.finish(&res);

        assert_eq!(res, Ok("leads-export-2026-10-19.csv".to_string()));
        assert_eq!(
            log.borrow().as_slice(),
            &["leads_exported".to_string(), "GET ?period=30days".to_string()]
        );
        let (bytes, name) = saved.borrow().clone().expect("file should be saved");
        assert_eq!(name, "leads-export-2026-10-19.csv");
        assert!(bytes.starts_with(b"id,name"));
        assert!(!state.is_exporting());
    }

    #[test]
    fn test_server_error_surfaces_and_reenables_button() {
        let tracked = RefCell::new(0);
        let saved = RefCell::new(false);
        let mut state = ExportState::default();
        assert!(state.try_start());
        assert!(state.is_exporting());

        let res = block_on(run_export(
            &LeadsFilterState::default(),
            "2026-10-19",
            |_| *tracked.borrow_mut() += 1,
            |_| async { Err(ApiError::http_status(500, "Request failed")) },
            |_, _| {
                *saved.borrow_mut() = true;
                Ok(())
            },
        ));
        state.finish(&res);

        assert!(res.is_err());
        assert!(!*saved.borrow());
        assert_eq!(*tracked.borrow(), 1);
        assert!(!state.is_exporting());
        assert!(state.last_error().is_some_and(|e| e.contains("500")));
    }

    #[test]
    fn test_second_start_refused_while_exporting() {
        let mut state = ExportState::default();
        assert!(state.try_start());
        assert!(!state.try_start());
        state.finish(&Ok("f.csv".to_string()));
        assert!(state.try_start());
    }
}

// WASM-only: the date comes from the browser clock.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::util::today_iso_local;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_export_filename_uses_todays_local_date() {
        let name = export_filename(&today_iso_local());

        let d = js_sys::Date::new_0();
        let expected = format!(
            "leads-export-{:04}-{:02}-{:02}.csv",
            d.get_full_year(),
            d.get_month() + 1,
            d.get_date()
        );
        assert_eq!(name, expected);
    }
}
