use wasm_bindgen::JsCast;

/// `YYYY-MM-DD` in the browser's local timezone.
pub(crate) fn today_iso_local() -> String {
    let d = js_sys::Date::new_0();
    iso_date(d.get_full_year(), d.get_month() + 1, d.get_date())
}

pub(crate) fn iso_date(y: u32, m: u32, day: u32) -> String {
    format!("{:04}-{:02}-{:02}", y, m, day)
}

pub(crate) fn now_ms() -> i64 {
    js_sys::Date::now().round() as i64
}

/// Run `f` once after `ms` milliseconds.
pub(crate) fn set_timeout_once(ms: i32, f: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        wasm_bindgen::closure::Closure::once_into_js(f)
            .as_ref()
            .unchecked_ref(),
        ms,
    );
}

/// Blocking browser alert.
pub(crate) fn alert(msg: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(msg);
    }
}

/// `2026-10-01T09:30:00Z` -> `2026-10-01 09:30`. Anything unexpected is returned as-is.
pub(crate) fn short_timestamp(s: &str) -> String {
    let Some((date, rest)) = s.split_once('T') else {
        return s.to_string();
    };
    let time: String = rest.chars().take(5).collect();
    if date.len() == 10 && time.len() == 5 {
        format!("{date} {time}")
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_date_padding() {
        assert_eq!(iso_date(2026, 3, 7), "2026-03-07");
        assert_eq!(iso_date(2026, 12, 31), "2026-12-31");
    }

    #[test]
    fn test_short_timestamp() {
        assert_eq!(short_timestamp("2026-10-01T09:30:00Z"), "2026-10-01 09:30");
        assert_eq!(short_timestamp("yesterday"), "yesterday");
    }
}
