use wasm_bindgen::JsCast;

/// Save `bytes` as a file named `filename` through the browser's download flow.
///
/// Builds a Blob, points a detached `<a download>` at an object URL, clicks it,
/// then releases both.
pub(crate) fn save_bytes_as_file(bytes: &[u8], filename: &str, mime: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;

    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes));

    let opts = web_sys::BlobPropertyBag::new();
    opts.set_type(mime);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
        .map_err(|_| "Could not create file".to_string())?;

    let url = web_sys::Url::create_object_url_with_blob(&blob)
        .map_err(|_| "Could not create download link".to_string())?;

    let anchor = document
        .create_element("a")
        .map_err(|_| "Could not create download link".to_string())?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| "Could not create download link".to_string())?;
    anchor.set_href(&url);
    anchor.set_download(filename);

    let appended = document
        .body()
        .map(|b| b.append_child(&anchor).is_ok())
        .unwrap_or(false);
    anchor.click();
    if appended {
        anchor.remove();
    }

    let _ = web_sys::Url::revoke_object_url(&url);
    Ok(())
}
