//! Browser helpers shared by components: logging, colours, alerts, downloads.

use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::error::ViewerError;
use crate::model::Rgba;

pub fn init_logging(level: log::Level) {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(level).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }
}

pub fn css_rgba(c: Rgba) -> String {
    let ch = |v: i32| v.clamp(0, 255);
    format!(
        "rgba({},{},{},{:.3})",
        ch(c.r),
        ch(c.g),
        ch(c.b),
        ch(c.a) as f64 / 255.0
    )
}

/// Darkens the RGB channels, keeping alpha. Used for the extruded side faces.
pub fn shade(c: Rgba, factor: f64) -> Rgba {
    let f = |v: i32| (v as f64 * factor).round() as i32;
    Rgba::new(f(c.r), f(c.g), f(c.b), c.a)
}

pub fn alert(msg: &str) {
    if let Some(win) = web_sys::window() {
        let _ = win.alert_with_message(msg);
    }
}

pub fn now_iso() -> String {
    js_sys::Date::new_0().to_iso_string().into()
}

pub fn download_text(filename: &str, mime: &str, text: &str) -> Result<(), ViewerError> {
    let parts = js_sys::Array::new();
    parts.push(&wasm_bindgen::JsValue::from_str(text));
    let opts = BlobPropertyBag::new();
    opts.set_type(mime);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &opts)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| ViewerError::Dom("document unavailable".into()))?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")?
        .dyn_into()
        .map_err(|_| ViewerError::Dom("anchor cast failed".into()))?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.style().set_property("display", "none")?;
    let body = document
        .body()
        .ok_or_else(|| ViewerError::Dom("document has no body".into()))?;
    body.append_child(&anchor)?;
    anchor.click();
    anchor.remove();
    Url::revoke_object_url(&url)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_clamps_extrapolated_channels() {
        assert_eq!(css_rgba(Rgba::new(300, -4, 10, 255)), "rgba(255,0,10,1.000)");
        assert_eq!(css_rgba(Rgba::new(1, 2, 3, 0)), "rgba(1,2,3,0.000)");
    }

    #[test]
    fn shade_keeps_alpha() {
        assert_eq!(shade(Rgba::new(100, 50, 0, 60), 0.5), Rgba::new(50, 25, 0, 60));
    }
}
