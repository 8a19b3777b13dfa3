//! Browser-side scripts for history, anchors and full page loads.

/// Push `path` onto the browser history without reloading.
///
/// ```
/// use frame_navigator::history::push_state_script;
///
/// assert_eq!(
///     push_state_script("/docs"),
///     "window.history.pushState({page: \"/docs\"}, \"\", \"/docs\");"
/// );
/// ```
pub fn push_state_script(path: &str) -> String {
    let path = js_string(path);
    format!("window.history.pushState({{page: {path}}}, \"\", {path});")
}

/// Scroll to the element with id `fragment`.
pub fn anchor_script(fragment: &str) -> String {
    format!("window.location.href = {};", js_string(&format!("#{fragment}")))
}

/// Leave the single page application and load `url`.
pub fn location_script(url: &str) -> String {
    format!("window.location.href = {};", js_string(url))
}

/// Quote `value` as a JavaScript string literal.
///
/// JSON strings are valid JavaScript except for the two Unicode line
/// terminators, which older engines reject inside literals.
fn js_string(value: &str) -> String {
    serde_json::Value::from(value)
        .to_string()
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}
