use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static LESS_STYLESHEET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(<link rel="stylesheet)(" href="[^"]*\.less")"#).expect("valid stylesheet pattern")
});

/// Mark every stylesheet link pointing at a `.less` file as
/// `rel="stylesheet/less"` so the browser-side compiler picks it up.
///
/// Bodies without such a link are returned borrowed.
pub fn mark_less_stylesheet(body: &str) -> Cow<'_, str> {
    LESS_STYLESHEET.replace_all(body, "${1}/less${2}")
}
