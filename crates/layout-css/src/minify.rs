//! Whitespace and comment compaction for emitted stylesheets.
//!
//! Quoted strings and `url(...)` arguments pass through byte for byte; only
//! the text between them is compacted. This is not a CSS minifier in general:
//! values are never rewritten, and the single spaces inside them are kept.

use once_cell::sync::Lazy;
use regex::Regex;

/// Comments plus the spans that must not be touched.
static PROTECTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)/\*.*?\*/|"(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'|url\([^)]*\)"#)
        .expect("static pattern is valid")
});
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("static pattern is valid"));
static AROUND_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*([{};,])\s*").expect("static pattern is valid"));

/// Strips comments and redundant whitespace.
///
/// ```
/// use layout_css::minify;
///
/// let css = "/* grid */\nlay-out[md=\"grid(1)\"] {\n  --layout-gtc: 1fr 1fr;\n}\n";
/// assert_eq!(minify(css), "lay-out[md=\"grid(1)\"]{--layout-gtc: 1fr 1fr}");
/// ```
pub fn minify(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut text = String::new();
    let mut last = 0;

    for span in PROTECTED.find_iter(css) {
        text.push_str(&css[last..span.start()]);
        last = span.end();

        if span.as_str().starts_with("/*") {
            text.push(' ');
        } else {
            out.push_str(&compact(&text));
            out.push_str(span.as_str());
            text.clear();
        }
    }
    text.push_str(&css[last..]);
    out.push_str(&compact(&text));

    out.trim().to_string()
}

fn compact(text: &str) -> String {
    let text = WHITESPACE.replace_all(text, " ");
    let text = AROUND_PUNCTUATION.replace_all(&text, "$1");
    text.replace(";}", "}")
}
