// file: src/parser/patterns.rs
// description: compiled regex patterns for basename normalization and url parsing
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref WHITESPACE_RUN: Regex = Regex::new(
        r"\s+"
    ).expect("WHITESPACE_RUN regex is valid");

    pub static ref HYPHEN_RUN: Regex = Regex::new(
        r"-{2,}"
    ).expect("HYPHEN_RUN regex is valid");

    // Date segment of an old post url: /2009/04/a_day_in_the_l.html
    pub static ref URL_DATE_SEGMENT: Regex = Regex::new(
        r"/(\d{4})/(\d{2})/[^/\s]+\.html\b"
    ).expect("URL_DATE_SEGMENT regex is valid");
}

/// Matches `http(s)://<domain>/`, scheme and host in any case.
pub fn old_host_prefix(domain: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?i:https?://{})/", regex::escape(domain)))
}

/// Matches `http(s)://<domain>/[<prefix>/]yyyy/mm/<basename>.html`. Scheme and
/// host match in any case, the path as written.
///
/// Capture groups: 1 year, 2 month, 3 basename.
pub fn old_post_url(domain: &str, prefix: &str) -> Result<Regex, regex::Error> {
    let prefix = match prefix {
        "" => String::new(),
        prefix => format!("{}/", regex::escape(prefix)),
    };
    Regex::new(&format!(
        r"(?i:https?://{})/{}(\d{{4}})/(\d{{2}})/([^./\s]+)\.html",
        regex::escape(domain),
        prefix
    ))
}
