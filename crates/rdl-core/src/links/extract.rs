//! Strict URL matching in free text: only links with an explicit scheme.

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)\b(?:https?|ftp)://[^\s<>"'`]+"#).expect("URL regex is valid")
    })
}

/// Every URL in `text`, in order of appearance.
///
/// Trailing sentence punctuation is dropped, and so are closing brackets
/// without an opener inside the match (markdown `[label](url)` links).
pub fn find_urls(text: &str) -> Vec<String> {
    url_regex()
        .find_iter(text)
        .filter_map(|m| {
            let trimmed = trim_trailing(m.as_str());
            Url::parse(trimmed).ok().map(|_| trimmed.to_string())
        })
        .collect()
}

fn trim_trailing(mut s: &str) -> &str {
    loop {
        let Some(last) = s.chars().last() else {
            return s;
        };
        let drop = match last {
            '.' | ',' | ';' | ':' | '!' | '?' | '*' => true,
            ')' => s.matches('(').count() < s.matches(')').count(),
            ']' => s.matches('[').count() < s.matches(']').count(),
            _ => false,
        };
        if !drop {
            return s;
        }
        s = &s[..s.len() - last.len_utf8()];
    }
}
