//! Video-host recognition.

/// Recognizes URLs on a supported video host by case-insensitive substring.
#[derive(Debug, Clone)]
pub struct HostMatcher {
    patterns: Vec<String>,
}

impl HostMatcher {
    /// Blank patterns are ignored.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| p.as_ref().trim().to_ascii_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        Self { patterns }
    }

    pub fn matches(&self, url: &str) -> bool {
        let url = url.to_ascii_lowercase();
        self.patterns.iter().any(|p| url.contains(p.as_str()))
    }
}
