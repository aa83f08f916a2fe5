use url::Url;

use crate::project::CompetitorCandidate;

/// Hard cap on how many competitors can be picked for one analysis run.
pub const MAX_SELECTED: usize = 7;

/// Ordered set of competitor URLs chosen for analysis.
///
/// Insertion order is preserved, most recently picked last, and the set never
/// grows past [`MAX_SELECTED`] entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionSet {
    urls: Vec<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a checkbox change and reports whether the set changed.
    ///
    /// Picking a URL that is already present, or picking past the cap, is a
    /// no-op. Dropping keeps the relative order of the remaining entries.
    pub fn toggle(&mut self, url: &str, selected: bool) -> bool {
        if selected {
            if self.contains(url) || self.urls.len() >= MAX_SELECTED {
                return false;
            }
            self.urls.push(url.to_string());
            true
        } else {
            let before = self.urls.len();
            self.urls.retain(|u| u != url);
            self.urls.len() != before
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.iter().any(|u| u == url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.urls.len() >= MAX_SELECTED
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.urls.clone()
    }
}

/// Drops candidates whose host matches any exclusion entry.
///
/// A candidate matches when its hostname contains the entry as a substring,
/// after one leading `www.` has been stripped from both sides. Containment
/// rather than suffix matching means an entry `example.com` also hides
/// `shop.example.com` and lookalike hosts such as `notexample.com`.
/// Candidates whose URL does not parse are kept.
pub fn filter_candidates(
    candidates: &[CompetitorCandidate],
    excluded: &[String],
) -> Vec<CompetitorCandidate> {
    candidates
        .iter()
        .filter(|candidate| !is_excluded(&candidate.url, excluded))
        .cloned()
        .collect()
}

fn is_excluded(url: &str, excluded: &[String]) -> bool {
    let Some(host) = host_of(url) else {
        return false;
    };
    let host = strip_www(&host);
    excluded
        .iter()
        .map(|entry| strip_www(entry.trim()))
        .filter(|entry| !entry.is_empty())
        .any(|entry| host.contains(entry))
}

/// Hostname for display; falls back to the raw URL when it does not parse.
pub fn display_host(url: &str) -> String {
    host_of(url).unwrap_or_else(|| url.to_string())
}

fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
}

fn strip_www(domain: &str) -> &str {
    domain.strip_prefix("www.").unwrap_or(domain)
}
