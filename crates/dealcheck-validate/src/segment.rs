//! Clause segmentation.
//!
//! Splits contract text into `marker → content` spans using heading markers
//! anchored at the start of a line:
//!
//! - Roman numerals followed by a period: `III.`, `IV.`
//! - A single uppercase letter followed by a period: `A.`, `B.`
//! - Numeric dotted paths with an optional trailing period: `1.`, `1.1`, `1.1.2.`
//!
//! The marker must be followed by whitespace. Alternatives are tried in the
//! order above and the first one that fits wins.

use std::collections::HashMap;
use std::sync::LazyLock;

use dealcheck_core::normalize;
use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::warn;

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^((?:[IVXLCDM]+\.)|(?:[A-Z]\.)|(?:\d+(?:\.\d+)*\.?))\s")
        .expect("heading pattern is valid")
});

/// Clause marker → normalized clause content, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClauseMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
    duplicates: Vec<String>,
}

impl ClauseMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a clause. A repeated marker overwrites the earlier content but
    /// keeps the earlier position, and is remembered in [`duplicates`](Self::duplicates).
    pub fn insert(&mut self, marker: impl Into<String>, content: impl Into<String>) {
        let marker = marker.into();
        let content = content.into();
        match self.index.get(&marker) {
            Some(&i) => {
                if !self.duplicates.contains(&marker) {
                    self.duplicates.push(marker.clone());
                }
                self.entries[i].1 = content;
            }
            None => {
                self.index.insert(marker.clone(), self.entries.len());
                self.entries.push((marker, content));
            }
        }
    }

    pub fn get(&self, marker: &str) -> Option<&str> {
        self.index.get(marker).map(|&i| self.entries[i].1.as_str())
    }

    pub fn contains(&self, marker: &str) -> bool {
        self.index.contains_key(marker)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(m, c)| (m.as_str(), c.as_str()))
    }

    pub fn markers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(m, _)| m.as_str())
    }

    /// Markers seen more than once while segmenting.
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ClauseMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (marker, content) in &self.entries {
            map.serialize_entry(marker, content)?;
        }
        map.end()
    }
}

/// Segment text into clauses keyed by heading marker.
///
/// Content runs from the end of a heading to the start of the next one (or the
/// end of the text) and is normalized before storage. Text before the first
/// heading is not part of any clause.
pub fn segment(text: &str) -> ClauseMap {
    let headings: Vec<_> = HEADING.captures_iter(text).collect();
    let mut clauses = ClauseMap::new();

    for (i, caps) in headings.iter().enumerate() {
        let (Some(whole), Some(marker)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let end = headings
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(text.len(), |m| m.start());
        let marker = marker.as_str().trim_end_matches('.');
        clauses.insert(marker, normalize(&text[whole.end()..end]));
    }

    if !clauses.duplicates().is_empty() {
        warn!(markers = ?clauses.duplicates(), "duplicate clause markers; later content kept");
    }
    clauses
}
