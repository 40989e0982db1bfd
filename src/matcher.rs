use std::collections::HashMap;

use serde::Serialize;

use crate::normalize::normalize_title;
use crate::section::Section;
use crate::similarity::ratio;

/// Lowest similarity ratio accepted as a fuzzy match.
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Normalized source titles and the section each one points at.
///
/// Iteration order is first-seen order of each key. A repeated key keeps its
/// slot but points at the later section.
#[derive(Debug, Clone, Default)]
pub struct TitleIndex {
    entries: Vec<(String, usize)>,
    slots: HashMap<String, usize>,
}

impl TitleIndex {
    pub fn build(sections: &[Section]) -> Self {
        let mut index = Self::default();
        for (position, section) in sections.iter().enumerate() {
            index.insert(section.normalized.clone(), position);
        }
        index
    }

    /// Empty keys are ignored.
    pub fn insert(&mut self, key: String, position: usize) {
        if key.is_empty() {
            return;
        }
        match self.slots.get(&key) {
            Some(&slot) => self.entries[slot].1 = position,
            None => {
                self.slots.insert(key.clone(), self.entries.len());
                self.entries.push((key, position));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.slots.get(key).map(|&slot| self.entries[slot].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(k, p)| (k.as_str(), *p))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TitleMatch {
    /// Position of the matched section in the source.
    pub position: usize,
    pub score: f64,
    pub exact: bool,
}

/// Find the source section for a template title.
///
/// An exact normalized match always wins. Otherwise the highest ratio is
/// taken, the first one seen on ties, and kept only if it reaches
/// `threshold`.
pub fn find_best_match(template_title: &str, index: &TitleIndex, threshold: f64) -> Option<TitleMatch> {
    let key = normalize_title(template_title);
    if let Some(position) = index.get(&key) {
        return Some(TitleMatch {
            position,
            score: 1.0,
            exact: true,
        });
    }

    let mut best: Option<(usize, f64)> = None;
    for (candidate, position) in index.iter() {
        let score = ratio(&key, candidate);
        if score > best.map_or(0.0, |(_, s)| s) {
            best = Some((position, score));
        }
    }

    best.filter(|&(_, score)| score >= threshold)
        .map(|(position, score)| TitleMatch {
            position,
            score,
            exact: false,
        })
}
