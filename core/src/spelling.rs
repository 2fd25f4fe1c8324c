//! Spelling types and the property algebra used while building syllable
//! graphs: [`SpellingProperties::compose`] applies a delta along one path
//! through the prism, [`SpellingProperties::update`] merges two
//! independently-found paths that land on the same syllable/edge.

use serde::{Deserialize, Serialize};

/// How a spelling was recognized, ordered from most to least literal.
/// The ordering itself is load-bearing: `compose`/`update` both pick the
/// *larger* (more tentative) type when merging two spellings, and the
/// syllable graph builder's pruning pass keeps vertices no worse than
/// `max(vertex_type_at_farthest, Fuzzy)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpellingType {
    Normal,
    Fuzzy,
    Abbreviation,
    Completion,
    Ambiguous,
    Invalid,
}

impl Default for SpellingType {
    fn default() -> Self {
        SpellingType::Normal
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpellingProperties {
    pub spelling_type: SpellingType,
    pub end_pos: usize,
    pub credibility: f64,
    pub tips: String,
    pub is_correction: bool,
}

impl SpellingProperties {
    pub fn new(spelling_type: SpellingType, end_pos: usize) -> Self {
        Self {
            spelling_type,
            end_pos,
            credibility: 0.0,
            tips: String::new(),
            is_correction: false,
        }
    }

    /// Applies `delta` on top of `self`, as happens when a corrector or
    /// fuzzy rule contributes an adjustment while walking one path
    /// through the prism: the more tentative of the two types wins,
    /// credibilities accumulate, and a correction mark is sticky.
    pub fn compose(&mut self, delta: &SpellingProperties) {
        if delta.spelling_type > self.spelling_type {
            self.spelling_type = delta.spelling_type;
        }
        self.credibility += delta.credibility;
        if delta.is_correction {
            self.is_correction = true;
        }
        if !delta.tips.is_empty() {
            self.tips = delta.tips.clone();
        }
    }

    /// Merges `other` into `self` when two independently-discovered
    /// spellings land on the same syllable/edge: the better (smaller)
    /// type wins outright, its correction flag follows it; if both
    /// agree on type the correction flag requires both sources to agree
    /// too. The higher credibility always survives. Per-source tips are
    /// dropped since they no longer describe the merged result.
    pub fn update(&mut self, other: &SpellingProperties) {
        if self.spelling_type == other.spelling_type {
            self.is_correction = self.is_correction && other.is_correction;
        } else if other.spelling_type < self.spelling_type {
            self.spelling_type = other.spelling_type;
            self.is_correction = other.is_correction;
        }
        if other.credibility > self.credibility {
            self.credibility = other.credibility;
        }
        self.tips.clear();
    }
}

#[derive(Debug, Clone)]
pub struct Spelling {
    pub text: String,
    pub properties: SpellingProperties,
}

impl Spelling {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            properties: SpellingProperties::default(),
        }
    }
}

impl PartialEq for Spelling {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Spelling {}

impl PartialOrd for Spelling {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Spelling {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.text.cmp(&other.text)
    }
}
