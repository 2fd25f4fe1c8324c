//! Double-array trie mapping spelling strings to sets of syllable ids, plus
//! the per-syllable spelling properties recorded while it was built.
//!
//! There is no published crate in reach that supplies this structure under
//! the contract this crate needs (exact/prefix/predictive lookup keyed by
//! byte strings, with one spelling potentially resolving to several
//! syllables once fuzzy/abbreviation rules are folded in), so it is
//! implemented directly here, following the classical incremental
//! double-array construction: each trie node `s` reaches a child on byte
//! `c` at `base[s] + c`, and a free slot is one where `check[slot] == 0`.
//! Byte `0` is reserved as the end-of-string marker; spelling strings are
//! ASCII so this never collides with real input.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::arena::{Builder as ArenaBuilder, Mapped};
use crate::error::{Result, RimeError};
use crate::spelling::{SpellingProperties, SpellingType};

pub type SyllableId = u32;

/// Opaque handle into a trie leaf, returned by lookups and consumed by
/// [`Prism::query_spelling`]. Not a syllable id: a single spelling can
/// resolve to several syllables (spelling algebra), each with its own
/// properties, all reachable from one leaf.
pub type LeafId = u32;

const ROOT: usize = 1;
const END_OF_KEY: i32 = 0;

#[derive(Debug, Default)]
pub struct PrismBuilder {
    /// One leaf's worth of resolutions, keyed by spelling text.
    by_spelling: HashMap<String, Vec<(SyllableId, SpellingProperties)>>,
    /// Canonical spelling recorded per syllable id, i.e. the syllabary
    /// `Dictionary::decode` resolves ids back through. The first `Normal`
    /// spelling seen for an id wins; earlier non-`Normal` entries are
    /// replaced if a `Normal` one for the same id shows up later.
    syllabary: HashMap<SyllableId, (String, SpellingType)>,
}

impl PrismBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares that `spelling` resolves to `syllable_id`, with
    /// `properties` describing how. A spelling may be added more than
    /// once with different syllable ids (e.g. an exact syllable and a
    /// fuzzy-rule alias of another); all such resolutions are queryable
    /// from the same trie leaf.
    pub fn add(&mut self, spelling: &str, syllable_id: SyllableId, properties: SpellingProperties) {
        let keep_existing = self
            .syllabary
            .get(&syllable_id)
            .is_some_and(|(_, t)| *t <= properties.spelling_type);
        if !keep_existing {
            self.syllabary
                .insert(syllable_id, (spelling.to_string(), properties.spelling_type));
        }
        self.by_spelling
            .entry(spelling.to_string())
            .or_default()
            .push((syllable_id, properties));
    }

    pub fn build(self) -> Prism {
        let mut spellings: Vec<(Vec<u8>, Vec<(SyllableId, SpellingProperties)>)> = self
            .by_spelling
            .into_iter()
            .map(|(s, v)| (s.into_bytes(), v))
            .collect();
        spellings.sort_by(|a, b| a.0.cmp(&b.0));

        let mut base: Vec<i32> = vec![0; ROOT + 1];
        let mut check: Vec<i32> = vec![0; ROOT + 1];
        let mut values: HashMap<usize, LeafId> = HashMap::new();
        check[ROOT] = ROOT as i32;

        let keys: Vec<Vec<u8>> = spellings.iter().map(|(b, _)| b.clone()).collect();
        insert_range(&mut base, &mut check, &mut values, ROOT, &keys, 0);

        let mut leaf_spellings = vec![Vec::new(); spellings.len()];
        for (leaf_id, (_, resolutions)) in spellings.into_iter().enumerate() {
            leaf_spellings[leaf_id] = resolutions;
        }

        let syllabary = self.syllabary.into_iter().map(|(id, (text, _))| (id, text)).collect();

        tracing::info!(spellings = keys.len(), nodes = base.len(), "built prism");

        Prism {
            base,
            check,
            values,
            leaf_spellings,
            syllabary,
        }
    }
}

fn distinct_runs(keys: &[Vec<u8>], depth: usize) -> Vec<(i32, usize, usize)> {
    let mut runs = Vec::new();
    let mut i = 0;
    while i < keys.len() {
        let byte = keys[i].get(depth).copied();
        let c = byte.map(|b| b as i32 + 1).unwrap_or(END_OF_KEY);
        let start = i;
        while i < keys.len() {
            let b2 = keys[i].get(depth).copied();
            let c2 = b2.map(|b| b as i32 + 1).unwrap_or(END_OF_KEY);
            if c2 != c {
                break;
            }
            i += 1;
        }
        runs.push((c, start, i));
    }
    runs
}

fn ensure_len(v: &mut Vec<i32>, len: usize) {
    if v.len() <= len {
        v.resize(len + 1, 0);
    }
}

fn find_base(check: &[i32], codes: &[i32]) -> i32 {
    let min_code = *codes.iter().min().unwrap_or(&0);
    let mut b = 1 - min_code.min(0);
    if b < 1 {
        b = 1;
    }
    loop {
        let ok = codes.iter().all(|&c| {
            let slot = (b + c) as usize;
            slot > 0 && check.get(slot).copied().unwrap_or(0) == 0
        });
        if ok {
            return b;
        }
        b += 1;
    }
}

/// The leaf index assigned to a given key is its position in the
/// originally-sorted key list, which `insert_range` preserves since every
/// run is a contiguous, order-preserving slice of that list.
fn insert_range(
    base: &mut Vec<i32>,
    check: &mut Vec<i32>,
    values: &mut HashMap<usize, LeafId>,
    node: usize,
    keys: &[Vec<u8>],
    depth: usize,
) {
    if keys.is_empty() {
        return;
    }
    let runs = distinct_runs(keys, depth);
    let codes: Vec<i32> = runs.iter().map(|(c, _, _)| *c).collect();
    let b = find_base(check, &codes);
    ensure_len(base, node);
    base[node] = b;

    for (c, start, end) in runs {
        let child = (b + c) as usize;
        ensure_len(base, child);
        ensure_len(check, child);
        check[child] = node as i32;
        if c == END_OF_KEY {
            values.insert(child, start as LeafId);
        } else {
            insert_range(base, check, values, child, &keys[start..end], depth + 1);
        }
    }
}

/// Read-only double-array trie over spelling strings.
#[derive(Debug, Serialize, Deserialize)]
pub struct Prism {
    base: Vec<i32>,
    check: Vec<i32>,
    values: HashMap<usize, LeafId>,
    leaf_spellings: Vec<Vec<(SyllableId, SpellingProperties)>>,
    syllabary: HashMap<SyllableId, String>,
}

impl Prism {
    fn step(&self, node: usize, byte: u8) -> Option<usize> {
        let b = *self.base.get(node)?;
        let child = b + byte as i32 + 1;
        if child < 0 {
            return None;
        }
        let child = child as usize;
        if self.check.get(child).copied() == Some(node as i32) {
            Some(child)
        } else {
            None
        }
    }

    fn end_of_key(&self, node: usize) -> Option<LeafId> {
        let b = *self.base.get(node)?;
        let child = b + END_OF_KEY;
        if child < 0 {
            return None;
        }
        let child = child as usize;
        if self.check.get(child).copied() == Some(node as i32) {
            self.values.get(&child).copied()
        } else {
            None
        }
    }

    /// Exact match: does `key` resolve to a leaf? Use
    /// [`Prism::query_spelling`] on the result to get its syllables.
    pub fn get_value(&self, key: &str) -> Option<LeafId> {
        let mut node = ROOT;
        for &byte in key.as_bytes() {
            node = self.step(node, byte)?;
        }
        self.end_of_key(node)
    }

    /// Whether any spelling in the trie starts with `prefix`. Used to prune
    /// dead branches while searching for near matches, without allocating
    /// the full completion list that `expand_search` would.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        let mut node = ROOT;
        for &byte in prefix.as_bytes() {
            match self.step(node, byte) {
                Some(next) => node = next,
                None => return false,
            }
        }
        true
    }

    /// All prefixes of `key` that are themselves valid spellings, as
    /// `(byte_length, leaf_id)` pairs in increasing-length order.
    pub fn common_prefix_search(&self, key: &str) -> Vec<(usize, LeafId)> {
        let mut out = Vec::new();
        let mut node = ROOT;
        for (i, &byte) in key.as_bytes().iter().enumerate() {
            if let Some(id) = self.end_of_key(node) {
                out.push((i, id));
            }
            match self.step(node, byte) {
                Some(next) => node = next,
                None => return out,
            }
        }
        if let Some(id) = self.end_of_key(node) {
            out.push((key.len(), id));
        }
        out
    }

    /// Predictive search: all keys having `prefix` as a prefix, capped at
    /// `limit` results (the compiled dictionary's `ExpandSearch` contract
    /// bounds this at 512 during syllable graph completion).
    pub fn expand_search(&self, prefix: &str, limit: usize) -> Vec<(String, LeafId)> {
        let mut node = ROOT;
        for &byte in prefix.as_bytes() {
            match self.step(node, byte) {
                Some(next) => node = next,
                None => return Vec::new(),
            }
        }
        let mut out = Vec::new();
        self.collect(node, prefix.to_string(), limit, &mut out);
        out
    }

    fn collect(&self, node: usize, path: String, limit: usize, out: &mut Vec<(String, LeafId)>) {
        if out.len() >= limit {
            return;
        }
        if let Some(id) = self.end_of_key(node) {
            out.push((path.clone(), id));
            if out.len() >= limit {
                return;
            }
        }
        let b = match self.base.get(node) {
            Some(b) => *b,
            None => return,
        };
        for byte in 0u8..=255 {
            let child = b + byte as i32 + 1;
            if child < 0 {
                continue;
            }
            let child = child as usize;
            if self.check.get(child).copied() == Some(node as i32) {
                let mut next = path.clone();
                next.push(byte as char);
                self.collect(child, next, limit, out);
                if out.len() >= limit {
                    break;
                }
            }
        }
    }

    /// All `(syllable_id, properties)` resolutions recorded for `leaf`.
    pub fn query_spelling(&self, leaf: LeafId) -> &[(SyllableId, SpellingProperties)] {
        self.leaf_spellings
            .get(leaf as usize)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// The canonical syllabary spelling for `id`, i.e. the string
    /// `Dictionary::decode` resolves a `Code`'s syllable ids back through.
    pub fn syllable_spelling(&self, id: SyllableId) -> Option<&str> {
        self.syllabary.get(&id).map(|s| s.as_str())
    }

    pub fn to_arena(&self) -> Result<ArenaBuilder> {
        let payload = bincode::serialize(self)
            .map_err(|e| RimeError::Logic(format!("prism serialize failed: {e}")))?;
        let mut builder = ArenaBuilder::new(1);
        builder.add_section("prism", payload);
        Ok(builder)
    }

    pub fn from_mapped(mapped: &Mapped) -> Result<Self> {
        let bytes = mapped.section(0)?;
        bincode::deserialize(bytes).map_err(|e| RimeError::Broken {
            path: Default::default(),
            reason: format!("prism deserialize failed: {e}"),
        })
    }
}
