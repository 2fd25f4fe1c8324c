//! The dictionary facade: walks a syllable graph against a [`Table`],
//! collecting every matching entry into ranked chunks and merging them
//! into a single ordered stream.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::VecDeque;

use crate::error::RimeError;
use crate::prism::{Prism, SyllableId};
use crate::spelling::SpellingType;
use crate::syllabifier::SyllableGraph;
use crate::table::{Entry, Table};

/// log(1e8): raw table weights are stored on a scale where this much is
/// subtracted before a chunk's accumulated credibility is added back in,
/// putting frequency counts and credibility adjustments on the same
/// footing for cross-chunk comparison.
const WEIGHT_NORMALIZATION: f64 = 18.420_680_743_952_367; // ln(1e8)

#[derive(Debug, Clone)]
pub struct DictEntry {
    pub text: String,
    /// `remaining_code_length`: for [`Dictionary::lookup`], the byte
    /// length of input still unconsumed at the end of this match; for
    /// [`Dictionary::lookup_words`], the tail of the matched syllable's
    /// spelling past the queried prefix. Either way, `0` marks an exact
    /// match and entries list ascending, so exact matches sort first.
    pub remaining: usize,
    pub weight: f64,
    pub is_normal: bool,
}

/// One (start, end) match against the table: every entry the table had
/// filed under the exact code walked to reach `end_pos`, ordered by
/// weight, descending.
struct Chunk {
    entries: Vec<Entry>,
    end_pos: usize,
    credibility: f64,
    is_normal: bool,
    cursor: usize,
}

impl Chunk {
    fn peek(&self, total_len: usize) -> Option<DictEntry> {
        let raw = self.entries.get(self.cursor)?;
        Some(DictEntry {
            text: raw.text.clone(),
            remaining: total_len - self.end_pos,
            weight: raw.weight - WEIGHT_NORMALIZATION + self.credibility,
            is_normal: self.is_normal,
        })
    }
}

fn compare_chunks(total_len: usize, a: &Chunk, b: &Chunk) -> Ordering {
    let ra = total_len - a.end_pos;
    let rb = total_len - b.end_pos;
    ra.cmp(&rb).then_with(|| {
        let wa = a.entries.get(a.cursor).map(|e| e.weight + a.credibility).unwrap_or(f64::MIN);
        let wb = b.entries.get(b.cursor).map(|e| e.weight + b.credibility).unwrap_or(f64::MIN);
        wb.partial_cmp(&wa).unwrap_or(Ordering::Equal)
    })
}

/// Collects matching chunks for one query and merges them into a single
/// stream, re-picking the best remaining chunk each time `next` is
/// called rather than fully sorting up front.
pub struct DictEntryIterator {
    chunks: Vec<Chunk>,
    total_len: usize,
}

impl DictEntryIterator {
    fn new(total_len: usize) -> Self {
        Self { chunks: Vec::new(), total_len }
    }

    fn add_chunk(&mut self, chunk: Chunk) {
        if !chunk.entries.is_empty() {
            self.chunks.push(chunk);
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.chunks.iter().all(|c| c.cursor >= c.entries.len())
    }

    pub fn peek(&self) -> Option<DictEntry> {
        self.best_index().and_then(|i| self.chunks[i].peek(self.total_len))
    }

    fn best_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, c) in self.chunks.iter().enumerate() {
            if c.cursor >= c.entries.len() {
                continue;
            }
            best = match best {
                None => Some(i),
                Some(b) => {
                    if compare_chunks(self.total_len, c, &self.chunks[b]) == Ordering::Less {
                        Some(i)
                    } else {
                        Some(b)
                    }
                }
            };
        }
        best
    }
}

impl Iterator for DictEntryIterator {
    type Item = DictEntry;

    fn next(&mut self) -> Option<DictEntry> {
        let i = self.best_index()?;
        let item = self.chunks[i].peek(self.total_len);
        self.chunks[i].cursor += 1;
        item
    }
}

/// Composes one [`Prism`] and a [`Table`] behind `Lookup`/`LookupWords`/
/// `Decode`, the way the original's dictionary facade sits in front of
/// packs built from the same syllabary.
pub struct Dictionary<'t> {
    prism: &'t Prism,
    table: &'t Table,
    last_error: RefCell<Option<RimeError>>,
}

impl<'t> Dictionary<'t> {
    pub fn new(prism: &'t Prism, table: &'t Table) -> Self {
        tracing::info!("loaded dictionary (prism + table)");
        Self {
            prism,
            table,
            last_error: RefCell::new(None),
        }
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.borrow().as_ref().map(|e| e.to_string())
    }

    /// Walks `graph` from `start`, returning every entry the table has
    /// filed under a code that matches some path through the graph,
    /// merged by ascending remaining length and descending weight.
    ///
    /// Never fails: a broken path or a dead end simply contributes no
    /// entries, with diagnostics available via [`Dictionary::last_error`].
    pub fn lookup(&self, graph: &SyllableGraph, start: usize) -> DictEntryIterator {
        tracing::debug!(start, input_length = graph.input_length, "dictionary lookup");
        let mut iter = DictEntryIterator::new(graph.input_length);

        struct Frame {
            pos: usize,
            path: Vec<SyllableId>,
            credibility: f64,
            all_normal: bool,
        }

        let mut queue: VecDeque<Frame> = VecDeque::new();
        queue.push_back(Frame {
            pos: start,
            path: Vec::new(),
            credibility: 0.0,
            all_normal: true,
        });

        while let Some(frame) = queue.pop_front() {
            let Some(end_vertices) = graph.edges.get(&frame.pos) else {
                continue;
            };
            for (&end_pos, spellings) in end_vertices.iter() {
                for (&syllable_id, props) in spellings.iter() {
                    let mut path = frame.path.clone();
                    path.push(syllable_id);
                    let credibility = frame.credibility + props.props.credibility;
                    let all_normal = frame.all_normal && props.props.spelling_type == SpellingType::Normal;

                    let entries = self.table.lookup(&path);
                    if !entries.is_empty() {
                        iter.add_chunk(Chunk {
                            entries: entries.to_vec(),
                            end_pos,
                            credibility,
                            is_normal: all_normal,
                            cursor: 0,
                        });
                    }
                    if self.has_longer_code(&path) {
                        queue.push_back(Frame {
                            pos: end_pos,
                            path,
                            credibility,
                            all_normal,
                        });
                    }
                }
            }
        }

        iter
    }

    fn has_longer_code(&self, path: &[SyllableId]) -> bool {
        let mut acc = self.table.accessor();
        for &s in path {
            if !acc.advance(s) {
                return false;
            }
        }
        acc.has_children()
    }

    /// Resolves `prefix` through the prism (`GetValue` for an exact match,
    /// `ExpandSearch` when `predictive`) and returns every single-syllable
    /// table entry filed under each matching syllable id, capped at
    /// `limit`. `remaining` on a predictive match carries the suffix of
    /// the matched spelling past `prefix`; it is always `0` for an exact
    /// match, matching the same `remaining_code_length` contract
    /// [`Dictionary::lookup`] uses.
    pub fn lookup_words(&self, prefix: &str, predictive: bool, limit: usize) -> Vec<DictEntry> {
        let mut matches: Vec<(SyllableId, usize)> = Vec::new();
        if predictive {
            for (text, leaf) in self.prism.expand_search(prefix, limit) {
                let remaining = text.len() - prefix.len();
                for (syllable_id, _) in self.prism.query_spelling(leaf) {
                    matches.push((*syllable_id, remaining));
                }
            }
        } else if let Some(leaf) = self.prism.get_value(prefix) {
            for (syllable_id, _) in self.prism.query_spelling(leaf) {
                matches.push((*syllable_id, 0));
            }
        }

        let mut out = Vec::new();
        for (syllable_id, remaining) in matches {
            for entry in self.table.lookup(&[syllable_id]) {
                out.push(DictEntry {
                    text: entry.text.clone(),
                    remaining,
                    weight: entry.weight,
                    is_normal: true,
                });
                if out.len() >= limit {
                    return out;
                }
            }
        }
        out
    }

    /// Resolves every syllable id in `code` back to its canonical
    /// syllabary spelling, or `None` if any id in the path has none
    /// recorded (an inconsistent or foreign code).
    pub fn decode(&self, code: &[SyllableId]) -> Option<Vec<String>> {
        code.iter()
            .map(|&id| self.prism.syllable_spelling(id).map(str::to_string))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prism::PrismBuilder;
    use crate::spelling::SpellingProperties;
    use crate::syllabifier::Syllabifier;
    use crate::table::TableBuilder;

    fn setup() -> (crate::prism::Prism, Table) {
        let mut pb = PrismBuilder::new();
        pb.add("ni", 1, SpellingProperties::new(SpellingType::Normal, 2));
        pb.add("hao", 2, SpellingProperties::new(SpellingType::Normal, 3));
        let prism = pb.build();

        let mut tb = TableBuilder::new();
        tb.add(&[1, 2], "你好", -2.0);
        tb.add(&[1], "你", -1.0);
        let table = tb.build();
        (prism, table)
    }

    #[test]
    fn lookup_merges_entries_by_remaining_length_then_weight() {
        let (prism, table) = setup();
        let syl = Syllabifier::new("'", false, false);
        let graph = syl.build_syllable_graph("nihao", &prism);

        let dict = Dictionary::new(&prism, &table);
        let entries: Vec<DictEntry> = dict.lookup(&graph, 0).collect();
        assert!(!entries.is_empty());
        assert_eq!(entries[0].text, "你好");
        assert_eq!(entries[0].remaining, 0);
    }

    #[test]
    fn lookup_words_exact_match_has_zero_remaining() {
        let (prism, table) = setup();
        let dict = Dictionary::new(&prism, &table);
        let words = dict.lookup_words("ni", false, 10);
        assert!(words.iter().any(|w| w.text == "你" && w.remaining == 0));
    }

    #[test]
    fn lookup_words_predictive_reports_remaining_code() {
        let (prism, table) = setup();
        let dict = Dictionary::new(&prism, &table);
        let words = dict.lookup_words("n", true, 10);
        let hit = words.iter().find(|w| w.text == "你").expect("你 present");
        assert_eq!(hit.remaining, 1); // "ni" minus the "n" prefix
    }

    #[test]
    fn decode_resolves_code_to_syllable_strings() {
        let (prism, table) = setup();
        let dict = Dictionary::new(&prism, &table);
        assert_eq!(dict.decode(&[1, 2]), Some(vec!["ni".to_string(), "hao".to_string()]));
        assert_eq!(dict.decode(&[1, 99]), None);
    }
}
