//! Code trie mapping syllable-id sequences to dictionary entries, plus the
//! stateful cursor (`TableAccessor`) used to walk it alongside a syllable
//! graph.
//!
//! The on-disk original partitions this into fixed-width Head/Trunk/Tail
//! arrays sized for a handful of leading syllables, spilling anything
//! beyond that into a variable-length `extra_code` tail record — a layout
//! that exists purely to keep mmap records fixed-size. This crate gets the
//! same *query* contract (advance one syllable at a time, backdate,
//! access the entries at the current prefix) from a plain nested trie,
//! which handles codes of any length uniformly and needs no separate
//! extra-code bookkeeping; the trade is a larger on-disk footprint for a
//! much simpler and more obviously correct implementation, noted as a
//! deliberate simplification.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::arena::{Builder as ArenaBuilder, Mapped};
use crate::error::{Result, RimeError};
use crate::prism::SyllableId;
use crate::syllabifier::SyllableGraph;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub text: String,
    pub weight: f64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TrieNode {
    children: HashMap<SyllableId, TrieNode>,
    entries: Vec<Entry>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Table {
    root: TrieNode,
}

#[derive(Debug, Default)]
pub struct TableBuilder {
    root: TrieNode,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one vocabulary entry under `code` (a sequence of syllable ids).
    pub fn add(&mut self, code: &[SyllableId], text: impl Into<String>, weight: f64) {
        let mut node = &mut self.root;
        for &s in code {
            node = node.children.entry(s).or_default();
        }
        node.entries.push(Entry {
            text: text.into(),
            weight,
        });
    }

    pub fn build(mut self) -> Table {
        sort_node(&mut self.root);
        tracing::info!(entries = count_entries(&self.root), "built table");
        Table { root: self.root }
    }
}

fn sort_node(node: &mut TrieNode) {
    node.entries
        .sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(std::cmp::Ordering::Equal));
    for child in node.children.values_mut() {
        sort_node(child);
    }
}

fn count_entries(node: &TrieNode) -> usize {
    node.entries.len() + node.children.values().map(count_entries).sum::<usize>()
}

impl Table {
    fn navigate(&self, path: &[SyllableId]) -> Option<&TrieNode> {
        let mut node = &self.root;
        for &s in path {
            node = node.children.get(&s)?;
        }
        Some(node)
    }

    /// Entries filed under exactly `code`.
    pub fn lookup(&self, code: &[SyllableId]) -> &[Entry] {
        self.navigate(code).map(|n| n.entries.as_slice()).unwrap_or(&[])
    }

    pub fn accessor(&self) -> TableAccessor<'_> {
        TableAccessor { table: self, path: Vec::new() }
    }

    /// Walks `graph` starting at `start`, following every syllable-edge
    /// reachable from it, and returns every `(end_pos, entries)` pair the
    /// table has an entry for. Mirrors the graph-driven BFS the original
    /// `Table::Query` performs: advancing the cursor one edge at a time,
    /// backdating before trying a sibling edge.
    pub fn query(&self, graph: &SyllableGraph, start: usize) -> Vec<(usize, Vec<Entry>)> {
        let mut results = Vec::new();
        let mut queue: VecDeque<(usize, Vec<SyllableId>)> = VecDeque::new();
        queue.push_back((start, Vec::new()));

        while let Some((pos, path)) = queue.pop_front() {
            let Some(end_vertices) = graph.edges.get(&pos) else {
                continue;
            };
            for (&end_pos, spellings) in end_vertices.iter() {
                for &syllable_id in spellings.keys() {
                    let mut next_path = path.clone();
                    next_path.push(syllable_id);
                    if let Some(node) = self.navigate(&next_path) {
                        if !node.entries.is_empty() {
                            results.push((end_pos, node.entries.clone()));
                        }
                        if !node.children.is_empty() {
                            queue.push_back((end_pos, next_path));
                        }
                    }
                }
            }
        }
        results
    }

    pub fn to_arena(&self) -> Result<ArenaBuilder> {
        let payload =
            bincode::serialize(self).map_err(|e| RimeError::Logic(format!("table serialize failed: {e}")))?;
        let mut builder = ArenaBuilder::new(1);
        builder.add_section("table", payload);
        Ok(builder)
    }

    pub fn from_mapped(mapped: &Mapped) -> Result<Self> {
        let bytes = mapped.section(0)?;
        bincode::deserialize(bytes).map_err(|e| RimeError::Broken {
            path: Default::default(),
            reason: format!("table deserialize failed: {e}"),
        })
    }
}

/// Stateful cursor over a [`Table`]: advances one syllable at a time,
/// mirroring `TableAccessor`'s Advance/Backdate/Reset contract so callers
/// can explore a branching syllable graph without re-walking from the
/// root on every branch.
pub struct TableAccessor<'t> {
    table: &'t Table,
    path: Vec<SyllableId>,
}

impl<'t> TableAccessor<'t> {
    pub fn advance(&mut self, syllable_id: SyllableId) -> bool {
        match self.table.navigate(&self.path) {
            Some(node) if node.children.contains_key(&syllable_id) => {
                self.path.push(syllable_id);
                true
            }
            _ => false,
        }
    }

    pub fn backdate(&mut self) -> bool {
        self.path.pop().is_some()
    }

    pub fn reset(&mut self) {
        self.path.clear();
    }

    pub fn access(&self) -> &[Entry] {
        self.table
            .navigate(&self.path)
            .map(|n| n.entries.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_children(&self) -> bool {
        self.table
            .navigate(&self.path)
            .map(|n| !n.children.is_empty())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        let mut b = TableBuilder::new();
        b.add(&[1, 2], "你好", 10.0);
        b.add(&[1, 2], "妮好", 1.0);
        b.add(&[1], "你", 20.0);
        b.build()
    }

    #[test]
    fn lookup_returns_weight_sorted_entries() {
        let t = sample_table();
        let entries = t.lookup(&[1, 2]);
        assert_eq!(entries[0].text, "你好");
        assert_eq!(entries[1].text, "妮好");
    }

    #[test]
    fn accessor_advance_and_backdate() {
        let t = sample_table();
        let mut acc = t.accessor();
        assert!(acc.advance(1));
        assert_eq!(acc.access()[0].text, "你");
        assert!(acc.advance(2));
        assert_eq!(acc.access().len(), 2);
        assert!(acc.backdate());
        assert_eq!(acc.access()[0].text, "你");
        assert!(!acc.advance(99));
    }

    #[test]
    fn round_trips_through_arena() {
        let t = sample_table();
        let dir = std::env::temp_dir();
        let path = dir.join(format!("rime-table-test-{}.bin", std::process::id()));
        t.to_arena().unwrap().finish(&path).unwrap();

        let mapped = Mapped::open(&path, 1).unwrap();
        let loaded = Table::from_mapped(&mapped).unwrap();
        assert_eq!(loaded.lookup(&[1]).len(), 1);

        std::fs::remove_file(&path).unwrap();
    }
}
