//! Builds a [`SyllableGraph`] over raw input: a DAG whose vertices are
//! byte offsets and whose edges are spellings (possibly fuzzy, corrected,
//! abbreviated or completed) recognized by a [`Prism`].
//!
//! Ported from the forward best-first sweep / backward pruning pass /
//! ambiguous-joint penalty used to build the syllable graph in the
//! original C++ implementation this crate's algorithms are grounded on.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashSet};

use crate::corrector::Corrector;
use crate::prism::{LeafId, Prism, SyllableId};
use crate::spelling::{SpellingProperties, SpellingType};

/// log(0.5): extra credibility cost for a syllable only reached via the
/// completion pass (it wasn't actually typed, just predicted).
pub const COMPLETION_PENALTY: f64 = -0.693_147_180_559_945_3;
/// log(0.01): credibility assigned to a syllable reached only through the
/// corrector, never as a literal or fuzzy match of the typed text.
pub const CORRECTION_CREDIBILITY: f64 = -4.605_170_185_988_091;
/// log(1e-10): penalty applied to syllables spanning an ambiguous joint
/// (a position where the input can be parsed two different ways, e.g.
/// pinyin "niju'ede").
pub const AMBIGUOUS_SYLLABLE_PENALTY: f64 = -23.025_850_929_940_457;
/// Cap on how many predictive completions `ExpandSearch` may return.
pub const EXPAND_SEARCH_LIMIT: usize = 512;

/// A spelling's role on one edge, with the positions (if any) where it
/// straddles an ambiguous syllable joint.
#[derive(Debug, Clone, Default)]
pub struct EdgeProperties {
    pub props: SpellingProperties,
    pub ambiguous_source_positions: BTreeSet<usize>,
}

pub type SpellingMap = BTreeMap<SyllableId, EdgeProperties>;
pub type EndVertexMap = BTreeMap<usize, SpellingMap>;
pub type EdgeMap = BTreeMap<usize, EndVertexMap>;
pub type SpellingIndex = BTreeMap<SyllableId, Vec<EdgeProperties>>;

#[derive(Debug, Default)]
pub struct SyllableGraph {
    pub input_length: usize,
    pub interpreted_length: usize,
    pub vertices: BTreeMap<usize, SpellingType>,
    pub edges: EdgeMap,
    pub indices: BTreeMap<usize, SpellingIndex>,
}

pub struct Syllabifier {
    delimiters: String,
    enable_completion: bool,
    strict_spelling: bool,
    corrector: Option<Box<dyn Corrector>>,
}

impl Syllabifier {
    pub fn new(delimiters: impl Into<String>, enable_completion: bool, strict_spelling: bool) -> Self {
        Self {
            delimiters: delimiters.into(),
            enable_completion,
            strict_spelling,
            corrector: None,
        }
    }

    pub fn enable_correction(&mut self, corrector: Box<dyn Corrector>) {
        self.corrector = Some(corrector);
    }

    pub fn build_syllable_graph(&self, input: &str, prism: &Prism) -> SyllableGraph {
        let mut graph = SyllableGraph::default();
        if input.is_empty() {
            return graph;
        }

        let mut farthest = 0usize;
        let mut heap: BinaryHeap<Reverse<(usize, SpellingType)>> = BinaryHeap::new();
        heap.push(Reverse((0, SpellingType::Normal)));

        while let Some(Reverse((current_pos, vertex_type))) = heap.pop() {
            if graph.vertices.contains_key(&current_pos) {
                continue;
            }
            graph.vertices.insert(current_pos, vertex_type);
            farthest = farthest.max(current_pos);

            let current_input = &input[current_pos..];
            let mut matches: Vec<(usize, LeafId)> = prism.common_prefix_search(current_input);
            let exact_match_leaves: HashSet<LeafId> = matches.iter().map(|(_, l)| *l).collect();

            if let Some(corrector) = &self.corrector {
                let mut corrections = crate::corrector::Corrections::new();
                corrector.tolerance_search(prism, current_input, &mut corrections, 5);
                for correction in corrections.into_vec() {
                    let has_normal = prism
                        .query_spelling(correction.leaf)
                        .iter()
                        .any(|(_, p)| p.spelling_type == SpellingType::Normal);
                    if has_normal {
                        matches.push((correction.consumed, correction.leaf));
                    }
                }
            }

            if matches.is_empty() {
                continue;
            }

            for (len, leaf) in matches {
                if len == 0 {
                    continue;
                }
                let mut end_pos = current_pos + len;
                while end_pos < input.len() && self.delimiters.contains(input.as_bytes()[end_pos] as char) {
                    end_pos += 1;
                }
                let matches_input = current_pos == 0 && end_pos == input.len();

                let spellings = graph
                    .edges
                    .entry(current_pos)
                    .or_default()
                    .entry(end_pos)
                    .or_default();
                let mut end_vertex_type = SpellingType::Invalid;

                for (syllable_id, base_props) in prism.query_spelling(leaf) {
                    if self.strict_spelling && matches_input && base_props.spelling_type != SpellingType::Normal {
                        continue;
                    }
                    let mut props = base_props.clone();
                    props.end_pos = end_pos;
                    if self.corrector.is_some() && !exact_match_leaves.contains(&leaf) {
                        props.is_correction = true;
                        props.credibility = CORRECTION_CREDIBILITY;
                    }
                    match spellings.entry(*syllable_id) {
                        std::collections::btree_map::Entry::Vacant(v) => {
                            v.insert(EdgeProperties {
                                props: props.clone(),
                                ambiguous_source_positions: BTreeSet::new(),
                            });
                        }
                        std::collections::btree_map::Entry::Occupied(mut o) => {
                            if props.spelling_type < o.get().props.spelling_type {
                                o.get_mut().props.spelling_type = props.spelling_type;
                            }
                        }
                    }
                    if end_vertex_type > props.spelling_type && !props.is_correction {
                        end_vertex_type = props.spelling_type;
                    }
                }

                if spellings.is_empty() {
                    graph.edges.get_mut(&current_pos).unwrap().remove(&end_pos);
                    continue;
                }
                if end_vertex_type < vertex_type {
                    end_vertex_type = vertex_type;
                }
                heap.push(Reverse((end_pos, end_vertex_type)));
            }
        }

        prune_stale_vertices(&mut graph, farthest);

        if self.enable_completion && farthest < input.len() {
            inject_completions(&mut graph, input, prism, &mut farthest);
        }

        graph.input_length = input.len();
        graph.interpreted_length = farthest;
        transpose(&mut graph);
        graph
    }
}

fn prune_stale_vertices(graph: &mut SyllableGraph, farthest: usize) {
    let mut good: HashSet<usize> = HashSet::new();
    good.insert(farthest);
    let farthest_type = graph.vertices.get(&farthest).copied().unwrap_or(SpellingType::Invalid);
    let last_type = farthest_type.max(SpellingType::Fuzzy);

    for i in (0..farthest).rev() {
        if !graph.vertices.contains_key(&i) {
            continue;
        }
        let mut overlap_targets: Vec<usize> = Vec::new();

        if let Some(end_vertices) = graph.edges.get_mut(&i) {
            let keys: Vec<usize> = end_vertices.keys().copied().collect();
            for end in keys {
                if !good.contains(&end) {
                    end_vertices.remove(&end);
                    continue;
                }
                let spellings = end_vertices.get_mut(&end).unwrap();
                let mut edge_type = SpellingType::Invalid;
                let syll_ids: Vec<SyllableId> = spellings.keys().copied().collect();
                for sid in syll_ids {
                    let keep = {
                        let props = &spellings[&sid];
                        props.props.is_correction || props.props.spelling_type <= last_type
                    };
                    if keep {
                        let spelling_type = spellings[&sid].props.spelling_type;
                        if !spellings[&sid].props.is_correction && spelling_type < edge_type {
                            edge_type = spelling_type;
                        }
                    } else {
                        spellings.remove(&sid);
                    }
                }
                if spellings.is_empty() {
                    end_vertices.remove(&end);
                } else {
                    if edge_type < SpellingType::Abbreviation {
                        overlap_targets.push(end);
                    }
                }
            }
        }

        for end in overlap_targets {
            check_overlapped_spellings(graph, i, end);
        }

        let vertex_stale = graph.vertices.get(&i).copied().unwrap_or(SpellingType::Invalid) > last_type
            || graph.edges.get(&i).map(|m| m.is_empty()).unwrap_or(true);
        if vertex_stale {
            graph.vertices.remove(&i);
            graph.edges.remove(&i);
            continue;
        }
        good.insert(i);
    }
}

/// If "Z" can be parsed as either one syllable `start..end` or as two
/// syllables `start..joint` + `joint..end`, the joint position is an
/// ambiguous syllable boundary: discourage treating it as a single
/// syllable elsewhere by penalizing every spelling on `joint..end`.
fn check_overlapped_spellings(graph: &mut SyllableGraph, start: usize, end: usize) {
    let y_end_vertices = match graph.edges.get(&start) {
        Some(m) => m.clone(),
        None => return,
    };
    for (&joint, _) in y_end_vertices.iter() {
        if joint >= end {
            break;
        }
        let x_end_vertices = match graph.edges.get(&joint) {
            Some(m) => m,
            None => continue,
        };
        // Mirrors the original's "examine the first x.first >= end" scan.
        let mut hit = false;
        for (&x_end, _) in x_end_vertices.iter() {
            if x_end < end {
                continue;
            }
            hit = x_end == end;
            break;
        }
        if hit {
            if let Some(spellings) = graph.edges.get_mut(&joint).and_then(|m| m.get_mut(&end)) {
                for (_, props) in spellings.iter_mut() {
                    props.props.credibility += AMBIGUOUS_SYLLABLE_PENALTY;
                    props.ambiguous_source_positions.insert(start);
                }
            }
            graph.vertices.insert(joint, SpellingType::Ambiguous);
        }
    }
}

fn inject_completions(graph: &mut SyllableGraph, input: &str, prism: &Prism, farthest: &mut usize) {
    let current_pos = *farthest;
    let end_pos = input.len();
    let code_length = end_pos - current_pos;
    let keys = prism.expand_search(&input[current_pos..], EXPAND_SEARCH_LIMIT);
    if keys.is_empty() {
        return;
    }

    let spellings = graph
        .edges
        .entry(current_pos)
        .or_default()
        .entry(end_pos)
        .or_default();

    for (text, leaf) in keys {
        if text.len() < code_length {
            continue;
        }
        for (syllable_id, base_props) in prism.query_spelling(leaf) {
            if base_props.spelling_type < SpellingType::Abbreviation {
                let mut props = base_props.clone();
                props.spelling_type = SpellingType::Completion;
                props.credibility += COMPLETION_PENALTY;
                props.end_pos = end_pos;
                spellings.insert(
                    *syllable_id,
                    EdgeProperties {
                        props,
                        ambiguous_source_positions: BTreeSet::new(),
                    },
                );
            }
        }
    }

    if spellings.is_empty() {
        graph.edges.get_mut(&current_pos).unwrap().remove(&end_pos);
    } else {
        *farthest = end_pos;
    }
}

fn transpose(graph: &mut SyllableGraph) {
    for (&start, end_vertices) in graph.edges.iter() {
        let index = graph.indices.entry(start).or_default();
        for (_, spellings) in end_vertices.iter().rev() {
            for (&syllable_id, props) in spellings.iter() {
                index.entry(syllable_id).or_default().push(props.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prism::PrismBuilder;

    fn simple_prism() -> Prism {
        let mut b = PrismBuilder::new();
        b.add("ni", 0, SpellingProperties::new(SpellingType::Normal, 2));
        b.add("hao", 1, SpellingProperties::new(SpellingType::Normal, 3));
        b.add("ni", 2, SpellingProperties::new(SpellingType::Normal, 2));
        b.add("hen", 2, SpellingProperties::new(SpellingType::Normal, 3));
        b.build()
    }

    #[test]
    fn builds_simple_two_syllable_graph() {
        let prism = simple_prism();
        let syl = Syllabifier::new("'", true, false);
        let graph = syl.build_syllable_graph("nihao", &prism);
        assert_eq!(graph.interpreted_length, 5);
        assert!(graph.edges.get(&0).unwrap().contains_key(&2));
        assert!(graph.edges.get(&2).unwrap().contains_key(&5));
    }

    #[test]
    fn delimiters_are_consumed_after_a_syllable() {
        let prism = simple_prism();
        let syl = Syllabifier::new("'", true, false);
        let graph = syl.build_syllable_graph("ni'hao", &prism);
        // the edge from 0 should swallow the delimiter and land on 3, not 2
        assert!(graph.edges.get(&0).unwrap().contains_key(&3));
    }

    #[test]
    fn stops_at_farthest_reachable_position_without_completion() {
        let prism = simple_prism();
        let syl = Syllabifier::new("'", false, false);
        let graph = syl.build_syllable_graph("nix", &prism);
        assert_eq!(graph.interpreted_length, 2);
        assert_eq!(graph.input_length, 3);
    }
}
