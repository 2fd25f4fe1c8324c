//! Turns a syllabified input into ranked candidates: single-word lookups
//! through [`Dictionary`], optionally preceded by a whole-sentence reading
//! via [`crate::poet`] when the input spans more than one syllable and no
//! single lookup covers it all.

use crate::config::{RimeConfig, TextFormatRule};
use crate::dictionary::DictEntry;
use crate::dictionary::Dictionary;
use crate::poet::{self, Sentence, Word, WordGraph};
use crate::prism::Prism;
use crate::spelling::SpellingType;
use crate::syllabifier::{SyllableGraph, Syllabifier, AMBIGUOUS_SYLLABLE_PENALTY};

/// Which pass produced a [`Candidate`]: a single dictionary entry covering
/// the whole query, a predictive continuation past what was typed, or a
/// whole-sentence composition from [`poet::make_sentence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    Phrase,
    Completion,
    Sentence,
}

/// One ranked result. `quality` is the score candidates are ordered by,
/// highest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub kind: CandidateKind,
    pub text: String,
    pub start: usize,
    pub end: usize,
    /// The (formatted) spelled input this candidate covers.
    pub preedit: String,
    /// For a completion, the not-yet-converted tail of the input; `None`
    /// for an exact phrase or sentence match.
    pub comment: Option<String>,
    pub quality: f64,
    pub is_user_phrase: bool,
}

/// A source of previously-committed phrases, kept separate from the
/// compiled dictionary so the translator doesn't need to know how user
/// history is stored.
pub trait UserPhraseSource {
    /// Words filed under `prefix`, each with an accumulated usage weight.
    /// `expand` requests every word that starts with `prefix` rather than
    /// only an exact match.
    fn lookup_words(&self, prefix: &str, expand: bool, limit: usize) -> Vec<(String, f64)>;
}

const INITIAL_SEARCH_LIMIT: usize = 10;
const EXPANDING_FACTOR: usize = 10;

fn quality_of(weight: f64, initial_quality: f64, is_normal: bool, is_user_phrase: bool) -> f64 {
    weight + initial_quality + if is_normal { 0.0 } else { -1.0 } + if is_user_phrase { 0.5 } else { 0.0 }
}

/// Runs `text` through each formatter rule in turn, left to right. A rule
/// whose pattern fails to compile is skipped (logged) rather than failing
/// the whole translation.
fn apply_formatters(rules: &[TextFormatRule], text: &str) -> String {
    let mut out = text.to_string();
    for rule in rules {
        match regex::Regex::new(&rule.pattern) {
            Ok(re) => out = re.replace_all(&out, rule.replacement.as_str()).into_owned(),
            Err(err) => {
                tracing::warn!(pattern = %rule.pattern, %err, "skipping invalid formatter pattern");
            }
        }
    }
    out
}

/// Builds the candidate for one table entry. `entry.remaining` (bytes of
/// `input` this match left unconsumed) distinguishes an exact phrase
/// (`0`) from a predictive completion (`>0`), whose unconsumed tail
/// becomes the comment.
fn make_phrase_candidate(
    entry: DictEntry,
    input: &str,
    start: usize,
    initial_quality: f64,
    preedit_formatter: &[TextFormatRule],
    comment_formatter: &[TextFormatRule],
) -> Candidate {
    let consumed = input.len() - entry.remaining;
    let kind = if entry.remaining > 0 { CandidateKind::Completion } else { CandidateKind::Phrase };
    let comment = if entry.remaining > 0 {
        Some(apply_formatters(comment_formatter, &input[consumed..]))
    } else {
        None
    };
    Candidate {
        kind,
        text: entry.text,
        start,
        end: start + consumed,
        preedit: apply_formatters(preedit_formatter, &input[..consumed]),
        comment,
        quality: quality_of(entry.weight, initial_quality, entry.is_normal, false),
        is_user_phrase: false,
    }
}

/// Builds the candidate for one user-dictionary phrase. `lookup_words` is
/// always queried with the whole current input as its prefix, so every
/// result covers the full query (`remaining_code_length == 0`) the same
/// way an exact dictionary match does.
fn make_user_candidate(
    text: String,
    weight: f64,
    input: &str,
    start: usize,
    initial_quality: f64,
    preedit_formatter: &[TextFormatRule],
) -> Candidate {
    Candidate {
        kind: CandidateKind::Phrase,
        text,
        start,
        end: start + input.len(),
        preedit: apply_formatters(preedit_formatter, input),
        comment: None,
        quality: quality_of(weight, initial_quality, true, true),
        is_user_phrase: true,
    }
}

/// Pulls candidates from an already-sorted batch of dictionary entries
/// (ascending `remaining`, i.e. descending matched length) merged against
/// a widening-window user-phrase fetch, interleaving the two by
/// descending matched length and preferring the user phrase on a tie —
/// mirroring the original's `LazyTableTranslation`.
pub struct LazyTranslation<'d> {
    entries: std::iter::Peekable<std::vec::IntoIter<DictEntry>>,
    user_dict: Option<&'d dyn UserPhraseSource>,
    user_phrases: std::collections::VecDeque<(String, f64)>,
    user_limit: usize,
    input: String,
    start: usize,
    initial_quality: f64,
    preedit_formatter: &'d [TextFormatRule],
    comment_formatter: &'d [TextFormatRule],
}

impl<'d> LazyTranslation<'d> {
    #[allow(clippy::too_many_arguments)]
    fn new(
        entries: Vec<DictEntry>,
        user_dict: Option<&'d dyn UserPhraseSource>,
        input: &str,
        start: usize,
        initial_quality: f64,
        preedit_formatter: &'d [TextFormatRule],
        comment_formatter: &'d [TextFormatRule],
    ) -> Self {
        let mut t = Self {
            entries: entries.into_iter().peekable(),
            user_dict,
            user_phrases: std::collections::VecDeque::new(),
            user_limit: INITIAL_SEARCH_LIMIT,
            input: input.to_string(),
            start,
            initial_quality,
            preedit_formatter,
            comment_formatter,
        };
        t.fetch_more_user_phrases();
        t
    }

    fn fetch_more_user_phrases(&mut self) {
        let Some(source) = self.user_dict else { return };
        if self.user_limit == 0 {
            return;
        }
        let fetched = source.lookup_words(&self.input, true, self.user_limit);
        if fetched.len() < self.user_limit {
            self.user_limit = 0;
        } else {
            self.user_limit *= EXPANDING_FACTOR;
        }
        self.user_phrases = fetched.into_iter().collect();
    }

    pub fn next(&mut self) -> Option<Candidate> {
        // Every user phrase here matches the whole query, so its
        // `remaining_code_length` is always 0; comparing against the head
        // of the (already length-sorted) dict stream picks whichever
        // source currently has the longer match, preferring the user
        // phrase on a tie per the ordering guarantee, except when the
        // user's remaining is nonzero and the dict entry's is zero.
        let dict_remaining = self.entries.peek().map(|e| e.remaining);
        let take_user = !self.user_phrases.is_empty()
            && match dict_remaining {
                None => true,
                Some(r) => {
                    const USER_REMAINING: usize = 0;
                    USER_REMAINING < r || !(USER_REMAINING > 0 && r == 0)
                }
            };

        if take_user {
            let (text, weight) = self.user_phrases.pop_front()?;
            return Some(make_user_candidate(
                text,
                weight,
                &self.input,
                self.start,
                self.initial_quality,
                self.preedit_formatter,
            ));
        }

        let entry = self.entries.next()?;
        Some(make_phrase_candidate(
            entry,
            &self.input,
            self.start,
            self.initial_quality,
            self.preedit_formatter,
            self.comment_formatter,
        ))
    }
}

enum TranslationInner<'d> {
    Lazy(LazyTranslation<'d>),
    Eager(std::vec::IntoIter<Candidate>),
}

/// A pull-based candidate stream: the whole-sentence candidate (if any)
/// first, then the word-level stream, exactly the ordering spec.md §4.8
/// step 4 requires.
pub struct Translation<'d> {
    sentence: Option<Candidate>,
    inner: TranslationInner<'d>,
}

impl<'d> Iterator for Translation<'d> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        if let Some(sentence) = self.sentence.take() {
            return Some(sentence);
        }
        match &mut self.inner {
            TranslationInner::Lazy(t) => t.next(),
            TranslationInner::Eager(it) => it.next(),
        }
    }
}

pub struct Translator<'a> {
    pub prism: &'a Prism,
    pub syllabifier: &'a Syllabifier,
    pub dict: &'a Dictionary<'a>,
    pub config: &'a RimeConfig,
}

impl<'a> Translator<'a> {
    pub fn new(prism: &'a Prism, syllabifier: &'a Syllabifier, dict: &'a Dictionary<'a>, config: &'a RimeConfig) -> Self {
        Self {
            prism,
            syllabifier,
            dict,
            config,
        }
    }

    /// Translates `input` starting at `start`: builds the syllable graph
    /// once, and from it both the sentence-level candidate (when the
    /// input spans more than one syllable and no single lookup already
    /// covers it) and the word-level candidate stream.
    pub fn translate(&self, input: &str, start: usize, user_dict: Option<&'a dyn UserPhraseSource>) -> Option<Translation<'a>> {
        tracing::debug!(input, start, "translator query");
        if input.is_empty() {
            return None;
        }
        let graph = self.syllabifier.build_syllable_graph(input, self.prism);
        if graph.edges.is_empty() {
            return None;
        }

        let phrase_entries: Vec<DictEntry> = self.dict.lookup(&graph, 0).collect();
        let user_words = user_dict
            .map(|u| u.lookup_words(input, true, INITIAL_SEARCH_LIMIT))
            .unwrap_or_default();
        if phrase_entries.is_empty() && user_words.is_empty() {
            return None;
        }

        let longest_phrase = phrase_entries
            .iter()
            .map(|e| graph.input_length - e.remaining)
            .max()
            .unwrap_or(0);
        let longest_user = if user_words.is_empty() { 0 } else { graph.input_length };
        let translated_len = longest_phrase.max(longest_user);

        // Every syllable adds at least one vertex beyond the start: one
        // syllable spans exactly `{0, end}` (two vertices), so three or
        // more means at least two syllables were recognized.
        let multi_syllable = graph.vertices.len() >= 3;

        let sentence = if translated_len < graph.interpreted_length && multi_syllable {
            self.build_sentence(&graph)
                .map(|s| self.sentence_to_candidate(&s, input, start))
        } else {
            None
        };

        let inner = if self.config.enable_completion {
            TranslationInner::Lazy(LazyTranslation::new(
                phrase_entries,
                user_dict,
                input,
                start,
                self.config.initial_quality,
                &self.config.preedit_formatter,
                &self.config.comment_formatter,
            ))
        } else {
            let mut candidates: Vec<Candidate> = phrase_entries
                .into_iter()
                .filter(|e| e.remaining == 0)
                .map(|e| {
                    make_phrase_candidate(
                        e,
                        input,
                        start,
                        self.config.initial_quality,
                        &self.config.preedit_formatter,
                        &self.config.comment_formatter,
                    )
                })
                .collect();
            for (text, weight) in user_words {
                candidates.push(make_user_candidate(
                    text,
                    weight,
                    input,
                    start,
                    self.config.initial_quality,
                    &self.config.preedit_formatter,
                ));
            }
            candidates.sort_by(|a, b| b.quality.partial_cmp(&a.quality).unwrap_or(std::cmp::Ordering::Equal));
            TranslationInner::Eager(candidates.into_iter())
        };

        Some(Translation { sentence, inner })
    }

    /// Builds the best whole-input reading from `graph`: at every
    /// reachable start, every dictionary entry active there becomes a
    /// word-graph edge (penalized if `start` is an ambiguous joint), and
    /// [`poet::make_sentence`] picks the highest-weight cover.
    fn build_sentence(&self, graph: &SyllableGraph) -> Option<Sentence> {
        if !self.config.enable_sentence {
            return None;
        }
        let mut word_graph = WordGraph::new(graph.input_length);

        for &start_pos in graph.edges.keys() {
            let penalty = if graph.vertices.get(&start_pos) == Some(&SpellingType::Ambiguous) {
                AMBIGUOUS_SYLLABLE_PENALTY
            } else {
                0.0
            };
            let active = self.dict.lookup(graph, start_pos);
            for entry in active {
                let end = graph.input_length - entry.remaining;
                if end <= start_pos {
                    continue;
                }
                word_graph.add_word(
                    start_pos,
                    end,
                    Word {
                        text: entry.text,
                        weight: entry.weight + penalty,
                        is_user_phrase: false,
                    },
                );
            }
        }

        poet::make_sentence(&word_graph)
    }

    fn sentence_to_candidate(&self, sentence: &Sentence, input: &str, start: usize) -> Candidate {
        let end_offset = sentence.segments.last().map(|s| s.end).unwrap_or(0);
        Candidate {
            kind: CandidateKind::Sentence,
            text: sentence.text(),
            start,
            end: start + end_offset,
            preedit: apply_formatters(&self.config.preedit_formatter, &input[..end_offset]),
            comment: None,
            quality: sentence.weight + self.config.initial_quality,
            is_user_phrase: false,
        }
    }

    /// Builds the best whole-input reading for `input` directly, without
    /// going through [`Translator::translate`]'s word-level stream.
    pub fn make_sentence(&self, input: &str) -> Option<Sentence> {
        let graph = self.syllabifier.build_syllable_graph(input, self.prism);
        self.build_sentence(&graph)
    }
}

/// Post-processing wrappers over a [`Translation`] stream: narrowing to a
/// target charset and suppressing duplicate-text candidates, mirroring the
/// original's `Filter`-chain translators that wrap a base translation
/// without re-running the dictionary lookup.
pub mod filters {
    use super::{Candidate, CandidateKind};
    use std::collections::HashSet;

    /// Keeps only candidates whose text is entirely within `charset`
    /// (e.g. the Unicode ranges a simplified- or traditional-only theme
    /// restricts itself to), checked character by character.
    pub struct CharsetFilter<I> {
        inner: I,
        charset: std::sync::Arc<dyn Fn(char) -> bool + Send + Sync>,
    }

    impl<I> CharsetFilter<I> {
        pub fn new(inner: I, charset: std::sync::Arc<dyn Fn(char) -> bool + Send + Sync>) -> Self {
            Self { inner, charset }
        }
    }

    impl<I: Iterator<Item = Candidate>> Iterator for CharsetFilter<I> {
        type Item = Candidate;

        fn next(&mut self) -> Option<Candidate> {
            loop {
                let candidate = self.inner.next()?;
                if candidate.text.chars().all(|c| (self.charset)(c)) {
                    return Some(candidate);
                }
            }
        }
    }

    /// Drops any candidate whose text has already been yielded, keeping
    /// only the first (highest-quality, since candidates arrive in
    /// descending-quality order) occurrence.
    pub struct DistinctFilter<I> {
        inner: I,
        seen: HashSet<String>,
    }

    impl<I> DistinctFilter<I> {
        pub fn new(inner: I) -> Self {
            Self { inner, seen: HashSet::new() }
        }
    }

    impl<I: Iterator<Item = Candidate>> Iterator for DistinctFilter<I> {
        type Item = Candidate;

        fn next(&mut self) -> Option<Candidate> {
            loop {
                let candidate = self.inner.next()?;
                if self.seen.insert(candidate.text.clone()) {
                    return Some(candidate);
                }
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn cand(text: &str) -> Candidate {
            Candidate {
                kind: CandidateKind::Phrase,
                text: text.to_string(),
                start: 0,
                end: 1,
                preedit: String::new(),
                comment: None,
                quality: 0.0,
                is_user_phrase: false,
            }
        }

        #[test]
        fn charset_filter_drops_out_of_set_candidates() {
            let inner = vec![cand("你"), cand("a"), cand("好")].into_iter();
            let is_cjk: std::sync::Arc<dyn Fn(char) -> bool + Send + Sync> =
                std::sync::Arc::new(|c: char| ('\u{4e00}'..='\u{9fff}').contains(&c));
            let mut filtered = CharsetFilter::new(inner, is_cjk);
            assert_eq!(filtered.next().unwrap().text, "你");
            assert_eq!(filtered.next().unwrap().text, "好");
            assert!(filtered.next().is_none());
        }

        #[test]
        fn distinct_filter_drops_repeats() {
            let inner = vec![cand("你"), cand("你"), cand("好")].into_iter();
            let mut filtered = DistinctFilter::new(inner);
            assert_eq!(filtered.next().unwrap().text, "你");
            assert_eq!(filtered.next().unwrap().text, "好");
            assert!(filtered.next().is_none());
        }
    }
}
