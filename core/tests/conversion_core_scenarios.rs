//! End-to-end scenarios spanning prism, syllable graph, dictionary and
//! sentence maker together, each mirroring one concrete walkthrough of how
//! these pieces interact.

use libchinese_core::corrector::NearSearchCorrector;
use libchinese_core::poet::{self, Word, WordGraph};
use libchinese_core::prism::PrismBuilder;
use libchinese_core::spelling::{SpellingProperties, SpellingType};
use libchinese_core::syllabifier::Syllabifier;
use libchinese_core::table::TableBuilder;
use libchinese_core::Dictionary;

#[test]
fn common_prefix_search_orders_shortest_match_first() {
    let mut builder = PrismBuilder::new();
    builder.add("a", 1, SpellingProperties::new(SpellingType::Normal, 1));
    builder.add("b", 2, SpellingProperties::new(SpellingType::Normal, 1));
    builder.add("ab", 3, SpellingProperties::new(SpellingType::Normal, 2));
    let prism = builder.build();

    let hits = prism.common_prefix_search("ab");
    let lengths: Vec<usize> = hits.iter().map(|(len, _)| *len).collect();
    assert_eq!(lengths, vec![1, 2]);
}

#[test]
fn abbreviation_edge_is_pruned_once_a_normal_edge_reaches_the_same_vertex() {
    let mut builder = PrismBuilder::new();
    builder.add("y", 1, SpellingProperties::new(SpellingType::Abbreviation, 1));
    builder.add("yi", 2, SpellingProperties::new(SpellingType::Normal, 2));
    let prism = builder.build();

    let syl = Syllabifier::new("'", false, false);
    let graph = syl.build_syllable_graph("yi", &prism);

    assert!(graph.edges.get(&0).map(|m| m.contains_key(&2)).unwrap_or(false));
    assert!(!graph.edges.get(&0).map(|m| m.contains_key(&1)).unwrap_or(false));
}

#[test]
fn dictionary_lookup_groups_by_end_position_with_longest_match_heaviest() {
    let mut pb = PrismBuilder::new();
    pb.add("a", 1, SpellingProperties::new(SpellingType::Normal, 1));
    pb.add("b", 2, SpellingProperties::new(SpellingType::Normal, 1));
    pb.add("c", 3, SpellingProperties::new(SpellingType::Normal, 1));
    let prism = pb.build();

    let mut tb = TableBuilder::new();
    tb.add(&[1], "A", 1.0);
    tb.add(&[1, 2], "AB", 2.0);
    tb.add(&[1, 2, 3], "ABC", 4.0);
    let table = tb.build();

    let syl = Syllabifier::new("'", false, false);
    let graph = syl.build_syllable_graph("abc", &prism);

    let dict = Dictionary::new(&prism, &table);
    let entries: Vec<_> = dict.lookup(&graph, 0).collect();

    let abc = entries.iter().find(|e| e.text == "ABC").expect("ABC present");
    assert_eq!(abc.remaining, 0);
    let ab = entries.iter().find(|e| e.text == "AB").expect("AB present");
    assert_eq!(ab.remaining, 1);
    let a = entries.iter().find(|e| e.text == "A").expect("A present");
    assert_eq!(a.remaining, 2);
}

#[test]
fn sentence_maker_prefers_the_higher_weight_bigram_over_two_unigrams() {
    let mut graph = WordGraph::new(2);
    graph.add_word(0, 1, Word { text: "w1".into(), weight: 1.0, is_user_phrase: false });
    graph.add_word(1, 2, Word { text: "w2".into(), weight: 1.0, is_user_phrase: false });
    graph.add_word(0, 2, Word { text: "bigram".into(), weight: 2.5, is_user_phrase: false });

    let sentence = poet::make_sentence(&graph).unwrap();
    assert_eq!(sentence.text(), "bigram");
}

#[test]
fn completion_enabled_yields_a_whole_input_completion_edge() {
    let mut pb = PrismBuilder::new();
    pb.add("zhong", 1, SpellingProperties::new(SpellingType::Normal, 5));
    pb.add("zhongwen", 2, SpellingProperties::new(SpellingType::Normal, 8));
    let prism = pb.build();

    let syl = Syllabifier::new("'", true, false);
    let graph = syl.build_syllable_graph("zh", &prism);

    let completion_edge = graph
        .edges
        .get(&0)
        .and_then(|m| m.get(&2))
        .expect("completion edge to end of input");
    let props = completion_edge.values().next().expect("at least one spelling");
    assert_eq!(props.props.spelling_type, SpellingType::Completion);
}

#[test]
fn corrector_marks_keyboard_adjacent_matches_as_corrections() {
    let mut pb = PrismBuilder::new();
    pb.add("wo", 1, SpellingProperties::new(SpellingType::Normal, 2));
    let prism = pb.build();

    let mut syl = Syllabifier::new("'", false, false);
    syl.enable_correction(Box::new(NearSearchCorrector));
    let graph = syl.build_syllable_graph("wp", &prism);

    let has_correction = graph
        .edges
        .values()
        .flat_map(|m| m.values())
        .any(|props| props.props.is_correction);
    assert!(has_correction, "expected at least one corrected edge for 'wp' -> 'wo'");
}
