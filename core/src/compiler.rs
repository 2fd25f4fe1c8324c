//! Builds a [`Prism`] and a [`Table`] from a plain-text dictionary source:
//! an optional YAML-ish header followed by tab-separated `text, code,
//! weight?` rows. The syllabary is discovered on the fly as the union of
//! every code token across all rows, assigned ids by sort order, rather
//! than supplied up front.

use std::collections::BTreeSet;

use crate::prism::{PrismBuilder, SyllableId};
use crate::spelling::{SpellingProperties, SpellingType};
use crate::table::{Table, TableBuilder};

/// Default weight assigned to a row that omits the optional third column.
const DEFAULT_WEIGHT: f64 = 0.0;

/// One decoded row: the headword, its code split into syllable tokens,
/// and its weight.
#[derive(Debug, Clone, PartialEq)]
struct Row {
    text: String,
    code: Vec<String>,
    weight: f64,
}

/// Splits a source body into header and data sections the way a Rime
/// dictionary source does: a leading `---` delimited YAML block, then
/// tab-separated rows, blank lines and `#`-prefixed lines ignored.
fn split_header(source: &str) -> &str {
    let mut lines = source.lines();
    let Some(first) = lines.next() else { return source };
    if first.trim() != "---" {
        return source;
    }
    let mut offset = first.len() + 1;
    for line in lines {
        offset += line.len() + 1;
        if line.trim() == "..." || line.trim() == "---" {
            return &source[offset.min(source.len())..];
        }
    }
    source
}

fn parse_row(line: &str) -> Option<Row> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() || line.starts_with('#') {
        return None;
    }
    let mut cols = line.split('\t');
    let text = cols.next()?.to_string();
    let code_field = cols.next()?;
    let code: Vec<String> = code_field.split_whitespace().map(str::to_string).collect();
    if code.is_empty() {
        return None;
    }
    let weight = cols
        .next()
        .and_then(|w| w.trim().parse::<f64>().ok())
        .unwrap_or(DEFAULT_WEIGHT);
    Some(Row { text, code, weight })
}

fn parse_rows(body: &str) -> Vec<Row> {
    body.lines().filter_map(parse_row).collect()
}

/// FNV-1a over the raw source bytes, used as the artifact's
/// `dict_file_checksum`: compiled output carries the checksum of the
/// source it was built from, and a mismatch on load forces a rebuild.
pub fn checksum(source: &str) -> u32 {
    const OFFSET_BASIS: u32 = 0x811c9dc5;
    const PRIME: u32 = 0x0100_0193;
    let mut hash = OFFSET_BASIS;
    for byte in source.as_bytes() {
        hash ^= *byte as u32;
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

/// Whether a compiled artifact carrying `stored_checksum` is stale
/// relative to the current source text.
pub fn is_stale(stored_checksum: u32, source: &str) -> bool {
    stored_checksum != checksum(source)
}

/// A compiled dictionary: the double-array trie over syllable spellings
/// plus the code-indexed vocabulary, together with the checksum of the
/// source they were built from.
pub struct CompiledDictionary {
    pub prism: crate::prism::Prism,
    pub table: Table,
    pub checksum: u32,
}

/// Compiles `source` into a [`CompiledDictionary`].
///
/// The syllabary is the sorted set of every distinct code token seen
/// across all rows; each gets a [`SyllableId`] equal to its rank. Every
/// row's code is then resolved against that syllabary and walked as a
/// path into the vocabulary tree.
pub fn compile(source: &str) -> CompiledDictionary {
    let body = split_header(source);
    let rows = parse_rows(body);

    let mut syllabary: BTreeSet<String> = BTreeSet::new();
    for row in &rows {
        for token in &row.code {
            syllabary.insert(token.clone());
        }
    }
    let syllabary: Vec<String> = syllabary.into_iter().collect();

    let mut prism_builder = PrismBuilder::new();
    for (id, spelling) in syllabary.iter().enumerate() {
        prism_builder.add(
            spelling,
            id as SyllableId,
            SpellingProperties::new(SpellingType::Normal, spelling.chars().count()),
        );
    }
    let prism = prism_builder.build();

    let mut table_builder = TableBuilder::new();
    for row in &rows {
        let path: Vec<SyllableId> = row
            .code
            .iter()
            .filter_map(|token| syllabary.iter().position(|s| s == token).map(|i| i as SyllableId))
            .collect();
        if path.len() != row.code.len() {
            continue;
        }
        table_builder.add(&path, row.text.clone(), row.weight);
    }
    let table = table_builder.build();

    CompiledDictionary {
        prism,
        table,
        checksum: checksum(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_yaml_header_before_parsing_rows() {
        let source = "---\nname: test\nversion: \"1.0\"\n...\nni\tni\t-1.0\nhao\thao\t-1.0\n";
        let compiled = compile(source);
        let spellings = compiled.prism.expand_search("", 16);
        assert_eq!(spellings.len(), 2);
    }

    #[test]
    fn discovers_syllabary_from_codes_and_builds_lookups() {
        let source = "你好\tni hao\t-2.0\n你\tni\t-1.0\n好\thao\t-1.5\n";
        let compiled = compile(source);

        let ni = compiled.prism.get_value("ni").expect("ni in syllabary");
        let hao = compiled.prism.get_value("hao").expect("hao in syllabary");
        let ni_id = compiled.prism.query_spelling(ni)[0].0;
        let hao_id = compiled.prism.query_spelling(hao)[0].0;

        assert_eq!(compiled.table.lookup(&[ni_id])[0].text, "你");
        assert_eq!(compiled.table.lookup(&[hao_id])[0].text, "好");
        assert_eq!(compiled.table.lookup(&[ni_id, hao_id])[0].text, "你好");
    }

    #[test]
    fn rows_missing_a_code_column_are_skipped() {
        let source = "你好\tni hao\t-2.0\nbroken-row-with-no-tab\n";
        let compiled = compile(source);
        let ni = compiled.prism.get_value("ni").unwrap();
        let hao = compiled.prism.get_value("hao").unwrap();
        let ni_id = compiled.prism.query_spelling(ni)[0].0;
        let hao_id = compiled.prism.query_spelling(hao)[0].0;
        assert_eq!(compiled.table.lookup(&[ni_id, hao_id]).len(), 1);
    }

    #[test]
    fn checksum_changes_when_source_changes_and_is_stale_detects_it() {
        let a = "你好\tni hao\t-2.0\n";
        let b = "你好\tni hao\t-1.0\n";
        let sum = checksum(a);
        assert!(!is_stale(sum, a));
        assert!(is_stale(sum, b));
    }

    #[test]
    fn default_weight_is_used_when_column_is_omitted() {
        let source = "你\tni\n";
        let compiled = compile(source);
        let ni = compiled.prism.get_value("ni").unwrap();
        let ni_id = compiled.prism.query_spelling(ni)[0].0;
        assert_eq!(compiled.table.lookup(&[ni_id])[0].weight, DEFAULT_WEIGHT);
    }
}
