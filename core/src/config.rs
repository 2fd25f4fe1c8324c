//! Runtime configuration for syllabification, dictionary lookup and the
//! translator, plus the knobs a schema normally carries (delimiters,
//! completion, formatters).

use serde::{Deserialize, Serialize};

/// A compiled preedit/comment text transform: replace occurrences of
/// `pattern` with `replacement`. Schemas express these as regex pairs;
/// we keep the pattern as a string here and compile it lazily where used
/// (`regex::Regex` construction can fail, so eager compilation at
/// deserialize time would make config loading fallible in a way that's
/// awkward to report through `RimeError`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TextFormatRule {
    pub pattern: String,
    pub replacement: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RimeConfig {
    /// Characters that separate syllables in raw input (e.g. `'` for pinyin).
    pub delimiters: String,

    /// Fuzzy equivalence rules (e.g. "zh=z", "an=ang"). Populated by the
    /// language-specific crate (libpinyin/libzhuyin); the core only
    /// interprets the `"from=to[:penalty]"` grammar.
    pub fuzzy: Vec<String>,

    /// Whether the syllable graph builder should inject completion edges
    /// for syllables that are valid prefixes of a longer one.
    pub enable_completion: bool,
    /// Reject spellings not found in the syllabary outright instead of
    /// treating them as invalid-but-present vertices.
    pub strict_spelling: bool,
    /// Minimum number of candidates needed before accepting a fuzzy or
    /// corrected spelling's contribution to a candidate (spelling hints
    /// surfaced in the preedit, §6 of the syllable graph contract).
    pub spelling_hints: usize,

    /// Drop candidates whose text contains characters outside the
    /// configured charset (CJK-only mode, say) before they're returned.
    pub enable_charset_filter: bool,
    /// Enable multi-syllable sentence composition via the Viterbi maker.
    pub enable_sentence: bool,
    /// When a completion and a full sentence both cover the same range,
    /// prefer the sentence.
    pub sentence_over_completion: bool,
    /// Per-character quality credit added to every looked-up candidate
    /// before translator-level adjustments (tie-break baseline).
    pub initial_quality: f64,

    pub preedit_formatter: Vec<TextFormatRule>,
    pub comment_formatter: Vec<TextFormatRule>,
}

impl Default for RimeConfig {
    fn default() -> Self {
        Self {
            delimiters: " '".to_string(),
            fuzzy: vec![],
            enable_completion: true,
            strict_spelling: false,
            spelling_hints: 1,
            enable_charset_filter: false,
            enable_sentence: true,
            sentence_over_completion: true,
            initial_quality: 0.0,
            preedit_formatter: vec![],
            comment_formatter: vec![],
        }
    }
}

impl RimeConfig {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_toml() {
        let mut cfg = RimeConfig::default();
        cfg.initial_quality = 1.5;
        let text = cfg.to_toml_string().unwrap();
        let back = RimeConfig::from_toml_str(&text).unwrap();
        assert_eq!(back.initial_quality, cfg.initial_quality);
        assert_eq!(back.delimiters, cfg.delimiters);
    }

    #[test]
    fn defaults_enable_completion_and_sentence() {
        let cfg = RimeConfig::default();
        assert!(cfg.enable_completion);
        assert!(cfg.enable_sentence);
        assert!(cfg.sentence_over_completion);
    }
}
