//! Placeholder token matching and the per-document value cursor.

use regex::{Captures, Regex};

use crate::error::DocxError;

/// How a run of filler characters is split into tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderRule {
    /// A run of `min_len` or more fillers is a single token.
    #[default]
    Greedy,
    /// Every `min_len` consecutive fillers form a token, scanned left to
    /// right; `________` with `min_len = 4` is two tokens.
    Exact,
}

#[derive(Debug, Clone)]
pub struct PlaceholderPattern {
    regex: Regex,
    filler: char,
    min_len: usize,
    rule: PlaceholderRule,
}

impl PlaceholderPattern {
    pub const DEFAULT_FILLER: char = '_';
    pub const DEFAULT_MIN_LEN: usize = 4;

    pub fn new(filler: char, min_len: usize, rule: PlaceholderRule) -> Result<Self, DocxError> {
        if min_len == 0 {
            return Err(DocxError::InvalidPattern(
                "placeholder length must be at least 1".to_string(),
            ));
        }
        let unit = regex::escape(filler.encode_utf8(&mut [0u8; 4]));
        let source = match rule {
            PlaceholderRule::Greedy => format!("(?:{unit}){{{min_len},}}"),
            PlaceholderRule::Exact => format!("(?:{unit}){{{min_len}}}"),
        };
        let regex = Regex::new(&source).map_err(|e| DocxError::InvalidPattern(e.to_string()))?;
        Ok(Self {
            regex,
            filler,
            min_len,
            rule,
        })
    }

    pub fn filler(&self) -> char {
        self.filler
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }

    pub fn rule(&self) -> PlaceholderRule {
        self.rule
    }

    /// Number of tokens in `text`.
    pub fn count(&self, text: &str) -> usize {
        self.regex.find_iter(text).count()
    }

    /// Replace the tokens of `text` left to right with values drawn from
    /// `cursor`. Once the cursor runs dry, tokens keep their literal text.
    ///
    /// Returns `None` when `text` holds no token.
    pub fn substitute(&self, text: &str, cursor: &mut ValueCursor<'_>) -> Option<Substitution> {
        if !self.regex.is_match(text) {
            return None;
        }
        let mut tokens = 0;
        let mut substituted = 0;
        let replaced = self.regex.replace_all(text, |caps: &Captures<'_>| {
            tokens += 1;
            match cursor.next() {
                Some(value) => {
                    substituted += 1;
                    value.to_string()
                }
                None => caps[0].to_string(),
            }
        });
        Some(Substitution {
            text: replaced.into_owned(),
            tokens,
            substituted,
        })
    }
}

impl Default for PlaceholderPattern {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FILLER, Self::DEFAULT_MIN_LEN, PlaceholderRule::Greedy)
            .expect("default placeholder pattern is valid")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub text: String,
    pub tokens: usize,
    pub substituted: usize,
}

/// Record values in field order, consumed once per matched token.
///
/// One cursor spans a whole document and is never rewound.
#[derive(Debug, Clone)]
pub struct ValueCursor<'a> {
    values: std::slice::Iter<'a, String>,
    consumed: usize,
}

impl<'a> ValueCursor<'a> {
    pub fn new(values: &'a [String]) -> Self {
        Self {
            values: values.iter(),
            consumed: 0,
        }
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl<'a> Iterator for ValueCursor<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let value = self.values.next()?;
        self.consumed += 1;
        Some(value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn greedy_treats_long_runs_as_one_token() {
        let p = PlaceholderPattern::default();
        assert_eq!(p.count("a ____ b ________ c ___"), 2);
    }

    #[test]
    fn exact_splits_long_runs() {
        let p = PlaceholderPattern::new('_', 4, PlaceholderRule::Exact).unwrap();
        assert_eq!(p.count("________"), 2);
        assert_eq!(p.count("______"), 1);
        assert_eq!(p.count("___"), 0);
    }

    #[test]
    fn substitution_is_left_to_right() {
        let p = PlaceholderPattern::default();
        let vals = values(&["Acme", "500"]);
        let mut cursor = ValueCursor::new(&vals);
        let out = p.substitute("Dear ____, you owe ______.", &mut cursor).unwrap();
        assert_eq!(out.text, "Dear Acme, you owe 500.");
        assert_eq!((out.tokens, out.substituted), (2, 2));
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn exhausted_cursor_leaves_literal_tokens() {
        let p = PlaceholderPattern::default();
        let vals = values(&["Acme"]);
        let mut cursor = ValueCursor::new(&vals);
        let out = p.substitute("____ and ______", &mut cursor).unwrap();
        assert_eq!(out.text, "Acme and ______");
        assert_eq!((out.tokens, out.substituted), (2, 1));
    }

    #[test]
    fn text_without_tokens_is_untouched() {
        let p = PlaceholderPattern::default();
        let vals = values(&["Acme"]);
        let mut cursor = ValueCursor::new(&vals);
        assert!(p.substitute("no blanks ___ here", &mut cursor).is_none());
        assert_eq!(cursor.consumed(), 0);
    }

    #[test]
    fn values_containing_fillers_are_not_rescanned() {
        let p = PlaceholderPattern::default();
        let vals = values(&["____", "B"]);
        let mut cursor = ValueCursor::new(&vals);
        let out = p.substitute("____ ____", &mut cursor).unwrap();
        assert_eq!(out.text, "____ B");
    }

    #[test]
    fn custom_filler_is_escaped() {
        let p = PlaceholderPattern::new('.', 3, PlaceholderRule::Greedy).unwrap();
        assert_eq!(p.count("a.b ... ....."), 2);
    }

    #[test]
    fn zero_length_is_rejected() {
        assert!(matches!(
            PlaceholderPattern::new('_', 0, PlaceholderRule::Greedy),
            Err(DocxError::InvalidPattern(_))
        ));
    }
}
