/*!
 * Pattern library for structural markers.
 *
 * A line of OCR text is tested against a table of regular-expression rules,
 * each tagged with the marker family it recognizes. Families have a fixed
 * total order (Question > Answer > Subdivision > None) and the first match in
 * that order wins; there is no scoring.
 *
 * Rules may capture a `label` group (the marker's number or letter) and a
 * `body` group (the text kept after the marker). Without a `body` group the
 * remainder is everything after the match.
 */

use std::fmt;
use std::sync::Arc;

use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::errors::PatternError;

/// Characters kept by [`clean_line`]
static NOISE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\w\s?.,:;()\-]").expect("Invalid noise regex")
});

static BUILTIN_LIBRARY: Lazy<Arc<PatternLibrary>> = Lazy::new(|| {
    Arc::new(PatternLibrary::new(&PatternTable::builtin()).expect("Built-in pattern table must compile"))
});

/// Marker family, declared in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Question,
    Answer,
    Subdivision,
    None,
}

impl MarkerKind {
    /// 1 is the highest priority, 4 the fallback
    pub fn priority(&self) -> u8 {
        match self {
            Self::Question => 1,
            Self::Answer => 2,
            Self::Subdivision => 3,
            Self::None => 4,
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Question => "question",
            Self::Answer => "answer",
            Self::Subdivision => "subdivision",
            Self::None => "none",
        };
        write!(f, "{}", name)
    }
}

/// Result of testing one line against the library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerMatch {
    /// Recognized family
    pub kind: MarkerKind,

    /// Extracted label such as `"2"` or `"b"`
    pub label: Option<String>,

    /// Text left once the marker is stripped
    pub remainder: String,
}

impl MarkerMatch {
    /// Unmarked prose; the remainder is the whole trimmed line
    pub fn none(text: &str) -> Self {
        MarkerMatch {
            kind: MarkerKind::None,
            label: None,
            remainder: text.trim().to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.kind == MarkerKind::None && self.remainder.is_empty()
    }

    pub fn is_marker(&self) -> bool {
        self.kind != MarkerKind::None
    }
}

/// One configurable recognition rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRule {
    /// Family the rule reports
    pub kind: MarkerKind,

    /// Regular expression, anchored by the author
    pub pattern: String,

    /// Apply OCR digit substitutions (`l` -> `1`, `O` -> `0`) to the label
    #[serde(default)]
    pub numeric_label: bool,
}

impl PatternRule {
    pub fn new(kind: MarkerKind, pattern: impl Into<String>) -> Self {
        PatternRule {
            kind,
            pattern: pattern.into(),
            numeric_label: false,
        }
    }

    pub fn with_numeric_label(mut self) -> Self {
        self.numeric_label = true;
        self
    }
}

/// Ordered rule table; order matters only within a family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternTable {
    #[serde(default)]
    pub rules: Vec<PatternRule>,
}

impl PatternTable {
    pub fn new(rules: Vec<PatternRule>) -> Self {
        PatternTable { rules }
    }

    /// Rules covering the usual handwritten exam conventions
    pub fn builtin() -> Self {
        use MarkerKind::*;

        PatternTable::new(vec![
            // Q1.  Q.)  Question 2:  QUESTION 3:  Qn 3)  ques. 4
            PatternRule::new(
                Question,
                r"^\s*(?:(?i:question|ques|qn)|Q)\s*(?P<label>[0-9lIO|]{1,3})?\s*[.:)\-]+\s*",
            )
            .with_numeric_label(),
            // q1.  q 2)  lowercase q only with a digit label
            PatternRule::new(Question, r"^\s*q\s*(?P<label>[0-9][0-9lIO|]{0,2})\s*[.:)\-]+\s*")
                .with_numeric_label(),
            // Q1 What is...  Question 2 Explain...
            PatternRule::new(
                Question,
                r"^\s*(?:(?i:question|ques|qn)\s*|[Qq])(?P<label>[0-9lIO|]*[0-9][0-9lIO|]*)(?:\s+|$)",
            )
            .with_numeric_label(),
            // 1. What is...  only when real text follows
            PatternRule::new(Question, r"^\s*(?P<label>\d{1,3})\s*[.)]\s+(?P<body>\S.{2,})$"),
            // A1.  A)  Ans:  ANS 1)  Answer 2.
            PatternRule::new(
                Answer,
                r"^\s*(?:(?i:answer|ans)|A)\s*(?P<label>[0-9lIO|]{1,3})?\s*[.:)\-]+\s*",
            )
            .with_numeric_label(),
            // A1 The force...  Ans 2 ...
            PatternRule::new(
                Answer,
                r"^\s*(?:(?i:answer|ans)\s*|A)(?P<label>[0-9lIO|]*[0-9][0-9lIO|]*)(?:\s+|$)",
            )
            .with_numeric_label(),
            // (a)  (iv)
            PatternRule::new(Subdivision, r"^\s*\(\s*(?P<label>[ivx]{2,4}|[a-zA-Z])\s*\)\s*"),
            // a)  a.  ii)  b:
            PatternRule::new(
                Subdivision,
                r"^\s*(?P<label>[ivx]{2,4}|[a-zA-Z])\s*(?:\)|[.:](?:\s+|$))\s*",
            ),
        ])
    }

    pub fn with_rule(mut self, rule: PatternRule) -> Self {
        self.rules.push(rule);
        self
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Debug)]
struct CompiledRule {
    kind: MarkerKind,
    regex: Regex,
    numeric_label: bool,
}

impl CompiledRule {
    fn apply(&self, text: &str) -> Option<MarkerMatch> {
        let caps = self.regex.captures(text)?;
        let whole = caps.get(0)?;

        let remainder = match caps.name("body") {
            Some(body) => body.as_str(),
            None => &text[whole.end()..],
        };

        Some(MarkerMatch {
            kind: self.kind,
            label: self.label(&caps),
            remainder: remainder.trim().to_string(),
        })
    }

    fn label(&self, caps: &Captures) -> Option<String> {
        let raw = caps.name("label")?.as_str().trim();
        if raw.is_empty() {
            return None;
        }

        let label = if self.numeric_label {
            substitute_ocr_digits(raw)
        } else if self.kind == MarkerKind::Subdivision {
            raw.to_lowercase()
        } else {
            raw.to_string()
        };
        Some(label)
    }
}

/// Compiled, immutable pattern library
#[derive(Debug)]
pub struct PatternLibrary {
    rules: Vec<CompiledRule>,
}

impl PatternLibrary {
    /// Compile a table. Fails before any line is seen if a rule is unusable.
    pub fn new(table: &PatternTable) -> Result<Self, PatternError> {
        if table.rules.is_empty() {
            return Err(PatternError::EmptyTable);
        }

        let mut rules = Vec::with_capacity(table.rules.len());
        for rule in &table.rules {
            if rule.kind == MarkerKind::None {
                return Err(PatternError::UnsupportedKind {
                    kind: rule.kind,
                    pattern: rule.pattern.clone(),
                });
            }

            let regex = Regex::new(&rule.pattern).map_err(|source| PatternError::InvalidRegex {
                kind: rule.kind,
                pattern: rule.pattern.clone(),
                source,
            })?;

            if regex.is_match("") || regex.is_match("   ") {
                return Err(PatternError::MatchesBlankLine {
                    kind: rule.kind,
                    pattern: rule.pattern.clone(),
                });
            }

            rules.push(CompiledRule {
                kind: rule.kind,
                regex,
                numeric_label: rule.numeric_label,
            });
        }

        // Stable: table order survives inside each family
        rules.sort_by_key(|rule| rule.kind);

        debug!("Compiled {} marker patterns", rules.len());
        Ok(PatternLibrary { rules })
    }

    /// Shared library compiled from [`PatternTable::builtin`]
    pub fn builtin() -> Arc<PatternLibrary> {
        Arc::clone(&BUILTIN_LIBRARY)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Classify one line. Deterministic and free of side effects.
    pub fn classify_line(&self, text: &str) -> MarkerMatch {
        if text.trim().is_empty() {
            return MarkerMatch::none(text);
        }

        self.rules
            .iter()
            .find_map(|rule| rule.apply(text))
            .unwrap_or_else(|| MarkerMatch::none(text))
    }

    /// First match of every family that recognizes the line, highest priority first
    pub fn candidates(&self, text: &str) -> Vec<MarkerMatch> {
        let mut found: Vec<MarkerMatch> = Vec::new();
        if text.trim().is_empty() {
            return found;
        }

        for rule in &self.rules {
            if found.last().is_some_and(|m| m.kind == rule.kind) {
                continue;
            }
            if let Some(m) = rule.apply(text) {
                found.push(m);
            }
        }
        found
    }
}

/// Replace characters OCR commonly confuses with digits
pub fn substitute_ocr_digits(label: &str) -> String {
    label
        .chars()
        .map(|c| match c {
            'l' | 'I' | '|' => '1',
            'O' | 'o' => '0',
            other => other,
        })
        .collect()
}

/// Strip characters other than word characters, whitespace and `? . , : ; ( ) -`
pub fn clean_line(text: &str) -> String {
    NOISE_REGEX.replace_all(text, "").trim().to_string()
}
