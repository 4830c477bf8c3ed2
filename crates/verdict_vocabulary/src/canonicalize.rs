//! Rewriting free-text conditions into strict-grammar text.
//!
//! Passes run in a fixed order, each over the previous pass's output, and
//! only over text outside double-quoted literals:
//!
//! 1. Trim.
//! 2. `current scene` becomes `currentScene`; `X's` becomes `X.`;
//!    `[attribute] ATTR of [the] S` becomes `S.[attribute ]ATTR` for subject
//!    keywords `S`.
//! 3. Standalone `the` and `an` are dropped and whitespace runs collapsed.
//! 4. Multi-word operator phrases (`is less than`, `distance from`, ...)
//!    become their underscore keywords, longest phrase first.
//! 5. Vocabulary phrases become the first canonical id registered for them,
//!    longest phrase first.
//!
//! Canonical text is a fixed point: canonicalizing it again changes nothing.

use regex::{Captures, Regex, RegexBuilder};
use tracing::trace;
use verdict_foundation::{Error, Result};

use crate::segment::rewrite_plain;
use crate::vocabulary::Vocabulary;

/// Multi-word operator phrases, longest first. Each becomes its words joined by `_`.
const OPERATOR_PHRASES: [&str; 8] = [
    "is not equal to",
    "is greater than",
    "is less than",
    "is equal to",
    "distance from",
    "is not",
    "is empty",
    "is in",
];

/// Subject keywords that can follow `of`.
const OF_SUBJECTS: &str = "player|target2|target|currentScene|location|session|log";

/// Compiled rewrite passes.
#[derive(Clone, Debug)]
pub struct Canonicalizer {
    current_scene: Regex,
    possessive: Regex,
    of_subject: Regex,
    determiner: Regex,
    whitespace: Regex,
    operator: Regex,
}

impl Canonicalizer {
    /// Compiles the rewrite passes.
    ///
    /// # Errors
    /// Returns an internal error if a pattern fails to compile.
    pub fn new() -> Result<Self> {
        let operators = OPERATOR_PHRASES
            .iter()
            .map(|phrase| phrase.replace(' ', r"\s+"))
            .collect::<Vec<_>>()
            .join("|");

        Ok(Self {
            current_scene: pattern(r"\bcurrent[\s_]+scene\b")?,
            possessive: pattern(r"\b(\w+)['’]s\b\s*")?,
            of_subject: pattern(&format!(
                r"\b(attribute\s+)?(\w+)\s+of\s+(?:the\s+)?({OF_SUBJECTS})\b"
            ))?,
            determiner: pattern(r"\b(?:the|an)\b\s*")?,
            whitespace: pattern(r"\s+")?,
            operator: pattern(&format!(r"\b(?:{operators})\b"))?,
        })
    }

    /// Rewrites `text` into canonical grammar using `vocabulary`.
    ///
    /// Empty and whitespace-only input is returned unchanged.
    #[must_use]
    pub fn canonicalize(&self, text: &str, vocabulary: &Vocabulary) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        let output = rewrite_plain(text.trim(), |segment| {
            let s = self.rewrite_subjects(segment);
            let s = self.remove_determiners(&s);
            let s = self.replace_operators(&s);
            replace_phrases(&s, vocabulary)
        });
        let output = output.trim().to_string();

        trace!(input = text, output = %output, "canonicalized condition");
        output
    }

    /// Pass 2: `current scene`, possessives, and `ATTR of S`.
    fn rewrite_subjects(&self, text: &str) -> String {
        let s = self.current_scene.replace_all(text, "currentScene");
        let s = self.possessive.replace_all(&s, "${1}.");
        self.of_subject
            .replace_all(&s, |caps: &Captures<'_>| {
                let attribute = caps.get(1).map_or("", |_| "attribute ");
                let subject = canonical_subject(&caps[3]);
                format!("{subject}.{attribute}{}", &caps[2])
            })
            .into_owned()
    }

    /// Pass 3: drop `the`/`an` and collapse whitespace runs.
    ///
    /// Segments are not trimmed here, so text on either side of a quoted
    /// literal stays separated from it.
    fn remove_determiners(&self, text: &str) -> String {
        let s = self.determiner.replace_all(text, "");
        self.whitespace.replace_all(&s, " ").into_owned()
    }

    /// Pass 4: multi-word operators.
    fn replace_operators(&self, text: &str) -> String {
        self.operator
            .replace_all(text, |caps: &Captures<'_>| {
                caps[0]
                    .split_whitespace()
                    .map(str::to_lowercase)
                    .collect::<Vec<_>>()
                    .join("_")
            })
            .into_owned()
    }
}

/// Pass 5: vocabulary phrases.
///
/// A match that already spells a canonical id is left alone, which keeps the
/// pass idempotent when one element's id is another element's alias.
fn replace_phrases(text: &str, vocabulary: &Vocabulary) -> String {
    let Some(matcher) = vocabulary.matcher() else {
        return text.to_string();
    };
    matcher
        .replace_all(text, |caps: &Captures<'_>| {
            let found = &caps[0];
            if vocabulary.is_known_id(found) {
                return found.to_string();
            }
            vocabulary.first_id(found).unwrap_or(found).to_string()
        })
        .into_owned()
}

/// Spells a matched subject keyword the way the parser expects.
fn canonical_subject(word: &str) -> &str {
    if word.eq_ignore_ascii_case("currentscene") {
        "currentScene"
    } else {
        word
    }
}

fn pattern(source: &str) -> Result<Regex> {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::internal(format!("invalid canonicalizer pattern {source:?}: {e}")))
}
