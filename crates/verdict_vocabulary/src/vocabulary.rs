//! Phrase tables built from a content pack's element list.
//!
//! A [`Vocabulary`] maps lower-cased element names and aliases to canonical
//! element ids, and records the attribute, flag and state names the pack
//! defines.
//! The canonicalizer uses it to rewrite multi-word names; the validator uses
//! its known-name sets.

use std::collections::{BTreeSet, HashMap, HashSet};

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;
use verdict_foundation::{Error, Result};
use verdict_language::{SubjectKind, TokenKind};

/// What sort of game element a content entry is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A portable object.
    Item,
    /// A non-player character.
    Npc,
    /// A location.
    Scene,
    /// A connection between scenes.
    Exit,
    /// The player character.
    Player,
    /// Anything else.
    #[default]
    Other,
}

/// One element of a content pack, as seen by the vocabulary.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentElement {
    /// Canonical id used in conditions.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Element kind.
    #[serde(default)]
    pub kind: ElementKind,
    /// Additional names the element goes by.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Attribute keys the element defines.
    #[serde(default)]
    pub attributes: Vec<String>,
    /// Flag keys the element defines.
    #[serde(default)]
    pub flags: Vec<String>,
    /// State names the element can be in.
    #[serde(default)]
    pub states: Vec<String>,
}

impl ContentElement {
    /// Creates an element with no aliases, attributes, flags or states.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            ..Self::default()
        }
    }

    /// Adds an alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Adds an attribute key.
    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    /// Adds a flag key.
    #[must_use]
    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.push(flag.into());
        self
    }

    /// Adds a state name.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.states.push(state.into());
        self
    }
}

/// Phrase tables for canonicalization and validation.
///
/// Built once per content pack; rebuild it whenever the element list changes.
#[derive(Clone, Debug, Default)]
pub struct Vocabulary {
    /// The elements this vocabulary was built from.
    elements: Vec<ContentElement>,
    /// Phrase (lower-case, single-spaced) to ids in registration order.
    phrases: HashMap<String, Vec<String>>,
    /// Lower-cased canonical ids.
    ids: HashSet<String>,
    attributes: BTreeSet<String>,
    flags: BTreeSet<String>,
    states: BTreeSet<String>,
    /// Alternation of every phrase, longest first. `None` when there are no phrases.
    matcher: Option<Regex>,
}

impl Vocabulary {
    /// Builds a vocabulary from a content pack's elements.
    ///
    /// Names and aliases are lower-cased and whitespace-normalized. A phrase
    /// that several elements share maps to all of them in order; the same
    /// id is never registered twice for one phrase. Phrases that spell a DSL
    /// keyword or subject keyword are not registered.
    ///
    /// # Errors
    /// Returns an internal error if the phrase matcher cannot be compiled
    /// (for example, if the pack is too large for the regex size limit).
    pub fn new(elements: impl IntoIterator<Item = ContentElement>) -> Result<Self> {
        let elements: Vec<ContentElement> = elements.into_iter().collect();
        let mut phrases: HashMap<String, Vec<String>> = HashMap::new();
        let mut ids = HashSet::new();
        let mut attributes = BTreeSet::new();
        let mut flags = BTreeSet::new();
        let mut states = BTreeSet::new();

        for element in &elements {
            ids.insert(element.id.to_lowercase());
            for phrase in std::iter::once(&element.name).chain(&element.aliases) {
                let phrase = normalize_phrase(phrase);
                if phrase.is_empty() || is_reserved(&phrase) {
                    continue;
                }
                let entry = phrases.entry(phrase).or_default();
                if !entry.contains(&element.id) {
                    entry.push(element.id.clone());
                }
            }
            attributes.extend(element.attributes.iter().cloned());
            flags.extend(element.flags.iter().cloned());
            states.extend(element.states.iter().cloned());
        }

        let matcher = build_matcher(phrases.keys())?;
        debug!(
            elements = elements.len(),
            phrases = phrases.len(),
            attributes = attributes.len(),
            flags = flags.len(),
            states = states.len(),
            "built vocabulary"
        );

        Ok(Self {
            elements,
            phrases,
            ids,
            attributes,
            flags,
            states,
            matcher,
        })
    }

    /// Returns the elements this vocabulary was built from.
    #[must_use]
    pub fn elements(&self) -> &[ContentElement] {
        &self.elements
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if built from no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// All ids registered for a phrase, in registration order.
    #[must_use]
    pub fn resolve(&self, phrase: &str) -> &[String] {
        self.phrases
            .get(&normalize_phrase(phrase))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The first id registered for a phrase.
    #[must_use]
    pub fn first_id(&self, phrase: &str) -> Option<&str> {
        self.resolve(phrase).first().map(String::as_str)
    }

    /// Returns true if `id` is some element's canonical id, ignoring case.
    #[must_use]
    pub fn is_known_id(&self, id: &str) -> bool {
        self.ids.contains(&id.to_lowercase())
    }

    /// Canonical ids of every element.
    pub fn known_elements(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().map(|e| e.id.as_str())
    }

    /// Canonical ids of scene elements.
    pub fn known_scenes(&self) -> impl Iterator<Item = &str> {
        self.elements
            .iter()
            .filter(|e| e.kind == ElementKind::Scene)
            .map(|e| e.id.as_str())
    }

    /// Every attribute key defined by any element.
    pub fn known_attributes(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(String::as_str)
    }

    /// Every flag key defined by any element.
    pub fn known_flags(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(String::as_str)
    }

    /// Every state name any element can be in.
    pub fn known_states(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(String::as_str)
    }

    /// The phrase matcher, if any phrases are registered.
    pub(crate) fn matcher(&self) -> Option<&Regex> {
        self.matcher.as_ref()
    }
}

/// Lower-cases a phrase, drops the determiners `the`/`an`, and collapses whitespace.
///
/// Determiners go because canonicalization removes them from condition text
/// before phrases are matched.
fn normalize_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|word| word != "the" && word != "an")
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns true if a phrase would clobber grammar if rewritten.
fn is_reserved(phrase: &str) -> bool {
    phrase == "of"
        || TokenKind::keyword(phrase).is_some()
        || SubjectKind::from_word(phrase).is_some()
}

/// Compiles one case-insensitive alternation of all phrases, longest first.
///
/// Word boundaries are only required on sides where the phrase begins or ends
/// with a word character, so names like `"Dr. Who"` still match.
fn build_matcher<'a>(phrases: impl Iterator<Item = &'a String>) -> Result<Option<Regex>> {
    let mut sorted: Vec<&String> = phrases.collect();
    if sorted.is_empty() {
        return Ok(None);
    }
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let alternatives: Vec<String> = sorted
        .into_iter()
        .map(|phrase| {
            let body = phrase
                .split(' ')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+");
            let lead = if phrase.starts_with(is_word_char) { r"\b" } else { "" };
            let tail = if phrase.ends_with(is_word_char) { r"\b" } else { "" };
            format!("{lead}{body}{tail}")
        })
        .collect();

    RegexBuilder::new(&format!("(?:{})", alternatives.join("|")))
        .case_insensitive(true)
        .size_limit(64 * (1 << 20))
        .build()
        .map(Some)
        .map_err(|e| Error::internal(format!("cannot compile vocabulary matcher: {e}")))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
