//! Location catalog - the fixed, ordered puzzle sequence
//!
//! Each entry is one stop of the hunt: the answer variants a player may
//! type to solve it and the single clue that can be revealed for it.
//! The index of an entry is its position in the hunt and never changes
//! once the catalog is built.

use serde::Serialize;

use crate::error::DomainError;

/// One stop in the puzzle sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationEntry {
    answers: Vec<String>,
    clue: String,
}

impl LocationEntry {
    /// Build an entry, normalizing answers to lower-case trimmed text.
    ///
    /// Fails when no non-blank answer is given or the clue is blank.
    pub fn new<I, S>(answers: I, clue: impl Into<String>) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let answers: Vec<String> = answers
            .into_iter()
            .map(|a| a.as_ref().trim().to_lowercase())
            .filter(|a| !a.is_empty())
            .collect();
        if answers.is_empty() {
            return Err(DomainError::validation(
                "A location needs at least one accepted answer",
            ));
        }

        let clue = clue.into();
        if clue.trim().is_empty() {
            return Err(DomainError::validation("A location clue cannot be empty"));
        }

        Ok(Self { answers, clue })
    }

    /// Accepted answer variants, in declaration order.
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn clue(&self) -> &str {
        &self.clue
    }

    /// True when any answer variant appears in the normalized message.
    pub fn is_named_in(&self, message: &str) -> bool {
        self.answers.iter().any(|a| message.contains(a.as_str()))
    }

    /// Letters-only containment test used by yes/no probes.
    ///
    /// Both sides are reduced to alphabetic characters, so "is it the
    /// golden-hinde?" still matches the `golden hinde` variant.
    pub fn is_named_in_letters(&self, message: &str) -> bool {
        let cleaned = letters_only(message);
        self.answers
            .iter()
            .map(|a| letters_only(a))
            .any(|a| !a.is_empty() && cleaned.contains(&a))
    }
}

/// Strip everything that is not a letter.
pub fn letters_only(text: &str) -> String {
    text.chars().filter(|c| c.is_alphabetic()).collect()
}

/// Immutable, strictly ordered list of locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    entries: Vec<LocationEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<LocationEntry>) -> Result<Self, DomainError> {
        if entries.is_empty() {
            return Err(DomainError::validation(
                "A catalog needs at least one location",
            ));
        }
        Ok(Self { entries })
    }

    /// Entry at `index`, or `None` once the hunt is complete (`index >= len`).
    pub fn get(&self, index: usize) -> Option<&LocationEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The London hunt shipped with the server.
    ///
    /// The table is static and every row is checked by the tests below.
    pub fn london() -> Self {
        let entries = LONDON_LOCATIONS
            .iter()
            .filter_map(|(answers, clue)| LocationEntry::new(answers.iter(), *clue).ok())
            .collect();
        Self { entries }
    }
}

// (accepted answers, clue)
const LONDON_LOCATIONS: &[(&[&str], &str)] = &[
    (
        &["wellington"],
        "A soldier rides where money sleeps, stone and power the city keeps.",
    ),
    (
        &["monument"],
        "From ash and flame the city rose, a tall reminder heavenward goes.",
    ),
    (
        &["golden hinde", "hinde"],
        "Wooden decks and cannon old, near food and crowds and stories told.",
    ),
    (
        &["hawksmoor"],
        "Where Lombard Street meets King William's way, a pupil of Wren built a church to pray. Name the architect.",
    ),
];
