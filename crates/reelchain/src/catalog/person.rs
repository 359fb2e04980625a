//! Person identity and name interning.
//!
//! The game deliberately treats two credits with the same name as the same
//! real-world person: "Christopher Nolan" the director of one movie and
//! "Christopher Nolan" the producer of another collapse into one entity.
//! Interning makes that collapse explicit - every name maps to exactly one
//! [`PersonId`], and connection validation compares ids, never raw strings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Canonical identity of a person, interned by exact name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonId(pub u32);

/// A person credited on a movie, as an actor or crew member.
///
/// Equality and hashing use [`PersonId`] alone; the role string is context
/// for display ("Cobb", "Director") and never participates in identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Interned identity, shared by every credit with this name.
    pub id: PersonId,
    /// The person's name as it appeared in the credit.
    pub name: String,
    /// Role in this movie: a character name for cast, a job for crew.
    pub role: String,
}

impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Person {}

impl std::hash::Hash for Person {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A raw credit as supplied by the loader, before interning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditEntry {
    /// The credited person's name.
    pub name: String,
    /// Their role: character name for cast, job title for crew.
    pub role: String,
}

impl CreditEntry {
    /// Creates a credit entry.
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
        }
    }
}

/// Interner assigning one [`PersonId`] per distinct name.
#[derive(Debug, Clone, Default)]
pub struct PersonInterner {
    ids: HashMap<String, PersonId>,
    names: Vec<String>,
}

impl PersonInterner {
    /// Creates an empty interner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for `name`, allocating one on first sight.
    pub fn intern(&mut self, name: &str) -> PersonId {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }
        let id = PersonId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    /// Looks up the id for `name` without allocating.
    pub fn get(&self, name: &str) -> Option<PersonId> {
        self.ids.get(name).copied()
    }

    /// Returns the name behind an id.
    pub fn name(&self, id: PersonId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    /// Number of distinct names seen.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no names have been interned yet.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Interns a loader credit into a full [`Person`].
    pub fn person(&mut self, credit: CreditEntry) -> Person {
        let id = self.intern(&credit.name);
        Person {
            id,
            name: credit.name,
            role: credit.role,
        }
    }
}
