//! Movie records: loader-facing input and the indexed catalog entry.

use super::person::{CreditEntry, Person};
use serde::{Deserialize, Serialize};

/// A movie as supplied by an external loader, before interning.
///
/// Cast and crew may be empty at first: the original corpus delivers movie
/// metadata and credits in separate passes, merged by title via
/// [`Catalog::merge_credits`](super::Catalog::merge_credits).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// Title, the unique key within a catalog.
    pub title: String,
    /// Release year.
    pub year: i32,
    /// Genre names in source order.
    pub genres: Vec<String>,
    /// Cast credits in billing order.
    pub cast: Vec<CreditEntry>,
    /// Crew credits in source order.
    pub crew: Vec<CreditEntry>,
}

impl MovieRecord {
    /// Creates a record with no genres or credits.
    pub fn new(title: impl Into<String>, year: i32) -> Self {
        Self {
            title: title.into(),
            year,
            genres: Vec::new(),
            cast: Vec::new(),
            crew: Vec::new(),
        }
    }

    /// Sets the genre list.
    pub fn with_genres(mut self, genres: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the cast list.
    pub fn with_cast(mut self, cast: impl IntoIterator<Item = CreditEntry>) -> Self {
        self.cast = cast.into_iter().collect();
        self
    }

    /// Sets the crew list.
    pub fn with_crew(mut self, crew: impl IntoIterator<Item = CreditEntry>) -> Self {
        self.crew = crew.into_iter().collect();
        self
    }
}

/// An indexed movie with interned credits.
///
/// Created by the catalog during ingestion and immutable once loading
/// completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    /// Title, the unique key within a catalog.
    pub title: String,
    /// Release year.
    pub year: i32,
    /// Distinct genre names, insertion order preserved.
    pub genres: Vec<String>,
    /// Cast in billing order.
    pub cast: Vec<Person>,
    /// Crew in source order.
    pub crew: Vec<Person>,
}

impl Movie {
    /// Whether the movie is playable: both cast and crew are non-empty.
    ///
    /// Invalid movies stay in the title index but are hidden from lookup,
    /// autocomplete, and iteration.
    pub fn is_valid(&self) -> bool {
        !self.cast.is_empty() && !self.crew.is_empty()
    }

    /// Whether any cast credit carries this interned identity.
    pub fn has_cast_member(&self, person: &Person) -> bool {
        self.cast.iter().any(|p| p.id == person.id)
    }

    /// Whether any crew credit carries this interned identity.
    pub fn has_crew_member(&self, person: &Person) -> bool {
        self.crew.iter().any(|p| p.id == person.id)
    }
}
