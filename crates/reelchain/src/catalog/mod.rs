//! Movie catalog: the read-mostly entity store behind a game session.
//!
//! The catalog owns every movie record and three indices:
//!
//! - title -> movie, for exact lookups (last write wins)
//! - genre -> titles, insertion order preserved per bucket
//! - person name -> titles, for cast members and directing crew
//!
//! plus a [`TitleTrie`] feeding autocomplete. It is populated by an external
//! loader (two passes: metadata, then credits merged by title) and queried
//! read-only during play, so one loaded catalog can safely back any number
//! of concurrent sessions behind an `Arc`.

mod movie;
mod person;
mod trie;

pub use movie::{Movie, MovieRecord};
pub use person::{CreditEntry, Person, PersonId};
pub use trie::TitleTrie;

use person::PersonInterner;
use rand::seq::IndexedRandom;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, instrument, warn};

/// Entity store with title, genre, and person indices.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    interner: PersonInterner,
    movies: HashMap<String, Movie>,
    genre_index: HashMap<String, Vec<String>>,
    person_index: HashMap<String, BTreeSet<String>>,
    trie: TitleTrie,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a movie, overwriting any existing entry with the same title.
    ///
    /// The movie joins the genre bucket of each of its genres and, if it is
    /// valid (non-empty cast and crew) at this point, the autocomplete trie.
    /// Credits are interned and added to the person index. An overwritten
    /// record is unindexed first, so no bucket or suggestion resolves to a
    /// record that no longer carries it.
    #[instrument(skip(self, record), fields(title = %record.title))]
    pub fn add_movie(&mut self, record: MovieRecord) {
        if let Some(old) = self.movies.remove(&record.title) {
            debug!("overwriting existing record");
            self.unindex(&old);
        }
        let cast: Vec<Person> = record
            .cast
            .into_iter()
            .map(|c| self.interner.person(c))
            .collect();
        let crew: Vec<Person> = record
            .crew
            .into_iter()
            .map(|c| self.interner.person(c))
            .collect();

        // Genres are an ordered set per movie.
        let mut genres: Vec<String> = Vec::new();
        for genre in record.genres {
            if !genres.contains(&genre) {
                genres.push(genre);
            }
        }

        let movie = Movie {
            title: record.title,
            year: record.year,
            genres,
            cast,
            crew,
        };

        for genre in &movie.genres {
            self.genre_index
                .entry(genre.clone())
                .or_default()
                .push(movie.title.clone());
        }
        index_people(&mut self.person_index, &movie);
        if movie.is_valid() {
            self.trie.insert(&movie.title);
        }
        debug!(
            cast = movie.cast.len(),
            crew = movie.crew.len(),
            valid = movie.is_valid(),
            "indexed movie"
        );
        self.movies.insert(movie.title.clone(), movie);
    }

    /// Merges a second-pass credit delivery into an existing movie.
    ///
    /// Appends the credits, updates the person index, and inserts the title
    /// into the trie once the movie becomes valid. An unknown title is
    /// skipped with a warning and reported as `false`; the load as a whole
    /// never aborts on one bad record.
    #[instrument(skip(self, cast, crew))]
    pub fn merge_credits(
        &mut self,
        title: &str,
        cast: Vec<CreditEntry>,
        crew: Vec<CreditEntry>,
    ) -> bool {
        let Some(movie) = self.movies.get_mut(title) else {
            warn!(title, "skipping credits for unknown movie");
            return false;
        };
        let cast: Vec<Person> = cast.into_iter().map(|c| self.interner.person(c)).collect();
        let crew: Vec<Person> = crew.into_iter().map(|c| self.interner.person(c)).collect();
        movie.cast.extend(cast);
        movie.crew.extend(crew);

        index_people(&mut self.person_index, movie);
        if movie.is_valid() {
            self.trie.insert(&movie.title);
        }
        true
    }

    /// Exact, case-sensitive title lookup.
    ///
    /// Returns `None` both for unknown titles and for known titles whose
    /// record is unplayable (empty cast or crew); callers cannot tell the
    /// two apart.
    pub fn find_movie(&self, title: &str) -> Option<&Movie> {
        self.movies.get(title).filter(|m| m.is_valid())
    }

    /// All movies carrying the genre, exact case-sensitive match.
    ///
    /// An unknown genre yields an empty list, never an error.
    pub fn movies_by_genre(&self, genre: &str) -> Vec<&Movie> {
        self.genre_index
            .get(genre)
            .map(|titles| titles.iter().filter_map(|t| self.movies.get(t)).collect())
            .unwrap_or_default()
    }

    /// All movies a person is indexed under: cast appearances plus crew
    /// credits whose role is "director" (case-insensitive).
    ///
    /// Built during ingestion, not recomputed. Results are ordered by title.
    pub fn movies_by_person(&self, name: &str) -> Vec<&Movie> {
        self.person_index
            .get(name)
            .map(|titles| titles.iter().filter_map(|t| self.movies.get(t)).collect())
            .unwrap_or_default()
    }

    /// All valid movies.
    pub fn all_movies(&self) -> Vec<&Movie> {
        self.movies.values().filter(|m| m.is_valid()).collect()
    }

    /// All distinct indexed genres.
    pub fn all_genres(&self) -> Vec<String> {
        self.genre_index.keys().cloned().collect()
    }

    /// All distinct cast names across valid movies.
    pub fn all_actors(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        for movie in self.all_movies() {
            for person in &movie.cast {
                names.insert(person.name.clone());
            }
        }
        names.into_iter().collect()
    }

    /// All distinct names credited as "director" (case-insensitive role)
    /// across valid movies.
    pub fn all_directors(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        for movie in self.all_movies() {
            for person in &movie.crew {
                if person.role.eq_ignore_ascii_case("director") {
                    names.insert(person.name.clone());
                }
            }
        }
        names.into_iter().collect()
    }

    /// Uniform random genre, or `None` when nothing is indexed.
    pub fn random_genre(&self) -> Option<String> {
        self.all_genres().choose(&mut rand::rng()).cloned()
    }

    /// Uniform random actor name, or `None` when nothing is indexed.
    pub fn random_actor(&self) -> Option<String> {
        self.all_actors().choose(&mut rand::rng()).cloned()
    }

    /// Uniform random director name, or `None` when nothing is indexed.
    pub fn random_director(&self) -> Option<String> {
        self.all_directors().choose(&mut rand::rng()).cloned()
    }

    /// Up to `k` autocomplete suggestions for a title prefix,
    /// case-insensitive.
    pub fn autocomplete(&self, prefix: &str, k: usize) -> Vec<String> {
        self.trie.prefix_search(prefix, k)
    }

    /// Removes every index entry pointing at an outgoing record: its genre
    /// buckets, its person-index titles, and its trie entry. Emptied buckets
    /// are dropped so the distinct-value enumerations never list a genre or
    /// person with no movies left.
    fn unindex(&mut self, movie: &Movie) {
        for genre in &movie.genres {
            let emptied = match self.genre_index.get_mut(genre) {
                Some(bucket) => {
                    bucket.retain(|t| t != &movie.title);
                    bucket.is_empty()
                }
                None => false,
            };
            if emptied {
                self.genre_index.remove(genre);
            }
        }
        for person in movie.cast.iter().chain(&movie.crew) {
            let emptied = match self.person_index.get_mut(&person.name) {
                Some(titles) => {
                    titles.remove(&movie.title);
                    titles.is_empty()
                }
                None => false,
            };
            if emptied {
                self.person_index.remove(&person.name);
            }
        }
        self.trie.remove(&movie.title);
    }

    /// The interned id for a person name, if the name has been seen.
    pub fn person_id(&self, name: &str) -> Option<PersonId> {
        self.interner.get(name)
    }

    /// Number of stored movie records, valid or not.
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    /// Whether the catalog holds no records.
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

/// Adds a movie's credits to the person index: every cast member, and every
/// crew member whose role is "director" (case-insensitive).
fn index_people(index: &mut HashMap<String, BTreeSet<String>>, movie: &Movie) {
    for person in &movie.cast {
        index
            .entry(person.name.clone())
            .or_default()
            .insert(movie.title.clone());
    }
    for person in &movie.crew {
        if person.role.eq_ignore_ascii_case("director") {
            index
                .entry(person.name.clone())
                .or_default()
                .insert(movie.title.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_record(title: &str, genre: &str, actor: &str, director: &str) -> MovieRecord {
        MovieRecord::new(title, 2000)
            .with_genres([genre])
            .with_cast([CreditEntry::new(actor, "Lead")])
            .with_crew([CreditEntry::new(director, "Director")])
    }

    #[test]
    fn test_find_movie_hides_invalid_records() {
        let mut catalog = Catalog::new();
        catalog.add_movie(MovieRecord::new("Unreleased", 2030).with_genres(["Drama"]));
        catalog.add_movie(full_record("Heat", "Crime", "Al Pacino", "Michael Mann"));

        assert!(catalog.find_movie("Heat").is_some());
        assert!(
            catalog.find_movie("Unreleased").is_none(),
            "credit-less movies are unplayable"
        );
        assert!(catalog.find_movie("heat").is_none(), "lookup is case-sensitive");
        assert_eq!(catalog.len(), 2, "invalid records still occupy the store");
    }

    #[test]
    fn test_last_write_wins_on_title() {
        let mut catalog = Catalog::new();
        catalog.add_movie(full_record("Heat", "Crime", "Al Pacino", "Michael Mann"));
        catalog.add_movie(full_record("Heat", "Thriller", "Robert De Niro", "Michael Mann"));

        let movie = catalog.find_movie("Heat").expect("still present");
        assert_eq!(movie.cast[0].name, "Robert De Niro");
        assert_eq!(movie.genres, vec!["Thriller".to_string()]);
    }

    #[test]
    fn test_overwrite_retracts_stale_index_entries() {
        let mut catalog = Catalog::new();
        catalog.add_movie(full_record("Heat", "Crime", "Al Pacino", "Michael Mann"));
        catalog.add_movie(full_record("Heat", "Thriller", "Robert De Niro", "Michael Mann"));

        assert!(
            catalog.movies_by_genre("Crime").is_empty(),
            "the replacement record no longer carries Crime"
        );
        let thriller = catalog.movies_by_genre("Thriller");
        assert_eq!(thriller.len(), 1, "re-adding a title never duplicates bucket entries");
        assert_eq!(thriller[0].cast[0].name, "Robert De Niro");
        assert!(catalog.movies_by_person("Al Pacino").is_empty());
        assert_eq!(catalog.movies_by_person("Michael Mann").len(), 1);
        assert_eq!(catalog.all_genres(), vec!["Thriller".to_string()]);

        // A record demoted to invalid leaves autocomplete too.
        catalog.add_movie(MovieRecord::new("Heat", 1995).with_genres(["Crime"]));
        assert!(catalog.autocomplete("heat", 5).is_empty());
        assert!(catalog.find_movie("Heat").is_none());
    }

    #[test]
    fn test_genre_index_exact_match() {
        let mut catalog = Catalog::new();
        catalog.add_movie(full_record("Heat", "Crime", "Al Pacino", "Michael Mann"));
        catalog.add_movie(full_record("Se7en", "Crime", "Brad Pitt", "David Fincher"));

        let crime = catalog.movies_by_genre("Crime");
        assert_eq!(crime.len(), 2);
        assert_eq!(crime[0].title, "Heat", "bucket keeps insertion order");
        assert!(catalog.movies_by_genre("crime").is_empty());
        assert!(catalog.movies_by_genre("Western").is_empty());
    }

    #[test]
    fn test_person_index_covers_cast_and_directors_only() {
        let mut catalog = Catalog::new();
        catalog.add_movie(
            MovieRecord::new("Alien", 1979)
                .with_genres(["Horror"])
                .with_cast([CreditEntry::new("Sigourney Weaver", "Ripley")])
                .with_crew([
                    CreditEntry::new("Ridley Scott", "DIRECTOR"),
                    CreditEntry::new("Jerry Goldsmith", "Composer"),
                ]),
        );

        assert_eq!(catalog.movies_by_person("Sigourney Weaver").len(), 1);
        assert_eq!(
            catalog.movies_by_person("Ridley Scott").len(),
            1,
            "role comparison is case-insensitive"
        );
        assert!(
            catalog.movies_by_person("Jerry Goldsmith").is_empty(),
            "non-directing crew is not person-indexed"
        );
    }

    #[test]
    fn test_merge_credits_promotes_movie_into_trie() {
        let mut catalog = Catalog::new();
        catalog.add_movie(MovieRecord::new("Memento", 2000).with_genres(["Thriller"]));
        assert!(catalog.autocomplete("mem", 5).is_empty());

        let merged = catalog.merge_credits(
            "Memento",
            vec![CreditEntry::new("Guy Pearce", "Leonard")],
            vec![CreditEntry::new("Christopher Nolan", "Director")],
        );
        assert!(merged);
        assert_eq!(catalog.autocomplete("mem", 5), vec!["Memento".to_string()]);
        assert!(catalog.find_movie("Memento").is_some());
    }

    #[test]
    fn test_merge_credits_unknown_title_is_skipped() {
        let mut catalog = Catalog::new();
        let merged = catalog.merge_credits(
            "Nonexistent",
            vec![CreditEntry::new("Nobody", "Lead")],
            Vec::new(),
        );
        assert!(!merged);
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_random_picks_from_empty_catalog() {
        let catalog = Catalog::new();
        assert_eq!(catalog.random_genre(), None);
        assert_eq!(catalog.random_actor(), None);
        assert_eq!(catalog.random_director(), None);
    }

    #[test]
    fn test_distinct_value_enumerations() {
        let mut catalog = Catalog::new();
        catalog.add_movie(full_record("Heat", "Crime", "Al Pacino", "Michael Mann"));
        catalog.add_movie(full_record("Collateral", "Crime", "Tom Cruise", "Michael Mann"));

        assert_eq!(catalog.all_genres(), vec!["Crime".to_string()]);
        assert_eq!(catalog.all_directors(), vec!["Michael Mann".to_string()]);
        assert_eq!(catalog.all_actors().len(), 2);
        let pick = catalog.random_director();
        assert_eq!(pick, Some("Michael Mann".to_string()));
    }

    #[test]
    fn test_all_movies_excludes_invalid() {
        let mut catalog = Catalog::new();
        catalog.add_movie(full_record("Heat", "Crime", "Al Pacino", "Michael Mann"));
        catalog.add_movie(MovieRecord::new("Unreleased", 2030));
        assert_eq!(catalog.all_movies().len(), 1);
    }
}
