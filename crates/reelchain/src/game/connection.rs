//! Connection validation between consecutively played movies.

use crate::catalog::{Movie, Person, PersonId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How two movies are linked: through shared cast or shared crew.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ConnectionKind {
    /// The connector appears in both movies' cast.
    Actor,
    /// The connector appears in both movies' crew.
    Director,
}

/// A validated link between two movies through a shared person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Title of the earlier movie.
    pub source_title: String,
    /// Title of the later movie.
    pub target_title: String,
    /// The shared person.
    pub connector: Person,
    /// Whether the link went through cast or crew.
    pub kind: ConnectionKind,
}

impl Connection {
    /// The reuse-tracking key: connector identity plus kind.
    pub fn usage_key(&self) -> (PersonId, ConnectionKind) {
        (self.connector.id, self.kind)
    }

    /// Human-readable form, e.g. `"Christopher Nolan (director)"`.
    pub fn description(&self) -> String {
        format!("{} ({})", self.connector.name, self.kind)
    }
}

/// Decides whether `source` and `target` are legally connected.
///
/// The tie-break is canonical and must stay reproducible:
///
/// 1. Scan `source.cast` in billing order; the first person also present in
///    `target.cast` wins as an [`ConnectionKind::Actor`] connection.
/// 2. Otherwise scan `source.crew` in order; the first person also present
///    in `target.crew` wins as a [`ConnectionKind::Director`] connection.
///    The crew role is deliberately not checked - any shared crew member
///    qualifies.
/// 3. Otherwise there is no connection.
pub fn validate_connection(source: &Movie, target: &Movie) -> Option<Connection> {
    for actor in &source.cast {
        if target.has_cast_member(actor) {
            debug!(
                source = %source.title,
                target = %target.title,
                connector = %actor.name,
                "shared actor found"
            );
            return Some(link(source, target, actor, ConnectionKind::Actor));
        }
    }
    for member in &source.crew {
        if target.has_crew_member(member) {
            debug!(
                source = %source.title,
                target = %target.title,
                connector = %member.name,
                "shared crew member found"
            );
            return Some(link(source, target, member, ConnectionKind::Director));
        }
    }
    debug!(source = %source.title, target = %target.title, "no connection");
    None
}

fn link(source: &Movie, target: &Movie, connector: &Person, kind: ConnectionKind) -> Connection {
    Connection {
        source_title: source.title.clone(),
        target_title: target.title.clone(),
        connector: connector.clone(),
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, CreditEntry, MovieRecord};

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.add_movie(
            MovieRecord::new("Inception", 2010)
                .with_genres(["Action"])
                .with_cast([CreditEntry::new("Leonardo DiCaprio", "Cobb")])
                .with_crew([CreditEntry::new("Christopher Nolan", "Director")]),
        );
        catalog.add_movie(
            MovieRecord::new("The Dark Knight", 2008)
                .with_genres(["Action"])
                .with_cast([CreditEntry::new("Christian Bale", "Bruce Wayne")])
                .with_crew([CreditEntry::new("Christopher Nolan", "Director")]),
        );
        catalog.add_movie(
            MovieRecord::new("Titanic", 1997)
                .with_genres(["Drama"])
                .with_cast([CreditEntry::new("Leonardo DiCaprio", "Jack")])
                .with_crew([CreditEntry::new("James Cameron", "Director")]),
        );
        catalog
    }

    #[test]
    fn test_shared_director_connects() {
        let catalog = catalog();
        let a = catalog.find_movie("Inception").unwrap();
        let b = catalog.find_movie("The Dark Knight").unwrap();
        let conn = validate_connection(a, b).expect("Nolan directed both");
        assert_eq!(conn.kind, ConnectionKind::Director);
        assert_eq!(conn.connector.name, "Christopher Nolan");
        assert_eq!(conn.description(), "Christopher Nolan (director)");
    }

    #[test]
    fn test_actor_check_precedes_director_check() {
        let catalog = catalog();
        let a = catalog.find_movie("Inception").unwrap();
        let c = catalog.find_movie("Titanic").unwrap();
        let conn = validate_connection(a, c).expect("DiCaprio stars in both");
        assert_eq!(conn.kind, ConnectionKind::Actor);
        assert_eq!(conn.connector.name, "Leonardo DiCaprio");
    }

    #[test]
    fn test_unrelated_movies_do_not_connect() {
        let catalog = catalog();
        let b = catalog.find_movie("The Dark Knight").unwrap();
        let c = catalog.find_movie("Titanic").unwrap();
        assert!(validate_connection(b, c).is_none());
    }

    #[test]
    fn test_first_cast_match_wins() {
        let mut catalog = Catalog::new();
        catalog.add_movie(
            MovieRecord::new("Ensemble One", 2001)
                .with_genres(["Drama"])
                .with_cast([
                    CreditEntry::new("First Shared", "A"),
                    CreditEntry::new("Second Shared", "B"),
                ])
                .with_crew([CreditEntry::new("Some Director", "Director")]),
        );
        catalog.add_movie(
            MovieRecord::new("Ensemble Two", 2002)
                .with_genres(["Drama"])
                .with_cast([
                    CreditEntry::new("Second Shared", "B"),
                    CreditEntry::new("First Shared", "A"),
                ])
                .with_crew([CreditEntry::new("Some Director", "Director")]),
        );
        let one = catalog.find_movie("Ensemble One").unwrap();
        let two = catalog.find_movie("Ensemble Two").unwrap();
        let conn = validate_connection(one, two).unwrap();
        assert_eq!(
            conn.connector.name, "First Shared",
            "order follows the source cast list, not the target's"
        );
    }

    #[test]
    fn test_any_shared_crew_member_qualifies_as_director_link() {
        let mut catalog = Catalog::new();
        catalog.add_movie(
            MovieRecord::new("Scored One", 2001)
                .with_genres(["Drama"])
                .with_cast([CreditEntry::new("Actor A", "A")])
                .with_crew([CreditEntry::new("Hans Zimmer", "Composer")]),
        );
        catalog.add_movie(
            MovieRecord::new("Scored Two", 2002)
                .with_genres(["Drama"])
                .with_cast([CreditEntry::new("Actor B", "B")])
                .with_crew([CreditEntry::new("Hans Zimmer", "Composer")]),
        );
        let one = catalog.find_movie("Scored One").unwrap();
        let two = catalog.find_movie("Scored Two").unwrap();
        let conn = validate_connection(one, two).expect("shared composer links the movies");
        assert_eq!(conn.kind, ConnectionKind::Director);
        assert_eq!(conn.connector.name, "Hans Zimmer");
    }

    #[test]
    fn test_kind_parses_case_insensitively() {
        use std::str::FromStr;
        assert_eq!(ConnectionKind::from_str("actor").unwrap(), ConnectionKind::Actor);
        assert_eq!(
            ConnectionKind::from_str("Director").unwrap(),
            ConnectionKind::Director
        );
        assert_eq!(ConnectionKind::Actor.to_string(), "actor");
    }
}
