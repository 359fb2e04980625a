//! Case-insensitive prefix trie over movie titles.
//!
//! Titles are stored along a path of lower-cased characters; the terminal
//! node keeps the original-case title. Children live in a `BTreeMap`, so
//! traversal order is character order and autocomplete results are
//! deterministic. The trie is populated during load and read-only during
//! play; removal exists only so the catalog can retract a title it
//! overwrites.

use std::collections::BTreeMap;
use tracing::instrument;

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    /// Original-case title, set on the terminal node of an inserted word.
    word: Option<String>,
}

/// Prefix trie for title autocomplete.
#[derive(Debug, Clone, Default)]
pub struct TitleTrie {
    root: TrieNode,
}

impl TitleTrie {
    /// Creates an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a title, keyed by its lower-cased characters.
    ///
    /// Re-inserting an existing title is a no-op apart from refreshing the
    /// stored original-case form.
    pub fn insert(&mut self, title: &str) {
        let mut node = &mut self.root;
        for c in title.to_lowercase().chars() {
            node = node.children.entry(c).or_default();
        }
        node.word = Some(title.to_string());
    }

    /// Removes a title, pruning any nodes left without a word or children.
    ///
    /// Removing an absent title is a no-op.
    pub fn remove(&mut self, title: &str) {
        let path: Vec<char> = title.to_lowercase().chars().collect();
        remove_at(&mut self.root, &path);
    }

    /// Returns up to `k` stored titles whose lower-cased form starts with
    /// the lower-cased `prefix`.
    ///
    /// An empty prefix collects from the root. Results are deterministic: a
    /// node's own word precedes its subtree, and children are visited in
    /// character order.
    #[instrument(skip(self))]
    pub fn prefix_search(&self, prefix: &str, k: usize) -> Vec<String> {
        let mut node = &self.root;
        for c in prefix.to_lowercase().chars() {
            match node.children.get(&c) {
                Some(child) => node = child,
                None => return Vec::new(),
            }
        }
        let mut results = Vec::new();
        collect(node, &mut results, k);
        results
    }
}

/// Clears the word at the end of `path` and reports whether `node` is now
/// empty and safe for its parent to drop.
fn remove_at(node: &mut TrieNode, path: &[char]) -> bool {
    match path.split_first() {
        None => node.word = None,
        Some((c, rest)) => {
            if let Some(child) = node.children.get_mut(c) {
                if remove_at(child, rest) {
                    node.children.remove(c);
                }
            }
        }
    }
    node.word.is_none() && node.children.is_empty()
}

fn collect(node: &TrieNode, results: &mut Vec<String>, k: usize) {
    if results.len() >= k {
        return;
    }
    if let Some(word) = &node.word {
        results.push(word.clone());
    }
    for child in node.children.values() {
        collect(child, results, k);
        if results.len() >= k {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TitleTrie {
        let mut trie = TitleTrie::new();
        for title in ["The Matrix", "The Mask", "Titanic", "Toy Story", "Thor"] {
            trie.insert(title);
        }
        trie
    }

    #[test]
    fn test_prefix_match_is_case_insensitive() {
        let trie = sample();
        assert_eq!(
            trie.prefix_search("the ma", 10),
            vec!["The Mask".to_string(), "The Matrix".to_string()]
        );
        assert_eq!(
            trie.prefix_search("THE MA", 10),
            trie.prefix_search("the ma", 10)
        );
    }

    #[test]
    fn test_original_case_preserved() {
        let trie = sample();
        let results = trie.prefix_search("titanic", 5);
        assert_eq!(results, vec!["Titanic".to_string()]);
    }

    #[test]
    fn test_result_limit() {
        let trie = sample();
        assert_eq!(trie.prefix_search("t", 2).len(), 2);
        assert_eq!(trie.prefix_search("t", 100).len(), 5);
    }

    #[test]
    fn test_empty_prefix_collects_from_root() {
        let trie = sample();
        let all = trie.prefix_search("", 10);
        assert_eq!(all.len(), 5);
        // Deterministic lexicographic-by-path order.
        assert_eq!(all, trie.prefix_search("", 10));
    }

    #[test]
    fn test_absent_prefix_yields_empty() {
        let trie = sample();
        assert!(trie.prefix_search("zzz", 5).is_empty());
    }

    #[test]
    fn test_remove_retracts_only_the_named_title() {
        let mut trie = sample();
        trie.remove("The Matrix");
        assert_eq!(trie.prefix_search("the ma", 10), vec!["The Mask".to_string()]);
        assert_eq!(trie.prefix_search("", 10).len(), 4, "other titles survive");

        // A title that prefixes another: the longer word keeps its path.
        trie.insert("Thor: Ragnarok");
        trie.remove("Thor");
        assert_eq!(
            trie.prefix_search("thor", 10),
            vec!["Thor: Ragnarok".to_string()]
        );

        trie.remove("Never Inserted");
        assert_eq!(trie.prefix_search("", 10).len(), 4);
    }

    #[test]
    fn test_reinsert_is_idempotent() {
        let mut trie = sample();
        trie.insert("Titanic");
        trie.insert("Titanic");
        assert_eq!(trie.prefix_search("tita", 10), vec!["Titanic".to_string()]);
    }
}
