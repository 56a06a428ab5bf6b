use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// A symptom identifier, kept exactly as the prediction backend spells it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Symptom(String);

impl Symptom {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring test. `needle` must already be lowercase.
    pub fn contains_lowercase(&self, needle: &str) -> bool {
        self.0.to_lowercase().contains(needle)
    }

    /// Case-insensitive equality. `other` must already be lowercase.
    pub fn eq_lowercase(&self, other: &str) -> bool {
        self.0.to_lowercase() == other
    }
}

impl fmt::Display for Symptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symptom {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Sorted, duplicate-free set of every symptom the backend knows about.
///
/// Replaced wholesale on each load, never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    symptoms: Vec<Symptom>,
}

impl Vocabulary {
    /// Union of all symptom lists, sorted and de-duplicated. Blank entries are dropped.
    pub fn from_symptom_lists<I, L, S>(lists: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique: BTreeSet<Symptom> = lists
            .into_iter()
            .flatten()
            .map(Into::<String>::into)
            .filter(|s| !s.trim().is_empty())
            .map(Symptom)
            .collect();

        Self {
            symptoms: unique.into_iter().collect(),
        }
    }

    pub fn symptoms(&self) -> &[Symptom] {
        &self.symptoms
    }

    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }

    pub fn contains(&self, symptom: &Symptom) -> bool {
        self.symptoms.binary_search(symptom).is_ok()
    }

    /// Symptoms whose name contains `search` case-insensitively, in vocabulary order.
    pub fn filter<'a>(&'a self, search: &str) -> impl Iterator<Item = &'a Symptom> + 'a {
        let needle = search.to_lowercase();
        self.symptoms
            .iter()
            .filter(move |s| s.contains_lowercase(&needle))
    }

    /// Resolve typed input to a symptom: exact match first, then the first substring match.
    ///
    /// Input is trimmed and lowercased. Blank input never matches.
    pub fn resolve(&self, input: &str) -> Option<&Symptom> {
        let term = input.trim().to_lowercase();
        if term.is_empty() {
            return None;
        }
        self.symptoms
            .iter()
            .find(|s| s.eq_lowercase(&term))
            .or_else(|| self.symptoms.iter().find(|s| s.contains_lowercase(&term)))
    }
}

/// Insertion-ordered set of the symptoms the user has chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    items: Vec<Symptom>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, symptom: &Symptom) -> bool {
        self.items.contains(symptom)
    }

    /// Add a symptom. Returns false if it was already selected.
    pub fn insert(&mut self, symptom: Symptom) -> bool {
        if self.contains(&symptom) {
            return false;
        }
        self.items.push(symptom);
        true
    }

    /// Remove a symptom. Returns false if it was not selected.
    pub fn remove(&mut self, symptom: &Symptom) -> bool {
        let before = self.items.len();
        self.items.retain(|s| s != symptom);
        self.items.len() != before
    }

    /// Flip membership. Returns true if the symptom is selected afterwards.
    pub fn toggle(&mut self, symptom: Symptom) -> bool {
        if self.remove(&symptom) {
            false
        } else {
            self.items.push(symptom);
            true
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symptom> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Selected symptoms in insertion order, as sent to the prediction endpoint.
    pub fn to_vec(&self) -> Vec<Symptom> {
        self.items.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(list: &[&str]) -> Vocabulary {
        Vocabulary::from_symptom_lists([list.iter().map(|s| s.to_string())])
    }

    fn names<'a>(it: impl Iterator<Item = &'a Symptom>) -> Vec<&'a str> {
        it.map(Symptom::as_str).collect()
    }

    #[test]
    fn vocabulary_is_sorted_union_without_duplicates() {
        let v = Vocabulary::from_symptom_lists(vec![
            vec!["fever", "headache", "cough"],
            vec!["cough", "sneezing"],
            vec!["fever"],
        ]);
        assert_eq!(
            names(v.symptoms().iter()),
            vec!["cough", "fever", "headache", "sneezing"]
        );
    }

    #[test]
    fn vocabulary_drops_blank_entries() {
        let v = Vocabulary::from_symptom_lists(vec![vec!["", "  ", "rash"]]);
        assert_eq!(names(v.symptoms().iter()), vec!["rash"]);
    }

    #[test]
    fn vocabulary_from_no_diseases_is_empty() {
        let v = Vocabulary::from_symptom_lists(Vec::<Vec<String>>::new());
        assert!(v.is_empty());
        assert_eq!(v.len(), 0);
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let v = vocab(&["fever", "cough"]);
        assert_eq!(names(v.filter("fe")), vec!["fever"]);
        assert_eq!(names(v.filter("FE")), vec!["fever"]);
        assert_eq!(names(v.filter("")), vec!["cough", "fever"]);
        assert!(v.filter("xyz").next().is_none());
    }

    #[test]
    fn resolve_prefers_exact_match() {
        let v = vocab(&["chest pain", "pain"]);
        assert_eq!(v.resolve("Pain").map(Symptom::as_str), Some("pain"));
    }

    #[test]
    fn resolve_falls_back_to_first_substring() {
        let v = vocab(&["high fever", "mild fever"]);
        assert_eq!(v.resolve(" fever ").map(Symptom::as_str), Some("high fever"));
    }

    #[test]
    fn resolve_blank_or_unknown_is_none() {
        let v = vocab(&["fever"]);
        assert!(v.resolve("   ").is_none());
        assert!(v.resolve("cough").is_none());
    }

    #[test]
    fn vocabulary_contains_uses_exact_identity() {
        let v = vocab(&["cough", "fever"]);
        assert!(v.contains(&Symptom::from("fever")));
        assert!(!v.contains(&Symptom::from("Fever")));
    }

    #[test]
    fn selection_keeps_insertion_order_and_uniqueness() {
        let mut sel = Selection::new();
        assert!(sel.insert("fever".into()));
        assert!(sel.insert("cough".into()));
        assert!(!sel.insert("fever".into()));
        assert_eq!(names(sel.iter()), vec!["fever", "cough"]);
        assert_eq!(sel.len(), 2);
    }

    #[test]
    fn selection_toggle_twice_restores_state() {
        let mut sel = Selection::new();
        sel.insert("cough".into());
        let before = sel.clone();

        assert!(sel.toggle("fever".into()));
        assert!(sel.contains(&"fever".into()));
        assert!(!sel.toggle("fever".into()));
        assert_eq!(sel, before);
    }

    #[test]
    fn selection_remove_missing_is_false() {
        let mut sel = Selection::new();
        assert!(!sel.remove(&"fever".into()));
        assert!(sel.is_empty());
    }

    #[test]
    fn symptom_serializes_as_plain_string() {
        let json = serde_json::to_string(&Symptom::from("fever")).unwrap();
        assert_eq!(json, "\"fever\"");
    }
}
