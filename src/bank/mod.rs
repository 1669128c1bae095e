//! Item Bank
//!
//! Validated, id-unique collection of calibrated items, as supplied by the
//! item-bank collaborator. The bank does not persist or author items; it only
//! checks them and hands out candidate sets.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{IrtError, Result};
use crate::types::{Item, DEFAULT_GUESSING};

#[derive(Debug, Clone, Default)]
pub struct ItemBank {
    items: Vec<Item>,
    index: HashMap<String, usize>,
}

impl ItemBank {
    /// Build a bank; fails on the first repeated id
    pub fn new(items: Vec<Item>) -> Result<Self> {
        let mut index = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            if index.insert(item.id().to_string(), position).is_some() {
                return Err(IrtError::DuplicateItemId(item.id().to_string()));
            }
        }
        Ok(Self { items, index })
    }

    /// Parse a JSON array of items; each item is validated
    pub fn from_json_str(json: &str) -> Result<Self> {
        let items: Vec<Item> = serde_json::from_str(json)?;
        Self::new(items)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Five-question mathematics bank used by the demo quiz
    pub fn demo() -> Self {
        const SUBJECT: &str = "Matematika";
        let items = vec![
            Item::preset("q1", "Ko'paytirish", SUBJECT, -1.0, 1.2, DEFAULT_GUESSING),
            Item::preset("q2", "Bo'lish", SUBJECT, 0.0, 1.5, DEFAULT_GUESSING),
            Item::preset("q3", "Kasrlar", SUBJECT, 1.0, 1.8, DEFAULT_GUESSING),
            Item::preset("q4", "Ko'rsatkichlar", SUBJECT, 2.0, 2.0, DEFAULT_GUESSING),
            Item::preset("q5", "Logarifm", SUBJECT, 3.0, 2.2, DEFAULT_GUESSING),
        ];
        let index = items
            .iter()
            .enumerate()
            .map(|(position, item)| (item.id().to_string(), position))
            .collect();
        Self { items, index }
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.index.get(id).map(|&position| &self.items[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items whose id is not in `answered`, in bank order
    pub fn remaining<S: AsRef<str>>(&self, answered: &[S]) -> Vec<&Item> {
        let answered: HashSet<&str> = answered.iter().map(|id| id.as_ref()).collect();
        self.items
            .iter()
            .filter(|item| !answered.contains(item.id()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_bank() {
        let bank = ItemBank::demo();
        assert_eq!(bank.len(), 5);
        let q3 = bank.get("q3").unwrap();
        assert_eq!(q3.concept(), "Kasrlar");
        assert_eq!(q3.subject(), "Matematika");
        assert_eq!(q3.difficulty(), 1.0);
        assert_eq!(q3.discrimination(), 1.8);
        assert_eq!(q3.guessing(), 0.25);

        // every preset passes the public checks, and ids are unique
        for item in bank.items() {
            let rebuilt = Item::new(
                item.id(),
                item.concept(),
                item.subject(),
                item.difficulty(),
                item.discrimination(),
                item.guessing(),
            );
            assert_eq!(rebuilt.as_ref().ok(), Some(item));
        }
        let rebuilt = ItemBank::new(bank.items().to_vec()).unwrap();
        assert_eq!(rebuilt.len(), bank.len());
        for id in ["q1", "q2", "q3", "q4", "q5"] {
            assert!(bank.contains(id));
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let items = vec![
            Item::calibrated("a", 0.0, 1.0).unwrap(),
            Item::calibrated("a", 1.0, 1.0).unwrap(),
        ];
        assert!(matches!(ItemBank::new(items), Err(IrtError::DuplicateItemId(id)) if id == "a"));
    }

    #[test]
    fn test_remaining_keeps_bank_order() {
        let bank = ItemBank::demo();
        let remaining = bank.remaining(&["q2", "q4", "not-in-bank"]);
        let ids: Vec<&str> = remaining.iter().map(|item| item.id()).collect();
        assert_eq!(ids, vec!["q1", "q3", "q5"]);

        let all: Vec<String> = bank.items().iter().map(|item| item.id().to_string()).collect();
        assert!(bank.remaining(&all).is_empty());
    }

    #[test]
    fn test_from_json_str() {
        let bank = ItemBank::from_json_str(
            r#"[
                {"id": "a", "concept": "c", "subject": "s", "difficulty": -0.5, "discrimination": 1.1, "guessing": 0.2},
                {"id": "b", "difficulty": 0.5, "discrimination": 0.9}
            ]"#,
        )
        .unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.get("a").unwrap().guessing(), 0.2);
        assert_eq!(bank.get("b").unwrap().guessing(), DEFAULT_GUESSING);
        assert!(!bank.contains("c"));
    }

    #[test]
    fn test_from_json_str_rejects_invalid_item() {
        let result =
            ItemBank::from_json_str(r#"[{"id": "a", "difficulty": 0.0, "discrimination": 0.0}]"#);
        assert!(matches!(result, Err(IrtError::Json(_))));
    }
}
