//! Lookup table from (cleaner, option) to the option's actions.

use std::collections::HashMap;

use crate::rules::{Action, Cleaner};

/// Read-only snapshot of the loaded rules, keyed by cleaner id then option id.
///
/// Built fresh for every analysis so a concurrent rule reload cannot change
/// it mid-flight.
#[derive(Debug, Clone, Default)]
pub struct RuleIndex {
    cleaners: HashMap<String, HashMap<String, Vec<Action>>>,
}

impl RuleIndex {
    /// Build the index. A later cleaner with a repeated id replaces the earlier one.
    pub fn build(cleaners: &[Cleaner]) -> Self {
        let mut index: HashMap<String, HashMap<String, Vec<Action>>> =
            HashMap::with_capacity(cleaners.len());

        for cleaner in cleaners {
            let options = cleaner
                .options
                .iter()
                .map(|option| (option.id.clone(), option.actions.clone()))
                .collect();
            index.insert(cleaner.id.clone(), options);
        }

        Self { cleaners: index }
    }

    /// Actions of the given option, if both ids are known.
    pub fn actions(&self, cleaner_id: &str, option_id: &str) -> Option<&[Action]> {
        self.cleaners
            .get(cleaner_id)
            .and_then(|options| options.get(option_id))
            .map(Vec::as_slice)
    }

    /// Option ids of a cleaner, sorted.
    pub fn option_ids(&self, cleaner_id: &str) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .cleaners
            .get(cleaner_id)
            .map(|options| options.keys().map(String::as_str).collect())
            .unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    pub fn contains_cleaner(&self, cleaner_id: &str) -> bool {
        self.cleaners.contains_key(cleaner_id)
    }

    /// Number of cleaners in the index.
    pub fn len(&self) -> usize {
        self.cleaners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cleaners.is_empty()
    }
}
