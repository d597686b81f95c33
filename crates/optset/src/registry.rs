//! Name-keyed, insertion-ordered option storage.
//!
//! Entries are keyed by their primary name; every further alias points back
//! at the primary name. Inserting or removing an entry touches all of its
//! aliases at once.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::prototype::OptionSpec;

/// Anything stored in a [`Registry`] exposes its compiled spec.
pub trait Keyed {
    fn spec(&self) -> &OptionSpec;
}

impl Keyed for OptionSpec {
    fn spec(&self) -> &OptionSpec {
        self
    }
}

#[derive(Debug, Clone)]
pub struct Registry<T> {
    entries: IndexMap<String, T>,
    aliases: HashMap<String, String>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
            aliases: HashMap::new(),
        }
    }
}

impl<T: Keyed> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `item` under every one of its names.
    ///
    /// Fails without modifying the registry if any name is already taken.
    pub fn insert(&mut self, item: T) -> Result<()> {
        let names = item.spec().names();
        let mut seen: HashSet<&str> = HashSet::with_capacity(names.len());
        for name in names {
            if self.contains(name) || !seen.insert(name.as_str()) {
                return Err(Error::DuplicateName { name: name.clone() });
            }
        }

        let primary = item.spec().primary_name().to_string();
        for alias in &names[1..] {
            self.aliases.insert(alias.clone(), primary.clone());
        }
        self.entries.insert(primary, item);
        Ok(())
    }

    /// Remove the entry owning `name` (any alias), along with all its aliases.
    pub fn remove(&mut self, name: &str) -> Option<T> {
        let primary = self.resolve(name)?.to_string();
        let item = self.entries.shift_remove(&primary)?;
        for alias in &item.spec().names()[1..] {
            self.aliases.remove(alias);
        }
        Some(item)
    }

    /// Primary name of the entry owning `name`.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        if let Some((key, _)) = self.entries.get_key_value(name) {
            return Some(key.as_str());
        }
        self.aliases.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name) || self.aliases.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        match self.entries.get(name) {
            Some(item) => Some(item),
            None => self.entries.get(self.aliases.get(name)?),
        }
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        let primary = match self.aliases.get(name) {
            Some(primary) => primary.as_str(),
            None => name,
        };
        self.entries.get_mut(primary)
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
