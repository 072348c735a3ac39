//! Name-indexed well collection.
//!
//! Insertion order is the simulation well order and stays stable for a run;
//! the name map gives O(1) lookup for carry-over matching across timesteps,
//! where array positions may have changed.

use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct WellContainer<T> {
    data: Vec<T>,
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl<T> WellContainer<T> {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            names: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Append a new entry, or overwrite the existing entry with this name.
    pub fn add(&mut self, name: impl Into<String>, value: T) -> &mut T {
        let name = name.into();
        match self.index.get(&name) {
            Some(&idx) => {
                self.data[idx] = value;
                &mut self.data[idx]
            }
            None => {
                let idx = self.data.len();
                self.index.insert(name.clone(), idx);
                self.names.push(name);
                self.data.push(value);
                &mut self.data[idx]
            }
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.names.clear();
        self.index.clear();
    }

    pub fn get(&self, idx: usize) -> Option<&T> {
        self.data.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.data.get_mut(idx)
    }

    pub fn name(&self, idx: usize) -> &str {
        &self.names[idx]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&T> {
        self.index_of(name).map(|idx| &self.data[idx])
    }

    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut T> {
        self.index.get(name).copied().map(|idx| &mut self.data[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.data.iter_mut()
    }
}
