// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fold model
//!
//! A fold is a named section of a CI log delimited by `fold:start:<name>` and
//! `fold:end:<name>` markers. Lines outside any fold are kept in the implicit
//! [`OUT_OF_FOLD`] bucket, which always exists.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Name of the bucket holding every line not enclosed in a named fold
pub const OUT_OF_FOLD: &str = "out_of_fold";

/// A named, ordered, optionally timed section of a log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fold {
    /// Fold name as given by its start marker
    pub name: String,
    /// Lines of the fold in log order, without line terminators
    pub content: Vec<String>,
    /// Duration in whole seconds, if a timing marker was seen inside the fold
    pub duration: Option<u64>,
}

impl Fold {
    /// Create an empty fold
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Vec::new(),
            duration: None,
        }
    }

    /// Check if the fold has no content lines
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Ordered collection of folds produced by the splitter
///
/// Folds are kept in order of first appearance. The out-of-fold bucket is
/// always the first entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folds {
    folds: Vec<Fold>,
    index: HashMap<String, usize>,
}

impl Folds {
    /// Create a collection holding only an empty out-of-fold bucket
    #[must_use]
    pub fn new() -> Self {
        let mut index = HashMap::new();
        index.insert(OUT_OF_FOLD.to_string(), 0);
        Self {
            folds: vec![Fold::new(OUT_OF_FOLD)],
            index,
        }
    }

    /// The out-of-fold bucket
    #[must_use]
    pub fn out_of_fold(&self) -> &Fold {
        &self.folds[0]
    }

    /// Look up a fold by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Fold> {
        self.index.get(name).map(|&i| &self.folds[i])
    }

    /// Iterate over all folds, out-of-fold first
    pub fn iter(&self) -> impl Iterator<Item = &Fold> {
        self.folds.iter()
    }

    /// Total number of folds including the out-of-fold bucket
    #[must_use]
    pub fn len(&self) -> usize {
        self.folds.len()
    }

    /// Always false: the out-of-fold bucket is always present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of named folds (excludes the out-of-fold bucket)
    #[must_use]
    pub fn named_count(&self) -> usize {
        self.folds.len() - 1
    }

    /// Get a fold for appending, creating it on first reference
    pub(crate) fn entry(&mut self, name: &str) -> &mut Fold {
        let i = match self.index.get(name) {
            Some(&i) => i,
            None => {
                self.folds.push(Fold::new(name));
                let i = self.folds.len() - 1;
                self.index.insert(name.to_string(), i);
                i
            }
        };
        &mut self.folds[i]
    }
}

impl Default for Folds {
    fn default() -> Self {
        Self::new()
    }
}
