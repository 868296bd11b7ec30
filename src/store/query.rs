//! Row-set query builder
//!
//! The one capability the repositories consume from storage: filter,
//! order, skip/take, and count over a snapshot of a table. Rows are
//! borrowed until `cloned()` materializes the result.

use std::cmp::Ordering;

pub struct Query<'a, R> {
    rows: Vec<&'a R>,
}

impl<'a, R: Clone> Query<'a, R> {
    /// Start a query over a table snapshot
    pub fn over(rows: &'a [R]) -> Self {
        Self {
            rows: rows.iter().collect(),
        }
    }

    /// Keep rows matching the predicate
    pub fn filter<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&R) -> bool,
    {
        self.rows.retain(|row| predicate(row));
        self
    }

    /// Order rows by a comparator (stable, so ties keep insertion order)
    pub fn order_by<F>(mut self, compare: F) -> Self
    where
        F: Fn(&R, &R) -> Ordering,
    {
        self.rows.sort_by(|a, b| compare(a, b));
        self
    }

    /// Drop the first `n` rows
    pub fn skip(mut self, n: usize) -> Self {
        self.rows = self.rows.into_iter().skip(n).collect();
        self
    }

    /// Keep at most `n` rows
    pub fn take(mut self, n: usize) -> Self {
        self.rows.truncate(n);
        self
    }

    /// Number of rows currently selected
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    /// Materialize the selection
    pub fn cloned(self) -> Vec<R> {
        self.rows.into_iter().cloned().collect()
    }
}
