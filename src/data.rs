//! Named-column container carried between pipeline stages.
//!
//! A thin wrapper around `Vec<(String, Vec<f64>)>`: every downstream
//! component identifies a feature by its stable column name, never by
//! positional index.

use crate::error::Result;
use crate::primitives::Matrix;

/// A batch of named feature columns with a fixed row count.
///
/// Unlike a general-purpose dataframe this container allows zero columns:
/// a degenerate encoder (empty vocabulary) contributes nothing, and the
/// frame must keep flowing.
///
/// # Examples
///
/// ```
/// use viabilidad::data::FeatureFrame;
///
/// let mut frame = FeatureFrame::with_rows(2);
/// frame.push_column("years_active", vec![3.0, 7.0]).expect("row count matches");
/// assert_eq!(frame.column("years_active").expect("present"), &[3.0, 7.0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FeatureFrame {
    columns: Vec<(String, Vec<f64>)>,
    n_rows: usize,
}

impl FeatureFrame {
    /// Creates an empty frame with a fixed row count.
    #[must_use]
    pub fn with_rows(n_rows: usize) -> Self {
        Self {
            columns: Vec::new(),
            n_rows,
        }
    }

    /// Returns the shape as (`n_rows`, `n_cols`).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.columns.len())
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Returns the column names in insertion order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Returns a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// True if a column with this name exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    /// Appends a column.
    ///
    /// # Errors
    ///
    /// Returns an error if the length doesn't match the row count or the
    /// name is already taken.
    pub fn push_column(&mut self, name: impl Into<String>, data: Vec<f64>) -> Result<()> {
        let name = name.into();
        if data.len() != self.n_rows {
            return Err(format!(
                "column '{}' has {} rows, frame has {}",
                name,
                data.len(),
                self.n_rows
            )
            .into());
        }
        if self.has_column(&name) {
            return Err(format!("duplicate column '{name}'").into());
        }
        self.columns.push((name, data));
        Ok(())
    }

    /// Replaces the values of an existing column.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is absent or the length mismatches.
    pub fn replace_column(&mut self, name: &str, data: Vec<f64>) -> Result<()> {
        if data.len() != self.n_rows {
            return Err(format!("replacement for '{name}' has wrong length").into());
        }
        match self.columns.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => {
                *v = data;
                Ok(())
            }
            None => Err(format!("no column '{name}' to replace").into()),
        }
    }

    /// Returns one row's value for a named column.
    #[must_use]
    pub fn value(&self, name: &str, row: usize) -> Option<f64> {
        self.column(name).and_then(|c| c.get(row).copied())
    }

    /// Iterates over (name, values) pairs in insertion order.
    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// Converts the frame to a row-major matrix in column insertion order.
    #[must_use]
    pub fn to_matrix(&self) -> Matrix<f64> {
        let n_cols = self.columns.len();
        let mut data = Vec::with_capacity(self.n_rows * n_cols);
        for row in 0..self.n_rows {
            for (_, col) in &self.columns {
                data.push(col[row]);
            }
        }
        Matrix::from_vec(self.n_rows, n_cols, data).expect("frame dimensions are consistent")
    }
}
