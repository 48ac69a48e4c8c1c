//! A running statistics collector over named cost fields.

use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::{CombinerError, Result};


/// Accumulates per-field mean and variance over cost vectors.
///
/// Field names are fixed at construction;
/// every [`VecStats::update`] call must supply exactly one value
/// per field, in field order.
/// Accumulation uses Welford's online algorithm,
/// so a collector never stores the observed vectors.
///
/// # Example
/// ```
/// use triboost::VecStats;
///
/// let mut stats = VecStats::new(
///     vec![String::from("class_error"), String::from("conflict")]
/// );
/// stats.update(&[1.0, 0.0]).unwrap();
/// stats.update(&[0.0, 0.0]).unwrap();
/// assert_eq!(stats.mean(0), Some(0.5));
/// ```
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VecStats {
    fields: Vec<String>,
    count: usize,
    means: Vec<f64>,
    m2s: Vec<f64>,
}


impl VecStats {
    /// Creates an empty collector over the given field names.
    pub fn new(fields: Vec<String>) -> Self {
        let n_field = fields.len();
        Self {
            fields,
            count: 0,
            means: vec![0.0; n_field],
            m2s: vec![0.0; n_field],
        }
    }


    /// The registered field names, in order.
    pub fn field_names(&self) -> &[String] {
        &self.fields[..]
    }


    /// Number of observed vectors.
    pub fn count(&self) -> usize {
        self.count
    }


    /// Folds one cost vector into the running statistics.
    /// Fails with [`CombinerError::CostLengthMismatch`]
    /// when `values` does not match the field count.
    pub fn update(&mut self, values: &[f64]) -> Result<()> {
        if values.len() != self.fields.len() {
            return Err(CombinerError::CostLengthMismatch {
                expected: self.fields.len(),
                got: values.len(),
            });
        }

        self.count += 1;
        let count = self.count as f64;
        for (k, &x) in values.iter().enumerate() {
            let delta = x - self.means[k];
            self.means[k] += delta / count;
            self.m2s[k] += delta * (x - self.means[k]);
        }
        Ok(())
    }


    /// Mean of the `k`-th field,
    /// or `None` before the first update or for an unknown index.
    pub fn mean(&self, k: usize) -> Option<f64> {
        (self.count > 0).then(|| self.means.get(k).copied())?
    }


    /// Sample variance of the `k`-th field.
    /// Defined once two or more vectors were observed.
    pub fn variance(&self, k: usize) -> Option<f64> {
        (self.count > 1)
            .then(|| {
                self.m2s.get(k)
                    .map(|m2| m2 / (self.count as f64 - 1.0))
            })?
    }


    /// Sample standard deviation of the `k`-th field.
    pub fn stddev(&self, k: usize) -> Option<f64> {
        self.variance(k).map(f64::sqrt)
    }


    /// Index of the field named `name`.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }


    /// Mean of the field named `name`.
    pub fn mean_of(&self, name: &str) -> Option<f64> {
        self.mean(self.field_index(name)?)
    }


    /// Writes the collector as a JSON report to `path`.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string(self)
            .map_err(|e| CombinerError::Data { message: e.to_string() })?;

        fs::write(path, json)
            .map_err(|source| CombinerError::Io {
                path: path.to_path_buf(),
                source,
            })
    }
}
