use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use polars::prelude::*;
use rayon::prelude::*;

use crate::error::{CombinerError, Result};


/// A named feature column with dense `f64` values.
#[derive(Debug, Clone)]
struct Column {
    name: String,
    values: Vec<f64>,
}


/// Struct `Sample` holds a batch sample in dense, column-major form.
/// The target column holds class indices as `f64` values.
#[derive(Debug, Clone)]
pub struct Sample {
    name_to_index: HashMap<String, usize>,
    features: Vec<Column>,
    target: Vec<f64>,
    n_sample: usize,
    n_feature: usize,
}


impl Sample {
    fn from_parts(features: Vec<Column>, target: Vec<f64>) -> Self {
        let n_feature = features.len();
        let n_sample = features.first()
            .map(|c| c.values.len())
            .unwrap_or(target.len());

        let name_to_index = features.iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect::<HashMap<_, _>>();

        Self { name_to_index, features, target, n_sample, n_feature }
    }


    /// Builds a `Sample` from in-memory columns and a target vector.
    /// All columns and the target must have equal length.
    pub fn from_columns(
        columns: Vec<(String, Vec<f64>)>,
        target: Vec<f64>,
    ) -> Result<Self>
    {
        let n_sample = target.len();
        for (name, values) in &columns {
            if values.len() != n_sample {
                return Err(CombinerError::Data {
                    message: format!(
                        "column {name} has {} rows, target has {n_sample}",
                        values.len(),
                    ),
                });
            }
        }

        let features = columns.into_iter()
            .map(|(name, values)| Column { name, values })
            .collect::<Vec<_>>();

        Ok(Self::from_parts(features, target))
    }


    /// Convert `polars::DataFrame` and `polars::Series` into `Sample`.
    /// This method takes the ownership of the given pair
    /// `data` and `target`.
    /// All columns must have dtype `f64`.
    pub fn from_dataframe(data: DataFrame, target: Series) -> Result<Self> {
        let target = target.f64()
            .map_err(|e| CombinerError::Data { message: e.to_string() })?
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| CombinerError::Data {
                message: "target column contains null values".to_string(),
            })?;

        let features = data.get_columns()
            .iter()
            .map(|series| {
                let values = series.f64()
                    .map_err(|e| CombinerError::Data {
                        message: e.to_string(),
                    })?
                    .into_iter()
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| CombinerError::Data {
                        message: format!(
                            "column {} contains null values", series.name(),
                        ),
                    })?;
                Ok(Column { name: series.name().to_string(), values })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::from_parts(features, target))
    }


    /// Read a CSV format file to `Sample` type.
    /// The target column is empty until
    /// [`Sample::set_target`] is called.
    pub fn from_csv<P>(file: P, has_header: bool) -> Result<Self>
        where P: AsRef<Path>,
    {
        let file = file.as_ref();
        let reader = File::open(file)
            .map_err(|source| CombinerError::Io {
                path: file.to_path_buf(),
                source,
            })?;

        let mut lines = BufReader::new(reader).lines();

        let mut names = Vec::new();
        if has_header {
            match lines.next() {
                Some(line) => {
                    let line = line.map_err(|source| CombinerError::Io {
                        path: file.to_path_buf(),
                        source,
                    })?;
                    names = line.split(',')
                        .map(|s| s.trim().to_string())
                        .collect::<Vec<_>>();
                },
                None => {
                    return Err(CombinerError::Data {
                        message: format!("{} is empty", file.display()),
                    });
                },
            }
        }

        let mut raw_lines = Vec::new();
        for line in lines {
            let line = line.map_err(|source| CombinerError::Io {
                path: file.to_path_buf(),
                source,
            })?;
            if !line.trim().is_empty() {
                raw_lines.push(line);
            }
        }

        // Parse the rows in parallel, then pivot to columns.
        let rows = raw_lines.par_iter()
            .map(|line| {
                line.split(',')
                    .map(|x| {
                        x.trim()
                            .parse::<f64>()
                            .map_err(|e| CombinerError::Data {
                                message: format!("{x:?}: {e}"),
                            })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        let n_feature = rows.first().map(Vec::len).unwrap_or(0);
        for row in &rows {
            if row.len() != n_feature {
                return Err(CombinerError::Data {
                    message: format!(
                        "ragged csv row: expected {n_feature} fields, got {}",
                        row.len(),
                    ),
                });
            }
        }

        if names.is_empty() {
            names = (1..=n_feature)
                .map(|i| format!("Feat. [{i}]"))
                .collect::<Vec<_>>();
        } else if names.len() != n_feature {
            return Err(CombinerError::Data {
                message: format!(
                    "header has {} fields, rows have {n_feature}",
                    names.len(),
                ),
            });
        }

        let features = names.into_iter()
            .enumerate()
            .map(|(i, name)| {
                let values = rows.iter().map(|row| row[i]).collect();
                Column { name, values }
            })
            .collect::<Vec<_>>();

        Ok(Self::from_parts(features, Vec::new()))
    }


    /// Set the feature of name `target` to `self.target`.
    /// The old value assigned to `self.target` will be dropped.
    pub fn set_target<S: AsRef<str>>(mut self, target: S) -> Result<Self> {
        let target = target.as_ref();
        let pos = self.features.iter()
            .position(|c| c.name == target)
            .ok_or_else(|| CombinerError::Data {
                message: format!("no column named {target}"),
            })?;

        self.target = self.features.remove(pos).values;
        self.n_feature -= 1;

        self.name_to_index = self.features.iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect::<HashMap<_, _>>();

        Ok(self)
    }


    /// Returns the pair `(n_sample, n_feature)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_sample, self.n_feature)
    }


    /// Returns the target slice.
    pub fn target(&self) -> &[f64] {
        &self.target[..]
    }


    /// Value of the `col`-th feature for the `row`-th sample.
    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.features[col].values[row]
    }


    /// The values of the feature named `name`, if present.
    pub fn feature<S: AsRef<str>>(&self, name: S) -> Option<&[f64]> {
        let index = *self.name_to_index.get(name.as_ref())?;
        Some(&self.features[index].values[..])
    }


    /// The `row`-th input vector, in feature order.
    pub fn row(&self, row: usize) -> Vec<f64> {
        self.features.iter()
            .map(|c| c.values[row])
            .collect::<Vec<_>>()
    }
}
