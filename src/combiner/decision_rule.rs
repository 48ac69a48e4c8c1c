//! The fixed rule that fuses two binary outputs
//! into a three-class prediction.

use serde::{Serialize, Deserialize};

use crate::error::{CombinerError, Result};


/// A combined prediction for one sample.
/// Holds the predicted class
/// together with the raw outputs of the two sub-learners.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// The predicted class index.
    /// One of `{0, 1, 2}` or the configured confusion target.
    pub class: usize,
    /// Raw output of the first sub-learner.
    pub output1: f64,
    /// Raw output of the second sub-learner.
    pub output2: f64,
    /// Whether the two sub-learners disagreed in the way
    /// no real class explains
    /// (the first said "class 0", the second said "class 2").
    pub conflict: bool,
}


/// Rounds a raw sub-learner output to its binary indicator.
fn indicator(output: f64) -> Result<u8> {
    let rounded = output.round();
    if rounded == 0.0 {
        Ok(0)
    } else if rounded == 1.0 {
        Ok(1)
    } else {
        Err(CombinerError::InvalidOutputRange { output, rounded })
    }
}


/// Combines two binary sub-learner outputs
/// into a three-class [`Prediction`].
///
/// Both outputs are rounded to indicators `a, b ∈ {0, 1}`;
/// the class is then read from a fixed table:
///
/// | `a` | `b` | class              |
/// |-----|-----|--------------------|
/// | 0   | 0   | 0                  |
/// | 1   | 0   | 1                  |
/// | 1   | 1   | 2                  |
/// | 0   | 1   | `confusion_target` |
///
/// The `(0, 1)` row is the sole conflict case:
/// the first learner votes "class 0"
/// while the second votes "class 2."
/// Outputs that round outside `{0, 1}` fail with
/// [`CombinerError::InvalidOutputRange`].
///
/// This is a pure function of its three arguments.
///
/// # Example
/// ```
/// use triboost::combine;
///
/// let p = combine(0.9, 0.2, 0).unwrap();
/// assert_eq!(p.class, 1);
/// assert!(!p.conflict);
/// ```
pub fn combine(
    output1: f64,
    output2: f64,
    confusion_target: usize,
) -> Result<Prediction>
{
    let a = indicator(output1)?;
    let b = indicator(output2)?;

    let (class, conflict) = match (a, b) {
        (0, 0) => (0, false),
        (1, 0) => (1, false),
        (1, 1) => (2, false),
        _ => (confusion_target, true),
    };

    Ok(Prediction { class, output1, output2, conflict })
}
