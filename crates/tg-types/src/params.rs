//! Sweep parameter vocabulary: values, dimensions, and grid points.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A concrete hyperparameter value carried through a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
}

impl ParamValue {
    /// Integer view. Floats never narrow.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Float(_) => None,
        }
    }

    /// Numeric view. Integers widen losslessly.
    pub fn as_float(&self) -> f64 {
        match self {
            Self::Int(v) => *v as f64,
            Self::Float(v) => *v,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

/// A single swept dimension: a named, ordered list of candidate values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepDimension {
    /// Hyperparameter name as the estimator knows it (e.g. "max_depth").
    pub name: String,
    /// Candidate values, tried in the order given.
    pub values: Vec<ParamValue>,
}

impl SweepDimension {
    pub fn new(name: impl Into<String>, values: Vec<ParamValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn ints(name: impl Into<String>, values: &[i64]) -> Self {
        Self::new(name, values.iter().copied().map(ParamValue::Int).collect())
    }

    pub fn floats(name: impl Into<String>, values: &[f64]) -> Self {
        Self::new(name, values.iter().copied().map(ParamValue::Float).collect())
    }
}

/// One grid point: an ordered assignment of one value per dimension.
///
/// Pair order follows dimension order, so two combinations from the same
/// grid always compare and display field-for-field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamCombination {
    pub pairs: Vec<(String, ParamValue)>,
}

impl ParamCombination {
    pub fn new(pairs: Vec<(String, ParamValue)>) -> Self {
        Self { pairs }
    }

    pub fn get(&self, name: &str) -> Option<ParamValue> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for ParamCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in &self.pairs {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{name}={value}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_value_views() {
        assert_eq!(ParamValue::Int(300).as_int(), Some(300));
        assert_eq!(ParamValue::Float(0.5).as_int(), None);
        assert_eq!(ParamValue::Int(2).as_float(), 2.0);
        assert_eq!(ParamValue::Float(0.05).as_float(), 0.05);
    }

    #[test]
    fn param_value_untagged_serialization() {
        let json = serde_json::to_string(&ParamValue::Int(300)).unwrap();
        assert_eq!(json, "300");
        let back: ParamValue = serde_json::from_str("300").unwrap();
        assert_eq!(back, ParamValue::Int(300));

        let json = serde_json::to_string(&ParamValue::Float(0.5)).unwrap();
        assert_eq!(json, "0.5");
        let back: ParamValue = serde_json::from_str("0.5").unwrap();
        assert_eq!(back, ParamValue::Float(0.5));
    }

    #[test]
    fn combination_lookup_and_display() {
        let combo = ParamCombination::new(vec![
            ("n_estimators".to_string(), ParamValue::Int(300)),
            ("learning_rate".to_string(), ParamValue::Float(0.01)),
        ]);

        assert_eq!(combo.get("n_estimators"), Some(ParamValue::Int(300)));
        assert_eq!(combo.get("missing"), None);
        assert_eq!(combo.len(), 2);
        assert_eq!(combo.to_string(), "n_estimators=300, learning_rate=0.01");
    }

    #[test]
    fn dimension_helpers_preserve_order() {
        let dim = SweepDimension::ints("max_depth", &[2, 4, 10]);
        assert_eq!(
            dim.values,
            vec![ParamValue::Int(2), ParamValue::Int(4), ParamValue::Int(10)]
        );

        let dim = SweepDimension::floats("subsample", &[0.5, 0.7]);
        assert_eq!(dim.name, "subsample");
        assert_eq!(dim.values.len(), 2);
    }
}
