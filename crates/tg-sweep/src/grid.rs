//! Exhaustive enumeration of a hyperparameter grid.

use std::collections::HashSet;

use tg_types::{config_error, ParamCombination, ParamValue, SweepDimension, SweepError, SweepResult};

/// The full Cartesian product of a set of sweep dimensions.
///
/// Dimension order and candidate order are preserved, and the last
/// dimension varies fastest: combination `i` reads as the mixed-radix
/// digits of `i` with one digit per dimension.
#[derive(Debug, Clone)]
pub struct ParamGrid {
    dimensions: Vec<SweepDimension>,
    combos: Vec<ParamCombination>,
}

impl ParamGrid {
    /// Validate the dimensions and enumerate every combination up front.
    ///
    /// A dimension with no candidate values and a repeated dimension name
    /// are both rejected: either would silently change what the sweep
    /// covers.
    pub fn new(dimensions: Vec<SweepDimension>) -> SweepResult<Self> {
        let mut names: HashSet<&str> = HashSet::new();
        for dim in &dimensions {
            if dim.values.is_empty() {
                return Err(config_error!(
                    "sweep dimension '{}' has no candidate values",
                    dim.name
                ));
            }
            if !names.insert(dim.name.as_str()) {
                return Err(config_error!("duplicate sweep dimension '{}'", dim.name));
            }
        }

        let combos = Self::build_combos(&dimensions);
        Ok(Self { dimensions, combos })
    }

    fn build_combos(dimensions: &[SweepDimension]) -> Vec<ParamCombination> {
        let mut result: Vec<Vec<(String, ParamValue)>> = vec![Vec::new()];
        for dim in dimensions {
            let mut next = Vec::with_capacity(result.len() * dim.values.len());
            for existing in &result {
                for value in &dim.values {
                    let mut pairs = existing.clone();
                    pairs.push((dim.name.clone(), *value));
                    next.push(pairs);
                }
            }
            result = next;
        }
        result.into_iter().map(ParamCombination::new).collect()
    }

    /// Number of combinations: the product of the dimension sizes.
    pub fn len(&self) -> usize {
        self.combos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combos.is_empty()
    }

    pub fn dimensions(&self) -> &[SweepDimension] {
        &self.dimensions
    }

    /// Every combination, in enumeration order.
    pub fn combinations(&self) -> &[ParamCombination] {
        &self.combos
    }
}
