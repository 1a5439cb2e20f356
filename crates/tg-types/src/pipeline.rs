//! Pipeline identities and the closed configuration enums shared across the
//! sweep controller and the engine bridge.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::estimator::EstimatorKind;

/// The competing modeling pipelines the CV engine knows how to score.
///
/// A closed set: an unknown pipeline name cannot flow through the system,
/// it is rejected at the parsing edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipelineId {
    #[serde(rename = "STABL Lasso")]
    StablLasso,
    #[serde(rename = "STABL ALasso")]
    StablALasso,
    #[serde(rename = "STABL ElasticNet")]
    StablElasticNet,
}

impl PipelineId {
    /// Every pipeline, in canonical declaration order. Drivers pass their
    /// own evaluation order explicitly.
    pub const ALL: [PipelineId; 3] = [
        PipelineId::StablLasso,
        PipelineId::StablALasso,
        PipelineId::StablElasticNet,
    ];

    /// Human-readable name, as the engine reports it.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineId::StablLasso => "STABL Lasso",
            PipelineId::StablALasso => "STABL ALasso",
            PipelineId::StablElasticNet => "STABL ElasticNet",
        }
    }

    /// Directory-safe name: the finalized results subdirectory and the
    /// engine's prediction file are both named this.
    pub fn dir_name(&self) -> &'static str {
        match self {
            PipelineId::StablLasso => "STABL_Lasso",
            PipelineId::StablALasso => "STABL_ALasso",
            PipelineId::StablElasticNet => "STABL_ElasticNet",
        }
    }

    /// The sparse estimator this pipeline uses for feature selection.
    pub fn base_estimator(&self) -> EstimatorKind {
        match self {
            PipelineId::StablLasso => EstimatorKind::Lasso,
            PipelineId::StablALasso => EstimatorKind::ALasso,
            PipelineId::StablElasticNet => EstimatorKind::ElasticNet,
        }
    }
}

impl fmt::Display for PipelineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// What the engine is asked to predict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Regression,
    Classification,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskKind::Regression => "regression",
            TaskKind::Classification => "classification",
        };
        write!(f, "{s}")
    }
}

/// How the engine manufactures artificial features for stability selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtificialType {
    RandomPermutation,
    Knockoff,
}

impl ArtificialType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtificialType::RandomPermutation => "random_permutation",
            ArtificialType::Knockoff => "knockoff",
        }
    }
}

impl fmt::Display for ArtificialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ArtificialType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random_permutation" => Ok(ArtificialType::RandomPermutation),
            "knockoff" => Ok(ArtificialType::Knockoff),
            other => Err(format!(
                "unknown artificial type '{other}' (expected 'random_permutation' or 'knockoff')"
            )),
        }
    }
}

/// One sample's predicted outcome from a pipeline, aggregated across the
/// outer splits it was held out in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplePrediction {
    pub sample_id: String,
    pub value: f64,
}

impl SamplePrediction {
    pub fn new(sample_id: impl Into<String>, value: f64) -> Self {
        Self {
            sample_id: sample_id.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_and_dir_names() {
        assert_eq!(PipelineId::StablALasso.label(), "STABL ALasso");
        assert_eq!(PipelineId::StablALasso.dir_name(), "STABL_ALasso");
        for pipeline in PipelineId::ALL {
            assert_eq!(pipeline.dir_name(), pipeline.label().replace(' ', "_"));
        }
    }

    #[test]
    fn pipeline_serializes_as_label() {
        let json = serde_json::to_string(&PipelineId::StablElasticNet).unwrap();
        assert_eq!(json, "\"STABL ElasticNet\"");
        let back: PipelineId = serde_json::from_str("\"STABL Lasso\"").unwrap();
        assert_eq!(back, PipelineId::StablLasso);
    }

    #[test]
    fn unknown_pipeline_rejected() {
        let result: Result<PipelineId, _> = serde_json::from_str("\"STABL Ridge\"");
        assert!(result.is_err());
    }

    #[test]
    fn artificial_type_round_trip() {
        assert_eq!(
            "random_permutation".parse::<ArtificialType>().unwrap(),
            ArtificialType::RandomPermutation
        );
        assert_eq!(
            "knockoff".parse::<ArtificialType>().unwrap(),
            ArtificialType::Knockoff
        );
        assert!("gaussian".parse::<ArtificialType>().is_err());

        let json = serde_json::to_string(&ArtificialType::RandomPermutation).unwrap();
        assert_eq!(json, "\"random_permutation\"");
    }

    #[test]
    fn task_kind_wire_form() {
        let json = serde_json::to_string(&TaskKind::Regression).unwrap();
        assert_eq!(json, "\"regression\"");
    }
}
