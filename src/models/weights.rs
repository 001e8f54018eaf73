use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum composite score
pub const MAX_SCORE: f64 = 100.0;

/// Allowed drift of the weight sum from 1.0
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Errors raised while building a weight configuration
#[derive(Debug, Error, PartialEq)]
pub enum WeightsError {
    #[error("no weights configured")]
    Empty,

    #[error("unknown scoring factor: {0}")]
    UnknownFactor(String),

    #[error("unknown weight profile: {0}")]
    UnknownProfile(String),

    #[error("weight for {factor} must be finite and non-negative, got {value}")]
    InvalidWeight { factor: Factor, value: f64 },

    #[error("weights must sum to 1.0, got {0}")]
    BadSum(f64),
}

/// A named scoring signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Factor {
    Job,
    Location,
    Availability,
    Title,
    Industry,
    Skills,
    Overview,
    Pay,
}

/// Which of the three reported sub-scores a factor rolls up into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreGroup {
    Job,
    Location,
    Availability,
}

impl Factor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Factor::Job => "job",
            Factor::Location => "location",
            Factor::Availability => "availability",
            Factor::Title => "title",
            Factor::Industry => "industry",
            Factor::Skills => "skills",
            Factor::Overview => "overview",
            Factor::Pay => "pay",
        }
    }

    pub fn group(&self) -> ScoreGroup {
        match self {
            Factor::Location => ScoreGroup::Location,
            Factor::Availability => ScoreGroup::Availability,
            _ => ScoreGroup::Job,
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Factor {
    type Err = WeightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "job" => Ok(Factor::Job),
            "location" => Ok(Factor::Location),
            "availability" => Ok(Factor::Availability),
            "title" => Ok(Factor::Title),
            "industry" => Ok(Factor::Industry),
            "skills" => Ok(Factor::Skills),
            "overview" => Ok(Factor::Overview),
            "pay" => Ok(Factor::Pay),
            other => Err(WeightsError::UnknownFactor(other.to_string())),
        }
    }
}

/// Validated factor weights summing to 1.0
///
/// Two profiles ship with the service:
/// - `three_factor` (default): job 0.4, location 0.3, availability 0.3
/// - `five_factor`: title 0.25, industry 0.20, skills 0.25, overview 0.15, pay 0.15
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringWeights {
    weights: BTreeMap<Factor, f64>,
}

impl ScoringWeights {
    /// Build and validate a weight set
    pub fn new<I>(weights: I) -> Result<Self, WeightsError>
    where
        I: IntoIterator<Item = (Factor, f64)>,
    {
        let weights: BTreeMap<Factor, f64> = weights.into_iter().collect();
        if weights.is_empty() {
            return Err(WeightsError::Empty);
        }

        for (&factor, &value) in &weights {
            if !value.is_finite() || value < 0.0 {
                return Err(WeightsError::InvalidWeight { factor, value });
            }
        }

        let sum: f64 = weights.values().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightsError::BadSum(sum));
        }

        Ok(Self { weights })
    }

    /// Build from a `name -> weight` map, as found in configuration
    pub fn from_named(named: &HashMap<String, f64>) -> Result<Self, WeightsError> {
        let parsed = named
            .iter()
            .map(|(name, &value)| -> Result<(Factor, f64), WeightsError> {
                Ok((name.parse::<Factor>()?, value))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(parsed)
    }

    pub fn profile(name: &str) -> Result<Self, WeightsError> {
        match name.trim().to_lowercase().replace('-', "_").as_str() {
            "three_factor" => Ok(Self::three_factor()),
            "five_factor" => Ok(Self::five_factor()),
            other => Err(WeightsError::UnknownProfile(other.to_string())),
        }
    }

    pub fn three_factor() -> Self {
        Self {
            weights: BTreeMap::from([
                (Factor::Job, 0.40),
                (Factor::Location, 0.30),
                (Factor::Availability, 0.30),
            ]),
        }
    }

    pub fn five_factor() -> Self {
        Self {
            weights: BTreeMap::from([
                (Factor::Title, 0.25),
                (Factor::Industry, 0.20),
                (Factor::Skills, 0.25),
                (Factor::Overview, 0.15),
                (Factor::Pay, 0.15),
            ]),
        }
    }

    pub fn weight(&self, factor: Factor) -> f64 {
        self.weights.get(&factor).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, factor: Factor) -> bool {
        self.weights.contains_key(&factor)
    }

    /// Maximum points a factor can contribute to the composite score.
    ///
    /// Rounded to 1e-6 so that e.g. 0.3 maps to exactly 30.0.
    pub fn points(&self, factor: Factor) -> f64 {
        (self.weight(factor) * MAX_SCORE * 1e6).round() / 1e6
    }

    pub fn factors(&self) -> impl Iterator<Item = Factor> + '_ {
        self.weights.keys().copied()
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::three_factor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = ScoringWeights::default();
        assert_eq!(weights.points(Factor::Job), 40.0);
        assert_eq!(weights.points(Factor::Location), 30.0);
        assert_eq!(weights.points(Factor::Availability), 30.0);
        assert_eq!(weights.points(Factor::Title), 0.0);
    }

    #[test]
    fn test_builtin_profiles_validate() {
        for name in ["three_factor", "five_factor", "Five-Factor"] {
            let weights = ScoringWeights::profile(name).unwrap();
            let revalidated = ScoringWeights::new(weights.factors().map(|f| (f, weights.weight(f))));
            assert!(revalidated.is_ok(), "profile {} does not sum to 1.0", name);
        }
        assert_eq!(
            ScoringWeights::profile("ten_factor"),
            Err(WeightsError::UnknownProfile("ten_factor".into()))
        );
    }

    #[test]
    fn test_five_factor_points() {
        let weights = ScoringWeights::five_factor();
        assert_eq!(weights.points(Factor::Title), 25.0);
        assert_eq!(weights.points(Factor::Industry), 20.0);
        assert_eq!(weights.points(Factor::Pay), 15.0);
    }

    #[test]
    fn test_rejects_bad_sum() {
        let result = ScoringWeights::new([(Factor::Job, 0.5), (Factor::Location, 0.3)]);
        assert!(matches!(result, Err(WeightsError::BadSum(_))));
    }

    #[test]
    fn test_rejects_negative_weight() {
        let result = ScoringWeights::new([(Factor::Job, 1.2), (Factor::Location, -0.2)]);
        assert!(matches!(
            result,
            Err(WeightsError::InvalidWeight { factor: Factor::Location, .. })
        ));
    }

    #[test]
    fn test_from_named() {
        let named = HashMap::from([
            ("job".to_string(), 0.5),
            ("Location".to_string(), 0.5),
        ]);
        let weights = ScoringWeights::from_named(&named).unwrap();
        assert_eq!(weights.points(Factor::Job), 50.0);
        assert_eq!(weights.points(Factor::Location), 50.0);

        let named = HashMap::from([("salary".to_string(), 1.0)]);
        assert_eq!(
            ScoringWeights::from_named(&named),
            Err(WeightsError::UnknownFactor("salary".into()))
        );

        assert_eq!(ScoringWeights::from_named(&HashMap::new()), Err(WeightsError::Empty));
    }
}
