use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MvpaError;

/// Central configuration for class balancing.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BalanceConfig {
    pub method: BalanceMethod,

    /// Draw oversampled rows with replacement.
    pub replace: bool,

    /// Seed for a dedicated generator. `None` uses the thread-local generator.
    pub seed: Option<u64>,

    /// Classes to balance over. `None` discovers them from the labels.
    pub classes: Option<Vec<usize>>,
}

impl BalanceConfig {
    pub fn new(method: BalanceMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn with_replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_classes(mut self, classes: Vec<usize>) -> Self {
        self.classes = Some(classes);
        self
    }
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            method: BalanceMethod::Oversample,
            replace: true,
            seed: None,
            classes: None,
        }
    }
}

/// Supported balancing strategies.
///
/// Parsed from `"oversample"`, `"undersample"` or a non-negative integer
/// target count. In serialized configs the target count may also be given
/// as a bare JSON integer.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "MethodRepr", into = "MethodRepr")]
pub enum BalanceMethod {
    /// Duplicate rows of the smaller classes up to the largest class count.
    Oversample,
    /// Remove rows of the larger classes down to the smallest class count.
    Undersample,
    /// Resample every class to exactly this many rows.
    TargetCount(usize),
}

impl FromStr for BalanceMethod {
    type Err = MvpaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        match token.to_lowercase().as_str() {
            "oversample" => Ok(BalanceMethod::Oversample),
            "undersample" => Ok(BalanceMethod::Undersample),
            other => other
                .parse::<usize>()
                .map(BalanceMethod::TargetCount)
                .map_err(|_| MvpaError::InvalidMethod(token.to_string())),
        }
    }
}

impl fmt::Display for BalanceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceMethod::Oversample => write!(f, "oversample"),
            BalanceMethod::Undersample => write!(f, "undersample"),
            BalanceMethod::TargetCount(num) => write!(f, "{}", num),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(untagged)]
enum MethodRepr {
    Count(u64),
    Name(String),
}

impl TryFrom<MethodRepr> for BalanceMethod {
    type Error = MvpaError;

    fn try_from(value: MethodRepr) -> Result<Self, Self::Error> {
        match value {
            MethodRepr::Count(n) => usize::try_from(n)
                .map(BalanceMethod::TargetCount)
                .map_err(|_| MvpaError::InvalidMethod(n.to_string())),
            MethodRepr::Name(s) => s.parse(),
        }
    }
}

impl From<BalanceMethod> for MethodRepr {
    fn from(value: BalanceMethod) -> Self {
        match value {
            BalanceMethod::TargetCount(num) => MethodRepr::Count(num as u64),
            other => MethodRepr::Name(other.to_string()),
        }
    }
}
