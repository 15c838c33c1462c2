use std::fmt;

/// Errors from price series construction
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesError {
    NonPositivePrice { index: usize, price: f64 },
    OutOfOrder { index: usize },
}

impl fmt::Display for SeriesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesError::NonPositivePrice { index, price } => {
                write!(f, "price at index {index} must be positive, got {price}")
            }
            SeriesError::OutOfOrder { index } => {
                write!(f, "dates must be strictly increasing, violated at index {index}")
            }
        }
    }
}

impl std::error::Error for SeriesError {}

/// Errors from return derivation, drawdown analysis, and distribution fitting
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// The input series is too short for the requested computation
    InsufficientData {
        context: &'static str,
        required: usize,
        actual: usize,
    },
    /// Every candidate family failed to produce a usable fit
    NoFitConverged { attempted: usize },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InsufficientData {
                context,
                required,
                actual,
            } => {
                write!(
                    f,
                    "{context} requires at least {required} observations, got {actual}"
                )
            }
            AnalysisError::NoFitConverged { attempted } => {
                write!(f, "none of the {attempted} candidate distributions fit")
            }
        }
    }
}

impl std::error::Error for AnalysisError {}

/// Errors from simulation configuration validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NonPositiveHorizon { years: f64 },
    ZeroRuns,
    NonPositivePrice { price: f64 },
    NegativeInvestment { amount: f64 },
    PercentileOutOfRange { percentile: f64 },
    EmptyPercentiles,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveHorizon { years } => {
                write!(f, "simulation horizon must be positive, got {years} years")
            }
            ConfigError::ZeroRuns => write!(f, "simulation requires at least one run"),
            ConfigError::NonPositivePrice { price } => {
                write!(f, "initial price must be positive, got {price}")
            }
            ConfigError::NegativeInvestment { amount } => {
                write!(f, "initial investment must be non-negative, got {amount}")
            }
            ConfigError::PercentileOutOfRange { percentile } => {
                write!(
                    f,
                    "percentile must lie strictly between 0 and 100, got {percentile}"
                )
            }
            ConfigError::EmptyPercentiles => {
                write!(f, "at least one percentile must be requested")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors from distribution parameter estimation and sampler construction
#[derive(Debug, Clone, PartialEq)]
pub enum DistributionError {
    InvalidParameters {
        family: &'static str,
        reason: &'static str,
    },
    Unfittable {
        family: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for DistributionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionError::InvalidParameters { family, reason } => {
                write!(f, "invalid {family} parameters: {reason}")
            }
            DistributionError::Unfittable { family, reason } => {
                write!(f, "{family} could not be fitted: {reason}")
            }
        }
    }
}

impl std::error::Error for DistributionError {}

/// Errors from Monte Carlo path generation
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    Config(ConfigError),
    Distribution(DistributionError),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Config(e) => write!(f, "{e}"),
            SimulationError::Distribution(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Config(e) => Some(e),
            SimulationError::Distribution(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(err: ConfigError) -> Self {
        SimulationError::Config(err)
    }
}

impl From<DistributionError> for SimulationError {
    fn from(err: DistributionError) -> Self {
        SimulationError::Distribution(err)
    }
}
