//! Candidate distribution families, parameter estimation, and sampling
//!
//! Each family carries its own deterministic estimator (moment matching or a
//! fixed-grid likelihood search), its density for goodness-of-fit scoring,
//! and a prepared sampler for path simulation. The catalog order here is the
//! tiebreak order used when two candidates score identically.

use std::f64::consts::PI;

use rand::Rng;
use rand_distr::Distribution;
use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, ContinuousCDF};
use statrs::function::gamma::ln_gamma;

use crate::error::DistributionError;
use crate::percentiles::percentile_of_sorted;

/// Number of degrees-of-freedom candidates in the Student's t grid search.
const STUDENT_T_GRID_STEPS: usize = 500;
/// Degrees-of-freedom search range; the lower end keeps the variance finite.
const STUDENT_T_DF_RANGE: (f64, f64) = (2.05, 200.0);
/// Shape candidates for the Skew-Cauchy profile search: -0.9..=0.9 step 0.1.
const SKEW_CAUCHY_SHAPE_STEPS: usize = 19;
/// Scale candidates per shape, log-spaced over half-IQR x [0.1, 10].
const SKEW_CAUCHY_SCALE_STEPS: usize = 21;
/// Offset applied below the sample minimum when a shifted family needs
/// strictly positive support, as a fraction of the sample range.
const SUPPORT_MARGIN: f64 = 1e-3;

/// One-pass summary of a return sample, shared by every family's estimator.
#[derive(Debug, Clone)]
pub struct SampleMoments {
    pub n: usize,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub skewness: f64,
    pub excess_kurtosis: f64,
    pub min: f64,
    pub max: f64,
    sorted: Vec<f64>,
}

impl SampleMoments {
    /// Summarize a sample. Returns None for fewer than two observations.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let n = sorted.len() as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
        for &x in &sorted {
            let d = x - mean;
            let d2 = d * d;
            m2 += d2;
            m3 += d2 * d;
            m4 += d2 * d2;
        }
        m2 /= n;
        m3 /= n;
        m4 /= n;

        let skewness = if m2 > 0.0 { m3 / m2.powf(1.5) } else { f64::NAN };
        let excess_kurtosis = if m2 > 0.0 { m4 / (m2 * m2) - 3.0 } else { f64::NAN };

        Some(Self {
            n: sorted.len(),
            mean,
            std_dev: m2.sqrt(),
            skewness,
            excess_kurtosis,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            sorted,
        })
    }

    /// Empirical quantile for q in [0, 1], linearly interpolated.
    #[must_use]
    pub fn quantile(&self, q: f64) -> f64 {
        percentile_of_sorted(&self.sorted, q * 100.0)
    }

    #[must_use]
    pub fn median(&self) -> f64 {
        self.quantile(0.5)
    }

    /// Interquartile range.
    #[must_use]
    pub fn iqr(&self) -> f64 {
        self.quantile(0.75) - self.quantile(0.25)
    }

    #[must_use]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Sample values in ascending order.
    #[must_use]
    pub fn sorted(&self) -> &[f64] {
        &self.sorted
    }
}

/// Catalog of candidate families, in fitting and tiebreak order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistributionFamily {
    Normal,
    StudentT,
    LogNormal,
    GeneralizedNormal,
    Laplace,
    Exponential,
    Cauchy,
    SkewCauchy,
    SkewNormal,
    Gamma,
    Beta,
}

impl DistributionFamily {
    /// Every supported family, in catalog order.
    pub const CATALOG: [DistributionFamily; 11] = [
        DistributionFamily::Normal,
        DistributionFamily::StudentT,
        DistributionFamily::LogNormal,
        DistributionFamily::GeneralizedNormal,
        DistributionFamily::Laplace,
        DistributionFamily::Exponential,
        DistributionFamily::Cauchy,
        DistributionFamily::SkewCauchy,
        DistributionFamily::SkewNormal,
        DistributionFamily::Gamma,
        DistributionFamily::Beta,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DistributionFamily::Normal => "Normal",
            DistributionFamily::StudentT => "Student's t",
            DistributionFamily::LogNormal => "Log-normal",
            DistributionFamily::GeneralizedNormal => "Generalized normal",
            DistributionFamily::Laplace => "Laplace",
            DistributionFamily::Exponential => "Exponential",
            DistributionFamily::Cauchy => "Cauchy",
            DistributionFamily::SkewCauchy => "Skew-Cauchy",
            DistributionFamily::SkewNormal => "Skew-normal",
            DistributionFamily::Gamma => "Gamma",
            DistributionFamily::Beta => "Beta",
        }
    }

    /// Estimate this family's parameters from the sample.
    ///
    /// Estimation is fully deterministic. A sample outside the family's
    /// domain (zero variance, variance too large for a bounded family, and
    /// so on) yields `DistributionError::Unfittable` rather than a bogus
    /// parameter set.
    pub fn fit(&self, sample: &SampleMoments) -> Result<FittedDistribution, DistributionError> {
        match self {
            DistributionFamily::Normal => fit_normal(sample),
            DistributionFamily::StudentT => fit_student_t(sample),
            DistributionFamily::LogNormal => fit_log_normal(sample),
            DistributionFamily::GeneralizedNormal => fit_generalized_normal(sample),
            DistributionFamily::Laplace => fit_laplace(sample),
            DistributionFamily::Exponential => fit_exponential(sample),
            DistributionFamily::Cauchy => fit_cauchy(sample),
            DistributionFamily::SkewCauchy => fit_skew_cauchy(sample),
            DistributionFamily::SkewNormal => fit_skew_normal(sample),
            DistributionFamily::Gamma => fit_gamma(sample),
            DistributionFamily::Beta => fit_beta(sample),
        }
    }
}

/// A fitted distribution's parameter set.
///
/// For the shifted families (`LogNormal`, `Exponential`, `Gamma`, `Beta`)
/// `location` moves the support so the family can model returns that take
/// negative values. `LogNormal`'s `mean`/`std_dev` parameterize the
/// underlying normal of ln(x - location).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FittedDistribution {
    Normal {
        mean: f64,
        std_dev: f64,
    },
    StudentT {
        mean: f64,
        scale: f64,
        df: f64,
    },
    LogNormal {
        location: f64,
        mean: f64,
        std_dev: f64,
    },
    GeneralizedNormal {
        mean: f64,
        alpha: f64,
        beta: f64,
    },
    Laplace {
        location: f64,
        scale: f64,
    },
    Exponential {
        location: f64,
        scale: f64,
    },
    Cauchy {
        location: f64,
        scale: f64,
    },
    SkewCauchy {
        shape: f64,
        location: f64,
        scale: f64,
    },
    SkewNormal {
        shape: f64,
        location: f64,
        scale: f64,
    },
    Gamma {
        location: f64,
        shape: f64,
        scale: f64,
    },
    Beta {
        location: f64,
        scale: f64,
        alpha: f64,
        beta: f64,
    },
}

impl FittedDistribution {
    #[must_use]
    pub fn family(&self) -> DistributionFamily {
        match self {
            FittedDistribution::Normal { .. } => DistributionFamily::Normal,
            FittedDistribution::StudentT { .. } => DistributionFamily::StudentT,
            FittedDistribution::LogNormal { .. } => DistributionFamily::LogNormal,
            FittedDistribution::GeneralizedNormal { .. } => DistributionFamily::GeneralizedNormal,
            FittedDistribution::Laplace { .. } => DistributionFamily::Laplace,
            FittedDistribution::Exponential { .. } => DistributionFamily::Exponential,
            FittedDistribution::Cauchy { .. } => DistributionFamily::Cauchy,
            FittedDistribution::SkewCauchy { .. } => DistributionFamily::SkewCauchy,
            FittedDistribution::SkewNormal { .. } => DistributionFamily::SkewNormal,
            FittedDistribution::Gamma { .. } => DistributionFamily::Gamma,
            FittedDistribution::Beta { .. } => DistributionFamily::Beta,
        }
    }

    /// Probability density at `x`.
    ///
    /// Returns NaN when the parameter set is outside the family's domain,
    /// which poisons any score computed from it and excludes the candidate.
    #[must_use]
    pub fn density(&self, x: f64) -> f64 {
        match self {
            FittedDistribution::Normal { mean, std_dev } => {
                statrs::distribution::Normal::new(*mean, *std_dev)
                    .map(|d| d.pdf(x))
                    .unwrap_or(f64::NAN)
            }
            FittedDistribution::StudentT { mean, scale, df } => {
                statrs::distribution::StudentsT::new(*mean, *scale, *df)
                    .map(|d| d.pdf(x))
                    .unwrap_or(f64::NAN)
            }
            FittedDistribution::LogNormal {
                location,
                mean,
                std_dev,
            } => statrs::distribution::LogNormal::new(*mean, *std_dev)
                .map(|d| d.pdf(x - location))
                .unwrap_or(f64::NAN),
            FittedDistribution::GeneralizedNormal { mean, alpha, beta } => {
                generalized_normal_pdf(x, *mean, *alpha, *beta)
            }
            FittedDistribution::Laplace { location, scale } => {
                statrs::distribution::Laplace::new(*location, *scale)
                    .map(|d| d.pdf(x))
                    .unwrap_or(f64::NAN)
            }
            // statrs parameterizes the exponential by its rate
            FittedDistribution::Exponential { location, scale } => {
                statrs::distribution::Exp::new(1.0 / *scale)
                    .map(|d| d.pdf(x - location))
                    .unwrap_or(f64::NAN)
            }
            FittedDistribution::Cauchy { location, scale } => {
                statrs::distribution::Cauchy::new(*location, *scale)
                    .map(|d| d.pdf(x))
                    .unwrap_or(f64::NAN)
            }
            FittedDistribution::SkewCauchy {
                shape,
                location,
                scale,
            } => skew_cauchy_pdf(x, *shape, *location, *scale),
            FittedDistribution::SkewNormal {
                shape,
                location,
                scale,
            } => skew_normal_pdf(x, *shape, *location, *scale),
            // statrs Gamma also takes a rate, not a scale
            FittedDistribution::Gamma {
                location,
                shape,
                scale,
            } => statrs::distribution::Gamma::new(*shape, 1.0 / *scale)
                .map(|d| d.pdf(x - location))
                .unwrap_or(f64::NAN),
            FittedDistribution::Beta {
                location,
                scale,
                alpha,
                beta,
            } => statrs::distribution::Beta::new(*alpha, *beta)
                .map(|d| d.pdf((x - location) / scale) / scale)
                .unwrap_or(f64::NAN),
        }
    }

    /// Build the prepared sampler for this parameter set.
    ///
    /// Validation happens once here so the per-draw path is infallible.
    pub fn sampler(&self) -> Result<ReturnSampler, DistributionError> {
        match self {
            // rand_distr's Normal accepts any finite std_dev, negatives
            // included, so the sign check has to happen here
            FittedDistribution::Normal { mean, std_dev } => {
                if !(std_dev.is_finite() && *std_dev > 0.0) {
                    return Err(DistributionError::InvalidParameters {
                        family: "Normal",
                        reason: "std_dev must be positive and finite",
                    });
                }
                rand_distr::Normal::new(*mean, *std_dev)
                    .map(ReturnSampler::Normal)
                    .map_err(|_| DistributionError::InvalidParameters {
                        family: "Normal",
                        reason: "std_dev must be positive and finite",
                    })
            }
            FittedDistribution::StudentT { mean, scale, df } => {
                if !(scale.is_finite() && *scale > 0.0) {
                    return Err(DistributionError::InvalidParameters {
                        family: "Student's t",
                        reason: "scale must be positive and finite",
                    });
                }
                rand_distr::StudentT::new(*df)
                    .map(|d| ReturnSampler::StudentT {
                        mean: *mean,
                        scale: *scale,
                        standard: d,
                    })
                    .map_err(|_| DistributionError::InvalidParameters {
                        family: "Student's t",
                        reason: "degrees of freedom must be positive and finite",
                    })
            }
            FittedDistribution::LogNormal {
                location,
                mean,
                std_dev,
            } => {
                if !(std_dev.is_finite() && *std_dev > 0.0) {
                    return Err(DistributionError::InvalidParameters {
                        family: "Log-normal",
                        reason: "std_dev must be positive and finite",
                    });
                }
                rand_distr::LogNormal::new(*mean, *std_dev)
                    .map(|d| ReturnSampler::LogNormal {
                        location: *location,
                        inner: d,
                    })
                    .map_err(|_| DistributionError::InvalidParameters {
                        family: "Log-normal",
                        reason: "std_dev must be positive and finite",
                    })
            }
            FittedDistribution::GeneralizedNormal { mean, alpha, beta } => {
                if !(alpha.is_finite() && *alpha > 0.0) {
                    return Err(DistributionError::InvalidParameters {
                        family: "Generalized normal",
                        reason: "alpha must be positive and finite",
                    });
                }
                // |x - mean|^beta scaled by alpha^beta is Gamma(1/beta, 1)
                rand_distr::Gamma::new(1.0 / beta, 1.0)
                    .map(|g| ReturnSampler::GeneralizedNormal {
                        mean: *mean,
                        alpha: *alpha,
                        inv_beta: 1.0 / beta,
                        magnitude: g,
                    })
                    .map_err(|_| DistributionError::InvalidParameters {
                        family: "Generalized normal",
                        reason: "beta must be positive and finite",
                    })
            }
            FittedDistribution::Laplace { location, scale } => {
                if !(scale.is_finite() && *scale > 0.0) {
                    return Err(DistributionError::InvalidParameters {
                        family: "Laplace",
                        reason: "scale must be positive and finite",
                    });
                }
                Ok(ReturnSampler::Laplace {
                    location: *location,
                    scale: *scale,
                })
            }
            FittedDistribution::Exponential { location, scale } => {
                if !(scale.is_finite() && *scale > 0.0) {
                    return Err(DistributionError::InvalidParameters {
                        family: "Exponential",
                        reason: "scale must be positive and finite",
                    });
                }
                rand_distr::Exp::new(1.0 / scale)
                    .map(|d| ReturnSampler::Exponential {
                        location: *location,
                        inner: d,
                    })
                    .map_err(|_| DistributionError::InvalidParameters {
                        family: "Exponential",
                        reason: "scale must be positive and finite",
                    })
            }
            FittedDistribution::Cauchy { location, scale } => {
                rand_distr::Cauchy::new(*location, *scale)
                    .map(ReturnSampler::Cauchy)
                    .map_err(|_| DistributionError::InvalidParameters {
                        family: "Cauchy",
                        reason: "scale must be positive and finite",
                    })
            }
            FittedDistribution::SkewCauchy {
                shape,
                location,
                scale,
            } => {
                if !(scale.is_finite() && *scale > 0.0) || shape.abs() >= 1.0 {
                    return Err(DistributionError::InvalidParameters {
                        family: "Skew-Cauchy",
                        reason: "scale must be positive and |shape| must be below 1",
                    });
                }
                Ok(ReturnSampler::SkewCauchy {
                    shape: *shape,
                    location: *location,
                    scale: *scale,
                })
            }
            FittedDistribution::SkewNormal {
                shape,
                location,
                scale,
            } => rand_distr::SkewNormal::new(*location, *scale, *shape)
                .map(ReturnSampler::SkewNormal)
                .map_err(|_| DistributionError::InvalidParameters {
                    family: "Skew-normal",
                    reason: "scale must be positive and shape finite",
                }),
            // rand_distr's Gamma takes (shape, scale), unlike statrs
            FittedDistribution::Gamma {
                location,
                shape,
                scale,
            } => rand_distr::Gamma::new(*shape, *scale)
                .map(|d| ReturnSampler::Gamma {
                    location: *location,
                    inner: d,
                })
                .map_err(|_| DistributionError::InvalidParameters {
                    family: "Gamma",
                    reason: "shape and scale must be positive and finite",
                }),
            FittedDistribution::Beta {
                location,
                scale,
                alpha,
                beta,
            } => {
                if !(scale.is_finite() && *scale > 0.0) {
                    return Err(DistributionError::InvalidParameters {
                        family: "Beta",
                        reason: "scale must be positive and finite",
                    });
                }
                rand_distr::Beta::new(*alpha, *beta)
                    .map(|d| ReturnSampler::Beta {
                        location: *location,
                        scale: *scale,
                        inner: d,
                    })
                    .map_err(|_| DistributionError::InvalidParameters {
                        family: "Beta",
                        reason: "alpha and beta must be positive and finite",
                    })
            }
        }
    }
}

/// Prepared sampler for one fitted distribution.
///
/// Families missing from `rand_distr` (Laplace, Skew-Cauchy) draw through
/// their closed-form inverse CDF; the generalized normal uses the gamma
/// power transform.
#[derive(Debug, Clone)]
pub enum ReturnSampler {
    Normal(rand_distr::Normal<f64>),
    StudentT {
        mean: f64,
        scale: f64,
        standard: rand_distr::StudentT<f64>,
    },
    LogNormal {
        location: f64,
        inner: rand_distr::LogNormal<f64>,
    },
    GeneralizedNormal {
        mean: f64,
        alpha: f64,
        inv_beta: f64,
        magnitude: rand_distr::Gamma<f64>,
    },
    Laplace {
        location: f64,
        scale: f64,
    },
    Exponential {
        location: f64,
        inner: rand_distr::Exp<f64>,
    },
    Cauchy(rand_distr::Cauchy<f64>),
    SkewCauchy {
        shape: f64,
        location: f64,
        scale: f64,
    },
    SkewNormal(rand_distr::SkewNormal<f64>),
    Gamma {
        location: f64,
        inner: rand_distr::Gamma<f64>,
    },
    Beta {
        location: f64,
        scale: f64,
        inner: rand_distr::Beta<f64>,
    },
}

impl ReturnSampler {
    /// Draw one period return.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            ReturnSampler::Normal(d) => d.sample(rng),
            ReturnSampler::StudentT {
                mean,
                scale,
                standard,
            } => mean + scale * standard.sample(rng),
            ReturnSampler::LogNormal { location, inner } => location + inner.sample(rng),
            ReturnSampler::GeneralizedNormal {
                mean,
                alpha,
                inv_beta,
                magnitude,
            } => {
                let deviation = alpha * magnitude.sample(rng).powf(*inv_beta);
                if rng.random::<bool>() {
                    mean + deviation
                } else {
                    mean - deviation
                }
            }
            ReturnSampler::Laplace { location, scale } => {
                let u: f64 = rng.random::<f64>() - 0.5;
                // Guard ln(0) at u = -0.5
                let t = (1.0 - 2.0 * u.abs()).max(f64::MIN_POSITIVE);
                location - scale * u.signum() * t.ln()
            }
            ReturnSampler::Cauchy(d) => d.sample(rng),
            ReturnSampler::SkewCauchy {
                shape,
                location,
                scale,
            } => {
                let u = rng.random::<f64>().max(f64::MIN_POSITIVE);
                let split = (1.0 - shape) / 2.0;
                let z = if u < split {
                    let side = 1.0 - shape;
                    side * (PI * u / side - PI / 2.0).tan()
                } else {
                    let side = 1.0 + shape;
                    side * (PI * (u - split) / side).tan()
                };
                location + scale * z
            }
            ReturnSampler::SkewNormal(d) => d.sample(rng),
            ReturnSampler::Exponential { location, inner } => location + inner.sample(rng),
            ReturnSampler::Gamma { location, inner } => location + inner.sample(rng),
            ReturnSampler::Beta {
                location,
                scale,
                inner,
            } => location + scale * inner.sample(rng),
        }
    }
}

// ============================================================================
// Per-family estimators
// ============================================================================

fn fit_normal(sample: &SampleMoments) -> Result<FittedDistribution, DistributionError> {
    if !(sample.std_dev.is_finite() && sample.std_dev > 0.0) {
        return Err(DistributionError::Unfittable {
            family: "Normal",
            reason: "sample variance must be positive",
        });
    }
    Ok(FittedDistribution::Normal {
        mean: sample.mean,
        std_dev: sample.std_dev,
    })
}

/// Grid-search MLE over degrees of freedom, with the scale moment-matched to
/// the sample variance at each grid point (Var = scale^2 * df / (df - 2)).
fn fit_student_t(sample: &SampleMoments) -> Result<FittedDistribution, DistributionError> {
    if !(sample.std_dev.is_finite() && sample.std_dev > 0.0) {
        return Err(DistributionError::Unfittable {
            family: "Student's t",
            reason: "sample variance must be positive",
        });
    }
    let (df_min, df_max) = STUDENT_T_DF_RANGE;
    let n = sample.n as f64;
    let mut best: Option<(f64, f64, f64)> = None; // (log-likelihood, df, scale)
    for i in 0..STUDENT_T_GRID_STEPS {
        let df = df_min + (df_max - df_min) * i as f64 / (STUDENT_T_GRID_STEPS - 1) as f64;
        let scale = sample.std_dev * ((df - 2.0) / df).sqrt();
        let ln_norm =
            ln_gamma((df + 1.0) / 2.0) - ln_gamma(df / 2.0) - 0.5 * (df * PI).ln() - scale.ln();
        let tail: f64 = sample
            .sorted()
            .iter()
            .map(|&x| {
                let z = (x - sample.mean) / scale;
                (1.0 + z * z / df).ln()
            })
            .sum();
        let ll = n * ln_norm - 0.5 * (df + 1.0) * tail;
        if ll.is_finite() && best.is_none_or(|(b, _, _)| ll > b) {
            best = Some((ll, df, scale));
        }
    }
    let (_, df, scale) = best.ok_or(DistributionError::Unfittable {
        family: "Student's t",
        reason: "likelihood not finite for any degrees of freedom",
    })?;
    Ok(FittedDistribution::StudentT {
        mean: sample.mean,
        scale,
        df,
    })
}

/// Three-parameter log-normal: the support threshold comes from the quantile
/// estimator (min*max - median^2) / (min + max - 2*median) when that lands
/// strictly below the minimum, otherwise from a small offset under it.
fn fit_log_normal(sample: &SampleMoments) -> Result<FittedDistribution, DistributionError> {
    let range = sample.range();
    if !(range.is_finite() && range > 0.0) {
        return Err(DistributionError::Unfittable {
            family: "Log-normal",
            reason: "sample range must be positive",
        });
    }
    let median = sample.median();
    let denom = sample.min + sample.max - 2.0 * median;
    let fallback = sample.min - SUPPORT_MARGIN * range;
    let location = if denom.abs() > f64::EPSILON {
        let candidate = (sample.min * sample.max - median * median) / denom;
        if candidate.is_finite() && candidate < sample.min {
            candidate
        } else {
            fallback
        }
    } else {
        fallback
    };

    let n = sample.n as f64;
    let mean_log = sample
        .sorted()
        .iter()
        .map(|&x| (x - location).ln())
        .sum::<f64>()
        / n;
    let var_log = sample
        .sorted()
        .iter()
        .map(|&x| ((x - location).ln() - mean_log).powi(2))
        .sum::<f64>()
        / n;
    let std_log = var_log.sqrt();
    if !(mean_log.is_finite() && std_log.is_finite() && std_log > 0.0) {
        return Err(DistributionError::Unfittable {
            family: "Log-normal",
            reason: "log-scale variance must be positive",
        });
    }
    Ok(FittedDistribution::LogNormal {
        location,
        mean: mean_log,
        std_dev: std_log,
    })
}

/// Excess kurtosis of the generalized normal as a function of its shape.
/// Monotone decreasing: heavy tails below beta = 2, sub-Gaussian above.
fn generalized_normal_excess_kurtosis(beta: f64) -> f64 {
    (ln_gamma(5.0 / beta) + ln_gamma(1.0 / beta) - 2.0 * ln_gamma(3.0 / beta)).exp() - 3.0
}

/// Match the sample's excess kurtosis by bisecting on the shape, then set
/// the scale from the variance relation Var = alpha^2 * G(3/b) / G(1/b).
fn fit_generalized_normal(sample: &SampleMoments) -> Result<FittedDistribution, DistributionError> {
    if !(sample.std_dev.is_finite() && sample.std_dev > 0.0) {
        return Err(DistributionError::Unfittable {
            family: "Generalized normal",
            reason: "sample variance must be positive",
        });
    }
    if !sample.excess_kurtosis.is_finite() {
        return Err(DistributionError::Unfittable {
            family: "Generalized normal",
            reason: "sample kurtosis is not finite",
        });
    }
    let target = sample.excess_kurtosis;
    let (mut lo, mut hi) = (0.2, 20.0);
    let beta = if target >= generalized_normal_excess_kurtosis(lo) {
        lo
    } else if target <= generalized_normal_excess_kurtosis(hi) {
        hi
    } else {
        for _ in 0..80 {
            let mid = 0.5 * (lo + hi);
            if generalized_normal_excess_kurtosis(mid) > target {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        0.5 * (lo + hi)
    };
    let alpha = sample.std_dev * (0.5 * (ln_gamma(1.0 / beta) - ln_gamma(3.0 / beta))).exp();
    if !(alpha.is_finite() && alpha > 0.0) {
        return Err(DistributionError::Unfittable {
            family: "Generalized normal",
            reason: "scale estimate is not finite",
        });
    }
    Ok(FittedDistribution::GeneralizedNormal {
        mean: sample.mean,
        alpha,
        beta,
    })
}

fn fit_laplace(sample: &SampleMoments) -> Result<FittedDistribution, DistributionError> {
    let location = sample.median();
    let scale = sample
        .sorted()
        .iter()
        .map(|&x| (x - location).abs())
        .sum::<f64>()
        / sample.n as f64;
    if !(scale.is_finite() && scale > 0.0) {
        return Err(DistributionError::Unfittable {
            family: "Laplace",
            reason: "mean absolute deviation must be positive",
        });
    }
    Ok(FittedDistribution::Laplace { location, scale })
}

fn fit_exponential(sample: &SampleMoments) -> Result<FittedDistribution, DistributionError> {
    let location = sample.min;
    let scale = sample.mean - sample.min;
    if !(scale.is_finite() && scale > 0.0) {
        return Err(DistributionError::Unfittable {
            family: "Exponential",
            reason: "mean must exceed the minimum",
        });
    }
    Ok(FittedDistribution::Exponential { location, scale })
}

fn fit_cauchy(sample: &SampleMoments) -> Result<FittedDistribution, DistributionError> {
    let location = sample.median();
    let scale = sample.iqr() / 2.0;
    if !(scale.is_finite() && scale > 0.0) {
        return Err(DistributionError::Unfittable {
            family: "Cauchy",
            reason: "interquartile range must be positive",
        });
    }
    Ok(FittedDistribution::Cauchy { location, scale })
}

/// Profile likelihood over a fixed shape x scale grid. For each shape the
/// location is pinned to the quantile the family puts at its center,
/// cdf(location) = (1 - shape) / 2.
fn fit_skew_cauchy(sample: &SampleMoments) -> Result<FittedDistribution, DistributionError> {
    let base_scale = sample.iqr() / 2.0;
    if !(base_scale.is_finite() && base_scale > 0.0) {
        return Err(DistributionError::Unfittable {
            family: "Skew-Cauchy",
            reason: "interquartile range must be positive",
        });
    }
    let mut best: Option<(f64, FittedDistribution)> = None;
    for shape_idx in 0..SKEW_CAUCHY_SHAPE_STEPS {
        let shape = -0.9 + 0.1 * shape_idx as f64;
        let location = sample.quantile((1.0 - shape) / 2.0);
        for scale_idx in 0..SKEW_CAUCHY_SCALE_STEPS {
            let exponent =
                -1.0 + 2.0 * scale_idx as f64 / (SKEW_CAUCHY_SCALE_STEPS - 1) as f64;
            let scale = base_scale * 10f64.powf(exponent);
            let ll: f64 = sample
                .sorted()
                .iter()
                .map(|&x| {
                    let z = (x - location) / scale;
                    let t = z / (1.0 + shape * z.signum());
                    -(PI * scale * (t * t + 1.0)).ln()
                })
                .sum();
            if ll.is_finite() && best.as_ref().is_none_or(|(b, _)| ll > *b) {
                best = Some((
                    ll,
                    FittedDistribution::SkewCauchy {
                        shape,
                        location,
                        scale,
                    },
                ));
            }
        }
    }
    best.map(|(_, d)| d).ok_or(DistributionError::Unfittable {
        family: "Skew-Cauchy",
        reason: "likelihood not finite on the search grid",
    })
}

/// Method of moments through the skewness-delta relation, with the skewness
/// capped just under the family's attainable bound (~0.995).
fn fit_skew_normal(sample: &SampleMoments) -> Result<FittedDistribution, DistributionError> {
    if !(sample.std_dev.is_finite() && sample.std_dev > 0.0) {
        return Err(DistributionError::Unfittable {
            family: "Skew-normal",
            reason: "sample variance must be positive",
        });
    }
    if !sample.skewness.is_finite() {
        return Err(DistributionError::Unfittable {
            family: "Skew-normal",
            reason: "sample skewness is not finite",
        });
    }
    let capped = sample.skewness.clamp(-0.99, 0.99);
    let g = capped.abs().powf(2.0 / 3.0);
    let h = ((4.0 - PI) / 2.0).powf(2.0 / 3.0);
    let delta = (PI / 2.0 * g / (g + h)).sqrt().copysign(capped);
    let shape = delta / (1.0 - delta * delta).sqrt();
    let scale = sample.std_dev / (1.0 - 2.0 * delta * delta / PI).sqrt();
    let location = sample.mean - scale * delta * (2.0 / PI).sqrt();
    if !(shape.is_finite() && scale.is_finite() && location.is_finite()) {
        return Err(DistributionError::Unfittable {
            family: "Skew-normal",
            reason: "moment solution is not finite",
        });
    }
    Ok(FittedDistribution::SkewNormal {
        shape,
        location,
        scale,
    })
}

/// Shifted gamma via Minka's closed-form approximation to the shape MLE.
fn fit_gamma(sample: &SampleMoments) -> Result<FittedDistribution, DistributionError> {
    let range = sample.range();
    if !(range.is_finite() && range > 0.0) {
        return Err(DistributionError::Unfittable {
            family: "Gamma",
            reason: "sample range must be positive",
        });
    }
    let location = sample.min - SUPPORT_MARGIN * range;
    let shifted_mean = sample.mean - location;
    let mean_log = sample
        .sorted()
        .iter()
        .map(|&x| (x - location).ln())
        .sum::<f64>()
        / sample.n as f64;
    let s = shifted_mean.ln() - mean_log;
    if !(s.is_finite() && s > 0.0) {
        return Err(DistributionError::Unfittable {
            family: "Gamma",
            reason: "log-moment statistic must be positive",
        });
    }
    let shape = (3.0 - s + ((s - 3.0).powi(2) + 24.0 * s).sqrt()) / (12.0 * s);
    let scale = shifted_mean / shape;
    if !(shape.is_finite() && shape > 0.0 && scale.is_finite() && scale > 0.0) {
        return Err(DistributionError::Unfittable {
            family: "Gamma",
            reason: "shape estimate is not positive",
        });
    }
    Ok(FittedDistribution::Gamma {
        location,
        shape,
        scale,
    })
}

/// Method of moments on the sample rescaled to the unit interval, with the
/// support widened slightly beyond the observed range.
fn fit_beta(sample: &SampleMoments) -> Result<FittedDistribution, DistributionError> {
    let range = sample.range();
    if !(range.is_finite() && range > 0.0) {
        return Err(DistributionError::Unfittable {
            family: "Beta",
            reason: "sample range must be positive",
        });
    }
    let margin = SUPPORT_MARGIN * range;
    let location = sample.min - margin;
    let scale = range + 2.0 * margin;
    let mean_unit = (sample.mean - location) / scale;
    let var_unit = (sample.std_dev / scale).powi(2);
    if !(var_unit.is_finite() && var_unit > 0.0) {
        return Err(DistributionError::Unfittable {
            family: "Beta",
            reason: "sample variance must be positive",
        });
    }
    let concentration = mean_unit * (1.0 - mean_unit) / var_unit - 1.0;
    if !(concentration.is_finite() && concentration > 0.0) {
        return Err(DistributionError::Unfittable {
            family: "Beta",
            reason: "sample variance too large for a beta fit",
        });
    }
    let alpha = mean_unit * concentration;
    let beta = (1.0 - mean_unit) * concentration;
    if !(alpha > 0.0 && beta > 0.0) {
        return Err(DistributionError::Unfittable {
            family: "Beta",
            reason: "moment solution left the parameter domain",
        });
    }
    Ok(FittedDistribution::Beta {
        location,
        scale,
        alpha,
        beta,
    })
}

// ============================================================================
// Hand-rolled densities for families statrs does not carry
// ============================================================================

fn generalized_normal_pdf(x: f64, mean: f64, alpha: f64, beta: f64) -> f64 {
    if !(alpha > 0.0 && beta > 0.0) {
        return f64::NAN;
    }
    let z = ((x - mean) / alpha).abs();
    let ln_norm = beta.ln() - (2.0 * alpha).ln() - ln_gamma(1.0 / beta);
    (ln_norm - z.powf(beta)).exp()
}

fn skew_normal_pdf(x: f64, shape: f64, location: f64, scale: f64) -> f64 {
    if !(scale > 0.0) {
        return f64::NAN;
    }
    let z = (x - location) / scale;
    statrs::distribution::Normal::new(0.0, 1.0)
        .map(|standard| 2.0 / scale * standard.pdf(z) * standard.cdf(shape * z))
        .unwrap_or(f64::NAN)
}

fn skew_cauchy_pdf(x: f64, shape: f64, location: f64, scale: f64) -> f64 {
    if !(scale > 0.0) || shape.abs() >= 1.0 {
        return f64::NAN;
    }
    let z = (x - location) / scale;
    let t = z / (1.0 + shape * z.signum());
    1.0 / (PI * scale * (t * t + 1.0))
}
