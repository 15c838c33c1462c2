mod distribution;
mod results;
mod series;

pub use distribution::{DistributionFamily, FittedDistribution, ReturnSampler, SampleMoments};
pub use results::{DistributionCandidate, FitResult, PathMatrix, PercentileBands};
pub use series::{
    DrawdownPoint, DrawdownReport, Frequency, PricePoint, PriceSeries, ReturnKind,
    ReturnObservation, ReturnSeries, ReturnStatistics,
};
