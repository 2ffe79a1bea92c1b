mod prices;
mod results;
mod returns;
mod statistics;

pub use prices::PriceSeries;
pub use results::{AssetWeight, SimulationParams, SimulationResult, Trial, WeightSampling};
pub use returns::{MIN_ROWS, ReturnMatrix};
pub use statistics::{CovarianceMatrix, MeanVector};
