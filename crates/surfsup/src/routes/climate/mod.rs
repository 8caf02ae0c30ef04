pub mod precipitation;
pub mod stations;
pub mod temperature_stats;
pub mod tobs;

pub use precipitation::*;
pub use stations::*;
pub use temperature_stats::*;
pub use tobs::*;
