pub mod dice;
pub mod engine;
pub mod error;
pub mod io;
pub mod model;
pub mod percentile;
pub mod records;
pub mod series;
