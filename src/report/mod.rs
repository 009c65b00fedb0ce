pub mod band;
pub mod output;
pub mod rolls;
pub mod svg;
