pub mod band;
pub mod shares;
