pub mod bn;
pub mod casting;
pub mod ceil_div;
pub mod decimals;
pub mod safe_math;
