pub mod rebalance;
pub mod shares;
pub mod valuation;
