#![no_std]

mod contract;
mod controller;
mod events;
mod math;
mod registry;
mod storage;
mod vault;

pub use crate::contract::{ Vault, VaultClient };
pub use crate::math::shares::Rounding;
pub use crate::registry::{ MarketEntry, WeightRegistry };
pub use crate::storage::{ Config, RebalancePhase, RebalanceRecord };
