use normal::{
    constants::{
        INSTANCE_BUMP_AMOUNT,
        INSTANCE_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
        PERSISTENT_LIFETIME_THRESHOLD,
    },
    error::{ ErrorCode, NormalResult },
};
use soroban_sdk::{ contracttype, Address, Env };

use crate::registry::WeightRegistry;

#[contracttype]
#[derive(Clone, Debug)]
pub enum DataKey {
    Config = 1,
    Registry = 2,
    TotalShares = 3,
    LastRebalance = 4,
    Initialized = 5,
}

// ################################################################
//                             Config
// ################################################################

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Curates the market set and target weights
    pub manager: Address,
    /// Submits rebalance deltas and funds/receives their transfers
    pub keeper: Address,
    /// Base asset held idle and used for deposits and withdrawals
    pub asset: Address,
    /// Share token administered by the vault
    pub share_token: Address,
    pub market_reader: Address,
    pub deposit_cap: i128,
    pub asset_threshold_bps: u32,
    pub weight_threshold_bps: u32,
    /// Virtual share offset used as 10^decimals_offset
    pub decimals_offset: u32,
}

pub fn save_config(env: &Env, config: &Config) {
    env.storage().instance().set(&DataKey::Config, config);
    env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn get_config(env: &Env) -> NormalResult<Config> {
    env.storage().instance().get(&DataKey::Config).ok_or(ErrorCode::NotInitialized)
}

// ################################################################
//                            Registry
// ################################################################

pub fn save_registry(env: &Env, registry: &WeightRegistry) {
    env.storage().persistent().set(&DataKey::Registry, registry);
    env.storage()
        .persistent()
        .extend_ttl(&DataKey::Registry, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn get_registry(env: &Env) -> WeightRegistry {
    match env.storage().persistent().get(&DataKey::Registry) {
        Some(registry) => {
            env.storage()
                .persistent()
                .extend_ttl(
                    &DataKey::Registry,
                    PERSISTENT_LIFETIME_THRESHOLD,
                    PERSISTENT_BUMP_AMOUNT
                );
            registry
        }
        None => WeightRegistry::new(env),
    }
}

// ################################################################
//                             Shares
// ################################################################

pub fn save_total_shares(env: &Env, total_shares: i128) {
    env.storage().instance().set(&DataKey::TotalShares, &total_shares);
}

pub fn get_total_shares(env: &Env) -> i128 {
    env.storage().instance().get(&DataKey::TotalShares).unwrap_or(0)
}

// ################################################################
//                            Rebalance
// ################################################################

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum RebalancePhase {
    Idle = 0,
    Executing = 1,
    Committed = 2,
    Aborted = 3,
}

/// Outcome of the last committed rebalance
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RebalanceRecord {
    pub ts: u64,
    pub keeper: Address,
    pub prev_total_assets: i128,
    pub total_assets: i128,
    pub markets: u32,
    pub phase: RebalancePhase,
}

pub fn save_last_rebalance(env: &Env, record: &RebalanceRecord) {
    env.storage().persistent().set(&DataKey::LastRebalance, record);
    env.storage()
        .persistent()
        .extend_ttl(&DataKey::LastRebalance, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn get_last_rebalance(env: &Env) -> Option<RebalanceRecord> {
    env.storage().persistent().get(&DataKey::LastRebalance)
}

// ################################################################
//                           Lifecycle
// ################################################################

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().get(&DataKey::Initialized).unwrap_or(false)
}

pub fn set_initialized(env: &Env) {
    env.storage().instance().set(&DataKey::Initialized, &true);
}

pub mod utils {
    use normal::validate;
    use soroban_sdk::{ log, token, Address, Env };

    use super::*;

    pub fn is_manager(env: &Env, config: &Config, sender: &Address) -> NormalResult {
        validate!(
            env,
            *sender == config.manager,
            ErrorCode::NotAuthorized,
            "Vault: sender is not the manager"
        )
    }

    pub fn is_keeper(env: &Env, config: &Config, sender: &Address) -> NormalResult {
        validate!(
            env,
            *sender == config.keeper,
            ErrorCode::NotAuthorized,
            "Vault: sender is not the keeper"
        )
    }

    pub fn transfer_token(
        env: &Env,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: i128
    ) -> NormalResult {
        let token_client = token::Client::new(env, token);
        match token_client.try_transfer(from, to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => {
                log!(env, "Vault: transfer of {} from {} to {} failed", amount, from, to);
                Err(ErrorCode::TransferFailed)
            }
        }
    }

    pub fn token_balance(env: &Env, token: &Address, owner: &Address) -> i128 {
        token::Client::new(env, token).balance(owner)
    }
}
