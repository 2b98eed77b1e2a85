use normal::error::ErrorCode;
use soroban_sdk::{ Address, Env, Vec };

use crate::{
    math::shares::Rounding,
    registry::MarketEntry,
    storage::{ Config, RebalanceRecord },
};

pub trait VaultTrait {
    // ################################################################
    //                             ADMIN
    // ################################################################

    #[allow(clippy::too_many_arguments)]
    fn initialize(
        env: Env,
        manager: Address,
        keeper: Address,
        asset: Address,
        share_token: Address,
        market_reader: Address,
        deposit_cap: i128,
        asset_threshold_bps: u32,
        weight_threshold_bps: u32,
        decimals_offset: u32
    ) -> Result<(), ErrorCode>;

    #[allow(clippy::too_many_arguments)]
    fn update_config(
        env: Env,
        sender: Address,
        keeper: Option<Address>,
        market_reader: Option<Address>,
        deposit_cap: Option<i128>,
        asset_threshold_bps: Option<u32>,
        weight_threshold_bps: Option<u32>
    ) -> Result<(), ErrorCode>;

    fn set_weight(env: Env, sender: Address, market: Address, weight: u32) -> Result<(), ErrorCode>;

    fn remove_market(env: Env, sender: Address, market: Address) -> Result<(), ErrorCode>;

    // ################################################################
    //                             KEEPER
    // ################################################################

    /// Moves idle assets per market and returns the new total assets
    fn rebalance(env: Env, sender: Address, deltas: Vec<i128>) -> Result<i128, ErrorCode>;

    // ################################################################
    //                             USER
    // ################################################################

    fn deposit(env: Env, from: Address, assets: i128) -> Result<i128, ErrorCode>;

    fn mint(env: Env, from: Address, shares: i128) -> Result<i128, ErrorCode>;

    fn withdraw(env: Env, owner: Address, assets: i128) -> Result<i128, ErrorCode>;

    fn redeem(env: Env, owner: Address, shares: i128) -> Result<i128, ErrorCode>;

    // ################################################################
    //                             QUERIES
    // ################################################################

    fn query_config(env: Env) -> Result<Config, ErrorCode>;

    fn query_entries(env: Env) -> Vec<MarketEntry>;

    fn query_market(env: Env, market: Address) -> Result<MarketEntry, ErrorCode>;

    fn query_total_weight(env: Env) -> u32;

    fn query_total_shares(env: Env) -> i128;

    fn query_last_rebalance(env: Env) -> Option<RebalanceRecord>;

    fn total_assets(env: Env) -> Result<i128, ErrorCode>;

    /// Position value in base-asset units
    fn market_value(env: Env, market: Address, conservative: bool) -> Result<i128, ErrorCode>;

    fn current_weight(env: Env, market: Address, conservative: bool) -> Result<u32, ErrorCode>;

    fn assets_to_shares(env: Env, assets: i128, rounding: Rounding) -> Result<i128, ErrorCode>;

    fn shares_to_assets(env: Env, shares: i128, rounding: Rounding) -> Result<i128, ErrorCode>;

    fn max_deposit(env: Env) -> Result<i128, ErrorCode>;

    fn max_mint(env: Env) -> Result<i128, ErrorCode>;

    fn max_withdraw(env: Env, owner: Address) -> Result<i128, ErrorCode>;

    fn max_redeem(env: Env, owner: Address) -> Result<i128, ErrorCode>;

    fn preview_deposit(env: Env, assets: i128) -> Result<i128, ErrorCode>;

    fn preview_mint(env: Env, shares: i128) -> Result<i128, ErrorCode>;

    fn preview_withdraw(env: Env, assets: i128) -> Result<i128, ErrorCode>;

    fn preview_redeem(env: Env, shares: i128) -> Result<i128, ErrorCode>;
}
