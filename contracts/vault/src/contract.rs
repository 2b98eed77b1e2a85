use soroban_sdk::{ contract, contractimpl, contractmeta, log, Address, Env, Vec };

use crate::{
    controller::{ self, rebalance::Rebalancer, shares::ShareConverter, valuation },
    events::VaultEvents,
    math::shares::Rounding,
    registry::MarketEntry,
    storage::{
        get_config,
        get_last_rebalance,
        get_registry,
        get_total_shares,
        is_initialized,
        save_config,
        save_registry,
        set_initialized,
        utils,
        Config,
        RebalanceRecord,
    },
    vault::VaultTrait,
};

use normal::{
    constants::{ INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD, MAX_DECIMALS_OFFSET },
    error::{ ErrorCode, NormalResult },
    validate,
    validate_bps,
};

contractmeta!(
    key = "Description",
    val = "Weighted multi-market vault rebalanced by a keeper within tolerance bands"
);

#[contract]
pub struct Vault;

#[contractimpl]
impl VaultTrait for Vault {
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
    ) -> Result<(), ErrorCode> {
        if is_initialized(&env) {
            log!(&env, "Vault: Initialize: initializing contract twice is not allowed");
            return Err(ErrorCode::AlreadyInitialized);
        }

        validate_bps!(&env, asset_threshold_bps, weight_threshold_bps);
        validate_deposit_cap(&env, deposit_cap)?;
        validate!(
            &env,
            decimals_offset <= MAX_DECIMALS_OFFSET,
            ErrorCode::InvalidDecimals,
            "Vault: decimals offset {} above {}",
            decimals_offset,
            MAX_DECIMALS_OFFSET
        )?;
        validate!(
            &env,
            asset != share_token,
            ErrorCode::InvalidMarket,
            "Vault: base asset cannot double as the share token"
        )?;

        set_initialized(&env);

        let config = Config {
            manager: manager.clone(),
            keeper: keeper.clone(),
            asset: asset.clone(),
            share_token: share_token.clone(),
            market_reader,
            deposit_cap,
            asset_threshold_bps,
            weight_threshold_bps,
            decimals_offset,
        };
        save_config(&env, &config);

        VaultEvents::initialize(&env, manager, keeper, asset, share_token);

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn update_config(
        env: Env,
        sender: Address,
        keeper: Option<Address>,
        market_reader: Option<Address>,
        deposit_cap: Option<i128>,
        asset_threshold_bps: Option<u32>,
        weight_threshold_bps: Option<u32>
    ) -> Result<(), ErrorCode> {
        sender.require_auth();
        env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

        let mut config = get_config(&env)?;
        utils::is_manager(&env, &config, &sender)?;

        if let Some(keeper) = keeper {
            config.keeper = keeper;
        }
        if let Some(market_reader) = market_reader {
            config.market_reader = market_reader;
        }
        if let Some(deposit_cap) = deposit_cap {
            validate_deposit_cap(&env, deposit_cap)?;
            config.deposit_cap = deposit_cap;
        }
        if let Some(asset_threshold_bps) = asset_threshold_bps {
            validate_bps!(&env, asset_threshold_bps);
            config.asset_threshold_bps = asset_threshold_bps;
        }
        if let Some(weight_threshold_bps) = weight_threshold_bps {
            validate_bps!(&env, weight_threshold_bps);
            config.weight_threshold_bps = weight_threshold_bps;
        }

        save_config(&env, &config);
        VaultEvents::config_update(&env, sender);

        Ok(())
    }

    fn set_weight(env: Env, sender: Address, market: Address, weight: u32) -> Result<(), ErrorCode> {
        sender.require_auth();
        env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

        let config = get_config(&env)?;
        utils::is_manager(&env, &config, &sender)?;
        validate_market(&env, &config, &market)?;

        let mut registry = get_registry(&env);
        let old_weight = registry.set_weight(&env, &market, weight)?;
        save_registry(&env, &registry);

        log!(&env, "Vault: market {} weight {} -> {}", market.clone(), old_weight, weight);
        VaultEvents::weight_update(&env, market, old_weight, weight);

        Ok(())
    }

    fn remove_market(env: Env, sender: Address, market: Address) -> Result<(), ErrorCode> {
        sender.require_auth();
        env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

        let config = get_config(&env)?;
        utils::is_manager(&env, &config, &sender)?;

        let mut registry = get_registry(&env);
        let removed = registry.remove(&env, &market)?;
        save_registry(&env, &registry);

        log!(&env, "Vault: market {} removed", market.clone());
        VaultEvents::weight_removal(&env, market, removed.target_weight);

        Ok(())
    }

    // ################################################################
    //                             KEEPER
    // ################################################################

    fn rebalance(env: Env, sender: Address, deltas: Vec<i128>) -> Result<i128, ErrorCode> {
        sender.require_auth();
        env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

        let config = get_config(&env)?;
        utils::is_keeper(&env, &config, &sender)?;

        let record = Rebalancer::new(&env, &config, get_registry(&env)).execute(&sender, &deltas)?;

        VaultEvents::rebalance(&env, sender, record.total_assets, true);

        Ok(record.total_assets)
    }

    // ################################################################
    //                             USER
    // ################################################################

    fn deposit(env: Env, from: Address, assets: i128) -> Result<i128, ErrorCode> {
        from.require_auth();
        env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

        let config = get_config(&env)?;
        controller::shares::deposit(&env, &config, &get_registry(&env), &from, assets)
    }

    fn mint(env: Env, from: Address, shares: i128) -> Result<i128, ErrorCode> {
        from.require_auth();
        env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

        let config = get_config(&env)?;
        controller::shares::mint(&env, &config, &get_registry(&env), &from, shares)
    }

    fn withdraw(env: Env, owner: Address, assets: i128) -> Result<i128, ErrorCode> {
        owner.require_auth();
        env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

        let config = get_config(&env)?;
        controller::shares::withdraw(&env, &config, &get_registry(&env), &owner, assets)
    }

    fn redeem(env: Env, owner: Address, shares: i128) -> Result<i128, ErrorCode> {
        owner.require_auth();
        env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

        let config = get_config(&env)?;
        controller::shares::redeem(&env, &config, &get_registry(&env), &owner, shares)
    }

    // ################################################################
    //                             QUERIES
    // ################################################################

    fn query_config(env: Env) -> Result<Config, ErrorCode> {
        get_config(&env)
    }

    fn query_entries(env: Env) -> Vec<MarketEntry> {
        get_registry(&env).entries()
    }

    fn query_market(env: Env, market: Address) -> Result<MarketEntry, ErrorCode> {
        get_registry(&env).get(&market).ok_or(ErrorCode::MarketNotFound)
    }

    fn query_total_weight(env: Env) -> u32 {
        get_registry(&env).total_weight()
    }

    fn query_total_shares(env: Env) -> i128 {
        get_total_shares(&env)
    }

    fn query_last_rebalance(env: Env) -> Option<RebalanceRecord> {
        get_last_rebalance(&env)
    }

    fn total_assets(env: Env) -> Result<i128, ErrorCode> {
        let config = get_config(&env)?;
        valuation::total_assets(&env, &config, &get_registry(&env))
    }

    fn market_value(env: Env, market: Address, conservative: bool) -> Result<i128, ErrorCode> {
        let config = get_config(&env)?;
        valuation::normalized_market_value(&env, &config, &market, conservative)
    }

    fn current_weight(env: Env, market: Address, conservative: bool) -> Result<u32, ErrorCode> {
        let config = get_config(&env)?;
        valuation::current_weight(&env, &config, &get_registry(&env), &market, conservative)
    }

    fn assets_to_shares(env: Env, assets: i128, rounding: Rounding) -> Result<i128, ErrorCode> {
        converter(&env)?.assets_to_shares(&env, assets, rounding)
    }

    fn shares_to_assets(env: Env, shares: i128, rounding: Rounding) -> Result<i128, ErrorCode> {
        converter(&env)?.shares_to_assets(&env, shares, rounding)
    }

    fn max_deposit(env: Env) -> Result<i128, ErrorCode> {
        let config = get_config(&env)?;
        Ok(converter(&env)?.max_deposit(config.deposit_cap))
    }

    fn max_mint(env: Env) -> Result<i128, ErrorCode> {
        let config = get_config(&env)?;
        converter(&env)?.max_mint(&env, config.deposit_cap)
    }

    fn max_withdraw(env: Env, owner: Address) -> Result<i128, ErrorCode> {
        let config = get_config(&env)?;
        converter(&env)?.max_withdraw(&env, &config, &owner)
    }

    fn max_redeem(env: Env, owner: Address) -> Result<i128, ErrorCode> {
        let config = get_config(&env)?;
        converter(&env)?.max_redeem(&env, &config, &owner)
    }

    fn preview_deposit(env: Env, assets: i128) -> Result<i128, ErrorCode> {
        converter(&env)?.preview_deposit(&env, assets)
    }

    fn preview_mint(env: Env, shares: i128) -> Result<i128, ErrorCode> {
        converter(&env)?.preview_mint(&env, shares)
    }

    fn preview_withdraw(env: Env, assets: i128) -> Result<i128, ErrorCode> {
        converter(&env)?.preview_withdraw(&env, assets)
    }

    fn preview_redeem(env: Env, shares: i128) -> Result<i128, ErrorCode> {
        converter(&env)?.preview_redeem(&env, shares)
    }
}

fn converter(env: &Env) -> NormalResult<ShareConverter> {
    let config = get_config(env)?;
    ShareConverter::load(env, &config, &get_registry(env))
}

fn validate_deposit_cap(env: &Env, deposit_cap: i128) -> NormalResult {
    validate!(
        env,
        deposit_cap >= 0,
        ErrorCode::InvalidDepositCap,
        "Vault: deposit cap {} must not be negative",
        deposit_cap
    )
}

/// Rejects addresses that cannot hold a market position for the vault
fn validate_market(env: &Env, config: &Config, market: &Address) -> NormalResult {
    validate!(
        env,
        *market != env.current_contract_address() &&
            *market != config.asset &&
            *market != config.share_token,
        ErrorCode::InvalidMarket,
        "Vault: {} is not a valid market",
        market.clone()
    )
}
