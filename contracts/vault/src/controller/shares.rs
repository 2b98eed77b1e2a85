use normal::{
    error::{ ErrorCode, NormalResult },
    math::safe_math::SafeMath,
    validate,
};
use soroban_sdk::{ log, token, Address, Env };

use crate::{
    controller::valuation,
    events::VaultEvents,
    math::shares::{ self, Rounding },
    registry::WeightRegistry,
    storage::{ get_total_shares, save_total_shares, utils, Config },
};

/// Share pricing inputs captured once per invocation
pub struct ShareConverter {
    pub total_assets: i128,
    pub total_shares: i128,
    pub decimals_offset: u32,
}

impl ShareConverter {
    pub fn load(env: &Env, config: &Config, registry: &WeightRegistry) -> NormalResult<Self> {
        Ok(ShareConverter {
            total_assets: valuation::total_assets(env, config, registry)?,
            total_shares: get_total_shares(env),
            decimals_offset: config.decimals_offset,
        })
    }

    pub fn assets_to_shares(&self, env: &Env, assets: i128, rounding: Rounding) -> NormalResult<i128> {
        shares::assets_to_shares(
            env,
            assets,
            self.total_shares,
            self.total_assets,
            self.decimals_offset,
            rounding
        )
    }

    pub fn shares_to_assets(&self, env: &Env, shares: i128, rounding: Rounding) -> NormalResult<i128> {
        shares::shares_to_assets(
            env,
            shares,
            self.total_shares,
            self.total_assets,
            self.decimals_offset,
            rounding
        )
    }

    pub fn max_deposit(&self, deposit_cap: i128) -> i128 {
        shares::max_deposit(deposit_cap, self.total_assets)
    }

    pub fn max_mint(&self, env: &Env, deposit_cap: i128) -> NormalResult<i128> {
        self.assets_to_shares(env, self.max_deposit(deposit_cap), Rounding::Floor)
    }

    pub fn preview_deposit(&self, env: &Env, assets: i128) -> NormalResult<i128> {
        self.assets_to_shares(env, assets, Rounding::Floor)
    }

    pub fn preview_mint(&self, env: &Env, shares: i128) -> NormalResult<i128> {
        self.shares_to_assets(env, shares, Rounding::Ceil)
    }

    pub fn preview_withdraw(&self, env: &Env, assets: i128) -> NormalResult<i128> {
        self.assets_to_shares(env, assets, Rounding::Ceil)
    }

    pub fn preview_redeem(&self, env: &Env, shares: i128) -> NormalResult<i128> {
        self.shares_to_assets(env, shares, Rounding::Floor)
    }

    /// Assets `owner` can pull now, bounded by their shares and the idle balance
    pub fn max_withdraw(&self, env: &Env, config: &Config, owner: &Address) -> NormalResult<i128> {
        let owned = self.preview_redeem(env, share_balance(env, config, owner))?;
        Ok(owned.min(valuation::idle_balance(env, config)))
    }

    pub fn max_redeem(&self, env: &Env, config: &Config, owner: &Address) -> NormalResult<i128> {
        let owned = share_balance(env, config, owner);
        let idle = self.assets_to_shares(env, valuation::idle_balance(env, config), Rounding::Floor)?;
        Ok(owned.min(idle))
    }
}

pub fn share_balance(env: &Env, config: &Config, owner: &Address) -> i128 {
    utils::token_balance(env, &config.share_token, owner)
}

pub fn deposit(
    env: &Env,
    config: &Config,
    registry: &WeightRegistry,
    from: &Address,
    assets: i128
) -> NormalResult<i128> {
    validate!(env, assets > 0, ErrorCode::ZeroAmount, "Vault: deposit amount must be positive")?;

    let converter = ShareConverter::load(env, config, registry)?;
    validate_deposit_cap(env, &converter, config, assets)?;

    let shares = converter.preview_deposit(env, assets)?;
    validate!(env, shares > 0, ErrorCode::ZeroAmount, "Vault: deposit of {} mints no shares", assets)?;

    enter(env, config, &converter, from, assets, shares)?;
    Ok(shares)
}

pub fn mint(
    env: &Env,
    config: &Config,
    registry: &WeightRegistry,
    from: &Address,
    shares: i128
) -> NormalResult<i128> {
    validate!(env, shares > 0, ErrorCode::ZeroAmount, "Vault: mint amount must be positive")?;

    let converter = ShareConverter::load(env, config, registry)?;
    let assets = converter.preview_mint(env, shares)?;
    validate_deposit_cap(env, &converter, config, assets)?;

    enter(env, config, &converter, from, assets, shares)?;
    Ok(assets)
}

pub fn withdraw(
    env: &Env,
    config: &Config,
    registry: &WeightRegistry,
    owner: &Address,
    assets: i128
) -> NormalResult<i128> {
    validate!(env, assets > 0, ErrorCode::ZeroAmount, "Vault: withdraw amount must be positive")?;

    let converter = ShareConverter::load(env, config, registry)?;
    let shares = converter.preview_withdraw(env, assets)?;

    exit(env, config, &converter, owner, assets, shares)?;
    Ok(shares)
}

pub fn redeem(
    env: &Env,
    config: &Config,
    registry: &WeightRegistry,
    owner: &Address,
    shares: i128
) -> NormalResult<i128> {
    validate!(env, shares > 0, ErrorCode::ZeroAmount, "Vault: redeem amount must be positive")?;

    let converter = ShareConverter::load(env, config, registry)?;
    let assets = converter.preview_redeem(env, shares)?;
    validate!(env, assets > 0, ErrorCode::ZeroAmount, "Vault: redeeming {} shares returns no assets", shares)?;

    exit(env, config, &converter, owner, assets, shares)?;
    Ok(assets)
}

fn validate_deposit_cap(
    env: &Env,
    converter: &ShareConverter,
    config: &Config,
    assets: i128
) -> NormalResult {
    let max_deposit = converter.max_deposit(config.deposit_cap);
    validate!(
        env,
        assets <= max_deposit,
        ErrorCode::DepositCapExceeded,
        "Vault: deposit of {} exceeds remaining capacity {}",
        assets,
        max_deposit
    )
}

fn enter(
    env: &Env,
    config: &Config,
    converter: &ShareConverter,
    from: &Address,
    assets: i128,
    shares: i128
) -> NormalResult {
    utils::transfer_token(env, &config.asset, from, &env.current_contract_address(), assets)?;

    token::StellarAssetClient::new(env, &config.share_token).mint(from, &shares);
    save_total_shares(env, converter.total_shares.safe_add(shares, env)?);

    log!(env, "Vault: {} deposited {} for {} shares", from.clone(), assets, shares);
    VaultEvents::deposit(env, from.clone(), assets, shares);

    Ok(())
}

fn exit(
    env: &Env,
    config: &Config,
    converter: &ShareConverter,
    owner: &Address,
    assets: i128,
    shares: i128
) -> NormalResult {
    let owned = share_balance(env, config, owner);
    validate!(
        env,
        shares <= owned,
        ErrorCode::InsufficientShares,
        "Vault: {} shares requested, owner holds {}",
        shares,
        owned
    )?;

    let idle = valuation::idle_balance(env, config);
    validate!(
        env,
        assets <= idle,
        ErrorCode::InsufficientIdleBalance,
        "Vault: {} assets requested, {} idle",
        assets,
        idle
    )?;

    token::Client::new(env, &config.share_token).burn(owner, &shares);
    save_total_shares(env, converter.total_shares.safe_sub(shares, env)?);

    utils::transfer_token(env, &config.asset, &env.current_contract_address(), owner, assets)?;

    log!(env, "Vault: {} withdrew {} for {} shares", owner.clone(), assets, shares);
    VaultEvents::withdraw(env, owner.clone(), assets, shares);

    Ok(())
}
