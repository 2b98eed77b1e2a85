use normal::{
    error::{ ErrorCode, NormalResult },
    math::safe_math::SafeMath,
    math_error,
    validate,
};
use soroban_fixed_point_math::FixedPoint;
use soroban_sdk::{ contracttype, Env };

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Rounding {
    Floor = 0,
    Ceil = 1,
}

/// 10^decimals_offset, the virtual share supply added to every conversion
pub fn offset_units(env: &Env, decimals_offset: u32) -> NormalResult<i128> {
    10i128.checked_pow(decimals_offset).ok_or_else(math_error!(env))
}

pub fn assets_to_shares(
    env: &Env,
    assets: i128,
    total_shares: i128,
    total_assets: i128,
    decimals_offset: u32,
    rounding: Rounding
) -> NormalResult<i128> {
    validate_supply(env, total_shares, total_assets)?;

    if total_shares == 0 {
        return Ok(assets);
    }

    let virtual_shares = total_shares.safe_add(offset_units(env, decimals_offset)?, env)?;
    let virtual_assets = total_assets.safe_add(1, env)?;

    mul_div(env, assets, virtual_shares, virtual_assets, rounding)
}

pub fn shares_to_assets(
    env: &Env,
    shares: i128,
    total_shares: i128,
    total_assets: i128,
    decimals_offset: u32,
    rounding: Rounding
) -> NormalResult<i128> {
    validate_supply(env, total_shares, total_assets)?;

    if total_shares == 0 {
        return Ok(shares);
    }

    let virtual_shares = total_shares.safe_add(offset_units(env, decimals_offset)?, env)?;
    let virtual_assets = total_assets.safe_add(1, env)?;

    mul_div(env, shares, virtual_assets, virtual_shares, rounding)
}

/// Remaining deposit headroom, never negative
pub fn max_deposit(deposit_cap: i128, total_assets: i128) -> i128 {
    deposit_cap.saturating_sub(total_assets).max(0)
}

fn validate_supply(env: &Env, total_shares: i128, total_assets: i128) -> NormalResult {
    validate!(
        env,
        total_shares >= 0 && total_assets >= 0,
        ErrorCode::InvalidShareSupply,
        "Shares: invalid supply {} against total assets {}",
        total_shares,
        total_assets
    )
}

fn mul_div(env: &Env, x: i128, y: i128, denominator: i128, rounding: Rounding) -> NormalResult<i128> {
    let result = match rounding {
        Rounding::Floor => x.fixed_mul_floor(y, denominator),
        Rounding::Ceil => x.fixed_mul_ceil(y, denominator),
    };
    result.ok_or_else(math_error!(env))
}
