use normal::{
    constants::BPS_DENOMINATOR_I128,
    error::{ ErrorCode, NormalResult },
    math::{ casting::Cast, decimals, safe_math::SafeMath },
    oracle::{ MarketReaderClient, PnlFactorKind },
    validate,
};
use soroban_sdk::{ log, token, Address, Env };

use crate::{ registry::WeightRegistry, storage::{ utils, Config } };

/// The vault's position in one market, priced but not yet normalized.
///
/// Price and balance stay separate so their product is only ever formed in
/// 256 bits by the normalizer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MarketValuation {
    /// Quoted price per market-token unit, zero when the position is worthless
    pub price: i128,
    pub balance: i128,
    pub scale: u32,
    pub market_decimals: u32,
}

impl MarketValuation {
    fn zero(balance: i128, market_decimals: u32) -> Self {
        MarketValuation { price: 0, balance, scale: 0, market_decimals }
    }

    /// Value in base-asset units. Worthless positions contribute zero.
    pub fn normalize(&self, env: &Env, asset_decimals: u32) -> NormalResult<i128> {
        if self.price <= 0 || self.balance <= 0 {
            return Ok(0);
        }
        decimals::convert(
            env,
            self.price,
            self.balance,
            self.scale,
            self.market_decimals,
            asset_decimals
        )
    }
}

pub fn market_value(
    env: &Env,
    config: &Config,
    market: &Address,
    conservative: bool
) -> NormalResult<MarketValuation> {
    let position = token::Client::new(env, market);
    let market_decimals = position.decimals();
    let balance = position.balance(&env.current_contract_address());

    if balance <= 0 {
        return Ok(MarketValuation::zero(balance, market_decimals));
    }

    let reader = MarketReaderClient::new(env, &config.market_reader);
    let pool = reader.describe(market);
    let quote = reader.quote_price(&pool, &PnlFactorKind::MaxPnlForDeposits, &conservative);

    if !quote.is_positive() {
        log!(env, "Valuation: non-positive quote {} for market {}", quote.value, market.clone());
        return Ok(MarketValuation::zero(balance, market_decimals));
    }

    // A pool whose net value is not positive owes its holders more than it
    // holds, so its market token redeems for nothing whatever it is quoted at.
    let pool_value = reader.pool_valuation(&pool, &conservative);
    if pool_value <= 0 {
        log!(env, "Valuation: pool for market {} valued at {}", market.clone(), pool_value);
        return Ok(MarketValuation::zero(balance, market_decimals));
    }

    Ok(MarketValuation {
        price: quote.value,
        balance,
        scale: quote.scale,
        market_decimals,
    })
}

pub fn normalized_market_value(
    env: &Env,
    config: &Config,
    market: &Address,
    conservative: bool
) -> NormalResult<i128> {
    let asset_decimals = token::Client::new(env, &config.asset).decimals();
    market_value(env, config, market, conservative)?.normalize(env, asset_decimals)
}

pub fn idle_balance(env: &Env, config: &Config) -> i128 {
    utils::token_balance(env, &config.asset, &env.current_contract_address())
}

/// Idle balance plus every registered market valued non-conservatively
pub fn total_assets(env: &Env, config: &Config, registry: &WeightRegistry) -> NormalResult<i128> {
    let asset_decimals = token::Client::new(env, &config.asset).decimals();
    let mut total = idle_balance(env, config);

    for entry in registry.entries().iter() {
        let value = market_value(env, config, &entry.market, false)?.normalize(
            env,
            asset_decimals
        )?;
        total = total.safe_add(value, env)?;
    }

    Ok(total)
}

/// Share of `total_assets` held in `market`, in bps
pub fn current_weight(
    env: &Env,
    config: &Config,
    registry: &WeightRegistry,
    market: &Address,
    conservative: bool
) -> NormalResult<u32> {
    let total = total_assets(env, config, registry)?;
    validate!(
        env,
        total > 0,
        ErrorCode::ZeroTotalAssets,
        "Valuation: cannot weigh market {} against zero total assets",
        market.clone()
    )?;

    normalized_market_value(env, config, market, conservative)?
        .safe_mul(BPS_DENOMINATOR_I128, env)?
        .safe_div(total, env)?
        .cast::<u32>(env)
}
