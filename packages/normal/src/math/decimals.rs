use soroban_sdk::Env;

use crate::{
    error::{ ErrorCode, NormalResult },
    math::{ bn::U256, casting::Cast, safe_math::SafeMath },
    math_error,
    validate,
};

/// Values `amount` market-token base units at `price` and rescales the result
/// into `asset_decimals` precision. `price` carries `price_scale` decimals on
/// top of the market token's `market_decimals`.
///
/// `price * amount * 10^asset_decimals / 10^(market_decimals + price_scale)`,
/// computed in 256 bits with every multiplication applied before the single
/// division, so neither a wide price scale overflows nor a small magnitude
/// truncates to zero. The result floors.
pub fn convert(
    env: &Env,
    price: i128,
    amount: i128,
    price_scale: u32,
    market_decimals: u32,
    asset_decimals: u32
) -> NormalResult<i128> {
    validate!(
        env,
        price > 0 && amount > 0,
        ErrorCode::NonPositiveValue,
        "Normalizer: price {} and amount {} must be positive",
        price,
        amount
    )?;

    let asset_precision = U256::checked_exp10(env, asset_decimals)?;
    let numerator = U256::from(price.cast::<u128>(env)?)
        .checked_mul(U256::from(amount.cast::<u128>(env)?))
        .and_then(|value| value.checked_mul(asset_precision))
        .ok_or_else(math_error!(env))?;

    let denominator = U256::checked_exp10(env, market_decimals.safe_add(price_scale, env)?)?;

    numerator
        .checked_div(denominator)
        .ok_or_else(math_error!(env))?
        .try_to_u128(env)?
        .cast::<i128>(env)
}

#[cfg(test)]
mod test {
    use soroban_sdk::Env;
    use test_case::test_case;

    use super::convert;
    use crate::error::ErrorCode;

    // 5 tokens (18 decimals) priced at 2.0 with 12 price decimals, into 6-decimal asset
    #[test_case(2_000_000_000_000, 5_000_000_000_000_000_000, 12, 18, 6 => Ok(10_000_000); "scale down")]
    // 1 unit of a 6-decimal token into an 18-decimal asset keeps its magnitude
    #[test_case(1, 1, 0, 6, 18 => Ok(1_000_000_000_000); "scale up small magnitude")]
    #[test_case(1, 1_234_567, 0, 7, 7 => Ok(1_234_567); "same precision")]
    #[test_case(999, 1, 3, 0, 0 => Ok(0); "floors below one unit")]
    // price * amount alone exceeds i128
    #[test_case(10i128.pow(30), 10i128.pow(16), 30, 7, 7 => Ok(10i128.pow(16)); "wide price scale")]
    #[test_case(10i128.pow(18), 10i128.pow(21), 18, 7, 7 => Ok(10i128.pow(21)); "large position")]
    #[test_case(0, 1, 0, 7, 7 => Err(ErrorCode::NonPositiveValue); "zero price")]
    #[test_case(1, 0, 0, 7, 7 => Err(ErrorCode::NonPositiveValue); "zero amount")]
    #[test_case(-5, 1, 0, 7, 7 => Err(ErrorCode::NonPositiveValue); "negative price")]
    #[test_case(1, 1, 0, 0, 77 => Err(ErrorCode::InvalidDecimals); "asset precision too large")]
    #[test_case(i128::MAX, 1, 0, 0, 38 => Err(ErrorCode::CastingFailure); "result overflows")]
    #[test_case(i128::MAX, i128::MAX, 0, 0, 2 => Err(ErrorCode::MathError); "numerator overflows")]
    fn converts(
        price: i128,
        amount: i128,
        price_scale: u32,
        market_decimals: u32,
        asset_decimals: u32
    ) -> Result<i128, ErrorCode> {
        let env = Env::default();
        convert(&env, price, amount, price_scale, market_decimals, asset_decimals)
    }

    #[test]
    fn multiplies_before_dividing() {
        let env = Env::default();
        // dividing by 10^7 first would truncate to zero
        assert_eq!(convert(&env, 3, 1, 7, 0, 9), Ok(300));
    }
}
