use normal::{
    constants::BPS_DENOMINATOR_I128,
    error::NormalResult,
    math::safe_math::SafeMath,
};
use soroban_sdk::Env;

/// Bounds of the tolerance band around `reference`.
///
/// The lower bound floors and the upper bound ceils so the band never
/// narrows below `threshold_bps` because of integer division.
pub fn band(env: &Env, reference: i128, threshold_bps: u32) -> NormalResult<(i128, i128)> {
    let threshold = i128::from(threshold_bps);

    let lower = reference
        .safe_mul(BPS_DENOMINATOR_I128.safe_sub(threshold, env)?, env)?
        .safe_div(BPS_DENOMINATOR_I128, env)?;
    let upper = reference
        .safe_mul(BPS_DENOMINATOR_I128.safe_add(threshold, env)?, env)?
        .safe_div_ceil(BPS_DENOMINATOR_I128, env)?;

    Ok((lower, upper))
}

pub fn is_within_band(
    env: &Env,
    value: i128,
    reference: i128,
    threshold_bps: u32
) -> NormalResult<bool> {
    let (lower, upper) = band(env, reference, threshold_bps)?;
    Ok(!(value < lower || value > upper))
}

#[cfg(test)]
mod test {
    use soroban_sdk::Env;
    use test_case::test_case;

    use super::*;

    #[test_case(80, 1000, 100, false ; "asset drift above band")]
    #[test_case(80, 1000, 88, true ; "upper edge")]
    #[test_case(80, 1000, 89, false ; "just above upper edge")]
    #[test_case(80, 1000, 72, true ; "lower edge")]
    #[test_case(80, 1000, 71, false ; "just below lower edge")]
    #[test_case(5000, 500, 5250, true ; "weight at upper edge")]
    #[test_case(5000, 10_000, 0, true ; "full threshold admits zero")]
    #[test_case(0, 1000, 0, true ; "empty reference")]
    #[test_case(0, 1000, 1, false ; "empty reference rejects growth")]
    fn within_band(reference: i128, threshold_bps: u32, value: i128, expected: bool) {
        let env = Env::default();
        assert_eq!(is_within_band(&env, value, reference, threshold_bps), Ok(expected));
    }

    #[test]
    fn rounding_widens_band() {
        let env = Env::default();
        // 33 * 0.9 = 29.7 and 33 * 1.1 = 36.3
        assert_eq!(band(&env, 33, 1000), Ok((29, 37)));
    }
}
