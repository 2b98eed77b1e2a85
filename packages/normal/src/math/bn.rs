//! Big number types

#![allow(clippy::assign_op_pattern)]
#![allow(clippy::ptr_offset_with_cast)]
#![allow(clippy::manual_range_contains)]

use soroban_sdk::{ log, Env };
use uint::construct_uint;

use crate::error::{ ErrorCode, NormalResult };

construct_uint! {
    /// 256-bit unsigned integer.
    pub struct U256(4);
}

/// Largest power of ten that fits in a U256
pub const MAX_U256_DECIMALS: u32 = 76;

impl U256 {
    /// 10^exp, rejecting exponents the type cannot hold
    pub fn checked_exp10(env: &Env, exp: u32) -> NormalResult<Self> {
        if exp > MAX_U256_DECIMALS {
            log!(env, "Exponent {} exceeds U256 precision", exp);
            return Err(ErrorCode::InvalidDecimals);
        }
        Ok(U256::exp10(exp as usize))
    }

    /// Convert u256 to u128
    pub fn try_to_u128(self, env: &Env) -> NormalResult<u128> {
        if self.bits() > 128 {
            log!(env, "U256 does not fit in u128");
            return Err(ErrorCode::CastingFailure);
        }
        Ok(self.low_u128())
    }
}

#[cfg(test)]
mod test {
    use soroban_sdk::Env;

    use super::U256;
    use crate::error::ErrorCode;

    #[test]
    fn exp10_bounds() {
        let env = Env::default();
        assert_eq!(U256::checked_exp10(&env, 0), Ok(U256::one()));
        assert_eq!(U256::checked_exp10(&env, 18).unwrap().try_to_u128(&env), Ok(10u128.pow(18)));
        assert_eq!(U256::checked_exp10(&env, 77), Err(ErrorCode::InvalidDecimals));
    }

    #[test]
    fn narrowing() {
        let env = Env::default();
        let wide = U256::from(u128::MAX) + U256::one();
        assert_eq!(wide.try_to_u128(&env), Err(ErrorCode::CastingFailure));
        assert_eq!(U256::from(u128::MAX).try_to_u128(&env), Ok(u128::MAX));
    }
}
