use soroban_sdk::{ log, Env, Symbol };

use crate::error::{ ErrorCode, NormalResult };
use crate::math::ceil_div::CheckedCeilDiv;

pub trait SafeMath: Sized {
    fn safe_add(self, rhs: Self, env: &Env) -> NormalResult<Self>;
    fn safe_sub(self, rhs: Self, env: &Env) -> NormalResult<Self>;
    fn safe_mul(self, rhs: Self, env: &Env) -> NormalResult<Self>;
    fn safe_div(self, rhs: Self, env: &Env) -> NormalResult<Self>;
    fn safe_div_ceil(self, rhs: Self, env: &Env) -> NormalResult<Self>;
}

macro_rules! checked_impl {
    ($t:ty) => {
        impl SafeMath for $t {
            #[track_caller]
            #[inline(always)]
            fn safe_add(self, v: $t, env: &Env) -> NormalResult<$t> {
                self.checked_add(v).ok_or_else(|| overflow(env, "add"))
            }

            #[track_caller]
            #[inline(always)]
            fn safe_sub(self, v: $t, env: &Env) -> NormalResult<$t> {
                self.checked_sub(v).ok_or_else(|| overflow(env, "sub"))
            }

            #[track_caller]
            #[inline(always)]
            fn safe_mul(self, v: $t, env: &Env) -> NormalResult<$t> {
                self.checked_mul(v).ok_or_else(|| overflow(env, "mul"))
            }

            #[track_caller]
            #[inline(always)]
            fn safe_div(self, v: $t, env: &Env) -> NormalResult<$t> {
                self.checked_div(v).ok_or_else(|| overflow(env, "div"))
            }

            #[track_caller]
            #[inline(always)]
            fn safe_div_ceil(self, v: $t, env: &Env) -> NormalResult<$t> {
                self.checked_ceil_div(v).ok_or_else(|| overflow(env, "div_ceil"))
            }
        }
    };
}

fn overflow(env: &Env, op: &str) -> ErrorCode {
    log!(env, "Math error thrown in safe_{}", Symbol::new(env, op));
    ErrorCode::MathError
}

checked_impl!(u128);
checked_impl!(u64);
checked_impl!(u32);
checked_impl!(i128);
checked_impl!(i64);
