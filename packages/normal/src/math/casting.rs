use core::panic::Location;

use soroban_sdk::{ log, Env };

use crate::error::{ ErrorCode, NormalResult };

pub trait Cast: Sized {
    /// Perform a checked conversion, logging the call site on failure
    #[track_caller]
    #[inline(always)]
    fn cast<T: TryFrom<Self>>(self, env: &Env) -> NormalResult<T> {
        match T::try_from(self) {
            Ok(result) => Ok(result),
            Err(_) => {
                log!(env, "Casting error thrown at line {}", Location::caller().line());
                Err(ErrorCode::CastingFailure)
            }
        }
    }
}

impl Cast for u128 {}
impl Cast for u64 {}
impl Cast for u32 {}
impl Cast for usize {}
impl Cast for i128 {}
impl Cast for i64 {}
impl Cast for i32 {}
