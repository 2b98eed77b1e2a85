// ################################################################
//                             TTL
// ################################################################

pub const DAY_IN_LEDGERS: u32 = 17_280;

pub const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

pub const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub const PERSISTENT_LIFETIME_THRESHOLD: u32 = PERSISTENT_BUMP_AMOUNT - DAY_IN_LEDGERS;

// ################################################################
//                           PRECISION
// ################################################################

pub const BPS_DENOMINATOR: u32 = 10_000;
pub const BPS_DENOMINATOR_I128: i128 = 10_000;

/// Share decimals offset above which 10^offset stops being a sane virtual supply
pub const MAX_DECIMALS_OFFSET: u32 = 18;
