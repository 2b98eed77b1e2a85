use soroban_sdk::{ contractclient, contracttype, Address, Env };

/// Which pnl cap the reader applies when valuing a pool's market token
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum PnlFactorKind {
    MaxPnlForDeposits = 0,
    MaxPnlForWithdrawals = 1,
    MaxPnlForTraders = 2,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolDescriptor {
    /// Token representing a position in the pool
    pub market_token: Address,
    pub index_token: Address,
    pub long_token: Address,
    pub short_token: Address,
}

/// A signed price for one unit of market token.
///
/// `value` carries `scale` decimals. Quotes are produced and consumed within a
/// single valuation and are never stored.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceQuote {
    pub value: i128,
    pub scale: u32,
    pub pnl_factor: PnlFactorKind,
}

impl PriceQuote {
    pub fn is_positive(&self) -> bool {
        self.value > 0
    }
}

/// Read-only market valuation service.
///
/// `conservative` selects which bound of a price range is returned when the
/// reader cannot produce a point estimate.
#[contractclient(name = "MarketReaderClient")]
pub trait MarketReader {
    fn describe(env: Env, market: Address) -> PoolDescriptor;

    fn quote_price(
        env: Env,
        pool: PoolDescriptor,
        pnl_factor: PnlFactorKind,
        conservative: bool
    ) -> PriceQuote;

    fn pool_valuation(env: Env, pool: PoolDescriptor, conservative: bool) -> i128;
}
