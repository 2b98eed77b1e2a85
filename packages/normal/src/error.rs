use soroban_sdk::contracterror;

pub type NormalResult<T = ()> = Result<T, ErrorCode>;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ErrorCode {
    // Lifecycle
    AlreadyInitialized = 1,
    NotInitialized = 2,
    // Authorization
    NotAuthorized = 3,
    // Validation
    InvalidMarket = 10,
    InvalidWeight = 11,
    ZeroAmount = 12,
    DeltaLengthMismatch = 13,
    NonPositiveValue = 14,
    InvalidBps = 15,
    InvalidDecimals = 16,
    DepositCapExceeded = 17,
    InsufficientIdleBalance = 18,
    InsufficientShares = 19,
    InvalidDepositCap = 20,
    // External calls
    TransferFailed = 30,
    // Invariants
    MarketNotFound = 40,
    WeightThresholdExceeded = 41,
    AssetThresholdExceeded = 42,
    ZeroTotalAssets = 43,
    InvalidShareSupply = 44,
    // Math
    MathError = 50,
    CastingFailure = 51,
}

/// Failure classes callers can branch on without matching every code.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Authorization,
    Validation,
    ExternalCall,
    Invariant,
    Internal,
}

impl ErrorCode {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::NotAuthorized => ErrorKind::Authorization,
            ErrorCode::InvalidMarket
            | ErrorCode::InvalidWeight
            | ErrorCode::ZeroAmount
            | ErrorCode::DeltaLengthMismatch
            | ErrorCode::NonPositiveValue
            | ErrorCode::InvalidBps
            | ErrorCode::InvalidDecimals
            | ErrorCode::DepositCapExceeded
            | ErrorCode::InsufficientIdleBalance
            | ErrorCode::InsufficientShares
            | ErrorCode::InvalidDepositCap => ErrorKind::Validation,
            ErrorCode::TransferFailed => ErrorKind::ExternalCall,
            ErrorCode::MarketNotFound
            | ErrorCode::WeightThresholdExceeded
            | ErrorCode::AssetThresholdExceeded
            | ErrorCode::ZeroTotalAssets
            | ErrorCode::InvalidShareSupply => ErrorKind::Invariant,
            ErrorCode::AlreadyInitialized
            | ErrorCode::NotInitialized
            | ErrorCode::MathError
            | ErrorCode::CastingFailure => ErrorKind::Internal,
        }
    }
}
