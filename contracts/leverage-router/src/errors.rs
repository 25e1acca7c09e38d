use soroban_sdk::contracterror;

/// Failure taxonomy for the position router.
///
/// Every variant is fatal to the calling transaction: the Soroban host
/// rolls back all storage and token effects when the top-level invocation
/// returns an error, so no partial operation ever survives. Distinct
/// causes stay distinct variants so monitoring and tests can assert on the
/// exact failure; in particular `SwapOutputBelowMinimum` and
/// `InsufficientRepayment` are never collapsed even though they can
/// coincide.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum RouterError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Paused = 3,
    /// Caller is neither the initiator nor an approved delegate
    Unauthorized = 4,
    InvalidAmount = 5,
    MarketNotListed = 6,
    /// Pre- or post-operation shortfall detected
    SolvencyShortfall = 7,
    /// The lending core's liquidity query itself failed
    SolvencyQueryFailed = 8,
    /// Callback arrived with no operation in flight, or an empty kind
    NoActiveOperation = 9,
    /// Callback's claimed loan initiator is not this contract
    InitiatorMismatch = 10,
    /// Callback's claimed beneficiary differs from the stored initiator
    BeneficiaryMismatch = 11,
    /// Callback did not carry exactly one asset/amount/fee triple
    UnexpectedLoanCardinality = 12,
    ReentrantCall = 13,
    /// A lending-core mutator returned a failure
    CoreCallFailed = 14,
    /// The swap executor call itself failed
    SwapFailed = 15,
    /// Observed swap output below the caller-declared minimum
    SwapOutputBelowMinimum = 16,
    /// Funds on hand cannot cover the amount owed back to the lending core
    InsufficientRepayment = 17,
    Overflow = 18,
}
