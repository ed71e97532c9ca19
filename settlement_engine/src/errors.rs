use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum EngineError {
    // input validation
    DeadlineExpired = 1001,
    RecipientCannotBeAddressZero = 1002,
    FeeRecipientCannotBeAddressZero = 1003,
    ArrayLengthMismatch = 1004,
    InvalidFeeBps = 1005,
    InvalidSwapPath = 1006,
    InvalidAmountSpecified = 1007,
    LimitAmountNotMet = 1008,
    LimitAmountExceeded = 1009,
    TokensNotSorted = 1010,
    PoolHookDataNotSupported = 1011,
    CannotPartialFillAfterFirstHop = 1012,
    InvalidPoolFeeBps = 1013,

    // state preconditions
    PoolDoesNotExist = 1101,
    PoolAlreadyExists = 1102,
    InvalidPoolId = 1103,
    InvalidPoolType = 1104,
    PoolCreationWithNoCodeAtToken = 1105,
    LiquidityDataDoesNotCallAddLiquidity = 1106,
    PoolCreationWithLiquidityDidNotAddLiquidity = 1107,
    PoolTypeAlreadyRegistered = 1108,

    // arithmetic
    Overflow = 1201,
    Underflow = 1202,
    FeeExceedsInput = 1203,
    FeeExceedsMaxFee = 1204,
    FeeExceedsOutput = 1205,
    InsufficientLiquidityChange = 1206,
    ExcessiveLiquidityChange = 1207,

    // hooks
    HookFlagsMissingRequired = 1301,
    UnsupportedHookFlags = 1302,
    CannotCollectFeesDuringFlashloan = 1303,

    // settlement
    TokenOwedTransferFailed = 1401,
    TransferHandlerFailedToSettle = 1402,

    // flash loans
    FlashloansDisabled = 1501,
    FlashloanExecutionFailed = 1502,
    FlashloanFeeTokenCannotBeAddressZero = 1503,
    FeeTokenNotAllowedForFlashloan = 1504,
    FlashloanNotRepaid = 1505,

    ExecutionStateViolation = 1601,
}
