//! Model constants. Token amounts are plain `f64` token units; rates are percents.

/// Epochs per calendar day. One epoch is assumed to last one hour.
pub const EPOCHS_PER_DAY: u32 = 24;

/// Days per year used when converting epochs into years.
pub const DAYS_PER_YEAR: u32 = 365;

/// Months per year used by the monthly earnings projection.
pub const MONTHS_PER_YEAR: u32 = 12;

/// Epochs in one (365-day) year.
pub const EPOCHS_PER_YEAR: u32 = EPOCHS_PER_DAY * DAYS_PER_YEAR;

/// Highest accepted cap on the annualized reward rate, in percent.
pub const MAX_CAP_PERCENT: f64 = 20.0;

/// Highest accepted validator commission, in percent.
pub const MAX_COMMISSION_PERCENT: f64 = 100.0;

/// Default final fixed annual rewards, in percent.
pub const DEFAULT_CAP_PERCENT: f64 = 2.0;

/// Default common pool balance, in tokens.
pub const DEFAULT_COMMON_POOL_TOKENS: f64 = 741_546_689.0;

/// Default network-wide staked tokens.
pub const DEFAULT_STAKED_TOKENS: f64 = 4_653_472_533.0;

/// Default token price, in dollars.
pub const DEFAULT_TOKEN_PRICE: f64 = 0.04;

/// Default delegations to the validator, in tokens.
pub const DEFAULT_VALIDATOR_STAKE: f64 = 20_000_000.0;

/// Default validator commission, in percent.
pub const DEFAULT_COMMISSION_PERCENT: f64 = 20.0;

/// Default location of the rewards schedule table.
pub const DEFAULT_SCHEDULE_PATH: &str = "staking_rewards.csv";

/// Header of the date column in the schedule table.
pub const DATE_COLUMN: &str = "Estimated date";

/// Header of the annualized rate column in the schedule table.
pub const ANNUALIZED_RATE_COLUMN: &str = "Estimated annualized rewards %";

/// Header of the per-epoch rate column in the schedule table.
pub const PER_EPOCH_RATE_COLUMN: &str = "Reward per epoch %";
