//! Caller-level validation of the estimate inputs.
//!
//! Every scalar arrives optional (an unset form field or flag). A request is
//! only passed to the estimator once all six values are present, finite and
//! within bounds, and the network stake covers the validator's stake.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CAP_PERCENT, DEFAULT_COMMISSION_PERCENT, DEFAULT_COMMON_POOL_TOKENS,
    DEFAULT_STAKED_TOKENS, DEFAULT_TOKEN_PRICE, DEFAULT_VALIDATOR_STAKE, MAX_CAP_PERCENT,
    MAX_COMMISSION_PERCENT,
};
use crate::error::InputError;
use crate::types::{EarningsInputs, PolicyParameters};

/// Message shown to users for any rejected request.
pub const OUT_OF_BOUNDS_MESSAGE: &str = "Some numbers are out of bounds.";

/// Raw estimate inputs as supplied by the front end.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct EstimateRequest {
    pub cap_percent: Option<f64>,
    pub common_pool_tokens: Option<f64>,
    pub staked_tokens: Option<f64>,
    pub token_price: Option<f64>,
    pub validator_stake: Option<f64>,
    pub commission_percent: Option<f64>,
}

/// A request that passed validation.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct ValidatedRequest {
    pub cap_percent: f64,
    pub common_pool_tokens: f64,
    pub staked_tokens: f64,
    pub token_price: f64,
    pub validator_stake: f64,
    pub commission_percent: f64,
}

impl EstimateRequest {
    /// A request populated with the stock form values.
    pub fn with_defaults() -> Self {
        Self {
            cap_percent: Some(DEFAULT_CAP_PERCENT),
            common_pool_tokens: Some(DEFAULT_COMMON_POOL_TOKENS),
            staked_tokens: Some(DEFAULT_STAKED_TOKENS),
            token_price: Some(DEFAULT_TOKEN_PRICE),
            validator_stake: Some(DEFAULT_VALIDATOR_STAKE),
            commission_percent: Some(DEFAULT_COMMISSION_PERCENT),
        }
    }

    /// Fill every unset field from `fallback`.
    pub fn or(self, fallback: EstimateRequest) -> Self {
        Self {
            cap_percent: self.cap_percent.or(fallback.cap_percent),
            common_pool_tokens: self.common_pool_tokens.or(fallback.common_pool_tokens),
            staked_tokens: self.staked_tokens.or(fallback.staked_tokens),
            token_price: self.token_price.or(fallback.token_price),
            validator_stake: self.validator_stake.or(fallback.validator_stake),
            commission_percent: self.commission_percent.or(fallback.commission_percent),
        }
    }

    pub fn validate(&self) -> Result<ValidatedRequest, InputError> {
        let cap_percent = amount("cap_percent", self.cap_percent)?;
        let common_pool_tokens = amount("common_pool_tokens", self.common_pool_tokens)?;
        let staked_tokens = amount("staked_tokens", self.staked_tokens)?;
        let token_price = amount("token_price", self.token_price)?;
        let validator_stake = amount("validator_stake", self.validator_stake)?;
        let commission_percent = amount("commission_percent", self.commission_percent)?;

        within("cap_percent", cap_percent, MAX_CAP_PERCENT)?;
        within("commission_percent", commission_percent, MAX_COMMISSION_PERCENT)?;

        if staked_tokens == 0.0 {
            return Err(InputError::NoStake);
        }
        if staked_tokens < validator_stake {
            return Err(InputError::StakeBelowValidator {
                staked: staked_tokens.to_string(),
                validator: validator_stake.to_string(),
            });
        }

        Ok(ValidatedRequest {
            cap_percent,
            common_pool_tokens,
            staked_tokens,
            token_price,
            validator_stake,
            commission_percent,
        })
    }
}

impl ValidatedRequest {
    pub fn policy(&self) -> PolicyParameters {
        PolicyParameters {
            cap_percent: self.cap_percent,
            common_pool_tokens: self.common_pool_tokens,
            staked_tokens: self.staked_tokens,
        }
    }

    pub fn earnings_inputs(&self) -> EarningsInputs {
        EarningsInputs {
            validator_stake: self.validator_stake,
            token_price: self.token_price,
            commission_percent: self.commission_percent,
        }
    }
}

/// Present, finite and non-negative.
fn amount(field: &'static str, value: Option<f64>) -> Result<f64, InputError> {
    let value = value.ok_or(InputError::Missing(field))?;
    if !value.is_finite() {
        return Err(InputError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(InputError::Negative { field });
    }
    Ok(value)
}

fn within(field: &'static str, value: f64, max: f64) -> Result<(), InputError> {
    if value > max {
        return Err(InputError::OutOfRange {
            field,
            value: value.to_string(),
            min: "0".to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}
