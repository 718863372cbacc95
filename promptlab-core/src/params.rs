use crate::types::{PromptConfig, StopSequences};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TEMPERATURE_RANGE: (f32, f32) = (0.0, 2.0);
pub const PENALTY_RANGE: (f32, f32) = (-2.0, 2.0);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("model must not be empty")]
    EmptyModel,

    #[error("{field} must be a number, got '{value}'")]
    NotNumeric { field: &'static str, value: String },

    #[error("{field} must be a whole number, got '{value}'")]
    NotIntegral { field: &'static str, value: String },

    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("max_tokens must be at least 1")]
    ZeroMaxTokens,
}

/// A numeric field as a browser form delivers it: already a number, or the
/// raw text the user typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    fn as_f32(&self, field: &'static str) -> Result<f32, ParamError> {
        match self {
            FieldValue::Number(n) => Ok(*n as f32),
            FieldValue::Text(s) => s.trim().parse::<f32>().map_err(|_| ParamError::NotNumeric {
                field,
                value: s.clone(),
            }),
        }
    }

    fn as_u32(&self, field: &'static str) -> Result<u32, ParamError> {
        match self {
            FieldValue::Number(n) => {
                if n.fract() != 0.0 || *n < 0.0 || *n > f64::from(u32::MAX) {
                    return Err(ParamError::NotIntegral {
                        field,
                        value: n.to_string(),
                    });
                }
                Ok(*n as u32)
            }
            FieldValue::Text(s) => s.trim().parse::<u32>().map_err(|_| ParamError::NotIntegral {
                field,
                value: s.clone(),
            }),
        }
    }
}

/// The untrusted counterpart of [`PromptConfig`], shaped like a submitted
/// form row. Coercion to the typed config is explicit and fallible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPromptConfig {
    pub model: String,
    pub temperature: FieldValue,
    pub max_tokens: FieldValue,
    pub presence_penalty: FieldValue,
    pub frequency_penalty: FieldValue,
    #[serde(default)]
    pub stop: Option<StopSequences>,
}

impl RawPromptConfig {
    pub fn parse(&self) -> Result<PromptConfig, ParamError> {
        let config = PromptConfig {
            model: self.model.trim().to_string(),
            temperature: self.temperature.as_f32("temperature")?,
            max_tokens: self.max_tokens.as_u32("max_tokens")?,
            presence_penalty: self.presence_penalty.as_f32("presence_penalty")?,
            frequency_penalty: self.frequency_penalty.as_f32("frequency_penalty")?,
            stop: self.stop.clone(),
        };
        validate(&config)?;
        Ok(config)
    }
}

/// Range checks applied to every configuration before it is forwarded.
pub fn validate(config: &PromptConfig) -> Result<(), ParamError> {
    if config.model.trim().is_empty() {
        return Err(ParamError::EmptyModel);
    }
    if config.max_tokens == 0 {
        return Err(ParamError::ZeroMaxTokens);
    }

    check_range("temperature", config.temperature, TEMPERATURE_RANGE)?;
    check_range("presence_penalty", config.presence_penalty, PENALTY_RANGE)?;
    check_range("frequency_penalty", config.frequency_penalty, PENALTY_RANGE)?;
    Ok(())
}

fn check_range(field: &'static str, value: f32, (min, max): (f32, f32)) -> Result<(), ParamError> {
    // NaN fails the contains check, so non-finite values are rejected here too.
    if !(min..=max).contains(&value) {
        return Err(ParamError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}
