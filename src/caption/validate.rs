//! Validation of raw, caller-supplied request parameters.
//!
//! Nothing here retries or touches shared state: a bad value is reported
//! straight back with the set of values that would have been accepted.

use crate::types::{Platform, Tone};
use crate::{Result, WartaError};

/// Accepted spellings of the low-cost tier flag.
const FLAG_VALUES: &[&str] = &["true", "false"];

/// Validated request parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedParams {
    pub tone: Tone,
    pub platform: Platform,
    pub use_free_model: bool,
}

/// Validate tone, platform and the optional free-tier flag.
///
/// The flag defaults to `false` when absent.
pub fn validate_params(
    tone: &str,
    platform: &str,
    use_free_model: Option<&str>,
) -> Result<ValidatedParams> {
    let tone: Tone = tone.parse()?;
    let platform: Platform = platform.parse()?;
    let use_free_model = match use_free_model {
        None => false,
        Some("true") => true,
        Some("false") => false,
        Some(other) => {
            return Err(WartaError::validation("use_free_model", other, FLAG_VALUES));
        }
    };
    Ok(ValidatedParams {
        tone,
        platform,
        use_free_model,
    })
}
