//! One-time numeric verification codes.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

const MIN_CODE: u32 = 100_000;
const MAX_CODE: u32 = 999_999;

/// A six-digit code with no leading zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VerificationCode(String);

impl VerificationCode {
    /// Draws a code uniformly from `[100000, 999999]`.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        Self(rng.gen_range(MIN_CODE..=MAX_CODE).to_string())
    }

    /// Parses user input, ignoring surrounding whitespace.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("code"));
        }
        if trimmed.len() != 6 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::invalid_format("code", "must be 6 digits"));
        }
        if trimmed.starts_with('0') {
            return Err(ValidationError::invalid_format(
                "code",
                "must not start with 0",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for VerificationCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VerificationCode> for String {
    fn from(code: VerificationCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn parse_accepts_six_digits() {
        assert_eq!(VerificationCode::parse(" 123456 ").unwrap().as_str(), "123456");
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(VerificationCode::parse("").is_err());
        assert!(VerificationCode::parse("12345").is_err());
        assert!(VerificationCode::parse("1234567").is_err());
        assert!(VerificationCode::parse("12a456").is_err());
        assert!(VerificationCode::parse("012345").is_err());
    }

    #[test]
    fn serde_round_trips_through_string() {
        let code = VerificationCode::parse("654321").unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"654321\"");
        assert!(serde_json::from_str::<VerificationCode>("\"000001\"").is_err());
    }

    proptest! {
        #[test]
        fn generated_codes_are_six_digits_in_range(seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let code = VerificationCode::generate(&mut rng);

            prop_assert_eq!(code.as_str().len(), 6);
            prop_assert!(code.as_str().bytes().all(|b| b.is_ascii_digit()));
            let value: u32 = code.as_str().parse().unwrap();
            prop_assert!((MIN_CODE..=MAX_CODE).contains(&value));
            prop_assert!(VerificationCode::parse(code.as_str()).is_ok());
        }
    }
}
