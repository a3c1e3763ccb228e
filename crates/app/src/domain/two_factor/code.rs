//! One-time code values.

use std::fmt::{Display, Formatter, Result as FmtResult};

use rand::Rng;

/// Number of digits in a code.
pub const ONE_TIME_CODE_LENGTH: usize = 6;

/// A six-digit numeric code.
///
/// Digits are independent uniform draws; codes are not meant to be
/// cryptographically strong and collisions are expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneTimeCode(String);

impl OneTimeCode {
    #[must_use]
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..ONE_TIME_CODE_LENGTH)
            .map(|_| char::from(b'0' + rng.gen_range(0..10_u8)))
            .collect();

        Self(code)
    }

    /// Accept a stored or submitted value if it has the code shape.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let valid =
            value.len() == ONE_TIME_CODE_LENGTH && value.bytes().all(|b| b.is_ascii_digit());

        valid.then(|| Self(value.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn matches(&self, submitted: &str) -> bool {
        self.0 == submitted
    }
}

impl Display for OneTimeCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}
