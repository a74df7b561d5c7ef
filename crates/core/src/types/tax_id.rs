//! Brazilian individual taxpayer number (CPF).

use core::fmt;

use serde::Serialize;

use super::impl_text_sqlx;

/// Errors that can occur when parsing a [`TaxId`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxIdError {
    /// The input does not contain exactly 11 digits once the mask is removed.
    #[error("tax id must have exactly {expected} digits (got {actual})")]
    WrongLength {
        /// Required number of digits.
        expected: usize,
        /// Number of digits found.
        actual: usize,
    },
    /// The check digits do not match, or every digit is the same.
    #[error("tax id is invalid")]
    Invalid,
}

/// An 11-digit tax id with valid check digits.
///
/// Stored without mask characters; use [`TaxId::formatted`] for display.
///
/// ## Check digits
///
/// The first 9 digits are the base. Digit 10 is derived from the base with
/// weights 10 down to 2, digit 11 from the base plus digit 10 with weights 11
/// down to 2. Each pass reduces `sum * 10 mod 11`, mapping 10 to 0.
///
/// Sequences of a single repeated digit satisfy the arithmetic but are not
/// issued, so they are rejected explicitly.
///
/// ## Examples
///
/// ```
/// use customer_registry_core::TaxId;
///
/// let masked = TaxId::parse("529.982.247-25").unwrap();
/// let plain = TaxId::parse("52998224725").unwrap();
/// assert_eq!(masked, plain);
/// assert_eq!(plain.formatted(), "529.982.247-25");
///
/// assert!(TaxId::parse("12345678901").is_err()); // bad check digits
/// assert!(TaxId::parse("11111111111").is_err()); // repeated digit
/// ```
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TaxId(String);

impl TaxId {
    /// Number of digits in a tax id.
    pub const LENGTH: usize = 11;

    const BASE_LENGTH: usize = 9;

    /// Parse a `TaxId`, stripping every non-digit character first.
    ///
    /// # Errors
    ///
    /// Returns [`TaxIdError::WrongLength`] if the stripped input is not 11
    /// digits, and [`TaxIdError::Invalid`] if the check digits are wrong or
    /// the digits are all the same.
    pub fn parse(s: &str) -> Result<Self, TaxIdError> {
        let digits: Vec<u8> = s
            .chars()
            .filter_map(|c| c.to_digit(10))
            .filter_map(|d| u8::try_from(d).ok())
            .collect();

        if digits.len() != Self::LENGTH {
            return Err(TaxIdError::WrongLength {
                expected: Self::LENGTH,
                actual: digits.len(),
            });
        }

        if is_repeated(&digits) {
            return Err(TaxIdError::Invalid);
        }

        let (base, checks) = digits.split_at(Self::BASE_LENGTH);
        let completed = with_check_digits(base);
        if checks != completed.get(Self::BASE_LENGTH..).unwrap_or_default() {
            return Err(TaxIdError::Invalid);
        }

        Ok(Self(to_string(&digits)))
    }

    /// Complete a 9-digit base with its two check digits.
    ///
    /// Returns `None` if any element is not a decimal digit or the resulting
    /// number is a repeated-digit sequence.
    #[must_use]
    pub fn from_base(base: [u8; 9]) -> Option<Self> {
        if base.iter().any(|d| *d > 9) {
            return None;
        }

        let digits = with_check_digits(&base);
        if is_repeated(&digits) {
            return None;
        }

        Some(Self(to_string(&digits)))
    }

    /// Returns the digits as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `TaxId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the tax id with the standard `000.000.000-00` mask.
    #[must_use]
    pub fn formatted(&self) -> String {
        let d = &self.0;
        // All ASCII digits, so byte slicing is on char boundaries.
        format!(
            "{}.{}.{}-{}",
            d.get(0..3).unwrap_or_default(),
            d.get(3..6).unwrap_or_default(),
            d.get(6..9).unwrap_or_default(),
            d.get(9..11).unwrap_or_default()
        )
    }
}

/// Append both check digits to a 9-digit base.
fn with_check_digits(base: &[u8]) -> Vec<u8> {
    let mut digits = base.to_vec();
    digits.push(check_digit(&digits));
    digits.push(check_digit(&digits));
    digits
}

/// Weighted check digit over `digits`, weights counting down to 2.
fn check_digit(digits: &[u8]) -> u8 {
    let weight_start = u32::try_from(digits.len()).unwrap_or(0) + 1;
    let sum: u32 = digits
        .iter()
        .zip((2..=weight_start).rev())
        .map(|(d, w)| u32::from(*d) * w)
        .sum();

    match (sum * 10) % 11 {
        10 => 0,
        // Always < 10 here.
        r => u8::try_from(r).unwrap_or(0),
    }
}

fn is_repeated(digits: &[u8]) -> bool {
    digits.windows(2).all(|w| w.first() == w.get(1))
}

fn to_string(digits: &[u8]) -> String {
    digits.iter().map(|d| char::from(b'0' + d)).collect()
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaxId {
    type Err = TaxIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for TaxId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl_text_sqlx!(TaxId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_unmasked() {
        let tax_id = TaxId::parse("52998224725").unwrap();
        assert_eq!(tax_id.as_str(), "52998224725");
        assert!(TaxId::parse("11144477735").is_ok());
    }

    #[test]
    fn test_parse_strips_mask() {
        for raw in ["529.982.247-25", "529982247-25", " 529 982 247 25 ", "529/982.247_25"] {
            assert_eq!(TaxId::parse(raw).unwrap().as_str(), "52998224725", "{raw}");
        }
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = TaxId::parse("111.444.777-35").unwrap();
        let twice = TaxId::parse(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_wrong_length() {
        assert_eq!(
            TaxId::parse("1234567890"),
            Err(TaxIdError::WrongLength {
                expected: 11,
                actual: 10
            })
        );
        assert!(matches!(
            TaxId::parse(""),
            Err(TaxIdError::WrongLength { actual: 0, .. })
        ));
        assert!(matches!(
            TaxId::parse("529.982.247-255"),
            Err(TaxIdError::WrongLength { actual: 12, .. })
        ));
    }

    #[test]
    fn test_bad_check_digits() {
        assert_eq!(TaxId::parse("12345678901"), Err(TaxIdError::Invalid));
        assert_eq!(TaxId::parse("52998224726"), Err(TaxIdError::Invalid));
        assert_eq!(TaxId::parse("52998224715"), Err(TaxIdError::Invalid));
    }

    #[test]
    fn test_repeated_digits_always_rejected() {
        for d in 0..=9 {
            let raw = d.to_string().repeat(11);
            assert_eq!(TaxId::parse(&raw), Err(TaxIdError::Invalid), "{raw}");
        }
    }

    #[test]
    fn test_from_base_completes_check_digits() {
        let tax_id = TaxId::from_base([5, 2, 9, 9, 8, 2, 2, 4, 7]).unwrap();
        assert_eq!(tax_id.as_str(), "52998224725");

        let tax_id = TaxId::from_base([1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap();
        assert!(TaxId::parse(tax_id.as_str()).is_ok());
    }

    #[test]
    fn test_from_base_rejects_repeated_and_non_digits() {
        assert!(TaxId::from_base([1; 9]).is_none());
        assert!(TaxId::from_base([1, 2, 3, 4, 5, 6, 7, 8, 10]).is_none());
    }

    #[test]
    fn test_formatted() {
        let tax_id = TaxId::parse("52998224725").unwrap();
        assert_eq!(tax_id.formatted(), "529.982.247-25");
        assert_eq!(tax_id.to_string(), "52998224725");
    }

    #[test]
    fn test_serializes_digits_only() {
        let tax_id = TaxId::parse("529.982.247-25").unwrap();
        assert_eq!(serde_json::to_string(&tax_id).unwrap(), "\"52998224725\"");
    }
}
