use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use num_bigint::{BigInt, Sign};

use crate::ABIError;

/// An exact decimal number: `unscaled * 10^-scale`.
///
/// The scale is the number of digits written after the decimal point, so `1.50` and
/// `1.5` are different values here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    unscaled: BigInt,
    scale: u32,
}

impl Decimal {
    pub fn new(unscaled: BigInt, scale: u32) -> Self {
        Self { unscaled, scale }
    }

    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.unscaled.sign() == Sign::NoSign
    }
}

impl From<BigInt> for Decimal {
    fn from(value: BigInt) -> Self {
        Self::new(value, 0)
    }
}

impl FromStr for Decimal {
    type Err = ABIError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ABIError::FormatError {
            message: format!("'{}' is not a valid decimal number", s),
        };

        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (whole, fraction) = body.split_once('.').unwrap_or((body, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let digits = format!("{}{}", whole, fraction);
        let magnitude = BigInt::from_str(&digits).map_err(|_| invalid())?;
        let unscaled = if negative { -magnitude } else { magnitude };
        let scale = u32::try_from(fraction.len()).map_err(|_| invalid())?;

        Ok(Self::new(unscaled, scale))
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let sign = if self.unscaled.sign() == Sign::Minus {
            "-"
        } else {
            ""
        };
        let digits = self.unscaled.magnitude().to_string();
        let scale = self.scale as usize;

        if scale == 0 {
            return write!(f, "{}{}", sign, digits);
        }

        let digits = format!("{:0>width$}", digits, width = scale + 1);
        let (whole, fraction) = digits.split_at(digits.len() - scale);
        write!(f, "{}{}.{}", sign, whole, fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.5", 15, 1)]
    #[case("1.50", 150, 2)]
    #[case("-0.005", -5, 3)]
    #[case("42", 42, 0)]
    #[case(".25", 25, 2)]
    #[case("+3.0", 30, 1)]
    fn test_parse(#[case] input: &str, #[case] unscaled: i64, #[case] scale: u32) {
        let decimal = Decimal::from_str(input).unwrap();
        assert_eq!(decimal.unscaled(), &BigInt::from(unscaled));
        assert_eq!(decimal.scale(), scale);
    }

    #[rstest]
    #[case(15, 1, "1.5")]
    #[case(-5, 3, "-0.005")]
    #[case(5, 0, "5")]
    #[case(1000000000000000000, 18, "1.000000000000000000")]
    fn test_display(#[case] unscaled: i64, #[case] scale: u32, #[case] expected: &str) {
        assert_eq!(Decimal::new(BigInt::from(unscaled), scale).to_string(), expected);
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("1.2.3")]
    #[case("abc")]
    #[case("1e5")]
    fn test_parse_invalid(#[case] input: &str) {
        assert!(matches!(
            Decimal::from_str(input),
            Err(ABIError::FormatError { .. })
        ));
    }
}
