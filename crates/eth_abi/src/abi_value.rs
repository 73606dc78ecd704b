use num_bigint::{BigInt, BigUint};

use crate::{
    HexValue,
    types::{Address, Decimal},
};

/// Represents a value that can be encoded or decoded as an Ethereum ABI type.
///
/// Values are loosely typed on input: scalar types coerce what they can (for example a
/// `uint` accepts decimal or `0x` text) and reject the rest. Decoding always produces
/// the canonical variant for each type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ABIValue {
    /// A boolean value.
    Bool(bool),
    /// A signed or unsigned integer.
    Int(BigInt),
    /// An exact decimal, for fixed-point types.
    Decimal(Decimal),
    /// A string value.
    String(String),
    /// A byte string, for `bytes` and `bytesN`.
    Bytes(HexValue),
    /// A 20-byte address.
    Address(Address),
    /// The elements of an array or the fields of a tuple.
    Array(Vec<ABIValue>),
}

impl From<bool> for ABIValue {
    fn from(value: bool) -> Self {
        ABIValue::Bool(value)
    }
}

impl From<BigInt> for ABIValue {
    fn from(value: BigInt) -> Self {
        ABIValue::Int(value)
    }
}

impl From<BigUint> for ABIValue {
    fn from(value: BigUint) -> Self {
        ABIValue::Int(BigInt::from(value))
    }
}

macro_rules! impl_from_primitive_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ABIValue {
                fn from(value: $t) -> Self {
                    ABIValue::Int(BigInt::from(value))
                }
            }
        )*
    };
}

impl_from_primitive_int!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128);

impl From<Decimal> for ABIValue {
    fn from(value: Decimal) -> Self {
        ABIValue::Decimal(value)
    }
}

impl From<String> for ABIValue {
    fn from(value: String) -> Self {
        ABIValue::String(value)
    }
}

impl From<&str> for ABIValue {
    fn from(value: &str) -> Self {
        ABIValue::String(value.to_string())
    }
}

impl From<HexValue> for ABIValue {
    fn from(value: HexValue) -> Self {
        ABIValue::Bytes(value)
    }
}

impl From<&[u8]> for ABIValue {
    fn from(value: &[u8]) -> Self {
        ABIValue::Bytes(HexValue::from_bytes(value))
    }
}

impl From<Address> for ABIValue {
    fn from(value: Address) -> Self {
        ABIValue::Address(value)
    }
}

impl From<Vec<ABIValue>> for ABIValue {
    fn from(value: Vec<ABIValue>) -> Self {
        ABIValue::Array(value)
    }
}

impl ABIValue {
    /// Returns the elements if this is an array or tuple value.
    pub fn as_array(&self) -> Option<&[ABIValue]> {
        match self {
            ABIValue::Array(values) => Some(values),
            _ => None,
        }
    }
}
