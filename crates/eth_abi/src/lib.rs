//! A library for encoding and decoding Ethereum contract ABI values, as used by Solidity.
//!
//! Values are exchanged as [`HexValue`]s, typed by signatures such as `uint256`,
//! `bytes32[]` or `(address,string)`, and laid out in the head/tail format of the
//! [Solidity ABI specification](https://docs.soliditylang.org/en/latest/abi-spec.html).
pub mod abi;
pub mod abi_type;
pub mod abi_value;
pub mod canonical;
pub mod checksum;
pub mod constants;
pub mod error;
pub mod hex_value;
pub mod keccak;
pub mod method;
pub mod provider;
pub mod signature;
pub mod types;
pub mod utils;

pub use abi::{
    decode_parameter, decode_parameters, decode_parameters_from_bytes, encode_parameter,
    encode_parameters,
};
pub use abi_type::ABIType;
pub use abi_value::ABIValue;
pub use error::ABIError;
pub use hex_value::{HexValue, PadSide};
pub use keccak::{keccak256, sha3};
pub use method::ABIMethod;
pub use provider::Provider;
pub use signature::ec_recover;
pub use types::collections::tuple::{decode_abi_types, encode_abi_types};
pub use types::{
    Address, ByteWidth, Bytes, Decimal, Decimals, EthValue, Fixed, Integer, ScalarType,
};
