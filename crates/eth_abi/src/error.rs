use snafu::Snafu;

/// Represents an error that can occur while building, encoding or decoding Ethereum ABI data.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum ABIError {
    /// Text that is not a well-formed hex or integer literal.
    #[snafu(display("Invalid format: {message}"))]
    FormatError { message: String },

    /// A type signature outside the supported Solidity grammar.
    #[snafu(display("Unsupported type: {message}"))]
    UnsupportedTypeError { message: String },

    /// A value rejected by a typed constructor.
    #[snafu(display("ABI validation failed: {message}"))]
    ValidationError { message: String },

    /// A number that does not fit the declared width.
    #[snafu(display("Value out of range: {message}"))]
    OutOfRangeError { message: String },

    /// A negative number given to an unsigned type.
    #[snafu(display("Sign mismatch: {message}"))]
    SignMismatchError { message: String },

    /// A decimal whose scale differs from the declared decimals.
    #[snafu(display("Scale mismatch: {message}"))]
    ScaleMismatchError { message: String },

    /// Malformed, truncated or inconsistent encoded data.
    #[snafu(display("ABI decoding failed: {message}"))]
    DecodingError { message: String },

    /// A value tree that does not match the shape of its type, or nests too deeply.
    #[snafu(display("Invalid structure: {message}"))]
    StructureError { message: String },

    /// Hex values of different signs combined into one.
    #[snafu(display("Mixed signs: {message}"))]
    MixedSignError { message: String },

    /// Arguments that cannot be processed at all.
    #[snafu(display("Invalid input: {message}"))]
    InvalidInputError { message: String },
}
