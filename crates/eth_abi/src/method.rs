use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use log::debug;

use crate::{
    ABIError, ABIType, ABIValue, HexValue,
    abi_type::parse_tuple_content,
    constants::SELECTOR_BYTE_LENGTH,
    keccak::keccak256,
    types::collections::tuple::{decode_abi_types, encode_abi_types},
};

/// A contract function, parsed from `name(type,...)` with an optional `(type,...)`
/// list of outputs appended, as in `balanceOf(address)(uint256)`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ABIMethod {
    /// The name of the method.
    pub name: String,
    /// The argument types.
    pub args: Vec<ABIType>,
    /// The output types; empty when none were given.
    pub returns: Vec<ABIType>,
}

impl ABIMethod {
    pub fn new(name: String, args: Vec<ABIType>, returns: Vec<ABIType>) -> Self {
        Self {
            name,
            args,
            returns,
        }
    }

    /// The canonical signature `name(type,...)` that the selector is hashed from.
    pub fn signature(&self) -> Result<String, ABIError> {
        if self.name.is_empty() {
            return Err(ABIError::ValidationError {
                message: "Method name cannot be empty".to_string(),
            });
        }

        let arg_types: Vec<String> = self.args.iter().map(|t| t.to_string()).collect();
        Ok(format!("{}({})", self.name, arg_types.join(",")))
    }

    /// The first 4 bytes of the Keccak-256 hash of the signature.
    pub fn selector(&self) -> Result<[u8; SELECTOR_BYTE_LENGTH], ABIError> {
        let hash = keccak256(self.signature()?.as_bytes());
        let mut selector = [0u8; SELECTOR_BYTE_LENGTH];
        selector.copy_from_slice(&hash[..SELECTOR_BYTE_LENGTH]);
        Ok(selector)
    }

    /// Encodes call data: the selector followed by the encoded arguments.
    pub fn encode_call(&self, values: &[ABIValue]) -> Result<HexValue, ABIError> {
        let refs: Vec<&ABIType> = self.args.iter().collect();
        let mut call_data = self.selector()?.to_vec();
        call_data.extend(encode_abi_types(&refs, values)?);

        debug!(
            "Encoded call to {} into {} bytes",
            self.name,
            call_data.len()
        );
        Ok(HexValue::from_bytes(&call_data))
    }

    /// Decodes the arguments of call data, checking that it targets this method.
    pub fn decode_call(&self, call_data: &HexValue) -> Result<Vec<ABIValue>, ABIError> {
        let bytes = call_data.to_bytes();
        let selector = self.selector()?;

        if call_data.is_negative() || !bytes.starts_with(&selector) {
            return Err(ABIError::DecodingError {
                message: format!(
                    "Call data does not start with the selector 0x{} of {}",
                    hex::encode(selector),
                    self.signature()?
                ),
            });
        }

        let refs: Vec<&ABIType> = self.args.iter().collect();
        decode_abi_types(&refs, &bytes[SELECTOR_BYTE_LENGTH..])
    }

    /// Decodes data returned by a call to this method.
    pub fn decode_output(&self, data: &HexValue) -> Result<Vec<ABIValue>, ABIError> {
        if data.is_negative() {
            return Err(ABIError::DecodingError {
                message: format!("Output data of {} cannot be negative", self.name),
            });
        }

        let refs: Vec<&ABIType> = self.returns.iter().collect();
        decode_abi_types(&refs, &data.to_bytes())
    }
}

impl Display for ABIMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let arg_types: Vec<String> = self.args.iter().map(|t| t.to_string()).collect();
        write!(f, "{}({})", self.name, arg_types.join(","))?;

        if !self.returns.is_empty() {
            let return_types: Vec<String> = self.returns.iter().map(|t| t.to_string()).collect();
            write!(f, "({})", return_types.join(","))?;
        }
        Ok(())
    }
}

impl FromStr for ABIMethod {
    type Err = ABIError;

    fn from_str(signature: &str) -> Result<Self, Self::Err> {
        if signature.chars().any(|c| c.is_whitespace()) {
            return Err(ABIError::ValidationError {
                message: "Method signature cannot contain whitespace".to_string(),
            });
        }

        let open_paren_pos = signature.find('(').ok_or_else(|| ABIError::ValidationError {
            message: "Method signature must contain opening parenthesis".to_string(),
        })?;

        if open_paren_pos == 0 {
            return Err(ABIError::ValidationError {
                message: "Method name cannot be empty".to_string(),
            });
        }
        let method_name = signature[..open_paren_pos].to_string();

        let close_paren_pos = find_matching_closing_paren(signature, open_paren_pos)?;
        let args = parse_type_list(&signature[open_paren_pos + 1..close_paren_pos])?;

        let rest = &signature[close_paren_pos + 1..];
        let returns = if rest.is_empty() {
            Vec::new()
        } else {
            let inner = rest
                .strip_prefix('(')
                .and_then(|r| r.strip_suffix(')'))
                .ok_or_else(|| ABIError::ValidationError {
                    message: format!("Unexpected text after arguments: '{}'", rest),
                })?;
            parse_type_list(inner)?
        };

        Ok(ABIMethod::new(method_name, args, returns))
    }
}

fn parse_type_list(list: &str) -> Result<Vec<ABIType>, ABIError> {
    parse_tuple_content(list)?
        .iter()
        .map(|t| ABIType::from_str(t))
        .collect()
}

/// Find the matching closing parenthesis for an opening parenthesis.
fn find_matching_closing_paren(s: &str, open_pos: usize) -> Result<usize, ABIError> {
    let mut depth = 0;

    for (i, ch) in s.char_indices().skip_while(|(i, _)| *i < open_pos) {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }

    Err(ABIError::ValidationError {
        message: "Mismatched parentheses in method signature".to_string(),
    })
}
