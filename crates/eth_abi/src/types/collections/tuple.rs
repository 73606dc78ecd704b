use log::trace;

use crate::{
    ABIError, ABIType, ABIValue,
    constants::WORD_SIZE,
    utils::{usize_to_word, word_to_usize},
};

/// Byte range `[left, right)` of one dynamic value's tail block.
struct Segment {
    left: usize,
    right: usize,
}

impl ABIType {
    pub(crate) fn encode_tuple(&self, value: &ABIValue, depth: usize) -> Result<Vec<u8>, ABIError> {
        let child_types = match self {
            ABIType::Tuple(child_types) => child_types.iter().collect::<Vec<_>>(),
            _ => {
                return Err(ABIError::StructureError {
                    message: "ABI type mismatch, expected tuple".to_string(),
                });
            }
        };

        let values = match value {
            ABIValue::Array(n) => n,
            _ => {
                return Err(ABIError::StructureError {
                    message: format!(
                        "ABI value mismatch, expected an array of values for {}",
                        self
                    ),
                });
            }
        };

        encode_abi_types_at(&child_types, values, depth + 1)
    }

    pub(crate) fn decode_tuple(&self, bytes: &[u8], depth: usize) -> Result<ABIValue, ABIError> {
        let child_types = match self {
            ABIType::Tuple(child_types) => child_types.iter().collect::<Vec<_>>(),
            _ => {
                return Err(ABIError::DecodingError {
                    message: "ABI type mismatch, expected tuple".to_string(),
                });
            }
        };

        decode_abi_types_at(&child_types, bytes, depth + 1).map(ABIValue::Array)
    }
}

/// Encodes `values` as consecutive heads followed by the tails of the dynamic ones.
///
/// Static values are written inline in the head. Each dynamic value gets a head word
/// holding the byte offset of its tail, measured from the start of this block.
pub fn encode_abi_types(abi_types: &[&ABIType], values: &[ABIValue]) -> Result<Vec<u8>, ABIError> {
    encode_abi_types_at(abi_types, values, 0)
}

/// Decodes a block produced by [`encode_abi_types`].
pub fn decode_abi_types(abi_types: &[&ABIType], bytes: &[u8]) -> Result<Vec<ABIValue>, ABIError> {
    decode_abi_types_at(abi_types, bytes, 0)
}

pub(crate) fn encode_abi_types_at(
    abi_types: &[&ABIType],
    values: &[ABIValue],
    depth: usize,
) -> Result<Vec<u8>, ABIError> {
    if abi_types.len() != values.len() {
        return Err(ABIError::StructureError {
            message: format!(
                "Mismatch lengths between the values and types, expected {} values, got {}",
                abi_types.len(),
                values.len()
            ),
        });
    }

    // Dynamic heads are unknown until every tail is encoded; `None` marks a placeholder.
    let mut heads: Vec<Option<Vec<u8>>> = Vec::with_capacity(abi_types.len());
    let mut tails: Vec<Vec<u8>> = Vec::new();

    for (child_type, value) in abi_types.iter().zip(values) {
        if child_type.is_dynamic() {
            heads.push(None);
            tails.push(child_type.encode_at(value, depth)?);
        } else {
            heads.push(Some(child_type.encode_at(value, depth)?));
        }
    }

    let head_length: usize = heads
        .iter()
        .map(|head| head.as_ref().map_or(WORD_SIZE, Vec::len))
        .sum();

    let mut results: Vec<u8> = Vec::new();
    let mut offset = head_length;
    let mut tail_lengths = tails.iter().map(Vec::len);

    for head in heads {
        match head {
            Some(head) => results.extend(head),
            None => {
                trace!("Dynamic tail at offset {}", offset);
                results.extend(usize_to_word(offset));
                offset += tail_lengths.next().unwrap_or_default();
            }
        }
    }

    results.extend(tails.into_iter().flatten());
    Ok(results)
}

pub(crate) fn decode_abi_types_at(
    abi_types: &[&ABIType],
    bytes: &[u8],
    depth: usize,
) -> Result<Vec<ABIValue>, ABIError> {
    let value_partitions = extract_values(abi_types, bytes)?;

    abi_types
        .iter()
        .zip(value_partitions)
        .map(|(child_type, partition)| child_type.decode_at(partition, depth))
        .collect()
}

/// Splits `bytes` into one slice per type: the inline words of static types and the
/// tail blocks of dynamic ones.
fn extract_values<'a>(abi_types: &[&ABIType], bytes: &'a [u8]) -> Result<Vec<&'a [u8]>, ABIError> {
    let mut dynamic_segments: Vec<Segment> = Vec::new();
    let mut value_partitions: Vec<Option<&[u8]>> = Vec::with_capacity(abi_types.len());
    let mut bytes_cursor: usize = 0;

    for child_type in abi_types {
        if child_type.is_dynamic() {
            let offset_word = bytes
                .get(bytes_cursor..bytes_cursor + WORD_SIZE)
                .ok_or_else(|| ABIError::DecodingError {
                    message: "Byte array is too short to be decoded".to_string(),
                })?;
            let offset = word_to_usize(offset_word).ok_or_else(|| ABIError::DecodingError {
                message: "Dynamic offset does not fit in memory".to_string(),
            })?;

            if let Some(last_segment) = dynamic_segments.last_mut() {
                if offset <= last_segment.left {
                    return Err(ABIError::DecodingError {
                        message: format!(
                            "Dynamic offsets must be strictly increasing, got {} after {}",
                            offset, last_segment.left
                        ),
                    });
                }
                last_segment.right = offset;
            }

            dynamic_segments.push(Segment {
                left: offset,
                right: bytes.len(),
            });
            value_partitions.push(None);
            bytes_cursor += WORD_SIZE;
        } else {
            let child_type_size = child_type.head_size();
            let end = bytes_cursor
                .checked_add(child_type_size)
                .filter(|end| *end <= bytes.len())
                .ok_or_else(|| ABIError::DecodingError {
                    message: format!(
                        "Index out of bounds: trying to access bytes[{}..{}] but slice has length {}",
                        bytes_cursor,
                        bytes_cursor.saturating_add(child_type_size),
                        bytes.len()
                    ),
                })?;

            value_partitions.push(Some(&bytes[bytes_cursor..end]));
            bytes_cursor = end;
        }
    }

    match (dynamic_segments.first(), dynamic_segments.last()) {
        (None, _) if bytes_cursor < bytes.len() => {
            return Err(ABIError::DecodingError {
                message: "Input bytes not fully consumed".to_string(),
            });
        }
        (Some(first), _) if first.left < bytes_cursor => {
            return Err(ABIError::DecodingError {
                message: format!(
                    "Dynamic offset {} points inside the {}-byte head",
                    first.left, bytes_cursor
                ),
            });
        }
        (_, Some(last)) if last.left > bytes.len() => {
            return Err(ABIError::DecodingError {
                message: format!(
                    "Dynamic offset {} is beyond the end of the {} bytes",
                    last.left,
                    bytes.len()
                ),
            });
        }
        _ => {}
    }

    let mut segments = dynamic_segments.into_iter();
    value_partitions
        .into_iter()
        .enumerate()
        .map(|(i, partition)| match partition {
            Some(partition) => Ok(partition),
            None => segments
                .next()
                .map(|segment| &bytes[segment.left..segment.right])
                .ok_or_else(|| ABIError::DecodingError {
                    message: format!("Value partition at index {} is missing", i),
                }),
        })
        .collect()
}
