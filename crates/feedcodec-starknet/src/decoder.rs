//! Schema-driven Cairo 0 calldata decoder.
//!
//! # How it works
//! - The transaction's `entry_point_selector` picks the function from the registry
//! - The function's inputs are laid out (see [`crate::layout`]) and walked in order
//! - Each member consumes words from one shared [`WordCursor`]; structs recurse
//!   into their own member lists over the same cursor
//! - An array whose prefix word is zero consumes only that word and decodes empty
//!
//! Any failure aborts the whole call; no partial tree is ever returned.

use feedcodec_core::{
    abi::{FunctionDef, MemberDef},
    call::DecodedCall,
    error::DecodeError,
    feed::RawTransaction,
    schema::SchemaRegistry,
    selector::Selector,
    value::{DecodedNode, DecodedStruct, DecodedValue},
    word::Word,
};
use tracing::{debug, trace};

use crate::cursor::WordCursor;
use crate::layout::{lay_out, LaidOutMember, MemberLayout};

/// Maximum struct nesting depth. On-chain ABIs are acyclic; this only trips
/// on a registry whose structs reference each other in a loop.
pub const MAX_NESTING: usize = 64;

/// Upper bound on the length of an array whose elements take no words.
pub const MAX_ZERO_WIDTH_ELEMENTS: usize = 1 << 16;

/// Cairo 0 calldata decoder over a schema registry.
pub struct CalldataDecoder<'r> {
    registry: &'r dyn SchemaRegistry,
}

impl<'r> CalldataDecoder<'r> {
    pub fn new(registry: &'r dyn SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Decode a raw transaction: resolve its function by selector, then
    /// decode its calldata against that function's inputs.
    pub fn decode_transaction(&self, tx: &RawTransaction) -> Result<DecodedCall, DecodeError> {
        let raw_selector =
            tx.entry_point_selector
                .as_deref()
                .ok_or_else(|| DecodeError::InvalidTransaction {
                    reason: "missing entry_point_selector".into(),
                })?;
        let selector = Selector::from_hex(raw_selector)?;
        let func = self.registry.function_by_selector(&selector).ok_or_else(|| {
            DecodeError::UnknownSelector {
                selector: raw_selector.to_string(),
            }
        })?;
        self.decode_call(func, &tx.calldata)
    }

    /// Decode calldata against a known function.
    pub fn decode_call(
        &self,
        func: &FunctionDef,
        calldata: &[Word],
    ) -> Result<DecodedCall, DecodeError> {
        let mut cursor = WordCursor::new(calldata);
        let inputs = self.decode_members(&func.inputs, &mut cursor)?;

        if !cursor.is_empty() {
            debug!(
                function = %func.name,
                trailing = cursor.remaining(),
                "calldata longer than the function inputs"
            );
        }

        Ok(DecodedCall {
            function_name: func.name.clone(),
            selector: func.selector(),
            inputs,
            trailing_words: cursor.remaining(),
        })
    }

    /// Decode a member list (function inputs) from the cursor.
    pub fn decode_members(
        &self,
        members: &[MemberDef],
        cursor: &mut WordCursor<'_>,
    ) -> Result<Vec<DecodedNode>, DecodeError> {
        let mut nodes = Vec::with_capacity(members.len());
        for laid_out in lay_out(members) {
            if let Some(value) = self.decode_member(&laid_out, cursor, 0)? {
                nodes.push(DecodedNode::new(
                    laid_out.member.name.clone(),
                    laid_out.member.ty.clone(),
                    value,
                ));
            }
        }
        Ok(nodes)
    }

    /// Whether one instance of the struct takes at least one calldata word.
    fn occupies_words(&self, type_name: &str, depth: usize) -> Result<bool, DecodeError> {
        if depth >= MAX_NESTING {
            return Ok(false);
        }
        let def = self.registry.get_struct(type_name)?;
        for laid_out in lay_out(&def.members) {
            let occupies = match laid_out.layout {
                MemberLayout::Struct(inner) => self.occupies_words(inner, depth + 1)?,
                // A length slot is always followed by an array prefix word.
                _ => true,
            };
            if occupies {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn decode_struct_at(
        &self,
        type_name: &str,
        cursor: &mut WordCursor<'_>,
        depth: usize,
    ) -> Result<DecodedStruct, DecodeError> {
        if depth >= MAX_NESTING {
            return Err(DecodeError::NestingTooDeep {
                ty: type_name.to_string(),
                limit: MAX_NESTING,
            });
        }
        let def = self.registry.get_struct(type_name)?;
        trace!(ty = %def.name, position = cursor.consumed(), "decoding struct");

        let mut fields = DecodedStruct::with_capacity(def.members.len());
        for laid_out in lay_out(&def.members) {
            if let Some(value) = self.decode_member(&laid_out, cursor, depth + 1)? {
                fields.insert(laid_out.member.name.clone(), value);
            }
        }
        Ok(fields)
    }

    fn decode_member(
        &self,
        laid_out: &LaidOutMember<'_>,
        cursor: &mut WordCursor<'_>,
        depth: usize,
    ) -> Result<Option<DecodedValue>, DecodeError> {
        let layout = laid_out.layout;

        // Zero-length sentinel: only array members, judged on the raw word.
        if layout.is_array() && cursor.peek_is_zero()? {
            cursor.take_one()?;
            let empty = match layout {
                MemberLayout::StructArray(_) => DecodedValue::StructArray(Vec::new()),
                _ => DecodedValue::FeltArray(Vec::new()),
            };
            return Ok(Some(empty));
        }

        let value = match layout {
            MemberLayout::LengthOfNext => return Ok(None),
            MemberLayout::Felt => DecodedValue::Felt(cursor.take_one()?.clone()),
            MemberLayout::FeltArray => {
                let len = cursor.take_length()?;
                DecodedValue::FeltArray(cursor.take_n(len)?.to_vec())
            }
            MemberLayout::StructArray(name) => {
                let len = cursor.take_length()?;
                // Reject absurd lengths before allocating. Elements of a
                // memberless struct take no words, so only a fixed cap applies.
                if self.occupies_words(name, depth)? {
                    if len > cursor.remaining() {
                        return Err(DecodeError::ExhaustedStream {
                            needed: len,
                            remaining: cursor.remaining(),
                        });
                    }
                } else if len > MAX_ZERO_WIDTH_ELEMENTS {
                    return Err(DecodeError::ArrayTooLong {
                        ty: name.to_string(),
                        len,
                        limit: MAX_ZERO_WIDTH_ELEMENTS,
                    });
                }
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.decode_struct_at(name, cursor, depth)?);
                }
                DecodedValue::StructArray(items)
            }
            MemberLayout::Struct(name) => {
                DecodedValue::Struct(self.decode_struct_at(name, cursor, depth)?)
            }
        };
        Ok(Some(value))
    }
}
