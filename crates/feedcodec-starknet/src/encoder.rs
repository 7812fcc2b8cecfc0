//! Calldata encoder, the inverse of the calldata decoder.
//!
//! Flattens a decoded value tree back into felt words using the same member
//! layout, so length-slot members are folded into their array's prefix.
//! Used to build calldata for fixtures and to check decode round trips.

use feedcodec_core::{
    abi::{FunctionDef, MemberDef},
    error::EncodeError,
    schema::SchemaRegistry,
    value::{find_node, DecodedNode, DecodedStruct, DecodedValue},
    word::Word,
};

use crate::decoder::MAX_NESTING;
use crate::layout::{lay_out, MemberLayout};

/// Cairo 0 calldata encoder over a schema registry.
pub struct CalldataEncoder<'r> {
    registry: &'r dyn SchemaRegistry,
}

impl<'r> CalldataEncoder<'r> {
    pub fn new(registry: &'r dyn SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Encode a function's inputs. `inputs` holds one node per member that
    /// the decoder would emit; length-slot members need no node.
    pub fn encode_call(
        &self,
        func: &FunctionDef,
        inputs: &[DecodedNode],
    ) -> Result<Vec<Word>, EncodeError> {
        self.encode_members(&func.inputs, inputs)
    }

    /// Encode a member list from named nodes.
    pub fn encode_members(
        &self,
        members: &[MemberDef],
        nodes: &[DecodedNode],
    ) -> Result<Vec<Word>, EncodeError> {
        let mut out = Vec::new();
        for laid_out in lay_out(members) {
            if laid_out.layout == MemberLayout::LengthOfNext {
                continue;
            }
            let name = &laid_out.member.name;
            let node = find_node(nodes, name).ok_or_else(|| EncodeError::MissingValue {
                name: name.clone(),
            })?;
            self.encode_value(name, laid_out.layout, &node.value, &mut out, 0)?;
        }
        Ok(out)
    }

    fn encode_struct(
        &self,
        type_name: &str,
        fields: &DecodedStruct,
        out: &mut Vec<Word>,
        depth: usize,
    ) -> Result<(), EncodeError> {
        let def = self
            .registry
            .get_struct(type_name)
            .map_err(|_| EncodeError::UnknownStruct {
                name: type_name.to_string(),
            })?;
        for laid_out in lay_out(&def.members) {
            if laid_out.layout == MemberLayout::LengthOfNext {
                continue;
            }
            let name = &laid_out.member.name;
            let value = fields.get(name).ok_or_else(|| EncodeError::MissingValue {
                name: name.clone(),
            })?;
            self.encode_value(name, laid_out.layout, value, out, depth + 1)?;
        }
        Ok(())
    }

    fn encode_value(
        &self,
        name: &str,
        layout: MemberLayout<'_>,
        value: &DecodedValue,
        out: &mut Vec<Word>,
        depth: usize,
    ) -> Result<(), EncodeError> {
        if depth >= MAX_NESTING {
            return Err(mismatch(name, "a finite struct nesting"));
        }
        match (layout, value) {
            (MemberLayout::LengthOfNext, _) => {}
            (MemberLayout::Felt, DecodedValue::Felt(w)) => out.push(w.clone()),
            (MemberLayout::FeltArray, DecodedValue::FeltArray(words)) => {
                out.push(Word::from_u128(words.len() as u128));
                out.extend(words.iter().cloned());
            }
            (MemberLayout::StructArray(ty), DecodedValue::StructArray(items)) => {
                out.push(Word::from_u128(items.len() as u128));
                for item in items {
                    self.encode_struct(ty, item, out, depth)?;
                }
            }
            // An empty array decoded from a zero prefix re-encodes the same way.
            (MemberLayout::StructArray(_), DecodedValue::FeltArray(words)) if words.is_empty() => {
                out.push(Word::from_u128(0));
            }
            (MemberLayout::Struct(ty), DecodedValue::Struct(fields)) => {
                self.encode_struct(ty, fields, out, depth)?;
            }
            (MemberLayout::Felt, _) => return Err(mismatch(name, "a felt")),
            (MemberLayout::FeltArray, _) => return Err(mismatch(name, "a felt array")),
            (MemberLayout::StructArray(_), _) => return Err(mismatch(name, "a struct array")),
            (MemberLayout::Struct(_), _) => return Err(mismatch(name, "a struct")),
        }
        Ok(())
    }
}

fn mismatch(name: &str, expected: &'static str) -> EncodeError {
    EncodeError::TypeMismatch {
        name: name.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::WordCursor;
    use crate::decoder::CalldataDecoder;
    use feedcodec_core::abi::{Abi, StructDef};
    use feedcodec_registry::MemoryRegistry;

    fn felt(w: &str) -> DecodedValue {
        DecodedValue::Felt(Word::new(w))
    }

    fn registry() -> MemoryRegistry {
        let abi = Abi {
            structs: vec![
                StructDef {
                    name: "Source".into(),
                    size: None,
                    members: vec![
                        MemberDef::new("id", "felt"),
                        MemberDef::new("tags_len", "felt"),
                        MemberDef::new("tags", "felt*"),
                    ],
                },
                StructDef {
                    name: "Report".into(),
                    size: None,
                    members: vec![
                        MemberDef::new("round", "felt"),
                        MemberDef::new("sources_len", "felt"),
                        MemberDef::new("sources", "Source*"),
                        MemberDef::new("origin", "Source"),
                    ],
                },
            ],
            functions: vec![],
        };
        MemoryRegistry::from_abi(abi).unwrap()
    }

    fn source(id: &str, tags: &[&str]) -> DecodedStruct {
        let mut s = DecodedStruct::new();
        s.insert("id".into(), felt(id));
        s.insert(
            "tags".into(),
            DecodedValue::FeltArray(tags.iter().map(|t| Word::new(*t)).collect()),
        );
        s
    }

    #[test]
    fn nested_tree_round_trips() {
        let reg = registry();
        let members = vec![
            MemberDef::new("reports_len", "felt"),
            MemberDef::new("reports", "Report*"),
            MemberDef::new("nonce", "felt"),
        ];

        let mut r1 = DecodedStruct::new();
        r1.insert("round".into(), felt("0x1"));
        r1.insert(
            "sources".into(),
            DecodedValue::StructArray(vec![source("0xa", &["0x1", "0x2"]), source("0xb", &[])]),
        );
        r1.insert("origin".into(), DecodedValue::Struct(source("0xc", &["0x3"])));

        let mut r2 = DecodedStruct::new();
        r2.insert("round".into(), felt("0x2"));
        r2.insert("sources".into(), DecodedValue::StructArray(vec![]));
        r2.insert("origin".into(), DecodedValue::Struct(source("0x0", &[])));

        let tree = vec![
            DecodedNode::new("reports", "Report*", DecodedValue::StructArray(vec![r1, r2])),
            DecodedNode::new("nonce", "felt", felt("0x2a")),
        ];

        let words = CalldataEncoder::new(&reg).encode_members(&members, &tree).unwrap();

        let mut cursor = WordCursor::new(&words);
        let decoded = CalldataDecoder::new(&reg)
            .decode_members(&members, &mut cursor)
            .unwrap();
        assert!(cursor.is_empty());
        assert_eq!(decoded, tree);
    }

    #[test]
    fn encodes_length_prefix_once() {
        let reg = registry();
        let members = vec![MemberDef::new("xs_len", "felt"), MemberDef::new("xs", "felt*")];
        let nodes = vec![DecodedNode::new(
            "xs",
            "felt*",
            DecodedValue::FeltArray(vec![Word::new("0x5"), Word::new("0x6")]),
        )];
        let words = CalldataEncoder::new(&reg).encode_members(&members, &nodes).unwrap();
        assert_eq!(words, vec![Word::new("0x2"), Word::new("0x5"), Word::new("0x6")]);
    }

    #[test]
    fn missing_value_and_type_mismatch() {
        let reg = registry();
        let enc = CalldataEncoder::new(&reg);
        let members = vec![MemberDef::new("a", "felt")];
        assert!(matches!(
            enc.encode_members(&members, &[]),
            Err(EncodeError::MissingValue { .. })
        ));
        let nodes = vec![DecodedNode::new("a", "felt", DecodedValue::FeltArray(vec![]))];
        assert!(matches!(
            enc.encode_members(&members, &nodes),
            Err(EncodeError::TypeMismatch { expected: "a felt", .. })
        ));
    }
}
