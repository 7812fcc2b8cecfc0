//! Member layout pass.
//!
//! Cairo 0 ABIs declare an array as two members, `x_len: felt` followed by
//! `x: T*`, but the calldata carries the length exactly once, as the array's
//! prefix. Before decoding, every member list is annotated so that a member
//! followed by an array member is marked [`MemberLayout::LengthOfNext`]: it
//! owns no words and yields no value. The decoder and the encoder both walk
//! this annotated list and never look at neighbouring members themselves.

use feedcodec_core::abi::{MemberDef, FELT};

/// How a single member is laid out in calldata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberLayout<'a> {
    /// Length slot of the following array member; occupies no words
    LengthOfNext,
    /// One word
    Felt,
    /// Length prefix, then that many words
    FeltArray,
    /// Length prefix, then that many instances of the named struct
    StructArray(&'a str),
    /// The named struct's members back to back
    Struct(&'a str),
}

impl MemberLayout<'_> {
    /// Whether this member carries a length prefix of its own.
    pub fn is_array(&self) -> bool {
        matches!(self, MemberLayout::FeltArray | MemberLayout::StructArray(_))
    }
}

/// A member paired with its layout.
#[derive(Debug, Clone, Copy)]
pub struct LaidOutMember<'a> {
    pub member: &'a MemberDef,
    pub layout: MemberLayout<'a>,
}

/// Annotate a member list with its calldata layout.
pub fn lay_out(members: &[MemberDef]) -> Vec<LaidOutMember<'_>> {
    members
        .iter()
        .enumerate()
        .map(|(i, member)| {
            let next_is_array = members.get(i + 1).map_or(false, MemberDef::is_array);
            let layout = if next_is_array {
                MemberLayout::LengthOfNext
            } else {
                classify(member)
            };
            LaidOutMember { member, layout }
        })
        .collect()
}

fn classify(member: &MemberDef) -> MemberLayout<'_> {
    let elem = member.element_type();
    match (member.is_array(), elem == FELT) {
        (false, true) => MemberLayout::Felt,
        (true, true) => MemberLayout::FeltArray,
        (true, false) => MemberLayout::StructArray(elem),
        (false, false) => MemberLayout::Struct(elem),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layouts(members: &[MemberDef]) -> Vec<MemberLayout<'_>> {
        lay_out(members).into_iter().map(|m| m.layout).collect()
    }

    #[test]
    fn length_member_belongs_to_next_array() {
        let members = vec![
            MemberDef::new("new_entries_len", "felt"),
            MemberDef::new("new_entries", "Entry*"),
        ];
        assert_eq!(
            layouts(&members),
            vec![MemberLayout::LengthOfNext, MemberLayout::StructArray("Entry")]
        );
    }

    #[test]
    fn classifies_every_kind() {
        let members = vec![
            MemberDef::new("a", "felt"),
            MemberDef::new("b", "Checkpoint"),
            MemberDef::new("c_len", "felt"),
            MemberDef::new("c", "felt*"),
        ];
        assert_eq!(
            layouts(&members),
            vec![
                MemberLayout::Felt,
                MemberLayout::Struct("Checkpoint"),
                MemberLayout::LengthOfNext,
                MemberLayout::FeltArray,
            ]
        );
    }

    #[test]
    fn any_member_before_an_array_is_suppressed() {
        // Suppression depends only on the successor, not on the member's own type.
        let members = vec![
            MemberDef::new("sources", "felt*"),
            MemberDef::new("entries", "Entry*"),
        ];
        assert_eq!(
            layouts(&members),
            vec![MemberLayout::LengthOfNext, MemberLayout::StructArray("Entry")]
        );
    }

    #[test]
    fn last_member_is_never_suppressed() {
        let members = vec![MemberDef::new("only", "felt")];
        assert_eq!(layouts(&members), vec![MemberLayout::Felt]);
        assert!(lay_out(&[]).is_empty());
    }
}
