//! Sibling position flags and tree-line glyphs, shared by both loaders.

use indexmap::IndexMap;
use itertools::Itertools;
use tracing::instrument;

use crate::domain::node::{Node, NodeId};
use crate::domain::schema::Glyphs;

/// Position of a node within its ordered sibling group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SiblingFlags {
    pub is_first: bool,
    pub is_last: bool,
    pub is_only: bool,
}

/// Computes flags for a parent sequence in which siblings keep their order.
///
/// The sequence does not need to be contiguous per parent: the first and
/// last occurrence of each parent mark the group boundaries.
pub fn sibling_flags<'a, I>(parents: I) -> Vec<SiblingFlags>
where
    I: IntoIterator<Item = Option<&'a NodeId>>,
{
    let parents: Vec<Option<&NodeId>> = parents.into_iter().collect();
    let mut flags = vec![SiblingFlags::default(); parents.len()];

    let groups = (0..parents.len()).into_group_map_by(|&i| parents[i]);
    for members in groups.values() {
        if let (Some(&first), Some(&last)) = (members.first(), members.last()) {
            flags[first].is_first = true;
            flags[last].is_last = true;
            if first == last {
                flags[first].is_only = true;
            }
        }
    }
    flags
}

/// Glyphs drawn in front of a node.
///
/// `ancestors_last` holds the last-of-siblings flag of each ancestor,
/// outermost first, starting at level 0. The root column is never drawn,
/// so a node at level `n` gets `n` glyphs: one per ancestor below the root,
/// then its own connector.
pub fn icons(ancestors_last: &[bool], is_last: bool, glyphs: &Glyphs) -> Vec<String> {
    if ancestors_last.is_empty() {
        return Vec::new();
    }
    let mut icons: Vec<String> = ancestors_last
        .iter()
        .skip(1)
        .map(|&last| if last { glyphs.empty.clone() } else { glyphs.bar.clone() })
        .collect();
    icons.push(if is_last {
        glyphs.bottom.clone()
    } else {
        glyphs.join.clone()
    });
    icons
}

/// Writes flags and icons into a map stored in depth-first pre-order with
/// levels already assigned.
#[instrument(level = "debug", skip(nodes, glyphs), fields(nodes = nodes.len()))]
pub fn apply(nodes: &mut IndexMap<NodeId, Node>, glyphs: &Glyphs) {
    let flags = sibling_flags(nodes.values().map(|n| n.parent.as_ref()));

    // last-of-siblings flag per open ancestor level
    let mut trail: Vec<bool> = Vec::new();
    for (node, flag) in nodes.values_mut().zip(flags) {
        node.is_first = flag.is_first;
        node.is_last = flag.is_last;
        node.is_only = flag.is_only;

        trail.truncate(node.level);
        node.icons = icons(&trail, node.is_last, glyphs);
        trail.push(node.is_last);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn id(i: i64) -> NodeId {
        NodeId::Int(i)
    }

    #[test]
    fn given_interleaved_groups_when_computing_flags_then_marks_group_boundaries() {
        // pre-order of 1 -> (2 -> 4, 3)
        let p1 = id(1);
        let p2 = id(2);
        let parents = vec![None, Some(&p1), Some(&p2), Some(&p1)];

        let flags = sibling_flags(parents);

        assert_eq!(
            flags[0],
            SiblingFlags {
                is_first: true,
                is_last: true,
                is_only: true
            }
        );
        assert!(flags[1].is_first && !flags[1].is_last);
        assert!(flags[2].is_only);
        assert!(!flags[3].is_first && flags[3].is_last);
    }

    #[test]
    fn given_empty_sequence_when_computing_flags_then_empty() {
        assert!(sibling_flags(Vec::new()).is_empty());
    }

    #[rstest]
    #[case::root(vec![], false, vec![])]
    #[case::child_with_followers(vec![true], false, vec!["├─"])]
    #[case::last_child(vec![true], true, vec!["└─"])]
    #[case::under_open_branch(vec![true, false], true, vec!["│\u{a0}", "└─"])]
    #[case::under_closed_branch(vec![true, true], false, vec!["\u{a0}\u{a0}", "├─"])]
    #[case::deep(vec![false, false, true], true, vec!["│\u{a0}", "\u{a0}\u{a0}", "└─"])]
    fn given_ancestor_trail_when_computing_icons_then_draws_columns(
        #[case] trail: Vec<bool>,
        #[case] is_last: bool,
        #[case] expected: Vec<&str>,
    ) {
        let icons = icons(&trail, is_last, &Glyphs::default());
        assert_eq!(icons, expected);
    }
}
