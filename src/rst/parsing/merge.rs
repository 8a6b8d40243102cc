//! Merging adjacent lists of the same kind
//!
//! A list unit stops at its first refused item, so one logical list can arrive as two
//! sibling nodes. Siblings of the same list kind are joined back together here. Enumerated
//! lists only join when they share a sequence type and the second list continues the
//! numbering of the first.

use crate::rst::ast::{is_sequential_bullet, NodeId, NodeKind, Registrar, Span};
use tracing::debug;

pub(crate) fn merge_sequential_lists(registrar: &mut Registrar, nodes: Vec<NodeId>) -> Vec<NodeId> {
    let mut merged: Vec<NodeId> = Vec::with_capacity(nodes.len());

    for curr in nodes {
        let Some(prev) = merged.last().copied() else {
            merged.push(curr);
            continue;
        };
        if !is_compatible(registrar, prev, curr) {
            merged.push(curr);
            continue;
        }

        let (Some(prev_node), Some(curr_node)) = (registrar.get(prev), registrar.get(curr)) else {
            merged.push(curr);
            continue;
        };
        let kind = prev_node.kind().clone();
        let span = Span::new(prev_node.span().start_line, curr_node.span().end_line);
        let children: Vec<NodeId> = prev_node
            .children()
            .iter()
            .chain(curr_node.children())
            .copied()
            .collect();

        registrar.retire(prev);
        registrar.retire(curr);
        let list = registrar.register(kind, span, children);
        debug!(%prev, %curr, merged = %list, "merged sequential lists");

        merged.pop();
        merged.push(list);
    }

    merged
}

fn is_compatible(registrar: &Registrar, prev: NodeId, curr: NodeId) -> bool {
    let (Some(prev_node), Some(curr_node)) = (registrar.get(prev), registrar.get(curr)) else {
        return false;
    };

    match (prev_node.kind(), curr_node.kind()) {
        (NodeKind::BulletList, NodeKind::BulletList)
        | (NodeKind::DefinitionList, NodeKind::DefinitionList)
        | (NodeKind::FieldList, NodeKind::FieldList)
        | (NodeKind::OptionList, NodeKind::OptionList) => true,
        (NodeKind::EnumeratedList(prev_list), NodeKind::EnumeratedList(curr_list)) => {
            if prev_list.list_type != curr_list.list_type {
                return false;
            }
            let last_bullet = prev_node.children().last().and_then(|id| bullet(registrar, *id));
            let first_bullet = curr_node.children().first().and_then(|id| bullet(registrar, *id));
            match first_bullet {
                Some(first) => is_sequential_bullet(&first, last_bullet.as_deref()),
                None => false,
            }
        }
        _ => false,
    }
}

fn bullet(registrar: &Registrar, item: NodeId) -> Option<String> {
    match registrar.get(item)?.kind() {
        NodeKind::EnumeratedListItem(item) => Some(item.bullet.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rst::ast::{EnumeratedList, EnumeratedListType, ListItem, NodeType};

    fn enumerated(reg: &mut Registrar, bullets: &[&str], line: usize) -> NodeId {
        let items: Vec<NodeId> = bullets
            .iter()
            .enumerate()
            .map(|(i, b)| {
                reg.register(
                    NodeKind::EnumeratedListItem(ListItem {
                        bullet: b.to_string(),
                    }),
                    Span::line(line + i),
                    vec![],
                )
            })
            .collect();
        let list_type = EnumeratedListType::detect(bullets[0]).unwrap();
        reg.register(
            NodeKind::EnumeratedList(EnumeratedList { list_type }),
            Span::new(line, line + bullets.len()),
            items,
        )
    }

    #[test]
    fn test_adjacent_bullet_lists_merge() {
        let mut reg = Registrar::new();
        let item_a = reg.register(
            NodeKind::BulletListItem(ListItem { bullet: "-".into() }),
            Span::line(0),
            vec![],
        );
        let a = reg.register(NodeKind::BulletList, Span::new(0, 1), vec![item_a]);
        let item_b = reg.register(
            NodeKind::BulletListItem(ListItem { bullet: "*".into() }),
            Span::line(2),
            vec![],
        );
        let b = reg.register(NodeKind::BulletList, Span::new(2, 3), vec![item_b]);

        let out = merge_sequential_lists(&mut reg, vec![a, b]);
        assert_eq!(out.len(), 1);
        let list = reg.get(out[0]).unwrap();
        assert_eq!(list.node_type(), NodeType::BulletList);
        assert_eq!(list.children(), &[item_a, item_b]);
        assert_eq!((list.span().start_line, list.span().end_line), (0, 3));
        assert!(reg.get(a).unwrap().is_retired());
        assert_eq!(reg.get(item_b).unwrap().parent(), Some(out[0]));
    }

    #[test]
    fn test_enumerated_lists_merge_only_in_sequence() {
        let mut reg = Registrar::new();
        let first = enumerated(&mut reg, &["1", "2"], 0);
        let next = enumerated(&mut reg, &["3"], 3);
        assert_eq!(merge_sequential_lists(&mut reg, vec![first, next]).len(), 1);

        let mut reg = Registrar::new();
        let first = enumerated(&mut reg, &["1"], 0);
        let skip = enumerated(&mut reg, &["3"], 2);
        assert_eq!(merge_sequential_lists(&mut reg, vec![first, skip]), vec![first, skip]);
    }

    #[test]
    fn test_different_enumeration_types_stay_apart() {
        let mut reg = Registrar::new();
        let arabic = enumerated(&mut reg, &["1"], 0);
        let alpha = enumerated(&mut reg, &["b"], 2);
        assert_eq!(merge_sequential_lists(&mut reg, vec![arabic, alpha]).len(), 2);
    }

    #[test]
    fn test_non_lists_are_untouched() {
        let mut reg = Registrar::new();
        let p = reg.register(NodeKind::Paragraph, Span::line(0), vec![]);
        let q = reg.register(NodeKind::Paragraph, Span::line(2), vec![]);
        assert_eq!(merge_sequential_lists(&mut reg, vec![p, q]), vec![p, q]);
    }
}
