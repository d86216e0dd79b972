//! Property-based tests for the first-error locator
//!
//! Random trees mix every node variant, with error nodes substituted into any
//! list position, and the locator is checked against a plain recursive walk.

use proptest::prelude::*;
use structura::ast::{AstNode, ErrorNode};
use structura::locate::{find_first_error, LocatedError};

fn error_node() -> impl Strategy<Value = AstNode> {
    (1u32..50, 1u32..80, "[a-z ]{1,12}").prop_map(|(line, column, message)| {
        AstNode::Error(ErrorNode {
            line,
            column,
            message,
        })
    })
}

fn leaf() -> impl Strategy<Value = AstNode> {
    prop_oneof![
        ("[a-z0-9+*]{1,6}", "[a-z;]{0,8}")
            .prop_map(|(pattern, action)| AstNode::FlexRule { pattern, action }),
        prop::collection::vec("[A-Z]{1,5}", 1..4).prop_map(|names| AstNode::BisonTokenDecl { names }),
        (prop::collection::vec("[a-z]{1,5}", 0..4), prop::option::of("[$=0-9 ;]{0,8}"))
            .prop_map(|(symbols, action)| AstNode::BisonAlternative { symbols, action }),
        "[a-z]{0,6}".prop_map(AstNode::Literal),
        error_node(),
    ]
}

fn tree() -> impl Strategy<Value = AstNode> {
    leaf().prop_recursive(5, 64, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(|rules| AstNode::FlexFile { rules }),
            (
                prop::collection::vec(inner.clone(), 0..4),
                prop::collection::vec(inner.clone(), 0..4)
            )
                .prop_map(|(declarations, rules)| AstNode::BisonFile {
                    declarations,
                    rules
                }),
            ("[a-z]{1,6}", prop::collection::vec(inner, 0..4))
                .prop_map(|(name, alternatives)| AstNode::BisonGrammarRule { name, alternatives }),
        ]
    })
}

/// Straightforward recursive reading of the search order.
fn reference(node: &AstNode) -> Option<LocatedError> {
    match node {
        AstNode::Error(err) => Some(LocatedError {
            line: err.line,
            column: err.column,
            message: err.message.clone(),
        }),
        AstNode::FlexFile { rules } => rules.iter().find_map(reference),
        AstNode::BisonFile {
            declarations,
            rules,
        } => rules
            .iter()
            .find_map(reference)
            .or_else(|| declarations.iter().find_map(reference)),
        AstNode::BisonGrammarRule { alternatives, .. } => alternatives.iter().find_map(reference),
        _ => None,
    }
}

fn count_errors(node: &AstNode) -> usize {
    let own = usize::from(node.is_error());
    own + node
        .child_lists()
        .iter()
        .flat_map(|list| list.iter())
        .map(count_errors)
        .sum::<usize>()
}

proptest! {
    #[test]
    fn locator_matches_recursive_walk(root in tree()) {
        prop_assert_eq!(find_first_error(&root), reference(&root));
    }

    #[test]
    fn locator_finds_nothing_only_without_errors(root in tree()) {
        prop_assert_eq!(find_first_error(&root).is_none(), count_errors(&root) == 0);
    }

    #[test]
    fn rules_win_over_declarations(
        declarations in prop::collection::vec(tree(), 0..4),
        rules in prop::collection::vec(leaf(), 0..4),
        planted in error_node(),
    ) {
        let mut rules = rules;
        rules.push(planted);
        let root = AstNode::BisonFile { declarations, rules: rules.clone() };
        let expected = rules.iter().find_map(reference);
        prop_assert_eq!(find_first_error(&root), expected);
    }

    #[test]
    fn locator_is_repeatable(root in tree()) {
        prop_assert_eq!(find_first_error(&root), find_first_error(&root));
    }
}

#[test]
fn deep_chain_does_not_overflow() {
    let mut node = AstNode::Error(ErrorNode {
        line: 9,
        column: 9,
        message: "bottom".into(),
    });
    for _ in 0..100_000 {
        node = AstNode::FlexFile { rules: vec![node] };
    }
    let located = find_first_error(&node).unwrap();
    assert_eq!(located.message, "bottom");
    // Dropping a tree this deep would recurse; leak it instead.
    std::mem::forget(node);
}
