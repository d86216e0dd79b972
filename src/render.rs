//! Tree renderer: analysis tree → visual tree
//!
//! [`render`] is a pure mapping from an [`AstNode`] to a [`VisualNode`], one
//! fixed visual shape per node variant:
//!
//! - `FlexFile` / `BisonFile` → root container (bison roots group their
//!   non-empty lists under a declarations and a grammar-rules section)
//! - `FlexRule` → rule card, `pattern → { action }`
//! - `BisonTokenDecl` → declaration chip listing the names
//! - `BisonGrammarRule` → rule block holding its alternatives
//! - `BisonAlternative` → alternative row, symbols plus optional action
//! - `Error` → error panel, with the assist affordance as its only child
//! - strings → quoted literals, anything else → a labelled placeholder
//!
//! The output depends only on the input tree and the assist state; calling it
//! twice on the same tree yields equal trees.

use crate::ast::AstNode;
use crate::session::AssistState;

/// Rendering stops descending past this depth and emits a marker instead.
pub const MAX_RENDER_DEPTH: usize = 64;

/// What an error panel forwards to the assist controller when triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistTrigger {
    pub message: String,
    pub line: u32,
}

/// The two list groups of a bison root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Declarations,
    GrammarRules,
}

/// Visual shape of one rendered node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisualKind {
    FlexRoot,
    BisonRoot,
    Section(Section),
    RuleCard {
        pattern: String,
        action: String,
    },
    DeclarationChip {
        names: Vec<String>,
    },
    RuleBlock {
        name: String,
    },
    AlternativeRow {
        symbols: Vec<String>,
        action: Option<String>,
    },
    ErrorPanel {
        line: u32,
        column: u32,
        message: String,
    },
    /// User-triggerable request for a repair suggestion.
    AssistOffer(AssistTrigger),
    AssistPending,
    AssistSuggestion(String),
    /// The assistant could not be reached.
    AssistUnavailable(String),
    Literal(String),
    Placeholder {
        node_type: String,
        detail: Option<String>,
    },
    DepthLimit,
}

impl VisualKind {
    pub fn icon(&self) -> &'static str {
        match self {
            VisualKind::FlexRoot | VisualKind::BisonRoot => "⧉",
            VisualKind::Section(_) => "§",
            VisualKind::RuleCard { .. } => "ƒ",
            VisualKind::DeclarationChip { .. } => "%",
            VisualKind::RuleBlock { .. } => "≔",
            VisualKind::AlternativeRow { .. } => "|",
            VisualKind::ErrorPanel { .. } => "✖",
            VisualKind::AssistOffer(_) | VisualKind::AssistSuggestion(_) => "✨",
            VisualKind::AssistPending => "⋯",
            VisualKind::AssistUnavailable(_) => "⚠",
            VisualKind::Literal(_) => "\"",
            VisualKind::Placeholder { .. } => "∅",
            VisualKind::DepthLimit => "…",
        }
    }

    /// Display text. May span several lines (assist suggestions).
    pub fn label(&self) -> String {
        match self {
            VisualKind::FlexRoot => "Flex File Root".to_string(),
            VisualKind::BisonRoot => "Bison File Root".to_string(),
            VisualKind::Section(Section::Declarations) => "Declarations Section".to_string(),
            VisualKind::Section(Section::GrammarRules) => "Grammar Rules Section".to_string(),
            VisualKind::RuleCard { pattern, action } => format!("{pattern} → {{ {action} }}"),
            VisualKind::DeclarationChip { names } => {
                let mut label = String::from("%token");
                for name in names {
                    label.push(' ');
                    label.push_str(name);
                }
                label
            }
            VisualKind::RuleBlock { name } => format!("{name} :"),
            VisualKind::AlternativeRow { symbols, action } => {
                let mut label = if symbols.is_empty() {
                    "/* empty */".to_string()
                } else {
                    symbols.join(" ")
                };
                if let Some(action) = action {
                    label.push_str(&format!("  {{ {action} }}"));
                }
                label
            }
            VisualKind::ErrorPanel {
                line,
                column,
                message,
            } => format!("Syntax Error · Line {line}, Col {column}: {message}"),
            VisualKind::AssistOffer(_) => "Ask the assistant to fix this [Enter]".to_string(),
            VisualKind::AssistPending => "The assistant is analyzing your code...".to_string(),
            VisualKind::AssistSuggestion(text) => format!("Assistant: {text}"),
            VisualKind::AssistUnavailable(message) => message.clone(),
            VisualKind::Literal(text) => format!("\"{text}\""),
            VisualKind::Placeholder { node_type, detail } => match detail {
                Some(detail) => format!("Unknown Node: {node_type} ({detail})"),
                None => format!("Unknown Node: {node_type}"),
            },
            VisualKind::DepthLimit => "nesting limit reached, deeper nodes not shown".to_string(),
        }
    }
}

/// A rendered node and its rendered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualNode {
    pub kind: VisualKind,
    pub children: Vec<VisualNode>,
}

impl VisualNode {
    fn leaf(kind: VisualKind) -> Self {
        VisualNode {
            kind,
            children: Vec::new(),
        }
    }

    fn with_children(kind: VisualKind, children: Vec<VisualNode>) -> Self {
        VisualNode { kind, children }
    }

    /// The assist trigger carried by this node, if it is an assist offer.
    pub fn trigger(&self) -> Option<&AssistTrigger> {
        match &self.kind {
            VisualKind::AssistOffer(trigger) => Some(trigger),
            _ => None,
        }
    }

    /// First assist trigger in pre-order.
    pub fn first_trigger(&self) -> Option<&AssistTrigger> {
        self.trigger()
            .or_else(|| self.children.iter().find_map(VisualNode::first_trigger))
    }

    /// Indented plain-text form, two spaces per level.
    pub fn to_treeviz(&self) -> String {
        let mut out = String::new();
        self.write_treeviz(0, &mut out);
        out
    }

    fn write_treeviz(&self, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        let label = self.kind.label();
        let mut lines = label.lines();
        let first = lines.next().unwrap_or_default();
        out.push_str(&format!("{indent}{} {first}\n", self.kind.icon()));
        for rest in lines {
            out.push_str(&format!("{indent}  {rest}\n"));
        }
        for child in &self.children {
            child.write_treeviz(depth + 1, out);
        }
    }
}

/// Render a tree with the assist controller idle.
pub fn render(node: &AstNode) -> VisualNode {
    render_with_assist(node, &AssistState::Idle)
}

/// Render a tree, attaching the current assist state to every error panel.
pub fn render_with_assist(node: &AstNode, assist: &AssistState) -> VisualNode {
    render_node(node, assist, 0)
}

fn render_node(node: &AstNode, assist: &AssistState, depth: usize) -> VisualNode {
    if depth >= MAX_RENDER_DEPTH {
        return VisualNode::leaf(VisualKind::DepthLimit);
    }
    let children = |nodes: &Vec<AstNode>| render_children(nodes, assist, depth + 1);

    match node {
        AstNode::FlexFile { rules } => VisualNode::with_children(VisualKind::FlexRoot, children(rules)),
        AstNode::FlexRule { pattern, action } => VisualNode::leaf(VisualKind::RuleCard {
            pattern: pattern.clone(),
            action: action.clone(),
        }),
        AstNode::BisonFile {
            declarations,
            rules,
        } => {
            let mut sections = Vec::new();
            if !declarations.is_empty() {
                sections.push(VisualNode::with_children(
                    VisualKind::Section(Section::Declarations),
                    children(declarations),
                ));
            }
            if !rules.is_empty() {
                sections.push(VisualNode::with_children(
                    VisualKind::Section(Section::GrammarRules),
                    children(rules),
                ));
            }
            VisualNode::with_children(VisualKind::BisonRoot, sections)
        }
        AstNode::BisonTokenDecl { names } => VisualNode::leaf(VisualKind::DeclarationChip {
            names: names.clone(),
        }),
        AstNode::BisonGrammarRule { name, alternatives } => VisualNode::with_children(
            VisualKind::RuleBlock { name: name.clone() },
            children(alternatives),
        ),
        AstNode::BisonAlternative { symbols, action } => {
            VisualNode::leaf(VisualKind::AlternativeRow {
                symbols: symbols.clone(),
                action: action.clone().filter(|action| !action.is_empty()),
            })
        }
        AstNode::Error(err) => {
            // Same 1-based clamp as the locator, so panel, marker and request agree.
            let (line, column) = (err.line.max(1), err.column.max(1));
            let affordance = match assist {
                AssistState::Idle => VisualKind::AssistOffer(AssistTrigger {
                    message: err.message.clone(),
                    line,
                }),
                AssistState::Loading { .. } => VisualKind::AssistPending,
                AssistState::Success(text) => VisualKind::AssistSuggestion(text.clone()),
                AssistState::Failure(message) => VisualKind::AssistUnavailable(message.clone()),
            };
            VisualNode::with_children(
                VisualKind::ErrorPanel {
                    line,
                    column,
                    message: err.message.clone(),
                },
                vec![VisualNode::leaf(affordance)],
            )
        }
        AstNode::Literal(text) => VisualNode::leaf(VisualKind::Literal(text.clone())),
        AstNode::Unknown { node_type, detail } => VisualNode::leaf(VisualKind::Placeholder {
            node_type: node_type.clone(),
            detail: detail.clone(),
        }),
    }
}

fn render_children(nodes: &[AstNode], assist: &AssistState, depth: usize) -> Vec<VisualNode> {
    nodes
        .iter()
        .map(|child| render_node(child, assist, depth))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ErrorNode;
    use crate::session::CONNECTIVITY_FAILURE;

    fn error(message: &str) -> AstNode {
        AstNode::Error(ErrorNode {
            line: 2,
            column: 4,
            message: message.to_string(),
        })
    }

    #[test]
    fn test_flex_rule_card() {
        let tree = AstNode::FlexFile {
            rules: vec![AstNode::FlexRule {
                pattern: "[0-9]+".into(),
                action: "return NUMBER;".into(),
            }],
        };
        let visual = render(&tree);
        assert_eq!(visual.kind, VisualKind::FlexRoot);
        assert_eq!(visual.children.len(), 1);
        assert_eq!(visual.children[0].kind.label(), "[0-9]+ → { return NUMBER; }");
    }

    #[test]
    fn test_bison_sections_skip_empty_lists() {
        let tree = AstNode::BisonFile {
            declarations: vec![],
            rules: vec![AstNode::BisonGrammarRule {
                name: "expr".into(),
                alternatives: vec![],
            }],
        };
        let visual = render(&tree);
        assert_eq!(visual.children.len(), 1);
        assert_eq!(
            visual.children[0].kind,
            VisualKind::Section(Section::GrammarRules)
        );
    }

    #[test]
    fn test_empty_alternative_label() {
        let row = render(&AstNode::BisonAlternative {
            symbols: vec![],
            action: Some(String::new()),
        });
        assert_eq!(row.kind.label(), "/* empty */");
    }

    #[test]
    fn test_unknown_node_placeholder() {
        let visual = render(&AstNode::Unknown {
            node_type: "BisonPrecedence".into(),
            detail: None,
        });
        assert_eq!(visual.kind.label(), "Unknown Node: BisonPrecedence");
    }

    #[test]
    fn test_literal_is_quoted() {
        let visual = render(&AstNode::Literal("yytext".into()));
        assert_eq!(visual.kind.label(), "\"yytext\"");
    }

    #[test]
    fn test_error_panel_offers_assist_when_idle() {
        let visual = render(&error("unexpected token"));
        assert_eq!(
            visual.first_trigger(),
            Some(&AssistTrigger {
                message: "unexpected token".into(),
                line: 2
            })
        );
    }

    #[test]
    fn test_zero_position_clamped_like_locator() {
        let tree = AstNode::Error(ErrorNode {
            line: 0,
            column: 0,
            message: "bad position".into(),
        });
        let visual = render(&tree);
        assert_eq!(visual.kind.label(), "Syntax Error · Line 1, Col 1: bad position");
        let located = crate::locate::find_first_error(&tree).unwrap();
        assert_eq!(visual.first_trigger().map(|t| t.line), Some(located.line));
    }

    #[test]
    fn test_error_panel_follows_assist_state() {
        let tree = error("unexpected token");

        let loading = AssistState::Loading {
            message: "unexpected token".into(),
            line: 2,
        };
        let visual = render_with_assist(&tree, &loading);
        assert_eq!(visual.children[0].kind, VisualKind::AssistPending);
        assert!(visual.first_trigger().is_none());

        let answered = AssistState::Success("add a semicolon".into());
        let visual = render_with_assist(&tree, &answered);
        assert_eq!(
            visual.children[0].kind,
            VisualKind::AssistSuggestion("add a semicolon".into())
        );

        let failed = AssistState::Failure(CONNECTIVITY_FAILURE.into());
        let visual = render_with_assist(&tree, &failed);
        assert_eq!(visual.children[0].kind.icon(), "⚠");
    }

    #[test]
    fn test_render_is_repeatable() {
        let tree = AstNode::BisonFile {
            declarations: vec![AstNode::BisonTokenDecl {
                names: vec!["A".into(), "B".into()],
            }],
            rules: vec![error("oops")],
        };
        assert_eq!(render(&tree), render(&tree));
        assert_eq!(render(&tree).to_treeviz(), render(&tree).to_treeviz());
    }

    #[test]
    fn test_depth_limit() {
        let mut node = AstNode::Literal("bottom".into());
        for _ in 0..(MAX_RENDER_DEPTH + 10) {
            node = AstNode::FlexFile { rules: vec![node] };
        }
        let visual = render(&node);
        let mut current = &visual;
        let mut depth = 0;
        while let Some(child) = current.children.first() {
            current = child;
            depth += 1;
        }
        assert_eq!(current.kind, VisualKind::DepthLimit);
        assert_eq!(depth, MAX_RENDER_DEPTH);
    }

    #[test]
    fn test_treeviz_indents_multiline_labels() {
        let visual = render_with_assist(
            &error("bad"),
            &AssistState::Success("line one\nline two".into()),
        );
        let text = visual.to_treeviz();
        assert_eq!(
            text,
            "✖ Syntax Error · Line 2, Col 4: bad\n  ✨ Assistant: line one\n    line two\n"
        );
    }
}
