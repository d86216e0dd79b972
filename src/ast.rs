//! AST node model shared by both dialects
//!
//! The analysis engine answers every request with a token list and a single
//! root node. Flex sources produce a `FlexFile`, bison sources a `BisonFile`;
//! any list position may instead hold an `Error` node, which is how the engine
//! reports a recoverable syntax error while still returning a partial tree.
//!
//! Decoding is fail-soft: the engine is a remote process and may emit node
//! types this client does not know, or known types with unexpected field
//! shapes. Those decode to [`AstNode::Unknown`] instead of failing the whole
//! response, so the renderer can show a placeholder in their place.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Message used when an error node arrives without one.
pub const DEFAULT_ERROR_MESSAGE: &str = "Unknown error";

/// Node types this client knows how to decode.
pub const KNOWN_NODE_TYPES: [&str; 7] = [
    "FlexFile",
    "FlexRule",
    "BisonFile",
    "BisonTokenDecl",
    "BisonGrammarRule",
    "BisonAlternative",
    "Error",
];

/// A single token as reported by the engine's scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub token_type: String,
    pub value: String,
    #[serde(default = "first_position")]
    pub line: u32,
    #[serde(default = "first_position")]
    pub column: u32,
}

fn first_position() -> u32 {
    1
}

/// A syntax-error placeholder embedded in the tree.
///
/// Positions are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNode {
    pub line: u32,
    pub column: u32,
    pub message: String,
}

/// One node of an analysis tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstNode {
    /// Root of a flex tree.
    FlexFile { rules: Vec<AstNode> },
    /// `pattern  action` scanner rule, both kept as opaque text.
    FlexRule { pattern: String, action: String },
    /// Root of a bison tree; declarations and rules are independent lists.
    BisonFile {
        declarations: Vec<AstNode>,
        rules: Vec<AstNode>,
    },
    /// `%token A B ...`
    BisonTokenDecl { names: Vec<String> },
    /// A nonterminal and its production alternatives.
    BisonGrammarRule {
        name: String,
        alternatives: Vec<AstNode>,
    },
    /// One production. `symbols` may be empty.
    BisonAlternative {
        symbols: Vec<String>,
        action: Option<String>,
    },
    Error(ErrorNode),
    /// A raw string where a node was expected.
    Literal(String),
    /// Anything the decoder could not map onto the closed set above.
    Unknown {
        node_type: String,
        detail: Option<String>,
    },
}

impl AstNode {
    /// The `type` tag this node was decoded from.
    pub fn type_name(&self) -> &str {
        match self {
            AstNode::FlexFile { .. } => "FlexFile",
            AstNode::FlexRule { .. } => "FlexRule",
            AstNode::BisonFile { .. } => "BisonFile",
            AstNode::BisonTokenDecl { .. } => "BisonTokenDecl",
            AstNode::BisonGrammarRule { .. } => "BisonGrammarRule",
            AstNode::BisonAlternative { .. } => "BisonAlternative",
            AstNode::Error(_) => "Error",
            AstNode::Literal(_) => "Literal",
            AstNode::Unknown { node_type, .. } => node_type,
        }
    }

    /// The `rules`, `declarations` and `alternatives` lists, in that order.
    ///
    /// Lists a variant does not carry come back empty.
    pub fn child_lists(&self) -> [&[AstNode]; 3] {
        const NONE: &[AstNode] = &[];
        match self {
            AstNode::FlexFile { rules } => [rules.as_slice(), NONE, NONE],
            AstNode::BisonFile {
                declarations,
                rules,
            } => [rules.as_slice(), declarations.as_slice(), NONE],
            AstNode::BisonGrammarRule { alternatives, .. } => {
                [NONE, NONE, alternatives.as_slice()]
            }
            _ => [NONE, NONE, NONE],
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, AstNode::Error(_))
    }

    /// Decode a JSON value without ever failing.
    pub fn from_value(value: Value) -> AstNode {
        let map = match value {
            Value::String(text) => return AstNode::Literal(text),
            Value::Object(map) => map,
            other => {
                return AstNode::Unknown {
                    node_type: json_kind(&other).to_string(),
                    detail: None,
                }
            }
        };
        let node_type = match map.get("type") {
            Some(Value::String(tag)) => tag.clone(),
            Some(other) => {
                return AstNode::Unknown {
                    node_type: other.to_string(),
                    detail: Some("`type` is not a string".to_string()),
                }
            }
            None => {
                return AstNode::Unknown {
                    node_type: "(missing)".to_string(),
                    detail: None,
                }
            }
        };
        if !KNOWN_NODE_TYPES.contains(&node_type.as_str()) {
            return AstNode::Unknown {
                node_type,
                detail: None,
            };
        }
        match serde_json::from_value::<TaggedNode>(Value::Object(map)) {
            Ok(tagged) => tagged.into(),
            Err(err) => AstNode::Unknown {
                node_type,
                detail: Some(err.to_string()),
            },
        }
    }
}

impl<'de> Deserialize<'de> for AstNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(AstNode::from_value(value))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Wire shape of the known variants. Every field is optional so that a
/// partially populated node still decodes as its own variant.
#[derive(Deserialize)]
#[serde(tag = "type")]
enum TaggedNode {
    FlexFile {
        #[serde(default)]
        rules: Vec<AstNode>,
    },
    FlexRule {
        #[serde(default)]
        pattern: Option<String>,
        #[serde(default)]
        action: Option<String>,
    },
    BisonFile {
        #[serde(default)]
        declarations: Vec<AstNode>,
        #[serde(default)]
        rules: Vec<AstNode>,
    },
    BisonTokenDecl {
        #[serde(default)]
        names: Vec<String>,
    },
    BisonGrammarRule {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        alternatives: Vec<AstNode>,
    },
    BisonAlternative {
        #[serde(default)]
        symbols: Vec<String>,
        #[serde(default)]
        action: Option<String>,
    },
    /// Positions and message are taken as raw values so that a badly typed
    /// field never turns an error into an unknown node.
    Error {
        #[serde(default)]
        line: Option<Value>,
        #[serde(default)]
        column: Option<Value>,
        #[serde(default)]
        message: Option<Value>,
    },
}

impl From<TaggedNode> for AstNode {
    fn from(tagged: TaggedNode) -> Self {
        match tagged {
            TaggedNode::FlexFile { rules } => AstNode::FlexFile { rules },
            TaggedNode::FlexRule { pattern, action } => AstNode::FlexRule {
                pattern: pattern.unwrap_or_default(),
                action: action.unwrap_or_default(),
            },
            TaggedNode::BisonFile {
                declarations,
                rules,
            } => AstNode::BisonFile {
                declarations,
                rules,
            },
            TaggedNode::BisonTokenDecl { names } => AstNode::BisonTokenDecl { names },
            TaggedNode::BisonGrammarRule { name, alternatives } => AstNode::BisonGrammarRule {
                name: name.unwrap_or_default(),
                alternatives,
            },
            TaggedNode::BisonAlternative { symbols, action } => {
                AstNode::BisonAlternative { symbols, action }
            }
            TaggedNode::Error {
                line,
                column,
                message,
            } => AstNode::Error(ErrorNode {
                line: position(line),
                column: position(column),
                message: match message {
                    Some(Value::String(text)) => text,
                    _ => DEFAULT_ERROR_MESSAGE.to_string(),
                },
            }),
        }
    }
}

/// A 1-based position. Anything but a positive integer that fits is 1.
fn position(value: Option<Value>) -> u32 {
    value
        .as_ref()
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|&n| n >= 1)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> AstNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_decode_flex_tree() {
        let node = decode(json!({
            "type": "FlexFile",
            "rules": [
                {"type": "FlexRule", "pattern": "[0-9]+", "action": "return NUMBER;"}
            ]
        }));
        assert_eq!(
            node,
            AstNode::FlexFile {
                rules: vec![AstNode::FlexRule {
                    pattern: "[0-9]+".to_string(),
                    action: "return NUMBER;".to_string(),
                }]
            }
        );
    }

    #[test]
    fn test_decode_bison_alternative_without_action() {
        let node = decode(json!({"type": "BisonAlternative", "symbols": [], "action": null}));
        assert_eq!(
            node,
            AstNode::BisonAlternative {
                symbols: vec![],
                action: None
            }
        );
    }

    #[test]
    fn test_error_defaults_to_first_position() {
        let node = decode(json!({"type": "Error", "message": "unexpected symbol"}));
        assert_eq!(
            node,
            AstNode::Error(ErrorNode {
                line: 1,
                column: 1,
                message: "unexpected symbol".to_string(),
            })
        );

        let bare = decode(json!({"type": "Error", "line": null}));
        match bare {
            AstNode::Error(err) => {
                assert_eq!((err.line, err.column), (1, 1));
                assert_eq!(err.message, DEFAULT_ERROR_MESSAGE);
            }
            other => panic!("expected an error node, got {other:?}"),
        }
    }

    #[test]
    fn test_badly_typed_error_fields_stay_an_error() {
        let node = decode(json!({
            "type": "FlexFile",
            "rules": [{"type": "Error", "line": "3", "column": 2, "message": "unexpected token"}]
        }));
        let AstNode::FlexFile { rules } = node else {
            panic!("root should still be a FlexFile");
        };
        assert_eq!(
            rules[0],
            AstNode::Error(ErrorNode {
                line: 1,
                column: 2,
                message: "unexpected token".to_string(),
            })
        );

        for bad in [json!(-1), json!(2.5), json!(0), json!(u64::MAX), json!([4])] {
            match decode(json!({"type": "Error", "line": bad, "column": 7, "message": 5})) {
                AstNode::Error(err) => {
                    assert_eq!((err.line, err.column), (1, 7));
                    assert_eq!(err.message, DEFAULT_ERROR_MESSAGE);
                }
                other => panic!("expected an error node, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_unknown_type_keeps_literal_tag() {
        let node = decode(json!({"type": "BisonPrecedence", "level": 3}));
        assert_eq!(
            node,
            AstNode::Unknown {
                node_type: "BisonPrecedence".to_string(),
                detail: None
            }
        );
        assert_eq!(node.type_name(), "BisonPrecedence");
    }

    #[test]
    fn test_malformed_known_type_is_unknown_with_detail() {
        let node = decode(json!({"type": "FlexRule", "pattern": 42}));
        match node {
            AstNode::Unknown { node_type, detail } => {
                assert_eq!(node_type, "FlexRule");
                assert!(detail.is_some());
            }
            other => panic!("expected unknown, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_child_does_not_poison_parent() {
        let node = decode(json!({
            "type": "FlexFile",
            "rules": [{"type": "FlexRule", "pattern": 7}, "loose text", 12]
        }));
        let AstNode::FlexFile { rules } = node else {
            panic!("root should still be a FlexFile");
        };
        assert!(matches!(rules[0], AstNode::Unknown { .. }));
        assert_eq!(rules[1], AstNode::Literal("loose text".to_string()));
        assert_eq!(rules[2].type_name(), "number");
    }

    #[test]
    fn test_absent_lists_decode_empty() {
        let node = decode(json!({"type": "BisonFile"}));
        assert_eq!(
            node,
            AstNode::BisonFile {
                declarations: vec![],
                rules: vec![]
            }
        );
    }

    #[test]
    fn test_missing_type_tag() {
        let node = decode(json!({"rules": []}));
        assert_eq!(node.type_name(), "(missing)");
    }

    #[test]
    fn test_child_lists_order() {
        let node = AstNode::BisonFile {
            declarations: vec![AstNode::Literal("d".into())],
            rules: vec![AstNode::Literal("r".into())],
        };
        let [rules, declarations, alternatives] = node.child_lists();
        assert_eq!(rules[0], AstNode::Literal("r".into()));
        assert_eq!(declarations.len(), 1);
        assert_eq!(rules.len(), 1);
        assert!(alternatives.is_empty());
    }

    #[test]
    fn test_token_column_default() {
        let token: Token =
            serde_json::from_value(json!({"token_type": "Identifier", "value": "expr", "line": 3}))
                .unwrap();
        assert_eq!(token.line, 3);
        assert_eq!(token.column, 1);
    }
}
