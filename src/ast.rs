//! Script Model
//!
//! The parser's output: an ordered sequence of statements, each a tagged
//! record, plus expressions with exactly one discriminant each. This
//! crate does not implement the textual grammar (the parser is an
//! external collaborator) — it only defines the shape the parser is
//! expected to produce, as a `serde`-deserializable JSON-tagged union, so
//! a host can hand the runtime a script model directly.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// A statement sequence plus its memoized label → index cache.
///
/// Label resolution within a sequence is unique: once a jump locates a
/// label, the index is cached here so later jumps to the same label (from
/// repeated loop iterations, or repeated calls of the function this block
/// is the body of) are O(1) instead of re-scanning.
#[derive(Debug, Default)]
pub struct StatementBlock {
    pub statements: Vec<Statement>,
    labels: OnceLock<HashMap<String, usize>>,
}

impl StatementBlock {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements, labels: OnceLock::new() }
    }

    /// Resolve a label to its statement index, scanning (and caching) on
    /// first use.
    pub fn resolve_label(&self, label: &str) -> Option<usize> {
        let cache = self.labels.get_or_init(|| {
            let mut map = HashMap::new();
            for (i, stmt) in self.statements.iter().enumerate() {
                if let Statement::Label { name } = stmt {
                    map.insert(name.clone(), i);
                }
            }
            map
        });
        cache.get(label).copied()
    }

    /// Number of times the label cache has performed a full scan since
    /// construction (0 or 1) — exposed for the label-memoization test.
    #[cfg(test)]
    pub fn scan_count(&self) -> usize {
        if self.labels.get().is_some() { 1 } else { 0 }
    }
}

impl From<Vec<Statement>> for StatementBlock {
    fn from(statements: Vec<Statement>) -> Self {
        Self::new(statements)
    }
}

impl<'de> Deserialize<'de> for StatementBlock {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Vec::<Statement>::deserialize(deserializer).map(StatementBlock::new)
    }
}

impl Serialize for StatementBlock {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.statements.serialize(serializer)
    }
}

impl Clone for StatementBlock {
    /// A clone gets its own, not-yet-built label cache: it's a distinct
    /// AST node as far as the memoization invariant is concerned.
    fn clone(&self) -> Self {
        Self::new(self.statements.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Statement {
    Assign {
        name: String,
        expr: Expression,
    },
    Function {
        name: String,
        #[serde(default)]
        is_async: bool,
        #[serde(default)]
        args: Vec<String>,
        statements: StatementBlock,
    },
    Jump {
        label: String,
        #[serde(default)]
        expr: Option<Expression>,
    },
    Return {
        #[serde(default)]
        expr: Option<Expression>,
    },
    Expr {
        expr: Expression,
    },
    Label {
        name: String,
    },
    Include {
        url: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    #[serde(rename = "**")]
    Pow,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "%")]
    Rem,
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "||")]
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    #[serde(rename = "!")]
    Not,
    #[serde(rename = "-")]
    Neg,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Expression {
    Number {
        value: f64,
    },
    String {
        value: String,
    },
    Variable {
        name: String,
    },
    /// A function call (named `function` in spec.md's vocabulary; renamed
    /// here so it doesn't collide with the `Statement::Function` variant).
    Call {
        name: String,
        #[serde(default)]
        args: Vec<Expression>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Expression>,
    },
    Group {
        expr: Box<Expression>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_tagged_script_model() {
        let json = r#"[
            {"kind":"assign","name":"x","expr":{"kind":"number","value":1}},
            {"kind":"jump","label":"done","expr":{"kind":"variable","name":"x"}},
            {"kind":"label","name":"done"},
            {"kind":"return","expr":{"kind":"call","name":"f","args":[]}}
        ]"#;
        let block: StatementBlock = serde_json::from_str(json).unwrap();
        assert_eq!(block.statements.len(), 4);
        assert!(matches!(&block.statements[0], Statement::Assign { name, .. } if name == "x"));
        assert_eq!(block.resolve_label("done"), Some(2));
    }

    #[test]
    fn test_clone_gets_a_fresh_label_cache() {
        let block = StatementBlock::from(vec![Statement::Label { name: "a".to_string() }]);
        assert_eq!(block.resolve_label("a"), Some(0));
        assert_eq!(block.scan_count(), 1);
        let cloned = block.clone();
        assert_eq!(cloned.scan_count(), 0);
    }

    #[test]
    fn test_unknown_label_resolves_to_none() {
        let block = StatementBlock::from(vec![Statement::Label { name: "a".to_string() }]);
        assert_eq!(block.resolve_label("b"), None);
    }
}
