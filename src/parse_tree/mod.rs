//! Grammar-generated parse trees
//!
//! A parse tree is made of rule contexts, one per grammar production, and
//! terminal tokens. The tree is produced by an external parser and arrives
//! serialized; [`walk`] replays it as enter/exit events for a [`Listener`].

pub mod snowflake;

use serde::{Deserialize, Serialize};

/// Terminal token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Lexer token name, e.g. `VARCHAR`, `STAR`, `ID`
    pub kind: String,
    pub text: String,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    #[serde(default)]
    pub column: usize,
}

impl Token {
    pub fn new(kind: &str, text: &str, line: usize, column: usize) -> Self {
        Self {
            kind: kind.to_string(),
            text: text.to_string(),
            line,
            column,
        }
    }
}

/// Parse tree over the productions `P` of one grammar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseTree<P> {
    #[serde(rename = "node")]
    Rule(RuleNode<P>),
    #[serde(rename = "token")]
    Terminal(Token),
}

impl<P> ParseTree<P> {
    /// First token of this subtree
    pub fn start(&self) -> Option<&Token> {
        match self {
            ParseTree::Rule(node) => node.start(),
            ParseTree::Terminal(token) => Some(token),
        }
    }

    /// Last token of this subtree
    pub fn stop(&self) -> Option<&Token> {
        match self {
            ParseTree::Rule(node) => node.stop(),
            ParseTree::Terminal(token) => Some(token),
        }
    }

    pub fn as_rule(&self) -> Option<&RuleNode<P>> {
        match self {
            ParseTree::Rule(node) => Some(node),
            ParseTree::Terminal(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            ParseTree::Terminal(token) => Some(token),
            ParseTree::Rule(_) => None,
        }
    }

    fn push_text(&self, out: &mut String) {
        match self {
            ParseTree::Rule(node) => node.children.iter().for_each(|c| c.push_text(out)),
            ParseTree::Terminal(token) => out.push_str(&token.text),
        }
    }
}

/// Rule context: one production application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "P: Deserialize<'de>"))]
pub struct RuleNode<P> {
    pub rule: P,
    #[serde(default)]
    pub children: Vec<ParseTree<P>>,
}

impl<P> RuleNode<P> {
    pub fn new(rule: P, children: Vec<ParseTree<P>>) -> Self {
        Self { rule, children }
    }

    /// First token covered by this production
    pub fn start(&self) -> Option<&Token> {
        self.children.iter().find_map(ParseTree::start)
    }

    /// Last token covered by this production
    pub fn stop(&self) -> Option<&Token> {
        self.children.iter().rev().find_map(ParseTree::stop)
    }

    /// Line of the first token, 0 for an empty production
    pub fn line(&self) -> usize {
        self.start().map(|t| t.line).unwrap_or(0)
    }

    /// Column of the first token, 0 for an empty production
    pub fn column(&self) -> usize {
        self.start().map(|t| t.column).unwrap_or(0)
    }

    /// First direct terminal of the given kind
    pub fn token(&self, kind: &str) -> Option<&Token> {
        self.children
            .iter()
            .filter_map(ParseTree::as_token)
            .find(|t| t.kind == kind)
    }

    /// All direct terminals of the given kind
    pub fn tokens(&self, kind: &str) -> Vec<&Token> {
        self.children
            .iter()
            .filter_map(ParseTree::as_token)
            .filter(|t| t.kind == kind)
            .collect()
    }

    /// Source text of the production, tokens concatenated without separators
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.children.iter().for_each(|c| c.push_text(&mut out));
        out
    }
}

impl<P: PartialEq> RuleNode<P> {
    /// First direct child context of the given production
    pub fn child(&self, rule: P) -> Option<&RuleNode<P>> {
        self.children
            .iter()
            .filter_map(ParseTree::as_rule)
            .find(|n| n.rule == rule)
    }

    /// All direct child contexts of the given production
    pub fn children_of(&self, rule: P) -> Vec<&RuleNode<P>> {
        self.children
            .iter()
            .filter_map(ParseTree::as_rule)
            .filter(|n| n.rule == rule)
            .collect()
    }
}

/// Receives walk events; every callback defaults to a no-op
pub trait Listener<P> {
    fn enter_rule(&mut self, _node: &RuleNode<P>) {}

    fn exit_rule(&mut self, _node: &RuleNode<P>) {}

    fn visit_terminal(&mut self, _token: &Token) {}
}

/// Depth-first walk firing enter before and exit after each production's children
pub fn walk<P, L: Listener<P> + ?Sized>(listener: &mut L, tree: &ParseTree<P>) {
    match tree {
        ParseTree::Terminal(token) => listener.visit_terminal(token),
        ParseTree::Rule(node) => {
            listener.enter_rule(node);
            for child in &node.children {
                walk(listener, child);
            }
            listener.exit_rule(node);
        }
    }
}
