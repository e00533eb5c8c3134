// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Parsing-expression-grammar runtime.
//!
//! Evaluates EBNF-like grammars with just enough features to cover the ROS
//! message definition formats: literal match, regex match, rule reference,
//! ordered choice, sequence, `*`, `+`, `?`, and group parentheses.
//! Whitespace is skipped after every token. Ordered choice commits to the
//! first matching alternative.

use std::collections::HashMap;

use fancy_regex::Regex;

use super::TypesysError;

const WS: &str = r"\A\s+";

/// One parsing expression.
#[derive(Debug)]
enum Expr {
    /// Literal string match.
    Literal(String),
    /// Anchored regex match.
    Regex(Regex),
    /// Reference to another rule by name.
    Rule(String),
    /// Ordered choice, first match wins.
    OneOf(Vec<Expr>),
    /// All subexpressions in order.
    Seq(Vec<Expr>),
    ZeroPlus(Box<Expr>),
    OnePlus(Box<Expr>),
    ZeroOne(Box<Expr>),
}

/// Nested parse result.
///
/// Leaves are literal tokens and regex captures; named rules wrap their
/// result in a [`Tree::Node`].
#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
    /// Matched literal token.
    Literal(String),
    /// Regex match text.
    Text(String),
    /// Sequence, repetition, or optional result.
    Seq(Vec<Tree>),
    /// Result of a named rule.
    Node(String, Box<Tree>),
}

/// A directed graph of named rules built from grammar text.
#[derive(Debug)]
pub struct Grammar {
    rules: HashMap<String, Expr>,
    ws: Regex,
}

impl Grammar {
    /// Parse blank-line separated rule blocks into a rule graph.
    ///
    /// Undefined rule references are a build-time error.
    pub fn build(text: &str) -> Result<Self, TypesysError> {
        let mut rules = HashMap::new();
        for block in text.split("\n\n") {
            let block = block.trim();
            if block.is_empty() {
                continue;
            }
            let mut lines = block.lines();
            let name = lines
                .next()
                .ok_or_else(|| TypesysError::Grammar("empty rule block".into()))?
                .trim()
                .to_string();
            let mut items: Vec<String> = Vec::new();
            for line in lines {
                for tok in line.split(' ').filter(|x| !x.is_empty()) {
                    items.extend(split_token(tok));
                }
            }
            if items.first().map(String::as_str) != Some("=") {
                return Err(TypesysError::Grammar(format!(
                    "rule {name:?} is missing '=' definition"
                )));
            }
            items.remove(0);

            let expr = build_expr(&name, items)?;
            rules.insert(name, expr);
        }

        // Every referenced rule must exist.
        let mut missing = Vec::new();
        for expr in rules.values() {
            collect_refs(expr, &rules, &mut missing);
        }
        if let Some(name) = missing.first() {
            return Err(TypesysError::Grammar(format!(
                "rule {name:?} is not defined"
            )));
        }

        let ws = Regex::new(WS).map_err(|err| TypesysError::Grammar(err.to_string()))?;
        Ok(Self { rules, ws })
    }

    /// Apply the start rule to the whole input.
    pub fn parse(&self, start: &str, text: &str) -> Result<Tree, TypesysError> {
        let pos = self.skip_ws(text, 0);
        match self.apply_rule(start, text, pos) {
            Some((npos, tree)) if npos == text.len() => Ok(tree),
            Some((npos, _)) => Err(TypesysError::Parse { offset: npos }),
            None => Err(TypesysError::Parse { offset: pos }),
        }
    }

    fn skip_ws(&self, text: &str, pos: usize) -> usize {
        match self.ws.find(&text[pos..]) {
            Ok(Some(m)) => pos + m.end(),
            _ => pos,
        }
    }

    fn apply_rule(&self, name: &str, text: &str, pos: usize) -> Option<(usize, Tree)> {
        let expr = self.rules.get(name)?;
        let (npos, data) = self.apply(expr, text, pos)?;
        Some((npos, Tree::Node(name.to_string(), Box::new(data))))
    }

    fn apply(&self, expr: &Expr, text: &str, pos: usize) -> Option<(usize, Tree)> {
        match expr {
            Expr::Literal(value) => {
                if text[pos..].starts_with(value.as_str()) {
                    let npos = self.skip_ws(text, pos + value.len());
                    Some((npos, Tree::Literal(value.clone())))
                } else {
                    None
                }
            }
            Expr::Regex(regex) => match regex.find(&text[pos..]) {
                Ok(Some(m)) => {
                    let npos = self.skip_ws(text, pos + m.end());
                    Some((npos, Tree::Text(m.as_str().to_string())))
                }
                _ => None,
            },
            Expr::Rule(name) => self.apply_rule(name, text, pos),
            Expr::OneOf(exprs) => exprs.iter().find_map(|x| self.apply(x, text, pos)),
            Expr::Seq(exprs) => {
                let mut items = Vec::with_capacity(exprs.len());
                let mut npos = pos;
                for sub in exprs {
                    let (next, node) = self.apply(sub, text, npos)?;
                    items.push(node);
                    npos = next;
                }
                Some((npos, Tree::Seq(items)))
            }
            Expr::ZeroPlus(sub) => {
                let mut items = Vec::new();
                let mut lpos = pos;
                while let Some((npos, node)) = self.apply(sub, text, lpos) {
                    if npos == lpos {
                        // Zero-width match would loop forever.
                        break;
                    }
                    items.push(node);
                    lpos = npos;
                }
                Some((lpos, Tree::Seq(items)))
            }
            Expr::OnePlus(sub) => {
                let (mut lpos, first) = self.apply(sub, text, pos)?;
                let mut items = vec![first];
                while let Some((npos, node)) = self.apply(sub, text, lpos) {
                    if npos == lpos {
                        break;
                    }
                    items.push(node);
                    lpos = npos;
                }
                Some((lpos, Tree::Seq(items)))
            }
            Expr::ZeroOne(sub) => match self.apply(sub, text, pos) {
                Some((npos, node)) => Some((npos, Tree::Seq(vec![node]))),
                None => Some((pos, Tree::Seq(Vec::new()))),
            },
        }
    }
}

/// Split repetition and grouping characters off a whitespace token.
///
/// `(msgsep` becomes `(`, `msgsep`; `msgdef)*` becomes `msgdef`, `)`, `*`.
/// Quoted literals and regexes end in `'` and are never split at the tail.
fn split_token(tok: &str) -> Vec<String> {
    let mut head = None;
    let mut t = tok;
    if t.len() > 1 && t.starts_with('(') {
        head = Some("(");
        t = &t[1..];
    }
    let mut rep = None;
    if t.len() > 1 && !t.ends_with('\'') {
        if let Some(last) = t.chars().last() {
            if matches!(last, '*' | '+' | '?') {
                rep = Some(last);
                t = &t[..t.len() - 1];
            }
        }
    }
    let mut close = None;
    if t.len() > 1 && t.ends_with(')') {
        close = Some(")");
        t = &t[..t.len() - 1];
    }

    let mut parts = Vec::new();
    if let Some(h) = head {
        parts.push(h.to_string());
    }
    if !t.is_empty() {
        parts.push(t.to_string());
    }
    if let Some(c) = close {
        parts.push(c.to_string());
    }
    if let Some(r) = rep {
        parts.push(r.to_string());
    }
    parts
}

/// Collapse a linear token list into a single expression.
fn build_expr(name: &str, items: Vec<String>) -> Result<Expr, TypesysError> {
    let mut stack: Vec<Option<Expr>> = Vec::new();
    let mut parens: Vec<usize> = Vec::new();

    for tok in items {
        match tok.as_str() {
            "*" | "+" | "?" => {
                let last = stack
                    .last_mut()
                    .and_then(Option::take)
                    .ok_or_else(|| bad_rule(name, "repetition without operand"))?;
                let wrapped = match tok.as_str() {
                    "*" => Expr::ZeroPlus(Box::new(last)),
                    "+" => Expr::OnePlus(Box::new(last)),
                    _ => Expr::ZeroOne(Box::new(last)),
                };
                *stack.last_mut().expect("operand slot") = Some(wrapped);
            }
            "/" => stack.push(None),
            "(" => parens.push(stack.len()),
            ")" => {
                let index = parens
                    .pop()
                    .ok_or_else(|| bad_rule(name, "unbalanced parenthesis"))?;
                let group = collapse(name, stack.split_off(index))?;
                stack.push(Some(group));
            }
            t if t.starts_with("r'") && t.len() > 2 => {
                let pattern = &t[2..t.len() - 1];
                let regex = Regex::new(&format!(r"\A(?s:{pattern})"))
                    .map_err(|err| TypesysError::Grammar(err.to_string()))?;
                stack.push(Some(Expr::Regex(regex)));
            }
            t if t.starts_with('\'') => {
                let value = t[1..t.len() - 1].replace("\\'", "'");
                stack.push(Some(Expr::Literal(value)));
            }
            t => stack.push(Some(Expr::Rule(t.to_string()))),
        }
    }

    if !parens.is_empty() {
        return Err(bad_rule(name, "unbalanced parenthesis"));
    }
    collapse(name, stack)
}

/// Collapse `a b / c d` token groups into oneof-of-sequences.
fn collapse(name: &str, toks: Vec<Option<Expr>>) -> Result<Expr, TypesysError> {
    let mut alternatives = Vec::new();
    let mut seq = Vec::new();
    for tok in toks {
        match tok {
            Some(expr) => seq.push(expr),
            None => {
                alternatives.push(fold_seq(name, std::mem::take(&mut seq))?);
            }
        }
    }
    alternatives.push(fold_seq(name, seq)?);
    Ok(if alternatives.len() > 1 {
        Expr::OneOf(alternatives)
    } else {
        alternatives.remove(0)
    })
}

fn fold_seq(name: &str, mut seq: Vec<Expr>) -> Result<Expr, TypesysError> {
    match seq.len() {
        0 => Err(bad_rule(name, "empty alternative")),
        1 => Ok(seq.remove(0)),
        _ => Ok(Expr::Seq(seq)),
    }
}

fn bad_rule(name: &str, msg: &str) -> TypesysError {
    TypesysError::Grammar(format!("rule {name:?}: {msg}"))
}

fn collect_refs(expr: &Expr, rules: &HashMap<String, Expr>, missing: &mut Vec<String>) {
    match expr {
        Expr::Rule(name) => {
            if !rules.contains_key(name) {
                missing.push(name.clone());
            }
        }
        Expr::OneOf(subs) | Expr::Seq(subs) => {
            for sub in subs {
                collect_refs(sub, rules, missing);
            }
        }
        Expr::ZeroPlus(sub) | Expr::OnePlus(sub) | Expr::ZeroOne(sub) => {
            collect_refs(sub, rules, missing);
        }
        Expr::Literal(_) | Expr::Regex(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAMMAR: &str = r"
entry
  = word (',' word)*

word
  = r'[a-z]+'
";

    #[test]
    fn test_build_and_parse() {
        let grammar = Grammar::build(GRAMMAR).expect("grammar");
        let tree = grammar.parse("entry", "foo, bar,baz").expect("parse");

        let Tree::Node(name, data) = tree else {
            panic!("expected node");
        };
        assert_eq!(name, "entry");
        let Tree::Seq(items) = *data else {
            panic!("expected sequence");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0],
            Tree::Node("word".into(), Box::new(Tree::Text("foo".into())))
        );
    }

    #[test]
    fn test_ordered_choice_commits_first() {
        let grammar = Grammar::build(
            r"
entry
  = 'aa' / 'a'
",
        )
        .expect("grammar");
        assert!(grammar.parse("entry", "aa").is_ok());
        assert!(grammar.parse("entry", "a").is_ok());
    }

    #[test]
    fn test_undefined_rule_is_build_error() {
        let err = Grammar::build("entry\n  = nosuchrule\n").unwrap_err();
        assert!(matches!(err, TypesysError::Grammar(_)));
    }

    #[test]
    fn test_parse_error_carries_position() {
        let grammar = Grammar::build("entry\n  = r'[a-z]+'\n").expect("grammar");
        let err = grammar.parse("entry", "abc123").unwrap_err();
        assert!(matches!(err, TypesysError::Parse { offset: 3 }));
    }

    #[test]
    fn test_repetition_binds_to_group() {
        let grammar = Grammar::build(
            r"
entry
  = (word ';')+

word
  = r'[a-z]+'
",
        )
        .expect("grammar");
        assert!(grammar.parse("entry", "a; b;").is_ok());
        assert!(grammar.parse("entry", "").is_err());
    }
}
