// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message type system.
//!
//! Ingests the two textual schema dialects used by ROS recordings (a subset
//! of OMG IDL and the legacy `.msg` format), normalizes type names, and
//! materializes schemas in a runtime [`TypeRegistry`].

pub mod idl;
pub mod msg;
pub mod peg;
mod registry;

pub(crate) mod catalog;

pub use registry::{default_registry, TypeRegistry};

use thiserror::Error;

use peg::Tree;

/// Errors raised by grammar construction, schema parsing, and registration.
#[derive(Debug, Error)]
pub enum TypesysError {
    /// Grammar text is malformed or references undefined rules.
    #[error("invalid grammar: {0}")]
    Grammar(String),
    /// Message definition text could not be parsed.
    #[error("could not parse message definition at offset {offset}")]
    Parse {
        /// Byte offset where parsing stopped.
        offset: usize,
    },
    /// A parse tree had an unexpected shape for the dialect.
    #[error("unexpected {found} in '{rule}' node")]
    Malformed {
        /// Rule that produced the node.
        rule: &'static str,
        /// Short description of the offending data.
        found: &'static str,
    },
    /// A type was re-registered with a different definition.
    #[error("type {0:?} is already present with a different definition")]
    Conflict(String),
    /// A referenced type is not known.
    #[error("type {0:?} is unknown")]
    UnknownType(String),
}

/// Primitive wire types shared by both schema dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    String,
}

impl Primitive {
    /// Parse the dialect spelling of a primitive.
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "bool" => Self::Bool,
            "int8" => Self::Int8,
            "int16" => Self::Int16,
            "int32" => Self::Int32,
            "int64" => Self::Int64,
            "uint8" => Self::UInt8,
            "uint16" => Self::UInt16,
            "uint32" => Self::UInt32,
            "uint64" => Self::UInt64,
            "float32" => Self::Float32,
            "float64" => Self::Float64,
            "string" => Self::String,
            _ => return None,
        })
    }

    /// Dialect spelling of the primitive.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::String => "string",
        }
    }

    /// Serialized size in bytes, `None` for strings.
    pub fn size(self) -> Option<usize> {
        match self {
            Self::Bool | Self::Int8 | Self::UInt8 => Some(1),
            Self::Int16 | Self::UInt16 => Some(2),
            Self::Int32 | Self::UInt32 | Self::Float32 => Some(4),
            Self::Int64 | Self::UInt64 | Self::Float64 => Some(8),
            Self::String => None,
        }
    }
}

/// Kind of a message field.
///
/// Nesting is restricted to one level of `Array`/`Sequence` around a base
/// type or a message reference; the two dialects never produce deeper forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Primitive value.
    Base(Primitive),
    /// Reference to another registered message type.
    Name(String),
    /// Fixed-length array.
    Array(Box<FieldKind>, u32),
    /// Variable-length sequence with an advisory bound.
    Sequence(Box<FieldKind>, Option<u32>),
}

/// Value of a class-level constant.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl std::fmt::Display for ConstValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{}", if *v { "True" } else { "False" }),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Str(v) => write!(f, "{}", v),
        }
    }
}

/// Class-level constant of a message type.
///
/// Constants are not part of the wire form, they are exposed alongside the
/// field table.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub name: String,
    pub primitive: Primitive,
    pub value: ConstValue,
}

/// Constants plus ordered typed fields of one message type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    pub constants: Vec<Constant>,
    pub fields: Vec<(String, FieldKind)>,
}

/// Parsed message types in definition order.
pub type TypeMap = Vec<(String, Schema)>;

/// Field descriptor before name resolution.
///
/// Both dialect visitors emit this shape; the final [`FieldKind`] is
/// produced once all sibling type names are known.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FieldDesc {
    Base(String),
    Name(String),
    Array(Box<FieldDesc>, u32),
    Sequence(Box<FieldDesc>, Option<u32>),
}

/// Semantic values produced while folding a parse tree.
///
/// The variants form the superset needed by the two dialect visitors;
/// unvisited nodes pass their data through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Ast {
    /// Matched literal token.
    Lit(String),
    /// Raw regex match.
    Text(String),
    /// Sequence or repetition of sub-results.
    Seq(Vec<Ast>),
    /// Suppressed node (comments, macros, separators, annotations).
    Nothing,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Identifier or (scoped) type name.
    Name(String),
    /// Resolved base type spelling.
    Base(String),
    /// Array/sequence type specifier.
    Desc(FieldDesc),
    /// IDL declarator.
    Declarator { name: String, array_len: Option<u32> },
    /// Constant declaration.
    Const {
        primitive: String,
        name: String,
        value: ConstValue,
    },
    /// IDL struct definition.
    Struct {
        name: String,
        fields: Vec<(String, FieldDesc)>,
    },
    /// IDL module with scoped constants and structs.
    Module {
        consts: Vec<(String, String, ConstValue)>,
        structs: Vec<(String, Vec<(String, FieldDesc)>)>,
    },
    /// One legacy msg definition with its unprocessed items.
    Msgdef { name: String, items: Vec<Ast> },
    /// Final result of a specification.
    Types(TypeMap),
}

/// Transformer invoked for every named rule while folding a parse tree.
pub(crate) trait Visitor {
    fn visit(&mut self, rule: &str, data: Ast) -> Result<Ast, TypesysError>;
}

/// Fold a parse tree depth-first through a visitor.
pub(crate) fn walk<V: Visitor>(tree: Tree, visitor: &mut V) -> Result<Ast, TypesysError> {
    match tree {
        Tree::Literal(value) => Ok(Ast::Lit(value)),
        Tree::Text(value) => Ok(Ast::Text(value)),
        Tree::Seq(items) => Ok(Ast::Seq(
            items
                .into_iter()
                .map(|x| walk(x, visitor))
                .collect::<Result<_, _>>()?,
        )),
        Tree::Node(rule, data) => {
            let inner = walk(*data, visitor)?;
            visitor.visit(&rule, inner)
        }
    }
}

/// Parse a full message definition with the given grammar and visitor.
pub(crate) fn parse_definition<V: Visitor>(
    grammar: &peg::Grammar,
    visitor: &mut V,
    text: &str,
) -> Result<TypeMap, TypesysError> {
    let tree = grammar.parse("specification", text)?;
    match walk(tree, visitor)? {
        Ast::Types(types) => Ok(types),
        _ => Err(TypesysError::Malformed {
            rule: "specification",
            found: "non-type result",
        }),
    }
}
