// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! IDL dialect.
//!
//! Grammar and parse tree visitor for the subset of OMG IDL emitted by the
//! ROS 2 interface generators: modules, typedefs, structs, constants,
//! annotations, and `sequence`/`string` template parameterizations. Bounds
//! on strings and sequences are dropped, matching the runtime type model.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::msg::parse_radix_int;
use super::peg::Grammar;
use super::{
    parse_definition, Ast, ConstValue, Constant, FieldDesc, FieldKind, Primitive, Schema, TypeMap,
    TypesysError, Visitor,
};

const GRAMMAR_IDL: &str = r#"
specification
  = definition+

definition
  = comment
  / macro
  / include
  / module_dcl ';'
  / const_dcl ';'
  / type_dcl ';'

comment
  = r'/\*.*?\*/'
  / r'[/][/][^\n]*'

macro
  = ifndef
  / define
  / endif

ifndef
  = '#ifndef' r'[a-zA-Z0-9_]+'

define
  = '#define' r'[a-zA-Z0-9_]+'

endif
  = '#endif'

include
  = '#include' include_filename

include_filename
  = '<' r'[^>]+' '>'
  / '"' r'[^"]+' '"'

module_dcl
  = annotation* 'module' identifier '{' definition+ '}'

const_dcl
  = 'const' const_type identifier '=' expression

type_dcl
  = typedef_dcl
  / constr_type_dcl

typedef_dcl
  = 'typedef' type_declarator

type_declarator
  = ( simple_type_spec
    / template_type_spec
    / constr_type_dcl
    ) any_declarators

simple_type_spec
  = base_type_spec
  / scoped_name

template_type_spec
  = sequence_type
  / string_type

sequence_type
  = 'sequence' '<' type_spec ',' expression '>'
  / 'sequence' '<' type_spec '>'

type_spec
  = template_type_spec
  / simple_type_spec

any_declarators
  = any_declarator (',' any_declarator)*

any_declarator
  = array_declarator
  / simple_declarator

constr_type_dcl
  = struct_dcl

struct_dcl
  = struct_def

struct_def
  = annotation* 'struct' identifier '{' member+ '}'

member
  = annotation* type_spec declarators ';'

declarators
  = declarator (',' declarator)*

declarator
  = array_declarator
  / simple_declarator

simple_declarator
  = identifier

array_declarator
  = identifier fixed_array_size+

fixed_array_size
  = '[' expression ']'

annotation
  = '@' scoped_name ('(' annotation_params ')')?

annotation_params
  = annotation_param (',' annotation_param)*
  / expression

annotation_param
  = identifier '=' expression

const_type
  = base_type_spec
  / string_type
  / scoped_name

base_type_spec
  = integer_type
  / float_type
  / char_type
  / boolean_type
  / octet_type

integer_type
  = r'u?int(64|32|16|8)\b'
  / r'(unsigned\s+)?((long\s+)?long|int|short)\b'

float_type
  = r'((long\s+)?double|float)\b'

char_type
  = r'char\b'

boolean_type
  = r'boolean\b'

octet_type
  = r'octet\b'

string_type
  = 'string' '<' expression '>'
  / 'string'

scoped_name
  = identifier '::' scoped_name
  / '::' scoped_name
  / identifier

identifier
  = r'[a-zA-Z_][a-zA-Z_0-9]*'

expression
  = primary_expr binary_operator primary_expr
  / primary_expr
  / unary_operator primary_expr

primary_expr
  = literal
  / scoped_name
  / '(' expression ')'

binary_operator
  = '|'
  / '^'
  / '&'
  / '<<'
  / '>>'
  / '+'
  / '-'
  / '*'
  / '/'
  / '%'

unary_operator
  = '+'
  / '-'
  / '~'

literal
  = boolean_literal
  / float_literal
  / integer_literal
  / character_literal
  / string_literals

boolean_literal
  = 'TRUE'
  / 'FALSE'

integer_literal
  = hexadecimal_literal
  / octal_literal
  / decimal_literal

decimal_literal
  = r'[-+]?[1-9][0-9]+'
  / r'[-+]?[0-9]'

octal_literal
  = r'[-+]?0[0-7]+'

hexadecimal_literal
  = r'[-+]?0[xX][a-fA-F0-9]+'

float_literal
  = r'[-+]?[0-9]*\.[0-9]+([eE][-+]?[0-9]+)?'
  / r'[-+]?[0-9]*\.?[0-9]+([eE][-+]?[0-9]+)'

character_literal
  = '\'' r'[a-zA-Z0-9_]' '\''

string_literals
  = string_literal+

string_literal
  = '"' r'(\\"|[^"])*' '"'
"#;

fn grammar() -> &'static Grammar {
    static GRAMMAR: OnceLock<Grammar> = OnceLock::new();
    GRAMMAR.get_or_init(|| Grammar::build(GRAMMAR_IDL).expect("idl grammar is valid"))
}

fn malformed(rule: &'static str) -> TypesysError {
    TypesysError::Malformed {
        rule,
        found: "unexpected node shape",
    }
}

/// Map IDL base type spellings onto wire primitives.
fn base_alias(name: &str) -> &str {
    match name {
        "boolean" => "bool",
        "double" | "long double" => "float64",
        "float" => "float32",
        "octet" | "char" => "uint8",
        "short" => "int16",
        "unsigned short" => "uint16",
        "int" | "long" => "int32",
        "unsigned int" | "unsigned long" => "uint32",
        "long long" => "int64",
        "unsigned long long" => "uint64",
        other => other,
    }
}

/// Parse tree visitor for the IDL dialect.
///
/// The typedef table is instance-scoped; aliases are expanded while struct
/// members are collected.
struct IdlVisitor {
    typedefs: HashMap<String, FieldDesc>,
}

impl IdlVisitor {
    fn new() -> Self {
        Self {
            typedefs: HashMap::new(),
        }
    }

    fn as_desc(&self, ast: &Ast, rule: &'static str) -> Result<FieldDesc, TypesysError> {
        match ast {
            Ast::Base(name) => Ok(FieldDesc::Base(name.clone())),
            Ast::Name(name) => Ok(self
                .typedefs
                .get(name)
                .cloned()
                .unwrap_or_else(|| FieldDesc::Name(name.clone()))),
            Ast::Desc(desc) => Ok(desc.clone()),
            _ => Err(malformed(rule)),
        }
    }

    fn resolve(&self, mut desc: FieldDesc) -> FieldDesc {
        while let FieldDesc::Name(name) = &desc {
            match self.typedefs.get(name) {
                Some(resolved) => desc = resolved.clone(),
                None => break,
            }
        }
        desc
    }

    fn flatten_declarators(data: &Ast, rule: &'static str) -> Result<Vec<Ast>, TypesysError> {
        let Ast::Seq(items) = data else {
            return Err(malformed(rule));
        };
        let [first, Ast::Seq(rest)] = items.as_slice() else {
            return Err(malformed(rule));
        };
        let mut flat = vec![first.clone()];
        for pair in rest {
            let Ast::Seq(inner) = pair else {
                return Err(malformed(rule));
            };
            flat.push(inner.get(1).ok_or_else(|| malformed(rule))?.clone());
        }
        Ok(flat)
    }
}

impl Visitor for IdlVisitor {
    fn visit(&mut self, rule: &str, data: Ast) -> Result<Ast, TypesysError> {
        match rule {
            "comment" | "macro" | "include" | "annotation" => Ok(Ast::Nothing),

            "identifier" => match data {
                Ast::Text(value) => Ok(Ast::Name(value)),
                _ => Err(malformed("identifier")),
            },

            "scoped_name" => match data {
                name @ Ast::Name(_) => Ok(name),
                Ast::Seq(items) => match items.as_slice() {
                    [Ast::Name(head), Ast::Lit(_), Ast::Name(rest)] => {
                        Ok(Ast::Name(format!("{head}/{rest}")))
                    }
                    [Ast::Lit(_), Ast::Name(rest)] => Ok(Ast::Name(rest.clone())),
                    _ => Err(malformed("scoped_name")),
                },
                _ => Err(malformed("scoped_name")),
            },

            "base_type_spec" => match data {
                Ast::Text(value) => {
                    let spelled = value.split_whitespace().collect::<Vec<_>>().join(" ");
                    Ok(Ast::Base(base_alias(&spelled).to_string()))
                }
                _ => Err(malformed("base_type_spec")),
            },

            "string_type" => Ok(Ast::Base("string".to_string())),

            "sequence_type" => {
                let Ast::Seq(items) = data else {
                    return Err(malformed("sequence_type"));
                };
                if items.len() != 4 && items.len() != 6 {
                    return Err(malformed("sequence_type"));
                }
                let elem = self.as_desc(&items[2], "sequence_type")?;
                Ok(Ast::Desc(FieldDesc::Sequence(Box::new(elem), None)))
            }

            "simple_declarator" => match data {
                Ast::Name(name) => Ok(Ast::Declarator {
                    name,
                    array_len: None,
                }),
                _ => Err(malformed("simple_declarator")),
            },

            "array_declarator" => {
                let Ast::Seq(items) = data else {
                    return Err(malformed("array_declarator"));
                };
                let [Ast::Name(name), Ast::Seq(sizes)] = items.as_slice() else {
                    return Err(malformed("array_declarator"));
                };
                let length = match sizes.first() {
                    Some(Ast::Seq(size)) => match size.get(1) {
                        Some(Ast::Int(value)) => *value as u32,
                        _ => return Err(malformed("fixed_array_size")),
                    },
                    _ => return Err(malformed("fixed_array_size")),
                };
                Ok(Ast::Declarator {
                    name: name.clone(),
                    array_len: Some(length),
                })
            }

            "typedef_dcl" => {
                let Ast::Seq(items) = data else {
                    return Err(malformed("typedef_dcl"));
                };
                let [_typedef, Ast::Seq(decl)] = items.as_slice() else {
                    return Err(malformed("typedef_dcl"));
                };
                let [typespec, declarators] = decl.as_slice() else {
                    return Err(malformed("typedef_dcl"));
                };
                let base = self.as_desc(typespec, "typedef_dcl")?;
                for declarator in Self::flatten_declarators(declarators, "typedef_dcl")? {
                    let Ast::Declarator { name, array_len } = declarator else {
                        return Err(malformed("typedef_dcl"));
                    };
                    let value = match array_len {
                        Some(length) => FieldDesc::Array(Box::new(base.clone()), length),
                        None => base.clone(),
                    };
                    self.typedefs.insert(name, value);
                }
                Ok(Ast::Nothing)
            }

            "type_dcl" => match data {
                strct @ Ast::Struct { .. } => Ok(strct),
                _ => Ok(Ast::Nothing),
            },

            "struct_dcl" => {
                let Ast::Seq(items) = data else {
                    return Err(malformed("struct_dcl"));
                };
                let [_annotations, _struct, Ast::Name(name), _open, Ast::Seq(members), _close] =
                    items.as_slice()
                else {
                    return Err(malformed("struct_dcl"));
                };
                let mut fields = Vec::new();
                for member in members {
                    let Ast::Seq(parts) = member else {
                        return Err(malformed("member"));
                    };
                    let [_annotations, typespec, declarators, _semi] = parts.as_slice() else {
                        return Err(malformed("member"));
                    };
                    let desc = self.resolve(self.as_desc(typespec, "member")?);
                    for declarator in Self::flatten_declarators(declarators, "member")? {
                        let Ast::Declarator { name, .. } = declarator else {
                            return Err(malformed("member"));
                        };
                        fields.push((name, desc.clone()));
                    }
                }
                Ok(Ast::Struct {
                    name: name.clone(),
                    fields,
                })
            }

            "const_dcl" => {
                let Ast::Seq(items) = data else {
                    return Err(malformed("const_dcl"));
                };
                let [_const, ctype, Ast::Name(name), _eq, value] = items.as_slice() else {
                    return Err(malformed("const_dcl"));
                };
                let primitive = match ctype {
                    Ast::Base(spelled) => spelled.clone(),
                    Ast::Name(spelled) => spelled.clone(),
                    _ => return Err(malformed("const_dcl")),
                };
                let value = match value {
                    Ast::Bool(v) => ConstValue::Bool(*v),
                    Ast::Int(v) => ConstValue::Int(*v),
                    Ast::Float(v) => ConstValue::Float(*v),
                    Ast::Str(v) => ConstValue::Str(v.clone()),
                    _ => return Err(malformed("const_dcl")),
                };
                Ok(Ast::Const {
                    primitive,
                    name: name.clone(),
                    value,
                })
            }

            "module_dcl" => {
                let Ast::Seq(items) = data else {
                    return Err(malformed("module_dcl"));
                };
                let [_annotations, _module, Ast::Name(name), _open, Ast::Seq(defs), _close] =
                    items.as_slice()
                else {
                    return Err(malformed("module_dcl"));
                };
                let mut consts = Vec::new();
                let mut structs = Vec::new();
                for def in defs {
                    let item = match def {
                        Ast::Nothing => continue,
                        Ast::Seq(inner) => inner.first().ok_or_else(|| malformed("definition"))?,
                        _ => return Err(malformed("definition")),
                    };
                    match item {
                        Ast::Nothing => {}
                        Ast::Const {
                            primitive,
                            name: cname,
                            value,
                        } => consts.push((primitive.clone(), cname.clone(), value.clone())),
                        Ast::Struct { name: sname, fields } => {
                            structs.push((sname.clone(), fields.clone()));
                        }
                        Ast::Module {
                            consts: subconsts,
                            structs: substructs,
                        } => {
                            consts.extend(subconsts.iter().cloned());
                            structs.extend(substructs.iter().cloned());
                        }
                        _ => return Err(malformed("definition")),
                    }
                }
                Ok(Ast::Module {
                    consts: consts
                        .into_iter()
                        .map(|(typ, sub, val)| (typ, format!("{name}/{sub}"), val))
                        .collect(),
                    structs: structs
                        .into_iter()
                        .map(|(sub, fields)| (format!("{name}/{sub}"), fields))
                        .collect(),
                })
            }

            "primary_expr" => match data {
                Ast::Seq(items) => match items.as_slice() {
                    [Ast::Lit(_), value, Ast::Lit(_)] => Ok(value.clone()),
                    _ => Err(malformed("primary_expr")),
                },
                other => Ok(other),
            },

            "expression" => match data {
                Ast::Seq(items) => match items.as_slice() {
                    [Ast::Int(lhs), Ast::Lit(op), Ast::Int(rhs)] => {
                        Ok(Ast::Int(eval_binary(*lhs, op, *rhs)?))
                    }
                    [Ast::Lit(op), Ast::Int(value)] => Ok(Ast::Int(match op.as_str() {
                        "+" => *value,
                        "-" => -value,
                        "~" => !value,
                        _ => return Err(malformed("expression")),
                    })),
                    _ => Err(malformed("expression")),
                },
                other => Ok(other),
            },

            "boolean_literal" => match data {
                Ast::Lit(value) => Ok(Ast::Bool(value == "TRUE")),
                _ => Err(malformed("boolean_literal")),
            },

            "float_literal" => match data {
                Ast::Text(value) => value
                    .parse::<f64>()
                    .map(Ast::Float)
                    .map_err(|_| malformed("float_literal")),
                _ => Err(malformed("float_literal")),
            },

            "decimal_literal" => match data {
                Ast::Text(value) => Ok(Ast::Int(parse_radix_int(&value, 10, 0)?)),
                _ => Err(malformed("decimal_literal")),
            },

            "octal_literal" => match data {
                Ast::Text(value) => Ok(Ast::Int(parse_radix_int(&value, 8, 0)?)),
                _ => Err(malformed("octal_literal")),
            },

            "hexadecimal_literal" => match data {
                Ast::Text(value) => Ok(Ast::Int(parse_radix_int(&value, 16, 2)?)),
                _ => Err(malformed("hexadecimal_literal")),
            },

            "character_literal" => match data {
                Ast::Seq(items) => match items.as_slice() {
                    [Ast::Lit(_), Ast::Text(value), Ast::Lit(_)] => Ok(Ast::Str(value.clone())),
                    _ => Err(malformed("character_literal")),
                },
                _ => Err(malformed("character_literal")),
            },

            "string_literals" => match data {
                Ast::Seq(items) => {
                    let mut out = String::new();
                    for item in items {
                        let Ast::Seq(inner) = item else {
                            return Err(malformed("string_literals"));
                        };
                        let [Ast::Lit(_), Ast::Text(value), Ast::Lit(_)] = inner.as_slice() else {
                            return Err(malformed("string_literals"));
                        };
                        out.push_str(value);
                    }
                    Ok(Ast::Str(out))
                }
                _ => Err(malformed("string_literals")),
            },

            "specification" => {
                let Ast::Seq(items) = data else {
                    return Err(malformed("specification"));
                };
                let mut consts: HashMap<String, Vec<Constant>> = HashMap::new();
                let mut structs: Vec<(String, Vec<(String, FieldDesc)>)> = Vec::new();
                for def in &items {
                    let item = match def {
                        Ast::Nothing => continue,
                        Ast::Seq(inner) => inner.first().ok_or_else(|| malformed("definition"))?,
                        _ => continue,
                    };
                    let Ast::Module {
                        consts: mconsts,
                        structs: mstructs,
                    } = item
                    else {
                        continue;
                    };
                    for (primitive, scoped, value) in mconsts {
                        let Some((structname, varname)) = scoped.split_once("_Constants/") else {
                            continue;
                        };
                        let primitive = Primitive::parse(primitive)
                            .ok_or_else(|| TypesysError::UnknownType(primitive.clone()))?;
                        consts.entry(structname.to_string()).or_default().push(Constant {
                            name: varname.to_string(),
                            primitive,
                            value: value.clone(),
                        });
                    }
                    structs.extend(mstructs.iter().cloned());
                }

                let mut types = TypeMap::new();
                for (name, fields) in structs {
                    let schema = Schema {
                        constants: consts.remove(&name).unwrap_or_default(),
                        fields: fields
                            .into_iter()
                            .map(|(fname, desc)| Ok((fname, finalize(desc)?)))
                            .collect::<Result<_, TypesysError>>()?,
                    };
                    types.push((name, schema));
                }
                Ok(Ast::Types(types))
            }

            _ => Ok(data),
        }
    }
}

fn eval_binary(lhs: i64, op: &str, rhs: i64) -> Result<i64, TypesysError> {
    Ok(match op {
        "|" => lhs | rhs,
        "^" => lhs ^ rhs,
        "&" => lhs & rhs,
        "<<" => lhs.wrapping_shl(rhs as u32),
        ">>" => lhs.wrapping_shr(rhs as u32),
        "+" => lhs.wrapping_add(rhs),
        "-" => lhs.wrapping_sub(rhs),
        "*" => lhs.wrapping_mul(rhs),
        "/" => lhs.checked_div(rhs).ok_or_else(|| malformed("expression"))?,
        "%" => lhs.checked_rem(rhs).ok_or_else(|| malformed("expression"))?,
        _ => return Err(malformed("expression")),
    })
}

/// Turn a resolved field descriptor into its final kind.
fn finalize(desc: FieldDesc) -> Result<FieldKind, TypesysError> {
    let scalar = |desc: FieldDesc| -> Result<FieldKind, TypesysError> {
        match desc {
            FieldDesc::Base(name) => Primitive::parse(&name)
                .map(FieldKind::Base)
                .ok_or(TypesysError::UnknownType(name)),
            FieldDesc::Name(name) => Ok(FieldKind::Name(name)),
            FieldDesc::Array(..) | FieldDesc::Sequence(..) => Err(TypesysError::Malformed {
                rule: "member",
                found: "nested container element",
            }),
        }
    };
    Ok(match desc {
        FieldDesc::Array(elem, length) => FieldKind::Array(Box::new(scalar(*elem)?), length),
        FieldDesc::Sequence(elem, bound) => FieldKind::Sequence(Box::new(scalar(*elem)?), bound),
        other => scalar(other)?,
    })
}

/// Parse a message definition in IDL format.
pub fn get_types_from_idl(text: &str) -> Result<TypeMap, TypesysError> {
    parse_definition(grammar(), &mut IdlVisitor::new(), text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDL_LANG: &str = r#"
// assign different literals and expressions

#ifndef FOO
#define FOO

#include <global>
#include "local"

const bool g_bool = TRUE;
const int8 g_int1 = 7;
const int8 g_int2 = 07;
const int8 g_int3 = 0x7;
const float64 g_float1 = 1.1;
const float64 g_float2 = 1e10;
const char g_char = 'c';
const string g_string1 = "";
const string<128> g_string2 = "str" "ing";

module Foo {
    const int64 g_expr1 = ~1;
    const int64 g_expr2 = 2 * 4;
};

#endif
"#;

    const IDL: &str = r#"
// comment in file
module test_msgs {
  // comment in module
  typedef std_msgs::msg::Bool Bool;

  module msg {
    // comment in submodule
    typedef Bool Balias;
    typedef test_msgs::msg::Bar Bar;
    typedef double d4[4];

    module Foo_Constants {
        const int32 FOO = 32;
        const int64 BAR = 64;
    };

    @comment(type="text", text="ignore")
    struct Foo {
        std_msgs::msg::Header header;
        Balias bool;
        Bar sibling;
        double x;
        sequence<double> seq1;
        sequence<double, 4> seq2;
        d4 array;
    };
  };
};
"#;

    #[test]
    fn test_parse_idl_language_constructs() {
        let types = get_types_from_idl(IDL_LANG).expect("parse");
        assert!(types.is_empty());
    }

    #[test]
    fn test_parse_idl() {
        let types = get_types_from_idl(IDL).expect("parse");
        assert_eq!(types.len(), 1);
        let (name, schema) = &types[0];
        assert_eq!(name, "test_msgs/msg/Foo");

        assert_eq!(schema.constants.len(), 2);
        assert_eq!(schema.constants[0].name, "FOO");
        assert_eq!(schema.constants[0].value, ConstValue::Int(32));
        assert_eq!(schema.constants[1].name, "BAR");
        assert_eq!(schema.constants[1].value, ConstValue::Int(64));

        assert_eq!(
            schema.fields[0],
            (
                "header".to_string(),
                FieldKind::Name("std_msgs/msg/Header".into())
            )
        );
        assert_eq!(
            schema.fields[1],
            ("bool".to_string(), FieldKind::Name("std_msgs/msg/Bool".into()))
        );
        assert_eq!(
            schema.fields[2],
            (
                "sibling".to_string(),
                FieldKind::Name("test_msgs/msg/Bar".into())
            )
        );
        assert_eq!(
            schema.fields[3],
            ("x".to_string(), FieldKind::Base(Primitive::Float64))
        );
        assert_eq!(
            schema.fields[4],
            (
                "seq1".to_string(),
                FieldKind::Sequence(Box::new(FieldKind::Base(Primitive::Float64)), None)
            )
        );
        assert_eq!(
            schema.fields[5],
            (
                "seq2".to_string(),
                FieldKind::Sequence(Box::new(FieldKind::Base(Primitive::Float64)), None)
            )
        );
        assert_eq!(
            schema.fields[6],
            (
                "array".to_string(),
                FieldKind::Array(Box::new(FieldKind::Base(Primitive::Float64)), 4)
            )
        );
    }

    #[test]
    fn test_expressions_evaluate() {
        let text = r#"
module foo {
  module msg {
    struct Dummy { uint8 x; };
    module Dummy_Constants {
      const int64 NEG = ~1;
      const int64 PROD = 2 * 4;
      const int64 SHIFT = 1 << 4;
    };
  };
};
"#;
        let types = get_types_from_idl(text).expect("parse");
        let consts = &types[0].1.constants;
        assert_eq!(consts[0].value, ConstValue::Int(-2));
        assert_eq!(consts[1].value, ConstValue::Int(8));
        assert_eq!(consts[2].value, ConstValue::Int(16));
    }
}
