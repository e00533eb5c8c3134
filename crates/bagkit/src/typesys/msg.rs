// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Legacy MSG dialect.
//!
//! Grammar, parse tree visitor, and conversion functions for message
//! definitions in MSG format, including the concatenated multi-definition
//! form found in legacy bag connection records. The inverse direction
//! renders a canonical type back into legacy definition text together with
//! its MD5 fingerprint.

use std::sync::OnceLock;

use md5::{Digest, Md5};

use super::peg::Grammar;
use super::{
    parse_definition, Ast, ConstValue, Constant, FieldDesc, FieldKind, Primitive, Schema, TypeMap,
    TypeRegistry, TypesysError, Visitor,
};

const GRAMMAR_MSG: &str = r#"
specification
  = msgdef (msgsep msgdef)*

msgdef
  = r'MSG:\s' scoped_name definition*

msgsep
  = r'================================================================================'

definition
  = comment
  / const_dcl
  / field_dcl

comment
  = r'#[^\n]*'

const_dcl
  = 'string' identifier '=' r'(?!={79}\n)[^\n]+'
  / type_spec identifier '=' float_literal
  / type_spec identifier '=' integer_literal
  / type_spec identifier '=' boolean_literal

field_dcl
  = type_spec identifier default_value?

type_spec
  = array_type_spec
  / bounded_array_type_spec
  / simple_type_spec

array_type_spec
  = simple_type_spec array_size

bounded_array_type_spec
  = simple_type_spec array_bounds

simple_type_spec
  = 'string' '<=' integer_literal
  / scoped_name

array_size
  = '[' integer_literal? ']'

array_bounds
  = '[<=' integer_literal ']'

scoped_name
  = identifier '/' scoped_name
  / identifier

identifier
  = r'[a-zA-Z_][a-zA-Z_0-9]*'

default_value
  = literal

literal
  = float_literal
  / integer_literal
  / boolean_literal
  / string_literal
  / array_literal

boolean_literal
  = r'[tT][rR][uU][eE]'
  / r'[fF][aA][lL][sS][eE]'
  / '0'
  / '1'

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

string_literal
  = '"' r'(\\"|[^"])*' '"'
  / '\'' r'(\\\'|[^'])*' '\''

array_literal
  = '[' array_elements? ']'

array_elements
  = literal ',' array_elements
  / literal
"#;

fn grammar() -> &'static Grammar {
    static GRAMMAR: OnceLock<Grammar> = OnceLock::new();
    GRAMMAR.get_or_init(|| Grammar::build(GRAMMAR_MSG).expect("msg grammar is valid"))
}

/// Normalize a message typename to its `pkg/msg/Name` form.
pub fn normalize_msgtype(name: &str) -> String {
    let segments: Vec<&str> = name.split('/').collect();
    if segments.len() >= 2 && segments[segments.len() - 2] == "msg" {
        return name.to_string();
    }
    let (last, parents) = segments.split_last().expect("split yields an element");
    let mut out = parents.join("/");
    if !out.is_empty() {
        out.push('/');
    }
    out.push_str("msg/");
    out.push_str(last);
    out
}

/// Undo typename normalization, yielding the legacy rendering.
pub fn denormalize_msgtype(name: &str) -> String {
    let segments: Vec<&str> = name.split('/').collect();
    if segments.len() >= 2 && segments[segments.len() - 2] == "msg" {
        let mut out: Vec<&str> = segments[..segments.len() - 2].to_vec();
        out.push(segments[segments.len() - 1]);
        return out.join("/");
    }
    name.to_string()
}

/// Aliases applied to simple type specifiers.
fn alias(name: &str) -> &str {
    match name {
        "time" => "builtin_interfaces/msg/Time",
        "duration" => "builtin_interfaces/msg/Duration",
        "byte" | "char" => "uint8",
        other => other,
    }
}

/// Resolve a field type against the owning package and sibling definitions.
fn normalize_fieldtype(
    typename: &str,
    desc: FieldDesc,
    names: &[String],
) -> Result<FieldKind, TypesysError> {
    let resolve = |name: &str| -> FieldKind {
        if let Some(primitive) = Primitive::parse(name) {
            return FieldKind::Base(primitive);
        }
        let full = if let Some(full) = names
            .iter()
            .find(|x| x.rsplit('/').next() == Some(name))
        {
            full.clone()
        } else if name == "Header" {
            "std_msgs/msg/Header".to_string()
        } else if !name.contains('/') {
            let parent = typename.rsplit_once('/').map_or("", |x| x.0);
            format!("{parent}/{name}")
        } else if !name.contains("/msg/") {
            normalize_msgtype(name)
        } else {
            name.to_string()
        };
        FieldKind::Name(full)
    };

    Ok(match desc {
        FieldDesc::Name(name) | FieldDesc::Base(name) => resolve(&name),
        FieldDesc::Array(elem, length) => {
            let (FieldDesc::Name(name) | FieldDesc::Base(name)) = *elem else {
                return Err(TypesysError::Malformed {
                    rule: "array_type_spec",
                    found: "nested container element",
                });
            };
            FieldKind::Array(Box::new(resolve(&name)), length)
        }
        FieldDesc::Sequence(elem, bound) => {
            let (FieldDesc::Name(name) | FieldDesc::Base(name)) = *elem else {
                return Err(TypesysError::Malformed {
                    rule: "array_type_spec",
                    found: "nested container element",
                });
            };
            FieldKind::Sequence(Box::new(resolve(&name)), bound)
        }
    })
}

fn malformed(rule: &'static str) -> TypesysError {
    TypesysError::Malformed {
        rule,
        found: "unexpected node shape",
    }
}

pub(crate) fn parse_radix_int(text: &str, radix: u32, skip: usize) -> Result<i64, TypesysError> {
    let (sign, digits) = match text.as_bytes().first() {
        Some(b'-') => (-1, &text[1..]),
        Some(b'+') => (1, &text[1..]),
        _ => (1, text),
    };
    i64::from_str_radix(&digits[skip..], radix)
        .map(|x| sign * x)
        .map_err(|_| malformed("integer_literal"))
}

/// Parse tree visitor for the MSG dialect.
struct MsgVisitor;

impl Visitor for MsgVisitor {
    fn visit(&mut self, rule: &str, data: Ast) -> Result<Ast, TypesysError> {
        match rule {
            "comment" | "msgsep" => Ok(Ast::Nothing),

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
                    _ => Err(malformed("scoped_name")),
                },
                _ => Err(malformed("scoped_name")),
            },

            "simple_type_spec" => match data {
                // Bounded string, the bound is dropped.
                Ast::Seq(items) if items.len() == 3 => Ok(Ast::Name("string".to_string())),
                Ast::Name(name) => Ok(Ast::Name(alias(&name).to_string())),
                _ => Err(malformed("simple_type_spec")),
            },

            "array_type_spec" => {
                let Ast::Seq(items) = data else {
                    return Err(malformed("array_type_spec"));
                };
                let [Ast::Name(name), Ast::Seq(size)] = items.as_slice() else {
                    return Err(malformed("array_type_spec"));
                };
                let elem = Box::new(FieldDesc::Name(name.clone()));
                // array_size is '[' integer_literal? ']'
                match size.get(1) {
                    Some(Ast::Seq(opt)) => match opt.as_slice() {
                        [Ast::Int(length)] => {
                            Ok(Ast::Desc(FieldDesc::Array(elem, *length as u32)))
                        }
                        [] => Ok(Ast::Desc(FieldDesc::Sequence(elem, None))),
                        _ => Err(malformed("array_size")),
                    },
                    _ => Err(malformed("array_size")),
                }
            }

            "bounded_array_type_spec" => {
                let Ast::Seq(items) = data else {
                    return Err(malformed("bounded_array_type_spec"));
                };
                let [Ast::Name(name), _bounds] = items.as_slice() else {
                    return Err(malformed("bounded_array_type_spec"));
                };
                Ok(Ast::Desc(FieldDesc::Sequence(
                    Box::new(FieldDesc::Name(name.clone())),
                    None,
                )))
            }

            "const_dcl" => {
                let Ast::Seq(mut items) = data else {
                    return Err(malformed("const_dcl"));
                };
                if items.len() != 4 {
                    return Err(malformed("const_dcl"));
                }
                let value = items.pop().expect("length checked");
                let _eq = items.pop();
                let name = match items.pop() {
                    Some(Ast::Name(name)) => name,
                    _ => return Err(malformed("const_dcl")),
                };
                let primitive = match items.pop() {
                    Some(Ast::Lit(lit)) => lit,
                    Some(Ast::Name(name)) => name,
                    _ => return Err(malformed("const_dcl")),
                };
                let value = match value {
                    Ast::Text(raw) => ConstValue::Str(raw.trim().to_string()),
                    Ast::Bool(v) => ConstValue::Bool(v),
                    Ast::Int(v) => ConstValue::Int(v),
                    Ast::Float(v) => ConstValue::Float(v),
                    _ => return Err(malformed("const_dcl")),
                };
                Ok(Ast::Const {
                    primitive,
                    name,
                    value,
                })
            }

            "boolean_literal" => match data {
                Ast::Text(value) => Ok(Ast::Bool(matches!(
                    value.to_lowercase().as_str(),
                    "true" | "1"
                ))),
                Ast::Lit(value) => Ok(Ast::Bool(value == "1")),
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

            "string_literal" => match data {
                Ast::Seq(items) => match items.as_slice() {
                    [Ast::Lit(_), Ast::Text(inner), Ast::Lit(_)] => {
                        Ok(Ast::Str(inner.clone()))
                    }
                    _ => Err(malformed("string_literal")),
                },
                _ => Err(malformed("string_literal")),
            },

            "msgdef" => {
                let Ast::Seq(items) = data else {
                    return Err(malformed("msgdef"));
                };
                let [_marker, Ast::Name(name), Ast::Seq(defs)] = items.as_slice() else {
                    return Err(malformed("msgdef"));
                };
                Ok(Ast::Msgdef {
                    name: normalize_msgtype(name),
                    items: defs
                        .iter()
                        .filter(|x| !matches!(x, Ast::Nothing))
                        .cloned()
                        .collect(),
                })
            }

            "specification" => {
                let Ast::Seq(items) = data else {
                    return Err(malformed("specification"));
                };
                let mut msgs: Vec<(String, Vec<Ast>)> = Vec::new();
                let mut push = |item: &Ast| -> Result<(), TypesysError> {
                    match item {
                        Ast::Msgdef { name, items } => {
                            msgs.push((name.clone(), items.clone()));
                            Ok(())
                        }
                        _ => Err(malformed("specification")),
                    }
                };
                match items.as_slice() {
                    [first, Ast::Seq(rest)] => {
                        push(first)?;
                        for pair in rest {
                            let Ast::Seq(inner) = pair else {
                                return Err(malformed("specification"));
                            };
                            push(inner.get(1).ok_or_else(|| malformed("specification"))?)?;
                        }
                    }
                    _ => return Err(malformed("specification")),
                }

                let names: Vec<String> = msgs.iter().map(|x| x.0.clone()).collect();
                let mut types = TypeMap::new();
                for (name, items) in msgs {
                    let mut schema = Schema::default();
                    for item in items {
                        match item {
                            Ast::Const {
                                primitive,
                                name: cname,
                                value,
                            } => {
                                let primitive = Primitive::parse(&primitive)
                                    .ok_or(TypesysError::UnknownType(primitive))?;
                                schema.constants.push(Constant {
                                    name: cname,
                                    primitive,
                                    value,
                                });
                            }
                            Ast::Seq(field) => {
                                let (fname, desc) = match field.as_slice() {
                                    [Ast::Name(spec), Ast::Name(fname), _default] => {
                                        (fname.clone(), FieldDesc::Name(spec.clone()))
                                    }
                                    [Ast::Desc(desc), Ast::Name(fname), _default] => {
                                        (fname.clone(), desc.clone())
                                    }
                                    _ => return Err(malformed("field_dcl")),
                                };
                                schema
                                    .fields
                                    .push((fname, normalize_fieldtype(&name, desc, &names)?));
                            }
                            _ => return Err(malformed("specification")),
                        }
                    }
                    types.push((name, schema));
                }
                Ok(Ast::Types(types))
            }

            _ => Ok(data),
        }
    }
}

/// Parse a message definition in MSG format.
///
/// The definition may contain multiple concatenated messages, each headed by
/// a `MSG: <name>` line; the outer definition is identified by `name`.
pub fn get_types_from_msg(text: &str, name: &str) -> Result<TypeMap, TypesysError> {
    parse_definition(grammar(), &mut MsgVisitor, &format!("MSG: {name}\n{text}"))
}

fn md5_hex(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Legacy alias used when rendering definitions.
fn legacy_alias(name: &str) -> Option<&'static str> {
    match name {
        "builtin_interfaces/msg/Time" => Some("time"),
        "builtin_interfaces/msg/Duration" => Some("duration"),
        _ => None,
    }
}

/// Ensure `subname` has a rendered entry in `subdefs` and return its hash.
fn subdef_hash(
    subname: &str,
    subdefs: &mut Vec<(String, (String, String))>,
    registry: &TypeRegistry,
) -> Result<String, TypesysError> {
    if !subdefs.iter().any(|x| x.0 == subname) {
        subdefs.push((subname.to_string(), (String::new(), String::new())));
        let value = gendefhash(subname, subdefs, registry)?;
        let entry = subdefs
            .iter_mut()
            .find(|x| x.0 == subname)
            .expect("placeholder inserted above");
        entry.1 = value;
    }
    Ok(subdefs
        .iter()
        .find(|x| x.0 == subname)
        .expect("entry present")
        .1
         .1
        .clone())
}

/// Generate definition text and hash for one type, filling `subdefs` with
/// transitively referenced child definitions in first-reference order.
fn gendefhash(
    typename: &str,
    subdefs: &mut Vec<(String, (String, String))>,
    registry: &TypeRegistry,
) -> Result<(String, String), TypesysError> {
    let schema = registry
        .lookup(typename)
        .ok_or_else(|| TypesysError::UnknownType(typename.to_string()))?
        .clone();

    let mut deftext: Vec<String> = Vec::new();
    let mut hashtext: Vec<String> = Vec::new();

    for constant in &schema.constants {
        let line = format!(
            "{} {}={}",
            constant.primitive.name(),
            constant.name,
            constant.value
        );
        deftext.push(line.clone());
        hashtext.push(line);
    }

    for (name, kind) in &schema.fields {
        let (elem, count) = match kind {
            FieldKind::Base(_) | FieldKind::Name(_) => (kind, None),
            FieldKind::Array(elem, length) => (elem.as_ref(), Some(length.to_string())),
            FieldKind::Sequence(elem, _) => (elem.as_ref(), Some(String::new())),
        };
        let brackets = count.map_or(String::new(), |c| format!("[{c}]"));
        match elem {
            FieldKind::Base(primitive) => {
                let line = format!("{}{brackets} {name}", primitive.name());
                deftext.push(line.clone());
                hashtext.push(line);
            }
            FieldKind::Name(subname) => {
                if let Some(mapped) = legacy_alias(subname) {
                    let line = format!("{mapped}{brackets} {name}");
                    deftext.push(line.clone());
                    hashtext.push(line);
                } else {
                    let hash = subdef_hash(subname, subdefs, registry)?;
                    deftext.push(format!(
                        "{}{brackets} {name}",
                        denormalize_msgtype(subname)
                    ));
                    hashtext.push(format!("{hash} {name}"));
                }
            }
            FieldKind::Array(..) | FieldKind::Sequence(..) => {
                return Err(TypesysError::Malformed {
                    rule: "field_dcl",
                    found: "nested container element",
                });
            }
        }
    }

    if typename == "std_msgs/msg/Header" {
        deftext.insert(0, "uint32 seq".to_string());
        hashtext.insert(0, "uint32 seq".to_string());
    }

    deftext.push(String::new());
    Ok((deftext.join("\n"), md5_hex(hashtext.join("\n").as_bytes())))
}

/// Render the legacy message definition and hash for a canonical type.
///
/// Transitive dependencies are appended in first-reference order, separated
/// by the fixed separator line.
pub fn generate_msgdef(
    typename: &str,
    registry: &TypeRegistry,
) -> Result<(String, String), TypesysError> {
    let mut subdefs: Vec<(String, (String, String))> = Vec::new();
    let (msgdef, md5sum) = gendefhash(typename, &mut subdefs, registry)?;

    let mut out = msgdef;
    for (name, (text, _)) in &subdefs {
        out.push_str(&format!(
            "{}\nMSG: {}\n{}",
            "=".repeat(80),
            denormalize_msgtype(name),
            text
        ));
    }

    Ok((out, md5sum))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typesys::default_registry;

    const MULTI_MSG: &str = "\
std_msgs/Header header
byte b
char c
Other[] o

================================================================================
MSG: std_msgs/Header
time time

================================================================================
MSG: test_msgs/Other
uint64[3] Header
uint32 static = 42
";

    #[test]
    fn test_normalize_msgtype() {
        assert_eq!(normalize_msgtype("std_msgs/Header"), "std_msgs/msg/Header");
        assert_eq!(
            normalize_msgtype("std_msgs/msg/Header"),
            "std_msgs/msg/Header"
        );
        assert_eq!(denormalize_msgtype("std_msgs/msg/Header"), "std_msgs/Header");
    }

    #[test]
    fn test_parse_empty_msg() {
        let types = get_types_from_msg("", "std_msgs/msg/Empty").expect("parse");
        assert_eq!(types, vec![("std_msgs/msg/Empty".to_string(), Schema::default())]);
    }

    #[test]
    fn test_parse_msg() {
        let text = "\
# comment

bool b=true
int32 global=42
float32 f=1.33
string str= foo bar\t

std_msgs/Header header
std_msgs/msg/Bool bool
test_msgs/Bar sibling
float64 base
float64[] seq1
float64[4] array
";
        assert!(get_types_from_msg("invalid", "test_msgs/msg/Foo").is_err());

        let types = get_types_from_msg(text, "test_msgs/msg/Foo").expect("parse");
        assert_eq!(types.len(), 1);
        let (name, schema) = &types[0];
        assert_eq!(name, "test_msgs/msg/Foo");
        assert_eq!(schema.constants.len(), 4);
        assert_eq!(schema.constants[0].value, ConstValue::Bool(true));
        assert_eq!(schema.constants[1].value, ConstValue::Int(42));
        assert_eq!(schema.constants[3].value, ConstValue::Str("foo bar".into()));
        assert_eq!(
            schema.fields[0],
            (
                "header".to_string(),
                FieldKind::Name("std_msgs/msg/Header".into())
            )
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
            ("base".to_string(), FieldKind::Base(Primitive::Float64))
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
                "array".to_string(),
                FieldKind::Array(Box::new(FieldKind::Base(Primitive::Float64)), 4)
            )
        );
    }

    #[test]
    fn test_parse_multi_msg() {
        let types = get_types_from_msg(MULTI_MSG, "test_msgs/msg/Foo").expect("parse");
        assert_eq!(types.len(), 3);
        let foo = &types[0].1;
        assert_eq!(foo.fields[0].1, FieldKind::Name("std_msgs/msg/Header".into()));
        assert_eq!(foo.fields[1].1, FieldKind::Base(Primitive::UInt8));
        assert_eq!(foo.fields[2].1, FieldKind::Base(Primitive::UInt8));
        assert_eq!(
            foo.fields[3].1,
            FieldKind::Sequence(Box::new(FieldKind::Name("test_msgs/msg/Other".into())), None)
        );
        assert_eq!(types[1].0, "std_msgs/msg/Header");
        assert_eq!(
            types[1].1.fields[0].1,
            FieldKind::Name("builtin_interfaces/msg/Time".into())
        );
        let other = &types[2].1;
        assert_eq!(other.constants[0].value, ConstValue::Int(42));
    }

    #[test]
    fn test_const_string_is_not_confused_with_separator() {
        let text = "\
std_msgs/Header header
string s

================================================================================
MSG: std_msgs/Header
time time
";
        let types = get_types_from_msg(text, "test_msgs/msg/Foo").expect("parse");
        assert_eq!(types.len(), 2);
        assert!(types[0].1.constants.is_empty());
        assert_eq!(types[0].1.fields[1].1, FieldKind::Base(Primitive::String));
    }

    #[test]
    fn test_parse_relative_siblings() {
        let text = "Header header\nOther other\n";
        let types = get_types_from_msg(text, "rel_msgs/msg/Foo").expect("parse");
        let fields = &types[0].1.fields;
        assert_eq!(fields[0].1, FieldKind::Name("std_msgs/msg/Header".into()));
        assert_eq!(fields[1].1, FieldKind::Name("rel_msgs/msg/Other".into()));
    }

    #[test]
    fn test_parse_defaults() {
        let text = "\
bool b false
uint8 o 0377
uint8 h 0xff
float32 y -314.15e-2
string name2 'Ringo'
int32[] samples [-200, -100, 0, 100, 200]
";
        let types = get_types_from_msg(text, "test_msgs/msg/Foo").expect("parse");
        let fields = &types[0].1.fields;
        assert_eq!(fields.len(), 6);
        assert_eq!(fields[1].1, FieldKind::Base(Primitive::UInt8));
        assert_eq!(fields[3].1, FieldKind::Base(Primitive::Float32));
    }

    #[test]
    fn test_generate_msgdef() {
        let registry = default_registry();

        let (text, md5sum) = generate_msgdef("std_msgs/msg/Header", registry).expect("render");
        assert_eq!(text, "uint32 seq\ntime stamp\nstring frame_id\n");
        assert_eq!(md5sum, "2176decaecbce78abc3b96ef049fabed");

        let (text, _) = generate_msgdef("geometry_msgs/msg/PointStamped", registry).expect("render");
        let sections: Vec<&str> = text.split(&format!("{}\n", "=".repeat(80))).collect();
        assert_eq!(
            sections,
            vec![
                "std_msgs/Header header\ngeometry_msgs/Point point\n",
                "MSG: std_msgs/Header\nuint32 seq\ntime stamp\nstring frame_id\n",
                "MSG: geometry_msgs/Point\nfloat64 x\nfloat64 y\nfloat64 z\n",
            ]
        );

        let (text, _) = generate_msgdef("shape_msgs/msg/Plane", registry).expect("render");
        assert_eq!(text, "float64[4] coef\n");

        assert!(generate_msgdef("foo_msgs/msg/Badname", registry).is_err());
    }

    #[test]
    fn test_generate_msgdef_with_time_array() {
        let mut registry = TypeRegistry::standard();
        let types =
            get_types_from_msg("time[3] times\nuint8 foo=42", "foo_msgs/Timelist").expect("parse");
        registry.register(types).expect("register");
        let (text, _) = generate_msgdef("foo_msgs/msg/Timelist", &registry).expect("render");
        assert_eq!(text, "uint8 foo=42\ntime[3] times\n");
    }
}
