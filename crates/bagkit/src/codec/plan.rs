// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Resolved codec plans.
//!
//! A [`Plan`] is a schema with every type reference resolved, ready for the
//! size/encode/decode/convert walks. Plans are built once per registry and
//! type name and shared behind `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use crate::typesys::{FieldKind, Primitive, TypeRegistry};

use super::CodecError;

/// Element of an array or sequence.
#[derive(Debug)]
pub(crate) enum ElemPlan {
    Base(Primitive),
    Message(Arc<Plan>),
}

/// Resolved field descriptor.
#[derive(Debug)]
pub(crate) enum FieldPlan {
    Base(Primitive),
    Message(Arc<Plan>),
    Array(ElemPlan, u32),
    Sequence(ElemPlan),
}

/// Resolved schema of one message type.
#[derive(Debug)]
pub(crate) struct Plan {
    pub(crate) name: String,
    pub(crate) fields: Vec<(String, FieldPlan)>,
    /// Serialized size when static and independent of the start position.
    pub(crate) fixed_size: Option<usize>,
}

impl Plan {
    /// Alignment a message inherits on entry: that of its first field.
    ///
    /// Padding inside and after the message falls out of the field walks,
    /// which pad dynamically before every field.
    pub(crate) fn align_first(&self) -> usize {
        self.fields.first().map_or(1, |(_, f)| field_align(f))
    }
}

pub(crate) fn align_up(pos: usize, align: usize) -> usize {
    (pos + align - 1) & !(align - 1)
}

fn prim_align(primitive: Primitive) -> usize {
    // Strings align on their u32 length prefix.
    primitive.size().unwrap_or(4)
}

fn elem_align(elem: &ElemPlan) -> usize {
    match elem {
        ElemPlan::Base(p) => prim_align(*p),
        ElemPlan::Message(plan) => plan.align_first(),
    }
}

/// Alignment required before a field.
pub(crate) fn field_align(field: &FieldPlan) -> usize {
    match field {
        FieldPlan::Base(p) => prim_align(*p),
        FieldPlan::Message(plan) => plan.align_first(),
        FieldPlan::Array(elem, _) => elem_align(elem),
        FieldPlan::Sequence(_) => 4,
    }
}

/// Alignment between consecutive elements of a message array.
pub(crate) fn elem_first_align(elem: &ElemPlan) -> usize {
    elem_align(elem)
}

/// Static size of the field walk, `None` when any part is dynamic.
///
/// The result is only usable from arbitrary call sites when the first field
/// dominates every internal alignment, which the caller checks via
/// `max_align`; otherwise internal padding would depend on the start
/// position.
fn static_walk(fields: &[(String, FieldPlan)]) -> (Option<usize>, usize) {
    let mut pos = 0usize;
    let mut max_align = 1usize;
    let mut is_static = true;

    for (_, field) in fields {
        let align = field_align(field);
        max_align = max_align.max(align);
        pos = align_up(pos, align);
        match field {
            FieldPlan::Base(p) => match p.size() {
                Some(size) => pos += size,
                None => is_static = false,
            },
            FieldPlan::Message(plan) => match plan.fixed_size {
                Some(size) => pos += size,
                None => is_static = false,
            },
            FieldPlan::Array(elem, length) => match elem {
                ElemPlan::Base(p) => match p.size() {
                    Some(size) => pos += size * *length as usize,
                    None => is_static = false,
                },
                ElemPlan::Message(plan) => match plan.fixed_size {
                    Some(size) => {
                        for _ in 0..*length {
                            pos = align_up(pos, plan.align_first());
                            pos += size;
                        }
                    }
                    None => is_static = false,
                },
            },
            FieldPlan::Sequence(_) => is_static = false,
        }
        if !is_static {
            return (None, max_align);
        }
    }
    (Some(pos), max_align)
}

/// Build the plan for `name`, resolving nested references recursively.
///
/// Circular type references are rejected; the dialects cannot express them,
/// so hitting one means a hand-registered schema is broken.
pub(crate) fn build_plan(
    registry: &TypeRegistry,
    name: &str,
    plans: &mut HashMap<String, Arc<Plan>>,
    stack: &mut Vec<String>,
) -> Result<Arc<Plan>, CodecError> {
    if let Some(plan) = plans.get(name) {
        return Ok(plan.clone());
    }
    if stack.iter().any(|x| x == name) {
        return Err(CodecError::Circular(name.to_string()));
    }

    let schema = registry
        .lookup(name)
        .ok_or_else(|| CodecError::UnknownType(name.to_string()))?
        .clone();

    stack.push(name.to_string());
    let mut fields = Vec::with_capacity(schema.fields.len());
    for (fname, kind) in &schema.fields {
        let fplan = match kind {
            FieldKind::Base(p) => FieldPlan::Base(*p),
            FieldKind::Name(sub) => {
                FieldPlan::Message(build_plan(registry, sub, plans, stack)?)
            }
            FieldKind::Array(elem, length) => {
                FieldPlan::Array(resolve_elem(registry, elem, plans, stack)?, *length)
            }
            FieldKind::Sequence(elem, _) => {
                FieldPlan::Sequence(resolve_elem(registry, elem, plans, stack)?)
            }
        };
        fields.push((fname.clone(), fplan));
    }
    stack.pop();

    let (size, max_align) = static_walk(&fields);
    let plan = Arc::new(Plan {
        name: name.to_string(),
        fixed_size: size.filter(|_| {
            fields.first().map_or(1, |(_, f)| field_align(f)) >= max_align
        }),
        fields,
    });
    plans.insert(name.to_string(), plan.clone());
    Ok(plan)
}

fn resolve_elem(
    registry: &TypeRegistry,
    elem: &FieldKind,
    plans: &mut HashMap<String, Arc<Plan>>,
    stack: &mut Vec<String>,
) -> Result<ElemPlan, CodecError> {
    match elem {
        FieldKind::Base(p) => Ok(ElemPlan::Base(*p)),
        FieldKind::Name(sub) => Ok(ElemPlan::Message(build_plan(registry, sub, plans, stack)?)),
        FieldKind::Array(..) | FieldKind::Sequence(..) => {
            Err(CodecError::UnknownType("nested container".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typesys::{Schema, TypeMap};

    fn build(registry: &TypeRegistry, name: &str) -> Result<Arc<Plan>, CodecError> {
        build_plan(registry, name, &mut HashMap::new(), &mut Vec::new())
    }

    #[test]
    fn test_static_sizes() {
        let registry = TypeRegistry::standard();

        let vector3 = build(&registry, "geometry_msgs/msg/Vector3").expect("plan");
        assert_eq!(vector3.fixed_size, Some(24));
        assert_eq!(vector3.align_first(), 8);

        let time = build(&registry, "builtin_interfaces/msg/Time").expect("plan");
        assert_eq!(time.fixed_size, Some(8));

        let header = build(&registry, "std_msgs/msg/Header").expect("plan");
        assert_eq!(header.fixed_size, None);
        assert_eq!(header.align_first(), 4);
    }

    #[test]
    fn test_unknown_type() {
        let registry = TypeRegistry::new();
        assert!(matches!(
            build(&registry, "foo_msgs/msg/Missing"),
            Err(CodecError::UnknownType(_))
        ));
    }

    #[test]
    fn test_circular_reference_rejected() {
        let mut registry = TypeRegistry::new();
        let types: TypeMap = vec![
            (
                "foo_msgs/msg/A".into(),
                Schema {
                    constants: vec![],
                    fields: vec![("b".into(), FieldKind::Name("foo_msgs/msg/B".into()))],
                },
            ),
            (
                "foo_msgs/msg/B".into(),
                Schema {
                    constants: vec![],
                    fields: vec![("a".into(), FieldKind::Name("foo_msgs/msg/A".into()))],
                },
            ),
        ];
        registry.register(types).expect("register");
        assert!(matches!(
            build(&registry, "foo_msgs/msg/A"),
            Err(CodecError::Circular(_))
        ));
    }
}
