// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type registry.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::{catalog, Schema, TypeMap, TypesysError};

/// Mapping from canonical type names to schemas.
///
/// A dedicated `std_msgs/msg/Header` entry is always present and is exempt
/// from the re-registration conflict check. The generation counter ticks on
/// every mutation so codec caches can notice late registrations.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    defs: HashMap<String, Schema>,
    generation: u64,
}

impl TypeRegistry {
    /// Registry holding only the core types every bag needs: Time,
    /// Duration, and Header.
    pub fn new() -> Self {
        let mut registry = Self {
            defs: HashMap::new(),
            generation: 0,
        };
        registry
            .register(catalog::core_types())
            .expect("core catalog is consistent");
        registry
    }

    /// Registry pre-populated with the standard message catalog.
    pub fn standard() -> Self {
        let mut registry = Self {
            defs: HashMap::new(),
            generation: 0,
        };
        registry
            .register(catalog::standard_types())
            .expect("standard catalog is consistent");
        registry
    }

    /// Merge parsed types into the registry.
    ///
    /// Re-registering a known type is allowed only when the fields match the
    /// existing entry (case-folded, in order); `std_msgs/msg/Header` keeps
    /// its canonical definition unconditionally.
    pub fn register(&mut self, types: TypeMap) -> Result<(), TypesysError> {
        for (name, schema) in types {
            if name == "std_msgs/msg/Header" && self.defs.contains_key(&name) {
                continue;
            }
            if let Some(present) = self.defs.get(&name) {
                if !fields_match(present, &schema) {
                    return Err(TypesysError::Conflict(name));
                }
                continue;
            }
            self.defs.insert(name, schema);
            self.generation += 1;
        }
        Ok(())
    }

    /// Look up the schema for a canonical type name.
    pub fn lookup(&self, name: &str) -> Option<&Schema> {
        self.defs.get(name)
    }

    /// Mutation counter, ticks on every successful insertion.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn fields_match(present: &Schema, new: &Schema) -> bool {
    present.fields.len() == new.fields.len()
        && present
            .fields
            .iter()
            .zip(&new.fields)
            .all(|((aname, akind), (bname, bkind))| {
                aname.to_lowercase() == bname.to_lowercase() && akind == bkind
            })
}

/// Process-wide registry with the standard catalog, initialized lazily.
pub fn default_registry() -> &'static TypeRegistry {
    static REGISTRY: OnceLock<TypeRegistry> = OnceLock::new();
    REGISTRY.get_or_init(TypeRegistry::standard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typesys::{FieldKind, Primitive};

    fn bool_field(name: &str) -> Schema {
        Schema {
            constants: Vec::new(),
            fields: vec![(name.to_string(), FieldKind::Base(Primitive::Bool))],
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = TypeRegistry::new();
        assert!(registry.lookup("foo_msgs/msg/Foo").is_none());

        registry
            .register(vec![("foo_msgs/msg/Foo".into(), bool_field("b"))])
            .expect("register");
        assert!(registry.lookup("foo_msgs/msg/Foo").is_some());

        // Same definition may be registered again.
        registry
            .register(vec![("foo_msgs/msg/Foo".into(), bool_field("B"))])
            .expect("case-folded match");

        let err = registry
            .register(vec![("foo_msgs/msg/Foo".into(), bool_field("x"))])
            .unwrap_err();
        assert!(matches!(err, TypesysError::Conflict(_)));
    }

    #[test]
    fn test_header_is_exempt() {
        let mut registry = TypeRegistry::new();
        registry
            .register(vec![("std_msgs/msg/Header".into(), Schema::default())])
            .expect("header re-registration is ignored");
        assert_eq!(
            registry.lookup("std_msgs/msg/Header").map(|x| x.fields.len()),
            Some(2)
        );
    }

    #[test]
    fn test_standard_catalog() {
        let registry = TypeRegistry::standard();
        for name in [
            "std_msgs/msg/Header",
            "geometry_msgs/msg/Polygon",
            "sensor_msgs/msg/MagneticField",
            "trajectory_msgs/msg/JointTrajectory",
        ] {
            assert!(registry.lookup(name).is_some(), "{name} missing");
        }
    }

    #[test]
    fn test_generation_ticks_on_insert() {
        let mut registry = TypeRegistry::new();
        let before = registry.generation();
        registry
            .register(vec![("foo_msgs/msg/Foo".into(), bool_field("b"))])
            .expect("register");
        assert!(registry.generation() > before);
    }
}
