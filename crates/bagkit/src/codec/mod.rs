// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec core.
//!
//! Given a type registry, materializes per-type routines to compute the
//! serialized size, encode, decode, and byte-level convert between the
//! aligned wire (CDR with a 4-byte endianness prefix) and the packed legacy
//! wire. Routines are cached per registry and type name.

mod cdr;
mod plan;
mod ros1;
mod value;

pub use value::{MessageValue, Value};

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use byteorder::{BigEndian, LittleEndian};
use thiserror::Error;

use crate::typesys::TypeRegistry;

use plan::{build_plan, Plan};
use ros1::Sink;

/// Errors raised while generating or running codec routines.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A referenced type cannot be resolved in the registry.
    #[error("type {0:?} is unknown")]
    UnknownType(String),
    /// A type transitively references itself.
    #[error("type {0:?} has a circular reference")]
    Circular(String),
    /// The buffer ends inside a field.
    #[error("buffer ends inside a field: need {need} bytes, have {have}")]
    Truncated { need: usize, have: usize },
    /// A length prefix points beyond the buffer.
    #[error("length prefix points beyond the buffer")]
    MalformedLength,
    /// A fixed-array field has the wrong number of elements.
    #[error("fixed array field {field:?} has {have} elements, declared {want}")]
    LengthMismatch {
        field: String,
        want: usize,
        have: usize,
    },
    /// The value does not match the schema.
    #[error("field {field:?} expected {expected}")]
    TypeMismatch { field: String, expected: &'static str },
    /// More unread bytes left than alignment slack allows.
    #[error("{0} trailing bytes after message")]
    Trailing(usize),
    /// An aligned input declared big-endian where little-endian is required.
    #[error("message byte order is not little endian")]
    NotLittleEndian,
    /// String bytes are not valid UTF-8.
    #[error("invalid string data: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Cache of per-type codec plans, keyed by registry generation + type name.
///
/// Pair one cache with one registry. When the registry gains types after the
/// first use, the cache is rebuilt and a warning is logged, so late
/// registrations in concurrent setups become visible in tests.
pub struct CodecCache {
    inner: Mutex<CacheInner>,
}

struct CacheInner {
    generation: Option<u64>,
    plans: HashMap<String, Arc<Plan>>,
}

impl CodecCache {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                generation: None,
                plans: HashMap::new(),
            }),
        }
    }

    fn plan(&self, registry: &TypeRegistry, typename: &str) -> Result<Arc<Plan>, CodecError> {
        let mut inner = self.inner.lock().expect("cache lock");
        if inner.generation != Some(registry.generation()) {
            if inner.generation.is_some() && !inner.plans.is_empty() {
                log::warn!("type registry changed after first codec use, rebuilding plans");
            }
            inner.plans.clear();
            inner.generation = Some(registry.generation());
        }
        if let Some(plan) = inner.plans.get(typename) {
            return Ok(plan.clone());
        }
        build_plan(registry, typename, &mut inner.plans, &mut Vec::new())
    }
}

impl Default for CodecCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialized size of a message on the aligned wire, including the 4-byte
/// prefix.
pub fn serialize_cdr_size(
    message: &MessageValue,
    typename: &str,
    registry: &TypeRegistry,
    cache: &CodecCache,
) -> Result<usize, CodecError> {
    let plan = cache.plan(registry, typename)?;
    Ok(4 + cdr::getsize(&plan, message, 0)?)
}

/// Serialize a message to the aligned wire, including the 4-byte prefix.
pub fn serialize_cdr(
    message: &MessageValue,
    typename: &str,
    little_endian: bool,
    registry: &TypeRegistry,
    cache: &CodecCache,
) -> Result<Vec<u8>, CodecError> {
    let plan = cache.plan(registry, typename)?;
    let size = 4 + cdr::getsize(&plan, message, 0)?;
    // The payload is encoded into its own buffer, alignment is relative to
    // the payload start, not the prefix.
    let mut payload = Vec::with_capacity(size - 4);
    if little_endian {
        cdr::serialize::<LittleEndian>(&plan, message, &mut payload)?;
    } else {
        cdr::serialize::<BigEndian>(&plan, message, &mut payload)?;
    }
    let mut out = Vec::with_capacity(size);
    out.extend_from_slice(&[0, u8::from(little_endian), 0, 0]);
    out.extend_from_slice(&payload);
    debug_assert_eq!(out.len(), size);
    Ok(out)
}

/// Deserialize an aligned wire message, dispatching on its endianness flag.
pub fn deserialize_cdr(
    raw: &[u8],
    typename: &str,
    registry: &TypeRegistry,
    cache: &CodecCache,
) -> Result<MessageValue, CodecError> {
    let plan = cache.plan(registry, typename)?;
    if raw.len() < 4 {
        return Err(CodecError::Truncated {
            need: 4,
            have: raw.len(),
        });
    }
    let little_endian = raw[1] != 0;
    let payload = &raw[4..];
    let mut pos = 0;
    let message = if little_endian {
        cdr::deserialize::<LittleEndian>(&plan, payload, &mut pos)?
    } else {
        cdr::deserialize::<BigEndian>(&plan, payload, &mut pos)?
    };
    // Up to three bytes of final alignment slack are tolerated.
    if pos + 3 < payload.len() {
        return Err(CodecError::Trailing(payload.len() - pos));
    }
    Ok(message)
}

/// Convert a packed wire message directly to the aligned wire.
///
/// Conversion happens on the byte level without materializing a record.
pub fn ros1_to_cdr(
    raw: &[u8],
    typename: &str,
    registry: &TypeRegistry,
    cache: &CodecCache,
) -> Result<Vec<u8>, CodecError> {
    let plan = cache.plan(registry, typename)?;
    let mut payload = Vec::with_capacity(raw.len() + raw.len() / 2);
    let mut ipos = 0;
    ros1::packed_to_aligned(&plan, raw, &mut ipos, &mut Sink::Buffer(&mut payload))?;
    if ipos != raw.len() {
        return Err(CodecError::Trailing(raw.len() - ipos));
    }
    let mut out = Vec::with_capacity(4 + payload.len());
    out.extend_from_slice(&[0, 1, 0, 0]);
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Required output length of [`ros1_to_cdr`] without writing any bytes.
pub fn ros1_to_cdr_size(
    raw: &[u8],
    typename: &str,
    registry: &TypeRegistry,
    cache: &CodecCache,
) -> Result<usize, CodecError> {
    let plan = cache.plan(registry, typename)?;
    let mut ipos = 0;
    let mut sink = Sink::Measure(0);
    ros1::packed_to_aligned(&plan, raw, &mut ipos, &mut sink)?;
    Ok(4 + sink.pos())
}

/// Convert an aligned wire message directly to the packed wire.
pub fn cdr_to_ros1(
    raw: &[u8],
    typename: &str,
    registry: &TypeRegistry,
    cache: &CodecCache,
) -> Result<Vec<u8>, CodecError> {
    let plan = cache.plan(registry, typename)?;
    let payload = check_aligned_input(raw)?;
    let mut out = Vec::with_capacity(payload.len());
    let mut ipos = 0;
    ros1::aligned_to_packed(&plan, payload, &mut ipos, &mut Sink::Buffer(&mut out))?;
    if ipos + 3 < payload.len() {
        return Err(CodecError::Trailing(payload.len() - ipos));
    }
    Ok(out)
}

/// Required output length of [`cdr_to_ros1`] without writing any bytes.
pub fn cdr_to_ros1_size(
    raw: &[u8],
    typename: &str,
    registry: &TypeRegistry,
    cache: &CodecCache,
) -> Result<usize, CodecError> {
    let plan = cache.plan(registry, typename)?;
    let payload = check_aligned_input(raw)?;
    let mut ipos = 0;
    let mut sink = Sink::Measure(0);
    ros1::aligned_to_packed(&plan, payload, &mut ipos, &mut sink)?;
    Ok(sink.pos())
}

fn check_aligned_input(raw: &[u8]) -> Result<&[u8], CodecError> {
    if raw.len() < 4 {
        return Err(CodecError::Truncated {
            need: 4,
            have: raw.len(),
        });
    }
    if raw[1] != 1 {
        return Err(CodecError::NotLittleEndian);
    }
    Ok(&raw[4..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typesys::default_registry;

    fn msg_poly() -> Vec<u8> {
        let mut raw = Vec::new();
        raw.extend_from_slice(b"\x00\x01\x00\x00"); // prefix, little endian
        raw.extend_from_slice(b"\x02\x00\x00\x00"); // number of points = 2
        raw.extend_from_slice(b"\x00\x00\x80\x3f"); // x = 1
        raw.extend_from_slice(b"\x00\x00\x00\x40"); // y = 2
        raw.extend_from_slice(b"\x00\x00\x40\x40"); // z = 3
        raw.extend_from_slice(b"\x00\x00\xa0\x3f"); // x = 1.25
        raw.extend_from_slice(b"\x00\x00\x10\x40"); // y = 2.25
        raw.extend_from_slice(b"\x00\x00\x50\x40"); // z = 3.25
        raw
    }

    fn msg_magn() -> Vec<u8> {
        let mut raw = Vec::new();
        raw.extend_from_slice(b"\x00\x01\x00\x00"); // prefix, little endian
        raw.extend_from_slice(b"\xc4\x02\x00\x00\x00\x01\x00\x00"); // stamp 708s 256ns
        raw.extend_from_slice(b"\x06\x00\x00\x00foo42\x00"); // frame_id 'foo42'
        raw.extend_from_slice(b"\x00\x00\x00\x00\x00\x00"); // padding
        for _ in 0..3 {
            raw.extend_from_slice(b"\x00\x00\x00\x00\x00\x00\x60\x40"); // 128.0
        }
        for idx in 0..9 {
            if idx % 4 == 0 {
                raw.extend_from_slice(b"\x00\x00\x00\x00\x00\x00\xf0\x3f"); // 1.0
            } else {
                raw.extend_from_slice(b"\x00\x00\x00\x00\x00\x00\x00\x00");
            }
        }
        raw
    }

    fn msg_magn_big() -> Vec<u8> {
        let mut raw = Vec::new();
        raw.extend_from_slice(b"\x00\x00\x00\x00"); // prefix, big endian
        raw.extend_from_slice(b"\x00\x00\x02\xc4\x00\x00\x01\x00"); // stamp 708s 256ns
        raw.extend_from_slice(b"\x00\x00\x00\x06foo42\x00"); // frame_id 'foo42'
        raw.extend_from_slice(b"\x00\x00\x00\x00\x00\x00"); // padding
        for _ in 0..3 {
            raw.extend_from_slice(b"\x40\x60\x00\x00\x00\x00\x00\x00"); // 128.0
        }
        for idx in 0..9 {
            if idx % 4 == 0 {
                raw.extend_from_slice(b"\x3f\xf0\x00\x00\x00\x00\x00\x00"); // 1.0
            } else {
                raw.extend_from_slice(b"\x00\x00\x00\x00\x00\x00\x00\x00");
            }
        }
        raw.extend_from_slice(b"\x00\x00\x00"); // garbage
        raw
    }

    fn msg_joint() -> Vec<u8> {
        let mut raw = Vec::new();
        raw.extend_from_slice(b"\x00\x01\x00\x00"); // prefix, little endian
        raw.extend_from_slice(b"\xc4\x02\x00\x00\x00\x01\x00\x00"); // stamp 708s 256ns
        raw.extend_from_slice(b"\x04\x00\x00\x00bar\x00"); // frame_id 'bar'
        raw.extend_from_slice(b"\x02\x00\x00\x00"); // number of strings
        raw.extend_from_slice(b"\x02\x00\x00\x00a\x00"); // string 'a'
        raw.extend_from_slice(b"\x00\x00"); // padding
        raw.extend_from_slice(b"\x02\x00\x00\x00b\x00"); // string 'b'
        raw.extend_from_slice(b"\x00\x00"); // padding
        raw.extend_from_slice(b"\x00\x00\x00\x00"); // number of points
        raw.extend_from_slice(b"\x00\x00\x00"); // garbage
        raw
    }

    fn magn_record() -> MessageValue {
        let mut stamp = MessageValue::new("builtin_interfaces/msg/Time");
        stamp.set("sec", 708i32).set("nanosec", 256u32);
        let mut header = MessageValue::new("std_msgs/msg/Header");
        header.set("stamp", stamp).set("frame_id", "foo42");
        let mut field = MessageValue::new("geometry_msgs/msg/Vector3");
        field.set("x", 128.0).set("y", 128.0).set("z", 128.0);
        let mut covariance = vec![0.0f64; 9];
        covariance[0] = 1.0;
        covariance[4] = 1.0;
        covariance[8] = 1.0;
        let mut magn = MessageValue::new("sensor_msgs/msg/MagneticField");
        magn.set("header", header)
            .set("magnetic_field", field)
            .set("magnetic_field_covariance", covariance);
        magn
    }

    #[test]
    fn test_polygon_little_endian() {
        let registry = default_registry();
        let cache = CodecCache::new();
        let raw = msg_poly();

        let msg = deserialize_cdr(&raw, "geometry_msgs/msg/Polygon", registry, &cache)
            .expect("deserialize");
        let points = msg.get("points").and_then(Value::as_messages).expect("points");
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].get("x").and_then(Value::as_f32), Some(1.0));
        assert_eq!(points[0].get("y").and_then(Value::as_f32), Some(2.0));
        assert_eq!(points[0].get("z").and_then(Value::as_f32), Some(3.0));
        assert_eq!(points[1].get("x").and_then(Value::as_f32), Some(1.25));
        assert_eq!(points[1].get("y").and_then(Value::as_f32), Some(2.25));
        assert_eq!(points[1].get("z").and_then(Value::as_f32), Some(3.25));

        let out = serialize_cdr(&msg, "geometry_msgs/msg/Polygon", true, registry, &cache)
            .expect("serialize");
        assert_eq!(out, raw);
    }

    #[test]
    fn test_magnetic_field_big_endian() {
        let registry = default_registry();
        let cache = CodecCache::new();

        let big = deserialize_cdr(
            &msg_magn_big(),
            "sensor_msgs/msg/MagneticField",
            registry,
            &cache,
        )
        .expect("deserialize big endian");
        let header = big.get("header").and_then(Value::as_message).expect("header");
        assert_eq!(header.get("frame_id").and_then(Value::as_str), Some("foo42"));
        let stamp = header.get("stamp").and_then(Value::as_message).expect("stamp");
        assert_eq!(stamp.get("sec").and_then(Value::as_i32), Some(708));
        assert_eq!(stamp.get("nanosec").and_then(Value::as_u32), Some(256));
        let field = big
            .get("magnetic_field")
            .and_then(Value::as_message)
            .expect("field");
        assert_eq!(field.get("x").and_then(Value::as_f64), Some(128.0));
        let covariance = big
            .get("magnetic_field_covariance")
            .and_then(Value::as_f64_slice)
            .expect("covariance");
        assert_eq!(
            covariance,
            &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
        );

        let little = deserialize_cdr(
            &msg_magn(),
            "sensor_msgs/msg/MagneticField",
            registry,
            &cache,
        )
        .expect("deserialize little endian");
        assert_eq!(big, little);
        assert_eq!(big, magn_record());
    }

    #[test]
    fn test_roundtrip_both_endiannesses() {
        let registry = default_registry();
        let cache = CodecCache::new();
        let record = magn_record();

        for little_endian in [true, false] {
            let raw = serialize_cdr(
                &record,
                "sensor_msgs/msg/MagneticField",
                little_endian,
                registry,
                &cache,
            )
            .expect("serialize");
            assert_eq!(
                serialize_cdr_size(&record, "sensor_msgs/msg/MagneticField", registry, &cache)
                    .expect("size"),
                raw.len()
            );
            let back = deserialize_cdr(&raw, "sensor_msgs/msg/MagneticField", registry, &cache)
                .expect("deserialize");
            assert_eq!(back, record);
        }
    }

    #[test]
    fn test_joint_trajectory_with_empty_sequence() {
        let registry = default_registry();
        let cache = CodecCache::new();
        let raw = msg_joint();

        let msg = deserialize_cdr(&raw, "trajectory_msgs/msg/JointTrajectory", registry, &cache)
            .expect("deserialize");
        assert_eq!(
            msg.get("joint_names").and_then(Value::as_strings),
            Some(&["a".to_string(), "b".to_string()][..])
        );
        assert_eq!(
            msg.get("points").and_then(Value::as_messages).map(<[_]>::len),
            Some(0)
        );

        let out = serialize_cdr(
            &msg,
            "trajectory_msgs/msg/JointTrajectory",
            true,
            registry,
            &cache,
        )
        .expect("serialize");
        // Re-encoding drops the trailing garbage bytes.
        assert_eq!(out, raw[..raw.len() - 3]);
    }

    #[test]
    fn test_header_to_packed_wire() {
        let registry = default_registry();
        let cache = CodecCache::new();

        let mut stamp = MessageValue::new("builtin_interfaces/msg/Time");
        stamp.set("sec", 42i32).set("nanosec", 666u32);
        let mut header = MessageValue::new("std_msgs/msg/Header");
        header.set("stamp", stamp).set("frame_id", "frame");

        let aligned = serialize_cdr(&header, "std_msgs/msg/Header", true, registry, &cache)
            .expect("serialize");
        let packed =
            cdr_to_ros1(&aligned, "std_msgs/msg/Header", registry, &cache).expect("convert");
        assert_eq!(
            packed,
            b"\x00\x00\x00\x00\x2a\x00\x00\x00\x9a\x02\x00\x00\x05\x00\x00\x00frame"
        );
        assert_eq!(
            cdr_to_ros1_size(&aligned, "std_msgs/msg/Header", registry, &cache).expect("size"),
            packed.len()
        );

        let back = ros1_to_cdr(&packed, "std_msgs/msg/Header", registry, &cache).expect("convert");
        assert_eq!(back, aligned);
        assert_eq!(
            ros1_to_cdr_size(&packed, "std_msgs/msg/Header", registry, &cache).expect("size"),
            back.len()
        );
    }

    #[test]
    fn test_mover_roundtrip() {
        let registry = default_registry();
        let cache = CodecCache::new();

        for (raw, typename) in [
            (msg_poly(), "geometry_msgs/msg/Polygon"),
            (msg_magn(), "sensor_msgs/msg/MagneticField"),
        ] {
            let packed = cdr_to_ros1(&raw, typename, registry, &cache).expect("to packed");
            let aligned = ros1_to_cdr(&packed, typename, registry, &cache).expect("to aligned");
            assert_eq!(aligned, raw, "{typename}");
        }
    }

    #[test]
    fn test_length_mismatch() {
        let registry = default_registry();
        let cache = CodecCache::new();

        let mut plane = MessageValue::new("shape_msgs/msg/Plane");
        plane.set("coef", vec![1.0f64, 2.0, 3.0]);
        let err = serialize_cdr(&plane, "shape_msgs/msg/Plane", true, registry, &cache)
            .unwrap_err();
        assert!(matches!(err, CodecError::LengthMismatch { want: 4, have: 3, .. }));
    }

    #[test]
    fn test_truncated_buffer() {
        let registry = default_registry();
        let cache = CodecCache::new();

        let raw = msg_magn();
        let err = deserialize_cdr(
            &raw[..raw.len() - 8],
            "sensor_msgs/msg/MagneticField",
            registry,
            &cache,
        )
        .unwrap_err();
        assert!(matches!(err, CodecError::Truncated { .. }));
    }

    #[test]
    fn test_malformed_length() {
        let registry = default_registry();
        let cache = CodecCache::new();

        // String length prefix pointing beyond the buffer.
        let raw = b"\xff\x00\x00\x00no".to_vec();
        let err = ros1_to_cdr(&raw, "std_msgs/msg/String", registry, &cache).unwrap_err();
        assert!(matches!(err, CodecError::MalformedLength));
    }

    #[test]
    fn test_unknown_type() {
        let registry = default_registry();
        let cache = CodecCache::new();
        let err = deserialize_cdr(&msg_poly(), "foo_msgs/msg/Missing", registry, &cache)
            .unwrap_err();
        assert!(matches!(err, CodecError::UnknownType(_)));
    }
}
