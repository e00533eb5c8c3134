// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Aligned wire walks: size, encode, decode.
//!
//! Every walk keeps the position relative to the payload start and pads to
//! each field's alignment before touching it. Nested messages continue with
//! the running position, so they inherit the alignment of their first field
//! and leave that of their last.

use byteorder::ByteOrder;

use crate::typesys::Primitive;

use super::plan::{align_up, elem_first_align, field_align, ElemPlan, FieldPlan, Plan};
use super::value::{MessageValue, Value};
use super::CodecError;

fn mismatch(field: &str, expected: &'static str) -> CodecError {
    CodecError::TypeMismatch {
        field: field.to_string(),
        expected,
    }
}

fn need(buf: &[u8], pos: usize, count: usize) -> Result<(), CodecError> {
    if pos + count > buf.len() {
        return Err(CodecError::Truncated {
            need: count,
            have: buf.len().saturating_sub(pos),
        });
    }
    Ok(())
}

/// Compute the serialized payload size of `message` starting at `pos`.
pub(crate) fn getsize(
    plan: &Plan,
    message: &MessageValue,
    mut pos: usize,
) -> Result<usize, CodecError> {
    for (fname, fplan) in &plan.fields {
        let value = message
            .get(fname)
            .ok_or_else(|| mismatch(fname, "present field"))?;
        pos = align_up(pos, field_align(fplan));
        pos = match fplan {
            FieldPlan::Base(Primitive::String) => {
                let s = value.as_str().ok_or_else(|| mismatch(fname, "string"))?;
                pos + 4 + s.len() + 1
            }
            FieldPlan::Base(p) => pos + p.size().expect("sized primitive"),
            FieldPlan::Message(sub) => match sub.fixed_size {
                Some(size) => pos + size,
                None => {
                    let msg = value.as_message().ok_or_else(|| mismatch(fname, "message"))?;
                    getsize(sub, msg, pos)?
                }
            },
            FieldPlan::Array(elem, length) => {
                elems_size(elem, value, Some(*length as usize), fname, pos)?
            }
            FieldPlan::Sequence(elem) => {
                let count = value_len(elem, value, fname)?;
                pos += 4;
                if count > 0 {
                    pos = elems_size(elem, value, None, fname, pos)?;
                }
                pos
            }
        };
    }
    Ok(pos)
}

fn value_len(elem: &ElemPlan, value: &Value, fname: &str) -> Result<usize, CodecError> {
    let len = match (elem, value) {
        (ElemPlan::Base(Primitive::Bool), Value::BoolArray(v)) => v.len(),
        (ElemPlan::Base(Primitive::Int8), Value::I8Array(v)) => v.len(),
        (ElemPlan::Base(Primitive::Int16), Value::I16Array(v)) => v.len(),
        (ElemPlan::Base(Primitive::Int32), Value::I32Array(v)) => v.len(),
        (ElemPlan::Base(Primitive::Int64), Value::I64Array(v)) => v.len(),
        (ElemPlan::Base(Primitive::UInt8), Value::U8Array(v)) => v.len(),
        (ElemPlan::Base(Primitive::UInt16), Value::U16Array(v)) => v.len(),
        (ElemPlan::Base(Primitive::UInt32), Value::U32Array(v)) => v.len(),
        (ElemPlan::Base(Primitive::UInt64), Value::U64Array(v)) => v.len(),
        (ElemPlan::Base(Primitive::Float32), Value::F32Array(v)) => v.len(),
        (ElemPlan::Base(Primitive::Float64), Value::F64Array(v)) => v.len(),
        (ElemPlan::Base(Primitive::String), Value::StringArray(v)) => v.len(),
        (ElemPlan::Message(_), Value::MessageArray(v)) => v.len(),
        _ => return Err(mismatch(fname, "matching element container")),
    };
    Ok(len)
}

fn elems_size(
    elem: &ElemPlan,
    value: &Value,
    declared: Option<usize>,
    fname: &str,
    mut pos: usize,
) -> Result<usize, CodecError> {
    let count = value_len(elem, value, fname)?;
    if let Some(want) = declared {
        if count != want {
            return Err(CodecError::LengthMismatch {
                field: fname.to_string(),
                want,
                have: count,
            });
        }
    }
    match elem {
        ElemPlan::Base(Primitive::String) => {
            let strings = value.as_strings().expect("checked by value_len");
            for s in strings {
                pos = align_up(pos, 4);
                pos += 4 + s.len() + 1;
            }
        }
        ElemPlan::Base(p) => {
            let size = p.size().expect("sized primitive");
            if count > 0 {
                pos = align_up(pos, size);
            }
            pos += count * size;
        }
        ElemPlan::Message(sub) => {
            let msgs = value.as_messages().expect("checked by value_len");
            for msg in msgs {
                pos = align_up(pos, sub.align_first());
                pos = match sub.fixed_size {
                    Some(size) => pos + size,
                    None => getsize(sub, msg, pos)?,
                };
            }
        }
    }
    Ok(pos)
}

fn pad(buf: &mut Vec<u8>, align: usize) {
    let padded = align_up(buf.len(), align);
    buf.resize(padded, 0);
}

fn push_u32<B: ByteOrder>(buf: &mut Vec<u8>, value: u32) {
    let mut tmp = [0u8; 4];
    B::write_u32(&mut tmp, value);
    buf.extend_from_slice(&tmp);
}

fn push_string<B: ByteOrder>(buf: &mut Vec<u8>, value: &str) {
    push_u32::<B>(buf, (value.len() + 1) as u32);
    buf.extend_from_slice(value.as_bytes());
    buf.push(0);
}

macro_rules! push_scalar {
    ($buf:expr, $order:ident, $write:ident, $value:expr, $size:expr) => {{
        let mut tmp = [0u8; $size];
        $order::$write(&mut tmp, $value);
        $buf.extend_from_slice(&tmp);
    }};
}

macro_rules! push_bulk {
    ($buf:expr, $order:ident, $write:ident, $values:expr, $size:expr) => {{
        let start = $buf.len();
        $buf.resize(start + $values.len() * $size, 0);
        $order::$write($values, &mut $buf[start..]);
    }};
}

/// Serialize `message` into `buf` in the given byte order.
pub(crate) fn serialize<B: ByteOrder>(
    plan: &Plan,
    message: &MessageValue,
    buf: &mut Vec<u8>,
) -> Result<(), CodecError> {
    for (fname, fplan) in &plan.fields {
        let value = message
            .get(fname)
            .ok_or_else(|| mismatch(fname, "present field"))?;
        pad(buf, field_align(fplan));
        match fplan {
            FieldPlan::Base(p) => encode_base::<B>(*p, value, fname, buf)?,
            FieldPlan::Message(sub) => {
                let msg = value.as_message().ok_or_else(|| mismatch(fname, "message"))?;
                serialize::<B>(sub, msg, buf)?;
            }
            FieldPlan::Array(elem, length) => {
                encode_elems::<B>(elem, value, Some(*length as usize), fname, buf)?;
            }
            FieldPlan::Sequence(elem) => {
                let count = value_len(elem, value, fname)?;
                push_u32::<B>(buf, count as u32);
                if count > 0 {
                    encode_elems::<B>(elem, value, None, fname, buf)?;
                }
            }
        }
    }
    Ok(())
}

fn encode_base<B: ByteOrder>(
    primitive: Primitive,
    value: &Value,
    fname: &str,
    buf: &mut Vec<u8>,
) -> Result<(), CodecError> {
    match (primitive, value) {
        (Primitive::Bool, Value::Bool(v)) => buf.push(u8::from(*v)),
        (Primitive::Int8, Value::I8(v)) => buf.push(*v as u8),
        (Primitive::UInt8, Value::U8(v)) => buf.push(*v),
        (Primitive::Int16, Value::I16(v)) => push_scalar!(buf, B, write_i16, *v, 2),
        (Primitive::UInt16, Value::U16(v)) => push_scalar!(buf, B, write_u16, *v, 2),
        (Primitive::Int32, Value::I32(v)) => push_scalar!(buf, B, write_i32, *v, 4),
        (Primitive::UInt32, Value::U32(v)) => push_scalar!(buf, B, write_u32, *v, 4),
        (Primitive::Int64, Value::I64(v)) => push_scalar!(buf, B, write_i64, *v, 8),
        (Primitive::UInt64, Value::U64(v)) => push_scalar!(buf, B, write_u64, *v, 8),
        (Primitive::Float32, Value::F32(v)) => push_scalar!(buf, B, write_f32, *v, 4),
        (Primitive::Float64, Value::F64(v)) => push_scalar!(buf, B, write_f64, *v, 8),
        (Primitive::String, Value::String(v)) => push_string::<B>(buf, v),
        _ => return Err(mismatch(fname, "matching primitive")),
    }
    Ok(())
}

fn encode_elems<B: ByteOrder>(
    elem: &ElemPlan,
    value: &Value,
    declared: Option<usize>,
    fname: &str,
    buf: &mut Vec<u8>,
) -> Result<(), CodecError> {
    let count = value_len(elem, value, fname)?;
    if let Some(want) = declared {
        if count != want {
            return Err(CodecError::LengthMismatch {
                field: fname.to_string(),
                want,
                have: count,
            });
        }
    }
    match (elem, value) {
        (ElemPlan::Base(Primitive::Bool), Value::BoolArray(v)) => {
            buf.extend(v.iter().map(|x| u8::from(*x)));
        }
        (ElemPlan::Base(Primitive::Int8), Value::I8Array(v)) => {
            buf.extend(v.iter().map(|x| *x as u8));
        }
        (ElemPlan::Base(Primitive::UInt8), Value::U8Array(v)) => buf.extend_from_slice(v),
        (ElemPlan::Base(Primitive::Int16), Value::I16Array(v)) => {
            pad(buf, 2);
            push_bulk!(buf, B, write_i16_into, v, 2);
        }
        (ElemPlan::Base(Primitive::UInt16), Value::U16Array(v)) => {
            pad(buf, 2);
            push_bulk!(buf, B, write_u16_into, v, 2);
        }
        (ElemPlan::Base(Primitive::Int32), Value::I32Array(v)) => {
            pad(buf, 4);
            push_bulk!(buf, B, write_i32_into, v, 4);
        }
        (ElemPlan::Base(Primitive::UInt32), Value::U32Array(v)) => {
            pad(buf, 4);
            push_bulk!(buf, B, write_u32_into, v, 4);
        }
        (ElemPlan::Base(Primitive::Int64), Value::I64Array(v)) => {
            pad(buf, 8);
            push_bulk!(buf, B, write_i64_into, v, 8);
        }
        (ElemPlan::Base(Primitive::UInt64), Value::U64Array(v)) => {
            pad(buf, 8);
            push_bulk!(buf, B, write_u64_into, v, 8);
        }
        (ElemPlan::Base(Primitive::Float32), Value::F32Array(v)) => {
            pad(buf, 4);
            push_bulk!(buf, B, write_f32_into, v, 4);
        }
        (ElemPlan::Base(Primitive::Float64), Value::F64Array(v)) => {
            pad(buf, 8);
            push_bulk!(buf, B, write_f64_into, v, 8);
        }
        (ElemPlan::Base(Primitive::String), Value::StringArray(v)) => {
            for s in v {
                pad(buf, 4);
                push_string::<B>(buf, s);
            }
        }
        (ElemPlan::Message(sub), Value::MessageArray(v)) => {
            for msg in v {
                pad(buf, elem_first_align(elem));
                serialize::<B>(sub, msg, buf)?;
            }
        }
        _ => return Err(mismatch(fname, "matching element container")),
    }
    Ok(())
}

macro_rules! read_scalar {
    ($buf:expr, $pos:expr, $order:ident, $read:ident, $size:expr) => {{
        need($buf, *$pos, $size)?;
        let value = $order::$read(&$buf[*$pos..*$pos + $size]);
        *$pos += $size;
        value
    }};
}

macro_rules! read_bulk {
    ($buf:expr, $pos:expr, $order:ident, $read:ident, $count:expr, $size:expr, $zero:expr) => {{
        need($buf, *$pos, $count * $size)?;
        let mut out = vec![$zero; $count];
        $order::$read(&$buf[*$pos..*$pos + $count * $size], &mut out);
        *$pos += $count * $size;
        out
    }};
}

fn read_u8s(buf: &[u8], pos: &mut usize, count: usize) -> Result<Vec<u8>, CodecError> {
    need(buf, *pos, count)?;
    let out = buf[*pos..*pos + count].to_vec();
    *pos += count;
    Ok(out)
}

fn decode_string<B: ByteOrder>(buf: &[u8], pos: &mut usize) -> Result<String, CodecError> {
    let length = read_scalar!(buf, pos, B, read_u32, 4) as usize;
    if length == 0 {
        return Ok(String::new());
    }
    need(buf, *pos, length)?;
    let bytes = &buf[*pos..*pos + length - 1];
    *pos += length;
    Ok(String::from_utf8(bytes.to_vec())?)
}

/// Deserialize one message of `plan` from `buf` at `pos`.
pub(crate) fn deserialize<B: ByteOrder>(
    plan: &Plan,
    buf: &[u8],
    pos: &mut usize,
) -> Result<MessageValue, CodecError> {
    let mut message = MessageValue::new(plan.name.clone());
    for (fname, fplan) in &plan.fields {
        *pos = align_up(*pos, field_align(fplan));
        let value: Value = match fplan {
            FieldPlan::Base(p) => decode_base::<B>(*p, buf, pos)?,
            FieldPlan::Message(sub) => Value::Message(deserialize::<B>(sub, buf, pos)?),
            FieldPlan::Array(elem, length) => {
                decode_elems::<B>(elem, buf, pos, *length as usize)?
            }
            FieldPlan::Sequence(elem) => {
                let count = read_scalar!(buf, pos, B, read_u32, 4) as usize;
                if count == 0 {
                    empty_elems(elem)
                } else {
                    decode_elems::<B>(elem, buf, pos, count)?
                }
            }
        };
        message.set(fname.clone(), value);
    }
    Ok(message)
}

fn decode_base<B: ByteOrder>(
    primitive: Primitive,
    buf: &[u8],
    pos: &mut usize,
) -> Result<Value, CodecError> {
    Ok(match primitive {
        Primitive::Bool => {
            need(buf, *pos, 1)?;
            let value = buf[*pos] != 0;
            *pos += 1;
            Value::Bool(value)
        }
        Primitive::Int8 => {
            need(buf, *pos, 1)?;
            let value = buf[*pos] as i8;
            *pos += 1;
            Value::I8(value)
        }
        Primitive::UInt8 => {
            need(buf, *pos, 1)?;
            let value = buf[*pos];
            *pos += 1;
            Value::U8(value)
        }
        Primitive::Int16 => Value::I16(read_scalar!(buf, pos, B, read_i16, 2)),
        Primitive::UInt16 => Value::U16(read_scalar!(buf, pos, B, read_u16, 2)),
        Primitive::Int32 => Value::I32(read_scalar!(buf, pos, B, read_i32, 4)),
        Primitive::UInt32 => Value::U32(read_scalar!(buf, pos, B, read_u32, 4)),
        Primitive::Int64 => Value::I64(read_scalar!(buf, pos, B, read_i64, 8)),
        Primitive::UInt64 => Value::U64(read_scalar!(buf, pos, B, read_u64, 8)),
        Primitive::Float32 => Value::F32(read_scalar!(buf, pos, B, read_f32, 4)),
        Primitive::Float64 => Value::F64(read_scalar!(buf, pos, B, read_f64, 8)),
        Primitive::String => Value::String(decode_string::<B>(buf, pos)?),
    })
}

fn empty_elems(elem: &ElemPlan) -> Value {
    match elem {
        ElemPlan::Base(Primitive::Bool) => Value::BoolArray(Vec::new()),
        ElemPlan::Base(Primitive::Int8) => Value::I8Array(Vec::new()),
        ElemPlan::Base(Primitive::Int16) => Value::I16Array(Vec::new()),
        ElemPlan::Base(Primitive::Int32) => Value::I32Array(Vec::new()),
        ElemPlan::Base(Primitive::Int64) => Value::I64Array(Vec::new()),
        ElemPlan::Base(Primitive::UInt8) => Value::U8Array(Vec::new()),
        ElemPlan::Base(Primitive::UInt16) => Value::U16Array(Vec::new()),
        ElemPlan::Base(Primitive::UInt32) => Value::U32Array(Vec::new()),
        ElemPlan::Base(Primitive::UInt64) => Value::U64Array(Vec::new()),
        ElemPlan::Base(Primitive::Float32) => Value::F32Array(Vec::new()),
        ElemPlan::Base(Primitive::Float64) => Value::F64Array(Vec::new()),
        ElemPlan::Base(Primitive::String) => Value::StringArray(Vec::new()),
        ElemPlan::Message(_) => Value::MessageArray(Vec::new()),
    }
}

fn decode_elems<B: ByteOrder>(
    elem: &ElemPlan,
    buf: &[u8],
    pos: &mut usize,
    count: usize,
) -> Result<Value, CodecError> {
    Ok(match elem {
        ElemPlan::Base(Primitive::Bool) => {
            let bytes = read_u8s(buf, pos, count)?;
            Value::BoolArray(bytes.iter().map(|x| *x != 0).collect())
        }
        ElemPlan::Base(Primitive::Int8) => {
            let bytes = read_u8s(buf, pos, count)?;
            Value::I8Array(bytes.iter().map(|x| *x as i8).collect())
        }
        ElemPlan::Base(Primitive::UInt8) => Value::U8Array(read_u8s(buf, pos, count)?),
        ElemPlan::Base(Primitive::Int16) => {
            *pos = align_up(*pos, 2);
            Value::I16Array(read_bulk!(buf, pos, B, read_i16_into, count, 2, 0i16))
        }
        ElemPlan::Base(Primitive::UInt16) => {
            *pos = align_up(*pos, 2);
            Value::U16Array(read_bulk!(buf, pos, B, read_u16_into, count, 2, 0u16))
        }
        ElemPlan::Base(Primitive::Int32) => {
            *pos = align_up(*pos, 4);
            Value::I32Array(read_bulk!(buf, pos, B, read_i32_into, count, 4, 0i32))
        }
        ElemPlan::Base(Primitive::UInt32) => {
            *pos = align_up(*pos, 4);
            Value::U32Array(read_bulk!(buf, pos, B, read_u32_into, count, 4, 0u32))
        }
        ElemPlan::Base(Primitive::Int64) => {
            *pos = align_up(*pos, 8);
            Value::I64Array(read_bulk!(buf, pos, B, read_i64_into, count, 8, 0i64))
        }
        ElemPlan::Base(Primitive::UInt64) => {
            *pos = align_up(*pos, 8);
            Value::U64Array(read_bulk!(buf, pos, B, read_u64_into, count, 8, 0u64))
        }
        ElemPlan::Base(Primitive::Float32) => {
            *pos = align_up(*pos, 4);
            Value::F32Array(read_bulk!(buf, pos, B, read_f32_into, count, 4, 0f32))
        }
        ElemPlan::Base(Primitive::Float64) => {
            *pos = align_up(*pos, 8);
            Value::F64Array(read_bulk!(buf, pos, B, read_f64_into, count, 8, 0f64))
        }
        ElemPlan::Base(Primitive::String) => {
            let mut out = Vec::with_capacity(count);
            for _ in 0..count {
                *pos = align_up(*pos, 4);
                out.push(decode_string::<B>(buf, pos)?);
            }
            Value::StringArray(out)
        }
        ElemPlan::Message(sub) => {
            let mut out = Vec::with_capacity(count);
            for _ in 0..count {
                *pos = align_up(*pos, sub.align_first());
                out.push(deserialize::<B>(sub, buf, pos)?);
            }
            Value::MessageArray(out)
        }
    })
}
