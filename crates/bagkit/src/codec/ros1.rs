// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Packed wire walks: byte-level conversion to and from the aligned wire.
//!
//! The packed wire is little-endian with no internal padding and strings
//! without trailing NUL. Converting moves bytes directly, tracking input and
//! output positions independently since their alignments differ. One
//! historical wart is reproduced: `std_msgs/msg/Header` carries a leading
//! `uint32 seq` on the packed wire that the aligned wire does not have.

use byteorder::{ByteOrder, LittleEndian};

use crate::typesys::Primitive;

use super::plan::{align_up, field_align, ElemPlan, FieldPlan, Plan};
use super::CodecError;

/// Conversion output: either a real buffer or a length counter.
pub(crate) enum Sink<'a> {
    Measure(usize),
    Buffer(&'a mut Vec<u8>),
}

impl Sink<'_> {
    pub(crate) fn pos(&self) -> usize {
        match self {
            Sink::Measure(pos) => *pos,
            Sink::Buffer(buf) => buf.len(),
        }
    }

    fn pad_to(&mut self, align: usize) {
        match self {
            Sink::Measure(pos) => *pos = align_up(*pos, align),
            Sink::Buffer(buf) => {
                let padded = align_up(buf.len(), align);
                buf.resize(padded, 0);
            }
        }
    }

    fn put(&mut self, bytes: &[u8]) {
        match self {
            Sink::Measure(pos) => *pos += bytes.len(),
            Sink::Buffer(buf) => buf.extend_from_slice(bytes),
        }
    }

    fn put_u32(&mut self, value: u32) {
        match self {
            Sink::Measure(pos) => *pos += 4,
            Sink::Buffer(buf) => {
                let mut tmp = [0u8; 4];
                LittleEndian::write_u32(&mut tmp, value);
                buf.extend_from_slice(&tmp);
            }
        }
    }
}

fn take<'a>(input: &'a [u8], ipos: &mut usize, count: usize) -> Result<&'a [u8], CodecError> {
    if *ipos + count > input.len() {
        return Err(CodecError::Truncated {
            need: count,
            have: input.len().saturating_sub(*ipos),
        });
    }
    let bytes = &input[*ipos..*ipos + count];
    *ipos += count;
    Ok(bytes)
}

fn read_len(input: &[u8], ipos: &mut usize) -> Result<usize, CodecError> {
    let bytes = take(input, ipos, 4)?;
    Ok(LittleEndian::read_u32(bytes) as usize)
}

fn span(input: &[u8], ipos: usize, count: usize) -> Result<(), CodecError> {
    if ipos + count > input.len() {
        return Err(CodecError::MalformedLength);
    }
    Ok(())
}

/// Convert one packed message to the aligned wire.
pub(crate) fn packed_to_aligned(
    plan: &Plan,
    input: &[u8],
    ipos: &mut usize,
    out: &mut Sink<'_>,
) -> Result<(), CodecError> {
    if plan.name == "std_msgs/msg/Header" {
        // Skip the packed-only leading uint32 seq.
        take(input, ipos, 4)?;
    }

    for (_, fplan) in &plan.fields {
        out.pad_to(field_align(fplan));
        match fplan {
            FieldPlan::Base(Primitive::String) => string_to_aligned(input, ipos, out)?,
            FieldPlan::Base(p) => {
                let size = p.size().expect("sized primitive");
                out.put(take(input, ipos, size)?);
            }
            FieldPlan::Message(sub) => packed_to_aligned(sub, input, ipos, out)?,
            FieldPlan::Array(elem, length) => {
                elems_to_aligned(elem, *length as usize, input, ipos, out)?;
            }
            FieldPlan::Sequence(elem) => {
                let count = read_len(input, ipos)?;
                out.put_u32(count as u32);
                if count > 0 {
                    if let ElemPlan::Base(p) = elem {
                        if let Some(size) = p.size() {
                            out.pad_to(size);
                        }
                    }
                    elems_to_aligned(elem, count, input, ipos, out)?;
                }
            }
        }
    }
    Ok(())
}

fn string_to_aligned(
    input: &[u8],
    ipos: &mut usize,
    out: &mut Sink<'_>,
) -> Result<(), CodecError> {
    let length = read_len(input, ipos)?;
    span(input, *ipos, length)?;
    out.put_u32((length + 1) as u32);
    out.put(&input[*ipos..*ipos + length]);
    out.put(&[0]);
    *ipos += length;
    Ok(())
}

fn elems_to_aligned(
    elem: &ElemPlan,
    count: usize,
    input: &[u8],
    ipos: &mut usize,
    out: &mut Sink<'_>,
) -> Result<(), CodecError> {
    match elem {
        ElemPlan::Base(Primitive::String) => {
            for _ in 0..count {
                out.pad_to(4);
                string_to_aligned(input, ipos, out)?;
            }
        }
        ElemPlan::Base(p) => {
            let size = p.size().expect("sized primitive");
            let total = count
                .checked_mul(size)
                .ok_or(CodecError::MalformedLength)?;
            span(input, *ipos, total)?;
            out.put(&input[*ipos..*ipos + total]);
            *ipos += total;
        }
        ElemPlan::Message(sub) => {
            for _ in 0..count {
                out.pad_to(sub.align_first());
                packed_to_aligned(sub, input, ipos, out)?;
            }
        }
    }
    Ok(())
}

/// Convert one aligned message to the packed wire.
pub(crate) fn aligned_to_packed(
    plan: &Plan,
    input: &[u8],
    ipos: &mut usize,
    out: &mut Sink<'_>,
) -> Result<(), CodecError> {
    if plan.name == "std_msgs/msg/Header" {
        // Materialize the packed-only leading uint32 seq as zero.
        out.put(&[0, 0, 0, 0]);
    }

    for (_, fplan) in &plan.fields {
        *ipos = align_up(*ipos, field_align(fplan));
        match fplan {
            FieldPlan::Base(Primitive::String) => string_to_packed(input, ipos, out)?,
            FieldPlan::Base(p) => {
                let size = p.size().expect("sized primitive");
                out.put(take(input, ipos, size)?);
            }
            FieldPlan::Message(sub) => aligned_to_packed(sub, input, ipos, out)?,
            FieldPlan::Array(elem, length) => {
                elems_to_packed(elem, *length as usize, input, ipos, out)?;
            }
            FieldPlan::Sequence(elem) => {
                let count = read_len(input, ipos)?;
                out.put_u32(count as u32);
                if count > 0 {
                    if let ElemPlan::Base(p) = elem {
                        if let Some(size) = p.size() {
                            *ipos = align_up(*ipos, size);
                        }
                    }
                    elems_to_packed(elem, count, input, ipos, out)?;
                }
            }
        }
    }
    Ok(())
}

fn string_to_packed(
    input: &[u8],
    ipos: &mut usize,
    out: &mut Sink<'_>,
) -> Result<(), CodecError> {
    let length = read_len(input, ipos)?;
    if length == 0 {
        out.put_u32(0);
        return Ok(());
    }
    span(input, *ipos, length)?;
    out.put_u32((length - 1) as u32);
    out.put(&input[*ipos..*ipos + length - 1]);
    *ipos += length;
    Ok(())
}

fn elems_to_packed(
    elem: &ElemPlan,
    count: usize,
    input: &[u8],
    ipos: &mut usize,
    out: &mut Sink<'_>,
) -> Result<(), CodecError> {
    match elem {
        ElemPlan::Base(Primitive::String) => {
            for _ in 0..count {
                *ipos = align_up(*ipos, 4);
                string_to_packed(input, ipos, out)?;
            }
        }
        ElemPlan::Base(p) => {
            let size = p.size().expect("sized primitive");
            let total = count
                .checked_mul(size)
                .ok_or(CodecError::MalformedLength)?;
            span(input, *ipos, total)?;
            out.put(&input[*ipos..*ipos + total]);
            *ipos += total;
        }
        ElemPlan::Message(sub) => {
            for _ in 0..count {
                *ipos = align_up(*ipos, sub.align_first());
                aligned_to_packed(sub, input, ipos, out)?;
            }
        }
    }
    Ok(())
}
