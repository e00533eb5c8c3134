// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Legacy bag container I/O.
//!
//! Implements the indexed, chunked, optionally compressed v2.0 file layout:
//! ASCII magic, a 4096-byte padded header record, chunks, a trailing index
//! region, and the header rewritten in place with the final counts.

mod reader;
mod writer;

pub use reader::{Messages, Reader, ReaderError};
pub use writer::{CompressionFormat, Writer, WriterError};

/// Bag file magic.
pub(crate) const MAGIC: &[u8] = b"#ROSBAG V2.0\n";

/// Record type codes carried in the `op` header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RecordType {
    MsgData = 2,
    BagHeader = 3,
    IdxData = 4,
    Chunk = 5,
    ChunkInfo = 6,
    Connection = 7,
}

impl RecordType {
    pub(crate) fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            2 => Self::MsgData,
            3 => Self::BagHeader,
            4 => Self::IdxData,
            5 => Self::Chunk,
            6 => Self::ChunkInfo,
            7 => Self::Connection,
            _ => return None,
        })
    }

    pub(crate) fn code(self) -> u8 {
        self as u8
    }
}

/// Split a nanosecond timestamp into the on-disk `u32 sec, u32 nsec` pair.
pub(crate) fn time_parts(nanoseconds: u64) -> (u32, u32) {
    (
        (nanoseconds / 1_000_000_000) as u32,
        (nanoseconds % 1_000_000_000) as u32,
    )
}

/// Join the on-disk `u32 sec, u32 nsec` pair into nanoseconds.
pub(crate) fn time_join(sec: u32, nsec: u32) -> u64 {
    u64::from(sec) * 1_000_000_000 + u64::from(nsec)
}
