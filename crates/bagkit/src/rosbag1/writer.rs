// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Legacy bag writer.

use std::fs::OpenOptions;
use std::io::{BufWriter, Read, Seek, SeekFrom, Write as IoWrite};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, WriteBytesExt};
use thiserror::Error;

use crate::interfaces::{Connection, ConnectionExt};
use crate::typesys::msg::{denormalize_msgtype, generate_msgdef};
use crate::typesys::{default_registry, TypesysError};

use super::{time_parts, RecordType, MAGIC};

/// Errors raised while creating or writing a legacy bag.
#[derive(Debug, Error)]
pub enum WriterError {
    /// Underlying file failure.
    #[error("could not write bag: {0}")]
    Io(#[from] std::io::Error),
    /// API misuse.
    #[error("{0}")]
    Usage(String),
    /// Message definition generation failed.
    #[error(transparent)]
    Typesys(#[from] TypesysError),
    /// Chunk compression failed.
    #[error("could not compress chunk: {0}")]
    Compression(String),
}

/// Chunk compression formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    Bz2,
    Lz4,
}

impl CompressionFormat {
    fn name(self) -> &'static str {
        match self {
            Self::Bz2 => "bz2",
            Self::Lz4 => "lz4",
        }
    }
}

/// Record header under construction, fields kept in insertion order.
#[derive(Default)]
struct HeaderBuilder {
    fields: Vec<(String, Vec<u8>)>,
}

impl HeaderBuilder {
    fn set_u32(&mut self, name: &str, value: u32) -> &mut Self {
        self.fields.push((name.to_string(), value.to_le_bytes().to_vec()));
        self
    }

    fn set_u64(&mut self, name: &str, value: u64) -> &mut Self {
        self.fields.push((name.to_string(), value.to_le_bytes().to_vec()));
        self
    }

    fn set_string(&mut self, name: &str, value: &str) -> &mut Self {
        self.fields.push((name.to_string(), value.as_bytes().to_vec()));
        self
    }

    fn set_time(&mut self, name: &str, value: u64) -> &mut Self {
        let (sec, nsec) = time_parts(value);
        let mut bytes = Vec::with_capacity(8);
        bytes.extend_from_slice(&sec.to_le_bytes());
        bytes.extend_from_slice(&nsec.to_le_bytes());
        self.fields.push((name.to_string(), bytes));
        self
    }

    /// Write the header, returning the number of bytes written.
    fn write(&self, dst: &mut impl IoWrite, op: Option<RecordType>) -> std::io::Result<usize> {
        let mut data = Vec::new();
        if let Some(op) = op {
            let keqv = [b"op=" as &[u8], &[op.code()]].concat();
            data.write_u32::<LittleEndian>(keqv.len() as u32)?;
            data.extend_from_slice(&keqv);
        }
        for (name, value) in &self.fields {
            let mut keqv = Vec::with_capacity(name.len() + 1 + value.len());
            keqv.extend_from_slice(name.as_bytes());
            keqv.push(b'=');
            keqv.extend_from_slice(value);
            data.write_u32::<LittleEndian>(keqv.len() as u32)?;
            data.extend_from_slice(&keqv);
        }
        dst.write_u32::<LittleEndian>(data.len() as u32)?;
        dst.write_all(&data)?;
        Ok(data.len() + 4)
    }
}

/// One in-progress chunk.
struct WriteChunk {
    data: Vec<u8>,
    pos: Option<u64>,
    start: u64,
    end: u64,
    connections: Vec<(u32, Vec<(u64, u32)>)>,
}

impl WriteChunk {
    fn new() -> Self {
        Self {
            data: Vec::new(),
            pos: None,
            start: u64::MAX,
            end: 0,
            connections: Vec::new(),
        }
    }
}

/// Legacy bag version 2.0 writer.
///
/// Messages accumulate in an in-memory chunk which is flushed once it
/// crosses `chunk_threshold`; the trailing index and the final header are
/// emitted on close.
pub struct Writer {
    path: PathBuf,
    file: Option<BufWriter<std::fs::File>>,
    compression: Option<CompressionFormat>,
    connections: Vec<Connection>,
    chunks: Vec<WriteChunk>,
    /// Flush threshold for the open chunk in bytes.
    pub chunk_threshold: usize,
}

impl Writer {
    /// Create a writer; the target path must not exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, WriterError> {
        let path = path.as_ref().to_path_buf();
        if path.exists() {
            return Err(WriterError::Usage(format!(
                "{path:?} exists already, not overwriting"
            )));
        }
        Ok(Self {
            path,
            file: None,
            compression: None,
            connections: Vec::new(),
            chunks: vec![WriteChunk::new()],
            chunk_threshold: 1 << 20,
        })
    }

    /// Enable chunk compression; must be called before `open`.
    pub fn set_compression(&mut self, format: CompressionFormat) -> Result<(), WriterError> {
        if self.file.is_some() {
            return Err(WriterError::Usage(format!(
                "cannot set compression, bag {:?} already open",
                self.path
            )));
        }
        self.compression = Some(format);
        Ok(())
    }

    /// Open the bag for writing: magic plus a placeholder header record.
    pub fn open(&mut self) -> Result<(), WriterError> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .map_err(|err| {
                if err.kind() == std::io::ErrorKind::AlreadyExists {
                    WriterError::Usage(format!("{:?} exists already, not overwriting", self.path))
                } else {
                    WriterError::Io(err)
                }
            })?;
        let mut file = BufWriter::new(file);

        file.write_all(MAGIC)?;
        let mut header = HeaderBuilder::default();
        header
            .set_u64("index_pos", 0)
            .set_u32("conn_count", 0)
            .set_u32("chunk_count", 0);
        let size = header.write(&mut file, Some(RecordType::BagHeader))?;
        write_padding(&mut file, size)?;

        self.file = Some(file);
        Ok(())
    }

    /// Connections added so far.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Add a connection; can only be called on an open bag.
    ///
    /// When `msgdef` or `md5sum` is not supplied, both are generated from
    /// the default registry. Identical connections can only be added once.
    pub fn add_connection(
        &mut self,
        topic: &str,
        msgtype: &str,
        msgdef: Option<&str>,
        md5sum: Option<&str>,
        callerid: Option<&str>,
        latching: Option<u32>,
    ) -> Result<Connection, WriterError> {
        if self.file.is_none() {
            return Err(WriterError::Usage("bag was not opened".into()));
        }

        let (msgdef, md5sum) = match (msgdef, md5sum) {
            (Some(msgdef), Some(md5sum)) => (msgdef.to_string(), md5sum.to_string()),
            _ => generate_msgdef(msgtype, default_registry())?,
        };

        let connection = Connection {
            id: self.connections.len() as u32,
            topic: topic.to_string(),
            msgtype: denormalize_msgtype(msgtype),
            msgdef,
            md5sum,
            msgcount: 0,
            ext: ConnectionExt::Rosbag1 {
                callerid: callerid.map(str::to_string),
                latching,
            },
            owner: 0,
        };

        if self.connections.iter().any(|x| {
            (&x.topic, &x.msgtype, &x.msgdef, &x.md5sum, &x.ext)
                == (
                    &connection.topic,
                    &connection.msgtype,
                    &connection.msgdef,
                    &connection.md5sum,
                    &connection.ext,
                )
        }) {
            return Err(WriterError::Usage(format!(
                "connections can only be added once with same arguments: {:?}",
                connection.topic
            )));
        }

        let chunk = self.chunks.last_mut().expect("chunk list is never empty");
        write_connection(&connection, &mut chunk.data)?;
        self.connections.push(connection.clone());
        Ok(connection)
    }

    /// Write a message to the bag.
    pub fn write(
        &mut self,
        connection: &Connection,
        timestamp: u64,
        data: &[u8],
    ) -> Result<(), WriterError> {
        if self.file.is_none() {
            return Err(WriterError::Usage("bag was not opened".into()));
        }
        if self.connections.get(connection.id as usize) != Some(connection) {
            return Err(WriterError::Usage(format!(
                "there is no connection {:?}",
                connection.topic
            )));
        }

        let chunk = self.chunks.last_mut().expect("chunk list is never empty");
        let offset = chunk.data.len() as u32;
        match chunk.connections.iter_mut().find(|x| x.0 == connection.id) {
            Some(entry) => entry.1.push((timestamp, offset)),
            None => chunk.connections.push((connection.id, vec![(timestamp, offset)])),
        }
        chunk.start = chunk.start.min(timestamp);
        chunk.end = chunk.end.max(timestamp);

        let mut header = HeaderBuilder::default();
        header.set_u32("conn", connection.id).set_time("time", timestamp);
        header.write(&mut chunk.data, Some(RecordType::MsgData))?;
        chunk.data.write_u32::<LittleEndian>(data.len() as u32)?;
        chunk.data.extend_from_slice(data);

        if chunk.data.len() > self.chunk_threshold {
            let index = self.chunks.len() - 1;
            self.write_chunk(index)?;
            self.chunks.push(WriteChunk::new());
        }
        Ok(())
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, WriterError> {
        match self.compression {
            None => Ok(data.to_vec()),
            Some(CompressionFormat::Bz2) => {
                let mut out = Vec::new();
                bzip2::read::BzEncoder::new(data, bzip2::Compression::best())
                    .read_to_end(&mut out)?;
                Ok(out)
            }
            Some(CompressionFormat::Lz4) => {
                let mut encoder = lz4_flex::frame::FrameEncoder::new(Vec::new());
                encoder
                    .write_all(data)
                    .map_err(|err| WriterError::Compression(err.to_string()))?;
                encoder
                    .finish()
                    .map_err(|err| WriterError::Compression(err.to_string()))
            }
        }
    }

    /// Flush one open chunk to the file.
    fn write_chunk(&mut self, index: usize) -> Result<(), WriterError> {
        if self.chunks[index].data.is_empty() {
            return Ok(());
        }
        let compressed = self.compress(&self.chunks[index].data)?;
        let compression = self.compression.map_or("none", CompressionFormat::name);

        let chunk = &mut self.chunks[index];
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| WriterError::Usage("bag was not opened".into()))?;
        let pos = file.stream_position()?;

        let mut header = HeaderBuilder::default();
        header
            .set_string("compression", compression)
            .set_u32("size", chunk.data.len() as u32);
        header.write(file, Some(RecordType::Chunk))?;
        file.write_u32::<LittleEndian>(compressed.len() as u32)?;
        file.write_all(&compressed)?;

        for (cid, items) in &chunk.connections {
            let mut header = HeaderBuilder::default();
            header
                .set_u32("ver", 1)
                .set_u32("conn", *cid)
                .set_u32("count", items.len() as u32);
            header.write(file, Some(RecordType::IdxData))?;
            file.write_u32::<LittleEndian>((items.len() * 12) as u32)?;
            for (time, offset) in items {
                let (sec, nsec) = time_parts(*time);
                file.write_u32::<LittleEndian>(sec)?;
                file.write_u32::<LittleEndian>(nsec)?;
                file.write_u32::<LittleEndian>(*offset)?;
            }
        }

        chunk.pos = Some(pos);
        chunk.data = Vec::new();
        log::debug!("flushed chunk {index} at {pos}");
        Ok(())
    }

    /// Close the bag: flush open chunks, write the index, and rewrite the
    /// bag header in place with the final counts.
    pub fn close(&mut self) -> Result<(), WriterError> {
        if self.file.is_none() {
            return Err(WriterError::Usage("bag was not opened".into()));
        }
        for index in 0..self.chunks.len() {
            if self.chunks[index].pos.is_none() {
                self.write_chunk(index)?;
            }
        }

        let file = self.file.as_mut().expect("checked above");
        let index_pos = file.stream_position()?;

        for connection in &self.connections {
            write_connection(connection, file)?;
        }

        let mut chunk_count = 0u32;
        for chunk in &self.chunks {
            let Some(pos) = chunk.pos else {
                continue;
            };
            chunk_count += 1;
            let mut header = HeaderBuilder::default();
            header
                .set_u32("ver", 1)
                .set_u64("chunk_pos", pos)
                .set_time("start_time", if chunk.start == u64::MAX { 0 } else { chunk.start })
                .set_time("end_time", chunk.end)
                .set_u32("count", chunk.connections.len() as u32);
            header.write(file, Some(RecordType::ChunkInfo))?;
            file.write_u32::<LittleEndian>((chunk.connections.len() * 8) as u32)?;
            for (cid, items) in &chunk.connections {
                file.write_u32::<LittleEndian>(*cid)?;
                file.write_u32::<LittleEndian>(items.len() as u32)?;
            }
        }

        file.seek(SeekFrom::Start(MAGIC.len() as u64))?;
        let mut header = HeaderBuilder::default();
        header
            .set_u64("index_pos", index_pos)
            .set_u32("conn_count", self.connections.len() as u32)
            .set_u32("chunk_count", chunk_count);
        let size = header.write(file, Some(RecordType::BagHeader))?;
        write_padding(file, size)?;
        file.flush()?;

        self.file = None;
        log::debug!(
            "closed bag {:?}: {} connections, {chunk_count} chunks",
            self.path,
            self.connections.len()
        );
        Ok(())
    }
}

/// Write one connection record.
fn write_connection(connection: &Connection, dst: &mut impl IoWrite) -> std::io::Result<()> {
    let mut header = HeaderBuilder::default();
    header
        .set_u32("conn", connection.id)
        .set_string("topic", &connection.topic);
    header.write(dst, Some(RecordType::Connection))?;

    let mut data = HeaderBuilder::default();
    data.set_string("topic", &connection.topic)
        .set_string("type", &connection.msgtype)
        .set_string("md5sum", &connection.md5sum)
        .set_string("message_definition", &connection.msgdef);
    if let ConnectionExt::Rosbag1 { callerid, latching } = &connection.ext {
        if let Some(callerid) = callerid {
            data.set_string("callerid", callerid);
        }
        if let Some(latching) = latching {
            data.set_string("latching", &latching.to_string());
        }
    }
    data.write(dst, None)?;
    Ok(())
}

/// Pad the header record out to its fixed 4096-byte size.
fn write_padding(dst: &mut impl IoWrite, header_size: usize) -> std::io::Result<()> {
    let padsize = 4096 - 4 - header_size;
    dst.write_u32::<LittleEndian>(padsize as u32)?;
    dst.write_all(&vec![b' '; padsize])?;
    Ok(())
}
