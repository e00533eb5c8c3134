// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Legacy bag reader.
//!
//! Designed for the current type system: message type names read from
//! connection records are normalized to their canonical `pkg/msg/Name` form.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use byteorder::{LittleEndian, ReadBytesExt};
use thiserror::Error;

use crate::interfaces::{Connection, ConnectionExt, TopicInfo};
use crate::typesys::msg::normalize_msgtype;

use super::{time_join, RecordType};

/// Errors raised while opening or reading a legacy bag.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// Underlying file failure.
    #[error("could not read bag: {0}")]
    Io(#[from] std::io::Error),
    /// Structural problem with the container.
    #[error("{0}")]
    Format(String),
    /// API misuse.
    #[error("{0}")]
    Usage(String),
}

fn format_err(msg: impl Into<String>) -> ReaderError {
    ReaderError::Format(msg.into())
}

/// Chunk compression modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Compression {
    None,
    Bz2,
    Lz4,
}

impl Compression {
    fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "none" => Self::None,
            "bz2" => Self::Bz2,
            "lz4" => Self::Lz4,
            _ => return None,
        })
    }
}

/// Summary of one chunk from the trailing index.
#[derive(Debug, Clone)]
struct ChunkInfo {
    pos: u64,
    start_time: u64,
    end_time: u64,
    connection_counts: HashMap<u32, u64>,
}

/// Location and compression of one chunk's data.
#[derive(Debug, Clone, Copy)]
struct ChunkMeta {
    datasize: u32,
    datapos: u64,
    compression: Compression,
}

/// Per-message index entry; ordering considers the timestamp only.
#[derive(Debug, Clone, Copy)]
struct IndexEntry {
    time: u64,
    chunk_pos: u64,
    offset: u32,
}

/// Parsed record header fields.
pub(crate) struct RecordHeader {
    fields: HashMap<String, Vec<u8>>,
}

impl RecordHeader {
    /// Read a record header, optionally checking the `op` field.
    pub(crate) fn read(
        src: &mut impl Read,
        expect: Option<RecordType>,
    ) -> Result<Self, ReaderError> {
        let size = src.read_u32::<LittleEndian>()? as usize;
        let mut binary = vec![0u8; size];
        src.read_exact(&mut binary)?;

        let mut fields = HashMap::new();
        let mut pos = 0;
        while pos < binary.len() {
            if pos + 4 > binary.len() {
                return Err(format_err("header field size could not be read"));
            }
            let fieldsize =
                u32::from_le_bytes(binary[pos..pos + 4].try_into().expect("sliced 4")) as usize;
            pos += 4;
            if pos + fieldsize > binary.len() {
                return Err(format_err("declared field size is too large for header"));
            }
            let field = &binary[pos..pos + fieldsize];
            let sep = field
                .iter()
                .position(|x| *x == b'=')
                .ok_or_else(|| format_err("header field could not be parsed"))?;
            let name = String::from_utf8_lossy(&field[..sep]).to_string();
            fields.insert(name, field[sep + 1..].to_vec());
            pos += fieldsize;
        }

        let header = Self { fields };
        if let Some(expect) = expect {
            let have = header.get_u8("op")?;
            if RecordType::from_u8(have) != Some(expect) {
                return Err(format_err(format!(
                    "record of type {have} is unexpected, wanted {}",
                    expect.code()
                )));
            }
        }
        Ok(header)
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    fn get(&self, name: &str, size: usize) -> Result<&[u8], ReaderError> {
        let value = self
            .fields
            .get(name)
            .ok_or_else(|| format_err(format!("field {name:?} is missing")))?;
        if value.len() < size {
            return Err(format_err(format!("field {name:?} is too short")));
        }
        Ok(value)
    }

    pub(crate) fn get_u8(&self, name: &str) -> Result<u8, ReaderError> {
        Ok(self.get(name, 1)?[0])
    }

    pub(crate) fn get_u32(&self, name: &str) -> Result<u32, ReaderError> {
        let value = self.get(name, 4)?;
        Ok(u32::from_le_bytes(value[..4].try_into().expect("sliced 4")))
    }

    pub(crate) fn get_u64(&self, name: &str) -> Result<u64, ReaderError> {
        let value = self.get(name, 8)?;
        Ok(u64::from_le_bytes(value[..8].try_into().expect("sliced 8")))
    }

    pub(crate) fn get_string(&self, name: &str) -> Result<String, ReaderError> {
        let value = self.get(name, 0)?;
        String::from_utf8(value.to_vec())
            .map_err(|_| format_err(format!("field {name:?} is not valid text")))
    }

    pub(crate) fn get_time(&self, name: &str) -> Result<u64, ReaderError> {
        let value = self.get(name, 8)?;
        let sec = u32::from_le_bytes(value[..4].try_into().expect("sliced 4"));
        let nsec = u32::from_le_bytes(value[4..8].try_into().expect("sliced 4"));
        Ok(time_join(sec, nsec))
    }
}

/// Normalize a topic name, collapsing repeated slashes.
fn normalize_topic(name: &str) -> String {
    let lead = if name.starts_with('/') { "/" } else { "" };
    let body = name
        .split('/')
        .filter(|x| !x.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    format!("{lead}{body}")
}

/// Legacy bag version 2.0 reader.
pub struct Reader {
    path: PathBuf,
    file: Option<BufReader<File>>,
    connections: Vec<Arc<Connection>>,
    indexes: HashMap<u32, Vec<IndexEntry>>,
    chunk_infos: Vec<ChunkInfo>,
    chunks: HashMap<u64, ChunkMeta>,
    current_chunk: Option<(u64, Cursor<Vec<u8>>)>,
    index_header_offsets: Option<(usize, usize)>,
    owner: usize,
}

impl Reader {
    /// Create a reader for a bag file path.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ReaderError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(ReaderError::Usage(format!(
                "file {path:?} does not exist"
            )));
        }
        Ok(Self {
            path,
            file: None,
            connections: Vec::new(),
            indexes: HashMap::new(),
            chunk_infos: Vec::new(),
            chunks: HashMap::new(),
            current_chunk: None,
            index_header_offsets: None,
            owner: 0,
        })
    }

    /// Open the bag and read its metadata.
    ///
    /// On failure the partially acquired file handle is released.
    pub fn open(&mut self) -> Result<(), ReaderError> {
        let result = self.do_open();
        if result.is_err() {
            self.file = None;
        }
        result
    }

    fn do_open(&mut self) -> Result<(), ReaderError> {
        let file = File::open(&self.path)?;
        self.file = Some(BufReader::new(file));

        let magic = {
            let file = self.file.as_mut().expect("just opened");
            let mut line = Vec::new();
            file.read_until(b'\n', &mut line)?;
            line
        };
        if magic.is_empty() {
            return Err(format_err(format!("file {:?} seems to be empty", self.path)));
        }
        if magic != super::MAGIC {
            if !magic.starts_with(b"#ROSBAG V") {
                return Err(format_err("file magic is invalid"));
            }
            return Err(format_err("bag version is not supported"));
        }

        let header = {
            let file = self.file.as_mut().expect("just opened");
            RecordHeader::read(file, Some(RecordType::BagHeader))?
        };
        let index_pos = header.get_u64("index_pos")?;
        let conn_count = header.get_u32("conn_count")?;
        let chunk_count = header.get_u32("chunk_count")?;
        if header.contains("encryptor") {
            let encryptor = header.get_string("encryptor")?;
            if !encryptor.is_empty() {
                return Err(format_err(format!(
                    "bag encryption {encryptor:?} is not supported"
                )));
            }
        }
        if index_pos == 0 {
            return Err(format_err("bag is not indexed, reindex before reading"));
        }

        self.seek(index_pos)?;
        let mut connections = Vec::with_capacity(conn_count as usize);
        for _ in 0..conn_count {
            connections.push(self.read_connection()?);
        }
        let mut chunk_infos = Vec::with_capacity(chunk_count as usize);
        for _ in 0..chunk_count {
            chunk_infos.push(self.read_chunk_info()?);
        }

        self.chunks.clear();
        let mut indexes: HashMap<u32, Vec<IndexEntry>> = HashMap::new();
        for chunk_info in &chunk_infos {
            self.seek(chunk_info.pos)?;
            let meta = self.read_chunk()?;
            self.chunks.insert(chunk_info.pos, meta);
            for _ in 0..chunk_info.connection_counts.len() {
                self.read_index_data(chunk_info.pos, &mut indexes)?;
            }
        }
        for index in indexes.values_mut() {
            index.sort_by_key(|x| x.time);
        }

        let owner = self.owner;
        self.connections = connections
            .into_iter()
            .map(|mut conn| {
                conn.msgcount = indexes.get(&conn.id).map_or(0, Vec::len) as u64;
                conn.owner = owner;
                Arc::new(conn)
            })
            .collect();
        self.indexes = indexes;
        self.chunk_infos = chunk_infos;
        log::debug!(
            "opened bag {:?}: {} connections, {} chunks",
            self.path,
            self.connections.len(),
            self.chunks.len()
        );
        Ok(())
    }

    /// Close the bag.
    pub fn close(&mut self) -> Result<(), ReaderError> {
        if self.file.take().is_none() {
            return Err(ReaderError::Usage("rosbag is not open".into()));
        }
        self.current_chunk = None;
        Ok(())
    }

    /// Connections stored in the bag.
    pub fn connections(&self) -> &[Arc<Connection>] {
        &self.connections
    }

    pub(crate) fn assign_owner(&mut self, owner: usize) {
        self.owner = owner;
        self.connections = self
            .connections
            .iter()
            .map(|conn| {
                let mut conn = (**conn).clone();
                conn.owner = owner;
                Arc::new(conn)
            })
            .collect();
    }

    /// Timestamp in nanoseconds of the earliest message.
    pub fn start_time(&self) -> u64 {
        self.chunk_infos
            .iter()
            .map(|x| x.start_time)
            .min()
            .unwrap_or(i64::MAX as u64)
    }

    /// Timestamp in nanoseconds after the latest message.
    pub fn end_time(&self) -> u64 {
        self.chunk_infos.iter().map(|x| x.end_time).max().unwrap_or(0)
    }

    /// Duration in nanoseconds between earliest and latest messages.
    pub fn duration(&self) -> u64 {
        if self.chunk_infos.is_empty() {
            0
        } else {
            self.end_time() - self.start_time()
        }
    }

    /// Total message count.
    pub fn message_count(&self) -> u64 {
        self.chunk_infos
            .iter()
            .flat_map(|x| x.connection_counts.values())
            .sum()
    }

    /// Topic summaries keyed by topic name.
    pub fn topics(&self) -> BTreeMap<String, TopicInfo> {
        let mut by_topic: BTreeMap<String, Vec<Arc<Connection>>> = BTreeMap::new();
        for conn in &self.connections {
            by_topic.entry(conn.topic.clone()).or_default().push(conn.clone());
        }
        by_topic
            .into_iter()
            .map(|(topic, conns)| {
                let msgcount = conns
                    .iter()
                    .flat_map(|conn| {
                        self.chunk_infos
                            .iter()
                            .map(|ci| ci.connection_counts.get(&conn.id).copied().unwrap_or(0))
                    })
                    .sum();
                let msgtype = collapse(conns.iter().map(|x| x.msgtype.clone()));
                let msgdef = collapse(conns.iter().map(|x| x.msgdef.clone()));
                (
                    topic,
                    TopicInfo {
                        msgtype,
                        msgdef,
                        msgcount,
                        connections: conns,
                    },
                )
            })
            .collect()
    }

    /// Read messages, optionally filtered by connection and `[start, stop)`.
    ///
    /// Yields tuples of connection, timestamp in nanoseconds, and raw bytes
    /// in non-decreasing timestamp order.
    pub fn messages(
        &mut self,
        connections: Option<&[Arc<Connection>]>,
        start: Option<u64>,
        stop: Option<u64>,
    ) -> Result<Messages<'_>, ReaderError> {
        if self.file.is_none() {
            return Err(ReaderError::Usage("rosbag is not open".into()));
        }

        let ids: Vec<u32> = match connections {
            Some(conns) if !conns.is_empty() => conns.iter().map(|x| x.id).collect(),
            _ => self.connections.iter().map(|x| x.id).collect(),
        };
        let mut entries: Vec<IndexEntry> = ids
            .iter()
            .flat_map(|id| self.indexes.get(id).cloned().unwrap_or_default())
            .collect();
        entries.sort_by_key(|x| x.time);
        let entries: Vec<IndexEntry> = entries
            .into_iter()
            .filter(|x| start.map_or(true, |s| x.time >= s))
            .take_while(|x| stop.map_or(true, |s| x.time < s))
            .collect();

        let connmap: HashMap<u32, Arc<Connection>> = self
            .connections
            .iter()
            .map(|x| (x.id, x.clone()))
            .collect();

        Ok(Messages {
            reader: self,
            entries: entries.into_iter(),
            connmap,
            failed: false,
        })
    }

    fn seek(&mut self, pos: u64) -> Result<(), ReaderError> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| ReaderError::Usage("rosbag is not open".into()))?;
        file.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    fn read_connection(&mut self) -> Result<Connection, ReaderError> {
        let file = self.file.as_mut().expect("checked by caller");
        let header = RecordHeader::read(file, Some(RecordType::Connection))?;
        let id = header.get_u32("conn")?;
        let topic = normalize_topic(&header.get_string("topic")?);

        let data = RecordHeader::read(file, None)?;
        let msgtype = data.get_string("type")?;
        let md5sum = data.get_string("md5sum")?;
        let msgdef = data.get_string("message_definition")?;
        let callerid = data.contains("callerid").then(|| data.get_string("callerid")).transpose()?;
        let latching = data
            .contains("latching")
            .then(|| {
                data.get_string("latching").and_then(|x| {
                    x.parse::<u32>()
                        .map_err(|_| format_err("latching field is not a number"))
                })
            })
            .transpose()?;

        Ok(Connection {
            id,
            topic,
            msgtype: normalize_msgtype(&msgtype),
            msgdef,
            md5sum,
            msgcount: 0,
            ext: ConnectionExt::Rosbag1 { callerid, latching },
            owner: 0,
        })
    }

    fn read_chunk_info(&mut self) -> Result<ChunkInfo, ReaderError> {
        let file = self.file.as_mut().expect("checked by caller");
        let header = RecordHeader::read(file, Some(RecordType::ChunkInfo))?;
        let ver = header.get_u32("ver")?;
        if ver != 1 {
            return Err(format_err(format!("CHUNK_INFO version {ver} is not supported")));
        }
        let pos = header.get_u64("chunk_pos")?;
        let start_time = header.get_time("start_time")?;
        let end_time = header.get_time("end_time")? + 1;
        let count = header.get_u32("count")?;

        // Skip the record data length, the pairs follow directly.
        file.seek(SeekFrom::Current(4))?;
        let mut connection_counts = HashMap::with_capacity(count as usize);
        for _ in 0..count {
            let conn = file.read_u32::<LittleEndian>()?;
            let msgcount = file.read_u32::<LittleEndian>()?;
            connection_counts.insert(conn, u64::from(msgcount));
        }

        Ok(ChunkInfo {
            pos,
            start_time,
            end_time,
            connection_counts,
        })
    }

    fn read_chunk(&mut self) -> Result<ChunkMeta, ReaderError> {
        let file = self.file.as_mut().expect("checked by caller");
        let header = RecordHeader::read(file, Some(RecordType::Chunk))?;
        let compression = header.get_string("compression")?;
        let compression = Compression::parse(&compression)
            .ok_or_else(|| format_err(format!("compression {compression:?} is not supported")))?;
        let datasize = file.read_u32::<LittleEndian>()?;
        let datapos = file.stream_position()?;
        file.seek(SeekFrom::Current(i64::from(datasize)))?;
        Ok(ChunkMeta {
            datasize,
            datapos,
            compression,
        })
    }

    /// Read one per-message index record.
    ///
    /// Uses a fixed-layout fast path instead of the generic record header
    /// parser; field offsets are probed once and reused for every record.
    fn read_index_data(
        &mut self,
        pos: u64,
        indexes: &mut HashMap<u32, Vec<IndexEntry>>,
    ) -> Result<(), ReaderError> {
        let file = self.file.as_mut().expect("checked by caller");
        let mut buf = [0u8; 55];
        file.read_exact(&mut buf)?;

        if self.index_header_offsets.is_none() {
            let size = u32::from_le_bytes(buf[0..4].try_into().expect("sliced 4")) as usize;
            if size != 47 {
                return Err(format_err("IDXDATA record has unexpected layout"));
            }
            let mut connpos = None;
            let mut countpos = None;
            let mut idx = 4;
            while idx < size {
                match buf[idx + 6] {
                    b'=' => {
                        if buf[idx + 7] != RecordType::IdxData.code() {
                            return Err(format_err("IDXDATA record has unexpected op"));
                        }
                        idx += 8;
                    }
                    b'r' => {
                        let ver = buf[idx + 8];
                        if ver != 1 {
                            return Err(format_err(format!(
                                "IDXDATA version {ver} is not supported"
                            )));
                        }
                        idx += 12;
                    }
                    b'n' => {
                        connpos = Some(idx + 9);
                        idx += 13;
                    }
                    b'u' => {
                        countpos = Some(idx + 10);
                        idx += 14;
                    }
                    _ => return Err(format_err("IDXDATA record has unexpected field")),
                }
            }
            match (connpos, countpos) {
                (Some(conn), Some(count)) => {
                    self.index_header_offsets = Some((conn, count));
                }
                _ => return Err(format_err("IDXDATA record misses conn or count")),
            }
        }
        let (connpos, countpos) = self.index_header_offsets.expect("probed above");

        let conn = u32::from_le_bytes(buf[connpos..connpos + 4].try_into().expect("sliced 4"));
        let count =
            u32::from_le_bytes(buf[countpos..countpos + 4].try_into().expect("sliced 4"));
        let size = u32::from_le_bytes(buf[51..55].try_into().expect("sliced 4"));
        if size != count * 12 {
            return Err(format_err("IDXDATA data size mismatch"));
        }

        let file = self.file.as_mut().expect("checked by caller");
        let mut data = vec![0u8; size as usize];
        file.read_exact(&mut data)?;

        let index = indexes.entry(conn).or_default();
        for entry in data.chunks_exact(12) {
            let sec = u32::from_le_bytes(entry[0..4].try_into().expect("sliced 4"));
            let nsec = u32::from_le_bytes(entry[4..8].try_into().expect("sliced 4"));
            let offset = u32::from_le_bytes(entry[8..12].try_into().expect("sliced 4"));
            index.push(IndexEntry {
                time: time_join(sec, nsec),
                chunk_pos: pos,
                offset,
            });
        }
        Ok(())
    }

    fn load_chunk(&mut self, chunk_pos: u64) -> Result<(), ReaderError> {
        let meta = *self
            .chunks
            .get(&chunk_pos)
            .ok_or_else(|| format_err("message index points at unknown chunk"))?;
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| ReaderError::Usage("rosbag is not open".into()))?;
        file.seek(SeekFrom::Start(meta.datapos))?;
        let mut data = vec![0u8; meta.datasize as usize];
        file.read_exact(&mut data)?;

        let raw = match meta.compression {
            Compression::None => data,
            Compression::Bz2 => {
                let mut out = Vec::new();
                bzip2::read::BzDecoder::new(&data[..]).read_to_end(&mut out)?;
                out
            }
            Compression::Lz4 => {
                let mut out = Vec::new();
                lz4_flex::frame::FrameDecoder::new(&data[..]).read_to_end(&mut out)?;
                out
            }
        };
        log::debug!("decompressed chunk at {chunk_pos}: {} bytes", raw.len());
        self.current_chunk = Some((chunk_pos, Cursor::new(raw)));
        Ok(())
    }

    fn read_entry(
        &mut self,
        entry: IndexEntry,
        connmap: &HashMap<u32, Arc<Connection>>,
    ) -> Result<(Arc<Connection>, u64, Vec<u8>), ReaderError> {
        if self.current_chunk.as_ref().map(|x| x.0) != Some(entry.chunk_pos) {
            self.load_chunk(entry.chunk_pos)?;
        }
        let chunk = &mut self.current_chunk.as_mut().expect("loaded above").1;
        chunk.set_position(u64::from(entry.offset));

        // Skip embedded connection records until the message data.
        let header = loop {
            let header = RecordHeader::read(chunk, None)?;
            let op = header.get_u8("op")?;
            match RecordType::from_u8(op) {
                Some(RecordType::Connection) => {
                    let skip = chunk.read_u32::<LittleEndian>()?;
                    chunk.seek(SeekFrom::Current(i64::from(skip)))?;
                }
                Some(RecordType::MsgData) => break header,
                _ => return Err(format_err("expected to find message data")),
            }
        };

        let size = chunk.read_u32::<LittleEndian>()?;
        let mut data = vec![0u8; size as usize];
        chunk.read_exact(&mut data)?;

        let conn = header.get_u32("conn")?;
        let connection = connmap
            .get(&conn)
            .ok_or_else(|| format_err(format!("message for unknown connection {conn}")))?
            .clone();
        Ok((connection, entry.time, data))
    }
}

/// Lazy message iterator over a merged per-connection index.
pub struct Messages<'a> {
    reader: &'a mut Reader,
    entries: std::vec::IntoIter<IndexEntry>,
    connmap: HashMap<u32, Arc<Connection>>,
    failed: bool,
}

impl Iterator for Messages<'_> {
    type Item = Result<(Arc<Connection>, u64, Vec<u8>), ReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let entry = self.entries.next()?;
        match self.reader.read_entry(entry, &self.connmap) {
            Ok(item) => Some(Ok(item)),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

fn collapse(mut values: impl Iterator<Item = String>) -> Option<String> {
    let first = values.next()?;
    values.all(|x| x == first).then_some(first)
}
