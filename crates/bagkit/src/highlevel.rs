// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Unified reader over both bag container versions.
//!
//! Opens one table-store bag directory or one or more legacy bag files,
//! merges their message streams by timestamp, and exposes a single
//! connection table tagged by owning reader.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::codec::{deserialize_cdr, ros1_to_cdr, CodecCache, CodecError, MessageValue};
use crate::interfaces::{Connection, TopicInfo};
use crate::typesys::msg::get_types_from_msg;
use crate::typesys::{Schema, TypeRegistry, TypesysError};
use crate::{rosbag1, rosbag2};

/// Errors raised by the unified reader.
#[derive(Debug, Error)]
pub enum AnyReaderError {
    #[error(transparent)]
    Rosbag1(#[from] rosbag1::ReaderError),
    #[error(transparent)]
    Rosbag2(#[from] rosbag2::ReaderError),
    #[error(transparent)]
    Typesys(#[from] TypesysError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("{0}")]
    Usage(String),
}

enum BagReader {
    V1(rosbag1::Reader),
    V2(rosbag2::Reader),
}

impl BagReader {
    fn open(&mut self) -> Result<(), AnyReaderError> {
        match self {
            Self::V1(reader) => reader.open()?,
            Self::V2(reader) => reader.open()?,
        }
        Ok(())
    }

    fn close(&mut self) {
        let result = match self {
            Self::V1(reader) => reader.close().err().map(|x| x.to_string()),
            Self::V2(reader) => reader.close().err().map(|x| x.to_string()),
        };
        if let Some(err) = result {
            log::debug!("ignoring close error: {err}");
        }
    }

    fn connections(&self) -> &[Arc<Connection>] {
        match self {
            Self::V1(reader) => reader.connections(),
            Self::V2(reader) => reader.connections(),
        }
    }

    fn assign_owner(&mut self, owner: usize) {
        match self {
            Self::V1(reader) => reader.assign_owner(owner),
            Self::V2(reader) => reader.assign_owner(owner),
        }
    }

    fn start_time(&self) -> u64 {
        match self {
            Self::V1(reader) => reader.start_time(),
            Self::V2(reader) => reader.start_time(),
        }
    }

    fn end_time(&self) -> u64 {
        match self {
            Self::V1(reader) => reader.end_time(),
            Self::V2(reader) => reader.end_time(),
        }
    }

    fn message_count(&self) -> u64 {
        match self {
            Self::V1(reader) => reader.message_count(),
            Self::V2(reader) => reader.message_count(),
        }
    }

    fn topics(&self) -> BTreeMap<String, TopicInfo> {
        match self {
            Self::V1(reader) => reader.topics(),
            Self::V2(reader) => reader.topics(),
        }
    }
}

/// One message stream, either container version.
enum AnyMessages<'a> {
    V1(rosbag1::Messages<'a>),
    V2(rosbag2::Messages),
}

impl Iterator for AnyMessages<'_> {
    type Item = Result<(Arc<Connection>, u64, Vec<u8>), AnyReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::V1(messages) => messages.next().map(|x| x.map_err(Into::into)),
            Self::V2(messages) => messages.next().map(|x| x.map_err(Into::into)),
        }
    }
}

/// Merge-by-timestamp over per-owner message streams.
///
/// Ties are broken by iterator order.
pub struct MergedMessages<'a> {
    streams: Vec<std::iter::Peekable<AnyMessages<'a>>>,
}

impl Iterator for MergedMessages<'_> {
    type Item = Result<(Arc<Connection>, u64, Vec<u8>), AnyReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut best: Option<(usize, u64)> = None;
        for (index, stream) in self.streams.iter_mut().enumerate() {
            match stream.peek() {
                Some(Ok((_, timestamp, _))) => {
                    if best.map_or(true, |(_, t)| *timestamp < t) {
                        best = Some((index, *timestamp));
                    }
                }
                // Surface errors immediately.
                Some(Err(_)) => {
                    best = Some((index, 0));
                    break;
                }
                None => {}
            }
        }
        let (index, _) = best?;
        self.streams[index].next()
    }
}

/// Unified reader for both bag versions.
pub struct AnyReader {
    readers: Vec<BagReader>,
    is2: bool,
    isopen: bool,
    connections: Vec<Arc<Connection>>,
    registry: TypeRegistry,
    cache: CodecCache,
}

impl AnyReader {
    /// Create a reader over one table-store bag or several legacy bags.
    pub fn new(paths: &[PathBuf]) -> Result<Self, AnyReaderError> {
        if paths.is_empty() {
            return Err(AnyReaderError::Usage(
                "must call with at least one path".into(),
            ));
        }
        if paths.len() > 1 && paths.iter().any(|x| x.join("metadata.yaml").exists()) {
            return Err(AnyReaderError::Usage(
                "opening of multiple rosbag2 recordings is not supported".into(),
            ));
        }
        let missing: Vec<&PathBuf> = paths.iter().filter(|x| !x.exists()).collect();
        if !missing.is_empty() {
            return Err(AnyReaderError::Usage(format!(
                "the following paths are missing: {missing:?}"
            )));
        }

        let is2 = paths[0].join("metadata.yaml").exists();
        let readers = if is2 {
            vec![BagReader::V2(rosbag2::Reader::new(&paths[0])?)]
        } else {
            paths
                .iter()
                .map(|x| Ok(BagReader::V1(rosbag1::Reader::new(x)?)))
                .collect::<Result<Vec<_>, AnyReaderError>>()?
        };

        Ok(Self {
            readers,
            is2,
            isopen: false,
            connections: Vec::new(),
            registry: TypeRegistry::new(),
            cache: CodecCache::new(),
        })
    }

    /// Open all underlying readers and build the type registry.
    ///
    /// Already opened readers are rolled back when a later one fails.
    pub fn open(&mut self) -> Result<(), AnyReaderError> {
        if self.isopen {
            return Err(AnyReaderError::Usage("already open".into()));
        }
        for index in 0..self.readers.len() {
            if let Err(err) = self.readers[index].open() {
                for reader in &mut self.readers[..index] {
                    reader.close();
                }
                return Err(err);
            }
        }

        if self.is2 {
            // Table-store bags carry no schemas, rely on the catalog.
            self.registry = TypeRegistry::standard();
        } else {
            self.registry = TypeRegistry::new();
            let mut types: HashMap<String, Schema> = HashMap::new();
            for reader in &self.readers {
                for connection in reader.connections() {
                    for (name, schema) in
                        get_types_from_msg(&connection.msgdef, &connection.msgtype)?
                    {
                        types.insert(name, schema);
                    }
                }
            }
            self.registry.register(types.into_iter().collect())?;
        }

        for (index, reader) in self.readers.iter_mut().enumerate() {
            reader.assign_owner(index);
        }
        self.connections = self
            .readers
            .iter()
            .flat_map(|x| x.connections().iter().cloned())
            .collect();
        self.isopen = true;
        Ok(())
    }

    /// Close all underlying readers.
    pub fn close(&mut self) -> Result<(), AnyReaderError> {
        if !self.isopen {
            return Err(AnyReaderError::Usage("rosbag is not open".into()));
        }
        for reader in &mut self.readers {
            reader.close();
        }
        self.isopen = false;
        Ok(())
    }

    /// Flat connection list across all readers, tagged by owner.
    pub fn connections(&self) -> &[Arc<Connection>] {
        &self.connections
    }

    /// Type registry backing [`AnyReader::deserialize`].
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Timestamp in nanoseconds of the earliest message.
    pub fn start_time(&self) -> u64 {
        self.readers
            .iter()
            .map(BagReader::start_time)
            .min()
            .unwrap_or(i64::MAX as u64)
    }

    /// Timestamp in nanoseconds after the latest message.
    pub fn end_time(&self) -> u64 {
        self.readers.iter().map(BagReader::end_time).max().unwrap_or(0)
    }

    /// Duration in nanoseconds between earliest and latest messages.
    pub fn duration(&self) -> u64 {
        self.end_time().saturating_sub(self.start_time())
    }

    /// Total message count.
    pub fn message_count(&self) -> u64 {
        self.readers.iter().map(BagReader::message_count).sum()
    }

    /// Topic summaries; message counts are summed, type and definition
    /// collapse to a value only when all connections agree.
    pub fn topics(&self) -> BTreeMap<String, TopicInfo> {
        let mut merged: BTreeMap<String, TopicInfo> = BTreeMap::new();
        for reader in &self.readers {
            for (topic, info) in reader.topics() {
                match merged.get_mut(&topic) {
                    None => {
                        merged.insert(topic, info);
                    }
                    Some(present) => {
                        if present.msgtype != info.msgtype {
                            present.msgtype = None;
                        }
                        if present.msgdef != info.msgdef {
                            present.msgdef = None;
                        }
                        present.msgcount += info.msgcount;
                        present.connections.extend(info.connections);
                    }
                }
            }
        }
        merged
    }

    /// Read messages from all bags, merged by timestamp.
    ///
    /// When `connections` is given, filtering is delegated per owner and the
    /// per-owner streams are merged externally.
    pub fn messages(
        &mut self,
        connections: Option<&[Arc<Connection>]>,
        start: Option<u64>,
        stop: Option<u64>,
    ) -> Result<MergedMessages<'_>, AnyReaderError> {
        if !self.isopen {
            return Err(AnyReaderError::Usage("rosbag is not open".into()));
        }

        let groups: Option<HashMap<usize, Vec<Arc<Connection>>>> = connections.map(|conns| {
            let mut groups: HashMap<usize, Vec<Arc<Connection>>> = HashMap::new();
            for conn in conns {
                groups.entry(conn.owner).or_default().push(conn.clone());
            }
            groups
        });

        let mut streams = Vec::with_capacity(self.readers.len());
        for (index, reader) in self.readers.iter_mut().enumerate() {
            let filter = match &groups {
                None => None,
                Some(groups) => match groups.get(&index) {
                    Some(conns) => Some(conns.clone()),
                    // Filter given, but nothing selected from this reader.
                    None => continue,
                },
            };
            let stream = match reader {
                BagReader::V1(reader) => {
                    AnyMessages::V1(reader.messages(filter.as_deref(), start, stop)?)
                }
                BagReader::V2(reader) => {
                    AnyMessages::V2(reader.messages(filter.as_deref(), start, stop)?)
                }
            };
            streams.push(stream.peekable());
        }

        Ok(MergedMessages { streams })
    }

    /// Deserialize raw bytes with the reader's registry.
    ///
    /// Table-store payloads decode directly from the aligned wire; legacy
    /// payloads are first converted from the packed wire.
    pub fn deserialize(&self, raw: &[u8], msgtype: &str) -> Result<MessageValue, AnyReaderError> {
        let raw = if self.is2 {
            raw.to_vec()
        } else {
            ros1_to_cdr(raw, msgtype, &self.registry, &self.cache)?
        };
        Ok(deserialize_cdr(&raw, msgtype, &self.registry, &self.cache)?)
    }
}

/// Convenience constructor from a single path.
pub fn open_bag(path: impl AsRef<Path>) -> Result<AnyReader, AnyReaderError> {
    let mut reader = AnyReader::new(&[path.as_ref().to_path_buf()])?;
    reader.open()?;
    Ok(reader)
}
