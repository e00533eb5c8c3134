// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Table-store bag reader.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::OpenFlags;
use thiserror::Error;

use crate::interfaces::{Connection, ConnectionExt, TopicInfo};

use super::metadata::{BagFileInformation, Metadata, MAX_VERSION};

/// Errors raised while opening or reading a table-store bag.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// Underlying file failure.
    #[error("could not read bag: {0}")]
    Io(#[from] std::io::Error),
    /// Table store failure.
    #[error("could not query bag: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Sidecar could not be parsed.
    #[error("could not load metadata: {0}")]
    Yaml(#[from] serde_yaml::Error),
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

/// Table-store bag reader.
///
/// The sidecar is parsed and validated on construction; `open`/`close`
/// bracket message access.
pub struct Reader {
    path: PathBuf,
    metadata: Metadata,
    paths: Vec<PathBuf>,
    connections: Vec<Arc<Connection>>,
    opened: bool,
}

impl Reader {
    /// Parse and validate the sidecar of a bag directory.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ReaderError> {
        let path = path.as_ref().to_path_buf();
        let yamlpath = path.join("metadata.yaml");
        let text = std::fs::read_to_string(&yamlpath).map_err(|err| {
            ReaderError::Usage(format!("could not read metadata at {yamlpath:?}: {err}"))
        })?;
        let info: BagFileInformation = serde_yaml::from_str(&text)?;
        let metadata = info.rosbag2_bagfile_information;

        if metadata.version > MAX_VERSION {
            return Err(format_err(format!(
                "rosbag2 version {} is not supported",
                metadata.version
            )));
        }
        if metadata.storage_identifier != "sqlite3" {
            return Err(format_err(format!(
                "storage plugin {:?} is not supported",
                metadata.storage_identifier
            )));
        }

        let paths: Vec<PathBuf> = metadata
            .relative_file_paths
            .iter()
            .map(|x| {
                let name = Path::new(x)
                    .file_name()
                    .map_or_else(|| x.clone(), |x| x.to_string_lossy().to_string());
                path.join(name)
            })
            .collect();
        let missing: Vec<&PathBuf> = paths.iter().filter(|x| !x.exists()).collect();
        if !missing.is_empty() {
            return Err(format_err(format!(
                "some database files are missing: {missing:?}"
            )));
        }

        let connections: Vec<Arc<Connection>> = metadata
            .topics_with_message_count
            .iter()
            .enumerate()
            .map(|(idx, topic)| {
                Arc::new(Connection {
                    id: idx as u32 + 1,
                    topic: topic.topic_metadata.name.clone(),
                    msgtype: topic.topic_metadata.msgtype.clone(),
                    msgdef: String::new(),
                    md5sum: String::new(),
                    msgcount: topic.message_count,
                    ext: ConnectionExt::Rosbag2 {
                        serialization_format: topic.topic_metadata.serialization_format.clone(),
                        offered_qos_profiles: topic.topic_metadata.offered_qos_profiles.clone(),
                    },
                    owner: 0,
                })
            })
            .collect();

        let noncdr: Vec<&str> = connections
            .iter()
            .filter_map(|x| match &x.ext {
                ConnectionExt::Rosbag2 {
                    serialization_format,
                    ..
                } if serialization_format != "cdr" => Some(serialization_format.as_str()),
                _ => None,
            })
            .collect();
        if !noncdr.is_empty() {
            return Err(format_err(format!(
                "serialization format {noncdr:?} is not supported"
            )));
        }

        if metadata.compression_mode().is_some() {
            if let Some(format) = metadata.compression_format() {
                if format != "zstd" {
                    return Err(format_err(format!(
                        "compression format {format:?} is not supported"
                    )));
                }
            }
        }

        Ok(Self {
            path,
            metadata,
            paths,
            connections,
            opened: false,
        })
    }

    /// Open the bag.
    pub fn open(&mut self) -> Result<(), ReaderError> {
        self.opened = true;
        log::debug!("opened bag {:?}: {} shards", self.path, self.paths.len());
        Ok(())
    }

    /// Close the bag.
    pub fn close(&mut self) -> Result<(), ReaderError> {
        if !self.opened {
            return Err(ReaderError::Usage("rosbag is not open".into()));
        }
        self.opened = false;
        Ok(())
    }

    /// Sidecar metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Connections stored in the bag.
    pub fn connections(&self) -> &[Arc<Connection>] {
        &self.connections
    }

    pub(crate) fn assign_owner(&mut self, owner: usize) {
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

    /// Total message count.
    pub fn message_count(&self) -> u64 {
        self.metadata.message_count
    }

    /// Duration in nanoseconds between earliest and latest messages.
    pub fn duration(&self) -> u64 {
        if self.message_count() == 0 {
            0
        } else {
            self.metadata.duration.nanoseconds + 1
        }
    }

    /// Timestamp in nanoseconds of the earliest message.
    pub fn start_time(&self) -> u64 {
        if self.message_count() == 0 {
            i64::MAX as u64
        } else {
            self.metadata.starting_time.nanoseconds_since_epoch
        }
    }

    /// Timestamp in nanoseconds after the latest message.
    pub fn end_time(&self) -> u64 {
        if self.message_count() == 0 {
            0
        } else {
            self.start_time() + self.duration()
        }
    }

    /// Topic summaries keyed by topic name.
    pub fn topics(&self) -> BTreeMap<String, TopicInfo> {
        self.connections
            .iter()
            .map(|conn| {
                (
                    conn.topic.clone(),
                    TopicInfo {
                        msgtype: Some(conn.msgtype.clone()),
                        msgdef: Some(conn.msgdef.clone()),
                        msgcount: conn.msgcount,
                        connections: vec![conn.clone()],
                    },
                )
            })
            .collect()
    }

    /// Read messages, optionally filtered by connection and `[start, stop)`.
    ///
    /// Shards are visited in sidecar order; a single JOIN query streams each
    /// shard in timestamp order.
    pub fn messages(
        &self,
        connections: Option<&[Arc<Connection>]>,
        start: Option<u64>,
        stop: Option<u64>,
    ) -> Result<Messages, ReaderError> {
        if !self.opened {
            return Err(ReaderError::Usage("rosbag is not open".into()));
        }

        let mut query = String::from(
            "SELECT topics.id, messages.timestamp, messages.data \
             FROM messages JOIN topics ON messages.topic_id = topics.id",
        );
        let mut args: Vec<i64> = Vec::new();
        let mut topics: Vec<String> = Vec::new();
        let mut clause = "WHERE";

        if let Some(conns) = connections {
            if !conns.is_empty() {
                let mut names: Vec<String> = conns.iter().map(|x| x.topic.clone()).collect();
                names.sort();
                names.dedup();
                let marks = vec!["?"; names.len()].join(",");
                query.push_str(&format!(" {clause} topics.name IN ({marks})"));
                topics = names;
                clause = "AND";
            }
        }
        if let Some(start) = start {
            query.push_str(&format!(" {clause} messages.timestamp >= ?"));
            args.push(start as i64);
            clause = "AND";
        }
        if let Some(stop) = stop {
            query.push_str(&format!(" {clause} messages.timestamp < ?"));
            args.push(stop as i64);
        }
        query.push_str(" ORDER BY timestamp");

        Ok(Messages {
            connections: self.connections.clone(),
            compression_mode: self.metadata.compression_mode(),
            shards: self.paths.clone().into_iter(),
            rows: Vec::new().into_iter(),
            query,
            topics,
            args,
            failed: false,
        })
    }
}

/// Lazy message iterator over all shards of a bag.
pub struct Messages {
    connections: Vec<Arc<Connection>>,
    compression_mode: Option<String>,
    shards: std::vec::IntoIter<PathBuf>,
    rows: std::vec::IntoIter<(Arc<Connection>, u64, Vec<u8>)>,
    query: String,
    topics: Vec<String>,
    args: Vec<i64>,
    failed: bool,
}

impl Messages {
    /// Run the query against one shard and buffer its rows.
    fn load_shard(&mut self, path: &Path) -> Result<(), ReaderError> {
        // File-level compression wraps the whole shard in a zstd stream;
        // decompress to a temporary file before opening the database.
        let tempdb;
        let dbpath = if self.compression_mode.as_deref() == Some("file") {
            let mut out = tempfile::NamedTempFile::new()?;
            let infile = File::open(path)?;
            zstd::stream::copy_decode(infile, &mut out)?;
            let keep = out.path().to_path_buf();
            tempdb = Some(out);
            keep
        } else {
            tempdb = None;
            path.to_path_buf()
        };

        let db = rusqlite::Connection::open_with_flags(
            format!("file:{}?immutable=1", dbpath.display()),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
        )?;

        let tables: i64 = db.query_row(
            "SELECT count(*) FROM sqlite_master \
             WHERE type='table' AND name IN ('messages', 'topics')",
            [],
            |row| row.get(0),
        )?;
        if tables != 2 {
            return Err(format_err(format!(
                "cannot open database {dbpath:?} or database missing tables"
            )));
        }

        // Shard-local topic ids are mapped onto the global connection table
        // via the topic name.
        let mut connmap: HashMap<i64, Arc<Connection>> = HashMap::new();
        {
            let mut stmt = db.prepare("SELECT name, id FROM topics")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            for row in rows {
                let (topic, id) = row?;
                if let Some(conn) = self.connections.iter().find(|x| x.topic == topic) {
                    connmap.insert(id, conn.clone());
                }
            }
        }

        let mut stmt = db.prepare(&self.query)?;
        let params = rusqlite::params_from_iter(
            self.topics
                .iter()
                .map(|x| rusqlite::types::Value::Text(x.clone()))
                .chain(self.args.iter().map(|x| rusqlite::types::Value::Integer(*x))),
        );
        let rows = stmt.query_map(params, |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, Vec<u8>>(2)?,
            ))
        })?;

        let per_message = self.compression_mode.as_deref() == Some("message");
        let mut buffered = Vec::new();
        for row in rows {
            let (topic_id, timestamp, data) = row?;
            let Some(connection) = connmap.get(&topic_id) else {
                continue;
            };
            let data = if per_message {
                zstd::stream::decode_all(&data[..])?
            } else {
                data
            };
            buffered.push((connection.clone(), timestamp as u64, data));
        }
        drop(stmt);
        drop(db);
        drop(tempdb);

        self.rows = buffered.into_iter();
        Ok(())
    }
}

impl Iterator for Messages {
    type Item = Result<(Arc<Connection>, u64, Vec<u8>), ReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(item) = self.rows.next() {
                return Some(Ok(item));
            }
            let shard = self.shards.next()?;
            if let Err(err) = self.load_shard(&shard) {
                self.failed = true;
                return Some(Err(err));
            }
        }
    }
}
