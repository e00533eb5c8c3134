// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Table-store bag writer.

use std::fs::File;
use std::path::{Path, PathBuf};

use rusqlite::params;
use thiserror::Error;

use crate::interfaces::{Connection, ConnectionExt};

use super::metadata::{
    BagFileInformation, Duration, Metadata, StartingTime, TopicMetadata, TopicWithMessageCount,
};
use super::SCHEMA;

/// Errors raised while creating or writing a table-store bag.
#[derive(Debug, Error)]
pub enum WriterError {
    /// Underlying file failure.
    #[error("could not write bag: {0}")]
    Io(#[from] std::io::Error),
    /// Table store failure.
    #[error("could not write bag database: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Sidecar could not be emitted.
    #[error("could not write metadata: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// API misuse.
    #[error("{0}")]
    Usage(String),
}

/// Compression modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionMode {
    #[default]
    None,
    File,
    Message,
}

impl CompressionMode {
    fn name(self) -> &'static str {
        match self {
            Self::None => "",
            Self::File => "file",
            Self::Message => "message",
        }
    }
}

/// Compression formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionFormat {
    #[default]
    Zstd,
}

/// Table-store bag version 4 writer.
pub struct Writer {
    path: PathBuf,
    metapath: PathBuf,
    dbpath: PathBuf,
    compression_mode: CompressionMode,
    compression_format: CompressionFormat,
    connections: Vec<Connection>,
    counts: Vec<u64>,
    db: Option<rusqlite::Connection>,
}

impl Writer {
    /// Create a writer; the target directory must not exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, WriterError> {
        let path = path.as_ref().to_path_buf();
        if path.exists() {
            return Err(WriterError::Usage(format!(
                "{path:?} exists already, not overwriting"
            )));
        }
        let name = path
            .file_name()
            .map_or_else(|| "bag".to_string(), |x| x.to_string_lossy().to_string());
        Ok(Self {
            metapath: path.join("metadata.yaml"),
            dbpath: path.join(format!("{name}.db3")),
            path,
            compression_mode: CompressionMode::None,
            compression_format: CompressionFormat::Zstd,
            connections: Vec::new(),
            counts: Vec::new(),
            db: None,
        })
    }

    /// Enable compression; must be called before `open`.
    pub fn set_compression(
        &mut self,
        mode: CompressionMode,
        format: CompressionFormat,
    ) -> Result<(), WriterError> {
        if self.db.is_some() {
            return Err(WriterError::Usage(format!(
                "cannot set compression, bag {:?} already open",
                self.path
            )));
        }
        self.compression_mode = mode;
        self.compression_format = format;
        Ok(())
    }

    /// Create the bag directory and initialize the table store.
    pub fn open(&mut self) -> Result<(), WriterError> {
        std::fs::create_dir_all(&self.path)?;
        let db = rusqlite::Connection::open(&self.dbpath)?;
        db.execute_batch(SCHEMA)?;
        self.db = Some(db);
        log::debug!("opened bag {:?} for writing", self.path);
        Ok(())
    }

    /// Connections added so far.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Add a connection; can only be called on an open bag.
    ///
    /// Duplicates under full equality of topic, type, serialization format,
    /// and QoS profiles are rejected.
    pub fn add_connection(
        &mut self,
        topic: &str,
        msgtype: &str,
        serialization_format: &str,
        offered_qos_profiles: &str,
    ) -> Result<Connection, WriterError> {
        let Some(db) = self.db.as_ref() else {
            return Err(WriterError::Usage("bag was not opened".into()));
        };

        let connection = Connection {
            id: self.connections.len() as u32 + 1,
            topic: topic.to_string(),
            msgtype: msgtype.to_string(),
            msgdef: String::new(),
            md5sum: String::new(),
            msgcount: 0,
            ext: ConnectionExt::Rosbag2 {
                serialization_format: serialization_format.to_string(),
                offered_qos_profiles: offered_qos_profiles.to_string(),
            },
            owner: 0,
        };
        if self
            .connections
            .iter()
            .any(|x| x.topic == connection.topic && x.msgtype == connection.msgtype && x.ext == connection.ext)
        {
            return Err(WriterError::Usage(format!(
                "connection can only be added once: {topic:?}"
            )));
        }

        db.execute(
            "INSERT INTO topics VALUES(?1, ?2, ?3, ?4, ?5)",
            params![
                connection.id,
                topic,
                msgtype,
                serialization_format,
                offered_qos_profiles
            ],
        )?;
        self.connections.push(connection.clone());
        self.counts.push(0);
        Ok(connection)
    }

    /// Write a message to the bag.
    pub fn write(
        &mut self,
        connection: &Connection,
        timestamp: u64,
        data: &[u8],
    ) -> Result<(), WriterError> {
        let Some(db) = self.db.as_ref() else {
            return Err(WriterError::Usage("bag was not opened".into()));
        };
        let known = self.connections.iter().position(|x| {
            x.id == connection.id && x.topic == connection.topic && x.ext == connection.ext
        });
        let Some(index) = known else {
            return Err(WriterError::Usage(format!(
                "tried to write to unknown connection {:?}",
                connection.topic
            )));
        };

        let blob = if self.compression_mode == CompressionMode::Message {
            zstd::stream::encode_all(data, 0)?
        } else {
            data.to_vec()
        };

        db.execute(
            "INSERT INTO messages (topic_id, timestamp, data) VALUES(?1, ?2, ?3)",
            params![connection.id, timestamp as i64, blob],
        )?;
        self.counts[index] += 1;
        Ok(())
    }

    /// Close the bag: finalize the table store and emit the sidecar.
    pub fn close(&mut self) -> Result<(), WriterError> {
        let Some(db) = self.db.take() else {
            return Err(WriterError::Usage("bag was not opened".into()));
        };

        let (duration, start, count) = db.query_row(
            "SELECT max(timestamp) - min(timestamp), min(timestamp), count(*) FROM messages",
            [],
            |row| {
                Ok((
                    row.get::<_, Option<i64>>(0)?,
                    row.get::<_, Option<i64>>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            },
        )?;
        db.execute_batch("PRAGMA optimize")?;
        drop(db);

        let mut dbpath = self.dbpath.clone();
        if self.compression_mode == CompressionMode::File {
            let compressed = {
                let mut name = dbpath
                    .file_name()
                    .map_or_else(String::new, |x| x.to_string_lossy().to_string());
                name.push_str(".zstd");
                dbpath.with_file_name(name)
            };
            let infile = File::open(&dbpath)?;
            let mut outfile = File::create(&compressed)?;
            zstd::stream::copy_encode(infile, &mut outfile, 0)?;
            std::fs::remove_file(&dbpath)?;
            dbpath = compressed;
        }

        let metadata = Metadata {
            version: 4,
            storage_identifier: "sqlite3".to_string(),
            relative_file_paths: vec![dbpath
                .file_name()
                .map_or_else(String::new, |x| x.to_string_lossy().to_string())],
            duration: Duration {
                nanoseconds: duration.unwrap_or(0) as u64,
            },
            starting_time: StartingTime {
                nanoseconds_since_epoch: start.unwrap_or(0) as u64,
            },
            message_count: count as u64,
            topics_with_message_count: self
                .connections
                .iter()
                .zip(&self.counts)
                .map(|(conn, count)| {
                    let ConnectionExt::Rosbag2 {
                        serialization_format,
                        offered_qos_profiles,
                    } = &conn.ext
                    else {
                        unreachable!("writer only creates rosbag2 connections");
                    };
                    TopicWithMessageCount {
                        topic_metadata: TopicMetadata {
                            name: conn.topic.clone(),
                            msgtype: conn.msgtype.clone(),
                            serialization_format: serialization_format.clone(),
                            offered_qos_profiles: offered_qos_profiles.clone(),
                        },
                        message_count: *count,
                    }
                })
                .collect(),
            compression_format: match self.compression_mode {
                CompressionMode::None => String::new(),
                _ => "zstd".to_string(),
            },
            compression_mode: self.compression_mode.name().to_string(),
            files: None,
        };
        let info = BagFileInformation {
            rosbag2_bagfile_information: metadata,
        };
        std::fs::write(&self.metapath, serde_yaml::to_string(&info)?)?;
        log::debug!("closed bag {:?}: {count} messages", self.path);
        Ok(())
    }
}
