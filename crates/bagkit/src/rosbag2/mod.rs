// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Table-store bag container I/O.
//!
//! A bag is a directory holding a `metadata.yaml` sidecar and one or more
//! sqlite3 shards with a fixed two-table schema. Shards may be zstd
//! compressed as whole files or per message blob.

pub(crate) mod metadata;
mod reader;
mod writer;

pub use metadata::Metadata;
pub use reader::{Messages, Reader, ReaderError};
pub use writer::{CompressionFormat, CompressionMode, Writer, WriterError};

/// Shard table schema.
pub(crate) const SCHEMA: &str = "\
CREATE TABLE topics(
  id INTEGER PRIMARY KEY,
  name TEXT NOT NULL,
  type TEXT NOT NULL,
  serialization_format TEXT NOT NULL,
  offered_qos_profiles TEXT NOT NULL
);
CREATE TABLE messages(
  id INTEGER PRIMARY KEY,
  topic_id INTEGER NOT NULL,
  timestamp INTEGER NOT NULL,
  data BLOB NOT NULL
);
CREATE INDEX timestamp_idx ON messages (timestamp ASC);
";
