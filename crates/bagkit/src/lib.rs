// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reader, writer, and converter for ROS bag recordings.
//!
//! The crate covers both container generations: the legacy indexed,
//! chunked `.bag` files and the newer sqlite3-backed bag directories with a
//! YAML sidecar. A dynamic type system ingests the two textual schema
//! dialects, and a codec core encodes, decodes, and byte-level converts
//! message payloads between the aligned (CDR) and packed legacy wire
//! formats.
//!
//! # Reading
//!
//! ```no_run
//! use bagkit::highlevel::AnyReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut reader = AnyReader::new(&["recording.bag".into()])?;
//! reader.open()?;
//! for item in reader.messages(None, None, None)? {
//!     let (connection, timestamp, raw) = item?;
//!     println!("{} @ {timestamp}: {} bytes", connection.topic, raw.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Converting
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! bagkit::convert(std::path::Path::new("recording.bag"), None)?;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod convert;
pub mod highlevel;
pub mod interfaces;
pub mod rosbag1;
pub mod rosbag2;
pub mod typesys;

pub use codec::{CodecCache, CodecError, MessageValue, Value};
pub use convert::{convert, ConvertError};
pub use highlevel::{AnyReader, AnyReaderError};
pub use interfaces::{Connection, ConnectionExt, TopicInfo};
pub use typesys::{default_registry, TypeRegistry, TypesysError};
