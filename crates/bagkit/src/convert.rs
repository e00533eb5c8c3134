// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Lossless conversion between the two bag container versions.
//!
//! Connections are mapped and deduplicated, payloads are converted with the
//! byte-level movers without going through decode and re-encode.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::codec::{cdr_to_ros1, ros1_to_cdr, CodecCache, CodecError};
use crate::interfaces::{Connection, ConnectionExt};
use crate::typesys::msg::{generate_msgdef, get_types_from_msg};
use crate::typesys::{default_registry, TypeRegistry, TypesysError};
use crate::{rosbag1, rosbag2};

/// QoS profile attached to upgraded latching connections.
const LATCH: &str = "\
- history: 3
  depth: 0
  reliability: 1
  durability: 1
  deadline:
    sec: 2147483647
    nsec: 4294967295
  lifespan:
    sec: 2147483647
    nsec: 4294967295
  liveliness: 1
  liveliness_lease_duration:
    sec: 2147483647
    nsec: 4294967295
  avoid_ros_namespace_conventions: false";

/// Errors raised by the top-level convert operation.
///
/// Underlying reader, writer, and codec errors are wrapped so callers can
/// discriminate the failing stage.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("output path {0:?} exists already")]
    DestinationExists(PathBuf),
    #[error("reading source bag: {0}")]
    Reader1(#[from] rosbag1::ReaderError),
    #[error("reading source bag: {0}")]
    Reader2(#[from] rosbag2::ReaderError),
    #[error("writing destination bag: {0}")]
    Writer1(#[from] rosbag1::WriterError),
    #[error("writing destination bag: {0}")]
    Writer2(#[from] rosbag2::WriterError),
    #[error("converting rosbag: {0}")]
    Codec(#[from] CodecError),
    #[error("converting rosbag: {0}")]
    Typesys(#[from] TypesysError),
}

/// Candidate destination connection for an upgrade.
fn upgrade_connection(rconn: &Connection) -> Connection {
    let latching = match &rconn.ext {
        ConnectionExt::Rosbag1 { latching, .. } => latching.unwrap_or(0) != 0,
        ConnectionExt::Rosbag2 { .. } => false,
    };
    Connection {
        id: rconn.id,
        topic: rconn.topic.clone(),
        msgtype: rconn.msgtype.clone(),
        msgdef: String::new(),
        md5sum: String::new(),
        msgcount: 0,
        ext: ConnectionExt::Rosbag2 {
            serialization_format: "cdr".to_string(),
            offered_qos_profiles: if latching { LATCH.to_string() } else { String::new() },
        },
        owner: 0,
    }
}

/// Candidate destination connection for a downgrade.
fn downgrade_connection(
    rconn: &Connection,
    registry: &TypeRegistry,
) -> Result<Connection, TypesysError> {
    let (msgdef, md5sum) = generate_msgdef(&rconn.msgtype, registry)?;
    let latching = match &rconn.ext {
        ConnectionExt::Rosbag2 {
            offered_qos_profiles,
            ..
        } => u32::from(offered_qos_profiles.contains("durability: 1")),
        ConnectionExt::Rosbag1 { .. } => 0,
    };
    Ok(Connection {
        id: rconn.id,
        topic: rconn.topic.clone(),
        msgtype: rconn.msgtype.clone(),
        msgdef,
        md5sum,
        msgcount: 0,
        ext: ConnectionExt::Rosbag1 {
            callerid: None,
            latching: Some(latching),
        },
        owner: 0,
    })
}

/// Upgrade a legacy bag into a table-store bag.
fn convert_1to2(src: &Path, dst: &Path) -> Result<(), ConvertError> {
    let mut reader = rosbag1::Reader::new(src)?;
    reader.open()?;
    let mut writer = rosbag2::Writer::new(dst)?;
    writer.open()?;

    let mut registry = TypeRegistry::standard();
    let cache = CodecCache::new();
    let mut connmap: HashMap<u32, Connection> = HashMap::new();

    let mut types = Vec::new();
    for rconn in reader.connections().to_vec() {
        let candidate = upgrade_connection(&rconn);
        let present = writer
            .connections()
            .iter()
            .find(|x| {
                x.topic == candidate.topic
                    && x.msgtype == candidate.msgtype
                    && x.ext == candidate.ext
            })
            .cloned();
        let conn = match present {
            Some(conn) => conn,
            None => {
                let ConnectionExt::Rosbag2 {
                    serialization_format,
                    offered_qos_profiles,
                } = &candidate.ext
                else {
                    unreachable!("upgrade produces rosbag2 connections");
                };
                writer.add_connection(
                    &candidate.topic,
                    &candidate.msgtype,
                    serialization_format,
                    offered_qos_profiles,
                )?
            }
        };
        connmap.insert(rconn.id, conn);
        types.extend(get_types_from_msg(&rconn.msgdef, &rconn.msgtype)?);
    }
    registry.register(types)?;

    let mut messages = reader.messages(None, None, None)?;
    while let Some(item) = messages.next() {
        let (rconn, timestamp, data) = item?;
        let data = ros1_to_cdr(&data, &rconn.msgtype, &registry, &cache)?;
        writer.write(&connmap[&rconn.id], timestamp, &data)?;
    }
    drop(messages);

    writer.close()?;
    reader.close()?;
    Ok(())
}

/// Downgrade a table-store bag into a legacy bag.
fn convert_2to1(src: &Path, dst: &Path) -> Result<(), ConvertError> {
    let mut reader = rosbag2::Reader::new(src)?;
    reader.open()?;
    let mut writer = rosbag1::Writer::new(dst)?;
    writer.open()?;

    let registry = default_registry();
    let cache = CodecCache::new();
    let mut connmap: HashMap<u32, Connection> = HashMap::new();

    for rconn in reader.connections().to_vec() {
        let candidate = downgrade_connection(&rconn, registry)?;
        let candidate_latching = match &candidate.ext {
            ConnectionExt::Rosbag1 { latching, .. } => *latching,
            ConnectionExt::Rosbag2 { .. } => None,
        };
        let present = writer
            .connections()
            .iter()
            .find(|x| {
                let latching = match &x.ext {
                    ConnectionExt::Rosbag1 { latching, .. } => *latching,
                    ConnectionExt::Rosbag2 { .. } => None,
                };
                x.topic == candidate.topic
                    && x.md5sum == candidate.md5sum
                    && latching == candidate_latching
            })
            .cloned();
        let conn = match present {
            Some(conn) => conn,
            None => writer.add_connection(
                &candidate.topic,
                &candidate.msgtype,
                Some(&candidate.msgdef),
                Some(&candidate.md5sum),
                None,
                candidate_latching,
            )?,
        };
        connmap.insert(rconn.id, conn);
    }

    for item in reader.messages(None, None, None)? {
        let (rconn, timestamp, data) = item?;
        let data = cdr_to_ros1(&data, &rconn.msgtype, registry, &cache)?;
        writer.write(&connmap[&rconn.id], timestamp, &data)?;
    }

    writer.close()?;
    reader.close()?;
    Ok(())
}

/// Convert between the two bag container versions.
///
/// The direction is inferred from the source suffix: legacy `.bag` files
/// are upgraded, everything else is downgraded. The destination defaults to
/// the source path with the suffix swapped and must not exist.
pub fn convert(src: &Path, dst: Option<&Path>) -> Result<(), ConvertError> {
    let upgrade = src.extension().is_some_and(|x| x == "bag");
    let dst = dst.map_or_else(
        || {
            if upgrade {
                src.with_extension("")
            } else {
                src.with_extension("bag")
            }
        },
        Path::to_path_buf,
    );
    if dst.exists() {
        return Err(ConvertError::DestinationExists(dst));
    }
    if upgrade {
        convert_1to2(src, &dst)
    } else {
        convert_2to1(src, &dst)
    }
}
