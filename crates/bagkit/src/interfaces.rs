// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared reader/writer interfaces.

use std::sync::Arc;

/// Container specific connection metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionExt {
    /// Legacy bag connection extensions.
    Rosbag1 {
        callerid: Option<String>,
        latching: Option<u32>,
    },
    /// Table-store bag connection extensions.
    Rosbag2 {
        serialization_format: String,
        offered_qos_profiles: String,
    },
}

/// A binding of topic and message type to a stream of messages within a bag.
///
/// `id` is unique within one owner only; `owner` is an opaque tag the
/// unified reader uses to route messages back to the reader that produced
/// the connection.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: u32,
    pub topic: String,
    pub msgtype: String,
    pub msgdef: String,
    pub md5sum: String,
    pub msgcount: u64,
    pub ext: ConnectionExt,
    pub owner: usize,
}

/// Summary of one topic across connections.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicInfo {
    /// Message type, when all connections agree.
    pub msgtype: Option<String>,
    /// Message definition, when all connections agree.
    pub msgdef: Option<String>,
    /// Total message count.
    pub msgcount: u64,
    /// Connections carrying the topic.
    pub connections: Vec<Arc<Connection>>,
}
