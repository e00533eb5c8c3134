// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Sidecar metadata file.
//!
//! YAML with a single top-level `rosbag2_bagfile_information` key. Version
//! history of the format:
//!
//! - Version 1: initial format.
//! - Version 2: changed field sizes in the C++ implementation.
//! - Version 3: added compression.
//! - Version 4: added QoS metadata to topics, changed relative file paths.
//! - Version 5: added per file metadata.

use serde::{Deserialize, Serialize};

/// Highest sidecar version understood by the reader.
pub const MAX_VERSION: u32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BagFileInformation {
    pub rosbag2_bagfile_information: Metadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub version: u32,
    pub storage_identifier: String,
    pub relative_file_paths: Vec<String>,
    pub duration: Duration,
    pub starting_time: StartingTime,
    pub message_count: u64,
    pub topics_with_message_count: Vec<TopicWithMessageCount>,
    #[serde(default)]
    pub compression_format: String,
    #[serde(default)]
    pub compression_mode: String,
    /// Per shard metadata, present from version 5 on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileInformation>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Duration {
    pub nanoseconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartingTime {
    pub nanoseconds_since_epoch: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicWithMessageCount {
    pub topic_metadata: TopicMetadata,
    pub message_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub msgtype: String,
    pub serialization_format: String,
    #[serde(default)]
    pub offered_qos_profiles: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInformation {
    pub path: String,
    pub starting_time: StartingTime,
    pub duration: Duration,
    pub message_count: u64,
}

impl Metadata {
    /// Compression format, when any.
    pub fn compression_format(&self) -> Option<&str> {
        (!self.compression_format.is_empty()).then_some(self.compression_format.as_str())
    }

    /// Compression mode normalized to lowercase, when enabled.
    pub fn compression_mode(&self) -> Option<String> {
        let mode = self.compression_mode.to_lowercase();
        (!mode.is_empty() && mode != "none").then_some(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const METADATA: &str = "\
rosbag2_bagfile_information:
  version: 4
  storage_identifier: sqlite3
  relative_file_paths:
    - b2_0.db3
  duration:
    nanoseconds: 624
  starting_time:
    nanoseconds_since_epoch: 42
  message_count: 2
  topics_with_message_count:
    - topic_metadata:
        name: /test
        type: std_msgs/msg/Int8
        serialization_format: cdr
        offered_qos_profiles: \"\"
      message_count: 2
  compression_format: \"\"
  compression_mode: \"\"
";

    #[test]
    fn test_parse_sidecar() {
        let info: BagFileInformation = serde_yaml::from_str(METADATA).expect("parse");
        let metadata = info.rosbag2_bagfile_information;
        assert_eq!(metadata.version, 4);
        assert_eq!(metadata.storage_identifier, "sqlite3");
        assert_eq!(metadata.relative_file_paths, vec!["b2_0.db3"]);
        assert_eq!(metadata.duration.nanoseconds, 624);
        assert_eq!(metadata.starting_time.nanoseconds_since_epoch, 42);
        assert_eq!(metadata.message_count, 2);
        assert_eq!(metadata.topics_with_message_count.len(), 1);
        assert_eq!(
            metadata.topics_with_message_count[0].topic_metadata.msgtype,
            "std_msgs/msg/Int8"
        );
        assert!(metadata.compression_format().is_none());
        assert!(metadata.compression_mode().is_none());
        assert!(metadata.files.is_none());
    }

    #[test]
    fn test_compression_mode_is_case_insensitive() {
        let mut info: BagFileInformation = serde_yaml::from_str(METADATA).expect("parse");
        info.rosbag2_bagfile_information.compression_mode = "FILE".to_string();
        assert_eq!(
            info.rosbag2_bagfile_information.compression_mode(),
            Some("file".to_string())
        );
        info.rosbag2_bagfile_information.compression_mode = "NONE".to_string();
        assert!(info.rosbag2_bagfile_information.compression_mode().is_none());
    }
}
