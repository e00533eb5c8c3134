// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Unified reader tests.

use std::path::PathBuf;

use bagkit::codec::{serialize_cdr, CodecCache, MessageValue, Value};
use bagkit::highlevel::{AnyReader, AnyReaderError};
use bagkit::typesys::default_registry;
use bagkit::{rosbag1, rosbag2};
use tempfile::tempdir;

/// Write one legacy bag with int8 messages on the given topics.
fn write_bag1(path: &PathBuf, messages: &[(u64, &str)]) {
    let mut writer = rosbag1::Writer::new(path).expect("create");
    writer.open().expect("open");
    let mut connections = std::collections::HashMap::new();
    for (_, topic) in messages {
        if !connections.contains_key(topic) {
            let conn = writer
                .add_connection(topic, "std_msgs/msg/Int8", None, None, None, None)
                .expect("add");
            connections.insert(*topic, conn);
        }
    }
    for (time, topic) in messages {
        // Packed wire int8 is the single payload byte.
        writer
            .write(&connections[topic], *time, &[*time as u8])
            .expect("write");
    }
    writer.close().expect("close");
}

#[test]
fn test_merge_across_three_bags() {
    let dir = tempdir().expect("tempdir");
    let bag1 = dir.path().join("bag1.bag");
    let bag2 = dir.path().join("bag2.bag");
    let bag3 = dir.path().join("bag3.bag");
    write_bag1(&bag1, &[(1, "/topic1"), (2, "/topic2"), (9, "/topic1")]);
    write_bag1(&bag2, &[(5, "/topic1")]);
    write_bag1(&bag3, &[(15, "/topic2")]);

    let mut reader = AnyReader::new(&[bag1, bag2, bag3]).expect("reader");
    reader.open().expect("open");

    assert_eq!(reader.message_count(), 5);
    assert_eq!(reader.start_time(), 1);
    assert_eq!(reader.end_time(), 16);
    assert_eq!(reader.duration(), 15);

    let times: Vec<u64> = reader
        .messages(None, None, None)
        .expect("messages")
        .map(|x| x.expect("read").1)
        .collect();
    assert_eq!(times, vec![1, 2, 5, 9, 15]);

    let topics = reader.topics();
    assert_eq!(topics.len(), 2);
    assert_eq!(topics["/topic1"].msgcount, 3);
    assert_eq!(topics["/topic1"].msgtype.as_deref(), Some("std_msgs/msg/Int8"));
    assert_eq!(topics["/topic2"].msgcount, 2);

    reader.close().expect("close");
}

#[test]
fn test_connection_filtering_delegates_per_owner() {
    let dir = tempdir().expect("tempdir");
    let bag1 = dir.path().join("bag1.bag");
    let bag2 = dir.path().join("bag2.bag");
    write_bag1(&bag1, &[(1, "/topic1"), (2, "/topic2")]);
    write_bag1(&bag2, &[(5, "/topic1")]);

    let mut reader = AnyReader::new(&[bag1, bag2]).expect("reader");
    reader.open().expect("open");

    let selected: Vec<_> = reader
        .connections()
        .iter()
        .filter(|x| x.topic == "/topic1")
        .cloned()
        .collect();
    assert_eq!(selected.len(), 2);
    assert_ne!(selected[0].owner, selected[1].owner);

    let times: Vec<u64> = reader
        .messages(Some(&selected), None, None)
        .expect("messages")
        .map(|x| x.expect("read").1)
        .collect();
    assert_eq!(times, vec![1, 5]);

    reader.close().expect("close");
}

#[test]
fn test_deserialize_from_legacy_bag() {
    let dir = tempdir().expect("tempdir");
    let bag = dir.path().join("bag.bag");
    write_bag1(&bag, &[(7, "/topic1")]);

    let mut reader = AnyReader::new(&[bag]).expect("reader");
    reader.open().expect("open");

    let (conn, _, raw) = reader
        .messages(None, None, None)
        .expect("messages")
        .next()
        .expect("one message")
        .expect("read");
    let msgtype = conn.msgtype.clone();
    let message = reader.deserialize(&raw, &msgtype).expect("deserialize");
    assert_eq!(message.get("data").and_then(Value::as_i8), Some(7));

    reader.close().expect("close");
}

#[test]
fn test_deserialize_from_table_store_bag() {
    let dir = tempdir().expect("tempdir");
    let bag = dir.path().join("bag");

    let mut record = MessageValue::new("std_msgs/msg/Int8");
    record.set("data", 42i8);
    let raw = serialize_cdr(
        &record,
        "std_msgs/msg/Int8",
        true,
        default_registry(),
        &CodecCache::new(),
    )
    .expect("serialize");

    let mut writer = rosbag2::Writer::new(&bag).expect("create");
    writer.open().expect("open");
    let conn = writer
        .add_connection("/test", "std_msgs/msg/Int8", "cdr", "")
        .expect("add");
    writer.write(&conn, 42, &raw).expect("write");
    writer.close().expect("close");

    let mut reader = AnyReader::new(&[bag]).expect("reader");
    reader.open().expect("open");
    let (conn, timestamp, raw) = reader
        .messages(None, None, None)
        .expect("messages")
        .next()
        .expect("one message")
        .expect("read");
    assert_eq!(timestamp, 42);
    let msgtype = conn.msgtype.clone();
    let message = reader.deserialize(&raw, &msgtype).expect("deserialize");
    assert_eq!(message.get("data").and_then(Value::as_i8), Some(42));

    reader.close().expect("close");
}

#[test]
fn test_path_validation() {
    let dir = tempdir().expect("tempdir");

    assert!(matches!(
        AnyReader::new(&[]),
        Err(AnyReaderError::Usage(_))
    ));

    let missing = dir.path().join("missing.bag");
    assert!(matches!(
        AnyReader::new(&[missing]),
        Err(AnyReaderError::Usage(_))
    ));

    // Multiple table-store bags are not supported.
    let bag_a = dir.path().join("a");
    let bag_b = dir.path().join("b");
    for bag in [&bag_a, &bag_b] {
        let mut writer = rosbag2::Writer::new(bag).expect("create");
        writer.open().expect("open");
        writer.close().expect("close");
    }
    assert!(matches!(
        AnyReader::new(&[bag_a, bag_b]),
        Err(AnyReaderError::Usage(_))
    ));
}
