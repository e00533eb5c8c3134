// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Container conversion tests.

use bagkit::codec::{cdr_to_ros1, serialize_cdr, CodecCache, MessageValue};
use bagkit::convert::{convert, ConvertError};
use bagkit::interfaces::ConnectionExt;
use bagkit::typesys::default_registry;
use bagkit::{rosbag1, rosbag2};
use tempfile::tempdir;

fn int8_aligned(value: i8) -> Vec<u8> {
    let mut record = MessageValue::new("std_msgs/msg/Int8");
    record.set("data", value);
    serialize_cdr(
        &record,
        "std_msgs/msg/Int8",
        true,
        default_registry(),
        &CodecCache::new(),
    )
    .expect("serialize")
}

fn int8_packed(value: i8) -> Vec<u8> {
    cdr_to_ros1(
        &int8_aligned(value),
        "std_msgs/msg/Int8",
        default_registry(),
        &CodecCache::new(),
    )
    .expect("convert")
}

#[test]
fn test_destination_must_not_exist() {
    let dir = tempdir().expect("tempdir");
    let src = dir.path().join("test.bag");
    std::fs::write(&src, "").expect("write");
    let dst = dir.path().join("out");
    std::fs::create_dir(&dst).expect("mkdir");
    assert!(matches!(
        convert(&src, Some(&dst)),
        Err(ConvertError::DestinationExists(_))
    ));
}

#[test]
fn test_upgrade() {
    let dir = tempdir().expect("tempdir");
    let src = dir.path().join("test.bag");
    let dst = dir.path().join("out");

    let mut writer = rosbag1::Writer::new(&src).expect("create");
    writer.open().expect("open");
    let plain = writer
        .add_connection("/test", "std_msgs/msg/Int8", None, None, None, None)
        .expect("add");
    let latched = writer
        .add_connection("/test", "std_msgs/msg/Int8", None, None, None, Some(1))
        .expect("add latched");
    writer.write(&plain, 42, &int8_packed(1)).expect("write");
    writer.write(&latched, 43, &int8_packed(2)).expect("write");
    writer.close().expect("close");

    convert(&src, Some(&dst)).expect("convert");

    let mut reader = rosbag2::Reader::new(&dst).expect("reader");
    reader.open().expect("open");
    // The latched source connection maps to its own destination connection.
    assert_eq!(reader.connections().len(), 2);
    let latched_qos = reader
        .connections()
        .iter()
        .find_map(|x| match &x.ext {
            ConnectionExt::Rosbag2 {
                offered_qos_profiles,
                ..
            } if !offered_qos_profiles.is_empty() => Some(offered_qos_profiles.clone()),
            _ => None,
        })
        .expect("latched connection");
    assert!(latched_qos.contains("durability: 1"));

    let messages: Vec<_> = reader
        .messages(None, None, None)
        .expect("messages")
        .collect::<Result<_, _>>()
        .expect("read");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].1, 42);
    assert_eq!(messages[0].2, int8_aligned(1));
    assert_eq!(messages[1].2, int8_aligned(2));
    reader.close().expect("close");
}

#[test]
fn test_downgrade() {
    let dir = tempdir().expect("tempdir");
    let src = dir.path().join("bag2");
    let dst = dir.path().join("out.bag");

    let mut writer = rosbag2::Writer::new(&src).expect("create");
    writer.open().expect("open");
    let conn = writer
        .add_connection("/test", "std_msgs/msg/Int8", "cdr", "")
        .expect("add");
    writer.write(&conn, 42, &int8_aligned(7)).expect("write");
    writer.close().expect("close");

    convert(&src, Some(&dst)).expect("convert");

    let mut reader = rosbag1::Reader::new(&dst).expect("reader");
    reader.open().expect("open");
    assert_eq!(reader.connections().len(), 1);
    let connection = reader.connections()[0].clone();
    assert_eq!(connection.msgtype, "std_msgs/msg/Int8");
    assert_eq!(connection.md5sum, "27ffa0c9c4b8fb8492252bcad9e5c57b");
    assert_eq!(
        connection.ext,
        ConnectionExt::Rosbag1 {
            callerid: None,
            latching: Some(0),
        }
    );

    let messages: Vec<_> = reader
        .messages(None, None, None)
        .expect("messages")
        .collect::<Result<_, _>>()
        .expect("read");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].1, 42);
    assert_eq!(messages[0].2, int8_packed(7));
    reader.close().expect("close");
}

#[test]
fn test_full_circle() {
    let dir = tempdir().expect("tempdir");
    let src = dir.path().join("test.bag");
    let mid = dir.path().join("mid");
    let back = dir.path().join("back.bag");

    let mut writer = rosbag1::Writer::new(&src).expect("create");
    writer.open().expect("open");
    let conn = writer
        .add_connection("/test", "std_msgs/msg/Int8", None, None, None, None)
        .expect("add");
    for time in 0..4 {
        writer
            .write(&conn, time, &int8_packed(time as i8))
            .expect("write");
    }
    writer.close().expect("close");

    convert(&src, Some(&mid)).expect("upgrade");
    convert(&mid, Some(&back)).expect("downgrade");

    let mut first = rosbag1::Reader::new(&src).expect("reader");
    first.open().expect("open");
    let mut second = rosbag1::Reader::new(&back).expect("reader");
    second.open().expect("open");

    let left: Vec<_> = first
        .messages(None, None, None)
        .expect("messages")
        .map(|x| {
            let (_, time, data) = x.expect("read");
            (time, data)
        })
        .collect();
    let right: Vec<_> = second
        .messages(None, None, None)
        .expect("messages")
        .map(|x| {
            let (_, time, data) = x.expect("read");
            (time, data)
        })
        .collect();
    assert_eq!(left, right);

    first.close().expect("close");
    second.close().expect("close");
}
