// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Legacy bag writer and reader tests.

use bagkit::rosbag1::{CompressionFormat, Reader, Writer, WriterError};
use tempfile::tempdir;

#[test]
fn test_no_overwrite() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("test.bag");
    std::fs::write(&path, "foo").expect("write");
    assert!(matches!(Writer::new(&path), Err(WriterError::Usage(_))));

    std::fs::remove_file(&path).expect("unlink");
    let mut writer = Writer::new(&path).expect("create");
    std::fs::write(&path, "foo").expect("write");
    assert!(matches!(writer.open(), Err(WriterError::Usage(_))));
}

#[test]
fn test_empty_bag() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("test.bag");

    let mut writer = Writer::new(&path).expect("create");
    writer.open().expect("open");
    writer.close().expect("close");

    let data = std::fs::read(&path).expect("read");
    assert_eq!(data.len(), 13 + 4096);

    let mut reader = Reader::new(&path).expect("reader");
    reader.open().expect("open");
    assert_eq!(reader.message_count(), 0);
    assert_eq!(reader.duration(), 0);
    assert_eq!(reader.start_time(), i64::MAX as u64);
    assert_eq!(reader.end_time(), 0);
    reader.close().expect("close");
}

#[test]
fn test_usage_errors() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("test.bag");

    let mut writer = Writer::new(&path).expect("create");
    assert!(matches!(
        writer.add_connection("/foo", "test_msgs/msg/Test", Some("DEF"), Some("HASH"), None, None),
        Err(WriterError::Usage(_))
    ));

    writer.open().expect("open");
    let conn = writer
        .add_connection("/foo", "test_msgs/msg/Test", Some("DEF"), Some("HASH"), None, None)
        .expect("add");
    assert_eq!(conn.id, 0);

    // Identical connections can only be added once.
    assert!(matches!(
        writer.add_connection("/foo", "test_msgs/msg/Test", Some("DEF"), Some("HASH"), None, None),
        Err(WriterError::Usage(_))
    ));

    // Differing metadata makes a new connection.
    let latched = writer
        .add_connection(
            "/foo",
            "test_msgs/msg/Test",
            Some("DEF"),
            Some("HASH"),
            None,
            Some(1),
        )
        .expect("add latched");
    assert_eq!(latched.id, 1);

    let mut unknown = conn.clone();
    unknown.id = 99;
    assert!(matches!(
        writer.write(&unknown, 42, b"DEADBEEF"),
        Err(WriterError::Usage(_))
    ));
    writer.close().expect("close");
}

#[test]
fn test_generated_message_definition() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("test.bag");

    let mut writer = Writer::new(&path).expect("create");
    writer.open().expect("open");
    let conn = writer
        .add_connection("/foo", "std_msgs/msg/Int8", None, None, None, None)
        .expect("add");
    assert_eq!(conn.msgtype, "std_msgs/Int8");
    writer.close().expect("close");

    let data = std::fs::read(&path).expect("read");
    let needle = b"int8 data";
    assert_eq!(data.windows(needle.len()).filter(|x| x == needle).count(), 2);
    let md5 = b"27ffa0c9c4b8fb8492252bcad9e5c57b";
    assert_eq!(data.windows(md5.len()).filter(|x| x == md5).count(), 2);
}

#[test]
fn test_write_read_roundtrip() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("test.bag");

    let mut writer = Writer::new(&path).expect("create");
    writer.open().expect("open");
    let conn = writer
        .add_connection("/foo", "std_msgs/msg/Int8", None, None, None, None)
        .expect("add");
    let latched = writer
        .add_connection("/foo", "std_msgs/msg/Int8", None, None, None, Some(1))
        .expect("add latched");
    writer.write(&conn, 42, b"\x2a").expect("write");
    writer.write(&latched, 42, b"\x2b").expect("write");
    writer.close().expect("close");

    let mut reader = Reader::new(&path).expect("reader");
    reader.open().expect("open");
    assert_eq!(reader.message_count(), 2);
    assert_eq!(reader.start_time(), 42);
    assert_eq!(reader.end_time(), 43);
    assert_eq!(reader.duration(), 1);

    assert_eq!(reader.connections().len(), 2);
    assert_eq!(reader.connections()[0].msgtype, "std_msgs/msg/Int8");
    assert_eq!(reader.connections()[0].msgcount, 1);

    let topics = reader.topics();
    assert_eq!(topics.len(), 1);
    let info = &topics["/foo"];
    assert_eq!(info.msgcount, 2);
    assert_eq!(info.msgtype.as_deref(), Some("std_msgs/msg/Int8"));
    assert_eq!(info.connections.len(), 2);

    let messages: Vec<_> = reader
        .messages(None, None, None)
        .expect("messages")
        .collect::<Result<_, _>>()
        .expect("read");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].1, 42);
    assert_eq!(messages[0].2, b"\x2a");
    assert_eq!(messages[1].2, b"\x2b");
    reader.close().expect("close");
}

#[test]
fn test_filtering() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("test.bag");

    let mut writer = Writer::new(&path).expect("create");
    writer.open().expect("open");
    let foo = writer
        .add_connection("/foo", "std_msgs/msg/Int8", None, None, None, None)
        .expect("add");
    let bar = writer
        .add_connection("/bar", "std_msgs/msg/Int8", None, None, None, None)
        .expect("add");
    for (time, conn) in [(1, &foo), (2, &bar), (3, &foo), (4, &bar)] {
        writer.write(conn, time, &[time as u8]).expect("write");
    }
    writer.close().expect("close");

    let mut reader = Reader::new(&path).expect("reader");
    reader.open().expect("open");

    let bar_conn = reader
        .connections()
        .iter()
        .find(|x| x.topic == "/bar")
        .expect("bar connection")
        .clone();
    let times: Vec<u64> = reader
        .messages(Some(&[bar_conn]), None, None)
        .expect("messages")
        .map(|x| x.expect("read").1)
        .collect();
    assert_eq!(times, vec![2, 4]);

    let times: Vec<u64> = reader
        .messages(None, Some(2), Some(4))
        .expect("messages")
        .map(|x| x.expect("read").1)
        .collect();
    assert_eq!(times, vec![2, 3]);
    reader.close().expect("close");
}

#[test]
fn test_compression_modes() {
    for format in [None, Some(CompressionFormat::Bz2), Some(CompressionFormat::Lz4)] {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("test.bag");

        let mut writer = Writer::new(&path).expect("create");
        if let Some(format) = format {
            writer.set_compression(format).expect("compression");
        }
        writer.open().expect("open");
        let conn = writer
            .add_connection("/foo", "std_msgs/msg/Int8", None, None, None, None)
            .expect("add");
        writer.write(&conn, 42, b"\x42").expect("write");
        writer.close().expect("close");

        let name = format.map_or("none", |x| match x {
            CompressionFormat::Bz2 => "bz2",
            CompressionFormat::Lz4 => "lz4",
        });
        let data = std::fs::read(&path).expect("read");
        let needle = format!("compression={name}");
        assert_eq!(
            data.windows(needle.len()).filter(|x| *x == needle.as_bytes()).count(),
            1,
            "{name}"
        );

        let mut reader = Reader::new(&path).expect("reader");
        reader.open().expect("open");
        let messages: Vec<_> = reader
            .messages(None, None, None)
            .expect("messages")
            .collect::<Result<_, _>>()
            .expect("read");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].2, b"\x42");
        reader.close().expect("close");
    }
}

#[test]
fn test_multiple_chunks() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("test.bag");

    let mut writer = Writer::new(&path).expect("create");
    writer.open().expect("open");
    writer.chunk_threshold = 256;
    let conn = writer
        .add_connection("/foo", "std_msgs/msg/Int8", None, None, None, None)
        .expect("add");
    for time in 0..16 {
        writer.write(&conn, time, &[time as u8; 64]).expect("write");
    }
    writer.close().expect("close");

    let mut reader = Reader::new(&path).expect("reader");
    reader.open().expect("open");
    assert_eq!(reader.message_count(), 16);
    let times: Vec<u64> = reader
        .messages(None, None, None)
        .expect("messages")
        .map(|x| x.expect("read").1)
        .collect();
    assert_eq!(times, (0..16).collect::<Vec<_>>());
    reader.close().expect("close");
}
