// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Table-store bag writer and reader tests.

use bagkit::rosbag2::{
    CompressionFormat, CompressionMode, Reader, ReaderError, Writer, WriterError,
};
use tempfile::tempdir;

#[test]
fn test_no_overwrite() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("bag");
    std::fs::create_dir(&path).expect("mkdir");
    assert!(matches!(Writer::new(&path), Err(WriterError::Usage(_))));
}

#[test]
fn test_usage_errors() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("bag");

    let mut writer = Writer::new(&path).expect("create");
    assert!(matches!(
        writer.add_connection("/test", "std_msgs/msg/Int8", "cdr", ""),
        Err(WriterError::Usage(_))
    ));

    writer.open().expect("open");
    let conn = writer
        .add_connection("/test", "std_msgs/msg/Int8", "cdr", "")
        .expect("add");
    assert!(matches!(
        writer.add_connection("/test", "std_msgs/msg/Int8", "cdr", ""),
        Err(WriterError::Usage(_))
    ));

    let mut unknown = conn.clone();
    unknown.id = 99;
    assert!(matches!(
        writer.write(&unknown, 42, b"\x00"),
        Err(WriterError::Usage(_))
    ));

    assert!(matches!(
        writer.set_compression(CompressionMode::File, CompressionFormat::Zstd),
        Err(WriterError::Usage(_))
    ));
    writer.close().expect("close");
}

#[test]
fn test_write_read_roundtrip() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("bag");

    let mut writer = Writer::new(&path).expect("create");
    writer.open().expect("open");
    let conn = writer
        .add_connection("/test", "std_msgs/msg/Int8", "cdr", "")
        .expect("add");
    writer.write(&conn, 42, &[0x00]).expect("write");
    writer.write(&conn, 666, &[0x01; 4096]).expect("write");
    writer.close().expect("close");

    let mut reader = Reader::new(&path).expect("reader");
    reader.open().expect("open");
    assert_eq!(reader.message_count(), 2);
    assert_eq!(reader.start_time(), 42);
    assert_eq!(reader.duration(), 625);
    assert_eq!(reader.end_time(), 667);

    assert_eq!(reader.connections().len(), 1);
    let connection = &reader.connections()[0];
    assert_eq!(connection.topic, "/test");
    assert_eq!(connection.msgtype, "std_msgs/msg/Int8");
    assert_eq!(connection.msgcount, 2);

    let messages: Vec<_> = reader
        .messages(None, None, None)
        .expect("messages")
        .collect::<Result<_, _>>()
        .expect("read");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].1, 42);
    assert_eq!(messages[0].2.len(), 1);
    assert_eq!(messages[1].1, 666);
    assert_eq!(messages[1].2.len(), 4096);
    reader.close().expect("close");
}

#[test]
fn test_empty_bag() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("bag");

    let mut writer = Writer::new(&path).expect("create");
    writer.open().expect("open");
    writer
        .add_connection("/test", "std_msgs/msg/Int8", "cdr", "")
        .expect("add");
    writer.close().expect("close");

    let reader = Reader::new(&path).expect("reader");
    assert_eq!(reader.message_count(), 0);
    assert_eq!(reader.start_time(), i64::MAX as u64);
    assert_eq!(reader.end_time(), 0);
    assert_eq!(reader.duration(), 0);
}

#[test]
fn test_filtering() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("bag");

    let mut writer = Writer::new(&path).expect("create");
    writer.open().expect("open");
    let foo = writer
        .add_connection("/foo", "std_msgs/msg/Int8", "cdr", "")
        .expect("add");
    let bar = writer
        .add_connection("/bar", "std_msgs/msg/Int8", "cdr", "")
        .expect("add");
    for (time, conn) in [(1u64, &foo), (2, &bar), (3, &foo), (4, &bar)] {
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
    for mode in [
        CompressionMode::None,
        CompressionMode::File,
        CompressionMode::Message,
    ] {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("bag");

        let mut writer = Writer::new(&path).expect("create");
        writer
            .set_compression(mode, CompressionFormat::Zstd)
            .expect("compression");
        writer.open().expect("open");
        let conn = writer
            .add_connection("/test", "std_msgs/msg/Int8", "cdr", "")
            .expect("add");
        writer.write(&conn, 42, &[0x42; 128]).expect("write");
        writer.close().expect("close");

        if mode == CompressionMode::File {
            assert!(path.join("bag.db3.zstd").exists());
            assert!(!path.join("bag.db3").exists());
        }

        let mut reader = Reader::new(&path).expect("reader");
        reader.open().expect("open");
        let messages: Vec<_> = reader
            .messages(None, None, None)
            .expect("messages")
            .collect::<Result<_, _>>()
            .expect("read");
        assert_eq!(messages.len(), 1, "{mode:?}");
        assert_eq!(messages[0].2, vec![0x42; 128], "{mode:?}");
        reader.close().expect("close");
    }
}

#[test]
fn test_metadata_validation() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("bag");
    std::fs::create_dir(&path).expect("mkdir");

    let write_meta = |version: u32, storage: &str, format: &str, path_entry: &str| {
        let text = format!(
            r"rosbag2_bagfile_information:
  version: {version}
  storage_identifier: {storage}
  relative_file_paths: [{path_entry}]
  duration: {{nanoseconds: 0}}
  starting_time: {{nanoseconds_since_epoch: 0}}
  message_count: 0
  topics_with_message_count:
    - topic_metadata:
        name: /test
        type: std_msgs/msg/Int8
        serialization_format: {format}
      message_count: 0
"
        );
        std::fs::write(path.join("metadata.yaml"), text).expect("write metadata");
    };

    std::fs::write(path.join("data.db3"), b"").expect("write shard");

    write_meta(99, "sqlite3", "cdr", "data.db3");
    assert!(matches!(Reader::new(&path), Err(ReaderError::Format(_))));

    write_meta(4, "mcap", "cdr", "data.db3");
    assert!(matches!(Reader::new(&path), Err(ReaderError::Format(_))));

    write_meta(4, "sqlite3", "protobuf", "data.db3");
    assert!(matches!(Reader::new(&path), Err(ReaderError::Format(_))));

    write_meta(4, "sqlite3", "cdr", "missing.db3");
    assert!(matches!(Reader::new(&path), Err(ReaderError::Format(_))));

    write_meta(4, "sqlite3", "cdr", "data.db3");
    assert!(Reader::new(&path).is_ok());
}
