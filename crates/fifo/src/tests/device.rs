use super::*;
use std::io::{self, ErrorKind, Read, Write};

fn open_files(dev: &FifoDevice) -> (FifoFile, FifoFile) {
    let reader = {
        let dev = dev.clone();
        thread::spawn(move || dev.open(FMode::READ))
    };
    let writer = dev.open(FMode::WRITE).unwrap();
    let reader = join_within(reader, TIMEOUT).unwrap();
    (writer, reader)
}

#[test]
fn test_fmode_selects_role() {
    assert_eq!(FMode::READ.role(), Role::Consumer);
    assert_eq!((FMode::READ | FMode::WRITE).role(), Role::Consumer);
    assert_eq!(FMode::WRITE.role(), Role::Producer);
}

#[test]
fn test_default_device() {
    let dev = FifoDevice::default();
    assert_eq!(dev.name(), config::DEVICE_NAME);
    assert_eq!(dev.fifo().capacity(), config::DEFAULT_CAPACITY);
}

#[test]
fn test_file_read_write() {
    let dev = FifoDevice::new(FifoConfig::new(16).unwrap());
    let (mut writer, mut reader) = open_files(&dev);

    assert!(writer.writable() && !writer.readable());
    assert!(reader.readable() && !reader.writable());
    assert_eq!(writer.mode(), FMode::WRITE);

    writer.write_all(b"device").unwrap();
    writer.flush().unwrap();

    let mut buf = [0u8; 6];
    reader.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, b"device");
}

#[test]
fn test_file_errors_map_to_io_kinds() {
    let dev = FifoDevice::new(FifoConfig::new(4).unwrap());
    let (mut writer, mut reader) = open_files(&dev);

    let err = reader.write(b"x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);

    // 超长请求在端点层面仍被拒绝，io 层面只会截断
    let err = io::Error::from(writer.endpoint().write(b"too long").unwrap_err());
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    drop(reader);
    let err = writer.write(b"x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BrokenPipe);
}

#[test]
fn test_file_read_stops_at_eof() {
    let dev = FifoDevice::new(FifoConfig::new(8).unwrap());
    let (mut writer, mut reader) = open_files(&dev);

    writer.write_all(b"tail").unwrap();
    drop(writer);

    let mut buf = [0u8; 8];
    assert_eq!(reader.read(&mut buf).unwrap(), 4);
    assert_eq!(&buf[..4], b"tail");
    assert_eq!(reader.read(&mut buf).unwrap(), 0);
}

#[test]
fn test_file_read_to_end_with_oversized_buffer() {
    let dev = FifoDevice::new(FifoConfig::new(8).unwrap());
    let (mut writer, mut reader) = open_files(&dev);

    writer.write_all(b"tail").unwrap();
    drop(writer);

    let mut out = Vec::new();
    assert_eq!(reader.read_to_end(&mut out).unwrap(), 4);
    assert_eq!(out, b"tail");
}

#[test]
fn test_file_oversized_transfers_are_chunked() {
    let dev = FifoDevice::new(FifoConfig::new(8).unwrap());
    let (mut writer, mut reader) = open_files(&dev);

    let mut buf = [0u8; 32];
    assert_eq!(writer.write(b"0123456789").unwrap(), 8);
    assert_eq!(reader.read(&mut buf).unwrap(), 8);
    assert_eq!(&buf[..8], b"01234567");

    let payload: Vec<u8> = (0..100).collect();
    let sink = thread::spawn(move || {
        let mut out = Vec::new();
        reader.read_to_end(&mut out).map(|_| out)
    });
    writer.write_all(&payload).unwrap();
    drop(writer);

    assert_eq!(join_within(sink, TIMEOUT).unwrap(), payload);
}

#[test]
fn test_io_copy_through_device() {
    let dev = FifoDevice::new(FifoConfig::new(8).unwrap());
    let (mut writer, mut reader) = open_files(&dev);

    let source: Vec<u8> = b"copied through a small fifo".to_vec();
    let feeder = {
        let source = source.clone();
        thread::spawn(move || {
            io::copy(&mut source.as_slice(), &mut writer)
        })
    };

    let mut out = Vec::new();
    let copied = io::copy(&mut reader, &mut out).unwrap();
    assert_eq!(join_within(feeder, TIMEOUT).unwrap(), source.len() as u64);
    assert_eq!(copied, source.len() as u64);
    assert_eq!(out, source);
}

#[test]
fn test_error_codes() {
    assert_eq!(FifoError::Interrupted.to_errno(), -4);
    assert_eq!(FifoError::BadEndpoint.to_errno(), -9);
    assert_eq!(FifoError::OutOfMemory.to_errno(), -12);
    assert_eq!(FifoError::InvalidLength.to_errno(), -22);
    assert_eq!(FifoError::BrokenPipe.to_errno(), -32);
}

#[test]
fn test_config_bounds() {
    assert_eq!(FifoConfig::new(0), Err(FifoError::InvalidLength));
    assert_eq!(
        FifoConfig::new(config::MAX_CAPACITY + 1),
        Err(FifoError::InvalidLength)
    );
    let cfg = FifoConfig::new(config::MAX_CAPACITY).unwrap().with_name("fifo0");
    assert_eq!(cfg.name, "fifo0");
    assert_eq!(Fifo::new(cfg).name(), "fifo0");
}
