//! FIFO 错误类型
//!
//! 各错误码对应标准 POSIX errno 值，可通过 [`FifoError::to_errno()`] 转换。
//! 读到流末尾（EOF）不是错误，而是长度为 0 的成功读取。

use core::fmt;
use std::io;

use crate::RingError;

/// FIFO 操作错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FifoError {
    /// 请求长度超过缓冲区容量 (-EINVAL)
    InvalidLength,
    /// 暂存缓冲区分配失败 (-ENOMEM)
    OutOfMemory,
    /// 没有消费者时写入，或等待期间消费者全部离开 (-EPIPE)
    BrokenPipe,
    /// 阻塞等待被中断 (-EINTR)
    Interrupted,
    /// 在生产者端点上读，或在消费者端点上写 (-EBADF)
    BadEndpoint,
}

impl FifoError {
    /// 转换为系统调用错误码（负数）
    pub fn to_errno(&self) -> isize {
        match self {
            FifoError::Interrupted => -4,
            FifoError::BadEndpoint => -9,
            FifoError::OutOfMemory => -12,
            FifoError::InvalidLength => -22,
            FifoError::BrokenPipe => -32,
        }
    }
}

impl fmt::Display for FifoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            FifoError::InvalidLength => "transfer length exceeds fifo capacity",
            FifoError::OutOfMemory => "cannot allocate staging buffer",
            FifoError::BrokenPipe => "no consumer on the other end",
            FifoError::Interrupted => "wait interrupted",
            FifoError::BadEndpoint => "operation not permitted on this endpoint",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for FifoError {}

/// 通道在调用前已确认空间/数据足够，环形缓冲区拒绝操作意味着长度不合法
impl From<RingError> for FifoError {
    fn from(_: RingError) -> Self {
        FifoError::InvalidLength
    }
}

impl From<FifoError> for io::Error {
    fn from(err: FifoError) -> Self {
        let kind = match err {
            FifoError::InvalidLength => io::ErrorKind::InvalidInput,
            FifoError::OutOfMemory => io::ErrorKind::OutOfMemory,
            FifoError::BrokenPipe => io::ErrorKind::BrokenPipe,
            FifoError::Interrupted => io::ErrorKind::Interrupted,
            FifoError::BadEndpoint => io::ErrorKind::PermissionDenied,
        };
        io::Error::new(kind, err)
    }
}
