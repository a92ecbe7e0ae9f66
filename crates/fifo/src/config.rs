//! FIFO 设备配置
//!
//! 容量在服务创建时确定，整个生命周期内不可更改。

use crate::FifoError;

/// 设备名
pub const DEVICE_NAME: &str = "fifodev";

/// 默认环形缓冲区容量（字节）
pub const DEFAULT_CAPACITY: usize = 512;

/// 最小容量
pub const MIN_CAPACITY: usize = 1;

/// 最大容量 (1 MiB)
pub const MAX_CAPACITY: usize = 1048576;

/// FIFO 服务配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FifoConfig {
    /// 环形缓冲区容量，也是单次读写的上限
    pub capacity: usize,
    /// 设备名，仅用于日志与设备外壳
    pub name: String,
}

impl FifoConfig {
    /// 以指定容量创建配置
    ///
    /// 容量超出 [`MIN_CAPACITY`]..=[`MAX_CAPACITY`] 时返回 [`FifoError::InvalidLength`]。
    pub fn new(capacity: usize) -> Result<Self, FifoError> {
        if !(MIN_CAPACITY..=MAX_CAPACITY).contains(&capacity) {
            log::warn!("rejecting fifo capacity {}", capacity);
            return Err(FifoError::InvalidLength);
        }
        Ok(Self {
            capacity,
            name: DEVICE_NAME.to_string(),
        })
    }

    /// 替换设备名
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Default for FifoConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            name: DEVICE_NAME.to_string(),
        }
    }
}
