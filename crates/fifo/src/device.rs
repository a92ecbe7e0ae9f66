//! 字符设备外壳
//!
//! 把 [`Fifo`] 包装成一个可按访问模式打开的设备：以读模式打开得到消费者，
//! 否则得到生产者。打开得到的 [`FifoFile`] 实现 `std::io::Read`/`Write`。

use std::io;

use bitflags::bitflags;
use sync::Interrupt;

use crate::{Endpoint, Fifo, FifoConfig, FifoError, Role};

bitflags! {
    /// 打开模式（对应内核 `f_mode` 的读写位）
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FMode: u32 {
        /// 可读
        const READ = 0x1;
        /// 可写
        const WRITE = 0x2;
    }
}

impl FMode {
    /// 该模式打开时对应的端点角色
    ///
    /// 带有 `READ` 位即为消费者（包括读写同时打开）。
    pub fn role(self) -> Role {
        if self.contains(FMode::READ) {
            Role::Consumer
        } else {
            Role::Producer
        }
    }
}

/// FIFO 字符设备
#[derive(Debug, Clone)]
pub struct FifoDevice {
    fifo: Fifo,
}

impl FifoDevice {
    /// 按配置创建设备
    pub fn new(config: FifoConfig) -> Self {
        Self {
            fifo: Fifo::new(config),
        }
    }

    /// 设备名
    pub fn name(&self) -> &str {
        self.fifo.name()
    }

    /// 底层通道
    pub fn fifo(&self) -> &Fifo {
        &self.fifo
    }

    /// 以 `mode` 打开设备，阻塞直到对端存在
    pub fn open(&self, mode: FMode) -> Result<FifoFile, FifoError> {
        self.open_interruptible(mode, &Interrupt::new())
    }

    /// 可被 `interrupt` 打断的打开
    pub fn open_interruptible(
        &self,
        mode: FMode,
        interrupt: &Interrupt,
    ) -> Result<FifoFile, FifoError> {
        let endpoint = self.fifo.open_interruptible(mode.role(), interrupt)?;
        Ok(FifoFile { endpoint, mode })
    }
}

impl Default for FifoDevice {
    fn default() -> Self {
        Self::new(FifoConfig::default())
    }
}

/// 打开的 FIFO 设备文件
///
/// 关闭即销毁。
#[derive(Debug)]
pub struct FifoFile {
    endpoint: Endpoint,
    mode: FMode,
}

impl FifoFile {
    /// 检查文件是否可读
    pub fn readable(&self) -> bool {
        self.endpoint.role() == Role::Consumer
    }

    /// 检查文件是否可写
    pub fn writable(&self) -> bool {
        self.endpoint.role() == Role::Producer
    }

    /// 打开模式
    pub fn mode(&self) -> FMode {
        self.mode
    }

    /// 底层端点
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl FifoFile {
    /// 单次传输的上限：`io` 允许短读写，超出容量的部分留给调用者下一次
    fn chunk_len(&self, requested: usize) -> usize {
        requested.min(self.endpoint.fifo().capacity())
    }
}

impl io::Read for FifoFile {
    /// 读取 `min(buf.len(), 容量)` 个字节，生产者离开时可能更少；返回 0 表示 EOF
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = self.chunk_len(buf.len());
        Ok(self.endpoint.read_into(&mut buf[..len])?)
    }
}

impl io::Write for FifoFile {
    /// 写入 `buf` 中不超过容量的前缀，返回写入的字节数
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let len = self.chunk_len(buf.len());
        Ok(self.endpoint.write(&buf[..len])?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
