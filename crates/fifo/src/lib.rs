//! 有界阻塞 FIFO
//!
//! 一个类似命名管道的字节通道，以设备的形式暴露成对的生产者/消费者端点：
//!
//! - [`RingBuffer`] - 固定容量的字节环形缓冲区
//! - [`EndpointRegistry`] - 生产者/消费者计数与配对判断
//! - `coordinator` - 协调锁 + 三个等待集合（配对、空间、数据），广播唤醒
//! - [`Fifo`] / [`Endpoint`] - 对外的 open/read/write/close
//! - [`FifoDevice`] / [`FifoFile`] - 按访问模式打开的字符设备外壳
//!
//! # 示例
//!
//! ```
//! use fifo::{Fifo, Role};
//! use std::thread;
//!
//! let fifo = Fifo::with_capacity(16).unwrap();
//! let reader = {
//!     let fifo = fifo.clone();
//!     thread::spawn(move || {
//!         let rx = fifo.open(Role::Consumer).unwrap();
//!         rx.read(5).unwrap()
//!     })
//! };
//!
//! let tx = fifo.open(Role::Producer).unwrap();
//! assert_eq!(tx.write(b"hello").unwrap(), 5);
//! assert_eq!(reader.join().unwrap(), b"hello");
//! ```

mod channel;
pub mod config;
mod coordinator;
mod device;
mod error;
mod registry;
mod ring_buffer;

pub use channel::{Endpoint, Fifo, FifoStats};
pub use config::FifoConfig;
pub use device::{FMode, FifoDevice, FifoFile};
pub use error::FifoError;
pub use registry::{EndpointRegistry, Role};
pub use ring_buffer::{RingBuffer, RingError};

pub use sync::Interrupt;

#[cfg(test)]
mod tests;
