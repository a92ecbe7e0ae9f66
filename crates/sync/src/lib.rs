//! 同步原语
//!
//! 向 fifo 模块提供可中断的阻塞等待原语：
//!
//! - [`Interrupt`] - 调用者持有的中断令牌，可从其它线程触发以取消阻塞中的等待
//! - [`WaitQueue`] - 一个等待集合：条件变量 + 阻塞者计数 + 释放代数
//! - [`Wake`] - 中断触发时用于唤醒睡眠者的回调 trait
//!
//! # 使用约定
//!
//! `WaitQueue` 不持有被保护的数据，它总是与外部的一把协调锁
//! （`parking_lot::Mutex`）配合使用：所有计数的修改都必须在持有该锁时进行，
//! 睡眠时由条件变量原子地释放该锁，醒来前重新获取。

mod interrupt;
mod wait_queue;

pub use interrupt::*;
pub use wait_queue::*;

pub use parking_lot::{Mutex, MutexGuard};

/// 中断唤醒回调
///
/// 由拥有协调锁的一方实现。[`Interrupt::raise`] 在令牌处于“已挂载”状态时
/// 调用 [`Wake::wake`]，实现者应在持有协调锁的前提下通知其所有等待集合，
/// 以保证睡眠者不会错过这次唤醒。
pub trait Wake: Send + Sync {
    /// 唤醒所有可能正在睡眠的调用者，让它们重新检查中断状态
    fn wake(&self);
}
