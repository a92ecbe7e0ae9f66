//! 等待队列
//!
//! [`WaitQueue`] 是一个“等待集合”：阻塞者计数 + 与之配套的释放机制。
//!
//! ```text
//! 睡眠方（持有协调锁）:            唤醒方（持有协调锁）:
//!   blocked += 1                     released = blocked
//!   记录当前释放代数 ticket           blocked = 0
//!   挂载中断目标                      generation += 1
//!   loop {                           notify_all
//!       有待处理中断 -> blocked -= 1, 返回 Interrupted
//!       cond.wait(guard)   <- 原子地释放/重新获取协调锁
//!       generation != ticket -> 返回 Notified
//!   }
//! ```
//!
//! 计数只在持有协调锁时修改，因此 `wake_all` 释放的数量永远等于
//! 当时真正阻塞的调用者数量。释放代数用来区分“被唤醒方释放”和
//! “被中断/伪唤醒”：只有前者的计数已由唤醒方扣除。

use core::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::{Condvar, MutexGuard};

use crate::{Interrupt, Wake};

/// 一次睡眠的结束原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wakeup {
    /// 被 [`WaitQueue::wake_all`] 释放，调用者应重新检查条件
    Notified,
    /// 睡眠被中断，计数已回滚
    Interrupted,
}

/// 等待集合
///
/// 只能与同一把协调锁一起使用：`sleep` 与 `wake_all` 的调用者都必须持有该锁。
pub struct WaitQueue {
    /// 名称，仅用于日志
    name: &'static str,
    cond: Condvar,
    /// 尚未被释放的阻塞者数量
    blocked: AtomicUsize,
    /// 每次 `wake_all` 真正释放调用者时递增
    generation: AtomicU64,
}

impl WaitQueue {
    /// 创建一个空的等待集合
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            cond: Condvar::new(),
            blocked: AtomicUsize::new(0),
            generation: AtomicU64::new(0),
        }
    }

    /// 名称
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 当前阻塞在此集合上的调用者数量
    pub fn blocked(&self) -> usize {
        self.blocked.load(Ordering::Relaxed)
    }

    /// 在此集合上睡眠，直到被 `wake_all` 释放或被中断
    ///
    /// 调用者持有 `guard` 对应的协调锁；返回时仍持有该锁。
    /// 若调用前中断已处于待处理状态，则不睡眠、不计数，直接返回
    /// [`Wakeup::Interrupted`]。
    ///
    /// `target` 是中断触发时的唤醒回调，通常是拥有协调锁的对象本身。
    pub fn sleep<T: ?Sized>(
        &self,
        guard: &mut MutexGuard<'_, T>,
        interrupt: &Interrupt,
        target: &Arc<dyn Wake>,
    ) -> Wakeup {
        if interrupt.take_pending() {
            log::debug!("{}: interrupted before sleeping", self.name);
            return Wakeup::Interrupted;
        }

        let blocked = self.blocked.fetch_add(1, Ordering::Relaxed) + 1;
        let ticket = self.generation.load(Ordering::Relaxed);
        log::debug!("{}: going to sleep, blocked={}", self.name, blocked);

        let registration = interrupt.arm(Arc::clone(target));
        let outcome = loop {
            if interrupt.take_pending() {
                // 仍在计数中：唤醒方尚未释放我们，自行扣除
                self.blocked.fetch_sub(1, Ordering::Relaxed);
                log::debug!("{}: woken by interrupt", self.name);
                break Wakeup::Interrupted;
            }

            self.cond.wait(guard);

            if self.generation.load(Ordering::Relaxed) != ticket {
                break Wakeup::Notified;
            }
        };
        interrupt.disarm(registration);
        outcome
    }

    /// 释放所有阻塞者，返回释放的数量
    ///
    /// 调用者必须持有协调锁。没有阻塞者时不做任何通知。
    pub fn wake_all(&self) -> usize {
        let released = self.blocked.swap(0, Ordering::Relaxed);
        if released > 0 {
            self.generation.fetch_add(1, Ordering::Relaxed);
            self.cond.notify_all();
            log::debug!("{}: released {} waiter(s)", self.name, released);
        }
        released
    }

    /// 仅唤醒睡眠者让其重新检查中断状态，不释放任何人
    ///
    /// 供 [`Wake`] 实现使用，调用者必须持有协调锁。
    pub fn notify(&self) {
        self.cond.notify_all();
    }
}

impl core::fmt::Debug for WaitQueue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WaitQueue")
            .field("name", &self.name)
            .field("blocked", &self.blocked())
            .finish()
    }
}
