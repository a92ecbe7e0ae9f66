//! 中断令牌
//!
//! 模拟内核中“可被信号打断的睡眠”：每个调用者持有一个 [`Interrupt`]，
//! 其它线程可以通过克隆出来的句柄调用 [`Interrupt::raise`] 打断它当前
//! （或下一次）的阻塞等待。

use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::Wake;

/// 可跨线程触发的中断令牌
///
/// 克隆出来的句柄共享同一份状态。
///
/// # 语义
///
/// - 触发后令牌处于“待处理”状态，直到某次阻塞等待观察到它为止；
///   观察即消费（与信号递送一致，只打断一次）。
/// - 不进入睡眠就完成的调用不会消费待处理的中断。
/// - 同一令牌可以同时被多个睡眠者持有（例如同一令牌打开的多个端点），
///   每个睡眠者各自挂载、各自卸载唤醒目标。
#[derive(Clone, Default)]
pub struct Interrupt {
    inner: Arc<InterruptInner>,
}

#[derive(Default)]
struct InterruptInner {
    /// 是否有待处理的中断
    pending: AtomicBool,
    /// 当前挂载的唤醒目标，每个正在睡眠的持有者一项
    targets: Mutex<Vec<(Registration, Arc<dyn Wake>)>>,
    /// 下一个挂载编号
    next_registration: AtomicU64,
}

/// 一次挂载的凭证，卸载时只移除自己的那一项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Registration(u64);

impl Interrupt {
    /// 创建一个未触发的中断令牌
    pub fn new() -> Self {
        Self::default()
    }

    /// 触发中断
    ///
    /// 若持有者此刻正在睡眠，则通过挂载的 [`Wake`] 目标将其唤醒。
    pub fn raise(&self) {
        self.inner.pending.store(true, Ordering::SeqCst);
        // 先取出目标再唤醒：唤醒路径需要获取协调锁，不能嵌套在 targets 锁内
        let targets: Vec<Arc<dyn Wake>> = self
            .inner
            .targets
            .lock()
            .iter()
            .map(|(_, target)| Arc::clone(target))
            .collect();
        if !targets.is_empty() {
            log::debug!("interrupt raised on {} sleeping caller(s)", targets.len());
        }
        for target in targets {
            target.wake();
        }
    }

    /// 是否有待处理的中断
    pub fn is_pending(&self) -> bool {
        self.inner.pending.load(Ordering::SeqCst)
    }

    /// 丢弃待处理的中断
    pub fn clear(&self) {
        self.inner.pending.store(false, Ordering::SeqCst);
    }

    /// 消费待处理的中断，返回之前是否处于待处理状态
    pub(crate) fn take_pending(&self) -> bool {
        self.inner.pending.swap(false, Ordering::SeqCst)
    }

    /// 挂载唤醒目标
    ///
    /// 必须在检查 [`Self::take_pending`] 之前调用，否则与 `raise` 的竞争会丢失唤醒。
    pub(crate) fn arm(&self, target: Arc<dyn Wake>) -> Registration {
        let registration =
            Registration(self.inner.next_registration.fetch_add(1, Ordering::Relaxed));
        self.inner.targets.lock().push((registration, target));
        registration
    }

    /// 卸载 `registration` 对应的唤醒目标，其它睡眠者的挂载保持不变
    pub(crate) fn disarm(&self, registration: Registration) {
        self.inner
            .targets
            .lock()
            .retain(|(armed, _)| *armed != registration);
    }

    /// 当前挂载的唤醒目标数量 (仅用于测试)
    #[cfg(test)]
    pub(crate) fn armed(&self) -> usize {
        self.inner.targets.lock().len()
    }

    /// 是否挂载了唤醒目标 (仅用于测试)
    #[cfg(test)]
    pub(crate) fn is_armed(&self) -> bool {
        self.armed() > 0
    }
}

impl core::fmt::Debug for Interrupt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Interrupt")
            .field("pending", &self.is_pending())
            .finish_non_exhaustive()
    }
}
