//! 等待协调器
//!
//! 一把粗粒度的协调锁保护全部共享状态（环形缓冲区 + 端点登记），
//! 再加上三个等待集合：
//!
//! | 集合 | 等待者 | 条件 |
//! |---|---|---|
//! | `peer` | 任一角色的 open | 对端出现 |
//! | `space` | 生产者的 write | 空间足够，或消费者全部离开 |
//! | `data` | 消费者的 read | 数据足够，或生产者全部离开 |
//!
//! 唤醒策略是广播：任何可能使某个条件成立的状态变化都会释放对应集合中的
//! 全部等待者，由它们在锁内逐个重新检查条件。被过度唤醒的调用者会重新睡眠。
//! 多个等待者之间的先后由调度决定，不保证公平。

use std::sync::Arc;

use sync::{Interrupt, Mutex, MutexGuard, WaitQueue, Wake, Wakeup};

use crate::{EndpointRegistry, FifoError, RingBuffer, Role};

/// 协调锁保护的全部共享状态
#[derive(Debug)]
pub(crate) struct FifoState {
    pub(crate) ring: RingBuffer,
    pub(crate) registry: EndpointRegistry,
}

impl FifoState {
    /// 登记一次关闭；两种角色都归零时重置缓冲区
    ///
    /// 返回是否发生了重置。
    pub(crate) fn depart(&mut self, role: Role) -> bool {
        let drained = self.registry.register_close(role);
        if drained {
            if !self.ring.is_empty() {
                log::debug!("no endpoints left, discarding {} byte(s)", self.ring.occupied());
            }
            self.ring.reset();
        }
        drained
    }
}

/// 持有协调锁的凭证
pub(crate) type StateGuard<'a> = MutexGuard<'a, FifoState>;

/// 等待集合标识
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WaitSet {
    /// 等待对端出现
    Peer,
    /// 生产者等待空间
    Space,
    /// 消费者等待数据
    Data,
}

/// 协调锁与配对/空间/数据三个等待集合
///
/// 所有等待都经由 [`Self::await_condition`]，所有唤醒都经由 [`Self::release_all`]。
pub(crate) struct WaitCoordinator {
    state: Mutex<FifoState>,
    peer: WaitQueue,
    space: WaitQueue,
    data: WaitQueue,
}

impl WaitCoordinator {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(FifoState {
                ring: RingBuffer::new(capacity),
                registry: EndpointRegistry::new(),
            }),
            peer: WaitQueue::new("wait_peer"),
            space: WaitQueue::new("wait_space"),
            data: WaitQueue::new("wait_data"),
        }
    }

    /// 获取协调锁
    pub(crate) fn lock(&self) -> StateGuard<'_> {
        self.state.lock()
    }

    fn queue(&self, set: WaitSet) -> &WaitQueue {
        match set {
            WaitSet::Peer => &self.peer,
            WaitSet::Space => &self.space,
            WaitSet::Data => &self.data,
        }
    }

    /// 指定集合上的阻塞者数量
    pub(crate) fn blocked(&self, _held: &StateGuard<'_>, set: WaitSet) -> usize {
        self.queue(set).blocked()
    }

    /// 在 `set` 上阻塞，直到 `predicate` 成立
    ///
    /// 调用者持有协调锁（`guard`），返回时仍持有。每次被释放后都会在锁内
    /// 重新检查条件，条件不成立则继续睡眠。
    ///
    /// 睡眠被中断时，在锁内执行 `on_interrupt` 回滚调用者的预先修改，
    /// 然后返回 [`FifoError::Interrupted`]。
    pub(crate) fn await_condition<P, R>(
        self: &Arc<Self>,
        guard: &mut StateGuard<'_>,
        set: WaitSet,
        interrupt: &Interrupt,
        mut predicate: P,
        on_interrupt: R,
    ) -> Result<(), FifoError>
    where
        P: FnMut(&FifoState) -> bool,
        R: FnOnce(&mut FifoState),
    {
        if predicate(&**guard) {
            return Ok(());
        }

        let target: Arc<dyn Wake> = self.clone();
        let queue = self.queue(set);
        while !predicate(&**guard) {
            match queue.sleep(guard, interrupt, &target) {
                Wakeup::Notified => continue,
                Wakeup::Interrupted => {
                    log::warn!("{}: wait interrupted", queue.name());
                    on_interrupt(&mut **guard);
                    return Err(FifoError::Interrupted);
                }
            }
        }
        Ok(())
    }

    /// 释放 `set` 上的全部等待者，返回释放数量
    pub(crate) fn release_all(&self, _held: &StateGuard<'_>, set: WaitSet) -> usize {
        self.queue(set).wake_all()
    }
}

impl Wake for WaitCoordinator {
    fn wake(&self) {
        // 持锁通知：睡眠者要么尚未检查中断标志，要么已经在条件变量上
        let _guard = self.state.lock();
        self.peer.notify();
        self.space.notify();
        self.data.notify();
    }
}
