//! FIFO 服务与端点
//!
//! [`Fifo`] 是整个通道的唯一实例，克隆即共享；[`Endpoint`] 是一次打开得到的
//! 端点句柄，带有角色（生产者/消费者），销毁时自动关闭。
//!
//! # 语义
//!
//! - open：登记后若对端不存在则阻塞，直到有新的对端打开。
//! - write：没有消费者立即返回 [`FifoError::BrokenPipe`]；空间不足时阻塞，
//!   等待期间消费者全部离开同样返回 `BrokenPipe`。写入是全有或全无的。
//! - read：缓冲区为空且没有生产者时立即返回 0 (EOF)；数据不足时阻塞。
//!   等待期间生产者全部离开时，立即返回当前已缓冲的字节（可能为 0）。
//! - close：某角色归零时唤醒对端角色的数据/空间等待者以及配对等待者；
//!   两种角色都归零时清空缓冲区。

use std::sync::Arc;

use sync::Interrupt;

use crate::coordinator::{StateGuard, WaitCoordinator, WaitSet};
use crate::{FifoConfig, FifoError, Role};

/// 某一时刻的通道状态快照
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FifoStats {
    /// 缓冲区容量
    pub capacity: usize,
    /// 已缓冲字节数
    pub occupied: usize,
    /// 打开的生产者数
    pub producers: usize,
    /// 打开的消费者数
    pub consumers: usize,
    /// 阻塞在配对上的调用者数
    pub blocked_on_peer: usize,
    /// 阻塞在等待空间上的生产者数
    pub blocked_on_space: usize,
    /// 阻塞在等待数据上的消费者数
    pub blocked_on_data: usize,
}

/// 有界阻塞字节通道
///
/// 克隆得到的句柄指向同一个通道。
#[derive(Clone)]
pub struct Fifo {
    inner: Arc<WaitCoordinator>,
    name: Arc<str>,
    capacity: usize,
}

impl Fifo {
    /// 按配置创建通道
    pub fn new(config: FifoConfig) -> Self {
        log::debug!("{}: created with capacity {}", config.name, config.capacity);
        Self {
            inner: Arc::new(WaitCoordinator::new(config.capacity)),
            name: Arc::from(config.name),
            capacity: config.capacity,
        }
    }

    /// 以默认名称和指定容量创建通道
    pub fn with_capacity(capacity: usize) -> Result<Self, FifoError> {
        Ok(Self::new(FifoConfig::new(capacity)?))
    }

    /// 容量，也是单次读写的上限
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 状态快照
    pub fn stats(&self) -> FifoStats {
        let state = self.inner.lock();
        FifoStats {
            capacity: state.ring.capacity(),
            occupied: state.ring.occupied(),
            producers: state.registry.producers(),
            consumers: state.registry.consumers(),
            blocked_on_peer: self.inner.blocked(&state, WaitSet::Peer),
            blocked_on_space: self.inner.blocked(&state, WaitSet::Space),
            blocked_on_data: self.inner.blocked(&state, WaitSet::Data),
        }
    }

    /// 以 `role` 打开一个端点，阻塞直到对端存在
    pub fn open(&self, role: Role) -> Result<Endpoint, FifoError> {
        self.open_interruptible(role, &Interrupt::new())
    }

    /// 与 [`Self::open`] 相同，但等待可被 `interrupt` 打断
    ///
    /// 被打断时撤销本次登记并返回 [`FifoError::Interrupted`]。
    /// 成功打开的端点沿用同一个中断令牌。
    pub fn open_interruptible(
        &self,
        role: Role,
        interrupt: &Interrupt,
    ) -> Result<Endpoint, FifoError> {
        let mut state = self.inner.lock();
        state.registry.register_open(role);
        log::debug!(
            "{}: open as {} (producers={}, consumers={})",
            self.name,
            role,
            state.registry.producers(),
            state.registry.consumers()
        );

        if state.registry.has_peer(role) {
            // 可能有对端正在等我们
            self.inner.release_all(&state, WaitSet::Peer);
        } else {
            log::debug!("{}: {} waiting for a {}", self.name, role, role.peer());
            self.inner.await_condition(
                &mut state,
                WaitSet::Peer,
                interrupt,
                |s| s.registry.has_peer(role),
                |s| {
                    s.depart(role);
                },
            )?;
        }
        drop(state);

        Ok(Endpoint {
            fifo: self.clone(),
            role,
            interrupt: interrupt.clone(),
        })
    }

    fn write(&self, interrupt: &Interrupt, bytes: &[u8]) -> Result<usize, FifoError> {
        let len = bytes.len();
        log::debug!("{}: write of {} byte(s)", self.name, len);
        if len > self.capacity {
            log::warn!("{}: write of {} exceeds capacity {}", self.name, len, self.capacity);
            return Err(FifoError::InvalidLength);
        }

        let mut state = self.inner.lock();
        if !state.registry.has_role(Role::Consumer) {
            log::warn!("{}: write without consumers", self.name);
            return Err(FifoError::BrokenPipe);
        }

        self.inner.await_condition(
            &mut state,
            WaitSet::Space,
            interrupt,
            |s| s.ring.free() >= len || !s.registry.has_role(Role::Consumer),
            |_| {},
        )?;
        if !state.registry.has_role(Role::Consumer) {
            log::warn!("{}: consumers left while writer was waiting", self.name);
            return Err(FifoError::BrokenPipe);
        }

        state.ring.insert(bytes)?;
        self.inner.release_all(&state, WaitSet::Data);
        Ok(len)
    }

    fn read_into(&self, interrupt: &Interrupt, buf: &mut [u8]) -> Result<usize, FifoError> {
        let len = buf.len();
        log::debug!("{}: read of {} byte(s)", self.name, len);
        if len > self.capacity {
            log::warn!("{}: read of {} exceeds capacity {}", self.name, len, self.capacity);
            return Err(FifoError::InvalidLength);
        }

        let mut state = self.inner.lock();
        if state.ring.is_empty() && !state.registry.has_role(Role::Producer) {
            log::debug!("{}: empty fifo without producers, EOF", self.name);
            return Ok(0);
        }

        self.inner.await_condition(
            &mut state,
            WaitSet::Data,
            interrupt,
            |s| s.ring.occupied() >= len || !s.registry.has_role(Role::Producer),
            |_| {},
        )?;

        let n = len.min(state.ring.occupied());
        if n < len {
            log::debug!("{}: producers gone, short read {}/{}", self.name, n, len);
        }
        state.ring.remove(&mut buf[..n])?;
        self.inner.release_all(&state, WaitSet::Space);
        Ok(n)
    }

    fn read(&self, interrupt: &Interrupt, len: usize) -> Result<Vec<u8>, FifoError> {
        if len > self.capacity {
            log::warn!("{}: read of {} exceeds capacity {}", self.name, len, self.capacity);
            return Err(FifoError::InvalidLength);
        }

        let mut staging = Vec::new();
        staging
            .try_reserve_exact(len)
            .map_err(|_| FifoError::OutOfMemory)?;
        staging.resize(len, 0);

        let n = self.read_into(interrupt, &mut staging)?;
        staging.truncate(n);
        Ok(staging)
    }

    fn close(&self, role: Role) {
        let mut state = self.inner.lock();
        let drained = state.depart(role);
        if !state.registry.has_role(role) {
            self.wake_after_departure(&state, role);
        }
        log::debug!(
            "{}: {} closed (producers={}, consumers={}{})",
            self.name,
            role,
            state.registry.producers(),
            state.registry.consumers(),
            if drained { ", reset" } else { "" }
        );
    }

    /// `role` 的最后一个端点离开后，让对端的等待者重新观察 EOF/断管
    fn wake_after_departure(&self, state: &StateGuard<'_>, role: Role) {
        let starved = match role {
            Role::Producer => WaitSet::Data,
            Role::Consumer => WaitSet::Space,
        };
        self.inner.release_all(state, starved);
        // 配对只能由新的 open 满足；这里仅让等待者重新检查
        self.inner.release_all(state, WaitSet::Peer);
    }
}

impl core::fmt::Debug for Fifo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Fifo")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

/// 一次打开得到的端点
///
/// 销毁（或 [`Endpoint::close`]）时关闭，对应角色计数减一。
pub struct Endpoint {
    fifo: Fifo,
    role: Role,
    interrupt: Interrupt,
}

impl Endpoint {
    /// 角色
    pub fn role(&self) -> Role {
        self.role
    }

    /// 所属通道
    pub fn fifo(&self) -> &Fifo {
        &self.fifo
    }

    /// 返回本端点的中断令牌，可交给其它线程用于打断阻塞中的调用
    pub fn interrupter(&self) -> Interrupt {
        self.interrupt.clone()
    }

    fn require(&self, role: Role) -> Result<(), FifoError> {
        if self.role != role {
            log::warn!("{}: {} endpoint used as {}", self.fifo.name, self.role, role);
            return Err(FifoError::BadEndpoint);
        }
        Ok(())
    }

    /// 读取 `len` 个字节
    ///
    /// 返回长度小于 `len` 仅发生在生产者全部离开时；空结果表示 EOF。
    pub fn read(&self, len: usize) -> Result<Vec<u8>, FifoError> {
        self.require(Role::Consumer)?;
        self.fifo.read(&self.interrupt, len)
    }

    /// 读取恰好 `buf.len()` 个字节到 `buf`，返回实际读取的字节数
    ///
    /// 与 [`Self::read`] 语义相同，但不分配暂存缓冲区。
    pub fn read_into(&self, buf: &mut [u8]) -> Result<usize, FifoError> {
        self.require(Role::Consumer)?;
        self.fifo.read_into(&self.interrupt, buf)
    }

    /// 写入全部 `bytes`，返回写入的字节数
    pub fn write(&self, bytes: &[u8]) -> Result<usize, FifoError> {
        self.require(Role::Producer)?;
        self.fifo.write(&self.interrupt, bytes)
    }

    /// 关闭端点
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for Endpoint {
    fn drop(&mut self) {
        self.fifo.close(self.role);
    }
}

impl core::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Endpoint")
            .field("fifo", &self.fifo.name)
            .field("role", &self.role)
            .finish()
    }
}
