//! 端点登记
//!
//! 记录当前打开的生产者（写端）与消费者（读端）数量，实现配对规则的判断。
//! 只在持有协调锁时修改。

/// 端点角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// 生产者（写端）
    Producer,
    /// 消费者（读端）
    Consumer,
}

impl Role {
    /// 对端角色
    pub fn peer(self) -> Role {
        match self {
            Role::Producer => Role::Consumer,
            Role::Consumer => Role::Producer,
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Role::Producer => f.write_str("producer"),
            Role::Consumer => f.write_str("consumer"),
        }
    }
}

/// 活跃端点计数
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EndpointRegistry {
    producers: usize,
    consumers: usize,
}

impl EndpointRegistry {
    /// 创建空登记 (0, 0)
    pub const fn new() -> Self {
        Self {
            producers: 0,
            consumers: 0,
        }
    }

    fn count_mut(&mut self, role: Role) -> &mut usize {
        match role {
            Role::Producer => &mut self.producers,
            Role::Consumer => &mut self.consumers,
        }
    }

    /// 指定角色的端点数
    pub fn count(&self, role: Role) -> usize {
        match role {
            Role::Producer => self.producers,
            Role::Consumer => self.consumers,
        }
    }

    /// 生产者数量
    pub fn producers(&self) -> usize {
        self.producers
    }

    /// 消费者数量
    pub fn consumers(&self) -> usize {
        self.consumers
    }

    /// 登记一次打开
    pub fn register_open(&mut self, role: Role) {
        *self.count_mut(role) += 1;
    }

    /// 登记一次关闭
    ///
    /// 返回关闭后两种角色是否都已归零（此时缓冲区应被重置）。
    /// 没有对应打开的关闭被忽略，计数永不为负。
    pub fn register_close(&mut self, role: Role) -> bool {
        let count = self.count_mut(role);
        match count.checked_sub(1) {
            Some(n) => *count = n,
            None => log::error!("close of {} without a matching open", role),
        }
        self.producers == 0 && self.consumers == 0
    }

    /// `role` 的对端是否存在
    pub fn has_peer(&self, role: Role) -> bool {
        self.count(role.peer()) > 0
    }

    /// 是否存在 `role` 角色的端点
    pub fn has_role(&self, role: Role) -> bool {
        self.count(role) > 0
    }
}
