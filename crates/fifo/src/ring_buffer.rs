//! 字节环形缓冲区
//!
//! 固定容量，构造时一次性分配。插入与移除都是“全有或全无”的：
//! 调用者必须先确认空间/数据足够，否则操作被拒绝且缓冲区不变，
//! 从而杜绝部分拷贝造成的数据错乱。
//!
//! 缓冲区本身不做同步，调用者必须持有协调锁。

/// 环形缓冲区操作错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingError {
    /// 剩余空间不足以插入全部字节
    NoSpace,
    /// 已缓冲字节不足以满足移除请求
    NotEnoughData,
}

/// 固定容量的字节环形缓冲区
pub struct RingBuffer {
    data: Box<[u8]>,
    /// 下一个读取位置
    head: usize,
    /// 下一个写入位置
    tail: usize,
    /// 当前已缓冲字节数
    len: usize,
}

impl RingBuffer {
    /// 创建容量为 `capacity` 字节的空缓冲区
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    /// 容量
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// 已缓冲字节数
    pub fn occupied(&self) -> usize {
        self.len
    }

    /// 剩余空间
    pub fn free(&self) -> usize {
        self.capacity() - self.len
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 在写位置追加全部 `bytes`
    pub fn insert(&mut self, bytes: &[u8]) -> Result<(), RingError> {
        let k = bytes.len();
        if k > self.free() {
            return Err(RingError::NoSpace);
        }
        if k == 0 {
            return Ok(());
        }

        let cap = self.capacity();
        let first = k.min(cap - self.tail);
        self.data[self.tail..self.tail + first].copy_from_slice(&bytes[..first]);
        self.data[..k - first].copy_from_slice(&bytes[first..]);

        self.tail = (self.tail + k) % cap;
        self.len += k;
        Ok(())
    }

    /// 从读位置取出恰好 `out.len()` 个字节
    pub fn remove(&mut self, out: &mut [u8]) -> Result<(), RingError> {
        let k = out.len();
        if k > self.len {
            return Err(RingError::NotEnoughData);
        }
        if k == 0 {
            return Ok(());
        }

        let cap = self.capacity();
        let first = k.min(cap - self.head);
        out[..first].copy_from_slice(&self.data[self.head..self.head + first]);
        out[first..].copy_from_slice(&self.data[..k - first]);

        self.head = (self.head + k) % cap;
        self.len -= k;
        Ok(())
    }

    /// 清空缓冲区并将读写位置归零
    ///
    /// 仅在两种端点都不存在时使用。
    pub fn reset(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.len = 0;
    }
}

impl core::fmt::Debug for RingBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("occupied", &self.len)
            .field("head", &self.head)
            .field("tail", &self.tail)
            .finish()
    }
}
