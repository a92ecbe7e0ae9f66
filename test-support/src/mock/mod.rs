//! Mock 实现模块
//!
//! 提供测试中替代全局设施的 Mock 实现

pub mod log;
