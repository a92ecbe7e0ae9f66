//! `log` 门面的 Mock 后端
//!
//! `log` 只允许安装一次全局 logger，因此 [`MockLogger`] 是进程内单例：
//! 所有测试共享同一份记录，断言时应按 target/内容过滤，而不是依赖条数。

use std::sync::Once;

use ::log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;

/// 一条被捕获的日志
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRecord {
    /// 日志级别
    pub level: Level,
    /// 日志 target（通常是模块路径）
    pub target: String,
    /// 格式化后的消息
    pub message: String,
}

/// 捕获所有日志记录的 logger
pub struct MockLogger {
    records: Mutex<Vec<CapturedRecord>>,
}

impl MockLogger {
    const fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }
}

impl Log for MockLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        self.records.lock().push(CapturedRecord {
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        });
    }

    fn flush(&self) {}
}

lazy_static::lazy_static! {
    /// 全局 Mock logger 实例
    pub static ref MOCK_LOGGER: MockLogger = MockLogger::new();
}

static INIT: Once = Once::new();

/// 安装 Mock logger（幂等）
pub fn init() {
    INIT.call_once(|| {
        let logger: &'static MockLogger = &MOCK_LOGGER;
        // 其它测试二进制可能已经装了 logger，忽略失败
        let _ = ::log::set_logger(logger);
        ::log::set_max_level(LevelFilter::Trace);
    });
}

/// 返回所有满足 `pred` 的记录副本
pub fn captured(pred: impl Fn(&CapturedRecord) -> bool) -> Vec<CapturedRecord> {
    MOCK_LOGGER
        .records
        .lock()
        .iter()
        .filter(|r| pred(r))
        .cloned()
        .collect()
}

/// 是否捕获过包含 `needle` 且级别为 `level` 的记录
pub fn contains(level: Level, needle: &str) -> bool {
    !captured(|r| r.level == level && r.message.contains(needle)).is_empty()
}
