//! 测试支持 crate
//!
//! 提供多线程测试辅助函数和 Mock 实现

pub mod mock;

use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// 轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// 轮询 `cond` 直到其成立或超时
///
/// 返回条件是否在超时前成立。用于等待另一个线程进入阻塞状态
/// （例如观察阻塞者计数），而不是依赖固定的 sleep。
pub fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if cond() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

/// 断言线程在 `window` 时间内没有结束
///
/// 只能证明“暂时仍在阻塞”，调用方随后必须自行解除阻塞并 join。
#[track_caller]
pub fn assert_stays_blocked<T>(handle: &JoinHandle<T>, window: Duration) {
    std::thread::sleep(window);
    assert!(
        !handle.is_finished(),
        "thread finished although it was expected to stay blocked"
    );
}

/// 在超时时间内 join 线程，超时则 panic
///
/// 避免回归导致测试永久挂起。
#[track_caller]
pub fn join_within<T>(handle: JoinHandle<T>, timeout: Duration) -> T {
    assert!(
        wait_until(timeout, || handle.is_finished()),
        "thread did not finish within {:?}",
        timeout
    );
    match handle.join() {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}
