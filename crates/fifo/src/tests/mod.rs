// Unit tests for the fifo core.
//
// Blocking behaviour is checked with real threads: a test first waits until the
// expected number of callers is parked on a wait set (via `Fifo::stats`), then
// performs the action that should release them. Every wait is bounded so that a
// regression fails instead of hanging the test binary.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use test_support::{assert_stays_blocked, join_within, wait_until};

use crate::*;

const TIMEOUT: Duration = Duration::from_secs(5);
const BLOCK_WINDOW: Duration = Duration::from_millis(50);

/// Opens a paired producer/consumer without blocking the test thread.
fn open_pair(fifo: &Fifo) -> (Endpoint, Endpoint) {
    let consumer = {
        let fifo = fifo.clone();
        thread::spawn(move || fifo.open(Role::Consumer))
    };
    let producer = fifo.open(Role::Producer).unwrap();
    let consumer = join_within(consumer, TIMEOUT).unwrap();
    (producer, consumer)
}

fn spawn_open(fifo: &Fifo, role: Role) -> JoinHandle<Result<Endpoint, FifoError>> {
    let fifo = fifo.clone();
    thread::spawn(move || fifo.open(role))
}

mod device;
