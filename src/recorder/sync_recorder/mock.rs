// src/recorder/sync_recorder/mock.rs

//! Scripted bus and simulated clock shared by the recorder tests.

use core::ops::{Add, Sub};
use core::time::Duration;
use std::collections::{HashMap, VecDeque};

use crate::common::hal_traits::{Sdi12Serial, Sdi12Timer};

/// Simulated instant, in microseconds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct MockInstant(pub u64);

impl Add<Duration> for MockInstant {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self {
        MockInstant(self.0.saturating_add(rhs.as_micros() as u64))
    }
}

impl Sub<MockInstant> for MockInstant {
    type Output = Duration;
    fn sub(self, rhs: MockInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct MockCommError;

/// A reply segment: bytes that arrive `after_ms` after the command was sent.
#[derive(Debug, Clone)]
struct Reply {
    after_ms: u64,
    bytes: Vec<u8>,
}

/// Answers commands by their exact text, one queued reply set per send.
#[derive(Debug, Default)]
pub(crate) struct MockBus {
    now_us: u64,
    script: HashMap<String, VecDeque<Vec<Reply>>>,
    pending: Vec<(u64, Vec<u8>)>,
    rx: VecDeque<u8>,
    /// Every command frame sent, in order.
    pub sent: Vec<String>,
    /// Simulated time (ms) at which each frame in `sent` went out.
    pub sent_at_ms: Vec<u64>,
    pub clears: usize,
    pub fail_send: bool,
    pub fail_read: bool,
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `reply` to arrive as soon as `command` is next sent.
    pub fn on(&mut self, command: &str, reply: &[u8]) -> &mut Self {
        self.queue(command, vec![Reply { after_ms: 0, bytes: reply.to_vec() }])
    }

    /// Queues `reply` for the next send of `command`, followed by `later`
    /// arriving `after_ms` after the send (a service request, say).
    pub fn on_then(&mut self, command: &str, reply: &[u8], after_ms: u64, later: &[u8]) -> &mut Self {
        self.queue(
            command,
            vec![
                Reply { after_ms: 0, bytes: reply.to_vec() },
                Reply { after_ms, bytes: later.to_vec() },
            ],
        )
    }

    fn queue(&mut self, command: &str, set: Vec<Reply>) -> &mut Self {
        self.script.entry(command.to_string()).or_default().push_back(set);
        self
    }

    /// Makes `bytes` readable immediately.
    pub fn inject(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    pub fn now_ms(&self) -> u64 {
        self.now_us / 1_000
    }

    pub fn sent_count(&self, command: &str) -> usize {
        self.sent.iter().filter(|s| s.as_str() == command).count()
    }

    fn release_due(&mut self) {
        let now = self.now_us;
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].0 <= now {
                let (_, bytes) = self.pending.remove(i);
                self.rx.extend(bytes);
            } else {
                i += 1;
            }
        }
    }
}

impl Sdi12Timer for MockBus {
    type Instant = MockInstant;

    fn delay_us(&mut self, us: u32) {
        self.now_us += u64::from(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.now_us += u64::from(ms) * 1_000;
    }

    fn now(&self) -> MockInstant {
        MockInstant(self.now_us)
    }
}

impl Sdi12Serial for MockBus {
    type Error = MockCommError;

    fn send_command(&mut self, frame: &[u8]) -> Result<(), MockCommError> {
        if self.fail_send {
            return Err(MockCommError);
        }
        let command = String::from_utf8_lossy(frame).into_owned();
        if let Some(set) = self.script.get_mut(&command).and_then(|q| q.pop_front()) {
            for reply in set {
                self.pending.push((self.now_us + reply.after_ms * 1_000, reply.bytes));
            }
        }
        self.sent.push(command);
        self.sent_at_ms.push(self.now_ms());
        self.release_due();
        Ok(())
    }

    fn available(&mut self) -> usize {
        self.release_due();
        self.rx.len()
    }

    fn read_byte(&mut self) -> nb::Result<u8, MockCommError> {
        self.release_due();
        if self.fail_read && !self.rx.is_empty() {
            return Err(nb::Error::Other(MockCommError));
        }
        self.rx.pop_front().ok_or(nb::Error::WouldBlock)
    }

    fn clear_buffer(&mut self) {
        self.release_due();
        self.rx.clear();
        self.clears += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_bus_delivers_on_schedule() {
        let mut bus = MockBus::new();
        bus.on_then("0M!", b"00015\r\n", 300, b"0\r\n");
        bus.send_command(b"0M!").unwrap();
        assert_eq!(bus.available(), 7);
        bus.clear_buffer();
        assert_eq!(bus.available(), 0);
        bus.delay_ms(299);
        assert_eq!(bus.available(), 0);
        bus.delay_ms(1);
        assert_eq!(bus.read_byte(), Ok(b'0'));
        assert_eq!(bus.sent_count("0M!"), 1);
        // Unscripted commands get silence.
        bus.send_command(b"0M!").unwrap();
        assert!(matches!(bus.read_byte(), Ok(b'\r')));
        assert_eq!(bus.sent, vec!["0M!", "0M!"]);
    }
}
