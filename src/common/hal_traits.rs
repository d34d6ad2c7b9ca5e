// src/common/hal_traits.rs

use core::fmt::Debug;
use core::ops::{Add, Sub};
use core::time::Duration;

/// A point on a monotonic clock.
pub trait Sdi12Instant:
    Copy + Ord + Add<Duration, Output = Self> + Sub<Self, Output = Duration>
{
}

impl<T> Sdi12Instant for T where
    T: Copy + Ord + Add<Duration, Output = T> + Sub<T, Output = Duration>
{
}

/// Abstraction for the sleep and clock capability the engine waits on.
pub trait Sdi12Timer {
    type Instant: Sdi12Instant;

    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);

    /// Current reading of the monotonic clock.
    fn now(&self) -> Self::Instant;
}

/// Abstraction for the byte-stream side of the bus transport.
///
/// The transport owns the electrical layer: break, marking, baud timing and
/// line direction are all handled inside `send_command`.
pub trait Sdi12Serial {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Wakes the bus and transmits one complete command frame.
    fn send_command(&mut self, frame: &[u8]) -> Result<(), Self::Error>;

    /// Number of received bytes waiting to be read.
    fn available(&mut self) -> usize;

    /// Reads one received byte.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if nothing is buffered.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Discards any buffered, unread bytes.
    fn clear_buffer(&mut self);
}

/// Millisecond instant for timers built on a free-running counter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MillisInstant(pub u64);

impl Add<Duration> for MillisInstant {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self {
        MillisInstant(self.0.saturating_add(rhs.as_millis() as u64))
    }
}

impl Sub<MillisInstant> for MillisInstant {
    type Output = Duration;
    fn sub(self, rhs: MillisInstant) -> Duration {
        Duration::from_millis(self.0.saturating_sub(rhs.0))
    }
}

/// `Sdi12Timer` over an embedded-hal delay provider and a monotonic
/// millisecond counter supplied by the platform.
#[cfg(feature = "embedded-hal")]
pub struct HalTimer<D, C> {
    delay: D,
    clock: C,
}

#[cfg(feature = "embedded-hal")]
impl<D, C> HalTimer<D, C>
where
    D: embedded_hal::delay::DelayNs,
    C: Fn() -> u64,
{
    pub fn new(delay: D, clock: C) -> Self {
        HalTimer { delay, clock }
    }

    pub fn release(self) -> (D, C) {
        (self.delay, self.clock)
    }
}

#[cfg(feature = "embedded-hal")]
impl<D, C> Sdi12Timer for HalTimer<D, C>
where
    D: embedded_hal::delay::DelayNs,
    C: Fn() -> u64,
{
    type Instant = MillisInstant;

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    fn now(&self) -> MillisInstant {
        MillisInstant((self.clock)())
    }
}

/// `Sdi12Timer` for hosted builds: real sleeps and `std::time::Instant`.
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone, Copy)]
pub struct StdTimer;

#[cfg(feature = "std")]
impl Sdi12Timer for StdTimer {
    type Instant = std::time::Instant;

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(Duration::from_micros(us as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }

    fn now(&self) -> std::time::Instant {
        std::time::Instant::now()
    }
}
