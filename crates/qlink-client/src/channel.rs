//! Collaborator interfaces: the line channel and the clock.

use std::io;
use std::thread;
use std::time::{Duration, Instant};

/// A half-duplex, line-oriented link to the host.
///
/// Lines never include the trailing `\n`; implementations add it on write
/// and strip it (and any `\r`) on read.
pub trait LineChannel {
    /// Write one line and flush it.
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Check whether inbound data is waiting, without blocking.
    fn data_available(&mut self) -> io::Result<bool>;

    /// Read one line, blocking until it is complete or the link's own read
    /// timeout cuts it short.
    fn read_line(&mut self) -> io::Result<String>;

    /// Discard inbound data that has not been read yet, such as a reply that
    /// arrived after its request timed out.
    ///
    /// Called before every request. Channels that cannot hold stale data
    /// keep the default no-op.
    fn clear_input(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<C: LineChannel + ?Sized> LineChannel for &mut C {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }

    fn data_available(&mut self) -> io::Result<bool> {
        (**self).data_available()
    }

    fn read_line(&mut self) -> io::Result<String> {
        (**self).read_line()
    }

    fn clear_input(&mut self) -> io::Result<()> {
        (**self).clear_input()
    }
}

impl<C: LineChannel + ?Sized> LineChannel for Box<C> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }

    fn data_available(&mut self) -> io::Result<bool> {
        (**self).data_available()
    }

    fn read_line(&mut self) -> io::Result<String> {
        (**self).read_line()
    }

    fn clear_input(&mut self) -> io::Result<()> {
        (**self).clear_input()
    }
}

/// Monotonic millisecond clock with a blocking sleep.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> u64;

    /// Block the calling thread for `ms` milliseconds.
    fn sleep_ms(&self, ms: u64);
}

/// [`Clock`] backed by [`Instant`] and [`thread::sleep`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn sleep_ms(&self, ms: u64) {
        thread::sleep(Duration::from_millis(ms));
    }
}
