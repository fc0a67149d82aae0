//! Cooperative stop signals, polled once per loop iteration.

use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use log::{debug, info};

pub trait StopSignal {
    fn should_stop(&mut self) -> bool;
}

impl<F: FnMut() -> bool> StopSignal for F {
    fn should_stop(&mut self) -> bool {
        self()
    }
}

/// Never requests a stop; the loop runs until the source is exhausted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Never;

impl StopSignal for Never {
    fn should_stop(&mut self) -> bool {
        false
    }
}

/// Shared flag that any thread may raise.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl StopSignal for StopFlag {
    fn should_stop(&mut self) -> bool {
        self.is_stopped()
    }
}

/// Stops when a `q` line is read from `input`.
///
/// The reader thread is only started on the first poll, so the same input can
/// serve interactive region selection during startup.
pub struct QuitCommand<R> {
    input: Option<R>,
    flag: StopFlag,
}

impl<R: BufRead + Send + 'static> QuitCommand<R> {
    pub fn new(input: R) -> Self {
        Self {
            input: Some(input),
            flag: StopFlag::new(),
        }
    }

    fn watch(input: R, flag: StopFlag) {
        for line in input.lines() {
            match line {
                Ok(line) if line.trim().eq_ignore_ascii_case("q") => {
                    info!("Quit requested");
                    flag.stop();
                    return;
                }
                Ok(_) => {}
                Err(err) => {
                    debug!("Stopped watching for quit command: {err}");
                    return;
                }
            }
        }
    }
}

impl<R: BufRead + Send + 'static> StopSignal for QuitCommand<R> {
    fn should_stop(&mut self) -> bool {
        if let Some(input) = self.input.take() {
            let flag = self.flag.clone();
            thread::spawn(move || Self::watch(input, flag));
        }
        self.flag.is_stopped()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::time::{Duration, Instant};

    use super::*;

    #[test]
    fn test_stop_flag_is_shared() {
        let flag = StopFlag::new();
        let mut signal = flag.clone();
        assert!(!signal.should_stop());
        flag.stop();
        assert!(signal.should_stop());
    }

    #[test]
    fn test_closure_signal() {
        let mut polls = 0;
        let mut signal = || {
            polls += 1;
            polls >= 3
        };
        assert!(!signal.should_stop());
        assert!(!signal.should_stop());
        assert!(signal.should_stop());
    }

    fn poll_until(signal: &mut impl StopSignal, timeout: Duration) -> bool {
        let start = Instant::now();
        while start.elapsed() < timeout {
            if signal.should_stop() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn test_quit_command() {
        let mut signal = QuitCommand::new(Cursor::new("hello\n Q \n"));
        assert!(poll_until(&mut signal, Duration::from_secs(5)));

        let mut signal = QuitCommand::new(Cursor::new("hello\nquit\n"));
        assert!(!poll_until(&mut signal, Duration::from_millis(100)));
    }
}
