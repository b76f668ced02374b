//! Console motion listener
//!
//! Stands in for the platform motion hook. Reads motion lines from an input
//! stream on a dedicated thread and forwards them to the motion event source.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use tracing::{debug, error, info, warn};

use super::source::MotionEventSource;
use super::subtype::MotionEvent;

/// Motion listener that feeds console input into a `MotionEventSource`
pub struct MotionListener {
    /// Moved into the listener thread on start so EOF closes the channels
    source: Option<MotionEventSource>,
    running: Arc<AtomicBool>,
}

impl MotionListener {
    /// Create a new motion listener
    pub fn new(source: MotionEventSource) -> Self {
        Self {
            source: Some(source),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start listening on stdin
    ///
    /// This spawns a dedicated thread that blocks on line reads. The listener
    /// runs until `stop()` is called, input reaches EOF, or every listener
    /// of the source has gone away.
    pub fn start(&mut self) -> Result<(), ListenerError> {
        self.start_with(|| std::io::stdin().lock())
    }

    /// Start listening on an arbitrary line reader
    pub fn start_with<R, F>(&mut self, open: F) -> Result<(), ListenerError>
    where
        R: BufRead,
        F: FnOnce() -> R + Send + 'static,
    {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(ListenerError::AlreadyRunning);
        }

        let Some(source) = self.source.take() else {
            self.running.store(false, Ordering::SeqCst);
            return Err(ListenerError::AlreadyStarted);
        };
        let running = Arc::clone(&self.running);

        let spawned = thread::Builder::new()
            .name("motion-listener".to_string())
            .spawn(move || {
                info!("motion listener thread started");

                let reader = open();
                if let Err(e) = run_input_loop(reader, &source, &running) {
                    error!(?e, "motion listener error");
                }

                running.store(false, Ordering::SeqCst);
                info!("motion listener thread stopped");
            });

        if let Err(e) = spawned {
            self.running.store(false, Ordering::SeqCst);
            return Err(ListenerError::ThreadSpawn(e.to_string()));
        }

        Ok(())
    }

    /// Stop the motion listener
    ///
    /// A thread blocked on a read exits after its next line.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the listener is currently running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Errors that can occur in the motion listener
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("motion listener is already running")]
    AlreadyRunning,

    #[error("motion listener was already started once")]
    AlreadyStarted,

    #[error("failed to spawn listener thread: {0}")]
    ThreadSpawn(String),

    #[error("failed to read motion input: {0}")]
    Read(#[from] std::io::Error),
}

/// Read lines until EOF or stop, dispatching parsed motion events
///
/// Returns the number of motion events dispatched.
fn run_input_loop<R: BufRead>(
    reader: R,
    source: &MotionEventSource,
    running: &AtomicBool,
) -> Result<usize, ListenerError> {
    let mut dispatched = 0;

    for line in reader.lines() {
        if !running.load(Ordering::SeqCst) {
            break;
        }

        let line = line?;
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        match MotionEvent::parse_line(&line) {
            Ok(events) => {
                for event in events {
                    debug!(?event, "motion callback");
                    source.dispatch(event);
                    dispatched += 1;
                }
            }
            Err(e) => {
                warn!(%e, line = %line.trim(), "skipping motion input");
            }
        }

        if source.is_closed() {
            debug!("all shake listeners closed");
            break;
        }
    }

    Ok(dispatched)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::time::Duration;

    use tokio::sync::mpsc;

    use super::*;
    use crate::events::ShakeSignal;

    fn source_with_listener() -> (MotionEventSource, mpsc::Receiver<ShakeSignal>) {
        let (tx, rx) = mpsc::channel(32);
        let mut source = MotionEventSource::new();
        source.register(tx);
        (source, rx)
    }

    #[test]
    fn test_listener_creation() {
        let listener = MotionListener::new(MotionEventSource::new());
        assert!(!listener.is_running());
    }

    #[test]
    fn test_input_loop_dispatches_shake_lines() {
        let (source, mut rx) = source_with_listener();
        let running = AtomicBool::new(true);
        let input = Cursor::new("began shake\n# comment\n\nended shake\nbegan remote\nbogus line here\n");

        let dispatched = run_input_loop(input, &source, &running).unwrap();

        assert_eq!(dispatched, 3);
        assert_eq!(rx.try_recv(), Ok(ShakeSignal::Started));
        assert_eq!(rx.try_recv(), Ok(ShakeSignal::Ended));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_input_loop_respects_stop() {
        let (source, mut rx) = source_with_listener();
        let running = AtomicBool::new(false);

        let dispatched = run_input_loop(Cursor::new("shake\n"), &source, &running).unwrap();

        assert_eq!(dispatched, 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_start_while_running_fails() {
        let mut listener = MotionListener::new(MotionEventSource::new());
        listener.running.store(true, Ordering::SeqCst);

        let result = listener.start_with(|| Cursor::new(""));
        assert!(matches!(result, Err(ListenerError::AlreadyRunning)));
    }

    #[test]
    fn test_thread_forwards_and_stops_at_eof() {
        let (source, mut rx) = source_with_listener();
        let mut listener = MotionListener::new(source);

        listener.start_with(|| Cursor::new("shake\n")).unwrap();

        assert_eq!(rx.blocking_recv(), Some(ShakeSignal::Started));
        assert_eq!(rx.blocking_recv(), Some(ShakeSignal::Ended));
        // Source dropped with the thread at EOF
        assert_eq!(rx.blocking_recv(), None);

        for _ in 0..100 {
            if !listener.is_running() {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert!(!listener.is_running());

        let restart = listener.start_with(|| Cursor::new(""));
        assert!(matches!(restart, Err(ListenerError::AlreadyStarted)));
    }
}
