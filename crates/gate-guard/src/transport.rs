//! Scan devices: the decode side of the pass transport.
//!
//! A [`ScanDevice`] hands out a [`Capture`] per scan session. The capture
//! owns the polling task and the channel it reports decoded text on.
//! Releasing a capture aborts the task and waits for it to finish, so the
//! underlying device is guaranteed idle afterwards.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::TransportError;

/// A source of decoded pass text.
pub trait ScanDevice: Send {
    /// Acquire the device and start decoding. Must be called inside a Tokio
    /// runtime.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Unavailable` if the device cannot be acquired.
    fn start_capture(&mut self) -> Result<Capture, TransportError>;
}

/// An active capture session.
pub struct Capture {
    rx: mpsc::Receiver<String>,
    task: Option<JoinHandle<()>>,
}

impl Capture {
    /// Spawn `worker` with the sending half of a fresh decode channel.
    pub fn spawn<F, Fut>(worker: F) -> Self
    where
        F: FnOnce(mpsc::Sender<String>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(1);
        let task = tokio::spawn(worker(tx));
        Self {
            rx,
            task: Some(task),
        }
    }

    /// Wait for the next decoded string. `None` once the device has stopped.
    pub async fn next_decode(&mut self) -> Option<String> {
        self.rx.recv().await
    }

    /// Stop capturing and wait until the worker has exited.
    pub async fn release(mut self) {
        self.rx.close();
        if let Some(task) = self.task.take() {
            task.abort();
            // Cancelled is the expected outcome; a panic has already been reported.
            let _ = task.await;
        }
    }
}

impl Drop for Capture {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Frame polling (camera-style devices)
// ---------------------------------------------------------------------------

/// A frame source that can be sampled for a barcode.
pub trait FrameDecoder: Send + 'static {
    /// Acquire the underlying device.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Unavailable` if the device cannot be opened.
    fn acquire(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    /// Decode the latest frame, if it holds a barcode.
    fn sample(&mut self) -> Option<String>;

    /// Stop frame acquisition. Called exactly once per successful `acquire`.
    fn release(&mut self) {}
}

/// Samples a [`FrameDecoder`] on a fixed interval, yielding between samples,
/// and reports the first hit.
pub struct FramePoller<D> {
    decoder: Arc<Mutex<D>>,
    interval: Duration,
}

impl<D: FrameDecoder> FramePoller<D> {
    pub fn new(decoder: D, interval: Duration) -> Self {
        Self {
            decoder: Arc::new(Mutex::new(decoder)),
            interval,
        }
    }

    /// Shared handle to the decoder, for inspection between sessions.
    pub fn decoder(&self) -> Arc<Mutex<D>> {
        Arc::clone(&self.decoder)
    }
}

/// Calls `FrameDecoder::release` when the polling task ends, including abort.
struct ReleaseOnDrop<D: FrameDecoder>(Arc<Mutex<D>>);

impl<D: FrameDecoder> Drop for ReleaseOnDrop<D> {
    fn drop(&mut self) {
        if let Ok(mut decoder) = self.0.lock() {
            decoder.release();
        }
    }
}

impl<D: FrameDecoder> ScanDevice for FramePoller<D> {
    fn start_capture(&mut self) -> Result<Capture, TransportError> {
        self.decoder
            .lock()
            .map_err(|_| TransportError::Unavailable("decoder lock poisoned".into()))?
            .acquire()?;
        // Armed before spawning: an abort ahead of the first poll still releases.
        let release = ReleaseOnDrop(Arc::clone(&self.decoder));

        let decoder = Arc::clone(&self.decoder);
        let period = self.interval;
        Ok(Capture::spawn(move |tx| async move {
            let _release = release;
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                if tx.is_closed() {
                    return;
                }
                let hit = match decoder.lock() {
                    Ok(mut d) => d.sample(),
                    Err(_) => return,
                };
                if let Some(text) = hit {
                    let _ = tx.send(text).await;
                    return;
                }
            }
        }))
    }
}

// ---------------------------------------------------------------------------
// Line scanners (keyboard-wedge readers, pipes, stdin)
// ---------------------------------------------------------------------------

/// Line reader shared between the scanner and whoever else reads the same
/// stream (the guard terminal reads its prompts from it).
pub type SharedLines<R> = Arc<tokio::sync::Mutex<Lines<R>>>;

/// Treats each non-blank line of an async reader as one decoded pass.
pub struct LineScanner<R> {
    lines: SharedLines<R>,
}

impl<R: AsyncBufRead + Unpin + Send + 'static> LineScanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: Arc::new(tokio::sync::Mutex::new(reader.lines())),
        }
    }

    pub const fn from_shared(lines: SharedLines<R>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> SharedLines<R> {
        Arc::clone(&self.lines)
    }
}

impl<R: AsyncBufRead + Unpin + Send + 'static> ScanDevice for LineScanner<R> {
    fn start_capture(&mut self) -> Result<Capture, TransportError> {
        let lines = Arc::clone(&self.lines);
        Ok(Capture::spawn(move |tx| async move {
            let mut lines = lines.lock().await;
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) if line.trim().is_empty() => {}
                    Ok(Some(line)) => {
                        let _ = tx.send(line.trim().to_string()).await;
                        return;
                    }
                    Ok(None) => return,
                    Err(e) => {
                        tracing::warn!("scan input read failed: {e}");
                        return;
                    }
                }
            }
        }))
    }
}

// ---------------------------------------------------------------------------
// Scripted device
// ---------------------------------------------------------------------------

/// What a [`ScriptedDevice`] does for one capture session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Script {
    /// Emit this text after `delay`.
    Decode { text: String, delay: Duration },
    /// Never decode anything.
    Hang,
    /// Stop without decoding.
    Close,
    /// Refuse to start.
    Unavailable,
}

impl Script {
    pub fn decode(text: impl Into<String>) -> Self {
        Self::Decode {
            text: text.into(),
            delay: Duration::ZERO,
        }
    }
}

/// In-memory device that replays prepared sessions. Counts live captures so
/// callers can check that every capture was released.
#[derive(Debug, Default)]
pub struct ScriptedDevice {
    scripts: VecDeque<Script>,
    active: Arc<AtomicUsize>,
    started: usize,
}

impl ScriptedDevice {
    pub fn new(scripts: impl IntoIterator<Item = Script>) -> Self {
        Self {
            scripts: scripts.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Captures whose worker is still running.
    pub fn active_captures(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Captures started so far.
    pub const fn started(&self) -> usize {
        self.started
    }
}

struct ActiveGuard(Arc<AtomicUsize>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ScanDevice for ScriptedDevice {
    fn start_capture(&mut self) -> Result<Capture, TransportError> {
        let script = self.scripts.pop_front().unwrap_or(Script::Unavailable);
        if script == Script::Unavailable {
            return Err(TransportError::Unavailable("no scripted session left".into()));
        }
        self.started += 1;
        self.active.fetch_add(1, Ordering::SeqCst);
        let guard = ActiveGuard(Arc::clone(&self.active));

        Ok(Capture::spawn(move |tx| async move {
            let _guard = guard;
            match script {
                Script::Decode { text, delay } => {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(text).await;
                }
                Script::Hang => std::future::pending::<()>().await,
                Script::Close | Script::Unavailable => {}
            }
        }))
    }
}
