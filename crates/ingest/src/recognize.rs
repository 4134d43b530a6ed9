//! Optical character recognition over embedded images.
//!
//! The [`Recognizer`] trait is the seam; [`CommandRecognizer`] drives an
//! external OCR binary (tesseract by default) through stdin/stdout.

use std::io::{self, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::warn;

use crate::config::ExtractConfig;
use crate::error::RecognitionError;
use crate::types::EmbeddedImage;

/// Turns encoded image bytes into text.
pub trait Recognizer: Send + Sync {
    fn recognize(&self, image: &[u8]) -> Result<String, RecognitionError>;

    /// Recognize with a bound on wall time, releasing every resource on
    /// expiry. `None` means this recognizer cannot bound itself.
    fn recognize_within(&self, _image: &[u8], _timeout: Duration) -> Option<Result<String, RecognitionError>> {
        None
    }
}

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Recognizes nothing. Used when OCR is disabled or unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRecognizer;

impl Recognizer for NoopRecognizer {
    fn recognize(&self, _image: &[u8]) -> Result<String, RecognitionError> {
        Ok(String::new())
    }
}

/// Runs an external program that reads an image on stdin and writes text to stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
}

impl Default for CommandRecognizer {
    fn default() -> Self {
        Self::new("tesseract", ["stdin", "stdout"])
    }
}

impl CommandRecognizer {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a whitespace separated command line such as `"tesseract stdin stdout"`.
    ///
    /// Returns `None` for an empty string.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program, parts))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl CommandRecognizer {
    fn run(&self, image: &[u8], timeout: Option<Duration>) -> Result<String, RecognitionError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RecognitionError::Spawn(format!("{}: {e}", self.program)))?;

        // Feed stdin and drain both outputs on their own threads so a chatty
        // child never blocks on a full pipe while we poll it.
        let writer = child.stdin.take().map(|mut stdin| {
            let bytes = image.to_vec();
            thread::spawn(move || stdin.write_all(&bytes))
        });
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let status = match timeout {
            None => child.wait(),
            Some(limit) => match wait_until(&mut child, limit) {
                Ok(Some(status)) => Ok(status),
                Ok(None) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    warn!(program = %self.program, pid = child.id(), "recognizer_killed");
                    return Err(RecognitionError::Timeout(limit));
                }
                Err(e) => Err(e),
            },
        }
        .map_err(|e| RecognitionError::Other(e.to_string()))?;

        if let Some(handle) = writer {
            match handle.join() {
                Ok(Ok(())) => {}
                // A child that exits before reading everything is judged by its status.
                Ok(Err(_)) => {}
                Err(_) => return Err(RecognitionError::Other("stdin writer panicked".into())),
            }
        }
        let stdout = collect(stdout)?;
        let stderr = collect(stderr)?;

        if !status.success() {
            return Err(RecognitionError::Failed {
                status: status.to_string(),
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

impl Recognizer for CommandRecognizer {
    fn recognize(&self, image: &[u8]) -> Result<String, RecognitionError> {
        self.run(image, None)
    }

    /// Kills the child once `timeout` elapses.
    fn recognize_within(&self, image: &[u8], timeout: Duration) -> Option<Result<String, RecognitionError>> {
        Some(self.run(image, Some(timeout)))
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn collect(handle: Option<JoinHandle<io::Result<Vec<u8>>>>) -> Result<Vec<u8>, RecognitionError> {
    match handle.map(JoinHandle::join) {
        None => Ok(Vec::new()),
        Some(Ok(Ok(buf))) => Ok(buf),
        Some(Ok(Err(e))) => Err(RecognitionError::Other(e.to_string())),
        Some(Err(_)) => Err(RecognitionError::Other("output reader panicked".into())),
    }
}

/// Poll `child` until it exits or `limit` elapses. `None` means still running.
fn wait_until(child: &mut Child, limit: Duration) -> io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

/// Run one recognition, giving up after `timeout`.
///
/// Recognizers that bound themselves through [`Recognizer::recognize_within`]
/// are trusted to clean up. Any other recognizer runs on a watchdog thread
/// that is detached on timeout and its result discarded.
pub fn recognize_with_timeout(
    recognizer: &Arc<dyn Recognizer>,
    image: &[u8],
    timeout: Option<Duration>,
) -> Result<String, RecognitionError> {
    let Some(timeout) = timeout else {
        return recognizer.recognize(image);
    };
    if let Some(result) = recognizer.recognize_within(image, timeout) {
        return result;
    }

    let (tx, rx) = mpsc::channel();
    let worker = Arc::clone(recognizer);
    let bytes = image.to_vec();
    thread::spawn(move || {
        let _ = tx.send(worker.recognize(&bytes));
    });

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => Err(RecognitionError::Timeout(timeout)),
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            Err(RecognitionError::Other("recognizer panicked".into()))
        }
    }
}

/// Recognize every image, preserving input order.
pub fn recognize_all(
    images: &[EmbeddedImage],
    recognizer: &Arc<dyn Recognizer>,
    cfg: &ExtractConfig,
) -> Vec<Result<String, RecognitionError>> {
    let run = |image: &EmbeddedImage| {
        recognize_with_timeout(recognizer, &image.bytes, cfg.recognition_timeout)
    };
    if cfg.parallel && images.len() > 1 {
        images.par_iter().map(run).collect()
    } else {
        images.iter().map(run).collect()
    }
}
