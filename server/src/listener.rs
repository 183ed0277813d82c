use std::io::{self, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use common::telemetry;

use crate::messages::LineReader;

const THREAD_NAME: &str = "serial-listener";

/// Handle to the background thread draining device output.
///
/// The thread runs until [`Listener::stop`] is called or the handle is dropped.
/// Read errors never end it.
pub struct Listener {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Listener {
    pub fn spawn<R>(mut reader: LineReader<R>) -> io::Result<Self>
    where
        R: Read + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();

        let thread = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                log::debug!("Serial listener started");
                while flag.load(Ordering::Relaxed) {
                    poll_once(&mut reader);
                }
                log::debug!("Serial listener stopped");
            })?;

        Ok(Self {
            running,
            thread: Some(thread),
        })
    }

    #[cfg(test)]
    fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|thread| !thread.is_finished())
    }

    /// Ask the thread to finish and wait for it. Returns within one read timeout.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("Serial listener panicked");
            }
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// One loop iteration: read a line, log it, report any RSSI it carries
fn poll_once<R: Read>(reader: &mut LineReader<R>) {
    match reader.read_line() {
        Ok(Some(line)) => {
            handle_line(&line);
        }
        Ok(None) => {}
        Err(e) => {
            log::error!("[SERIAL ERROR] {}", e);
        }
    }
}

/// Log a device line and return the RSSI reading if it carries one
pub fn handle_line(line: &str) -> Option<i32> {
    log::info!("[SERIAL] {}", line);

    let rssi = telemetry::extract_rssi(line)?;
    log::info!("[RSSI] Received RSSI: {}", rssi);
    Some(rssi)
}
