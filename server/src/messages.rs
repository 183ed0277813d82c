use common::message::Command;
use serialport::SerialPort;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::sync::Mutex;

use crate::config::{BAUD_RATE, READ_TIMEOUT};
use crate::error::LinkError;

/// Line delimiter byte for inbound device output
const LINE_DELIMITER: u8 = b'\n';

/// The open connection to the necklace bridge
pub struct SerialLink {
    port: Box<dyn SerialPort>,
}

impl SerialLink {
    /// Open the serial port at the bridge's fixed baud rate and read timeout
    pub fn open(port_path: &str) -> Result<Self, LinkError> {
        let port = serialport::new(port_path, BAUD_RATE)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|source| LinkError::Open {
                path: port_path.to_string(),
                source,
            })?;

        Ok(Self { port })
    }

    /// Split into the writer used by request handlers and a cloned handle for the listener
    pub fn split(self) -> Result<(CommandSender, LineReader<Box<dyn SerialPort>>), LinkError> {
        let reader = self.port.try_clone().map_err(|source| LinkError::Open {
            path: self.port.name().unwrap_or_default(),
            source,
        })?;

        Ok((CommandSender::new(self.port), LineReader::new(reader)))
    }
}

/// Writes protocol lines to the device. Fire and forget, nothing is awaited.
pub struct CommandSender {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl CommandSender {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    /// Write one command line and flush it
    pub fn send(&self, command: &Command) -> Result<(), LinkError> {
        log::info!("Sending: {}", command);
        self.write_line(&command.to_line())
    }

    fn write_line(&self, line: &str) -> Result<(), LinkError> {
        let mut writer = self.writer.lock().map_err(|_| LinkError::LockPoisoned)?;
        writer.write_all(line.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

/// Reads newline-delimited text from the device
pub struct LineReader<R> {
    inner: BufReader<R>,
    buffer: Vec<u8>,
}

impl<R: Read> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
            buffer: Vec::new(),
        }
    }

    /// Read the next line.
    ///
    /// Returns `Ok(None)` when the read timed out, hit end of stream or the line was
    /// blank. Bytes of a line cut short by a timeout are kept for the next call.
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        match self.inner.read_until(LINE_DELIMITER, &mut self.buffer) {
            Ok(0) => Ok(None),
            Ok(_) => {
                let line = String::from_utf8_lossy(&self.buffer).trim().to_string();
                self.buffer.clear();
                Ok(Some(line).filter(|line| !line.is_empty()))
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(None),
            Err(e) => Err(e),
        }
    }
}
