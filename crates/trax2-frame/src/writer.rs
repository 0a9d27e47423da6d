use std::io::{ErrorKind, Write};

use crate::encoder::Encoder;
use crate::error::{FrameError, Result};

/// Writes encoded command buffers to any `Write` stream.
///
/// Each buffer is written verbatim and followed by a flush, so one call
/// puts exactly one command on the wire.
pub struct CommandWriter<T> {
    inner: T,
    encoder: Encoder,
}

impl<T: Write> CommandWriter<T> {
    /// Create a new command writer with a big-endian encoder.
    pub fn new(inner: T) -> Self {
        Self::with_encoder(inner, Encoder::default())
    }

    pub fn with_encoder(inner: T, encoder: Encoder) -> Self {
        Self { inner, encoder }
    }

    /// The encoder used to build commands for this stream.
    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    /// Build a command with the writer's encoder and send it.
    ///
    /// ```no_run
    /// # use trax2_frame::CommandWriter;
    /// # fn demo(port: std::fs::File) -> trax2_frame::Result<()> {
    /// let mut writer = CommandWriter::new(port);
    /// writer.send_with(|enc| enc.get_module_info())?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn send_with<F, B>(&mut self, build: F) -> Result<()>
    where
        F: FnOnce(&Encoder) -> B,
        B: AsRef<[u8]>,
    {
        let command = build(&self.encoder);
        self.send(command.as_ref())
    }

    /// Write one already encoded command (blocking).
    pub fn send(&mut self, command: &[u8]) -> Result<()> {
        let mut offset = 0usize;
        while offset < command.len() {
            match self.inner.write(&command[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        tracing::trace!(bytes = command.len(), "command written");
        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
