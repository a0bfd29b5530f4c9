use rodio::{OutputStream, OutputStreamHandle};
use std::sync::mpsc::{channel, Sender};
use std::thread;

use crate::error::{AmbientError, Result};

/// The default output device.
///
/// `OutputStream` cannot cross threads, so a dedicated thread opens it and
/// keeps it alive; only the (Send + Sync) handle comes back. Dropping the
/// device lets that thread exit, which closes the stream.
pub struct AudioDevice {
    handle: OutputStreamHandle,
    _shutdown: Sender<()>,
}

impl AudioDevice {
    pub fn open_default() -> Result<Self> {
        let (ready_tx, ready_rx) = channel();
        let (shutdown_tx, shutdown_rx) = channel::<()>();

        thread::Builder::new()
            .name("ambient-audio-device".into())
            .spawn(move || match OutputStream::try_default() {
                Ok((stream, handle)) => {
                    let _ = ready_tx.send(Ok(handle));
                    // Returns once every sender is gone
                    let _ = shutdown_rx.recv();
                    drop(stream);
                    tracing::debug!(target: "audio", "output stream closed");
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e.to_string()));
                }
            })
            .map_err(|e| AmbientError::Device(e.to_string()))?;

        let handle = ready_rx
            .recv()
            .map_err(|e| AmbientError::Device(e.to_string()))?
            .map_err(AmbientError::Device)?;

        tracing::info!(target: "audio", "output device opened");
        Ok(Self {
            handle,
            _shutdown: shutdown_tx,
        })
    }

    pub fn handle(&self) -> &OutputStreamHandle {
        &self.handle
    }
}
