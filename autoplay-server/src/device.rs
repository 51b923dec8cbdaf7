//! The device being driven, bound to its transport

use std::fmt;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use autoplay_protocol::ResumeAction;
use autoplay_utils::Result;

use crate::adb::{commands, Transport};

/// Handle to the selected device
///
/// Cheap to clone; every clone shares the transport and the session lock.
/// The session lock serializes whole poll cycles against manual key sends
/// from the control endpoint so the two never interleave on the device.
#[derive(Clone)]
pub struct Device {
    id: String,
    transport: Arc<dyn Transport>,
    session: Arc<Mutex<()>>,
}

impl Device {
    pub fn new(id: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            id: id.into(),
            transport,
            session: Arc::new(Mutex::new(())),
        }
    }

    /// Device identifier (`host:port` or serial)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Run a shell command on the device
    pub async fn shell(&self, command: &str) -> Result<String> {
        debug!(device = %self.id, command = %command, "shell");
        self.transport.shell(&self.id, command).await
    }

    /// Inject a key event
    pub async fn send_key(&self, key: &str) -> Result<()> {
        self.shell(&commands::key_event(key)).await.map(|_| ())
    }

    /// Perform a resume action, waiting for the command to finish
    pub async fn perform(&self, action: &ResumeAction) -> Result<()> {
        self.shell(&action.shell_command()).await.map(|_| ())
    }

    /// Take exclusive use of the device session
    pub async fn lock_session(&self) -> MutexGuard<'_, ()> {
        self.session.lock().await
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device").field("id", &self.id).finish()
    }
}
