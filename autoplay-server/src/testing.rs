//! In-memory transport for unit tests

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;

use autoplay_utils::{AutoplayError, Result};

use crate::adb::{DeviceInfo, Transport};

#[derive(Debug, Clone)]
enum Reply {
    Output(String),
    Fail(String),
}

/// Transport that replays scripted outputs and records every command
///
/// Each command has a queue of replies; the last reply in a queue repeats
/// forever. Commands without a script answer with empty output.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    devices: Mutex<Vec<DeviceInfo>>,
    connect_reply: Mutex<Option<Reply>>,
    commands: Mutex<Vec<String>>,
    connects: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an output for `command`
    pub fn on(&self, command: &str, output: &str) -> &Self {
        self.replies
            .lock()
            .entry(command.to_string())
            .or_default()
            .push_back(Reply::Output(output.to_string()));
        self
    }

    /// Queue a failure for `command`
    pub fn fail_on(&self, command: &str, message: &str) -> &Self {
        self.replies
            .lock()
            .entry(command.to_string())
            .or_default()
            .push_back(Reply::Fail(message.to_string()));
        self
    }

    pub fn with_devices(self, devices: Vec<DeviceInfo>) -> Self {
        *self.devices.lock() = devices;
        self
    }

    /// Id returned by `connect`
    pub fn connect_returns(self, id: &str) -> Self {
        *self.connect_reply.lock() = Some(Reply::Output(id.to_string()));
        self
    }

    /// Shell commands issued so far, in order
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().clone()
    }

    /// Number of times `command` was issued
    pub fn count(&self, command: &str) -> usize {
        self.commands.lock().iter().filter(|c| *c == command).count()
    }

    /// Addresses passed to `connect`
    pub fn connects(&self) -> Vec<String> {
        self.connects.lock().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn list_devices(&self) -> Result<Vec<DeviceInfo>> {
        Ok(self.devices.lock().clone())
    }

    async fn connect(&self, addr: &str) -> Result<String> {
        self.connects.lock().push(addr.to_string());
        match self.connect_reply.lock().clone() {
            Some(Reply::Output(id)) => Ok(id),
            Some(Reply::Fail(message)) => Err(AutoplayError::ConnectFailed {
                addr: addr.to_string(),
                message,
            }),
            None => Ok(addr.to_string()),
        }
    }

    async fn shell(&self, _device: &str, command: &str) -> Result<String> {
        self.commands.lock().push(command.to_string());

        let reply = {
            let mut replies = self.replies.lock();
            match replies.get_mut(command) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Output(output)) => Ok(output),
            Some(Reply::Fail(message)) => Err(AutoplayError::transport(command, message)),
            None => Ok(String::new()),
        }
    }
}
