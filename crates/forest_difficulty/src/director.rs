//! Director link
//!
//! The adaptive director runs off the simulation thread. Its replies are
//! queued on a channel and only applied when the simulation polls at a tick
//! boundary, so a config never changes in the middle of a tick.

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::config::DifficultyConfig;
use crate::error::{DifficultyError, Result};
use crate::parse::{parse_director_reply, DirectorUpdate};

/// One message from a director
#[derive(Debug, Clone, PartialEq)]
pub enum DirectorReply {
    /// Raw reply text, parsed on poll
    Text(String),
    /// A ready-made config, e.g. a static preset
    Config(DifficultyConfig),
    /// The request failed; the current config stays
    Failed(String),
}

/// Cloneable sending side given to director threads
#[derive(Debug, Clone)]
pub struct DirectorHandle {
    sender: Sender<DirectorReply>,
}

impl DirectorHandle {
    /// Queue a reply. Returns false if the link was dropped.
    pub fn submit(&self, reply: DirectorReply) -> bool {
        self.sender.send(reply).is_ok()
    }

    /// Run `request` on a background thread and queue its outcome
    pub fn spawn_request<F>(&self, request: F) -> std::thread::JoinHandle<()>
    where
        F: FnOnce() -> std::result::Result<String, String> + Send + 'static,
    {
        let sender = self.sender.clone();
        std::thread::spawn(move || {
            let reply = match request() {
                Ok(text) => DirectorReply::Text(text),
                Err(reason) => DirectorReply::Failed(reason),
            };
            if sender.send(reply).is_err() {
                log::warn!("Director reply lost: simulation link is closed");
            }
        })
    }
}

/// Receiving side owned by the simulation
#[derive(Debug)]
pub struct DirectorLink {
    sender: Sender<DirectorReply>,
    receiver: Receiver<DirectorReply>,
}

impl Default for DirectorLink {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectorLink {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    pub fn handle(&self) -> DirectorHandle {
        DirectorHandle {
            sender: self.sender.clone(),
        }
    }

    /// Drain every queued reply.
    ///
    /// Returns the config to switch to, if any reply asked for a change.
    /// Later replies win; failures and malformed replies are logged and skipped.
    pub fn poll(&self) -> Option<DifficultyConfig> {
        let mut latest = None;

        while let Ok(reply) = self.receiver.try_recv() {
            match resolve(reply) {
                Ok(Some(config)) => latest = Some(config),
                Ok(None) => log::debug!("Director: no change"),
                Err(e) => log::warn!("Director reply dropped, keeping current difficulty: {}", e),
            }
        }

        latest
    }

    /// Replies waiting to be polled
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}

fn resolve(reply: DirectorReply) -> Result<Option<DifficultyConfig>> {
    match reply {
        DirectorReply::Text(text) => match parse_director_reply(&text)? {
            DirectorUpdate::NoChange => Ok(None),
            DirectorUpdate::Replace(config) => Ok(Some(config)),
        },
        DirectorReply::Config(config) => Ok(Some(config.sanitized())),
        DirectorReply::Failed(reason) => Err(DifficultyError::Request(reason)),
    }
}
