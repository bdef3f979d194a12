//! Transport between a chat panel and its message relay.
//!
//! The chat module only ever sees text frames and open/close notifications,
//! so transports stay swappable: [`LocalRelay`] for offline use and
//! [`ChannelRelay`] for an in-process peer.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use crate::error::{DeskError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    Opened,
    Frame(String),
    Closed,
}

pub trait ChatRelay: std::fmt::Debug {
    fn is_open(&self) -> bool;

    fn send(&mut self, frame: String) -> Result<()>;

    /// Next pending event, if any. Never blocks.
    fn poll(&mut self) -> Option<RelayEvent>;
}

/// Offline relay: always open, announces itself once and drops every frame.
#[derive(Debug)]
pub struct LocalRelay {
    pending: VecDeque<RelayEvent>,
    #[cfg(test)]
    sent: Vec<String>,
}

impl LocalRelay {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::from([RelayEvent::Opened]),
            #[cfg(test)]
            sent: Vec::new(),
        }
    }

    #[cfg(test)]
    fn sent(&self) -> &[String] {
        &self.sent
    }
}

impl Default for LocalRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatRelay for LocalRelay {
    fn is_open(&self) -> bool {
        true
    }

    fn send(&mut self, frame: String) -> Result<()> {
        #[cfg(test)]
        self.sent.push(frame);
        #[cfg(not(test))]
        drop(frame);
        Ok(())
    }

    fn poll(&mut self) -> Option<RelayEvent> {
        self.pending.pop_front()
    }
}

/// One end of an in-process relay pair.
#[derive(Debug)]
pub struct ChannelRelay {
    outgoing: Sender<String>,
    incoming: Receiver<String>,
    open: bool,
    announced: bool,
}

/// The other end: what a server would see.
#[derive(Debug)]
pub struct RelayPeer {
    outgoing: Sender<String>,
    incoming: Receiver<String>,
}

impl ChannelRelay {
    pub fn pair() -> (ChannelRelay, RelayPeer) {
        let (to_peer, from_client) = mpsc::channel();
        let (to_client, from_peer) = mpsc::channel();
        (
            ChannelRelay {
                outgoing: to_peer,
                incoming: from_peer,
                open: true,
                announced: false,
            },
            RelayPeer {
                outgoing: to_client,
                incoming: from_client,
            },
        )
    }
}

impl ChatRelay for ChannelRelay {
    fn is_open(&self) -> bool {
        self.open
    }

    fn send(&mut self, frame: String) -> Result<()> {
        if !self.open {
            return Err(DeskError::RelayClosed);
        }
        self.outgoing.send(frame).map_err(|_| {
            self.open = false;
            DeskError::RelayClosed
        })
    }

    fn poll(&mut self) -> Option<RelayEvent> {
        if !self.announced {
            self.announced = true;
            return Some(RelayEvent::Opened);
        }
        if !self.open {
            return None;
        }
        match self.incoming.try_recv() {
            Ok(frame) => Some(RelayEvent::Frame(frame)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.open = false;
                Some(RelayEvent::Closed)
            }
        }
    }
}

impl RelayPeer {
    pub fn push(&self, frame: impl Into<String>) -> bool {
        self.outgoing.send(frame.into()).is_ok()
    }

    pub fn received(&self) -> Vec<String> {
        self.incoming.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_relay_opens_once_and_accepts_sends() {
        let mut relay = LocalRelay::new();
        assert_eq!(relay.poll(), Some(RelayEvent::Opened));
        assert_eq!(relay.poll(), None);
        assert!(relay.is_open());
        assert!(relay.send("hi".into()).is_ok());
        assert!(relay.send("again".into()).is_ok());
        assert_eq!(relay.sent(), ["hi".to_string(), "again".to_string()]);
        assert_eq!(relay.poll(), None);
    }

    #[test]
    fn channel_relay_carries_frames_both_ways() {
        let (mut relay, peer) = ChannelRelay::pair();
        assert_eq!(relay.poll(), Some(RelayEvent::Opened));
        assert_eq!(relay.poll(), None);
        relay.send("up".into()).unwrap();
        assert_eq!(peer.received(), vec!["up".to_string()]);
        assert!(peer.push("down"));
        assert_eq!(relay.poll(), Some(RelayEvent::Frame("down".into())));
        drop(peer);
        assert_eq!(relay.poll(), Some(RelayEvent::Closed));
        assert!(!relay.is_open());
    }
}
