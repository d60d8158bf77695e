//! Player input.
//!
//! `SelectCard` and `UserPrompt` are the engine's only suspension points.
//! Each request is tagged with a [`SignalId`] and sent over the player's
//! channel with a oneshot for the reply; the engine then awaits the reply
//! with the configured timeout.
//!
//! ## Degraded Paths
//!
//! A player with no connection, a closed channel, a dropped reply sender
//! and a timeout all resolve to "no selection made". The engine logs a
//! warning and carries on.
//!
//! ## Connecting a Player
//!
//! Transports read [`InputRequest`]s from the receiver returned by
//! `Engine::connect_player`. Bots and tests can hand the receiver to
//! [`serve`] with an [`InputProvider`] instead.

mod provider;

use std::time::Duration;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use crate::core::{CardId, PlayerId};

pub use provider::{serve, FirstChoice, InputProvider, ScriptedAnswer, ScriptedInput};

/// Identifier correlating a request with its reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SignalId(pub u64);

impl std::fmt::Display for SignalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "signal-{}", self.0)
    }
}

/// How many cards a selection takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectCount {
    Exact(usize),
    UpTo(usize),
}

impl SelectCount {
    /// Upper bound on the selection size.
    #[must_use]
    pub const fn max(self) -> usize {
        match self {
            SelectCount::Exact(n) | SelectCount::UpTo(n) => n,
        }
    }
}

/// A question with a fixed set of answers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptPayload {
    pub message: String,
    pub choices: Vec<String>,

    /// Card the question is about.
    pub card: Option<CardId>,
}

impl PromptPayload {
    /// Create a prompt.
    pub fn new(message: impl Into<String>, choices: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            message: message.into(),
            choices: choices.into_iter().map(Into::into).collect(),
            card: None,
        }
    }

    /// A yes/no prompt. Choice 0 is yes.
    pub fn confirm(message: impl Into<String>) -> Self {
        Self::new(message, ["Yes", "No"])
    }

    /// Set the card (builder pattern).
    #[must_use]
    pub fn with_card(mut self, card: CardId) -> Self {
        self.card = Some(card);
        self
    }
}

/// Answer to a prompt: index into `choices`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptResponse {
    pub choice: usize,
}

/// A request to pick cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectPayload {
    pub message: String,
    pub eligible: Vec<CardId>,
    pub count: SelectCount,

    /// The player may select nothing.
    pub optional: bool,

    /// Card asking for the selection.
    pub card: Option<CardId>,
}

/// A request delivered to a player's input provider.
#[derive(Debug)]
pub enum InputRequest {
    Prompt {
        signal: SignalId,
        player: PlayerId,
        payload: PromptPayload,
        reply: oneshot::Sender<PromptResponse>,
    },
    Select {
        signal: SignalId,
        player: PlayerId,
        payload: SelectPayload,
        reply: oneshot::Sender<Vec<CardId>>,
    },
}

impl InputRequest {
    #[must_use]
    pub fn signal(&self) -> SignalId {
        match self {
            InputRequest::Prompt { signal, .. } | InputRequest::Select { signal, .. } => *signal,
        }
    }

    #[must_use]
    pub fn player(&self) -> PlayerId {
        match self {
            InputRequest::Prompt { player, .. } | InputRequest::Select { player, .. } => *player,
        }
    }
}

/// Per-player request channels.
#[derive(Debug, Default)]
pub struct PlayerInputs {
    senders: FxHashMap<PlayerId, mpsc::UnboundedSender<InputRequest>>,
    next_signal: u64,
}

impl PlayerInputs {
    /// Create with no players connected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a channel for a player, replacing any previous one.
    pub fn connect(&mut self, player: PlayerId) -> mpsc::UnboundedReceiver<InputRequest> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.insert(player, tx);
        rx
    }

    /// Drop a player's channel.
    pub fn disconnect(&mut self, player: PlayerId) {
        self.senders.remove(&player);
    }

    #[must_use]
    pub fn is_connected(&self, player: PlayerId) -> bool {
        self.senders.get(&player).is_some_and(|tx| !tx.is_closed())
    }

    /// Send a prompt. Returns `None` if the player cannot be reached.
    pub fn send_prompt(
        &mut self,
        player: PlayerId,
        payload: PromptPayload,
    ) -> Option<(SignalId, oneshot::Receiver<PromptResponse>)> {
        let signal = self.allocate_signal();
        let (reply, rx) = oneshot::channel();
        let request = InputRequest::Prompt {
            signal,
            player,
            payload,
            reply,
        };
        self.deliver(player, request).then_some((signal, rx))
    }

    /// Send a selection request. Returns `None` if the player cannot be
    /// reached.
    pub fn send_select(
        &mut self,
        player: PlayerId,
        payload: SelectPayload,
    ) -> Option<(SignalId, oneshot::Receiver<Vec<CardId>>)> {
        let signal = self.allocate_signal();
        let (reply, rx) = oneshot::channel();
        let request = InputRequest::Select {
            signal,
            player,
            payload,
            reply,
        };
        self.deliver(player, request).then_some((signal, rx))
    }

    fn allocate_signal(&mut self) -> SignalId {
        let signal = SignalId(self.next_signal);
        self.next_signal += 1;
        signal
    }

    fn deliver(&mut self, player: PlayerId, request: InputRequest) -> bool {
        let signal = request.signal();
        let Some(tx) = self.senders.get(&player) else {
            tracing::warn!(%player, %signal, "no input provider, treating as no selection");
            return false;
        };
        if tx.send(request).is_err() {
            tracing::warn!(%player, %signal, "input channel closed, treating as no selection");
            self.senders.remove(&player);
            return false;
        }
        true
    }
}

/// Wait for a reply, honouring `timeout` (`None` waits forever).
pub async fn wait_for_reply<T>(
    player: PlayerId,
    signal: SignalId,
    reply: oneshot::Receiver<T>,
    timeout: Option<Duration>,
) -> Option<T> {
    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, reply).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(%player, %signal, ?limit, "input timed out, treating as no selection");
                return None;
            }
        },
        None => reply.await,
    };

    match result {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(%player, %signal, "input provider dropped the request");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconnected_player() {
        let mut inputs = PlayerInputs::new();
        assert!(inputs.send_prompt(PlayerId::new(0), PromptPayload::confirm("?")).is_none());
        assert!(!inputs.is_connected(PlayerId::new(0)));
    }

    #[test]
    fn test_closed_channel_disconnects() {
        let mut inputs = PlayerInputs::new();
        let rx = inputs.connect(PlayerId::new(0));
        drop(rx);

        assert!(!inputs.is_connected(PlayerId::new(0)));
        assert!(inputs.send_prompt(PlayerId::new(0), PromptPayload::confirm("?")).is_none());
    }

    #[tokio::test]
    async fn test_round_trip() {
        let mut inputs = PlayerInputs::new();
        let mut rx = inputs.connect(PlayerId::new(1));

        let (signal, answer_rx) = inputs
            .send_prompt(PlayerId::new(1), PromptPayload::new("pick", ["a", "b"]))
            .unwrap();

        let request = rx.recv().await.unwrap();
        assert_eq!(request.signal(), signal);
        assert_eq!(request.player(), PlayerId::new(1));
        match request {
            InputRequest::Prompt { reply, payload, .. } => {
                assert_eq!(payload.choices, vec!["a", "b"]);
                reply.send(PromptResponse { choice: 1 }).unwrap();
            }
            InputRequest::Select { .. } => panic!("expected a prompt"),
        }

        let answer = wait_for_reply(PlayerId::new(1), signal, answer_rx, None).await;
        assert_eq!(answer, Some(PromptResponse { choice: 1 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_yields_none() {
        let mut inputs = PlayerInputs::new();
        let _rx = inputs.connect(PlayerId::new(0));
        let (signal, reply) = inputs
            .send_prompt(PlayerId::new(0), PromptPayload::confirm("?"))
            .unwrap();

        let answer = wait_for_reply(PlayerId::new(0), signal, reply, Some(Duration::from_secs(60))).await;
        assert!(answer.is_none());
    }

    #[tokio::test]
    async fn test_signals_are_unique() {
        let mut inputs = PlayerInputs::new();
        let _rx = inputs.connect(PlayerId::new(0));

        let (a, _) = inputs.send_prompt(PlayerId::new(0), PromptPayload::confirm("?")).unwrap();
        let (b, _) = inputs.send_prompt(PlayerId::new(0), PromptPayload::confirm("?")).unwrap();
        assert_ne!(a, b);
    }
}
