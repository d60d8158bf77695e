//! Trigger descriptors.
//!
//! A `Trigger` is broadcast through the reaction bus once per qualifying
//! action. It carries the payload reaction conditions filter on.

use serde::{Deserialize, Serialize};

use crate::core::{CardId, CardKey, PlayerId, TurnPhase};
use crate::zones::CardLocation;

/// The kinds of trigger the engine broadcasts.
///
/// Expansions fire their own with `Custom`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggerKind {
    CardGained,
    CardPlayed,
    AfterCardPlayed,
    CardTrashed,
    DiscardCard,
    StartTurn,
    StartTurnPhase,
    EndTurnPhase,
    EndTurn,
    Custom(String),
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriggerKind::CardGained => f.write_str("cardGained"),
            TriggerKind::CardPlayed => f.write_str("cardPlayed"),
            TriggerKind::AfterCardPlayed => f.write_str("afterCardPlayed"),
            TriggerKind::CardTrashed => f.write_str("cardTrashed"),
            TriggerKind::DiscardCard => f.write_str("discardCard"),
            TriggerKind::StartTurn => f.write_str("startTurn"),
            TriggerKind::StartTurnPhase => f.write_str("startTurnPhase"),
            TriggerKind::EndTurnPhase => f.write_str("endTurnPhase"),
            TriggerKind::EndTurn => f.write_str("endTurn"),
            TriggerKind::Custom(name) => f.write_str(name),
        }
    }
}

/// An event broadcast to reaction templates.
///
/// ## Payload
///
/// - `player`: the player the event happened to
/// - `card`: the card involved, if any
/// - `previous`: where that card was before the action
/// - `phase`: the phase being entered or left
/// - `bought`: a gain that came from a purchase
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub kind: TriggerKind,
    pub player: Option<PlayerId>,
    pub card: Option<CardId>,
    pub previous: Option<CardLocation>,
    pub phase: Option<TurnPhase>,
    pub bought: bool,
}

impl Trigger {
    /// Create a trigger with an empty payload.
    #[must_use]
    pub fn new(kind: TriggerKind) -> Self {
        Self {
            kind,
            player: None,
            card: None,
            previous: None,
            phase: None,
            bought: false,
        }
    }

    /// Set the player (builder pattern).
    #[must_use]
    pub fn with_player(mut self, player: PlayerId) -> Self {
        self.player = Some(player);
        self
    }

    /// Set the card (builder pattern).
    #[must_use]
    pub fn with_card(mut self, card: CardId) -> Self {
        self.card = Some(card);
        self
    }

    /// Set the previous location (builder pattern).
    #[must_use]
    pub fn with_previous(mut self, previous: Option<CardLocation>) -> Self {
        self.previous = previous;
        self
    }

    /// Set the phase (builder pattern).
    #[must_use]
    pub fn with_phase(mut self, phase: TurnPhase) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Mark as a purchase (builder pattern).
    #[must_use]
    pub fn bought(mut self, bought: bool) -> Self {
        self.bought = bought;
        self
    }
}

/// Identifier of a registered reaction template.
///
/// Namespaced by card instance: `"<cardKey>:<cardId>:<event>"`, so two
/// copies of the same card never collide.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReactionId(String);

impl ReactionId {
    /// Build the id for a card instance listening for `kind`.
    #[must_use]
    pub fn new(key: &CardKey, card: CardId, kind: &TriggerKind) -> Self {
        Self(format!("{key}:{}:{kind}", card.raw()))
    }

    /// Get the id text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
