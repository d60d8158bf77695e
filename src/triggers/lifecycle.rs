//! Lifecycle events.
//!
//! Card lifecycle events run the hook a card's key defines when that card
//! crosses a zone boundary. Game lifecycle events run every hook an
//! expansion registered for the event.

use serde::{Deserialize, Serialize};

use crate::core::{CardId, PlayerId};
use crate::zones::CardLocation;

/// Hook points for cards and expansions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LifecycleEvent {
    // === Card scoped ===
    OnEnterHand,
    OnLeaveHand,
    OnEnterPlay,
    OnLeavePlay,
    OnGained,
    OnTrashed,
    OnDiscarded,
    OnCardPlayed,

    // === Game scoped ===
    OnGameStart,
    OnCardGained,
}

impl LifecycleEvent {
    /// Is this an expansion-wide event rather than a per-card one?
    #[must_use]
    pub const fn is_game_event(self) -> bool {
        matches!(self, LifecycleEvent::OnGameStart | LifecycleEvent::OnCardGained)
    }
}

impl std::fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LifecycleEvent::OnEnterHand => "onEnterHand",
            LifecycleEvent::OnLeaveHand => "onLeaveHand",
            LifecycleEvent::OnEnterPlay => "onEnterPlay",
            LifecycleEvent::OnLeavePlay => "onLeavePlay",
            LifecycleEvent::OnGained => "onGained",
            LifecycleEvent::OnTrashed => "onTrashed",
            LifecycleEvent::OnDiscarded => "onDiscarded",
            LifecycleEvent::OnCardPlayed => "onCardPlayed",
            LifecycleEvent::OnGameStart => "onGameStart",
            LifecycleEvent::OnCardGained => "onCardGained",
        };
        f.write_str(name)
    }
}

/// Arguments passed to a lifecycle hook.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleArgs {
    pub card: Option<CardId>,
    pub player: Option<PlayerId>,
    pub previous: Option<CardLocation>,
    pub bought: bool,
}

impl LifecycleArgs {
    /// Arguments about one card.
    #[must_use]
    pub fn for_card(card: CardId, player: Option<PlayerId>) -> Self {
        Self {
            card: Some(card),
            player,
            ..Self::default()
        }
    }

    /// Set the previous location (builder pattern).
    #[must_use]
    pub fn with_previous(mut self, previous: Option<CardLocation>) -> Self {
        self.previous = previous;
        self
    }

    /// Mark as a purchase (builder pattern).
    #[must_use]
    pub fn bought(mut self, bought: bool) -> Self {
        self.bought = bought;
        self
    }
}
