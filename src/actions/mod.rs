//! Action dispatch.
//!
//! Every state change goes through [`Engine::invoke`] with one [`Action`].
//! Actions mutate zones and counters, write the game log, fire triggers
//! and lifecycle events, and may invoke further actions (buy → gain →
//! move). All actions are async; only `SelectCard` and `UserPrompt`
//! actually suspend on player input.
//!
//! ## Action Catalogue
//!
//! | Action | Module |
//! |---|---|
//! | `MoveCard`, `GainCard`, `DrawCard`, `ShuffleDeck`, `TrashCard`, `DiscardCard`, `RevealCard` | `movement` |
//! | `PlayCard`, `BuyCard`, `BuyCardLike` | `play` |
//! | `GainAction` .. `GainVictoryToken`, `ExchangeCoffer` | `counters` |
//! | `SelectCard`, `UserPrompt` | `choice` |
//! | `CheckForRemainingPlayerActions`, `NextPhase`, `EndTurn` | `phase` |
//!
//! `Custom` resolves against the custom actions registered in the
//! `EffectRegistry` and fails with `NoHandler` when none matches.

mod choice;
mod counters;
mod movement;
mod phase;
mod play;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::core::{CardId, CardKey, PlayerId, ZoneRef};
use crate::engine::Engine;
use crate::error::{EngineError, Result};
use crate::input::{PromptPayload, PromptResponse, SelectCount};
use crate::zones::{CardLocation, ZonePosition};

/// One atomic game action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Action {
    // === Card movement ===
    MoveCard(MoveCardArgs),
    GainCard(GainCardArgs),
    DrawCard { player: PlayerId, count: usize },
    ShuffleDeck { player: PlayerId },
    TrashCard { player: PlayerId, card: CardId },
    DiscardCard { player: PlayerId, card: CardId },
    RevealCard { player: PlayerId, card: CardId, set_aside: bool },

    // === Play and buy ===
    PlayCard(PlayCardArgs),
    BuyCard(BuyCardArgs),
    BuyCardLike(BuyCardLikeArgs),

    // === Counters ===
    GainAction(CounterArgs),
    GainBuy(CounterArgs),
    GainTreasure(CounterArgs),
    GainPotion(CounterArgs),
    GainCoffer(CounterArgs),
    ExchangeCoffer(CounterArgs),
    GainVictoryToken(CounterArgs),

    // === Player input ===
    SelectCard(SelectCardArgs),
    UserPrompt { player: PlayerId, payload: PromptPayload },

    // === Turn structure ===
    CheckForRemainingPlayerActions,
    NextPhase,
    EndTurn,

    /// Expansion-defined action, resolved by name.
    Custom { name: String, args: serde_json::Value },
}

impl Action {
    /// Name used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Action::MoveCard(_) => "moveCard",
            Action::GainCard(_) => "gainCard",
            Action::DrawCard { .. } => "drawCard",
            Action::ShuffleDeck { .. } => "shuffleDeck",
            Action::TrashCard { .. } => "trashCard",
            Action::DiscardCard { .. } => "discardCard",
            Action::RevealCard { .. } => "revealCard",
            Action::PlayCard(_) => "playCard",
            Action::BuyCard(_) => "buyCard",
            Action::BuyCardLike(_) => "buyCardLike",
            Action::GainAction(_) => "gainAction",
            Action::GainBuy(_) => "gainBuy",
            Action::GainTreasure(_) => "gainTreasure",
            Action::GainPotion(_) => "gainPotion",
            Action::GainCoffer(_) => "gainCoffer",
            Action::ExchangeCoffer(_) => "exchangeCoffer",
            Action::GainVictoryToken(_) => "gainVictoryToken",
            Action::SelectCard(_) => "selectCard",
            Action::UserPrompt { .. } => "userPrompt",
            Action::CheckForRemainingPlayerActions => "checkForRemainingPlayerActions",
            Action::NextPhase => "nextPhase",
            Action::EndTurn => "endTurn",
            Action::Custom { name, .. } => name,
        }
    }
}

/// Result of an action.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ActionOutcome {
    #[default]
    Done,
    /// Where a moved card was before the move.
    PreviousLocation(Option<CardLocation>),
    /// A single card, or none when the action found nothing to act on.
    Card(Option<CardId>),
    Cards(Vec<CardId>),
    /// New counter value.
    Count(u32),
    Response(Option<PromptResponse>),
    /// Result of a custom action.
    Value(serde_json::Value),
}

impl ActionOutcome {
    /// Cards carried by the outcome, if any.
    #[must_use]
    pub fn cards(&self) -> Vec<CardId> {
        match self {
            ActionOutcome::Cards(cards) => cards.clone(),
            ActionOutcome::Card(Some(card)) => vec![*card],
            _ => Vec::new(),
        }
    }

    #[must_use]
    pub fn card(&self) -> Option<CardId> {
        match self {
            ActionOutcome::Card(card) => *card,
            ActionOutcome::Cards(cards) => cards.first().copied(),
            _ => None,
        }
    }
}

// === Arguments ===

/// Arguments for `MoveCard`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCardArgs {
    pub card: CardId,

    /// Destination. Exactly one is required.
    pub to: SmallVec<[ZoneRef; 1]>,

    pub position: ZonePosition,
}

impl MoveCardArgs {
    /// Move `card` to the top of `to`.
    #[must_use]
    pub fn new(card: CardId, to: ZoneRef) -> Self {
        Self {
            card,
            to: smallvec![to],
            position: ZonePosition::Top,
        }
    }

    /// Set the insert position (builder pattern).
    #[must_use]
    pub fn at(mut self, position: ZonePosition) -> Self {
        self.position = position;
        self
    }
}

/// What `GainCard` and `BuyCard` act on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardTarget {
    /// A specific copy.
    Card(CardId),
    /// Top of the supply or kingdom pile for a key.
    Pile(CardKey),
}

/// Arguments for `GainCard`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GainCardArgs {
    pub player: PlayerId,
    pub target: CardTarget,

    /// Destination; defaults to the player's discard.
    pub to: ZoneRef,

    pub bought: bool,

    /// Skip the card's `OnGained` hook.
    pub suppress_on_gained: bool,
}

impl GainCardArgs {
    /// Gain the top of a pile into `player`'s discard.
    pub fn pile(player: PlayerId, key: impl Into<CardKey>) -> Self {
        Self::new(player, CardTarget::Pile(key.into()))
    }

    /// Gain a specific copy into `player`'s discard.
    #[must_use]
    pub fn card(player: PlayerId, card: CardId) -> Self {
        Self::new(player, CardTarget::Card(card))
    }

    fn new(player: PlayerId, target: CardTarget) -> Self {
        Self {
            player,
            target,
            to: ZoneRef::discard(player),
            bought: false,
            suppress_on_gained: false,
        }
    }

    /// Set the destination (builder pattern).
    #[must_use]
    pub fn to(mut self, zone: ZoneRef) -> Self {
        self.to = zone;
        self
    }

    /// Mark as bought (builder pattern).
    #[must_use]
    pub fn bought(mut self) -> Self {
        self.bought = true;
        self
    }

    /// Skip `OnGained` (builder pattern).
    #[must_use]
    pub fn suppress_on_gained(mut self) -> Self {
        self.suppress_on_gained = true;
        self
    }
}

/// Arguments for `PlayCard`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayCardArgs {
    pub player: PlayerId,
    pub card: CardId,

    /// Move the card to the play area first.
    pub move_to_play: bool,

    /// Do not spend an action for an ACTION card.
    pub free: bool,
}

impl PlayCardArgs {
    #[must_use]
    pub fn new(player: PlayerId, card: CardId) -> Self {
        Self {
            player,
            card,
            move_to_play: true,
            free: false,
        }
    }

    /// Leave the card where it is (builder pattern).
    #[must_use]
    pub fn in_place(mut self) -> Self {
        self.move_to_play = false;
        self
    }

    /// Waive the action cost (builder pattern).
    #[must_use]
    pub fn free(mut self) -> Self {
        self.free = true;
        self
    }
}

/// Arguments for `BuyCard`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyCardArgs {
    pub player: PlayerId,
    pub target: CardTarget,

    /// Extra treasure paid on top of the cost.
    pub overpay: u32,
}

impl BuyCardArgs {
    pub fn pile(player: PlayerId, key: impl Into<CardKey>) -> Self {
        Self {
            player,
            target: CardTarget::Pile(key.into()),
            overpay: 0,
        }
    }

    #[must_use]
    pub fn card(player: PlayerId, card: CardId) -> Self {
        Self {
            player,
            target: CardTarget::Card(card),
            overpay: 0,
        }
    }

    /// Set the overpay (builder pattern).
    #[must_use]
    pub fn with_overpay(mut self, overpay: u32) -> Self {
        self.overpay = overpay;
        self
    }
}

/// Arguments for `BuyCardLike`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyCardLikeArgs {
    pub player: PlayerId,
    pub key: CardKey,
    pub overpay: u32,
}

impl BuyCardLikeArgs {
    pub fn new(player: PlayerId, key: impl Into<CardKey>) -> Self {
        Self {
            player,
            key: key.into(),
            overpay: 0,
        }
    }
}

/// Arguments for the counter actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterArgs {
    pub player: PlayerId,

    /// Signed change; the counter clamps at zero.
    pub count: i64,

    /// Skip the log entry.
    pub silent: bool,
}

impl CounterArgs {
    #[must_use]
    pub fn new(player: PlayerId, count: i64) -> Self {
        Self {
            player,
            count,
            silent: false,
        }
    }

    /// Skip the log entry (builder pattern).
    #[must_use]
    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }
}

/// Arguments for `SelectCard`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectCardArgs {
    pub player: PlayerId,
    pub message: String,
    pub eligible: Vec<CardId>,
    pub count: SelectCount,
    pub optional: bool,

    /// Card asking for the selection.
    pub card: Option<CardId>,
}

impl SelectCardArgs {
    /// Ask `player` to pick exactly `count` of `eligible`.
    pub fn exact(player: PlayerId, message: impl Into<String>, eligible: Vec<CardId>, count: usize) -> Self {
        Self {
            player,
            message: message.into(),
            eligible,
            count: SelectCount::Exact(count),
            optional: false,
            card: None,
        }
    }

    /// Ask `player` to pick up to `count` of `eligible`, possibly none.
    pub fn up_to(player: PlayerId, message: impl Into<String>, eligible: Vec<CardId>, count: usize) -> Self {
        Self {
            player,
            message: message.into(),
            eligible,
            count: SelectCount::UpTo(count),
            optional: true,
            card: None,
        }
    }

    /// Set the requesting card (builder pattern).
    #[must_use]
    pub fn from_card(mut self, card: CardId) -> Self {
        self.card = Some(card);
        self
    }
}

// === Dispatch ===

impl Engine {
    /// Run one action to completion.
    pub fn invoke(&mut self, action: Action) -> BoxFuture<'_, Result<ActionOutcome>> {
        Box::pin(async move {
            tracing::debug!(action = action.name(), "invoke");
            match action {
                Action::MoveCard(args) => self.move_card(args).await.map(ActionOutcome::PreviousLocation),
                Action::GainCard(args) => self.gain_card(args).await.map(ActionOutcome::Card),
                Action::DrawCard { player, count } => self.draw_card(player, count).await.map(ActionOutcome::Cards),
                Action::ShuffleDeck { player } => self.shuffle_deck(player).await.map(|()| ActionOutcome::Done),
                Action::TrashCard { player, card } => {
                    self.trash_card(player, card).await.map(ActionOutcome::PreviousLocation)
                }
                Action::DiscardCard { player, card } => {
                    self.discard_card(player, card).await.map(ActionOutcome::PreviousLocation)
                }
                Action::RevealCard { player, card, set_aside } => {
                    self.reveal_card(player, card, set_aside).await.map(|()| ActionOutcome::Done)
                }

                Action::PlayCard(args) => self.play_card(args).await.map(|()| ActionOutcome::Done),
                Action::BuyCard(args) => self.buy_card(args).await.map(ActionOutcome::Card),
                Action::BuyCardLike(args) => self.buy_card_like(args).await.map(|()| ActionOutcome::Done),

                Action::GainAction(args) => Ok(ActionOutcome::Count(self.gain_action(args))),
                Action::GainBuy(args) => Ok(ActionOutcome::Count(self.gain_buy(args))),
                Action::GainTreasure(args) => Ok(ActionOutcome::Count(self.gain_treasure(args))),
                Action::GainPotion(args) => Ok(ActionOutcome::Count(self.gain_potion(args))),
                Action::GainCoffer(args) => Ok(ActionOutcome::Count(self.gain_coffer(args))),
                Action::ExchangeCoffer(args) => Ok(ActionOutcome::Count(self.exchange_coffer(args))),
                Action::GainVictoryToken(args) => Ok(ActionOutcome::Count(self.gain_victory_token(args))),

                Action::SelectCard(args) => Ok(ActionOutcome::Cards(self.select_card(args).await)),
                Action::UserPrompt { player, payload } => {
                    Ok(ActionOutcome::Response(self.user_prompt(player, payload).await))
                }

                Action::CheckForRemainingPlayerActions => {
                    self.check_for_remaining_player_actions().await.map(|()| ActionOutcome::Done)
                }
                Action::NextPhase => self.next_phase().await.map(|()| ActionOutcome::Done),
                Action::EndTurn => self.end_turn().await.map(|()| ActionOutcome::Done),

                Action::Custom { name, args } => {
                    let handler = self
                        .effects()
                        .custom_action(&name)
                        .ok_or(EngineError::NoHandler(name))?;
                    handler(self, args).await
                }
            }
        })
    }
}
