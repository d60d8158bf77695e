//! Card movement actions.

use crate::core::{CardId, PlayerId, StatEntry, StatKind, ZoneName, ZoneRef};
use crate::engine::Engine;
use crate::error::{EngineError, Result};
use crate::log::{LogEntry, LogKind};
use crate::triggers::{LifecycleArgs, LifecycleEvent, ReactionContext, Trigger, TriggerKind};
use crate::zones::{CardLocation, ZonePosition};

use super::{CardTarget, GainCardArgs, MoveCardArgs};

impl Engine {
    /// Move a card to exactly one destination.
    ///
    /// A card with no current location is placed anyway, with a warning.
    /// Returns where the card was.
    pub async fn move_card(&mut self, args: MoveCardArgs) -> Result<Option<CardLocation>> {
        let card = args.card;
        let [to] = args.to.as_slice() else {
            return Err(EngineError::InvalidDestination {
                card,
                count: args.to.len(),
            });
        };
        let to = to.clone();
        if !self.zones.is_registered(&to) {
            return Err(EngineError::ZoneNotRegistered(to));
        }
        let owner = self.cards.require(card)?.owner;

        let previous = self.zones.take(card);
        if previous.is_none() {
            tracing::warn!(%card, destination = %to, "card has no previous location");
        }
        self.zones.insert(&to, card, args.position)?;
        tracing::trace!(%card, from = ?previous.as_ref().map(|l| l.zone.to_string()), to = %to, "card moved");

        let from_name = previous.as_ref().map(|location| &location.zone.name);
        let leaves_hand = from_name == Some(&ZoneName::Hand) && to.name != ZoneName::Hand;
        let enters_hand = to.name == ZoneName::Hand && from_name != Some(&ZoneName::Hand);
        let leaves_play = from_name.is_some_and(|name| name.is_play_zone() && *name != to.name);
        let enters_play = to.name.is_play_zone() && from_name != Some(&to.name);

        let from_player = previous.as_ref().and_then(|location| location.zone.player).or(owner);
        let to_player = to.player.or(owner);
        let args_for = |player| LifecycleArgs::for_card(card, player).with_previous(previous.clone());

        if leaves_hand {
            self.run_card_lifecycle_event(LifecycleEvent::OnLeaveHand, args_for(from_player))
                .await?;
        }
        if leaves_play {
            self.run_card_lifecycle_event(LifecycleEvent::OnLeavePlay, args_for(from_player))
                .await?;
        }
        if enters_hand {
            self.run_card_lifecycle_event(LifecycleEvent::OnEnterHand, args_for(to_player))
                .await?;
        }
        if enters_play {
            self.run_card_lifecycle_event(LifecycleEvent::OnEnterPlay, args_for(to_player))
                .await?;
        }

        Ok(previous)
    }

    /// Gain a card. Returns `None` when the pile is empty.
    pub async fn gain_card(&mut self, args: GainCardArgs) -> Result<Option<CardId>> {
        let player = args.player;
        let card = match &args.target {
            CardTarget::Card(id) => *id,
            CardTarget::Pile(key) => {
                if self.cards.definition(key).is_none() {
                    return Err(EngineError::UnknownCardKey(key.clone()));
                }
                match self.pile_top(key) {
                    Some(id) => id,
                    None => {
                        tracing::warn!(%player, %key, "pile is empty, nothing gained");
                        return Ok(None);
                    }
                }
            }
        };
        let key = self.cards.require(card)?.key.clone();

        let destination = self.state.zone_overrides.remove(&card).unwrap_or(args.to);
        let previous = self.move_card(MoveCardArgs::new(card, destination)).await?;

        self.state.stats.record(StatEntry {
            kind: StatKind::Gained,
            turn: self.state.turn_number,
            player: Some(player),
            card,
            key,
            paid: None,
        });
        if let Some(instance) = self.cards.get_mut(card) {
            instance.owner = Some(player);
        }
        self.add_log_entry(LogEntry::new(LogKind::Gain).with_player(player).with_card(card));

        let trigger = Trigger::new(TriggerKind::CardGained)
            .with_player(player)
            .with_card(card)
            .with_previous(previous.clone())
            .bought(args.bought);
        self.run_trigger(&trigger, &mut ReactionContext::new()).await?;

        let lifecycle = LifecycleArgs::for_card(card, Some(player))
            .with_previous(previous)
            .bought(args.bought);
        if !args.suppress_on_gained {
            self.run_card_lifecycle_event(LifecycleEvent::OnGained, lifecycle.clone())
                .await?;
        }
        self.run_game_lifecycle_event(LifecycleEvent::OnCardGained, lifecycle)
            .await?;

        Ok(Some(card))
    }

    /// Draw up to `count` cards, reshuffling the discard once the deck
    /// runs out. Returns the drawn cards; fewer when both piles empty.
    pub async fn draw_card(&mut self, player: PlayerId, count: usize) -> Result<Vec<CardId>> {
        let deck = ZoneRef::deck(player);
        let hand = ZoneRef::hand(player);

        let mut drawn = Vec::with_capacity(count);
        for _ in 0..count {
            if self.zones.source(&deck)?.is_empty() {
                self.shuffle_deck(player).await?;
            }
            let Some(&top) = self.zones.source(&deck)?.last() else {
                tracing::debug!(%player, drawn = drawn.len(), "deck and discard exhausted");
                break;
            };

            self.move_card(MoveCardArgs::new(top, hand.clone())).await?;
            self.add_log_entry(LogEntry::new(LogKind::Draw).with_player(player).with_card(top));
            drawn.push(top);
        }
        Ok(drawn)
    }

    /// Shuffle the discard and put it under the deck.
    pub async fn shuffle_deck(&mut self, player: PlayerId) -> Result<()> {
        let mut shuffled = std::mem::take(self.zones.get_source(&ZoneRef::discard(player))?);
        self.rng.shuffle(&mut shuffled);

        let count = shuffled.len();
        let deck = self.zones.get_source(&ZoneRef::deck(player))?;
        shuffled.append(deck);
        *deck = shuffled;

        self.add_log_entry(
            LogEntry::new(LogKind::Shuffle)
                .with_player(player)
                .with_count(count as i64),
        );
        Ok(())
    }

    /// Move a card to the trash and clear its owner.
    pub async fn trash_card(&mut self, player: PlayerId, card: CardId) -> Result<Option<CardLocation>> {
        let key = self.cards.require(card)?.key.clone();
        let previous = self.move_card(MoveCardArgs::new(card, ZoneRef::trash())).await?;

        self.state.stats.record(StatEntry {
            kind: StatKind::Trashed,
            turn: self.state.turn_number,
            player: Some(player),
            card,
            key,
            paid: None,
        });
        self.add_log_entry(LogEntry::new(LogKind::Trash).with_player(player).with_card(card));

        let trigger = Trigger::new(TriggerKind::CardTrashed)
            .with_player(player)
            .with_card(card)
            .with_previous(previous.clone());
        self.run_trigger(&trigger, &mut ReactionContext::new()).await?;

        let lifecycle = LifecycleArgs::for_card(card, Some(player)).with_previous(previous.clone());
        self.run_card_lifecycle_event(LifecycleEvent::OnTrashed, lifecycle)
            .await?;

        if let Some(instance) = self.cards.get_mut(card) {
            instance.owner = None;
        }
        Ok(previous)
    }

    /// Move a card to its owner's discard.
    ///
    /// Unlike `move_card`, fails if the card is not currently anywhere.
    pub async fn discard_card(&mut self, player: PlayerId, card: CardId) -> Result<Option<CardLocation>> {
        if self.zones.find_card_source(card).is_none() {
            return Err(EngineError::NoPreviousLocation(card));
        }
        let owner = self.cards.require(card)?.owner.unwrap_or(player);

        let previous = self
            .move_card(MoveCardArgs::new(card, ZoneRef::discard(owner)))
            .await?;
        self.add_log_entry(LogEntry::new(LogKind::Discard).with_player(owner).with_card(card));

        let trigger = Trigger::new(TriggerKind::DiscardCard)
            .with_player(owner)
            .with_card(card)
            .with_previous(previous.clone());
        self.run_trigger(&trigger, &mut ReactionContext::new()).await?;

        let lifecycle = LifecycleArgs::for_card(card, Some(owner)).with_previous(previous.clone());
        self.run_card_lifecycle_event(LifecycleEvent::OnDiscarded, lifecycle)
            .await?;

        Ok(previous)
    }

    /// Reveal a card, optionally setting it aside.
    pub async fn reveal_card(&mut self, player: PlayerId, card: CardId, set_aside: bool) -> Result<()> {
        if set_aside {
            let zone = ZoneRef::player(ZoneName::SetAside, player);
            self.move_card(MoveCardArgs::new(card, zone).at(ZonePosition::Top))
                .await?;
        }
        self.add_log_entry(LogEntry::new(LogKind::Reveal).with_player(player).with_card(card));
        Ok(())
    }
}
