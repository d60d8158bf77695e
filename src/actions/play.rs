//! Playing and buying.

use std::sync::Arc;

use crate::cards::{CardType, Cost};
use crate::core::{CardId, CardKey, PlayerId, Resource, StatEntry, StatKind, ZoneName, ZoneRef};
use crate::effects::{CardEffect, EffectContext};
use crate::engine::Engine;
use crate::error::{EngineError, Result};
use crate::log::{LogEntry, LogKind, LogScope};
use crate::triggers::{LifecycleArgs, LifecycleEvent, ReactionContext, Trigger, TriggerKind};

use super::{BuyCardArgs, BuyCardLikeArgs, CardTarget, GainCardArgs, MoveCardArgs, PlayCardArgs};

impl Engine {
    /// Play a card.
    ///
    /// Reactions to `CardPlayed` record into a fresh [`ReactionContext`],
    /// which the card's effect then receives, so an attack can skip every
    /// player who revealed an immunity card.
    pub async fn play_card(&mut self, args: PlayCardArgs) -> Result<()> {
        let PlayCardArgs {
            player,
            card,
            move_to_play,
            free,
        } = args;
        let (key, is_action) = {
            let instance = self.cards.require(card)?;
            (instance.key.clone(), instance.is(CardType::Action))
        };

        if move_to_play {
            self.move_card(MoveCardArgs::new(card, ZoneRef::play_area(player)))
                .await?;
        }
        if is_action && !free {
            self.state.adjust(player, Resource::Actions, -1);
        }

        self.state.stats.record(StatEntry {
            kind: StatKind::Played,
            turn: self.state.turn_number,
            player: Some(player),
            card,
            key: key.clone(),
            paid: None,
        });
        self.add_log_entry(LogEntry::new(LogKind::Play).with_player(player).with_card(card));
        tracing::debug!(%player, %card, %key, "card played");

        let mut reaction_context = ReactionContext::new();
        let trigger = Trigger::new(TriggerKind::CardPlayed)
            .with_player(player)
            .with_card(card);
        self.run_trigger(&trigger, &mut reaction_context).await?;

        self.run_card_lifecycle_event(LifecycleEvent::OnCardPlayed, LifecycleArgs::for_card(card, Some(player)))
            .await?;

        match self.effects.card_effect(&key) {
            Some(effect) => {
                self.run_effect(&effect, player, Some(card), key, reaction_context)
                    .await?;
            }
            None => tracing::trace!(%key, "card has no play effect"),
        }

        let trigger = Trigger::new(TriggerKind::AfterCardPlayed)
            .with_player(player)
            .with_card(card);
        self.run_trigger(&trigger, &mut ReactionContext::new()).await
    }

    /// Buy a card: pay, then gain it into the discard.
    ///
    /// Affordability is not checked here; `Engine::buyable` lists what a
    /// player may buy. Returns `None` when the pile is empty.
    pub async fn buy_card(&mut self, args: BuyCardArgs) -> Result<Option<CardId>> {
        let player = args.player;
        let card = match &args.target {
            CardTarget::Card(id) => *id,
            CardTarget::Pile(key) => match self.pile_top(key) {
                Some(id) => id,
                None => {
                    tracing::warn!(%player, %key, "pile is empty, nothing bought");
                    return Ok(None);
                }
            },
        };
        let key = self.cards.require(card)?.key.clone();
        let paid = self.pay(player, &key, args.overpay)?;

        self.state.stats.record(StatEntry {
            kind: StatKind::Bought,
            turn: self.state.turn_number,
            player: Some(player),
            card,
            key: key.clone(),
            paid: Some(paid),
        });
        self.add_log_entry(LogEntry::new(LogKind::Buy).with_player(player).with_card(card));
        tracing::debug!(%player, %key, treasure = paid.treasure, "card bought");

        self.gain_card(GainCardArgs::card(player, card).bought()).await
    }

    /// Buy a card-like (an event): pay, then run its effect. Nothing is
    /// gained.
    pub async fn buy_card_like(&mut self, args: BuyCardLikeArgs) -> Result<()> {
        let BuyCardLikeArgs { player, key, overpay } = args;
        let Some(effect) = self.effects.card_like_effect(&key) else {
            return Err(EngineError::NotACardLike(key));
        };
        let paid = self.pay(player, &key, overpay)?;

        let instance = self.event_instance(&key);
        if let Some(card) = instance {
            self.state.stats.record(StatEntry {
                kind: StatKind::Bought,
                turn: self.state.turn_number,
                player: Some(player),
                card,
                key: key.clone(),
                paid: Some(paid),
            });
        }
        let mut entry = LogEntry::new(LogKind::Buy).with_player(player);
        if let Some(card) = instance {
            entry = entry.with_card(card);
        }
        self.add_log_entry(entry);
        tracing::debug!(%player, %key, treasure = paid.treasure, "card-like bought");

        self.run_effect(&effect, player, instance, key, ReactionContext::new())
            .await
    }

    /// Deduct the price of `key` plus `overpay`, and one buy. Returns
    /// what was paid.
    fn pay(&mut self, player: PlayerId, key: &CardKey, overpay: u32) -> Result<Cost> {
        let price = self.price_of(key, player)?;
        let paid = Cost {
            treasure: price.cost.treasure + overpay,
            potion: price.cost.potion,
        };

        self.state.adjust(player, Resource::Treasure, -i64::from(paid.treasure));
        self.state.adjust(player, Resource::Potions, -i64::from(paid.potion));
        self.state.adjust(player, Resource::Buys, -1);
        Ok(paid)
    }

    /// The instance of a card-like sitting in the events zone.
    fn event_instance(&self, key: &CardKey) -> Option<CardId> {
        self.zones
            .cards_in(&ZoneRef::shared(ZoneName::Events))
            .iter()
            .copied()
            .find(|&id| self.cards.get(id).is_some_and(|card| &card.key == key))
    }

    /// Run a card effect inside a log scope, with `card` as the source of
    /// everything it logs.
    async fn run_effect(
        &mut self,
        effect: &CardEffect,
        player: PlayerId,
        card: Option<CardId>,
        card_key: CardKey,
        reaction_context: ReactionContext,
    ) -> Result<()> {
        let _scope = LogScope::enter(Arc::clone(&self.log));
        if let Some(card) = card {
            self.sources.push(card);
        }
        let result = effect(EffectContext {
            engine: self,
            player,
            card,
            card_key,
            reaction_context,
        })
        .await;
        if card.is_some() {
            self.sources.pop();
        }
        result
    }
}
