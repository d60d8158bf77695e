//! Turn and phase state machine.
//!
//! ```text
//! action -> buy -> cleanup -> action (next player) -> ...
//! ```
//!
//! Every phase change fires `EndTurnPhase` for the phase being left and
//! `StartTurnPhase` for the one entered. Leaving cleanup discards the play
//! area and hand, draws a new hand and ends the turn. The next player's
//! turn starts with fresh counters and a `StartTurn` trigger.

use futures_util::future::BoxFuture;

use crate::cards::CardType;
use crate::core::{PlayerId, Resource, TurnPhase, ZoneRef};
use crate::engine::Engine;
use crate::error::Result;
use crate::log::{LogEntry, LogKind};
use crate::triggers::{ReactionContext, Trigger, TriggerKind};

impl Engine {
    /// Advance out of the current phase if the player has nothing left
    /// to do in it. No-op unless `auto_skip_phases` is set.
    pub async fn check_for_remaining_player_actions(&mut self) -> Result<()> {
        if !self.config.auto_skip_phases {
            return Ok(());
        }

        let player = self.current_player();
        let exhausted = match self.state.phase {
            TurnPhase::Action => {
                self.state.resource(player, Resource::Actions) == 0 || !self.hand_has(player, CardType::Action)
            }
            TurnPhase::Buy => self.state.resource(player, Resource::Buys) == 0,
            TurnPhase::Cleanup => true,
        };

        if exhausted {
            tracing::trace!(%player, phase = %self.state.phase, "nothing left to do, skipping phase");
            self.next_phase().await
        } else {
            Ok(())
        }
    }

    /// Move to the next phase, wrapping to the next player's action phase
    /// after cleanup.
    pub fn next_phase(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            let player = self.current_player();
            let leaving = self.state.phase;

            let trigger = Trigger::new(TriggerKind::EndTurnPhase)
                .with_player(player)
                .with_phase(leaving);
            self.run_trigger(&trigger, &mut ReactionContext::new()).await?;

            if leaving == TurnPhase::Cleanup {
                self.cleanup(player).await?;
            }

            match leaving.next() {
                Some(phase) => {
                    self.state.phase = phase;
                    tracing::debug!(%player, %phase, "phase started");
                    self.start_phase(player, phase).await?;
                }
                None => {
                    self.state.phase = TurnPhase::Action;
                    self.state.turn_number += 1;
                    if self.state.advance_player() {
                        self.state.round_number += 1;
                    }
                    self.begin_turn().await?;
                }
            }

            self.check_for_remaining_player_actions().await
        })
    }

    /// Fire the `EndTurn` trigger for the current player.
    pub async fn end_turn(&mut self) -> Result<()> {
        let player = self.current_player();
        tracing::debug!(%player, turn = self.state.turn_number, "turn ended");

        let trigger = Trigger::new(TriggerKind::EndTurn).with_player(player);
        self.run_trigger(&trigger, &mut ReactionContext::new()).await
    }

    /// Start the current player's turn in the action phase.
    pub(crate) async fn begin_turn(&mut self) -> Result<()> {
        let player = self.current_player();
        let (actions, buys) = (self.config.turn_actions, self.config.turn_buys);
        self.state.counters.get_mut(player).reset_turn(actions, buys);

        tracing::info!(
            %player,
            turn = self.state.turn_number,
            round = self.state.round_number,
            "turn started"
        );
        self.add_log_entry(LogEntry::new(LogKind::NewTurn).with_count(i64::from(self.state.turn_number)));
        self.add_log_entry(LogEntry::new(LogKind::NewPlayerTurn).with_player(player));

        let trigger = Trigger::new(TriggerKind::StartTurn).with_player(player);
        self.run_trigger(&trigger, &mut ReactionContext::new()).await?;
        self.start_phase(player, TurnPhase::Action).await
    }

    async fn start_phase(&mut self, player: PlayerId, phase: TurnPhase) -> Result<()> {
        let trigger = Trigger::new(TriggerKind::StartTurnPhase)
            .with_player(player)
            .with_phase(phase);
        self.run_trigger(&trigger, &mut ReactionContext::new()).await
    }

    /// Discard the play area, then the hand, draw a new hand and end the
    /// turn.
    async fn cleanup(&mut self, player: PlayerId) -> Result<()> {
        for zone in [ZoneRef::play_area(player), ZoneRef::hand(player)] {
            let cards = self.zones.source(&zone)?.to_vec();
            for card in cards {
                self.discard_card(player, card).await?;
            }
        }

        self.draw_card(player, self.config.hand_size).await?;
        self.end_turn().await
    }
}
