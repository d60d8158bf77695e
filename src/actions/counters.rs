//! Resource counter actions.
//!
//! Counters clamp at zero. Each change is logged unless the caller asks
//! for silence; the log entry carries the requested change, not the
//! clamped one.

use crate::core::Resource;
use crate::engine::Engine;
use crate::log::{LogEntry, LogKind};

use super::CounterArgs;

impl Engine {
    pub fn gain_action(&mut self, args: CounterArgs) -> u32 {
        self.adjust_counter(args, Resource::Actions, LogKind::GainAction)
    }

    pub fn gain_buy(&mut self, args: CounterArgs) -> u32 {
        self.adjust_counter(args, Resource::Buys, LogKind::GainBuy)
    }

    pub fn gain_treasure(&mut self, args: CounterArgs) -> u32 {
        self.adjust_counter(args, Resource::Treasure, LogKind::GainTreasure)
    }

    pub fn gain_potion(&mut self, args: CounterArgs) -> u32 {
        self.adjust_counter(args, Resource::Potions, LogKind::GainPotion)
    }

    pub fn gain_coffer(&mut self, args: CounterArgs) -> u32 {
        self.adjust_counter(args, Resource::Coffers, LogKind::GainCoffer)
    }

    pub fn gain_victory_token(&mut self, args: CounterArgs) -> u32 {
        self.adjust_counter(args, Resource::VictoryTokens, LogKind::GainVictoryToken)
    }

    /// Spend up to `count` coffers for the same amount of treasure.
    /// Returns the new treasure total.
    pub fn exchange_coffer(&mut self, args: CounterArgs) -> u32 {
        let player = args.player;
        let available = i64::from(self.state.resource(player, Resource::Coffers));
        let spent = args.count.clamp(0, available);

        self.state.adjust(player, Resource::Coffers, -spent);
        let treasure = self.state.adjust(player, Resource::Treasure, spent);

        if !args.silent {
            self.add_log_entry(
                LogEntry::new(LogKind::ExchangeCoffer)
                    .with_player(player)
                    .with_count(spent),
            );
        }
        treasure
    }

    fn adjust_counter(&mut self, args: CounterArgs, resource: Resource, kind: LogKind) -> u32 {
        let value = self.state.adjust(args.player, resource, args.count);
        tracing::trace!(player = %args.player, ?resource, delta = args.count, value, "counter adjusted");

        if !args.silent {
            self.add_log_entry(LogEntry::new(kind).with_player(args.player).with_count(args.count));
        }
        value
    }
}
