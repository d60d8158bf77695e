//! Base set definitions and card code.

use crate::actions::{Action, CounterArgs, GainCardArgs, SelectCardArgs};
use crate::cards::{CardDefinition, CardType, Cost};
use crate::core::PlayerId;
use crate::effects::{EffectContext, EffectRegistry};
use crate::error::Result;
use crate::triggers::{LifecycleEvent, ReactionCondition, ReactionOutcome, ReactionTemplate, TriggerKind};

/// Hand size Militia leaves its targets with.
pub const MILITIA_HAND_LIMIT: usize = 3;

/// Every card definition in the set.
#[must_use]
pub fn definitions() -> Vec<CardDefinition> {
    vec![
        // === Treasure ===
        treasure("copper", "Copper", 0, 1),
        treasure("silver", "Silver", 3, 2),
        treasure("gold", "Gold", 6, 3),
        // === Victory ===
        victory("estate", "Estate", 2, 1),
        victory("duchy", "Duchy", 5, 3),
        victory("province", "Province", 8, 6),
        // === Kingdom ===
        action("village", "Village", 3),
        action("smithy", "Smithy", 4),
        action("market", "Market", 5),
        action("baker", "Baker", 5).with_tag("coffers"),
        action("bonus", "Bonus", 3),
        action("moat", "Moat", 2).with_type(CardType::Reaction),
        action("militia", "Militia", 4).with_type(CardType::Attack),
        // === Events ===
        CardDefinition::new("delve", "Delve")
            .with_type(CardType::Event)
            .with_cost(Cost::treasure(2)),
    ]
}

fn treasure(key: &str, name: &str, cost: u32, coins: u32) -> CardDefinition {
    CardDefinition::new(key, name)
        .with_type(CardType::Treasure)
        .with_cost(Cost::treasure(cost))
        .with_treasure(coins)
        .with_tag("base")
}

fn victory(key: &str, name: &str, cost: u32, points: i32) -> CardDefinition {
    CardDefinition::new(key, name)
        .with_type(CardType::Victory)
        .with_cost(Cost::treasure(cost))
        .with_victory_points(points)
        .with_tag("base")
}

fn action(key: &str, name: &str, cost: u32) -> CardDefinition {
    CardDefinition::new(key, name)
        .with_type(CardType::Action)
        .with_cost(Cost::treasure(cost))
        .with_tag("base")
}

/// Card code for the set.
#[must_use]
pub fn effects() -> EffectRegistry {
    let mut effects = EffectRegistry::new();

    for key in ["copper", "silver", "gold"] {
        effects.register_card_effect(key, |mut ctx| {
            Box::pin(async move {
                let coins = ctx.cards.definition(&ctx.card_key).map_or(0, |d| d.treasure);
                let player = ctx.player;
                ctx.invoke(Action::GainTreasure(CounterArgs::new(player, i64::from(coins))))
                    .await?;
                Ok(())
            })
        });
    }

    effects.register_card_effect("village", |mut ctx| {
        Box::pin(async move {
            draw(&mut ctx, 1).await?;
            counter(&mut ctx, Action::GainAction, 2).await
        })
    });

    effects.register_card_effect("smithy", |mut ctx| Box::pin(async move { draw(&mut ctx, 3).await }));

    effects.register_card_effect("market", |mut ctx| {
        Box::pin(async move {
            draw(&mut ctx, 1).await?;
            counter(&mut ctx, Action::GainAction, 1).await?;
            counter(&mut ctx, Action::GainBuy, 1).await?;
            counter(&mut ctx, Action::GainTreasure, 1).await
        })
    });

    effects.register_card_effect("baker", |mut ctx| {
        Box::pin(async move {
            draw(&mut ctx, 1).await?;
            counter(&mut ctx, Action::GainAction, 1).await?;
            counter(&mut ctx, Action::GainCoffer, 1).await
        })
    });

    register_moat(&mut effects);
    register_militia(&mut effects);
    register_bonus(&mut effects);

    // +1 buy, gain a silver.
    effects.register_card_like_effect("delve", |mut ctx| {
        Box::pin(async move {
            counter(&mut ctx, Action::GainBuy, 1).await?;
            let player = ctx.player;
            ctx.invoke(Action::GainCard(GainCardArgs::pile(player, "silver")))
                .await?;
            Ok(())
        })
    });

    effects
}

async fn draw(ctx: &mut EffectContext<'_>, count: usize) -> Result<()> {
    let player = ctx.player;
    ctx.invoke(Action::DrawCard { player, count }).await?;
    Ok(())
}

async fn counter(ctx: &mut EffectContext<'_>, action: fn(CounterArgs) -> Action, count: i64) -> Result<()> {
    let player = ctx.player;
    ctx.invoke(action(CounterArgs::new(player, count))).await?;
    Ok(())
}

/// +2 cards. While in hand, the owner may reveal it to be unaffected by
/// another player's attack.
fn register_moat(effects: &mut EffectRegistry) {
    effects.register_card_effect("moat", |mut ctx| Box::pin(async move { draw(&mut ctx, 2).await }));

    effects.register_lifecycle_hook("moat", LifecycleEvent::OnEnterHand, |mut call| {
        Box::pin(async move {
            let (Some(card), Some(owner)) = (call.args.card, call.args.player) else {
                return Ok(());
            };
            let moat = call.cards.require(card)?.clone();

            let immunity = ReactionTemplate::new(&moat, owner, TriggerKind::CardPlayed, |_call| {
                Box::pin(async { Ok(ReactionOutcome::Immunity) })
            })
            .with_condition(
                ReactionCondition::NotForPlayer(owner).and(ReactionCondition::CardHasType(CardType::Attack)),
            )
            .optional()
            .single_instance();
            call.reactions.register_reaction_template(immunity);
            Ok(())
        })
    });

    effects.register_lifecycle_hook("moat", LifecycleEvent::OnLeaveHand, |mut call| {
        Box::pin(async move {
            if let Some(card) = call.args.card {
                call.reactions.remove_for_card(card);
            }
            Ok(())
        })
    });
}

/// +2 treasure. Each other player discards down to 3 cards in hand.
fn register_militia(effects: &mut EffectRegistry) {
    effects.register_card_effect("militia", |mut ctx| {
        Box::pin(async move {
            counter(&mut ctx, Action::GainTreasure, 2).await?;

            for target in ctx.targets() {
                discard_down(&mut ctx, target).await?;
            }
            Ok(())
        })
    });
}

async fn discard_down(ctx: &mut EffectContext<'_>, target: PlayerId) -> Result<()> {
    let hand = ctx.hand(target).to_vec();
    let excess = hand.len().saturating_sub(MILITIA_HAND_LIMIT);
    if excess == 0 {
        return Ok(());
    }

    let mut select = SelectCardArgs::exact(target, format!("Discard {excess} cards"), hand, excess);
    if let Some(card) = ctx.card {
        select = select.from_card(card);
    }
    let chosen = ctx.invoke(Action::SelectCard(select)).await?.cards();
    for card in chosen {
        ctx.invoke(Action::DiscardCard { player: target, card }).await?;
    }
    Ok(())
}

/// +1 action. The next time you play a treasure this turn, +1 treasure.
fn register_bonus(effects: &mut EffectRegistry) {
    effects.register_card_effect("bonus", |mut ctx| {
        Box::pin(async move {
            counter(&mut ctx, Action::GainAction, 1).await?;

            let Some(card) = ctx.card else {
                return Ok(());
            };
            let player = ctx.player;
            let bonus = ctx.cards.require(card)?.clone();

            let listener = ReactionTemplate::new(&bonus, player, TriggerKind::CardPlayed, |mut call| {
                Box::pin(async move {
                    let owner = call.owner;
                    call.invoke(Action::GainTreasure(CounterArgs::new(owner, 1)))
                        .await?;
                    Ok(ReactionOutcome::Normal)
                })
            })
            .with_condition(
                ReactionCondition::ForPlayer(player).and(ReactionCondition::CardHasType(CardType::Treasure)),
            )
            .once();

            // Unused bonuses lapse at end of turn.
            let listener_id = listener.id.clone();
            let expiry = ReactionTemplate::new(&bonus, player, TriggerKind::EndTurn, move |mut call| {
                let listener_id = listener_id.clone();
                Box::pin(async move {
                    call.reactions.unregister_trigger(&listener_id);
                    Ok(ReactionOutcome::Normal)
                })
            })
            .once();

            ctx.reactions.register_reaction_template(listener);
            ctx.reactions.register_reaction_template(expiry);
            Ok(())
        })
    });
}
