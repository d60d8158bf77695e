//! Reaction and lifecycle integration tests.
//!
//! Immunity (Moat vs Militia), once-only listeners, firing order, lifecycle
//! hooks and custom actions.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use kingdom_engine::actions::{Action, ActionOutcome, GainCardArgs, PlayCardArgs};
use kingdom_engine::cards::Card;
use kingdom_engine::core::{CardId, CardKey, EngineConfig, PlayerId, Resource, ZoneRef};
use kingdom_engine::effects::EffectRegistry;
use kingdom_engine::engine::{Engine, MatchBuilder};
use kingdom_engine::error::EngineError;
use kingdom_engine::games::base;
use kingdom_engine::input::{serve, FirstChoice, ScriptedAnswer, ScriptedInput};
use kingdom_engine::log::MemoryLog;
use kingdom_engine::triggers::{
    LifecycleEvent, ReactionContext, ReactionId, ReactionOutcome, ReactionTemplate, Trigger, TriggerKind,
};

fn build(players: usize, effects: EffectRegistry) -> Engine {
    MatchBuilder::new(players)
        .with_config(EngineConfig::default().with_seed(11).with_auto_skip(false))
        .with_cards(base::definitions())
        .with_effects(effects)
        .with_starting_deck([(CardKey::from("copper"), 10)])
        .with_supply_pile("silver", 40)
        .with_kingdom_pile("moat", 10)
        .with_kingdom_pile("militia", 10)
        .with_kingdom_pile("bonus", 10)
        .with_log(Arc::new(MemoryLog::new()))
        .build()
        .unwrap()
}

async fn gain_to_hand(engine: &mut Engine, player: PlayerId, key: &str) -> CardId {
    engine
        .gain_card(GainCardArgs::pile(player, key).to(ZoneRef::hand(player)))
        .await
        .unwrap()
        .unwrap()
}

// === Immunity ===

#[tokio::test]
async fn test_moat_installs_and_removes_its_reaction() {
    let mut engine = build(2, base::effects());
    engine.start().await.unwrap();
    let p1 = PlayerId::new(1);

    let moat = gain_to_hand(&mut engine, p1, "moat").await;
    assert_eq!(engine.reactions.for_card(moat).count(), 1);

    engine.discard_card(p1, moat).await.unwrap();
    assert_eq!(engine.reactions.for_card(moat).count(), 0);
}

#[tokio::test]
async fn test_moat_blocks_militia() {
    let mut engine = build(3, base::effects());
    engine.start().await.unwrap();
    let (p0, p1, p2) = (PlayerId::new(0), PlayerId::new(1), PlayerId::new(2));

    tokio::spawn(serve(engine.connect_player(p1), FirstChoice));
    tokio::spawn(serve(engine.connect_player(p2), FirstChoice));

    let militia = gain_to_hand(&mut engine, p0, "militia").await;
    gain_to_hand(&mut engine, p1, "moat").await;

    engine
        .invoke(Action::PlayCard(PlayCardArgs::new(p0, militia)))
        .await
        .unwrap();

    assert_eq!(engine.state.resource(p0, Resource::Treasure), 2);
    // Revealed the moat: unaffected.
    assert_eq!(engine.hand(p1).len(), 6);
    // No moat: discarded down to 3.
    assert_eq!(engine.hand(p2).len(), 3);
    assert_eq!(engine.zones.cards_in(&ZoneRef::discard(p2)).len(), 2);
}

#[tokio::test]
async fn test_two_moats_both_block_militia() {
    let mut engine = build(3, base::effects());
    engine.start().await.unwrap();
    let (p0, p1, p2) = (PlayerId::new(0), PlayerId::new(1), PlayerId::new(2));

    tokio::spawn(serve(engine.connect_player(p1), FirstChoice));
    tokio::spawn(serve(engine.connect_player(p2), FirstChoice));

    let militia = gain_to_hand(&mut engine, p0, "militia").await;
    gain_to_hand(&mut engine, p1, "moat").await;
    gain_to_hand(&mut engine, p2, "moat").await;

    engine.play_card(PlayCardArgs::new(p0, militia)).await.unwrap();

    assert_eq!(engine.hand(p1).len(), 6);
    assert_eq!(engine.hand(p2).len(), 6);
    assert!(engine.zones.cards_in(&ZoneRef::discard(p1)).is_empty());
    assert!(engine.zones.cards_in(&ZoneRef::discard(p2)).is_empty());
}

#[tokio::test]
async fn test_declined_moat_gives_no_immunity() {
    let mut engine = build(2, base::effects());
    engine.start().await.unwrap();
    let (p0, p1) = (PlayerId::new(0), PlayerId::new(1));

    let militia = gain_to_hand(&mut engine, p0, "militia").await;
    gain_to_hand(&mut engine, p1, "moat").await;
    let discards: Vec<CardId> = engine.hand(p1)[..3].to_vec();

    let script = ScriptedInput::new([ScriptedAnswer::Choice(1), ScriptedAnswer::Cards(discards.clone())]);
    tokio::spawn(serve(engine.connect_player(p1), script));

    engine.play_card(PlayCardArgs::new(p0, militia)).await.unwrap();

    // The script picked the first three cards to discard.
    assert_eq!(engine.hand(p1).len(), 3);
    assert_eq!(engine.zones.cards_in(&ZoneRef::discard(p1)), discards.as_slice());
}

#[tokio::test]
async fn test_unconnected_owner_declines_optional_reaction() {
    let mut engine = build(2, base::effects());
    engine.start().await.unwrap();
    let (p0, p1) = (PlayerId::new(0), PlayerId::new(1));

    let militia = gain_to_hand(&mut engine, p0, "militia").await;
    gain_to_hand(&mut engine, p1, "moat").await;

    engine.play_card(PlayCardArgs::new(p0, militia)).await.unwrap();

    // No answer to the moat prompt and none to the discard either.
    assert_eq!(engine.hand(p1).len(), 6);
    assert!(engine.zones.cards_in(&ZoneRef::discard(p1)).is_empty());
}

// === Once-only listeners ===

#[tokio::test]
async fn test_bonus_fires_once() {
    let mut engine = build(2, base::effects());
    engine.start().await.unwrap();
    let p0 = PlayerId::new(0);

    let bonus = gain_to_hand(&mut engine, p0, "bonus").await;
    engine.play_card(PlayCardArgs::new(p0, bonus)).await.unwrap();
    assert_eq!(engine.state.resource(p0, Resource::Actions), 1);
    assert_eq!(engine.reactions.for_card(bonus).count(), 2);

    let coppers: Vec<CardId> = engine.hand(p0)[..2].to_vec();
    for copper in coppers {
        engine.play_card(PlayCardArgs::new(p0, copper)).await.unwrap();
    }

    // 1 + 1 bonus, then 1.
    assert_eq!(engine.state.resource(p0, Resource::Treasure), 3);
    assert_eq!(engine.reactions.for_card(bonus).count(), 1);
}

#[tokio::test]
async fn test_unused_bonus_lapses_at_end_of_turn() {
    let mut engine = build(2, base::effects());
    engine.start().await.unwrap();
    let p0 = PlayerId::new(0);

    let bonus = gain_to_hand(&mut engine, p0, "bonus").await;
    engine.play_card(PlayCardArgs::new(p0, bonus)).await.unwrap();
    for _ in 0..3 {
        engine.next_phase().await.unwrap();
    }

    assert_eq!(engine.current_player(), PlayerId::new(1));
    assert_eq!(engine.reactions.for_card(bonus).count(), 0);
}

// === Firing order ===

fn recorder(
    card: &Card,
    owner: PlayerId,
    kind: &TriggerKind,
    name: &'static str,
    order: &Arc<Mutex<Vec<&'static str>>>,
    remove: Option<ReactionId>,
) -> ReactionTemplate {
    let order = Arc::clone(order);
    ReactionTemplate::new(card, owner, kind.clone(), move |mut call| {
        order.lock().unwrap().push(name);
        if let Some(id) = &remove {
            call.reactions.unregister_trigger(id);
        }
        Box::pin(async { Ok(ReactionOutcome::Normal) })
    })
}

#[tokio::test]
async fn test_reactions_fire_in_registration_order() {
    let mut engine = build(2, EffectRegistry::new());
    let kind = TriggerKind::Custom("ping".into());
    let order = Arc::new(Mutex::new(Vec::new()));
    let cards: Vec<Card> = engine.cards.cards().take(3).cloned().collect();

    let skipped = ReactionId::new(&cards[2].key, cards[2].id, &kind);
    engine
        .reactions
        .register_reaction_template(recorder(&cards[1], PlayerId::new(0), &kind, "first", &order, None));
    engine
        .reactions
        .register_reaction_template(recorder(&cards[0], PlayerId::new(0), &kind, "second", &order, Some(skipped)));
    engine
        .reactions
        .register_reaction_template(recorder(&cards[2], PlayerId::new(0), &kind, "removed", &order, None));

    engine
        .run_trigger(&Trigger::new(kind.clone()), &mut ReactionContext::new())
        .await
        .unwrap();

    assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    assert_eq!(engine.reactions.listening_for(&kind).len(), 2);
}

#[tokio::test]
async fn test_single_instance_fires_once_per_trigger() {
    let mut engine = build(2, EffectRegistry::new());
    let kind = TriggerKind::Custom("ping".into());
    let order = Arc::new(Mutex::new(Vec::new()));
    let coppers: Vec<Card> = engine.cards.cards().filter(|c| c.key.as_str() == "copper").take(2).cloned().collect();

    for card in &coppers {
        let template = recorder(card, PlayerId::new(0), &kind, "copper", &order, None).single_instance();
        engine.reactions.register_reaction_template(template);
    }

    engine
        .run_trigger(&Trigger::new(kind.clone()), &mut ReactionContext::new())
        .await
        .unwrap();

    assert_eq!(order.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_single_instance_is_per_owner() {
    let mut engine = build(3, EffectRegistry::new());
    let kind = TriggerKind::Custom("ping".into());
    let order = Arc::new(Mutex::new(Vec::new()));
    let coppers: Vec<Card> = engine.cards.cards().filter(|c| c.key.as_str() == "copper").take(3).cloned().collect();

    for (seat, card) in coppers.iter().enumerate() {
        let owner = PlayerId::new(seat as u8);
        let template = recorder(card, owner, &kind, "copper", &order, None).single_instance();
        engine.reactions.register_reaction_template(template);
    }

    engine
        .run_trigger(&Trigger::new(kind.clone()), &mut ReactionContext::new())
        .await
        .unwrap();

    assert_eq!(order.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_stacking_copy_does_not_block_single_instance() {
    let mut engine = build(2, EffectRegistry::new());
    let kind = TriggerKind::Custom("ping".into());
    let order = Arc::new(Mutex::new(Vec::new()));
    let coppers: Vec<Card> = engine.cards.cards().filter(|c| c.key.as_str() == "copper").take(2).cloned().collect();
    let p0 = PlayerId::new(0);

    engine
        .reactions
        .register_reaction_template(recorder(&coppers[0], p0, &kind, "stacking", &order, None));
    engine
        .reactions
        .register_reaction_template(recorder(&coppers[1], p0, &kind, "single", &order, None).single_instance());

    engine
        .run_trigger(&Trigger::new(kind.clone()), &mut ReactionContext::new())
        .await
        .unwrap();

    assert_eq!(*order.lock().unwrap(), vec!["stacking", "single"]);
}

// === Lifecycle hooks ===

#[tokio::test]
async fn test_game_hooks_and_suppressed_on_gained() {
    let started = Arc::new(AtomicUsize::new(0));
    let gained = Arc::new(AtomicUsize::new(0));
    let silver_hooks = Arc::new(AtomicUsize::new(0));

    let mut effects = base::effects();
    let counter = started.clone();
    effects.register_game_hook("test", LifecycleEvent::OnGameStart, move |_call| {
        counter.fetch_add(1, Ordering::SeqCst);
        Box::pin(async { Ok(()) })
    });
    let counter = gained.clone();
    effects.register_game_hook("test", LifecycleEvent::OnCardGained, move |call| {
        assert!(call.args.card.is_some());
        counter.fetch_add(1, Ordering::SeqCst);
        Box::pin(async { Ok(()) })
    });
    let counter = silver_hooks.clone();
    effects.register_lifecycle_hook("silver", LifecycleEvent::OnGained, move |_call| {
        counter.fetch_add(1, Ordering::SeqCst);
        Box::pin(async { Ok(()) })
    });

    let mut engine = build(2, effects);
    engine.start().await.unwrap();
    let p0 = PlayerId::new(0);

    engine.gain_card(GainCardArgs::pile(p0, "silver")).await.unwrap();
    engine
        .gain_card(GainCardArgs::pile(p0, "silver").suppress_on_gained())
        .await
        .unwrap();

    assert_eq!(started.load(Ordering::SeqCst), 1);
    assert_eq!(gained.load(Ordering::SeqCst), 2);
    assert_eq!(silver_hooks.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_effect_errors_propagate() {
    let mut effects = EffectRegistry::new();
    effects.register_card_effect("copper", |_ctx| {
        Box::pin(async { Err(EngineError::Effect("counterfeit".into())) })
    });
    let mut engine = build(1, effects);
    let p0 = PlayerId::new(0);
    let copper = engine.zones.top_card(&ZoneRef::deck(p0)).unwrap();

    let result = engine.play_card(PlayCardArgs::new(p0, copper)).await;
    assert!(matches!(result, Err(EngineError::Effect(message)) if message == "counterfeit"));
}

// === Custom actions ===

#[tokio::test]
async fn test_custom_actions() {
    let mut effects = EffectRegistry::new();
    effects.register_custom_action("tally", |engine, args| {
        Box::pin(async move {
            let player = PlayerId::new(args["player"].as_u64().unwrap_or(0) as u8);
            Ok(ActionOutcome::Value(serde_json::json!(engine.hand(player).len())))
        })
    });
    let mut engine = build(2, effects);
    engine.start().await.unwrap();

    let outcome = engine
        .invoke(Action::Custom {
            name: "tally".into(),
            args: serde_json::json!({ "player": 1 }),
        })
        .await
        .unwrap();
    assert_eq!(outcome, ActionOutcome::Value(serde_json::json!(5)));

    let result = engine
        .invoke(Action::Custom {
            name: "vote".into(),
            args: serde_json::Value::Null,
        })
        .await;
    assert!(matches!(result, Err(EngineError::NoHandler(name)) if name == "vote"));
}
