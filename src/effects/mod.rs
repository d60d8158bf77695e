//! Effect system: the card code the engine calls.
//!
//! The engine knows nothing about what any card means. Card behaviour is
//! supplied as async callbacks registered by card key:
//!
//! - `CardEffect`: run when a card is played (or a card-like is bought)
//! - `ReactionEffect`: run by a reaction template
//! - `LifecycleHook`: run when a card crosses a zone boundary, or for
//!   expansion-wide game events
//! - `CustomAction`: resolves `Action::Custom`
//!
//! Each callback receives a capability bundle (`EffectContext`,
//! `ReactionCall`, `LifecycleCall`) holding the engine by `&mut`.
//!
//! ## Writing an Effect
//!
//! Callbacks return a boxed future borrowing the context:
//!
//! ```
//! use kingdom_engine::actions::Action;
//! use kingdom_engine::effects::EffectRegistry;
//!
//! let mut effects = EffectRegistry::new();
//! effects.register_card_effect("smithy", |mut ctx| {
//!     Box::pin(async move {
//!         let player = ctx.player;
//!         ctx.invoke(Action::DrawCard { player, count: 3 }).await?;
//!         Ok(())
//!     })
//! });
//! ```

mod context;
mod registry;

pub use context::{
    CardEffect, CustomAction, EffectContext, LifecycleCall, LifecycleHook, ReactionCall, ReactionEffect,
};
pub use registry::EffectRegistry;
