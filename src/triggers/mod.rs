//! Reaction/trigger system.
//!
//! Cards hook into the game through two mechanisms:
//!
//! - **Reactions**: temporary, conditional listeners bound to one card
//!   instance. A lifecycle hook installs a [`ReactionTemplate`] when the
//!   card enters a reactive zone and removes it when the card leaves.
//! - **Lifecycle events**: per-card-key hooks run when a card crosses a
//!   zone boundary, plus expansion-wide game hooks.
//!
//! ## Key Components
//!
//! - [`TriggerKind`] / [`Trigger`]: the event broadcast by an action
//! - [`ReactionCondition`]: when a template fires
//! - [`ReactionTemplate`]: listener with `once`, `compulsory` and
//!   `allow_multiple_instances` flags
//! - [`ReactionBus`]: template storage, indexed by trigger kind
//! - [`ReactionContext`]: per-trigger outcomes (immunity)
//! - [`LifecycleEvent`]: card and game hook points
//!
//! ## Firing Order
//!
//! Templates fire in registration order. The engine snapshots the ids
//! before the first one runs, so a reaction that installs or removes other
//! templates never changes the set being walked; removed ones are skipped.
//!
//! ## Example Usage
//!
//! ```
//! use kingdom_engine::cards::{Card, CardDefinition};
//! use kingdom_engine::core::{CardId, PlayerId};
//! use kingdom_engine::triggers::{
//!     ReactionBus, ReactionCondition, ReactionOutcome, ReactionTemplate, TriggerKind,
//! };
//!
//! let moat = Card::from_definition(CardId(4), &CardDefinition::new("moat", "Moat"));
//! let owner = PlayerId::new(1);
//!
//! // "When another player plays an attack, you are unaffected."
//! let template = ReactionTemplate::new(&moat, owner, TriggerKind::CardPlayed, |_call| {
//!     Box::pin(async { Ok(ReactionOutcome::Immunity) })
//! })
//! .with_condition(ReactionCondition::NotForPlayer(owner))
//! .optional();
//!
//! let mut bus = ReactionBus::new();
//! let id = bus.register_reaction_template(template);
//! assert_eq!(id.as_str(), "moat:4:cardPlayed");
//! ```

mod condition;
mod context;
mod event;
mod lifecycle;
mod registry;

pub use condition::{ConditionContext, ConditionFn, ReactionCondition};
pub use context::{ReactionContext, ReactionOutcome};
pub use event::{ReactionId, Trigger, TriggerKind};
pub use lifecycle::{LifecycleArgs, LifecycleEvent};
pub use registry::{ReactionBus, ReactionTemplate};
