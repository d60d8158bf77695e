//! Capability bundles handed to card code.
//!
//! Every callback receives the engine by `&mut` plus the data of the call
//! that invoked it. The bundles deref to [`Engine`], so card code reads
//! like engine code: `ctx.invoke(..)`, `ctx.zones`, `ctx.state`.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::actions::ActionOutcome;
use crate::core::{CardId, CardKey, PlayerId};
use crate::engine::Engine;
use crate::error::Result;
use crate::triggers::{LifecycleArgs, LifecycleEvent, ReactionContext, ReactionOutcome, Trigger};

/// Effect run when a card is played, or when a card-like is bought.
pub type CardEffect = Arc<dyn for<'a> Fn(EffectContext<'a>) -> BoxFuture<'a, Result<()>> + Send + Sync>;

/// Effect of a reaction template.
pub type ReactionEffect =
    Arc<dyn for<'a> Fn(ReactionCall<'a>) -> BoxFuture<'a, Result<ReactionOutcome>> + Send + Sync>;

/// Card or game lifecycle hook.
pub type LifecycleHook = Arc<dyn for<'a> Fn(LifecycleCall<'a>) -> BoxFuture<'a, Result<()>> + Send + Sync>;

/// Handler behind `Action::Custom`.
pub type CustomAction = Arc<
    dyn for<'a> Fn(&'a mut Engine, serde_json::Value) -> BoxFuture<'a, Result<ActionOutcome>> + Send + Sync,
>;

/// Context for a card effect.
pub struct EffectContext<'a> {
    pub engine: &'a mut Engine,

    /// Player resolving the effect.
    pub player: PlayerId,

    /// The card being resolved. `None` for a card-like with no instance.
    pub card: Option<CardId>,

    pub card_key: CardKey,

    /// Outcomes of the reactions to this play.
    pub reaction_context: ReactionContext,
}

impl EffectContext<'_> {
    /// Players the effect may target: everyone else in turn order,
    /// starting to the left, minus players that reacted with immunity.
    #[must_use]
    pub fn targets(&self) -> Vec<PlayerId> {
        self.engine.targets(&self.reaction_context)
    }
}

impl Deref for EffectContext<'_> {
    type Target = Engine;

    fn deref(&self) -> &Engine {
        self.engine
    }
}

impl DerefMut for EffectContext<'_> {
    fn deref_mut(&mut self) -> &mut Engine {
        self.engine
    }
}

/// Context for a reaction effect.
pub struct ReactionCall<'a> {
    pub engine: &'a mut Engine,

    /// The trigger being reacted to.
    pub trigger: &'a Trigger,

    /// Outcomes recorded so far for this trigger.
    pub reaction_context: &'a ReactionContext,

    /// Card the template is bound to.
    pub card: CardId,

    /// Owner of the template.
    pub owner: PlayerId,
}

impl Deref for ReactionCall<'_> {
    type Target = Engine;

    fn deref(&self) -> &Engine {
        self.engine
    }
}

impl DerefMut for ReactionCall<'_> {
    fn deref_mut(&mut self) -> &mut Engine {
        self.engine
    }
}

/// Context for a lifecycle hook.
pub struct LifecycleCall<'a> {
    pub engine: &'a mut Engine,
    pub event: LifecycleEvent,
    pub args: LifecycleArgs,
}

impl Deref for LifecycleCall<'_> {
    type Target = Engine;

    fn deref(&self) -> &Engine {
        self.engine
    }
}

impl DerefMut for LifecycleCall<'_> {
    fn deref_mut(&mut self) -> &mut Engine {
        self.engine
    }
}
