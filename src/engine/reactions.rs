//! Trigger and lifecycle dispatch.
//!
//! ## run_trigger
//!
//! 1. Snapshot the ids listening for the trigger kind (registration order)
//! 2. Skip ids unregistered since the snapshot
//! 3. Skip a single-instance template whose owner already fired a copy of
//!    the same card
//! 4. Evaluate the condition
//! 5. Offer non-compulsory templates to their owner; no answer declines
//! 6. Unregister `once` templates, then run the effect in a log scope
//! 7. Record the outcome in the reaction context
//!
//! Errors from conditions and effects abort the walk and propagate.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::core::CardId;
use crate::effects::{LifecycleCall, LifecycleHook, ReactionCall};
use crate::error::Result;
use crate::input::PromptPayload;
use crate::log::LogScope;
use crate::triggers::{ConditionContext, LifecycleArgs, LifecycleEvent, ReactionContext, Trigger};

use super::Engine;

impl Engine {
    /// Broadcast a trigger to every listening reaction template.
    pub async fn run_trigger(&mut self, trigger: &Trigger, reaction_context: &mut ReactionContext) -> Result<()> {
        let ids = self.reactions.listening_for(&trigger.kind);
        if ids.is_empty() {
            return Ok(());
        }
        tracing::trace!(kind = %trigger.kind, listeners = ids.len(), "run trigger");

        let mut fired = FxHashSet::default();
        for id in ids {
            let Some(template) = self.reactions.get(&id).cloned() else {
                tracing::trace!(%id, "reaction removed before it could fire");
                continue;
            };

            let instance_key = (template.owner, template.card_key.clone());
            if !template.allow_multiple_instances && fired.contains(&instance_key) {
                continue;
            }

            let matches = {
                let ctx = ConditionContext::new(trigger, &self.state, &self.zones, &self.cards);
                template.condition.evaluate(&ctx)?
            };
            if !matches {
                continue;
            }

            if !template.compulsory {
                let payload = PromptPayload::confirm(format!("Use {}?", template.card_key)).with_card(template.card);
                if !self.confirm(template.owner, payload).await {
                    tracing::debug!(%id, owner = %template.owner, "reaction declined");
                    continue;
                }
            }

            if template.once {
                self.reactions.unregister_trigger(&id);
            }
            if !template.allow_multiple_instances {
                fired.insert(instance_key);
            }

            tracing::debug!(%id, kind = %trigger.kind, "reaction fired");
            let outcome = {
                let _scope = LogScope::enter(Arc::clone(&self.log));
                self.sources.push(template.card);
                let result = (template.effect)(ReactionCall {
                    engine: self,
                    trigger,
                    reaction_context,
                    card: template.card,
                    owner: template.owner,
                })
                .await;
                self.sources.pop();
                result?
            };
            reaction_context.record(template.owner, outcome);
        }
        Ok(())
    }

    /// Run the hook the card's key defines for `event`, if any.
    pub async fn run_card_lifecycle_event(&mut self, event: LifecycleEvent, args: LifecycleArgs) -> Result<()> {
        let Some(card) = args.card else {
            return Ok(());
        };
        let key = self.cards.require(card)?.key.clone();
        let Some(hook) = self.effects.lifecycle_hook(&key, event) else {
            return Ok(());
        };

        tracing::trace!(%event, %card, "card lifecycle event");
        self.run_hook(&hook, event, args, Some(card)).await
    }

    /// Run every expansion hook registered for `event`.
    pub async fn run_game_lifecycle_event(&mut self, event: LifecycleEvent, args: LifecycleArgs) -> Result<()> {
        for (expansion, hook) in self.effects.game_hooks(event) {
            tracing::trace!(%event, expansion = %expansion, "game lifecycle event");
            self.run_hook(&hook, event, args.clone(), args.card).await?;
        }
        Ok(())
    }

    async fn run_hook(
        &mut self,
        hook: &LifecycleHook,
        event: LifecycleEvent,
        args: LifecycleArgs,
        source: Option<CardId>,
    ) -> Result<()> {
        let _scope = LogScope::enter(Arc::clone(&self.log));
        if let Some(card) = source {
            self.sources.push(card);
        }
        let result = hook(LifecycleCall {
            engine: self,
            event,
            args,
        })
        .await;
        if source.is_some() {
            self.sources.pop();
        }
        result
    }
}
