//! Player choices: the engine's suspension points.

use rustc_hash::FxHashSet;

use crate::core::{CardId, PlayerId};
use crate::engine::Engine;
use crate::input::{wait_for_reply, PromptPayload, PromptResponse, SelectCount, SelectPayload};

use super::SelectCardArgs;

impl Engine {
    /// Ask a player to pick cards.
    ///
    /// A mandatory exact selection with no more eligible cards than it
    /// asks for resolves without asking. Anything the player answers
    /// outside the eligible set is dropped, as is anything past the count.
    pub async fn select_card(&mut self, args: SelectCardArgs) -> Vec<CardId> {
        let SelectCardArgs {
            player,
            message,
            eligible,
            count,
            optional,
            card,
        } = args;

        if eligible.is_empty() {
            return Vec::new();
        }
        if let SelectCount::Exact(n) = count {
            if !optional && eligible.len() <= n {
                tracing::trace!(%player, n, "selection auto-resolved");
                return eligible;
            }
        }

        let payload = SelectPayload {
            message,
            eligible: eligible.clone(),
            count,
            optional,
            card,
        };
        let Some((signal, reply)) = self.inputs.send_select(player, payload) else {
            return Vec::new();
        };
        let Some(mut selected) = wait_for_reply(player, signal, reply, self.input_timeout()).await else {
            return Vec::new();
        };

        let before = selected.len();
        let mut seen = FxHashSet::default();
        selected.retain(|id| eligible.contains(id) && seen.insert(*id));
        selected.truncate(count.max());
        if selected.len() != before {
            tracing::warn!(%player, %signal, answered = before, kept = selected.len(), "selection trimmed");
        }
        selected
    }

    /// Ask a player a question. `None` when no answer arrives or the
    /// answer is out of range.
    pub async fn user_prompt(&mut self, player: PlayerId, payload: PromptPayload) -> Option<PromptResponse> {
        let choices = payload.choices.len();
        let (signal, reply) = self.inputs.send_prompt(player, payload)?;
        let response = wait_for_reply(player, signal, reply, self.input_timeout()).await?;

        if response.choice >= choices {
            tracing::warn!(%player, %signal, choice = response.choice, choices, "prompt answer out of range");
            return None;
        }
        Some(response)
    }

    /// Yes/no question. No answer counts as no.
    pub(crate) async fn confirm(&mut self, player: PlayerId, payload: PromptPayload) -> bool {
        self.user_prompt(player, payload)
            .await
            .is_some_and(|response| response.choice == 0)
    }
}
