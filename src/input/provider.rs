//! Synchronous input providers for bots and tests.
//!
//! An `InputProvider` answers requests one at a time; [`serve`] drives it
//! from a player's request channel. Returning `None` drops the reply,
//! which the engine treats as "no selection made".

use std::collections::VecDeque;

use tokio::sync::mpsc;

use crate::core::{CardId, PlayerId};

use super::{InputRequest, PromptPayload, PromptResponse, SelectPayload, SignalId};

/// Answers player input requests.
///
/// Implement this trait to create AI players or scripted test players.
pub trait InputProvider: Send {
    /// Answer a prompt, or `None` to decline.
    fn prompt(&mut self, player: PlayerId, signal: SignalId, payload: &PromptPayload) -> Option<PromptResponse>;

    /// Pick cards, or `None` to decline.
    fn select(&mut self, player: PlayerId, signal: SignalId, payload: &SelectPayload) -> Option<Vec<CardId>>;
}

/// Answer every request arriving on `requests` until the channel closes.
///
/// ```no_run
/// # async fn demo(engine: &mut kingdom_engine::engine::Engine) {
/// use kingdom_engine::core::PlayerId;
/// use kingdom_engine::input::{serve, FirstChoice};
///
/// let requests = engine.connect_player(PlayerId::new(1));
/// tokio::spawn(serve(requests, FirstChoice));
/// # }
/// ```
pub async fn serve<P: InputProvider>(mut requests: mpsc::UnboundedReceiver<InputRequest>, mut provider: P) {
    while let Some(request) = requests.recv().await {
        match request {
            InputRequest::Prompt {
                signal,
                player,
                payload,
                reply,
            } => {
                if let Some(response) = provider.prompt(player, signal, &payload) {
                    let _ = reply.send(response);
                }
            }
            InputRequest::Select {
                signal,
                player,
                payload,
                reply,
            } => {
                if let Some(cards) = provider.select(player, signal, &payload) {
                    let _ = reply.send(cards);
                }
            }
        }
    }
}

/// Always takes the first choice and the first eligible cards.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstChoice;

impl InputProvider for FirstChoice {
    fn prompt(&mut self, _player: PlayerId, _signal: SignalId, _payload: &PromptPayload) -> Option<PromptResponse> {
        Some(PromptResponse { choice: 0 })
    }

    fn select(&mut self, _player: PlayerId, _signal: SignalId, payload: &SelectPayload) -> Option<Vec<CardId>> {
        Some(payload.eligible.iter().copied().take(payload.count.max()).collect())
    }
}

/// One scripted answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptedAnswer {
    Choice(usize),
    Cards(Vec<CardId>),
    /// Drop the reply without answering.
    Decline,
}

/// Follows a predetermined script of answers, then declines.
///
/// A `Choice` answers a prompt and `Cards` answers a selection; a
/// mismatched answer is consumed and treated as a decline.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    answers: VecDeque<ScriptedAnswer>,
}

impl ScriptedInput {
    /// Create a provider with a script.
    pub fn new(answers: impl IntoIterator<Item = ScriptedAnswer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
        }
    }

    /// Answers not yet used.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl InputProvider for ScriptedInput {
    fn prompt(&mut self, _player: PlayerId, _signal: SignalId, _payload: &PromptPayload) -> Option<PromptResponse> {
        match self.answers.pop_front()? {
            ScriptedAnswer::Choice(choice) => Some(PromptResponse { choice }),
            _ => None,
        }
    }

    fn select(&mut self, _player: PlayerId, _signal: SignalId, _payload: &SelectPayload) -> Option<Vec<CardId>> {
        match self.answers.pop_front()? {
            ScriptedAnswer::Cards(cards) => Some(cards),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{PlayerInputs, SelectCount};

    fn select_payload() -> SelectPayload {
        SelectPayload {
            message: "discard".into(),
            eligible: vec![CardId(1), CardId(2), CardId(3)],
            count: SelectCount::UpTo(2),
            optional: true,
            card: None,
        }
    }

    #[test]
    fn test_first_choice() {
        let mut bot = FirstChoice;
        let p = PlayerId::new(0);

        assert_eq!(bot.prompt(p, SignalId(0), &PromptPayload::confirm("?")), Some(PromptResponse { choice: 0 }));
        assert_eq!(bot.select(p, SignalId(1), &select_payload()), Some(vec![CardId(1), CardId(2)]));
    }

    #[test]
    fn test_scripted_input() {
        let mut script = ScriptedInput::new([
            ScriptedAnswer::Cards(vec![CardId(3)]),
            ScriptedAnswer::Decline,
            ScriptedAnswer::Choice(1),
        ]);
        let p = PlayerId::new(0);

        assert_eq!(script.select(p, SignalId(0), &select_payload()), Some(vec![CardId(3)]));
        assert_eq!(script.prompt(p, SignalId(1), &PromptPayload::confirm("?")), None);
        assert_eq!(script.prompt(p, SignalId(2), &PromptPayload::confirm("?")), Some(PromptResponse { choice: 1 }));
        assert_eq!(script.remaining(), 0);
        assert_eq!(script.prompt(p, SignalId(3), &PromptPayload::confirm("?")), None);
    }

    #[tokio::test]
    async fn test_serve_answers_requests() {
        let mut inputs = PlayerInputs::new();
        let requests = inputs.connect(PlayerId::new(0));
        let server = tokio::spawn(serve(requests, FirstChoice));

        let (_, reply) = inputs
            .send_select(PlayerId::new(0), select_payload())
            .unwrap();
        assert_eq!(reply.await.unwrap(), vec![CardId(1), CardId(2)]);

        inputs.disconnect(PlayerId::new(0));
        server.await.unwrap();
    }
}
