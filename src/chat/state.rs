use tracing::debug;

use crate::types::Turn;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    AwaitingResponse,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatEvent {
    Submit { text: String, at: String },
    Succeeded { response: String, at: String },
    Failed { message: String },
}

/// Work the driver has to do after a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatEffect {
    SendTurn { message: String },
    NotifyFailure { message: String },
}

#[derive(Debug, PartialEq, Eq)]
pub struct Transition {
    pub phase: Phase,
    pub append: Option<Turn>,
    pub effect: Option<ChatEffect>,
}

impl Transition {
    fn stay(phase: Phase) -> Self {
        Self {
            phase,
            append: None,
            effect: None,
        }
    }
}

/// Pure transition function. Rejections come back as "stay where you are"
/// with nothing to append and nothing to do.
pub fn transition(phase: Phase, event: ChatEvent) -> Transition {
    match (phase, event) {
        (Phase::Idle, ChatEvent::Submit { text, at }) => {
            let text = text.trim();
            if text.is_empty() {
                return Transition::stay(Phase::Idle);
            }
            Transition {
                phase: Phase::AwaitingResponse,
                append: Some(Turn::user(text, at)),
                effect: Some(ChatEffect::SendTurn {
                    message: text.to_string(),
                }),
            }
        }
        (Phase::AwaitingResponse, ChatEvent::Succeeded { response, at }) => Transition {
            phase: Phase::Idle,
            append: Some(Turn::assistant(response, at)),
            effect: None,
        },
        (Phase::AwaitingResponse, ChatEvent::Failed { message }) => Transition {
            phase: Phase::Idle,
            append: None,
            effect: Some(ChatEffect::NotifyFailure { message }),
        },
        (phase, _) => Transition::stay(phase),
    }
}

/// Transcript plus phase. Turns are only ever appended.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Conversation {
    transcript: Vec<Turn>,
    phase: Phase,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_pending(&self) -> bool {
        self.phase == Phase::AwaitingResponse
    }

    pub fn apply(&mut self, event: ChatEvent) -> Option<ChatEffect> {
        let from = self.phase;
        let Transition { phase, append, effect } = transition(from, event);
        if let Some(turn) = append {
            self.transcript.push(turn);
        }
        self.phase = phase;
        debug!(?from, to = ?phase, turns = self.transcript.len(), "chat transition");
        effect
    }
}
