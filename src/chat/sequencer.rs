use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use yew::Callback;

use super::state::{ChatEffect, ChatEvent, Conversation};
use crate::clock;
use crate::error::ChatError;
use crate::session::{SessionIdProvider, SessionStorage};
use crate::types::{ChatRequest, Credential, Turn};

/// One request/response exchange with the assistant backend.
#[async_trait(?Send)]
pub trait ChatTransport {
    async fn send_turn(
        &self,
        request: &ChatRequest,
        credential: &Credential,
    ) -> Result<String, ChatError>;
}

pub type Clock = Rc<dyn Fn() -> String>;

/// Proof that a submission passed the guard. Only `admit` hands these out.
#[derive(Debug)]
pub struct Admitted {
    request: ChatRequest,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Rejected,
    Answered,
    Failed(String),
}

/// Drives a [`Conversation`]: applies events, performs the effects they ask
/// for, and tells the view when to re-render.
pub struct TurnSequencer<T, S> {
    conversation: RefCell<Conversation>,
    transport: T,
    sessions: SessionIdProvider<S>,
    credential: Credential,
    clock: Clock,
    on_change: Callback<()>,
    on_failure: Callback<String>,
}

impl<T: ChatTransport, S: SessionStorage> TurnSequencer<T, S> {
    pub fn new(transport: T, sessions: SessionIdProvider<S>, credential: Credential) -> Self {
        Self {
            conversation: RefCell::new(Conversation::new()),
            transport,
            sessions,
            credential,
            clock: Rc::new(clock::now_display),
            on_change: Callback::from(|_| ()),
            on_failure: Callback::from(|_| ()),
        }
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn on_change(mut self, callback: Callback<()>) -> Self {
        self.on_change = callback;
        self
    }

    pub fn on_failure(mut self, callback: Callback<String>) -> Self {
        self.on_failure = callback;
        self
    }

    pub fn transcript(&self) -> Vec<Turn> {
        self.conversation.borrow().transcript().to_vec()
    }

    pub fn is_pending(&self) -> bool {
        self.conversation.borrow().is_pending()
    }

    /// Synchronous half of a submission: runs the guard and appends the user
    /// turn. `None` means the text was blank or a request is already out.
    pub fn admit(&self, text: &str) -> Option<Admitted> {
        let event = ChatEvent::Submit {
            text: text.to_string(),
            at: (self.clock)(),
        };
        let effect = self.conversation.borrow_mut().apply(event);
        let Some(ChatEffect::SendTurn { message }) = effect else {
            debug!("submission rejected");
            return None;
        };
        let session_id = self.sessions.get_or_create();
        info!(chars = message.chars().count(), "turn accepted");
        self.on_change.emit(());
        Some(Admitted {
            request: ChatRequest { message, session_id },
        })
    }

    /// Sends the admitted turn and records whatever comes back.
    pub async fn complete(&self, admitted: Admitted) -> Outcome {
        let result = self
            .transport
            .send_turn(&admitted.request, &self.credential)
            .await;
        let event = match result {
            Ok(response) => {
                info!(chars = response.chars().count(), "assistant replied");
                ChatEvent::Succeeded {
                    response,
                    at: (self.clock)(),
                }
            }
            Err(err) => {
                warn!(error = %err, "chat exchange failed");
                ChatEvent::Failed {
                    message: err.display_message(),
                }
            }
        };
        let effect = self.conversation.borrow_mut().apply(event);
        self.on_change.emit(());
        match effect {
            Some(ChatEffect::NotifyFailure { message }) => {
                self.on_failure.emit(message.clone());
                Outcome::Failed(message)
            }
            _ => Outcome::Answered,
        }
    }

    #[cfg(test)]
    pub async fn submit(&self, text: &str) -> Outcome {
        match self.admit(text) {
            Some(admitted) => self.complete(admitted).await,
            None => Outcome::Rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStorage;
    use crate::types::Role;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use std::cell::Cell;
    use std::collections::VecDeque;

    type Reply = Result<String, ChatError>;

    #[derive(Default)]
    struct ScriptedTransport {
        replies: RefCell<VecDeque<Reply>>,
        sent: RefCell<Vec<(ChatRequest, String)>>,
    }

    impl ScriptedTransport {
        fn with(replies: Vec<Reply>) -> Self {
            Self {
                replies: RefCell::new(replies.into()),
                sent: RefCell::default(),
            }
        }
    }

    #[async_trait(?Send)]
    impl ChatTransport for ScriptedTransport {
        async fn send_turn(
            &self,
            request: &ChatRequest,
            credential: &Credential,
        ) -> Result<String, ChatError> {
            self.sent
                .borrow_mut()
                .push((request.clone(), credential.authorization_header()));
            self.replies.borrow_mut().pop_front().expect("unexpected request")
        }
    }

    /// Holds the reply until the test releases it.
    struct GatedTransport {
        gate: RefCell<Option<oneshot::Receiver<Reply>>>,
        sent: RefCell<Vec<ChatRequest>>,
    }

    #[async_trait(?Send)]
    impl ChatTransport for GatedTransport {
        async fn send_turn(
            &self,
            request: &ChatRequest,
            _credential: &Credential,
        ) -> Result<String, ChatError> {
            self.sent.borrow_mut().push(request.clone());
            let rx = self
                .gate
                .borrow_mut()
                .take()
                .expect("only one request may be in flight");
            rx.await.unwrap_or_else(|_| Err(ChatError::Transport("dropped".to_string())))
        }
    }

    fn sessions() -> SessionIdProvider<Rc<MemoryStorage>> {
        SessionIdProvider::new(Rc::new(MemoryStorage::default()), "session_id")
    }

    fn ticking_clock() -> Clock {
        let tick = Rc::new(Cell::new(0));
        Rc::new(move || {
            tick.set(tick.get() + 1);
            format!("t{}", tick.get())
        })
    }

    fn sequencer<T: ChatTransport>(transport: T) -> TurnSequencer<T, Rc<MemoryStorage>> {
        TurnSequencer::new(transport, sessions(), Credential::new("tok"))
            .with_clock(ticking_clock())
    }

    #[test]
    fn test_round_trip_success() {
        let seq = sequencer(ScriptedTransport::with(vec![Ok("X".to_string())]));
        let outcome = block_on(seq.submit("hi"));
        assert_eq!(outcome, Outcome::Answered);
        assert_eq!(
            seq.transcript(),
            vec![Turn::user("hi", "t1"), Turn::assistant("X", "t2")]
        );
        assert!(!seq.is_pending());

        let sent = seq.transport.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0.message, "hi");
        assert_eq!(sent[0].1, "Bearer tok");
        assert!(!sent[0].0.session_id.is_empty());
    }

    #[test]
    fn test_failure_raises_one_notification() {
        let notices = Rc::new(RefCell::new(Vec::new()));
        let seq = {
            let notices = notices.clone();
            sequencer(ScriptedTransport::with(vec![Err(ChatError::Server {
                status: 500,
                message: Some("Database error".to_string()),
            })]))
            .on_failure(Callback::from(move |msg: String| notices.borrow_mut().push(msg)))
        };
        let outcome = block_on(seq.submit("hi"));
        assert_eq!(outcome, Outcome::Failed("Database error".to_string()));
        assert_eq!(seq.transcript(), vec![Turn::user("hi", "t1")]);
        assert_eq!(*notices.borrow(), vec!["Database error".to_string()]);
        assert!(!seq.is_pending());
    }

    #[test]
    fn test_transport_error_uses_generic_message() {
        let seq = sequencer(ScriptedTransport::with(vec![Err(ChatError::Transport(
            "offline".to_string(),
        ))]));
        let outcome = block_on(seq.submit("hi"));
        assert_eq!(
            outcome,
            Outcome::Failed(crate::error::GENERIC_CHAT_FAILURE.to_string())
        );
    }

    #[test]
    fn test_blank_input_sends_nothing() {
        let seq = sequencer(ScriptedTransport::default());
        for text in ["", "   "] {
            assert_eq!(block_on(seq.submit(text)), Outcome::Rejected);
        }
        assert!(seq.transcript().is_empty());
        assert!(seq.transport.sent.borrow().is_empty());
        assert!(!seq.is_pending());
    }

    #[test]
    fn test_second_submission_dropped_while_pending() {
        let (tx, rx) = oneshot::channel();
        let seq = sequencer(GatedTransport {
            gate: RefCell::new(Some(rx)),
            sent: RefCell::default(),
        });

        let first = seq.submit("a");
        let second = async {
            // "a" is in flight: its user turn is already there.
            assert!(seq.is_pending());
            assert_eq!(seq.transcript(), vec![Turn::user("a", "t1")]);

            assert_eq!(seq.submit("b").await, Outcome::Rejected);
            assert_eq!(seq.transcript().len(), 1);
            assert!(seq.is_pending());

            tx.send(Ok("A".to_string())).unwrap();
        };
        let (outcome, ()) = block_on(async { futures::join!(first, second) });

        assert_eq!(outcome, Outcome::Answered);
        let sent = seq.transport.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].message, "a");
        let transcript = seq.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].role, Role::Assistant);
        assert_eq!(transcript[1].content, "A");
    }

    #[test]
    fn test_turns_share_session_id() {
        let seq = sequencer(ScriptedTransport::with(vec![
            Ok("one".to_string()),
            Ok("two".to_string()),
        ]));
        block_on(seq.submit("first"));
        block_on(seq.submit("second"));
        let sent = seq.transport.sent.borrow();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0.session_id, sent[1].0.session_id);
    }

    #[test]
    fn test_accepts_again_after_failure() {
        let seq = sequencer(ScriptedTransport::with(vec![
            Err(ChatError::Transport("timeout".to_string())),
            Ok("back".to_string()),
        ]));
        block_on(seq.submit("one"));
        assert_eq!(block_on(seq.submit("two")), Outcome::Answered);
        let contents: Vec<_> = seq.transcript().into_iter().map(|t| t.content).collect();
        assert_eq!(contents, vec!["one", "two", "back"]);
    }

    #[test]
    fn test_change_notified_per_transition() {
        let changes = Rc::new(Cell::new(0));
        let seq = {
            let changes = changes.clone();
            sequencer(ScriptedTransport::with(vec![Ok("ok".to_string())]))
                .on_change(Callback::from(move |_| changes.set(changes.get() + 1)))
        };
        block_on(seq.submit("   "));
        assert_eq!(changes.get(), 0);
        block_on(seq.submit("hello"));
        assert_eq!(changes.get(), 2);
    }
}
