//! The chat exchange core: a pure state machine over the transcript, and the
//! async driver that performs its effects against a transport.

pub mod sequencer;
pub mod state;

pub use sequencer::{Admitted, ChatTransport, Clock, Outcome, TurnSequencer};
pub use state::{transition, ChatEffect, ChatEvent, Conversation, Phase, Transition};
