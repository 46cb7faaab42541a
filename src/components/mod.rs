mod chat_page;
mod composer;
mod login_form;
mod toast;
mod transcript;

pub use chat_page::ChatPage;
pub use login_form::LoginForm;

pub(crate) use composer::Composer;
pub(crate) use toast::{dismisses, Notice, Toast};
pub(crate) use transcript::TranscriptView;
