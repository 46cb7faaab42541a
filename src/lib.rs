use wasm_bindgen::prelude::*;

pub mod api;
pub mod app;
pub mod chat;
pub mod clock;
pub mod components;
pub mod config;
pub mod error;
pub mod session;
pub mod types;

pub use app::App;
pub use chat::{ChatTransport, Outcome, TurnSequencer};
pub use config::ClientConfig;
pub use error::ChatError;
pub use session::{MemoryStorage, SessionIdProvider, SessionStorage};

#[wasm_bindgen(start)]
pub fn run_app() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document not available"))?;
    let root = document
        .get_element_by_id("root")
        .ok_or_else(|| JsValue::from_str("#root element missing"))?;
    yew::Renderer::<App>::with_root(root).render();
    Ok(())
}
