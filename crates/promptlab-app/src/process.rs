//! Message processing
//!
//! Runs a message and its follow-ups through the TEA update function and
//! dispatches every resulting action.

use std::sync::Arc;

use promptlab_api::{CredentialStore, PromptApi};
use tokio::sync::mpsc;

use crate::actions::handle_action;
use crate::handler;
use crate::message::Message;
use crate::state::AppState;

/// Process a message through the TEA update function
pub fn process_message<A>(
    state: &mut AppState,
    message: Message,
    msg_tx: &mpsc::Sender<Message>,
    api: &Arc<A>,
    credentials: &Arc<dyn CredentialStore>,
) where
    A: PromptApi + Send + Sync + 'static,
{
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, msg_tx.clone(), api.clone(), credentials.clone());
        }

        msg = result.message;
    }
}
