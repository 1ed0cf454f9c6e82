//! # Handler chain
//!
//! Runs an ordered list of handlers for each message: every `before` in order (any `false` stops
//! the chain), then `handle` until one returns Stop or Reply, then every `after` in reverse order.

use dbot_core::{Handler, HandlerResponse, Message, Result};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Ordered chain of handlers. Cheap to clone; handlers are shared.
#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Appends a handler (runs in order; first Stop/Reply ends the handle phase).
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs the three phases and returns the first Stop or Reply, or Continue when no handler claimed the message.
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    pub async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        for handler in &self.handlers {
            if !handler.before(message).await? {
                let handler_name = std::any::type_name_of_val(handler.as_ref());
                info!(handler = %handler_name, "step: before returned false, chain stopped");
                return Ok(HandlerResponse::Stop);
            }
        }

        let mut final_response = HandlerResponse::Continue;
        for handler in &self.handlers {
            let handler_name = std::any::type_name_of_val(handler.as_ref());
            let response = handler.handle(message).await?;
            debug!(handler = %handler_name, response = ?response, "step: handler done");

            match response {
                HandlerResponse::Stop | HandlerResponse::Reply(_) => {
                    final_response = response;
                    break;
                }
                HandlerResponse::Continue | HandlerResponse::Ignore => continue,
            }
        }

        for handler in self.handlers.iter().rev() {
            handler.after(message, &final_response).await?;
        }

        Ok(final_response)
    }
}

// Tests live in tests/handler_chain_test.rs
