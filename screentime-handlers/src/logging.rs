use async_trait::async_trait;
use dbot_core::{Handler, HandlerResponse, Message, Result};
use tracing::{debug, info};

/// Logs every incoming message and the chain's final response, including the reply body.
pub struct LoggingHandler;

#[async_trait]
impl Handler for LoggingHandler {
    async fn before(&self, message: &Message) -> Result<bool> {
        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            message_id = %message.id,
            "Received message"
        );
        debug!(content = %message.content, "Message content");
        Ok(true)
    }

    async fn after(&self, message: &Message, response: &HandlerResponse) -> Result<()> {
        match response {
            HandlerResponse::Reply(text) => info!(
                user_id = message.user.id,
                chat_id = message.chat.id,
                reply = %text,
                "Message answered"
            ),
            _ => debug!(
                user_id = message.user.id,
                chat_id = message.chat.id,
                ?response,
                "Message handled"
            ),
        }
        Ok(())
    }
}
