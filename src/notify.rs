//! Out-of-band notifications for live listeners of an agent run.

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::model::ContentBlock;

/// Assistant content pushed to a listener after each successful tool round.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantMessage {
    pub content: Vec<ContentBlock>,
}

/// Receives assistant content as the agent makes progress.
///
/// Implementations must return promptly and must not fail the run.
pub trait Notifier: Send + Sync {
    fn assistant_message(&self, content: &[ContentBlock]);
}

impl<F> Notifier for F
where
    F: Fn(&[ContentBlock]) + Send + Sync,
{
    fn assistant_message(&self, content: &[ContentBlock]) {
        self(content)
    }
}

/// Forwards assistant messages into an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: UnboundedSender<AssistantMessage>,
}

impl ChannelNotifier {
    pub fn new(sender: UnboundedSender<AssistantMessage>) -> Self {
        Self { sender }
    }
}

impl Notifier for ChannelNotifier {
    fn assistant_message(&self, content: &[ContentBlock]) {
        let message = AssistantMessage {
            content: content.to_vec(),
        };
        if self.sender.send(message).is_err() {
            debug!("Notification listener dropped, skipping assistant message");
        }
    }
}
