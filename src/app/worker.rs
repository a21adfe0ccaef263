use super::*;

use anyhow::{anyhow, Result};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use tracing::{info, warn};

/// The engine's ends of the two agent channels. The engine is the only
/// writer of `human_tx` and the only reader of `agent_rx`.
pub(crate) struct ChannelAdapter {
    human_tx: Sender<String>,
    agent_rx: Receiver<AgentReply>,
}

impl ChannelAdapter {
    pub(crate) fn new(human_tx: Sender<String>, agent_rx: Receiver<AgentReply>) -> Self {
        Self { human_tx, agent_rx }
    }

    pub(crate) fn send(&self, message: &str) -> Result<()> {
        self.human_tx
            .send(message.to_string())
            .map_err(|_| anyhow!("agent channel closed"))
    }
}

impl App {
    /// Drain every reply queued on the agent channel without blocking, so a
    /// burst of replies lands in a single frame. Returns true if anything was
    /// applied.
    pub(super) fn poll_agent(&mut self) -> bool {
        let mut applied = false;
        loop {
            match self.channel.agent_rx.try_recv() {
                Ok(reply) => {
                    self.apply_reply(reply);
                    applied = true;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.agent_connected {
                        self.agent_connected = false;
                        warn!("agent channel disconnected");
                        self.set_status("agent disconnected");
                    }
                    break;
                }
            }
        }
        applied
    }

    fn apply_reply(&mut self, reply: AgentReply) {
        let calls = reply.tool_calls.into_calls();
        info!(tool_calls = calls.len(), "agent reply received");
        for call in calls {
            self.tool_calls.push(ToolCall {
                command: sanitize_runtime_text(&call.command),
                output: sanitize_runtime_text(&call.output),
            });
        }
        self.push_message(Author::Ai, sanitize_runtime_text(&reply.text));
    }

    /// Hand a composed message to the agent. A closed channel is reported in
    /// the status line; the message still enters the transcript.
    pub(super) fn send_to_agent(&mut self, message: &str) {
        if let Err(err) = self.channel.send(message) {
            warn!(error = %err, "message not delivered");
            self.set_status("agent unavailable, message not delivered");
        }
    }
}
