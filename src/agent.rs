use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};
use std::thread;

use anyhow::{anyhow, Context, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::app::{AgentReply, ToolCall, ToolCallRecord, ToolCalls};

/// The agent child process. Its pipes are owned by the bridge threads; the
/// engine only sees the two channel ends returned by [`spawn`].
pub(crate) struct AgentProcess {
    child: Child,
}

impl AgentProcess {
    pub(crate) fn id(&self) -> u32 {
        self.child.id()
    }

    pub(crate) fn shutdown(mut self) {
        if let Err(err) = self.child.kill() {
            debug!(error = %err, "agent already exited");
        }
        let _ = self.child.wait();
    }
}

/// Start the agent command and bridge its stdin/stdout to unbounded channels:
/// strings sent on the returned `Sender` reach the agent one JSON line each,
/// and every line the agent prints arrives on the `Receiver` as a reply.
pub(crate) fn spawn(
    command: &[String],
) -> Result<(AgentProcess, Sender<String>, Receiver<AgentReply>)> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| anyhow!("empty agent command"))?;
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawn agent `{program}`"))?;

    let mut stdin = child.stdin.take().context("agent stdin missing")?;
    let stdout = child.stdout.take().context("agent stdout missing")?;
    let stderr = child.stderr.take().context("agent stderr missing")?;
    info!(pid = child.id(), program = %program, "agent started");

    let (human_tx, human_rx) = unbounded::<String>();
    let (reply_tx, reply_rx) = unbounded::<AgentReply>();

    thread::spawn(move || {
        for message in human_rx.iter() {
            let line = match encode_human_message(&message) {
                Ok(line) => line,
                Err(err) => {
                    warn!(error = %err, "could not encode message for agent");
                    continue;
                }
            };
            if let Err(err) = writeln!(stdin, "{line}").and_then(|_| stdin.flush()) {
                warn!(error = %err, "agent stdin closed");
                break;
            }
        }
    });

    thread::spawn(move || {
        for line in BufReader::new(stdout).lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    warn!(error = %err, "agent stdout read failed");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            if reply_tx.send(parse_reply(&line)).is_err() {
                break;
            }
        }
        info!("agent output closed");
    });

    thread::spawn(move || {
        for line in BufReader::new(stderr).lines().map_while(|l| l.ok()) {
            debug!(target: "chatty::agent", "{line}");
        }
    });

    Ok((AgentProcess { child }, human_tx, reply_rx))
}

pub(crate) fn encode_human_message(message: &str) -> Result<String> {
    serde_json::to_string(message).context("encode human message")
}

/// Inverse of [`encode_human_message`]; a line that is not a JSON string is
/// taken verbatim.
pub(crate) fn decode_human_message(line: &str) -> String {
    serde_json::from_str::<String>(line).unwrap_or_else(|_| line.to_string())
}

#[derive(Serialize)]
struct ReplyLine<'a> {
    tool_calls: Map<String, Value>,
    response: &'a str,
}

pub(crate) fn encode_reply(calls: &[ToolCall], response: &str) -> Result<String> {
    let tool_calls = calls
        .iter()
        .map(|call| (call.command.clone(), Value::String(call.output.clone())))
        .collect();
    serde_json::to_string(&ReplyLine {
        tool_calls,
        response,
    })
    .context("encode agent reply")
}

/// Decode one line from the agent. Accepts `{"tool_calls": .., "response": ..}`
/// or the pair form `[tool_calls, response]`. Never fails: unknown shapes
/// degrade to an empty tool-call list, and non-JSON lines become plain text.
pub(crate) fn parse_reply(line: &str) -> AgentReply {
    let value: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(_) => {
            debug!("agent line is not JSON, showing it as text");
            return AgentReply {
                tool_calls: ToolCalls::empty(),
                text: line.to_string(),
            };
        }
    };

    match value {
        Value::Object(mut obj) => AgentReply {
            tool_calls: obj
                .remove("tool_calls")
                .map(normalize_tool_calls)
                .unwrap_or_else(ToolCalls::empty),
            text: obj.remove("response").map(value_text).unwrap_or_default(),
        },
        Value::Array(items) if items.len() == 2 => {
            let mut items = items.into_iter();
            let tool_calls = items
                .next()
                .map(normalize_tool_calls)
                .unwrap_or_else(ToolCalls::empty);
            let text = items.next().map(value_text).unwrap_or_default();
            AgentReply { tool_calls, text }
        }
        other => {
            warn!("unrecognized agent reply shape");
            AgentReply {
                tool_calls: ToolCalls::empty(),
                text: value_text(other),
            }
        }
    }
}

pub(crate) fn normalize_tool_calls(value: Value) -> ToolCalls {
    match value {
        Value::Object(map) => ToolCalls::Single(record_from_map(map)),
        Value::Array(items) if items.iter().all(Value::is_object) => ToolCalls::Many(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(map) => Some(record_from_map(map)),
                    _ => None,
                })
                .collect(),
        ),
        Value::Null => ToolCalls::empty(),
        _ => {
            warn!("tool calls are neither a mapping nor a list of mappings; ignoring them");
            ToolCalls::empty()
        }
    }
}

fn record_from_map(map: Map<String, Value>) -> ToolCallRecord {
    ToolCallRecord {
        calls: map
            .into_iter()
            .map(|(command, output)| ToolCall {
                command,
                output: value_text(output),
            })
            .collect(),
    }
}

fn value_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
