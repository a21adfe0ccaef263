use std::io::{self, BufRead, Write};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

use crate::agent::{decode_human_message, encode_reply};
use crate::app::ToolCall;

/// Built-in agent used when no external agent command is configured: every
/// inbound message is run as a shell command and its output reported back as
/// a single tool call. Runs until stdin closes.
pub(crate) fn run(shell: &str) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line.context("read message")?;
        if line.trim().is_empty() {
            continue;
        }
        let command = decode_human_message(&line);
        let (output, response) = run_command(shell, &command);
        let reply = encode_reply(&[ToolCall { command, output }], &response)?;
        writeln!(stdout, "{reply}").context("write reply")?;
        stdout.flush().context("flush reply")?;
    }
    Ok(())
}

/// Returns `(combined stdout/stderr, one-line summary)`.
pub(crate) fn run_command(shell: &str, command: &str) -> (String, String) {
    let output = match Command::new(shell)
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .output()
    {
        Ok(output) => output,
        Err(err) => return (String::new(), format!("Could not run {shell}: {err}")),
    };

    let mut text = String::new();
    if !output.stdout.is_empty() {
        text.push_str(&String::from_utf8_lossy(&output.stdout));
    }
    if !output.stderr.is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&String::from_utf8_lossy(&output.stderr));
    }

    let response = match output.status.code() {
        Some(0) => "Done.".to_string(),
        Some(code) => format!("Command exited with status {code}."),
        None => "Command was terminated by a signal.".to_string(),
    };
    (text, response)
}
