use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

use anyhow::{anyhow, Result};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum CopyMethod {
    Native,
    External(&'static str),
}

impl CopyMethod {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            CopyMethod::Native => "native",
            CopyMethod::External(program) => program,
        }
    }
}

/// Destination for middle-click copies. The engine treats every failure as
/// non-fatal.
pub(crate) trait Clipboard {
    fn copy(&mut self, text: &str) -> Result<CopyMethod>;
}

#[cfg(target_os = "macos")]
const EXTERNAL_TOOLS: &[(&str, &[&str])] = &[("pbcopy", &[])];

#[cfg(not(target_os = "macos"))]
const EXTERNAL_TOOLS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

/// OS clipboard through `arboard`, falling back to an external utility fed on
/// stdin when no in-process clipboard is available (no display server, SSH).
#[derive(Default)]
pub(crate) struct SystemClipboard {
    // Kept alive: on X11 the selection is served by this handle.
    native: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    fn copy_native(&mut self, text: &str) -> Result<()> {
        if self.native.is_none() {
            self.native = Some(arboard::Clipboard::new()?);
        }
        let clipboard = self
            .native
            .as_mut()
            .ok_or_else(|| anyhow!("clipboard unavailable"))?;
        clipboard.set_text(text.to_string())?;
        Ok(())
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<CopyMethod> {
        match self.copy_native(text) {
            Ok(()) => return Ok(CopyMethod::Native),
            Err(err) => {
                debug!(error = %err, "native clipboard failed, trying external tools");
                self.native = None;
            }
        }
        copy_external(text)
    }
}

/// Spawn the first available clipboard utility and hand it `text`. The write
/// and the wait happen on a detached thread so the render loop never waits on
/// the child.
fn copy_external(text: &str) -> Result<CopyMethod> {
    for &(program, args) in EXTERNAL_TOOLS {
        let spawned = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        let mut child = match spawned {
            Ok(child) => child,
            Err(err) => {
                debug!(program, error = %err, "clipboard utility unavailable");
                continue;
            }
        };
        let payload = text.to_string();
        thread::spawn(move || {
            if let Some(mut stdin) = child.stdin.take() {
                let _ = stdin.write_all(payload.as_bytes());
            }
            let _ = child.wait();
        });
        return Ok(CopyMethod::External(program));
    }
    Err(anyhow!("no clipboard available"))
}
