//! Result delivery — clipboard write and native result dialog.
//!
//! Both go through the platform's own command-line helpers, with the text
//! piped on stdin:
//!
//! ```text
//!            clipboard                          dialog
//! macOS      pbcopy                             osascript (display dialog)
//! Linux      wl-copy | xclip | xsel             zenity --text-info
//! Windows    clip                               —
//! ```
//!
//! Helpers are tried in order; one that is not installed or fails is skipped.
//! Only the exit status is awaited: `xclip` and `wl-copy` leave a background
//! process serving the selection, so their output pipes never close.

use std::io::ErrorKind;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::AppError;

const DIALOG_TITLE: &str = "Result";

/// A program plus its arguments.
type Helper = (&'static str, &'static [&'static str]);

const MACOS_CLIPBOARD: &[Helper] = &[("pbcopy", &[])];
const WINDOWS_CLIPBOARD: &[Helper] = &[("clip", &[])];
const LINUX_CLIPBOARD: &[Helper] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

fn clipboard_helpers() -> &'static [Helper] {
    if cfg!(target_os = "macos") {
        MACOS_CLIPBOARD
    } else if cfg!(target_os = "windows") {
        WINDOWS_CLIPBOARD
    } else {
        LINUX_CLIPBOARD
    }
}

/// Copy `text` to the system clipboard.
pub async fn copy_to_clipboard(text: &str) -> Result<(), AppError> {
    copy_with(clipboard_helpers(), text).await
}

/// Try each helper in turn until one succeeds.
async fn copy_with(helpers: &[Helper], text: &str) -> Result<(), AppError> {
    let mut failures = Vec::new();
    for &(program, args) in helpers {
        match pipe_to(program, args, text).await {
            Ok(true) => {
                debug!(helper = program, "result copied to clipboard");
                return Ok(());
            }
            Ok(false) => {}
            Err(e) => {
                debug!(helper = program, error = %e, "clipboard helper failed, trying next");
                failures.push(e.to_string());
            }
        }
    }

    if failures.is_empty() {
        Err(AppError::Output("no clipboard utility found".into()))
    } else {
        warn!(attempts = failures.len(), "every clipboard helper failed");
        Err(AppError::Output(format!("clipboard write failed: {}", failures.join("; "))))
    }
}

/// Show `text` in a native dialog and wait for it to be dismissed.
pub async fn show_dialog(text: &str) -> Result<(), AppError> {
    let shown = if cfg!(target_os = "macos") {
        pipe_to("osascript", &[], &applescript_dialog(text)).await?
    } else if cfg!(target_os = "windows") {
        false
    } else {
        let title = format!("--title={DIALOG_TITLE}");
        pipe_to("zenity", &["--text-info", title.as_str(), "--width=600", "--height=400"], text).await?
    };

    if shown {
        Ok(())
    } else {
        Err(AppError::Output("no dialog utility found".into()))
    }
}

/// AppleScript that shows `text` in an editable, copyable field.
///
/// `text` is embedded as a JSON string literal, whose escapes (`\"`, `\\`,
/// `\n`, `\t`) AppleScript understands.
pub fn applescript_dialog(text: &str) -> String {
    let literal = serde_json::Value::String(text.to_string()).to_string();
    format!(
        "set longContent to {literal}\n\
         display dialog \"{DIALOG_TITLE}\" default answer longContent with title \"{DIALOG_TITLE}\" buttons {{\"OK\"}} default button \"OK\"\n"
    )
}

/// Run `program args…` with `input` on stdin and wait for its exit status.
///
/// `Ok(false)` when the program is not installed; an error when it ran and
/// failed.
async fn pipe_to(program: &str, args: &[&str], input: &str) -> Result<bool, AppError> {
    let mut child = match Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => child,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(program, "helper not installed");
            return Ok(false);
        }
        Err(e) => return Err(AppError::Output(format!("failed to start {program}: {e}"))),
    };

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(input.as_bytes())
            .await
            .map_err(|e| AppError::Output(format!("cannot write to {program}: {e}")))?;
        // Dropping stdin closes the pipe so the helper sees EOF.
    }

    let status = child
        .wait()
        .await
        .map_err(|e| AppError::Output(format!("cannot wait for {program}: {e}")))?;
    if status.success() {
        Ok(true)
    } else {
        Err(AppError::Output(format!("{program} exited with {status}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applescript_escapes_quotes_and_newlines() {
        let script = applescript_dialog("say \"hi\"\nthen \\ leave");
        assert!(script.starts_with("set longContent to \"say \\\"hi\\\"\\nthen \\\\ leave\"\n"));
        assert!(script.contains("display dialog \"Result\" default answer longContent"));
        assert!(script.contains("buttons {\"OK\"} default button \"OK\""));
    }

    #[test]
    fn applescript_keeps_unicode() {
        let script = applescript_dialog("你好，世界");
        assert!(script.contains("\"你好，世界\""));
    }

    #[test]
    fn every_platform_has_a_clipboard_helper() {
        assert!(!clipboard_helpers().is_empty());
    }

    #[tokio::test]
    async fn missing_helper_is_skipped() {
        let ran = pipe_to("my-tools-no-such-helper-xyz", &[], "text").await.unwrap();
        assert!(!ran);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn helper_receives_stdin() {
        assert!(pipe_to("sh", &["-c", "test \"$(cat)\" = payload"], "payload").await.unwrap());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_helper_is_an_error() {
        let err = pipe_to("sh", &["-c", "cat >/dev/null; exit 3"], "x").await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("output error"));
        assert!(msg.contains("sh exited with"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn lingering_background_child_does_not_block() {
        // Like xclip: the helper exits while a forked child keeps running.
        let started = std::time::Instant::now();
        let ran = pipe_to("sh", &["-c", "cat >/dev/null; (sleep 5 &); exit 0"], "hello")
            .await
            .unwrap();
        assert!(ran);
        assert!(started.elapsed() < std::time::Duration::from_secs(3), "waited on the background child");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_helper_falls_back_to_next() {
        const HELPERS: &[Helper] = &[
            ("sh", &["-c", "cat >/dev/null; echo 'no wayland' >&2; exit 1"]),
            ("my-tools-no-such-helper-xyz", &[]),
            ("sh", &["-c", "test \"$(cat)\" = hello"]),
        ];
        copy_with(HELPERS, "hello").await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn all_helpers_failing_reports_each_failure() {
        const HELPERS: &[Helper] = &[
            ("sh", &["-c", "cat >/dev/null; exit 1"]),
            ("sh", &["-c", "cat >/dev/null; exit 2"]),
        ];
        let msg = copy_with(HELPERS, "hello").await.unwrap_err().to_string();
        assert!(msg.contains("clipboard write failed"));
        assert_eq!(msg.matches("sh exited with").count(), 2);
    }

    #[tokio::test]
    async fn no_installed_helper_is_reported() {
        const HELPERS: &[Helper] = &[("my-tools-no-such-helper-xyz", &[])];
        let msg = copy_with(HELPERS, "hello").await.unwrap_err().to_string();
        assert!(msg.contains("no clipboard utility found"));
    }
}
