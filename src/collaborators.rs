//! Capabilities supplied by the surrounding application
//!
//! The core never talks to a user directly. Path selection, yes/no
//! confirmation and the catalog mutation gate come in through these traits.

use std::io::{BufRead, Write};
use std::path::PathBuf;

pub trait PathPicker {
    /// An absolute path, or `None` when the user cancelled
    fn pick_path(&mut self) -> Option<PathBuf>;
}

pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Decides whether the catalog may be changed
pub trait MutationGate {
    fn allow(&mut self) -> bool;
}

/// Picker backed by a path given up front (e.g. on the command line)
#[derive(Debug, Clone)]
pub struct GivenPath(Option<PathBuf>);

impl GivenPath {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self(path)
    }
}

impl PathPicker for GivenPath {
    fn pick_path(&mut self) -> Option<PathBuf> {
        let path = self.0.take()?;
        if path.as_os_str().is_empty() {
            return None;
        }
        if path.is_absolute() {
            return Some(path);
        }
        std::env::current_dir().ok().map(|cwd| cwd.join(path))
    }
}

/// Reads a `y`/`yes` answer from a line-based reader
pub struct PromptConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm(&mut self, prompt: &str) -> bool {
        if write!(self.output, "{prompt} [y/N] ").and_then(|_| self.output.flush()).is_err() {
            return false;
        }
        let mut answer = String::new();
        if self.input.read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

/// Answers every confirmation the same way (`--yes`)
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        self.0
    }
}

/// Gate that never blocks; access control is left to the host
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenGate;

impl MutationGate for OpenGate {
    fn allow(&mut self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_given_path_absolutizes() {
        let mut picker = GivenPath::new(Some(PathBuf::from("configs/device.ini")));
        let picked = picker.pick_path().unwrap();
        assert!(picked.is_absolute());
        assert!(picked.ends_with("configs/device.ini"));

        // A picker hands out its path once
        assert!(picker.pick_path().is_none());
        assert!(GivenPath::new(None).pick_path().is_none());
    }

    #[test]
    fn test_prompt_confirm() {
        let mut out = Vec::new();
        let mut confirm = PromptConfirm::new(Cursor::new("Yes\n"), &mut out);
        assert!(confirm.confirm("Remove 'Device'?"));
        assert_eq!(String::from_utf8(out).unwrap(), "Remove 'Device'? [y/N] ");

        let mut confirm = PromptConfirm::new(Cursor::new("\n"), Vec::new());
        assert!(!confirm.confirm("Remove?"));

        let mut confirm = PromptConfirm::new(Cursor::new(""), Vec::new());
        assert!(!confirm.confirm("Remove?"));
    }

    #[test]
    fn test_auto_confirm_and_gate() {
        assert!(AutoConfirm(true).confirm("anything"));
        assert!(!AutoConfirm(false).confirm("anything"));
        assert!(OpenGate.allow());
    }
}
