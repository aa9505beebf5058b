//! Command-at-a-time shell sessions
//!
//! Each committed line runs as its own `/bin/sh -c` exec; the scrollback makes
//! the sequence of exchanges read like one terminal.

use crate::widgets::TextInputState;
use lcm_provider::ContainerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingResult,
}

/// Outcome of pressing Enter on the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    /// Nothing typed
    Empty,
    /// A previous command has not returned yet; the input is kept
    Busy,
    /// Line to execute
    Run(String),
}

#[derive(Debug, Clone)]
pub struct ShellSession {
    /// Tags exec results so that replies for a closed session are dropped
    pub id: u64,
    pub container_id: ContainerId,
    pub container_name: String,
    pub scrollback: Vec<String>,
    pub input: TextInputState,
    pub state: SessionState,
}

impl ShellSession {
    pub fn new(id: u64, container_id: ContainerId, container_name: &str) -> Self {
        let scrollback = vec![
            format!("Shell session for container: {}", container_name),
            format!("Container ID: {}", container_id),
            String::new(),
            "Type commands and press ENTER to execute.".to_string(),
            String::new(),
        ];

        Self {
            id,
            container_id,
            container_name: container_name.to_string(),
            scrollback,
            input: TextInputState::new(),
            state: SessionState::Idle,
        }
    }

    pub fn commit(&mut self) -> Commit {
        if self.input.is_empty() {
            return Commit::Empty;
        }
        if self.state == SessionState::AwaitingResult {
            return Commit::Busy;
        }

        let line = self.input.take();
        self.scrollback.push(format!("$ {}", line));
        self.state = SessionState::AwaitingResult;
        Commit::Run(line)
    }

    /// Append an exec result (or its error) followed by one blank line
    pub fn apply_result(&mut self, result: Result<String, String>) {
        match result {
            Ok(output) => {
                let output = output.trim_end_matches('\n');
                if !output.is_empty() {
                    self.scrollback
                        .extend(output.split('\n').map(str::to_string));
                }
            }
            Err(e) => self.scrollback.push(format!("Error: {}", e)),
        }
        self.scrollback.push(String::new());
        self.state = SessionState::Idle;
    }
}

/// Argument vector for running one line through the container's shell
pub fn exec_argv(line: &str) -> Vec<String> {
    vec!["/bin/sh".to_string(), "-c".to_string(), line.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> ShellSession {
        ShellSession::new(1, ContainerId::new("abc123def456"), "web")
    }

    fn type_line(session: &mut ShellSession, line: &str) {
        for c in line.chars() {
            session.input.insert(c);
        }
    }

    #[test]
    fn test_banner() {
        let s = session();
        assert_eq!(s.scrollback[0], "Shell session for container: web");
        assert_eq!(s.scrollback[1], "Container ID: abc123def456");
        assert_eq!(s.scrollback.len(), 5);
        assert_eq!(s.state, SessionState::Idle);
    }

    #[test]
    fn test_commit_echoes_and_waits() {
        let mut s = session();
        type_line(&mut s, "echo hi");
        assert_eq!(s.commit(), Commit::Run("echo hi".to_string()));
        assert_eq!(s.scrollback.last().map(String::as_str), Some("$ echo hi"));
        assert!(s.input.is_empty());
        assert_eq!(s.state, SessionState::AwaitingResult);
    }

    #[test]
    fn test_result_lines_and_blank() {
        let mut s = session();
        type_line(&mut s, "echo hi");
        s.commit();
        s.apply_result(Ok("hi\n".to_string()));
        let tail: Vec<&str> = s.scrollback.iter().rev().take(3).map(String::as_str).collect();
        assert_eq!(tail, vec!["", "hi", "$ echo hi"]);
        assert_eq!(s.state, SessionState::Idle);
    }

    #[test]
    fn test_multiline_output() {
        let mut s = session();
        type_line(&mut s, "ls");
        s.commit();
        let before = s.scrollback.len();
        s.apply_result(Ok("a\nb\nc\n\n".to_string()));
        assert_eq!(&s.scrollback[before..], &["a", "b", "c", ""]);
    }

    #[test]
    fn test_error_keeps_session_open() {
        let mut s = session();
        type_line(&mut s, "boom");
        s.commit();
        s.apply_result(Err("failed to create exec: gone".to_string()));
        let n = s.scrollback.len();
        assert_eq!(s.scrollback[n - 2], "Error: failed to create exec: gone");
        assert_eq!(s.scrollback[n - 1], "");
        assert_eq!(s.state, SessionState::Idle);
    }

    #[test]
    fn test_empty_commit() {
        let mut s = session();
        assert_eq!(s.commit(), Commit::Empty);
        assert_eq!(s.scrollback.len(), 5);
    }

    #[test]
    fn test_commit_while_awaiting_keeps_input() {
        let mut s = session();
        type_line(&mut s, "sleep 5");
        s.commit();
        type_line(&mut s, "date");
        assert_eq!(s.commit(), Commit::Busy);
        assert_eq!(s.input.value(), "date");
        assert_eq!(s.scrollback.last().map(String::as_str), Some("$ sleep 5"));
    }

    #[test]
    fn test_exec_argv() {
        assert_eq!(exec_argv("echo hi"), vec!["/bin/sh", "-c", "echo hi"]);
    }
}
