//! Executes request descriptors on background tasks
//!
//! Every command becomes one spawned task that sends exactly one completion
//! message back to the state owner. Nothing here touches application state.

use crate::browser;
use crate::message::{Command, ContainerAction, Message, STOP_TIMEOUT_SECS};
use crate::snapshot;
use lcm_provider::{ContainerId, ContainerProvider};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::instrument::WithSubscriber;

pub struct Worker {
    provider: Arc<dyn ContainerProvider>,
    tx: mpsc::UnboundedSender<Message>,
}

impl Worker {
    pub fn new(provider: Arc<dyn ContainerProvider>, tx: mpsc::UnboundedSender<Message>) -> Self {
        Self { provider, tx }
    }

    /// Spawn one task per command
    ///
    /// Tasks log through the caller's subscriber, not the global one, since
    /// they may run on any runtime thread.
    pub fn dispatch(&self, commands: Vec<Command>) {
        for command in commands {
            let provider = Arc::clone(&self.provider);
            let tx = self.tx.clone();
            tokio::spawn(
                async move {
                    let message = execute(provider.as_ref(), command).await;
                    // Receiver gone means the UI is shutting down
                    let _ = tx.send(message);
                }
                .with_current_subscriber(),
            );
        }
    }
}

/// Run a single command to completion
pub async fn execute(provider: &dyn ContainerProvider, command: Command) -> Message {
    match command {
        Command::LoadSnapshot { seq, manual } => Message::SnapshotLoaded {
            seq,
            manual,
            result: snapshot::load(provider).await.map_err(|e| e.to_string()),
        },
        Command::Action { action, id } => {
            tracing::debug!("{} {}", action.verb(), id);
            let result = run_action(provider, action, &id).await;
            if let Err(e) = &result {
                tracing::warn!("Failed to {} {}: {}", action.verb(), id, e);
            }
            Message::ActionFinished { action, id, result }
        }
        Command::Inspect { request, id, name } => {
            let result = match provider.inspect(&id).await {
                Ok(value) => serde_json::to_string_pretty(&value).map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            Message::InspectLoaded {
                request,
                name,
                result,
            }
        }
        Command::Logs {
            request,
            id,
            name,
            tail,
        } => Message::LogsLoaded {
            request,
            name,
            result: provider.logs(&id, tail).await.map_err(|e| e.to_string()),
        },
        Command::Exec {
            session,
            container,
            argv,
        } => Message::ExecFinished {
            session,
            result: run_exec(provider, &container, &argv).await,
        },
        Command::OpenBrowser { url } => {
            let result = browser::open_url(&url);
            Message::BrowserOpened { url, result }
        }
        Command::ScheduleTick { after } => {
            tokio::time::sleep(after).await;
            Message::Tick
        }
        Command::ScheduleStatusClear { generation, after } => {
            tokio::time::sleep(after).await;
            Message::ClearStatus { generation }
        }
    }
}

async fn run_action(
    provider: &dyn ContainerProvider,
    action: ContainerAction,
    id: &ContainerId,
) -> Result<(), String> {
    let result = match action {
        ContainerAction::Start => provider.start(id).await,
        ContainerAction::Stop => provider.stop(id, STOP_TIMEOUT_SECS).await,
        ContainerAction::Restart => provider.restart(id, STOP_TIMEOUT_SECS).await,
        ContainerAction::Destroy => provider.remove(id, true).await,
    };
    result.map_err(|e| e.to_string())
}

async fn run_exec(
    provider: &dyn ContainerProvider,
    container: &ContainerId,
    argv: &[String],
) -> Result<String, String> {
    tracing::debug!("exec in {}: {:?}", container, argv);
    let handle = provider
        .exec_create(container, argv)
        .await
        .map_err(|e| format!("failed to create exec: {}", e))?;
    provider
        .exec_attach(&handle)
        .await
        .map_err(|e| format!("failed to attach: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lcm_provider::test_support::{mock_summary, MockCall, MockProvider};
    use lcm_provider::ProviderError;
    use std::time::Duration;

    fn id() -> ContainerId {
        ContainerId::new("abc123def456")
    }

    #[tokio::test]
    async fn test_stop_uses_grace_period() {
        let mock = MockProvider::new();
        let msg = execute(
            &mock,
            Command::Action {
                action: ContainerAction::Stop,
                id: id(),
            },
        )
        .await;

        assert_eq!(
            msg,
            Message::ActionFinished {
                action: ContainerAction::Stop,
                id: id(),
                result: Ok(()),
            }
        );
        assert!(mock.was_called(&MockCall::Stop {
            id: "abc123def456".to_string(),
            timeout: 10,
        }));
    }

    #[tokio::test]
    async fn test_destroy_forces_removal() {
        let mock = MockProvider::new();
        execute(
            &mock,
            Command::Action {
                action: ContainerAction::Destroy,
                id: id(),
            },
        )
        .await;
        assert!(mock.was_called(&MockCall::Remove {
            id: "abc123def456".to_string(),
            force: true,
        }));
    }

    #[tokio::test]
    async fn test_failed_action_carries_error() {
        let mock = MockProvider::new();
        *mock.start_result.lock().unwrap() =
            Err(ProviderError::RuntimeError("port is already allocated".to_string()));

        let msg = execute(
            &mock,
            Command::Action {
                action: ContainerAction::Start,
                id: id(),
            },
        )
        .await;

        match msg {
            Message::ActionFinished { result: Err(e), .. } => {
                assert!(e.contains("port is already allocated"))
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_snapshot_is_normalized() {
        let mock = MockProvider::with_containers(vec![mock_summary(
            "0123456789abcdef",
            "web",
            "running",
        )]);

        match execute(&mock, Command::LoadSnapshot { seq: 7, manual: true }).await {
            Message::SnapshotLoaded {
                seq: 7,
                manual: true,
                result: Ok(records),
            } => {
                assert_eq!(records[0].name, "web");
                assert_eq!(records[0].id.0, "0123456789ab");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_inspect_is_pretty_printed() {
        let mock = MockProvider::new();
        *mock.inspect_result.lock().unwrap() = Ok(serde_json::json!({"Id": "abc", "State": {"Running": true}}));

        match execute(
            &mock,
            Command::Inspect {
                request: 3,
                id: id(),
                name: "web".to_string(),
            },
        )
        .await
        {
            Message::InspectLoaded {
                request: 3,
                result: Ok(text),
                ..
            } => {
                assert!(text.lines().count() > 1);
                assert!(text.contains("\"Running\": true"));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_logs_request_tail() {
        let mock = MockProvider::new();
        *mock.logs_result.lock().unwrap() = Ok("line 1\nline 2\n".to_string());

        let msg = execute(
            &mock,
            Command::Logs {
                request: 1,
                id: id(),
                name: "web".to_string(),
                tail: 100,
            },
        )
        .await;

        assert!(mock.was_called(&MockCall::Logs {
            id: "abc123def456".to_string(),
            tail: 100,
        }));
        assert!(matches!(msg, Message::LogsLoaded { result: Ok(ref s), .. } if s.contains("line 2")));
    }

    #[tokio::test]
    async fn test_exec_runs_argv() {
        let mock = MockProvider::new();
        *mock.exec_output.lock().unwrap() = Ok("hi\n".to_string());
        let argv = vec!["/bin/sh".to_string(), "-c".to_string(), "echo hi".to_string()];

        let msg = execute(
            &mock,
            Command::Exec {
                session: 4,
                container: id(),
                argv: argv.clone(),
            },
        )
        .await;

        assert_eq!(
            msg,
            Message::ExecFinished {
                session: 4,
                result: Ok("hi\n".to_string()),
            }
        );
        assert_eq!(
            mock.get_calls(),
            vec![
                MockCall::ExecCreate {
                    id: "abc123def456".to_string(),
                    argv,
                },
                MockCall::ExecAttach {
                    exec_id: "exec-abc123def456".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_exec_create_failure() {
        let mock = MockProvider::new();
        *mock.exec_create_error.lock().unwrap() =
            Some(ProviderError::ContainerNotFound("abc123def456".to_string()));

        match execute(
            &mock,
            Command::Exec {
                session: 1,
                container: id(),
                argv: vec!["true".to_string()],
            },
        )
        .await
        {
            Message::ExecFinished { result: Err(e), .. } => {
                assert!(e.starts_with("failed to create exec:"))
            }
            other => panic!("unexpected message: {other:?}"),
        }
        assert!(!mock
            .get_calls()
            .iter()
            .any(|c| matches!(c, MockCall::ExecAttach { .. })));
    }

    #[tokio::test]
    async fn test_status_clear_timer() {
        let mock = MockProvider::new();
        let msg = execute(
            &mock,
            Command::ScheduleStatusClear {
                generation: 9,
                after: Duration::from_millis(1),
            },
        )
        .await;
        assert_eq!(msg, Message::ClearStatus { generation: 9 });
    }

    #[tokio::test]
    async fn test_dispatch_sends_one_message_per_command() {
        let mock = Arc::new(MockProvider::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let worker = Worker::new(mock, tx);

        worker.dispatch(vec![
            Command::ScheduleTick {
                after: Duration::from_millis(1),
            },
            Command::LoadSnapshot {
                seq: 1,
                manual: false,
            },
        ]);

        let mut received = vec![rx.recv().await.unwrap(), rx.recv().await.unwrap()];
        received.sort_by_key(|m| matches!(m, Message::Tick));
        assert!(matches!(received[0], Message::SnapshotLoaded { seq: 1, .. }));
        assert_eq!(received[1], Message::Tick);
    }
}
