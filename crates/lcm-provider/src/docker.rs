//! Docker-API provider implementation using bollard
//!
//! Every runtime lcm knows about (Docker Desktop, Rancher, Colima, OrbStack,
//! Podman, Lima) speaks the Docker Engine API, so one client covers them all.

use crate::{
    ContainerId, ContainerProvider, ContainerSummary, ExecHandle, PortMapping, ProviderError,
    Result,
};
use async_trait::async_trait;
use bollard::container::{
    InspectContainerOptions, ListContainersOptions, LogOutput, LogsOptions,
    RemoveContainerOptions, RestartContainerOptions, StartContainerOptions,
    StopContainerOptions,
};
use bollard::exec::{CreateExecOptions, StartExecOptions, StartExecResults};
use bollard::Docker;
use futures::{Stream, StreamExt};

/// Client timeout in seconds for individual API requests
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Provider backed by a bollard Docker client
pub struct DockerProvider {
    client: Docker,
}

impl DockerProvider {
    /// Open a client for the given address without contacting the daemon.
    ///
    /// Accepts `unix://` URLs, bare socket paths and `tcp://`/`http(s)://` URLs.
    pub fn connect(address: &str) -> Result<Self> {
        let client = if address.starts_with("unix://") || address.starts_with('/') {
            let path = address.trim_start_matches("unix://");
            Docker::connect_with_socket(path, REQUEST_TIMEOUT_SECS, bollard::API_DEFAULT_VERSION)
                .map_err(|e| ProviderError::ConnectionError(e.to_string()))?
        } else if address.starts_with("tcp://")
            || address.starts_with("http://")
            || address.starts_with("https://")
        {
            Docker::connect_with_http(address, REQUEST_TIMEOUT_SECS, bollard::API_DEFAULT_VERSION)
                .map_err(|e| ProviderError::ConnectionError(e.to_string()))?
        } else {
            return Err(ProviderError::ConnectionError(format!(
                "unsupported daemon address: {}",
                address
            )));
        };

        Ok(Self { client })
    }
}

#[async_trait]
impl ContainerProvider for DockerProvider {
    async fn ping(&self) -> Result<()> {
        self.client
            .ping()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;
        Ok(())
    }

    async fn list(&self, all: bool) -> Result<Vec<ContainerSummary>> {
        let options = ListContainersOptions::<String> {
            all,
            ..Default::default()
        };

        let containers = self.client.list_containers(Some(options)).await?;

        Ok(containers
            .into_iter()
            .map(|c| ContainerSummary {
                id: ContainerId::new(c.id.unwrap_or_default()),
                names: c.names.unwrap_or_default(),
                image: c.image.unwrap_or_default(),
                status: c.status.unwrap_or_default(),
                state: c.state.unwrap_or_default(),
                ports: c
                    .ports
                    .unwrap_or_default()
                    .into_iter()
                    .map(|p| {
                        let protocol = p
                            .typ
                            .map(|t| t.to_string())
                            .filter(|t| !t.is_empty())
                            .unwrap_or_else(|| "tcp".to_string());
                        PortMapping::new(p.private_port, p.public_port, protocol)
                    })
                    .collect(),
            })
            .collect())
    }

    async fn start(&self, id: &ContainerId) -> Result<()> {
        self.client
            .start_container(&id.0, None::<StartContainerOptions<String>>)
            .await?;
        Ok(())
    }

    async fn stop(&self, id: &ContainerId, timeout_secs: u32) -> Result<()> {
        let options = StopContainerOptions {
            t: timeout_secs as i64,
        };
        self.client.stop_container(&id.0, Some(options)).await?;
        Ok(())
    }

    async fn restart(&self, id: &ContainerId, timeout_secs: u32) -> Result<()> {
        let options = RestartContainerOptions {
            t: timeout_secs as isize,
        };
        self.client.restart_container(&id.0, Some(options)).await?;
        Ok(())
    }

    async fn remove(&self, id: &ContainerId, force: bool) -> Result<()> {
        let options = RemoveContainerOptions {
            force,
            ..Default::default()
        };
        self.client.remove_container(&id.0, Some(options)).await?;
        Ok(())
    }

    async fn inspect(&self, id: &ContainerId) -> Result<serde_json::Value> {
        let info = self
            .client
            .inspect_container(&id.0, None::<InspectContainerOptions>)
            .await?;
        serde_json::to_value(info).map_err(|e| ProviderError::RuntimeError(e.to_string()))
    }

    async fn logs(&self, id: &ContainerId, tail: usize) -> Result<String> {
        let options = LogsOptions::<String> {
            stdout: true,
            stderr: true,
            tail: tail.to_string(),
            ..Default::default()
        };

        collect_output(self.client.logs(&id.0, Some(options))).await
    }

    async fn exec_create(&self, id: &ContainerId, argv: &[String]) -> Result<ExecHandle> {
        let options = CreateExecOptions {
            cmd: Some(argv.to_vec()),
            attach_stdout: Some(true),
            attach_stderr: Some(true),
            ..Default::default()
        };

        let exec = self.client.create_exec(&id.0, options).await?;
        Ok(ExecHandle {
            id: exec.id,
            container: id.clone(),
        })
    }

    async fn exec_attach(&self, handle: &ExecHandle) -> Result<String> {
        let start_options = StartExecOptions {
            detach: false,
            ..Default::default()
        };

        match self.client.start_exec(&handle.id, Some(start_options)).await? {
            StartExecResults::Attached { output, .. } => collect_output(output).await,
            StartExecResults::Detached => Err(ProviderError::ExecError(
                "Exec started in detached mode".to_string(),
            )),
        }
    }
}

/// Drain a multiplexed output stream into one string (stdout and stderr interleaved)
async fn collect_output<S>(stream: S) -> Result<String>
where
    S: Stream<Item = std::result::Result<LogOutput, bollard::errors::Error>>,
{
    let mut stream = std::pin::pin!(stream);
    let mut bytes = Vec::new();
    while let Some(chunk) = stream.next().await {
        match chunk? {
            LogOutput::StdOut { message }
            | LogOutput::StdErr { message }
            | LogOutput::Console { message } => bytes.extend_from_slice(&message),
            LogOutput::StdIn { .. } => {}
        }
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_rejects_unknown_scheme() {
        let err = DockerProvider::connect("ssh://example").err();
        assert!(matches!(err, Some(ProviderError::ConnectionError(_))));
    }
}
