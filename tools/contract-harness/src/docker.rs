//! Docker orchestration for the contract harness.
//!
//! One PostgreSQL container per run, labeled `ladle.role=contract-test` so
//! stale leftovers from crashed runs can be swept before the next session.

use std::collections::HashMap;
use std::net::TcpStream;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use bollard::Docker;
use bollard::models::{ContainerCreateBody, HostConfig, PortBinding};
use bollard::query_parameters::{
    CreateContainerOptionsBuilder, CreateImageOptionsBuilder, ListContainersOptionsBuilder,
    RemoveContainerOptionsBuilder, StartContainerOptionsBuilder, StopContainerOptionsBuilder,
};
use futures::TryStreamExt;

const TEST_LABEL_KEY: &str = "ladle.role";
const TEST_LABEL_VALUE: &str = "contract-test";

const POSTGRES_PORT: &str = "5432/tcp";
const TEST_DB_NAME: &str = "ladle_test";
const TEST_DB_USER: &str = "postgres";
const TEST_DB_PASSWORD: &str = "postgres";

/// Owns the containers created for one harness run.
pub struct DockerOrchestrator {
    client: Docker,
    /// IP/hostname to reach containers from the test machine.
    pub host: String,
    test_container_ids: Vec<String>,
}

impl DockerOrchestrator {
    /// Connect to the Docker daemon described by `docker_host`.
    ///
    /// - `unix://...` → Unix socket (local)
    /// - `tcp://HOST:PORT` → unencrypted HTTP to `HOST:PORT`
    ///
    /// Sets `self.host` to the address used to reach containers.
    pub async fn connect(docker_host: &str) -> Result<Self> {
        let (client, host) = if docker_host.starts_with("unix://") {
            let client = Docker::connect_with_local_defaults()
                .context("failed to connect to local Docker socket")?;
            (client, "127.0.0.1".to_owned())
        } else if let Some(rest) = docker_host.strip_prefix("tcp://") {
            let host = docker_host_from_url(docker_host);
            let client = Docker::connect_with_http(rest, 120, bollard::API_DEFAULT_VERSION)
                .context("failed to connect to remote Docker daemon")?;
            (client, host)
        } else {
            let client =
                Docker::connect_with_defaults().context("failed to connect to Docker daemon")?;
            (client, "127.0.0.1".to_owned())
        };

        client
            .ping()
            .await
            .context("Docker daemon did not respond to ping")?;

        Ok(Self {
            client,
            host,
            test_container_ids: Vec::new(),
        })
    }

    /// Sweep containers labeled `ladle.role=contract-test` that are no longer
    /// running (exited, dead, or created-but-never-started). Running ones are
    /// left alone — they may belong to a concurrent session on another lock.
    pub async fn cleanup_stale(&self) -> Result<()> {
        let mut filters = HashMap::new();
        filters.insert(
            "label".to_owned(),
            vec![format!("{TEST_LABEL_KEY}={TEST_LABEL_VALUE}")],
        );
        filters.insert(
            "status".to_owned(),
            vec!["exited".to_owned(), "dead".to_owned(), "created".to_owned()],
        );

        let options = ListContainersOptionsBuilder::new()
            .all(true)
            .filters(&filters)
            .build();

        let stale = self.client.list_containers(Some(options)).await?;
        for container in stale {
            if let Some(id) = container.id {
                // best-effort; a failed sweep never blocks the run
                self.client
                    .remove_container(
                        &id,
                        Some(RemoveContainerOptionsBuilder::new().force(true).build()),
                    )
                    .await
                    .ok();
            }
        }

        Ok(())
    }

    /// Start a PostgreSQL container from `image` on a random host port and
    /// wait until it accepts connections.
    ///
    /// Returns the `DATABASE_URL` of the `ladle_test` database inside it.
    pub async fn start_postgres(&mut self, image: &str) -> Result<String> {
        let id = self
            .create_and_start(
                image,
                &[
                    ("POSTGRES_USER", TEST_DB_USER),
                    ("POSTGRES_PASSWORD", TEST_DB_PASSWORD),
                    ("POSTGRES_DB", TEST_DB_NAME),
                ],
                POSTGRES_PORT,
            )
            .await?;

        let port = self.mapped_port(&id, POSTGRES_PORT).await?;
        wait_port_open(&self.host, port, 30).await?;

        Ok(format!(
            "postgres://{TEST_DB_USER}:{TEST_DB_PASSWORD}@{}:{}/{TEST_DB_NAME}",
            self.host, port
        ))
    }

    /// Stop and remove every container this orchestrator started.
    ///
    /// Always call this — success or failure. Errors are best-effort; call
    /// `.ok()` at the call site.
    pub async fn cleanup(&mut self) -> Result<()> {
        for id in self.test_container_ids.drain(..) {
            let _ = self
                .client
                .stop_container(&id, Some(StopContainerOptionsBuilder::new().t(5).build()))
                .await;
            let _ = self
                .client
                .remove_container(
                    &id,
                    Some(RemoveContainerOptionsBuilder::new().force(true).build()),
                )
                .await;
        }
        Ok(())
    }

    /// Pull `image` if missing, then create and start a labeled container with
    /// `container_port` published on a random loopback port.
    ///
    /// The container is named `ladle-contract-<pid>` so it is easy to spot in
    /// `docker ps`; the harness lock guarantees one run per workspace.
    async fn create_and_start(
        &mut self,
        image: &str,
        env: &[(&str, &str)],
        container_port: &str,
    ) -> Result<String> {
        self.client
            .create_image(
                Some(CreateImageOptionsBuilder::new().from_image(image).build()),
                None,
                None,
            )
            .try_collect::<Vec<_>>()
            .await
            .with_context(|| format!("failed to pull {image}"))?;

        let mut labels = HashMap::new();
        labels.insert(TEST_LABEL_KEY.to_owned(), TEST_LABEL_VALUE.to_owned());

        let mut port_bindings = HashMap::new();
        port_bindings.insert(
            container_port.to_owned(),
            Some(vec![PortBinding {
                host_ip: Some("127.0.0.1".to_owned()),
                host_port: Some(String::new()), // "" = random port
            }]),
        );

        let config = ContainerCreateBody {
            image: Some(image.to_owned()),
            env: Some(
                env.iter()
                    .map(|(key, value)| format!("{key}={value}"))
                    .collect(),
            ),
            labels: Some(labels),
            exposed_ports: Some(vec![container_port.to_owned()]),
            host_config: Some(HostConfig {
                port_bindings: Some(port_bindings),
                ..Default::default()
            }),
            ..Default::default()
        };

        let name = format!("ladle-contract-{}", std::process::id());
        let id = self
            .client
            .create_container(
                Some(CreateContainerOptionsBuilder::new().name(&name).build()),
                config,
            )
            .await
            .with_context(|| format!("failed to create {image} container"))?
            .id;

        self.client
            .start_container(&id, Some(StartContainerOptionsBuilder::new().build()))
            .await
            .with_context(|| format!("failed to start {image} container"))?;

        self.test_container_ids.push(id.clone());
        Ok(id)
    }

    /// Inspect the container and return the host-side port mapped to `container_port`.
    async fn mapped_port(&self, container_id: &str, container_port: &str) -> Result<u16> {
        let info = self
            .client
            .inspect_container(container_id, None)
            .await
            .context("failed to inspect container")?;

        let port_str = info
            .network_settings
            .as_ref()
            .and_then(|n| n.ports.as_ref())
            .and_then(|ports| ports.get(container_port))
            .and_then(|bindings| bindings.as_ref())
            .and_then(|bindings| bindings.first())
            .and_then(|b| b.host_port.as_deref())
            .ok_or_else(|| anyhow!("no host port found for {container_port}"))?;

        port_str
            .parse()
            .with_context(|| format!("invalid port number: {port_str}"))
    }
}

/// Poll until `host:port` accepts a TCP connection or `timeout_secs` elapses.
/// The postgres entrypoint only opens TCP once init SQL has finished, so an
/// accepted connection means the final server is up.
async fn wait_port_open(host: &str, port: u16, timeout_secs: u64) -> Result<()> {
    let addr = format!("{host}:{port}");
    let deadline = Instant::now() + Duration::from_secs(timeout_secs);

    loop {
        if TcpStream::connect(&addr).is_ok() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(anyhow!(
                "timed out waiting for {addr} to accept connections"
            ));
        }
        tokio::time::sleep(Duration::from_millis(250)).await;
    }
}

/// Extract the addressable hostname from a Docker daemon URL.
///
/// - `unix://...`      → `"127.0.0.1"`
/// - `tcp://HOST:PORT` → `"HOST"`
/// - anything else     → `"127.0.0.1"`
fn docker_host_from_url(url: &str) -> String {
    if url.starts_with("unix://") {
        return "127.0.0.1".to_owned();
    }
    if let Some(rest) = url.strip_prefix("tcp://") {
        return rest
            .split_once(':')
            .map(|(host, _)| host.to_owned())
            .unwrap_or_else(|| rest.to_owned());
    }
    "127.0.0.1".to_owned()
}
