use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use console_logging::{console_debug, console_info, console_warn};
use tokio::sync::mpsc as async_mpsc;
use tokio::task::JoinHandle;

use crate::client::{ClientSettings, ReqwestRegistryClient};
use crate::models::TaskQuery;
use crate::poll::PollTimer;
use crate::{EngineError, EngineEvent, ProjectService, ReplicationService, RequestId};

/// What the engine needs from the registry to drive a panel.
pub trait RegistryApi: ReplicationService + ProjectService {}

impl<T: ReplicationService + ProjectService> RegistryApi for T {}

enum EngineCommand {
    FetchExecution {
        request_id: RequestId,
        execution_id: i64,
    },
    FetchTasks {
        request_id: RequestId,
        execution_id: i64,
        query: TaskQuery,
    },
    StopExecution {
        execution_id: i64,
    },
    StartPolling {
        execution_id: i64,
        interval: Duration,
    },
    CancelPolling,
    LookupProjects {
        query: String,
    },
    Shutdown,
}

/// Runs registry calls on a dedicated single-threaded runtime and hands the
/// results back as [`EngineEvent`]s.
pub struct EngineHandle {
    cmd_tx: async_mpsc::UnboundedSender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    thread: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        let client = ReqwestRegistryClient::new(settings)?;
        Self::with_client(Arc::new(client))
    }

    pub fn with_client(client: Arc<dyn RegistryApi>) -> Result<Self, EngineError> {
        let (cmd_tx, mut cmd_rx) = async_mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(EngineError::Runtime)?;

        let thread = thread::Builder::new()
            .name("console-engine".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    let mut worker = Worker::new(client, event_tx);
                    while let Some(command) = cmd_rx.recv().await {
                        if !worker.handle(command) {
                            break;
                        }
                    }
                    worker.shutdown();
                });
            })
            .map_err(EngineError::Thread)?;

        Ok(Self {
            cmd_tx,
            event_rx,
            thread: Some(thread),
        })
    }

    pub fn fetch_execution(&self, request_id: RequestId, execution_id: i64) {
        self.send(EngineCommand::FetchExecution {
            request_id,
            execution_id,
        });
    }

    /// Fetches a task page. A fetch still in flight is abandoned.
    pub fn fetch_tasks(&self, request_id: RequestId, execution_id: i64, query: TaskQuery) {
        self.send(EngineCommand::FetchTasks {
            request_id,
            execution_id,
            query,
        });
    }

    pub fn stop_execution(&self, execution_id: i64) {
        self.send(EngineCommand::StopExecution { execution_id });
    }

    pub fn start_polling(&self, execution_id: i64, interval: Duration) {
        self.send(EngineCommand::StartPolling {
            execution_id,
            interval,
        });
    }

    pub fn cancel_polling(&self) {
        self.send(EngineCommand::CancelPolling);
    }

    pub fn lookup_projects(&self, query: impl Into<String>) {
        self.send(EngineCommand::LookupProjects {
            query: query.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Stops the timer, abandons in-flight calls and joins the engine thread.
    pub fn shutdown(&mut self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                console_warn!("Engine thread panicked during shutdown");
            }
        }
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            console_warn!("Engine is not running; command dropped");
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct Worker {
    client: Arc<dyn RegistryApi>,
    events: mpsc::Sender<EngineEvent>,
    tasks_in_flight: Option<JoinHandle<()>>,
    poll: Option<PollTimer>,
}

impl Worker {
    fn new(client: Arc<dyn RegistryApi>, events: mpsc::Sender<EngineEvent>) -> Self {
        Self {
            client,
            events,
            tasks_in_flight: None,
            poll: None,
        }
    }

    fn handle(&mut self, command: EngineCommand) -> bool {
        match command {
            EngineCommand::FetchExecution {
                request_id,
                execution_id,
            } => {
                let client = self.client.clone();
                let events = self.events.clone();
                tokio::spawn(async move {
                    let result = client.get_execution(execution_id).await;
                    let _ = events.send(EngineEvent::ExecutionFetched { request_id, result });
                });
            }
            EngineCommand::FetchTasks {
                request_id,
                execution_id,
                query,
            } => {
                if let Some(previous) = self.tasks_in_flight.take() {
                    if !previous.is_finished() {
                        console_debug!("Abandoning superseded task fetch before request {}", request_id);
                    }
                    previous.abort();
                }
                let client = self.client.clone();
                let events = self.events.clone();
                self.tasks_in_flight = Some(tokio::spawn(async move {
                    let result = client.list_tasks(execution_id, &query).await;
                    let _ = events.send(EngineEvent::TasksFetched { request_id, result });
                }));
            }
            EngineCommand::StopExecution { execution_id } => {
                let client = self.client.clone();
                let events = self.events.clone();
                tokio::spawn(async move {
                    let result = client.stop_execution(execution_id).await;
                    let _ = events.send(EngineEvent::ExecutionStopped {
                        execution_id,
                        result,
                    });
                });
            }
            EngineCommand::StartPolling {
                execution_id,
                interval,
            } => {
                if !self.poll.as_ref().is_some_and(PollTimer::is_running) {
                    self.poll = Some(PollTimer::new(interval));
                }
                let timer = self.poll.get_or_insert_with(|| PollTimer::new(interval));
                let events = self.events.clone();
                let started = timer
                    .start(move || events.send(EngineEvent::PollTick { execution_id }).is_ok());
                if started {
                    console_info!(
                        "Polling execution {} every {:?}",
                        execution_id,
                        timer.interval()
                    );
                } else {
                    console_debug!("Poll timer already running; start ignored");
                }
            }
            EngineCommand::CancelPolling => {
                if self.poll.as_mut().is_some_and(PollTimer::stop) {
                    console_info!("Poll timer cancelled");
                }
            }
            EngineCommand::LookupProjects { query } => {
                let client = self.client.clone();
                let events = self.events.clone();
                tokio::spawn(async move {
                    let result = client.list_projects(&query).await;
                    let _ = events.send(EngineEvent::ProjectsFetched { query, result });
                });
            }
            EngineCommand::Shutdown => return false,
        }
        true
    }

    fn shutdown(&mut self) {
        if let Some(mut timer) = self.poll.take() {
            timer.stop();
        }
        if let Some(in_flight) = self.tasks_in_flight.take() {
            in_flight.abort();
        }
    }
}
