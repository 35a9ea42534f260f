//! The poll loop.
//!
//! A [`PollScheduler`] owns everything one page needs to stay in sync with
//! the backend: the registry, the codec, the reconciler, the log tailer, a
//! transport and the surface it writes to.
//!
//! Each tick fans out one status request per tracked process. Responses are
//! reconciled in completion order, each one fully (status text, controls,
//! console) before the next. The next tick is scheduled only after every
//! request of the current one has settled, so requests never pile up behind
//! a slow backend.

pub mod state;

use crate::codec::StatusCodec;
use crate::config::error::{ConfigError, ConfigResult};
use crate::config::models::PageConfig;
use crate::reconciler::UiReconciler;
use crate::registry::ProcessRegistry;
use crate::surface::UiSurface;
use crate::tailer::LogTailer;
use crate::transport::Transport;
use futures::stream::{FuturesUnordered, StreamExt};
use pw_protocol::Op;
use state::{DescriptorState, PollPhase};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::sync::{mpsc::UnboundedReceiver, watch};
use tracing::{debug, info, warn};

/// Drives the periodic status poll of every registered process.
pub struct PollScheduler<T: Transport, S: UiSurface> {
    registry: ProcessRegistry,
    codec: StatusCodec,
    reconciler: UiReconciler,
    tailer: LogTailer,
    transport: T,
    surface: S,
    csrf_token: String,
    interval: Duration,
    states: HashMap<String, DescriptorState>,
    tick: u64,
    ticks_tx: watch::Sender<u64>,
}

enum Wake {
    Timer,
    PollNow,
    Stop,
}

impl<T: Transport, S: UiSurface> PollScheduler<T, S> {
    /// Build a scheduler from a validated page configuration.
    ///
    /// # Errors
    ///
    /// - `MissingEndpoint` / `MissingCsrfToken` if the page did not supply
    ///   what polling needs
    /// - `InvalidUrl`, `DuplicateProcess`, `InvalidConfig` for malformed input
    pub fn from_config(config: &PageConfig, transport: T, surface: S) -> ConfigResult<Self> {
        config.validate()?;

        let registry = ProcessRegistry::from_config(config)?;
        if registry.is_empty() {
            return Err(ConfigError::MissingEndpoint);
        }
        let csrf_token = config
            .csrf_token()
            .ok_or(ConfigError::MissingCsrfToken)?
            .to_string();
        let tailer = LogTailer::from_config(config)?;
        let interval = registry.longest_interval(config.poll_interval());

        let states = registry
            .iter()
            .map(|d| (d.id.clone(), DescriptorState::default()))
            .collect();
        let (ticks_tx, _) = watch::channel(0);

        Ok(Self {
            registry,
            codec: StatusCodec::new(config.dialect),
            reconciler: UiReconciler::new(config.rerun_after_done),
            tailer,
            transport,
            surface,
            csrf_token,
            interval,
            states,
            tick: 0,
            ticks_tx,
        })
    }

    /// Build a scheduler, or log why polling is disabled.
    ///
    /// The page stays usable without polling, so a configuration problem is
    /// reported once as a warning instead of an error.
    pub fn try_start(config: &PageConfig, transport: T, surface: S) -> Option<Self> {
        match Self::from_config(config, transport, surface) {
            Ok(scheduler) => Some(scheduler),
            Err(error) => {
                warn!(%error, "Automatic status checking is disabled");
                None
            }
        }
    }

    pub fn registry(&self) -> &ProcessRegistry {
        &self.registry
    }

    /// Delay between the end of one tick and the start of the next.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn tailer(&self) -> &LogTailer {
        &self.tailer
    }

    /// Current poll phase of `process_id`.
    pub fn state_of(&self, process_id: &str) -> Option<PollPhase> {
        self.states.get(process_id).map(|s| s.phase)
    }

    pub fn descriptor_state(&self, process_id: &str) -> Option<&DescriptorState> {
        self.states.get(process_id)
    }

    /// Number of ticks completed so far.
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    /// Watch the completed-tick counter.
    pub fn subscribe_ticks(&self) -> watch::Receiver<u64> {
        self.ticks_tx.subscribe()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Poll every process once and apply the results.
    ///
    /// Returns once every request has settled.
    ///
    /// # Returns
    ///
    /// The number of the completed tick, starting at 1.
    pub async fn tick(&mut self) -> u64 {
        let Self {
            registry,
            codec,
            reconciler,
            tailer,
            transport,
            surface,
            csrf_token,
            states,
            ..
        } = self;
        let registry: &ProcessRegistry = registry;
        let transport: &T = transport;
        let csrf_token = csrf_token.as_str();

        let mut pending = FuturesUnordered::new();
        for descriptor in registry.iter() {
            let stamp = state::begin_request(states.entry(descriptor.id.clone()).or_default());
            pending.push(async move {
                let result = transport.fetch_status(&descriptor.status_url, csrf_token).await;
                (descriptor, stamp, result)
            });
        }

        while let Some((descriptor, stamp, result)) = pending.next().await {
            let state = states.entry(descriptor.id.clone()).or_default();

            let response = match result {
                Ok(response) => response,
                Err(error) => {
                    state::record_failure(state, &descriptor.id, &error);
                    tailer
                        .refresh_if_not_loaded(descriptor, transport, surface)
                        .await;
                    continue;
                }
            };

            if !state::begin_reconcile(state, stamp) {
                debug!(process_id = %descriptor.id, stamp, "Dropping stale response");
                continue;
            }

            let status = codec.decode(response.status);
            let message = StatusCodec::message_for(status, response.server_message());
            state::record_status(state, &descriptor.id, status);

            reconciler.reconcile(descriptor, status, &message, surface);
            tailer
                .refresh_if_needed(descriptor, status, &response, transport, surface)
                .await;

            state::finish(state);
        }
        drop(pending);

        self.tick += 1;
        self.surface.tick_completed(self.tick);
        self.ticks_tx.send_replace(self.tick);
        self.tick
    }

    /// Poll until `shutdown` resolves, `Op::Shutdown` arrives or the op
    /// channel closes.
    ///
    /// # Arguments
    ///
    /// * `ops` - Requests from the front-end; `None` when there is none
    /// * `shutdown` - Resolves when the page goes away
    pub async fn run<F>(&mut self, mut ops: Option<UnboundedReceiver<Op>>, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        info!(
            processes = self.registry.len(),
            interval_ms = self.interval.as_millis() as u64,
            "Status polling started"
        );

        loop {
            if self.tick_until_stopped(&mut ops, shutdown.as_mut()).await {
                break;
            }

            let wake = tokio::select! {
                _ = &mut shutdown => Wake::Stop,
                _ = tokio::time::sleep(self.interval) => Wake::Timer,
                op = next_op(&mut ops) => match op {
                    Some(Op::PollNow) => Wake::PollNow,
                    Some(Op::Shutdown) | None => Wake::Stop,
                },
            };

            match wake {
                Wake::Timer => {}
                Wake::PollNow => debug!("Poll requested"),
                Wake::Stop => break,
            }
        }

        info!(ticks = self.tick, "Status polling stopped");
    }

    /// Run one tick, abandoning it when a stop is requested meanwhile.
    ///
    /// Returns `true` if the loop should stop. A `PollNow` that arrives
    /// mid-tick is satisfied by the tick already running.
    async fn tick_until_stopped<F>(
        &mut self,
        ops: &mut Option<UnboundedReceiver<Op>>,
        mut shutdown: Pin<&mut F>,
    ) -> bool
    where
        F: Future<Output = ()>,
    {
        let tick = self.tick();
        tokio::pin!(tick);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => return true,
                _ = &mut tick => return false,
                op = next_op(ops) => match op {
                    Some(Op::PollNow) => debug!("Poll requested while a tick is running"),
                    Some(Op::Shutdown) | None => {
                        info!("Stop requested, abandoning the running tick");
                        return true;
                    }
                },
            }
        }
    }
}

/// Next op from the front-end; never resolves without a channel.
async fn next_op(ops: &mut Option<UnboundedReceiver<Op>>) -> Option<Op> {
    match ops {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
