//! Live conversion session: the state machine behind an editor pane.
//!
//! `idle → typing → converting → done | error`, and back to `idle` when the
//! input is cleared. Each input change bumps a generation counter; a cycle
//! only publishes while its generation is still the latest, so a slow
//! conversion of old input can never overwrite the result of newer input.

use crate::config::PipelineConfig;
use crate::error::ConvertError;
use crate::pipeline::{run_pipeline, ConversionResult, Status};
use crate::tailwind::Converter;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{trace, warn};

/// Everything a UI observes about a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub input: String,
    pub output: String,
    pub status: Status,
    pub error: Option<String>,
    pub unsupported_props: Vec<String>,
}

pub struct ConversionSession<C: Converter> {
    converter: Arc<C>,
    config: Arc<PipelineConfig>,
    state: Arc<watch::Sender<SessionState>>,
    generation: Arc<AtomicU64>,
    runtime: Option<Handle>,
}

impl<C: Converter> ConversionSession<C> {
    /// Creates a session bound to the current Tokio runtime, if there is one.
    /// Without a runtime, conversion cycles run on whichever runtime
    /// `set_input` is later called from.
    pub fn new(converter: C, config: PipelineConfig) -> Self {
        Self::build(converter, config, Handle::try_current().ok())
    }

    /// Creates a session whose conversion cycles always run on `runtime`, so
    /// `set_input` can be called from synchronous code.
    pub fn with_runtime(converter: C, config: PipelineConfig, runtime: Handle) -> Self {
        Self::build(converter, config, Some(runtime))
    }

    fn build(converter: C, config: PipelineConfig, runtime: Option<Handle>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            converter: Arc::new(converter),
            config: Arc::new(config),
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
            runtime,
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Feeds new input.
    ///
    /// Blank input resets to idle immediately; anything else publishes
    /// `typing` and schedules a conversion cycle. With no runtime to schedule
    /// on, the session settles to `error` instead.
    pub fn set_input(&self, css: impl Into<String>) {
        let css = css.into();

        if css.trim().is_empty() {
            self.state.send_modify(|state| {
                self.generation.fetch_add(1, Ordering::SeqCst);
                *state = SessionState {
                    input: css,
                    ..SessionState::default()
                };
            });
            return;
        }

        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.input = css.clone();
            state.status = Status::Typing;
            state.error = None;
        });

        let Some(runtime) = self.runtime.clone().or_else(|| Handle::try_current().ok()) else {
            let err = ConvertError::Config("no Tokio runtime to run conversions on".to_string());
            warn!(error = %err, "cannot schedule conversion");
            publish_if_current(&self.state, &self.generation, generation, |state| {
                apply_result(state, ConversionResult::failed(&err));
            });
            return;
        };

        let converter = Arc::clone(&self.converter);
        let config = Arc::clone(&self.config);
        let state = Arc::clone(&self.state);
        let latest = Arc::clone(&self.generation);

        runtime.spawn(async move {
            let debounce = config.debounce();
            if debounce.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(debounce).await;
            }

            let started = publish_if_current(&state, &latest, generation, |state| {
                state.status = Status::Converting;
            });
            if !started {
                trace!(generation, "input superseded before conversion started");
                return;
            }

            // a panicking converter takes down only its own task
            let cycle = tokio::spawn(async move { run_pipeline(&*converter, &css, &config).await });
            let result = match cycle.await {
                Ok(result) => result,
                Err(err) => {
                    warn!(generation, error = %err, "converter task failed");
                    ConversionResult::failed(&ConvertError::Transport(err.to_string()))
                }
            };

            let published = publish_if_current(&state, &latest, generation, |state| {
                apply_result(state, result);
            });
            if !published {
                trace!(generation, "discarding stale conversion result");
            }
        });
    }

    /// Clears everything back to the initial state and drops any in-flight cycle.
    pub fn reset(&self) {
        self.state.send_modify(|state| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            *state = SessionState::default();
        });
    }

    /// Waits until the latest input has finished converting (or was cleared).
    pub async fn wait_settled(&self) -> SessionState {
        let mut rx = self.subscribe();
        // the `Ref` from `wait_for` must be dropped before `rx`
        let settled = match rx.wait_for(|state| state.status.is_settled()).await {
            Ok(state) => (*state).clone(),
            // the sender lives in `self`, so this is unreachable in practice
            Err(_) => self.state(),
        };
        settled
    }
}

fn apply_result(state: &mut SessionState, result: ConversionResult) {
    state.output = result.output;
    state.unsupported_props = result.unsupported_props;
    state.status = result.status;
    state.error = result.error;
}

/// Applies `update` only if `generation` is still the newest. The check runs
/// under the channel's write lock, the same lock `set_input` bumps under.
fn publish_if_current(
    state: &watch::Sender<SessionState>,
    latest: &AtomicU64,
    generation: u64,
    update: impl FnOnce(&mut SessionState),
) -> bool {
    state.send_if_modified(|current| {
        if latest.load(Ordering::SeqCst) != generation {
            return false;
        }
        update(current);
        true
    })
}
