// src/panel.rs
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::errors::{Result, WaznError};
use crate::models::AnalysisRequest;
use crate::render::{self, View};
use crate::service::AnalysisService;

pub const ANALYZE_LABEL: &str = "تحليل";
pub const WORKING_LABEL: &str = "جارٍ التحليل...";

/// The analyze button.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct TriggerControl {
    pub enabled: bool,
    pub label: String,
}

impl TriggerControl {
    fn ready() -> Self {
        Self {
            enabled: true,
            label: ANALYZE_LABEL.to_string(),
        }
    }

    fn working() -> Self {
        Self {
            enabled: false,
            label: WORKING_LABEL.to_string(),
        }
    }

    /// Enabled with its default label.
    pub fn is_ready(&self) -> bool {
        *self == Self::ready()
    }
}

/// The result region: hidden and empty until something is rendered.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct ResultPanel {
    pub visible: bool,
    pub view: Option<View>,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Focus {
    Input,
    Trigger,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Validating,
    Submitting,
}

#[derive(Debug)]
struct PanelState {
    input: String,
    result: ResultPanel,
    trigger: TriggerControl,
    focus: Focus,
    phase: Phase,
    in_flight: bool,
}

impl PanelState {
    fn show(&mut self, view: View) {
        self.result = ResultPanel {
            visible: true,
            view: Some(view),
        };
    }
}

/// The analysis form: an input line, an analyze trigger, a clear action and
/// a result panel, all owned here instead of living in a document.
///
/// State sits behind a mutex that is never held across the network await,
/// so the panel can be shared by reference between concurrent callers. At
/// most one submission is in flight at a time.
pub struct AnalyzerPanel<S> {
    service: S,
    state: Mutex<PanelState>,
}

impl<S: AnalysisService> AnalyzerPanel<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: Mutex::new(PanelState {
                input: String::new(),
                result: ResultPanel::default(),
                trigger: TriggerControl::ready(),
                focus: Focus::Input,
                phase: Phase::Idle,
                in_flight: false,
            }),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn set_input(&self, text: &str) {
        let mut state = self.lock();
        state.input = text.to_string();
        state.focus = Focus::Input;
    }

    pub fn input(&self) -> String {
        self.lock().input.clone()
    }

    pub fn result(&self) -> ResultPanel {
        self.lock().result.clone()
    }

    pub fn trigger(&self) -> TriggerControl {
        self.lock().trigger.clone()
    }

    pub fn focus(&self) -> Focus {
        self.lock().focus
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    pub fn is_in_flight(&self) -> bool {
        self.lock().in_flight
    }

    /// Handles a press of the analyze trigger.
    ///
    /// Blank input renders the validation message without touching the
    /// network. Otherwise the trigger is disabled for the round trip and the
    /// outcome (service error, unmatched, matched or connection error)
    /// replaces the panel content. The trigger is restored on every exit,
    /// including when this future is dropped before completion.
    ///
    /// Fails only with `SubmissionInFlight` when another press is still
    /// being served; in that case nothing changes.
    pub async fn analyze(&self) -> Result<View> {
        let request = {
            let mut state = self.lock();
            if state.in_flight {
                log::warn!("Ignoring analyze request: a submission is already in flight");
                return Err(WaznError::SubmissionInFlight);
            }

            state.phase = Phase::Validating;
            match AnalysisRequest::new(&state.input) {
                Ok(request) => {
                    state.in_flight = true;
                    state.phase = Phase::Submitting;
                    state.trigger = TriggerControl::working();
                    state.focus = Focus::Trigger;
                    request
                }
                Err(_) => {
                    let view = render::validation_view();
                    state.show(view.clone());
                    state.phase = Phase::Idle;
                    return Ok(view);
                }
            }
        };

        let guard = InFlightGuard { state: &self.state };

        log::debug!("Submitting line for analysis: {}", request.text());
        let view = match self.service.analyze(&request).await {
            Ok(response) => render::render(&response),
            Err(e) => {
                log::warn!("Analysis request failed: {}", e);
                render::render_transport_error(&e)
            }
        };

        guard.finish(view.clone());
        Ok(view)
    }

    /// Empties the input, hides the result panel and focuses the input.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.input.clear();
        state.result = ResultPanel::default();
        state.focus = Focus::Input;
    }

    fn lock(&self) -> MutexGuard<'_, PanelState> {
        lock_state(&self.state)
    }
}

fn lock_state(state: &Mutex<PanelState>) -> MutexGuard<'_, PanelState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Restores the trigger and clears the in-flight flag when dropped.
struct InFlightGuard<'a> {
    state: &'a Mutex<PanelState>,
}

impl InFlightGuard<'_> {
    fn finish(self, view: View) {
        lock_state(self.state).show(view);
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut state = lock_state(self.state);
        state.in_flight = false;
        state.phase = Phase::Idle;
        state.trigger = TriggerControl::ready();
    }
}
