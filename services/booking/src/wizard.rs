//! Linear multi-step form flows
//!
//! A wizard walks a draft through a fixed table of steps. Every step carries a
//! predicate over the draft that must hold before the user may move past it,
//! and the last step ends in a single submission to the backend. Steps are
//! numbered from 1.

use std::fmt;
use std::future::Future;

use gateway::{Notifier, RequestResult};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Toast raised when the user tries to leave an incomplete step
pub const STEP_INCOMPLETE: &str = "Please complete this step";

/// Wizard errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WizardError {
    #[error("A wizard needs at least one step")]
    NoSteps,

    #[error("Step {step} ({name}) is incomplete")]
    StepIncomplete { step: usize, name: &'static str },

    #[error("Submission is only possible from step {total}, current step is {step}")]
    NotAtFinalStep { step: usize, total: usize },

    #[error("The wizard is already complete")]
    AlreadyComplete,

    /// The backend rejected the submission or could not be reached
    #[error("{message}")]
    Submission { message: String, status: u16 },
}

pub type WizardResult<T> = Result<T, WizardError>;

/// In-progress user input of a wizard
pub trait Draft: Clone {
    /// Values carried in from outside the flow, such as a link parameter
    type Prefill;

    fn apply_prefill(&mut self, prefill: Self::Prefill);
}

type Predicate<D> = Box<dyn Fn(&D) -> bool + Send + Sync>;

struct Step<D> {
    name: &'static str,
    ready: Predicate<D>,
}

/// Ordered steps of a wizard with the predicate guarding each one
pub struct StepTable<D> {
    steps: Vec<Step<D>>,
}

impl<D> StepTable<D> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a step that may be left once `ready` holds for the draft
    pub fn step<P>(mut self, name: &'static str, ready: P) -> Self
    where
        P: Fn(&D) -> bool + Send + Sync + 'static,
    {
        self.steps.push(Step {
            name,
            ready: Box::new(ready),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Name of the given step
    pub fn name(&self, step: usize) -> Option<&'static str> {
        self.get(step).map(|s| s.name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.steps.iter().map(|s| s.name)
    }

    /// Whether the predicate of `step` holds; unknown steps never do
    pub fn holds(&self, step: usize, draft: &D) -> bool {
        self.get(step).is_some_and(|s| (s.ready)(draft))
    }

    fn get(&self, step: usize) -> Option<&Step<D>> {
        self.steps.get(step.checked_sub(1)?)
    }
}

impl<D> Default for StepTable<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> fmt::Debug for StepTable<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Position of a wizard. `complete` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardState {
    pub current_step: usize,
    pub total_steps: usize,
    pub complete: bool,
}

impl WizardState {
    pub fn is_final_step(&self) -> bool {
        self.current_step == self.total_steps
    }
}

/// Transition rules of a wizard, free of any stored state
pub struct WizardController<D> {
    steps: StepTable<D>,
}

impl<D> fmt::Debug for WizardController<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardController")
            .field("steps", &self.steps)
            .finish()
    }
}

impl<D: Draft> WizardController<D> {
    pub fn new(steps: StepTable<D>) -> WizardResult<Self> {
        if steps.is_empty() {
            return Err(WizardError::NoSteps);
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &StepTable<D> {
        &self.steps
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    /// Start at step 1 with `defaults` overlaid by `prefill`
    pub fn initialize(&self, defaults: D, prefill: Option<D::Prefill>) -> (WizardState, D) {
        let mut draft = defaults;
        if let Some(prefill) = prefill {
            draft.apply_prefill(prefill);
        }

        let state = WizardState {
            current_step: 1,
            total_steps: self.total_steps(),
            complete: false,
        };
        (state, draft)
    }

    pub fn can_advance(&self, step: usize, draft: &D) -> bool {
        self.steps.holds(step, draft)
    }

    /// Move one step forward if the current step is satisfied.
    ///
    /// Returns the state unchanged on the last step, on a complete wizard or
    /// when the current step is not satisfied.
    pub fn advance(&self, state: WizardState, draft: &D) -> WizardState {
        if state.complete
            || state.current_step >= self.total_steps()
            || !self.can_advance(state.current_step, draft)
        {
            return state;
        }

        WizardState {
            current_step: state.current_step + 1,
            ..state
        }
    }

    /// Move one step back. Never validates.
    pub fn retreat(&self, state: WizardState) -> WizardState {
        if state.complete || state.current_step <= 1 {
            return state;
        }

        WizardState {
            current_step: state.current_step - 1,
            ..state
        }
    }

    /// First step whose predicate does not hold
    pub fn first_incomplete(&self, draft: &D) -> Option<usize> {
        (1..=self.total_steps()).find(|&step| !self.can_advance(step, draft))
    }

    /// Check that `state` and `draft` may be submitted
    pub fn check_submit(&self, state: WizardState, draft: &D) -> WizardResult<()> {
        if state.complete {
            return Err(WizardError::AlreadyComplete);
        }

        if !state.is_final_step() {
            return Err(WizardError::NotAtFinalStep {
                step: state.current_step,
                total: state.total_steps,
            });
        }

        if let Some(step) = self.first_incomplete(draft) {
            return Err(WizardError::StepIncomplete {
                step,
                name: self.steps.name(step).unwrap_or_default(),
            });
        }

        Ok(())
    }

    /// Hand the draft to `call` and mark the wizard complete on success.
    ///
    /// On failure the caller keeps its previous state; nothing here changes it.
    pub async fn submit<C, F, Fut>(
        &self,
        state: WizardState,
        draft: &D,
        call: F,
    ) -> WizardResult<(WizardState, C)>
    where
        F: FnOnce(D) -> Fut,
        Fut: Future<Output = RequestResult<C>>,
    {
        self.check_submit(state, draft)?;

        match call(draft.clone()).await {
            RequestResult::Success { data, status } => {
                info!("Wizard submission accepted with status {}", status);
                let state = WizardState {
                    complete: true,
                    ..state
                };
                Ok((state, data))
            }
            RequestResult::Failure { error, status } => {
                warn!("Wizard submission failed ({}): {}", status, error);
                Err(WizardError::Submission {
                    message: error,
                    status,
                })
            }
        }
    }
}

/// Raise `err` as an error toast. Incomplete steps use the caller's wording;
/// submission failures were already reported by the gateway.
pub fn notify_error(notifier: &dyn Notifier, err: &WizardError, incomplete: &str) {
    match err {
        WizardError::Submission { .. } => {}
        WizardError::StepIncomplete { .. } => notifier.error(incomplete),
        other => notifier.error(&other.to_string()),
    }
}

/// A wizard instance holding its state, draft and confirmation
pub struct Wizard<D: Draft, C> {
    controller: WizardController<D>,
    state: WizardState,
    draft: D,
    confirmation: Option<C>,
}

impl<D, C> fmt::Debug for Wizard<D, C>
where
    D: Draft + fmt::Debug,
    C: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wizard")
            .field("steps", &self.controller.steps)
            .field("state", &self.state)
            .field("draft", &self.draft)
            .field("confirmation", &self.confirmation)
            .finish()
    }
}

impl<D: Draft, C> Wizard<D, C> {
    pub fn start(steps: StepTable<D>, defaults: D, prefill: Option<D::Prefill>) -> WizardResult<Self> {
        let controller = WizardController::new(steps)?;
        let (state, draft) = controller.initialize(defaults, prefill);

        Ok(Self {
            controller,
            state,
            draft,
            confirmation: None,
        })
    }

    /// Throw away the current draft and confirmation and begin again
    pub fn restart(&mut self, defaults: D, prefill: Option<D::Prefill>) {
        let (state, draft) = self.controller.initialize(defaults, prefill);
        self.state = state;
        self.draft = draft;
        self.confirmation = None;
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn current_step(&self) -> usize {
        self.state.current_step
    }

    pub fn current_step_name(&self) -> &'static str {
        self.controller
            .steps
            .name(self.state.current_step)
            .unwrap_or_default()
    }

    pub fn total_steps(&self) -> usize {
        self.state.total_steps
    }

    pub fn is_complete(&self) -> bool {
        self.state.complete
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    /// Mutable access to the draft, refused once the wizard is complete
    pub fn draft_mut(&mut self) -> WizardResult<&mut D> {
        if self.state.complete {
            return Err(WizardError::AlreadyComplete);
        }
        Ok(&mut self.draft)
    }

    pub fn confirmation(&self) -> Option<&C> {
        self.confirmation.as_ref()
    }

    pub fn can_advance(&self) -> bool {
        self.controller
            .can_advance(self.state.current_step, &self.draft)
    }

    /// Move forward one step and return the new step number.
    ///
    /// On the last step this is a no-op; the terminal action is [`submit`].
    ///
    /// [`submit`]: Wizard::submit
    pub fn advance(&mut self) -> WizardResult<usize> {
        if self.state.complete {
            return Err(WizardError::AlreadyComplete);
        }

        if self.state.is_final_step() {
            debug!("Advance on the last step ignored");
            return Ok(self.state.current_step);
        }

        if !self.can_advance() {
            return Err(WizardError::StepIncomplete {
                step: self.state.current_step,
                name: self.current_step_name(),
            });
        }

        self.state = self.controller.advance(self.state, &self.draft);
        debug!("Wizard moved to step {}", self.state.current_step);
        Ok(self.state.current_step)
    }

    /// Like [`advance`](Wizard::advance), raising `incomplete` as a toast
    /// instead of an error. Returns whether the wizard moved.
    pub fn advance_or_notify(&mut self, notifier: &dyn Notifier, incomplete: &str) -> bool {
        let before = self.state.current_step;
        match self.advance() {
            Ok(step) => step != before,
            Err(e) => {
                notify_error(notifier, &e, incomplete);
                false
            }
        }
    }

    /// Whether [`submit`](Wizard::submit) would be allowed to call out now
    pub fn check_submit(&self) -> WizardResult<()> {
        self.controller.check_submit(self.state, &self.draft)
    }

    /// Move back one step and return the new step number
    pub fn retreat(&mut self) -> usize {
        self.state = self.controller.retreat(self.state);
        self.state.current_step
    }

    /// Submit the draft through `call`.
    ///
    /// On success the wizard becomes complete and keeps the confirmation. On
    /// any error the step, draft and completion flag are left untouched so
    /// the user can correct the input and retry.
    pub async fn submit<F, Fut>(&mut self, call: F) -> WizardResult<&C>
    where
        F: FnOnce(D) -> Fut,
        Fut: Future<Output = RequestResult<C>>,
    {
        let (state, confirmation) = self
            .controller
            .submit(self.state, &self.draft, call)
            .await?;

        self.state = state;
        Ok(self.confirmation.insert(confirmation))
    }
}
