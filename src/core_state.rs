//! Shared state container for the selector.
//!
//! `CoreState` owns the single `SelectorState` and the predictor. Handlers
//! call `dispatch` with an event; the state lock is held only while the event
//! is applied, never across a network call. Any `Effect` the event produces
//! is run afterwards and its outcome dispatched back as another event.

use std::sync::{Mutex, MutexGuard};

use crate::predictor::PredictorApi;
use crate::selector::{Effect, SelectorEvent, SelectorState};

/// Errors from `CoreState` access.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
}

pub struct CoreState<P> {
    selector: Mutex<SelectorState>,
    predictor: P,
}

impl<P: PredictorApi> CoreState<P> {
    pub fn new(predictor: P) -> Self {
        Self {
            selector: Mutex::new(SelectorState::new()),
            predictor,
        }
    }

    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    /// Lock the selector state for reading or rendering.
    pub fn read_selector(&self) -> Result<MutexGuard<'_, SelectorState>, CoreError> {
        self.selector.lock().map_err(|_| CoreError::LockPoisoned)
    }

    /// Run `f` against the current state, e.g. a render function.
    pub fn with_selector<T>(&self, f: impl FnOnce(&SelectorState) -> T) -> Result<T, CoreError> {
        let selector = self.read_selector()?;
        Ok(f(&selector))
    }

    /// Apply one event and return the effect it requires, without running it.
    pub fn apply(&self, event: SelectorEvent) -> Result<Effect, CoreError> {
        let mut selector = self.read_selector()?;
        Ok(selector.apply(event))
    }

    /// Apply an event and run whatever network work it requires.
    ///
    /// Returns once the outcome of that work has been applied too.
    pub async fn dispatch(&self, event: SelectorEvent) -> Result<(), CoreError> {
        let effect = self.apply(event)?;
        self.run_effect(effect).await
    }

    /// Fetch the vocabulary and store it (or the failure panel).
    pub async fn load_vocabulary(&self) -> Result<(), CoreError> {
        self.dispatch(SelectorEvent::VocabularyRequested).await
    }

    /// Submit the current selection and store the outcome.
    pub async fn submit_prediction(&self) -> Result<(), CoreError> {
        self.dispatch(SelectorEvent::SubmitRequested).await
    }

    async fn run_effect(&self, effect: Effect) -> Result<(), CoreError> {
        let outcome = match effect {
            Effect::None => return Ok(()),
            Effect::FetchVocabulary => {
                tracing::debug!("Fetching symptom vocabulary");
                SelectorEvent::VocabularyLoaded(self.predictor.fetch_vocabulary().await)
            }
            Effect::RequestPredictions { ticket, symptoms } => {
                tracing::info!(ticket, count = symptoms.len(), "Requesting predictions");
                let result = self.predictor.predict(&symptoms).await;
                SelectorEvent::PredictionsReceived { ticket, result }
            }
        };

        // Outcome events never require further network work.
        let follow_up = self.apply(outcome)?;
        debug_assert_eq!(follow_up, Effect::None);
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
