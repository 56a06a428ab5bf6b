use serde::Serialize;
use thiserror::Error;

use crate::models::{Prediction, Selection, Symptom, Vocabulary};
use crate::predictor::PredictorError;

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Submit attempted with nothing selected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorError {
    #[error("Please select at least one symptom")]
    EmptySelection,
}

/// Visual severity of an alert panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Danger,
}

/// What the results area currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultsPanel {
    /// Nothing submitted yet, or the last alert was dismissed.
    Idle,
    /// Submit was attempted with an empty selection.
    EmptySelection,
    /// The vocabulary could not be loaded.
    LoadFailed { detail: String },
    /// The prediction call failed.
    PredictFailed { detail: String },
    /// The backend returned no predictions.
    NoMatches,
    /// Prediction cards, in backend order.
    Predictions { predictions: Vec<Prediction> },
}

impl ResultsPanel {
    /// Alert severity and message, or `None` when the panel is not an alert.
    pub fn alert(&self) -> Option<(Severity, String)> {
        match self {
            Self::Idle | Self::Predictions { .. } => None,
            Self::EmptySelection => Some((
                Severity::Warning,
                SelectorError::EmptySelection.to_string(),
            )),
            Self::LoadFailed { detail } => Some((
                Severity::Danger,
                format!(
                    "Error loading symptoms: {detail}. Please make sure the backend server is running."
                ),
            )),
            Self::PredictFailed { detail } => Some((
                Severity::Danger,
                format!("Error: {detail}. Please make sure the backend server is running."),
            )),
            Self::NoMatches => Some((
                Severity::Info,
                "No matching diseases found. Please try different symptoms.".to_string(),
            )),
        }
    }
}

/// Identifies one prediction submission. Only the latest issued ticket is applied.
pub type Ticket = u64;

/// Everything that can happen to the selector.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorEvent {
    /// Ask for the vocabulary to be (re)loaded.
    VocabularyRequested,
    /// Outcome of the vocabulary fetch.
    VocabularyLoaded(Result<Vocabulary, PredictorError>),
    /// Search field text set outside the keystroke stream (e.g. `GET /?q=`).
    SearchChanged(String),
    /// One keystroke's search text. `seq` grows with every keystroke; an older
    /// `seq` arriving late is ignored.
    SearchInput { seq: u64, text: String },
    /// A dropdown entry was clicked.
    SymptomToggled(Symptom),
    /// Enter pressed in the search field with this input.
    SearchConfirmed(String),
    /// A chip's remove control was clicked.
    SymptomRemoved(Symptom),
    /// The predict form was submitted.
    SubmitRequested,
    /// Outcome of a prediction call.
    PredictionsReceived {
        ticket: Ticket,
        result: Result<Vec<Prediction>, PredictorError>,
    },
    /// The alert panel was dismissed.
    PanelDismissed,
}

/// Network work an event requires. At most one per event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    FetchVocabulary,
    RequestPredictions {
        ticket: Ticket,
        symptoms: Vec<Symptom>,
    },
}

/// One rendered dropdown entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownItem<'a> {
    pub symptom: &'a Symptom,
    pub active: bool,
}

// ═══════════════════════════════════════════════════════════
// SelectorState
// ═══════════════════════════════════════════════════════════

/// Component-local state of the symptom selector.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorState {
    vocabulary: Vocabulary,
    selection: Selection,
    search_text: String,
    search_seq: u64,
    panel: ResultsPanel,
    latest_ticket: Ticket,
}

impl Default for SelectorState {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectorState {
    pub fn new() -> Self {
        Self {
            vocabulary: Vocabulary::default(),
            selection: Selection::new(),
            search_text: String::new(),
            search_seq: 0,
            panel: ResultsPanel::Idle,
            latest_ticket: 0,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn panel(&self) -> &ResultsPanel {
        &self.panel
    }

    pub fn latest_ticket(&self) -> Ticket {
        self.latest_ticket
    }

    /// Dropdown entries for the current search text, each flagged by selection membership.
    pub fn dropdown(&self) -> Vec<DropdownItem<'_>> {
        self.vocabulary
            .filter(&self.search_text)
            .map(|symptom| DropdownItem {
                symptom,
                active: self.selection.contains(symptom),
            })
            .collect()
    }

    /// Apply one event and return the network work it requires.
    pub fn apply(&mut self, event: SelectorEvent) -> Effect {
        match event {
            SelectorEvent::VocabularyRequested => Effect::FetchVocabulary,

            SelectorEvent::VocabularyLoaded(Ok(vocabulary)) => {
                tracing::info!(symptoms = vocabulary.len(), "Symptom vocabulary loaded");
                self.vocabulary = vocabulary;
                if matches!(self.panel, ResultsPanel::LoadFailed { .. }) {
                    self.panel = ResultsPanel::Idle;
                }
                Effect::None
            }

            SelectorEvent::VocabularyLoaded(Err(e)) => {
                tracing::error!(error = %e, "Error loading symptoms");
                self.panel = ResultsPanel::LoadFailed {
                    detail: e.to_string(),
                };
                Effect::None
            }

            SelectorEvent::SearchChanged(text) => {
                self.search_text = text;
                Effect::None
            }

            SelectorEvent::SearchInput { seq, text } => {
                if seq > self.search_seq {
                    self.search_seq = seq;
                    self.search_text = text;
                } else {
                    tracing::debug!(
                        seq,
                        latest = self.search_seq,
                        "Discarding stale search input"
                    );
                }
                Effect::None
            }

            SelectorEvent::SymptomToggled(symptom) => {
                if self.vocabulary.contains(&symptom) || self.selection.contains(&symptom) {
                    self.selection.toggle(symptom);
                } else {
                    tracing::debug!(%symptom, "Ignoring toggle of unknown symptom");
                }
                Effect::None
            }

            SelectorEvent::SearchConfirmed(input) => {
                self.confirm_search(&input);
                Effect::None
            }

            SelectorEvent::SymptomRemoved(symptom) => {
                self.selection.remove(&symptom);
                Effect::None
            }

            SelectorEvent::SubmitRequested => match self.begin_submit() {
                Ok(effect) => effect,
                Err(SelectorError::EmptySelection) => {
                    self.panel = ResultsPanel::EmptySelection;
                    Effect::None
                }
            },

            SelectorEvent::PredictionsReceived { ticket, result } => {
                self.receive_predictions(ticket, result);
                Effect::None
            }

            SelectorEvent::PanelDismissed => {
                if self.panel.alert().is_some() {
                    self.panel = ResultsPanel::Idle;
                }
                Effect::None
            }
        }
    }

    // ── Internal ────────────────────────────────────────────

    fn confirm_search(&mut self, input: &str) {
        let Some(symptom) = self.vocabulary.resolve(input).cloned() else {
            // No match: silent no-op, the typed text stays.
            self.search_text = input.to_string();
            return;
        };
        self.selection.insert(symptom);
        self.search_text.clear();
    }

    fn begin_submit(&mut self) -> Result<Effect, SelectorError> {
        // Every submit supersedes any prediction still in flight.
        self.latest_ticket += 1;
        if self.selection.is_empty() {
            return Err(SelectorError::EmptySelection);
        }
        Ok(Effect::RequestPredictions {
            ticket: self.latest_ticket,
            symptoms: self.selection.to_vec(),
        })
    }

    fn receive_predictions(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<Prediction>, PredictorError>,
    ) {
        if ticket != self.latest_ticket {
            tracing::debug!(
                ticket,
                latest = self.latest_ticket,
                "Discarding stale prediction response"
            );
            return;
        }
        self.panel = match result {
            Ok(predictions) if predictions.is_empty() => ResultsPanel::NoMatches,
            Ok(predictions) => ResultsPanel::Predictions { predictions },
            Err(e) => {
                tracing::error!(error = %e, "Prediction request failed");
                ResultsPanel::PredictFailed {
                    detail: e.to_string(),
                }
            }
        };
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
