//! Request handlers. Each one turns a browser request into a `SelectorEvent`,
//! dispatches it, and answers with fresh markup or a redirect to the page.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{Html, Redirect};
use axum::Form;
use serde::Deserialize;

use super::error::UiError;
use crate::core_state::CoreState;
use crate::models::Symptom;
use crate::predictor::PredictorApi;
use crate::selector::render::{render_dropdown, render_page};
use crate::selector::SelectorEvent;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    /// Keystroke sequence number sent by the page script.
    pub seq: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct SymptomForm {
    pub symptom: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub q: String,
}

fn back_to_page() -> Redirect {
    Redirect::to("/")
}

/// `GET /` — the full page. `?q=` applies a search first.
pub async fn page<P: PredictorApi>(
    State(core): State<Arc<CoreState<P>>>,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, UiError> {
    if let Some(q) = params.q {
        core.apply(SelectorEvent::SearchChanged(q))?;
    }
    Ok(Html(core.with_selector(render_page)?))
}

/// `GET /dropdown?q=&seq=` — search text changed; returns the dropdown fragment.
pub async fn dropdown<P: PredictorApi>(
    State(core): State<Arc<CoreState<P>>>,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, UiError> {
    let text = params.q.unwrap_or_default();
    let event = match params.seq {
        Some(seq) => SelectorEvent::SearchInput { seq, text },
        None => SelectorEvent::SearchChanged(text),
    };
    core.apply(event)?;
    Ok(Html(core.with_selector(render_dropdown)?))
}

/// `POST /symptoms/toggle` — a dropdown entry was clicked.
pub async fn toggle<P: PredictorApi>(
    State(core): State<Arc<CoreState<P>>>,
    Form(form): Form<SymptomForm>,
) -> Result<Redirect, UiError> {
    core.dispatch(SelectorEvent::SymptomToggled(Symptom::new(form.symptom)))
        .await?;
    Ok(back_to_page())
}

/// `POST /symptoms/remove` — a chip's remove control was clicked.
pub async fn remove<P: PredictorApi>(
    State(core): State<Arc<CoreState<P>>>,
    Form(form): Form<SymptomForm>,
) -> Result<Redirect, UiError> {
    core.dispatch(SelectorEvent::SymptomRemoved(Symptom::new(form.symptom)))
        .await?;
    Ok(back_to_page())
}

/// `POST /search/confirm` — Enter pressed in the search field.
pub async fn confirm_search<P: PredictorApi>(
    State(core): State<Arc<CoreState<P>>>,
    Form(form): Form<SearchForm>,
) -> Result<Redirect, UiError> {
    core.dispatch(SelectorEvent::SearchConfirmed(form.q)).await?;
    Ok(back_to_page())
}

/// `POST /predict` — submit the selection and wait for the outcome.
pub async fn predict<P: PredictorApi>(
    State(core): State<Arc<CoreState<P>>>,
) -> Result<Redirect, UiError> {
    core.submit_prediction().await?;
    Ok(back_to_page())
}

/// `POST /panel/dismiss` — close the alert panel.
pub async fn dismiss_panel<P: PredictorApi>(
    State(core): State<Arc<CoreState<P>>>,
) -> Result<Redirect, UiError> {
    core.dispatch(SelectorEvent::PanelDismissed).await?;
    Ok(back_to_page())
}

/// `POST /vocabulary/reload` — fetch the vocabulary again.
pub async fn reload_vocabulary<P: PredictorApi>(
    State(core): State<Arc<CoreState<P>>>,
) -> Result<Redirect, UiError> {
    core.load_vocabulary().await?;
    Ok(back_to_page())
}

/// `GET /health`
pub async fn health() -> &'static str {
    "ok"
}
