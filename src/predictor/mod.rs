//! Access to the remote disease prediction API.
//!
//! The API exposes two endpoints: `GET /diseases` (symptom vocabulary source)
//! and `POST /predict`. `PredictorApi` is the seam the state container talks
//! to; `PredictorClient` is the HTTP implementation and `MockPredictor`
//! stands in for it in tests.

pub mod client;

pub use client::*;

use std::future::Future;

use thiserror::Error;

use crate::models::{Prediction, Symptom, Vocabulary};

/// Transport or status failure talking to the prediction API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PredictorError {
    #[error("Cannot reach the prediction service at {0}")]
    Connection(String),

    #[error("HTTP error! status: {status}")]
    Status { status: u16 },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}

/// Operations the selector needs from the prediction backend.
pub trait PredictorApi: Send + Sync + 'static {
    /// Fetch every disease and derive the symptom vocabulary.
    fn fetch_vocabulary(&self) -> impl Future<Output = Result<Vocabulary, PredictorError>> + Send;

    /// Submit the selected symptoms, in order, and return the predictions.
    fn predict(
        &self,
        symptoms: &[Symptom],
    ) -> impl Future<Output = Result<Vec<Prediction>, PredictorError>> + Send;
}
