use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};

use super::{PredictorApi, PredictorError};
use crate::config::{normalize_base_url, AppConfig};
use crate::models::{
    DiseasesResponse, PredictRequest, PredictResponse, Prediction, Symptom, Vocabulary,
};

const JSON: &str = "application/json";

/// HTTP client for the prediction API.
pub struct PredictorClient {
    base_url: String,
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl PredictorClient {
    /// Create a client for the API at `base_url`.
    ///
    /// Without a timeout, failures are detected only through the transport.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, PredictorError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PredictorError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: normalize_base_url(base_url),
            client,
            timeout,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, PredictorError> {
        Self::new(&config.api_base_url, config.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn send_error(&self, e: reqwest::Error) -> PredictorError {
        if e.is_connect() {
            PredictorError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            let secs = self.timeout.map(|t| t.as_secs()).unwrap_or_default();
            PredictorError::HttpClient(format!("Request timed out after {secs}s"))
        } else {
            PredictorError::HttpClient(e.to_string())
        }
    }
}

fn check_status(response: &reqwest::Response) -> Result<(), PredictorError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(PredictorError::Status {
            status: status.as_u16(),
        })
    }
}

impl PredictorApi for PredictorClient {
    async fn fetch_vocabulary(&self) -> Result<Vocabulary, PredictorError> {
        let url = format!("{}/diseases", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, JSON)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        check_status(&response)?;

        let parsed: DiseasesResponse = response
            .json()
            .await
            .map_err(|e| PredictorError::ResponseParsing(e.to_string()))?;

        Ok(parsed.into_vocabulary())
    }

    async fn predict(&self, symptoms: &[Symptom]) -> Result<Vec<Prediction>, PredictorError> {
        let url = format!("{}/predict", self.base_url);

        let response = self
            .client
            .post(&url)
            .header(ACCEPT, JSON)
            .header(CONTENT_TYPE, JSON)
            .json(&PredictRequest { symptoms })
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        check_status(&response)?;

        let parsed: PredictResponse = response
            .json()
            .await
            .map_err(|e| PredictorError::ResponseParsing(e.to_string()))?;

        Ok(parsed.predictions)
    }
}

/// Mock predictor for testing: returns configured data and counts calls.
pub struct MockPredictor {
    symptom_lists: Vec<Vec<String>>,
    predictions: Vec<Prediction>,
    vocabulary_error: Option<PredictorError>,
    predict_error: Option<PredictorError>,
    vocabulary_calls: AtomicUsize,
    predict_calls: AtomicUsize,
    last_request: Mutex<Vec<Symptom>>,
}

impl MockPredictor {
    pub fn new() -> Self {
        Self {
            symptom_lists: Vec::new(),
            predictions: Vec::new(),
            vocabulary_error: None,
            predict_error: None,
            vocabulary_calls: AtomicUsize::new(0),
            predict_calls: AtomicUsize::new(0),
            last_request: Mutex::new(Vec::new()),
        }
    }

    /// One symptom list per disease.
    pub fn with_diseases(mut self, lists: Vec<Vec<&str>>) -> Self {
        self.symptom_lists = lists
            .into_iter()
            .map(|l| l.into_iter().map(String::from).collect())
            .collect();
        self
    }

    pub fn with_predictions(mut self, predictions: Vec<Prediction>) -> Self {
        self.predictions = predictions;
        self
    }

    pub fn with_vocabulary_error(mut self, err: PredictorError) -> Self {
        self.vocabulary_error = Some(err);
        self
    }

    pub fn with_predict_error(mut self, err: PredictorError) -> Self {
        self.predict_error = Some(err);
        self
    }

    pub fn vocabulary_calls(&self) -> usize {
        self.vocabulary_calls.load(Ordering::SeqCst)
    }

    pub fn predict_calls(&self) -> usize {
        self.predict_calls.load(Ordering::SeqCst)
    }

    /// Symptoms sent with the most recent `predict` call.
    pub fn last_request(&self) -> Vec<Symptom> {
        self.last_request
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl Default for MockPredictor {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictorApi for MockPredictor {
    async fn fetch_vocabulary(&self) -> Result<Vocabulary, PredictorError> {
        self.vocabulary_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.vocabulary_error {
            return Err(err.clone());
        }
        Ok(Vocabulary::from_symptom_lists(self.symptom_lists.clone()))
    }

    async fn predict(&self, symptoms: &[Symptom]) -> Result<Vec<Prediction>, PredictorError> {
        self.predict_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = symptoms.to_vec();
        }
        if let Some(err) = &self.predict_error {
            return Err(err.clone());
        }
        Ok(self.predictions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::sync::Arc;

    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    /// Spawn a throwaway prediction backend on an ephemeral localhost port.
    async fn spawn_backend(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn client_for(addr: SocketAddr) -> PredictorClient {
        PredictorClient::new(&format!("http://{addr}/"), None).unwrap()
    }

    #[test]
    fn constructor_trims_trailing_slash() {
        let client = PredictorClient::new("http://localhost:8000/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn from_config_uses_configured_url() {
        let config = AppConfig::default();
        let client = PredictorClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[tokio::test]
    async fn fetch_vocabulary_derives_sorted_union() {
        let app = Router::new().route(
            "/diseases",
            get(|| async {
                Json(json!({"diseases": [
                    {"name": "Flu", "symptoms": ["fever", "cough"]},
                    {"name": "Migraine", "symptoms": ["headache", "nausea", "fever"]}
                ]}))
            }),
        );
        let addr = spawn_backend(app).await;

        let vocab = client_for(addr).fetch_vocabulary().await.unwrap();
        let names: Vec<&str> = vocab.symptoms().iter().map(Symptom::as_str).collect();
        assert_eq!(names, vec!["cough", "fever", "headache", "nausea"]);
    }

    #[tokio::test]
    async fn predict_posts_symptoms_in_order() {
        let seen: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
        let seen_in_handler = seen.clone();
        let app = Router::new().route(
            "/predict",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let seen = seen_in_handler.clone();
                async move {
                    assert_eq!(headers.get("accept").unwrap(), "application/json");
                    *seen.lock().unwrap() = Some(body);
                    Json(json!({"predictions": [{
                        "disease": "Flu",
                        "match_percentage": 87.25,
                        "description": "Viral infection",
                        "precautions": ["rest"],
                        "medications": ["paracetamol"]
                    }]}))
                }
            }),
        );
        let addr = spawn_backend(app).await;

        let symptoms = vec![Symptom::from("fever"), Symptom::from("cough")];
        let predictions = client_for(addr).predict(&symptoms).await.unwrap();

        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].disease, "Flu");
        assert_eq!(
            seen.lock().unwrap().clone().unwrap(),
            json!({"symptoms": ["fever", "cough"]})
        );
    }

    #[tokio::test]
    async fn non_success_status_is_status_error() {
        let app = Router::new()
            .route("/diseases", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .route("/predict", post(|| async { StatusCode::NOT_FOUND }));
        let addr = spawn_backend(app).await;
        let client = client_for(addr);

        let err = client.fetch_vocabulary().await.unwrap_err();
        assert_eq!(err, PredictorError::Status { status: 500 });

        let err = client.predict(&[Symptom::from("fever")]).await.unwrap_err();
        assert_eq!(err, PredictorError::Status { status: 404 });
    }

    #[tokio::test]
    async fn malformed_body_is_parsing_error() {
        let app = Router::new().route("/diseases", get(|| async { "not json" }));
        let addr = spawn_backend(app).await;

        let err = client_for(addr).fetch_vocabulary().await.unwrap_err();
        assert!(matches!(err, PredictorError::ResponseParsing(_)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_connection_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(addr).fetch_vocabulary().await.unwrap_err();
        assert_eq!(err, PredictorError::Connection(format!("http://{addr}")));
    }

    #[tokio::test]
    async fn mock_counts_calls_and_records_request() {
        let mock = MockPredictor::new().with_diseases(vec![vec!["fever"], vec!["cough"]]);
        let vocab = mock.fetch_vocabulary().await.unwrap();
        assert_eq!(vocab.len(), 2);
        assert_eq!(mock.vocabulary_calls(), 1);

        let result = mock.predict(&[Symptom::from("fever")]).await.unwrap();
        assert!(result.is_empty());
        assert_eq!(mock.predict_calls(), 1);
        assert_eq!(mock.last_request(), vec![Symptom::from("fever")]);
    }

    #[tokio::test]
    async fn mock_returns_configured_errors() {
        let mock = MockPredictor::new()
            .with_vocabulary_error(PredictorError::Status { status: 502 })
            .with_predict_error(PredictorError::Connection("http://x".into()));
        assert!(mock.fetch_vocabulary().await.is_err());
        assert!(mock.predict(&[]).await.is_err());
    }
}
