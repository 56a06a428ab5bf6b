//! UI server lifecycle: bind → spawn background task → return a handle
//! with a shutdown channel.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::error::ServeError;
use super::router::selector_router;
use crate::core_state::CoreState;
use crate::predictor::PredictorApi;

/// Session metadata for a running UI server.
#[derive(Debug, Clone)]
pub struct UiSession {
    pub session_id: String,
    pub server_addr: String,
    pub port: u16,
    pub started_at: String,
}

impl UiSession {
    /// Address to open in a browser.
    pub fn url(&self) -> String {
        format!("http://{}/", self.server_addr)
    }
}

/// Handle to a running UI server.
pub struct UiServer {
    pub session: UiSession,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl UiServer {
    /// Ask the server to stop accepting requests.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("UI server shutdown signal sent");
        }
    }

    /// Wait until the server task has finished.
    pub async fn wait(self) {
        if let Err(e) = self.task.await {
            tracing::error!("UI server task failed: {e}");
        }
    }
}

/// Start the selector UI server on `addr`. Port `0` picks an ephemeral port.
pub async fn start_ui_server<P: PredictorApi>(
    core: Arc<CoreState<P>>,
    addr: SocketAddr,
) -> Result<UiServer, ServeError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })?;

    let bound = listener.local_addr().map_err(ServeError::LocalAddr)?;

    let app = selector_router(core);

    let session = UiSession {
        session_id: Uuid::new_v4().to_string(),
        server_addr: bound.to_string(),
        port: bound.port(),
        started_at: chrono::Utc::now().to_rfc3339(),
    };

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("UI server received shutdown signal");
        };

        tracing::info!(addr = %bound, "UI server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("UI server error: {e}");
        }

        tracing::info!("UI server stopped");
    });

    Ok(UiServer {
        session,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    use crate::predictor::MockPredictor;

    fn ephemeral() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
    }

    fn test_core() -> Arc<CoreState<MockPredictor>> {
        Arc::new(CoreState::new(
            MockPredictor::new().with_diseases(vec![vec!["fever", "cough"]]),
        ))
    }

    #[tokio::test]
    async fn start_serve_and_stop() {
        let core = test_core();
        core.load_vocabulary().await.unwrap();
        let mut server = start_ui_server(core, ephemeral())
            .await
            .expect("server should start");

        assert!(server.session.port > 0);
        assert!(!server.session.session_id.is_empty());
        assert!(!server.session.started_at.is_empty());

        let resp = reqwest::get(format!("{}health", server.session.url()))
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        let page = reqwest::get(server.session.url())
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(page.contains(r#"data-symptom="fever""#));

        server.shutdown();
        server.wait().await;
    }

    #[tokio::test]
    async fn bind_conflict_is_reported() {
        let taken = tokio::net::TcpListener::bind(ephemeral()).await.unwrap();
        let addr = taken.local_addr().unwrap();

        let result = start_ui_server(test_core(), addr).await;
        assert!(matches!(result, Err(ServeError::Bind { .. })));
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let mut server = start_ui_server(test_core(), ephemeral())
            .await
            .expect("server should start");

        server.shutdown();
        server.shutdown();
        server.wait().await;
    }
}
