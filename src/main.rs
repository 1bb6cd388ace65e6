//! Scambait service entrypoint: configuration, wiring, and the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use http::header::HeaderName;
use secrecy::ExposeSecret;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use scambait::adapters::ai::{LlmClient, LlmConfig, LlmPersonaResponder, LlmScamClassifier};
use scambait::adapters::http::{api_routes, ApiKeyAuth, ApiState};
use scambait::adapters::report::{HttpReportSink, HttpReportSinkConfig};
use scambait::adapters::store::InMemorySessionStore;
use scambait::application::EngagementOrchestrator;
use scambait::config::AppConfig;
use scambait::ports::SessionStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.server.log_level)),
        )
        .init();

    let llm = LlmClient::new(
        LlmConfig::new(config.ai.api_key.expose_secret().clone())
            .with_model(config.ai.model.clone())
            .with_base_url(config.ai.base_url.clone())
            .with_timeout(config.ai.timeout()),
    );

    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    let classifier = Arc::new(LlmScamClassifier::new(llm.clone()));
    let responder = Arc::new(LlmPersonaResponder::new(llm));
    let sink = Arc::new(HttpReportSink::new(
        HttpReportSinkConfig::new(config.callback.url.clone())
            .with_timeout(config.callback.timeout()),
    ));

    let orchestrator = Arc::new(
        EngagementOrchestrator::new(Arc::clone(&store), classifier, responder, sink)
            .with_detection_threshold(config.engagement.detection_threshold)
            .with_policy(config.engagement.policy()),
    );

    let state = ApiState::new(orchestrator, store);
    let auth = ApiKeyAuth::new(config.auth.api_key.clone());

    let x_request_id = HeaderName::from_static("x-request-id");
    let app = api_routes(state, auth).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(x_request_id))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(CorsLayer::permissive()),
    );

    let addr = config.server.socket_addr();
    tracing::info!(%addr, model = %config.ai.model, "scambait listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
