mod config;
mod error;
mod grpc;
mod llm;
mod prompt;
mod proto;
mod rag;
mod ran;
mod routes;
mod services;
mod state;
mod types;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env().expect("invalid configuration");
    let state = state::AppState::from_config(&config).expect("client init failed");

    tracing::info!(
        vllm = config.vllm.as_ref().map_or("unset", |v| v.url.as_str()),
        rag = %config.rag_search_url,
        ran = %config.ran_services_url,
        ran_agent_live = config.ran_agent_live,
        "upstreams configured"
    );

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "assistdesk listening");
    axum::serve(listener, app).await.expect("server failed");
}
