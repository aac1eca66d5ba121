use std::net::SocketAddr;

use axum::{Router, routing::get};
use homestay_booking::{
    config::Settings,
    route_handler::{command_handler, query_handler, rooms_handler},
    state::new_application_state,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env();
    let state = new_application_state(&settings);

    // A single logical endpoint per session: the HTTP method distinguishes
    // whether the call is a command or a query. The rooms listing feeds the
    // selector the form renders.
    let router = Router::new()
        .route(
            "/booking/{session_id}",
            get(query_handler).post(command_handler),
        )
        .route("/rooms", get(rooms_handler))
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    info!(%addr, "booking engine listening");

    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), router)
        .await
        .unwrap();
}
