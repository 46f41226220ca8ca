mod library;
mod lyrics;
pub mod state;

use anyhow::Context;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{Method, header};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
pub use state::ServerState;

pub fn make_app(state: ServerState, cfg: &Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes: Router = Router::new()
        .route("/music", get(library::list_music))
        .route("/stream/{*path}", get(library::stream_track))
        .route("/metadata/{*path}", get(library::get_metadata))
        .route("/lyric", get(lyrics::get_lyric))
        .route(
            "/upload-lyric",
            post(lyrics::upload_lyric).layer(DefaultBodyLimit::max(cfg.server.upload_limit_bytes)),
        )
        .with_state(state);

    let mut app = Router::new().nest("/api", api_routes);
    if let Some(public_dir) = &cfg.server.public_dir {
        app = app.fallback_service(ServeDir::new(public_dir));
    }

    app.layer(cors).layer(TraceLayer::new_for_http())
}

pub async fn run_server(cfg: Config) -> anyhow::Result<()> {
    let music_dir = &cfg.paths.music_dir;
    if !music_dir.exists() {
        info!("creating music folder {}", music_dir.display());
        tokio::fs::create_dir_all(music_dir)
            .await
            .with_context(|| format!("create dir {}", music_dir.display()))?;
    }

    let state = ServerState::new(&cfg)?;
    let app = make_app(state, &cfg);

    let addr = cfg.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    info!("server running on http://{addr}");
    info!("music folder: {}", music_dir.display());

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await
        .context("server error")
}
