mod assets;

use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use anyhow::Result;
use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse, Response,
    },
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::{net::TcpListener, sync::broadcast};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};

use crate::{
    catalog::BattleCatalog,
    optimizer::{recommend_formation_with_hook, RecommendResult, SearchProgress},
    setup::BattleSetup,
};

#[derive(Clone, Serialize)]
pub struct UiFrame {
    pub progress: Option<SearchProgress>,
    pub result: Option<RecommendResult>,
    pub completed: bool,
}

#[derive(Clone, Serialize)]
pub struct StateEnvelope {
    pub setup: String,
    pub battle_type: String,
    pub march_size: u64,
    pub target_win: f64,
    pub result: Option<RecommendResult>,
    pub completed: bool,
}

#[derive(Clone)]
struct AppState {
    broadcaster: broadcast::Sender<String>,
    latest_result: Arc<Mutex<Option<RecommendResult>>>,
    search_done: Arc<AtomicBool>,
    setup_name: String,
    battle_type_label: String,
    march_size: u64,
    target_win: f64,
}

pub struct WebServerConfig {
    pub setup: BattleSetup,
    pub catalog: BattleCatalog,
    pub host: String,
    pub port: u16,
}

pub async fn run(config: WebServerConfig) -> Result<()> {
    let WebServerConfig {
        setup,
        catalog,
        host,
        port,
    } = config;

    let (my, enemy) = setup.build_sides()?;
    let battle_type_label = catalog.get(setup.battle_type).label.clone();

    let (tx, _) = broadcast::channel::<String>(512);
    let latest_result: Arc<Mutex<Option<RecommendResult>>> = Arc::new(Mutex::new(None));
    let search_done = Arc::new(AtomicBool::new(false));

    let latest_for_search = latest_result.clone();
    let done_for_search = search_done.clone();
    let tx_for_search = tx.clone();
    let setup_label = setup.name.clone();
    let battle_type = setup.battle_type;
    let march_size = setup.march_size;
    let target_win = setup.target_win;
    let sims = setup.sims;
    let catalog_for_search = catalog.clone();

    let search_handle = tokio::task::spawn_blocking(move || {
        let result = recommend_formation_with_hook(
            &my,
            &enemy,
            &catalog_for_search,
            battle_type,
            march_size,
            target_win,
            sims,
            |progress| {
                let frame = UiFrame {
                    progress: Some(progress),
                    result: None,
                    completed: false,
                };
                if let Ok(payload) = serde_json::to_string(&frame) {
                    let _ = tx_for_search.send(payload);
                }
            },
        );

        {
            let mut guard = latest_for_search
                .lock()
                .expect("latest result lock poisoned");
            *guard = Some(result.clone());
        }
        done_for_search.store(true, Ordering::SeqCst);

        let frame = UiFrame {
            progress: None,
            result: Some(result),
            completed: true,
        };
        if let Ok(payload) = serde_json::to_string(&frame) {
            let _ = tx_for_search.send(payload);
        }
    });

    tokio::spawn(async move {
        match search_handle.await {
            Ok(()) => {
                println!("[web] Search completed for '{}'.", setup_label);
            }
            Err(err) => {
                eprintln!("[web] Search task failed: {err:?}");
            }
        }
    });

    let state = Arc::new(AppState {
        broadcaster: tx.clone(),
        latest_result,
        search_done,
        setup_name: setup.name.clone(),
        battle_type_label,
        march_size,
        target_win,
    });

    let router = Router::new()
        .route("/", get(index))
        .route("/styles.css", get(styles))
        .route("/app.js", get(script))
        .route("/api/state", get(latest_state))
        .route("/api/events", get(stream_events))
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("invalid address");

    println!(
        "marchplan advisor live at http://{}:{} (Ctrl+C to stop)",
        host, port
    );

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    println!("Shutting down advisor...");
}

async fn index() -> Html<&'static str> {
    Html(assets::INDEX_HTML)
}

async fn styles() -> impl IntoResponse {
    Response::builder()
        .header(header::CONTENT_TYPE, "text/css; charset=utf-8")
        .body(Body::from(assets::STYLES_CSS))
        .unwrap()
}

async fn script() -> impl IntoResponse {
    Response::builder()
        .header(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )
        .body(Body::from(assets::APP_JS))
        .unwrap()
}

async fn latest_state(State(state): State<Arc<AppState>>) -> Json<StateEnvelope> {
    let result = state
        .latest_result
        .lock()
        .expect("latest result lock poisoned")
        .clone();
    Json(StateEnvelope {
        setup: state.setup_name.clone(),
        battle_type: state.battle_type_label.clone(),
        march_size: state.march_size,
        target_win: state.target_win,
        result,
        completed: state.search_done.load(Ordering::SeqCst),
    })
}

async fn stream_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.broadcaster.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(payload) => Some(Ok(Event::default().data(payload))),
        Err(_) => None,
    });
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(2))
            .text("keep-alive"),
    )
}
