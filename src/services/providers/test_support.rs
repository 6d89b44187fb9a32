//! In-process addon stub for provider tests

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;

/// What the stub answers to every request
#[derive(Clone)]
pub(crate) enum Reply {
    Json(String),
    Status(u16),
    Delayed(Duration, String),
}

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub path: String,
    pub headers: HeaderMap,
}

struct StubState {
    reply: Reply,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub(crate) struct AddonStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl AddonStub {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn stub_handler(State(stub): State<Arc<StubState>>, uri: Uri, headers: HeaderMap) -> Response {
    stub.requests.lock().unwrap().push(RecordedRequest {
        path: uri.path().to_string(),
        headers,
    });

    match &stub.reply {
        Reply::Json(body) => {
            ([(header::CONTENT_TYPE, "application/json")], body.clone()).into_response()
        }
        Reply::Status(code) => StatusCode::from_u16(*code).unwrap().into_response(),
        Reply::Delayed(delay, body) => {
            tokio::time::sleep(*delay).await;
            ([(header::CONTENT_TYPE, "application/json")], body.clone()).into_response()
        }
    }
}

/// Serve `reply` on an ephemeral local port
pub(crate) async fn spawn_addon(reply: Reply) -> AddonStub {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = Arc::new(StubState {
        reply,
        requests: requests.clone(),
    });
    let app = Router::new().fallback(stub_handler).with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    AddonStub {
        base_url: format!("http://{}", addr),
        requests,
    }
}

/// Two playable streams plus one without a URL
pub(crate) fn sample_streams_body() -> String {
    serde_json::json!({
        "streams": [
            {
                "name": "Torrentio\n1080p",
                "title": "Movie.2023.1080p.BluRay.x264\n👤 120 💾 8.50 GB ⚙️ YTS",
                "url": "https://debrid.example.com/dl/1",
                "behaviorHints": { "filename": "Movie.2023.1080p.BluRay.x264.mkv" }
            },
            {
                "name": "Torrentio\n4k",
                "title": "Movie.2023.2160p.WEB-DL.HDR.x265\n👤 40 💾 18.2 GB ⚙️ TorrentGalaxy",
                "url": "https://debrid.example.com/dl/2"
            },
            { "name": "broken", "title": "no url here" }
        ]
    })
    .to_string()
}
