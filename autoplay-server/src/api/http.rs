//! HTTP control endpoint
//!
//! Routes:
//! - `GET /input/:key` forwards a key press to the device
//! - `GET /status` reports what the loop last saw
//! - `GET /health` liveness probe
//! - `GET /metrics` Prometheus text format

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{info, warn};

use autoplay_protocol::StatusReport;
use autoplay_utils::{AutoplayError, Result};

use super::ApiState;
use crate::adb::commands;
use crate::observability::{GaugeSnapshot, Metrics};

/// Bound control endpoint, ready to serve
pub struct ControlServer {
    listener: TcpListener,
}

impl ControlServer {
    /// Bind the listen address
    pub async fn bind(addr: SocketAddr) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AutoplayError::http(format!("failed to bind {}: {}", addr, e)))?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve connections until shutdown
    pub async fn serve(self, state: Arc<ApiState>, mut shutdown_rx: broadcast::Receiver<()>) {
        if let Ok(addr) = self.local_addr() {
            info!("firetv-autoplay listening at http://{}", addr);
        }

        loop {
            tokio::select! {
                accept_result = self.listener.accept() => {
                    let (stream, remote_addr) = match accept_result {
                        Ok(conn) => conn,
                        Err(e) => {
                            warn!("Control endpoint accept error: {}", e);
                            continue;
                        }
                    };

                    let io = TokioIo::new(stream);
                    let state = Arc::clone(&state);

                    tokio::spawn(async move {
                        let service = service_fn(move |req| {
                            let state = Arc::clone(&state);
                            async move { handle_request(req, state).await }
                        });

                        if let Err(e) = http1::Builder::new()
                            .serve_connection(io, service)
                            .await
                        {
                            if !e.is_incomplete_message() {
                                warn!("Control connection error from {}: {}", remote_addr, e);
                            }
                        }
                    });
                }

                _ = shutdown_rx.recv() => {
                    info!("Control endpoint shutting down");
                    break;
                }
            }
        }
    }
}

async fn handle_request<B>(
    req: Request<B>,
    state: Arc<ApiState>,
) -> std::result::Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    drop(req);

    Ok(route(&method, &path, &state).await)
}

async fn route(method: &Method, path: &str, state: &ApiState) -> Response<Full<Bytes>> {
    if *method != Method::GET {
        return not_found();
    }

    if let Some(key) = path.strip_prefix("/input/") {
        return press_key(key, state).await;
    }

    match path {
        "/status" => serve_status(state),
        "/health" => serve_health(),
        "/metrics" => serve_metrics(state),
        _ => not_found(),
    }
}

/// Apply the suspend policy, then forward the key
async fn press_key(key: &str, state: &ApiState) -> Response<Full<Bytes>> {
    if !commands::is_valid_key(key) {
        return text(StatusCode::BAD_REQUEST, format!("invalid key: {}", key));
    }

    // A cycle in flight finishes first; the policy sees its last observation.
    let _session = state.device.lock_session().await;

    state.policy.on_key(key, &state.gate);

    info!(key = %key, "API: pressing {}", key);
    match state.device.send_key(key).await {
        Ok(()) => {
            Metrics::global().record_key_press(key);
            text(StatusCode::OK, format!("key {} clicked!", key))
        }
        Err(e) => {
            Metrics::global().record_transport_error();
            warn!(key = %key, error = %e, "Key press failed");
            text(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}

fn serve_status(state: &ApiState) -> Response<Full<Bytes>> {
    let report = StatusReport {
        device: state.device.id().to_string(),
        state: state.gate.last_observed(),
        suspended: state.gate.is_suspended(),
    };

    match serde_json::to_string(&report) {
        Ok(body) => Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(body)))
            .unwrap(),
        Err(e) => text(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

fn serve_metrics(state: &ApiState) -> Response<Full<Bytes>> {
    let mut gauges = GaugeSnapshot {
        suspended: state.gate.is_suspended(),
        last_observed: state.gate.last_observed(),
        ..Default::default()
    };
    gauges.collect_process_metrics();

    let body = Metrics::global().to_prometheus(&gauges);

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/plain; version=0.0.4; charset=utf-8")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

fn serve_health() -> Response<Full<Bytes>> {
    text(StatusCode::OK, "OK")
}

fn not_found() -> Response<Full<Bytes>> {
    text(StatusCode::NOT_FOUND, "Not Found")
}

fn text(status: StatusCode, body: impl Into<String>) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from(body.into())))
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    use autoplay_protocol::PlaybackState;

    use crate::classifier::Classifier;
    use crate::controller::ResumeController;
    use crate::device::Device;
    use crate::gate::{LoopState, OverridePolicy, SuspendPolicy};
    use crate::testing::ScriptedTransport;

    fn setup() -> (Arc<ScriptedTransport>, ApiState) {
        let transport = Arc::new(ScriptedTransport::new());
        let state = ApiState {
            device: Device::new("192.168.1.20:5555", transport.clone()),
            gate: Arc::new(LoopState::new()),
            policy: OverridePolicy::default(),
        };
        (transport, state)
    }

    async fn body_text(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_press_key_forwards_and_replies() {
        let (transport, state) = setup();

        let response = route(&Method::GET, "/input/19", &state).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "key 19 clicked!");
        assert_eq!(transport.commands(), vec!["input keyevent 19".to_string()]);
    }

    #[tokio::test]
    async fn test_play_pause_while_playing_suspends() {
        let (transport, state) = setup();
        state.gate.record_observation(PlaybackState::Playing);

        let response = route(&Method::GET, "/input/85", &state).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.gate.is_suspended());
        assert_eq!(transport.count("input keyevent 85"), 1);
    }

    #[tokio::test]
    async fn test_play_pause_while_unknown_rearms() {
        let (_transport, state) = setup();
        state.gate.set_suspended(true);
        state.gate.record_observation(PlaybackState::Unknown);

        route(&Method::GET, "/input/85", &state).await;

        assert!(!state.gate.is_suspended());
    }

    #[tokio::test]
    async fn test_disabled_policy_leaves_gate() {
        let (_transport, mut state) = setup();
        state.policy = OverridePolicy::new(SuspendPolicy::Disabled, "85");
        state.gate.record_observation(PlaybackState::Playing);

        route(&Method::GET, "/input/85", &state).await;

        assert!(!state.gate.is_suspended());
    }

    #[tokio::test]
    async fn test_manual_pause_holds_off_resume_until_rearmed() {
        const NETFLIX_RECENTS: &str =
            "  * Recent #0: TaskRecord{4f3a1c2 #45 A=com.netflix.ninja U=0 StackId=1 sz=1}\n";
        const PLAYING: &str =
            "com.netflix.ninja/Netflix media session\n  state=PlaybackState {state=3, position=1}\n";
        const PAUSED: &str =
            "com.netflix.ninja/Netflix media session\n  state=PlaybackState {state=2, position=1}\n";
        const STOPPED: &str =
            "com.netflix.ninja/Netflix media session\n  state=PlaybackState {state=1, position=0}\n";

        let (transport, state) = setup();
        transport.on(commands::DUMP_RECENTS, NETFLIX_RECENTS);
        // One read per cycle, except the final cycle which confirms the pause
        transport
            .on(commands::DUMP_MEDIA_SESSION, PLAYING)
            .on(commands::DUMP_MEDIA_SESSION, PAUSED)
            .on(commands::DUMP_MEDIA_SESSION, PAUSED)
            .on(commands::DUMP_MEDIA_SESSION, STOPPED)
            .on(commands::DUMP_MEDIA_SESSION, PAUSED);
        let controller = ResumeController::new(Classifier::default(), Arc::clone(&state.gate))
            .with_settle_delay(std::time::Duration::ZERO);

        assert_eq!(controller.tick(&state.device).await.unwrap(), PlaybackState::Playing);

        let response = route(&Method::GET, "/input/85", &state).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.gate.is_suspended());

        for _ in 0..2 {
            assert_eq!(controller.tick(&state.device).await.unwrap(), PlaybackState::Paused);
        }
        assert_eq!(transport.count("input press"), 0);

        assert_eq!(controller.tick(&state.device).await.unwrap(), PlaybackState::Unknown);
        route(&Method::GET, "/input/85", &state).await;
        assert!(!state.gate.is_suspended());

        assert_eq!(controller.tick(&state.device).await.unwrap(), PlaybackState::Paused);
        assert_eq!(transport.count("input press"), 1);
        assert_eq!(transport.count("input keyevent 85"), 2);
    }

    #[tokio::test]
    async fn test_invalid_key_rejected_without_device_call() {
        let (transport, state) = setup();

        for path in ["/input/85;reboot", "/input/", "/input/85/86", "/input/home"] {
            let response = route(&Method::GET, path, &state).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", path);
        }
        assert!(transport.commands().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_is_bad_gateway() {
        let (transport, state) = setup();
        transport.fail_on("input keyevent 85", "device offline");

        let response = route(&Method::GET, "/input/85", &state).await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(body_text(response).await.contains("device offline"));
    }

    #[tokio::test]
    async fn test_status_reports_gate() {
        let (_transport, state) = setup();
        state.gate.record_observation(PlaybackState::Paused);
        state.gate.set_suspended(true);

        let response = route(&Method::GET, "/status", &state).await;

        assert_eq!(response.status(), StatusCode::OK);
        let report: StatusReport = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(
            report,
            StatusReport {
                device: "192.168.1.20:5555".to_string(),
                state: PlaybackState::Paused,
                suspended: true,
            }
        );
    }

    #[tokio::test]
    async fn test_health_and_metrics() {
        let (_transport, state) = setup();

        let health = route(&Method::GET, "/health", &state).await;
        assert_eq!(health.status(), StatusCode::OK);
        assert_eq!(body_text(health).await, "OK");

        let metrics = route(&Method::GET, "/metrics", &state).await;
        assert_eq!(metrics.status(), StatusCode::OK);
        assert!(body_text(metrics).await.contains("autoplay_cycles_total"));
    }

    #[tokio::test]
    async fn test_unknown_routes_not_found() {
        let (transport, state) = setup();

        assert_eq!(route(&Method::GET, "/", &state).await.status(), StatusCode::NOT_FOUND);
        assert_eq!(route(&Method::GET, "/input", &state).await.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            route(&Method::POST, "/input/85", &state).await.status(),
            StatusCode::NOT_FOUND
        );
        assert!(transport.commands().is_empty());
    }

    #[tokio::test]
    async fn test_serves_over_tcp() {
        let (_transport, state) = setup();
        let server = ControlServer::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let addr = server.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let handle = tokio::spawn(server.serve(Arc::new(state), shutdown_rx));

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.ends_with("OK"));

        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();
    }
}
