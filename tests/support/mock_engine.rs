use std::sync::{Arc, Mutex};

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::Value;

/// Job key for which the mock engine answers 404.
pub const UNKNOWN_JOB_KEY: i64 = 404;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
	pub path: String,
	pub body: Value,
}

struct EngineState {
	requests:   Arc<Mutex<Vec<RecordedRequest>>>,
	activation: Value,
}

pub struct MockEngine {
	pub url:      String,
	pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
	handle:       ServerHandle,
}

impl MockEngine {
	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.requests.lock().unwrap().clone()
	}

	pub async fn stop(self) {
		self.handle.stop(true).await;
	}
}

async fn record(
	req: HttpRequest,
	body: web::Bytes,
	state: web::Data<EngineState>,
) -> HttpResponse {
	let path = req.path().to_string();
	let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
	state.requests.lock().unwrap().push(RecordedRequest {
		path: path.clone(),
		body,
	});

	if path == "/v2/jobs/activation" {
		return HttpResponse::Ok().json(&state.activation);
	}
	if path.starts_with(&format!("/v2/jobs/{UNKNOWN_JOB_KEY}/")) {
		return HttpResponse::NotFound().body("job not found");
	}
	HttpResponse::NoContent().finish()
}

/// Starts an engine on a random local port that answers activation requests
/// with `activation` and accepts every job report.
pub async fn start_mock_engine(activation: Value) -> MockEngine {
	let requests = Arc::new(Mutex::new(Vec::new()));
	let state = web::Data::new(EngineState {
		requests: requests.clone(),
		activation,
	});

	let server = HttpServer::new(move || {
		App::new()
			.app_data(state.clone())
			.default_service(web::to(record))
	})
	.workers(1)
	.bind(("127.0.0.1", 0))
	.unwrap();
	let port = server.addrs()[0].port();
	let server = server.run();
	let handle = server.handle();
	actix_web::rt::spawn(server);

	MockEngine {
		url: format!("http://127.0.0.1:{port}"),
		requests,
		handle,
	}
}
