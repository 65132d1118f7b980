use std::io;
use std::sync::Arc;
use std::time::Duration;

use log::info;
use reqwest::Client;

use crate::config::Config;
use crate::domain::settlement::ApproveAll;
use crate::infrastructure::engine::rest_job_client::RestJobClient;
use crate::infrastructure::workers::job_worker::{WorkerSettings, job_worker};
use crate::use_cases::process_payment::ProcessPaymentUseCase;

pub mod config;

pub mod domain {
	pub mod errors;
	pub mod job;
	pub mod job_client;
	pub mod payment;
	pub mod settlement;
}

pub mod use_cases {
	pub mod process_payment;
}

pub mod infrastructure {
	pub mod engine {
		pub mod rest_job_client;
		pub mod schema;
	}

	pub mod workers {
		pub mod job_worker;
	}
}

/// Extra time the HTTP client waits beyond the engine's long-poll timeout.
const HTTP_TIMEOUT_GRACE: Duration = Duration::from_secs(5);

/// Runs the `process-payment` worker until Ctrl+C.
pub async fn run(config: Arc<Config>) -> io::Result<()> {
	let http_client = Client::builder()
		.timeout(Duration::from_millis(config.request_timeout_ms) + HTTP_TIMEOUT_GRACE)
		.build()
		.map_err(io::Error::other)?;

	let client = RestJobClient::new(http_client, config.engine_url.clone());
	let use_case = ProcessPaymentUseCase::new(ApproveAll);
	let settings = WorkerSettings::from(config.as_ref());

	info!("Starting job worker...");
	info!("Engine URL: {}", config.engine_url);
	info!("Worker name: {}", config.worker_name);
	info!(
		"Registered handler: process payment ({}, timeout {} ms)",
		config.job_type, config.job_timeout_ms
	);
	info!("Press Ctrl+C to stop the worker");

	tokio::select! {
		_ = job_worker(client, use_case, settings) => {}
		result = tokio::signal::ctrl_c() => {
			result?;
			info!("Worker stopped gracefully");
		}
	}

	Ok(())
}
