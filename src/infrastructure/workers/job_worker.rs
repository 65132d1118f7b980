use std::error::Error;
use std::fmt;
use std::time::Duration;

use circuitbreaker_rs::{BreakerError, CircuitBreaker, DefaultPolicy, State};
use log::{debug, error, info, warn};
use serde_json::Map;
use tokio::time::sleep;

use crate::config::Config;
use crate::domain::errors::PAYMENT_FAILED_MESSAGE;
use crate::domain::job::{ActivatedJob, JobActivation, JobResult};
use crate::domain::job_client::JobClient;
use crate::domain::payment::PAYMENT_DETAILS_VARIABLE;
use crate::domain::settlement::PaymentSettlement;
use crate::use_cases::process_payment::{ProcessPaymentUseCase, format_amount};

#[derive(Debug)]
pub struct EngineUnavailable(pub String);

impl fmt::Display for EngineUnavailable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Engine unavailable: {}", self.0)
	}
}

impl Error for EngineUnavailable {}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkerSettings {
	pub job_type:             String,
	pub worker_name:          String,
	pub job_timeout:          Duration,
	pub poll_interval:        Duration,
	pub request_timeout:      Duration,
	pub max_jobs_to_activate: i32,
	pub retry_back_off:       Duration,
	/// How long activation stays paused once the engine breaker opens.
	pub engine_cooldown:      Duration,
}

impl WorkerSettings {
	pub fn activation(&self) -> JobActivation {
		JobActivation {
			job_type:        self.job_type.clone(),
			worker:          self.worker_name.clone(),
			timeout:         self.job_timeout,
			max_jobs:        self.max_jobs_to_activate,
			fetch_variables: vec![PAYMENT_DETAILS_VARIABLE.to_string()],
			request_timeout: self.request_timeout,
		}
	}
}

impl From<&Config> for WorkerSettings {
	fn from(config: &Config) -> Self {
		Self {
			job_type:             config.job_type.clone(),
			worker_name:          config.worker_name.clone(),
			job_timeout:          Duration::from_millis(config.job_timeout_ms),
			poll_interval:        Duration::from_millis(config.poll_interval_ms),
			request_timeout:      Duration::from_millis(config.request_timeout_ms),
			max_jobs_to_activate: config.max_jobs_to_activate,
			retry_back_off:       Duration::from_millis(config.retry_back_off_ms),
			engine_cooldown:      Duration::from_millis(config.engine_cooldown_ms),
		}
	}
}

/// Maps the handler outcome of one job to the result reported to the engine.
pub fn handle_job<S: PaymentSettlement>(
	use_case: &ProcessPaymentUseCase<S>,
	job: &ActivatedJob,
	retry_back_off: Duration,
) -> JobResult {
	info!(
		"Processing payment for job {} (retries: {:?}, deadline: {:?})",
		job.key, job.retries, job.deadline
	);

	match use_case.execute_with_std_streams(&job.variables) {
		Ok(payment) => {
			info!(
				"Payment of {} for customer '{}' processed for job {}",
				format_amount(payment.amount),
				payment.customer_id,
				job.key
			);
			JobResult::Complete {
				variables: Map::new(),
			}
		}
		Err(e) => match e.bpmn_error_code() {
			Some(code) => {
				warn!("Payment failed for job {}", job.key);
				JobResult::ThrowError {
					error_code:    code.to_string(),
					error_message: PAYMENT_FAILED_MESSAGE.to_string(),
				}
			}
			None => {
				let retries = job.remaining_retries();
				error!(
					"Error processing payment for job {}: {e}. Remaining retries: \
					 {retries}",
					job.key
				);
				if retries == 0 {
					error!(
						"No retries remaining for job {}. The engine will raise an \
						 incident.",
						job.key
					);
				}
				JobResult::Fail {
					retries,
					error_message: e.to_string(),
					retry_back_off: if retries > 0 {
						retry_back_off
					} else {
						Duration::ZERO
					},
				}
			}
		},
	}
}

pub async fn report_result<C: JobClient>(
	client: &C,
	job_key: i64,
	result: JobResult,
) -> Result<(), Box<dyn Error + Send>> {
	match result {
		JobResult::Complete { variables } => {
			client.complete_job(job_key, variables).await
		}
		JobResult::ThrowError {
			error_code,
			error_message,
		} => client.throw_error(job_key, &error_code, &error_message).await,
		JobResult::Fail {
			retries,
			error_message,
			retry_back_off,
		} => {
			client
				.fail_job(job_key, retries, &error_message, retry_back_off)
				.await
		}
	}
}

pub struct JobWorker<C: JobClient, S: PaymentSettlement> {
	client:   C,
	use_case: ProcessPaymentUseCase<S>,
	settings: WorkerSettings,
	breaker:  CircuitBreaker<DefaultPolicy, EngineUnavailable>,
}

impl<C: JobClient, S: PaymentSettlement> JobWorker<C, S> {
	pub fn new(
		client: C,
		use_case: ProcessPaymentUseCase<S>,
		settings: WorkerSettings,
	) -> Self {
		let breaker = CircuitBreaker::<DefaultPolicy, EngineUnavailable>::builder()
			.failure_threshold(0.5)
			.cooldown(settings.engine_cooldown)
			.build();
		Self {
			client,
			use_case,
			settings,
			breaker,
		}
	}

	pub fn is_engine_available(&self) -> bool {
		!matches!(self.breaker.current_state(), State::Open)
	}

	/// Activates one batch of jobs and reports a result for each of them.
	/// Returns how many jobs were handled.
	pub async fn poll_once(&self) -> Result<usize, BreakerError<EngineUnavailable>> {
		let activation = &self.settings.activation();
		let client = &self.client;
		let jobs = self
			.breaker
			.call_async(|| async move {
				client
					.activate_jobs(activation)
					.await
					.map_err(|e| EngineUnavailable(e.to_string()))
			})
			.await?;

		for job in &jobs {
			let result = handle_job(&self.use_case, job, self.settings.retry_back_off);
			if let Err(e) = report_result(&self.client, job.key, result).await {
				error!("Failed to report result for job {}: {e}", job.key);
			}
		}

		Ok(jobs.len())
	}

	pub async fn run(self) {
		let mut paused = false;
		loop {
			if !self.is_engine_available() {
				if !paused {
					warn!(
						"Engine circuit is open, pausing job activation for {:?}",
						self.settings.engine_cooldown
					);
					paused = true;
				}
				sleep(self.settings.poll_interval).await;
				continue;
			}
			if paused {
				info!("Engine circuit is no longer open, resuming job activation");
				paused = false;
			}

			match self.poll_once().await {
				Ok(0) => {
					debug!("No {} jobs available, waiting...", self.settings.job_type);
					sleep(self.settings.poll_interval).await;
				}
				Ok(handled) => {
					info!("Handled {handled} {} job(s)", self.settings.job_type);
				}
				Err(BreakerError::Open) => {
					sleep(self.settings.poll_interval).await;
				}
				Err(e) => {
					error!("Failed to activate jobs: {e}");
					sleep(self.settings.poll_interval).await;
				}
			}
		}
	}
}

pub async fn job_worker<C, S>(
	client: C,
	use_case: ProcessPaymentUseCase<S>,
	settings: WorkerSettings,
) where
	C: JobClient,
	S: PaymentSettlement,
{
	JobWorker::new(client, use_case, settings).run().await
}
