use std::collections::VecDeque;
use std::error::Error;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use process_payment_worker::domain::job::{ActivatedJob, JobActivation};
use process_payment_worker::domain::job_client::JobClient;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
	Complete {
		job_key:   i64,
		variables: Map<String, Value>,
	},
	Fail {
		job_key:        i64,
		retries:        i32,
		error_message:  String,
		retry_back_off: Duration,
	},
	ThrowError {
		job_key:       i64,
		error_code:    String,
		error_message: String,
	},
}

#[derive(Debug)]
pub struct EngineDown;

impl fmt::Display for EngineDown {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "engine down")
	}
}

impl Error for EngineDown {}

/// Engine stand-in: hands out queued batches and records every report.
#[derive(Clone, Default)]
pub struct InMemoryJobClient {
	batches:     Arc<Mutex<VecDeque<Vec<ActivatedJob>>>>,
	calls:       Arc<Mutex<Vec<RecordedCall>>>,
	activations: Arc<Mutex<Vec<JobActivation>>>,
	failing:     Arc<Mutex<bool>>,
}

impl InMemoryJobClient {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push_batch(&self, jobs: Vec<ActivatedJob>) {
		self.batches.lock().unwrap().push_back(jobs);
	}

	pub fn set_failing(&self, failing: bool) {
		*self.failing.lock().unwrap() = failing;
	}

	pub fn calls(&self) -> Vec<RecordedCall> {
		self.calls.lock().unwrap().clone()
	}

	pub fn activations(&self) -> Vec<JobActivation> {
		self.activations.lock().unwrap().clone()
	}

	fn check(&self) -> Result<(), Box<dyn Error + Send>> {
		if *self.failing.lock().unwrap() {
			return Err(Box::new(EngineDown));
		}
		Ok(())
	}
}

#[async_trait]
impl JobClient for InMemoryJobClient {
	async fn activate_jobs(
		&self,
		activation: &JobActivation,
	) -> Result<Vec<ActivatedJob>, Box<dyn Error + Send>> {
		self.check()?;
		self.activations.lock().unwrap().push(activation.clone());
		Ok(self.batches.lock().unwrap().pop_front().unwrap_or_default())
	}

	async fn complete_job(
		&self,
		job_key: i64,
		variables: Map<String, Value>,
	) -> Result<(), Box<dyn Error + Send>> {
		self.check()?;
		self.calls
			.lock()
			.unwrap()
			.push(RecordedCall::Complete { job_key, variables });
		Ok(())
	}

	async fn fail_job(
		&self,
		job_key: i64,
		retries: i32,
		error_message: &str,
		retry_back_off: Duration,
	) -> Result<(), Box<dyn Error + Send>> {
		self.check()?;
		self.calls.lock().unwrap().push(RecordedCall::Fail {
			job_key,
			retries,
			error_message: error_message.to_string(),
			retry_back_off,
		});
		Ok(())
	}

	async fn throw_error(
		&self,
		job_key: i64,
		error_code: &str,
		error_message: &str,
	) -> Result<(), Box<dyn Error + Send>> {
		self.check()?;
		self.calls.lock().unwrap().push(RecordedCall::ThrowError {
			job_key,
			error_code: error_code.to_string(),
			error_message: error_message.to_string(),
		});
		Ok(())
	}
}
