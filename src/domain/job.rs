use std::time::Duration;

use serde_json::{Map, Value};
use time::OffsetDateTime;

/// Retries assumed for a job that reports none.
pub const DEFAULT_JOB_RETRIES: i32 = 3;

/// A unit of work handed out by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivatedJob {
	pub key:                  i64,
	pub job_type:             String,
	pub process_instance_key: Option<i64>,
	pub element_id:           Option<String>,
	pub retries:              Option<i32>,
	pub deadline:             Option<OffsetDateTime>,
	pub variables:            Map<String, Value>,
}

impl ActivatedJob {
	/// Retries to report when this attempt fails.
	pub fn remaining_retries(&self) -> i32 {
		self.retries
			.unwrap_or(DEFAULT_JOB_RETRIES)
			.saturating_sub(1)
			.max(0)
	}
}

/// Parameters of one activation (long-poll) request.
#[derive(Debug, Clone, PartialEq)]
pub struct JobActivation {
	pub job_type:        String,
	pub worker:          String,
	pub timeout:         Duration,
	pub max_jobs:        i32,
	pub fetch_variables: Vec<String>,
	pub request_timeout: Duration,
}

/// What the worker reports back to the engine for a handled job.
#[derive(Debug, Clone, PartialEq)]
pub enum JobResult {
	Complete {
		variables: Map<String, Value>,
	},
	ThrowError {
		error_code:    String,
		error_message: String,
	},
	Fail {
		retries:        i32,
		error_message:  String,
		retry_back_off: Duration,
	},
}
