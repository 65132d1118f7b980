use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::job::{ActivatedJob, JobActivation};

#[async_trait]
pub trait JobClient: Send + Sync + 'static {
	async fn activate_jobs(
		&self,
		activation: &JobActivation,
	) -> Result<Vec<ActivatedJob>, Box<dyn std::error::Error + Send>>;
	async fn complete_job(
		&self,
		job_key: i64,
		variables: Map<String, Value>,
	) -> Result<(), Box<dyn std::error::Error + Send>>;
	async fn fail_job(
		&self,
		job_key: i64,
		retries: i32,
		error_message: &str,
		retry_back_off: Duration,
	) -> Result<(), Box<dyn std::error::Error + Send>>;
	async fn throw_error(
		&self,
		job_key: i64,
		error_code: &str,
		error_message: &str,
	) -> Result<(), Box<dyn std::error::Error + Send>>;
}
