use std::error::Error;
use std::time::Duration;

use async_trait::async_trait;
use derive_more::derive::{Display, Error};
use log::{debug, error};
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::domain::job::{ActivatedJob, JobActivation};
use crate::domain::job_client::JobClient;
use crate::infrastructure::engine::schema::{
	ActivateJobsRequest, ActivateJobsResponse, ActivatedJobResponse,
	CompleteJobRequest, FailJobRequest, ThrowErrorRequest,
};

#[derive(Debug, Display, Error)]
pub enum EngineError {
	#[display("Engine request failed: {source}")]
	Transport { source: reqwest::Error },
	#[display("Could not decode engine response: {source}")]
	Decode { source: reqwest::Error },
	#[display("Engine responded with status {status}: {body}")]
	UnexpectedStatus { status: u16, body: String },
}

/// [`JobClient`] speaking the engine's v2 REST API.
#[derive(Clone)]
pub struct RestJobClient {
	http_client: Client,
	base_url:    String,
}

impl RestJobClient {
	pub fn new(http_client: Client, base_url: impl Into<String>) -> Self {
		Self {
			http_client,
			base_url: base_url.into().trim_end_matches('/').to_string(),
		}
	}

	async fn post<B: Serialize + Sync>(
		&self,
		path: &str,
		body: &B,
	) -> Result<Response, EngineError> {
		let url = format!("{}/v2/jobs{path}", self.base_url);
		debug!("POST {url}");

		let resp = self
			.http_client
			.post(&url)
			.json(body)
			.send()
			.await
			.map_err(|source| EngineError::Transport { source })?;

		if resp.status().is_success() {
			return Ok(resp);
		}

		let status = resp.status().as_u16();
		let body = resp.text().await.unwrap_or_default();
		error!("Engine returned non-success status for {url}: {status}");
		Err(EngineError::UnexpectedStatus { status, body })
	}
}

fn boxed(err: EngineError) -> Box<dyn Error + Send> {
	Box::new(err)
}

fn to_activated_job(job: ActivatedJobResponse) -> ActivatedJob {
	ActivatedJob {
		key:                  job.job_key,
		job_type:             job.job_type,
		process_instance_key: job.process_instance_key,
		element_id:           job.element_id,
		retries:              job.retries,
		deadline:             job.deadline.and_then(|ms| {
			OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000)
				.ok()
		}),
		variables:            job.variables,
	}
}

fn millis(duration: Duration) -> i64 {
	i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

#[async_trait]
impl JobClient for RestJobClient {
	async fn activate_jobs(
		&self,
		activation: &JobActivation,
	) -> Result<Vec<ActivatedJob>, Box<dyn Error + Send>> {
		let request = ActivateJobsRequest {
			job_type:             activation.job_type.clone(),
			worker:               activation.worker.clone(),
			timeout:              millis(activation.timeout),
			max_jobs_to_activate: activation.max_jobs,
			fetch_variable:       activation.fetch_variables.clone(),
			request_timeout:      millis(activation.request_timeout),
		};

		let resp = self.post("/activation", &request).await.map_err(boxed)?;
		let activated: ActivateJobsResponse = resp
			.json()
			.await
			.map_err(|source| boxed(EngineError::Decode { source }))?;

		Ok(activated.jobs.into_iter().map(to_activated_job).collect())
	}

	async fn complete_job(
		&self,
		job_key: i64,
		variables: Map<String, Value>,
	) -> Result<(), Box<dyn Error + Send>> {
		self.post(
			&format!("/{job_key}/completion"),
			&CompleteJobRequest { variables },
		)
		.await
		.map_err(boxed)?;
		Ok(())
	}

	async fn fail_job(
		&self,
		job_key: i64,
		retries: i32,
		error_message: &str,
		retry_back_off: Duration,
	) -> Result<(), Box<dyn Error + Send>> {
		let request = FailJobRequest {
			retries,
			error_message: error_message.to_string(),
			retry_back_off: millis(retry_back_off),
		};
		self.post(&format!("/{job_key}/failure"), &request)
			.await
			.map_err(boxed)?;
		Ok(())
	}

	async fn throw_error(
		&self,
		job_key: i64,
		error_code: &str,
		error_message: &str,
	) -> Result<(), Box<dyn Error + Send>> {
		let request = ThrowErrorRequest {
			error_code:    error_code.to_string(),
			error_message: error_message.to_string(),
		};
		self.post(&format!("/{job_key}/error"), &request)
			.await
			.map_err(boxed)?;
		Ok(())
	}
}
