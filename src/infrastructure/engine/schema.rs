use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ActivateJobsRequest {
	#[serde(rename = "type")]
	pub job_type:             String,
	pub worker:               String,
	pub timeout:              i64,
	pub max_jobs_to_activate: i32,
	pub fetch_variable:       Vec<String>,
	pub request_timeout:      i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ActivateJobsResponse {
	#[serde(default)]
	pub jobs: Vec<ActivatedJobResponse>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ActivatedJobResponse {
	#[serde(deserialize_with = "deserialize_key")]
	pub job_key:              i64,
	#[serde(rename = "type")]
	pub job_type:             String,
	#[serde(default, deserialize_with = "deserialize_optional_key")]
	pub process_instance_key: Option<i64>,
	#[serde(default)]
	pub element_id:           Option<String>,
	#[serde(default)]
	pub retries:              Option<i32>,
	#[serde(default)]
	pub deadline:             Option<i64>,
	#[serde(default)]
	pub variables:            Map<String, Value>,
}

#[derive(Debug, Serialize, Clone)]
pub struct CompleteJobRequest {
	pub variables: Map<String, Value>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FailJobRequest {
	pub retries:        i32,
	pub error_message:  String,
	pub retry_back_off: i64,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ThrowErrorRequest {
	pub error_code:    String,
	pub error_message: String,
}

/// Engine keys arrive either as JSON numbers or as numeric strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum EngineKey {
	Number(i64),
	Text(String),
}

impl EngineKey {
	fn into_i64<E: serde::de::Error>(self) -> Result<i64, E> {
		match self {
			EngineKey::Number(key) => Ok(key),
			EngineKey::Text(key) => key
				.parse()
				.map_err(|_| E::custom(format!("invalid engine key '{key}'"))),
		}
	}
}

fn deserialize_key<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
	D: Deserializer<'de>,
{
	EngineKey::deserialize(deserializer)?.into_i64()
}

fn deserialize_optional_key<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
	D: Deserializer<'de>,
{
	Option::<EngineKey>::deserialize(deserializer)?
		.map(EngineKey::into_i64)
		.transpose()
}
