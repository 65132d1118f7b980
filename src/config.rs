use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
	pub engine_url:           String,
	pub worker_name:          String,
	pub job_type:             String,
	pub job_timeout_ms:       u64,
	pub poll_interval_ms:     u64,
	pub request_timeout_ms:   u64,
	pub max_jobs_to_activate: i32,
	pub retry_back_off_ms:    u64,
	pub engine_cooldown_ms:   u64,
}

impl Config {
	pub fn load() -> Result<Self, config::ConfigError> {
		let config_builder = config::Config::builder()
			.set_default("engine_url", "http://localhost:8080")?
			.set_default("worker_name", "process-payment-worker")?
			.set_default("job_type", "process-payment")?
			.set_default("job_timeout_ms", 30000)?
			.set_default("poll_interval_ms", 1000)?
			.set_default("request_timeout_ms", 10000)?
			.set_default("max_jobs_to_activate", 32)?
			.set_default("retry_back_off_ms", 5000)?
			.set_default("engine_cooldown_ms", 10000)?
			.add_source(config::Environment::with_prefix("APP"))
			.build()?;

		config_builder.try_deserialize()
	}
}
