use std::sync::Arc;

use process_payment_worker::run;

#[tokio::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(
		env_logger::Env::default().default_filter_or("info"),
	)
	.init();

	let config = Arc::new(
		process_payment_worker::config::Config::load()
			.expect("Failed to load configuration"),
	);
	run(config).await
}
