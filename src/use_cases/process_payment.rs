use std::io::{self, Write};

use log::{error, info, warn};
use serde_json::{Map, Value};

use crate::domain::errors::PaymentJobError;
use crate::domain::payment::PaymentDetails;
use crate::domain::settlement::PaymentSettlement;

/// Handler for `process-payment` jobs.
///
/// Stateless: every call reads the job variables, prints the payment and
/// reports either success or a [`PaymentJobError`]. Retries and timeouts
/// belong to the engine.
#[derive(Clone)]
pub struct ProcessPaymentUseCase<S: PaymentSettlement> {
	settlement: S,
}

impl<S: PaymentSettlement> ProcessPaymentUseCase<S> {
	pub fn new(settlement: S) -> Self {
		Self { settlement }
	}

	/// Writes `Customer ID` and `Amount` lines to `out` on success. On any
	/// fault a single line goes to `err` and the fault is returned as is.
	pub fn execute<O, E>(
		&self,
		variables: &Map<String, Value>,
		out: &mut O,
		err: &mut E,
	) -> Result<PaymentDetails, PaymentJobError>
	where
		O: Write,
		E: Write,
	{
		self.process(variables, out).inspect_err(|e| {
			if e.is_business_error() {
				warn!("Payment was declined: {e}");
			}
			if let Err(write_err) =
				writeln!(err, "Error while processing payment: {e}")
			{
				error!("Failed to write to the error stream: {write_err}");
			}
		})
	}

	pub fn execute_with_std_streams(
		&self,
		variables: &Map<String, Value>,
	) -> Result<PaymentDetails, PaymentJobError> {
		let stdout = io::stdout();
		let stderr = io::stderr();
		self.execute(variables, &mut stdout.lock(), &mut stderr.lock())
	}

	fn process<O: Write>(
		&self,
		variables: &Map<String, Value>,
		out: &mut O,
	) -> Result<PaymentDetails, PaymentJobError> {
		info!("Payment Details Received");

		let payment = PaymentDetails::from_variables(variables)?;

		if !self.settlement.settle(&payment) {
			return Err(PaymentJobError::PaymentFailed);
		}

		writeln!(out, "Customer ID: {}", payment.customer_id)?;
		writeln!(out, "Amount: {}", format_amount(payment.amount))?;
		out.flush()?;

		Ok(payment)
	}
}

/// Plain notation with at least one fractional digit for magnitudes in
/// `[1e-3, 1e7)`, `1.0E20` style outside of it.
pub fn format_amount(amount: f64) -> String {
	if amount.is_nan() {
		return "NaN".to_string();
	}
	if amount.is_infinite() {
		return if amount > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
	}

	let magnitude = amount.abs();
	if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
		// Debug keeps the decimal point on whole amounts ("100.0").
		return format!("{amount:?}");
	}

	let scientific = format!("{amount:e}");
	match scientific.split_once('e') {
		Some((mantissa, exponent)) if mantissa.contains('.') => {
			format!("{mantissa}E{exponent}")
		}
		Some((mantissa, exponent)) => format!("{mantissa}.0E{exponent}"),
		None => scientific,
	}
}
