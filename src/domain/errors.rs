use derive_more::derive::{Display, Error};

pub const PAYMENT_FAILED_CODE: &str = "PAYMENT_FAILED";
pub const PAYMENT_FAILED_MESSAGE: &str = "Payment failed";

/// Faults raised while handling a `process-payment` job.
///
/// `PaymentFailed` is a business error: the engine routes it to the error
/// boundary of the surrounding process. Every other variant is a technical
/// fault that the engine answers with its own retry policy.
#[derive(Debug, Display, Error)]
pub enum PaymentJobError {
	#[display("Payment failed")]
	PaymentFailed,
	#[display("Missing field '{field}'")]
	MissingField { field: &'static str },
	#[display("Field '{field}' is not a {expected}")]
	InvalidField {
		field:    &'static str,
		expected: &'static str,
	},
	#[display("Could not write payment details: {source}")]
	Output { source: std::io::Error },
}

impl PaymentJobError {
	pub fn bpmn_error_code(&self) -> Option<&'static str> {
		match self {
			PaymentJobError::PaymentFailed => Some(PAYMENT_FAILED_CODE),
			_ => None,
		}
	}

	pub fn is_business_error(&self) -> bool {
		self.bpmn_error_code().is_some()
	}
}

impl From<std::io::Error> for PaymentJobError {
	fn from(source: std::io::Error) -> Self {
		PaymentJobError::Output { source }
	}
}
