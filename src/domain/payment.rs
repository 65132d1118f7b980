use serde_json::{Map, Value};

use crate::domain::errors::PaymentJobError;

pub const PAYMENT_DETAILS_VARIABLE: &str = "paymentDetails";
const CUSTOMER_ID_FIELD: &str = "customerId";
const AMOUNT_FIELD: &str = "amount";

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentDetails {
	pub customer_id: String,
	pub amount:      f64,
}

impl PaymentDetails {
	/// Reads the `paymentDetails` job variable.
	///
	/// The shape is not checked up front: each lookup fails on its own when
	/// the key is absent or carries the wrong JSON type.
	pub fn from_variables(
		variables: &Map<String, Value>,
	) -> Result<Self, PaymentJobError> {
		let details = variables
			.get(PAYMENT_DETAILS_VARIABLE)
			.ok_or(PaymentJobError::MissingField {
				field: PAYMENT_DETAILS_VARIABLE,
			})?
			.as_object()
			.ok_or(PaymentJobError::InvalidField {
				field:    PAYMENT_DETAILS_VARIABLE,
				expected: "object",
			})?;

		let customer_id = details
			.get(CUSTOMER_ID_FIELD)
			.ok_or(PaymentJobError::MissingField {
				field: CUSTOMER_ID_FIELD,
			})?
			.as_str()
			.ok_or(PaymentJobError::InvalidField {
				field:    CUSTOMER_ID_FIELD,
				expected: "string",
			})?;

		// Only decimal numbers: an integer amount is a type mismatch.
		let amount = details
			.get(AMOUNT_FIELD)
			.ok_or(PaymentJobError::MissingField {
				field: AMOUNT_FIELD,
			})
			.map(|value| value.as_f64().filter(|_| value.is_f64()))?
			.ok_or(PaymentJobError::InvalidField {
				field:    AMOUNT_FIELD,
				expected: "number",
			})?;

		Ok(Self {
			customer_id: customer_id.to_string(),
			amount,
		})
	}
}
