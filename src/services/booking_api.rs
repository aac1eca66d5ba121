use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The request body for `POST /bookings`, matching the backend schema
/// field-for-field. Assembled once per submission attempt and not mutated
/// afterwards. The GST share travels as `taxAmount`, which is what the
/// backend stores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub room: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub children: u32,
    pub number_of_rooms: u32,
    pub adults: u32,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub nights: u32,
    pub price_per_night: i64,
    pub total_price: i64,
    pub tax_amount: i64,
    pub discount_amount: i64,
    pub payment_status: String,
    pub status: String,
    pub special_requests: String,
}

/// What a successful submission gives back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingConfirmation {
    pub booking_reference: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("booking service unreachable: {0}")]
    Unreachable(String),
    #[error("booking rejected: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait BookingGateway: Send + Sync {
    async fn submit(&self, payload: &BookingPayload)
    -> Result<BookingConfirmation, SubmissionError>;
}

/// No email is collected from the guest; the backend requires one, so it is
/// synthesized from the cleaned phone number.
#[must_use]
pub fn guest_email_from_phone(phone_digits: &str) -> String {
    format!("{phone_digits}@guest.com")
}

/// Interprets the `POST /bookings` response body. A `success: false` body is
/// a rejection carrying the backend's message; a success without a booking
/// reference is still a success (the reference is assigned later by staff).
pub fn parse_booking_response(body: &Value) -> Result<BookingConfirmation, SubmissionError> {
    if body.get("success").and_then(Value::as_bool) != Some(true) {
        let reason = body
            .get("error")
            .or_else(|| body.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("Failed to submit booking");
        return Err(SubmissionError::Rejected(reason.to_string()));
    }
    let booking_reference = body
        .get("booking")
        .and_then(|b| b.get("bookingReference"))
        .and_then(Value::as_str)
        .map(str::to_string);
    Ok(BookingConfirmation { booking_reference })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn email_is_synthesized_from_phone() {
        assert_eq!(guest_email_from_phone("9876543210"), "9876543210@guest.com");
    }

    #[test]
    fn accepted_booking_carries_its_reference() {
        let body = json!({
            "success": true,
            "booking": { "_id": "b1", "bookingReference": "AAM-2026-0042" }
        });
        assert_eq!(
            parse_booking_response(&body).unwrap(),
            BookingConfirmation {
                booking_reference: Some("AAM-2026-0042".to_string())
            }
        );
    }

    #[test]
    fn accepted_booking_without_reference_is_still_accepted() {
        let body = json!({ "success": true });
        assert_eq!(
            parse_booking_response(&body).unwrap(),
            BookingConfirmation {
                booking_reference: None
            }
        );
    }

    #[test]
    fn rejection_carries_the_backend_message() {
        let body = json!({ "success": false, "error": "dates no longer available" });
        assert_eq!(
            parse_booking_response(&body),
            Err(SubmissionError::Rejected(
                "dates no longer available".to_string()
            ))
        );
    }

    #[test]
    fn missing_success_flag_is_a_rejection() {
        let body = json!({ "booking": {} });
        assert!(matches!(
            parse_booking_response(&body),
            Err(SubmissionError::Rejected(_))
        ));
    }

    #[test]
    fn payload_serializes_with_backend_field_names() {
        let payload = BookingPayload {
            room: "r1".to_string(),
            check_in: NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2026, 8, 12).unwrap(),
            guests: 4,
            children: 1,
            number_of_rooms: 2,
            adults: 3,
            guest_name: "Asha Rao".to_string(),
            guest_email: "9876543210@guest.com".to_string(),
            guest_phone: "9876543210".to_string(),
            nights: 2,
            price_per_night: 3500,
            total_price: 16520,
            tax_amount: 2520,
            discount_amount: 0,
            payment_status: "pending".to_string(),
            status: "confirmed".to_string(),
            special_requests: String::new(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["room"], "r1");
        assert_eq!(value["checkIn"], "2026-08-10");
        assert_eq!(value["numberOfRooms"], 2);
        assert_eq!(value["guestEmail"], "9876543210@guest.com");
        assert_eq!(value["taxAmount"], 2520);
        assert_eq!(value["paymentStatus"], "pending");
        assert_eq!(value["status"], "confirmed");
    }
}
