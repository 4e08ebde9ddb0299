//! Wire types exchanged with the scheduling backend.

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// One slot of the stored schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub timestamp: Timestamp,
    /// Booked slots are the non-available partition; everything else is available.
    pub is_booked: bool,
}

/// Body of `POST /api/schedule`.
///
/// Booked and free slots are not distinguished here; the backend derives
/// booking state from its own request records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePayload {
    pub dates: Vec<String>,
}

/// An appointment request made by a client through the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub chat_id: i64,
    pub service_type: String,
    pub date: Timestamp,
    pub is_approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub user_full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_custom_data: Option<String>,
}

/// Body of `POST /api/logs`.
#[derive(Debug, Clone, Serialize)]
pub struct LogMessage {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_entry_reads_backend_shape() {
        let entries: Vec<ScheduleEntry> = serde_json::from_str(
            r#"[{"timestamp":1735722000000,"isBooked":false},{"timestamp":1735808400000,"isBooked":true}]"#,
        )
        .unwrap();

        assert_eq!(entries.len(), 2);
        assert!(!entries[0].is_booked);
        assert!(entries[1].is_booked);
        assert_eq!(entries[1].timestamp.millis(), 1_735_808_400_000);
    }

    #[test]
    fn test_request_optional_fields() {
        let request: Request = serde_json::from_str(
            r#"{"chatId":42,"serviceType":"medium","date":1735722000000,"isApproved":true,"userFullName":"Anna K"}"#,
        )
        .unwrap();

        assert_eq!(request.chat_id, 42);
        assert_eq!(request.username, None);
        assert_eq!(request.user_custom_data, None);

        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("username"));
        assert!(json.contains("\"userFullName\":\"Anna K\""));
    }
}
