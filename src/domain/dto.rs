//! Data Transfer Objects for API requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::id::{
    CalendarId, EPOCH, MACHINE_ID_BITS, MachineId, SEQUENCE_BITS, SnowflakeId, TIMESTAMP_BITS,
};

/// Largest batch a single request may allocate.
pub const MAX_BATCH: u32 = 1000;

/// Standard API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Response code (0 = success, non-zero = error).
    pub code: i32,

    /// Human-readable message.
    pub message: String,

    /// Response data (null on error).
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create a success response.
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            message: "success".to_string(),
            data: Some(data),
        }
    }

    /// Create an error response.
    pub fn error(code: i32, message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            message: message.into(),
            data: None,
        }
    }
}

/// Query parameters for ID generation.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateQuery {
    /// Number of IDs to generate (default: 1, max: 1000).
    #[serde(default = "default_count")]
    pub count: u32,
}

const fn default_count() -> u32 {
    1
}

impl Default for GenerateQuery {
    fn default() -> Self {
        Self {
            count: default_count(),
        }
    }
}

impl GenerateQuery {
    /// Validate the query.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.count == 0 {
            return Err("count must be at least 1".to_string());
        }
        if self.count > MAX_BATCH {
            return Err(format!("count cannot exceed {MAX_BATCH}"));
        }
        Ok(())
    }
}

/// Generic ID response with a list of generated IDs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdResponse<T> {
    /// List of generated IDs.
    pub ids: Vec<T>,
}

impl<T> IdResponse<T> {
    /// Create a new ID response.
    pub const fn new(ids: Vec<T>) -> Self {
        Self { ids }
    }
}

/// Response for raw snowflake ID generation.
pub type SnowflakeIdResponse = IdResponse<SnowflakeId>;

/// Response for calendar-string ID generation.
pub type FormattedIdResponse = IdResponse<CalendarId>;

/// A raw ID broken into its components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedIdResponse {
    /// The raw ID.
    pub id: i64,

    /// Allocation time in Unix milliseconds.
    pub timestamp: i64,

    /// Allocation time (RFC 3339, UTC).
    pub created_at: String,

    /// Machine identity of the allocating worker.
    pub machine_id: u16,

    /// Sequence within the allocation millisecond.
    pub sequence: u16,
}

impl DecodedIdResponse {
    /// Decompose `id`.
    #[must_use]
    pub fn from_id(id: SnowflakeId) -> Self {
        Self {
            id: id.as_i64(),
            timestamp: id.timestamp_millis(),
            created_at: id
                .created_at()
                .map(|dt| dt.to_rfc3339())
                .unwrap_or_default(),
            machine_id: id.machine_id(),
            sequence: id.sequence(),
        }
    }
}

/// Generator layout.
///
/// Contains everything a consumer needs to decode IDs offline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorInfoResponse {
    /// Configured machine identity.
    pub machine_id: u16,

    /// Custom epoch timestamp in milliseconds.
    pub epoch: i64,

    /// Number of bits for the timestamp.
    pub timestamp_bits: u8,

    /// Number of bits for the machine identity.
    pub machine_bits: u8,

    /// Number of bits for the sequence.
    pub sequence_bits: u8,
}

impl GeneratorInfoResponse {
    /// Describe a generator running as `machine_id`.
    #[must_use]
    pub const fn new(machine_id: MachineId) -> Self {
        Self {
            machine_id: machine_id.get(),
            epoch: EPOCH,
            timestamp_bits: TIMESTAMP_BITS,
            machine_bits: MACHINE_ID_BITS,
            sequence_bits: SEQUENCE_BITS,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,

    /// Service version.
    pub version: String,
}

/// Readiness check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyResponse {
    /// Overall readiness status.
    pub ready: bool,

    /// Individual component statuses.
    pub components: ReadyComponents,
}

/// Component readiness statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyComponents {
    /// Whether the clock is at or past the generator's last timestamp.
    pub clock: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_success() {
        let response = ApiResponse::success(vec![1, 2, 3]);
        assert_eq!(response.code, 0);
        assert_eq!(response.message, "success");
        assert_eq!(response.data, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_api_response_error() {
        let response = ApiResponse::<()>::error(5004, "clock moved backwards");
        assert_eq!(response.code, 5004);
        assert_eq!(response.message, "clock moved backwards");
        assert!(response.data.is_none());
    }

    #[test]
    fn test_generate_query_validation() {
        assert!(GenerateQuery { count: 10 }.validate().is_ok());
        assert!(GenerateQuery { count: 1000 }.validate().is_ok());
        assert!(GenerateQuery { count: 0 }.validate().is_err());
        assert!(GenerateQuery { count: 1001 }.validate().is_err());
        assert_eq!(GenerateQuery::default().count, 1);
    }

    #[test]
    fn test_decoded_response() {
        let machine = MachineId::try_from(7).unwrap();
        let id = SnowflakeId::compose(EPOCH + 1_000, machine, 3);

        let decoded = DecodedIdResponse::from_id(id);
        assert_eq!(decoded.id, id.as_i64());
        assert_eq!(decoded.timestamp, EPOCH + 1_000);
        assert_eq!(decoded.created_at, "2024-01-01T00:00:01+00:00");
        assert_eq!(decoded.machine_id, 7);
        assert_eq!(decoded.sequence, 3);
    }

    #[test]
    fn test_snowflake_response_serializes_as_numbers() {
        let id = SnowflakeId::from_raw(4096);
        let json = serde_json::to_value(SnowflakeIdResponse::new(vec![id])).unwrap();
        assert_eq!(json["ids"][0], 4096);
    }
}
