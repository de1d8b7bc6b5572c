//! Domain models for the identifier worker.
//!
//! This module contains the identifier layout and the API contracts.

pub mod dto;
pub mod id;

pub use dto::{
    ApiResponse, DecodedIdResponse, FormattedIdResponse, GenerateQuery, GeneratorInfoResponse,
    HealthResponse, IdResponse, ReadyComponents, ReadyResponse, SnowflakeIdResponse,
};
pub use id::{CalendarId, DEFAULT_MACHINE_ID, EPOCH, MachineId, SnowflakeId};
