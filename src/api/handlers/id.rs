//! ID generation handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::api::state::AppState;
use crate::domain::{
    ApiResponse, DecodedIdResponse, FormattedIdResponse, GenerateQuery, GeneratorInfoResponse,
    SnowflakeId, SnowflakeIdResponse,
};
use crate::error::{AppError, Result};

/// Query parameters for decoding.
#[derive(Debug, Deserialize)]
pub struct DecodeQuery {
    /// Raw snowflake id.
    pub id: i64,
}

/// Generate raw snowflake IDs.
pub async fn generate_snowflake(
    State(state): State<AppState>,
    Query(query): Query<GenerateQuery>,
) -> Result<Json<ApiResponse<SnowflakeIdResponse>>> {
    query.validate().map_err(AppError::BadRequest)?;

    let ids = state.generator.next_ids(query.count as usize)?;
    metrics::counter!("timeline_ids_generated_total", "form" => "snowflake")
        .increment(u64::from(query.count));

    Ok(Json(ApiResponse::success(SnowflakeIdResponse::new(ids))))
}

/// Generate calendar-string IDs.
pub async fn generate_formatted(
    State(state): State<AppState>,
    Query(query): Query<GenerateQuery>,
) -> Result<Json<ApiResponse<FormattedIdResponse>>> {
    query.validate().map_err(AppError::BadRequest)?;

    let ids = state.formatted_service.generate(query.count)?;
    metrics::counter!("timeline_ids_generated_total", "form" => "formatted")
        .increment(u64::from(query.count));

    Ok(Json(ApiResponse::success(FormattedIdResponse::new(ids))))
}

/// Break a raw ID into its components.
pub async fn decode(
    Query(query): Query<DecodeQuery>,
) -> Result<Json<ApiResponse<DecodedIdResponse>>> {
    if query.id < 0 {
        return Err(AppError::BadRequest("id must not be negative".to_string()));
    }

    let id = SnowflakeId::from_raw(query.id);
    Ok(Json(ApiResponse::success(DecodedIdResponse::from_id(id))))
}

/// Describe the generator's layout and identity.
pub async fn info(State(state): State<AppState>) -> Json<ApiResponse<GeneratorInfoResponse>> {
    Json(ApiResponse::success(GeneratorInfoResponse::new(
        state.generator.machine_id(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use crate::config::AppConfig;
    use crate::domain::EPOCH;
    use crate::error::IdError;
    use crate::service::SharedGenerator;
    use crate::service::clock::manual::ManualClock;

    fn test_state() -> AppState {
        AppState::new(
            Arc::new(AppConfig::default()),
            Arc::new(SharedGenerator::system(12).unwrap()),
        )
    }

    #[tokio::test]
    async fn test_generate_snowflake_batch() {
        let Json(response) =
            generate_snowflake(State(test_state()), Query(GenerateQuery { count: 5 }))
                .await
                .unwrap();

        let ids = response.data.unwrap().ids;
        assert_eq!(ids.len(), 5);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert!(ids.iter().all(|id| id.machine_id() == 12));
    }

    #[tokio::test]
    async fn test_generate_rejects_bad_count() {
        let err = generate_snowflake(State(test_state()), Query(GenerateQuery { count: 0 }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = generate_formatted(State(test_state()), Query(GenerateQuery { count: 1001 }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_generate_formatted_batch() {
        let Json(response) =
            generate_formatted(State(test_state()), Query(GenerateQuery { count: 3 }))
                .await
                .unwrap();

        let ids = response.data.unwrap().ids;
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|id| id.as_str().len() == 20));
    }

    #[tokio::test]
    async fn test_generate_refuses_on_clock_regression() {
        let clock = Arc::new(ManualClock::new(EPOCH + 100));
        let generator = Arc::new(SharedGenerator::with_clock(12, clock.clone()).unwrap());
        let state = AppState::new(Arc::new(AppConfig::default()), generator);
        state.generator.next_id().unwrap();

        clock.set(EPOCH + 95);
        let err = generate_snowflake(State(state.clone()), Query(GenerateQuery::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Generator(IdError::ClockRegression { .. })));
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);

        let err = generate_formatted(State(state), Query(GenerateQuery::default()))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_decode() {
        let raw = (1_000_i64 << 22) | (7 << 12) | 9;
        let Json(response) = decode(Query(DecodeQuery { id: raw })).await.unwrap();

        let decoded = response.data.unwrap();
        assert_eq!(decoded.timestamp, EPOCH + 1_000);
        assert_eq!(decoded.machine_id, 7);
        assert_eq!(decoded.sequence, 9);

        assert!(decode(Query(DecodeQuery { id: -1 })).await.is_err());
    }

    #[tokio::test]
    async fn test_info() {
        let Json(response) = info(State(test_state())).await;

        let info = response.data.unwrap();
        assert_eq!(info.machine_id, 12);
        assert_eq!(info.epoch, EPOCH);
        assert_eq!(
            (info.timestamp_bits, info.machine_bits, info.sequence_bits),
            (41, 10, 12)
        );
    }
}
