//! Locker inventory handlers.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::error::{ApiError, ApiResult};
use super::state::HttpState;
use crate::domain::locker::{LockerPartition, LockerStatus};
use crate::domain::ports::LockerPayload;

/// Locker representation returned by the inventory endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LockerBody {
    #[schema(example = "W03")]
    pub code: String,
    pub partition: LockerPartition,
    pub status: LockerStatus,
    /// Ticket currently holding the locker, when occupied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<Uuid>,
}

impl From<LockerPayload> for LockerBody {
    fn from(payload: LockerPayload) -> Self {
        Self {
            code: payload.code,
            partition: payload.partition,
            status: payload.status,
            ticket_id: payload.ticket_id,
        }
    }
}

/// Query parameters for the locker listing.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListLockersQuery {
    /// Restrict to one partition.
    pub partition: Option<LockerPartition>,
}

/// List the locker inventory, ordered by code.
#[utoipa::path(
    get,
    path = "/api/v1/lockers",
    params(ListLockersQuery),
    responses(
        (status = 200, description = "Lockers", body = [LockerBody]),
        (status = 503, description = "Locker store is unreachable", body = ApiError)
    ),
    tags = ["lockers"],
    operation_id = "listLockers"
)]
#[get("/api/v1/lockers")]
pub async fn list_lockers(
    state: web::Data<HttpState>,
    query: web::Query<ListLockersQuery>,
) -> ApiResult<web::Json<Vec<LockerBody>>> {
    let payloads = state.locker_query.list(query.partition).await?;
    Ok(web::Json(payloads.into_iter().map(Into::into).collect()))
}
