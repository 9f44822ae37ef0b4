//! Ticket API handlers.

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::error::{ApiError, ApiResult};
use super::state::HttpState;
use crate::domain::ports::{CreateTicketRequest, TicketPayload, TransitionOutcome};
use crate::domain::ticket::{
    Category, CustomerTier, ServiceKind, ServiceType, TicketAction, TicketStatus,
};

/// Request body for ticket creation.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct CreateTicketBody {
    /// Opaque customer identifier, e.g. the phone number typed at the kiosk.
    #[schema(example = "081-555-0101")]
    pub customer_identifier: String,
    pub display_name: Option<String>,
    pub category: Category,
    /// Fee class to register an unknown identifier with. Defaults to
    /// `general`; an existing directory record always wins.
    pub tier: Option<CustomerTier>,
    pub kind: ServiceKind,
    pub service: ServiceType,
    /// Required for bookings; walk-ins ignore it.
    pub requested_time: Option<DateTime<Utc>>,
}

impl From<CreateTicketBody> for CreateTicketRequest {
    fn from(body: CreateTicketBody) -> Self {
        Self {
            customer_identifier: body.customer_identifier,
            display_name: body.display_name,
            category: body.category,
            tier: body.tier.unwrap_or(CustomerTier::General),
            kind: body.kind,
            service: body.service,
            requested_time: body.requested_time,
        }
    }
}

/// Ticket representation returned by every ticket endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketBody {
    pub id: Uuid,
    #[schema(example = "WS-001")]
    pub display_number: String,
    pub customer_id: Uuid,
    pub category: Category,
    pub kind: ServiceKind,
    pub service: ServiceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_time: Option<DateTime<Utc>>,
    /// Price in minor currency units, fixed at creation.
    #[schema(example = 5000)]
    pub price: u32,
    pub status: TicketStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "W03")]
    pub locker: Option<String>,
    /// True while the ticket has been in processing beyond the overtime
    /// limit, as of the read instant.
    pub overtime: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub called_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl From<TicketPayload> for TicketBody {
    fn from(payload: TicketPayload) -> Self {
        Self {
            id: payload.id,
            display_number: payload.display_number,
            customer_id: payload.customer_id,
            category: payload.category,
            kind: payload.kind,
            service: payload.service,
            requested_time: payload.requested_time,
            price: payload.price,
            status: payload.status,
            locker: payload.locker,
            overtime: payload.overtime,
            created_at: payload.created_at,
            called_at: payload.called_at,
            started_at: payload.started_at,
            completed_at: payload.completed_at,
            cancelled_at: payload.cancelled_at,
        }
    }
}

/// Request body for a lifecycle transition.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct TransitionBody {
    pub action: TicketAction,
}

/// Response body for a lifecycle transition.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransitionResponseBody {
    pub ticket: TicketBody,
    /// False only when `start` found the ticket's locker partition
    /// exhausted; the service proceeds without a locker.
    pub locker_assigned: bool,
}

impl From<TransitionOutcome> for TransitionResponseBody {
    fn from(outcome: TransitionOutcome) -> Self {
        Self {
            ticket: outcome.ticket.into(),
            locker_assigned: outcome.locker_assigned,
        }
    }
}

/// Query parameters for the ticket listing.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListTicketsQuery {
    /// Restrict to one customer's tickets instead of the active queue.
    pub customer: Option<Uuid>,
}

/// Create a queue ticket.
#[utoipa::path(
    post,
    path = "/api/v1/tickets",
    request_body = CreateTicketBody,
    responses(
        (status = 201, description = "Ticket created", body = TicketBody),
        (status = 400, description = "Malformed or invalid request", body = ApiError),
        (status = 503, description = "Number allocation kept colliding or the store is down", body = ApiError)
    ),
    tags = ["tickets"],
    operation_id = "createTicket"
)]
#[post("/api/v1/tickets")]
pub async fn create_ticket(
    state: web::Data<HttpState>,
    body: web::Json<CreateTicketBody>,
) -> ApiResult<HttpResponse> {
    let payload = state
        .ticket_flow
        .create_ticket(body.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(TicketBody::from(payload)))
}

/// Fetch one ticket.
#[utoipa::path(
    get,
    path = "/api/v1/tickets/{ticket_id}",
    params(("ticket_id" = Uuid, Path, description = "Ticket identifier")),
    responses(
        (status = 200, description = "Ticket", body = TicketBody),
        (status = 404, description = "No such ticket", body = ApiError)
    ),
    tags = ["tickets"],
    operation_id = "getTicket"
)]
#[get("/api/v1/tickets/{ticket_id}")]
pub async fn get_ticket(
    state: web::Data<HttpState>,
    ticket_id: web::Path<Uuid>,
) -> ApiResult<web::Json<TicketBody>> {
    let payload = state.ticket_query.get(ticket_id.into_inner()).await?;
    Ok(web::Json(payload.into()))
}

/// List tickets: the active queue by default, or one customer's history.
#[utoipa::path(
    get,
    path = "/api/v1/tickets",
    params(ListTicketsQuery),
    responses(
        (status = 200, description = "Tickets, oldest first", body = [TicketBody])
    ),
    tags = ["tickets"],
    operation_id = "listTickets"
)]
#[get("/api/v1/tickets")]
pub async fn list_tickets(
    state: web::Data<HttpState>,
    query: web::Query<ListTicketsQuery>,
) -> ApiResult<web::Json<Vec<TicketBody>>> {
    let payloads = match query.customer {
        Some(customer_id) => state.ticket_query.list_by_customer(customer_id).await?,
        None => state.ticket_query.list_active().await?,
    };
    Ok(web::Json(payloads.into_iter().map(Into::into).collect()))
}

/// Apply a staff action to a ticket.
#[utoipa::path(
    post,
    path = "/api/v1/tickets/{ticket_id}/transition",
    params(("ticket_id" = Uuid, Path, description = "Ticket identifier")),
    request_body = TransitionBody,
    responses(
        (status = 200, description = "Transition applied", body = TransitionResponseBody),
        (status = 404, description = "No such ticket", body = ApiError),
        (status = 409, description = "Action not valid from the current status", body = ApiError)
    ),
    tags = ["tickets"],
    operation_id = "transitionTicket"
)]
#[post("/api/v1/tickets/{ticket_id}/transition")]
pub async fn transition_ticket(
    state: web::Data<HttpState>,
    ticket_id: web::Path<Uuid>,
    body: web::Json<TransitionBody>,
) -> ApiResult<web::Json<TransitionResponseBody>> {
    let outcome = state
        .ticket_flow
        .transition(ticket_id.into_inner(), body.action)
        .await?;
    Ok(web::Json(outcome.into()))
}
