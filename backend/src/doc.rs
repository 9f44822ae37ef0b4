//! OpenAPI documentation for the REST surface.

use utoipa::OpenApi;

use crate::domain::ErrorCode;
use crate::domain::locker::{LockerPartition, LockerStatus};
use crate::domain::ticket::{
    Category, CustomerTier, ServiceKind, ServiceType, TicketAction, TicketStatus,
};
use crate::inbound::http::error::ApiError;
use crate::inbound::http::lockers::LockerBody;
use crate::inbound::http::tickets::{
    CreateTicketBody, TicketBody, TransitionBody, TransitionResponseBody,
};

/// OpenAPI document for the queue API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Facility queue backend API",
        description = "Walk-in and booking queue management with locker assignment."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::tickets::create_ticket,
        crate::inbound::http::tickets::get_ticket,
        crate::inbound::http::tickets::list_tickets,
        crate::inbound::http::tickets::transition_ticket,
        crate::inbound::http::lockers::list_lockers,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ApiError,
        ErrorCode,
        CreateTicketBody,
        TicketBody,
        TransitionBody,
        TransitionResponseBody,
        LockerBody,
        Category,
        CustomerTier,
        ServiceKind,
        ServiceType,
        TicketStatus,
        TicketAction,
        LockerPartition,
        LockerStatus,
    )),
    tags(
        (name = "tickets", description = "Queue ticket creation and lifecycle"),
        (name = "lockers", description = "Locker inventory"),
        (name = "health", description = "Probes for orchestration")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use utoipa::OpenApi;

    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/tickets",
            "/api/v1/tickets/{ticket_id}",
            "/api/v1/tickets/{ticket_id}/transition",
            "/api/v1/lockers",
            "/health/ready",
            "/health/live",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "path {path} missing from the document"
            );
        }
    }

    #[test]
    fn error_schema_is_registered() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        assert!(schemas.contains_key("ApiError"));
        assert!(schemas.contains_key("TicketBody"));
    }
}
