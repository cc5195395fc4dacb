//! Loan listing and renewal endpoints

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book::PageQuery,
        instance::{LoanedCopy, RenewalForm, RenewalRequest},
        user::{capability, CapabilitySet},
    },
    services::loans::{RenewalOutcome, PAGE_SIZE},
};

use super::{AuthenticatedUser, PaginatedResponse};

/// List the authenticated user's own active loans
#[utoipa::path(
    get,
    path = "/loans/mine",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<i64>, Query, description = "Page number (default: 1)")
    ),
    responses(
        (status = 200, description = "The caller's active loans, due date ascending", body = PaginatedResponse<LoanedCopy>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<LoanedCopy>>> {
    let page = query.page();
    let (copies, total) = state
        .services
        .loans
        .borrowed_by_user(claims.user_id, page)
        .await?;

    Ok(Json(PaginatedResponse {
        items: copies,
        total,
        page,
        per_page: PAGE_SIZE,
    }))
}

/// List all active loans system-wide (librarians only)
#[utoipa::path(
    get,
    path = "/loans/borrowed",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<i64>, Query, description = "Page number (default: 1)")
    ),
    responses(
        (status = 200, description = "All active loans, due date ascending", body = PaginatedResponse<LoanedCopy>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing can_mark_returned")
    )
)]
pub async fn all_borrowed(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<LoanedCopy>>> {
    claims.require_capability(capability::CAN_MARK_RETURNED)?;

    let page = query.page();
    let (copies, total) = state.services.loans.all_borrowed(page).await?;

    Ok(Json(PaginatedResponse {
        items: copies,
        total,
        page,
        per_page: PAGE_SIZE,
    }))
}

/// Renewal form for a copy, pre-filled with the suggested due date
#[utoipa::path(
    get,
    path = "/copies/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    responses(
        (status = 200, description = "Renewal form", body = RenewalForm),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing can_mark_returned"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn renewal_form(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RenewalForm>> {
    let form = state.services.loans.renewal_form(&claims, id).await?;
    Ok(Json(form))
}

/// Renew a copy: on success redirects to the all-loans listing, on a
/// rejected date returns the form again with the field error
#[utoipa::path(
    post,
    path = "/copies/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    request_body = RenewalRequest,
    responses(
        (status = 303, description = "Renewed; Location points to the all-loans listing"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing can_mark_returned"),
        (status = 404, description = "Copy not found"),
        (status = 422, description = "Rejected date; form re-rendered", body = RenewalForm)
    )
)]
pub async fn renew(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<RenewalRequest>,
) -> AppResult<Response> {
    let outcome = state
        .services
        .loans
        .renew(&claims, id, request.renewal_date)
        .await?;

    Ok(match outcome {
        RenewalOutcome::Redirect { location } => {
            (StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response()
        }
        RenewalOutcome::Form(form) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(form)).into_response()
        }
    })
}
