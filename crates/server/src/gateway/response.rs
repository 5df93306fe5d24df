//! Gateway response envelope and status translation.

use std::fmt::Display;

use salvo::{
    Response, Scribe,
    http::StatusCode,
    oapi::{self, Components, EndpointOutRegister, Operation, ToSchema},
    writing::Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use mesh_app::{
    pagination::{PageRequest, total_pages},
    rpc::RpcError,
    status::{StatusClass, StatusEnvelope},
};

use crate::extensions::MissingState;

/// `{success, message, data}` body returned by every gateway route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct ApiResponse<T: ToSchema + 'static> {
    /// Whether the call succeeded
    pub success: bool,

    /// Outcome reported by the domain service
    pub message: String,

    /// Payload, `null` on failure and on deletes
    pub data: Option<T>,

    /// Upstream failure detail, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Payload type of replies whose `data` is always `null`.
pub(crate) type NoData = String;

/// A successful gateway reply.
#[derive(Debug)]
pub(crate) struct ApiReply<T: ToSchema + 'static> {
    status: StatusCode,
    body: ApiResponse<T>,
}

impl<T: ToSchema + 'static> ApiReply<T> {
    fn with_status(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            status,
            body: ApiResponse {
                success: true,
                message: message.into(),
                data,
                error: None,
            },
        }
    }

    pub(crate) fn ok(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::OK, message, Some(data))
    }

    pub(crate) fn created(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::CREATED, message, Some(data))
    }

}

impl ApiReply<NoData> {
    /// A 200 reply with `data: null`.
    pub(crate) fn empty(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::OK, message, None)
    }
}

impl<T> Scribe for ApiReply<T>
where
    T: ToSchema + Serialize + Send + 'static,
{
    fn render(self, res: &mut Response) {
        res.status_code(self.status);
        res.render(Json(self.body));
    }
}

impl<T> EndpointOutRegister for ApiReply<T>
where
    T: ToSchema + 'static,
{
    fn register(components: &mut Components, operation: &mut Operation) {
        operation.responses.insert(
            StatusCode::OK.as_str(),
            oapi::Response::new("Success")
                .add_content("application/json", ApiResponse::<T>::to_schema(components)),
        );
    }
}

/// A failed gateway reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ApiError {
    status: StatusCode,
    message: String,
    detail: Option<String>,
}

impl ApiError {
    pub(crate) fn new(class: StatusClass, message: impl Into<String>) -> Self {
        Self {
            status: http_status(class),
            message: message.into(),
            detail: None,
        }
    }

    /// The request body or parameters could not be used.
    pub(crate) fn invalid_request(detail: impl Display) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Invalid request".to_string(),
            detail: Some(detail.to_string()),
        }
    }

    /// Relay a failed RPC call.
    ///
    /// A status raised by the service keeps its class and message. An
    /// unreachable service is always a 500 with `failure` as the message.
    pub(crate) fn from_rpc(error: RpcError, failure: &'static str) -> Self {
        match error {
            RpcError::Status(status) => Self::new(status.class, status.message),
            RpcError::Unavailable(detail) => {
                warn!(failure, %detail, "upstream call failed");

                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: failure.to_string(),
                    detail: Some(detail),
                }
            }
        }
    }

    pub(crate) fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<MissingState> for ApiError {
    fn from(error: MissingState) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
            detail: Some(error.to_string()),
        }
    }
}

impl Scribe for ApiError {
    fn render(self, res: &mut Response) {
        res.status_code(self.status);
        res.render(Json(ApiResponse::<NoData> {
            success: false,
            message: self.message,
            data: None,
            error: self.detail,
        }));
    }
}

impl EndpointOutRegister for ApiError {
    fn register(components: &mut Components, operation: &mut Operation) {
        let schema = ApiResponse::<NoData>::to_schema(components);

        for (status, description) in [
            (StatusCode::BAD_REQUEST, "Invalid request"),
            (StatusCode::NOT_FOUND, "Not found"),
            (StatusCode::CONFLICT, "Already exists"),
            (StatusCode::INTERNAL_SERVER_ERROR, "Upstream failure"),
        ] {
            operation.responses.insert(
                status.as_str(),
                oapi::Response::new(description).add_content("application/json", schema.clone()),
            );
        }
    }
}

/// Outward HTTP status for a status class.
pub(crate) fn http_status(class: StatusClass) -> StatusCode {
    match class {
        StatusClass::Ok => StatusCode::OK,
        StatusClass::InvalidInput => StatusCode::BAD_REQUEST,
        StatusClass::NotFound => StatusCode::NOT_FOUND,
        StatusClass::Conflict => StatusCode::CONFLICT,
        StatusClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Reject an envelope that reports failure, relaying its code and message.
pub(crate) fn check(status: &StatusEnvelope) -> Result<(), ApiError> {
    if status.success {
        return Ok(());
    }

    let class = match status.class() {
        StatusClass::Ok => StatusClass::Internal,
        class => class,
    };

    Err(ApiError::new(class, status.message.clone()))
}

/// Pagination block rebuilt from the gateway's own page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct Pagination {
    /// Current page, starting at 1
    pub page: u32,

    /// Page size
    pub limit: u32,

    /// Matching rows across all pages
    pub total: u64,

    pub total_pages: u64,
}

impl Pagination {
    pub(crate) fn new(request: PageRequest, total: i64) -> Self {
        let total = u64::try_from(total).unwrap_or(0);

        Self {
            page: request.page(),
            limit: request.limit(),
            total,
            total_pages: total_pages(total, request.limit()),
        }
    }
}

#[cfg(test)]
mod tests {
    use mesh_app::rpc::RpcStatus;

    use super::*;

    #[test]
    fn envelope_codes_map_to_http() {
        let cases = [
            (400, StatusCode::BAD_REQUEST),
            (404, StatusCode::NOT_FOUND),
            (409, StatusCode::CONFLICT),
            (500, StatusCode::INTERNAL_SERVER_ERROR),
            (418, StatusCode::INTERNAL_SERVER_ERROR),
            (200, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (code, expected) in cases {
            let envelope = StatusEnvelope {
                code,
                message: "nope".to_string(),
                success: false,
            };

            let error = check(&envelope).err();

            assert_eq!(error.map(|error| error.status()), Some(expected), "code {code}");
        }
    }

    #[test]
    fn successful_envelopes_pass() {
        assert_eq!(check(&StatusEnvelope::ok("fine")), Ok(()));
    }

    #[test]
    fn raised_statuses_keep_their_class() {
        let error = ApiError::from_rpc(
            RpcError::Status(RpcStatus {
                class: StatusClass::Conflict,
                message: "taken".to_string(),
            }),
            "Failed to create user",
        );

        assert_eq!(error, ApiError::new(StatusClass::Conflict, "taken"));
    }

    #[test]
    fn unreachable_upstreams_are_internal() {
        let error = ApiError::from_rpc(
            RpcError::Unavailable("connection refused".to_string()),
            "Failed to get user",
        );

        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.message, "Failed to get user");
        assert_eq!(error.detail.as_deref(), Some("connection refused"));
    }

    #[test]
    fn pagination_rounds_pages_up() {
        let pagination = Pagination::new(PageRequest::clamped(2, 10), 25);

        assert_eq!(
            pagination,
            Pagination {
                page: 2,
                limit: 10,
                total: 25,
                total_pages: 3,
            }
        );
    }
}
