use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use homestead_engine::{
    invoice_objects::DuplicateRejection,
    traits::{OrderApiError, TicketApiError},
    InvoiceApiError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("{0}")]
    InvoiceRejected(String),
    #[error("Potential duplicate invoice detected")]
    DuplicateInvoice(DuplicateRejection),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvoiceRejected(_) => StatusCode::BAD_REQUEST,
            Self::DuplicateInvoice(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            // A duplicate rejection carries the conflicting invoice references so the submitter can decide whether
            // to abandon or resubmit under a different identifier.
            Self::DuplicateInvoice(rejection) => serde_json::json!({
                "error": "Potential duplicate invoice detected",
                "message": rejection.to_string(),
                "duplicates": rejection.duplicates,
            }),
            _ => serde_json::json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).insert_header(ContentType::json()).body(body.to_string())
    }
}

impl From<InvoiceApiError> for ServerError {
    fn from(e: InvoiceApiError) -> Self {
        match e {
            InvoiceApiError::DatabaseError(e) => Self::BackendError(e),
            InvoiceApiError::InvoiceNotFound(_) | InvoiceApiError::InvoiceNumberNotFound(_) => {
                Self::NoRecordFound(e.to_string())
            },
            InvoiceApiError::ValidationFailed(v) => Self::InvoiceRejected(v.to_string()),
            InvoiceApiError::DuplicateInvoice(rejection) => Self::DuplicateInvoice(rejection),
        }
    }
}

impl From<OrderApiError> for ServerError {
    fn from(e: OrderApiError) -> Self {
        match e {
            OrderApiError::DatabaseError(e) => Self::BackendError(e),
            OrderApiError::OrderNotFound(_) | OrderApiError::OrderIdNotFound(_) => Self::NoRecordFound(e.to_string()),
            OrderApiError::OrderAlreadyExists(_) => Self::InvalidRequestBody(e.to_string()),
        }
    }
}

impl From<TicketApiError> for ServerError {
    fn from(e: TicketApiError) -> Self {
        match e {
            TicketApiError::DatabaseError(e) => Self::BackendError(e),
            TicketApiError::TicketNotFound(_) => Self::NoRecordFound(e.to_string()),
        }
    }
}
