use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use esewa_tools::EsewaApiError;
use shop_payment_engine::{traits::CatalogError, SettlementError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Payload deserialization error")]
    CouldNotDeserializePayload,
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("The request conflicts with the current state. {0}")]
    StateConflict(String),
    #[error("The payment gateway could not process the request. {0}")]
    PaymentGatewayError(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::CouldNotDeserializePayload => StatusCode::BAD_REQUEST,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::StateConflict(_) => StatusCode::CONFLICT,
            Self::PaymentGatewayError(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<SettlementError> for ServerError {
    fn from(e: SettlementError) -> Self {
        match e {
            SettlementError::InvalidInput(m) => ServerError::InvalidRequestBody(m),
            SettlementError::PaymentNotFound(txid) => {
                ServerError::NoRecordFound(format!("No payment exists for transaction {txid}"))
            },
            SettlementError::OrderNotFound(id) => ServerError::NoRecordFound(format!("No order {id} exists")),
            SettlementError::InvalidState(m) => ServerError::StateConflict(m),
            SettlementError::CatalogError(ce) => match ce {
                e @ CatalogError::ProductNotFound(_) => ServerError::InvalidRequestBody(e.to_string()),
                e @ CatalogError::InsufficientStock { .. } => ServerError::StateConflict(e.to_string()),
                e => ServerError::BackendError(e.to_string()),
            },
            e => ServerError::BackendError(e.to_string()),
        }
    }
}

impl From<EsewaApiError> for ServerError {
    fn from(e: EsewaApiError) -> Self {
        match e {
            EsewaApiError::Configuration(m) => ServerError::ConfigurationError(m),
            e => ServerError::PaymentGatewayError(e.to_string()),
        }
    }
}
