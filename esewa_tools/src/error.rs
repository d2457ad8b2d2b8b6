use thiserror::Error;

#[derive(Debug, Error)]
pub enum EsewaApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid gateway configuration: {0}")]
    Configuration(String),
    #[error("Could not reach the gateway: {0}")]
    Transport(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Could not encode the checkout form: {0}")]
    FormEncoding(String),
    #[error("Gateway rejected the request. Error {status}. {message}")]
    GatewayError { status: u16, message: String },
}
