use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

use crate::api::validation;

/// Cuerpo del sobre de error: `{ code, message, details? }`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Sobre de error del contrato de cable: `success` siempre en `false`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: ErrorBody,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DbError(#[from] DbErr),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Los datos proporcionados no son válidos")]
    Validation(#[from] ValidationErrors),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error")]
    Internal,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DbError(_) | AppError::JsonError(_) | AppError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Solo la validación aporta detalles estructurados (campo → mensajes)
        let details = match self {
            AppError::Validation(errors) => {
                serde_json::to_value(validation::error_messages(errors)).ok()
            }
            _ => None,
        };

        let body = ErrorEnvelope {
            success: false,
            error: ErrorBody {
                code: self.code(),
                message: self.to_string(),
                details,
            },
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::DbError(_) => "DB_ERROR",
            AppError::JsonError(_) => "JSON_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Internal => "INTERNAL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    use crate::api::validation::CreateLinkDto;

    #[test]
    fn status_codes_follow_the_variant() {
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InvalidInput("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Internal.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_failure_renders_the_error_envelope() {
        let dto = CreateLinkDto {
            title: String::new(),
            url: "not a url".to_string(),
            description: None,
        };
        let error: AppError = dto.validate().expect_err("DTO inválido").into();
        assert_eq!(error.code(), "VALIDATION_ERROR");
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);

        let response = error.error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let envelope = ErrorEnvelope {
            success: false,
            error: ErrorBody {
                code: error.code(),
                message: error.to_string(),
                details: match &error {
                    AppError::Validation(errors) => {
                        serde_json::to_value(validation::error_messages(errors)).ok()
                    }
                    _ => None,
                },
            },
        };
        let value = serde_json::to_value(&envelope).expect("serializable");
        assert_eq!(value["success"], false);
        assert_eq!(value["error"]["code"], "VALIDATION_ERROR");
        assert!(value["error"]["details"]["url"][0]
            .as_str()
            .expect("mensaje presente")
            .contains("URL válida"));
    }
}
