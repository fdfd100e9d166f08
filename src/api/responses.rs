//! Sobres de respuesta de la API.
//!
//! Los nombres de campo son contrato de cable con el cliente web: `success`
//! discrimina el resto del sobre y la paginación viaja en camelCase.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Sobre de éxito: `{ success, data, message? }`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

/// Bloque de paginación: `totalPages` lo calcula siempre el productor.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        // limit llega ya acotado por PageQuery; el guardia evita el /0
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// Sobre de éxito para listados: los datos más su bloque de paginación.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: u64, limit: u64, total: u64) -> Self {
        Self {
            success: true,
            data,
            pagination: Pagination::new(page, limit, total),
        }
    }
}

pub const DEFAULT_PAGE_LIMIT: u64 = 20;
pub const MAX_PAGE_LIMIT: u64 = 100;

/// Parámetros de consulta comunes a todos los listados.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Página solicitada, empezando en 1.
    pub page: Option<u64>,
    /// Elementos por página (máximo 100).
    pub limit: Option<u64>,
    /// Si está presente, solo elementos creados en los últimos N días.
    pub days: Option<i64>,
}

impl PageQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }

    pub fn days(&self) -> Option<i64> {
        self.days.map(|d| d.max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_skips_absent_message() {
        let value = serde_json::to_value(ApiResponse::ok(serde_json::json!({"id": 1})))
            .expect("serializable");
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["id"], 1);
        assert!(value.get("message").is_none());
    }

    #[test]
    fn success_envelope_carries_message_when_present() {
        let value = serde_json::to_value(ApiResponse::with_message(5, "Creado correctamente"))
            .expect("serializable");
        assert_eq!(value["success"], true);
        assert_eq!(value["data"], 5);
        assert_eq!(value["message"], "Creado correctamente");
    }

    #[test]
    fn pagination_computes_ceil_of_total_over_limit() {
        assert_eq!(Pagination::new(1, 20, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 20, 20).total_pages, 1);
        assert_eq!(Pagination::new(1, 20, 21).total_pages, 2);
        assert_eq!(Pagination::new(1, 7, 50).total_pages, 8);
    }

    #[test]
    fn pagination_serializes_camel_case_keys() {
        let value = serde_json::to_value(PaginatedResponse::new(vec![1, 2], 2, 2, 5))
            .expect("serializable");
        let block = &value["pagination"];
        assert_eq!(block["page"], 2);
        assert_eq!(block["limit"], 2);
        assert_eq!(block["total"], 5);
        assert_eq!(block["totalPages"], 3);
        assert!(block.get("total_pages").is_none());
    }

    #[test]
    fn page_query_clamps_out_of_range_values() {
        let query = PageQuery {
            page: Some(0),
            limit: Some(10_000),
            days: Some(-3),
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), MAX_PAGE_LIMIT);
        assert_eq!(query.days(), Some(0));

        let defaults = PageQuery {
            page: None,
            limit: None,
            days: None,
        };
        assert_eq!(defaults.page(), 1);
        assert_eq!(defaults.limit(), DEFAULT_PAGE_LIMIT);
        assert_eq!(defaults.days(), None);
    }
}
