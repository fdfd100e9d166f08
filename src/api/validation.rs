//! Fachada de validación para los DTO de entrada.
//! El cliente y el servidor comparten exactamente las mismas reglas, así que
//! todo vive bajo una única superficie de importación.

use std::collections::BTreeMap;

use regex::Regex;
use serde::Deserialize;
use url::Url;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

lazy_static::lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();
    static ref SLUG_RE: Regex = Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap();
}

/// Comprueba que el correo tenga la forma `usuario@dominio.tld`.
/// Exige TLD: `a@b.com` pasa, `a@b` no.
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Comprueba que la URL sea absoluta y use `http` o `https`.
pub fn validate_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

fn email_rule(value: &str) -> Result<(), ValidationError> {
    if validate_email(value) {
        Ok(())
    } else {
        Err(ValidationError::new("email")
            .with_message("Introduce un correo electrónico válido".into()))
    }
}

fn url_rule(value: &str) -> Result<(), ValidationError> {
    if validate_url(value) {
        Ok(())
    } else {
        Err(ValidationError::new("url")
            .with_message("Introduce una URL válida (http o https)".into()))
    }
}

fn slug_rule(value: &str) -> Result<(), ValidationError> {
    if SLUG_RE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("slug")
            .with_message("El slug solo admite minúsculas, números y guiones".into()))
    }
}

/// Convierte los errores del validador en un mapa campo → mensajes,
/// listo para el campo `details` del sobre de error.
pub fn error_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .iter()
        .map(|(field, list)| {
            let messages = list
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

// --- Prompts ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromptDto {
    #[validate(length(min = 1, max = 200, message = "El título es obligatorio (máximo 200 caracteres)"))]
    pub title: String,
    #[validate(length(min = 1, max = 20000, message = "El contenido es obligatorio"))]
    pub content: String,
    #[validate(length(max = 100, message = "La categoría no puede superar los 100 caracteres"))]
    pub category: Option<String>,
    #[validate(length(max = 500, message = "Las etiquetas no pueden superar los 500 caracteres"))]
    pub tags: Option<String>,
    #[serde(default)]
    pub favorite: bool,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePromptDto {
    #[validate(length(min = 1, max = 200, message = "El título es obligatorio (máximo 200 caracteres)"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 20000, message = "El contenido es obligatorio"))]
    pub content: Option<String>,
    #[validate(length(max = 100, message = "La categoría no puede superar los 100 caracteres"))]
    pub category: Option<String>,
    #[validate(length(max = 500, message = "Las etiquetas no pueden superar los 500 caracteres"))]
    pub tags: Option<String>,
    pub favorite: Option<bool>,
}

// --- Snippets ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSnippetDto {
    #[validate(length(min = 1, max = 200, message = "El título es obligatorio (máximo 200 caracteres)"))]
    pub title: String,
    #[validate(length(min = 1, max = 50000, message = "El código es obligatorio"))]
    pub code: String,
    #[validate(length(min = 1, max = 50, message = "Indica el lenguaje del fragmento"))]
    pub language: String,
    #[validate(length(max = 1000, message = "La descripción no puede superar los 1000 caracteres"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSnippetDto {
    #[validate(length(min = 1, max = 200, message = "El título es obligatorio (máximo 200 caracteres)"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 50000, message = "El código es obligatorio"))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Indica el lenguaje del fragmento"))]
    pub language: Option<String>,
    #[validate(length(max = 1000, message = "La descripción no puede superar los 1000 caracteres"))]
    pub description: Option<String>,
}

// --- Links ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkDto {
    #[validate(length(min = 1, max = 200, message = "El título es obligatorio (máximo 200 caracteres)"))]
    pub title: String,
    #[validate(custom(function = url_rule))]
    pub url: String,
    #[validate(length(max = 1000, message = "La descripción no puede superar los 1000 caracteres"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinkDto {
    #[validate(length(min = 1, max = 200, message = "El título es obligatorio (máximo 200 caracteres)"))]
    pub title: Option<String>,
    #[validate(custom(function = url_rule))]
    pub url: Option<String>,
    #[validate(length(max = 1000, message = "La descripción no puede superar los 1000 caracteres"))]
    pub description: Option<String>,
}

// --- Guides ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGuideDto {
    #[validate(length(min = 1, max = 200, message = "El título es obligatorio (máximo 200 caracteres)"))]
    pub title: String,
    #[validate(length(min = 1, max = 100000, message = "El contenido es obligatorio"))]
    pub content: String,
    #[validate(length(min = 1, max = 120, message = "El slug es obligatorio (máximo 120 caracteres)"), custom(function = slug_rule))]
    pub slug: String,
    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGuideDto {
    #[validate(length(min = 1, max = 200, message = "El título es obligatorio (máximo 200 caracteres)"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 100000, message = "El contenido es obligatorio"))]
    pub content: Option<String>,
    #[validate(length(min = 1, max = 120, message = "El slug es obligatorio (máximo 120 caracteres)"), custom(function = slug_rule))]
    pub slug: Option<String>,
    pub published: Option<bool>,
}

/// Regla suelta de correo, disponible para cualquier DTO que la necesite.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailField {
    #[validate(custom(function = email_rule))]
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_requires_tld() {
        assert!(validate_email("a@b.com"));
        assert!(validate_email("usuario.nombre+tag@sub.dominio.es"));
        assert!(!validate_email("a@b"));
        assert!(!validate_email("sin-arroba.com"));
        assert!(!validate_email(""));
    }

    #[test]
    fn url_requires_absolute_http_scheme() {
        assert!(validate_url("https://example.com"));
        assert!(validate_url("http://example.com/ruta?x=1"));
        assert!(!validate_url("not a url"));
        assert!(!validate_url("ftp://example.com"));
        assert!(!validate_url("/relativa"));
    }

    #[test]
    fn rejected_link_carries_spanish_message() {
        let dto = CreateLinkDto {
            title: "Documentación".to_string(),
            url: "not a url".to_string(),
            description: None,
        };
        let errors = dto.validate().expect_err("url inválida");
        let messages = error_messages(&errors);
        let url_messages = messages.get("url").expect("campo url presente");
        assert_eq!(url_messages[0], "Introduce una URL válida (http o https)");
    }

    #[test]
    fn accepted_dto_passes_unchanged() {
        let dto = CreateLinkDto {
            title: "Ejemplo".to_string(),
            url: "https://example.com".to_string(),
            description: Some("Referencia".to_string()),
        };
        assert!(dto.validate().is_ok());
        assert_eq!(dto.url, "https://example.com");
    }

    #[test]
    fn empty_title_is_rejected_in_spanish() {
        let dto = CreatePromptDto {
            title: String::new(),
            content: "hola".to_string(),
            category: None,
            tags: None,
            favorite: false,
        };
        let errors = dto.validate().expect_err("título vacío");
        let messages = error_messages(&errors);
        assert!(messages["title"][0].starts_with("El título es obligatorio"));
    }

    #[test]
    fn update_dto_with_no_fields_is_valid() {
        let dto = UpdatePromptDto {
            title: None,
            content: None,
            category: None,
            tags: None,
            favorite: None,
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn guide_slug_shape_is_enforced() {
        let mut dto = CreateGuideDto {
            title: "Guía".to_string(),
            content: "contenido".to_string(),
            slug: "mi-primera-guia".to_string(),
            published: false,
        };
        assert!(dto.validate().is_ok());

        dto.slug = "Con Espacios".to_string();
        let errors = dto.validate().expect_err("slug inválido");
        let messages = error_messages(&errors);
        assert!(messages["slug"].iter().any(|m| m.contains("minúsculas")));
    }

    #[test]
    fn email_field_rule_matches_loose_check() {
        let ok = EmailField {
            email: "a@b.com".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = EmailField {
            email: "a@b".to_string(),
        };
        let errors = bad.validate().expect_err("correo sin TLD");
        let messages = error_messages(&errors);
        assert_eq!(messages["email"][0], "Introduce un correo electrónico válido");
    }
}
