//! Utilidades puras de fechas y el endpoint de hora del servidor.

use actix_web::{HttpResponse, get, web};
use chrono::{DateTime, Duration, Locale, SecondsFormat, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{api::responses::ApiResponse, app_state::AppState, errors::AppError};

/// Locale de presentación por defecto de la aplicación.
pub const DEFAULT_LOCALE: &str = "es-ES";

/// Normaliza una fecha opcional a ISO-8601 (RFC 3339).
/// Sin argumento devuelve el instante actual.
pub fn to_iso_string(input: Option<DateTime<Utc>>) -> String {
    input
        .unwrap_or_else(Utc::now)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Análisis estricto de ISO-8601. La entrada inválida se devuelve como error
/// tipado al llamante; nunca se corrige ni se interpreta en silencio.
pub fn parse_iso(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|parsed| parsed.with_timezone(&Utc))
}

/// Instante de hace `days` días; `days_ago(0)` es ahora.
pub fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}

/// `true` si `date` cae dentro de los últimos `days` días.
/// El límite es inclusivo: la fecha exacta de corte cuenta como dentro.
pub fn is_within_days(date: DateTime<Utc>, days: i64) -> bool {
    within_days(Utc::now(), date, days)
}

fn within_days(reference: DateTime<Utc>, date: DateTime<Utc>, days: i64) -> bool {
    date >= reference - Duration::days(days)
}

fn resolve_locale(identifier: &str) -> Locale {
    // chrono usa identificadores con guion bajo ("es_ES")
    let normalized = identifier.replace('-', "_");
    Locale::try_from(normalized.as_str()).unwrap_or(Locale::es_ES)
}

/// Representación larga de la fecha: día, nombre del mes y año.
/// Un locale desconocido cae en `es-ES` en lugar de fallar.
pub fn format_display(date: DateTime<Utc>, locale: &str) -> String {
    let resolved = resolve_locale(locale);
    if locale.starts_with("es") {
        date.format_localized("%-d de %B de %Y", resolved).to_string()
    } else {
        date.format_localized("%-d %B %Y", resolved).to_string()
    }
}

/// Hora actual del servidor según su configuración.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServerTime {
    pub iso: String,
    pub local: String,
    pub display: String,
    pub timezone: String,
}

#[utoipa::path(
    get,
    path = "/api/meta/time",
    tag = "Meta",
    responses(
        (status = 200, description = "Current server time in the configured timezone and locale", body = ApiResponse<ServerTime>)
    )
)]
#[get("/time")]
pub async fn get_server_time(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let server_tz: Tz = app_state
        .config
        .get_timezone()
        .map_err(|e| AppError::InvalidInput(format!("Invalid server timezone: {}", e)))?;

    let now = Utc::now();
    let local = now.with_timezone(&server_tz);
    let body = ServerTime {
        iso: to_iso_string(Some(now)),
        local: local.format("%Y-%m-%d %H:%M:%S %Z").to_string(),
        display: format_display(now, app_state.config.display_locale()),
        timezone: server_tz.to_string(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/meta").service(get_server_time));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn iso_of_none_is_now_within_the_same_second() {
        let rendered = to_iso_string(None);
        let parsed = parse_iso(&rendered).expect("ISO válido");
        let delta = Utc::now() - parsed;
        assert!(delta >= Duration::zero());
        assert!(delta < Duration::seconds(1));
    }

    #[test]
    fn iso_roundtrips_a_known_instant() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 5, 12, 30, 45).unwrap();
        let rendered = to_iso_string(Some(instant));
        assert_eq!(parse_iso(&rendered).expect("ISO válido"), instant);
    }

    #[test]
    fn invalid_input_surfaces_as_parse_error() {
        assert!(parse_iso("not a date").is_err());
        assert!(parse_iso("2024-13-45").is_err());
        assert!(parse_iso("").is_err());
    }

    #[test]
    fn days_ago_zero_is_today() {
        let delta = Utc::now() - days_ago(0);
        assert!(delta >= Duration::zero());
        assert!(delta < Duration::seconds(1));
    }

    #[test]
    fn within_days_boundary_is_inclusive() {
        let reference = Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap();
        let boundary = reference - Duration::days(7);

        assert!(within_days(reference, boundary, 7));
        assert!(within_days(reference, boundary + Duration::seconds(1), 7));
        assert!(!within_days(reference, boundary - Duration::seconds(1), 7));
    }

    #[test]
    fn recent_dates_are_within_days() {
        let yesterday = Utc::now() - Duration::days(1);
        assert!(is_within_days(yesterday, 7));

        let last_month = Utc::now() - Duration::days(31);
        assert!(!is_within_days(last_month, 7));
    }

    #[test]
    fn spanish_display_spells_out_the_month() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap();
        assert_eq!(format_display(date, "es-ES"), "5 de marzo de 2024");
    }

    #[test]
    fn other_locales_use_their_month_names() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap();
        assert_eq!(format_display(date, "en-US"), "5 March 2024");
    }

    #[test]
    fn unknown_locale_falls_back_to_spanish_months() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap();
        assert_eq!(format_display(date, "zz-ZZ"), "5 marzo 2024");
    }
}
