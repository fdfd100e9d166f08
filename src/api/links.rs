use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    api::{
        dates,
        responses::{ApiResponse, PageQuery, PaginatedResponse},
        validation::{CreateLinkDto, UpdateLinkDto},
    },
    app_state::AppState,
    database::models::link,
    errors::AppError,
};

/// Proyección de un enlace guardado hacia la API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkView {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub created_at: String,
    pub created_at_display: String,
}

fn to_view(model: link::Model, locale: &str) -> LinkView {
    LinkView {
        id: model.id,
        title: model.title,
        url: model.url,
        description: model.description,
        created_at: dates::to_iso_string(Some(model.created_at)),
        created_at_display: dates::format_display(model.created_at, locale),
    }
}

// --- Route Handlers ---

#[utoipa::path(
    get,
    path = "/api/links",
    tag = "Links",
    params(PageQuery),
    responses(
        (status = 200, description = "Paginated list of saved links", body = PaginatedResponse<LinkView>)
    )
)]
#[get("")]
pub async fn list_links(
    app_state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let page = query.page();
    let limit = query.limit();

    let mut find = link::Entity::find().order_by_desc(link::Column::CreatedAt);
    if let Some(days) = query.days() {
        find = find.filter(link::Column::CreatedAt.gte(dates::days_ago(days)));
    }

    let paginator = find.paginate(&app_state.db, limit);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page - 1).await?;

    let locale = app_state.config.display_locale();
    let views: Vec<LinkView> = items.into_iter().map(|m| to_view(m, locale)).collect();
    Ok(HttpResponse::Ok().json(PaginatedResponse::new(views, page, limit, total)))
}

#[utoipa::path(
    get,
    path = "/api/links/{id}",
    tag = "Links",
    params(("id" = i64, Path, description = "Link ID")),
    responses(
        (status = 200, description = "Requested link", body = ApiResponse<LinkView>),
        (status = 404, description = "Link not found", body = crate::errors::ErrorEnvelope)
    )
)]
#[get("/{id}")]
pub async fn get_link(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let model = link::Entity::find_by_id(id)
        .one(&app_state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Link {} not found", id)))?;

    let locale = app_state.config.display_locale();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(to_view(model, locale))))
}

#[utoipa::path(
    post,
    path = "/api/links",
    tag = "Links",
    request_body = CreateLinkDto,
    responses(
        (status = 201, description = "Link created", body = ApiResponse<LinkView>),
        (status = 400, description = "Validation failure", body = crate::errors::ErrorEnvelope)
    )
)]
#[post("")]
pub async fn create_link(
    app_state: web::Data<AppState>,
    body: web::Json<CreateLinkDto>,
) -> Result<HttpResponse, AppError> {
    let dto = body.into_inner();
    dto.validate()?;

    let model = link::ActiveModel {
        title: Set(dto.title),
        url: Set(dto.url),
        description: Set(dto.description),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let created = model.insert(&app_state.db).await?;
    log::info!("link {} created", created.id);

    let locale = app_state.config.display_locale();
    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        to_view(created, locale),
        "Enlace guardado correctamente",
    )))
}

#[utoipa::path(
    put,
    path = "/api/links/{id}",
    tag = "Links",
    params(("id" = i64, Path, description = "Link ID")),
    request_body = UpdateLinkDto,
    responses(
        (status = 200, description = "Link updated", body = ApiResponse<LinkView>),
        (status = 400, description = "Validation failure", body = crate::errors::ErrorEnvelope),
        (status = 404, description = "Link not found", body = crate::errors::ErrorEnvelope)
    )
)]
#[put("/{id}")]
pub async fn update_link(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateLinkDto>,
) -> Result<HttpResponse, AppError> {
    let dto = body.into_inner();
    dto.validate()?;

    let id = path.into_inner();
    let existing = link::Entity::find_by_id(id)
        .one(&app_state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Link {} not found", id)))?;

    let mut active: link::ActiveModel = existing.into();
    if let Some(title) = dto.title {
        active.title = Set(title);
    }
    if let Some(url) = dto.url {
        active.url = Set(url);
    }
    if let Some(description) = dto.description {
        active.description = Set(Some(description));
    }

    let updated = active.update(&app_state.db).await?;

    let locale = app_state.config.display_locale();
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        to_view(updated, locale),
        "Enlace actualizado correctamente",
    )))
}

#[utoipa::path(
    delete,
    path = "/api/links/{id}",
    tag = "Links",
    params(("id" = i64, Path, description = "Link ID")),
    responses(
        (status = 200, description = "Link deleted"),
        (status = 404, description = "Link not found", body = crate::errors::ErrorEnvelope)
    )
)]
#[delete("/{id}")]
pub async fn delete_link(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let result = link::Entity::delete_by_id(id).exec(&app_state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!("Link {} not found", id)));
    }

    log::info!("link {} deleted", id);
    Ok(HttpResponse::Ok().json(ApiResponse::with_message((), "Enlace eliminado correctamente")))
}

// Función para registrar todas las rutas de este módulo
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/links")
            .service(list_links)
            .service(create_link)
            .service(get_link)
            .service(update_link)
            .service(delete_link),
    );
}
