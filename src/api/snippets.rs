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
        validation::{CreateSnippetDto, UpdateSnippetDto},
    },
    app_state::AppState,
    database::models::snippet,
    errors::AppError,
};

/// Proyección de un fragmento de código hacia la API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SnippetView {
    pub id: i64,
    pub title: String,
    pub code: String,
    pub language: String,
    pub description: Option<String>,
    pub created_at: String,
    pub created_at_display: String,
    pub updated_at: String,
}

fn to_view(model: snippet::Model, locale: &str) -> SnippetView {
    SnippetView {
        id: model.id,
        title: model.title,
        code: model.code,
        language: model.language,
        description: model.description,
        created_at: dates::to_iso_string(Some(model.created_at)),
        created_at_display: dates::format_display(model.created_at, locale),
        updated_at: dates::to_iso_string(Some(model.updated_at)),
    }
}

// --- Route Handlers ---

#[utoipa::path(
    get,
    path = "/api/snippets",
    tag = "Snippets",
    params(PageQuery),
    responses(
        (status = 200, description = "Paginated list of snippets", body = PaginatedResponse<SnippetView>)
    )
)]
#[get("")]
pub async fn list_snippets(
    app_state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let page = query.page();
    let limit = query.limit();

    let mut find = snippet::Entity::find().order_by_desc(snippet::Column::CreatedAt);
    if let Some(days) = query.days() {
        find = find.filter(snippet::Column::CreatedAt.gte(dates::days_ago(days)));
    }

    let paginator = find.paginate(&app_state.db, limit);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page - 1).await?;

    let locale = app_state.config.display_locale();
    let views: Vec<SnippetView> = items.into_iter().map(|m| to_view(m, locale)).collect();
    Ok(HttpResponse::Ok().json(PaginatedResponse::new(views, page, limit, total)))
}

#[utoipa::path(
    get,
    path = "/api/snippets/{id}",
    tag = "Snippets",
    params(("id" = i64, Path, description = "Snippet ID")),
    responses(
        (status = 200, description = "Requested snippet", body = ApiResponse<SnippetView>),
        (status = 404, description = "Snippet not found", body = crate::errors::ErrorEnvelope)
    )
)]
#[get("/{id}")]
pub async fn get_snippet(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let model = snippet::Entity::find_by_id(id)
        .one(&app_state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Snippet {} not found", id)))?;

    let locale = app_state.config.display_locale();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(to_view(model, locale))))
}

#[utoipa::path(
    post,
    path = "/api/snippets",
    tag = "Snippets",
    request_body = CreateSnippetDto,
    responses(
        (status = 201, description = "Snippet created", body = ApiResponse<SnippetView>),
        (status = 400, description = "Validation failure", body = crate::errors::ErrorEnvelope)
    )
)]
#[post("")]
pub async fn create_snippet(
    app_state: web::Data<AppState>,
    body: web::Json<CreateSnippetDto>,
) -> Result<HttpResponse, AppError> {
    let dto = body.into_inner();
    dto.validate()?;

    let now = Utc::now();
    let model = snippet::ActiveModel {
        title: Set(dto.title),
        code: Set(dto.code),
        language: Set(dto.language),
        description: Set(dto.description),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = model.insert(&app_state.db).await?;
    log::info!("snippet {} created", created.id);

    let locale = app_state.config.display_locale();
    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        to_view(created, locale),
        "Fragmento creado correctamente",
    )))
}

#[utoipa::path(
    put,
    path = "/api/snippets/{id}",
    tag = "Snippets",
    params(("id" = i64, Path, description = "Snippet ID")),
    request_body = UpdateSnippetDto,
    responses(
        (status = 200, description = "Snippet updated", body = ApiResponse<SnippetView>),
        (status = 400, description = "Validation failure", body = crate::errors::ErrorEnvelope),
        (status = 404, description = "Snippet not found", body = crate::errors::ErrorEnvelope)
    )
)]
#[put("/{id}")]
pub async fn update_snippet(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateSnippetDto>,
) -> Result<HttpResponse, AppError> {
    let dto = body.into_inner();
    dto.validate()?;

    let id = path.into_inner();
    let existing = snippet::Entity::find_by_id(id)
        .one(&app_state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Snippet {} not found", id)))?;

    let mut active: snippet::ActiveModel = existing.into();
    if let Some(title) = dto.title {
        active.title = Set(title);
    }
    if let Some(code) = dto.code {
        active.code = Set(code);
    }
    if let Some(language) = dto.language {
        active.language = Set(language);
    }
    if let Some(description) = dto.description {
        active.description = Set(Some(description));
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&app_state.db).await?;

    let locale = app_state.config.display_locale();
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        to_view(updated, locale),
        "Fragmento actualizado correctamente",
    )))
}

#[utoipa::path(
    delete,
    path = "/api/snippets/{id}",
    tag = "Snippets",
    params(("id" = i64, Path, description = "Snippet ID")),
    responses(
        (status = 200, description = "Snippet deleted"),
        (status = 404, description = "Snippet not found", body = crate::errors::ErrorEnvelope)
    )
)]
#[delete("/{id}")]
pub async fn delete_snippet(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let result = snippet::Entity::delete_by_id(id).exec(&app_state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!("Snippet {} not found", id)));
    }

    log::info!("snippet {} deleted", id);
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        (),
        "Fragmento eliminado correctamente",
    )))
}

// Función para registrar todas las rutas de este módulo
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/snippets")
            .service(list_snippets)
            .service(create_snippet)
            .service(get_snippet)
            .service(update_snippet)
            .service(delete_snippet),
    );
}
