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
        validation::{CreatePromptDto, UpdatePromptDto},
    },
    app_state::AppState,
    database::models::prompt,
    errors::AppError,
};

/// Proyección de un prompt hacia la API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptView {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub favorite: bool,
    pub created_at: String,
    pub created_at_display: String,
    pub updated_at: String,
}

fn to_view(model: prompt::Model, locale: &str) -> PromptView {
    PromptView {
        id: model.id,
        title: model.title,
        content: model.content,
        category: model.category,
        tags: model.tags,
        favorite: model.favorite,
        created_at: dates::to_iso_string(Some(model.created_at)),
        created_at_display: dates::format_display(model.created_at, locale),
        updated_at: dates::to_iso_string(Some(model.updated_at)),
    }
}

// --- Route Handlers ---

#[utoipa::path(
    get,
    path = "/api/prompts",
    tag = "Prompts",
    params(PageQuery),
    responses(
        (status = 200, description = "Paginated list of prompts", body = PaginatedResponse<PromptView>)
    )
)]
#[get("")]
pub async fn list_prompts(
    app_state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let page = query.page();
    let limit = query.limit();

    let mut find = prompt::Entity::find().order_by_desc(prompt::Column::CreatedAt);
    if let Some(days) = query.days() {
        find = find.filter(prompt::Column::CreatedAt.gte(dates::days_ago(days)));
    }

    let paginator = find.paginate(&app_state.db, limit);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page - 1).await?;

    let locale = app_state.config.display_locale();
    let views: Vec<PromptView> = items.into_iter().map(|m| to_view(m, locale)).collect();
    Ok(HttpResponse::Ok().json(PaginatedResponse::new(views, page, limit, total)))
}

#[utoipa::path(
    get,
    path = "/api/prompts/{id}",
    tag = "Prompts",
    params(("id" = i64, Path, description = "Prompt ID")),
    responses(
        (status = 200, description = "Requested prompt", body = ApiResponse<PromptView>),
        (status = 404, description = "Prompt not found", body = crate::errors::ErrorEnvelope)
    )
)]
#[get("/{id}")]
pub async fn get_prompt(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let model = prompt::Entity::find_by_id(id)
        .one(&app_state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Prompt {} not found", id)))?;

    let locale = app_state.config.display_locale();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(to_view(model, locale))))
}

#[utoipa::path(
    post,
    path = "/api/prompts",
    tag = "Prompts",
    request_body = CreatePromptDto,
    responses(
        (status = 201, description = "Prompt created", body = ApiResponse<PromptView>),
        (status = 400, description = "Validation failure", body = crate::errors::ErrorEnvelope)
    )
)]
#[post("")]
pub async fn create_prompt(
    app_state: web::Data<AppState>,
    body: web::Json<CreatePromptDto>,
) -> Result<HttpResponse, AppError> {
    let dto = body.into_inner();
    dto.validate()?;

    let now = Utc::now();
    let model = prompt::ActiveModel {
        title: Set(dto.title),
        content: Set(dto.content),
        category: Set(dto.category),
        tags: Set(dto.tags),
        favorite: Set(dto.favorite),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = model.insert(&app_state.db).await?;
    log::info!("prompt {} created", created.id);

    let locale = app_state.config.display_locale();
    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        to_view(created, locale),
        "Prompt creado correctamente",
    )))
}

#[utoipa::path(
    put,
    path = "/api/prompts/{id}",
    tag = "Prompts",
    params(("id" = i64, Path, description = "Prompt ID")),
    request_body = UpdatePromptDto,
    responses(
        (status = 200, description = "Prompt updated", body = ApiResponse<PromptView>),
        (status = 400, description = "Validation failure", body = crate::errors::ErrorEnvelope),
        (status = 404, description = "Prompt not found", body = crate::errors::ErrorEnvelope)
    )
)]
#[put("/{id}")]
pub async fn update_prompt(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdatePromptDto>,
) -> Result<HttpResponse, AppError> {
    let dto = body.into_inner();
    dto.validate()?;

    let id = path.into_inner();
    let existing = prompt::Entity::find_by_id(id)
        .one(&app_state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Prompt {} not found", id)))?;

    let mut active: prompt::ActiveModel = existing.into();
    if let Some(title) = dto.title {
        active.title = Set(title);
    }
    if let Some(content) = dto.content {
        active.content = Set(content);
    }
    if let Some(category) = dto.category {
        active.category = Set(Some(category));
    }
    if let Some(tags) = dto.tags {
        active.tags = Set(Some(tags));
    }
    if let Some(favorite) = dto.favorite {
        active.favorite = Set(favorite);
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&app_state.db).await?;

    let locale = app_state.config.display_locale();
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        to_view(updated, locale),
        "Prompt actualizado correctamente",
    )))
}

#[utoipa::path(
    delete,
    path = "/api/prompts/{id}",
    tag = "Prompts",
    params(("id" = i64, Path, description = "Prompt ID")),
    responses(
        (status = 200, description = "Prompt deleted"),
        (status = 404, description = "Prompt not found", body = crate::errors::ErrorEnvelope)
    )
)]
#[delete("/{id}")]
pub async fn delete_prompt(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let result = prompt::Entity::delete_by_id(id).exec(&app_state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!("Prompt {} not found", id)));
    }

    log::info!("prompt {} deleted", id);
    Ok(HttpResponse::Ok().json(ApiResponse::with_message((), "Prompt eliminado correctamente")))
}

// Función para registrar todas las rutas de este módulo
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/prompts")
            .service(list_prompts)
            .service(create_prompt)
            .service(get_prompt)
            .service(update_prompt)
            .service(delete_prompt),
    );
}
