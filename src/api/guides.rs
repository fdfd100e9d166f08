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
        validation::{CreateGuideDto, UpdateGuideDto},
    },
    app_state::AppState,
    database::models::guide,
    errors::AppError,
};

/// Proyección de una guía hacia la API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuideView {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub published: bool,
    pub created_at: String,
    pub created_at_display: String,
    pub updated_at: String,
}

fn to_view(model: guide::Model, locale: &str) -> GuideView {
    GuideView {
        id: model.id,
        title: model.title,
        content: model.content,
        slug: model.slug,
        published: model.published,
        created_at: dates::to_iso_string(Some(model.created_at)),
        created_at_display: dates::format_display(model.created_at, locale),
        updated_at: dates::to_iso_string(Some(model.updated_at)),
    }
}

/// El slug es único; comprobarlo antes de escribir da un 400 legible en vez
/// de un error de base de datos.
async fn ensure_slug_free(
    app_state: &web::Data<AppState>,
    slug: &str,
    exclude_id: Option<i64>,
) -> Result<(), AppError> {
    let mut find = guide::Entity::find().filter(guide::Column::Slug.eq(slug));
    if let Some(id) = exclude_id {
        find = find.filter(guide::Column::Id.ne(id));
    }
    if find.one(&app_state.db).await?.is_some() {
        return Err(AppError::InvalidInput(format!(
            "Ya existe una guía con el slug \"{}\"",
            slug
        )));
    }
    Ok(())
}

// --- Route Handlers ---

#[utoipa::path(
    get,
    path = "/api/guides",
    tag = "Guides",
    params(PageQuery),
    responses(
        (status = 200, description = "Paginated list of guides", body = PaginatedResponse<GuideView>)
    )
)]
#[get("")]
pub async fn list_guides(
    app_state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let page = query.page();
    let limit = query.limit();

    let mut find = guide::Entity::find().order_by_desc(guide::Column::CreatedAt);
    if let Some(days) = query.days() {
        find = find.filter(guide::Column::CreatedAt.gte(dates::days_ago(days)));
    }

    let paginator = find.paginate(&app_state.db, limit);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page - 1).await?;

    let locale = app_state.config.display_locale();
    let views: Vec<GuideView> = items.into_iter().map(|m| to_view(m, locale)).collect();
    Ok(HttpResponse::Ok().json(PaginatedResponse::new(views, page, limit, total)))
}

#[utoipa::path(
    get,
    path = "/api/guides/{id}",
    tag = "Guides",
    params(("id" = i64, Path, description = "Guide ID")),
    responses(
        (status = 200, description = "Requested guide", body = ApiResponse<GuideView>),
        (status = 404, description = "Guide not found", body = crate::errors::ErrorEnvelope)
    )
)]
#[get("/{id}")]
pub async fn get_guide(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let model = guide::Entity::find_by_id(id)
        .one(&app_state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Guide {} not found", id)))?;

    let locale = app_state.config.display_locale();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(to_view(model, locale))))
}

#[utoipa::path(
    post,
    path = "/api/guides",
    tag = "Guides",
    request_body = CreateGuideDto,
    responses(
        (status = 201, description = "Guide created", body = ApiResponse<GuideView>),
        (status = 400, description = "Validation failure or duplicate slug", body = crate::errors::ErrorEnvelope)
    )
)]
#[post("")]
pub async fn create_guide(
    app_state: web::Data<AppState>,
    body: web::Json<CreateGuideDto>,
) -> Result<HttpResponse, AppError> {
    let dto = body.into_inner();
    dto.validate()?;
    ensure_slug_free(&app_state, &dto.slug, None).await?;

    let now = Utc::now();
    let model = guide::ActiveModel {
        title: Set(dto.title),
        content: Set(dto.content),
        slug: Set(dto.slug),
        published: Set(dto.published),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = model.insert(&app_state.db).await?;
    log::info!("guide {} created (slug={})", created.id, created.slug);

    let locale = app_state.config.display_locale();
    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        to_view(created, locale),
        "Guía creada correctamente",
    )))
}

#[utoipa::path(
    put,
    path = "/api/guides/{id}",
    tag = "Guides",
    params(("id" = i64, Path, description = "Guide ID")),
    request_body = UpdateGuideDto,
    responses(
        (status = 200, description = "Guide updated", body = ApiResponse<GuideView>),
        (status = 400, description = "Validation failure or duplicate slug", body = crate::errors::ErrorEnvelope),
        (status = 404, description = "Guide not found", body = crate::errors::ErrorEnvelope)
    )
)]
#[put("/{id}")]
pub async fn update_guide(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateGuideDto>,
) -> Result<HttpResponse, AppError> {
    let dto = body.into_inner();
    dto.validate()?;

    let id = path.into_inner();
    let existing = guide::Entity::find_by_id(id)
        .one(&app_state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Guide {} not found", id)))?;

    if let Some(slug) = &dto.slug {
        ensure_slug_free(&app_state, slug, Some(id)).await?;
    }

    let mut active: guide::ActiveModel = existing.into();
    if let Some(title) = dto.title {
        active.title = Set(title);
    }
    if let Some(content) = dto.content {
        active.content = Set(content);
    }
    if let Some(slug) = dto.slug {
        active.slug = Set(slug);
    }
    if let Some(published) = dto.published {
        active.published = Set(published);
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&app_state.db).await?;

    let locale = app_state.config.display_locale();
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        to_view(updated, locale),
        "Guía actualizada correctamente",
    )))
}

#[utoipa::path(
    delete,
    path = "/api/guides/{id}",
    tag = "Guides",
    params(("id" = i64, Path, description = "Guide ID")),
    responses(
        (status = 200, description = "Guide deleted"),
        (status = 404, description = "Guide not found", body = crate::errors::ErrorEnvelope)
    )
)]
#[delete("/{id}")]
pub async fn delete_guide(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let result = guide::Entity::delete_by_id(id).exec(&app_state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!("Guide {} not found", id)));
    }

    log::info!("guide {} deleted", id);
    Ok(HttpResponse::Ok().json(ApiResponse::with_message((), "Guía eliminada correctamente")))
}

// Función para registrar todas las rutas de este módulo
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/guides")
            .service(list_guides)
            .service(create_guide)
            .service(get_guide)
            .service(update_guide)
            .service(delete_guide),
    );
}
