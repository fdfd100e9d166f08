use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod api;
mod app_state;
mod config;
mod database;
mod errors;

use crate::api::middleware::RequestId;
use crate::api::{dates, guides, links, prompts, responses, snippets, validation};
use crate::app_state::AppState;
use crate::config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().expect("Failed to load configuration");
    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db = database::connect_from_url(&db_url)
        .await
        .expect("Failed to connect to database");

    #[derive(OpenApi)]
    #[openapi(
        paths(
            // Prompts
            prompts::list_prompts,
            prompts::get_prompt,
            prompts::create_prompt,
            prompts::update_prompt,
            prompts::delete_prompt,
            // Snippets
            snippets::list_snippets,
            snippets::get_snippet,
            snippets::create_snippet,
            snippets::update_snippet,
            snippets::delete_snippet,
            // Links
            links::list_links,
            links::get_link,
            links::create_link,
            links::update_link,
            links::delete_link,
            // Guides
            guides::list_guides,
            guides::get_guide,
            guides::create_guide,
            guides::update_guide,
            guides::delete_guide,
            // Meta
            dates::get_server_time,
        ),
        components(
            schemas(
                // --- Views ---
                prompts::PromptView,
                snippets::SnippetView,
                links::LinkView,
                guides::GuideView,
                dates::ServerTime,

                // --- DTOs (validation facade) ---
                validation::CreatePromptDto,
                validation::UpdatePromptDto,
                validation::CreateSnippetDto,
                validation::UpdateSnippetDto,
                validation::CreateLinkDto,
                validation::UpdateLinkDto,
                validation::CreateGuideDto,
                validation::UpdateGuideDto,

                // --- Envelopes ---
                responses::Pagination,
                responses::PaginatedResponse<prompts::PromptView>,
                responses::PaginatedResponse<snippets::SnippetView>,
                responses::PaginatedResponse<links::LinkView>,
                responses::PaginatedResponse<guides::GuideView>,
                responses::ApiResponse<prompts::PromptView>,
                responses::ApiResponse<snippets::SnippetView>,
                responses::ApiResponse<links::LinkView>,
                responses::ApiResponse<guides::GuideView>,
                responses::ApiResponse<dates::ServerTime>,
                errors::ErrorBody,
                errors::ErrorEnvelope,
            )
        ),
        tags(
            (name = "Prompts", description = "Prompt library endpoints"),
            (name = "Snippets", description = "Code snippet endpoints"),
            (name = "Links", description = "Saved link endpoints"),
            (name = "Guides", description = "Long-form guide endpoints"),
            (name = "Meta", description = "Server metadata endpoints")
        )
    )]
    struct ApiDoc;

    let host = config.host.clone();
    let port = config.port;
    let max_body_bytes = config.effective_max_body_bytes();

    log::info!("Starting server at http://{}:{}", host, port);
    log::info!("Swagger UI available at http://{}:{}/swagger-ui/", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::NormalizePath::trim())
            .wrap(RequestId)
            .app_data(web::JsonConfig::default().limit(max_body_bytes))
            .app_data(web::Data::new(AppState {
                db: db.clone(),
                config: config.clone(),
            }))
            .service(
                web::scope("/api")
                    .configure(prompts::init_routes)
                    .configure(snippets::init_routes)
                    .configure(links::init_routes)
                    .configure(guides::init_routes)
                    .configure(dates::init_routes),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
