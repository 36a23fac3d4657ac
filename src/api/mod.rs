pub mod health;
pub mod metrics;
pub mod swagger;
pub mod users;

use actix_web::{error, web, HttpResponse};

pub const USERS_SCOPE: &str = "/api/v0/users";

/// JSON body errors on create/replace answer 400 with the parser message.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        log::warn!("❌ Rejected request body: {}", message);
        error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": message
            })),
        )
        .into()
    })
}

/// Route table shared by the server and the HTTP tests.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .route("/metrics", web::get().to(metrics::get_metrics))
        .service(
            web::scope(USERS_SCOPE)
                .app_data(json_config())
                .route("", web::get().to(users::list_users))
                .route("/", web::get().to(users::list_users))
                .route("", web::post().to(users::create_user))
                .route("/", web::post().to(users::create_user))
                .route("/{id}", web::get().to(users::get_user))
                .route("/{id}", web::put().to(users::replace_user))
                .route("/{id}", web::patch().to(users::patch_user))
                .route("/{id}", web::delete().to(users::delete_user)),
        );
}
