use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Service API",
        version = "1.0.0",
        description = "CRUD API for users.\n\n**Partial updates:** `PATCH /api/v0/users/{id}` takes a JSON Patch (RFC 6902) array. The whole patch is applied or nothing is saved, and the user id can never be changed by a patch."
    ),
    paths(
        // Users
        crate::api::users::list_users,
        crate::api::users::get_user,
        crate::api::users::create_user,
        crate::api::users::replace_user,
        crate::api::users::patch_user,
        crate::api::users::delete_user,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::models::UserDto,
            crate::patch::PatchOperation,
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,
        )
    ),
    tags(
        (name = "Users", description = "User records: list, read, create (upsert), replace and JSON Patch."),
        (name = "Health", description = "Health check and request counters."),
    )
)]
pub struct ApiDoc;
