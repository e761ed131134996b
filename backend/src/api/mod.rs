use actix_web::{http::Method, web, HttpRequest, HttpResponse};

pub mod departments;
pub mod schedules;
pub mod users;

pub fn config(cfg: &mut web::ServiceConfig) {
    // Schedule board routes
    cfg.service(
        web::scope("/api/schedules")
            .service(schedules::list_schedules)
            .service(schedules::upsert_schedule)
            .service(schedules::delete_schedule)
            .default_service(web::route().to(api_fallback)),
    );

    // User routes
    cfg.service(
        web::scope("/api/users")
            .service(users::list_users)
            .service(users::create_user)
            .default_service(web::route().to(api_fallback)),
    );

    // Department routes (read-only)
    cfg.service(
        web::scope("/api/departments")
            .service(departments::list_departments)
            .default_service(web::route().to(api_fallback)),
    );
}

/// JSON extractor config mapping body errors to the uniform `{"error": …}` 500.
pub fn json_error_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        actix_web::error::InternalError::from_response(
            err,
            HttpResponse::InternalServerError().json(serde_json::json!({ "error": message })),
        )
        .into()
    })
}

/// Uniform 500 body for pool and query failures.
pub(crate) fn internal_error(message: impl ToString) -> HttpResponse {
    HttpResponse::InternalServerError().json(serde_json::json!({ "error": message.to_string() }))
}

/// Scope fallback: bare OPTIONS gets an empty reply (the CORS middleware has
/// already attached its headers); any other unmatched method is a 405.
async fn api_fallback(req: HttpRequest) -> HttpResponse {
    if req.method() == Method::OPTIONS {
        return HttpResponse::NoContent().finish();
    }
    HttpResponse::MethodNotAllowed().body("Method Not Allowed")
}

// ============================================================================
// Tests
// ============================================================================
