use actix_cors::Cors;
use actix_files::Files;
use actix_web::{http::header, web, App, HttpServer};

mod api;
mod db;
mod models;
mod schema;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // DB Pool initialization
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = db::init_pool(&database_url);

    // Frontend assets served for every non-API path
    let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());

    log::info!("Starting Shiftboard Backend at http://0.0.0.0:8080");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .send_wildcard()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION]);

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(pool.clone()))
            .app_data(api::json_error_config())
            .configure(api::config)
            .service(Files::new("/", static_dir.clone()).index_file("index.html"))
    })
    .bind(("0.0.0.0", 8080))?
    .run()
    .await
}
