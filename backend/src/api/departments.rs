use crate::{api::internal_error, db::DbPool, models::Department, schema::departments};
use actix_web::{get, web, HttpResponse, Responder};
use diesel::prelude::*;

/// List all departments in display order
#[get("")]
pub async fn list_departments(pool: web::Data<DbPool>) -> impl Responder {
    let mut conn = match pool.get() {
        Ok(c) => c,
        Err(e) => return internal_error(e),
    };

    let rows: Vec<Department> = match departments::table
        .order((departments::display_order.asc(), departments::name.asc()))
        .load(&mut conn)
    {
        Ok(r) => r,
        Err(e) => {
            log::error!("Error fetching departments: {}", e);
            return internal_error(e);
        }
    };

    HttpResponse::Ok().json(rows)
}
