use crate::{api::internal_error, db::DbPool, models::User, schema::users};
use actix_web::{get, post, web, HttpResponse, Responder};
use diesel::prelude::*;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub nickname: String,
}

/// List all users, newest first
#[get("")]
pub async fn list_users(pool: web::Data<DbPool>) -> impl Responder {
    let mut conn = match pool.get() {
        Ok(c) => c,
        Err(e) => return internal_error(e),
    };

    let rows: Vec<User> = match users::table
        .order(users::created_at.desc())
        .load(&mut conn)
    {
        Ok(r) => r,
        Err(e) => {
            log::error!("Error fetching users: {}", e);
            return internal_error(e);
        }
    };

    HttpResponse::Ok().json(rows)
}

/// Insert a user if the nickname is not already taken
#[post("")]
pub async fn create_user(
    pool: web::Data<DbPool>,
    body: web::Json<CreateUserRequest>,
) -> impl Responder {
    let mut conn = match pool.get() {
        Ok(c) => c,
        Err(e) => return internal_error(e),
    };

    let inserted = diesel::insert_into(users::table)
        .values(users::nickname.eq(&body.nickname))
        .on_conflict(users::nickname)
        .do_nothing()
        .returning(users::id)
        .get_result::<i32>(&mut conn)
        .optional();

    match inserted {
        // id 0 is the empty-insert marker when the nickname already existed
        Ok(id) => HttpResponse::Ok()
            .json(serde_json::json!({"success": true, "id": id.unwrap_or(0)})),
        Err(e) => {
            log::error!("Error inserting user: {}", e);
            internal_error(e)
        }
    }
}
