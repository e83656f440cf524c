use actix_web::{
    delete, get, patch, post,
    web::{self, Data},
    HttpResponse, Responder,
};
use serde_json::json;

use crate::{
    db,
    errors::AppError,
    structs::{
        ItemCreate, ItemPublic, ItemUpdate, ListQuery, TeamCreate, TeamUpdate, UserCreate,
        UserPublic, UserUpdate,
    },
    AppState,
};

// ---- teams ----

#[post("/teams/")]
pub async fn create_team(
    state: Data<AppState>,
    payload: web::Json<TeamCreate>,
) -> Result<impl Responder, AppError> {
    let team = db::create_team(&state, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(team))
}

#[get("/teams/")]
pub async fn list_teams(
    state: Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let teams = db::get_all_teams(&state, query.offset(), query.limit()).await?;
    Ok(HttpResponse::Ok().json(teams))
}

#[get("/teams/{id}")]
pub async fn get_team(
    state: Data<AppState>,
    path: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let id = path.into_inner();
    let team = db::get_team_by_id(&state, id)
        .await?
        .ok_or_else(|| AppError::not_found("Team", id))?;
    Ok(HttpResponse::Ok().json(team))
}

#[patch("/teams/{id}")]
pub async fn update_team(
    state: Data<AppState>,
    path: web::Path<i64>,
    payload: web::Json<TeamUpdate>,
) -> Result<impl Responder, AppError> {
    let team = db::update_team(&state, path.into_inner(), payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(team))
}

#[delete("/teams/{id}")]
pub async fn delete_team(
    state: Data<AppState>,
    path: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    db::delete_team(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

/// Inverse side of the User -> Team foreign key.
#[get("/teams/{id}/users")]
pub async fn list_team_users(
    state: Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let id = path.into_inner();
    db::get_team_by_id(&state, id)
        .await?
        .ok_or_else(|| AppError::not_found("Team", id))?;
    let users = db::get_users_by_team_id(&state, id, query.offset(), query.limit()).await?;
    let users: Vec<UserPublic> = users.into_iter().map(UserPublic::from).collect();
    Ok(HttpResponse::Ok().json(users))
}

// ---- users ----

#[post("/users/")]
pub async fn create_user(
    state: Data<AppState>,
    payload: web::Json<UserCreate>,
) -> Result<impl Responder, AppError> {
    let user = db::create_user(&state, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserPublic::from(user)))
}

#[get("/users/")]
pub async fn list_users(
    state: Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let users = db::get_all_users(&state, query.offset(), query.limit()).await?;
    let users: Vec<UserPublic> = users.into_iter().map(UserPublic::from).collect();
    Ok(HttpResponse::Ok().json(users))
}

#[get("/users/{id}")]
pub async fn get_user(
    state: Data<AppState>,
    path: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let id = path.into_inner();
    let user = db::get_user_by_id(&state, id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;
    Ok(HttpResponse::Ok().json(UserPublic::from(user)))
}

#[patch("/users/{id}")]
pub async fn update_user(
    state: Data<AppState>,
    path: web::Path<i64>,
    payload: web::Json<UserUpdate>,
) -> Result<impl Responder, AppError> {
    let user = db::update_user(&state, path.into_inner(), payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserPublic::from(user)))
}

#[delete("/users/{id}")]
pub async fn delete_user(
    state: Data<AppState>,
    path: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    db::delete_user(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

// ---- items ----

#[post("/items/")]
pub async fn create_item(
    state: Data<AppState>,
    payload: web::Json<ItemCreate>,
) -> Result<impl Responder, AppError> {
    let item = db::create_item(&state, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ItemPublic::from(item)))
}

#[get("/items/")]
pub async fn list_items(
    state: Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let items = db::get_all_items(&state, query.offset(), query.limit()).await?;
    let items: Vec<ItemPublic> = items.into_iter().map(ItemPublic::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

#[get("/items/{id}")]
pub async fn get_item(
    state: Data<AppState>,
    path: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let id = path.into_inner();
    let item = db::get_item_by_id(&state, id)
        .await?
        .ok_or_else(|| AppError::not_found("Item", id))?;
    Ok(HttpResponse::Ok().json(ItemPublic::from(item)))
}

#[patch("/items/{id}")]
pub async fn update_item(
    state: Data<AppState>,
    path: web::Path<i64>,
    payload: web::Json<ItemUpdate>,
) -> Result<impl Responder, AppError> {
    let item = db::update_item(&state, path.into_inner(), payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ItemPublic::from(item)))
}

#[delete("/items/{id}")]
pub async fn delete_item(
    state: Data<AppState>,
    path: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    db::delete_item(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}
