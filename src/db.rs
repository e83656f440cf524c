use sqlx::SqlitePool;

use crate::{
    errors::AppError,
    structs::{
        validate_price, Item, ItemCreate, ItemUpdate, Team, TeamCreate, TeamUpdate, User,
        UserCreate, UserUpdate,
    },
    utils, AppState,
};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS teams (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        headquarters TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_teams_name ON teams(name)",
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT,
        age INTEGER,
        team_id INTEGER REFERENCES teams(id),
        pwd_hash TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        price INTEGER NOT NULL DEFAULT 0,
        is_offer INTEGER NOT NULL DEFAULT 0,
        units INTEGER NOT NULL,
        units_measurement TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
];

/// Creates all tables on startup. No migration versioning; every statement
/// is IF NOT EXISTS and safe to re-run.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

// ---- teams ----

pub async fn create_team(state: &AppState, payload: TeamCreate) -> Result<Team, AppError> {
    let created_at = chrono::Utc::now().to_string();
    let pool = state.db_pool.clone();
    let team = sqlx::query_as::<_, Team>(
        "INSERT INTO teams (name, headquarters, created_at, updated_at) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(&payload.name)
    .bind(&payload.headquarters)
    .bind(&created_at)
    .bind(&created_at)
    .fetch_one(&pool)
    .await?;
    log::info!("Team created: {:?}", team);
    Ok(team)
}

pub async fn get_all_teams(
    state: &AppState,
    offset: i64,
    limit: i64,
) -> Result<Vec<Team>, sqlx::Error> {
    let pool = state.db_pool.clone();
    let teams = sqlx::query_as::<_, Team>("SELECT * FROM teams ORDER BY id LIMIT $1 OFFSET $2")
        .bind(limit)
        .bind(offset)
        .fetch_all(&pool)
        .await?;
    Ok(teams)
}

pub async fn get_team_by_id(state: &AppState, id: i64) -> Result<Option<Team>, sqlx::Error> {
    let pool = state.db_pool.clone();
    let team = sqlx::query_as::<_, Team>("SELECT * FROM teams WHERE id = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await?;
    Ok(team)
}

pub async fn update_team(
    state: &AppState,
    id: i64,
    payload: TeamUpdate,
) -> Result<Team, AppError> {
    let pool = state.db_pool.clone();
    let updated_at = chrono::Utc::now().to_string();

    let mut param_index = 2;
    let mut query = String::from("UPDATE teams SET updated_at = $1");
    if payload.name.is_some() {
        query.push_str(&format!(", name = ${}", param_index));
        param_index += 1;
    }
    if payload.headquarters.is_some() {
        query.push_str(&format!(", headquarters = ${}", param_index));
        param_index += 1;
    }
    query.push_str(&format!(" WHERE id = ${} RETURNING *", param_index));

    let mut q = sqlx::query_as::<_, Team>(&query);
    q = q.bind(&updated_at);
    if let Some(name) = &payload.name {
        q = q.bind(name);
    }
    if let Some(headquarters) = &payload.headquarters {
        q = q.bind(headquarters);
    }
    q = q.bind(id);

    let team = q
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| AppError::not_found("Team", id))?;
    log::info!("Team updated: {:?}", team);
    Ok(team)
}

pub async fn delete_team(state: &AppState, id: i64) -> Result<(), AppError> {
    let pool = state.db_pool.clone();
    let result = sqlx::query("DELETE FROM teams WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Team", id));
    }
    log::info!("Team with id {} deleted", id);
    Ok(())
}

pub async fn get_users_by_team_id(
    state: &AppState,
    team_id: i64,
    offset: i64,
    limit: i64,
) -> Result<Vec<User>, sqlx::Error> {
    let pool = state.db_pool.clone();
    let users = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE team_id = $1 ORDER BY id LIMIT $2 OFFSET $3",
    )
    .bind(team_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(&pool)
    .await?;
    Ok(users)
}

// ---- users ----

pub async fn create_user(state: &AppState, payload: UserCreate) -> Result<User, AppError> {
    let pwd_hash = utils::hash_password(&payload.password).map_err(|e| {
        log::error!("Failed to hash password: {}", e);
        AppError::PasswordError(e.to_string())
    })?;
    let created_at = chrono::Utc::now().to_string();
    let pool = state.db_pool.clone();
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email, age, team_id, pwd_hash, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(payload.age)
    .bind(payload.team_id)
    .bind(&pwd_hash)
    .bind(&created_at)
    .bind(&created_at)
    .fetch_one(&pool)
    .await?;
    log::info!("User created with id {}", user.id);
    Ok(user)
}

pub async fn get_all_users(
    state: &AppState,
    offset: i64,
    limit: i64,
) -> Result<Vec<User>, sqlx::Error> {
    let pool = state.db_pool.clone();
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id LIMIT $1 OFFSET $2")
        .bind(limit)
        .bind(offset)
        .fetch_all(&pool)
        .await?;
    Ok(users)
}

pub async fn get_user_by_id(state: &AppState, id: i64) -> Result<Option<User>, sqlx::Error> {
    let pool = state.db_pool.clone();
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await?;
    Ok(user)
}

pub async fn update_user(
    state: &AppState,
    id: i64,
    payload: UserUpdate,
) -> Result<User, AppError> {
    // Rehash up front so a bad password never leaves a half-built query.
    let pwd_hash = match &payload.password {
        Some(password) => Some(utils::hash_password(password).map_err(|e| {
            log::error!("Failed to hash password: {}", e);
            AppError::PasswordError(e.to_string())
        })?),
        None => None,
    };
    let pool = state.db_pool.clone();
    let updated_at = chrono::Utc::now().to_string();

    let mut param_index = 2;
    let mut query = String::from("UPDATE users SET updated_at = $1");
    if payload.name.is_some() {
        query.push_str(&format!(", name = ${}", param_index));
        param_index += 1;
    }
    if payload.email.is_some() {
        query.push_str(&format!(", email = ${}", param_index));
        param_index += 1;
    }
    if payload.age.is_some() {
        query.push_str(&format!(", age = ${}", param_index));
        param_index += 1;
    }
    if payload.team_id.is_some() {
        query.push_str(&format!(", team_id = ${}", param_index));
        param_index += 1;
    }
    if pwd_hash.is_some() {
        query.push_str(&format!(", pwd_hash = ${}", param_index));
        param_index += 1;
    }
    query.push_str(&format!(" WHERE id = ${} RETURNING *", param_index));

    let mut q = sqlx::query_as::<_, User>(&query);
    q = q.bind(&updated_at);
    if let Some(name) = &payload.name {
        q = q.bind(name);
    }
    if let Some(email) = &payload.email {
        q = q.bind(email);
    }
    if let Some(age) = payload.age {
        q = q.bind(age);
    }
    if let Some(team_id) = payload.team_id {
        q = q.bind(team_id);
    }
    if let Some(pwd_hash) = &pwd_hash {
        q = q.bind(pwd_hash);
    }
    q = q.bind(id);

    let user = q
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;
    log::info!("User updated with id {}", user.id);
    Ok(user)
}

pub async fn delete_user(state: &AppState, id: i64) -> Result<(), AppError> {
    let pool = state.db_pool.clone();
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("User", id));
    }
    log::info!("User with id {} deleted", id);
    Ok(())
}

// ---- items ----

pub async fn create_item(state: &AppState, payload: ItemCreate) -> Result<Item, AppError> {
    let price = validate_price(payload.price)?;
    let created_at = chrono::Utc::now().to_string();
    let pool = state.db_pool.clone();
    let item = sqlx::query_as::<_, Item>(
        "INSERT INTO items (name, price, is_offer, units, units_measurement, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(&payload.name)
    .bind(price)
    .bind(payload.is_offer)
    .bind(payload.units)
    .bind(&payload.units_measurement)
    .bind(&created_at)
    .bind(&created_at)
    .fetch_one(&pool)
    .await?;
    log::info!("Item created: {:?}", item);
    Ok(item)
}

pub async fn get_all_items(
    state: &AppState,
    offset: i64,
    limit: i64,
) -> Result<Vec<Item>, sqlx::Error> {
    let pool = state.db_pool.clone();
    let items = sqlx::query_as::<_, Item>("SELECT * FROM items ORDER BY id LIMIT $1 OFFSET $2")
        .bind(limit)
        .bind(offset)
        .fetch_all(&pool)
        .await?;
    Ok(items)
}

pub async fn get_item_by_id(state: &AppState, id: i64) -> Result<Option<Item>, sqlx::Error> {
    let pool = state.db_pool.clone();
    let item = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await?;
    Ok(item)
}

pub async fn update_item(
    state: &AppState,
    id: i64,
    payload: ItemUpdate,
) -> Result<Item, AppError> {
    let price = payload.price.map(validate_price).transpose()?;
    let pool = state.db_pool.clone();
    let updated_at = chrono::Utc::now().to_string();

    let mut param_index = 2;
    let mut query = String::from("UPDATE items SET updated_at = $1");
    if payload.name.is_some() {
        query.push_str(&format!(", name = ${}", param_index));
        param_index += 1;
    }
    if price.is_some() {
        query.push_str(&format!(", price = ${}", param_index));
        param_index += 1;
    }
    if payload.is_offer.is_some() {
        query.push_str(&format!(", is_offer = ${}", param_index));
        param_index += 1;
    }
    if payload.units.is_some() {
        query.push_str(&format!(", units = ${}", param_index));
        param_index += 1;
    }
    if payload.units_measurement.is_some() {
        query.push_str(&format!(", units_measurement = ${}", param_index));
        param_index += 1;
    }
    query.push_str(&format!(" WHERE id = ${} RETURNING *", param_index));

    let mut q = sqlx::query_as::<_, Item>(&query);
    q = q.bind(&updated_at);
    if let Some(name) = &payload.name {
        q = q.bind(name);
    }
    if let Some(price) = price {
        q = q.bind(price);
    }
    if let Some(is_offer) = payload.is_offer {
        q = q.bind(is_offer);
    }
    if let Some(units) = payload.units {
        q = q.bind(units);
    }
    if let Some(units_measurement) = &payload.units_measurement {
        q = q.bind(units_measurement);
    }
    q = q.bind(id);

    let item = q
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| AppError::not_found("Item", id))?;
    log::info!("Item updated: {:?}", item);
    Ok(item)
}

pub async fn delete_item(state: &AppState, id: i64) -> Result<(), AppError> {
    let pool = state.db_pool.clone();
    let result = sqlx::query("DELETE FROM items WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Item", id));
    }
    log::info!("Item with id {} deleted", id);
    Ok(())
}
