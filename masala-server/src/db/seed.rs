//! First-start seeding
//!
//! 初次启动时写入：内建角色、admin 账号、设置单例。已存在则跳过。

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::permission::default_access;
use shared::settings::RestaurantSettings;

use crate::auth::password;
use crate::db::models::{RoleRecord, UserRecord};
use crate::db::repository::{RoleRepository, SettingsRepository, UserRepository};
use crate::utils::AppError;
use crate::utils::time::now_millis;

/// Built-in roles, seeded with their default section access
const BUILTIN_ROLES: &[(&str, bool)] = &[
    ("admin", true),
    ("manager", false),
    ("kitchen", false),
    ("staff", false),
];

const DEFAULT_ADMIN_USERNAME: &str = "admin";

pub async fn seed(db: &Surreal<Db>) -> Result<(), AppError> {
    seed_roles(db).await?;
    seed_admin_user(db).await?;
    seed_settings(db).await?;
    Ok(())
}

async fn seed_roles(db: &Surreal<Db>) -> Result<(), AppError> {
    let repo = RoleRepository::new(db.clone());
    for (name, is_system) in BUILTIN_ROLES {
        if repo.find_by_name(name).await?.is_none() {
            repo.insert_raw(RoleRecord {
                name: (*name).to_string(),
                access: default_access(name),
                is_system: *is_system,
            })
            .await?;
            tracing::info!(role = name, "Seeded built-in role");
        }
    }
    Ok(())
}

async fn seed_admin_user(db: &Surreal<Db>) -> Result<(), AppError> {
    let repo = UserRepository::new(db.clone());
    if repo.find_by_username(DEFAULT_ADMIN_USERNAME).await?.is_some() {
        return Ok(());
    }

    // 初始口令从环境读取；未设置时生成随机口令并打印一次
    let (password, generated) = match std::env::var("ADMIN_INITIAL_PASSWORD") {
        Ok(p) if !p.is_empty() => (p, false),
        _ => (uuid::Uuid::new_v4().simple().to_string(), true),
    };
    let password_hash = password::hash_password(&password)
        .map_err(|e| AppError::internal(format!("Failed to hash admin password: {}", e)))?;

    let record = UserRecord {
        username: DEFAULT_ADMIN_USERNAME.to_string(),
        password_hash,
        full_name: "Administrator".to_string(),
        role: "admin".to_string(),
        created_at: now_millis(),
    };
    let _created: Option<serde_json::Value> = db
        .create("user")
        .content(record)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    if generated {
        tracing::warn!(
            username = DEFAULT_ADMIN_USERNAME,
            password = %password,
            "Seeded admin user with a generated password - change it after first login"
        );
    } else {
        tracing::info!(username = DEFAULT_ADMIN_USERNAME, "Seeded admin user");
    }
    Ok(())
}

async fn seed_settings(db: &Surreal<Db>) -> Result<(), AppError> {
    let repo = SettingsRepository::new(db.clone());
    if repo.get().await?.is_none() {
        repo.put(RestaurantSettings::default()).await?;
        tracing::info!("Seeded default restaurant settings");
    }
    Ok(())
}
