#![cfg(test)]

use jsonwebtoken::{encode, EncodingKey, Header};
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

use models::db::connect_with_config;
use crate::token::{Identity, JwtTokenVerifier, TokenVerifier};

pub const TEST_SECRET: &str = "test-secret";

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

pub fn now_secs() -> u64 {
    chrono::Utc::now().timestamp() as u64
}

/// Sign an HS256 token for `sub` expiring at `exp` (unix seconds).
pub fn mint_token(sub: &str, exp: u64) -> String {
    #[derive(serde::Serialize)]
    struct Claims<'a> { sub: &'a str, exp: u64, iat: u64 }
    let claims = Claims { sub, exp, iat: now_secs() };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(TEST_SECRET.as_bytes()))
        .expect("sign test token")
}

/// A fresh identity, obtained the only way identities exist: by validating a token.
pub fn identity() -> Identity {
    let token = mint_token(&uuid::Uuid::new_v4().to_string(), now_secs() + 600);
    JwtTokenVerifier::new(TEST_SECRET)
        .and_then(|v| v.validate(&token))
        .expect("validate test token")
}

fn test_db_config() -> anyhow::Result<configs::DatabaseConfig> {
    let mut cfg = configs::load_default().map(|c| c.database).unwrap_or_default();
    cfg.normalize_from_env();
    cfg.validate()?;
    cfg.min_connections = 1;
    cfg.max_connections = cfg.max_connections.max(5);
    cfg.acquire_timeout_secs = 3;
    cfg.connect_timeout_secs = 3;
    Ok(cfg)
}

pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let cfg = test_db_config()?;
    let cfg_ref = &cfg;
    let migrated = *MIGRATED
        .get_or_init(|| async move {
            match connect_with_config(cfg_ref).await {
                Ok(db) => migration::Migrator::up(&db, None).await.is_ok(),
                Err(_) => false,
            }
        })
        .await;
    if !migrated {
        anyhow::bail!("database unavailable or migrations failed");
    }
    // Return a fresh connection for the current test's runtime
    let db = connect_with_config(&cfg).await?;
    Ok(db)
}
