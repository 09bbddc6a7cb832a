//! Create the admin account, or promote an existing user to admin.
//!
//! Reads `DATABASE_URL`, `ADMIN_USERNAME` and `ADMIN_PASSWORD` from the
//! environment (or `.env`). An existing user keeps their password.

use anyhow::{bail, Context};
use notekeep_api::auth::password::{hash_password, validate_password_strength};
use notekeep_db::models::user::CreateUser;
use notekeep_db::repositories::UserRepo;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notekeep_add_admin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let username = std::env::var("ADMIN_USERNAME").context("ADMIN_USERNAME must be set")?;
    let username = username.trim().to_string();
    if username.is_empty() {
        bail!("ADMIN_USERNAME must not be empty");
    }

    let pool = notekeep_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    notekeep_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    match UserRepo::find_by_username(&pool, &username).await? {
        Some(user) if user.is_admin => {
            tracing::info!(user_id = user.id, %username, "User is already an admin");
        }
        Some(user) => {
            UserRepo::set_admin(&pool, user.id, true).await?;
            tracing::info!(user_id = user.id, %username, "Promoted existing user to admin");
        }
        None => {
            let password =
                std::env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD must be set")?;
            if let Err(msg) = validate_password_strength(&password) {
                bail!(msg);
            }
            let password_hash =
                hash_password(&password).map_err(|e| anyhow::anyhow!("Hashing failed: {e}"))?;
            let user = UserRepo::create(
                &pool,
                &CreateUser {
                    username: username.clone(),
                    password_hash,
                    is_admin: true,
                },
            )
            .await?;
            tracing::info!(user_id = user.id, %username, "Admin account created");
        }
    }

    pool.close().await;
    Ok(())
}
