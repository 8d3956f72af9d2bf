use sqlx::PgPool;
use uuid::Uuid;

use std::sync::Arc;

use presskit::services::{LocalMediaStore, Mailer, MediaStore, SessionKeeper};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub sessions: SessionKeeper,
    pub admin_password_hash: Option<String>,
    pub mailer: Option<Arc<Mailer>>,
    pub media: Arc<dyn MediaStore>,
    pub default_author: String,
}

impl AppState {
    pub fn from_env(pool: PgPool) -> Self {
        let secret = std::env::var("SESSION_SECRET").unwrap_or_else(|_| {
            log::warn!("SESSION_SECRET not set; admin sessions will not survive restarts");
            Uuid::new_v4().to_string()
        });

        let admin_password_hash = std::env::var("ADMIN_PASSWORD_HASH").ok();
        if admin_password_hash.is_none() {
            log::warn!("ADMIN_PASSWORD_HASH not set; admin login is disabled");
        }

        let mailer = Mailer::from_env().map(Arc::new);
        if mailer.is_none() {
            log::warn!("SMTP not configured; notification emails will be skipped");
        }

        let upload_dir =
            std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string());

        Self {
            pool,
            sessions: SessionKeeper::new(secret),
            admin_password_hash,
            mailer,
            media: Arc::new(LocalMediaStore::new(upload_dir)),
            default_author: std::env::var("SITE_AUTHOR").unwrap_or_else(|_| "Admin".to_string()),
        }
    }
}
