use argon2::{
    Argon2, Params,
    password_hash::{
        Error, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{Duration, Utc};
use constant_time_eq::constant_time_eq;

use std::sync::OnceLock;

pub struct PasswordManager;

static INSTANCE: OnceLock<Argon2> = OnceLock::new();

impl PasswordManager {
    fn engine() -> &'static Argon2<'static> {
        INSTANCE.get_or_init(|| {
            let params = Params::new(
                64 * 1024, // 64MB Memory (m)
                3,         // 3 Iterations (t)
                4,         // 4 Parallelism lanes (p)
                None,      // Default hash length (32 bytes)
            )
            .expect("Invalid Argon2 parameters");

            Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params)
        })
    }

    pub fn hash_password(password: &str) -> Result<String, Error> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::engine().hash_password(password.as_bytes(), &salt)?;

        Ok(hash.to_string())
    }

    pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, Error> {
        let parsed_hash = PasswordHash::new(stored_hash)?;

        let result = Self::engine().verify_password(password.as_bytes(), &parsed_hash);

        match result {
            Ok(_) => Ok(true),
            Err(Error::Password) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Stateless admin session tokens: `<expiry-unix>.<mac>` where the MAC binds
/// the expiry to the server secret. Nothing is stored server-side, so tokens
/// survive restarts and work across instances.
#[derive(Clone)]
pub struct SessionKeeper {
    secret: String,
}

impl SessionKeeper {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    pub fn issue(&self, ttl: Duration) -> String {
        let expiry = (Utc::now() + ttl).timestamp();
        format!("{}.{}", expiry, self.mac(expiry))
    }

    pub fn verify(&self, token: &str) -> bool {
        let Some((expiry, mac)) = token.split_once('.') else {
            return false;
        };

        let Ok(expiry) = expiry.parse::<i64>() else {
            return false;
        };

        if expiry < Utc::now().timestamp() {
            return false;
        }

        constant_time_eq(self.mac(expiry).as_bytes(), mac.as_bytes())
    }

    fn mac(&self, expiry: i64) -> String {
        let digest = hmac_sha256::HMAC::mac(expiry.to_string().as_bytes(), self.secret.as_bytes());
        URL_SAFE_NO_PAD.encode(digest)
    }
}
