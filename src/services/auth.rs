use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{
    auth::{Claims, RefreshClaims},
    user::{LoginResponse, RefreshToken, User},
};

pub struct AuthService;

impl AuthService {
    /// Create an account. Fails if the email is already taken.
    pub async fn register(
        pool: &PgPool,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> anyhow::Result<User> {
        let email = email.trim().to_lowercase();
        anyhow::ensure!(!email.is_empty(), "Email is required");
        anyhow::ensure!(password.len() >= 8, "Password must be at least 8 characters");

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(&email)
                .fetch_one(pool)
                .await?;
        if exists {
            anyhow::bail!("An account with this email already exists");
        }

        let password_hash = bcrypt::hash(password, 12)?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash, first_name, last_name)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(&email)
        .bind(password_hash)
        .bind(first_name)
        .bind(last_name)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Validate credentials and issue an access/refresh token pair.
    pub async fn login(
        pool: &PgPool,
        email: &str,
        password: &str,
        jwt_secret: &str,
        refresh_secret: &str,
        access_ttl: u64,
        refresh_ttl_days: u64,
    ) -> anyhow::Result<LoginResponse> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = $1 AND is_active = TRUE",
        )
        .bind(email.trim().to_lowercase())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Invalid credentials"))?;

        let valid = bcrypt::verify(password, &user.password_hash)
            .map_err(|_| anyhow::anyhow!("Invalid credentials"))?;
        if !valid {
            anyhow::bail!("Invalid credentials");
        }

        let access_token = Self::generate_access_token(&user, jwt_secret, access_ttl)?;
        let refresh_token =
            Self::issue_refresh_token(pool, user.id, refresh_secret, refresh_ttl_days).await?;

        Ok(LoginResponse {
            access_token,
            refresh_token,
            user: user.into(),
        })
    }

    pub fn generate_access_token(
        user: &User,
        secret: &str,
        ttl_seconds: u64,
    ) -> anyhow::Result<String> {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: user.id.to_string(),
            iat: now,
            exp: now + ttl_seconds as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Sign a refresh JWT and persist its bcrypt hash under the jti row.
    async fn issue_refresh_token(
        pool: &PgPool,
        user_id: Uuid,
        refresh_secret: &str,
        ttl_days: u64,
    ) -> anyhow::Result<String> {
        let now = Utc::now().timestamp() as usize;
        let jti = Uuid::new_v4();
        let claims = RefreshClaims {
            sub: user_id.to_string(),
            jti: jti.to_string(),
            iat: now,
            exp: now + (ttl_days * 86400) as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(refresh_secret.as_bytes()),
        )?;

        let hash = bcrypt::hash(&token, 8)?;
        let expires_at = Utc::now() + chrono::Duration::days(ttl_days as i64);
        sqlx::query(
            "INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(jti)
        .bind(user_id)
        .bind(hash)
        .bind(expires_at)
        .execute(pool)
        .await?;

        Ok(token)
    }

    /// Rotate refresh token: revoke old, issue new pair.
    pub async fn refresh(
        pool: &PgPool,
        refresh_token_str: &str,
        jwt_secret: &str,
        refresh_secret: &str,
        access_ttl: u64,
        refresh_ttl_days: u64,
    ) -> anyhow::Result<LoginResponse> {
        use jsonwebtoken::{decode, DecodingKey, Validation};

        let key = DecodingKey::from_secret(refresh_secret.as_bytes());
        let data = decode::<RefreshClaims>(
            refresh_token_str,
            &key,
            &Validation::new(Algorithm::HS256),
        )?;
        let rc = data.claims;
        let jti: Uuid = rc.jti.parse()?;
        let user_id: Uuid = rc.sub.parse()?;

        let stored: RefreshToken = sqlx::query_as(
            "SELECT * FROM refresh_tokens WHERE id = $1 AND revoked = FALSE",
        )
        .bind(jti)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Refresh token not found or revoked"))?;

        if stored.expires_at < Utc::now() {
            anyhow::bail!("Refresh token expired");
        }
        if !bcrypt::verify(refresh_token_str, &stored.token_hash)? {
            anyhow::bail!("Refresh token invalid");
        }

        sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE id = $1")
            .bind(jti)
            .execute(pool)
            .await?;

        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE id = $1 AND is_active = TRUE",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        let access_token = Self::generate_access_token(&user, jwt_secret, access_ttl)?;
        let new_refresh =
            Self::issue_refresh_token(pool, user.id, refresh_secret, refresh_ttl_days).await?;

        Ok(LoginResponse {
            access_token,
            refresh_token: new_refresh,
            user: user.into(),
        })
    }

    /// Revoke a refresh token (logout). Tolerates already-invalid tokens.
    pub async fn logout(
        pool: &PgPool,
        refresh_token_str: &str,
        refresh_secret: &str,
    ) -> anyhow::Result<()> {
        use jsonwebtoken::{decode, DecodingKey, Validation};

        let key = DecodingKey::from_secret(refresh_secret.as_bytes());
        let data =
            decode::<RefreshClaims>(refresh_token_str, &key, &Validation::new(Algorithm::HS256));

        if let Ok(data) = data {
            let jti: Uuid = data.claims.jti.parse()?;
            sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE id = $1")
                .bind(jti)
                .execute(pool)
                .await?;
        }

        Ok(())
    }

    /// Fetch the profile row behind an access token's subject.
    pub async fn get_user(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE id = $1 AND is_active = TRUE",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(user)
    }

    /// Change password (requires current password verification).
    /// Revokes every refresh token to force re-login.
    pub async fn change_password(
        pool: &PgPool,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> anyhow::Result<()> {
        anyhow::ensure!(
            new_password.len() >= 8,
            "Password must be at least 8 characters"
        );

        let password_hash: String = sqlx::query_scalar(
            "SELECT password_hash FROM users WHERE id = $1 AND is_active = TRUE",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| anyhow::anyhow!("User not found"))?;

        let valid = bcrypt::verify(current_password, &password_hash)
            .map_err(|_| anyhow::anyhow!("Current password is incorrect"))?;
        if !valid {
            anyhow::bail!("Current password is incorrect");
        }

        let new_hash = bcrypt::hash(new_password, 12)?;
        sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(&new_hash)
            .bind(user_id)
            .execute(pool)
            .await?;

        sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(())
    }
}
