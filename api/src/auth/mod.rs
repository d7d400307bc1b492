pub mod claims;
pub mod extractors;
pub mod guards;
pub mod middleware;
pub mod roles;

pub use claims::{AuthUser, Claims};
pub use extractors::CurrentUser;
pub use roles::RoleSet;

use chrono::{Duration, Utc};
use db::models::role::RoleName;
use jsonwebtoken::{EncodingKey, Header, encode};
use util::config;

/// Generates a JWT and its expiry timestamp (RFC 3339) for a given user.
pub fn generate_jwt(
    user_id: i64,
    email: &str,
    roles: &[RoleName],
) -> Result<(String, String), jsonwebtoken::errors::Error> {
    let expiry = Utc::now() + Duration::minutes(config::jwt_duration_minutes() as i64);

    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        roles: roles.to_vec(),
        exp: expiry.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config::jwt_secret().as_bytes()),
    )?;

    Ok((token, expiry.to_rfc3339()))
}
