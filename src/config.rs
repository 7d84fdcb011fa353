use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Zero disables expiry: tokens carry no `exp` claim.
    pub ttl_minutes: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvatarConfig {
    pub api_url: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    pub avatar: AvatarConfig,
    pub cors_origin: Option<String>,
}

const DEFAULT_AVATAR_API_URL: &str = "https://avatarapi.com/v2/api.aspx";
const DEFAULT_TTL_MINUTES: u64 = 60 * 24 * 7;
/// One year.
pub const MAX_TTL_MINUTES: u64 = 60 * 24 * 365;

/// `JWT_TTL_MINUTES`: unset means the default, `0` means never expire,
/// anything negative, non-numeric or beyond a year is a startup error.
fn parse_ttl_minutes(raw: Option<&str>) -> anyhow::Result<u64> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(DEFAULT_TTL_MINUTES);
    };
    let minutes: u64 = raw
        .parse()
        .map_err(|_| anyhow::anyhow!("JWT_TTL_MINUTES must be a whole number of minutes, got `{raw}`"))?;
    if minutes > MAX_TTL_MINUTES {
        anyhow::bail!("JWT_TTL_MINUTES must be at most {MAX_TTL_MINUTES}, got {minutes}");
    }
    Ok(minutes)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let db_max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "bizcard".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "bizcard-users".into()),
            ttl_minutes: parse_ttl_minutes(std::env::var("JWT_TTL_MINUTES").ok().as_deref())?,
        };
        let avatar = AvatarConfig {
            api_url: std::env::var("AVATAR_API_URL")
                .unwrap_or_else(|_| DEFAULT_AVATAR_API_URL.into()),
            username: std::env::var("AVATAR_API_USERNAME").unwrap_or_default(),
            password: std::env::var("AVATAR_API_PASSWORD").unwrap_or_default(),
        };
        let cors_origin = std::env::var("CORS_ORIGIN")
            .ok()
            .filter(|v| !v.trim().is_empty());
        Ok(Self {
            database_url,
            db_max_connections,
            jwt,
            avatar,
            cors_origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_defaults_when_unset() {
        assert_eq!(parse_ttl_minutes(None).unwrap(), DEFAULT_TTL_MINUTES);
        assert_eq!(parse_ttl_minutes(Some(" ")).unwrap(), DEFAULT_TTL_MINUTES);
        assert_eq!(parse_ttl_minutes(Some("0")).unwrap(), 0);
        assert_eq!(parse_ttl_minutes(Some("30")).unwrap(), 30);
    }

    #[test]
    fn ttl_rejects_negative_and_huge_values() {
        assert!(parse_ttl_minutes(Some("-5")).is_err());
        assert!(parse_ttl_minutes(Some("1000000000000")).is_err());
        assert!(parse_ttl_minutes(Some("a week")).is_err());
        assert!(parse_ttl_minutes(Some(&(MAX_TTL_MINUTES + 1).to_string())).is_err());
        assert_eq!(
            parse_ttl_minutes(Some(&MAX_TTL_MINUTES.to_string())).unwrap(),
            MAX_TTL_MINUTES
        );
    }
}
