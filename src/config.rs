use std::net::IpAddr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub database: DatabaseConfig,
    pub smtp: Option<SmtpConfig>,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub pass: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
}

// Hand-written so the password never reaches a log line.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub encryption: Encryption,
    pub from: String,
    pub from_name: String,
    pub reply_to: Option<String>,
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .field("encryption", &self.encryption)
            .field("from", &self.from)
            .field("from_name", &self.from_name)
            .field("reply_to", &self.reply_to)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// How the SMTP session is secured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Encryption {
    StartTls,
    Tls,
    None,
}

impl std::str::FromStr for Encryption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "starttls" | "tls-starttls" => Ok(Encryption::StartTls),
            "tls" | "ssl" | "smtps" => Ok(Encryption::Tls),
            "none" | "plain" => Ok(Encryption::None),
            other => Err(format!("Invalid PORTAL_SMTP_ENCRYPTION: {other}")),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup };

        let host: IpAddr = env
            .or("PORTAL_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid PORTAL_HOST: {e}"))?;

        let port: u16 = env
            .or("PORTAL_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid PORTAL_PORT: {e}"))?;

        let log_level = env.or("PORTAL_LOG_LEVEL", "info");

        let database = DatabaseConfig {
            host: env.or("PORTAL_DB_HOST", "localhost"),
            port: env
                .or("PORTAL_DB_PORT", "3306")
                .parse()
                .map_err(|e| format!("Invalid PORTAL_DB_PORT: {e}"))?,
            name: env.required("PORTAL_DB_NAME")?,
            user: env.required("PORTAL_DB_USER")?,
            pass: env.or("PORTAL_DB_PASS", ""),
            max_connections: env
                .or("PORTAL_DB_MAX_CONNECTIONS", "5")
                .parse()
                .map_err(|e| format!("Invalid PORTAL_DB_MAX_CONNECTIONS: {e}"))?,
            connect_timeout: Duration::from_secs(
                env.or("PORTAL_DB_CONNECT_TIMEOUT_SECS", "10")
                    .parse()
                    .map_err(|e| format!("Invalid PORTAL_DB_CONNECT_TIMEOUT_SECS: {e}"))?,
            ),
        };

        let smtp = match (env.get("PORTAL_SMTP_USER"), env.get("PORTAL_SMTP_PASS")) {
            (Some(user), Some(pass)) => {
                let timeout = env
                    .get("PORTAL_SMTP_TIMEOUT_SECS")
                    .map(|s| {
                        s.parse::<u64>()
                            .map(Duration::from_secs)
                            .map_err(|e| format!("Invalid PORTAL_SMTP_TIMEOUT_SECS: {e}"))
                    })
                    .transpose()?;

                Some(SmtpConfig {
                    host: env.or("PORTAL_SMTP_HOST", "smtp.gmail.com"),
                    port: env
                        .or("PORTAL_SMTP_PORT", "587")
                        .parse()
                        .map_err(|e| format!("Invalid PORTAL_SMTP_PORT: {e}"))?,
                    encryption: env.or("PORTAL_SMTP_ENCRYPTION", "starttls").parse()?,
                    from: env.get("PORTAL_SMTP_FROM").unwrap_or_else(|| user.clone()),
                    from_name: env.or("PORTAL_SMTP_FROM_NAME", "Data Exchange Portal"),
                    reply_to: env.get("PORTAL_SMTP_REPLY_TO"),
                    timeout,
                    user,
                    pass,
                })
            }
            _ => None,
        };

        Ok(Config {
            host,
            port,
            log_level,
            database,
            smtp,
        })
    }
}

struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, String> {
        self.get(key)
            .ok_or_else(|| format!("Missing required environment variable: {key}"))
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }
}
