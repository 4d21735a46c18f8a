use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub bonus: BonusConfig,
    #[serde(default)]
    pub stripe: StripeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_in: i64, // seconds
}

/// 登录奖励配置
/// 原服务基准时区为 JST (UTC+9), 每日 10:00 重置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusConfig {
    #[serde(default = "default_reset_hour")]
    pub reset_hour: u32,
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
    #[serde(default = "default_bonus_amount")]
    pub amount: i64,
    #[serde(default = "default_bonus_ticket_code")]
    pub ticket_code: String,
}

fn default_reset_hour() -> u32 {
    10
}

fn default_utc_offset_hours() -> i32 {
    9
}

fn default_bonus_amount() -> i64 {
    1
}

fn default_bonus_ticket_code() -> String {
    "free".to_string()
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            reset_hour: default_reset_hour(),
            utc_offset_hours: default_utc_offset_hours(),
            amount: default_bonus_amount(),
            ticket_code: default_bonus_ticket_code(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StripeConfig {
    #[serde(default)]
    pub webhook_secret: String,
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件, 如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => toml::from_str(&config_str)
                .map_err(|e| format!("Failed to parse config file: {e}"))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // 无配置文件时数据库 URL 必须提供
                let database_url = get_env("DATABASE_URL")
                    .ok_or("Missing DATABASE_URL env var and no config.toml found")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    jwt: JwtConfig {
                        secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                        access_token_expires_in: get_env_parse("JWT_ACCESS_EXPIRES_IN", 7200i64),
                    },
                    bonus: BonusConfig {
                        reset_hour: get_env_parse("BONUS_RESET_HOUR", default_reset_hour()),
                        utc_offset_hours: get_env_parse(
                            "BONUS_UTC_OFFSET_HOURS",
                            default_utc_offset_hours(),
                        ),
                        amount: get_env_parse("BONUS_AMOUNT", default_bonus_amount()),
                        ticket_code: get_env("BONUS_TICKET_CODE")
                            .unwrap_or_else(default_bonus_ticket_code),
                    },
                    stripe: StripeConfig {
                        webhook_secret: get_env("STRIPE_WEBHOOK_SECRET").unwrap_or_default(),
                    },
                }
            }
            Err(e) => {
                return Err(format!("Failed to read config file {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖 (文件存在时同样生效)
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            config.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ACCESS_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            config.jwt.access_token_expires_in = n;
        }
        if let Ok(v) = env::var("BONUS_RESET_HOUR")
            && let Ok(n) = v.parse()
        {
            config.bonus.reset_hour = n;
        }
        if let Ok(v) = env::var("BONUS_UTC_OFFSET_HOURS")
            && let Ok(n) = v.parse()
        {
            config.bonus.utc_offset_hours = n;
        }
        if let Ok(v) = env::var("BONUS_AMOUNT")
            && let Ok(n) = v.parse()
        {
            config.bonus.amount = n;
        }
        if let Ok(v) = env::var("BONUS_TICKET_CODE") {
            config.bonus.ticket_code = v;
        }
        if let Ok(v) = env::var("STRIPE_WEBHOOK_SECRET") {
            config.stripe.webhook_secret = v;
        }

        Ok(config)
    }
}
