use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub seed_questions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: None,
            db_max_connections: 5,
            seed_questions: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = env::var("BACKEND_HOST").unwrap_or(defaults.host);
        let port = env::var("BACKEND_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.port);
        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.db_max_connections);
        let seed_questions = env::var("SEED_QUESTIONS")
            .ok()
            .map(|v| parse_flag(&v))
            .unwrap_or(defaults.seed_questions);

        Self {
            host,
            port,
            database_url,
            db_max_connections,
            seed_questions,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(value.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off" | "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("False"));
        assert!(!parse_flag(" off "));
    }

    #[test]
    fn default_is_in_memory_and_seeded() {
        let config = Config::default();
        assert!(config.database_url.is_none());
        assert!(config.seed_questions);
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }
}
