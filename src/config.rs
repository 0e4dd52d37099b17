use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub maturity_check_interval_secs: u64,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenv::dotenv().ok();

        let database_url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()?;

        let maturity_check_interval_secs: u64 = env::var("MATURITY_CHECK_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()?;
        if maturity_check_interval_secs == 0 {
            return Err("MATURITY_CHECK_INTERVAL_SECS must be greater than zero".into());
        }

        let run_migrations = Self::parse_flag(
            &env::var("RUN_MIGRATIONS").unwrap_or_else(|_| "true".to_string())
        )?;

        Ok(Config {
            database_url,
            server_host,
            server_port,
            maturity_check_interval_secs,
            run_migrations,
        })
    }

    fn parse_flag(value: &str) -> Result<bool, Box<dyn std::error::Error>> {
        match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(format!("Invalid boolean flag: {}", other).into()),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
