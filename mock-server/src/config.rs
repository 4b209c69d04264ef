use std::env;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

/// Whether writes survive past the response that acknowledges them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Persistence {
    /// Writes are stored in memory for the life of the process.
    #[default]
    Durable,
    /// Writes are answered as if applied but nothing is stored, like the
    /// public demo API.
    Echo,
}

impl FromStr for Persistence {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "durable" => Ok(Persistence::Durable),
            "echo" => Ok(Persistence::Echo),
            other => Err(anyhow!("unknown persistence mode: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub persistence: Persistence,
}

impl Config {
    /// `PORT` (default 3000) and `MOCK_PERSISTENCE` (`durable` or `echo`).
    pub fn from_env() -> Result<Self> {
        let port = match env::var("PORT") {
            Ok(p) => p.parse().with_context(|| format!("invalid PORT: {p}"))?,
            Err(_) => 3000,
        };
        let persistence = match env::var("MOCK_PERSISTENCE") {
            Ok(p) => p.parse()?,
            Err(_) => Persistence::default(),
        };
        Ok(Config { port, persistence })
    }
}
