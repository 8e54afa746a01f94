use std::str::FromStr;

use anyhow::{Context, Result};

use crate::layout::PageGeometry;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Page used when a request does not override the margin.
    pub page: PageGeometry,
    /// Upper bound on images per request. Slicing is quadratic in this.
    pub max_images: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = PageGeometry::default();
        let page = PageGeometry {
            width_mm: env_or("PAGE_WIDTH_MM", defaults.width_mm)?,
            height_mm: env_or("PAGE_HEIGHT_MM", defaults.height_mm)?,
            margin_mm: env_or("PAGE_MARGIN_MM", defaults.margin_mm)?,
        };
        page.printable_area()
            .context("PAGE_WIDTH_MM, PAGE_HEIGHT_MM and PAGE_MARGIN_MM must describe a printable page")?;

        Ok(Config {
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            page,
            max_images: env_or("MAX_IMAGES", 500)?,
        })
    }
}

/// Reads and parses `key`, falling back to `default` when it is unset.
fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_falls_back_when_unset() {
        let value: u16 = env_or("SLICED_TEST_UNSET_VARIABLE", 8080).unwrap();
        assert_eq!(value, 8080);
    }

    #[test]
    fn test_env_or_parses_and_rejects() {
        std::env::set_var("SLICED_TEST_MARGIN", " 12.5 ");
        let margin: f64 = env_or("SLICED_TEST_MARGIN", 20.0).unwrap();
        assert!((margin - 12.5).abs() < 1e-12);

        std::env::set_var("SLICED_TEST_PORT", "not-a-port");
        let err = env_or::<u16>("SLICED_TEST_PORT", 8080).unwrap_err();
        assert!(err.to_string().contains("SLICED_TEST_PORT"));
    }
}
