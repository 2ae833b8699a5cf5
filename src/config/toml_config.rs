use crate::adapters::{cat_api::DEFAULT_CAT_API_BASE, dog_api::DEFAULT_DOG_API_BASE};
use crate::core::aggregator::DEFAULT_BATCH_SIZE;
use crate::core::{ConfigProvider, SizePolicy};
use crate::domain::model::Size;
use crate::utils::error::{PetError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    pub dog_api_base: Option<String>,
    pub cat_api_base: Option<String>,
    pub cat_api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub batch_size: Option<usize>,
    pub fetch_timeout_seconds: Option<u64>,
    pub request_timeout_seconds: Option<u64>,
    pub concurrent_requests: Option<usize>,
    /// 設定後所有貓都使用這個 size
    pub cat_size: Option<Size>,
    pub seed: Option<u64>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| PetError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CAT_API_KEY})；找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl ConfigProvider for TomlConfig {
    fn dog_api_base(&self) -> &str {
        self.providers
            .dog_api_base
            .as_deref()
            .unwrap_or(DEFAULT_DOG_API_BASE)
    }

    fn cat_api_base(&self) -> &str {
        self.providers
            .cat_api_base
            .as_deref()
            .unwrap_or(DEFAULT_CAT_API_BASE)
    }

    fn batch_size(&self) -> usize {
        self.catalog.batch_size.unwrap_or(DEFAULT_BATCH_SIZE)
    }

    fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog.fetch_timeout_seconds.unwrap_or(10))
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog.request_timeout_seconds.unwrap_or(5))
    }

    fn concurrent_requests(&self) -> usize {
        self.catalog.concurrent_requests.unwrap_or(5)
    }

    fn cat_size_policy(&self) -> SizePolicy {
        self.catalog
            .cat_size
            .map(SizePolicy::Fixed)
            .unwrap_or_default()
    }

    fn cat_api_key(&self) -> Option<&str> {
        // 未替換的 ${VAR} 視為沒有設定
        self.providers
            .cat_api_key
            .as_deref()
            .filter(|key| !key.is_empty() && !key.starts_with("${"))
    }

    fn seed(&self) -> Option<u64> {
        self.catalog.seed
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("providers.dog_api_base", self.dog_api_base())?;
        validation::validate_url("providers.cat_api_base", self.cat_api_base())?;
        validation::validate_range("catalog.batch_size", self.batch_size(), 1, 100)?;
        validation::validate_range(
            "catalog.fetch_timeout_seconds",
            self.fetch_timeout().as_secs(),
            1,
            300,
        )?;
        validation::validate_range(
            "catalog.request_timeout_seconds",
            self.request_timeout().as_secs(),
            1,
            300,
        )?;
        validation::validate_positive_number(
            "catalog.concurrent_requests",
            self.concurrent_requests(),
            1,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[providers]
dog_api_base = "https://dogs.example.com/api"
cat_api_base = "https://cats.example.com/v1"

[catalog]
batch_size = 4
fetch_timeout_seconds = 20
concurrent_requests = 2
cat_size = "Small"
seed = 99
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.dog_api_base(), "https://dogs.example.com/api");
        assert_eq!(config.cat_api_base(), "https://cats.example.com/v1");
        assert_eq!(config.batch_size(), 4);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(20));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.concurrent_requests(), 2);
        assert_eq!(config.cat_size_policy(), SizePolicy::Fixed(Size::Small));
        assert_eq!(config.seed(), Some(99));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.dog_api_base(), "https://dog.ceo/api");
        assert_eq!(config.cat_api_base(), "https://api.thecatapi.com/v1");
        assert_eq!(config.batch_size(), 10);
        assert_eq!(config.cat_size_policy(), SizePolicy::Random);
        assert_eq!(config.cat_api_key(), None);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PET_CATALOG_TEST_CAT_KEY", "live-key");

        let toml_content = r#"
[providers]
cat_api_key = "${PET_CATALOG_TEST_CAT_KEY}"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.cat_api_key(), Some("live-key"));

        std::env::remove_var("PET_CATALOG_TEST_CAT_KEY");
    }

    #[test]
    fn test_missing_env_var_means_no_key() {
        let toml_content = r#"
[providers]
cat_api_key = "${PET_CATALOG_TEST_UNSET_KEY}"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.cat_api_key(), None);
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[providers]
dog_api_base = "not-a-url"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[catalog]\nbatch_size = 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[catalog\nbatch_size = 1").unwrap_err();
        assert!(matches!(err, PetError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[catalog]\nbatch_size = 3\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.batch_size(), 3);
    }
}
