use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// Any failure here is fatal: the process must not start a run with a
/// half-read configuration.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use dredge::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Delay between fetches: {}s", config.logic.delay);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[logic]
delay = 1.5
recheck_interval = 3600
user_agent = "TestBot/2.0"
respect_robots_txt = false

[[logic.sources]]
name = "blog"
url = "https://blog.example/"

[db]
path = "./test.db"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.logic.delay, 1.5);
        assert_eq!(config.logic.recheck_interval, 3600);
        assert_eq!(config.logic.user_agent, "TestBot/2.0");
        assert!(!config.logic.respect_robots_txt);
        assert_eq!(config.logic.sources.len(), 1);
        assert_eq!(config.logic.sources[0].name, "blog");
    }

    #[test]
    fn test_defaults_applied() {
        let config_content = r#"
[logic]
delay = 1.0

[[logic.sources]]
name = "news"
url = "https://news.example/"

[db]
path = "./test.db"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.logic.recheck_interval, 86400);
        assert_eq!(config.logic.user_agent, "SearchBot/1.0");
        assert!(config.logic.respect_robots_txt);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[logic]
delay = -2.0

[[logic.sources]]
name = "blog"
url = "https://blog.example/"

[db]
path = "./test.db"
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }
}
