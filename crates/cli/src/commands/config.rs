use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use cartview_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "database.url",
        &config.database.url,
        source("database.url", &["CARTVIEW_DATABASE_URL"]),
    ));
    lines.push(render_line(
        "database.max_connections",
        &config.database.max_connections.to_string(),
        source("database.max_connections", &["CARTVIEW_DATABASE_MAX_CONNECTIONS"]),
    ));
    lines.push(render_line(
        "database.timeout_secs",
        &config.database.timeout_secs.to_string(),
        source("database.timeout_secs", &["CARTVIEW_DATABASE_TIMEOUT_SECS"]),
    ));
    lines.push(render_line(
        "catalog.path",
        &config.catalog.path.display().to_string(),
        source("catalog.path", &["CARTVIEW_CATALOG_PATH"]),
    ));
    lines.push(render_line(
        "cart.storage_key",
        &config.cart.storage_key,
        source("cart.storage_key", &["CARTVIEW_CART_STORAGE_KEY"]),
    ));
    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &["CARTVIEW_LOGGING_LEVEL", "CARTVIEW_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &["CARTVIEW_LOGGING_FORMAT", "CARTVIEW_LOG_FORMAT"]),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("cartview.toml"), PathBuf::from("config/cartview.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use toml::Value;

    use super::{contains_path, field_source};

    #[test]
    fn nested_key_paths_are_found_in_file_doc() {
        let doc: Value = "[cart]\nstorage_key = \"shop\"\n".parse().expect("toml");

        assert!(contains_path(&doc, "cart.storage_key"));
        assert!(!contains_path(&doc, "cart.missing"));
        assert!(!contains_path(&doc, "catalog.path"));
    }

    #[test]
    fn file_source_beats_default_when_env_is_unset() {
        let doc: Value = "[catalog]\npath = \"p.json\"\n".parse().expect("toml");

        let source = field_source(
            "catalog.path",
            &["CARTVIEW_TEST_UNSET_CATALOG_PATH"],
            Some(&doc),
            Some(std::path::Path::new("cartview.toml")),
        );

        assert_eq!(source, "file (cartview.toml)");
    }
}
