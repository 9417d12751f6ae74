//! Configuration loading and merging logic
//!
//! Handles loading configuration from multiple sources and merging them
//! according to precedence rules.

use super::{paths, schema::Config};
use anyhow::{Context, Result};
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers merged
    ///
    /// Precedence order (highest to lowest):
    /// 1. Environment variable overrides
    /// 2. Context-specific config
    /// 3. Root config
    /// 4. Built-in defaults
    pub fn load(context: Option<&str>) -> Result<Config> {
        let context_path = context.map(paths::context_config_path);
        let config = Self::load_layers(&paths::root_config_path(), context_path.as_deref())?;
        Ok(Self::apply_env_overrides(config))
    }

    /// Merge the root file and an optional context file over the defaults.
    /// Missing files are skipped, unreadable or malformed ones are errors.
    pub fn load_layers(root: &Path, context: Option<&Path>) -> Result<Config> {
        let mut merged = serde_yaml::to_value(Config::default())
            .context("Failed to serialize default configuration")?;

        for path in std::iter::once(root).chain(context) {
            if let Some(layer) = Self::load_value(path)? {
                tracing::debug!("Merging config layer {}", path.display());
                merge_values(&mut merged, layer);
            }
        }

        serde_yaml::from_value(merged).context("Failed to build merged configuration")
    }

    /// Load configuration from a single file
    pub fn load_file(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn load_value(path: &Path) -> Result<Option<Value>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let value: Value = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        // An empty file parses as null
        Ok((!value.is_null()).then_some(value))
    }

    /// Validate configuration files
    ///
    /// Fails on invalid YAML syntax, invalid value types and unreadable files.
    pub fn validate(context: Option<&str>) -> Result<()> {
        let root_path = paths::root_config_path();
        if root_path.exists() {
            let config = Self::load_file(&root_path)?;
            Self::check(&config)
                .with_context(|| format!("Invalid config file: {}", root_path.display()))?;
        }

        let config = Self::load(context).context("Failed to load merged configuration")?;
        Self::check(&config)
    }

    fn check(config: &Config) -> Result<()> {
        if config.logger.tail == 0 {
            anyhow::bail!("logger.tail must be greater than zero");
        }
        shell_words::split(&config.terminal.command)
            .context("terminal.command is not a valid command line")?;
        let ssh = shell_words::split(&config.terminal.ssh_command)
            .context("terminal.sshCommand is not a valid command line")?;
        if ssh.is_empty() {
            anyhow::bail!("terminal.sshCommand must not be empty");
        }
        if config.terminal.shell.trim().is_empty() {
            anyhow::bail!("terminal.shell must not be empty");
        }
        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut config: Config) -> Config {
        // KUBEDASH_READ_ONLY override
        if let Ok(read_only) = std::env::var("KUBEDASH_READ_ONLY") {
            if let Ok(val) = read_only.parse::<bool>() {
                config.read_only = val;
            }
        }

        // KUBEDASH_DEFAULT_NAMESPACE override
        if let Ok(namespace) = std::env::var("KUBEDASH_DEFAULT_NAMESPACE") {
            config.default_namespace = namespace;
        }

        // KUBEDASH_DEFAULT_RESOURCE override
        if let Ok(resource) = std::env::var("KUBEDASH_DEFAULT_RESOURCE") {
            config.default_resource = resource;
        }

        // KUBEDASH_KUBECTL override
        if let Ok(binary) = std::env::var("KUBEDASH_KUBECTL") {
            if !binary.is_empty() {
                config.kubectl.binary = Some(binary);
            }
        }

        config
    }

    /// Save configuration to a file
    pub fn save(config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }

        let yaml =
            serde_yaml::to_string(config).context("Failed to serialize configuration to YAML")?;

        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Set one dotted key in a single config file, leaving its other keys alone.
    /// An empty value for an optional key removes it.
    pub fn set_in_file(path: &Path, key: &str, value: &str) -> Result<()> {
        // Validate and normalize through the typed schema first
        let mut scratch = Config::default();
        super::set_config_value(&mut scratch, key, value)?;
        let scratch = serde_yaml::to_value(&scratch).context("Failed to serialize configuration")?;
        let segments: Vec<&str> = key.split('.').collect();
        let normalized = segments
            .iter()
            .try_fold(&scratch, |current, segment| current.get(*segment))
            .cloned();

        let mut layer = Self::load_value(path)?.unwrap_or_else(|| Value::Mapping(Mapping::new()));
        set_path(&mut layer, &segments, normalized);
        serde_yaml::from_value::<Config>(layer.clone())
            .with_context(|| format!("Invalid configuration after setting {}", key))?;

        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }
        let yaml = serde_yaml::to_string(&layer).context("Failed to serialize configuration")?;
        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

fn set_path(target: &mut Value, segments: &[&str], value: Option<Value>) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };
    if !target.is_mapping() {
        *target = Value::Mapping(Mapping::new());
    }
    let Value::Mapping(map) = target else {
        return;
    };
    let key = Value::String(first.to_string());

    if rest.is_empty() {
        match value {
            Some(value) => {
                map.insert(key, value);
            }
            None => {
                map.remove(&key);
            }
        }
        return;
    }

    if !map.contains_key(&key) {
        map.insert(key.clone(), Value::Mapping(Mapping::new()));
    }
    if let Some(child) = map.get_mut(&key) {
        set_path(child, rest, value);
    }
}

/// Deep-merge `overlay` into `base`: mappings merge key by key, anything else replaces
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_missing_files_yield_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigLoader::load_layers(&dir.path().join("nope.yaml"), None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_layers_merge_per_key() {
        let dir = TempDir::new().unwrap();
        let root = write(&dir, "root.yaml", "readOnly: true\nlogger:\n  tail: 200\n");
        let context = write(&dir, "ctx.yaml", "logger:\n  streamTail: 50\n");

        let config = ConfigLoader::load_layers(&root, Some(&context)).unwrap();
        assert!(config.read_only);
        assert_eq!(config.logger.tail, 200);
        assert_eq!(config.logger.stream_tail, 50);
        assert_eq!(config.default_resource, "pod");
    }

    #[test]
    fn test_empty_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        let root = write(&dir, "root.yaml", "");
        let config = ConfigLoader::load_layers(&root, None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let root = write(&dir, "root.yaml", "logger:\n  tail: lots\n");
        assert!(ConfigLoader::load_layers(&root, None).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let config = Config {
            default_namespace: "kube-system".to_string(),
            ..Default::default()
        };
        ConfigLoader::save(&config, &path).unwrap();
        assert_eq!(ConfigLoader::load_file(&path).unwrap(), config);
    }

    #[test]
    fn test_set_in_file_only_touches_one_key() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "ctx.yaml", "logger:\n  tail: 200\n");

        ConfigLoader::set_in_file(&path, "logger.streamTail", "25").unwrap();
        ConfigLoader::set_in_file(&path, "kubectl.context", "prod").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("readOnly"));
        let config = ConfigLoader::load_file(&path).unwrap();
        assert_eq!(config.logger.tail, 200);
        assert_eq!(config.logger.stream_tail, 25);
        assert_eq!(config.kubectl.context.as_deref(), Some("prod"));

        ConfigLoader::set_in_file(&path, "kubectl.context", "").unwrap();
        assert_eq!(ConfigLoader::load_file(&path).unwrap().kubectl.context, None);
    }

    #[test]
    fn test_check_rejects_bad_terminal_command() {
        let mut config = Config::default();
        config.terminal.command = "alacritty -e 'unterminated".to_string();
        assert!(ConfigLoader::check(&config).is_err());
    }

    #[test]
    fn test_env_overrides() {
        // SAFETY: set_var is unsafe in Rust 2024 due to potential data races.
        // These variables are only touched by this test.
        unsafe {
            std::env::set_var("KUBEDASH_DEFAULT_RESOURCE", "svc");
            std::env::set_var("KUBEDASH_KUBECTL", "/usr/local/bin/kubectl");
        }

        let config = ConfigLoader::apply_env_overrides(Config::default());

        assert_eq!(config.default_resource, "svc");
        assert_eq!(
            config.kubectl.binary.as_deref(),
            Some("/usr/local/bin/kubectl")
        );

        // SAFETY: see above.
        unsafe {
            std::env::remove_var("KUBEDASH_DEFAULT_RESOURCE");
            std::env::remove_var("KUBEDASH_KUBECTL");
        }
    }
}
