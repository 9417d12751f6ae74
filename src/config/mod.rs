//! Configuration system for kubedash
//!
//! Layered YAML configuration: built-in defaults, a root file, an optional
//! per-context file and environment overrides.

pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{Config, KubectlConfig, LoggerConfig, TerminalConfig, UiConfig};

/// Every key understood by [`get_config_value`] and [`set_config_value`]
pub const CONFIG_KEYS: &[&str] = &[
    "readOnly",
    "defaultNamespace",
    "defaultResource",
    "kubectl.binary",
    "kubectl.context",
    "kubectl.kubeconfig",
    "logger.tail",
    "logger.streamTail",
    "terminal.command",
    "terminal.shell",
    "terminal.sshCommand",
    "ui.enableMouse",
];

/// Get a configuration value by key (dot notation)
pub fn get_config_value(config: &Config, key: &str) -> anyhow::Result<String> {
    match key {
        "readOnly" => Ok(config.read_only.to_string()),
        "defaultNamespace" => Ok(config.default_namespace.clone()),
        "defaultResource" => Ok(config.default_resource.clone()),
        "kubectl.binary" => Ok(config.kubectl.binary.clone().unwrap_or_default()),
        "kubectl.context" => Ok(config.kubectl.context.clone().unwrap_or_default()),
        "kubectl.kubeconfig" => Ok(config.kubectl.kubeconfig.clone().unwrap_or_default()),
        "logger.tail" => Ok(config.logger.tail.to_string()),
        "logger.streamTail" => Ok(config.logger.stream_tail.to_string()),
        "terminal.command" => Ok(config.terminal.command.clone()),
        "terminal.shell" => Ok(config.terminal.shell.clone()),
        "terminal.sshCommand" => Ok(config.terminal.ssh_command.clone()),
        "ui.enableMouse" => Ok(config.ui.enable_mouse.to_string()),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}

/// Set a configuration value by key (dot notation)
pub fn set_config_value(config: &mut Config, key: &str, value: &str) -> anyhow::Result<()> {
    use anyhow::Context;

    fn optional(value: &str) -> Option<String> {
        (!value.is_empty()).then(|| value.to_string())
    }

    match key {
        "readOnly" => {
            config.read_only = value
                .parse()
                .context("readOnly must be 'true' or 'false'")?;
        }
        "defaultNamespace" => {
            config.default_namespace = value.to_string();
        }
        "defaultResource" => {
            crate::registry::ResourceRegistry::global().lookup(value)?;
            config.default_resource = value.to_string();
        }
        "kubectl.binary" => config.kubectl.binary = optional(value),
        "kubectl.context" => config.kubectl.context = optional(value),
        "kubectl.kubeconfig" => config.kubectl.kubeconfig = optional(value),
        "logger.tail" => {
            config.logger.tail = value.parse().context("logger.tail must be a number")?;
        }
        "logger.streamTail" => {
            config.logger.stream_tail = value
                .parse()
                .context("logger.streamTail must be a number")?;
        }
        "terminal.command" => {
            shell_words::split(value).context("terminal.command is not a valid command line")?;
            config.terminal.command = value.to_string();
        }
        "terminal.shell" => {
            config.terminal.shell = value.to_string();
        }
        "terminal.sshCommand" => {
            shell_words::split(value).context("terminal.sshCommand is not a valid command line")?;
            config.terminal.ssh_command = value.to_string();
        }
        "ui.enableMouse" => {
            config.ui.enable_mouse = value
                .parse()
                .context("ui.enableMouse must be 'true' or 'false'")?;
        }
        _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_round_trips() {
        let config = Config::default();
        for key in CONFIG_KEYS {
            let value = get_config_value(&config, key).unwrap();
            let mut copy = config.clone();
            set_config_value(&mut copy, key, &value).unwrap();
            assert_eq!(copy, config, "{}", key);
        }
    }

    #[test]
    fn test_set_values() {
        let mut config = Config::default();
        set_config_value(&mut config, "logger.tail", "250").unwrap();
        set_config_value(&mut config, "kubectl.context", "prod").unwrap();
        set_config_value(&mut config, "defaultResource", "deploy").unwrap();
        assert_eq!(config.logger.tail, 250);
        assert_eq!(config.kubectl.context.as_deref(), Some("prod"));
        assert_eq!(config.default_resource, "deploy");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = Config::default();
        assert!(set_config_value(&mut config, "readOnly", "maybe").is_err());
        assert!(set_config_value(&mut config, "defaultResource", "widget").is_err());
        assert!(set_config_value(&mut config, "nope", "1").is_err());
        assert_eq!(config, Config::default());
    }
}
