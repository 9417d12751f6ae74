//! Configuration schema definitions
//!
//! Defines the structure of configuration files using serde for serialization.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Disable delete globally
    #[serde(default = "default_false")]
    pub read_only: bool,

    /// Starting namespace, empty or "all" for every namespace
    #[serde(default = "default_namespace")]
    pub default_namespace: String,

    /// Starting resource kind or alias
    #[serde(default = "default_resource")]
    pub default_resource: String,

    /// kubectl invocation settings
    #[serde(default)]
    pub kubectl: KubectlConfig,

    /// Logger configuration
    #[serde(default)]
    pub logger: LoggerConfig,

    /// External terminal settings for exec and ssh
    #[serde(default)]
    pub terminal: TerminalConfig,

    /// UI configuration
    #[serde(default)]
    pub ui: UiConfig,
}

/// kubectl configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct KubectlConfig {
    /// Binary name or path, `kubectl` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<String>,

    /// Passed as `--context`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Passed as `--kubeconfig`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<String>,
}

/// Logger configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoggerConfig {
    /// Lines fetched by the logs action
    #[serde(default = "default_log_tail")]
    pub tail: u32,

    /// Lines of history fetched before following a log stream
    #[serde(default = "default_stream_tail")]
    pub stream_tail: u32,
}

/// Terminal configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TerminalConfig {
    /// Terminal emulator prefix, e.g. `alacritty -e`.
    /// Empty runs exec and ssh in the dashboard's own terminal.
    #[serde(default)]
    pub command: String,

    /// Shell started by exec
    #[serde(default = "default_shell")]
    pub shell: String,

    /// Command used for node ssh
    #[serde(default = "default_ssh_command")]
    pub ssh_command: String,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UiConfig {
    /// Enable mouse support
    #[serde(default = "default_false")]
    pub enable_mouse: bool,
}

// Default value functions
fn default_false() -> bool {
    false
}

fn default_namespace() -> String {
    "default".to_string()
}

fn default_resource() -> String {
    "pod".to_string()
}

fn default_log_tail() -> u32 {
    1000
}

fn default_stream_tail() -> u32 {
    10
}

fn default_shell() -> String {
    "sh".to_string()
}

fn default_ssh_command() -> String {
    "gcloud".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            read_only: default_false(),
            default_namespace: default_namespace(),
            default_resource: default_resource(),
            kubectl: KubectlConfig::default(),
            logger: LoggerConfig::default(),
            terminal: TerminalConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            tail: default_log_tail(),
            stream_tail: default_stream_tail(),
        }
    }
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            command: String::new(),
            shell: default_shell(),
            ssh_command: default_ssh_command(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            enable_mouse: default_false(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert!(!config.read_only);
        assert_eq!(config.default_namespace, "default");
        assert_eq!(config.default_resource, "pod");
        assert_eq!(config.logger.tail, 1000);
        assert_eq!(config.logger.stream_tail, 10);
        assert_eq!(config.terminal.ssh_command, "gcloud");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("readOnly"));
        assert!(yaml.contains("defaultResource"));
        assert!(yaml.contains("streamTail"));
        assert!(!yaml.contains("kubeconfig"));
    }

    #[test]
    fn test_config_deserialization() {
        let yaml = r#"
readOnly: true
defaultNamespace: kube-system
kubectl:
  context: staging
terminal:
  command: alacritty -e
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.read_only);
        assert_eq!(config.default_namespace, "kube-system");
        assert_eq!(config.kubectl.context.as_deref(), Some("staging"));
        assert_eq!(config.terminal.command, "alacritty -e");
        assert_eq!(config.terminal.shell, "sh");
        assert_eq!(config.logger.tail, 1000);
    }
}
