//! Replay configuration read from the environment.
use std::env;
use std::path::PathBuf;

/// How the transcript is printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliConfig {
    /// Directory holding `profile.toml` and `sets.toml`. Overrides `profile`.
    pub profile_dir: Option<PathBuf>,
    /// Builtin profile name.
    pub profile: String,
    pub script: Option<PathBuf>,
    pub session_id: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub output: OutputFormat,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            profile_dir: None,
            profile: "rdm".to_string(),
            script: None,
            session_id: None,
            log_dir: None,
            output: OutputFormat::default(),
        }
    }
}

impl CliConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `GEAR_PROFILE_DIR` - Profile data directory (default: builtin profile)
    /// - `GEAR_PROFILE` - Builtin profile name (default: `rdm`)
    /// - `GEAR_SCRIPT` - Event script to replay
    /// - `GEAR_SESSION_ID` - Session identifier for the log directory (default: auto-generated)
    /// - `GEAR_LOG_DIR` - Log directory (default: platform cache directory)
    /// - `GEAR_OUTPUT` - `text` or `json` (default: `text`)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        config.profile_dir = lookup("GEAR_PROFILE_DIR").map(PathBuf::from);
        if let Some(profile) = lookup("GEAR_PROFILE") {
            config.profile = profile;
        }
        config.script = lookup("GEAR_SCRIPT").map(PathBuf::from);
        config.session_id = lookup("GEAR_SESSION_ID");
        config.log_dir = lookup("GEAR_LOG_DIR").map(PathBuf::from);

        if let Some(output) = lookup("GEAR_OUTPUT") {
            match output.parse() {
                Ok(format) => config.output = format,
                Err(_) => eprintln!("Ignoring unknown GEAR_OUTPUT '{output}' (expected text or json)"),
            }
        }

        config
    }

    /// Applies a script path given on the command line.
    #[must_use]
    pub fn with_script_arg(mut self, arg: Option<String>) -> Self {
        if let Some(path) = arg {
            self.script = Some(PathBuf::from(path));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        assert_eq!(CliConfig::from_lookup(lookup(&[])), CliConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = CliConfig::from_lookup(lookup(&[
            ("GEAR_PROFILE_DIR", "/data/rdm"),
            ("GEAR_SCRIPT", "sleep.toml"),
            ("GEAR_SESSION_ID", "abc"),
            ("GEAR_LOG_DIR", "/tmp/logs"),
            ("GEAR_OUTPUT", "JSON"),
        ]));
        assert_eq!(config.profile_dir, Some(PathBuf::from("/data/rdm")));
        assert_eq!(config.script, Some(PathBuf::from("sleep.toml")));
        assert_eq!(config.session_id.as_deref(), Some("abc"));
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/logs")));
        assert_eq!(config.output, OutputFormat::Json);
    }

    #[test]
    fn bad_output_keeps_text() {
        let config = CliConfig::from_lookup(lookup(&[("GEAR_OUTPUT", "yaml")]));
        assert_eq!(config.output, OutputFormat::Text);
    }

    #[test]
    fn argument_overrides_script_variable() {
        let config = CliConfig::from_lookup(lookup(&[("GEAR_SCRIPT", "a.toml")]))
            .with_script_arg(Some("b.toml".into()));
        assert_eq!(config.script, Some(PathBuf::from("b.toml")));
    }
}
