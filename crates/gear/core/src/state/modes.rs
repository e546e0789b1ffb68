//! User-selectable operating modes.

use super::StateError;

/// Declaration of a mode: its legal values and its default.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ModeSpec {
    /// On/off toggle.
    Toggle { default: bool },
    /// Cycles through a fixed list of named options.
    Cycle {
        options: Vec<String>,
        default: String,
    },
}

impl ModeSpec {
    pub fn toggle(default: bool) -> Self {
        ModeSpec::Toggle { default }
    }

    pub fn cycle<I, S>(options: I, default: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ModeSpec::Cycle {
            options: options.into_iter().map(Into::into).collect(),
            default: default.into(),
        }
    }

    /// Returns the default value, validated against the option list.
    pub fn default_value(&self, mode: &str) -> Result<ModeValue, StateError> {
        let value = match self {
            ModeSpec::Toggle { default } => ModeValue::Toggle(*default),
            ModeSpec::Cycle { default, .. } => ModeValue::Choice(default.clone()),
        };
        self.validate(mode, &value)?;
        Ok(value)
    }

    /// Checks that `value` is one of this mode's legal values.
    pub fn validate(&self, mode: &str, value: &ModeValue) -> Result<(), StateError> {
        let legal = match (self, value) {
            (ModeSpec::Toggle { .. }, ModeValue::Toggle(_)) => true,
            (ModeSpec::Cycle { options, .. }, ModeValue::Choice(choice)) => {
                options.iter().any(|option| option == choice)
            }
            _ => false,
        };

        if legal {
            Ok(())
        } else {
            Err(StateError::InvalidModeValue {
                mode: mode.to_string(),
                value: value.to_string(),
                options: self.options_label(),
            })
        }
    }

    /// Parses a textual value (as typed by the user or read from a script).
    ///
    /// Toggles accept `on/off/true/false`; cycles accept any listed option.
    pub fn parse_value(&self, mode: &str, raw: &str) -> Result<ModeValue, StateError> {
        let value = match self {
            ModeSpec::Toggle { .. } => match raw.to_ascii_lowercase().as_str() {
                "on" | "true" => ModeValue::Toggle(true),
                "off" | "false" => ModeValue::Toggle(false),
                _ => {
                    return Err(StateError::InvalidModeValue {
                        mode: mode.to_string(),
                        value: raw.to_string(),
                        options: self.options_label(),
                    });
                }
            },
            ModeSpec::Cycle { .. } => ModeValue::Choice(raw.to_string()),
        };
        self.validate(mode, &value)?;
        Ok(value)
    }

    /// Returns the value after `current` in cycle order (wrapping), or the
    /// flipped toggle.
    pub fn next(&self, current: &ModeValue) -> ModeValue {
        match (self, current) {
            (ModeSpec::Toggle { .. }, ModeValue::Toggle(on)) => ModeValue::Toggle(!on),
            (ModeSpec::Cycle { options, default }, ModeValue::Choice(choice)) => {
                let next = options
                    .iter()
                    .position(|option| option == choice)
                    .map(|idx| (idx + 1) % options.len())
                    .and_then(|idx| options.get(idx))
                    .unwrap_or(default);
                ModeValue::Choice(next.clone())
            }
            (ModeSpec::Toggle { default }, _) => ModeValue::Toggle(*default),
            (ModeSpec::Cycle { default, .. }, _) => ModeValue::Choice(default.clone()),
        }
    }

    fn options_label(&self) -> String {
        match self {
            ModeSpec::Toggle { .. } => "on, off".to_string(),
            ModeSpec::Cycle { options, .. } => options.join(", "),
        }
    }
}

/// Current value of a mode.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ModeValue {
    Toggle(bool),
    Choice(String),
}

impl ModeValue {
    /// Returns the toggle state; a choice value is never "on".
    pub fn is_on(&self) -> bool {
        matches!(self, ModeValue::Toggle(true))
    }

    pub fn as_choice(&self) -> Option<&str> {
        match self {
            ModeValue::Choice(choice) => Some(choice),
            ModeValue::Toggle(_) => None,
        }
    }
}

impl core::fmt::Display for ModeValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ModeValue::Toggle(true) => f.write_str("on"),
            ModeValue::Toggle(false) => f.write_str("off"),
            ModeValue::Choice(choice) => f.write_str(choice),
        }
    }
}

impl From<bool> for ModeValue {
    fn from(on: bool) -> Self {
        ModeValue::Toggle(on)
    }
}

impl From<&str> for ModeValue {
    fn from(choice: &str) -> Self {
        ModeValue::Choice(choice.to_string())
    }
}
