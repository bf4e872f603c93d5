use crate::types::Action as AppAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub keybindings: Keybindings,
    #[serde(default)]
    pub intervals: Intervals,
    #[serde(default)]
    pub dev: bool,
}

impl Config {
    /// Fills in bindings for any global action the user has not mapped.
    /// A user binding for an action suppresses the default key for it.
    pub fn set_default_keybindings(&mut self) {
        let defaults = [
            (
                Key(KeyCode::Char('o'), Some(KeyModifiers::CONTROL)),
                GlobalAction::NextFocus,
            ),
            (
                Key(KeyCode::Char('q'), Some(KeyModifiers::CONTROL)),
                GlobalAction::Quit,
            ),
        ];
        for (key, action) in defaults {
            if !self.keybindings.global.values().any(|a| a == &action) {
                self.keybindings.global.entry(key).or_insert(action);
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,
    pub tunnel_bypass: Option<TunnelBypass>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            tunnel_bypass: None,
        }
    }
}

fn default_address() -> String {
    String::from("http://localhost:3000")
}

/// Header sent with every request so tunnel services such as ngrok skip
/// their browser interstitial and pass the request through to the frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TunnelBypass {
    #[serde(default = "default_bypass_header")]
    pub header: String,
    #[serde(default = "default_bypass_value")]
    pub value: String,
}

impl Default for TunnelBypass {
    fn default() -> Self {
        Self {
            header: default_bypass_header(),
            value: default_bypass_value(),
        }
    }
}

fn default_bypass_header() -> String {
    String::from("ngrok-skip-browser-warning")
}

fn default_bypass_value() -> String {
    String::from("0123")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Keybindings {
    #[serde(default)]
    pub global: HashMap<Key, GlobalAction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Intervals {
    #[serde(default = "default_health_check")]
    pub health_check: u64,
}

impl Default for Intervals {
    fn default() -> Self {
        Self {
            health_check: default_health_check(),
        }
    }
}

fn default_health_check() -> u64 {
    30
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Key(KeyCode, Option<KeyModifiers>);

impl From<KeyEvent> for Key {
    fn from(event: KeyEvent) -> Self {
        Self(
            event.code,
            match event.modifiers {
                KeyModifiers::CONTROL | KeyModifiers::SHIFT => Some(event.modifiers),
                _ => None,
            },
        )
    }
}

impl Serialize for Key {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0 {
            KeyCode::Char(c) => match self.1 {
                Some(modifier) => {
                    let modifier = match modifier {
                        KeyModifiers::CONTROL => "Ctrl",
                        KeyModifiers::SHIFT => "Shift",
                        _ => return Err(serde::ser::Error::custom("invalid key modifier")),
                    };
                    format!("{modifier}-{c}").serialize(serializer)
                }
                None => c.to_string().serialize(serializer),
            },
            _ => Err(serde::ser::Error::custom("invalid key code")),
        }
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if let Some((modifier, code)) = s.split_once('-') {
            let mut chars = code.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                Ok(Self(
                    KeyCode::Char(c),
                    match modifier {
                        "Ctrl" => Some(KeyModifiers::CONTROL),
                        "Shift" => Some(KeyModifiers::SHIFT),
                        _ => return Err(serde::de::Error::custom("invalid key modifier")),
                    },
                ))
            } else {
                Err(serde::de::Error::custom("invalid key"))
            }
        } else {
            let mut chars = s.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                Ok(Self(KeyCode::Char(c), None))
            } else {
                Err(serde::de::Error::custom("invalid key"))
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum GlobalAction {
    NextFocus,
    PrevFocus,
    Quit,
}

impl From<&GlobalAction> for AppAction {
    fn from(action: &GlobalAction) -> Self {
        match action {
            GlobalAction::NextFocus => AppAction::NextFocus,
            GlobalAction::PrevFocus => AppAction::PrevFocus,
            GlobalAction::Quit => AppAction::Quit,
        }
    }
}
