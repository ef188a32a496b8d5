//! Rule and view option strings.
//!
//! Both are `KEY=VALUE` lists joined by `&`, e.g.
//! `RULE=LONGRUN&W=10&H=18&G=10&R=10`.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

use tetcon_types::{FIELD_HEIGHT_MAX, FIELD_WIDTH_MAX};
use thiserror::Error;

pub const DEFAULT_RULE: &str = "RULE=LONGRUN&W=10&H=18&G=10&R=10";
pub const DEFAULT_VIEW: &str = "W=79&H=25&S=1";
pub const DEFAULT_REPORT: &str = "tetcon_result_<yymmdd>_<hhmmss>.log";

/// Rule name that every built-in routine accepts.
pub const RULE_LONGRUN: &str = "LONGRUN";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid {key}={value:?}: must be {requirement}")]
    Invalid {
        key: &'static str,
        value: String,
        requirement: &'static str,
    },
}

/// Sorted `KEY=VALUE` map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionList {
    entries: BTreeMap<String, String>,
}

impl OptionList {
    pub fn parse(line: &str) -> Self {
        let mut entries = BTreeMap::new();
        for chunk in line.split('&') {
            let (key, value) = chunk.split_once('=').unwrap_or((chunk, ""));
            if key.is_empty() {
                continue;
            }
            entries.insert(key.to_string(), value.to_string());
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Raw value, empty when absent.
    pub fn string(&self, key: &str) -> &str {
        self.entries.get(key).map(String::as_str).unwrap_or("")
    }

    /// Leading decimal integer of the value, 0 when there is none.
    pub fn integer(&self, key: &str) -> i64 {
        leading_integer(self.string(key))
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        if !key.is_empty() {
            self.entries.insert(key.to_string(), value.into());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for OptionList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            f.write_str(key)?;
            if !value.is_empty() {
                write!(f, "={value}")?;
            }
        }
        Ok(())
    }
}

/// `strtol(s, NULL, 10)`: optional blanks and sign, then digits.
/// Saturates instead of overflowing.
fn leading_integer(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value.saturating_mul(10).saturating_add((b - b'0') as i64);
    }
    if negative {
        -value
    } else {
        value
    }
}

fn require(
    options: &OptionList,
    key: &'static str,
    range: RangeInclusive<i64>,
    requirement: &'static str,
) -> Result<i64, ConfigError> {
    let value = options.integer(key);
    if !range.contains(&value) {
        return Err(ConfigError::Invalid {
            key,
            value: options.string(key).to_string(),
            requirement,
        });
    }
    Ok(value)
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

fn clamp_u32(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

/// Contest rules: field size, gravity and round count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleConfig {
    options: OptionList,
    pub width: i32,
    pub height: i32,
    pub gravity: u32,
    pub rounds: u32,
}

impl RuleConfig {
    pub fn parse(line: &str) -> Result<Self, ConfigError> {
        let options = OptionList::parse(line);
        let width = require(&options, "W", 4..=FIELD_WIDTH_MAX as i64, "between 4 and 30")?;
        let height = require(&options, "H", 4..=FIELD_HEIGHT_MAX as i64, "between 4 and 4096")?;
        let gravity = require(&options, "G", 1..=i64::MAX, "positive")?;
        let rounds = require(&options, "R", 1..=i64::MAX, "positive")?;
        Ok(Self {
            width: clamp_i32(width),
            height: clamp_i32(height),
            gravity: clamp_u32(gravity),
            rounds: clamp_u32(rounds),
            options,
        })
    }

    /// Value of the `RULE` key.
    pub fn name(&self) -> &str {
        self.options.string("RULE")
    }

    pub fn is_longrun(&self) -> bool {
        self.name() == RULE_LONGRUN
    }

    pub fn options(&self) -> &OptionList {
        &self.options
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            options: OptionList::parse(DEFAULT_RULE),
            width: 10,
            height: 18,
            gravity: 10,
            rounds: 10,
        }
    }
}

impl fmt::Display for RuleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.options, f)
    }
}

/// Viewer canvas size and frames advanced per draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewConfig {
    pub width: u16,
    pub height: u16,
    pub skip_frames: u32,
}

impl ViewConfig {
    pub fn parse(line: &str) -> Result<Self, ConfigError> {
        let options = OptionList::parse(line);
        let width = require(&options, "W", 1..=i64::MAX, "positive")?;
        let height = require(&options, "H", 1..=i64::MAX, "positive")?;
        let skip = require(&options, "S", 1..=i64::MAX, "positive")?;
        Ok(Self {
            width: width.min(u16::MAX as i64) as u16,
            height: height.min(u16::MAX as i64) as u16,
            skip_frames: clamp_u32(skip),
        })
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: 79,
            height: 25,
            skip_frames: 1,
        }
    }
}
