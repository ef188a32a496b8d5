//! Round report body.
//!
//! One line per round:
//!
//! ```text
//! VER=0.1.0&DATE=261018093000&HOST=box&G=10&H=18&R=10&RULE=LONGRUN&W=10&R=1,NAME=..&AUTHOR=..&P=..
//! ```

use chrono::NaiveDateTime;

use tetcon_core::player::sanitize;
use tetcon_core::{Player, Score};

use crate::rules::RuleConfig;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Expand the first `<yymmdd>` and `<hhmmss>` placeholders of `template`.
pub fn embed_timestamp(template: &str, now: &NaiveDateTime) -> String {
    template
        .replacen("<yymmdd>", &now.format("%y%m%d").to_string(), 1)
        .replacen("<hhmmss>", &now.format("%H%M%S").to_string(), 1)
}

/// Local host name, `(unknown)` when it cannot be found.
pub fn hostname() -> String {
    ["HOSTNAME", "COMPUTERNAME"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .chain(std::fs::read_to_string("/etc/hostname").ok())
        .map(|name| sanitize(name.trim()))
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| "(unknown)".to_string())
}

/// `VER=..&DATE=..&HOST=..&<rules>&R=<round>`
pub fn header(rule: &RuleConfig, host: &str, round: u32, now: &NaiveDateTime) -> String {
    format!(
        "VER={}&DATE={}&HOST={}&{}&R={}",
        sanitize(VERSION),
        embed_timestamp("<yymmdd><hhmmss>", now),
        host,
        rule,
        round
    )
}

/// Header followed by `,<player>&<score>` for every participant.
pub fn round_report<'a, I>(header: &str, participants: I) -> String
where
    I: IntoIterator<Item = (&'a dyn Player, &'a Score)>,
{
    let mut line = header.to_string();
    for (player, score) in participants {
        line.push(',');
        line.push_str(&player.report_string());
        line.push('&');
        line.push_str(&score.report_string());
    }
    line
}
