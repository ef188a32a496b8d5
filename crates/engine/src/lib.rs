//! Contest engine: rules, the round controller, reports and the built-in
//! decision routines.
//!
//! ```
//! use tetcon_engine::{GameControl, RuleConfig, ViewConfig};
//!
//! let rule = RuleConfig::parse("RULE=LONGRUN&W=10&H=8&G=10&R=1").unwrap();
//! let mut contest = GameControl::new(rule, ViewConfig::default())
//!     .with_seed(1)
//!     .quiet(true);
//! contest.add_player("sample1").unwrap();
//! let reports = contest.run().unwrap();
//! assert_eq!(reports.len(), 1);
//! ```

pub mod control;
pub mod players;
pub mod report;
pub mod rules;

pub use control::{ContestLog, ContestView, Entry, GameControl, MemoryReport, NullView, ReportSink};
pub use players::{create_player, RegistryError, BUILTIN_PLAYERS};
pub use rules::{ConfigError, OptionList, RuleConfig, ViewConfig};
