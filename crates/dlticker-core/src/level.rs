//! Log levels: ordinary severities plus the control levels the scroll handler
//! dispatches on.

use std::collections::HashMap;
use std::fmt;

use crate::error::TickerError;

/// A log level. Ordered by rank; lower ranks are less severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(u32);

impl Level {
    pub const DEBUG: Level = Level(10);
    /// Written to the log file only, never to the console.
    pub const LOGFILE: Level = Level(11);
    /// Live frame content; written verbatim by scroll-aware handlers.
    pub const SCROLL: Level = Level(12);
    /// Final message that visually terminates the scroll area.
    pub const SHUTDOWN: Level = Level(13);
    /// Console only, never written to log files.
    pub const NOLOGFILE: Level = Level(14);
    pub const INFO: Level = Level(20);
    pub const WARNING: Level = Level(30);
    pub const ERROR: Level = Level(40);
    pub const CRITICAL: Level = Level(50);

    /// Levels interpreted by identity rather than by threshold.
    pub const CONTROL: [Level; 4] = [
        Level::LOGFILE,
        Level::SCROLL,
        Level::SHUTDOWN,
        Level::NOLOGFILE,
    ];

    pub const fn new(rank: u32) -> Self {
        Level(rank)
    }

    pub const fn rank(self) -> u32 {
        self.0
    }

    pub fn is_control(self) -> bool {
        Level::CONTROL.contains(&self)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level {}", self.0)
    }
}

/// Name <-> level table used by formatters.
///
/// Registering a name twice silently replaces the earlier registration.
#[derive(Debug, Clone)]
pub struct LevelRegistry {
    by_name: HashMap<String, Level>,
    by_level: HashMap<Level, String>,
}

impl LevelRegistry {
    /// Empty registry, no levels known.
    pub fn empty() -> Self {
        Self {
            by_name: HashMap::new(),
            by_level: HashMap::new(),
        }
    }

    /// Registry with the standard severities and all control levels.
    pub fn with_defaults() -> Self {
        let mut reg = Self::empty();
        for (name, level) in [
            ("DEBUG", Level::DEBUG),
            ("LOGFILE", Level::LOGFILE),
            ("SCROLL", Level::SCROLL),
            ("SHUTDOWN", Level::SHUTDOWN),
            ("NOLOGFILE", Level::NOLOGFILE),
            ("INFO", Level::INFO),
            ("WARNING", Level::WARNING),
            ("ERROR", Level::ERROR),
            ("CRITICAL", Level::CRITICAL),
        ] {
            reg.register(name, level);
        }
        reg
    }

    pub fn register(&mut self, name: &str, level: Level) {
        if let Some(old) = self.by_name.insert(name.to_string(), level) {
            if self.by_level.get(&old).map(String::as_str) == Some(name) {
                self.by_level.remove(&old);
            }
        }
        self.by_level.insert(level, name.to_string());
    }

    pub fn lookup(&self, name: &str) -> Option<Level> {
        self.by_name.get(name).copied()
    }

    /// Registered name, or `Level <rank>` for unnamed ranks.
    pub fn name_of(&self, level: Level) -> String {
        self.by_level
            .get(&level)
            .cloned()
            .unwrap_or_else(|| level.to_string())
    }

    /// Fails unless every control level has a name; the facility refuses to start otherwise.
    pub fn require_control_levels(&self) -> Result<(), TickerError> {
        for (name, level) in [
            ("LOGFILE", Level::LOGFILE),
            ("SCROLL", Level::SCROLL),
            ("SHUTDOWN", Level::SHUTDOWN),
            ("NOLOGFILE", Level::NOLOGFILE),
        ] {
            if !self.by_level.contains_key(&level) {
                return Err(TickerError::MissingControlLevel(name));
            }
        }
        Ok(())
    }
}

impl Default for LevelRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Which levels a handler accepts.
///
/// Ordinary levels pass when `min <= level <= max`; control levels pass only when
/// listed in `control`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelFilter {
    pub min: Level,
    pub max: Option<Level>,
    pub control: Vec<Level>,
}

impl LevelFilter {
    pub fn at_least(min: Level) -> Self {
        Self {
            min,
            max: None,
            control: Vec::new(),
        }
    }

    pub fn at_most(mut self, max: Level) -> Self {
        self.max = Some(max);
        self
    }

    pub fn with_control(mut self, levels: &[Level]) -> Self {
        self.control.extend_from_slice(levels);
        self
    }

    pub fn accepts(&self, level: Level) -> bool {
        if level.is_control() {
            return self.control.contains(&level);
        }
        level >= self.min && self.max.map_or(true, |max| level <= max)
    }
}
