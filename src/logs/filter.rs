//! Deciding which log records reach the overlay, and how.

use crate::foundation::error::{BootError, BootResult};
use crate::logs::entry::LogEntry;

/// Minimum priority a record needs to be shown, doubling as the overlay mode selector.
///
/// `SILENT` hides the overlay, `FATAL_ONLY` shows the curated allow-list, anything from
/// `VERBOSE` up to (not including) `FATAL_ONLY` passes records at or above that priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DisplayThreshold(u8);

/// Which kind of overlay a threshold selects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayMode {
    /// No log rows.
    Silent,
    /// Allow-listed rows only.
    Curated,
    /// Every record at or above the threshold.
    Verbose,
}

impl DisplayThreshold {
    /// Most detailed setting.
    pub const VERBOSE: Self = Self(2);
    /// Curated allow-list overlay.
    pub const FATAL_ONLY: Self = Self(7);
    /// No overlay; pure animation.
    pub const SILENT: Self = Self(8);

    /// Validate a raw threshold.
    pub fn new(raw: u8) -> BootResult<Self> {
        if !(Self::VERBOSE.0..=Self::SILENT.0).contains(&raw) {
            return Err(BootError::validation(format!(
                "display threshold {raw} outside {}..={}",
                Self::VERBOSE.0,
                Self::SILENT.0
            )));
        }
        Ok(Self(raw))
    }

    /// Raw value.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Overlay kind selected by this threshold.
    pub fn overlay(self) -> OverlayMode {
        if self >= Self::SILENT {
            OverlayMode::Silent
        } else if self == Self::FATAL_ONLY {
            OverlayMode::Curated
        } else {
            OverlayMode::Verbose
        }
    }

    /// Whether the log overlay is off.
    pub fn is_silent(self) -> bool {
        self.overlay() == OverlayMode::Silent
    }

    /// One step towards more detail (volume-up). Stops at `VERBOSE`.
    pub fn lowered(self) -> Self {
        Self(self.0.saturating_sub(1).max(Self::VERBOSE.0))
    }

    /// One step towards less detail (volume-down). Stops at `SILENT`, except that `SILENT`
    /// itself wraps to `FATAL_ONLY` so the overlay can be brought up with either key.
    pub fn raised(self) -> Self {
        if self == Self::SILENT {
            return Self::FATAL_ONLY;
        }
        Self((self.0 + 1).min(Self::SILENT.0))
    }
}

impl Default for DisplayThreshold {
    fn default() -> Self {
        Self::SILENT
    }
}

impl TryFrom<u8> for DisplayThreshold {
    type Error = BootError;

    fn try_from(raw: u8) -> BootResult<Self> {
        Self::new(raw)
    }
}

impl From<DisplayThreshold> for u8 {
    fn from(t: DisplayThreshold) -> Self {
        t.0
    }
}

/// What a curated rule does with a matching record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleAction {
    /// Add a new row.
    Append,
    /// Overwrite the previous row when it came from the same rule (progress messages).
    ReplaceLast,
    /// Add a row and count a runtime (re)start.
    BootLoopMarker,
}

/// One entry of the curated allow-list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CuratedRule {
    /// Exact tag.
    pub tag: &'static str,
    /// Required message prefix; empty matches everything.
    pub prefix: &'static str,
    /// Effect on the line buffer.
    pub action: RuleAction,
}

impl CuratedRule {
    fn matches(&self, entry: &LogEntry) -> bool {
        entry.tag == self.tag && entry.message.starts_with(self.prefix)
    }
}

/// Allow-list used when the threshold is `FATAL_ONLY`.
pub const CURATED_RULES: &[CuratedRule] = &[
    CuratedRule {
        tag: "SystemServer",
        prefix: "",
        action: RuleAction::Append,
    },
    CuratedRule {
        tag: "AndroidRuntime",
        prefix: ">>>>>> START",
        action: RuleAction::BootLoopMarker,
    },
    CuratedRule {
        tag: "AndroidRuntime",
        prefix: ">>>>>>>>>>>>>> AndroidRuntime START",
        action: RuleAction::BootLoopMarker,
    },
    CuratedRule {
        tag: "installd",
        prefix: "DexInv: --- BEGIN",
        action: RuleAction::ReplaceLast,
    },
    CuratedRule {
        tag: "ActivityManager",
        prefix: "Start proc",
        action: RuleAction::Append,
    },
];

/// Classification result for one record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Append the line as a new row.
    Append(String),
    /// Overwrite the most recent row.
    ReplaceLast(String),
    /// Not shown.
    Drop,
}

/// Stateful filter: remembers the rule behind the last row and counts runtime starts.
#[derive(Clone, Debug)]
pub struct LogClassifier {
    rules: &'static [CuratedRule],
    boot_loops: u32,
    last_rule: Option<usize>,
}

impl Default for LogClassifier {
    fn default() -> Self {
        Self::new(CURATED_RULES)
    }
}

impl LogClassifier {
    /// Classifier over a custom allow-list.
    pub fn new(rules: &'static [CuratedRule]) -> Self {
        Self {
            rules,
            boot_loops: 0,
            last_rule: None,
        }
    }

    /// Runtime starts seen so far.
    pub fn boot_loops(&self) -> u32 {
        self.boot_loops
    }

    /// Warning row to pin above the overlay once the runtime has started more than once.
    pub fn banner(&self) -> Option<String> {
        (self.boot_loops > 1).then(|| {
            format!(
                "WARNING: boot loop detected, runtime started {} times",
                self.boot_loops
            )
        })
    }

    /// Decide what to do with `entry` under `threshold`.
    ///
    /// Runtime start markers are counted in both overlay modes.
    pub fn classify(&mut self, entry: &LogEntry, threshold: DisplayThreshold) -> Disposition {
        let overlay = threshold.overlay();
        if overlay == OverlayMode::Silent {
            return Disposition::Drop;
        }

        let rule = self.rules.iter().position(|r| r.matches(entry));
        if let Some(i) = rule {
            if self.rules[i].action == RuleAction::BootLoopMarker {
                self.boot_loops += 1;
                tracing::info!(count = self.boot_loops, "runtime start observed");
            }
        }

        if overlay == OverlayMode::Verbose {
            if entry.priority.level() < threshold.get() {
                return Disposition::Drop;
            }
            self.last_rule = None;
            return Disposition::Append(entry.display_line());
        }

        let Some(i) = rule else {
            return Disposition::Drop;
        };
        let line = entry.display_line();
        let previous = self.last_rule.replace(i);
        match self.rules[i].action {
            RuleAction::ReplaceLast if previous == Some(i) => Disposition::ReplaceLast(line),
            _ => Disposition::Append(line),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/logs/filter.rs"]
mod tests;
