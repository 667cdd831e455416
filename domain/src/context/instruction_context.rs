//! Instruction context handed to a model on every call.
//!
//! The first entry holds the system instructions; later entries are memory
//! blocks (rendered result logs) appended before each decision. The agent
//! owns one context per role and passes an immutable snapshot to the
//! gateway, so nothing is shared across runs.

use serde::{Deserialize, Serialize};

/// How many memory entries an [`InstructionContext`] keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "keep")]
pub enum ContextRetention {
    /// Keep everything. Context grows with every decision.
    Accumulate,
    /// Keep the system instructions plus the latest `n` memory entries.
    ///
    /// The newest entry is always kept, so `Rolling(0)` acts as `Rolling(1)`.
    Rolling(usize),
}

impl Default for ContextRetention {
    fn default() -> Self {
        ContextRetention::Rolling(1)
    }
}

impl std::str::FromStr for ContextRetention {
    type Err = String;

    /// Accepts `accumulate`, `rolling` (= `rolling:1`) and `rolling:N` with N >= 1.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "accumulate" | "all" => Ok(ContextRetention::Accumulate),
            "rolling" | "latest" => Ok(ContextRetention::Rolling(1)),
            other => match other
                .strip_prefix("rolling:")
                .and_then(|n| n.trim().parse::<usize>().ok())
            {
                Some(0) => Err(format!(
                    "context retention '{}' must keep at least one memory entry",
                    s
                )),
                Some(keep) => Ok(ContextRetention::Rolling(keep)),
                None => Err(format!("unknown context retention '{}'", s)),
            },
        }
    }
}

impl std::fmt::Display for ContextRetention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextRetention::Accumulate => write!(f, "accumulate"),
            ContextRetention::Rolling(n) => write!(f, "rolling:{}", n),
        }
    }
}

/// Ordered instruction entries for one agent role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructionContext {
    system: Option<String>,
    memory: Vec<String>,
    retention: ContextRetention,
}

impl InstructionContext {
    pub fn new(retention: ContextRetention) -> Self {
        Self {
            system: None,
            memory: Vec::new(),
            retention,
        }
    }

    /// Create a context that starts with the given system instructions.
    pub fn with_system(system: impl Into<String>, retention: ContextRetention) -> Self {
        Self {
            system: Some(system.into()),
            memory: Vec::new(),
            retention,
        }
    }

    /// Append a memory entry, then apply the retention policy.
    ///
    /// Blank entries are ignored.
    pub fn push(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        if entry.trim().is_empty() {
            return;
        }
        self.memory.push(entry);
        if let ContextRetention::Rolling(keep) = self.retention
            && self.memory.len() > keep.max(1)
        {
            let keep = keep.max(1);
            let excess = self.memory.len() - keep;
            self.memory.drain(..excess);
        }
    }

    /// Snapshot of every entry, system instructions first.
    pub fn entries(&self) -> Vec<String> {
        self.system
            .iter()
            .chain(self.memory.iter())
            .cloned()
            .collect()
    }

    pub fn system(&self) -> Option<&str> {
        self.system.as_deref()
    }

    pub fn memory_len(&self) -> usize {
        self.memory.len()
    }

    pub fn retention(&self) -> ContextRetention {
        self.retention
    }

    /// Total bytes across all entries.
    pub fn total_bytes(&self) -> usize {
        let memory: usize = self.memory.iter().map(String::len).sum();
        self.system.as_ref().map_or(0, String::len) + memory
    }
}
