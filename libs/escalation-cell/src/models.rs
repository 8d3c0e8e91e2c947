use chrono::{DateTime, Utc};
use serde::Serialize;

use shared_models::Role;

/// Ordered chain of roles the monitor walks when deadlines lapse.
/// Level 1 is the first entry, level 2 the second, and so on; a level
/// past the end of the chain has nowhere to go and escalation stops.
#[derive(Debug, Clone)]
pub struct EscalationConfig {
    pub chain: Vec<Role>,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            chain: vec![Role::HeadDoctor, Role::Admin],
        }
    }
}

impl EscalationConfig {
    pub fn role_for_level(&self, level: i32) -> Option<Role> {
        if level < 1 {
            return None;
        }
        self.chain.get((level - 1) as usize).copied()
    }
}

/// One planned climb of the chain: the level the alert moves to, who
/// receives it, and the deadline for the step after this one. A None
/// deadline means the chain is exhausted and nothing further will fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscalationStep {
    pub new_level: i32,
    pub target_role: Role,
    pub new_deadline: Option<DateTime<Utc>>,
}

/// Tally of one sweep over the due alerts.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SweepReport {
    pub examined: usize,
    pub escalated: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepOutcome {
    Completed(SweepReport),
    /// Another sweep was already running; this tick did nothing.
    Skipped,
}
