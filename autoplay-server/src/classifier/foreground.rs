//! Foreground application detection
//!
//! Two extraction strategies exist because activity-manager dumps differ
//! between OS builds. They are kept separate rather than merged: each
//! pairs one dump command with the one pattern known to work against it.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use autoplay_protocol::AppIdentity;

use crate::adb::commands;

lazy_static! {
    // `* Recent #0: TaskRecord{4f3 #45 A=com.netflix.ninja U=0 StackId=1 sz=1}`
    // Newer builds prefix the affinity with the uid: `A=10085:com.netflix.ninja`.
    static ref RECENT_TASK_REGEX: Regex =
        Regex::new(r"Recent #0\b.*?\bA=(?:\d+:)?([^\s/]+)").unwrap();
    // `mResumedActivity: ActivityRecord{2f3c4d1 u0 com.hulu.plus/.MainActivity t45}`
    static ref RESUMED_ACTIVITY_REGEX: Regex =
        Regex::new(r"ResumedActivity: ActivityRecord\{\S+ \S+ ([^\s/]+)/").unwrap();
}

/// How the foreground application is read from the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForegroundStrategy {
    /// Top entry of the recent-task list
    #[default]
    Recents,
    /// Currently resumed activity
    FocusedActivity,
}

impl ForegroundStrategy {
    /// Dump command this strategy reads
    pub fn command(self) -> &'static str {
        match self {
            ForegroundStrategy::Recents => commands::DUMP_RECENTS,
            ForegroundStrategy::FocusedActivity => commands::DUMP_ACTIVITIES,
        }
    }

    /// Extract the foreground package from the dump
    ///
    /// Never fails: unmatched output is `NotDetected`.
    pub fn parse(self, output: &str) -> AppIdentity {
        let regex: &Regex = match self {
            ForegroundStrategy::Recents => &RECENT_TASK_REGEX,
            ForegroundStrategy::FocusedActivity => &RESUMED_ACTIVITY_REGEX,
        };

        regex
            .captures(output)
            .and_then(|caps| caps.get(1))
            .map(|m| AppIdentity::detected(m.as_str()))
            .unwrap_or(AppIdentity::NotDetected)
    }
}
