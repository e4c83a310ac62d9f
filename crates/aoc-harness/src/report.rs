//! Run reports
//!
//! [`run_with_check`] drives a case through [`LifecycleController`] with the
//! [`EventBroadcasterCheck`] as checker and collects everything observed
//! into one serializable [`RunReport`].

use crate::case::TestCase;
use crate::checker::{CheckReport, EventBroadcasterCheck};
use crate::lifecycle::{LifecycleController, LifecycleState};
use aoc_access::Role;
use serde::Serialize;

/// The located node as seen by the checker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSummary {
    /// Node role
    pub role: Role,
    /// Accessible name at locate time
    pub name: String,
    /// Implementation name reported by the node
    pub implementation_name: String,
}

/// Outcome of one conformance run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Lifecycle states visited, oldest first
    pub transitions: Vec<LifecycleState>,
    /// Node under test, if it was located
    pub node: Option<NodeSummary>,
    /// Checker observations, if the checker ran
    pub check: Option<CheckReport>,
    /// Phase of the error that ended the run
    pub error_phase: Option<&'static str>,
    /// Error that ended the run
    pub error: Option<String>,
}

impl RunReport {
    /// The run completed, disposed its fixture, and the check passed
    #[must_use]
    pub fn passed(&self) -> bool {
        self.error.is_none()
            && self.transitions.last() == Some(&LifecycleState::Disposed)
            && self.check.as_ref().is_some_and(CheckReport::passed)
    }

    /// Plain-text rendering
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut report = String::new();

        report.push_str("=== AOC Conformance Report ===\n\n");
        let states: Vec<String> = self.transitions.iter().map(|s| format!("{s:?}")).collect();
        report.push_str(&format!("Lifecycle: {}\n", states.join(" -> ")));
        if let Some(node) = &self.node {
            report.push_str(&format!("Node: {} \"{}\"\n", node.role, node.name));
            report.push_str(&format!("Implementation: {}\n", node.implementation_name));
        }

        if let Some(check) = &self.check {
            report.push_str(&format!("Events Received: {}\n", check.events_received.len()));
            for (i, event) in check.events_received.iter().enumerate() {
                report.push_str(&format!(
                    "  {}. {:?} \"{}\" -> \"{}\"\n",
                    i + 1,
                    event.kind,
                    event.old_value,
                    event.new_value
                ));
            }
            report.push_str(&format!("Events After Removal: {}\n", check.events_after_removal));
        }

        if let Some(error) = &self.error {
            report.push_str(&format!(
                "\n!!! Run aborted in {}: {}\n",
                self.error_phase.unwrap_or("unknown"),
                error
            ));
        }

        report.push_str(&format!(
            "\n=== Result: {} ===\n",
            if self.passed() { "PASS" } else { "FAIL" }
        ));

        report
    }
}

/// Run `case` once with the event broadcaster check
pub fn run_with_check<C: TestCase>(case: C, check: &EventBroadcasterCheck) -> RunReport {
    let mut controller = LifecycleController::new(case);
    let outcome = controller.run(|env| {
        let node = env.test_object();
        let summary = NodeSummary {
            role: node.role(),
            name: node.name().to_string(),
            implementation_name: node.implementation_name().to_string(),
        };
        (summary, check.run(env))
    });

    let mut report = RunReport {
        transitions: Vec::new(),
        node: None,
        check: None,
        error_phase: None,
        error: None,
    };
    match outcome {
        Ok((summary, Ok(observed))) => {
            report.node = Some(summary);
            report.check = Some(observed);
        }
        Ok((summary, Err(err))) => {
            report.node = Some(summary);
            report.error_phase = Some("check");
            report.error = Some(err.to_string());
        }
        Err(err) => {
            report.error_phase = Some(err.phase());
            report.error = Some(err.to_string());
        }
    }
    report.transitions = controller.transitions().to_vec();
    report
}
