//! Shared display helpers for runs and step listings.
//!
//! The engine reports through [`RunProgress`] events and a [`RunReport`];
//! everything here turns those into lines on a [`UserInterface`].

use std::collections::HashSet;

use crate::runner::{RunOutcome, RunProgress, RunReport};
use crate::steps::{format_duration, CommandDefinition, Step};
use crate::ui::UserInterface;

use super::dispatcher::{EXIT_DEADLOCK, EXIT_FAILURE};

/// Print one progress event.
pub fn show_progress(ui: &mut dyn UserInterface, event: RunProgress<'_>) {
    match event {
        RunProgress::Phase(phase) => tracing::debug!("Run phase: {}", phase),
        RunProgress::Dispatched {
            step,
            ordinal,
            concurrent,
        } => {
            let suffix = if concurrent { " (concurrent)" } else { "" };
            ui.message(&format!("[{}] {}{}", ordinal, step.name, suffix));
            if ui.output_mode().shows_details() {
                ui.show_hint(&format!(
                    "    $ {}  (in {})",
                    step.instruction,
                    step.working_directory.display()
                ));
            }
        }
        RunProgress::Finished { result, background } => {
            if let Some(output) = &result.output {
                for line in output.lines() {
                    ui.message(&format!("    {}", line));
                }
            }
            let mut line = format!("  {}", result.summary_line());
            if background {
                line.push_str(" (background)");
            }
            if result.success {
                ui.success(&line);
            } else {
                ui.error(&line);
            }
        }
    }
}

/// Print the end-of-run summary for `command`.
pub fn show_report(ui: &mut dyn UserInterface, command: &CommandDefinition, report: &RunReport) {
    let name = &command.name;

    match &report.outcome {
        RunOutcome::Completed if report.background_failures.is_empty() => {
            ui.success(&format!(
                "{} finished: {} steps in {}",
                name,
                report.completed.len(),
                format_duration(report.duration)
            ));
        }
        RunOutcome::Completed => {
            ui.error(&format!(
                "{} finished, but {} concurrent step(s) failed",
                name,
                report.background_failures.len()
            ));
            for failure in &report.background_failures {
                ui.error(&format!("  {}", failure.summary_line()));
            }
        }
        RunOutcome::Failed(result) => {
            ui.error(&format!("{} stopped: step '{}' failed", name, result.name));
            if let Some(error) = &result.error {
                ui.message(&format!("  {}", error));
            }
            let not_started: Vec<&str> = command
                .steps
                .iter()
                .map(|s| s.name.as_str())
                .filter(|n| report.dispatch_index(n).is_none())
                .collect();
            if !not_started.is_empty() {
                ui.show_hint(&format!("Not started: {}", not_started.join(", ")));
            }
        }
        RunOutcome::Blocked(deadlock) => {
            ui.error(&format!(
                "{} cannot continue: no remaining step has its dependencies met",
                name
            ));
            for line in deadlock.to_string().lines() {
                ui.message(&format!("  {}", line));
            }
            let missing = deadlock.missing(&command.steps);
            if !missing.is_empty() {
                ui.show_hint(&format!(
                    "Not steps of this command: {}. Run 'commander check {}' for details.",
                    missing.join(", "),
                    name
                ));
            }
        }
    }

    if !matches!(report.outcome, RunOutcome::Completed) {
        for failure in &report.background_failures {
            ui.warning(&format!("  {} (background)", failure.summary_line()));
        }
    }
}

/// Process exit code for a finished run.
pub fn exit_code(report: &RunReport) -> i32 {
    match report.outcome {
        RunOutcome::Completed if report.background_failures.is_empty() => 0,
        RunOutcome::Completed | RunOutcome::Failed(_) => EXIT_FAILURE,
        RunOutcome::Blocked(_) => EXIT_DEADLOCK,
    }
}

/// Lines of a step tree for `command`.
///
/// Each step is nested under its first dependency. Steps whose first
/// dependency is missing from the command, or is the step itself, are roots.
/// Steps only reachable through a cycle are listed last.
pub fn step_tree(command: &CommandDefinition) -> Vec<String> {
    let steps = &command.steps;
    let is_root = |step: &Step| match step.dependencies.first() {
        None => true,
        Some(first) => first == &step.name || !steps.iter().any(|s| &s.name == first),
    };

    let mut lines = Vec::new();
    let mut seen = HashSet::new();
    for step in steps.iter().filter(|s| is_root(*s)) {
        push_branch(steps, step, 0, &mut seen, &mut lines);
    }

    let cyclic: Vec<&Step> = steps.iter().filter(|s| !seen.contains(&s.name)).collect();
    if !cyclic.is_empty() {
        lines.push("(in a dependency cycle)".to_string());
        for step in cyclic {
            if seen.insert(step.name.clone()) {
                lines.push(step_line(step, 1));
            }
        }
    }

    lines
}

fn push_branch(
    steps: &[Step],
    step: &Step,
    depth: usize,
    seen: &mut HashSet<String>,
    lines: &mut Vec<String>,
) {
    if !seen.insert(step.name.clone()) {
        return;
    }
    lines.push(step_line(step, depth));

    for child in steps
        .iter()
        .filter(|s| s.name != step.name && s.dependencies.first() == Some(&step.name))
    {
        push_branch(steps, child, depth + 1, seen, lines);
    }
}

fn step_line(step: &Step, depth: usize) -> String {
    let mut tags = Vec::new();
    if step.concurrence {
        tags.push("concurrent".to_string());
    }
    if step.check_out_branch {
        tags.push("checkout".to_string());
    }
    if step.install_dependencies {
        tags.push("install".to_string());
    }
    if step.dependencies.len() > 1 {
        tags.push(format!("also after {}", step.dependencies[1..].join(", ")));
    }

    let connector = if depth == 0 { "" } else { "└── " };
    let tags = if tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", tags.join("; "))
    };

    format!(
        "{}{}{}: {}{}",
        "    ".repeat(depth.saturating_sub(1)),
        connector,
        step.name,
        step.instruction,
        tags
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{BlockedStep, CompletionPolicy, DeadlockReport};
    use crate::steps::StepResult;
    use crate::ui::MockUI;
    use std::time::Duration;

    fn report(outcome: RunOutcome) -> RunReport {
        RunReport {
            outcome,
            dispatch_order: vec!["fetch".into()],
            completed: vec!["fetch".into()],
            results: Vec::new(),
            background_failures: Vec::new(),
            policy: CompletionPolicy::OnDispatch,
            duration: Duration::from_millis(20),
        }
    }

    fn command() -> CommandDefinition {
        CommandDefinition::with_steps(
            "deploy",
            vec![
                Step::new("fetch", "git fetch", "/srv"),
                Step::new("build", "make", "/srv").depends_on(["fetch"]),
                Step::new("ship", "make ship", "/srv").depends_on(["build", "fetch"]),
                Step::new("serve", "make serve", "/srv")
                    .depends_on(["fetch"])
                    .concurrent(),
            ],
        )
    }

    #[test]
    fn exit_codes_follow_outcome() {
        assert_eq!(exit_code(&report(RunOutcome::Completed)), 0);

        let failed = StepResult::failure("build", Duration::ZERO, "boom".into());
        assert_eq!(exit_code(&report(RunOutcome::Failed(failed.clone()))), 1);

        let mut with_background = report(RunOutcome::Completed);
        with_background.background_failures.push(failed);
        assert_eq!(exit_code(&with_background), 1);

        let blocked = RunOutcome::Blocked(DeadlockReport::default());
        assert_eq!(exit_code(&report(blocked)), 3);
    }

    #[test]
    fn tree_nests_under_first_dependency() {
        let lines = step_tree(&command());

        assert_eq!(
            lines,
            vec![
                "fetch: git fetch",
                "└── build: make",
                "    └── ship: make ship [also after fetch]",
                "└── serve: make serve [concurrent]",
            ]
        );
    }

    #[test]
    fn tree_lists_cycles_separately() {
        let command = CommandDefinition::with_steps(
            "loop",
            vec![
                Step::new("first", "true", "/").depends_on(["second"]),
                Step::new("second", "true", "/").depends_on(["first"]),
                Step::new("alone", "true", "/").depends_on(["ghost"]),
            ],
        );

        let lines = step_tree(&command);

        assert_eq!(lines[0], "alone: true");
        assert_eq!(lines[1], "(in a dependency cycle)");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn completed_report_is_success() {
        let mut ui = MockUI::new();
        show_report(&mut ui, &command(), &report(RunOutcome::Completed));
        assert!(ui.has_success("deploy finished"));
        assert!(ui.errors().is_empty());
    }

    #[test]
    fn failed_report_names_step_and_unstarted() {
        let mut ui = MockUI::new();
        let failed = StepResult::failure("fetch", Duration::ZERO, "exit 1".into());

        show_report(&mut ui, &command(), &report(RunOutcome::Failed(failed)));

        assert!(ui.has_error("step 'fetch' failed"));
        assert!(ui.has_message("exit 1"));
        assert!(ui.has_hint("Not started: build, ship, serve"));
    }

    #[test]
    fn blocked_report_lists_waiting_steps() {
        let mut ui = MockUI::new();
        let deadlock = DeadlockReport {
            blocked: vec![BlockedStep {
                name: "build".into(),
                unmet: vec!["ghost".into()],
            }],
        };

        show_report(&mut ui, &command(), &report(RunOutcome::Blocked(deadlock)));

        assert!(ui.has_error("cannot continue"));
        assert!(ui.has_message("build waits on ghost"));
        assert!(ui.has_hint("ghost"));
    }

    #[test]
    fn progress_marks_concurrent_and_background() {
        let mut ui = MockUI::new();
        let step = Step::new("serve", "make serve", "/srv").concurrent();
        show_progress(
            &mut ui,
            RunProgress::Dispatched {
                step: &step,
                ordinal: 2,
                concurrent: true,
            },
        );
        let result = StepResult::failure("serve", Duration::ZERO, "crashed".into());
        show_progress(
            &mut ui,
            RunProgress::Finished {
                result: &result,
                background: true,
            },
        );

        assert!(ui.has_message("[2] serve (concurrent)"));
        assert!(ui.has_error("crashed"));
        assert!(ui.has_error("(background)"));
    }
}
