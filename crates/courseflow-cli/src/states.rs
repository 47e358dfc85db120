//! # States Subcommand
//!
//! Prints an entity kind's transition table, one row per status with
//! its reachable successors.

use clap::Args;

use courseflow_core::EntityKind;
use courseflow_state::{
    CourseStatus, EnrollmentStatus, LessonStatus, LifecycleStatus, PaymentStatus,
};

/// Arguments for the states subcommand.
#[derive(Args, Debug)]
pub struct StatesArgs {
    /// Entity kind: course, lesson, enrollment, or payment.
    pub kind: String,
}

/// Print the transition table for the requested kind.
pub fn run(args: &StatesArgs) -> anyhow::Result<()> {
    let kind: EntityKind = args.kind.parse()?;
    for line in table_lines(kind) {
        println!("{line}");
    }
    Ok(())
}

/// The rendered table rows for one kind.
pub fn table_lines(kind: EntityKind) -> Vec<String> {
    match kind {
        EntityKind::Course => lines_for::<CourseStatus>(),
        EntityKind::Lesson => lines_for::<LessonStatus>(),
        EntityKind::Enrollment => lines_for::<EnrollmentStatus>(),
        EntityKind::Payment => lines_for::<PaymentStatus>(),
    }
}

fn lines_for<S: LifecycleStatus>() -> Vec<String> {
    S::all_statuses()
        .iter()
        .map(|status| {
            if status.is_terminal() {
                format!("{:<20} -> (terminal)", status.name())
            } else {
                let successors: Vec<&str> =
                    status.successors().iter().map(|s| s.name()).collect();
                format!("{:<20} -> {}", status.name(), successors.join(", "))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_table_lines() {
        let lines = table_lines(EntityKind::Course);
        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with("DRAFT"));
        assert!(lines[0].contains("TOPIC_VOTING"));
        assert!(lines.last().unwrap().contains("(terminal)"));
    }

    #[test]
    fn test_every_kind_renders() {
        for kind in EntityKind::all_kinds() {
            assert!(!table_lines(*kind).is_empty());
        }
    }
}
