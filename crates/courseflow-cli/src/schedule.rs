//! # Schedule Subcommand
//!
//! Previews a generated lesson schedule from the command line without
//! persisting anything. Topic titles stand in for a course's selected
//! modules when sketching a syllabus.

use anyhow::Context;
use chrono::{NaiveDate, NaiveTime};
use clap::Args;

use courseflow_core::ModuleId;
use courseflow_schedule::{generate, Frequency, ScheduleParams, ScheduledTopic};

/// Arguments for the schedule subcommand.
#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// First candidate date (YYYY-MM-DD).
    #[arg(long)]
    pub start: NaiveDate,

    /// Lesson cadence: daily, weekly, or biweekly.
    #[arg(long, default_value = "weekly")]
    pub frequency: String,

    /// Time of day lessons start at (HH:MM).
    #[arg(long, default_value = "10:00")]
    pub time: String,

    /// Allow lessons on Saturday and Sunday.
    #[arg(long)]
    pub weekends: bool,

    /// Number of lessons to generate.
    #[arg(long, default_value_t = 10)]
    pub lessons: u32,

    /// Lesson duration in minutes.
    #[arg(long, default_value_t = 60)]
    pub duration: u32,

    /// Comma-separated topic titles for interior lessons.
    #[arg(long)]
    pub topics: Option<String>,

    /// Emit JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Generate and print the preview.
pub fn run(args: &ScheduleArgs) -> anyhow::Result<()> {
    let frequency: Frequency = args.frequency.parse()?;
    let time_of_day = NaiveTime::parse_from_str(&args.time, "%H:%M")
        .with_context(|| format!("time must be HH:MM, got {:?}", args.time))?;
    let params = ScheduleParams {
        start_date: args.start,
        frequency,
        time_of_day,
        skip_weekends: !args.weekends,
        lesson_count: args.lessons,
        duration_minutes: args.duration,
    };
    let topics = parse_topics(args.topics.as_deref().unwrap_or_default());
    let schedule = generate(&params, &topics);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&schedule)?);
    } else {
        for lesson in &schedule {
            println!(
                "{:>3}  {}  {:>3} min  {}",
                lesson.lesson_number, lesson.scheduled_at, lesson.duration_minutes, lesson.title
            );
        }
    }
    Ok(())
}

/// Parse comma-separated topic titles into preview topics. Blank
/// segments are dropped.
pub fn parse_topics(raw: &str) -> Vec<ScheduledTopic> {
    raw.split(',')
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(|title| ScheduledTopic {
            module_id: ModuleId::new(),
            title: title.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_topics() {
        let topics = parse_topics("Grammar, Reading , ,Writing");
        let titles: Vec<&str> = topics.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Grammar", "Reading", "Writing"]);
    }

    #[test]
    fn test_parse_topics_empty() {
        assert!(parse_topics("").is_empty());
    }
}
