//! # Schedule Generator
//!
//! Turns a start date, cadence, time of day, weekend policy, and lesson
//! count into an ordered list of dated lesson descriptors.
//!
//! ## Algorithm
//!
//! The cursor starts at the start date. For each lesson: if weekends are
//! skipped, the cursor advances day by day (not by the cadence step)
//! until it lands on Mon–Fri; the lesson is emitted at the cursor's date
//! and the configured time of day; then the cursor advances by the
//! cadence step. Stepping day by day off a weekend keeps a weekly
//! Monday schedule exactly seven days apart instead of drifting.
//!
//! ## Titling
//!
//! Lesson 1 is always "Introduction" and the last lesson is always
//! "Conclusion", both without a topic. Interior lessons take the
//! selected topics round-robin starting at the first one; with no
//! topics supplied they fall back to a generic "Lesson N" title. A
//! single-lesson schedule is titled "Introduction" (the first rule is
//! evaluated first).

use chrono::{Datelike, Days, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use courseflow_core::{ModuleId, Timestamp};

/// Errors raised while parsing schedule configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// A frequency string did not match any known cadence.
    #[error("unknown frequency: {0:?} (expected daily, weekly, or biweekly)")]
    UnknownFrequency(String),
}

// ─── Parameters ──────────────────────────────────────────────────────

/// Lesson cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// One lesson per day.
    Daily,
    /// One lesson per week.
    Weekly,
    /// One lesson every two weeks.
    Biweekly,
}

impl Frequency {
    /// Days the cursor advances after emitting a lesson.
    pub fn step_days(&self) -> u64 {
        match self {
            Self::Daily => 1,
            Self::Weekly => 7,
            Self::Biweekly => 14,
        }
    }

    /// The snake_case identifier for this cadence.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "biweekly" => Ok(Self::Biweekly),
            other => Err(ScheduleError::UnknownFrequency(other.to_string())),
        }
    }
}

/// Parameters for one schedule generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleParams {
    /// First candidate date; may shift forward onto a weekday.
    pub start_date: NaiveDate,
    /// Cadence between lessons.
    pub frequency: Frequency,
    /// Time of day every lesson starts at (seconds are always zero).
    pub time_of_day: NaiveTime,
    /// Whether lessons may fall on Saturday or Sunday.
    pub skip_weekends: bool,
    /// Number of lessons to generate.
    pub lesson_count: u32,
    /// Lesson duration in minutes.
    pub duration_minutes: u32,
}

impl ScheduleParams {
    /// Parameters with the platform defaults: weekly cadence, 10:00,
    /// weekends skipped, ten lessons of sixty minutes.
    pub fn starting(start_date: NaiveDate) -> Self {
        Self {
            start_date,
            frequency: Frequency::Weekly,
            time_of_day: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default(),
            skip_weekends: true,
            lesson_count: 10,
            duration_minutes: 60,
        }
    }
}

/// A selected topic, in syllabus order, available for round-robin
/// assignment to interior lessons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTopic {
    /// The underlying module.
    pub module_id: ModuleId,
    /// The module's title; interior lessons are titled after it.
    pub title: String,
}

/// One generated lesson, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonDescriptor {
    /// 1-based position in the course.
    pub lesson_number: u32,
    /// Display title ("Introduction", a topic title, or "Lesson N").
    pub title: String,
    /// Absolute start instant (UTC).
    pub scheduled_at: Timestamp,
    /// Duration in minutes.
    pub duration_minutes: u32,
    /// The topic covered, if any.
    pub module_id: Option<ModuleId>,
}

// ─── Generation ──────────────────────────────────────────────────────

/// Generate the dated lesson sequence for `params`.
///
/// Pure: same inputs, same output. A `lesson_count` of zero yields an
/// empty schedule.
pub fn generate(params: &ScheduleParams, topics: &[ScheduledTopic]) -> Vec<LessonDescriptor> {
    let mut lessons = Vec::with_capacity(params.lesson_count as usize);
    let mut cursor = params.start_date;

    for number in 1..=params.lesson_count {
        if params.skip_weekends {
            while is_weekend(cursor) {
                cursor = cursor + Days::new(1);
            }
        }

        let (title, module_id) = title_for(number, params.lesson_count, topics);
        lessons.push(LessonDescriptor {
            lesson_number: number,
            title,
            scheduled_at: Timestamp::from_date_time(cursor, params.time_of_day),
            duration_minutes: params.duration_minutes,
            module_id,
        });

        cursor = cursor + Days::new(params.frequency.step_days());
    }

    lessons
}

/// The first and last lesson instants of a generated batch, which
/// become the course's start and end dates.
pub fn date_bounds(lessons: &[LessonDescriptor]) -> Option<(Timestamp, Timestamp)> {
    match (lessons.first(), lessons.last()) {
        (Some(first), Some(last)) => Some((first.scheduled_at, last.scheduled_at)),
        _ => None,
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Title and topic for lesson `number` of `count`. The introduction
/// rule is checked first, so a one-lesson course is an "Introduction".
fn title_for(number: u32, count: u32, topics: &[ScheduledTopic]) -> (String, Option<ModuleId>) {
    if number == 1 {
        return ("Introduction".to_string(), None);
    }
    if number == count {
        return ("Conclusion".to_string(), None);
    }
    if topics.is_empty() {
        return (format!("Lesson {number}"), None);
    }
    let topic = &topics[((number - 2) as usize) % topics.len()];
    (topic.title.clone(), Some(topic.module_id))
}

// ─── Tests ───────────────────────────────────────────────────────────
