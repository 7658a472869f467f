use chrono::NaiveTime;
use serde::{Serialize, Serializer};
use std::fmt;

/// Header values parsed from `Goal:`, `Reason:` and `Calorie Target:` lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanMetadata {
    pub goal: Option<String>,
    pub reason: Option<String>,
    pub calorie_target: Option<u32>,
}

/// One `HH:MM | description` line of the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleItem {
    #[serde(serialize_with = "serialize_hh_mm")]
    pub time: NaiveTime,
    pub description: String,
    pub calories: u32,
}

impl ScheduleItem {
    pub fn new(time: NaiveTime, description: impl Into<String>, calories: u32) -> Self {
        Self {
            time,
            description: description.into(),
            calories,
        }
    }
}

impl fmt::Display for ScheduleItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.time.format("%H:%M"), self.description)
    }
}

fn serialize_hh_mm<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&time.format("%H:%M"))
}

/// The document as seen at one instant: metadata, what has already been
/// eaten today, and what is still ahead.
///
/// Derived on every request and never stored, since the split between
/// past and upcoming items moves with the clock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedPlan {
    pub metadata: PlanMetadata,
    pub calories_consumed: u32,
    /// Items later than "now", ascending by time.
    pub upcoming: Vec<ScheduleItem>,
}

impl ParsedPlan {
    /// Target minus consumed, negative once the target is exceeded.
    pub fn calories_remaining(&self) -> Option<i64> {
        self.metadata
            .calorie_target
            .map(|target| i64::from(target) - i64::from(self.calories_consumed))
    }

    /// The next `limit` items and the number of items not shown.
    pub fn display_items(&self, limit: usize) -> (&[ScheduleItem], usize) {
        let shown = self.upcoming.len().min(limit);
        (&self.upcoming[..shown], self.upcoming.len() - shown)
    }
}

impl ParsedPlan {
    /// Writes the goal, reason and calorie summary lines.
    pub fn write_header(&self, out: &mut impl fmt::Write) -> fmt::Result {
        if let Some(goal) = &self.metadata.goal {
            writeln!(out, "Goal: {}", goal)?;
        }
        if let Some(reason) = &self.metadata.reason {
            writeln!(out, "Reason: {}", reason)?;
        }
        match self.calories_remaining() {
            Some(remaining) => writeln!(
                out,
                "Calories: {} consumed, {} remaining",
                self.calories_consumed, remaining
            ),
            None => writeln!(out, "Calories: {} consumed", self.calories_consumed),
        }
    }
}

impl fmt::Display for ParsedPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_header(f)?;

        if self.upcoming.is_empty() {
            writeln!(f, "\nNothing left for today.")?;
        } else {
            writeln!(f, "\nUpcoming:")?;
            for item in &self.upcoming {
                writeln!(f, "  {}", item)?;
            }
        }

        Ok(())
    }
}
