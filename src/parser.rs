//! Parser for the plain-text plan document.
//!
//! ```text
//! # comment
//! Goal: Fast until dinner
//! Reason: Race on Sunday
//! Calorie Target: 1800 kcal
//! 08:00 | Coffee (5 kcal)
//! 12:30 | Salad 350kcal
//! ```
//!
//! Parsing never fails. Lines that are not metadata and not a valid
//! `HH:MM | description` item are skipped.

use chrono::{NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{ParsedPlan, ScheduleItem};

const COMMENT_MARKER: char = '#';
const ITEM_SEPARATOR: char = '|';

static CALORIES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([0-9]+)\s*k?cal\b").expect("valid calorie regex"));

enum MetadataField {
    Goal,
    Reason,
    CalorieTarget,
}

fn metadata_field(line: &str) -> Option<(MetadataField, &str)> {
    const PREFIXES: [(&str, MetadataField); 4] = [
        ("goal:", MetadataField::Goal),
        ("reason:", MetadataField::Reason),
        ("calorie target:", MetadataField::CalorieTarget),
        ("calories:", MetadataField::CalorieTarget),
    ];

    let lower = line.to_lowercase();
    for (prefix, field) in PREFIXES {
        if lower.starts_with(prefix) {
            // Prefixes are ASCII, so the first colon in `line` ends the prefix.
            let (_, rest) = line.split_once(':')?;
            return Some((field, rest.trim()));
        }
    }
    None
}

fn parse_calorie_target(value: &str) -> Option<u32> {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// First `<N>cal` / `<N> kcal` in `description`, or 0.
pub fn extract_calories(description: &str) -> u32 {
    CALORIES_RE
        .captures(description)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

fn parse_item(line: &str) -> Option<ScheduleItem> {
    let (time, description) = line.split_once(ITEM_SEPARATOR)?;
    let time = NaiveTime::parse_from_str(time.trim(), "%H:%M").ok()?;
    let description = description.trim();
    Some(ScheduleItem::new(
        time,
        description,
        extract_calories(description),
    ))
}

/// Parses `text` relative to `now`.
///
/// Items at or before `now`'s time of day are folded into
/// `calories_consumed`; later items are returned ascending by time,
/// keeping document order for equal times.
pub fn parse(text: &str, now: NaiveDateTime) -> ParsedPlan {
    let now = now.time();
    let mut plan = ParsedPlan::default();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            continue;
        }

        if let Some((field, value)) = metadata_field(line) {
            match field {
                MetadataField::Goal => plan.metadata.goal = Some(value.to_string()),
                MetadataField::Reason => plan.metadata.reason = Some(value.to_string()),
                MetadataField::CalorieTarget => {
                    if let Some(target) = parse_calorie_target(value) {
                        plan.metadata.calorie_target = Some(target);
                    }
                }
            }
            continue;
        }

        let Some(item) = parse_item(line) else {
            continue;
        };

        if item.time <= now {
            plan.calories_consumed = plan.calories_consumed.saturating_add(item.calories);
        } else {
            plan.upcoming.push(item);
        }
    }

    // `sort_by_key` is stable.
    plan.upcoming.sort_by_key(|item| item.time);
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn today_at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_reference_document() {
        let text = "Goal: Fast\nCalorie Target: 500\n08:00 | Coffee (5 kcal)\n23:59 | Water";
        let plan = parse(text, today_at(12, 0));

        assert_eq!(plan.metadata.goal.as_deref(), Some("Fast"));
        assert_eq!(plan.metadata.calorie_target, Some(500));
        assert_eq!(plan.metadata.reason, None);
        assert_eq!(plan.calories_consumed, 5);
        assert_eq!(plan.upcoming, vec![ScheduleItem::new(hm(23, 59), "Water", 0)]);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = "bad | no time\njust some text\n25:00 | Too late (900 kcal)\n\n10:00 | Tea";
        let plan = parse(text, today_at(9, 0));

        assert_eq!(plan.calories_consumed, 0);
        assert_eq!(plan.upcoming.len(), 1);
        assert_eq!(plan.upcoming[0].description, "Tea");
    }

    #[test]
    fn test_malformed_past_lines_do_not_count() {
        let text = "bad | Breakfast 400 kcal\nno separator 300 kcal\n07:00 | Toast 100kcal";
        let plan = parse(text, today_at(12, 0));

        assert_eq!(plan.calories_consumed, 100);
        assert!(plan.upcoming.is_empty());
    }

    #[test]
    fn test_future_items_sorted_by_time() {
        let text = "09:00 | Second\n08:30 | First";
        let plan = parse(text, today_at(6, 0));

        let times: Vec<_> = plan.upcoming.iter().map(|i| i.time).collect();
        assert_eq!(times, vec![hm(8, 30), hm(9, 0)]);
    }

    #[test]
    fn test_equal_times_keep_document_order() {
        let text = "10:00 | b\n09:00 | a\n10:00 | c";
        let plan = parse(text, today_at(6, 0));

        let descriptions: Vec<_> = plan.upcoming.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(descriptions, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_item_at_now_is_past() {
        let plan = parse("12:00 | Lunch 600 kcal\n12:01 | Walk", today_at(12, 0));
        assert_eq!(plan.calories_consumed, 600);
        assert_eq!(plan.upcoming.len(), 1);
        assert_eq!(plan.upcoming[0].description, "Walk");
    }

    #[test]
    fn test_comments_are_ignored() {
        let text = "# Goal: Hidden\n  # 08:00 | Commented 500 kcal\nGoal: Shown";
        let plan = parse(text, today_at(12, 0));
        assert_eq!(plan.metadata.goal.as_deref(), Some("Shown"));
        assert_eq!(plan.calories_consumed, 0);
    }

    #[test]
    fn test_metadata_is_case_insensitive() {
        let text = "GOAL:  Lean out \nreason: wedding: in June\ncalories: about 1,800 kcal";
        let plan = parse(text, today_at(12, 0));

        assert_eq!(plan.metadata.goal.as_deref(), Some("Lean out"));
        // Only the first colon splits.
        assert_eq!(plan.metadata.reason.as_deref(), Some("wedding: in June"));
        assert_eq!(plan.metadata.calorie_target, Some(1800));
    }

    #[test]
    fn test_calorie_target_without_digits_is_ignored() {
        let plan = parse("Calorie Target: lots", today_at(12, 0));
        assert_eq!(plan.metadata.calorie_target, None);

        let plan = parse("Calorie Target: 99999999999999", today_at(12, 0));
        assert_eq!(plan.metadata.calorie_target, None);
    }

    #[test]
    fn test_later_metadata_line_wins() {
        let plan = parse("Goal: One\nGoal: Two", today_at(12, 0));
        assert_eq!(plan.metadata.goal.as_deref(), Some("Two"));
    }

    #[test]
    fn test_extract_calories() {
        assert_eq!(extract_calories("Coffee (5 kcal)"), 5);
        assert_eq!(extract_calories("Salad 350kcal"), 350);
        assert_eq!(extract_calories("Apple 95 Cal"), 95);
        assert_eq!(extract_calories("2 eggs 140 KCAL then 50 kcal"), 140);
        assert_eq!(extract_calories("Water"), 0);
        assert_eq!(extract_calories("3 cups of tea"), 0);
    }

    #[test]
    fn test_calorie_unit_must_be_a_whole_word() {
        assert_eq!(extract_calories("Sync 3 calendars"), 0);
        assert_eq!(extract_calories("2 calories of gum"), 0);
        assert_eq!(extract_calories("Snack 150 kcals"), 0);
        assert_eq!(extract_calories("Snack 150 kcals, then 80 kcal"), 80);

        let plan = parse("07:00 | Sync 3 calendars\n07:30 | Tea 20 cal", today_at(12, 0));
        assert_eq!(plan.calories_consumed, 20);
    }

    #[test]
    fn test_whitespace_around_fields() {
        let plan = parse("   14:15   |   Snack 200 kcal   ", today_at(6, 0));
        assert_eq!(plan.upcoming, vec![ScheduleItem::new(hm(14, 15), "Snack 200 kcal", 200)]);
    }

    #[test]
    fn test_result_depends_on_now() {
        let text = "08:00 | Breakfast 400 kcal\n13:00 | Lunch 600 kcal\n19:00 | Dinner 700 kcal";

        let morning = parse(text, today_at(7, 0));
        assert_eq!(morning.calories_consumed, 0);
        assert_eq!(morning.upcoming.len(), 3);

        let afternoon = parse(text, today_at(14, 0));
        assert_eq!(afternoon.calories_consumed, 1000);
        assert_eq!(afternoon.upcoming.len(), 1);
    }
}
