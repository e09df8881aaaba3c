//! Collection wrapper types for displaying groups of domain objects.

use std::{fmt, ops::Index};

use crate::models::{FeedbackRecord, Step};

/// Newtype wrapper for displaying collections of steps.
///
/// Each step uses its own Display format; an empty collection prints a
/// placeholder line instead of nothing.
pub struct Steps(pub Vec<Step>);

impl Steps {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of steps in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get an iterator over the steps.
    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.0.iter()
    }
}

impl Index<usize> for Steps {
    type Output = Step;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a Steps {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Steps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No steps found.")
        } else {
            for step in &self.0 {
                write!(f, "{step}")?;
            }
            Ok(())
        }
    }
}

/// Newtype wrapper for displaying a plan's feedback log.
pub struct FeedbackRecords(pub Vec<FeedbackRecord>);

impl FeedbackRecords {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of records in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for FeedbackRecords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No feedback recorded.")
        } else {
            for record in &self.0 {
                write!(f, "{record}")?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::StepStatus;

    #[test]
    fn test_steps_display_multiple_steps() {
        let first = Step::new(1, "Test Step", Some("A test step".to_string()));
        let mut second = Step::new(2, "Second Step", None);
        second.status = StepStatus::Completed;
        second.notes = Some("went fine".to_string());

        let output = format!("{}", Steps(vec![first, second]));
        assert!(output.contains("### 01. Test Step (⬜ pending)"));
        assert!(output.contains("A test step"));
        assert!(output.contains("### 02. Second Step (✅ completed)"));
        assert!(output.contains("#### Notes\n\nwent fine"));
    }

    #[test]
    fn test_feedback_records_display() {
        assert_eq!(
            format!("{}", FeedbackRecords(vec![])),
            "No feedback recorded.\n"
        );

        let record = FeedbackRecord {
            id: "001-first".to_string(),
            title: "First".to_string(),
            summary: None,
            step: None,
            platform: None,
            participants: vec![],
            created_at: Timestamp::from_second(0).unwrap(),
        };
        let output = format!("{}", FeedbackRecords(vec![record]));
        assert!(output.contains("## First (001-first)"));
        assert!(!output.contains("Participants"));
    }
}
