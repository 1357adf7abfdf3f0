//! Per-student interaction drill-down.

use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEventKind {
    TutorInteraction,
    TutorHint,
    StudentResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEvent {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: TimelineEventKind,
    pub timestamp: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub rationale: &'static str,
}

/// A single scored tutor interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionRecord {
    pub topic: &'static str,
    pub concept: &'static str,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MasteryEntry {
    pub topic: String,
    pub average_score: f64,
    pub interaction_count: usize,
}

/// Per-topic average score (one decimal) and interaction count, sorted by
/// topic.
pub fn mastery_summary(records: &[InteractionRecord]) -> Vec<MasteryEntry> {
    let mut by_topic: BTreeMap<&str, (u64, usize)> = BTreeMap::new();
    for record in records {
        let entry = by_topic.entry(record.topic).or_default();
        entry.0 += u64::from(record.score);
        entry.1 += 1;
    }

    by_topic
        .into_iter()
        .map(|(topic, (total, count))| MasteryEntry {
            topic: topic.to_owned(),
            average_score: (total as f64 / count as f64 * 10.0).round() / 10.0,
            interaction_count: count,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudentProfile {
    pub student_id: &'static str,
    pub name: &'static str,
    pub class_id: &'static str,
    pub timeline: Vec<TimelineEvent>,
    pub records: Vec<InteractionRecord>,
    pub insights: &'static [&'static str],
}

impl StudentProfile {
    pub fn mastery(&self) -> Vec<MasteryEntry> {
        mastery_summary(&self.records)
    }
}

/// Look up a fixture student by id.
pub fn find_student(student_id: &str) -> Option<StudentProfile> {
    let student = fixture_student();
    (student.student_id == student_id).then_some(student)
}

pub fn fixture_student() -> StudentProfile {
    use TimelineEventKind::*;

    StudentProfile {
        student_id: "STU-7890",
        name: "Alice Smith",
        class_id: "CLASS_A",
        timeline: vec![
            TimelineEvent {
                id: 1,
                kind: TutorInteraction,
                timestamp: "2025-06-20 10:05 AM",
                title: "Asked for help on quadratic equations",
                description: "Student struggled with factoring x^2 - 5x + 6.",
                rationale: "SHAP: High importance on 'factoring' and 'negative coefficients'. Model suggested a step-by-step breakdown.",
            },
            TimelineEvent {
                id: 2,
                kind: TutorHint,
                timestamp: "2025-06-20 10:10 AM",
                title: "Received hint on common factors",
                description: "Tutor provided a hint about finding two numbers that multiply to 6 and add to -5.",
                rationale: "SHAP: Hint was triggered by student's repeated incorrect attempts at finding factors. Model identified a pattern of 'multiplication' errors.",
            },
            TimelineEvent {
                id: 3,
                kind: StudentResponse,
                timestamp: "2025-06-20 10:15 AM",
                title: "Correctly factored the equation",
                description: "Student successfully factored (x-2)(x-3).",
                rationale: "SHAP: Positive contribution from 'correct answer' and 'previous hint application'. Mastery score increased for 'factoring'.",
            },
            TimelineEvent {
                id: 4,
                kind: TutorInteraction,
                timestamp: "2025-06-20 10:20 AM",
                title: "Started new problem on linear inequalities",
                description: "Student initiated a new problem on 2x + 3 > 7.",
                rationale: "SHAP: Model identified 'linear equations' as a mastered concept, suggesting progression to 'inequalities'.",
            },
        ],
        records: vec![
            InteractionRecord {
                topic: "Algebra",
                concept: "Factoring Quadratics",
                score: 55,
            },
            InteractionRecord {
                topic: "Algebra",
                concept: "Factoring Quadratics",
                score: 85,
            },
            InteractionRecord {
                topic: "Algebra",
                concept: "Linear Inequalities",
                score: 78,
            },
            InteractionRecord {
                topic: "Geometry",
                concept: "Area of Triangles",
                score: 62,
            },
        ],
        insights: &[
            "Student shows strong progress in Algebra.",
            "Needs more practice with advanced Geometry concepts.",
            "Responds well to step-by-step hints.",
        ],
    }
}
