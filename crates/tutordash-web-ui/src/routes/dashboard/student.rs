use axum::http::StatusCode;
use maud::{Markup, html};
use tutordash_core::access::AccessProfile;
use tutordash_core::radar::ScoreGrade;
use tutordash_core::student::{StudentProfile, TimelineEventKind, find_student, fixture_student};

use crate::layout::render_notice;

/// Drill-down for `student_id`, or the demo student. Unknown students are
/// 404 and students outside the agent's classes 403, as on the API.
pub(super) fn render_student_drill_down(
    profile: &AccessProfile,
    student_id: Option<&str>,
) -> (StatusCode, Markup) {
    let student = match student_id {
        Some(id) => find_student(id),
        None => Some(fixture_student()),
    };

    match student {
        None => (
            StatusCode::NOT_FOUND,
            render_notice("error", "Student not found."),
        ),
        Some(student) if !profile.classes.includes(student.class_id) => (
            StatusCode::FORBIDDEN,
            render_notice("error", "This student is not in one of your classes."),
        ),
        Some(student) => (StatusCode::OK, render_student(&student)),
    }
}

fn kind_label(kind: TimelineEventKind) -> &'static str {
    match kind {
        TimelineEventKind::TutorInteraction => "Tutor interaction",
        TimelineEventKind::TutorHint => "Tutor hint",
        TimelineEventKind::StudentResponse => "Student response",
    }
}

fn render_student(student: &StudentProfile) -> Markup {
    html! {
        section ."o-studentDrillDown" {
            h2 { (student.name) " (" (student.student_id) ")" }

            h3 { "Mastery summary" }
            table ."o-studentDrillDown__mastery" {
                thead { tr { th { "Topic" } th { "Average score" } th { "Interactions" } } }
                tbody {
                    @for entry in student.mastery() {
                        tr {
                            td { (entry.topic) }
                            td class=(format!("u-score -{}", ScoreGrade::of(entry.average_score).as_str())) {
                                (format!("{:.1}%", entry.average_score))
                            }
                            td { (entry.interaction_count) }
                        }
                    }
                }
            }

            h3 { "Interaction timeline" }
            ol ."o-studentDrillDown__timeline" {
                @for event in &student.timeline {
                    li ."o-timelineEvent" {
                        div ."o-timelineEvent__meta" {
                            span ."u-badge" { (kind_label(event.kind)) }
                            time { (event.timestamp) }
                        }
                        h4 { (event.title) }
                        p { (event.description) }
                        details {
                            summary { "Why did the tutor do this?" }
                            p ."o-timelineEvent__rationale" { (event.rationale) }
                        }
                    }
                }
            }

            h3 { "Key insights" }
            ul ."o-studentDrillDown__insights" {
                @for insight in student.insights {
                    li { (insight) }
                }
            }
        }
    }
}
