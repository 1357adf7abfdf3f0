use maud::{Markup, html};
use tracing::warn;
use tutordash_core::radar::{RadarFilter, RadarItem, Uncertainty, fixture_radar, unique_topics};
use tutordash_core::view::DashboardView;
use tutordash_util_error::FmtCompact as _;

use super::ViewQuery;
use crate::layout::render_notice;
use crate::session::AuthenticatedUser;
use crate::{LOG_TARGET, UiState};

impl UiState {
    pub(super) async fn render_class_radar(
        &self,
        user: &AuthenticatedUser,
        query: &ViewQuery,
    ) -> Markup {
        let (items, fetch_error) = match self.class_data.fetch_class_radar(user.token()).await {
            Ok(items) => (items, None),
            Err(err) => {
                warn!(
                    target: LOG_TARGET,
                    err = %err.fmt_compact(),
                    "Class data unavailable, showing demo data"
                );
                (fixture_radar(), Some(err.fmt_compact().to_string()))
            }
        };

        let filter = RadarFilter::from_query(query.topic.as_deref(), query.uncertainty.as_deref());
        let rows = filter.apply(&items);

        html! {
            section ."o-classRadar" {
                p ."o-classRadar__intro" {
                    "Misconceptions and uncertainty across the class, by topic and concept."
                }
                @if let Some(err) = fetch_error {
                    (render_notice("warning", &format!("Could not load class data ({err}). Showing demo data.")))
                }
                (render_filters(&items, &filter))
                @if rows.is_empty() {
                    p ."o-classRadar__empty" { "No data matches the selected filters." }
                } @else {
                    (render_table(&rows))
                }
            }
        }
    }
}

fn render_filters(items: &[RadarItem], filter: &RadarFilter) -> Markup {
    let selected_topic = filter.topic.as_deref();
    html! {
        form ."o-classRadar__filters" action=(DashboardView::ClassRadar.href()) method="get" {
            label {
                "Topic "
                select name="topic" {
                    option value="all" selected[selected_topic.is_none()] { "All topics" }
                    @for topic in unique_topics(items) {
                        option value=(topic) selected[selected_topic == Some(topic)] { (topic) }
                    }
                }
            }
            label {
                "Uncertainty "
                select name="uncertainty" {
                    option value="all" selected[filter.uncertainty.is_none()] { "All levels" }
                    @for level in Uncertainty::ALL {
                        option value=(level) selected[filter.uncertainty == Some(level)] { (level) }
                    }
                }
            }
            button ."u-button" type="submit" { "Apply" }
        }
    }
}

fn render_table(rows: &[&RadarItem]) -> Markup {
    html! {
        table ."o-classRadar__table" {
            thead {
                tr {
                    th { "Topic" }
                    th { "Concept" }
                    th { "Uncertainty" }
                    th { "Students" }
                    th { "Avg. score" }
                    th { "Range" }
                }
            }
            tbody {
                @for row in rows {
                    tr {
                        td { (row.topic) }
                        td { (row.concept) }
                        td { span class=(format!("u-badge -{}", row.uncertainty)) { (row.uncertainty) } }
                        td { (row.students) }
                        td class=(format!("u-score -{}", row.grade().as_str())) {
                            (format!("{:.1}%", row.avg_score))
                        }
                        td {
                            @match (row.min_score, row.max_score) {
                                (Some(min), Some(max)) => { (min) "–" (max) }
                                _ => { "N/A" }
                            }
                        }
                    }
                }
            }
        }
    }
}
