//! Class-wide misconception heat map.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use snafu::Snafu;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Uncertainty {
    High,
    Medium,
    Low,
}

impl Uncertainty {
    pub const ALL: [Uncertainty; 3] = [Uncertainty::High, Uncertainty::Medium, Uncertainty::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Uncertainty::High => "high",
            Uncertainty::Medium => "medium",
            Uncertainty::Low => "low",
        }
    }
}

impl fmt::Display for Uncertainty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Snafu)]
#[snafu(display("Unknown uncertainty level: {value:?}"))]
pub struct UnknownUncertaintyError {
    value: String,
}

impl FromStr for Uncertainty {
    type Err = UnknownUncertaintyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uncertainty::ALL
            .into_iter()
            .find(|u| u.as_str() == s)
            .ok_or_else(|| UnknownUncertaintySnafu { value: s }.build())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarItem {
    pub topic: String,
    pub concept: String,
    pub uncertainty: Uncertainty,
    pub students: u32,
    pub avg_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<u32>,
}

impl RadarItem {
    fn fixture(
        topic: &str,
        concept: &str,
        uncertainty: Uncertainty,
        students: u32,
        avg_score: f64,
    ) -> Self {
        Self {
            topic: topic.to_owned(),
            concept: concept.to_owned(),
            uncertainty,
            students,
            avg_score,
            min_score: None,
            max_score: None,
        }
    }

    pub fn grade(&self) -> ScoreGrade {
        ScoreGrade::of(self.avg_score)
    }
}

/// Rows shown when no backing data service is reachable.
pub fn fixture_radar() -> Vec<RadarItem> {
    use Uncertainty::*;
    vec![
        RadarItem::fixture("Algebra", "Solving Linear Equations", High, 15, 65.2),
        RadarItem::fixture("Geometry", "Area of Triangles", Medium, 8, 78.5),
        RadarItem::fixture("Calculus", "Derivatives", Low, 3, 92.1),
        RadarItem::fixture("Algebra", "Factoring Quadratics", High, 12, 58.7),
        RadarItem::fixture("Statistics", "Probability", Medium, 7, 71.3),
        RadarItem::fixture("Geometry", "Pythagorean Theorem", Low, 2, 89.0),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreGrade {
    Good,
    Fair,
    Poor,
}

impl ScoreGrade {
    pub fn of(score: f64) -> Self {
        if 80.0 <= score {
            ScoreGrade::Good
        } else if 60.0 <= score {
            ScoreGrade::Fair
        } else {
            ScoreGrade::Poor
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScoreGrade::Good => "good",
            ScoreGrade::Fair => "fair",
            ScoreGrade::Poor => "poor",
        }
    }
}

/// Topic/uncertainty filter. `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RadarFilter {
    pub topic: Option<String>,
    pub uncertainty: Option<Uncertainty>,
}

impl RadarFilter {
    /// Build from raw query values, where `all` or an empty string means no
    /// filtering. Unparseable uncertainty values also mean no filtering.
    pub fn from_query(topic: Option<&str>, uncertainty: Option<&str>) -> Self {
        fn selected(value: Option<&str>) -> Option<&str> {
            value.map(str::trim).filter(|v| !v.is_empty() && *v != "all")
        }

        Self {
            topic: selected(topic).map(ToOwned::to_owned),
            uncertainty: selected(uncertainty).and_then(|v| v.parse().ok()),
        }
    }

    pub fn matches(&self, item: &RadarItem) -> bool {
        let topic_match = self.topic.as_ref().is_none_or(|t| *t == item.topic);
        let uncertainty_match = self.uncertainty.is_none_or(|u| u == item.uncertainty);
        topic_match && uncertainty_match
    }

    pub fn apply<'i>(&self, items: &'i [RadarItem]) -> Vec<&'i RadarItem> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}

/// Distinct topics, in order of first appearance.
pub fn unique_topics(items: &[RadarItem]) -> Vec<&str> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(|item| item.topic.as_str())
        .filter(|topic| seen.insert(*topic))
        .collect()
}
