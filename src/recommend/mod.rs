//! Rule-based service-optimization recommendations.
//!
//! [`generate`] walks [`rules::RULES`] in order, collects whatever each rule
//! emits and stably sorts the result by [`Priority`]. It is a pure function of
//! its inputs and never fails; short metric lists simply yield fewer
//! recommendations.

pub mod rules;

use serde::Serialize;
use tracing::debug;

use crate::analyzers::types::{BoardingsAnalysis, OnTimeAnalysis, ProductivityAnalysis};
use crate::config::Thresholds;
use rules::{RULES, RuleInput};

/// Urgency of a recommendation. Ordering is High < Medium < Low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    #[serde(rename = "Infrastructure Investment")]
    InfrastructureInvestment,
    #[serde(rename = "Operational Short-Term")]
    OperationalShortTerm,
    #[serde(rename = "Mid-Term Planning")]
    MidTermPlanning,
    #[serde(rename = "Equity & Accessibility")]
    EquityAccessibility,
    #[serde(rename = "Regional Integration")]
    RegionalIntegration,
    #[serde(rename = "Technology & Innovation")]
    TechnologyInnovation,
    #[serde(rename = "Customer Experience")]
    CustomerExperience,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::InfrastructureInvestment => "Infrastructure Investment",
            Category::OperationalShortTerm => "Operational Short-Term",
            Category::MidTermPlanning => "Mid-Term Planning",
            Category::EquityAccessibility => "Equity & Accessibility",
            Category::RegionalIntegration => "Regional Integration",
            Category::TechnologyInnovation => "Technology & Innovation",
            Category::CustomerExperience => "Customer Experience",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub category: Category,
    pub priority: Priority,
    pub action: String,
    pub rationale: String,
    pub estimated_impact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implementation_timeline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_practice: Option<String>,
}

/// Evaluates every rule against the three metric families.
#[tracing::instrument(skip_all)]
pub fn generate(
    boardings: &BoardingsAnalysis,
    ontime: &OnTimeAnalysis,
    productivity: &ProductivityAnalysis,
    thresholds: &Thresholds,
) -> Vec<Recommendation> {
    let input = RuleInput {
        boardings,
        ontime,
        productivity,
        thresholds,
    };

    let mut recommendations = Vec::new();
    for rule in RULES {
        let emitted = rule.evaluate(&input);
        debug!(rule = ?rule, emitted = emitted.len(), "Rule evaluated");
        recommendations.extend(emitted);
    }

    // stable: equal priorities keep rule order
    recommendations.sort_by_key(|r| r.priority);
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::{
        PeriodBoardings, RouteBoardings, RouteProductivity, RouteReliability,
    };
    use crate::segment::TimePeriod;

    pub(crate) fn reliability(id: &str, pct: f64) -> RouteReliability {
        RouteReliability {
            route_id: id.to_string(),
            route_name: format!("Route {id}"),
            on_time_pct: pct,
            avg_delay_minutes: 0.0,
        }
    }

    pub(crate) fn busy(id: &str, avg: f64) -> RouteBoardings {
        RouteBoardings {
            route_id: id.to_string(),
            route_name: format!("Route {id}"),
            service_type: "Local".to_string(),
            boardings: (avg * 10.0) as u64,
            total_trips: 10,
            avg_boardings_per_trip: avg,
        }
    }

    pub(crate) fn productive(id: &str, bph: f64) -> RouteProductivity {
        RouteProductivity {
            route_id: id.to_string(),
            route_name: format!("Route {id}"),
            service_type: "Local".to_string(),
            boardings: (bph * 10.0) as u64,
            revenue_hours: 10,
            boardings_per_hour: bph,
        }
    }

    pub(crate) fn metrics(
        system_pct: f64,
        lowest: Vec<RouteReliability>,
        top: Vec<RouteBoardings>,
        bottom: Vec<RouteProductivity>,
        am_peak: Option<u64>,
    ) -> (BoardingsAnalysis, OnTimeAnalysis, ProductivityAnalysis) {
        let period_comparison = am_peak
            .map(|sum| PeriodBoardings {
                time_period: TimePeriod::WeekdayAmPeak,
                sum,
                mean: 1.0,
                count: 1,
            })
            .into_iter()
            .collect();
        (
            BoardingsAnalysis {
                top_5_routes: top.clone(),
                all_routes: top,
                period_comparison,
            },
            OnTimeAnalysis {
                system_ontime_pct: Some(system_pct),
                highest_reliability: lowest.clone(),
                lowest_reliability: lowest.clone(),
                delay_boarding_correlation: None,
                all_routes: lowest,
            },
            ProductivityAnalysis {
                service_type_productivity: vec![],
                bottom_10_routes: bottom.clone(),
                all_routes: bottom,
            },
        )
    }

    #[test]
    fn test_healthy_system_emits_r6_and_r7_only() {
        let (b, o, p) = metrics(90.0, vec![reliability("R1", 95.0)], vec![], vec![], None);
        let recs = generate(&b, &o, &p, &Thresholds::default());

        let categories: Vec<_> = recs.iter().map(|r| r.category).collect();
        assert_eq!(
            categories,
            vec![Category::CustomerExperience, Category::TechnologyInnovation]
        );
        assert!(
            !recs
                .iter()
                .any(|r| r.action.contains("reliability improvement program"))
        );
    }

    #[test]
    fn test_priorities_are_non_decreasing() {
        let (b, o, p) = metrics(
            70.0,
            vec![reliability("R9", 60.0), reliability("R8", 50.0)],
            vec![busy("R1", 45.0), busy("R2", 41.0), busy("R3", 39.0)],
            vec![
                productive("R4", 5.0),
                productive("R5", 7.0),
                productive("R6", 10.0),
                productive("R7", 11.0),
            ],
            Some(60_000),
        );
        let recs = generate(&b, &o, &p, &Thresholds::default());

        assert!(recs.windows(2).all(|w| w[0].priority <= w[1].priority));
        // R1 x2, R2 x2, R8, R3 x2, R4 x2, R5, R7
        assert_eq!(recs.len(), 11);
        assert_eq!(recs[0].category, Category::InfrastructureInvestment);
        assert!(recs[0].action.contains("R9"));
        assert_eq!(recs[4].category, Category::OperationalShortTerm);
        assert!(recs[4].action.contains("reliability improvement program"));
        assert_eq!(recs[5].category, Category::MidTermPlanning);
        assert_eq!(recs[10].category, Category::CustomerExperience);
    }

    #[test]
    fn test_empty_metrics_still_emit_customer_experience() {
        let (b, o, p) = metrics(85.0, vec![], vec![], vec![], None);
        let recs = generate(&b, &o, &p, &Thresholds::default());

        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].priority, Priority::Medium);
        assert_eq!(recs[1].priority, Priority::Low);
    }

    #[test]
    fn test_serialized_labels() {
        let (b, o, p) = metrics(90.0, vec![], vec![], vec![], None);
        let recs = generate(&b, &o, &p, &Thresholds::default());
        let json = serde_json::to_value(&recs[1]).unwrap();

        assert_eq!(json["category"], "Technology & Innovation");
        assert_eq!(json["priority"], "Low");
        assert!(json.get("estimated_cost").is_some());
    }
}
