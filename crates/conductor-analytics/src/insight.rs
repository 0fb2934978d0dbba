//! Team-collaboration insight synthesis.
//!
//! Aggregates per-message-set signals into a collaboration score,
//! communication metrics, risk factors, and recommendations. All scoring is
//! fixed-rule: a base score plus bounded additive bonuses, clamped to 0..100.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use conductor_core::types::{ChatMessage, TaskPriority};

use crate::lexicon::Lexicon;

/// Base collaboration score before bonuses.
const BASE_SCORE: f64 = 50.0;
/// Points granted per unique participant.
const PARTICIPANT_POINTS: f64 = 2.0;
/// Cap on the participant bonus.
const PARTICIPANT_BONUS_CAP: f64 = 20.0;
/// Response-time bonus tiers: under an hour, three hours, six hours.
const RESPONSE_TIERS: [(f64, f64); 3] = [(60.0, 15.0), (180.0, 10.0), (360.0, 5.0)];
/// Per-channel density bonus tiers.
const DENSITY_TIERS: [(f64, f64); 2] = [(3.0, 10.0), (2.0, 5.0)];
/// Share of stress-flagged messages that raises a stress risk.
const STRESS_SHARE_THRESHOLD: f64 = 0.15;
/// Share above which the stress risk is high severity.
const STRESS_SHARE_HIGH: f64 = 0.30;
/// Urgency-matching message count that raises a deadline risk.
const DEADLINE_COUNT_THRESHOLD: usize = 3;
/// Count above which the deadline risk is high severity.
const DEADLINE_COUNT_HIGH: usize = 8;
/// Average response time, in minutes, that triggers a communication
/// recommendation.
const SLOW_RESPONSE_MINUTES: f64 = 240.0;
/// Evidence snippets kept per risk factor.
const EVIDENCE_LIMIT: usize = 3;

/// Kind of detected risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskKind {
    /// Stress-lexicon tokens appear in a notable share of messages.
    Stress,
    /// Urgency language clusters around deadlines.
    Deadline,
}

/// Severity of a risk factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSeverity {
    /// Worth watching.
    Medium,
    /// Needs attention.
    High,
}

/// One detected risk with its evidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactor {
    /// Kind of risk.
    pub kind: RiskKind,
    /// Severity tier.
    pub severity: RiskSeverity,
    /// Human-readable description.
    pub description: String,
    /// Users whose messages triggered the risk.
    pub affected_users: Vec<String>,
    /// Message snippets that triggered the risk.
    pub evidence: Vec<String>,
}

/// Kind of generated recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    /// Rebalance workload across the team.
    Workload,
    /// Introduce or tighten a prioritization process.
    Prioritization,
    /// Improve response habits.
    Communication,
}

/// One generated recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// Kind of recommendation.
    pub kind: RecommendationKind,
    /// Suggested priority.
    pub priority: TaskPriority,
    /// Human-readable description.
    pub description: String,
    /// Concrete action steps.
    pub action_steps: Vec<String>,
}

/// Communication pattern metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommunicationMetrics {
    /// Mean gap between consecutive messages, in minutes.
    pub avg_response_minutes: f64,
    /// Mean messages per active channel.
    pub avg_channel_depth: f64,
    /// Number of distinct channels with activity.
    pub cross_channel_count: usize,
}

/// Aggregated collaboration picture for one message set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamInsights {
    /// Composite collaboration score, clamped to 0..100.
    pub collaboration_score: f64,
    /// Communication pattern metrics.
    pub metrics: CommunicationMetrics,
    /// Detected risk factors.
    pub risks: Vec<RiskFactor>,
    /// Generated recommendations.
    pub recommendations: Vec<Recommendation>,
}

/// Fixed-rule synthesizer of team insights.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeamInsightSynthesizer;

impl TeamInsightSynthesizer {
    /// Synthesizes insights for a message set.
    #[must_use]
    pub fn synthesize(&self, messages: &[ChatMessage]) -> TeamInsights {
        let metrics = communication_metrics(messages);
        let participants = unique_participants(messages);
        let risks = detect_risks(messages);

        let mut score = BASE_SCORE;
        score += (participants.len() as f64 * PARTICIPANT_POINTS).min(PARTICIPANT_BONUS_CAP);
        if messages.len() > 1 {
            for (ceiling, bonus) in RESPONSE_TIERS {
                if metrics.avg_response_minutes < ceiling {
                    score += bonus;
                    break;
                }
            }
        }
        for (floor, bonus) in DENSITY_TIERS {
            if metrics.avg_channel_depth > floor {
                score += bonus;
                break;
            }
        }
        let collaboration_score = score.clamp(0.0, 100.0);

        let recommendations = recommend(&risks, &metrics);

        TeamInsights {
            collaboration_score,
            metrics,
            risks,
            recommendations,
        }
    }
}

fn unique_participants(messages: &[ChatMessage]) -> Vec<String> {
    let mut names = Vec::new();
    for message in messages {
        if !names.contains(&message.author.name) {
            names.push(message.author.name.clone());
        }
    }
    names
}

fn communication_metrics(messages: &[ChatMessage]) -> CommunicationMetrics {
    let mut sorted: Vec<&ChatMessage> = messages.iter().collect();
    sorted.sort_by_key(|message| message.timestamp);

    let avg_response_minutes = if sorted.len() < 2 {
        0.0
    } else {
        let total_gap: i64 = sorted
            .windows(2)
            .map(|pair| (pair[1].timestamp - pair[0].timestamp).num_minutes())
            .sum();
        total_gap as f64 / (sorted.len() - 1) as f64
    };

    let mut per_channel: HashMap<&str, usize> = HashMap::new();
    for message in messages {
        *per_channel.entry(message.channel.id.as_str()).or_insert(0) += 1;
    }
    let cross_channel_count = per_channel.len();
    let avg_channel_depth = if cross_channel_count == 0 {
        0.0
    } else {
        messages.len() as f64 / cross_channel_count as f64
    };

    CommunicationMetrics {
        avg_response_minutes,
        avg_channel_depth,
        cross_channel_count,
    }
}

fn detect_risks(messages: &[ChatMessage]) -> Vec<RiskFactor> {
    let mut risks = Vec::new();
    if messages.is_empty() {
        return risks;
    }

    let stressed: Vec<&ChatMessage> = messages
        .iter()
        .filter(|message| Lexicon::has_stress_term(&message.text))
        .collect();
    let stress_share = stressed.len() as f64 / messages.len() as f64;
    if stress_share > STRESS_SHARE_THRESHOLD {
        let severity = if stress_share > STRESS_SHARE_HIGH {
            RiskSeverity::High
        } else {
            RiskSeverity::Medium
        };
        risks.push(RiskFactor {
            kind: RiskKind::Stress,
            severity,
            description: format!(
                "{:.0}% of messages carry stress language",
                stress_share * 100.0
            ),
            affected_users: users_of(&stressed),
            evidence: snippets_of(&stressed),
        });
    }

    let urgent: Vec<&ChatMessage> = messages
        .iter()
        .filter(|message| !Lexicon::urgency_hits(&message.text).is_empty())
        .collect();
    if urgent.len() > DEADLINE_COUNT_THRESHOLD {
        let severity = if urgent.len() > DEADLINE_COUNT_HIGH {
            RiskSeverity::High
        } else {
            RiskSeverity::Medium
        };
        risks.push(RiskFactor {
            kind: RiskKind::Deadline,
            severity,
            description: format!("{} messages press on deadlines", urgent.len()),
            affected_users: users_of(&urgent),
            evidence: snippets_of(&urgent),
        });
    }

    risks
}

fn users_of(messages: &[&ChatMessage]) -> Vec<String> {
    let mut users = Vec::new();
    for message in messages {
        if !users.contains(&message.author.name) {
            users.push(message.author.name.clone());
        }
    }
    users
}

fn snippets_of(messages: &[&ChatMessage]) -> Vec<String> {
    messages
        .iter()
        .take(EVIDENCE_LIMIT)
        .map(|message| {
            let snippet: String = message.text.chars().take(80).collect();
            snippet
        })
        .collect()
}

/// Fixed rule per risk kind, plus a communication recommendation when
/// responses are slow.
fn recommend(risks: &[RiskFactor], metrics: &CommunicationMetrics) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    for risk in risks {
        match risk.kind {
            RiskKind::Stress => recommendations.push(Recommendation {
                kind: RecommendationKind::Workload,
                priority: if risk.severity == RiskSeverity::High {
                    TaskPriority::High
                } else {
                    TaskPriority::Medium
                },
                description: "Rebalance workload to reduce stress signals".to_owned(),
                action_steps: vec![
                    "Review open assignments per person".to_owned(),
                    "Move or defer the least critical items".to_owned(),
                    "Check in with the most affected people".to_owned(),
                ],
            }),
            RiskKind::Deadline => recommendations.push(Recommendation {
                kind: RecommendationKind::Prioritization,
                priority: if risk.severity == RiskSeverity::High {
                    TaskPriority::High
                } else {
                    TaskPriority::Medium
                },
                description: "Introduce an explicit prioritization pass".to_owned(),
                action_steps: vec![
                    "List everything currently marked urgent".to_owned(),
                    "Rank by real deadline and impact".to_owned(),
                    "Drop or renegotiate the bottom of the list".to_owned(),
                ],
            }),
        }
    }

    if metrics.avg_response_minutes > SLOW_RESPONSE_MINUTES {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Communication,
            priority: TaskPriority::Medium,
            description: "Responses are slow; agree on reply-time expectations".to_owned(),
            action_steps: vec![
                "Agree on a target response window".to_owned(),
                "Route urgent items through a faster channel".to_owned(),
            ],
        });
    }

    recommendations
}
