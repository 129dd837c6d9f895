use crate::domain::level::SkillLevel;
use crate::domain::recommendation::Recommendation;
use crate::domain::session::{AvailabilityWindow, Session};
use crate::suitability::SuitabilityVector;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashSet;

const BASE_SCORE: f64 = 50.0;
const RECOMMEND_THRESHOLD: f64 = 30.0;

const LEVEL_MATCH_MAX: f64 = 30.0;
const LEVEL_STEP_PENALTY: f64 = 5.0;
const LEVEL_MATCH_FALLBACK: f64 = 25.0;
const FORECAST_MATCH_MAX: f64 = 25.0;
const AVAILABILITY_BONUS: f64 = 20.0;
const FRIEND_POINTS: f64 = 8.0;
const FRIEND_CAP: f64 = 25.0;
const HISTORY_POINTS: f64 = 2.0;
const HISTORY_CAP: f64 = 10.0;

const PERFECT_REASON_ABOVE: f64 = 80.0;
const GOOD_REASON_ABOVE: f64 = 60.0;
const SUITABILITY_REASON_ABOVE: u8 = 75;

/// Everything the engine knows about the surfer asking for suggestions.
/// All of it is optional in practice: an empty context still ranks, it
/// just leans on the base score and the unknown-level fallback.
#[derive(Debug, Clone)]
pub struct RecommendationContext {
    pub user_id: String,
    pub skill_level: Option<SkillLevel>,
    pub current_suitability: Option<SuitabilityVector>,
    pub availability: Vec<AvailabilityWindow>,
    pub history: Vec<Session>,
}

/// Scores every candidate session for this surfer, drops anything at or
/// below the recommendation threshold and returns the rest ordered best
/// first. Ties keep their input order.
pub fn rank_sessions(
    context: &RecommendationContext,
    sessions: &[Session],
    generated_at: DateTime<Utc>,
) -> Vec<Recommendation> {
    let mut scored = Vec::new();
    for session in sessions {
        let total = session_score(context, session);
        if !recommended(total) {
            continue;
        }
        scored.push((
            total,
            Recommendation {
                session_id: session.id.clone(),
                score: total.round() as u8,
                reasons: build_reasons(context, session, total),
                generated_at,
            },
        ));
    }

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    tracing::debug!(
        user_id = %context.user_id,
        candidates = sessions.len(),
        recommended = scored.len(),
        "ranked sessions"
    );

    scored.into_iter().map(|(_, rec)| rec).collect()
}

pub fn recommended(total: f64) -> bool {
    total > RECOMMEND_THRESHOLD
}

fn session_score(context: &RecommendationContext, session: &Session) -> f64 {
    let mut score = BASE_SCORE;
    score += level_match(context.skill_level, session);
    score += forecast_match(context.current_suitability.as_ref(), session);
    score += availability_match(&context.availability, session.scheduled_time);
    score += friend_factor(context, session);
    score += history_match(&context.history, session);
    score.clamp(0.0, 100.0)
}

/// 0-30 points. Full marks for surfing at the session's entry level,
/// minus five per level the surfer sits above it; nothing when the
/// surfer falls outside the session's range. An unknown level earns the
/// flat fallback so sparse profiles still get ranked.
fn level_match(skill_level: Option<SkillLevel>, session: &Session) -> f64 {
    let Some(level) = skill_level else {
        return LEVEL_MATCH_FALLBACK;
    };
    if !session.level_range_contains(level) {
        return 0.0;
    }
    let steps_above_min = f64::from(level.rank() - session.min_level.rank());
    LEVEL_MATCH_MAX - LEVEL_STEP_PENALTY * steps_above_min
}

/// 0-25 points, proportional to how suitable current conditions are for
/// the session's minimum level.
fn forecast_match(suitability: Option<&SuitabilityVector>, session: &Session) -> f64 {
    match suitability {
        Some(vector) => f64::from(vector.for_level(session.min_level)) / 100.0 * FORECAST_MATCH_MAX,
        None => 0.0,
    }
}

/// Flat 20 points when any weekly window covers the session start.
fn availability_match(windows: &[AvailabilityWindow], scheduled: DateTime<Utc>) -> f64 {
    if windows.iter().any(|w| w.covers(scheduled)) {
        AVAILABILITY_BONUS
    } else {
        0.0
    }
}

/// 8 points per distinct past co-surfer attending, capped at 25. The
/// surfer themselves never counts as their own friend.
fn friend_factor(context: &RecommendationContext, session: &Session) -> f64 {
    let mut known = HashSet::new();
    for past in &context.history {
        for participant in &past.participants {
            if participant.user_id != context.user_id {
                known.insert(participant.user_id.as_str());
            }
        }
    }

    let mut counted = HashSet::new();
    let mut friends = 0usize;
    for participant in &session.participants {
        if participant.user_id == context.user_id || !known.contains(participant.user_id.as_str())
        {
            continue;
        }
        if counted.insert(participant.user_id.as_str()) {
            friends += 1;
        }
    }

    (FRIEND_POINTS * friends as f64).min(FRIEND_CAP)
}

/// 2 points per past session at the same beach, capped at 10.
fn history_match(history: &[Session], session: &Session) -> f64 {
    let visits = history
        .iter()
        .filter(|past| past.beach_id == session.beach_id)
        .count();
    (HISTORY_POINTS * visits as f64).min(HISTORY_CAP)
}

fn build_reasons(context: &RecommendationContext, session: &Session, total: f64) -> Vec<String> {
    let mut reasons = Vec::new();

    if total > PERFECT_REASON_ABOVE {
        reasons.push("Perfect conditions for your level".to_string());
    }
    if total > GOOD_REASON_ABOVE {
        reasons.push("Good wave forecast for your skill".to_string());
    }

    let suitability = context
        .current_suitability
        .as_ref()
        .map(|vector| vector.for_level(session.min_level))
        .unwrap_or(0);
    if suitability > SUITABILITY_REASON_ABOVE {
        reasons.push("Excellent forecast suitability".to_string());
    }

    if context
        .history
        .iter()
        .any(|past| past.beach_id == session.beach_id)
    {
        reasons.push("You often surf this beach".to_string());
    }

    reasons
}
