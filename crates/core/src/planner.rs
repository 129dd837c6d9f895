use crate::domain::beach::{Beach, BeachCatalog};
use crate::domain::level::SkillLevel;
use crate::domain::recommendation::Recommendation;
use crate::ingest::provider::ForecastProvider;
use crate::ingest::service::{FetchedForecast, ForecastService};
use crate::recommend::{rank_sessions, RecommendationContext};
use crate::store::{AvailabilityStore, SessionStore};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One planning run: where, when, what the sea looks like and which
/// sessions are worth joining. `forecast` is absent when the provider
/// was unreachable and nothing was cached; ranking still happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPlan {
    pub user_id: String,
    pub beach: Beach,
    pub generated_at: DateTime<Utc>,
    pub forecast: Option<FetchedForecast>,
    pub recommendations: Vec<Recommendation>,
}

/// Wires the forecast service, the stores and the catalog behind one
/// entry point.
pub struct Planner<P, S, A> {
    forecasts: ForecastService<P>,
    sessions: S,
    availability: A,
    catalog: BeachCatalog,
}

impl<P, S, A> Planner<P, S, A>
where
    P: ForecastProvider,
    S: SessionStore,
    A: AvailabilityStore,
{
    pub fn new(
        forecasts: ForecastService<P>,
        sessions: S,
        availability: A,
        catalog: BeachCatalog,
    ) -> Self {
        Self {
            forecasts,
            sessions,
            availability,
            catalog,
        }
    }

    pub fn catalog(&self) -> &BeachCatalog {
        &self.catalog
    }

    pub fn forecasts(&self) -> &ForecastService<P> {
        &self.forecasts
    }

    pub async fn plan(
        &self,
        user_id: &str,
        skill_level: Option<SkillLevel>,
        beach_id: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionPlan> {
        let beach = self
            .catalog
            .get(beach_id)
            .with_context(|| format!("unknown beach id {beach_id}"))?
            .clone();

        // A missing forecast downgrades the ranking, it never blocks it.
        let forecast = match self.forecasts.current(&beach, now).await {
            Ok(fetched) => Some(fetched),
            Err(err) => {
                tracing::warn!(
                    beach_id = %beach.id,
                    error = %err,
                    "no forecast available; ranking without conditions"
                );
                None
            }
        };

        let candidates = self.sessions.upcoming_sessions(now).await?;
        let history = self.sessions.history_for(user_id, now).await?;
        let availability = self.availability.windows_for(user_id).await?;

        let context = RecommendationContext {
            user_id: user_id.to_string(),
            skill_level,
            current_suitability: forecast.as_ref().map(|f| f.snapshot.suitability),
            availability,
            history,
        };
        let recommendations = rank_sessions(&context, &candidates, now);

        tracing::info!(
            user_id = %context.user_id,
            beach_id = %beach.id,
            candidates = candidates.len(),
            recommendations = recommendations.len(),
            "built session plan"
        );

        Ok(SessionPlan {
            user_id: context.user_id,
            beach,
            generated_at: now,
            forecast,
            recommendations,
        })
    }
}
