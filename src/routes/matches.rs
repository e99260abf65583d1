use crate::core::{CandidateFilters, DiverseTeamOptions, MatchOptions, Matcher};
use crate::models::{
    DiverseTeamsRequest, ErrorResponse, FindMatchesRequest, HealthResponse, IndividualMatchRequest,
    IndividualMatchResponse, MatchStatus, MatchesResponse, ParticipantProfile, ProfileResponse,
    RecommendationsRequest, StatusUpdateRequest, TeamMatch,
};
use crate::services::{MatchRepository, ProfileStore, ProfileStoreError, RepositoryError};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<ProfileStore>,
    pub repository: Arc<dyn MatchRepository>,
    pub matcher: Matcher,
    /// Defaults for fields a request leaves out
    pub defaults: MatchOptions,
    pub match_ttl: chrono::Duration,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/profiles", web::post().to(upsert_profile))
        .route("/matches", web::get().to(list_matches))
        .route("/matches/find", web::post().to(find_matches))
        .route("/matches/recommendations", web::post().to(recommendations))
        .route("/matches/diverse", web::post().to(diverse_teams))
        .route("/matches/individual", web::post().to(individual_match))
        .route("/matches/{id}/accept", web::post().to(accept_match))
        .route("/matches/{id}/reject", web::post().to(reject_match));
}

fn error_response(status: actix_web::http::StatusCode, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    tracing::info!("Validation failed: field_errors={:?}", errors);
    error_response(
        actix_web::http::StatusCode::BAD_REQUEST,
        "Validation failed",
        errors.to_string(),
    )
}

fn repository_failure(err: RepositoryError) -> HttpResponse {
    use actix_web::http::StatusCode;

    let (status, error) = match &err {
        RepositoryError::NotFound(_) => (StatusCode::NOT_FOUND, "Match not found"),
        RepositoryError::Conflict(_) => (StatusCode::CONFLICT, "Match conflict"),
        RepositoryError::InvalidState(_) => (StatusCode::CONFLICT, "Invalid match state"),
        RepositoryError::Unavailable(_) => {
            tracing::error!("Match repository failure: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "Repository unavailable")
        }
    };
    error_response(status, error, err.to_string())
}

/// Persist freshly generated matches; failures are logged, not fatal
fn persist(repository: &dyn MatchRepository, matches: Vec<TeamMatch>) -> MatchesResponse {
    let records = matches
        .into_iter()
        .filter_map(|m| match repository.save(m) {
            Ok(saved) => Some(saved.to_record()),
            Err(e) => {
                tracing::warn!("Failed to save match: {}", e);
                None
            }
        })
        .collect();
    MatchesResponse::new(records)
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        profiles: state.profiles.len().await,
        timestamp: chrono::Utc::now(),
    })
}

/// Insert or replace a participant profile
///
/// POST /api/v1/profiles
async fn upsert_profile(
    state: web::Data<AppState>,
    req: web::Json<ParticipantProfile>,
) -> impl Responder {
    let profile = req.into_inner();
    let email = profile.key();

    match state.profiles.upsert(profile).await {
        Ok(created) => {
            let body = ProfileResponse { email, created };
            if created {
                HttpResponse::Created().json(body)
            } else {
                HttpResponse::Ok().json(body)
            }
        }
        Err(e @ ProfileStoreError::InvalidProfile(_)) => error_response(
            actix_web::http::StatusCode::BAD_REQUEST,
            "Invalid profile",
            e.to_string(),
        ),
        Err(e) => error_response(
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to store profile",
            e.to_string(),
        ),
    }
}

/// Find teams for a participant
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "email": "string",
///   "teamSize": 4,
///   "minMatchScore": 0.6,
///   "maxResults": 10,
///   "requiredSkills": ["string"],
///   "expertiseLevels": ["beginner"],
///   "excludeEmails": ["string"]
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let req = req.into_inner();
    let options = MatchOptions {
        team_size: req.team_size.unwrap_or(state.defaults.team_size),
        min_match_score: req.min_match_score.unwrap_or(state.defaults.min_match_score),
        max_results: req.max_results.unwrap_or(state.defaults.max_results),
        filters: CandidateFilters {
            required_skills: req.required_skills,
            expertise_levels: req.expertise_levels,
            exclude_emails: req.exclude_emails,
        },
    };

    tracing::info!(
        "Finding teams for {} (size {}, min score {:.2})",
        req.email,
        options.team_size,
        options.min_match_score
    );

    let snapshot = state.profiles.snapshot().await;
    let matches = state.matcher.find_matches(&req.email, &snapshot, &options);

    HttpResponse::Ok().json(persist(state.repository.as_ref(), matches))
}

/// Pool-wide recommendations
///
/// POST /api/v1/matches/recommendations
async fn recommendations(
    state: web::Data<AppState>,
    req: web::Json<RecommendationsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let team_size = req.team_size.unwrap_or(state.defaults.team_size);
    let snapshot = state.profiles.snapshot().await;
    let matches = state
        .matcher
        .generate_team_recommendations(&snapshot, team_size);

    let records = matches.iter().map(TeamMatch::to_record).collect();
    HttpResponse::Ok().json(MatchesResponse::new(records))
}

/// Demographic-aware diverse teams
///
/// POST /api/v1/matches/diverse
async fn diverse_teams(
    state: web::Data<AppState>,
    req: web::Json<DiverseTeamsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let options = DiverseTeamOptions {
        team_size: req.team_size.unwrap_or(state.defaults.team_size),
        max_teams: req.max_teams,
    };

    let snapshot = state.profiles.snapshot().await;
    let matches = state.matcher.find_diverse_teams(&snapshot, &options);

    HttpResponse::Ok().json(persist(state.repository.as_ref(), matches))
}

/// Score two participants against each other
///
/// POST /api/v1/matches/individual
async fn individual_match(
    state: web::Data<AppState>,
    req: web::Json<IndividualMatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let (a, b) = match (
        state.profiles.get(&req.email_a).await,
        state.profiles.get(&req.email_b).await,
    ) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            return error_response(
                actix_web::http::StatusCode::NOT_FOUND,
                "Participant not found",
                "both participants must have a profile".to_string(),
            );
        }
    };

    HttpResponse::Ok().json(IndividualMatchResponse {
        email_a: a.key(),
        email_b: b.key(),
        match_score: state.matcher.calculate_individual_match(&a, &b),
    })
}

/// Matches a participant belongs to
///
/// GET /api/v1/matches?email={email}
async fn list_matches(
    state: web::Data<AppState>,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> impl Responder {
    let email = match query.get("email") {
        Some(email) => email,
        None => {
            return error_response(
                actix_web::http::StatusCode::BAD_REQUEST,
                "Missing email parameter",
                "email query parameter is required".to_string(),
            );
        }
    };

    if let Err(e) = state
        .repository
        .expire_stale(chrono::Utc::now(), state.match_ttl)
    {
        tracing::warn!("Failed to expire stale matches: {}", e);
    }

    match state.repository.find_by_participant(email) {
        Ok(matches) => {
            let records = matches.iter().map(TeamMatch::to_record).collect();
            HttpResponse::Ok().json(MatchesResponse::new(records))
        }
        Err(e) => repository_failure(e),
    }
}

async fn accept_match(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<StatusUpdateRequest>,
) -> impl Responder {
    update_status(state, path.into_inner(), req, MatchStatus::Accepted).await
}

async fn reject_match(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<StatusUpdateRequest>,
) -> impl Responder {
    update_status(state, path.into_inner(), req, MatchStatus::Rejected).await
}

async fn update_status(
    state: web::Data<AppState>,
    id: String,
    req: web::Json<StatusUpdateRequest>,
    status: MatchStatus,
) -> HttpResponse {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    match state.repository.update_status(&id, status, &req.email) {
        Ok(updated) => HttpResponse::Ok().json(updated.to_record()),
        Err(e) => {
            tracing::warn!("Rejected {} of match {} by {}: {}", status, id, req.email, e);
            repository_failure(e)
        }
    }
}
