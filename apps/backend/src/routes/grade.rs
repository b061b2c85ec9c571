use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::judge::{output, prompt};
use crate::middleware::GradeSummary;
use crate::piles;
use crate::state::AppState;

/// `POST /grade`: judge one finished round.
async fn grade(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: ValidatedJson<Value>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    debug!(body = %body, "grade request received");

    let entries = piles::extract_piles(&body)?;
    let six = piles::canonical_piles(&entries);
    let mut summary = GradeSummary {
        items: six.iter().map(|pile| pile.items.len()).sum(),
        winner: None,
    };
    req.extensions_mut().insert(summary);
    let prompt = prompt::build_prompt(&six)
        .map_err(|e| AppError::internal(format!("failed to build judge prompt: {e}")))?;

    let text = state.judge.judge(&prompt).await?;
    let result = output::parse_judgment(&text)?;
    summary.winner = Some(result.winner.as_str());
    req.extensions_mut().insert(summary);

    info!(
        winner = %result.winner,
        score_a = result.score_a,
        score_b = result.score_b,
        "round judged"
    );
    Ok(HttpResponse::Ok().json(result))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/grade", web::post().to(grade));
}
