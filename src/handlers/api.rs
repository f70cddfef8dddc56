use std::convert::Infallible;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use crate::clients::supabase_client::CalendarStore;
use crate::error::{AppError, Result as AppResult};
use crate::models::color::Rgba;
use crate::models::schedule::DAY_FORMAT;
use crate::service::calendar_service::{AppState, CalendarService};
use crate::service::grid::YearMonth;

pub struct ApiContext<S: CalendarStore> {
    pub service: CalendarService<S>,
    pub username: String,
    pub timezone: Tz,
}

impl<S: CalendarStore> ApiContext<S> {
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }

    /// Fresh state for one request; nothing is cached between requests.
    async fn load_state(&self, month: YearMonth) -> AppState {
        let mut state = AppState::new(&self.username, month);
        self.service.load_global_color(&mut state).await;
        self.service.refresh(&mut state).await;
        state
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SaveDayRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub color: Option<Rgba>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct GlobalColorRequest {
    pub color: Rgba,
}

pub fn routes<S: CalendarStore + 'static>(
    ctx: Arc<ApiContext<S>>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let grid = warp::path!("grid" / i32 / u32)
        .and(warp::get())
        .and(with_context(ctx.clone()))
        .and_then(grid_handler::<S>);
    let day = warp::path!("day" / String)
        .and(warp::get())
        .and(with_context(ctx.clone()))
        .and_then(day_handler::<S>);
    let save_day = warp::path!("day" / String)
        .and(warp::put())
        .and(warp::body::json::<SaveDayRequest>())
        .and(with_context(ctx.clone()))
        .and_then(save_day_handler::<S>);
    let global_color = warp::path!("color")
        .and(warp::put())
        .and(warp::body::json::<GlobalColorRequest>())
        .and(with_context(ctx))
        .and_then(global_color_handler::<S>);
    grid.or(day).or(save_day).or(global_color)
}

fn with_context<S: CalendarStore + 'static>(
    ctx: Arc<ApiContext<S>>,
) -> impl Filter<Extract = (Arc<ApiContext<S>>,), Error = Infallible> + Clone {
    warp::any().map(move || ctx.clone())
}

pub async fn grid_handler<S: CalendarStore>(
    year: i32,
    month: u32,
    ctx: Arc<ApiContext<S>>,
) -> Result<Response, Infallible> {
    let month = match parse_month(year, month) {
        Ok(month) => month,
        Err(err) => return Ok(bad_request(&err)),
    };
    let state = ctx.load_state(month).await;
    let grid = ctx.service.grid(&state, ctx.today());
    info!("Served grid {}-{:02} with {} cells", grid.year, grid.month, grid.cells.len());
    Ok(warp::reply::json(&grid).into_response())
}

pub async fn day_handler<S: CalendarStore>(
    day: String,
    ctx: Arc<ApiContext<S>>,
) -> Result<Response, Infallible> {
    let date = match parse_day(&day) {
        Ok(date) => date,
        Err(err) => return Ok(bad_request(&err)),
    };
    let state = ctx.load_state(YearMonth::from_date(date)).await;
    Ok(warp::reply::json(&ctx.service.day_detail(&state, date)).into_response())
}

pub async fn save_day_handler<S: CalendarStore>(
    day: String,
    body: SaveDayRequest,
    ctx: Arc<ApiContext<S>>,
) -> Result<Response, Infallible> {
    let date = match parse_day(&day) {
        Ok(date) => date,
        Err(err) => return Ok(bad_request(&err)),
    };
    let mut state = AppState::new(&ctx.username, YearMonth::from_date(date));
    let ok = ctx
        .service
        .save_day(&mut state, date, &body.text, body.color)
        .await;
    Ok(ok_reply(ok))
}

pub async fn global_color_handler<S: CalendarStore>(
    body: GlobalColorRequest,
    ctx: Arc<ApiContext<S>>,
) -> Result<Response, Infallible> {
    let mut state = AppState::new(&ctx.username, YearMonth::from_date(ctx.today()));
    let ok = ctx.service.set_global_color(&mut state, body.color).await;
    Ok(ok_reply(ok))
}

/// Path segment `YYYY-MM-DD` to a date; anything else is a client error.
pub fn parse_day(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, DAY_FORMAT)
        .map_err(|_| AppError::Validation(format!("invalid date {raw}")))
}

pub fn parse_month(year: i32, month: u32) -> AppResult<YearMonth> {
    YearMonth::new(year, month).map_err(|err| AppError::Validation(err.to_string()))
}

fn ok_reply(ok: bool) -> Response {
    let status = if ok {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };
    warp::reply::with_status(warp::reply::json(&json!({ "ok": ok })), status).into_response()
}

fn bad_request(err: &AppError) -> Response {
    warn!("Rejected request: {}", err);
    warp::reply::with_status(
        warp::reply::json(&json!({ "error": err.to_string() })),
        StatusCode::BAD_REQUEST,
    )
    .into_response()
}
