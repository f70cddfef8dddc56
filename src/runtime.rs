use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::clients::supabase_client::SupabaseClient;
use crate::config::Settings;
use crate::error::{AppError, Result};
use crate::handlers::api::{ApiContext, routes};
use crate::service::auth_service::logged_in_user;
use crate::service::calendar_service::CalendarService;

/// Serves the calendar as JSON for the remembered user.
pub async fn run_api(settings: Settings) -> Result<()> {
    let username = logged_in_user(&settings.login_file, Utc::now()).ok_or_else(|| {
        AppError::Config("No recent login; run the `login` command first".to_string())
    })?;

    let ctx = Arc::new(ApiContext {
        service: CalendarService::new(SupabaseClient::new(settings.supabase.clone())),
        username,
        timezone: settings.timezone,
    });

    info!("Serving calendar API on port {}", settings.api_port);
    warp::serve(routes(ctx))
        .run(([127, 0, 0, 1], settings.api_port))
        .await;
    Ok(())
}
