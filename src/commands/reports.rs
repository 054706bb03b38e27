use tauri::State;

use crate::models::DaySummary;
use crate::provider::AppState;

#[tauri::command]
pub async fn get_revenue_for_date(
    state: State<'_, AppState>,
    date: String,
) -> Result<f64, String> {
    let providers = state.providers().await;
    Ok(providers.revenue_for_date(&date).await)
}

/// Rollup feeding the dashboard cards and the export tab.
#[tauri::command]
pub async fn get_day_summary(
    state: State<'_, AppState>,
    date: String,
) -> Result<DaySummary, String> {
    let providers = state.providers().await;
    Ok(providers.day_summary(&date).await)
}

/// Which backend this session persists through ("remote" or "local"),
/// shown as a status badge in the UI.
#[tauri::command]
pub async fn get_backend_mode(state: State<'_, AppState>) -> Result<String, String> {
    let providers = state.providers().await;
    Ok(providers.mode.label().to_string())
}
