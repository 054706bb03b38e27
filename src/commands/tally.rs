use tauri::State;

use crate::models::{NewTallyItem, PaymentMethod, PaymentStatus, TallyItem};
use crate::provider::AppState;

#[tauri::command]
pub async fn get_tally(
    state: State<'_, AppState>,
    date: Option<String>,
    status: Option<PaymentStatus>,
) -> Result<Vec<TallyItem>, String> {
    let providers = state.providers().await;
    let mut items = providers.tally.list().await;

    if let Some(date) = date {
        items.retain(|t| t.date == date);
    }
    if let Some(status) = status {
        items.retain(|t| t.payment_status == status);
    }

    Ok(items)
}

#[tauri::command]
pub async fn add_tally_item(
    state: State<'_, AppState>,
    item: NewTallyItem,
) -> Result<TallyItem, String> {
    let providers = state.providers().await;
    Ok(providers.tally.add(item).await)
}

/// Status transitions for the tally page: pending records move to
/// completed, failed, or cancelled; UPI completions attach a transaction id.
/// Settled records do not transition again.
#[tauri::command]
pub async fn update_payment_status(
    state: State<'_, AppState>,
    id: String,
    status: PaymentStatus,
    upi_transaction_id: Option<String>,
) -> Result<TallyItem, String> {
    let providers = state.providers().await;
    providers
        .tally
        .update_payment_status(&id, status, upi_transaction_id)
        .await
}

/// Payment flow for a scheduled appointment: marks it completed, writes the
/// snapshot ledger record, and bumps the customer's aggregates.
#[tauri::command]
pub async fn complete_payment(
    state: State<'_, AppState>,
    appointment_id: String,
    method: PaymentMethod,
    upi_transaction_id: Option<String>,
) -> Result<TallyItem, String> {
    let providers = state.providers().await;
    providers
        .complete_payment(&appointment_id, method, upi_transaction_id)
        .await
}
