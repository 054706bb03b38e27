use tauri::State;

use crate::models::{Customer, CustomerPatch, Gender, NewCustomer};
use crate::provider::AppState;

#[tauri::command]
pub async fn get_customers(
    state: State<'_, AppState>,
    search: Option<String>,
    gender: Option<Gender>,
    sort_by: Option<String>,
) -> Result<Vec<Customer>, String> {
    let providers = state.providers().await;
    let mut customers = providers.customers.list().await;

    if let Some(search) = search.filter(|s| !s.is_empty()) {
        let needle = search.to_lowercase();
        customers.retain(|c| c.name.to_lowercase().contains(&needle) || c.phone.contains(&needle));
    }
    if let Some(gender) = gender {
        customers.retain(|c| c.gender == gender);
    }

    match sort_by.as_deref() {
        Some("visits") => customers.sort_by(|a, b| b.visit_count.cmp(&a.visit_count)),
        Some("spent") => customers.sort_by(|a, b| {
            b.total_spent
                .partial_cmp(&a.total_spent)
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        _ => customers.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
    }

    Ok(customers)
}

#[tauri::command]
pub async fn add_customer(
    state: State<'_, AppState>,
    customer: NewCustomer,
) -> Result<Customer, String> {
    if customer.name.trim().is_empty() || customer.phone.trim().is_empty() {
        return Err("name and phone are required".to_string());
    }

    let providers = state.providers().await;
    Ok(providers.customers.add(customer).await)
}

#[tauri::command]
pub async fn update_customer(
    state: State<'_, AppState>,
    id: String,
    updates: CustomerPatch,
) -> Result<Customer, String> {
    let providers = state.providers().await;
    providers
        .customers
        .update(&id, updates)
        .await
        .ok_or_else(|| "customer not found".to_string())
}

#[tauri::command]
pub async fn delete_customer(state: State<'_, AppState>, id: String) -> Result<(), String> {
    let providers = state.providers().await;
    providers.customers.remove(&id).await;
    Ok(())
}
