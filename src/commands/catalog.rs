use tauri::State;

use crate::models::{NewProduct, NewService, Product, ProductPatch, Service, ServicePatch};
use crate::provider::AppState;

#[tauri::command]
pub async fn get_services(state: State<'_, AppState>) -> Result<Vec<Service>, String> {
    let providers = state.providers().await;
    Ok(providers.services.list().await)
}

#[tauri::command]
pub async fn add_service(
    state: State<'_, AppState>,
    service: NewService,
) -> Result<Service, String> {
    if service.name.trim().is_empty() {
        return Err("service name is required".to_string());
    }
    if service.duration == 0 {
        return Err("duration must be positive".to_string());
    }

    let providers = state.providers().await;
    Ok(providers.services.add(service).await)
}

/// Price and duration edits affect future bookings only; existing
/// appointments keep the total captured at booking time.
#[tauri::command]
pub async fn update_service(
    state: State<'_, AppState>,
    id: String,
    updates: ServicePatch,
) -> Result<Service, String> {
    let providers = state.providers().await;
    providers
        .services
        .update(&id, updates)
        .await
        .ok_or_else(|| "service not found".to_string())
}

#[tauri::command]
pub async fn delete_service(state: State<'_, AppState>, id: String) -> Result<(), String> {
    let providers = state.providers().await;
    providers.services.remove(&id).await;
    Ok(())
}

#[tauri::command]
pub async fn get_products(state: State<'_, AppState>) -> Result<Vec<Product>, String> {
    let providers = state.providers().await;
    Ok(providers.products.list().await)
}

#[tauri::command]
pub async fn add_product(
    state: State<'_, AppState>,
    product: NewProduct,
) -> Result<Product, String> {
    if product.name.trim().is_empty() {
        return Err("product name is required".to_string());
    }

    let providers = state.providers().await;
    Ok(providers.products.add(product).await)
}

#[tauri::command]
pub async fn update_product(
    state: State<'_, AppState>,
    id: String,
    updates: ProductPatch,
) -> Result<Product, String> {
    let providers = state.providers().await;
    providers
        .products
        .update(&id, updates)
        .await
        .ok_or_else(|| "product not found".to_string())
}

#[tauri::command]
pub async fn delete_product(state: State<'_, AppState>, id: String) -> Result<(), String> {
    let providers = state.providers().await;
    providers.products.remove(&id).await;
    Ok(())
}
