use tauri::State;

use crate::models::{Employee, EmployeePatch, NewEmployee};
use crate::provider::AppState;

#[tauri::command]
pub async fn get_staff(state: State<'_, AppState>) -> Result<Vec<Employee>, String> {
    let providers = state.providers().await;
    Ok(providers.staff.list().await)
}

#[tauri::command]
pub async fn get_available_staff_count(state: State<'_, AppState>) -> Result<usize, String> {
    let providers = state.providers().await;
    Ok(providers.staff.available_count().await)
}

#[tauri::command]
pub async fn add_employee(
    state: State<'_, AppState>,
    employee: NewEmployee,
) -> Result<Employee, String> {
    if employee.name.trim().is_empty() || employee.role.trim().is_empty() {
        return Err("name and role are required".to_string());
    }

    let providers = state.providers().await;
    Ok(providers.staff.add(employee).await)
}

#[tauri::command]
pub async fn update_employee(
    state: State<'_, AppState>,
    id: String,
    updates: EmployeePatch,
) -> Result<Employee, String> {
    let providers = state.providers().await;
    providers
        .staff
        .update(&id, updates)
        .await
        .ok_or_else(|| "employee not found".to_string())
}

/// Toggles the availability flag that gates every slot for this employee.
#[tauri::command]
pub async fn set_employee_availability(
    state: State<'_, AppState>,
    id: String,
    available: bool,
) -> Result<Employee, String> {
    let providers = state.providers().await;
    providers
        .staff
        .set_availability(&id, available)
        .await
        .ok_or_else(|| "employee not found".to_string())
}

#[tauri::command]
pub async fn remove_employee(state: State<'_, AppState>, id: String) -> Result<(), String> {
    let providers = state.providers().await;
    providers.staff.remove(&id).await;
    Ok(())
}
