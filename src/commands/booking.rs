use tauri::State;

use crate::models::{Appointment, AppointmentStatus, NewAppointment};
use crate::provider::AppState;
use crate::schedule;

/// Appointments for the schedule and dashboard views, optionally filtered
/// to one date, in display order (scheduled, completed, cancelled).
#[tauri::command]
pub async fn get_appointments(
    state: State<'_, AppState>,
    date: Option<String>,
) -> Result<Vec<Appointment>, String> {
    let providers = state.providers().await;
    let mut appointments = providers.appointments.list().await;

    if let Some(date) = date {
        appointments.retain(|a| a.date == date);
    }

    Ok(schedule::sort_appointments_for_display(appointments))
}

#[tauri::command]
pub fn get_day_slots() -> Vec<String> {
    schedule::DAY_SLOTS.iter().map(|s| s.to_string()).collect()
}

/// Slot check backing the schedule grid and the booking time selector.
#[tauri::command]
pub async fn check_slot_availability(
    state: State<'_, AppState>,
    employee_id: String,
    date: String,
    time: String,
) -> Result<bool, String> {
    let providers = state.providers().await;
    Ok(providers.slot_available(&employee_id, &date, &time).await)
}

#[tauri::command]
pub async fn book_appointment(
    state: State<'_, AppState>,
    appointment: NewAppointment,
) -> Result<Appointment, String> {
    let providers = state.providers().await;
    providers.book_appointment(appointment).await
}

/// Cancelling frees the slot immediately; cancelled appointments are
/// ignored by the availability check. Only scheduled appointments can be
/// cancelled; completed and cancelled ones are closed.
#[tauri::command]
pub async fn cancel_appointment(
    state: State<'_, AppState>,
    id: String,
) -> Result<Appointment, String> {
    let providers = state.providers().await;
    providers
        .appointments
        .update_status(&id, AppointmentStatus::Cancelled)
        .await
}
