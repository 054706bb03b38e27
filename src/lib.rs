mod api;
mod commands;
mod dao;
mod models;
mod provider;
mod schedule;
mod seed;
mod store;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use commands::{booking, catalog, customers, reports, staff, tally};
use provider::AppState;
use store::Store;
use tauri::Manager;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_fs::init())
        .setup(|app| {
            let store = Arc::new(Store::new(app.handle()).expect("failed to open local store"));
            // The backend probe and initial load run lazily on the first
            // command, so startup never waits on the network.
            app.manage(AppState::new(store));
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Customers
            customers::get_customers,
            customers::add_customer,
            customers::update_customer,
            customers::delete_customer,
            // Staff
            staff::get_staff,
            staff::get_available_staff_count,
            staff::add_employee,
            staff::update_employee,
            staff::set_employee_availability,
            staff::remove_employee,
            // Services and products
            catalog::get_services,
            catalog::add_service,
            catalog::update_service,
            catalog::delete_service,
            catalog::get_products,
            catalog::add_product,
            catalog::update_product,
            catalog::delete_product,
            // Booking and schedule
            booking::get_appointments,
            booking::get_day_slots,
            booking::check_slot_availability,
            booking::book_appointment,
            booking::cancel_appointment,
            // Tally
            tally::get_tally,
            tally::add_tally_item,
            tally::update_payment_status,
            tally::complete_payment,
            // Reports
            reports::get_revenue_for_date,
            reports::get_day_summary,
            reports::get_backend_mode,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
