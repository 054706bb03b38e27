//! Pure slot-occupancy and time helpers for the booking and schedule views.
//! No persistence here; everything operates on the collections the state
//! providers hold in memory.

use crate::models::{Appointment, AppointmentStatus, Employee, Service};

/// The bookable hourly slots shown by the schedule grid, 9 AM through 11 PM.
pub const DAY_SLOTS: [&str; 15] = [
    "9:00 AM", "10:00 AM", "11:00 AM", "12:00 PM", "1:00 PM", "2:00 PM", "3:00 PM", "4:00 PM",
    "5:00 PM", "6:00 PM", "7:00 PM", "8:00 PM", "9:00 PM", "10:00 PM", "11:00 PM",
];

/// Canonical 12-hour `h:mm AM/PM` form of a time string. Input already in
/// 12-hour form is returned with the meridiem upper-cased; otherwise a
/// 24-hour `HH:mm` (or `HH:mm:ss`) value is converted. Unparseable input
/// is returned as-is.
///
/// Stored appointment times and candidate slot times are both run through
/// this before any equality comparison; the two textual forms are never
/// compared raw.
pub fn normalize_time(raw: &str) -> String {
    // Meridiem detection is case-insensitive; "9:00 am" and "9:00 AM" are
    // the same slot.
    let upper = raw.to_ascii_uppercase();
    if upper.contains("AM") || upper.contains("PM") {
        return upper;
    }

    let mut parts = raw.split(':');
    let hour: u32 = match parts.next().and_then(|h| h.trim().parse().ok()) {
        Some(h) if h < 24 => h,
        _ => return raw.to_string(),
    };
    let minute: u32 = match parts.next().and_then(|m| m.trim().parse().ok()) {
        Some(m) if m < 60 => m,
        _ => return raw.to_string(),
    };

    let period = if hour >= 12 { "PM" } else { "AM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", display, minute, period)
}

/// Whether `employee_id` can take a booking at `slot` on `date`.
///
/// False when the employee's `available` flag is off (the global override:
/// a busy employee is fully booked regardless of appointment data), when the
/// employee is unknown, or when a non-cancelled appointment already occupies
/// the normalized slot.
pub fn is_employee_available(
    employee_id: &str,
    date: &str,
    slot: &str,
    appointments: &[Appointment],
    employees: &[Employee],
) -> bool {
    let Some(employee) = employees.iter().find(|e| e.id == employee_id) else {
        return false;
    };
    if !employee.available {
        return false;
    }

    let slot = normalize_time(slot);
    !appointments.iter().any(|apt| {
        apt.employee_id == employee_id
            && apt.date == date
            && apt.status != AppointmentStatus::Cancelled
            && normalize_time(&apt.time) == slot
    })
}

fn status_rank(status: AppointmentStatus) -> u8 {
    match status {
        AppointmentStatus::Scheduled => 0,
        AppointmentStatus::Completed => 1,
        AppointmentStatus::Cancelled => 2,
    }
}

/// Display ordering for appointment lists: still-scheduled first, completed
/// next, cancelled last; within a status group, ascending lexical order of
/// the normalized time string. Stable, and purely cosmetic: booking
/// eligibility never looks at this.
pub fn sort_appointments_for_display(mut appointments: Vec<Appointment>) -> Vec<Appointment> {
    appointments.sort_by(|a, b| {
        status_rank(a.status)
            .cmp(&status_rank(b.status))
            .then_with(|| normalize_time(&a.time).cmp(&normalize_time(&b.time)))
    });
    appointments
}

/// Sum of current catalogue prices for the selected services. Captured into
/// the appointment at booking time and never recomputed afterwards.
pub fn booking_total(service_ids: &[String], services: &[Service]) -> f64 {
    service_ids
        .iter()
        .filter_map(|id| services.iter().find(|s| &s.id == id))
        .map(|s| s.price)
        .sum()
}
