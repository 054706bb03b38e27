use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[serde(alias = "MALE")]
    Male,
    #[serde(alias = "FEMALE")]
    Female,
}

impl Gender {
    /// Upper-case form used by the remote API.
    pub fn as_server(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[serde(alias = "SCHEDULED")]
    Scheduled,
    #[serde(alias = "COMPLETED")]
    Completed,
    #[serde(alias = "CANCELLED")]
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_server(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "SCHEDULED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[serde(alias = "CASH")]
    Cash,
    #[serde(alias = "CARD")]
    Card,
    #[serde(alias = "UPI")]
    Upi,
}

impl PaymentMethod {
    pub fn as_server(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Card => "CARD",
            PaymentMethod::Upi => "UPI",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[serde(alias = "PENDING")]
    Pending,
    #[serde(alias = "COMPLETED")]
    Completed,
    #[serde(alias = "FAILED")]
    Failed,
    #[serde(alias = "CANCELLED")]
    Cancelled,
}

impl PaymentStatus {
    pub fn as_server(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Completed => "COMPLETED",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub gender: Gender,
    // Aggregates maintained by payment completion, never edited directly.
    pub visit_count: u32,
    pub total_spent: f64,
    pub last_visit: String,
    #[serde(default)]
    pub preferred_services: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub photo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub gender: Gender,
    #[serde(default)]
    pub preferred_services: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub photo: String,
}

impl Customer {
    pub fn create(new: NewCustomer) -> Self {
        Customer {
            id: format!("cust-{}", Uuid::new_v4()),
            name: new.name,
            phone: new.phone,
            email: new.email,
            gender: new.gender,
            visit_count: 0,
            total_spent: 0.0,
            last_visit: Utc::now().to_rfc3339(),
            preferred_services: new.preferred_services,
            notes: new.notes,
            photo: new.photo,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub visit_count: Option<u32>,
    pub total_spent: Option<f64>,
    pub last_visit: Option<String>,
    pub preferred_services: Option<Vec<String>>,
    pub notes: Option<String>,
    pub photo: Option<String>,
}

impl CustomerPatch {
    pub fn apply(self, customer: &mut Customer) {
        if let Some(name) = self.name {
            customer.name = name;
        }
        if let Some(phone) = self.phone {
            customer.phone = phone;
        }
        if let Some(email) = self.email {
            customer.email = email;
        }
        if let Some(gender) = self.gender {
            customer.gender = gender;
        }
        if let Some(visit_count) = self.visit_count {
            customer.visit_count = visit_count;
        }
        if let Some(total_spent) = self.total_spent {
            customer.total_spent = total_spent;
        }
        if let Some(last_visit) = self.last_visit {
            customer.last_visit = last_visit;
        }
        if let Some(preferred_services) = self.preferred_services {
            customer.preferred_services = preferred_services;
        }
        if let Some(notes) = self.notes {
            customer.notes = notes;
        }
        if let Some(photo) = self.photo {
            customer.photo = photo;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingHours {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub photo: String,
    /// Single source of truth for bookability. When false the employee is
    /// treated as fully booked for every slot, regardless of appointments.
    pub available: bool,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_available: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_hours: Option<WorkingHours>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub photo: String,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub next_available: Option<String>,
    #[serde(default)]
    pub working_hours: Option<WorkingHours>,
}

fn default_true() -> bool {
    true
}

impl Employee {
    pub fn create(new: NewEmployee) -> Self {
        Employee {
            id: format!("emp-{}", Uuid::new_v4()),
            name: new.name,
            role: new.role,
            photo: new.photo,
            available: new.available,
            specialties: new.specialties,
            rating: new.rating,
            next_available: new.next_available,
            working_hours: new.working_hours,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub role: Option<String>,
    pub photo: Option<String>,
    pub available: Option<bool>,
    pub specialties: Option<Vec<String>>,
    pub rating: Option<f64>,
    pub next_available: Option<String>,
    pub working_hours: Option<WorkingHours>,
}

impl EmployeePatch {
    pub fn apply(self, employee: &mut Employee) {
        if let Some(name) = self.name {
            employee.name = name;
        }
        if let Some(role) = self.role {
            employee.role = role;
        }
        if let Some(photo) = self.photo {
            employee.photo = photo;
        }
        if let Some(available) = self.available {
            employee.available = available;
        }
        if let Some(specialties) = self.specialties {
            employee.specialties = specialties;
        }
        if let Some(rating) = self.rating {
            employee.rating = Some(rating);
        }
        if let Some(next_available) = self.next_available {
            employee.next_available = Some(next_available);
        }
        if let Some(working_hours) = self.working_hours {
            employee.working_hours = Some(working_hours);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    /// Duration in minutes.
    pub duration: u32,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewService {
    pub name: String,
    pub duration: u32,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub description: String,
}

impl Service {
    pub fn create(new: NewService) -> Self {
        Service {
            id: format!("svc-{}", Uuid::new_v4()),
            name: new.name,
            duration: new.duration,
            price: new.price,
            category: new.category,
            description: new.description,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePatch {
    pub name: Option<String>,
    pub duration: Option<u32>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl ServicePatch {
    pub fn apply(self, service: &mut Service) {
        if let Some(name) = self.name {
            service.name = name;
        }
        if let Some(duration) = self.duration {
            service.duration = duration;
        }
        if let Some(price) = self.price {
            service.price = price;
        }
        if let Some(category) = self.category {
            service.category = category;
        }
        if let Some(description) = self.description {
            service.description = description;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub customer_id: String,
    pub employee_id: String,
    pub service_ids: Vec<String>,
    /// Calendar date, `yyyy-MM-dd`.
    pub date: String,
    /// Time of day, either `HH:mm` or `h:mm AM/PM`. Never compared raw;
    /// all comparisons go through `schedule::normalize_time`.
    pub time: String,
    pub status: AppointmentStatus,
    /// Sum of service prices at booking time. Not recomputed if the
    /// catalogue changes later.
    pub total: f64,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub customer_id: String,
    pub employee_id: String,
    pub service_ids: Vec<String>,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub notes: String,
}

impl Appointment {
    pub fn create(new: NewAppointment, total: f64) -> Self {
        Appointment {
            id: format!("apt-{}", Uuid::new_v4()),
            customer_id: new.customer_id,
            employee_id: new.employee_id,
            service_ids: new.service_ids,
            date: new.date,
            time: new.time,
            status: AppointmentStatus::Scheduled,
            total,
            notes: new.notes,
        }
    }
}

/// `{name, price}` snapshot of a service line inside a tally record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLine {
    pub name: String,
    pub price: f64,
}

/// A payment-ledger record. Customer and staff fields are snapshots taken
/// at payment time on purpose: a historical record must not change if the
/// customer is later renamed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyItem {
    pub id: String,
    pub date: String,
    pub time: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub staff_name: String,
    pub services: Vec<ServiceLine>,
    pub total_cost: f64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub payment_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upi_transaction_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTallyItem {
    pub date: String,
    pub time: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub staff_name: String,
    pub services: Vec<ServiceLine>,
    pub total_cost: f64,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
}

impl TallyItem {
    pub fn create(new: NewTallyItem) -> Self {
        TallyItem {
            id: format!("tally-{}", Uuid::new_v4()),
            date: new.date,
            time: new.time,
            customer_name: new.customer_name,
            customer_phone: new.customer_phone,
            staff_name: new.staff_name,
            services: new.services,
            total_cost: new.total_cost,
            payment_method: new.payment_method,
            payment_status: new.payment_status.unwrap_or(PaymentStatus::Pending),
            payment_date: Utc::now().to_rfc3339(),
            upi_transaction_id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub image: String,
    pub category: String,
    pub stock: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub brand: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub image: String,
    pub category: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub brand: String,
}

impl Product {
    pub fn create(new: NewProduct) -> Self {
        Product {
            id: format!("prod-{}", Uuid::new_v4()),
            name: new.name,
            price: new.price,
            image: new.image,
            category: new.category,
            stock: new.stock,
            description: new.description,
            brand: new.brand,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub stock: Option<u32>,
    pub description: Option<String>,
    pub brand: Option<String>,
}

impl ProductPatch {
    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(image) = self.image {
            product.image = image;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(brand) = self.brand {
            product.brand = brand;
        }
    }
}

/// Rollup for the dashboard's selected date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: String,
    pub total_revenue: f64,
    pub completed_payments: u32,
    pub pending_payments: u32,
    pub scheduled_appointments: u32,
    pub completed_appointments: u32,
    pub cancelled_appointments: u32,
}

impl Entity for Customer {
    const STORE_KEY: &'static str = "salon_customers";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Employee {
    const STORE_KEY: &'static str = "salon_employees";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Service {
    const STORE_KEY: &'static str = "salon_services";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Appointment {
    const STORE_KEY: &'static str = "salon_appointments";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for TallyItem {
    const STORE_KEY: &'static str = "salon_tally";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Product {
    const STORE_KEY: &'static str = "salon_products";
    fn id(&self) -> &str {
        &self.id
    }
}
