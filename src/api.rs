use std::time::Duration;

use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::models::{
    Appointment, AppointmentStatus, Customer, Employee, Gender, PaymentMethod, PaymentStatus,
    Service, ServiceLine, TallyItem, WorkingHours,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// How long the availability probe waits before declaring the backend
/// unreachable.
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {0}")]
    Status(reqwest::StatusCode),
}

/// Thin client for the remote salon service. One attempt per call, no
/// retries; callers fall back to the local store on failure.
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    pub fn new(base: impl Into<String>) -> Self {
        ApiClient {
            http: reqwest::Client::new(),
            base: base.into(),
        }
    }

    pub fn from_env() -> Self {
        let base = std::env::var("SALON_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Backend availability probe: one lightweight HEAD request against the
    /// customers resource, bounded by a short timeout. Returns false on any
    /// error or timeout; never fails. The result selects the session's
    /// persistence mode.
    pub async fn probe(&self) -> bool {
        let result = self
            .http
            .head(self.url("/customers"))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => {
                info!("backend reachable at {}", self.base);
                true
            }
            Ok(resp) => {
                warn!("backend probe got {}, using local store", resp.status());
                false
            }
            Err(e) => {
                warn!("backend unreachable ({}), using local store", e);
                false
            }
        }
    }

    async fn recv_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let resp = req.send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status()));
        }
        Ok(resp.json().await?)
    }

    async fn recv_ok(&self, req: reqwest::RequestBuilder) -> Result<(), ApiError> {
        let resp = req.send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status()));
        }
        Ok(())
    }

    // ----- customers -----

    pub async fn list_customers(&self) -> Result<Vec<Customer>, ApiError> {
        let remote: Vec<RemoteCustomer> = self.recv_json(self.http.get(self.url("/customers"))).await?;
        Ok(remote.into_iter().map(Customer::from).collect())
    }

    pub async fn create_customer(&self, customer: &Customer) -> Result<Customer, ApiError> {
        let remote: RemoteCustomer = self
            .recv_json(
                self.http
                    .post(self.url("/customers"))
                    .json(&customer_body(customer)),
            )
            .await?;
        Ok(remote.into())
    }

    pub async fn update_customer(&self, customer: &Customer) -> Result<(), ApiError> {
        self.recv_ok(
            self.http
                .put(self.url(&format!("/customers/{}", customer.id)))
                .json(&customer_body(customer)),
        )
        .await
    }

    pub async fn delete_customer(&self, id: &str) -> Result<(), ApiError> {
        self.recv_ok(self.http.delete(self.url(&format!("/customers/{}", id))))
            .await
    }

    // ----- employees -----

    pub async fn list_employees(&self) -> Result<Vec<Employee>, ApiError> {
        let remote: Vec<RemoteEmployee> = self.recv_json(self.http.get(self.url("/employees"))).await?;
        Ok(remote.into_iter().map(Employee::from).collect())
    }

    pub async fn create_employee(&self, employee: &Employee) -> Result<Employee, ApiError> {
        let remote: RemoteEmployee = self
            .recv_json(
                self.http
                    .post(self.url("/employees"))
                    .json(&employee_body(employee)),
            )
            .await?;
        Ok(remote.into())
    }

    pub async fn update_employee(&self, employee: &Employee) -> Result<(), ApiError> {
        self.recv_ok(
            self.http
                .put(self.url(&format!("/employees/{}", employee.id)))
                .json(&employee_body(employee)),
        )
        .await
    }

    pub async fn set_employee_availability(
        &self,
        id: &str,
        available: bool,
    ) -> Result<(), ApiError> {
        self.recv_ok(
            self.http
                .patch(self.url(&format!("/employees/{}/availability", id)))
                .query(&[("available", available)]),
        )
        .await
    }

    pub async fn delete_employee(&self, id: &str) -> Result<(), ApiError> {
        self.recv_ok(self.http.delete(self.url(&format!("/employees/{}", id))))
            .await
    }

    // ----- services -----

    pub async fn list_services(&self) -> Result<Vec<Service>, ApiError> {
        let remote: Vec<RemoteService> = self.recv_json(self.http.get(self.url("/services"))).await?;
        Ok(remote.into_iter().map(Service::from).collect())
    }

    pub async fn create_service(&self, service: &Service) -> Result<Service, ApiError> {
        let remote: RemoteService = self
            .recv_json(
                self.http
                    .post(self.url("/services"))
                    .json(&service_body(service)),
            )
            .await?;
        Ok(remote.into())
    }

    pub async fn update_service(&self, service: &Service) -> Result<(), ApiError> {
        self.recv_ok(
            self.http
                .put(self.url(&format!("/services/{}", service.id)))
                .json(&service_body(service)),
        )
        .await
    }

    pub async fn delete_service(&self, id: &str) -> Result<(), ApiError> {
        self.recv_ok(self.http.delete(self.url(&format!("/services/{}", id))))
            .await
    }

    // ----- appointments -----

    pub async fn list_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        let remote: Vec<RemoteAppointment> = self
            .recv_json(self.http.get(self.url("/appointments")))
            .await?;
        Ok(remote.into_iter().map(Appointment::from).collect())
    }

    pub async fn create_appointment(
        &self,
        appointment: &Appointment,
    ) -> Result<Appointment, ApiError> {
        // Foreign keys go up as nested {id} objects, per the server's
        // relational model.
        let body = json!({
            "customer": { "id": id_value(&appointment.customer_id) },
            "employee": { "id": id_value(&appointment.employee_id) },
            "services": appointment
                .service_ids
                .iter()
                .map(|id| json!({ "id": id_value(id) }))
                .collect::<Vec<_>>(),
            "appointmentDate": appointment.date,
            "appointmentTime": appointment.time,
            "status": appointment.status.as_server(),
            "total": appointment.total,
            "notes": appointment.notes,
        });
        let remote: RemoteAppointment = self
            .recv_json(self.http.post(self.url("/appointments")).json(&body))
            .await?;
        Ok(remote.into())
    }

    pub async fn update_appointment_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> Result<(), ApiError> {
        self.recv_ok(
            self.http
                .patch(self.url(&format!("/appointments/{}/status", id)))
                .query(&[("status", status.as_server())]),
        )
        .await
    }

    pub async fn check_availability(
        &self,
        employee_id: &str,
        date: &str,
        time: &str,
    ) -> Result<bool, ApiError> {
        self.recv_json(
            self.http
                .get(self.url("/appointments/availability"))
                .query(&[("employeeId", employee_id), ("date", date), ("time", time)]),
        )
        .await
    }

    // ----- tally -----

    pub async fn list_tally(&self) -> Result<Vec<TallyItem>, ApiError> {
        let remote: Vec<RemoteTally> = self.recv_json(self.http.get(self.url("/tally"))).await?;
        Ok(remote.into_iter().map(TallyItem::from).collect())
    }

    pub async fn create_tally(&self, item: &TallyItem) -> Result<TallyItem, ApiError> {
        let body = json!({
            "date": item.date,
            "time": item.time,
            "customerName": item.customer_name,
            "customerPhone": item.customer_phone,
            "staffName": item.staff_name,
            "servicesJson": serde_json::to_string(&item.services).unwrap_or_else(|_| "[]".into()),
            "totalCost": item.total_cost,
            "paymentMethod": item.payment_method.as_server(),
            "paymentStatus": item.payment_status.as_server(),
            "paymentDate": item.payment_date,
        });
        let remote: RemoteTally = self
            .recv_json(self.http.post(self.url("/tally")).json(&body))
            .await?;
        Ok(remote.into())
    }

    pub async fn update_payment_status(
        &self,
        id: &str,
        status: PaymentStatus,
        upi_transaction_id: Option<&str>,
    ) -> Result<(), ApiError> {
        let mut query = vec![("status", status.as_server().to_string())];
        if let Some(txn) = upi_transaction_id {
            query.push(("upiTransactionId", txn.to_string()));
        }
        self.recv_ok(
            self.http
                .patch(self.url(&format!("/tally/{}/payment-status", id)))
                .query(&query),
        )
        .await
    }

    pub async fn revenue(&self, date: &str) -> Result<f64, ApiError> {
        let revenue: Option<f64> = self
            .recv_json(
                self.http
                    .get(self.url("/tally/revenue"))
                    .query(&[("date", date)]),
            )
            .await?;
        Ok(revenue.unwrap_or(0.0))
    }
}

/// Server ids are numeric; ours are strings. Send numbers through where the
/// id parses, otherwise pass the string as-is.
fn id_value(id: &str) -> Value {
    match id.parse::<i64>() {
        Ok(n) => json!(n),
        Err(_) => json!(id),
    }
}

fn customer_body(customer: &Customer) -> Value {
    json!({
        "name": customer.name,
        "phone": customer.phone,
        "email": customer.email,
        "gender": customer.gender.as_server(),
        "visitCount": customer.visit_count,
        "totalSpent": customer.total_spent,
        "lastVisit": customer.last_visit,
        "preferredServices": customer.preferred_services,
        "notes": customer.notes,
        "photo": customer.photo,
    })
}

fn employee_body(employee: &Employee) -> Value {
    json!({
        "name": employee.name,
        "role": employee.role,
        "photo": employee.photo,
        "available": employee.available,
        "specialties": employee.specialties,
        "rating": employee.rating,
        "nextAvailable": employee.next_available,
        "workStartTime": employee.working_hours.as_ref().map(|h| h.start.clone()),
        "workEndTime": employee.working_hours.as_ref().map(|h| h.end.clone()),
    })
}

fn service_body(service: &Service) -> Value {
    json!({
        "name": service.name,
        "duration": service.duration,
        "price": service.price,
        "category": service.category,
        "description": service.description,
    })
}

// Wire shapes as the remote service sends them: numeric ids, upper-cased
// enums (handled by serde aliases), relational nesting for appointments.

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteCustomer {
    id: i64,
    name: String,
    phone: String,
    #[serde(default)]
    email: Option<String>,
    gender: Gender,
    #[serde(default)]
    visit_count: u32,
    #[serde(default)]
    total_spent: f64,
    #[serde(default)]
    last_visit: Option<String>,
    #[serde(default)]
    preferred_services: Option<Vec<String>>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    photo: Option<String>,
}

impl From<RemoteCustomer> for Customer {
    fn from(r: RemoteCustomer) -> Self {
        Customer {
            id: r.id.to_string(),
            name: r.name,
            phone: r.phone,
            email: r.email.unwrap_or_default(),
            gender: r.gender,
            visit_count: r.visit_count,
            total_spent: r.total_spent,
            last_visit: r
                .last_visit
                .unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
            preferred_services: r.preferred_services.unwrap_or_default(),
            notes: r.notes.unwrap_or_default(),
            photo: r.photo.unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteEmployee {
    id: i64,
    name: String,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    photo: Option<String>,
    #[serde(default)]
    available: Option<bool>,
    #[serde(default)]
    specialties: Option<Vec<String>>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    next_available: Option<String>,
    #[serde(default)]
    work_start_time: Option<String>,
    #[serde(default)]
    work_end_time: Option<String>,
}

impl From<RemoteEmployee> for Employee {
    fn from(r: RemoteEmployee) -> Self {
        let working_hours = match (r.work_start_time, r.work_end_time) {
            (Some(start), Some(end)) => Some(WorkingHours { start, end }),
            _ => None,
        };
        Employee {
            id: r.id.to_string(),
            name: r.name,
            role: r.role.unwrap_or_default(),
            photo: r.photo.unwrap_or_default(),
            available: r.available.unwrap_or(true),
            specialties: r.specialties.unwrap_or_default(),
            rating: r.rating,
            next_available: r.next_available,
            working_hours,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteService {
    id: i64,
    name: String,
    duration: u32,
    price: f64,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl From<RemoteService> for Service {
    fn from(r: RemoteService) -> Self {
        Service {
            id: r.id.to_string(),
            name: r.name,
            duration: r.duration,
            price: r.price,
            category: r.category.unwrap_or_default(),
            description: r.description.unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
struct RemoteRef {
    id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteAppointment {
    id: i64,
    customer: RemoteRef,
    employee: RemoteRef,
    #[serde(default)]
    services: Vec<RemoteRef>,
    appointment_date: String,
    appointment_time: String,
    status: AppointmentStatus,
    #[serde(default)]
    total: f64,
    #[serde(default)]
    notes: Option<String>,
}

impl From<RemoteAppointment> for Appointment {
    fn from(r: RemoteAppointment) -> Self {
        Appointment {
            id: r.id.to_string(),
            customer_id: r.customer.id.to_string(),
            employee_id: r.employee.id.to_string(),
            service_ids: r.services.iter().map(|s| s.id.to_string()).collect(),
            date: r.appointment_date,
            time: r.appointment_time,
            status: r.status,
            total: r.total,
            notes: r.notes.unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteTally {
    id: i64,
    date: String,
    time: String,
    #[serde(default)]
    customer_name: String,
    #[serde(default)]
    customer_phone: String,
    #[serde(default)]
    staff_name: String,
    #[serde(default)]
    services_json: Option<String>,
    #[serde(default)]
    total_cost: f64,
    payment_method: PaymentMethod,
    payment_status: PaymentStatus,
    #[serde(default)]
    payment_date: Option<String>,
    #[serde(default)]
    upi_transaction_id: Option<String>,
}

impl From<RemoteTally> for TallyItem {
    fn from(r: RemoteTally) -> Self {
        let services: Vec<ServiceLine> = r
            .services_json
            .as_deref()
            .and_then(|json| serde_json::from_str(json).ok())
            .unwrap_or_default();
        TallyItem {
            id: r.id.to_string(),
            date: r.date,
            time: r.time,
            customer_name: r.customer_name,
            customer_phone: r.customer_phone,
            staff_name: r.staff_name,
            services,
            total_cost: r.total_cost,
            payment_method: r.payment_method,
            payment_status: r.payment_status,
            payment_date: r
                .payment_date
                .unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
            upi_transaction_id: r.upi_transaction_id,
        }
    }
}
