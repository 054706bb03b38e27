//! Per-entity state providers: in-memory collections backed by either the
//! remote API or the local store, selected once per session by the
//! availability probe.
//!
//! Every mutation takes the provider's state lock before touching the
//! persistence path and holds it until the in-memory update lands, so
//! updates apply strictly in call order even when remote and local paths
//! complete at different speeds. Remote failures fall back to the local DAO
//! once; the in-memory collection reflects a successful mutation exactly
//! once either way.

use std::sync::Arc;

use chrono::Utc;
use log::warn;
use tokio::sync::{Mutex, OnceCell};

use crate::api::ApiClient;
use crate::dao::Dao;
use crate::models::{
    Appointment, AppointmentStatus, Customer, CustomerPatch, Employee, EmployeePatch,
    NewAppointment, NewCustomer, NewEmployee, NewProduct, NewService, NewTallyItem, PaymentMethod,
    PaymentStatus, Product, ProductPatch, Service, ServiceLine, ServicePatch, TallyItem,
};
use crate::schedule;
use crate::seed;
use crate::store::Store;

/// Which backend the session persists through. Decided once by the probe
/// and threaded through provider construction, so tests can pin it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceMode {
    Remote,
    Local,
}

impl PersistenceMode {
    pub fn label(&self) -> &'static str {
        match self {
            PersistenceMode::Remote => "remote",
            PersistenceMode::Local => "local",
        }
    }
}

// ----- customers -----

pub struct CustomersProvider {
    mode: PersistenceMode,
    api: Arc<ApiClient>,
    dao: Dao<Customer>,
    state: Mutex<Vec<Customer>>,
}

impl CustomersProvider {
    fn new(mode: PersistenceMode, api: Arc<ApiClient>, store: Arc<Store>) -> Self {
        CustomersProvider {
            mode,
            api,
            dao: Dao::new(store),
            state: Mutex::new(Vec::new()),
        }
    }

    async fn load(&self) {
        let records = match self.mode {
            PersistenceMode::Remote => match self.api.list_customers().await {
                Ok(records) => records,
                Err(e) => {
                    warn!("remote customer load failed ({}), reading local store", e);
                    self.dao.get_all()
                }
            },
            PersistenceMode::Local => self.dao.get_all(),
        };
        *self.state.lock().await = records;
    }

    pub async fn list(&self) -> Vec<Customer> {
        self.state.lock().await.clone()
    }

    pub async fn add(&self, new: NewCustomer) -> Customer {
        let mut state = self.state.lock().await;
        let record = Customer::create(new);
        let record = match self.mode {
            PersistenceMode::Remote => match self.api.create_customer(&record).await {
                Ok(created) => created,
                Err(e) => {
                    warn!("remote customer create failed ({}), storing locally", e);
                    self.dao.insert(record)
                }
            },
            PersistenceMode::Local => self.dao.insert(record),
        };
        state.push(record.clone());
        record
    }

    pub async fn update(&self, id: &str, patch: CustomerPatch) -> Option<Customer> {
        let mut state = self.state.lock().await;
        let idx = state.iter().position(|c| c.id == id)?;
        let mut updated = state[idx].clone();
        patch.apply(&mut updated);

        match self.mode {
            PersistenceMode::Remote => {
                if let Err(e) = self.api.update_customer(&updated).await {
                    warn!("remote customer update failed ({}), storing locally", e);
                    self.dao.update(id, |c| *c = updated.clone());
                }
            }
            PersistenceMode::Local => {
                self.dao.update(id, |c| *c = updated.clone());
            }
        }

        state[idx] = updated.clone();
        Some(updated)
    }

    pub async fn remove(&self, id: &str) {
        let mut state = self.state.lock().await;
        match self.mode {
            PersistenceMode::Remote => {
                if let Err(e) = self.api.delete_customer(id).await {
                    warn!("remote customer delete failed ({}), deleting locally", e);
                    self.dao.delete(id);
                }
            }
            PersistenceMode::Local => self.dao.delete(id),
        }
        state.retain(|c| c.id != id);
    }
}

// ----- staff -----

pub struct StaffProvider {
    mode: PersistenceMode,
    api: Arc<ApiClient>,
    dao: Dao<Employee>,
    state: Mutex<Vec<Employee>>,
}

impl StaffProvider {
    fn new(mode: PersistenceMode, api: Arc<ApiClient>, store: Arc<Store>) -> Self {
        StaffProvider {
            mode,
            api,
            dao: Dao::new(store),
            state: Mutex::new(Vec::new()),
        }
    }

    async fn load(&self) {
        let records = match self.mode {
            PersistenceMode::Remote => match self.api.list_employees().await {
                Ok(records) => records,
                Err(e) => {
                    warn!("remote staff load failed ({}), reading local store", e);
                    self.dao.get_all()
                }
            },
            PersistenceMode::Local => self.dao.get_all(),
        };
        *self.state.lock().await = records;
    }

    pub async fn list(&self) -> Vec<Employee> {
        self.state.lock().await.clone()
    }

    pub async fn available_count(&self) -> usize {
        self.state.lock().await.iter().filter(|e| e.available).count()
    }

    pub async fn add(&self, new: NewEmployee) -> Employee {
        let mut state = self.state.lock().await;
        let record = Employee::create(new);
        let record = match self.mode {
            PersistenceMode::Remote => match self.api.create_employee(&record).await {
                Ok(created) => created,
                Err(e) => {
                    warn!("remote staff create failed ({}), storing locally", e);
                    self.dao.insert(record)
                }
            },
            PersistenceMode::Local => self.dao.insert(record),
        };
        state.push(record.clone());
        record
    }

    pub async fn update(&self, id: &str, patch: EmployeePatch) -> Option<Employee> {
        let mut state = self.state.lock().await;
        let idx = state.iter().position(|e| e.id == id)?;
        let mut updated = state[idx].clone();
        patch.apply(&mut updated);

        match self.mode {
            PersistenceMode::Remote => {
                if let Err(e) = self.api.update_employee(&updated).await {
                    warn!("remote staff update failed ({}), storing locally", e);
                    self.dao.update(id, |e| *e = updated.clone());
                }
            }
            PersistenceMode::Local => {
                self.dao.update(id, |e| *e = updated.clone());
            }
        }

        state[idx] = updated.clone();
        Some(updated)
    }

    pub async fn set_availability(&self, id: &str, available: bool) -> Option<Employee> {
        let mut state = self.state.lock().await;
        let idx = state.iter().position(|e| e.id == id)?;
        let mut updated = state[idx].clone();
        updated.available = available;

        match self.mode {
            PersistenceMode::Remote => {
                if let Err(e) = self.api.set_employee_availability(id, available).await {
                    warn!("remote availability toggle failed ({}), storing locally", e);
                    self.dao.update(id, |e| e.available = available);
                }
            }
            PersistenceMode::Local => {
                self.dao.update(id, |e| e.available = available);
            }
        }

        state[idx] = updated.clone();
        Some(updated)
    }

    pub async fn remove(&self, id: &str) {
        let mut state = self.state.lock().await;
        match self.mode {
            PersistenceMode::Remote => {
                if let Err(e) = self.api.delete_employee(id).await {
                    warn!("remote staff delete failed ({}), deleting locally", e);
                    self.dao.delete(id);
                }
            }
            PersistenceMode::Local => self.dao.delete(id),
        }
        state.retain(|e| e.id != id);
    }
}

// ----- services -----

pub struct ServicesProvider {
    mode: PersistenceMode,
    api: Arc<ApiClient>,
    dao: Dao<Service>,
    state: Mutex<Vec<Service>>,
}

impl ServicesProvider {
    fn new(mode: PersistenceMode, api: Arc<ApiClient>, store: Arc<Store>) -> Self {
        ServicesProvider {
            mode,
            api,
            dao: Dao::new(store),
            state: Mutex::new(Vec::new()),
        }
    }

    async fn load(&self) {
        let records = match self.mode {
            PersistenceMode::Remote => match self.api.list_services().await {
                Ok(records) => records,
                Err(e) => {
                    warn!("remote service load failed ({}), reading local store", e);
                    self.dao.get_all()
                }
            },
            PersistenceMode::Local => self.dao.get_all(),
        };
        *self.state.lock().await = records;
    }

    pub async fn list(&self) -> Vec<Service> {
        self.state.lock().await.clone()
    }

    pub async fn add(&self, new: NewService) -> Service {
        let mut state = self.state.lock().await;
        let record = Service::create(new);
        let record = match self.mode {
            PersistenceMode::Remote => match self.api.create_service(&record).await {
                Ok(created) => created,
                Err(e) => {
                    warn!("remote service create failed ({}), storing locally", e);
                    self.dao.insert(record)
                }
            },
            PersistenceMode::Local => self.dao.insert(record),
        };
        state.push(record.clone());
        record
    }

    pub async fn update(&self, id: &str, patch: ServicePatch) -> Option<Service> {
        let mut state = self.state.lock().await;
        let idx = state.iter().position(|s| s.id == id)?;
        let mut updated = state[idx].clone();
        patch.apply(&mut updated);

        match self.mode {
            PersistenceMode::Remote => {
                if let Err(e) = self.api.update_service(&updated).await {
                    warn!("remote service update failed ({}), storing locally", e);
                    self.dao.update(id, |s| *s = updated.clone());
                }
            }
            PersistenceMode::Local => {
                self.dao.update(id, |s| *s = updated.clone());
            }
        }

        state[idx] = updated.clone();
        Some(updated)
    }

    pub async fn remove(&self, id: &str) {
        let mut state = self.state.lock().await;
        match self.mode {
            PersistenceMode::Remote => {
                if let Err(e) = self.api.delete_service(id).await {
                    warn!("remote service delete failed ({}), deleting locally", e);
                    self.dao.delete(id);
                }
            }
            PersistenceMode::Local => self.dao.delete(id),
        }
        state.retain(|s| s.id != id);
    }
}

// ----- products -----

/// Products only exist in the store view; the remote system has no products
/// resource, so this provider always persists locally.
pub struct ProductsProvider {
    dao: Dao<Product>,
    state: Mutex<Vec<Product>>,
}

impl ProductsProvider {
    fn new(store: Arc<Store>) -> Self {
        ProductsProvider {
            dao: Dao::new(store),
            state: Mutex::new(Vec::new()),
        }
    }

    async fn load(&self) {
        *self.state.lock().await = self.dao.get_all();
    }

    pub async fn list(&self) -> Vec<Product> {
        self.state.lock().await.clone()
    }

    pub async fn add(&self, new: NewProduct) -> Product {
        let mut state = self.state.lock().await;
        let record = self.dao.insert(Product::create(new));
        state.push(record.clone());
        record
    }

    pub async fn update(&self, id: &str, patch: ProductPatch) -> Option<Product> {
        let mut state = self.state.lock().await;
        let idx = state.iter().position(|p| p.id == id)?;
        let mut updated = state[idx].clone();
        patch.apply(&mut updated);
        self.dao.update(id, |p| *p = updated.clone());
        state[idx] = updated.clone();
        Some(updated)
    }

    pub async fn remove(&self, id: &str) {
        let mut state = self.state.lock().await;
        self.dao.delete(id);
        state.retain(|p| p.id != id);
    }
}

// ----- appointments -----

pub struct AppointmentsProvider {
    mode: PersistenceMode,
    api: Arc<ApiClient>,
    dao: Dao<Appointment>,
    state: Mutex<Vec<Appointment>>,
}

impl AppointmentsProvider {
    fn new(mode: PersistenceMode, api: Arc<ApiClient>, store: Arc<Store>) -> Self {
        AppointmentsProvider {
            mode,
            api,
            dao: Dao::new(store),
            state: Mutex::new(Vec::new()),
        }
    }

    async fn load(&self) {
        let records = match self.mode {
            PersistenceMode::Remote => match self.api.list_appointments().await {
                Ok(records) => records,
                Err(e) => {
                    warn!("remote appointment load failed ({}), reading local store", e);
                    self.dao.get_all()
                }
            },
            PersistenceMode::Local => self.dao.get_all(),
        };
        *self.state.lock().await = records;
    }

    pub async fn list(&self) -> Vec<Appointment> {
        self.state.lock().await.clone()
    }

    pub async fn add(&self, new: NewAppointment, total: f64) -> Appointment {
        let mut state = self.state.lock().await;
        let record = Appointment::create(new, total);
        let record = match self.mode {
            PersistenceMode::Remote => match self.api.create_appointment(&record).await {
                Ok(created) => created,
                Err(e) => {
                    warn!("remote booking failed ({}), storing locally", e);
                    self.dao.insert(record)
                }
            },
            PersistenceMode::Local => self.dao.insert(record),
        };
        state.push(record.clone());
        record
    }

    /// Moves an appointment out of `Scheduled`. Completed and cancelled are
    /// terminal: once an appointment is closed its status never changes
    /// again, so a paid appointment cannot be cancelled out from under its
    /// tally record.
    pub async fn update_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> Result<Appointment, String> {
        let mut state = self.state.lock().await;
        let idx = state
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| "appointment not found".to_string())?;
        if state[idx].status != AppointmentStatus::Scheduled {
            return Err("appointment is already closed".to_string());
        }
        let mut updated = state[idx].clone();
        updated.status = status;

        match self.mode {
            PersistenceMode::Remote => {
                if let Err(e) = self.api.update_appointment_status(id, status).await {
                    warn!("remote status update failed ({}), storing locally", e);
                    self.dao.update(id, |a| a.status = status);
                }
            }
            PersistenceMode::Local => {
                self.dao.update(id, |a| a.status = status);
            }
        }

        state[idx] = updated.clone();
        Ok(updated)
    }
}

// ----- tally -----

pub struct TallyProvider {
    mode: PersistenceMode,
    api: Arc<ApiClient>,
    dao: Dao<TallyItem>,
    state: Mutex<Vec<TallyItem>>,
}

impl TallyProvider {
    fn new(mode: PersistenceMode, api: Arc<ApiClient>, store: Arc<Store>) -> Self {
        TallyProvider {
            mode,
            api,
            dao: Dao::new(store),
            state: Mutex::new(Vec::new()),
        }
    }

    async fn load(&self) {
        let records = match self.mode {
            PersistenceMode::Remote => match self.api.list_tally().await {
                Ok(records) => records,
                Err(e) => {
                    warn!("remote tally load failed ({}), reading local store", e);
                    self.dao.get_all()
                }
            },
            PersistenceMode::Local => self.dao.get_all(),
        };
        *self.state.lock().await = records;
    }

    pub async fn list(&self) -> Vec<TallyItem> {
        self.state.lock().await.clone()
    }

    pub async fn add(&self, new: NewTallyItem) -> TallyItem {
        let mut state = self.state.lock().await;
        let record = TallyItem::create(new);
        let record = match self.mode {
            PersistenceMode::Remote => match self.api.create_tally(&record).await {
                Ok(created) => created,
                Err(e) => {
                    warn!("remote tally create failed ({}), storing locally", e);
                    self.dao.insert(record)
                }
            },
            PersistenceMode::Local => self.dao.insert(record),
        };
        state.push(record.clone());
        record
    }

    /// Transitions a payment record. Only pending records move to a new
    /// status; the one exception is attaching a UPI transaction id to a
    /// record that is already completed. Anything that has left `pending`
    /// is a closed ledger entry and stays put.
    pub async fn update_payment_status(
        &self,
        id: &str,
        status: PaymentStatus,
        upi_transaction_id: Option<String>,
    ) -> Result<TallyItem, String> {
        let mut state = self.state.lock().await;
        let idx = state
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| "tally record not found".to_string())?;
        let current = state[idx].payment_status;
        let txn_attach = current == PaymentStatus::Completed
            && status == PaymentStatus::Completed
            && upi_transaction_id.is_some();
        if current != PaymentStatus::Pending && !txn_attach {
            return Err("payment is already settled".to_string());
        }
        let mut updated = state[idx].clone();
        updated.payment_status = status;
        if upi_transaction_id.is_some() {
            updated.upi_transaction_id = upi_transaction_id.clone();
        }

        match self.mode {
            PersistenceMode::Remote => {
                if let Err(e) = self
                    .api
                    .update_payment_status(id, status, upi_transaction_id.as_deref())
                    .await
                {
                    warn!("remote payment status update failed ({}), storing locally", e);
                    let local = updated.clone();
                    self.dao.update(id, |t| *t = local.clone());
                }
            }
            PersistenceMode::Local => {
                let local = updated.clone();
                self.dao.update(id, |t| *t = local.clone());
            }
        }

        state[idx] = updated.clone();
        Ok(updated)
    }
}

// ----- facade -----

/// All providers for a session, plus the cross-entity operations the UI
/// pages invoke. Providers never call each other; the multi-entity flows
/// (booking gate, payment completion) are orchestrated here.
pub struct Providers {
    pub mode: PersistenceMode,
    api: Arc<ApiClient>,
    pub customers: CustomersProvider,
    pub staff: StaffProvider,
    pub services: ServicesProvider,
    pub products: ProductsProvider,
    pub appointments: AppointmentsProvider,
    pub tally: TallyProvider,
}

impl Providers {
    pub async fn init(mode: PersistenceMode, store: Arc<Store>, api: Arc<ApiClient>) -> Self {
        if mode == PersistenceMode::Local {
            seed::install_if_empty(&store);
        }

        let providers = Providers {
            mode,
            api: api.clone(),
            customers: CustomersProvider::new(mode, api.clone(), store.clone()),
            staff: StaffProvider::new(mode, api.clone(), store.clone()),
            services: ServicesProvider::new(mode, api.clone(), store.clone()),
            products: ProductsProvider::new(store.clone()),
            appointments: AppointmentsProvider::new(mode, api.clone(), store.clone()),
            tally: TallyProvider::new(mode, api, store),
        };

        providers.customers.load().await;
        providers.staff.load().await;
        providers.services.load().await;
        providers.products.load().await;
        providers.appointments.load().await;
        providers.tally.load().await;

        providers
    }

    /// Books an appointment after validating the request and the slot. The
    /// total is captured from current service prices and never recomputed.
    pub async fn book_appointment(&self, new: NewAppointment) -> Result<Appointment, String> {
        if new.customer_id.is_empty()
            || new.employee_id.is_empty()
            || new.date.is_empty()
            || new.time.is_empty()
        {
            return Err("customer, staff, date and time are required".to_string());
        }
        if new.service_ids.is_empty() {
            return Err("select at least one service".to_string());
        }

        let services = self.services.list().await;
        if new
            .service_ids
            .iter()
            .any(|id| !services.iter().any(|s| &s.id == id))
        {
            return Err("unknown service selected".to_string());
        }

        let employees = self.staff.list().await;
        let appointments = self.appointments.list().await;
        if !schedule::is_employee_available(
            &new.employee_id,
            &new.date,
            &new.time,
            &appointments,
            &employees,
        ) {
            return Err("selected time slot is no longer available".to_string());
        }

        let total = schedule::booking_total(&new.service_ids, &services);
        Ok(self.appointments.add(new, total).await)
    }

    /// Completes payment for a scheduled appointment: marks it completed,
    /// writes a snapshot tally record, and bumps the customer's visit and
    /// spend aggregates.
    pub async fn complete_payment(
        &self,
        appointment_id: &str,
        method: PaymentMethod,
        upi_transaction_id: Option<String>,
    ) -> Result<TallyItem, String> {
        let appointment = self
            .appointments
            .list()
            .await
            .into_iter()
            .find(|a| a.id == appointment_id)
            .ok_or_else(|| "appointment not found".to_string())?;

        if appointment.status != AppointmentStatus::Scheduled {
            return Err("appointment is not open for payment".to_string());
        }

        let customer = self
            .customers
            .list()
            .await
            .into_iter()
            .find(|c| c.id == appointment.customer_id);
        let staff_name = self
            .staff
            .list()
            .await
            .into_iter()
            .find(|e| e.id == appointment.employee_id)
            .map(|e| e.name)
            .unwrap_or_default();

        let services = self.services.list().await;
        let lines: Vec<ServiceLine> = appointment
            .service_ids
            .iter()
            .filter_map(|id| services.iter().find(|s| &s.id == id))
            .map(|s| ServiceLine {
                name: s.name.clone(),
                price: s.price,
            })
            .collect();

        self.appointments
            .update_status(appointment_id, AppointmentStatus::Completed)
            .await?;

        let mut item = self
            .tally
            .add(NewTallyItem {
                date: appointment.date.clone(),
                time: appointment.time.clone(),
                customer_name: customer.as_ref().map(|c| c.name.clone()).unwrap_or_default(),
                customer_phone: customer
                    .as_ref()
                    .map(|c| c.phone.clone())
                    .unwrap_or_default(),
                staff_name,
                services: lines,
                total_cost: appointment.total,
                payment_method: method,
                payment_status: Some(PaymentStatus::Completed),
            })
            .await;

        if upi_transaction_id.is_some() {
            if let Ok(updated) = self
                .tally
                .update_payment_status(&item.id, PaymentStatus::Completed, upi_transaction_id)
                .await
            {
                item = updated;
            }
        }

        if let Some(customer) = customer {
            let patch = CustomerPatch {
                visit_count: Some(customer.visit_count + 1),
                total_spent: Some(customer.total_spent + appointment.total),
                last_visit: Some(Utc::now().to_rfc3339()),
                ..Default::default()
            };
            self.customers.update(&customer.id, patch).await;
        }

        Ok(item)
    }

    /// Slot check backing the schedule grid. The remote path asks the
    /// server; on failure or in local mode the check runs against the
    /// in-memory collections.
    pub async fn slot_available(&self, employee_id: &str, date: &str, time: &str) -> bool {
        if self.mode == PersistenceMode::Remote {
            match self.api.check_availability(employee_id, date, time).await {
                Ok(available) => return available,
                Err(e) => warn!("remote availability check failed ({}), checking locally", e),
            }
        }

        let employees = self.staff.list().await;
        let appointments = self.appointments.list().await;
        schedule::is_employee_available(employee_id, date, time, &appointments, &employees)
    }

    /// Revenue from completed payments on the given date. The remote path
    /// asks the server; on failure or in local mode the tally collection is
    /// summed in memory.
    pub async fn revenue_for_date(&self, date: &str) -> f64 {
        if self.mode == PersistenceMode::Remote {
            match self.api.revenue(date).await {
                Ok(revenue) => return revenue,
                Err(e) => warn!("remote revenue query failed ({}), summing locally", e),
            }
        }

        self.tally
            .list()
            .await
            .iter()
            .filter(|t| t.date == date && t.payment_status == PaymentStatus::Completed)
            .map(|t| t.total_cost)
            .sum()
    }

    pub async fn day_summary(&self, date: &str) -> crate::models::DaySummary {
        let tally = self.tally.list().await;
        let appointments = self.appointments.list().await;

        let for_date = |status: PaymentStatus| {
            tally
                .iter()
                .filter(|t| t.date == date && t.payment_status == status)
                .count() as u32
        };
        let apt_count = |status: AppointmentStatus| {
            appointments
                .iter()
                .filter(|a| a.date == date && a.status == status)
                .count() as u32
        };

        crate::models::DaySummary {
            date: date.to_string(),
            total_revenue: self.revenue_for_date(date).await,
            completed_payments: for_date(PaymentStatus::Completed),
            pending_payments: for_date(PaymentStatus::Pending),
            scheduled_appointments: apt_count(AppointmentStatus::Scheduled),
            completed_appointments: apt_count(AppointmentStatus::Completed),
            cancelled_appointments: apt_count(AppointmentStatus::Cancelled),
        }
    }
}

/// Managed application state. The probe runs at most once per session, on
/// first access rather than at startup, so an unreachable backend never
/// delays the window.
pub struct AppState {
    store: Arc<Store>,
    api: Arc<ApiClient>,
    providers: OnceCell<Providers>,
}

impl AppState {
    pub fn new(store: Arc<Store>) -> Self {
        Self::with_api(store, Arc::new(ApiClient::from_env()))
    }

    pub fn with_api(store: Arc<Store>, api: Arc<ApiClient>) -> Self {
        AppState {
            store,
            api,
            providers: OnceCell::new(),
        }
    }

    pub async fn providers(&self) -> &Providers {
        self.providers
            .get_or_init(|| async {
                let mode = if self.api.probe().await {
                    PersistenceMode::Remote
                } else {
                    PersistenceMode::Local
                };
                log::info!("persistence mode for this session: {}", mode.label());
                Providers::init(mode, self.store.clone(), self.api.clone()).await
            })
            .await
    }
}
