//! Tests for the persistence shim, DAOs, scheduling logic, and the state
//! providers, using in-memory stores (plus tempfile-backed ones where
//! durability across reopen matters).

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::api::ApiClient;
    use crate::dao::Dao;
    use crate::models::*;
    use crate::provider::{PersistenceMode, Providers};
    use crate::schedule::{
        booking_total, is_employee_available, normalize_time, sort_appointments_for_display,
        DAY_SLOTS,
    };
    use crate::seed;
    use crate::store::Store;

    fn test_store() -> Arc<Store> {
        Arc::new(Store::in_memory().expect("failed to create in-memory store"))
    }

    /// Client pointed at a port nothing listens on, so every remote call
    /// fails immediately.
    fn dead_api() -> Arc<ApiClient> {
        Arc::new(ApiClient::new("http://127.0.0.1:9/api"))
    }

    /// Local-mode providers over an empty dataset. Writing an empty
    /// services collection first marks the store as initialized, so the
    /// first-run seed does not run.
    async fn local_providers(store: Arc<Store>) -> Providers {
        store.set::<Service>(&[]);
        Providers::init(PersistenceMode::Local, store, dead_api()).await
    }

    fn new_customer(name: &str, phone: &str) -> NewCustomer {
        NewCustomer {
            name: name.to_string(),
            phone: phone.to_string(),
            email: String::new(),
            gender: Gender::Male,
            preferred_services: Vec::new(),
            notes: String::new(),
            photo: String::new(),
        }
    }

    fn new_employee(name: &str) -> NewEmployee {
        NewEmployee {
            name: name.to_string(),
            role: "Stylist".to_string(),
            photo: String::new(),
            available: true,
            specialties: Vec::new(),
            rating: None,
            next_available: None,
            working_hours: None,
        }
    }

    fn new_service(name: &str, price: f64) -> NewService {
        NewService {
            name: name.to_string(),
            duration: 60,
            price,
            category: "Hair".to_string(),
            description: String::new(),
        }
    }

    fn make_employee(id: &str, available: bool) -> Employee {
        Employee {
            id: id.to_string(),
            name: "Test".to_string(),
            role: "Stylist".to_string(),
            photo: String::new(),
            available,
            specialties: Vec::new(),
            rating: None,
            next_available: None,
            working_hours: None,
        }
    }

    fn make_appointment(
        id: &str,
        employee_id: &str,
        date: &str,
        time: &str,
        status: AppointmentStatus,
    ) -> Appointment {
        Appointment {
            id: id.to_string(),
            customer_id: "cust-1".to_string(),
            employee_id: employee_id.to_string(),
            service_ids: vec!["svc-1".to_string()],
            date: date.to_string(),
            time: time.to_string(),
            status,
            total: 500.0,
            notes: String::new(),
        }
    }

    // ===== STORE TESTS =====

    #[test]
    fn test_store_missing_key_returns_empty() {
        let store = test_store();
        let customers: Vec<Customer> = store.get();
        assert!(customers.is_empty());
    }

    #[test]
    fn test_store_set_then_get_roundtrip() {
        let store = test_store();
        let customer = Customer::create(new_customer("Asha", "9876543210"));
        store.set(&[customer.clone()]);

        let loaded: Vec<Customer> = store.get();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, customer.id);
        assert_eq!(loaded[0].name, "Asha");
    }

    #[test]
    fn test_store_set_overwrites_collection() {
        let store = test_store();
        store.set(&[Customer::create(new_customer("A", "1"))]);
        store.set(&[
            Customer::create(new_customer("B", "2")),
            Customer::create(new_customer("C", "3")),
        ]);

        let loaded: Vec<Customer> = store.get();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name, "B");
    }

    #[test]
    fn test_store_corrupt_value_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("salon_desk.db");

        {
            let store = Store::open(&path).unwrap();
            store.set(&[Customer::create(new_customer("Asha", "9876543210"))]);
        }

        // Clobber the stored JSON out-of-band.
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute(
            "UPDATE store SET value = 'not json' WHERE key = 'salon_customers'",
            [],
        )
        .unwrap();
        drop(conn);

        let store = Store::open(&path).unwrap();
        let loaded: Vec<Customer> = store.get();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("salon_desk.db");

        {
            let store = Store::open(&path).unwrap();
            store.set(&[Customer::create(new_customer("Asha", "9876543210"))]);
        }

        let store = Store::open(&path).unwrap();
        let loaded: Vec<Customer> = store.get();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Asha");
    }

    // ===== DAO TESTS =====

    #[test]
    fn test_dao_insert_and_get_all() {
        let dao: Dao<Customer> = Dao::new(test_store());
        let created = dao.insert(Customer::create(new_customer("Asha", "9876543210")));

        let all = dao.get_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, created.id);
    }

    #[test]
    fn test_dao_update_merges_fields() {
        let dao: Dao<Customer> = Dao::new(test_store());
        let created = dao.insert(Customer::create(new_customer("Asha", "9876543210")));

        let updated = dao.update(&created.id, |c| c.name = "Asha K".to_string());
        assert_eq!(updated.unwrap().name, "Asha K");

        let all = dao.get_all();
        assert_eq!(all[0].name, "Asha K");
        assert_eq!(all[0].phone, "9876543210");
    }

    #[test]
    fn test_dao_update_unknown_id_is_noop() {
        let dao: Dao<Customer> = Dao::new(test_store());
        dao.insert(Customer::create(new_customer("Asha", "9876543210")));

        let result = dao.update("cust-missing", |c| c.name = "X".to_string());
        assert!(result.is_none());
        assert_eq!(dao.get_all()[0].name, "Asha");
    }

    #[test]
    fn test_dao_delete_is_idempotent() {
        let dao: Dao<Customer> = Dao::new(test_store());
        let created = dao.insert(Customer::create(new_customer("Asha", "9876543210")));

        dao.delete(&created.id);
        assert!(dao.get_all().is_empty());

        // Second delete of the same id must not fail or change anything.
        dao.delete(&created.id);
        assert!(dao.get_all().is_empty());
    }

    // ===== TIME NORMALIZATION TESTS =====

    #[test]
    fn test_normalize_24h_afternoon() {
        assert_eq!(normalize_time("14:30"), "2:30 PM");
    }

    #[test]
    fn test_normalize_24h_just_after_midnight() {
        assert_eq!(normalize_time("00:15"), "12:15 AM");
    }

    #[test]
    fn test_normalize_noon() {
        assert_eq!(normalize_time("12:00"), "12:00 PM");
    }

    #[test]
    fn test_normalize_12h_passthrough() {
        assert_eq!(normalize_time("9:00 AM"), "9:00 AM");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["14:30", "00:15", "9:00 AM", "12:00", "11:45 PM"] {
            let once = normalize_time(raw);
            assert_eq!(normalize_time(&once), once, "not idempotent for {raw}");
        }
    }

    #[test]
    fn test_normalize_accepts_seconds_suffix() {
        // The remote service sends LocalTime as HH:mm:ss.
        assert_eq!(normalize_time("14:30:00"), "2:30 PM");
    }

    #[test]
    fn test_normalize_lowercase_meridiem() {
        assert_eq!(normalize_time("9:00 am"), "9:00 AM");
        assert_eq!(normalize_time("2:30 pm"), "2:30 PM");
    }

    #[test]
    fn test_normalize_garbage_passes_through() {
        assert_eq!(normalize_time("soonish"), "soonish");
        assert_eq!(normalize_time("25:00"), "25:00");
    }

    // ===== AVAILABILITY TESTS =====

    #[test]
    fn test_unavailable_employee_blocks_every_slot() {
        let employees = vec![make_employee("emp-1", false)];
        let appointments = Vec::new();

        for slot in DAY_SLOTS {
            assert!(!is_employee_available(
                "emp-1",
                "2026-08-27",
                slot,
                &appointments,
                &employees
            ));
        }
    }

    #[test]
    fn test_unknown_employee_is_not_bookable() {
        assert!(!is_employee_available(
            "emp-ghost",
            "2026-08-27",
            "9:00 AM",
            &[],
            &[]
        ));
    }

    #[test]
    fn test_conflict_detected_across_time_formats() {
        let employees = vec![make_employee("emp-1", true)];
        // Stored 24-hour, probed 12-hour: the two forms must collide.
        let appointments = vec![make_appointment(
            "apt-1",
            "emp-1",
            "2026-08-27",
            "14:00",
            AppointmentStatus::Scheduled,
        )];

        assert!(!is_employee_available(
            "emp-1",
            "2026-08-27",
            "2:00 PM",
            &appointments,
            &employees
        ));
        assert!(is_employee_available(
            "emp-1",
            "2026-08-27",
            "3:00 PM",
            &appointments,
            &employees
        ));
    }

    #[test]
    fn test_lowercase_meridiem_still_conflicts() {
        let employees = vec![make_employee("emp-1", true)];
        let appointments = vec![make_appointment(
            "apt-1",
            "emp-1",
            "2026-08-27",
            "2:00 pm",
            AppointmentStatus::Scheduled,
        )];

        assert!(!is_employee_available(
            "emp-1",
            "2026-08-27",
            "2:00 PM",
            &appointments,
            &employees
        ));
    }

    #[test]
    fn test_cancelled_appointment_frees_the_slot() {
        let employees = vec![make_employee("emp-1", true)];
        let appointments = vec![make_appointment(
            "apt-1",
            "emp-1",
            "2026-08-27",
            "2:00 PM",
            AppointmentStatus::Cancelled,
        )];

        assert!(is_employee_available(
            "emp-1",
            "2026-08-27",
            "2:00 PM",
            &appointments,
            &employees
        ));
    }

    #[test]
    fn test_other_date_does_not_conflict() {
        let employees = vec![make_employee("emp-1", true)];
        let appointments = vec![make_appointment(
            "apt-1",
            "emp-1",
            "2026-08-27",
            "2:00 PM",
            AppointmentStatus::Scheduled,
        )];

        assert!(is_employee_available(
            "emp-1",
            "2026-08-28",
            "2:00 PM",
            &appointments,
            &employees
        ));
    }

    // ===== DISPLAY ORDER TESTS =====

    #[test]
    fn test_display_order_statuses_then_time() {
        let appointments = vec![
            make_appointment("a", "emp-1", "d", "3:00 PM", AppointmentStatus::Cancelled),
            make_appointment("b", "emp-1", "d", "9:00 AM", AppointmentStatus::Scheduled),
            make_appointment("c", "emp-1", "d", "10:00 AM", AppointmentStatus::Completed),
            make_appointment("d", "emp-1", "d", "8:00 AM", AppointmentStatus::Scheduled),
        ];

        let sorted = sort_appointments_for_display(appointments);
        let order: Vec<&str> = sorted.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(order, vec!["d", "b", "c", "a"]);
    }

    // ===== BOOKING TOTAL TESTS =====

    #[test]
    fn test_booking_total_sums_selected_services() {
        let services = vec![
            Service::create(new_service("Haircut", 500.0)),
            Service::create(new_service("Color", 3500.0)),
            Service::create(new_service("Spa", 2000.0)),
        ];
        let ids = vec![services[0].id.clone(), services[2].id.clone()];

        assert!((booking_total(&ids, &services) - 2500.0).abs() < f64::EPSILON);
    }

    // ===== SEED TESTS =====

    #[test]
    fn test_seed_installs_defaults_once() {
        let store = test_store();

        seed::install_if_empty(&store);
        let services: Vec<Service> = store.get();
        let products: Vec<Product> = store.get();
        let employees: Vec<Employee> = store.get();
        assert_eq!(services.len(), 10);
        assert_eq!(products.len(), 4);
        assert_eq!(employees.len(), 3);

        // A second run must not duplicate anything.
        seed::install_if_empty(&store);
        let services: Vec<Service> = store.get();
        assert_eq!(services.len(), 10);
    }

    // ===== PROVIDER TESTS (LOCAL MODE) =====

    #[tokio::test]
    async fn test_add_customer_defaults_and_persistence() {
        let store = test_store();
        let providers = local_providers(store.clone()).await;

        let created = providers
            .customers
            .add(new_customer("Asha", "1234567890"))
            .await;

        assert!(created.id.starts_with("cust-"));
        assert_eq!(created.visit_count, 0);
        assert_eq!(created.total_spent, 0.0);

        let last_visit = chrono::DateTime::parse_from_rfc3339(&created.last_visit).unwrap();
        let age = chrono::Utc::now().signed_duration_since(last_visit);
        assert!(age.num_seconds().abs() < 5);

        // Exactly one record in memory and one in the local store.
        assert_eq!(providers.customers.list().await.len(), 1);
        let persisted: Vec<Customer> = store.get();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].id, created.id);
    }

    #[tokio::test]
    async fn test_update_customer_merges_patch() {
        let store = test_store();
        let providers = local_providers(store.clone()).await;
        let created = providers
            .customers
            .add(new_customer("Asha", "1234567890"))
            .await;

        let patch = CustomerPatch {
            name: Some("Asha K".to_string()),
            ..Default::default()
        };
        let updated = providers.customers.update(&created.id, patch).await.unwrap();

        assert_eq!(updated.name, "Asha K");
        assert_eq!(updated.phone, "1234567890");
        let persisted: Vec<Customer> = store.get();
        assert_eq!(persisted[0].name, "Asha K");
    }

    #[tokio::test]
    async fn test_remove_employee_is_idempotent() {
        let store = test_store();
        let providers = local_providers(store.clone()).await;
        let created = providers.staff.add(new_employee("Rajesh")).await;

        providers.staff.remove(&created.id).await;
        assert!(providers.staff.list().await.is_empty());

        // Removing again must not fail or change the collection.
        providers.staff.remove(&created.id).await;
        assert!(providers.staff.list().await.is_empty());
        let persisted: Vec<Employee> = store.get();
        assert!(persisted.is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_employee_rejects_booking() {
        let providers = local_providers(test_store()).await;
        let employee = providers.staff.add(new_employee("Rajesh")).await;
        let service = providers.services.add(new_service("Haircut", 500.0)).await;

        providers
            .staff
            .set_availability(&employee.id, false)
            .await
            .unwrap();

        let result = providers
            .book_appointment(NewAppointment {
                customer_id: "cust-1".to_string(),
                employee_id: employee.id.clone(),
                service_ids: vec![service.id],
                date: "2026-08-27".to_string(),
                time: "9:00 AM".to_string(),
                notes: String::new(),
            })
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_double_booking_same_slot_is_rejected() {
        let providers = local_providers(test_store()).await;
        let employee = providers.staff.add(new_employee("Rajesh")).await;
        let service = providers.services.add(new_service("Haircut", 500.0)).await;

        let booking = |time: &str| NewAppointment {
            customer_id: "cust-1".to_string(),
            employee_id: employee.id.clone(),
            service_ids: vec![service.id.clone()],
            date: "2026-08-27".to_string(),
            time: time.to_string(),
            notes: String::new(),
        };

        providers.book_appointment(booking("2:00 PM")).await.unwrap();
        assert!(!providers.slot_available(&employee.id, "2026-08-27", "2:00 PM").await);

        // Same slot in 24-hour form must still collide.
        let second = providers.book_appointment(booking("14:00")).await;
        assert!(second.is_err());

        // A different slot is fine.
        providers.book_appointment(booking("3:00 PM")).await.unwrap();
    }

    #[tokio::test]
    async fn test_booking_requires_fields_and_known_services() {
        let providers = local_providers(test_store()).await;
        let employee = providers.staff.add(new_employee("Rajesh")).await;

        let missing_services = providers
            .book_appointment(NewAppointment {
                customer_id: "cust-1".to_string(),
                employee_id: employee.id.clone(),
                service_ids: Vec::new(),
                date: "2026-08-27".to_string(),
                time: "9:00 AM".to_string(),
                notes: String::new(),
            })
            .await;
        assert!(missing_services.is_err());

        let unknown_service = providers
            .book_appointment(NewAppointment {
                customer_id: "cust-1".to_string(),
                employee_id: employee.id.clone(),
                service_ids: vec!["svc-ghost".to_string()],
                date: "2026-08-27".to_string(),
                time: "9:00 AM".to_string(),
                notes: String::new(),
            })
            .await;
        assert!(unknown_service.is_err());
    }

    #[tokio::test]
    async fn test_booking_total_is_captured_not_recomputed() {
        let providers = local_providers(test_store()).await;
        let employee = providers.staff.add(new_employee("Rajesh")).await;
        let service = providers.services.add(new_service("Haircut", 500.0)).await;

        let appointment = providers
            .book_appointment(NewAppointment {
                customer_id: "cust-1".to_string(),
                employee_id: employee.id,
                service_ids: vec![service.id.clone()],
                date: "2026-08-27".to_string(),
                time: "9:00 AM".to_string(),
                notes: String::new(),
            })
            .await
            .unwrap();
        assert_eq!(appointment.total, 500.0);

        // A later price change must not touch the booked total.
        providers
            .services
            .update(
                &service.id,
                ServicePatch {
                    price: Some(900.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let stored = providers.appointments.list().await;
        assert_eq!(stored[0].total, 500.0);
    }

    #[tokio::test]
    async fn test_cancelling_frees_the_slot_for_rebooking() {
        let providers = local_providers(test_store()).await;
        let employee = providers.staff.add(new_employee("Rajesh")).await;
        let service = providers.services.add(new_service("Haircut", 500.0)).await;

        let booking = NewAppointment {
            customer_id: "cust-1".to_string(),
            employee_id: employee.id.clone(),
            service_ids: vec![service.id.clone()],
            date: "2026-08-27".to_string(),
            time: "2:00 PM".to_string(),
            notes: String::new(),
        };

        let appointment = providers.book_appointment(booking.clone()).await.unwrap();
        providers
            .appointments
            .update_status(&appointment.id, AppointmentStatus::Cancelled)
            .await
            .unwrap();

        let appointments = providers.appointments.list().await;
        let employees = providers.staff.list().await;
        assert!(is_employee_available(
            &employee.id,
            "2026-08-27",
            "2:00 PM",
            &appointments,
            &employees
        ));

        providers.book_appointment(booking).await.unwrap();
    }

    #[tokio::test]
    async fn test_complete_payment_snapshots_and_aggregates() {
        let providers = local_providers(test_store()).await;
        let customer = providers
            .customers
            .add(new_customer("Asha", "1234567890"))
            .await;
        let employee = providers.staff.add(new_employee("Rajesh")).await;
        let service = providers.services.add(new_service("Haircut", 500.0)).await;

        let appointment = providers
            .book_appointment(NewAppointment {
                customer_id: customer.id.clone(),
                employee_id: employee.id,
                service_ids: vec![service.id],
                date: "2026-08-27".to_string(),
                time: "9:00 AM".to_string(),
                notes: String::new(),
            })
            .await
            .unwrap();

        let item = providers
            .complete_payment(&appointment.id, PaymentMethod::Cash, None)
            .await
            .unwrap();

        assert_eq!(item.customer_name, "Asha");
        assert_eq!(item.customer_phone, "1234567890");
        assert_eq!(item.staff_name, "Rajesh");
        assert_eq!(item.services.len(), 1);
        assert_eq!(item.services[0].name, "Haircut");
        assert_eq!(item.total_cost, 500.0);
        assert_eq!(item.payment_status, PaymentStatus::Completed);

        let appointments = providers.appointments.list().await;
        assert_eq!(appointments[0].status, AppointmentStatus::Completed);

        let customers = providers.customers.list().await;
        assert_eq!(customers[0].visit_count, 1);
        assert_eq!(customers[0].total_spent, 500.0);

        // Paying again for the same appointment must be rejected.
        let again = providers
            .complete_payment(&appointment.id, PaymentMethod::Cash, None)
            .await;
        assert!(again.is_err());
    }

    #[tokio::test]
    async fn test_completed_appointment_cannot_be_cancelled() {
        let providers = local_providers(test_store()).await;
        let customer = providers
            .customers
            .add(new_customer("Asha", "1234567890"))
            .await;
        let employee = providers.staff.add(new_employee("Rajesh")).await;
        let service = providers.services.add(new_service("Haircut", 500.0)).await;

        let appointment = providers
            .book_appointment(NewAppointment {
                customer_id: customer.id,
                employee_id: employee.id.clone(),
                service_ids: vec![service.id],
                date: "2026-08-27".to_string(),
                time: "9:00 AM".to_string(),
                notes: String::new(),
            })
            .await
            .unwrap();
        providers
            .complete_payment(&appointment.id, PaymentMethod::Cash, None)
            .await
            .unwrap();

        // Completed is terminal; the paid appointment must not be
        // cancellable and the slot stays occupied.
        let result = providers
            .appointments
            .update_status(&appointment.id, AppointmentStatus::Cancelled)
            .await;
        assert!(result.is_err());

        let appointments = providers.appointments.list().await;
        assert_eq!(appointments[0].status, AppointmentStatus::Completed);
        assert!(!providers.slot_available(&employee.id, "2026-08-27", "9:00 AM").await);
    }

    #[tokio::test]
    async fn test_cancelled_appointment_cannot_be_reopened() {
        let providers = local_providers(test_store()).await;
        let employee = providers.staff.add(new_employee("Rajesh")).await;
        let service = providers.services.add(new_service("Haircut", 500.0)).await;

        let appointment = providers
            .book_appointment(NewAppointment {
                customer_id: "cust-1".to_string(),
                employee_id: employee.id,
                service_ids: vec![service.id],
                date: "2026-08-27".to_string(),
                time: "9:00 AM".to_string(),
                notes: String::new(),
            })
            .await
            .unwrap();
        providers
            .appointments
            .update_status(&appointment.id, AppointmentStatus::Cancelled)
            .await
            .unwrap();

        let result = providers
            .appointments
            .update_status(&appointment.id, AppointmentStatus::Completed)
            .await;
        assert!(result.is_err());

        // Paying for a cancelled appointment must fail too.
        let paid = providers
            .complete_payment(&appointment.id, PaymentMethod::Cash, None)
            .await;
        assert!(paid.is_err());
    }

    #[tokio::test]
    async fn test_settled_payment_does_not_transition_again() {
        let providers = local_providers(test_store()).await;

        let item = providers
            .tally
            .add(NewTallyItem {
                date: "2026-08-27".to_string(),
                time: "9:00 AM".to_string(),
                customer_name: "Asha".to_string(),
                customer_phone: "1234567890".to_string(),
                staff_name: "Rajesh".to_string(),
                services: Vec::new(),
                total_cost: 500.0,
                payment_method: PaymentMethod::Upi,
                payment_status: Some(PaymentStatus::Completed),
            })
            .await;

        // A settled record cannot go back to pending or flip status.
        let back = providers
            .tally
            .update_payment_status(&item.id, PaymentStatus::Pending, None)
            .await;
        assert!(back.is_err());
        let failed = providers
            .tally
            .update_payment_status(&item.id, PaymentStatus::Failed, None)
            .await;
        assert!(failed.is_err());
        let restated = providers
            .tally
            .update_payment_status(&item.id, PaymentStatus::Completed, None)
            .await;
        assert!(restated.is_err());

        // The one allowed touch: attaching a UPI transaction id to an
        // already-completed record.
        let attached = providers
            .tally
            .update_payment_status(
                &item.id,
                PaymentStatus::Completed,
                Some("UPI777".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(attached.payment_status, PaymentStatus::Completed);
        assert_eq!(attached.upi_transaction_id.as_deref(), Some("UPI777"));

        let tally = providers.tally.list().await;
        assert_eq!(tally[0].payment_status, PaymentStatus::Completed);
    }

    #[tokio::test]
    async fn test_tally_snapshot_is_immune_to_renames() {
        let providers = local_providers(test_store()).await;
        let customer = providers
            .customers
            .add(new_customer("Asha", "1234567890"))
            .await;
        let employee = providers.staff.add(new_employee("Rajesh")).await;
        let service = providers.services.add(new_service("Haircut", 500.0)).await;

        let appointment = providers
            .book_appointment(NewAppointment {
                customer_id: customer.id.clone(),
                employee_id: employee.id,
                service_ids: vec![service.id],
                date: "2026-08-27".to_string(),
                time: "9:00 AM".to_string(),
                notes: String::new(),
            })
            .await
            .unwrap();
        providers
            .complete_payment(&appointment.id, PaymentMethod::Card, None)
            .await
            .unwrap();

        providers
            .customers
            .update(
                &customer.id,
                CustomerPatch {
                    name: Some("Asha Renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let tally = providers.tally.list().await;
        assert_eq!(tally[0].customer_name, "Asha");
    }

    #[tokio::test]
    async fn test_upi_payment_attaches_transaction_id() {
        let providers = local_providers(test_store()).await;
        let customer = providers
            .customers
            .add(new_customer("Asha", "1234567890"))
            .await;
        let employee = providers.staff.add(new_employee("Rajesh")).await;
        let service = providers.services.add(new_service("Haircut", 500.0)).await;

        let appointment = providers
            .book_appointment(NewAppointment {
                customer_id: customer.id,
                employee_id: employee.id,
                service_ids: vec![service.id],
                date: "2026-08-27".to_string(),
                time: "9:00 AM".to_string(),
                notes: String::new(),
            })
            .await
            .unwrap();

        let item = providers
            .complete_payment(
                &appointment.id,
                PaymentMethod::Upi,
                Some("UPI12345".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(item.payment_method, PaymentMethod::Upi);
        assert_eq!(item.payment_status, PaymentStatus::Completed);
        assert_eq!(item.upi_transaction_id.as_deref(), Some("UPI12345"));
    }

    #[tokio::test]
    async fn test_pending_tally_transitions_to_completed() {
        let providers = local_providers(test_store()).await;

        let item = providers
            .tally
            .add(NewTallyItem {
                date: "2026-08-27".to_string(),
                time: "9:00 AM".to_string(),
                customer_name: "Asha".to_string(),
                customer_phone: "1234567890".to_string(),
                staff_name: "Rajesh".to_string(),
                services: vec![ServiceLine {
                    name: "Haircut".to_string(),
                    price: 500.0,
                }],
                total_cost: 500.0,
                payment_method: PaymentMethod::Upi,
                payment_status: None,
            })
            .await;
        assert_eq!(item.payment_status, PaymentStatus::Pending);

        let updated = providers
            .tally
            .update_payment_status(
                &item.id,
                PaymentStatus::Completed,
                Some("UPI999".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(updated.payment_status, PaymentStatus::Completed);
        assert_eq!(updated.upi_transaction_id.as_deref(), Some("UPI999"));
    }

    #[tokio::test]
    async fn test_revenue_counts_only_completed_payments_on_date() {
        let providers = local_providers(test_store()).await;

        let line = |status: Option<PaymentStatus>, date: &str, cost: f64| NewTallyItem {
            date: date.to_string(),
            time: "9:00 AM".to_string(),
            customer_name: "Asha".to_string(),
            customer_phone: "1234567890".to_string(),
            staff_name: "Rajesh".to_string(),
            services: Vec::new(),
            total_cost: cost,
            payment_method: PaymentMethod::Cash,
            payment_status: status,
        };

        providers
            .tally
            .add(line(Some(PaymentStatus::Completed), "2026-08-27", 500.0))
            .await;
        providers
            .tally
            .add(line(Some(PaymentStatus::Completed), "2026-08-27", 300.0))
            .await;
        providers.tally.add(line(None, "2026-08-27", 900.0)).await;
        providers
            .tally
            .add(line(Some(PaymentStatus::Completed), "2026-08-26", 700.0))
            .await;

        let revenue = providers.revenue_for_date("2026-08-27").await;
        assert!((revenue - 800.0).abs() < f64::EPSILON);

        let summary = providers.day_summary("2026-08-27").await;
        assert_eq!(summary.completed_payments, 2);
        assert_eq!(summary.pending_payments, 1);
    }

    // ===== REMOTE FALLBACK TESTS =====

    #[tokio::test]
    async fn test_remote_failure_falls_back_to_local_exactly_once() {
        let store = test_store();
        store.set::<Service>(&[]);
        // Remote mode against a dead endpoint: every call fails and must
        // fall back to the local store without duplicating state.
        let providers = Providers::init(PersistenceMode::Remote, store.clone(), dead_api()).await;

        let created = providers
            .customers
            .add(new_customer("Asha", "1234567890"))
            .await;

        assert_eq!(providers.customers.list().await.len(), 1);
        let persisted: Vec<Customer> = store.get();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].id, created.id);
    }

    #[tokio::test]
    async fn test_probe_unreachable_backend_returns_false() {
        let api = ApiClient::new("http://127.0.0.1:9/api");
        assert!(!api.probe().await);
    }
}
