//! First-run reference data for the local store. Installed only when the
//! store has never been written, so user edits are never clobbered.

use std::sync::Arc;

use log::info;

use crate::models::{
    Employee, NewEmployee, NewProduct, NewService, Product, Service, WorkingHours,
};
use crate::store::Store;

pub fn install_if_empty(store: &Arc<Store>) {
    if !store.is_unset::<Service>() {
        return;
    }

    info!("seeding local store with default catalogue and staff");

    let services: Vec<Service> = default_services().into_iter().map(Service::create).collect();
    store.set(&services);

    let products: Vec<Product> = default_products().into_iter().map(Product::create).collect();
    store.set(&products);

    let employees: Vec<Employee> = default_staff().into_iter().map(Employee::create).collect();
    store.set(&employees);
}

fn svc(name: &str, duration: u32, price: f64, category: &str, description: &str) -> NewService {
    NewService {
        name: name.to_string(),
        duration,
        price,
        category: category.to_string(),
        description: description.to_string(),
    }
}

fn default_services() -> Vec<NewService> {
    vec![
        svc("Haircut & Style", 60, 500.0, "Hair", "Professional haircut and styling with blow dry"),
        svc("Hair Color", 120, 3500.0, "Hair", "Full hair coloring with premium products"),
        svc("Hair Spa", 90, 2000.0, "Hair", "Deep conditioning hair spa treatment"),
        svc("Facial Treatment", 90, 2500.0, "Skin Care", "Deep cleansing facial with mask and massage"),
        svc("Waxing", 30, 600.0, "Skin Care", "Professional waxing service"),
        svc("Manicure", 45, 800.0, "Nails", "Classic manicure with nail shaping and polish"),
        svc("Pedicure", 60, 1000.0, "Nails", "Relaxing pedicure with foot soak and massage"),
        svc("Beard Trim", 30, 300.0, "Grooming", "Precision beard trim and shaping"),
        svc("Eyebrow Threading", 15, 200.0, "Grooming", "Precise eyebrow shaping with threading"),
        svc("Makeup Application", 60, 3500.0, "Makeup", "Professional makeup application for any occasion"),
    ]
}

fn default_products() -> Vec<NewProduct> {
    vec![
        NewProduct {
            name: "Professional Shampoo".to_string(),
            price: 450.0,
            image: String::new(),
            category: "Hair Care".to_string(),
            stock: 25,
            description: "Sulfate-free professional shampoo for all hair types".to_string(),
            brand: "SalonPro".to_string(),
        },
        NewProduct {
            name: "Hydrating Hair Mask".to_string(),
            price: 650.0,
            image: String::new(),
            category: "Hair Care".to_string(),
            stock: 18,
            description: "Deep conditioning mask for dry and damaged hair".to_string(),
            brand: "SalonPro".to_string(),
        },
        NewProduct {
            name: "Anti-Aging Serum".to_string(),
            price: 1250.0,
            image: String::new(),
            category: "Skincare".to_string(),
            stock: 12,
            description: "Premium anti-aging serum with vitamin C and retinol".to_string(),
            brand: "BeautyLux".to_string(),
        },
        NewProduct {
            name: "Nail Polish Set".to_string(),
            price: 350.0,
            image: String::new(),
            category: "Nail Care".to_string(),
            stock: 30,
            description: "Set of 5 trending nail polish colors".to_string(),
            brand: "ColorPop".to_string(),
        },
    ]
}

fn staff(name: &str, role: &str, specialties: &[&str], rating: f64, start: &str, end: &str) -> NewEmployee {
    NewEmployee {
        name: name.to_string(),
        role: role.to_string(),
        photo: String::new(),
        available: true,
        specialties: specialties.iter().map(|s| s.to_string()).collect(),
        rating: Some(rating),
        next_available: None,
        working_hours: Some(WorkingHours {
            start: start.to_string(),
            end: end.to_string(),
        }),
    }
}

fn default_staff() -> Vec<NewEmployee> {
    vec![
        staff(
            "Rajesh Kulkarni",
            "Senior Stylist",
            &["Hair Coloring", "Balayage", "Ombre"],
            4.9,
            "09:00",
            "18:00",
        ),
        staff(
            "Priyanka Patil",
            "Master Barber",
            &["Beard Trim", "Classic Cuts", "Hot Towel Shave"],
            4.8,
            "10:00",
            "19:00",
        ),
        staff(
            "Sandeep Deshmukh",
            "Spa Therapist",
            &["Deep Tissue Massage", "Facials", "Waxing"],
            4.7,
            "11:00",
            "20:00",
        ),
    ]
}
