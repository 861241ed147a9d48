use serde::Serialize;

/// Base price used when a service id is not in the catalog.
pub const DEFAULT_BASE_PRICE: u32 = 1500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Service {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub price: u32,
}

pub const SERVICE_CATALOG: [Service; 6] = [
    Service {
        id: "orthopedic",
        name: "Orthopedic Rehabilitation",
        description: "Treatment for bone, joint, and muscle conditions",
        price: 1500,
    },
    Service {
        id: "sports",
        name: "Sports Injury Treatment",
        description: "Specialized treatment for athletes",
        price: 2000,
    },
    Service {
        id: "neurological",
        name: "Neurological Rehabilitation",
        description: "Expert care for neurological conditions",
        price: 2500,
    },
    Service {
        id: "pediatric",
        name: "Pediatric Therapy",
        description: "Gentle physiotherapy for children",
        price: 1200,
    },
    Service {
        id: "pain",
        name: "Pain Management",
        description: "Effective relief for chronic pain",
        price: 1000,
    },
    Service {
        id: "home",
        name: "Home Visit",
        description: "Expert physiotherapy at your home",
        price: 2500,
    },
];

impl Service {
    pub fn find(id: &str) -> Option<&'static Service> {
        SERVICE_CATALOG.iter().find(|service| service.id == id)
    }

    pub fn all() -> &'static [Service] {
        &SERVICE_CATALOG
    }

    /// Catalog price for `id`, or [`DEFAULT_BASE_PRICE`] for unknown ids.
    pub fn base_price(id: &str) -> u32 {
        Self::find(id).map_or(DEFAULT_BASE_PRICE, |service| service.price)
    }

    pub fn display_name(id: &str) -> Option<&'static str> {
        Self::find(id).map(|service| service.name)
    }
}
