use std::sync::Arc;

use crate::error::AppResult;
use crate::store::{Driver, DriverStore};
use crate::utils::geo::Coordinate;

/// Ids reserved for fallback drivers. Persisted driver ids start at 1000.
pub const SYNTHETIC_DRIVER_IDS: [i32; 2] = [999, 888];

/// Lowest id the driver table hands out.
pub const FIRST_REAL_DRIVER_ID: i32 = 1000;

/// Proximity label shown for registered drivers. Display metadata only.
const REAL_DRIVER_LABEL: &str = "1.2 km";

pub fn is_synthetic_id(id: i32) -> bool {
    id < FIRST_REAL_DRIVER_ID
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub driver: Driver,
    pub proximity_label: &'static str,
}

/// Either every registered driver, or the fixed fallback set. Never both.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogResult {
    Real(Vec<Candidate>),
    Fallback(Vec<Candidate>),
}

impl CatalogResult {
    pub fn candidates(&self) -> &[Candidate] {
        match self {
            CatalogResult::Real(c) | CatalogResult::Fallback(c) => c,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, CatalogResult::Fallback(_))
    }
}

#[derive(Clone)]
pub struct DriverCatalog {
    store: Arc<dyn DriverStore>,
}

impl DriverCatalog {
    pub fn new(store: Arc<dyn DriverStore>) -> Self {
        Self { store }
    }

    /// Candidates for a rider at `origin`.
    pub async fn list_candidates(&self, origin: Coordinate) -> AppResult<CatalogResult> {
        let drivers = self.store.list_drivers().await?;

        if drivers.is_empty() {
            tracing::debug!("No registered drivers, using fallback set");
            return Ok(CatalogResult::Fallback(fallback_candidates(origin)));
        }

        Ok(CatalogResult::Real(
            drivers
                .into_iter()
                .map(|driver| Candidate {
                    driver,
                    proximity_label: REAL_DRIVER_LABEL,
                })
                .collect(),
        ))
    }
}

/// The fixed fallback set, placed at the rider's origin.
pub fn fallback_candidates(origin: Coordinate) -> Vec<Candidate> {
    vec![
        Candidate {
            driver: Driver {
                id: SYNTHETIC_DRIVER_IDS[0],
                name: "Conductor".to_string(),
                surname: "Demo 1".to_string(),
                email: "demo1@test.com".to_string(),
                home: origin,
            },
            proximity_label: "0.1 km",
        },
        Candidate {
            driver: Driver {
                id: SYNTHETIC_DRIVER_IDS[1],
                name: "María".to_string(),
                surname: "Express".to_string(),
                email: "maria@test.com".to_string(),
                home: origin,
            },
            proximity_label: "0.5 km",
        },
    ]
}
