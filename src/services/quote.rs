use rand::Rng;
use serde::Serialize;

use super::catalog::{CatalogResult, DriverCatalog};
use super::pricing::PricingPolicy;
use crate::error::AppResult;
use crate::utils::geo::{self, Coordinate};

/// A priced, driver-attributed answer to a quote request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Offer {
    pub driver_id: i32,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub driver_lat: f64,
    pub driver_lng: f64,
    pub price: f64,
    pub distance_label: String,
}

#[derive(Clone)]
pub struct QuoteEngine {
    catalog: DriverCatalog,
    policy: PricingPolicy,
}

impl QuoteEngine {
    pub fn new(catalog: DriverCatalog, policy: PricingPolicy) -> Self {
        Self { catalog, policy }
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Offers for a trip from `origin` to `destination`, in catalog order.
    pub async fn quote(&self, origin: Coordinate, destination: Coordinate) -> AppResult<Vec<Offer>> {
        let candidates = self.catalog.list_candidates(origin).await?;
        let mut rng = rand::thread_rng();
        Ok(self.price_candidates(origin, destination, candidates, &mut rng))
    }

    /// Same as [`quote`](Self::quote) with a caller-supplied jitter source.
    pub async fn quote_with_rng<R: Rng + Send>(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        rng: &mut R,
    ) -> AppResult<Vec<Offer>> {
        let candidates = self.catalog.list_candidates(origin).await?;
        Ok(self.price_candidates(origin, destination, candidates, rng))
    }

    fn price_candidates<R: Rng>(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        candidates: CatalogResult,
        rng: &mut R,
    ) -> Vec<Offer> {
        let distance_km = geo::distance(origin, destination);
        let base_price = self.policy.price(distance_km);
        let fallback = candidates.is_fallback();

        tracing::debug!(
            distance_km,
            base_price,
            fallback,
            candidates = candidates.candidates().len(),
            "Pricing quote"
        );

        candidates
            .candidates()
            .iter()
            .enumerate()
            .map(|(index, candidate)| {
                let price = if fallback {
                    self.policy.fallback_price(base_price, index)
                } else {
                    self.policy.random_jittered_price(distance_km, rng)
                };

                let driver = &candidate.driver;
                Offer {
                    driver_id: driver.id,
                    name: driver.name.clone(),
                    surname: driver.surname.clone(),
                    email: driver.email.clone(),
                    driver_lat: driver.home.lat(),
                    driver_lng: driver.home.lng(),
                    price,
                    distance_label: candidate.proximity_label.to_string(),
                }
            })
            .collect()
    }
}
