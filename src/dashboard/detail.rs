//! Vehicle detail view model
//!
//! A detail fetch either yields a vehicle or resolves to "not found";
//! there is no partial error state.

use crate::api::{InventoryApi, Vehicle};
use crate::dashboard::gallery::Lightbox;
use crate::error::Result;
use chrono::{DateTime, Utc};
use tracing::warn;

/// Images shown when a vehicle has none of its own
pub const FALLBACK_GALLERY: [&str; 2] = [
    "https://images.unsplash.com/photo-1503736334956-4c8f8e92946d?q=80&w=1200&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1493238792000-8113da705763?q=80&w=900&auto=format&fit=crop",
];

/// Label used when the service did not record a creation time
pub const RECENTLY_ADDED: &str = "Recently added";

/// Vehicle prepared for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleDetail {
    pub vehicle: Vehicle,
    /// Non-blank image URLs, or the fallback set
    pub gallery: Vec<String>,
    /// "January 5, 2025" or [`RECENTLY_ADDED`]
    pub added_on: String,
}

impl VehicleDetail {
    pub fn new(vehicle: Vehicle) -> Self {
        let gallery = gallery_for(&vehicle.image_urls);
        let added_on = format_added_on(vehicle.created_at());
        Self {
            vehicle,
            gallery,
            added_on,
        }
    }

    /// First gallery image
    pub fn hero_image(&self) -> &str {
        self.gallery
            .first()
            .map(String::as_str)
            .unwrap_or(FALLBACK_GALLERY[0])
    }

    /// "Make Model"
    pub fn title(&self) -> String {
        format!("{} {}", self.vehicle.make, self.vehicle.model)
    }
}

/// Usable images, falling back to placeholders
pub fn gallery_for(image_urls: &[String]) -> Vec<String> {
    let usable: Vec<String> = image_urls
        .iter()
        .filter(|url| !url.trim().is_empty())
        .cloned()
        .collect();

    if usable.is_empty() {
        FALLBACK_GALLERY.iter().map(|s| s.to_string()).collect()
    } else {
        usable
    }
}

/// Long-form date, e.g. "January 5, 2025"
pub fn format_added_on(created_at: Option<DateTime<Utc>>) -> String {
    match created_at {
        Some(ts) => ts.format("%B %-d, %Y").to_string(),
        None => RECENTLY_ADDED.to_string(),
    }
}

/// Outcome of a detail fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailOutcome {
    Found(Box<VehicleDetail>),
    NotFound,
}

impl DetailOutcome {
    /// Map a fetch result; any failure counts as not found
    pub fn from_result(vin: &str, result: Result<Vehicle>) -> Self {
        match result {
            Ok(vehicle) => Self::Found(Box::new(VehicleDetail::new(vehicle))),
            Err(err) => {
                warn!(vin, error = %err, "Vehicle fetch failed");
                Self::NotFound
            }
        }
    }
}

/// Fetch a vehicle for display
pub async fn load_detail(api: &dyn InventoryApi, vin: &str) -> DetailOutcome {
    DetailOutcome::from_result(vin, api.get_vehicle(vin).await)
}

/// Detail screen state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Loading { vin: String },
    Loaded { detail: Box<VehicleDetail>, lightbox: Lightbox },
    NotFound { vin: String },
}

/// A detail fetch issued by [`DetailView`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub vin: String,
    generation: u64,
}

/// Detail screen with latest-wins fetch handling
#[derive(Debug, Clone, Default)]
pub struct DetailView {
    state: Option<DetailState>,
    generation: u64,
}

impl DetailView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state; `None` while no vehicle is selected
    pub fn state(&self) -> Option<&DetailState> {
        self.state.as_ref()
    }

    /// Lightbox of the loaded vehicle
    pub fn lightbox_mut(&mut self) -> Option<&mut Lightbox> {
        match self.state.as_mut() {
            Some(DetailState::Loaded { lightbox, .. }) => Some(lightbox),
            _ => None,
        }
    }

    /// Start showing `vin`
    pub fn begin(&mut self, vin: impl Into<String>) -> DetailRequest {
        let vin = vin.into();
        self.generation += 1;
        self.state = Some(DetailState::Loading { vin: vin.clone() });
        DetailRequest {
            vin,
            generation: self.generation,
        }
    }

    /// Apply a fetch result; `false` when it was superseded or dismissed
    pub fn finish(&mut self, request: DetailRequest, outcome: DetailOutcome) -> bool {
        if request.generation != self.generation || self.state.is_none() {
            return false;
        }
        self.state = Some(match outcome {
            DetailOutcome::Found(detail) => {
                let lightbox = Lightbox::new(detail.gallery.len());
                DetailState::Loaded { detail, lightbox }
            }
            DetailOutcome::NotFound => DetailState::NotFound { vin: request.vin },
        });
        true
    }

    /// Leave the detail screen
    pub fn dismiss(&mut self) {
        self.state = None;
    }
}
