//! # VinDash - Vehicle Inventory Dashboard
//!
//! VinDash is a terminal client for a vehicle inventory REST service. It
//! lists vehicles page by page, shows a vehicle's details and image
//! gallery, and adds new vehicles through a validated form.
//!
//! ## Features
//!
//! - **Typed API client**: reqwest-backed, behind the [`api::InventoryApi`] trait
//! - **Paginated listing**: envelope responses, with a fallback for bare arrays
//! - **Client-side validation**: the same rules for the dialog and the CLI
//! - **Stale-response protection**: only the latest page or detail fetch lands
//! - **Interactive dashboard**: ratatui TUI with light and dark themes
//!
//! ## Quick Start
//!
//! ```no_run
//! use vindash::api::{InventoryApi, InventoryClient};
//! use vindash::config::ClientConfig;
//!
//! # async fn example() -> vindash::Result<()> {
//! let client = InventoryClient::new(&ClientConfig::default())?;
//! let page = client.list_vehicles(1, 10).await?;
//!
//! println!("Page {} of {} ({} vehicles)", page.page, page.page_count(), page.total);
//! # Ok(())
//! # }
//! ```
//!
//! ## Driving the Dashboard State
//!
//! ```no_run
//! use std::sync::Arc;
//! use vindash::api::InventoryClient;
//! use vindash::config::ClientConfig;
//! use vindash::dashboard::{DashboardController, Field};
//!
//! # async fn example() -> vindash::Result<()> {
//! let client = InventoryClient::new(&ClientConfig::default())?;
//! let mut controller = DashboardController::new(Arc::new(client), 10);
//! controller.bootstrap().await;
//!
//! controller.open_dialog();
//! controller.set_field(Field::Vin, "1HGCM82633A004352");
//! controller.set_field(Field::Make, "Honda");
//! controller.set_field(Field::Model, "Accord");
//! controller.set_field(Field::Description, "Clean title, one owner");
//! let outcome = controller.submit().await;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod progress;
#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use api::{InventoryApi, InventoryClient, PaginatedVehicles, Vehicle, VehicleCreate};
pub use config::ClientConfig;
pub use dashboard::DashboardController;
pub use error::{DashboardError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use vindash::prelude::*;
    //! ```

    pub use crate::api::{
        HealthResponse, InventoryApi, InventoryClient, PaginatedVehicles, Vehicle, VehicleCreate,
        VehicleListItem,
    };
    pub use crate::config::ClientConfig;
    pub use crate::dashboard::{
        load_detail, DashboardController, DetailOutcome, Field, FormDraft, Lightbox, VehicleDetail,
    };
    pub use crate::error::{DashboardError, Result};
    pub use crate::progress::RequestSpinner;
}
