//! Inventory service API
//!
//! Typed client for the vehicle inventory REST service.
//!
//! ## Endpoints consumed
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/health` | GET | Service status probe |
//! | `/api/vehicles?page=N&page_size=M` | GET | One page of vehicles |
//! | `/api/vehicles/{vin}` | GET | Vehicle details |
//! | `/api/vehicles` | POST | Create a vehicle |
//!
//! The listing endpoint may answer with a paginated envelope or, on older
//! backends, with a bare array of every vehicle. Both are normalized to
//! [`PaginatedVehicles`].

mod client;
mod models;

pub use client::*;
pub use models::*;
