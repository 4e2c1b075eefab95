//! Upstream observation providers.
//!
//! Submodules:
//! - `aqicn` — AQICN / WAQI geo feed client and the raw payload view.

pub mod aqicn;

use async_trait::async_trait;

use crate::ingest::aqicn::RawObservation;
use crate::model::AirQualityError;

/// A source of raw observations for a coordinate pair.
///
/// The web layer holds one behind an `Arc<dyn ObservationSource>`, which lets
/// tests swap the live AQICN client for a canned payload.
#[async_trait]
pub trait ObservationSource: Send + Sync {
    /// Fetches the provider document nearest to `lat`/`lon`.
    ///
    /// Only transport-level failures are errors here; a document whose
    /// `status` is not `"ok"` is returned as-is for the report assembler
    /// to reject.
    async fn fetch(&self, lat: f64, lon: f64) -> Result<RawObservation, AirQualityError>;
}
