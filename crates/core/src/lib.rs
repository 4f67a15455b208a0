pub mod config;
pub mod domain;
pub mod errors;
pub mod pricing;

pub use domain::degressive::{DegressiveRateTable, DegressiveTier};
pub use domain::document::{BillingDocument, DocumentId, DocumentKind, DocumentRequest, LineTotal};
pub use domain::line_item::LineItem;
pub use domain::period::BookingPeriod;
pub use domain::tax::TaxComponent;
pub use errors::PricingError;
pub use pricing::{
    compute_pricing, DeterministicPricingCalculator, PricingCalculator, PricingInput,
    PricingResult, TaxAmount,
};
