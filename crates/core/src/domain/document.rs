use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::domain::line_item::LineItem;
use crate::domain::period::BookingPeriod;
use crate::errors::PricingError;
use crate::pricing::{PricingCalculator, PricingInput, PricingResult};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub Uuid);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Invoice,
    Estimate,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Estimate => "estimate",
        }
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "invoice" => Ok(Self::Invoice),
            "estimate" => Ok(Self::Estimate),
            other => {
                Err(format!("unsupported document kind `{other}` (expected invoice|estimate)"))
            }
        }
    }
}

/// Per-line amounts kept on the document for rendering; never used to reprice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineTotal {
    pub name: String,
    pub reference: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub total: Decimal,
    pub replacement_total: Decimal,
}

impl From<&LineItem> for LineTotal {
    fn from(item: &LineItem) -> Self {
        Self {
            name: item.name.clone(),
            reference: item.reference.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price.unwrap_or(Decimal::ZERO),
            total: item.line_total(),
            replacement_total: item.replacement_total(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DocumentRequest {
    pub kind: DocumentKind,
    pub number: String,
    pub currency: String,
    pub period: Option<BookingPeriod>,
    pub input: PricingInput,
}

/// Invoice or estimate frozen at issue time. Amounts are never recomputed in
/// place; a corrected booking gets a new document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingDocument {
    pub id: DocumentId,
    pub kind: DocumentKind,
    pub number: String,
    pub currency: String,
    pub issued_at: DateTime<Utc>,
    pub period: Option<BookingPeriod>,
    pub input: PricingInput,
    pub lines: Vec<LineTotal>,
    pub pricing: PricingResult,
}

impl BillingDocument {
    pub fn issue(
        calculator: &dyn PricingCalculator,
        request: DocumentRequest,
    ) -> Result<Self, PricingError> {
        if let Some(period) = &request.period {
            period.validate()?;
        }
        let pricing = calculator.compute(&request.input)?;
        let lines = request.input.line_items.iter().map(LineTotal::from).collect();

        let document = Self {
            id: DocumentId(Uuid::new_v4()),
            kind: request.kind,
            number: request.number,
            currency: request.currency,
            issued_at: Utc::now(),
            period: request.period,
            input: request.input,
            lines,
            pricing,
        };
        info!(
            event_name = "document.issued",
            document_id = %document.id.0,
            kind = document.kind.as_str(),
            number = %document.number,
            total_with_taxes = %document.pricing.total_with_taxes,
            "billing document issued"
        );
        Ok(document)
    }

    /// Reprices the frozen input and reports whether the stored amounts match.
    pub fn reproduce(&self, calculator: &dyn PricingCalculator) -> Result<bool, PricingError> {
        let recomputed = calculator.compute(&self.input)?;
        Ok(recomputed == self.pricing)
    }
}
