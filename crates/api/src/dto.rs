//! Request bodies.
//!
//! Fuel names arrive as vendor product names or canonical codes and are
//! resolved through [`FuelCatalog`] before reaching the domain.

use chrono::{DateTime, NaiveDate, Utc};
use fuelbook_core::catalog::{FuelCatalog, FuelType, UnknownFuel};
use fuelbook_core::reconciliation::{CashSlip, CreditCardDetail, CreditSale, OtherPayment};
use fuelbook_core::sales::{
    AttendantId, AutomationSale, FleetSale, MarketSale, NozzleRef, PaymentMethod,
    PumpIndexReading,
};
use fuelbook_core::shift::{Actor, ShiftImport};
use fuelbook_core::tank::TankReading;
use fuelbook_shared::types::{CashSlipId, StationId};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Body carrying only the acting user.
#[derive(Debug, Deserialize)]
pub struct ActorRequest {
    /// Who performs the action.
    pub actor: Actor,
}

/// Body for actions that need a reason (reject, deletion request, decline).
#[derive(Debug, Deserialize)]
pub struct ReasonRequest {
    /// Who performs the action.
    pub actor: Actor,
    /// Free-text reason, required.
    #[serde(default)]
    pub reason: String,
}

/// One automation sale line.
#[derive(Debug, Deserialize)]
pub struct SaleLine {
    /// Product name or fuel code.
    pub fuel: String,
    /// Pump number.
    pub pump: u16,
    /// Nozzle number.
    pub nozzle: u16,
    /// Litres.
    pub quantity: Decimal,
    /// Price per litre.
    pub unit_price: Decimal,
    /// Amount charged.
    pub amount: Decimal,
    /// Completion time.
    pub sold_at: DateTime<Utc>,
    /// Attendant tag.
    #[serde(default)]
    pub attendant: Option<String>,
    /// Tender type, when known.
    #[serde(default)]
    pub payment_hint: Option<PaymentMethod>,
    /// Loyalty card presented.
    #[serde(default)]
    pub loyalty_card: Option<String>,
}

impl SaleLine {
    fn into_sale(self) -> Result<AutomationSale, UnknownFuel> {
        Ok(AutomationSale {
            fuel: FuelCatalog::resolve(&self.fuel)?,
            nozzle: NozzleRef::new(self.pump, self.nozzle),
            quantity: self.quantity,
            unit_price: self.unit_price,
            amount: self.amount,
            sold_at: self.sold_at,
            attendant: self.attendant.map(AttendantId::new),
            payment_hint: self.payment_hint,
            loyalty_card: self.loyalty_card,
        })
    }
}

/// One fleet sale line.
#[derive(Debug, Deserialize)]
pub struct FleetLine {
    /// Product name or fuel code.
    pub fuel: String,
    /// Pump number.
    pub pump: u16,
    /// Nozzle number.
    pub nozzle: u16,
    /// Litres.
    pub quantity: Decimal,
    /// Price per litre.
    pub unit_price: Decimal,
    /// Amount billed.
    pub amount: Decimal,
    /// Completion time.
    pub sold_at: DateTime<Utc>,
    /// Vehicle plate.
    #[serde(default)]
    pub plate: Option<String>,
    /// Fleet card.
    #[serde(default)]
    pub fleet_card: Option<String>,
    /// Attendant tag.
    #[serde(default)]
    pub attendant: Option<String>,
}

impl FleetLine {
    fn into_sale(self) -> Result<FleetSale, UnknownFuel> {
        Ok(FleetSale {
            fuel: FuelCatalog::resolve(&self.fuel)?,
            nozzle: NozzleRef::new(self.pump, self.nozzle),
            quantity: self.quantity,
            unit_price: self.unit_price,
            amount: self.amount,
            sold_at: self.sold_at,
            plate: self.plate,
            fleet_card: self.fleet_card,
            attendant: self.attendant.map(AttendantId::new),
        })
    }
}

/// Body for `POST /shifts`.
#[derive(Debug, Deserialize)]
pub struct ImportShiftRequest {
    /// Who runs the import.
    pub actor: Actor,
    /// Station.
    pub station_id: StationId,
    /// Shift open time.
    pub opened_at: DateTime<Utc>,
    /// Shift close time.
    pub closed_at: DateTime<Utc>,
    /// Automation sales.
    #[serde(default)]
    pub automation_sales: Vec<SaleLine>,
    /// Fleet sales.
    #[serde(default)]
    pub fleet_sales: Vec<FleetLine>,
    /// Shop sales.
    #[serde(default)]
    pub market_sales: Vec<MarketSale>,
}

impl ImportShiftRequest {
    /// Resolves fuel names and builds the import batch.
    pub fn into_import(self) -> Result<(ShiftImport, Actor), UnknownFuel> {
        let import = ShiftImport {
            station_id: self.station_id,
            opened_at: self.opened_at,
            closed_at: self.closed_at,
            automation_sales: self
                .automation_sales
                .into_iter()
                .map(SaleLine::into_sale)
                .collect::<Result<_, _>>()?,
            fleet_sales: self
                .fleet_sales
                .into_iter()
                .map(FleetLine::into_sale)
                .collect::<Result<_, _>>()?,
            market_sales: self.market_sales,
        };
        Ok((import, self.actor))
    }
}

/// Body for `PUT /shifts/{id}/cash-slips/{attendant}`.
#[derive(Debug, Deserialize)]
pub struct CashSlipRequest {
    /// Attendant display name.
    #[serde(default)]
    pub attendant_name: Option<String>,
    /// Cash handed in.
    #[serde(default)]
    pub cash: Decimal,
    /// Card terminal totals.
    #[serde(default)]
    pub card_details: Vec<CreditCardDetail>,
    /// Vouchers, mobile and other tenders.
    #[serde(default)]
    pub other_payments: Vec<OtherPayment>,
    /// On-account sales.
    #[serde(default)]
    pub credit_sales: Vec<CreditSale>,
    /// Shift version the client last read.
    #[serde(default)]
    pub expected_version: Option<u64>,
}

impl CashSlipRequest {
    /// Builds the slip for an attendant.
    pub fn into_slip(self, attendant: AttendantId) -> CashSlip {
        CashSlip {
            id: CashSlipId::new(),
            attendant,
            attendant_name: self.attendant_name,
            cash: self.cash,
            card_details: self.card_details,
            other_payments: self.other_payments,
            credit_sales: self.credit_sales,
        }
    }
}

/// Optional version check for deletes.
#[derive(Debug, Deserialize)]
pub struct VersionQuery {
    /// Shift version the client last read.
    #[serde(default)]
    pub expected_version: Option<u64>,
}

/// One pump meter reading.
#[derive(Debug, Deserialize)]
pub struct PumpReadingLine {
    /// Pump number.
    pub pump: u16,
    /// Nozzle number.
    pub nozzle: u16,
    /// Product name or fuel code.
    pub fuel: String,
    /// Meter at open.
    pub start_index: Decimal,
    /// Meter at close.
    pub end_index: Decimal,
}

/// Body for `PUT /shifts/{id}/pump-readings`.
#[derive(Debug, Deserialize)]
pub struct PumpReadingsRequest {
    /// Replacement readings.
    pub readings: Vec<PumpReadingLine>,
    /// Shift version the client last read.
    #[serde(default)]
    pub expected_version: Option<u64>,
}

impl PumpReadingsRequest {
    /// Resolves fuel names.
    pub fn into_readings(self) -> Result<(Vec<PumpIndexReading>, Option<u64>), UnknownFuel> {
        let readings = self
            .readings
            .into_iter()
            .map(|r| {
                Ok(PumpIndexReading {
                    nozzle: NozzleRef::new(r.pump, r.nozzle),
                    fuel: FuelCatalog::resolve(&r.fuel)?,
                    start_index: r.start_index,
                    end_index: r.end_index,
                })
            })
            .collect::<Result<_, UnknownFuel>>()?;
        Ok((readings, self.expected_version))
    }
}

/// One tank reading.
#[derive(Debug, Deserialize)]
pub struct TankReadingLine {
    /// Tank number.
    pub tank_no: u16,
    /// Product name or fuel code.
    pub fuel: String,
    /// Volume at open.
    pub start_volume: Decimal,
    /// Volume at close.
    pub end_volume: Decimal,
    /// Litres delivered during the shift.
    #[serde(default)]
    pub delivered_volume: Decimal,
    /// Nozzles fed by the tank; empty means every nozzle of the fuel.
    #[serde(default)]
    pub feeds: Vec<NozzleRef>,
}

/// Body for `PUT /shifts/{id}/tank-readings`.
#[derive(Debug, Deserialize)]
pub struct TankReadingsRequest {
    /// Replacement readings.
    pub readings: Vec<TankReadingLine>,
    /// Shift version the client last read.
    #[serde(default)]
    pub expected_version: Option<u64>,
}

impl TankReadingsRequest {
    /// Resolves fuel names.
    pub fn into_readings(self) -> Result<(Vec<TankReading>, Option<u64>), UnknownFuel> {
        let readings = self
            .readings
            .into_iter()
            .map(|r| {
                Ok(TankReading {
                    tank_no: r.tank_no,
                    fuel: FuelCatalog::resolve(&r.fuel)?,
                    start_volume: r.start_volume,
                    end_volume: r.end_volume,
                    delivered_volume: r.delivered_volume,
                    feeds: r.feeds,
                })
            })
            .collect::<Result<_, UnknownFuel>>()?;
        Ok((readings, self.expected_version))
    }
}

/// Body for `POST /stock/{fuel}/invoices`.
#[derive(Debug, Deserialize)]
pub struct RecordInvoiceRequest {
    /// Supplier invoice number, unique per fuel.
    pub invoice_number: String,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Litres invoiced.
    pub quantity: Decimal,
}

/// Resolves a fuel path segment.
pub fn fuel_param(name: &str) -> Result<FuelType, UnknownFuel> {
    FuelCatalog::resolve(name)
}
