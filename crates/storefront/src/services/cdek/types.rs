//! Wire types for the CDEK API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// OAuth2 token endpoint response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

/// Tariff calculation request.
#[derive(Debug, Serialize)]
pub struct TariffRequest {
    /// 1 = door-to-door delivery.
    #[serde(rename = "type")]
    pub order_type: u8,
    pub from_location: LocationRef,
    pub to_location: LocationRef,
    pub packages: Vec<PackageDimensions>,
}

#[derive(Debug, Serialize)]
pub struct LocationRef {
    pub city: String,
}

/// Package dimensions for a quote. Weight in grams, dimensions in cm.
#[derive(Debug, Serialize)]
pub struct PackageDimensions {
    pub weight: u32,
    pub length: u32,
    pub width: u32,
    pub height: u32,
}

/// Tariff calculation response: one option per available service.
#[derive(Debug, Deserialize)]
pub struct TariffResponse {
    #[serde(default)]
    pub tariff_codes: Vec<TariffOption>,
}

#[derive(Debug, Deserialize)]
pub struct TariffOption {
    pub tariff_code: u32,
    pub delivery_sum: Decimal,
}

/// Order creation request document.
#[derive(Debug, Serialize)]
pub struct OrderRequest {
    /// 1 = online store order.
    #[serde(rename = "type")]
    pub order_type: u8,
    /// Order number in the store's own system.
    pub number: String,
    pub tariff_code: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Warehouse the shipment leaves from.
    pub shipment_point: String,
    pub to_location: Location,
    pub recipient: Contact,
    pub packages: Vec<Package>,
}

#[derive(Debug, Serialize)]
pub struct Location {
    pub city: String,
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct Contact {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub phones: Vec<Phone>,
}

#[derive(Debug, Serialize)]
pub struct Phone {
    pub number: String,
}

/// One physical package. Weight in grams.
#[derive(Debug, Serialize)]
pub struct Package {
    pub number: String,
    pub weight: u32,
    pub items: Vec<PackageItem>,
}

#[derive(Debug, Serialize)]
pub struct PackageItem {
    pub name: String,
    /// Merchant item key, truncated to the API's 20-char field limit.
    pub ware_key: String,
    pub payment: Money,
    /// The API expects money as JSON numbers, not the default string form.
    #[serde(with = "rust_decimal::serde::float")]
    pub cost: Decimal,
    pub weight: u32,
    pub amount: u32,
}

/// Money amount; value 0 marks the item as prepaid.
#[derive(Debug, Serialize)]
pub struct Money {
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
}

/// Order creation / status response envelope.
#[derive(Debug, Deserialize)]
pub struct OrderResponse {
    pub entity: Option<OrderEntity>,
}

#[derive(Debug, Deserialize)]
pub struct OrderEntity {
    pub uuid: Option<String>,
    pub cdek_number: Option<String>,
    #[serde(default)]
    pub statuses: Vec<StatusEntry>,
}

#[derive(Debug, Deserialize)]
pub struct StatusEntry {
    pub code: String,
}

/// Delivery point lookup response element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryPoint {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address_comment: Option<String>,
}

/// Identifiers returned when a shipment is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdekOrderRef {
    pub uuid: Option<String>,
    pub cdek_number: Option<String>,
}

impl CdekOrderRef {
    /// The reference to attach to an order: the carrier number when present,
    /// otherwise the carrier's internal uuid.
    #[must_use]
    pub fn tracking_ref(&self) -> Option<String> {
        self.cdek_number.clone().or_else(|| self.uuid.clone())
    }
}

/// Parameters for creating a shipment.
#[derive(Debug, Clone)]
pub struct CreateOrderParams {
    pub order_number: String,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub recipient_email: Option<String>,
    pub to_city: String,
    pub address: String,
    pub items: Vec<ShipmentItem>,
}

/// One garment in the shipment.
#[derive(Debug, Clone)]
pub struct ShipmentItem {
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}
