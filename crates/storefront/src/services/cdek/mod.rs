//! CDEK carrier API client.
//!
//! Obtains and caches an OAuth2 access token, computes delivery quotes,
//! creates shipments, and maps carrier status codes to internal order
//! statuses.
//!
//! Every public operation degrades to `None` on failure instead of
//! returning an error: callers treat "no quote available" as a normal,
//! displayable outcome, and shipment creation is best-effort by design.

mod error;
mod types;

pub use error::CdekError;
pub use types::{CdekOrderRef, CreateOrderParams, DeliveryPoint, ShipmentItem};

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument, warn};

use rosewood_core::OrderStatus;

use crate::clock::Clock;
use crate::config::CdekConfig;
use crate::services::retry::with_retry;
use types::{
    Contact, Location, LocationRef, Money, OrderRequest, OrderResponse, Package,
    PackageDimensions, PackageItem, Phone, TariffRequest, TariffResponse, TokenResponse,
};

/// Treat a token as expired this long before its nominal expiry, to absorb
/// clock skew and in-flight request latency.
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 300;

/// Door-to-door courier tariff used for shipment creation.
const DEFAULT_TARIFF_CODE: u32 = 136;

/// Origin warehouse code.
const SHIPMENT_POINT: &str = "MSK67";

/// A single garment weighs roughly 300 g.
const GARMENT_WEIGHT_GRAMS: u32 = 300;

/// Default quote package dimensions in cm (one folded tee).
const PACKAGE_DIMS_CM: (u32, u32, u32) = (30, 20, 5);

/// The API rejects `ware_key` values longer than this.
const WARE_KEY_MAX_LEN: usize = 20;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const RETRY_ATTEMPTS: u32 = 2;
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// A cached bearer token.
#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Single-slot token cache, overwritten on refresh.
#[derive(Default)]
pub(crate) struct TokenCache {
    slot: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    /// The cached token, if still inside its freshness window.
    fn get_fresh(&self, now: DateTime<Utc>) -> Option<String> {
        let slot = self.slot.lock().ok()?;
        slot.as_ref()
            .filter(|t| now < t.expires_at)
            .map(|t| t.value.clone())
    }

    /// Store a token, applying the expiry safety margin.
    fn store(&self, value: String, expires_in_secs: i64, now: DateTime<Utc>) {
        let expires_at =
            now + chrono::Duration::seconds(expires_in_secs - TOKEN_EXPIRY_MARGIN_SECS);
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(CachedToken { value, expires_at });
        }
    }
}

/// Client for the CDEK carrier API.
#[derive(Clone)]
pub struct CdekClient {
    inner: Arc<CdekClientInner>,
}

struct CdekClientInner {
    http: reqwest::Client,
    account: String,
    password: SecretString,
    base_url: String,
    clock: Arc<dyn Clock>,
    token_cache: TokenCache,
}

impl std::fmt::Debug for CdekClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdekClient")
            .field("account", &self.inner.account)
            .field("password", &"[REDACTED]")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl CdekClient {
    /// Create a new CDEK client.
    #[must_use]
    pub fn new(config: &CdekConfig, clock: Arc<dyn Clock>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            inner: Arc::new(CdekClientInner {
                http,
                account: config.account.clone(),
                password: config.password.clone(),
                base_url: config.base_url.trim_end_matches('/').to_string(),
                clock,
                token_cache: TokenCache::default(),
            }),
        }
    }

    /// A valid bearer token, from cache or freshly exchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the token endpoint is unreachable or rejects the
    /// credentials.
    async fn access_token(&self) -> Result<String, CdekError> {
        let now = self.inner.clock.now();
        if let Some(token) = self.inner.token_cache.get_fresh(now) {
            return Ok(token);
        }

        let response: TokenResponse = with_retry(RETRY_ATTEMPTS, RETRY_DELAY, || async {
            let resp = self
                .inner
                .http
                .post(format!("{}/oauth/token", self.inner.base_url))
                .form(&[
                    ("grant_type", "client_credentials"),
                    ("client_id", self.inner.account.as_str()),
                    ("client_secret", self.inner.password.expose_secret()),
                ])
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(CdekError::Api {
                    status: status.as_u16(),
                    body,
                });
            }
            resp.json::<TokenResponse>()
                .await
                .map_err(|e| CdekError::Response(e.to_string()))
        })
        .await?;

        if response.access_token.is_empty() {
            return Err(CdekError::Token("empty access token".to_string()));
        }

        debug!("Obtained fresh CDEK access token");
        self.inner.token_cache.store(
            response.access_token.clone(),
            response.expires_in,
            self.inner.clock.now(),
        );
        Ok(response.access_token)
    }

    /// Compute the delivery cost for one quote.
    ///
    /// Returns the first tariff option's price, or `None` if the carrier
    /// returns no options or the request fails.
    #[instrument(skip(self), fields(from = %from_city, to = %to_city))]
    pub async fn quote(
        &self,
        from_city: &str,
        to_city: &str,
        weight_kg: Decimal,
    ) -> Option<Decimal> {
        match self.try_quote(from_city, to_city, weight_kg).await {
            Ok(cost) => cost,
            Err(e) => {
                warn!(error = %e, "Delivery quote failed");
                None
            }
        }
    }

    async fn try_quote(
        &self,
        from_city: &str,
        to_city: &str,
        weight_kg: Decimal,
    ) -> Result<Option<Decimal>, CdekError> {
        let token = self.access_token().await?;
        let (length, width, height) = PACKAGE_DIMS_CM;
        let request = TariffRequest {
            order_type: 1,
            from_location: LocationRef {
                city: from_city.to_string(),
            },
            to_location: LocationRef {
                city: to_city.to_string(),
            },
            packages: vec![PackageDimensions {
                weight: to_grams(weight_kg),
                length,
                width,
                height,
            }],
        };

        let response: TariffResponse = with_retry(RETRY_ATTEMPTS, RETRY_DELAY, || async {
            let resp = self
                .inner
                .http
                .post(format!("{}/calculator/tariff", self.inner.base_url))
                .bearer_auth(&token)
                .json(&request)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(CdekError::Api {
                    status: status.as_u16(),
                    body,
                });
            }
            resp.json::<TariffResponse>()
                .await
                .map_err(|e| CdekError::Response(e.to_string()))
        })
        .await?;

        Ok(response
            .tariff_codes
            .first()
            .map(|option| option.delivery_sum))
    }

    /// Create a shipment for a placed order. Best-effort: returns `None` on
    /// any HTTP or parse failure.
    ///
    /// Not retried; a duplicate submission would create a second shipment.
    #[instrument(skip(self, params), fields(order = %params.order_number))]
    pub async fn create_order(&self, params: &CreateOrderParams) -> Option<CdekOrderRef> {
        match self.try_create_order(params).await {
            Ok(reference) => {
                debug!(
                    cdek_number = ?reference.cdek_number,
                    uuid = ?reference.uuid,
                    "CDEK shipment created"
                );
                Some(reference)
            }
            Err(e) => {
                warn!(error = %e, "CDEK shipment creation failed");
                None
            }
        }
    }

    async fn try_create_order(
        &self,
        params: &CreateOrderParams,
    ) -> Result<CdekOrderRef, CdekError> {
        let token = self.access_token().await?;

        let total_weight: u32 = params
            .items
            .iter()
            .map(|item| GARMENT_WEIGHT_GRAMS * item.quantity)
            .sum();

        let items = params
            .items
            .iter()
            .map(|item| PackageItem {
                name: item.name.clone(),
                ware_key: truncate(&item.name, WARE_KEY_MAX_LEN),
                payment: Money {
                    value: Decimal::ZERO,
                },
                cost: item.price,
                weight: GARMENT_WEIGHT_GRAMS,
                amount: item.quantity,
            })
            .collect();

        let request = OrderRequest {
            order_type: 1,
            number: params.order_number.clone(),
            tariff_code: DEFAULT_TARIFF_CODE,
            comment: Some("Rosewood storefront order".to_string()),
            shipment_point: SHIPMENT_POINT.to_string(),
            to_location: Location {
                city: params.to_city.clone(),
                address: params.address.clone(),
            },
            recipient: Contact {
                name: params.recipient_name.clone(),
                email: params.recipient_email.clone(),
                phones: vec![Phone {
                    number: params.recipient_phone.clone(),
                }],
            },
            packages: vec![Package {
                number: "1".to_string(),
                weight: total_weight,
                items,
            }],
        };

        let resp = self
            .inner
            .http
            .post(format!("{}/orders", self.inner.base_url))
            .bearer_auth(&token)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(CdekError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let response: OrderResponse =
            serde_json::from_str(&body).map_err(|e| CdekError::Response(e.to_string()))?;
        let entity = response
            .entity
            .ok_or_else(|| CdekError::Response("no entity in order response".to_string()))?;

        Ok(CdekOrderRef {
            uuid: entity.uuid,
            cdek_number: entity.cdek_number,
        })
    }

    /// The latest carrier status code for a shipment, or `None`.
    #[instrument(skip(self))]
    pub async fn order_status(&self, uuid: &str) -> Option<String> {
        match self.try_order_status(uuid).await {
            Ok(code) => code,
            Err(e) => {
                warn!(error = %e, "CDEK status lookup failed");
                None
            }
        }
    }

    async fn try_order_status(&self, uuid: &str) -> Result<Option<String>, CdekError> {
        let token = self.access_token().await?;

        let response: OrderResponse = with_retry(RETRY_ATTEMPTS, RETRY_DELAY, || async {
            let resp = self
                .inner
                .http
                .get(format!("{}/orders/{uuid}", self.inner.base_url))
                .bearer_auth(&token)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(CdekError::Api {
                    status: status.as_u16(),
                    body,
                });
            }
            resp.json::<OrderResponse>()
                .await
                .map_err(|e| CdekError::Response(e.to_string()))
        })
        .await?;

        Ok(response
            .entity
            .and_then(|entity| entity.statuses.into_iter().next())
            .map(|status| status.code))
    }

    /// Pickup points available in a city, or `None` on failure.
    #[instrument(skip(self))]
    pub async fn delivery_points(&self, city_code: &str) -> Option<Vec<DeliveryPoint>> {
        match self.try_delivery_points(city_code).await {
            Ok(points) => Some(points),
            Err(e) => {
                warn!(error = %e, "CDEK delivery point lookup failed");
                None
            }
        }
    }

    async fn try_delivery_points(&self, city_code: &str) -> Result<Vec<DeliveryPoint>, CdekError> {
        let token = self.access_token().await?;

        with_retry(RETRY_ATTEMPTS, RETRY_DELAY, || async {
            let resp = self
                .inner
                .http
                .get(format!(
                    "{}/deliverypoints?city_code={}",
                    self.inner.base_url,
                    urlencoding::encode(city_code)
                ))
                .bearer_auth(&token)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(CdekError::Api {
                    status: status.as_u16(),
                    body,
                });
            }
            resp.json::<Vec<DeliveryPoint>>()
                .await
                .map_err(|e| CdekError::Response(e.to_string()))
        })
        .await
    }
}

/// Map a carrier status code to an internal order status.
///
/// Unknown codes default to `Processing`.
#[must_use]
pub fn map_status(code: &str) -> OrderStatus {
    match code {
        "CREATED"
        | "ACCEPTED"
        | "RECEIVED_AT_SHIPMENT_WAREHOUSE"
        | "READY_FOR_SHIPMENT_FROM_SHIPMENT_WAREHOUSE" => OrderStatus::Processing,

        "TRANSIT"
        | "ACCEPTED_AT_TRANSIT_WAREHOUSE"
        | "HANDED_TO_CARRIER"
        | "ISSUED"
        | "READY_TO_BE_RECEIVED"
        | "READY_FOR_SHIPMENT" => OrderStatus::Shipped,

        "DELIVERED" => OrderStatus::Delivered,

        "NOT_DELIVERED" | "CANCELED" | "RETURNED" => OrderStatus::Cancelled,

        _ => OrderStatus::Processing,
    }
}

fn to_grams(weight_kg: Decimal) -> u32 {
    use rust_decimal::prelude::ToPrimitive;
    (weight_kg * Decimal::from(1000))
        .round()
        .to_u32()
        .unwrap_or(GARMENT_WEIGHT_GRAMS)
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
