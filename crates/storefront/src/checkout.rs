//! Order assembly and pricing engine.
//!
//! Validates preconditions, computes the total with promo discount and
//! shipping cost, assigns an order id, persists the order, then performs the
//! best-effort side effects: shipment creation and Telegram notification.
//! Side effects are not transactional; an order recorded locally wins over
//! "all side effects succeeded".

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, instrument, warn};

use rosewood_core::{OrderId, OrderStatus, ProductId, round_to_unit};

use crate::catalog::Catalog;
use crate::clock::Clock;
use crate::services::cdek::{CdekClient, CdekOrderRef, CreateOrderParams, ShipmentItem};
use crate::services::telegram::{TelegramClient, format_order_notification};
use crate::storage::StorageError;
use crate::stores::{CartStore, DeliveryDetails, Order, OrderItem, OrderStore, PromoStore};

/// Delivery promise shown to the customer, in days.
const ESTIMATED_DELIVERY_DAYS: i64 = 7;

/// Reasons an order cannot be placed.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No customer profile has been saved yet.
    #[error("Customer details are required to place an order")]
    MissingProfile,

    /// The cart is empty.
    #[error("The cart is empty")]
    EmptyCart,

    /// A cart line references a product absent from the catalog. This is a
    /// catalog/cart desync, not a user mistake, and aborts placement.
    #[error("Product {0} not found in catalog")]
    UnknownProduct(ProductId),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The order placement pipeline.
#[derive(Clone)]
pub struct CheckoutEngine {
    catalog: Arc<Catalog>,
    cart: CartStore,
    promos: PromoStore,
    orders: OrderStore,
    cdek: CdekClient,
    telegram: TelegramClient,
    clock: Arc<dyn Clock>,
    currency: String,
}

impl CheckoutEngine {
    #[expect(clippy::too_many_arguments, reason = "explicit wiring of every collaborator")]
    #[must_use]
    pub fn new(
        catalog: Arc<Catalog>,
        cart: CartStore,
        promos: PromoStore,
        orders: OrderStore,
        cdek: CdekClient,
        telegram: TelegramClient,
        clock: Arc<dyn Clock>,
        currency: String,
    ) -> Self {
        Self {
            catalog,
            cart,
            promos,
            orders,
            cdek,
            telegram,
            clock,
            currency,
        }
    }

    /// Place an order from the current cart and profile.
    ///
    /// On success the order is durably recorded, the cart and pending-promo
    /// slot are cleared, and the new order id is returned. Shipment creation
    /// and notification are best-effort and never fail the placement.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] when a precondition fails or a cart line
    /// references an unknown product; storage failures propagate as-is.
    #[instrument(skip(self, delivery))]
    pub async fn place_order(
        &self,
        delivery: Option<DeliveryDetails>,
    ) -> Result<OrderId, CheckoutError> {
        let Some(profile) = self.cart.profile()? else {
            return Err(CheckoutError::MissingProfile);
        };
        let lines = self.cart.lines()?;
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        // Snapshot products at order time.
        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            let product = self
                .catalog
                .by_id(&line.product_id)
                .ok_or_else(|| CheckoutError::UnknownProduct(line.product_id.clone()))?;
            items.push(OrderItem {
                product_id: product.id.clone(),
                name: product.name.clone(),
                unit_price: product.price,
                quantity: line.quantity,
                size: line.size.clone(),
                image_url: Some(product.image_url.clone()),
            });
        }

        let mut total: Decimal = items
            .iter()
            .map(|item| item.unit_price * Decimal::from(item.quantity))
            .sum();
        if let Some(delivery) = &delivery {
            total += delivery.delivery_cost;
        }

        // Discount applies to the pre-rounded subtotal-plus-shipping; only
        // the final figure is rounded.
        let applied = self.cart.applied_promo()?;
        let (promo_code, discount) = match &applied {
            Some(promo) if promo.discount > Decimal::ZERO => {
                total = round_to_unit(total * (Decimal::ONE - promo.discount));
                (Some(promo.code.clone()), Some(promo.discount))
            }
            _ => (None, None),
        };

        let mut customer = profile;
        if customer.first_name.is_none() || customer.last_name.is_none() {
            let (first, last) = customer.split_name();
            customer.first_name = Some(first);
            customer.last_name = Some(last);
        }

        let id = self.orders.next_id()?;
        let now = self.clock.now();
        let mut order = Order {
            id: id.clone(),
            items,
            total,
            status: OrderStatus::Processing,
            created_at: now,
            estimated_delivery: now + chrono::Duration::days(ESTIMATED_DELIVERY_DAYS),
            customer,
            delivery: delivery.clone(),
            tracking_ref: None,
            shipment_uuid: None,
            promo_code,
            discount,
        };

        if let Some(delivery) = &delivery
            && let Some(reference) = self.create_shipment(&order, delivery).await
        {
            // The carrier number is what the customer tracks by; the uuid is
            // the key later status lookups must use.
            order.shipment_uuid = reference.uuid.clone();
            order.tracking_ref = reference.tracking_ref();
        }

        self.orders.append(order.clone())?;
        if let Some(code) = &order.promo_code
            && !self.promos.redeem(code)?
        {
            warn!(code, "Applied promo code could not be redeemed");
        }
        self.cart.clear()?;
        self.cart.clear_applied_promo()?;

        if !self
            .telegram
            .send_message(&format_order_notification(&order, &self.currency))
            .await
        {
            warn!(order = %order.id, "Order notification was not delivered");
        }

        info!(order = %order.id, total = %order.total, "Order placed");
        Ok(id)
    }

    /// Best-effort shipment creation; returns the carrier's identifiers.
    async fn create_shipment(
        &self,
        order: &Order,
        delivery: &DeliveryDetails,
    ) -> Option<CdekOrderRef> {
        let (first, last) = order.customer.split_name();
        let params = CreateOrderParams {
            order_number: order.id.to_string(),
            recipient_name: format!("{first} {last}").trim().to_string(),
            recipient_phone: order.customer.phone.clone(),
            recipient_email: (!order.customer.email.is_empty())
                .then(|| order.customer.email.clone()),
            to_city: delivery.city.clone(),
            address: delivery.address.clone(),
            items: order
                .items
                .iter()
                .map(|item| ShipmentItem {
                    name: item.name.clone(),
                    price: item.unit_price,
                    quantity: item.quantity,
                })
                .collect(),
        };

        self.cdek.create_order(&params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::{CdekConfig, TelegramConfig};
    use crate::storage::{KeyValueStore, MemoryStore};
    use chrono::TimeZone;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use secrecy::SecretString;

    fn unreachable_cdek() -> CdekConfig {
        CdekConfig {
            account: "test".to_string(),
            password: SecretString::from("test".to_string()),
            // Nothing listens here; every call degrades immediately.
            base_url: "http://127.0.0.1:9".to_string(),
        }
    }

    fn unreachable_telegram() -> TelegramConfig {
        TelegramConfig {
            bot_token: SecretString::from("test-token".to_string()),
            chat_id: "1".to_string(),
            api_base: "http://127.0.0.1:9".to_string(),
        }
    }

    struct Fixture {
        engine: CheckoutEngine,
        cart: CartStore,
        promos: PromoStore,
        orders: OrderStore,
        clock: ManualClock,
    }

    fn fixture() -> Fixture {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let clock = ManualClock::new(
            Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().expect("valid date"),
        );
        let clock_arc: Arc<dyn Clock> = Arc::new(clock.clone());

        let catalog = Arc::new(Catalog::rosewood());
        let cart = CartStore::new(Arc::clone(&storage));
        let promos = PromoStore::new(Arc::clone(&storage), Arc::clone(&clock_arc));
        let orders = OrderStore::new(Arc::clone(&storage));
        let engine = CheckoutEngine::new(
            Arc::clone(&catalog),
            cart.clone(),
            promos.clone(),
            orders.clone(),
            CdekClient::new(&unreachable_cdek(), Arc::clone(&clock_arc)),
            TelegramClient::new(&unreachable_telegram()),
            clock_arc,
            "₽".to_string(),
        );

        Fixture {
            engine,
            cart,
            promos,
            orders,
            clock,
        }
    }

    fn save_profile(cart: &CartStore) {
        cart.save_profile(&crate::stores::CustomerProfile {
            full_name: "Anna Petrova".to_string(),
            phone: "+70000000000".to_string(),
            email: "anna@example.com".to_string(),
            pickup_address: String::new(),
            first_name: None,
            last_name: None,
            address: None,
        })
        .expect("save profile");
    }

    fn fill_cart(cart: &CartStore) {
        // Two of the 3500 tee in size m.
        cart.add(ProductId::from("rosewood-love"), "m").expect("add");
        cart.add(ProductId::from("rosewood-love"), "m").expect("add");
    }

    #[tokio::test]
    async fn test_missing_profile_is_hard_stop() {
        let f = fixture();
        fill_cart(&f.cart);
        let err = f.engine.place_order(None).await;
        assert!(matches!(err, Err(CheckoutError::MissingProfile)));
        assert!(f.orders.list().expect("list").is_empty());
    }

    #[tokio::test]
    async fn test_empty_cart_is_hard_stop() {
        let f = fixture();
        save_profile(&f.cart);
        let err = f.engine.place_order(None).await;
        assert!(matches!(err, Err(CheckoutError::EmptyCart)));
        assert!(f.orders.list().expect("list").is_empty());
    }

    #[tokio::test]
    async fn test_basic_order_totals_and_dates() {
        let f = fixture();
        save_profile(&f.cart);
        fill_cart(&f.cart);

        let id = f.engine.place_order(None).await.expect("placed");
        let order = f.orders.get(&id).expect("get").expect("present");

        assert_eq!(order.total, dec!(7000));
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.created_at, f.clock.now());
        assert_eq!(
            order.estimated_delivery,
            f.clock.now() + chrono::Duration::days(7)
        );
        assert_eq!(order.customer.first_name.as_deref(), Some("Anna"));
        assert_eq!(order.customer.last_name.as_deref(), Some("Petrova"));

        // Exactly one order; cart cleared.
        assert_eq!(f.orders.list().expect("list").len(), 1);
        assert!(f.cart.lines().expect("lines").is_empty());
    }

    #[tokio::test]
    async fn test_promo_discount_applied_and_slot_cleared() {
        let f = fixture();
        save_profile(&f.cart);
        fill_cart(&f.cart);

        let expiry = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).single().expect("valid date");
        f.promos.create("SALE10", dec!(0.1), 5, expiry).expect("create");
        f.cart.apply_promo("SALE10", dec!(0.1)).expect("apply");

        let id = f.engine.place_order(None).await.expect("placed");
        let order = f.orders.get(&id).expect("get").expect("present");

        assert_eq!(order.total, dec!(6300));
        assert_eq!(order.promo_code.as_deref(), Some("SALE10"));
        assert_eq!(order.discount, Some(dec!(0.1)));

        // Redeemed once, pending slot cleared.
        assert_eq!(f.promos.list().expect("list")[0].uses_left, 4);
        assert!(f.cart.applied_promo().expect("slot").is_none());
    }

    #[tokio::test]
    async fn test_delivery_cost_added_before_discount() {
        let f = fixture();
        save_profile(&f.cart);
        fill_cart(&f.cart);
        f.cart.apply_promo("SALE10", dec!(0.1)).expect("apply");

        let delivery = DeliveryDetails {
            city: "Казань".to_string(),
            address: "ул. Баумана 1".to_string(),
            delivery_cost: dec!(305),
        };
        let id = f.engine.place_order(Some(delivery)).await.expect("placed");
        let order = f.orders.get(&id).expect("get").expect("present");

        // round((7000 + 305) * 0.9) = round(6574.5) = 6575
        assert_eq!(order.total, dec!(6575));
    }

    #[tokio::test]
    async fn test_shipment_failure_does_not_abort_placement() {
        let f = fixture();
        save_profile(&f.cart);
        fill_cart(&f.cart);

        // The CDEK endpoint is unreachable, so shipment creation fails.
        let delivery = DeliveryDetails {
            city: "Казань".to_string(),
            address: "ул. Баумана 1".to_string(),
            delivery_cost: dec!(300),
        };
        let id = f.engine.place_order(Some(delivery)).await.expect("placed");
        let order = f.orders.get(&id).expect("get").expect("present");

        assert_eq!(order.tracking_ref, None);
        assert_eq!(order.shipment_uuid, None);
        assert_eq!(order.total, dec!(7300));
    }

    #[tokio::test]
    async fn test_unknown_product_aborts_without_order() {
        let f = fixture();
        save_profile(&f.cart);
        f.cart.add(ProductId::from("ghost-product"), "m").expect("add");

        let err = f.engine.place_order(None).await;
        assert!(matches!(err, Err(CheckoutError::UnknownProduct(_))));
        assert!(f.orders.list().expect("list").is_empty());
        // Cart is left intact for diagnosis.
        assert_eq!(f.cart.lines().expect("lines").len(), 1);
    }

    #[tokio::test]
    async fn test_order_id_is_sequenced() {
        let f = fixture();
        save_profile(&f.cart);
        fill_cart(&f.cart);
        let first = f.engine.place_order(None).await.expect("placed");
        assert!(first.as_str().starts_with("ORD-0001-"));

        fill_cart(&f.cart);
        let second = f.engine.place_order(None).await.expect("placed");
        assert!(second.as_str().starts_with("ORD-0002-"));
    }
}
