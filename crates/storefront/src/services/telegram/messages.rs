//! Order notification formatting.

use rust_decimal::Decimal;

use crate::stores::Order;

/// Render an order as a Telegram HTML notification.
#[must_use]
pub fn format_order_notification(order: &Order, currency: &str) -> String {
    let mut message = format!("<b>🛍️ New order #{}</b>\n\n", order.id);
    message.push_str(&format!(
        "<b>Date:</b> {}\n",
        order.created_at.format("%Y-%m-%d %H:%M")
    ));
    message.push_str(&format!("<b>Status:</b> {}\n", order.status));
    message.push_str(&format!("<b>Total:</b> {} {currency}\n\n", order.total));

    if let Some(code) = &order.promo_code {
        message.push_str(&format!("<b>Promo code:</b> {code}\n"));
        if let Some(discount) = order.discount {
            message.push_str(&format!(
                "<b>Discount:</b> {}%\n\n",
                discount * Decimal::from(100)
            ));
        }
    }

    let (first, last) = order.customer.split_name();
    message.push_str("<b>Customer:</b>\n");
    message.push_str(&format!("{first} {last}\n"));
    message.push_str(&format!("📱 {}\n", order.customer.phone));
    if !order.customer.email.is_empty() {
        message.push_str(&format!("📧 {}\n", order.customer.email));
    }

    if let Some(delivery) = &order.delivery {
        message.push_str("\n<b>Delivery:</b>\n");
        message.push_str(&format!("📍 {}, {}\n", delivery.address, delivery.city));
        message.push_str(&format!(
            "Delivery cost: {} {currency}\n",
            delivery.delivery_cost
        ));
        if let Some(tracking) = &order.tracking_ref {
            message.push_str(&format!("Tracking number: {tracking}\n"));
        }
    } else {
        message.push_str("\n<b>Delivery:</b>\nPickup\n");
    }

    message.push_str("\n<b>Items:</b>\n");
    for item in &order.items {
        message.push_str(&format!("- {} x{}", item.name, item.quantity));
        if !item.size.is_empty() {
            message.push_str(&format!(" ({})", item.size));
        }
        message.push_str(&format!(
            ": {} {currency}\n",
            item.unit_price * Decimal::from(item.quantity)
        ));
    }

    message
}
