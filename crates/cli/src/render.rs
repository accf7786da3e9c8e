//! Plain-text presentation of a cart snapshot.

use cartview_core::{CartSnapshot, Notification, NotificationKind};

pub fn render_cart(snapshot: &CartSnapshot) -> String {
    let mut lines = vec![
        format!("Total cost: {}", snapshot.total),
        format!("Purchase: {}", if snapshot.purchase_disabled { "disabled" } else { "enabled" }),
    ];

    if snapshot.entries.is_empty() {
        lines.push("(cart is empty)".to_string());
    }
    for entry in &snapshot.entries {
        lines.push(format!("- [{}] {} | Price: ${}", entry.id, entry.title, entry.price));
        if !entry.description.is_empty() {
            lines.push(format!("    {}", entry.description));
        }
        if !entry.image_url.is_empty() {
            lines.push(format!("    image: {}", entry.image_url));
        }
    }

    if let Some(receipt) = &snapshot.dialog {
        lines.push(format!(
            "Payment successful: {} item(s), total paid ${}",
            receipt.item_count, receipt.total
        ));
    }

    lines.join("\n")
}

pub fn render_notification(notification: &Notification) -> String {
    let kind = match notification.kind {
        NotificationKind::Success => "success",
        NotificationKind::Error => "error",
    };
    format!("notification [{kind}] {}: {}", notification.title, notification.message)
}
