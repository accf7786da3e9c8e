use cartview_core::ApplicationError;

use crate::commands::{application_failure, mount, run_with_config, CommandResult, EXIT_REFUSED};
use crate::render::render_cart;

pub fn run() -> CommandResult {
    run_with_config("purchase", |config| async move {
        let mut cart = mount(&config).await?;

        if cart.view.purchase_disabled() {
            cart.close().await;
            return Err(("purchase_disabled", "cart is empty".to_string(), EXIT_REFUSED));
        }

        let purchased = cart
            .view
            .purchase()
            .await
            .map_err(|error| application_failure(ApplicationError::from(error)));

        let message = purchased.map(|_| render_cart(&cart.view.snapshot()));
        cart.close().await;
        message
    })
}
