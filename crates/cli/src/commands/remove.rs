use cartview_core::{ApplicationError, ProductId};

use crate::commands::{application_failure, mount, run_with_config, CommandResult};
use crate::render::render_cart;

pub fn run(product_id: &str) -> CommandResult {
    let product_id = ProductId::from(product_id.trim());

    run_with_config("remove", |config| async move {
        let mut cart = mount(&config).await?;

        let removed = cart
            .view
            .remove(&product_id)
            .await
            .map_err(|error| application_failure(ApplicationError::from(error)));

        let message = removed.map(|count| {
            format!(
                "removed {count} entr{} for `{product_id}`\n{}",
                if count == 1 { "y" } else { "ies" },
                render_cart(&cart.view.snapshot())
            )
        });
        cart.close().await;
        message
    })
}
