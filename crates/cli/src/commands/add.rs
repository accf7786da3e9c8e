use cartview_core::{ApplicationError, CartStore, ProductId};

use crate::commands::{application_failure, mount, run_with_config, CommandResult, EXIT_REFUSED};
use crate::render::render_cart;

pub fn run(product_id: &str) -> CommandResult {
    let product_id = ProductId::from(product_id.trim());

    run_with_config("add", |config| async move {
        let mut cart = mount(&config).await?;

        let title = match cart.catalog.find(&product_id) {
            Some(product) => product.title.clone(),
            None => {
                cart.close().await;
                return Err((
                    "unknown_product",
                    format!("product `{product_id}` is not in the catalog"),
                    EXIT_REFUSED,
                ));
            }
        };

        let stored = match cart.view.store().add_cart_id(&product_id).await {
            Ok(()) => cart.view.reload(&cart.catalog).await,
            Err(error) => Err(error),
        };

        let message = stored
            .map(|()| format!("{title} is in your cart.\n{}", render_cart(&cart.view.snapshot())))
            .map_err(|error| application_failure(ApplicationError::from(error)));
        cart.close().await;
        message
    })
}
