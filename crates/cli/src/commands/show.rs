use crate::commands::{mount, run_with_config, CommandResult, Failure};
use crate::render::render_cart;

pub fn run(sort_by_price: bool) -> CommandResult {
    run_with_config("show", |config| async move {
        let mut cart = mount(&config).await?;
        if sort_by_price {
            cart.view.sort_by_price();
        }

        let message = render_cart(&cart.view.snapshot());
        cart.close().await;
        Ok::<String, Failure>(message)
    })
}
