use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context};
use cartview_core::{ApplicationError, ProductId};

use crate::commands::{
    application_failure, mount, run_with_config, CommandResult, Failure, MountedCart,
    EXIT_REFUSED,
};
use crate::render::{render_cart, render_notification};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionAction {
    Show,
    Sort,
    Remove(ProductId),
    AddBack(ProductId),
    Purchase,
    Close,
}

impl FromStr for SessionAction {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().ok_or_else(|| anyhow!("empty action"))?;
        let argument = parts.next();
        if parts.next().is_some() {
            bail!("too many arguments for `{verb}`");
        }

        let product_id = |verb: &str| {
            argument
                .map(ProductId::from)
                .ok_or_else(|| anyhow!("`{verb}` needs a product id"))
        };

        let action = match verb.to_ascii_lowercase().as_str() {
            "show" => Self::Show,
            "sort" => Self::Sort,
            "remove" => Self::Remove(product_id("remove")?),
            "add-back" => Self::AddBack(product_id("add-back")?),
            "purchase" => Self::Purchase,
            "close" => Self::Close,
            other => bail!(
                "unknown action `{other}` (expected show|sort|remove|add-back|purchase|close)"
            ),
        };

        let takes_argument = matches!(action, Self::Remove(_) | Self::AddBack(_));
        if !takes_argument && argument.is_some() {
            bail!("`{verb}` takes no arguments");
        }
        Ok(action)
    }
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Show => f.write_str("show"),
            Self::Sort => f.write_str("sort"),
            Self::Remove(id) => write!(f, "remove {id}"),
            Self::AddBack(id) => write!(f, "add-back {id}"),
            Self::Purchase => f.write_str("purchase"),
            Self::Close => f.write_str("close"),
        }
    }
}

/// Parses one action per line. Blank lines and `#` comments are skipped.
pub fn parse_actions<R: BufRead>(input: R) -> anyhow::Result<Vec<SessionAction>> {
    let mut actions = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let line = line.context("failed to read session input")?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let action =
            trimmed.parse::<SessionAction>().with_context(|| format!("line {}", index + 1))?;
        actions.push(action);
    }
    Ok(actions)
}

pub fn run() -> CommandResult {
    let stdin = std::io::stdin();
    run_with_input(stdin.lock())
}

pub fn run_with_input<R: BufRead>(input: R) -> CommandResult {
    let actions = match parse_actions(input) {
        Ok(actions) => actions,
        Err(error) => {
            return CommandResult::failure(
                "session",
                "invalid_action",
                format!("{error:#}"),
                EXIT_REFUSED,
            );
        }
    };

    run_with_config("session", |config| async move {
        let mut cart = mount(&config).await?;
        let mut transcript = vec![render_cart(&cart.view.snapshot())];

        for action in &actions {
            transcript.push(format!("> {action}"));
            match apply(&mut cart, action).await {
                Ok(lines) => transcript.extend(lines),
                Err(failure) => {
                    cart.close().await;
                    return Err(failure);
                }
            }
        }

        cart.close().await;
        Ok::<String, Failure>(transcript.join("\n"))
    })
}

async fn apply(cart: &mut MountedCart, action: &SessionAction) -> Result<Vec<String>, Failure> {
    let mut lines = Vec::new();

    match action {
        SessionAction::Show => {}
        SessionAction::Sort => cart.view.sort_by_price(),
        SessionAction::Remove(id) => {
            cart.view
                .remove(id)
                .await
                .map_err(|error| application_failure(ApplicationError::from(error)))?;
        }
        SessionAction::AddBack(id) => {
            let entry = cart.view.entries().iter().find(|entry| &entry.id == id).cloned();
            match entry {
                Some(entry) => cart.view.add_back(entry),
                None => lines.push(format!("no entry `{id}` in cart")),
            }
        }
        SessionAction::Purchase => {
            if cart.view.purchase_disabled() {
                lines.push("purchase is disabled: cart is empty".to_string());
            } else {
                cart.view
                    .purchase()
                    .await
                    .map_err(|error| application_failure(ApplicationError::from(error)))?;
            }
        }
        SessionAction::Close => cart.view.close_dialog(),
    }

    lines.extend(cart.notifier.drain().iter().map(render_notification));
    lines.push(render_cart(&cart.view.snapshot()));
    Ok(lines)
}
