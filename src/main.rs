//! Storefront Cart CLI

use std::{process::ExitCode, sync::Arc};

use clap::{Args, Parser, Subcommand};
use storefront_cart::{
    auth::{AccessToken, Credentials},
    carts::{
        HttpCartsClient,
        models::{AddCartItem, CartItemId, ProductId, VariantId},
    },
    config::{ApiConfig, LoggingConfig, StorageConfig},
    http::ApiClient,
    observability,
    promotions::HttpPromotionsClient,
    render::render_cart,
    session::SessionIdentity,
    storage::FileStorage,
    store::CartStore,
};

#[derive(Debug, Parser)]
#[command(name = "storefront-cart", about = "Storefront cart CLI", long_about = None)]
struct Cli {
    #[command(flatten)]
    api: ApiConfig,

    #[command(flatten)]
    storage: StorageConfig,

    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the current cart
    Show,

    /// Add a product to the cart
    Add(AddArgs),

    /// Set the quantity of a cart item
    Update(UpdateArgs),

    /// Remove an item from the cart
    Remove(ItemArgs),

    /// Remove every item from the cart
    Clear,

    /// Fold the guest cart into the signed-in user's cart
    Merge,

    /// Price the cart with a promotion code
    Promo(PromoArgs),

    /// Forget the stored guest session
    Forget,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Product id
    #[arg(long)]
    product: String,

    /// Optional variant id
    #[arg(long)]
    variant: Option<String>,

    /// Number of units to add
    #[arg(long, default_value_t = 1)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// Cart item id
    #[arg(long)]
    item: String,

    /// New quantity
    #[arg(long)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct ItemArgs {
    /// Cart item id
    #[arg(long)]
    item: String,
}

#[derive(Debug, Args)]
struct PromoArgs {
    /// Promotion code
    code: String,
}

#[tokio::main]
pub async fn main() -> ExitCode {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> Result<(), String> {
    observability::init_subscriber(&cli.logging)
        .map_err(|error| format!("failed to initialise logging: {error}"))?;

    let storage = Arc::new(FileStorage::new(&cli.storage.storage_path));
    let session = SessionIdentity::new(storage);

    if matches!(cli.command, Commands::Forget) {
        return session
            .forget()
            .map_err(|error| format!("failed to forget guest session: {error}"));
    }

    let credentials = match cli.api.api_token.as_deref() {
        Some(token) if !token.trim().is_empty() => {
            Credentials::signed_in(AccessToken::new(token.trim()))
        }
        _ => Credentials::guest(),
    };

    let api = ApiClient::new(&cli.api, credentials.clone())
        .map_err(|error| format!("failed to build API client: {error}"))?;

    let store = CartStore::new(
        Arc::new(HttpCartsClient::new(api.clone())),
        Arc::new(HttpPromotionsClient::new(api)),
        session,
        credentials,
    );

    let (rendered, outcome) = execute(&store, cli.command).await;

    print!("{rendered}");

    outcome
}

/// Load the cart, run `command` against it, and render the resulting state.
/// The state is rendered whether or not the command succeeded.
async fn execute(store: &CartStore, command: Commands) -> (String, Result<(), String>) {
    let outcome = match store.fetch().await {
        Err(error) => Err(format!("failed to load cart: {error}")),
        Ok(()) => match command {
            Commands::Show | Commands::Forget => Ok(()),
            Commands::Add(args) => {
                store
                    .add_item(AddCartItem {
                        product_id: ProductId::from(args.product),
                        variant_id: args.variant.map(VariantId::from),
                        quantity: args.quantity,
                    })
                    .await
            }
            Commands::Update(args) => {
                store
                    .update_quantity(CartItemId::from(args.item), args.quantity)
                    .await
            }
            Commands::Remove(args) => store.remove_item(CartItemId::from(args.item)).await,
            Commands::Clear => store.clear_cart().await,
            Commands::Merge => store.merge_guest_cart().await,
            Commands::Promo(args) => store.apply_promotion(&args.code).await,
        }
        .map_err(|error| error.to_string()),
    };

    (render_cart(&store.snapshot()), outcome)
}
