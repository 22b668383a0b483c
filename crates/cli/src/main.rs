//! Lotus Threads CLI - terminal storefront against the commerce API.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! lotus browse list --search "áo thun" --on-sale
//! lotus browse show prod-123
//!
//! # Guest cart (persisted locally until sign-in)
//! lotus cart add prod-123 --quantity 2
//! lotus cart list
//!
//! # Authenticated flows
//! lotus --email a@example.com --password secret cart list
//! lotus --email a@example.com --password secret checkout \
//!     --address-id addr-1 --payment bank-qr --shipping express
//!
//! # Watch an order's payment status
//! lotus --email a@example.com --password secret pay ord-42
//! ```
//!
//! Sessions live for one invocation; pass credentials to any command that
//! needs an account. Without credentials the cart and wishlist operate in
//! guest mode.

#![cfg_attr(not(test), forbid(unsafe_code))]
// This binary's whole purpose is terminal output.
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand, ValueEnum};

use lotus_threads_core::{PaymentMethod, ShippingMethod};
use lotus_threads_storefront::{ClientConfig, Storefront};

mod commands;

#[derive(Parser)]
#[command(name = "lotus")]
#[command(author, version, about = "Lotus Threads terminal storefront")]
struct Cli {
    /// Account email; enables authenticated mode for this invocation
    #[arg(long, global = true, requires = "password")]
    email: Option<String>,

    /// Account password
    #[arg(long, global = true, requires = "email")]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Browse {
        #[command(subcommand)]
        action: BrowseAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Manage account addresses and view order history
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Place an order from the current cart
    Checkout {
        /// Saved address to ship to
        #[arg(long)]
        address_id: String,

        /// How to pay
        #[arg(long, value_enum, default_value_t = PaymentArg::Cod)]
        payment: PaymentArg,

        /// Shipping tier
        #[arg(long, value_enum, default_value_t = ShippingArg::Standard)]
        shipping: ShippingArg,

        /// Free-text note for the order
        #[arg(long)]
        note: Option<String>,
    },
    /// Create a new account (uses the global --email/--password)
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
    /// Watch an order's payment status until it settles
    Pay {
        /// Order to watch
        order_id: String,

        /// Provider callback query (e.g. "status=COMPLETED&orderId=ord-1");
        /// resolves immediately instead of polling
        #[arg(long)]
        callback: Option<String>,
    },
}

#[derive(Subcommand)]
enum BrowseAction {
    /// List products
    List {
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 12)]
        size: u32,
        /// Search term
        #[arg(long)]
        search: Option<String>,
        /// Only discounted products
        #[arg(long)]
        on_sale: bool,
        /// Only featured products
        #[arg(long)]
        featured: bool,
    },
    /// Show one product
    Show {
        /// Product ID
        product_id: String,
    },
    /// List categories
    Categories {
        /// Only root categories, with their children nested
        #[arg(long)]
        root: bool,
    },
    /// Show one category
    Category {
        /// Category URL slug
        slug: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and totals
    List,
    /// Add a product
    Add {
        product_id: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity
    Update {
        product_id: String,
        #[arg(short, long)]
        quantity: u32,
    },
    /// Remove a line
    Remove { product_id: String },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show saved products
    List,
    /// Save a product
    Add { product_id: String },
    /// Unsave a product
    Remove { product_id: String },
    /// Flip a product's saved state
    Toggle { product_id: String },
    /// Empty the wishlist
    Clear,
}

#[derive(Subcommand)]
enum AccountAction {
    /// Show the signed-in identity
    Whoami,
    /// List saved addresses
    Addresses,
    /// Save a new address
    AddAddress {
        #[arg(long)]
        recipient: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        line1: String,
        #[arg(long)]
        line2: Option<String>,
        #[arg(long)]
        ward: String,
        #[arg(long)]
        district: String,
        #[arg(long)]
        province: String,
        #[arg(long)]
        postal_code: Option<String>,
        /// Make this the default address
        #[arg(long)]
        default: bool,
    },
    /// Mark an address as the default
    SetDefaultAddress { address_id: String },
    /// List past orders
    Orders {
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    /// Show one order
    Order { order_id: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PaymentArg {
    /// Cash on delivery
    Cod,
    /// Bank transfer via QR code
    BankQr,
}

impl From<PaymentArg> for PaymentMethod {
    fn from(arg: PaymentArg) -> Self {
        match arg {
            PaymentArg::Cod => Self::CashOnDelivery,
            PaymentArg::BankQr => Self::BankQr,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ShippingArg {
    Standard,
    Express,
}

impl From<ShippingArg> for ShippingMethod {
    fn from(arg: ShippingArg) -> Self {
        match arg {
            ShippingArg::Standard => Self::Standard,
            ShippingArg::Express => Self::Express,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let store = Storefront::new(&config)?;

    // Registration consumes the credentials itself instead of logging in.
    if let Commands::Register {
        first_name,
        last_name,
    } = &cli.command
    {
        let (email, password) = cli
            .email
            .as_deref()
            .zip(cli.password.as_deref())
            .ok_or("Registration needs --email and --password")?;
        commands::account::register(&store, email, first_name, last_name, password).await?;
        return Ok(());
    }

    if let (Some(email), Some(password)) = (&cli.email, &cli.password) {
        store.api().login(email, password).await?;
    }

    match cli.command {
        Commands::Browse { action } => match action {
            BrowseAction::List {
                page,
                size,
                search,
                on_sale,
                featured,
            } => commands::browse::list(&store, page, size, search, on_sale, featured).await?,
            BrowseAction::Show { product_id } => {
                commands::browse::show(&store, &product_id).await?;
            }
            BrowseAction::Categories { root } => {
                commands::browse::categories(&store, root).await?;
            }
            BrowseAction::Category { slug } => {
                commands::browse::category(&store, &slug).await?;
            }
        },
        Commands::Cart { action } => match action {
            CartAction::List => commands::cart::list(&store).await?,
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(&store, &product_id, quantity).await?,
            CartAction::Update {
                product_id,
                quantity,
            } => commands::cart::update(&store, &product_id, quantity).await?,
            CartAction::Remove { product_id } => {
                commands::cart::remove(&store, &product_id).await?;
            }
            CartAction::Clear => commands::cart::clear(&store).await?,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::List => commands::wishlist::list(&store).await?,
            WishlistAction::Add { product_id } => {
                commands::wishlist::add(&store, &product_id).await?;
            }
            WishlistAction::Remove { product_id } => {
                commands::wishlist::remove(&store, &product_id).await?;
            }
            WishlistAction::Toggle { product_id } => {
                commands::wishlist::toggle(&store, &product_id).await?;
            }
            WishlistAction::Clear => commands::wishlist::clear(&store).await?,
        },
        Commands::Account { action } => match action {
            AccountAction::Whoami => commands::account::whoami(&store)?,
            AccountAction::Addresses => commands::account::addresses(&store).await?,
            AccountAction::AddAddress {
                recipient,
                phone,
                line1,
                line2,
                ward,
                district,
                province,
                postal_code,
                default,
            } => {
                let form = lotus_threads_core::AddressForm {
                    recipient_name: recipient,
                    phone_number: phone,
                    address_line1: line1,
                    address_line2: line2,
                    ward,
                    district,
                    province_city: province,
                    postal_code,
                    is_default: default,
                };
                commands::account::add_address(&store, form).await?;
            }
            AccountAction::SetDefaultAddress { address_id } => {
                commands::account::set_default_address(&store, &address_id).await?;
            }
            AccountAction::Orders { page } => commands::account::orders(&store, page).await?,
            AccountAction::Order { order_id } => {
                commands::account::order(&store, &order_id).await?;
            }
        },
        Commands::Checkout {
            address_id,
            payment,
            shipping,
            note,
        } => {
            commands::checkout::run(&store, &address_id, payment.into(), shipping.into(), note)
                .await?;
        }
        // Handled before the login step above.
        Commands::Register { .. } => unreachable!(),
        Commands::Pay { order_id, callback } => match callback {
            Some(query) => commands::pay::resolve(&query)?,
            None => commands::pay::watch(&store, &order_id).await?,
        },
    }

    Ok(())
}
