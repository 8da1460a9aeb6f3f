//! Shopnado CLI - manage Shopify webhooks and credential profiles.
//!
//! # Usage
//!
//! ```bash
//! # Save credentials for a shop
//! shopnado profile create -n default -s my-shop -k <api key> -p <api password>
//!
//! # List webhooks using the default profile
//! shopnado webhook list
//!
//! # Use another profile from another store file
//! shopnado -c ./shops.yaml -p staging webhook list
//!
//! # Subscribe to a topic
//! shopnado webhook create -a https://example.com/hooks -t orders/create
//!
//! # Topics allowed by an API version
//! shopnado webhook topics 2020-04
//! ```
//!
//! # Commands
//!
//! - `webhook` (`wh`) - list, create, read, update and delete webhooks
//! - `profile` (`p`) - manage credential profiles in the store file

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use shopnado_cli::commands::webhook::WebhookChanges;
use shopnado_cli::commands::{profile, webhook};
use shopnado_cli::config::{DEFAULT_CONFIG_PATH, DEFAULT_EDITOR, DEFAULT_PROFILE};
use shopnado_cli::shopify::AdminClient;
use shopnado_cli::{CliError, CredentialInput, ProfileSelector, resolver};
use shopnado_core::{ApiVersion, Profile, WebhookFormat, WebhookId};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::{MakeWriterExt, OrElse, WithMaxLevel};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shopnado")]
#[command(author, version, about = "Manage Shopify webhooks and credential profiles")]
struct Cli {
    /// Filepath to the config yaml file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Profile to use from the config yaml file
    #[arg(short, long, default_value = DEFAULT_PROFILE)]
    profile: String,

    /// API key for Shopify
    #[arg(long)]
    apikey: Option<String>,

    /// API password for Shopify
    #[arg(long)]
    password: Option<String>,

    /// Shopify shop name, eg <shopname>.myshopify.com
    #[arg(long)]
    shopname: Option<String>,

    /// Turn on verbose debug logging
    #[arg(short, long)]
    debug: bool,

    /// Turn off all logging
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage webhook subscriptions (lists them by default)
    #[command(visible_alias = "wh")]
    Webhook {
        #[command(subcommand)]
        action: Option<WebhookAction>,
    },
    /// Manage credential profiles (lists them by default)
    #[command(visible_alias = "p")]
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },
}

#[derive(Subcommand)]
enum WebhookAction {
    /// List webhooks
    List,
    /// Create a webhook
    Create {
        /// Website URL address for the webhook to POST, https:// required
        #[arg(short, long)]
        address: Option<String>,

        /// Name of the Shopify webhook topic to subscribe
        #[arg(short, long)]
        topic: Option<String>,

        /// Format for the webhook payload (json or xml)
        #[arg(short, long, default_value = "json")]
        format: WebhookFormat,
    },
    /// Show a webhook
    Read {
        /// Webhook ID
        id: WebhookId,
    },
    /// Update a webhook's address, topic or format
    Update {
        /// Webhook ID to update
        id: WebhookId,

        /// Website URL address for the webhook to POST, https:// required
        #[arg(short, long)]
        address: Option<String>,

        /// Name of the Shopify webhook topic to subscribe
        #[arg(short, long)]
        topic: Option<String>,

        /// Format for the webhook payload (json or xml)
        #[arg(short, long)]
        format: Option<WebhookFormat>,
    },
    /// Delete a webhook, or all of them
    Delete {
        /// Webhook ID to delete
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        id: Option<WebhookId>,

        /// Delete all webhooks
        #[arg(short, long, visible_short_alias = 'A')]
        all: bool,
    },
    /// List the topics an API version accepts (best effort)
    Topics {
        /// API version, defaults to "stable"
        version: Option<String>,

        /// List the topics of every known API version
        #[arg(short, long, visible_short_alias = 'A')]
        all: bool,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// List profiles
    List {
        /// Config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,
    },
    /// Create or overwrite a profile
    Create {
        /// Config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        /// Name for the profile
        #[arg(short, long)]
        name: Option<String>,

        /// API key for Shopify
        #[arg(short = 'k', long, visible_alias = "key")]
        apikey: Option<String>,

        /// API password for Shopify
        #[arg(short, long, visible_alias = "pass")]
        password: Option<String>,

        /// Shopify shop name, eg <shopname>.myshopify.com
        #[arg(short, long, visible_alias = "shop")]
        shopname: Option<String>,
    },
    /// Show a profile
    Read {
        /// Config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        /// Name of the profile
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Update a profile (not implemented)
    Update {
        /// Config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        /// Name of the profile
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Delete a profile, or the whole config file
    Delete {
        /// Config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        /// Name of the profile
        #[arg(short, long)]
        name: Option<String>,

        /// Delete all entries in the config file
        #[arg(short, long, visible_short_alias = 'A')]
        all: bool,
    },
    /// Open the config file in an editor
    Edit {
        /// Config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        /// Which file editor to use
        #[arg(short, long, default_value = DEFAULT_EDITOR)]
        editor: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let quiet = cli.quiet;
    init_tracing(cli.debug, quiet);

    if let Err(e) = run(cli).await {
        // --quiet silences output, not the reason for a non-zero exit
        if quiet {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("{e}");
            }
        } else {
            tracing::error!("{e}");
        }
        std::process::exit(1);
    }
}

/// Plain message-only output by default, full events under `--debug`.
/// `RUST_LOG` overrides the level unless `--quiet` is given.
fn init_tracing(debug: bool, quiet: bool) {
    let env_filter = if quiet {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            if debug {
                "shopnado=debug,shopnado_cli=debug,info".into()
            } else {
                "info".into()
            }
        })
    };

    let plain_layer = (!debug).then(|| {
        tracing_subscriber::fmt::layer()
            .without_time()
            .with_target(false)
            .with_level(false)
            .with_writer(split_writer(std::io::stderr, std::io::stdout))
    });
    let debug_layer = debug.then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(plain_layer)
        .with(debug_layer)
        .init();
}

/// Send warnings and errors to `errors` and everything else to `output`.
fn split_writer<E, O>(errors: E, output: O) -> OrElse<WithMaxLevel<E>, O>
where
    E: for<'w> MakeWriter<'w>,
    O: for<'w> MakeWriter<'w>,
{
    errors.with_max_level(Level::WARN).or_else(output)
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Webhook { action } => {
            let credentials = resolver::resolve(
                &CredentialInput::from_env(),
                &CredentialInput {
                    shop_name: cli.shopname,
                    api_key: cli.apikey,
                    api_password: cli.password,
                },
                &ProfileSelector {
                    config: cli.config,
                    profile: cli.profile,
                },
            )?;
            let client = AdminClient::new(&credentials, ApiVersion::Stable)?;
            run_webhook(&client, action.unwrap_or(WebhookAction::List)).await
        }
        // A bare `profile` lists the store named by the top-level --config.
        Commands::Profile { action } => run_profile(action.unwrap_or(ProfileAction::List {
            config: cli.config,
        })),
    }
}

async fn run_webhook(client: &AdminClient, action: WebhookAction) -> Result<(), CliError> {
    match action {
        WebhookAction::List => {
            webhook::list(client).await?;
        }
        WebhookAction::Create {
            address,
            topic,
            format,
        } => {
            webhook::create(client, address, topic, format).await?;
        }
        WebhookAction::Read { id } => {
            webhook::read(client, id).await?;
        }
        WebhookAction::Update {
            id,
            address,
            topic,
            format,
        } => {
            let changes = WebhookChanges {
                address,
                topic,
                format,
            };
            webhook::update(client, id, changes).await?;
        }
        WebhookAction::Delete { all: true, .. } => {
            webhook::delete_all(client).await?;
        }
        WebhookAction::Delete { id, all: false } => {
            let id = id.ok_or_else(|| CliError::InvalidInput("webhook id is required".to_owned()))?;
            webhook::delete(client, id).await?;
        }
        WebhookAction::Topics { version, all } => {
            let versions = webhook::topic_versions(version.as_deref(), all)?;
            webhook::list_topics(client, &versions).await?;
        }
    }
    Ok(())
}

fn run_profile(action: ProfileAction) -> Result<(), CliError> {
    match action {
        ProfileAction::List { config } => {
            profile::list(&config)?;
        }
        ProfileAction::Create {
            config,
            name,
            apikey,
            password,
            shopname,
        } => {
            let credentials = Profile::new(
                shopname.unwrap_or_default(),
                apikey.unwrap_or_default(),
                password.unwrap_or_default(),
            );
            profile::create(&config, name.as_deref().unwrap_or_default(), credentials)?;
        }
        ProfileAction::Read { config, name } => {
            profile::read(&config, name.as_deref().unwrap_or_default())?;
        }
        ProfileAction::Update { config, name } => profile::update(&config, name.as_deref()),
        ProfileAction::Delete {
            config,
            all: true,
            ..
        } => profile::delete_all(&config)?,
        ProfileAction::Delete {
            config,
            name,
            all: false,
        } => {
            profile::delete(&config, name.as_deref().unwrap_or_default())?;
        }
        ProfileAction::Edit { config, editor } => profile::edit(&config, &editor)?,
    }
    Ok(())
}
