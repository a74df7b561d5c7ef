//! Customer registration command.
//!
//! Runs the same validator as the server first and prints every field error
//! at once, so a bad submission never leaves the machine.
//!
//! # Environment Variables
//!
//! - `REGISTRY_URL` - Base URL of the server (default: `http://127.0.0.1:3000`)

use clap::Args;
use customer_registry_core::i18n::Message;
use customer_registry_core::{CustomerData, Locale, ValidationErrors, validate};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::client::{ClientError, RegistryClient};

/// Arguments of `cr-cli register`.
#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Full name
    #[arg(long)]
    full_name: String,

    /// Tax id (CPF), masked or digits only
    #[arg(long)]
    tax_id: String,

    /// Email address
    #[arg(long)]
    email: String,

    /// Favorite color (RED, ORANGE, YELLOW, GREEN, BLUE, INDIGO, VIOLET)
    #[arg(long)]
    color: String,

    /// Free-form notes
    #[arg(long)]
    notes: Option<String>,

    /// Server base URL
    #[arg(long, env = "REGISTRY_URL", default_value = "http://127.0.0.1:3000")]
    server: String,
}

impl RegisterArgs {
    fn payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("fullName".to_owned(), Value::from(self.full_name.as_str()));
        payload.insert("cpf".to_owned(), Value::from(self.tax_id.as_str()));
        payload.insert("email".to_owned(), Value::from(self.email.as_str()));
        payload.insert("favoriteColor".to_owned(), Value::from(self.color.as_str()));
        if let Some(notes) = &self.notes {
            payload.insert("observations".to_owned(), Value::from(notes.as_str()));
        }
        Value::Object(payload)
    }
}

/// Errors that can occur while registering.
#[derive(Debug, Error)]
pub enum RegisterError {
    /// Local validation failed; the messages were already printed.
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(ValidationErrors),

    /// The server rejected the request or could not be reached.
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Validate, submit, and print the created customer.
pub async fn run(args: RegisterArgs, locale: Locale) -> Result<(), RegisterError> {
    let customer = match validate(&args.payload()) {
        Ok(customer) => customer,
        Err(errors) => {
            #[allow(clippy::print_stderr)]
            {
                for message in errors.messages(locale) {
                    eprintln!("- {message}");
                }
            }
            return Err(RegisterError::Invalid(errors));
        }
    };

    let client = RegistryClient::new(&args.server, locale);

    tracing::info!("Submitting registration to {}", args.server);
    let created = client.create_customer(&customer).await?;

    #[allow(clippy::print_stdout)]
    {
        for line in summary(&created, locale) {
            println!("{line}");
        }
    }
    Ok(())
}

/// Lines describing a created customer, in `locale`.
fn summary(created: &CustomerData, locale: Locale) -> Vec<String> {
    let field = |label: Message, value: String| {
        format!("  {:<11} {value}", label.text(locale) + ":")
    };

    vec![
        format!(
            "{} {} <{}>",
            Message::Registered.text(locale),
            created.full_name,
            created.email
        ),
        field(Message::IdLabel, created.id.to_string()),
        field(
            Message::ColorLabel,
            created.favorite_color.label(locale).to_string(),
        ),
        field(Message::CreatedAtLabel, created.created_at.to_rfc3339()),
    ]
}
