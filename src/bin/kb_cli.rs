//! kb-cli: command-line access to a Knowbase account
//!
//! Usage:
//!   kb-cli login <username> <password>      Sign in and keep the session in the OS keyring
//!   kb-cli whoami                           Show the signed-in user
//!   kb-cli logout                           Forget the local session
//!   kb-cli categories                       List categories
//!   kb-cli upload <path> [folder]           Upload a file to object storage

use knowbase_client::{
    ClientConfig, Credentials, HostCapabilities, KeyringStore, KnowbaseClient, LogHost,
};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "version" | "--version" | "-V" => {
            println!("kb-cli {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        "help" | "--help" | "-h" => {
            print_usage();
            return;
        }
        _ => {}
    }

    let client = build_client();
    let result = match args[1].as_str() {
        "login" => cmd_login(&client, &args[2..]).await,
        "whoami" => cmd_whoami(&client).await,
        "logout" => {
            client.user().logout();
            println!("Signed out.");
            Ok(())
        }
        "categories" => cmd_categories(&client).await,
        "upload" => cmd_upload(&client, &args[2..]).await,
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error ({:?}): {e}", e.kind());
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"kb-cli - Knowbase command-line client

USAGE:
    kb-cli <COMMAND> [ARGS]

COMMANDS:
    login <username> <password>   Sign in; the token is kept in the OS keyring
    whoami                        Show the signed-in user
    logout                        Forget the local session
    categories                    List categories
    upload <path> [folder]        Upload a file (default folder: avatar)
    version                       Show version information
    help                          Show this help message

ENVIRONMENT:
    KB_ENV                        development | production
    KB_API_BASE_URL               Backend origin override
    RUST_LOG                      Log filter (e.g. knowbase_client=debug)"#
    );
}

fn build_client() -> KnowbaseClient {
    let config = ClientConfig::from_env().unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(1);
    });
    KnowbaseClient::builder()
        .config(config)
        .store(Arc::new(KeyringStore::default()))
        .host(Arc::new(LogHost::new(HostCapabilities::native())))
        .build()
        .unwrap_or_else(|e| {
            eprintln!("{e}");
            std::process::exit(1);
        })
}

async fn cmd_login(client: &KnowbaseClient, args: &[String]) -> knowbase_client::Result<()> {
    let (Some(username), Some(password)) = (args.first(), args.get(1)) else {
        eprintln!("Usage: kb-cli login <username> <password>");
        std::process::exit(1);
    };
    client
        .user()
        .login(&Credentials::new(username.as_str(), password.as_str()))
        .await?;
    println!("Signed in as {username}.");
    Ok(())
}

async fn cmd_whoami(client: &KnowbaseClient) -> knowbase_client::Result<()> {
    if !client.auth().is_authenticated() {
        println!("Not signed in.");
        return Ok(());
    }
    let info = client.user().info().await?;
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

async fn cmd_categories(client: &KnowbaseClient) -> knowbase_client::Result<()> {
    let categories = client.categories().list().await?;
    match categories.as_array() {
        Some(items) => {
            for item in items {
                let id = item.get("id").and_then(|v| v.as_i64()).unwrap_or_default();
                let name = item.get("name").and_then(|v| v.as_str()).unwrap_or("?");
                println!("{id:>6}  {name}");
            }
        }
        None => println!("{}", serde_json::to_string_pretty(&categories)?),
    }
    Ok(())
}

async fn cmd_upload(client: &KnowbaseClient, args: &[String]) -> knowbase_client::Result<()> {
    let Some(path) = args.first() else {
        eprintln!("Usage: kb-cli upload <path> [folder]");
        std::process::exit(1);
    };
    let folder = args.get(1).map(String::as_str);
    let envelope = client.uploads().upload_file(path.as_str(), folder).await?;
    match envelope.data.get("url").and_then(|v| v.as_str()) {
        Some(url) => println!("{url}"),
        None => println!("{}", serde_json::to_string_pretty(&envelope.data)?),
    }
    Ok(())
}
