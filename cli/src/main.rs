use std::io::Write as _;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use echo_chat_client::{
    AuthClient, ChatMessage, ClientConfig, ConnectionState, Origin, RealtimeClient, SessionStore,
};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Auth(#[from] echo_chat_client::AuthError),
    #[error("{0}")]
    Realtime(#[from] echo_chat_client::RealtimeError),
    #[error("failed to open session store: {0}")]
    Store(#[from] echo_chat_client::store::StoreError),
    #[error("not logged in; run `echo-chat login <email>` first")]
    NotLoggedIn,
    #[error("failed to read password: {0}")]
    PasswordPrompt(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "echo-chat", about = "Echo chat client")]
struct Cli {
    #[arg(long, env = "ECHO_API_URL", default_value = "http://127.0.0.1:1337")]
    base_url: String,

    /// Directory for the saved session and transcript.
    #[arg(long, env = "ECHO_STORE_DIR", default_value = ".echo-chat")]
    store_dir: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and log in.
    Register { email: String },
    /// Log in with an existing account.
    Login { email: String },
    /// Open the chat session (restores the saved login).
    Chat,
    /// Forget the saved session and transcript.
    Logout,
    /// Check that the server is reachable.
    Ping,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let config = ClientConfig::new(cli.base_url.trim_end_matches('/'), cli.store_dir.as_str());
    let store = Arc::new(SessionStore::open(&config.store_dir)?);
    let mut auth = AuthClient::new(config.clone(), Arc::clone(&store));

    match cli.command {
        Command::Register { email } => {
            let password = rpassword::prompt_password("Password: ")?;
            let user = auth.register(&email, &password).await?;
            println!("registered and logged in as {}", user.email);
            Ok(())
        }
        Command::Login { email } => {
            let password = rpassword::prompt_password("Password: ")?;
            let user = auth.login(&email, &password).await?;
            println!("logged in as {}", user.email);
            Ok(())
        }
        Command::Chat => run_chat(&config, &mut auth, store).await,
        Command::Logout => {
            auth.logout();
            println!("logged out");
            Ok(())
        }
        Command::Ping => run_ping(&config).await,
    }
}

async fn run_ping(config: &ClientConfig) -> Result<(), CliError> {
    let url = format!("{}/healthz", config.api_url);
    match reqwest_get(&url).await {
        Ok(()) => {
            println!("ok");
            Ok(())
        }
        Err(err) => Err(CliError::Auth(err)),
    }
}

async fn reqwest_get(url: &str) -> Result<(), echo_chat_client::AuthError> {
    let response = reqwest::get(url)
        .await
        .map_err(|_| echo_chat_client::AuthError::Connectivity)?;
    if response.status().is_success() {
        Ok(())
    } else {
        Err(echo_chat_client::AuthError::Unexpected)
    }
}

async fn run_chat(
    config: &ClientConfig,
    auth: &mut AuthClient,
    store: Arc<SessionStore>,
) -> Result<(), CliError> {
    let user = auth.restore_session().await?.ok_or(CliError::NotLoggedIn)?;
    let token = auth.token().ok_or(CliError::NotLoggedIn)?;

    println!("connected as {} (empty line or ctrl-d to quit)", user.email);

    let (client, mut inbound) =
        RealtimeClient::connect(config, &token, Arc::clone(&store)).await?;

    for message in client.transcript().messages() {
        print_message(message);
    }

    let mut state = client.state_watch();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Ok(Some(line)) = line else { break };
                if line.trim().is_empty() {
                    break;
                }
                match client.send_message(&line) {
                    Ok(message) => print_message(&message),
                    Err(err) => println!("! {err}"),
                }
                prompt();
            }
            echoed = inbound.recv() => {
                let Some(message) = echoed else { break };
                print_message(&message);
                prompt();
            }
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                match *state.borrow_and_update() {
                    ConnectionState::Connecting => println!("! reconnecting..."),
                    ConnectionState::Connected => println!("! reconnected"),
                    ConnectionState::Errored => {
                        println!("! connection lost, giving up");
                        break;
                    }
                    ConnectionState::Disconnected => break,
                }
            }
        }
    }

    client.close().await;
    println!("bye");
    Ok(())
}

fn print_message(message: &ChatMessage) {
    match message.origin {
        Origin::User => println!("you: {}", message.text),
        Origin::Server => println!("server: {}", message.text),
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}
