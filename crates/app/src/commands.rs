//! Subcommand handlers.

use std::error::Error;

use alumni_application::LoginOutcome;
use alumni_domain::{Credentials, Identity, NotificationLevel, SessionEvent};
use alumni_infrastructure::SessionRuntime;
use serde::Serialize;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::cli::{Command, Toggle};

type CommandResult = Result<(), Box<dyn Error>>;

/// What `login` prints on success. Never includes the credential itself.
#[derive(Debug, Serialize)]
struct IdentitySummary<'a> {
    user: &'a str,
    roles: &'a [String],
    expires_at: Option<String>,
    token: String,
}

impl<'a> From<&'a Identity> for IdentitySummary<'a> {
    fn from(identity: &'a Identity) -> Self {
        Self {
            user: identity.user(),
            roles: identity.roles(),
            expires_at: identity.expires_at().map(|t| t.to_rfc3339()),
            token: identity.token_preview(),
        }
    }
}

/// Runs a subcommand and saves cookies for the next run.
pub async fn run(
    runtime: &SessionRuntime,
    events: &mut UnboundedReceiver<SessionEvent>,
    command: Command,
) -> CommandResult {
    let result = match command {
        Command::Login {
            username,
            password,
            remember,
            redirect,
            keep_alive,
        } => {
            let credentials = Credentials::new(username, password)?;
            let redirect = redirect.unwrap_or_else(|| runtime.config().default_redirect.clone());
            login(runtime, events, &credentials, &redirect, remember, keep_alive).await
        }
        Command::Refresh => refresh(runtime).await,
        Command::Logout => {
            runtime.controller().logout().await;
            Ok(())
        }
        Command::Remember { setting } => {
            runtime.controller().set_persist(setting.enabled()).await;
            println!(
                "stay signed in: {}",
                if setting == Toggle::On { "on" } else { "off" }
            );
            Ok(())
        }
    };

    runtime.checkpoint().await;
    print_events(events);
    result
}

async fn login(
    runtime: &SessionRuntime,
    events: &mut UnboundedReceiver<SessionEvent>,
    credentials: &Credentials,
    redirect: &str,
    remember: bool,
    keep_alive: bool,
) -> CommandResult {
    let controller = runtime.controller();
    if remember {
        controller.set_persist(true).await;
    }

    match controller.login(credentials, redirect).await {
        LoginOutcome::Authenticated(identity) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&IdentitySummary::from(&identity))?
            );
        }
        LoginOutcome::Failed { message, .. } => return Err(message.into()),
        LoginOutcome::Superseded => return Err("login was superseded".into()),
    }

    if keep_alive {
        runtime.checkpoint().await;
        print_events(events);
        keep_session_alive(runtime).await?;
    }
    Ok(())
}

async fn refresh(runtime: &SessionRuntime) -> CommandResult {
    let controller = runtime.controller();
    if !controller.store().persist() {
        return Err("\"stay signed in\" is off; run `alumni-session remember on` first".into());
    }

    match controller.refresh().await {
        Some(_) => {
            if let Some(session) = controller.store().session() {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&IdentitySummary::from(&session.identity))?
                );
            }
            Ok(())
        }
        None => Err("refresh failed".into()),
    }
}

/// Refreshes ahead of expiry until Ctrl-C or until the session ends.
async fn keep_session_alive(runtime: &SessionRuntime) -> CommandResult {
    let controller = runtime.controller();
    if !controller.store().persist() {
        tracing::warn!("\"stay signed in\" is off; the session will not be refreshed");
    }

    let handle = runtime.spawn_refresh();
    let mut changes = controller.store().subscribe();
    tracing::info!("keeping session alive, press Ctrl-C to sign out");

    let signed_out = async {
        while changes.changed().await.is_ok() {
            if changes.borrow_and_update().session.is_none() {
                break;
            }
        }
    };

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal?;
            handle.cancel();
            controller.logout().await;
        }
        () = signed_out => {
            handle.cancel();
            tracing::info!("session ended");
        }
    }
    Ok(())
}

fn print_events(events: &mut UnboundedReceiver<SessionEvent>) {
    while let Ok(event) = events.try_recv() {
        match event {
            SessionEvent::Notify(notification) => match notification.level {
                NotificationLevel::Success => eprintln!("{}", notification.message),
                NotificationLevel::Error => eprintln!("error: {}", notification.message),
            },
            SessionEvent::Navigate(navigation) => eprintln!("-> {}", navigation.target),
        }
    }
}
