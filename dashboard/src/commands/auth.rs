//! Session commands

use colored::Colorize;
use tracing::warn;

use crate::authn::session::SessionState;
use crate::commands::{arg_value, required_arg, CliArgs, Context};
use crate::errors::DashboardError;
use crate::views::auth_form::{AuthForm, AuthMode};
use crate::views::profile::ProfileView;

pub async fn login(ctx: &Context, args: &CliArgs) -> Result<(), DashboardError> {
    authenticate(ctx, args, AuthMode::Login).await
}

pub async fn register(ctx: &Context, args: &CliArgs) -> Result<(), DashboardError> {
    authenticate(ctx, args, AuthMode::Register).await
}

async fn authenticate(ctx: &Context, args: &CliArgs, mode: AuthMode) -> Result<(), DashboardError> {
    let form = AuthForm::new(mode, ctx.http.clone(), ctx.navigator.clone());
    form.set_email(required_arg(args, "email")?);
    form.set_password(required_arg(args, "password")?);
    if let Some(nickname) = arg_value(args, "nickname") {
        form.set_nickname(nickname);
    }

    match form.submit().await {
        Ok(Some(token)) => {
            ctx.store.save(&token).await?;
            println!("[SUCCESS] {}", "Signed in".green());
            Ok(())
        }
        Ok(None) => {
            warn!("Backend set no session cookie");
            println!("[INFO] Signed in, but the backend issued no session cookie");
            Ok(())
        }
        Err(e) => {
            let message = form.snapshot().error.unwrap_or_else(|| e.user_message());
            eprintln!("[ERROR] {}", message.red());
            Err(e)
        }
    }
}

pub async fn logout(ctx: &Context) -> Result<(), DashboardError> {
    let session = ctx.session().await?;
    let view = ProfileView::new(
        ctx.http.clone(),
        session,
        ctx.navigator.clone(),
        ctx.options.views.notify_timeout,
    );
    view.logout().await?;
    ctx.store.clear().await?;
    println!("[SUCCESS] Logged out");
    Ok(())
}

pub async fn whoami(ctx: &Context) -> Result<(), DashboardError> {
    let session = ctx.session().await?;
    let view = ProfileView::new(
        ctx.http.clone(),
        session,
        ctx.navigator.clone(),
        ctx.options.views.notify_timeout,
    );

    match view.load().await {
        SessionState::Authenticated(user) => {
            println!("[{}] {} ({})", user.initial(), user.nickname.bold(), user.id);
            if !user.role.is_empty() {
                println!("Role: {}", user.role);
            }
            Ok(())
        }
        SessionState::Anonymous => {
            println!("Not signed in. Use --login --email=<email> --password=<password>");
            Ok(())
        }
        SessionState::Unauthorized => {
            eprintln!("[ERROR] {}", "Session rejected by the backend".red());
            Err(DashboardError::Unauthorized)
        }
        SessionState::Failed(message) => {
            eprintln!("[ERROR] {}", message.red());
            Err(DashboardError::Internal(message))
        }
    }
}
