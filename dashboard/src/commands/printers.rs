//! Printer list commands

use futures::future::join_all;
use openapi_client::InterfaceKind;

use crate::commands::render::{print_notification, printer_line};
use crate::commands::{arg_value, required_arg, CliArgs, Context};
use crate::errors::DashboardError;
use crate::views::printer_list::{CreatePrinterForm, PrinterListView, TestOutcome};

async fn mount_list(ctx: &Context) -> Result<PrinterListView, DashboardError> {
    let view = PrinterListView::new(
        ctx.backend().await?,
        ctx.navigator.clone(),
        ctx.options.views.notify_timeout,
    );
    view.load().await;
    Ok(view)
}

fn print_list(view: &PrinterListView) {
    let state = view.snapshot();
    if state.printers.is_empty() {
        println!("No printers yet. Add one with --add-printer --name=<name>");
        return;
    }
    for printer in &state.printers {
        println!("{}", printer_line(printer, state.testing.contains(&printer.id)));
    }
}

pub async fn list(ctx: &Context) -> Result<(), DashboardError> {
    let view = mount_list(ctx).await?;
    if let Some(error) = view.snapshot().error {
        eprintln!("[ERROR] {}", error);
        return Err(DashboardError::Internal(error));
    }
    print_list(&view);
    Ok(())
}

/// Test one printer, or every listed printer concurrently
pub async fn test_connection(ctx: &Context, args: &CliArgs) -> Result<(), DashboardError> {
    let view = mount_list(ctx).await?;
    let ids: Vec<String> = match arg_value(args, "test-connection") {
        Some(id) => vec![id.to_string()],
        None => view.snapshot().printers.into_iter().map(|p| p.id).collect(),
    };

    let outcomes = join_all(ids.iter().map(|id| view.test_connection(id))).await;
    for (id, outcome) in ids.iter().zip(&outcomes) {
        match outcome {
            TestOutcome::Reachable(status) => println!(
                "{}: {}",
                id,
                status.as_ref().map(|s| s.as_str()).unwrap_or("no status reported")
            ),
            TestOutcome::Failed(message) => eprintln!("{}: failed: {}", id, message),
            TestOutcome::AlreadyTesting | TestOutcome::Dropped => {}
        }
    }
    print_list(&view);
    Ok(())
}

pub async fn add_printer(ctx: &Context, args: &CliArgs) -> Result<(), DashboardError> {
    let interface = match arg_value(args, "interface") {
        Some(value) => value.parse::<InterfaceKind>().map_err(DashboardError::ConfigError)?,
        None => InterfaceKind::Lan,
    };
    let form = CreatePrinterForm {
        name: required_arg(args, "name")?.to_string(),
        model: arg_value(args, "model").unwrap_or_default().to_string(),
        interface,
    };

    let view = PrinterListView::new(
        ctx.backend().await?,
        ctx.navigator.clone(),
        ctx.options.views.notify_timeout,
    );
    view.open_create();
    let result = view.create_printer(form).await;
    print_notification(view.notification());
    let printer = result?;
    println!("{}", printer_line(&printer, false));
    Ok(())
}
