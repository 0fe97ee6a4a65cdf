//! Printer detail and job commands

use std::path::PathBuf;
use std::time::Duration;

use colored::Colorize;

use crate::commands::render::{job_line, print_notification, printer_line};
use crate::commands::{arg_value, required_arg, CliArgs, Context};
use crate::errors::DashboardError;
use crate::filesys::file::File;
use crate::views::job_form::{parse_schedule_input, FileUpload, JobForm, UploadOutcome};
use crate::views::printer_detail::PrinterDetailView;

async fn mount_detail(ctx: &Context, printer_id: &str) -> Result<PrinterDetailView, DashboardError> {
    let view = PrinterDetailView::new(
        Some(printer_id.to_string()),
        ctx.backend().await?,
        ctx.navigator.clone(),
        ctx.options.views.notify_timeout,
    );
    view.load().await;
    Ok(view)
}

/// Show a printer and its queue; `--job=<id>` picks the expanded job
pub async fn show_printer(ctx: &Context, args: &CliArgs) -> Result<(), DashboardError> {
    let view = mount_detail(ctx, required_arg(args, "printer")?).await?;
    if let Some(job_id) = arg_value(args, "job") {
        view.select_job(job_id);
    }

    let state = view.snapshot();
    if let Some(error) = &state.error {
        eprintln!("[ERROR] {}", error.red());
    }
    let Some(printer) = &state.printer else {
        return Err(DashboardError::NotFound(format!(
            "printer {}",
            view.printer_id().unwrap_or_default()
        )));
    };

    println!("{}", printer_line(printer, false));
    if let Some(interface) = printer.interface {
        println!("Interface: {}", interface);
    }
    if let Some(job_id) = &printer.current_job_id {
        println!("Current job: {}", job_id);
    }
    println!();

    if state.jobs.is_empty() {
        println!("Queue is empty");
        return Ok(());
    }
    for job in &state.jobs {
        let selected = state.selected_job_id.as_deref() == Some(job.id.as_str());
        println!("{}", job_line(job, selected));
    }
    let steps = state.selected_steps();
    if !steps.is_empty() {
        println!();
        for (i, step) in steps.iter().enumerate() {
            println!(
                "  {}. {} {}",
                i + 1,
                step.name,
                step.state.as_deref().unwrap_or_default()
            );
        }
    }
    Ok(())
}

/// Put a printer into READY
pub async fn start(ctx: &Context, args: &CliArgs) -> Result<(), DashboardError> {
    let printer_id = arg_value(args, "start")
        .or_else(|| arg_value(args, "printer"))
        .map(str::to_string);
    let view = PrinterDetailView::new(
        printer_id,
        ctx.backend().await?,
        ctx.navigator.clone(),
        ctx.options.views.notify_timeout,
    );
    let started = view.start().await;
    print_notification(view.notification());
    if started {
        Ok(())
    } else {
        Err(DashboardError::Internal("printer was not started".to_string()))
    }
}

/// Upload a model and queue it
///
/// `--file=<path>` is required. `--schedule=<time>` takes RFC 3339 or
/// `YYYY-MM-DDTHH:MM` local time; a bare `--schedule` means one hour from
/// now.
pub async fn new_job(ctx: &Context, args: &CliArgs) -> Result<(), DashboardError> {
    let route_printer = arg_value(args, "new-job")
        .or_else(|| arg_value(args, "printer"))
        .map(str::to_string);
    let form = JobForm::new(
        route_printer,
        ctx.backend().await?,
        ctx.navigator.clone(),
        ctx.options.views.into(),
    );
    form.load_printers().await;

    if let Some(name) = arg_value(args, "name") {
        form.set_name(name);
    }
    if let Some(material) = arg_value(args, "material") {
        form.set_filament_material(material);
    }
    if let Some(color) = arg_value(args, "color") {
        form.set_filament_color(color);
    }
    match args.get("schedule").map(String::as_str) {
        Some("true") => form.schedule(),
        Some(input) => {
            let at = parse_schedule_input(input).ok_or_else(|| {
                DashboardError::ConfigError(format!("Unrecognised --schedule time: {}", input))
            })?;
            form.set_scheduled_time(Some(at));
        }
        None => form.start_now(),
    }

    let path = PathBuf::from(required_arg(args, "file")?);
    let mut upload = FileUpload::from_file(&File::new(path)).await?;
    upload.declared_type = arg_value(args, "content-type").map(str::to_string);

    let outcome = form.upload(upload).await;
    print_notification(form.notification());
    match outcome? {
        UploadOutcome::Adopted(model_id) => println!("Model id: {}", model_id),
        UploadOutcome::Stored => {}
        UploadOutcome::NotSigned => {
            eprintln!("[ERROR] {}", "The backend did not issue an upload URL".red());
        }
    }

    let submitted = form.submit().await;
    if let Err(DashboardError::Validation(errors)) = &submitted {
        for (field, message) in errors.iter() {
            eprintln!("[ERROR] {}: {}", field.as_str(), message.red());
        }
    }
    print_notification(form.notification());
    submitted?;

    // Give the delayed navigation a moment to land
    tokio::time::sleep(ctx.options.views.navigate_delay + Duration::from_millis(50)).await;
    if let Some(route) = ctx.navigator.last() {
        println!("Next: {}", route);
    }
    Ok(())
}
