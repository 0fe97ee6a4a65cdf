//! Printer list and printer detail views against an in-memory backend

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{printer, FakeBackend, PRINTER_ID};
use openapi_client::{Job, PrinterStatus, TestConnectionResponse};
use printnet::views::navigation::{RecordingNavigator, Route};
use printnet::views::notify::{NotificationKind, DEFAULT_NOTIFY_TIMEOUT};
use printnet::views::printer_detail::PrinterDetailView;
use printnet::views::printer_list::{CreatePrinterForm, PrinterListView, TestOutcome};
use serde_json::json;
use tokio::sync::Notify;

fn list_view(backend: &Arc<FakeBackend>) -> (Arc<PrinterListView>, Arc<RecordingNavigator>) {
    let navigator = Arc::new(RecordingNavigator::new());
    let view = PrinterListView::new(backend.clone(), navigator.clone(), DEFAULT_NOTIFY_TIMEOUT);
    (Arc::new(view), navigator)
}

fn detail_view(
    backend: &Arc<FakeBackend>,
    printer_id: Option<&str>,
) -> (PrinterDetailView, Arc<RecordingNavigator>) {
    let navigator = Arc::new(RecordingNavigator::new());
    let view = PrinterDetailView::new(
        printer_id.map(String::from),
        backend.clone(),
        navigator.clone(),
        DEFAULT_NOTIFY_TIMEOUT,
    );
    (view, navigator)
}

// =============================== PRINTER LIST ================================== //

#[tokio::test]
async fn load_fills_list_and_clears_loading() {
    let backend = FakeBackend::new();
    *backend.printers.lock().unwrap() = vec![
        printer("p1", "Prusa", Some("IDLE")),
        printer("p2", "Ender", None),
    ];
    let (view, _) = list_view(&backend);
    assert!(view.snapshot().loading);

    view.load().await;

    let state = view.snapshot();
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert_eq!(state.printers.len(), 2);
    assert_eq!(state.printers[1].status_label(), "Unknown");
}

#[tokio::test]
async fn load_failure_is_reported() {
    let backend = FakeBackend::new();
    backend.fail("list_printers", 500, Some("Database unavailable"));
    let (view, _) = list_view(&backend);

    view.load().await;

    let state = view.snapshot();
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Database unavailable"));
    assert!(state.printers.is_empty());
}

#[tokio::test]
async fn successful_test_updates_status_and_clears_busy_flag() {
    let backend = FakeBackend::new();
    *backend.printers.lock().unwrap() = vec![printer("p1", "Prusa", Some("OFFLINE"))];
    backend.test_replies.lock().unwrap().insert(
        "p1".to_string(),
        TestConnectionResponse {
            status: Some(PrinterStatus::from("ONLINE")),
            message: None,
        },
    );
    let (view, _) = list_view(&backend);
    view.load().await;

    let outcome = view.test_connection("p1").await;

    assert_eq!(outcome, TestOutcome::Reachable(Some(PrinterStatus::from("ONLINE"))));
    let state = view.snapshot();
    assert_eq!(state.printers[0].status_label(), "ONLINE");
    assert!(!view.is_testing("p1"));
    assert_eq!(
        view.notification().map(|n| n.kind),
        Some(NotificationKind::Success)
    );
}

#[tokio::test]
async fn failed_test_clears_busy_flag_and_notifies() {
    let backend = FakeBackend::new();
    *backend.printers.lock().unwrap() = vec![printer("p1", "Prusa", Some("IDLE"))];
    backend.fail("test_connection", 502, Some("Printer unreachable"));
    let (view, _) = list_view(&backend);
    view.load().await;

    let outcome = view.test_connection("p1").await;

    assert_eq!(outcome, TestOutcome::Failed("Printer unreachable".to_string()));
    assert!(!view.is_testing("p1"));
    assert_eq!(view.snapshot().printers[0].status_label(), "IDLE");
    let notification = view.notification().unwrap();
    assert_eq!(notification.kind, NotificationKind::Error);
    assert!(notification.message.contains("Printer unreachable"));
}

#[tokio::test]
async fn second_test_while_one_is_running_is_refused() {
    let backend = FakeBackend::new();
    *backend.printers.lock().unwrap() = vec![printer("p1", "Prusa", None)];
    let gate = Arc::new(Notify::new());
    *backend.test_gate.lock().unwrap() = Some(gate.clone());
    let (view, _) = list_view(&backend);
    view.load().await;

    let first = {
        let view = view.clone();
        tokio::spawn(async move { view.test_connection("p1").await })
    };
    while !view.is_testing("p1") {
        tokio::task::yield_now().await;
    }

    assert_eq!(view.test_connection("p1").await, TestOutcome::AlreadyTesting);

    gate.notify_one();
    assert_eq!(first.await.unwrap(), TestOutcome::Reachable(None));
    assert!(!view.is_testing("p1"));
}

#[tokio::test]
async fn reply_after_unmount_is_dropped() {
    let backend = FakeBackend::new();
    *backend.printers.lock().unwrap() = vec![printer("p1", "Prusa", Some("OFFLINE"))];
    backend.test_replies.lock().unwrap().insert(
        "p1".to_string(),
        TestConnectionResponse {
            status: Some(PrinterStatus::from("ONLINE")),
            message: None,
        },
    );
    let gate = Arc::new(Notify::new());
    *backend.test_gate.lock().unwrap() = Some(gate.clone());
    let (view, _) = list_view(&backend);
    view.load().await;

    let pending = {
        let view = view.clone();
        tokio::spawn(async move { view.test_connection("p1").await })
    };
    while !view.is_testing("p1") {
        tokio::task::yield_now().await;
    }
    view.unmount();
    gate.notify_one();

    assert_eq!(pending.await.unwrap(), TestOutcome::Dropped);
    assert_eq!(view.snapshot().printers[0].status_label(), "OFFLINE");
    assert!(view.notification().is_none());
}

#[tokio::test]
async fn created_printer_is_prepended() {
    let backend = FakeBackend::new();
    *backend.printers.lock().unwrap() = vec![printer("p1", "Prusa", Some("IDLE"))];
    *backend.created_reply.lock().unwrap() = json!({ "id": "p2", "name": "Voron" });
    let (view, _) = list_view(&backend);
    view.load().await;
    view.open_create();

    let created = view
        .create_printer(CreatePrinterForm {
            name: "Voron".to_string(),
            model: "2.4".to_string(),
            interface: openapi_client::InterfaceKind::OctoPrint,
        })
        .await
        .unwrap();

    assert_eq!(created.id, "p2");
    assert_eq!(created.model, "2.4");
    let state = view.snapshot();
    assert!(!state.create_open);
    let ids: Vec<&str> = state.printers.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p2", "p1"]);
}

#[tokio::test]
async fn printer_name_is_required() {
    let backend = FakeBackend::new();
    let (view, _) = list_view(&backend);

    let result = view
        .create_printer(CreatePrinterForm {
            name: "   ".to_string(),
            model: String::new(),
            interface: openapi_client::InterfaceKind::Lan,
        })
        .await;

    assert!(result.is_err());
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn view_navigates_to_detail() {
    let backend = FakeBackend::new();
    let (view, navigator) = list_view(&backend);
    view.view("p 1");
    assert_eq!(navigator.last(), Some(Route::Printer("p 1".to_string())));
    assert_eq!(navigator.last().unwrap().path(), "/dashboard/printer/p%201");
}

// =============================== PRINTER DETAIL ================================== //

fn jobs() -> Vec<Job> {
    vec![
        Job::from_value(
            0,
            &json!({ "id": "j1", "status": "RUNNING", "steps": [{ "name": "Heat", "state": "done" }, {}] }),
        ),
        Job::from_value(1, &json!({ "_id": "j2", "status": "SCHEDULED", "scheduled_time": "2030-01-01T00:00:00.000Z" })),
    ]
}

#[tokio::test]
async fn detail_loads_printer_then_queue_and_selects_first_job() {
    let backend = FakeBackend::new();
    *backend.printer.lock().unwrap() = Some(printer(PRINTER_ID, "Prusa", Some("IDLE")));
    *backend.jobs.lock().unwrap() = jobs();
    let (view, _) = detail_view(&backend, Some(PRINTER_ID));

    view.load().await;

    assert_eq!(
        backend.calls(),
        vec![
            format!("get_printer {}", PRINTER_ID),
            format!("list_queue {}", PRINTER_ID)
        ]
    );
    let state = view.snapshot();
    assert!(!state.loading);
    assert_eq!(state.printer.as_ref().unwrap().name, "Prusa");
    assert_eq!(state.selected_job_id.as_deref(), Some("j1"));
    let steps: Vec<&str> = state.selected_steps().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(steps, vec!["Heat", "Step 2"]);

    view.select_job("j2");
    let state = view.snapshot();
    assert_eq!(state.selected_job().unwrap().pending_schedule(), Some("2030-01-01T00:00:00.000Z"));
    assert!(state.selected_steps().is_empty());
}

#[tokio::test]
async fn queue_is_not_fetched_when_printer_fetch_fails() {
    let backend = FakeBackend::new();
    backend.fail("get_printer", 404, Some("Printer not found"));
    let (view, _) = detail_view(&backend, Some(PRINTER_ID));

    view.load().await;

    assert_eq!(backend.calls(), vec![format!("get_printer {}", PRINTER_ID)]);
    let state = view.snapshot();
    assert_eq!(state.error.as_deref(), Some("Printer not found"));
    assert!(!state.loading);
}

#[tokio::test]
async fn missing_printer_id_makes_no_calls() {
    let backend = FakeBackend::new();
    let (view, _) = detail_view(&backend, Some(""));

    view.load().await;
    assert_eq!(view.snapshot().error.as_deref(), Some("Printer ID is missing"));

    assert!(!view.start().await);
    assert_eq!(view.notification().unwrap().message, "Printer ID is missing");
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn start_sets_ready_and_patches_printer() {
    let backend = FakeBackend::new();
    *backend.printer.lock().unwrap() = Some(printer(PRINTER_ID, "Prusa", Some("IDLE")));
    let (view, _) = detail_view(&backend, Some(PRINTER_ID));
    view.load().await;

    assert!(view.start().await);

    assert_eq!(
        *backend.status_updates.lock().unwrap(),
        vec![(PRINTER_ID.to_string(), PrinterStatus::Ready)]
    );
    assert_eq!(view.snapshot().printer.unwrap().status, Some(PrinterStatus::Ready));
    let notification = view.notification().unwrap();
    assert_eq!(notification.kind, NotificationKind::Success);
    assert_eq!(notification.message, "Printer status set to READY");
}

#[tokio::test]
async fn start_failure_leaves_status_alone() {
    let backend = FakeBackend::new();
    *backend.printer.lock().unwrap() = Some(printer(PRINTER_ID, "Prusa", Some("ERROR")));
    backend.fail("update_printer_status", 409, Some("Printer is busy"));
    let (view, _) = detail_view(&backend, Some(PRINTER_ID));
    view.load().await;

    assert!(!view.start().await);

    assert_eq!(view.snapshot().printer.unwrap().status, Some(PrinterStatus::Error));
    assert_eq!(
        view.notification().unwrap().message,
        "Failed to set status: Printer is busy"
    );
}

#[tokio::test(start_paused = true)]
async fn notification_clears_after_timeout() {
    let backend = FakeBackend::new();
    *backend.printer.lock().unwrap() = Some(printer(PRINTER_ID, "Prusa", None));
    let (view, _) = detail_view(&backend, Some(PRINTER_ID));
    view.load().await;
    view.start().await;
    assert!(view.notification().is_some());

    tokio::time::sleep(DEFAULT_NOTIFY_TIMEOUT + Duration::from_millis(10)).await;
    assert!(view.notification().is_none());
}

#[tokio::test]
async fn new_job_navigates_to_form() {
    let backend = FakeBackend::new();
    let (view, navigator) = detail_view(&backend, Some(PRINTER_ID));
    view.new_job();
    assert_eq!(
        navigator.last().unwrap().path(),
        format!("/dashboard/printer/{}/jobs/new", PRINTER_ID)
    );
}

#[test]
fn new_job_without_id_works_outside_runtime() {
    let backend = FakeBackend::new();
    let (view, navigator) = detail_view(&backend, None);

    view.new_job();

    assert!(navigator.history().is_empty());
    assert_eq!(view.notification().unwrap().kind, NotificationKind::Error);
}
