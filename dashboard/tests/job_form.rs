//! New-job form: upload, validation and submission

mod common;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use common::{printer, FakeBackend, PRINTER_ID};
use openapi_client::UploadSignResponse;
use printnet::errors::DashboardError;
use printnet::views::job_form::{FileUpload, FormField, JobForm, JobFormOptions, UploadOutcome};
use printnet::views::navigation::{RecordingNavigator, Route};
use printnet::views::notify::NotificationKind;
use serde_json::json;

fn form(backend: &Arc<FakeBackend>, printer_id: Option<&str>) -> (JobForm, Arc<RecordingNavigator>) {
    let navigator = Arc::new(RecordingNavigator::new());
    let form = JobForm::new(
        printer_id.map(String::from),
        backend.clone(),
        navigator.clone(),
        JobFormOptions::default(),
    );
    (form, navigator)
}

fn gcode() -> FileUpload {
    FileUpload {
        file_name: "cube.gcode".to_string(),
        declared_type: None,
        bytes: b"G28\nG1 X10\n".to_vec(),
    }
}

fn signed(model_id: Option<&str>) -> UploadSignResponse {
    UploadSignResponse {
        url: Some("https://storage.example.com/put?sig=abc".to_string()),
        key: Some("models/cube.gcode".to_string()),
        model_id: model_id.map(String::from),
    }
}

#[tokio::test(start_paused = true)]
async fn submit_posts_null_payload_and_returns_to_printer_after_delay() {
    let backend = FakeBackend::new();
    *backend.sign_reply.lock().unwrap() = signed(Some("m1"));
    let (form, navigator) = form(&backend, Some(PRINTER_ID));

    let outcome = form.upload(gcode()).await.unwrap();
    assert_eq!(outcome, UploadOutcome::Adopted("m1".to_string()));
    assert_eq!(form.snapshot().model_id.as_deref(), Some("m1"));

    form.submit().await.unwrap();

    let added = backend.added_jobs.lock().unwrap().clone();
    assert_eq!(
        added,
        vec![(
            PRINTER_ID.to_string(),
            json!({
                "name": null,
                "model_id": "m1",
                "filament_material": null,
                "filament_color": null,
                "scheduled_time": null
            })
        )]
    );
    let notification = form.notification().unwrap();
    assert_eq!(notification.kind, NotificationKind::Success);
    assert_eq!(notification.message, "Job created and added to the queue");

    let state = form.snapshot();
    assert!(state.model_id.is_none());
    assert!(!state.submitting);

    tokio::time::sleep(Duration::from_millis(799)).await;
    assert!(navigator.history().is_empty());

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(navigator.history(), vec![Route::Printer(PRINTER_ID.to_string())]);
}

#[tokio::test]
async fn upload_uses_gcode_content_type_for_sign_and_put() {
    let backend = FakeBackend::new();
    *backend.sign_reply.lock().unwrap() = signed(Some("m1"));
    let (form, _) = form(&backend, Some(PRINTER_ID));

    form.upload(gcode()).await.unwrap();

    let sign = backend.sign_requests.lock().unwrap().clone();
    assert_eq!(sign[0].filename, "cube.gcode");
    assert_eq!(sign[0].content_type, "text/x-gcode");
    let uploads = backend.uploads.lock().unwrap().clone();
    assert_eq!(
        uploads,
        vec![(
            "https://storage.example.com/put?sig=abc".to_string(),
            "text/x-gcode".to_string(),
            11
        )]
    );
    assert_eq!(form.notification().unwrap().message, "File uploaded");
    assert_eq!(form.snapshot().upload_key.as_deref(), Some("models/cube.gcode"));
}

#[tokio::test]
async fn upload_without_url_sends_nothing_and_stays_quiet() {
    let backend = FakeBackend::new();
    *backend.sign_reply.lock().unwrap() = UploadSignResponse::default();
    let (form, _) = form(&backend, Some(PRINTER_ID));

    let outcome = form.upload(gcode()).await.unwrap();

    assert_eq!(outcome, UploadOutcome::NotSigned);
    assert!(backend.uploads.lock().unwrap().is_empty());
    assert!(form.notification().is_none());
    assert!(form.snapshot().model_id.is_none());
    assert!(!form.snapshot().uploading);
}

#[tokio::test]
async fn upload_with_blank_url_sends_nothing() {
    let backend = FakeBackend::new();
    *backend.sign_reply.lock().unwrap() = UploadSignResponse {
        url: Some(String::new()),
        key: Some("models/cube.gcode".to_string()),
        model_id: Some("m1".to_string()),
    };
    let (form, _) = form(&backend, Some(PRINTER_ID));

    let outcome = form.upload(gcode()).await.unwrap();

    assert_eq!(outcome, UploadOutcome::NotSigned);
    assert!(backend.uploads.lock().unwrap().is_empty());
    assert!(form.notification().is_none());
    assert!(form.snapshot().model_id.is_none());
}

#[tokio::test]
async fn upload_without_model_id_keeps_submission_blocked() {
    let backend = FakeBackend::new();
    *backend.sign_reply.lock().unwrap() = signed(None);
    let (form, _) = form(&backend, Some(PRINTER_ID));

    let outcome = form.upload(gcode()).await.unwrap();

    assert_eq!(outcome, UploadOutcome::Stored);
    assert_eq!(form.notification().unwrap().kind, NotificationKind::Info);
    assert!(form.snapshot().model_id.is_none());
    assert!(!form.validate());
}

#[tokio::test]
async fn failed_upload_clears_previous_model() {
    let backend = FakeBackend::new();
    *backend.sign_reply.lock().unwrap() = signed(Some("m1"));
    let (form, _) = form(&backend, Some(PRINTER_ID));
    form.upload(gcode()).await.unwrap();

    backend.fail("sign_upload", 500, Some("Storage offline"));
    let result = form.upload(gcode()).await;

    assert!(result.is_err());
    let notification = form.notification().unwrap();
    assert_eq!(notification.kind, NotificationKind::Error);
    assert_eq!(notification.message, "Storage offline");
    let state = form.snapshot();
    assert!(state.model_id.is_none());
    assert!(!state.uploading);
}

#[tokio::test]
async fn submit_without_model_is_blocked() {
    let backend = FakeBackend::new();
    let (form, _) = form(&backend, Some(PRINTER_ID));

    let result = form.submit().await;

    match result {
        Err(DashboardError::Validation(errors)) => {
            assert_eq!(errors.get(FormField::Model), Some("Please upload a model file"));
            assert!(errors.get(FormField::Printer).is_none());
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert!(backend.added_jobs.lock().unwrap().is_empty());
    assert!(form.snapshot().errors.get(FormField::Model).is_some());
}

#[tokio::test]
async fn submit_rejects_non_uuid_printer() {
    let backend = FakeBackend::new();
    *backend.sign_reply.lock().unwrap() = signed(Some("m1"));
    let (form, _) = form(&backend, Some("printer-1"));
    form.upload(gcode()).await.unwrap();

    let result = form.submit().await;

    match result {
        Err(DashboardError::Validation(errors)) => {
            assert_eq!(errors.get(FormField::Printer), Some("Printer id is not a valid UUID"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert!(backend.added_jobs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn scheduled_time_is_sent_as_iso_millis() {
    let backend = FakeBackend::new();
    *backend.sign_reply.lock().unwrap() = signed(Some("m1"));
    let (form, _) = form(&backend, Some(PRINTER_ID));
    form.upload(gcode()).await.unwrap();
    form.set_name("Cube");
    form.set_filament_material("PLA");
    form.set_filament_color("red");
    form.set_scheduled_time(Some(Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap()));

    form.submit().await.unwrap();

    let (_, body) = backend.added_jobs.lock().unwrap()[0].clone();
    assert_eq!(
        body,
        json!({
            "name": "Cube",
            "model_id": "m1",
            "filament_material": "PLA",
            "filament_color": "red",
            "scheduled_time": "2030-01-02T03:04:05.000Z"
        })
    );
}

#[tokio::test]
async fn choosing_schedule_proposes_an_hour_from_now() {
    let backend = FakeBackend::new();
    *backend.sign_reply.lock().unwrap() = signed(Some("m1"));
    let (form, _) = form(&backend, Some(PRINTER_ID));
    form.upload(gcode()).await.unwrap();

    let before = Utc::now();
    form.schedule();
    let state = form.snapshot();
    assert!(state.is_scheduled);
    let proposed = state.scheduled_time.unwrap();
    assert!(proposed >= before + chrono::Duration::minutes(59));

    let request = form.build_request().unwrap();
    let sent = request.scheduled_time.unwrap();
    assert!(sent.ends_with('Z'));
    let parsed: DateTime<Utc> = sent.parse().unwrap();
    assert_eq!(parsed.timestamp_millis(), proposed.timestamp_millis());

    form.set_scheduled_time(None);
    assert!(!form.snapshot().is_scheduled);
    assert!(form.build_request().unwrap().scheduled_time.is_none());

    form.schedule();
    form.start_now();
    assert!(form.build_request().unwrap().scheduled_time.is_none());
}

#[tokio::test(start_paused = true)]
async fn backend_rejection_keeps_fields_and_does_not_navigate() {
    let backend = FakeBackend::new();
    *backend.sign_reply.lock().unwrap() = signed(Some("m1"));
    backend.fail("add_job", 400, Some("Printer offline"));
    let (form, navigator) = form(&backend, Some(PRINTER_ID));
    form.upload(gcode()).await.unwrap();
    form.set_name("Cube");

    assert!(form.submit().await.is_err());

    let notification = form.notification().unwrap();
    assert_eq!(notification.kind, NotificationKind::Error);
    assert_eq!(notification.message, "Printer offline");
    let state = form.snapshot();
    assert_eq!(state.model_id.as_deref(), Some("m1"));
    assert_eq!(state.name, "Cube");
    assert!(!state.submitting);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(navigator.history().is_empty());
}

#[tokio::test(start_paused = true)]
async fn unmount_before_delay_skips_navigation() {
    let backend = FakeBackend::new();
    *backend.sign_reply.lock().unwrap() = signed(Some("m1"));
    let (form, navigator) = form(&backend, Some(PRINTER_ID));
    form.upload(gcode()).await.unwrap();
    form.submit().await.unwrap();

    form.unmount();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(navigator.history().is_empty());
}

#[tokio::test]
async fn pinned_printer_cannot_be_changed() {
    let backend = FakeBackend::new();
    let (form, _) = form(&backend, Some(PRINTER_ID));

    assert!(!form.select_printer(Some("22222222-2222-2222-2222-222222222222".to_string())));
    assert_eq!(form.target_printer().as_deref(), Some(PRINTER_ID));
}

#[tokio::test]
async fn unpinned_form_offers_printer_list() {
    let backend = FakeBackend::new();
    *backend.printers.lock().unwrap() = vec![printer(PRINTER_ID, "Prusa", None)];
    let (form, _) = form(&backend, None);

    form.load_printers().await;
    let choices = form.snapshot().printers;
    assert_eq!(choices.len(), 1);
    assert_eq!(choices[0].name, "Prusa");

    assert!(form.target_printer().is_none());
    assert!(form.select_printer(Some(choices[0].id.clone())));
    assert_eq!(form.target_printer().as_deref(), Some(PRINTER_ID));
}

#[tokio::test]
async fn printer_list_failure_is_ignored() {
    let backend = FakeBackend::new();
    backend.fail("list_printers", 500, None);
    let (form, _) = form(&backend, None);

    form.load_printers().await;

    assert!(form.snapshot().printers.is_empty());
    assert!(form.notification().is_none());
}
