//! New-job form
//!
//! Submission needs three things: a model id obtained from the signed
//! upload (never typed in), a UUID-shaped target printer, and a time when
//! scheduling is selected. [`JobForm::validate`] checks all three without
//! touching the network and records a message per failing field.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use openapi_client::{NewJobRequest, UploadSignRequest};
use tracing::{debug, info, warn};

use crate::errors::DashboardError;
use crate::filesys::file::File;
use crate::http::api::PrinterApi;
use crate::utils::is_uuid_shaped;
use crate::views::lock;
use crate::views::mount::Mounted;
use crate::views::navigation::{push_after, Navigator, Route};
use crate::views::notify::{Notification, Notifier};

/// Delay between a successful submission and returning to the printer page
pub const DEFAULT_NAVIGATE_DELAY: Duration = Duration::from_millis(800);

const GCODE_CONTENT_TYPE: &str = "text/x-gcode";
const BINARY_CONTENT_TYPE: &str = "application/octet-stream";

/// Form fields that can carry a validation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Name,
    Model,
    Printer,
    ScheduledTime,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Model => "model",
            FormField::Printer => "printer",
            FormField::ScheduledTime => "scheduledTime",
        }
    }
}

/// Validation messages keyed by field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<FormField, String>);

impl FieldErrors {
    pub fn single(field: FormField, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.insert(field, message);
        errors
    }

    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, message)| format!("{}: {}", field.as_str(), message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Check the submission preconditions
pub fn validate_fields(
    model_id: Option<&str>,
    target_printer: Option<&str>,
    is_scheduled: bool,
    scheduled_time: Option<&DateTime<Utc>>,
) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if model_id.map_or(true, str::is_empty) {
        errors.insert(FormField::Model, "Please upload a model file");
    }
    match target_printer.filter(|id| !id.is_empty()) {
        None => errors.insert(FormField::Printer, "Printer id is missing"),
        Some(id) if !is_uuid_shaped(id) => {
            errors.insert(FormField::Printer, "Printer id is not a valid UUID")
        }
        Some(_) => {}
    }
    if is_scheduled && scheduled_time.is_none() {
        errors.insert(FormField::ScheduledTime, "Scheduled time is required");
    }

    errors
}

/// Content type to declare for an upload
///
/// The file's own type wins; otherwise `.gcode` files are G-code and
/// everything else is opaque binary.
pub fn content_type_for(file_name: &str, declared: Option<&str>) -> String {
    match declared.filter(|t| !t.is_empty()) {
        Some(declared) => declared.to_string(),
        None if file_name.to_lowercase().ends_with(".gcode") => GCODE_CONTENT_TYPE.to_string(),
        None => BINARY_CONTENT_TYPE.to_string(),
    }
}

/// Read a user-entered time: RFC 3339, or `YYYY-MM-DDTHH:MM` in local time
pub fn parse_schedule_input(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M").ok()?;
    Local
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// A file picked for upload
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    /// Type reported by whatever picked the file, if anything
    pub declared_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub async fn from_file(file: &File) -> Result<Self, DashboardError> {
        Ok(Self {
            file_name: file.file_name(),
            declared_type: None,
            bytes: file.read_bytes().await?,
        })
    }
}

/// Result of a completed upload call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Bytes stored and the backend's model id adopted
    Adopted(String),
    /// Bytes stored but the sign reply carried no model id
    Stored,
    /// The sign reply had no destination; nothing was sent
    NotSigned,
}

/// Printer offered in the target selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterChoice {
    pub id: String,
    pub name: String,
}

/// Snapshot of the form
#[derive(Debug, Clone, Default)]
pub struct JobFormState {
    pub name: String,
    pub filament_material: String,
    pub filament_color: String,
    pub model_id: Option<String>,
    /// Storage key of the last upload, shown when no model id came back
    pub upload_key: Option<String>,
    pub selected_printer_id: Option<String>,
    pub is_scheduled: bool,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub printers: Vec<PrinterChoice>,
    pub uploading: bool,
    pub submitting: bool,
    pub errors: FieldErrors,
}

/// Timing knobs for the form
#[derive(Debug, Clone, Copy)]
pub struct JobFormOptions {
    pub notify_timeout: Duration,
    pub navigate_delay: Duration,
}

impl Default for JobFormOptions {
    fn default() -> Self {
        Self {
            notify_timeout: crate::views::notify::DEFAULT_NOTIFY_TIMEOUT,
            navigate_delay: DEFAULT_NAVIGATE_DELAY,
        }
    }
}

pub struct JobForm {
    /// Printer id from the route; pins the selection when present
    route_printer_id: Option<String>,
    api: Arc<dyn PrinterApi>,
    navigator: Arc<dyn Navigator>,
    notifier: Notifier,
    mounted: Mounted,
    navigate_delay: Duration,
    state: Mutex<JobFormState>,
}

impl JobForm {
    pub fn new(
        route_printer_id: Option<String>,
        api: Arc<dyn PrinterApi>,
        navigator: Arc<dyn Navigator>,
        options: JobFormOptions,
    ) -> Self {
        let route_printer_id = route_printer_id.filter(|id| !id.is_empty());
        Self {
            state: Mutex::new(JobFormState {
                selected_printer_id: route_printer_id.clone(),
                ..Default::default()
            }),
            route_printer_id,
            api,
            navigator,
            notifier: Notifier::new(options.notify_timeout),
            mounted: Mounted::new(),
            navigate_delay: options.navigate_delay,
        }
    }

    pub fn mounted(&self) -> Mounted {
        self.mounted.clone()
    }

    pub fn unmount(&self) {
        self.mounted.unmount();
    }

    pub fn snapshot(&self) -> JobFormState {
        lock(&self.state).clone()
    }

    pub fn notification(&self) -> Option<Notification> {
        self.notifier.current()
    }

    /// Fill the printer selector; failures leave it empty
    pub async fn load_printers(&self) {
        let result = self.api.list_printers().await;
        if !self.mounted.is_mounted() {
            return;
        }
        match result {
            Ok(printers) => {
                lock(&self.state).printers = printers
                    .into_iter()
                    .map(|p| PrinterChoice {
                        id: p.id,
                        name: p.name,
                    })
                    .collect();
            }
            Err(e) => debug!("Ignoring printer list failure: {}", e),
        }
    }

    pub fn set_name(&self, name: impl Into<String>) {
        lock(&self.state).name = name.into();
    }

    pub fn set_filament_material(&self, material: impl Into<String>) {
        lock(&self.state).filament_material = material.into();
    }

    pub fn set_filament_color(&self, color: impl Into<String>) {
        lock(&self.state).filament_color = color.into();
    }

    /// Change the target printer; refused when the route pins one
    pub fn select_printer(&self, printer_id: Option<String>) -> bool {
        if self.route_printer_id.is_some() {
            return false;
        }
        lock(&self.state).selected_printer_id = printer_id.filter(|id| !id.is_empty());
        true
    }

    /// The printer the job will be queued on
    pub fn target_printer(&self) -> Option<String> {
        lock(&self.state)
            .selected_printer_id
            .clone()
            .or_else(|| self.route_printer_id.clone())
    }

    pub fn start_now(&self) {
        let mut state = lock(&self.state);
        state.is_scheduled = false;
        state.scheduled_time = None;
    }

    /// Switch to scheduling; proposes one hour from now if no time is set
    pub fn schedule(&self) {
        let mut state = lock(&self.state);
        state.is_scheduled = true;
        if state.scheduled_time.is_none() {
            state.scheduled_time = Some(Utc::now() + chrono::Duration::hours(1));
        }
    }

    /// Set the scheduled time; clearing it falls back to "start now"
    pub fn set_scheduled_time(&self, time: Option<DateTime<Utc>>) {
        let mut state = lock(&self.state);
        state.is_scheduled = time.is_some();
        state.scheduled_time = time;
    }

    /// Run validation and record the messages; `true` when submittable
    pub fn validate(&self) -> bool {
        let target = self.target_printer();
        let mut state = lock(&self.state);
        state.errors = validate_fields(
            state.model_id.as_deref(),
            target.as_deref(),
            state.is_scheduled,
            state.scheduled_time.as_ref(),
        );
        state.errors.is_empty()
    }

    /// Upload a model file through a signed destination
    ///
    /// Any model id from an earlier upload is discarded first, so a failed
    /// upload always leaves submission blocked.
    pub async fn upload(&self, file: FileUpload) -> Result<UploadOutcome, DashboardError> {
        let content_type = content_type_for(&file.file_name, file.declared_type.as_deref());
        {
            let mut state = lock(&self.state);
            state.uploading = true;
            state.model_id = None;
            state.upload_key = None;
        }

        let result = self.upload_inner(file, &content_type).await;
        if !self.mounted.is_mounted() {
            return result;
        }

        match &result {
            Ok(UploadOutcome::Adopted(model_id)) => {
                info!("Upload complete, model id {}", model_id);
                self.notifier.success("File uploaded");
            }
            Ok(UploadOutcome::Stored) => {
                warn!("Upload stored but the backend assigned no model id");
                self.notifier
                    .info("File uploaded, but no model id was assigned");
            }
            Ok(UploadOutcome::NotSigned) => {}
            Err(e) => {
                warn!("Upload failed: {}", e);
                self.notifier.error(e.user_message());
            }
        }
        lock(&self.state).uploading = false;
        result
    }

    async fn upload_inner(
        &self,
        file: FileUpload,
        content_type: &str,
    ) -> Result<UploadOutcome, DashboardError> {
        let signed = self
            .api
            .sign_upload(&UploadSignRequest {
                filename: file.file_name.clone(),
                content_type: content_type.to_string(),
            })
            .await?;

        let Some(url) = signed.url.filter(|u| !u.trim().is_empty()) else {
            debug!("Sign reply carried no upload URL for {}", file.file_name);
            return Ok(UploadOutcome::NotSigned);
        };

        self.api.upload_signed(&url, content_type, file.bytes).await?;

        if self.mounted.is_mounted() {
            let mut state = lock(&self.state);
            state.upload_key = signed.key;
            state.model_id = signed.model_id.clone();
        }
        Ok(match signed.model_id {
            Some(model_id) => UploadOutcome::Adopted(model_id),
            None => UploadOutcome::Stored,
        })
    }

    /// Build the queue-add payload from the current fields
    pub fn build_request(&self) -> Option<NewJobRequest> {
        let state = lock(&self.state);
        let model_id = state.model_id.clone()?;
        Some(NewJobRequest {
            name: non_empty(&state.name),
            model_id,
            filament_material: non_empty(&state.filament_material),
            filament_color: non_empty(&state.filament_color),
            scheduled_time: state
                .scheduled_time
                .filter(|_| state.is_scheduled)
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true)),
        })
    }

    /// Validate and queue the job
    ///
    /// On success the fields are reset and the page returns to the
    /// printer after the navigation delay.
    pub async fn submit(&self) -> Result<(), DashboardError> {
        if !self.validate() {
            let errors = lock(&self.state).errors.clone();
            debug!("Job form invalid: {}", errors);
            return Err(DashboardError::Validation(errors));
        }
        let (Some(printer_id), Some(request)) = (self.target_printer(), self.build_request()) else {
            return Err(DashboardError::Internal("validated form is incomplete".into()));
        };

        {
            let mut state = lock(&self.state);
            if state.submitting {
                return Err(DashboardError::Internal(
                    "A submission is already in progress".into(),
                ));
            }
            state.submitting = true;
        }

        let result = self.api.add_job(&printer_id, &request).await;
        if !self.mounted.is_mounted() {
            return result.map(|_| ());
        }

        let outcome = match result {
            Ok(_) => {
                info!("Job queued on printer {}", printer_id);
                self.reset_fields();
                self.notifier.success("Job created and added to the queue");
                push_after(
                    self.navigator.clone(),
                    self.mounted.clone(),
                    Route::Printer(printer_id),
                    self.navigate_delay,
                );
                Ok(())
            }
            Err(e) => {
                warn!("Failed to create job: {}", e);
                self.notifier.error(e.user_message());
                Err(e)
            }
        };
        lock(&self.state).submitting = false;
        outcome
    }

    /// Leave the form for the printer page
    pub fn back(&self) {
        match &self.route_printer_id {
            Some(id) => self.navigator.push(Route::Printer(id.clone())),
            None => self.navigator.push(Route::Dashboard),
        }
    }

    fn reset_fields(&self) {
        let mut state = lock(&self.state);
        state.name.clear();
        state.model_id = None;
        state.upload_key = None;
        state.filament_material.clear();
        state.filament_color.clear();
        state.is_scheduled = false;
        state.scheduled_time = None;
        state.errors = FieldErrors::default();
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
