//! Printer list (dashboard) view

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use openapi_client::{CreatePrinterRequest, InterfaceKind, Printer, PrinterStatus};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::DashboardError;
use crate::http::api::PrinterApi;
use crate::utils::generate_uuid;
use crate::views::job_form::{FieldErrors, FormField};
use crate::views::lock;
use crate::views::mount::Mounted;
use crate::views::navigation::{Navigator, Route};
use crate::views::notify::{Notification, Notifier};

/// Snapshot of the dashboard page
#[derive(Debug, Clone, Default)]
pub struct PrinterListState {
    pub printers: Vec<Printer>,
    pub loading: bool,
    pub error: Option<String>,
    /// Ids with a connection test in flight
    pub testing: HashSet<String>,
    /// Whether the "add printer" form is open
    pub create_open: bool,
}

/// Input of the "add printer" form
#[derive(Debug, Clone)]
pub struct CreatePrinterForm {
    pub name: String,
    pub model: String,
    pub interface: InterfaceKind,
}

/// What a connection test call ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    /// The backend answered; carries the reported status, if any
    Reachable(Option<PrinterStatus>),
    Failed(String),
    /// A test for this printer was already running
    AlreadyTesting,
    /// The page was torn down before the reply arrived
    Dropped,
}

pub struct PrinterListView {
    api: Arc<dyn PrinterApi>,
    navigator: Arc<dyn Navigator>,
    notifier: Notifier,
    mounted: Mounted,
    state: Mutex<PrinterListState>,
}

impl PrinterListView {
    pub fn new(
        api: Arc<dyn PrinterApi>,
        navigator: Arc<dyn Navigator>,
        notify_timeout: Duration,
    ) -> Self {
        Self {
            api,
            navigator,
            notifier: Notifier::new(notify_timeout),
            mounted: Mounted::new(),
            state: Mutex::new(PrinterListState {
                loading: true,
                ..Default::default()
            }),
        }
    }

    pub fn mounted(&self) -> Mounted {
        self.mounted.clone()
    }

    pub fn unmount(&self) {
        self.mounted.unmount();
    }

    pub fn snapshot(&self) -> PrinterListState {
        lock(&self.state).clone()
    }

    pub fn notification(&self) -> Option<Notification> {
        self.notifier.current()
    }

    /// Fetch the printer collection once
    pub async fn load(&self) {
        {
            let mut state = lock(&self.state);
            state.loading = true;
            state.error = None;
        }

        let result = self.api.list_printers().await;
        if !self.mounted.is_mounted() {
            debug!("Printer list unmounted, dropping reply");
            return;
        }

        let mut state = lock(&self.state);
        match result {
            Ok(printers) => {
                debug!("Loaded {} printers", printers.len());
                state.printers = printers;
            }
            Err(e) => {
                warn!("Failed to fetch printers: {}", e);
                state.error = Some(e.user_message());
            }
        }
        state.loading = false;
    }

    /// Open a printer's detail page
    pub fn view(&self, printer_id: &str) {
        self.navigator.push(Route::Printer(printer_id.to_string()));
    }

    pub fn is_testing(&self, printer_id: &str) -> bool {
        lock(&self.state).testing.contains(printer_id)
    }

    /// Probe one printer through the backend
    ///
    /// A second test for the same id while one is running is refused.
    pub async fn test_connection(&self, printer_id: &str) -> TestOutcome {
        let name = {
            let mut state = lock(&self.state);
            if !state.testing.insert(printer_id.to_string()) {
                return TestOutcome::AlreadyTesting;
            }
            state
                .printers
                .iter()
                .find(|p| p.id == printer_id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| printer_id.to_string())
        };

        let result = self.api.test_connection(printer_id).await;
        if !self.mounted.is_mounted() {
            debug!("Printer list unmounted, dropping test result for {}", printer_id);
            return TestOutcome::Dropped;
        }

        let mut state = lock(&self.state);
        state.testing.remove(printer_id);
        match result {
            Ok(reply) => {
                if let Some(status) = &reply.status {
                    if let Some(printer) = state.printers.iter_mut().find(|p| p.id == printer_id) {
                        printer.status = Some(status.clone());
                    }
                }
                drop(state);
                let reported = reply
                    .status
                    .as_ref()
                    .map(PrinterStatus::as_str)
                    .unwrap_or("no status reported");
                info!("Connection test for {}: {}", printer_id, reported);
                self.notifier
                    .success(format!("Connection test for {}: {}", name, reported));
                TestOutcome::Reachable(reply.status)
            }
            Err(e) => {
                drop(state);
                let message = e.user_message();
                warn!("Connection test for {} failed: {}", printer_id, message);
                self.notifier
                    .error(format!("Connection test for {} failed: {}", name, message));
                TestOutcome::Failed(message)
            }
        }
    }

    pub fn open_create(&self) {
        lock(&self.state).create_open = true;
    }

    pub fn close_create(&self) {
        lock(&self.state).create_open = false;
    }

    /// Submit the "add printer" form and prepend the new printer
    pub async fn create_printer(&self, form: CreatePrinterForm) -> Result<Printer, DashboardError> {
        let name = form.name.trim().to_string();
        if name.is_empty() {
            let errors = FieldErrors::single(FormField::Name, "Printer name is required");
            self.notifier.error("Printer name is required");
            return Err(DashboardError::Validation(errors));
        }

        let request = CreatePrinterRequest {
            name,
            model: form.model.trim().to_string(),
            interface: form.interface,
        };
        let result = self.api.create_printer(&request).await;
        if !self.mounted.is_mounted() {
            return result.map(|reply| created_printer(&reply, &request));
        }

        match result {
            Ok(reply) => {
                let printer = created_printer(&reply, &request);
                info!("Created printer {} ({})", printer.name, printer.id);
                {
                    let mut state = lock(&self.state);
                    state.printers.insert(0, printer.clone());
                    state.create_open = false;
                }
                self.notifier.success(format!("Printer {} added", printer.name));
                Ok(printer)
            }
            Err(e) => {
                self.notifier
                    .error(format!("Failed to add printer: {}", e.user_message()));
                Err(e)
            }
        }
    }
}

/// The backend's record, with whatever it left out filled in from the form
fn created_printer(reply: &Value, request: &CreatePrinterRequest) -> Printer {
    let record = reply.get("printer").unwrap_or(reply);
    let mut printer = Printer::from_value(record).unwrap_or_else(|| Printer {
        id: format!("local-{}", generate_uuid()),
        name: request.name.clone(),
        model: request.model.clone(),
        interface: None,
        status: None,
        is_active: false,
        current_job_id: None,
        queue_id: None,
        last_updated: None,
    });

    if record.get("name").and_then(Value::as_str).is_none() {
        printer.name = request.name.clone();
    }
    if record.get("model").and_then(Value::as_str).is_none() {
        printer.model = request.model.clone();
    }
    printer.interface.get_or_insert(request.interface);
    printer.status.get_or_insert(PrinterStatus::Offline);
    printer
}
