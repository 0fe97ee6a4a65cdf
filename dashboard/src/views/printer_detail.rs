//! Printer detail and job queue view

use std::sync::{Arc, Mutex};
use std::time::Duration;

use openapi_client::{Job, JobStep, Printer, PrinterStatus};
use tracing::{debug, info, warn};

use crate::http::api::PrinterApi;
use crate::views::lock;
use crate::views::mount::Mounted;
use crate::views::navigation::{Navigator, Route};
use crate::views::notify::{Notification, Notifier};

const MISSING_ID: &str = "Printer ID is missing";

/// Snapshot of the printer page
#[derive(Debug, Clone, Default)]
pub struct PrinterDetailState {
    pub printer: Option<Printer>,
    pub jobs: Vec<Job>,
    pub selected_job_id: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

impl PrinterDetailState {
    pub fn selected_job(&self) -> Option<&Job> {
        let selected = self.selected_job_id.as_deref()?;
        self.jobs.iter().find(|job| job.id == selected)
    }

    /// Steps of the selected job; empty when it has none
    pub fn selected_steps(&self) -> &[JobStep] {
        self.selected_job().map(|job| job.steps.as_slice()).unwrap_or(&[])
    }
}

pub struct PrinterDetailView {
    printer_id: Option<String>,
    api: Arc<dyn PrinterApi>,
    navigator: Arc<dyn Navigator>,
    notifier: Notifier,
    mounted: Mounted,
    state: Mutex<PrinterDetailState>,
}

impl PrinterDetailView {
    pub fn new(
        printer_id: Option<String>,
        api: Arc<dyn PrinterApi>,
        navigator: Arc<dyn Navigator>,
        notify_timeout: Duration,
    ) -> Self {
        Self {
            printer_id: printer_id.filter(|id| !id.is_empty()),
            api,
            navigator,
            notifier: Notifier::new(notify_timeout),
            mounted: Mounted::new(),
            state: Mutex::new(PrinterDetailState {
                loading: true,
                ..Default::default()
            }),
        }
    }

    pub fn printer_id(&self) -> Option<&str> {
        self.printer_id.as_deref()
    }

    pub fn mounted(&self) -> Mounted {
        self.mounted.clone()
    }

    pub fn unmount(&self) {
        self.mounted.unmount();
    }

    pub fn snapshot(&self) -> PrinterDetailState {
        lock(&self.state).clone()
    }

    pub fn notification(&self) -> Option<Notification> {
        self.notifier.current()
    }

    /// Fetch the printer, then its queue
    ///
    /// The queue request is only issued once the printer reply has been
    /// applied. The first job becomes the selection.
    pub async fn load(&self) {
        let Some(printer_id) = self.printer_id.clone() else {
            let mut state = lock(&self.state);
            state.loading = false;
            state.error = Some(MISSING_ID.to_string());
            return;
        };

        {
            let mut state = lock(&self.state);
            state.loading = true;
            state.error = None;
        }

        let printer = self.api.get_printer(&printer_id).await;
        if !self.mounted.is_mounted() {
            debug!("Printer page unmounted, dropping printer reply");
            return;
        }
        match printer {
            Ok(printer) => {
                if printer.is_none() {
                    warn!("No printer in reply for {}", printer_id);
                }
                lock(&self.state).printer = printer;
            }
            Err(e) => {
                warn!("Failed to fetch printer {}: {}", printer_id, e);
                let mut state = lock(&self.state);
                state.error = Some(e.user_message());
                state.loading = false;
                return;
            }
        }

        let jobs = self.api.list_queue(&printer_id).await;
        if !self.mounted.is_mounted() {
            debug!("Printer page unmounted, dropping queue reply");
            return;
        }

        let mut state = lock(&self.state);
        match jobs {
            Ok(jobs) => {
                debug!("Loaded {} jobs for {}", jobs.len(), printer_id);
                state.selected_job_id = jobs.first().map(|job| job.id.clone());
                state.jobs = jobs;
            }
            Err(e) => {
                warn!("Failed to fetch queue for {}: {}", printer_id, e);
                state.error = Some(e.user_message());
            }
        }
        state.loading = false;
    }

    /// Select a job; local only
    pub fn select_job(&self, job_id: &str) {
        lock(&self.state).selected_job_id = Some(job_id.to_string());
    }

    /// Put the printer into `READY` and reflect it locally on success
    pub async fn start(&self) -> bool {
        let Some(printer_id) = self.printer_id.clone() else {
            self.notifier.error(MISSING_ID);
            return false;
        };

        lock(&self.state).loading = true;
        let result = self
            .api
            .update_printer_status(&printer_id, &PrinterStatus::Ready)
            .await;
        if !self.mounted.is_mounted() {
            return result.is_ok();
        }

        let started = match result {
            Ok(()) => {
                if let Some(printer) = lock(&self.state).printer.as_mut() {
                    printer.status = Some(PrinterStatus::Ready);
                }
                info!("Printer {} set to READY", printer_id);
                self.notifier.success("Printer status set to READY");
                true
            }
            Err(e) => {
                self.notifier
                    .error(format!("Failed to set status: {}", e.user_message()));
                false
            }
        };
        lock(&self.state).loading = false;
        started
    }

    /// Go to the job creation form for this printer
    pub fn new_job(&self) {
        match &self.printer_id {
            Some(id) => self.navigator.push(Route::NewJob(id.clone())),
            None => self.notifier.error(MISSING_ID),
        }
    }

    pub fn back(&self) {
        self.navigator.push(Route::Dashboard);
    }
}
