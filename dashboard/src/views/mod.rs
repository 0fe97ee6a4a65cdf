//! Page-scoped view state
//!
//! Each view owns its state for one page visit. Backend calls are awaited
//! without holding any lock, and every completion checks the view's
//! [`mount::Mounted`] flag before touching state, so replies that land
//! after teardown are dropped.

pub mod auth_form;
pub mod badge;
pub mod job_form;
pub mod mount;
pub mod navigation;
pub mod notify;
pub mod printer_detail;
pub mod printer_list;
pub mod profile;

use std::sync::{Mutex, MutexGuard};

/// Lock view state, recovering from poisoning
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
