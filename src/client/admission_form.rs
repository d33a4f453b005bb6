use super::api::ApiClient;
use crate::models::CreateAdmissionRequest;

const DEFAULT_FAILURE: &str = "Failed to submit admission form. Please try again.";

/// Alert
///
/// A blocking message box, e.g. `window.alert` in a browser.
pub trait Alert: Send + Sync {
    fn alert(&self, message: &str);
}

/// AdmissionForm
///
/// State behind the public admissions page.
#[derive(Debug, Clone, Default)]
pub struct AdmissionForm {
    pub fields: CreateAdmissionRequest,
    /// Set after a successful submission; the page shows its thank-you view.
    pub submitted: bool,
    pub submitting: bool,
}

impl AdmissionForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Posts the form to `/admissions`.
    ///
    /// When the server answers `success: true` the fields are cleared and
    /// `submitted` is set. Any other outcome leaves the fields intact and shows
    /// the server's message, or a generic one, through `alert`.
    pub async fn submit(&mut self, api: &ApiClient, alert: &dyn Alert) -> bool {
        self.submitting = true;
        let outcome = api.admissions().submit(&self.fields).await;
        self.submitting = false;

        match outcome {
            Ok(response) if response.success => {
                self.fields = CreateAdmissionRequest::default();
                self.submitted = true;
                true
            }
            Ok(response) => {
                alert.alert(response.message.as_deref().unwrap_or(DEFAULT_FAILURE));
                false
            }
            Err(e) => {
                tracing::debug!("admission submission failed: {e}");
                alert.alert(e.server_message().unwrap_or(DEFAULT_FAILURE));
                false
            }
        }
    }

    /// Back to an empty form after the thank-you view.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
