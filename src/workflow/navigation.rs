//! Page navigation - workflow layer
//!
//! Drives one protection number through the portal's fixed page sequence:
//!
//! 1. entry page (login controller) → patent-services menu link
//! 2. menu page → search form submitted with the protection number
//! 3. search response → visited result link
//! 4. detail page → status-code extraction
//!
//! The sequence is an explicit state machine. Each transition performs
//! exactly one fetch (a form submit counts as one fetch) and no transition
//! retries; the first transport error or missing selector ends the task.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{AppError, NavigationError};
use crate::infrastructure::Portal;
use crate::services::extract_status_codes;
use crate::workflow::task_ctx::TaskCtx;

/// Form field the portal expects the protection number in
const SEARCH_FIELD: &str = "NumPedido";

/// Steps of the navigation state machine
///
/// Failure is terminal from every step and is expressed as the navigator's
/// error return rather than a step of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavStep {
    Start,
    MenuFound,
    FormSubmitted,
    DetailsFound,
    Extracted,
}

/// Navigation state machine, one instance per protection number
pub struct PageNavigator {
    portal: Arc<dyn Portal>,
    entry_url: String,
}

impl PageNavigator {
    pub fn new(portal: Arc<dyn Portal>, entry_url: impl Into<String>) -> Self {
        Self {
            portal,
            entry_url: entry_url.into(),
        }
    }

    /// Run the full sequence and return the extracted status codes
    pub async fn run(&self, ctx: &TaskCtx) -> Result<Vec<String>, AppError> {
        let mut step = NavStep::Start;
        let mut doc = self.portal.fetch(&self.entry_url).await?;
        let mut codes = Vec::new();

        loop {
            debug!("{} step {:?} on {}", ctx, step, doc.url());
            step = match step {
                NavStep::Start => {
                    let href = doc.menu_link().ok_or_else(|| {
                        NavigationError::MissingMenuLink {
                            url: doc.url().to_string(),
                        }
                    })?;
                    doc = self.portal.follow(&doc, &href).await?;
                    NavStep::MenuFound
                }
                NavStep::MenuFound => {
                    doc = self
                        .portal
                        .submit_form(&doc, SEARCH_FIELD, ctx.number.as_str())
                        .await?;
                    NavStep::FormSubmitted
                }
                NavStep::FormSubmitted => {
                    let href = doc.details_link().ok_or_else(|| {
                        NavigationError::MissingDetailsLink {
                            url: doc.url().to_string(),
                        }
                    })?;
                    doc = self.portal.follow(&doc, &href).await?;
                    NavStep::DetailsFound
                }
                NavStep::DetailsFound => {
                    codes = extract_status_codes(&doc);
                    NavStep::Extracted
                }
                NavStep::Extracted => {
                    info!("{} ✓ extracted {} status code(s)", ctx, codes.len());
                    return Ok(codes);
                }
            };
        }
    }
}
