//! Page extractor for the terminal surface.
//!
//! The terminal has no page to scrape: the "active page" is the address given
//! on the command line (or via `/goto`), and the page details are whatever
//! flags the user supplied.

use async_trait::async_trait;
use mentor_core::problem::{ExtractionError, ExtractionPayload, ProblemExtractor};
use std::sync::Mutex;

/// Problem details passed on the command line.
#[derive(Debug, Clone, Default)]
pub struct PageDetails {
    pub title: Option<String>,
    pub difficulty: Option<String>,
    pub description: Option<String>,
}

impl PageDetails {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.difficulty.is_none() && self.description.is_none()
    }
}

struct Page {
    address: String,
    details: PageDetails,
}

pub struct CommandLineExtractor {
    page: Mutex<Page>,
}

impl CommandLineExtractor {
    pub fn new(address: &str, details: PageDetails) -> Self {
        Self {
            page: Mutex::new(Page {
                address: address.trim().to_string(),
                details,
            }),
        }
    }

    /// Switches to another page. Details given for the previous page are dropped.
    pub fn navigate(&self, address: &str) {
        if let Ok(mut page) = self.page.lock() {
            page.address = address.trim().to_string();
            page.details = PageDetails::default();
        }
    }

    fn snapshot(&self) -> Result<(String, PageDetails), ExtractionError> {
        let page = self
            .page
            .lock()
            .map_err(|_| ExtractionError::Unreachable("page state poisoned".to_string()))?;
        Ok((page.address.clone(), page.details.clone()))
    }
}

#[async_trait]
impl ProblemExtractor for CommandLineExtractor {
    async fn active_address(&self) -> Result<String, ExtractionError> {
        let (address, _) = self.snapshot()?;
        if address.is_empty() {
            return Err(ExtractionError::NoActivePage);
        }
        Ok(address)
    }

    async fn try_extract(&self) -> Result<Option<ExtractionPayload>, ExtractionError> {
        let (address, details) = self.snapshot()?;
        if details.is_empty() {
            return Ok(None);
        }

        Ok(Some(ExtractionPayload {
            title: details.title.unwrap_or_default(),
            difficulty: details.difficulty.unwrap_or_default(),
            description: details.description.unwrap_or_default(),
            url: address,
            ..ExtractionPayload::default()
        }))
    }
}
