//! Make → model → year picker state.
//!
//! Reference model of the flow that the embedded `car_selection.js` runs in
//! the browser; the script mirrors it step for step, and the home page hands
//! it [`INVALID_MODEL_PROMPT`] so the prompt text has one source. Every fetch is tagged with a sequence number; a response is applied only
//! if no newer fetch for the same selector has been issued since, so a slow
//! answer for a previous make can never overwrite the current list.

use crate::models::car::CarModelOption;
use url::form_urlencoded;

pub const INVALID_MODEL_PROMPT: &str = "Please select a valid model.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTarget {
    Models,
    Years,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub target: FetchTarget,
    pub seq: u64,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAction {
    Navigate(String),
    Prompt(&'static str),
}

#[derive(Debug, Default)]
pub struct SelectionFlow {
    make: Option<String>,
    models: Vec<CarModelOption>,
    selected_model: Option<usize>,
    years: Vec<String>,
    selected_year: Option<String>,
    models_enabled: bool,
    years_enabled: bool,
    next_seq: u64,
    pending_models: Option<u64>,
    pending_years: Option<u64>,
}

impl SelectionFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn issue(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn reset_years(&mut self) {
        self.years.clear();
        self.selected_year = None;
        self.years_enabled = false;
        self.pending_years = None;
    }

    /// The make dropdown changed. Clears everything below it and returns the
    /// models fetch to run, or `None` when the placeholder was picked.
    pub fn select_make(&mut self, make: &str) -> Option<FetchRequest> {
        self.models.clear();
        self.selected_model = None;
        self.models_enabled = false;
        self.pending_models = None;
        self.reset_years();

        if make.is_empty() {
            self.make = None;
            return None;
        }

        self.make = Some(make.to_string());
        let seq = self.issue();
        self.pending_models = Some(seq);

        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("make", make)
            .finish();

        Some(FetchRequest {
            target: FetchTarget::Models,
            seq,
            url: format!("/models?{query}"),
        })
    }

    /// Applies a models response. Returns false if it was stale and dropped.
    pub fn models_loaded(&mut self, seq: u64, models: Vec<CarModelOption>) -> bool {
        if self.pending_models != Some(seq) {
            return false;
        }

        self.pending_models = None;
        self.models = models;
        self.models_enabled = true;
        true
    }

    /// The model dropdown changed to the option at `index` (`None` for the
    /// placeholder). Returns the years fetch to run.
    pub fn select_model(&mut self, index: Option<usize>) -> Option<FetchRequest> {
        self.reset_years();

        let (Some(make), Some(option)) = (
            self.make.clone(),
            index.and_then(|i| self.models.get(i)).cloned(),
        ) else {
            self.selected_model = None;
            return None;
        };

        self.selected_model = index;
        let seq = self.issue();
        self.pending_years = Some(seq);

        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("make", &make)
            .append_pair("model", &option.model)
            .finish();

        Some(FetchRequest {
            target: FetchTarget::Years,
            seq,
            url: format!("/years?{query}"),
        })
    }

    /// Applies a years response. Returns false if it was stale and dropped.
    pub fn years_loaded(&mut self, seq: u64, years: Vec<String>) -> bool {
        if self.pending_years != Some(seq) {
            return false;
        }

        self.pending_years = None;
        self.years = years;
        self.years_enabled = true;
        true
    }

    pub fn select_year(&mut self, year: &str) {
        self.selected_year = (!year.is_empty() && self.years.iter().any(|y| y == year))
            .then(|| year.to_string());
    }

    /// Form submit. Navigation only needs the car behind the selected model.
    #[must_use]
    pub fn submit(&self) -> SubmitAction {
        match self.selected_model.and_then(|i| self.models.get(i)) {
            Some(option) => SubmitAction::Navigate(format!("/reviews/{}", option.id)),
            None => SubmitAction::Prompt(INVALID_MODEL_PROMPT),
        }
    }

    #[must_use]
    pub fn models(&self) -> &[CarModelOption] {
        &self.models
    }

    #[must_use]
    pub fn years(&self) -> &[String] {
        &self.years
    }

    #[must_use]
    pub const fn models_enabled(&self) -> bool {
        self.models_enabled
    }

    #[must_use]
    pub const fn years_enabled(&self) -> bool {
        self.years_enabled
    }

    #[must_use]
    pub fn selected_year(&self) -> Option<&str> {
        self.selected_year.as_deref()
    }
}
