use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};

use crate::auth::{AccessGate, AuthError, Session};
use crate::config::AppConfig;
use crate::data::filter::{self, FilterSelection};
use crate::data::loader::{self, LoadError, ParseError, Upload};
use crate::data::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    DataAnalysis,
    SantaMap,
    Statistics,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::DataAnalysis, Tab::SantaMap, Tab::Statistics];

    pub fn label(self) -> &'static str {
        match self {
            Tab::DataAnalysis => "📊 Data Analysis",
            Tab::SantaMap => "🗺 Santa Map",
            Tab::Statistics => "📈 Statistics",
        }
    }
}

// ---------------------------------------------------------------------------
// Login form
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct LoginForm {
    pub input: String,
    pub error: Option<AuthError>,
}

// ---------------------------------------------------------------------------
// Bundled example preview
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ExamplePreview {
    pub visible: bool,
    /// Loaded lazily the first time the preview is shown.
    pub loaded: Option<Result<Dataset, String>>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,
    pub gate: AccessGate,
    pub session: Session,
    pub login: LoginForm,

    /// Uploaded dataset (None until the user loads a file).
    pub dataset: Option<Dataset>,
    /// Name of the uploaded file.
    pub file_name: Option<String>,

    /// Current filter selections; reset on every new upload.
    pub filters: FilterSelection,

    pub tab: Tab,
    pub example: ExamplePreview,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig, gate: AccessGate) -> Self {
        Self {
            config,
            gate,
            session: Session::default(),
            login: LoginForm::default(),
            dataset: None,
            file_name: None,
            filters: FilterSelection::default(),
            tab: Tab::default(),
            example: ExamplePreview::default(),
            status_message: None,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.gate.is_unlocked(&self.session)
    }

    /// Check the password typed into the login form.
    pub fn submit_password(&mut self) -> bool {
        match self.gate.authenticate(&mut self.session, &self.login.input) {
            Ok(ok) => {
                self.login.error = None;
                if ok {
                    self.login.input.clear();
                }
                ok
            }
            Err(e) => {
                self.login.error = Some(e);
                false
            }
        }
    }

    /// Parse an upload and, on success, replace the dataset wholesale.
    /// On failure the previous state is left untouched.
    pub fn ingest(&mut self, upload: &Upload) -> Result<(), ParseError> {
        let dataset = loader::load_upload(upload)?;
        log::info!(
            "Loaded {} rows with columns {:?} from {}",
            dataset.len(),
            dataset.columns,
            upload.name
        );
        self.set_dataset(dataset, upload.name.clone());
        Ok(())
    }

    /// Ingest, reporting failures through the status line.
    pub fn ingest_or_report(&mut self, upload: &Upload) {
        if let Err(e) = self.ingest(upload) {
            log::error!("Failed to load {}: {e}", upload.name);
            self.status_message = Some(format!("Error loading {}: {e}", upload.name));
        }
    }

    /// Ingest a newly loaded dataset and initialise filters.
    pub fn set_dataset(&mut self, dataset: Dataset, file_name: String) {
        self.filters = FilterSelection::defaults(&dataset);
        self.dataset = Some(dataset);
        self.file_name = Some(file_name);
        self.status_message = None;
    }

    /// Toggle a single category in the membership filter.
    pub fn toggle_category(&mut self, value: &CellValue) {
        let selected = self.filters.categories.get_or_insert_with(Default::default);
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
    }

    /// Select every category observed in the dataset.
    pub fn select_all_categories(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters.categories = FilterSelection::defaults(ds).categories;
        }
    }

    /// Deselect every category.
    pub fn select_no_categories(&mut self) {
        if self.filters.categories.is_some() {
            self.filters.categories = Some(Default::default());
        }
    }

    /// Write the currently filtered rows to `path` as CSV; returns the row count.
    pub fn export_filtered(&self, path: &Path) -> Result<usize> {
        let dataset = self.dataset.as_ref().context("no dataset loaded")?;
        let outcome = filter::apply(dataset, &self.filters);
        let file =
            File::create(path).with_context(|| format!("creating {}", path.display()))?;
        loader::write_csv(&outcome.view, file).context("writing CSV")?;
        Ok(outcome.view.len())
    }

    /// Show or hide the bundled example, loading it on first display.
    pub fn set_example_visible(&mut self, visible: bool) {
        self.example.visible = visible;
        if visible && self.example.loaded.is_none() {
            let loaded = loader::load_example(&self.config.sample_path).map_err(|e| {
                log::error!("Example data unavailable: {e}");
                match e {
                    LoadError::MissingAsset(_) => "Example file not found.".to_string(),
                    other => format!("Could not read example file: {other}"),
                }
            });
            self.example.loaded = Some(loaded);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::ValueRange;

    fn unlocked() -> AppState {
        AppState::new(AppConfig::default(), AccessGate::new(None))
    }

    fn upload() -> Upload {
        Upload::new(
            "data.csv",
            "Category,Value,Date\nA,10,2025-01-01\nB,20,2025-01-02\n".as_bytes(),
        )
    }

    #[test]
    fn new_upload_resets_filters() {
        let mut state = unlocked();
        state.ingest(&upload()).unwrap();
        assert_eq!(state.filters.value_range, Some(ValueRange::new(10, 20)));
        assert_eq!(state.filters.categories.as_ref().map(|c| c.len()), Some(2));

        state.select_no_categories();
        state.ingest(&upload()).unwrap();
        assert_eq!(state.filters.categories.as_ref().map(|c| c.len()), Some(2));
    }

    #[test]
    fn failed_upload_keeps_previous_dataset() {
        let mut state = unlocked();
        state.ingest(&upload()).unwrap();
        state.ingest_or_report(&Upload::new("broken.json", "{not json".as_bytes()));

        assert_eq!(state.dataset.as_ref().map(Dataset::len), Some(2));
        assert_eq!(state.file_name.as_deref(), Some("data.csv"));
        assert!(state.status_message.is_some());
    }

    #[test]
    fn toggling_a_category_twice_restores_it() {
        let mut state = unlocked();
        state.ingest(&upload()).unwrap();
        let a = CellValue::Text("A".into());

        state.toggle_category(&a);
        assert!(!state.filters.categories.as_ref().unwrap().contains(&a));
        state.toggle_category(&a);
        assert!(state.filters.categories.as_ref().unwrap().contains(&a));
    }

    #[test]
    fn login_form_records_errors() {
        let mut state = AppState::new(
            AppConfig::default(),
            AccessGate::new(Some("secret".into())),
        );
        assert!(!state.is_unlocked());

        state.login.input = "Secret".into();
        assert!(!state.submit_password());
        assert_eq!(state.login.error, Some(AuthError::IncorrectPassword));

        state.login.input = " secret ".into();
        assert!(state.submit_password());
        assert!(state.is_unlocked());
        assert!(state.login.error.is_none());
    }

    #[test]
    fn export_writes_only_filtered_rows() {
        let mut state = unlocked();
        assert!(state.export_filtered(Path::new("unused.csv")).is_err());

        state.ingest(&upload()).unwrap();
        state.filters.value_range = Some(ValueRange::new(15, 20));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        assert_eq!(state.export_filtered(&path).unwrap(), 1);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Category,Value,Date\nB,20,2025-01-02\n"
        );
    }

    #[test]
    fn missing_example_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            sample_path: dir.path().join("example.csv"),
            ..AppConfig::default()
        };
        let mut state = AppState::new(config, AccessGate::new(None));
        state.set_example_visible(true);
        assert!(matches!(
            state.example.loaded,
            Some(Err(ref msg)) if msg == "Example file not found."
        ));
    }
}
