use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use routedesk_widgets::events::{EventQueue, WidgetEvent};
use routedesk_widgets::flags::FlagMap;
use routedesk_widgets::multi_select::{
    MultiSelect, OptionGroup, OptionSource, SelectOption, group_options,
};
use routedesk_widgets::scheduler::Scheduler;
use routedesk_widgets::table::DataTable;

use super::DashboardConfig;
use crate::api::{DashboardApi, UserSearch};
use crate::error::{ApiError, DashboardError};
use crate::model::{BenchmarkRequest, BenchmarkResult, Doctor, User};
use crate::resource::{ResourceError, ResourceState};

/// Host of the visit-planning widgets.
///
/// The table and the picker both report into the dashboard's event queue;
/// [`pump`](Self::pump) folds their events into canonical state and pushes
/// the result into the other widget.
pub struct Dashboard {
    api: Arc<dyn DashboardApi>,
    config: DashboardConfig,
    events: EventQueue,

    table: DataTable<User>,
    picker: MultiSelect,

    doctors: ResourceState<Vec<Doctor>>,
    users: ResourceState<Vec<User>>,

    doctor_id: Option<String>,
    user_ids: Vec<String>,
    priorities: FlagMap,
    result: Option<BenchmarkResult>,
    /// Shared with the in-flight [`PendingBenchmark`], which clears it.
    running: Arc<AtomicBool>,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("config", &self.config)
            .field("doctor_id", &self.doctor_id)
            .field("user_ids", &self.user_ids)
            .field("priorities", &self.priorities)
            .field("running", &self.is_running())
            .finish()
    }
}

impl Dashboard {
    /// Create a dashboard with default configuration.
    pub fn new(api: Arc<dyn DashboardApi>, scheduler: Arc<dyn Scheduler>) -> Self {
        let config = DashboardConfig::default();
        let events = EventQueue::new();
        let table = DataTable::new(User::columns())
            .with_config(config.table_config())
            .with_events(events.clone());
        let picker = MultiSelect::new(scheduler)
            .with_config(config.picker_config())
            .with_events(events.clone());
        Self {
            api,
            config,
            events,
            table,
            picker,
            doctors: ResourceState::Idle,
            users: ResourceState::Idle,
            doctor_id: None,
            user_ids: Vec::new(),
            priorities: FlagMap::new(),
            result: None,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Apply a configuration to the dashboard and its widgets.
    pub fn with_config(mut self, config: DashboardConfig) -> Self {
        self.table = self.table.with_config(config.table_config());
        self.picker = self.picker.with_config(config.picker_config());
        if config.remote_user_search {
            let source: Arc<dyn OptionSource> = Arc::new(UserSearch::new(Arc::clone(&self.api)));
            self.picker.set_source(Some(source));
        }
        self.config = config;
        self
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// The user table.
    pub fn table(&self) -> &DataTable<User> {
        &self.table
    }

    /// The user picker.
    pub fn picker(&self) -> &MultiSelect {
        &self.picker
    }

    pub fn doctors(&self) -> &ResourceState<Vec<Doctor>> {
        &self.doctors
    }

    pub fn users(&self) -> &ResourceState<Vec<User>> {
        &self.users
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    /// Fetch doctors and users.
    ///
    /// Each list ends up `Ready` or `Error` independently; the first failure
    /// is returned. Loaded users become the table rows and the picker options.
    pub async fn load(&mut self) -> Result<(), DashboardError> {
        self.doctors = ResourceState::Loading;
        self.users = ResourceState::Loading;

        let mut first_error = None;

        match self.api.list_doctors().await {
            Ok(doctors) => {
                log::info!("Loaded {} doctors", doctors.len());
                self.doctors = ResourceState::Ready(doctors);
            }
            Err(e) => {
                log::warn!("Failed to load doctors: {}", e);
                self.doctors = ResourceState::Error(ResourceError::from(&e));
                first_error = Some(e);
            }
        }

        match self.api.list_users().await {
            Ok(users) => {
                log::info!("Loaded {} users", users.len());
                self.table.set_rows(users.clone());
                self.picker
                    .set_options(users.iter().map(User::to_option).collect());
                self.users = ResourceState::Ready(users);
            }
            Err(e) => {
                log::warn!("Failed to load users: {}", e);
                self.users = ResourceState::Error(ResourceError::from(&e));
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    // -------------------------------------------------------------------------
    // Doctor
    // -------------------------------------------------------------------------

    /// Doctor options grouped by the configured attribute.
    pub fn doctor_groups(&self) -> Vec<OptionGroup> {
        let options: Vec<_> = self
            .doctors
            .as_ready()
            .map(|doctors| doctors.iter().map(Doctor::to_option).collect())
            .unwrap_or_default();
        group_options(&options, Some(self.config.doctor_group_by.as_str()))
    }

    /// Choose the doctor. The ID must be one of the loaded doctors.
    pub fn select_doctor(&mut self, id: &str) -> Result<(), DashboardError> {
        let known = self
            .doctors
            .as_ready()
            .is_some_and(|doctors| doctors.iter().any(|d| d.id == id));
        if !known {
            return Err(DashboardError::UnknownDoctor(id.to_string()));
        }
        log::info!("Selected doctor {}", id);
        self.doctor_id = Some(id.to_string());
        Ok(())
    }

    pub fn doctor_id(&self) -> Option<&str> {
        self.doctor_id.as_deref()
    }

    // -------------------------------------------------------------------------
    // Users and priorities
    // -------------------------------------------------------------------------

    /// Chosen user IDs in selection order.
    pub fn user_ids(&self) -> &[String] {
        &self.user_ids
    }

    /// Replace the chosen users and push them into both widgets.
    pub fn set_user_ids(&mut self, ids: Vec<String>) {
        self.table.set_value(&ids);
        self.picker.set_value_ids(&ids);
        self.user_ids = ids;
    }

    pub fn priorities(&self) -> &FlagMap {
        &self.priorities
    }

    /// Replace the priority flags and push them into the table.
    pub fn set_priorities(&mut self, flags: FlagMap) {
        self.table.set_flags(flags.clone());
        self.priorities = flags;
    }

    /// Chosen users that are flagged as priority, in selection order.
    pub fn priority_user_ids(&self) -> Vec<String> {
        self.user_ids
            .iter()
            .filter(|id| self.priorities.is_flagged(id))
            .cloned()
            .collect()
    }

    /// Fold pending widget events into canonical state.
    ///
    /// A selection change from one widget is pushed into the other one only,
    /// so nothing flows back to its source. Returns the handled events.
    pub fn pump(&mut self) -> Vec<WidgetEvent> {
        let events = self.events.drain();
        let table_id = self.table.id_string();
        let picker_id = self.picker.id_string();

        for event in &events {
            match event {
                WidgetEvent::SelectionChange { widget_id, ids } if *widget_id == table_id => {
                    log::debug!("Table selection: {:?}", ids);
                    // Rows carry the labels; remote search may have replaced
                    // the picker's own options since the users were loaded.
                    let options: Option<Vec<SelectOption>> = ids
                        .iter()
                        .map(|id| self.table.row(id).map(|user| user.to_option()))
                        .collect();
                    match options {
                        Some(options) => self.picker.set_value(options),
                        None => self.picker.set_value_ids(ids),
                    }
                    self.user_ids = ids.clone();
                }
                WidgetEvent::SelectionChange { widget_id, ids } if *widget_id == picker_id => {
                    log::debug!("Picker selection: {:?}", ids);
                    self.table.set_value(ids);
                    self.user_ids = ids.clone();
                }
                WidgetEvent::SelectionChange { widget_id, .. } => {
                    log::warn!("Selection change from unknown widget {}", widget_id);
                }
                WidgetEvent::FlagChange { flags, .. } => {
                    log::debug!("Priorities: {:?}", flags.flagged_ids());
                    self.priorities = flags.clone();
                }
                WidgetEvent::LimitReached { widget_id, max } => {
                    log::info!("{}: at most {} users per benchmark", widget_id, max);
                }
            }
        }
        events
    }

    // -------------------------------------------------------------------------
    // Benchmark
    // -------------------------------------------------------------------------

    /// Check if a benchmark can be started right now.
    pub fn can_start(&self) -> bool {
        !self.is_running() && self.doctor_id.is_some() && !self.user_ids.is_empty()
    }

    /// Check if a benchmark is in flight.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Validate the inputs and mark a benchmark as running.
    ///
    /// The returned [`PendingBenchmark`] does not borrow the dashboard, so the
    /// host can keep reading it (and show Start as disabled) while the request
    /// runs. Hand its outcome to [`finish_benchmark`](Self::finish_benchmark).
    pub fn begin_benchmark(&self) -> Result<PendingBenchmark, DashboardError> {
        let doctor_id = self.doctor_id.clone().ok_or(DashboardError::MissingDoctor)?;
        if self.user_ids.is_empty() {
            return Err(DashboardError::NoUsersSelected);
        }
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(DashboardError::AlreadyRunning);
        }

        let request = BenchmarkRequest {
            doctor_id,
            user_ids: self.user_ids.clone(),
        };
        log::info!(
            "Running benchmark for doctor {} with {} users",
            request.doctor_id,
            request.user_ids.len()
        );
        Ok(PendingBenchmark {
            api: Arc::clone(&self.api),
            request,
            running: Arc::clone(&self.running),
        })
    }

    /// Record the outcome of a benchmark started with
    /// [`begin_benchmark`](Self::begin_benchmark).
    pub fn finish_benchmark(
        &mut self,
        outcome: Result<BenchmarkResult, ApiError>,
    ) -> Result<BenchmarkResult, DashboardError> {
        match outcome {
            Ok(result) => {
                self.result = Some(result.clone());
                Ok(result)
            }
            Err(e) => {
                log::warn!("Benchmark failed: {}", e);
                Err(e.into())
            }
        }
    }

    /// Run the benchmark for the chosen doctor and users.
    ///
    /// The result is kept for [`result`](Self::result). `running` is reset
    /// whether or not the call succeeds.
    pub async fn start(&mut self) -> Result<BenchmarkResult, DashboardError> {
        let pending = self.begin_benchmark()?;
        let outcome = pending.run().await;
        self.finish_benchmark(outcome)
    }

    /// The last successful benchmark result.
    pub fn result(&self) -> Option<&BenchmarkResult> {
        self.result.as_ref()
    }
}

/// A validated benchmark request, marked as running on its dashboard.
///
/// Dropping it, after [`run`](Self::run) or instead of it, clears the
/// dashboard's running flag.
pub struct PendingBenchmark {
    api: Arc<dyn DashboardApi>,
    request: BenchmarkRequest,
    running: Arc<AtomicBool>,
}

impl PendingBenchmark {
    pub fn request(&self) -> &BenchmarkRequest {
        &self.request
    }

    /// Send the request to the backend.
    pub async fn run(self) -> Result<BenchmarkResult, ApiError> {
        self.api.run_benchmark(&self.request).await
    }
}

impl Drop for PendingBenchmark {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for PendingBenchmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingBenchmark")
            .field("request", &self.request)
            .finish()
    }
}
