//! User operations: startup, refresh all, add city.

use std::sync::Arc;

use chrono::{DateTime, Local};
use stormdeck_core::AppError;
use stormdeck_weather::{initial_city, initial_forecast, ForecastSource, SelectedCity};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::models::dashboard_model::{ApplyOutcome, Dashboard, DashboardSnapshot};
use crate::services::{request_fetch, ForecastServiceMessage};
use crate::store::CityStore;

/// How `startup` populated the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupOutcome {
    /// Saved cities were found; this many fetches are in flight
    Restored(usize),
    /// Nothing was saved; the sample city was shown and saved
    Seeded,
}

type Clock = Box<dyn Fn() -> DateTime<Local> + Send + Sync>;

pub struct DashboardController {
    dashboard: Dashboard,
    store: Arc<dyn CityStore>,
    source: Arc<dyn ForecastSource>,
    runtime: Handle,
    tx: UnboundedSender<ForecastServiceMessage>,
    rx: UnboundedReceiver<ForecastServiceMessage>,
    in_flight: usize,
    clock: Clock,
}

impl std::fmt::Debug for DashboardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardController")
            .field("dashboard", &self.dashboard)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl DashboardController {
    pub fn new(store: Arc<dyn CityStore>, source: Arc<dyn ForecastSource>, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            dashboard: Dashboard::new(),
            store,
            source,
            runtime,
            tx,
            rx,
            in_flight: 0,
            clock: Box::new(Local::now),
        }
    }

    /// Replace the wall clock used for card dates and day/night
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Local> + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Restore saved cities and fetch each, or seed the sample city.
    pub fn startup(&mut self) -> Result<StartupOutcome, AppError> {
        match self.store.load()? {
            Some(cities) if !cities.is_empty() => {
                tracing::info!("Restoring {} selected cities", cities.len());
                for city in &cities {
                    self.fetch(city.clone());
                }
                let count = cities.len();
                self.dashboard.set_selected_cities(cities);
                Ok(StartupOutcome::Restored(count))
            }
            _ => {
                tracing::info!("No saved cities; showing sample forecast");
                let sample = initial_forecast()?;
                let now = (self.clock)();
                self.dashboard
                    .apply_forecast(&sample, &now)
                    .map_err(AppError::from)?;
                self.dashboard.set_selected_cities(vec![initial_city()?]);
                self.store.save(self.dashboard.selected_cities())?;
                Ok(StartupOutcome::Seeded)
            }
        }
    }

    /// Fetch every visible card again. Returns the number of requests issued.
    pub fn refresh_all(&mut self) -> usize {
        let cities = self.dashboard.visible_cities();
        tracing::info!("Refreshing {} cards", cities.len());
        for city in &cities {
            self.fetch(city.clone());
        }
        cities.len()
    }

    pub fn open_add_dialog(&mut self) {
        self.dashboard.open_add_dialog();
    }

    pub fn cancel_add_dialog(&mut self) {
        self.dashboard.cancel_add_dialog();
    }

    /// Append `city`, fetch it immediately and persist the new list.
    pub fn confirm_add(&mut self, city: SelectedCity) -> Result<(), AppError> {
        self.dashboard.confirm_add(city.clone())?;
        tracing::info!("Adding city {} ({})", city.label, city.key);
        self.fetch(city);
        self.store.save(self.dashboard.selected_cities())?;
        Ok(())
    }

    /// Open the dialog and confirm `city` in one step
    pub fn add_city(&mut self, city: SelectedCity) -> Result<(), AppError> {
        self.open_add_dialog();
        self.confirm_add(city)
    }

    /// Wait for every in-flight fetch and apply the results.
    ///
    /// Returns how many forecasts changed a card. With request timeouts
    /// disabled, a hung request keeps this pending.
    pub async fn settle(&mut self) -> usize {
        let mut applied = 0;
        while self.in_flight > 0 {
            let Some(message) = self.rx.recv().await else {
                break;
            };
            self.in_flight -= 1;
            if self.handle_message(message).is_some_and(changed_card) {
                applied += 1;
            }
        }
        applied
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.dashboard.snapshot()
    }

    fn fetch(&mut self, city: SelectedCity) {
        self.in_flight += 1;
        request_fetch(&self.tx, &self.runtime, self.source.clone(), city);
    }

    fn handle_message(&mut self, message: ForecastServiceMessage) -> Option<ApplyOutcome> {
        let (city, result) = match message {
            ForecastServiceMessage::FetchDone { city, result } => (city, result),
            ForecastServiceMessage::FetchAborted { city, reason } => {
                tracing::error!("Fetch for {} aborted: {}", city.label, reason);
                return None;
            }
        };

        let fetched = match result {
            Ok(f) => f,
            Err(e) => {
                tracing::error!("No forecast available for {}: {}", city.label, e);
                return None;
            }
        };

        let now = (self.clock)();
        match self.dashboard.apply_forecast(&fetched.forecast, &now) {
            Ok(outcome) => {
                tracing::debug!(
                    city = %city.label,
                    fallback = fetched.fallback,
                    ?outcome,
                    "Forecast applied"
                );
                Some(outcome)
            }
            Err(e) => {
                tracing::error!("Could not show forecast for {}: {}", city.label, e);
                None
            }
        }
    }
}

fn changed_card(outcome: ApplyOutcome) -> bool {
    matches!(outcome, ApplyOutcome::Created | ApplyOutcome::Updated)
}
