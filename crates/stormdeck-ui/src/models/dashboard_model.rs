//! Dashboard state: visible cards, selected cities, add dialog, loading flag.
//!
//! Pure state. No I/O happens here; the controller decides when to fetch and
//! persist.

use chrono::{DateTime, TimeZone, Utc};
use stormdeck_weather::{CardView, SelectedCity, StampedForecast};

use crate::error_mapping::DashboardError;

/// What applying a forecast did to the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A new card was added for the city
    Created,
    /// An existing card now shows the forecast
    Updated,
    /// The card already shows newer data; nothing changed
    Stale,
}

/// Add-city dialog state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddDialog {
    #[default]
    Hidden,
    Open,
}

/// One city's card.
///
/// A card exists as soon as a forecast for its city arrives, even if that
/// forecast turns out to be stale.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastCard {
    pub city_id: u64,
    /// Key and label the card's data was last requested with
    pub city: SelectedCity,
    pub location: String,
    pub view: Option<CardView>,
}

impl ForecastCard {
    fn new(forecast: &StampedForecast) -> Self {
        Self {
            city_id: forecast.city_id(),
            city: SelectedCity::new(forecast.key.clone(), forecast.label.clone()),
            location: forecast.response.city.name.clone(),
            view: None,
        }
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.view.as_ref().map(|v| v.created)
    }
}

/// Immutable copy of what a renderer needs
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub loading: bool,
    pub cards: Vec<CardView>,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    loading: bool,
    cards: Vec<ForecastCard>,
    selected_cities: Vec<SelectedCity>,
    add_dialog: AddDialog,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            loading: true,
            cards: Vec::new(),
            selected_cities: Vec::new(),
            add_dialog: AddDialog::Hidden,
        }
    }

    /// Show `forecast` on its city's card, creating the card if needed.
    ///
    /// A forecast older than what the card already shows is ignored. Equal
    /// timestamps overwrite.
    pub fn apply_forecast<Tz: TimeZone>(
        &mut self,
        forecast: &StampedForecast,
        now: &DateTime<Tz>,
    ) -> Result<ApplyOutcome, DashboardError> {
        let view = CardView::build(forecast, now)?;

        let existing = self.cards.iter().position(|c| c.city_id == view.city_id);
        let (card, created) = match existing {
            Some(index) => (&mut self.cards[index], false),
            None => {
                self.cards.push(ForecastCard::new(forecast));
                let last = self.cards.len() - 1;
                (&mut self.cards[last], true)
            }
        };

        if let Some(shown) = card.last_updated() {
            if forecast.created < shown {
                tracing::debug!(
                    city_id = card.city_id,
                    incoming = %forecast.created,
                    shown = %shown,
                    "Ignoring stale forecast"
                );
                return Ok(ApplyOutcome::Stale);
            }
        }

        card.city = SelectedCity::new(forecast.key.clone(), forecast.label.clone());
        card.view = Some(view);
        self.loading = false;

        Ok(if created {
            ApplyOutcome::Created
        } else {
            ApplyOutcome::Updated
        })
    }

    pub fn cards(&self) -> &[ForecastCard] {
        &self.cards
    }

    pub fn card(&self, city_id: u64) -> Option<&ForecastCard> {
        self.cards.iter().find(|c| c.city_id == city_id)
    }

    /// One entry per visible card, in display order
    pub fn visible_cities(&self) -> Vec<SelectedCity> {
        self.cards.iter().map(|c| c.city.clone()).collect()
    }

    pub fn selected_cities(&self) -> &[SelectedCity] {
        &self.selected_cities
    }

    pub fn set_selected_cities(&mut self, cities: Vec<SelectedCity>) {
        self.selected_cities = cities;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn add_dialog(&self) -> AddDialog {
        self.add_dialog
    }

    pub fn open_add_dialog(&mut self) {
        self.add_dialog = AddDialog::Open;
    }

    pub fn cancel_add_dialog(&mut self) {
        self.add_dialog = AddDialog::Hidden;
    }

    /// Append `city` to the selection and close the dialog.
    pub fn confirm_add(&mut self, city: SelectedCity) -> Result<(), DashboardError> {
        if self.add_dialog != AddDialog::Open {
            return Err(DashboardError::DialogNotOpen);
        }
        self.selected_cities.push(city);
        self.add_dialog = AddDialog::Hidden;
        Ok(())
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            loading: self.loading,
            cards: self.cards.iter().filter_map(|c| c.view.clone()).collect(),
        }
    }
}
