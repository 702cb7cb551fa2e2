//! Loading overlay shown around in-flight asynchronous work

pub mod controller;
pub mod modal;
pub mod view_model;

pub use controller::LoaderOverlayController;
pub use modal::LoaderModal;
pub use view_model::{LoaderColours, LoaderState, LoaderViewModel};

use crate::config::Colour;
use crate::error::{PopupError, PopupResult};
use std::time::Duration;

pub const DEFAULT_SWITCH_INTERVAL: Duration = Duration::from_millis(2000);

/// Per-call loader configuration
///
/// Always holds at least one reason and a non-zero switch interval.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    reasons: Vec<String>,
    switch_interval: Duration,
    loader_colour: Colour,
    backdrop_colour: Colour,
    text_colour: Colour,
}

impl LoaderConfig {
    pub fn new<I, S>(reasons: I) -> PopupResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let reasons: Vec<String> = reasons.into_iter().map(Into::into).collect();
        if reasons.is_empty() {
            return Err(PopupError::InvalidConfig(
                "a loader needs at least one reason".to_string(),
            ));
        }

        Ok(Self {
            reasons,
            switch_interval: DEFAULT_SWITCH_INTERVAL,
            loader_colour: Colour::rgb(0x51, 0x2B, 0xD4),
            backdrop_colour: Colour::WHITE,
            text_colour: Colour::BLACK,
        })
    }

    pub fn with_switch_interval(mut self, interval: Duration) -> PopupResult<Self> {
        if interval.is_zero() {
            return Err(PopupError::InvalidConfig(
                "reason switch interval must be greater than zero".to_string(),
            ));
        }
        self.switch_interval = interval;
        Ok(self)
    }

    pub fn with_loader_colour(mut self, colour: Colour) -> Self {
        self.loader_colour = colour;
        self
    }

    pub fn with_backdrop_colour(mut self, colour: Colour) -> Self {
        self.backdrop_colour = colour;
        self
    }

    pub fn with_text_colour(mut self, colour: Colour) -> Self {
        self.text_colour = colour;
        self
    }

    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }

    pub fn switch_interval(&self) -> Duration {
        self.switch_interval
    }

    pub fn loader_colour(&self) -> Colour {
        self.loader_colour
    }

    pub fn backdrop_colour(&self) -> Colour {
        self.backdrop_colour
    }

    pub fn text_colour(&self) -> Colour {
        self.text_colour
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            reasons: vec!["Loading...".to_string()],
            switch_interval: DEFAULT_SWITCH_INTERVAL,
            loader_colour: Colour::rgb(0x51, 0x2B, 0xD4),
            backdrop_colour: Colour::WHITE,
            text_colour: Colour::BLACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_reasons() {
        assert!(matches!(
            LoaderConfig::new(Vec::<String>::new()),
            Err(PopupError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_builder_defaults() {
        let config = LoaderConfig::new(["Loading A", "Loading B"])
            .unwrap()
            .with_text_colour(Colour::rgb(1, 2, 3));

        assert_eq!(config.reasons(), ["Loading A", "Loading B"]);
        assert_eq!(config.switch_interval(), Duration::from_millis(2000));
        assert_eq!(config.text_colour(), Colour::rgb(1, 2, 3));
        assert!(config.clone().with_switch_interval(Duration::ZERO).is_err());
    }
}
