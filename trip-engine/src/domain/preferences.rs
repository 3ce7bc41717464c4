//! Traveler preferences for one planning request.

use super::{DomainError, TransportMode};

/// Default maximum walking distance in metres.
const DEFAULT_MAX_WALKING_M: f64 = 1000.0;

/// What the traveler wants from a planning request.
///
/// Immutable for the lifetime of the request. The order of
/// `preferred_modes` is a priority order and breaks ranking ties.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceSet {
    max_walking_distance_m: f64,
    preferred_modes: Vec<TransportMode>,
    consider_weather: bool,
    consider_traffic: bool,
    carbon_conscious: bool,
}

impl PreferenceSet {
    /// Create preferences with all condition flags enabled.
    ///
    /// Duplicate modes are collapsed; the first occurrence keeps its priority.
    ///
    /// # Examples
    ///
    /// ```
    /// use trip_engine::domain::{PreferenceSet, TransportMode};
    ///
    /// let prefs = PreferenceSet::new(
    ///     800.0,
    ///     vec![TransportMode::Subway, TransportMode::Bus, TransportMode::Subway],
    /// )
    /// .unwrap()
    /// .with_carbon_conscious(false);
    ///
    /// assert_eq!(prefs.preferred_modes(), &[TransportMode::Subway, TransportMode::Bus]);
    /// assert_eq!(prefs.priority(TransportMode::Bus), Some(1));
    /// assert!(!prefs.carbon_conscious());
    /// ```
    pub fn new(
        max_walking_distance_m: f64,
        preferred_modes: Vec<TransportMode>,
    ) -> Result<Self, DomainError> {
        if !max_walking_distance_m.is_finite() || max_walking_distance_m < 0.0 {
            return Err(DomainError::InvalidPreferences(
                "max walking distance must be a non-negative number",
            ));
        }

        let mut modes = Vec::with_capacity(preferred_modes.len());
        for mode in preferred_modes {
            if !modes.contains(&mode) {
                modes.push(mode);
            }
        }

        Ok(Self {
            max_walking_distance_m,
            preferred_modes: modes,
            consider_weather: true,
            consider_traffic: true,
            carbon_conscious: true,
        })
    }

    /// Set whether weather rules apply.
    pub fn with_weather(mut self, consider: bool) -> Self {
        self.consider_weather = consider;
        self
    }

    /// Set whether traffic rules apply.
    pub fn with_traffic(mut self, consider: bool) -> Self {
        self.consider_traffic = consider;
        self
    }

    /// Set whether ranking favours low emission.
    pub fn with_carbon_conscious(mut self, carbon_conscious: bool) -> Self {
        self.carbon_conscious = carbon_conscious;
        self
    }

    /// Maximum distance for any single walking leg, in metres.
    pub fn max_walking_distance_m(&self) -> f64 {
        self.max_walking_distance_m
    }

    /// Modes to plan with, highest priority first.
    pub fn preferred_modes(&self) -> &[TransportMode] {
        &self.preferred_modes
    }

    /// Position of a mode in the priority order, if requested at all.
    pub fn priority(&self, mode: TransportMode) -> Option<usize> {
        self.preferred_modes.iter().position(|m| *m == mode)
    }

    pub fn consider_weather(&self) -> bool {
        self.consider_weather
    }

    pub fn consider_traffic(&self) -> bool {
        self.consider_traffic
    }

    pub fn carbon_conscious(&self) -> bool {
        self.carbon_conscious
    }
}

impl Default for PreferenceSet {
    fn default() -> Self {
        Self {
            max_walking_distance_m: DEFAULT_MAX_WALKING_M,
            preferred_modes: vec![
                TransportMode::Walking,
                TransportMode::Bus,
                TransportMode::Subway,
            ],
            consider_weather: true,
            consider_traffic: true,
            carbon_conscious: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_preferences() {
        let prefs = PreferenceSet::default();
        assert_eq!(prefs.max_walking_distance_m(), 1000.0);
        assert_eq!(
            prefs.preferred_modes(),
            &[TransportMode::Walking, TransportMode::Bus, TransportMode::Subway]
        );
        assert!(prefs.consider_weather());
        assert!(prefs.consider_traffic());
        assert!(prefs.carbon_conscious());
    }

    #[test]
    fn rejects_negative_walking_distance() {
        assert!(PreferenceSet::new(-1.0, vec![TransportMode::Bus]).is_err());
        assert!(PreferenceSet::new(f64::NAN, vec![TransportMode::Bus]).is_err());
        assert!(PreferenceSet::new(0.0, vec![TransportMode::Bus]).is_ok());
    }

    #[test]
    fn deduplicates_modes_keeping_first() {
        let prefs = PreferenceSet::new(
            500.0,
            vec![
                TransportMode::Bus,
                TransportMode::Walking,
                TransportMode::Bus,
                TransportMode::Driving,
            ],
        )
        .unwrap();
        assert_eq!(
            prefs.preferred_modes(),
            &[TransportMode::Bus, TransportMode::Walking, TransportMode::Driving]
        );
        assert_eq!(prefs.priority(TransportMode::Driving), Some(2));
        assert_eq!(prefs.priority(TransportMode::Subway), None);
    }

    #[test]
    fn flag_builders() {
        let prefs = PreferenceSet::default()
            .with_weather(false)
            .with_traffic(false)
            .with_carbon_conscious(false);
        assert!(!prefs.consider_weather());
        assert!(!prefs.consider_traffic());
        assert!(!prefs.carbon_conscious());
    }
}
