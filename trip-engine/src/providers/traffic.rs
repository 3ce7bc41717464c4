//! Time-of-day traffic estimate.
//!
//! There is no free live-traffic feed to lean on, so road congestion is
//! estimated from the local clock: heavier during the morning and evening
//! rush, free-ish the rest of the day.

use chrono::{Local, Timelike, Utc};

use crate::domain::{Coordinate, TrafficSnapshot};

use super::error::ProviderError;
use super::TrafficProvider;

/// Rush-hour windows and the traffic figures used inside and outside them.
#[derive(Debug, Clone, PartialEq)]
pub struct RushHourConfig {
    /// Half-open `[start, end)` hour windows, local time
    pub peaks: Vec<(u32, u32)>,
    pub peak_congestion: f64,
    pub peak_speed_kmh: f64,
    /// At or below the planner's free-flow threshold, so quiet hours add no delay
    pub off_peak_congestion: f64,
    pub off_peak_speed_kmh: f64,
}

impl Default for RushHourConfig {
    fn default() -> Self {
        Self {
            peaks: vec![(7, 9), (17, 19)],
            peak_congestion: 1.8,
            peak_speed_kmh: 22.0,
            off_peak_congestion: 1.0,
            off_peak_speed_kmh: 40.22,
        }
    }
}

impl RushHourConfig {
    /// Whether `hour` falls in a rush-hour window.
    pub fn is_peak(&self, hour: u32) -> bool {
        self.peaks
            .iter()
            .any(|&(start, end)| hour >= start && hour < end)
    }
}

/// Traffic provider that estimates congestion from the hour of day.
#[derive(Debug, Clone, Default)]
pub struct RushHourTrafficProvider {
    config: RushHourConfig,
}

impl RushHourTrafficProvider {
    pub fn new(config: RushHourConfig) -> Self {
        Self { config }
    }

    /// Estimate traffic for a given local hour.
    pub fn estimate_at(&self, hour: u32) -> Result<TrafficSnapshot, ProviderError> {
        let (congestion, speed) = if self.config.is_peak(hour) {
            (self.config.peak_congestion, self.config.peak_speed_kmh)
        } else {
            (self.config.off_peak_congestion, self.config.off_peak_speed_kmh)
        };

        TrafficSnapshot::new(congestion, speed, Utc::now())
            .map_err(|e| ProviderError::NotConfigured(e.to_string()))
    }
}

impl TrafficProvider for RushHourTrafficProvider {
    async fn fetch_traffic(&self, _region: Coordinate) -> Result<TrafficSnapshot, ProviderError> {
        self.estimate_at(Local::now().hour())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RouteSegment, TransportMode};
    use crate::planner::{Conditions, PlannerConfig, SegmentRole, adjust};

    #[test]
    fn rush_hour_windows() {
        let config = RushHourConfig::default();
        assert!(!config.is_peak(6));
        assert!(config.is_peak(7));
        assert!(config.is_peak(8));
        assert!(!config.is_peak(9));
        assert!(!config.is_peak(12));
        assert!(config.is_peak(17));
        assert!(config.is_peak(18));
        assert!(!config.is_peak(19));
    }

    #[test]
    fn estimates_follow_windows() {
        let provider = RushHourTrafficProvider::default();

        let peak = provider.estimate_at(8).unwrap();
        assert_eq!(peak.congestion_index(), 1.8);
        assert_eq!(peak.average_speed_kmh(), 22.0);

        let quiet = provider.estimate_at(14).unwrap();
        assert_eq!(quiet.congestion_index(), 1.0);
        assert_eq!(quiet.average_speed_kmh(), 40.22);
    }

    #[test]
    fn off_peak_bus_is_not_adjusted() {
        let config = PlannerConfig::default();
        let provider = RushHourTrafficProvider::default();
        let bus = RouteSegment::new(
            TransportMode::Bus,
            5.0,
            20.0,
            Coordinate::new(0.0, 0.0).unwrap(),
            Coordinate::new(0.0, 0.05).unwrap(),
            vec![],
        )
        .unwrap();

        let noon = Conditions::new(None, Some(provider.estimate_at(12).unwrap()));
        let quiet = adjust(bus.clone(), SegmentRole::Primary, &noon, &config).unwrap();
        assert!(!quiet.adjusted);
        assert_eq!(quiet.segment.duration_min(), 20.0);

        let rush = Conditions::new(None, Some(provider.estimate_at(8).unwrap()));
        let busy = adjust(bus, SegmentRole::Primary, &rush, &config).unwrap();
        assert!(busy.adjusted);
        assert!((busy.segment.duration_min() - 28.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_config_is_an_error() {
        let provider = RushHourTrafficProvider::new(RushHourConfig {
            peak_congestion: -1.0,
            ..RushHourConfig::default()
        });
        assert!(provider.estimate_at(8).is_err());
        assert!(provider.estimate_at(12).is_ok());
    }

    #[tokio::test]
    async fn fetch_returns_a_snapshot() {
        let provider = RushHourTrafficProvider::default();
        let region = Coordinate::new(39.9, 116.4).unwrap();
        let snapshot = provider.fetch_traffic(region).await.unwrap();
        assert!(snapshot.congestion_index() >= 1.0);
    }
}
