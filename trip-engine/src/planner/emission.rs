//! Carbon emission estimates.
//!
//! Factors are fixed per mode (see [`TransportMode::emission_factor`]).
//! Savings are reported against driving the same distance.

use crate::domain::{Route, RouteSegment, TransportMode};

/// Returns `segment` with its emission set to `distance_km * factor(mode)`.
pub fn estimate(segment: RouteSegment) -> RouteSegment {
    segment.with_derived_emission()
}

/// Total emission of a route, in kg CO2.
pub fn route_emission(route: &Route) -> f64 {
    route.total_emission_kg()
}

/// What driving the whole route distance would emit, in kg CO2.
pub fn driving_baseline(route: &Route) -> f64 {
    route.total_distance_km() * TransportMode::Driving.emission_factor()
}

/// Emission avoided compared with driving the same distance.
///
/// Zero or negative for driving routes.
pub fn carbon_saved(route: &Route) -> f64 {
    driving_baseline(route) - route_emission(route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinate;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn single(mode: TransportMode, km: f64) -> Route {
        let seg =
            RouteSegment::new(mode, km, 10.0, coord(0.0, 0.0), coord(0.0, 0.1), vec![]).unwrap();
        Route::new(mode, vec![seg], false).unwrap()
    }

    #[test]
    fn estimate_uses_mode_factor() {
        for mode in TransportMode::ALL {
            let seg = RouteSegment::new(mode, 7.0, 10.0, coord(0.0, 0.0), coord(0.0, 0.1), vec![])
                .unwrap();
            assert_eq!(estimate(seg).emission_kg(), 7.0 * mode.emission_factor());
        }
    }

    #[test]
    fn cycling_saves_full_driving_baseline() {
        let route = single(TransportMode::Cycling, 10.0);
        assert_eq!(route_emission(&route), 0.0);
        assert_eq!(carbon_saved(&route), 10.0 * 0.2);
    }

    #[test]
    fn bus_saves_difference() {
        let route = single(TransportMode::Bus, 10.0);
        assert!((carbon_saved(&route) - (10.0 * 0.2 - 10.0 * 0.08)).abs() < 1e-12);
    }

    #[test]
    fn driving_saves_nothing() {
        let route = single(TransportMode::Driving, 10.0);
        assert_eq!(carbon_saved(&route), 0.0);
    }
}
