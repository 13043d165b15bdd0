//! Service-speed heuristic table, resolved per SPEC_FULL.md §4.2 and §9
//! ("the refactored path's constants are authoritative").

#[derive(Debug, Clone, Copy)]
struct SpeedClass {
    kmh: f64,
    stop_allowance_min: f64,
}

const EXPRESS: SpeedClass = SpeedClass {
    kmh: 115.0,
    stop_allowance_min: 2.0,
};
const STANDARD: SpeedClass = SpeedClass {
    kmh: 88.0,
    stop_allowance_min: 1.8,
};
const LOCAL: SpeedClass = SpeedClass {
    kmh: 62.0,
    stop_allowance_min: 1.8,
};
const METRO: SpeedClass = SpeedClass {
    kmh: 32.0,
    stop_allowance_min: 1.0,
};

fn classify(line_name: &str) -> SpeedClass {
    let lower = line_name.to_lowercase();
    if ["express", "intercity", "sleeper"].iter().any(|k| lower.contains(k)) {
        EXPRESS
    } else if ["underground", "metro", "subway"].iter().any(|k| lower.contains(k)) {
        METRO
    } else if ["local", "regional", "stopping"].iter().any(|k| lower.contains(k)) {
        LOCAL
    } else {
        STANDARD
    }
}

/// Estimates journey time in minutes for a segment of `distance_km` on a
/// line named `line_name`: speed-heuristic base time, plus stop allowance,
/// floored at 5 minutes, plus 5 minutes for segments over 100km.
pub fn estimate_minutes(line_name: &str, distance_km: f64) -> f64 {
    let class = classify(line_name);
    let base_minutes = distance_km / class.kmh * 60.0;
    let mut minutes = (base_minutes + class.stop_allowance_min).max(5.0);
    if distance_km > 100.0 {
        minutes += 5.0;
    }
    minutes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floors_at_five_minutes() {
        assert_eq!(estimate_minutes("Metro Line", 0.1), 5.0);
    }

    #[test]
    fn adds_long_segment_penalty() {
        let short = estimate_minutes("Express Service", 90.0);
        let long = estimate_minutes("Express Service", 150.0);
        // 150km at 115km/h is ~78min vs 90km ~47min -- the +5 penalty is on
        // top of that, so the long segment is well over 5 minutes more.
        assert!(long > short + 5.0);
    }

    #[test]
    fn metro_is_slower_estimate_per_km_than_express() {
        let metro = estimate_minutes("Underground", 10.0);
        let express = estimate_minutes("Express", 10.0);
        assert!(metro > express);
    }
}
