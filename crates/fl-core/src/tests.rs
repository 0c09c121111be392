//! Unit tests for fl-core primitives.

#[cfg(test)]
mod ids {
    use crate::AgentId;

    #[test]
    fn parse_wire_form() {
        assert_eq!(" 7 ".parse::<AgentId>().unwrap(), AgentId(7));
        assert!("robot-7".parse::<AgentId>().is_err());
    }

    #[test]
    fn ordering_and_default() {
        assert!(AgentId(0) < AgentId(1));
        assert_eq!(AgentId::default(), AgentId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "robot-7");
    }
}

#[cfg(test)]
mod geo {
    use std::f64::consts::PI;

    use crate::{FlockError, Vec2, clamp_scalar, clamp_speed, distance, normalize_angle_diff, weighted_sum};

    const TOL: f64 = 1e-4;

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(distance(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0)), 5.0);
        assert_eq!(distance(Vec2::new(1.5, -2.0), Vec2::new(1.5, -2.0)), 0.0);
    }

    #[test]
    fn clamp_speed_bounds_magnitude_and_keeps_direction() {
        let (min, max) = (0.05, 0.3);
        let inputs = [
            Vec2::new(3.0, 4.0),
            Vec2::new(-0.01, 0.002),
            Vec2::new(0.1, -0.1),
            Vec2::new(-1e-4, -1e-4),
            Vec2::new(250.0, -0.5),
        ];
        for v in inputs {
            let c = clamp_speed(v, min, max);
            let mag = c.magnitude();
            assert!(mag >= min - TOL && mag <= max + TOL, "{v} → {c} (|c| = {mag})");
            // Same direction: the cross product vanishes and the dot product is positive.
            let cross = v.x * c.y - v.y * c.x;
            let dot = v.x * c.x + v.y * c.y;
            assert!(cross.abs() < TOL * v.magnitude().max(1.0), "direction changed for {v}");
            assert!(dot > 0.0);
        }
    }

    #[test]
    fn clamp_speed_leaves_zero_alone() {
        assert_eq!(clamp_speed(Vec2::ZERO, 0.05, 0.3), Vec2::ZERO);
    }

    #[test]
    fn clamp_speed_in_range_is_untouched() {
        assert_eq!(clamp_speed(Vec2::new(0.1, 0.0), 0.05, 0.3), Vec2::new(0.1, 0.0));
    }

    #[test]
    fn angle_wrap_stays_in_half_open_interval() {
        let mut d = -20.0;
        while d < 20.0 {
            let w = normalize_angle_diff(d);
            assert!(w > -PI - TOL && w <= PI + TOL, "{d} → {w}");
            assert!((w.sin() - d.sin()).abs() < TOL);
            assert!((w.cos() - d.cos()).abs() < TOL);
            d += 0.37;
        }
    }

    #[test]
    fn angle_wrap_examples() {
        assert!((normalize_angle_diff(3.0 * PI / 2.0) + PI / 2.0).abs() < TOL);
        assert!((normalize_angle_diff(-3.0 * PI / 2.0) - PI / 2.0).abs() < TOL);
        assert_eq!(normalize_angle_diff(0.25), 0.25);
    }

    #[test]
    fn weighted_sum_combines() {
        let v = weighted_sum(
            &[Vec2::new(1.0, 0.0), Vec2::new(0.0, 2.0), Vec2::new(-1.0, -1.0)],
            &[2.0, 0.5, 1.0],
        )
        .unwrap();
        assert_eq!(v, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn weighted_sum_rejects_length_mismatch() {
        let err = weighted_sum(&[Vec2::new(1.0, 0.0)], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, FlockError::Argument { expected: 1, got: 2, .. }));
    }

    #[test]
    fn outputs_are_rounded_to_five_digits() {
        let c = clamp_speed(Vec2::new(1.0, 1.0), 0.0, 1.0);
        assert_eq!(c, Vec2::new(0.70711, 0.70711));
        assert_eq!(clamp_scalar(0.123456789, -1.0, 1.0), 0.12346);
        assert_eq!(clamp_scalar(7.0, -0.9, 0.9), 0.9);
    }
}

#[cfg(test)]
mod time {
    use std::time::Duration;

    use crate::time::ticks_for_secs;
    use crate::{Tick, TickClock};

    #[test]
    fn tick_arithmetic() {
        assert_eq!(Tick(10).next(), Tick(11));
        assert_eq!(Tick(10) + 5, Tick(15));
        assert_eq!(Tick(15).since(Tick(10)), 5);
        assert_eq!(Tick(3).since(Tick(10)), 0);
    }

    #[test]
    fn ticks_for_run_length() {
        assert_eq!(ticks_for_secs(Duration::from_millis(50), 2.0), 40);
        assert_eq!(ticks_for_secs(Duration::from_millis(30), 0.1), 4);
        assert_eq!(ticks_for_secs(Duration::from_millis(50), 0.0), 0);
    }

    #[test]
    fn clock_waits_less_than_one_period() {
        let mut clock = TickClock::start(Duration::from_millis(20));
        let wait = clock.advance();
        assert!(wait <= Duration::from_millis(20));
    }

    #[test]
    fn clock_reanchors_after_overrun() {
        let mut clock = TickClock::start(Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(clock.advance(), Duration::ZERO);
        assert_eq!(clock.overruns(), 1);
    }
}

#[cfg(test)]
mod robot {
    use crate::{Footprint, RobotKind};

    #[test]
    fn bounding_radius() {
        let r = Footprint::new(0.3, 0.4).bounding_radius();
        assert!((r - 0.25).abs() < 1e-12);
    }

    #[test]
    fn kinds_have_distinct_footprints() {
        assert!(RobotKind::Rover.footprint().bounding_radius() > RobotKind::Sphere.footprint().bounding_radius());
        assert_eq!(RobotKind::Sphere.to_string(), "sphere");
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentId, AgentRng};

    #[test]
    fn same_seed_same_stream() {
        let mut a = AgentRng::new(9, AgentId(2));
        let mut b = AgentRng::new(9, AgentId(2));
        for _ in 0..16 {
            assert_eq!(a.symmetric(1.0), b.symmetric(1.0));
        }
    }

    #[test]
    fn symmetric_respects_amplitude() {
        let mut rng = AgentRng::new(1, AgentId(0));
        for _ in 0..100 {
            let v = rng.symmetric(0.01);
            assert!((-0.01..=0.01).contains(&v));
        }
        assert_eq!(rng.symmetric(0.0), 0.0);
    }
}

#[cfg(test)]
mod config {
    use std::time::Duration;

    use crate::{FlockConfig, FlockError};

    const MINIMAL: &str = r#"{
        "ALIGNMENT_WEIGHT": 1.0, "COHESION_WEIGHT": 0.5,
        "SEPARATION_WEIGHT": 1.5, "WALL_AVOIDANCE_WEIGHT": 1.0,
        "ALIGNMENT_RANGE": 1.0, "COHESION_RANGE": 1.2,
        "SEPARATION_RANGE": 0.4, "WALL_AVOIDANCE_RANGE": 0.5,
        "MIN_LINEAR_SPEED": 0.05, "MAX_LINEAR_SPEED": 0.3,
        "MIN_ANGULAR_SPEED": -0.9, "MAX_ANGULAR_SPEED": 0.9,
        "ARENA_WIDTH": 4.0, "ARENA_LENGTH": 3.0
    }"#;

    #[test]
    fn parses_with_defaults() {
        let c = FlockConfig::from_json_str(MINIMAL).unwrap();
        assert_eq!(c.cohesion_range, 1.2);
        assert_eq!(c.tick_period(), Duration::from_millis(50));
        assert_eq!(c.heading_gain, 5.0);
        assert_eq!(c.turn_factor(), 1.5);
        assert!(c.obstacles.is_empty());
        assert_eq!(c.tick_limit(), None);
    }

    #[test]
    fn missing_weight_is_fatal() {
        let json = MINIMAL.replace("\"COHESION_WEIGHT\": 0.5,", "");
        assert!(matches!(FlockConfig::from_json_str(&json), Err(FlockError::Json(_))));
    }

    #[test]
    fn inverted_speed_bounds_are_rejected() {
        let mut c = FlockConfig::reference();
        c.min_linear_speed = 1.0;
        assert!(matches!(c.validate(), Err(FlockError::Config(_))));
    }

    #[test]
    fn negative_range_is_rejected() {
        let mut c = FlockConfig::reference();
        c.separation_range = -0.1;
        assert!(c.validate().is_err());
    }

    #[test]
    fn run_length_converts_to_ticks() {
        let mut c = FlockConfig::reference();
        c.max_stop_time = Some(3.0);
        assert_eq!(c.tick_limit(), Some(60));
        c.max_ticks = Some(7);
        assert_eq!(c.tick_limit(), Some(7));
    }

    #[test]
    fn angular_bounds_scale_per_tick() {
        let mut c = FlockConfig::reference();
        assert_eq!(c.angular_bounds(), (-0.9, 0.9));
        c.scale_angular_to_tick = true;
        let (lo, hi) = c.angular_bounds();
        assert!((lo + 0.045).abs() < 1e-12);
        assert!((hi - 0.045).abs() < 1e-12);
    }

    #[test]
    fn obstacles_parse() {
        let json = MINIMAL.replace(
            "\"ARENA_LENGTH\": 3.0",
            "\"ARENA_LENGTH\": 3.0, \"OBSTACLES\": [{\"center\": {\"x\": 2.0, \"y\": 1.5}, \"half_extent\": {\"x\": 0.2, \"y\": 0.2}}]",
        );
        let c = FlockConfig::from_json_str(&json).unwrap();
        assert_eq!(c.obstacles.len(), 1);
        assert_eq!(c.obstacles[0].center.x, 2.0);
    }

    #[test]
    fn reference_is_valid() {
        FlockConfig::reference().validate().unwrap();
    }
}
