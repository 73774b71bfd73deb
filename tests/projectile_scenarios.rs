//! End-to-end flights through the public API.

use approx::assert_abs_diff_eq;
use rk_projectile::{
    lookup, solve_batch, DisplayBounds, Method, OdeSystem, Projectile, RkStepper,
    ScenarioConfig, SimulationError, SimulationParameters, DEFAULT_PADDING,
};

const G: f64 = 9.81;

/// Horizontal launch from height `h0` without drag.
fn flat_launch(h0: f64, speed: f64, dt: f64) -> SimulationParameters {
    SimulationParameters {
        dt,
        drag_a: 0.0,
        y0: h0,
        speed,
        angle: 0.0,
        gravity: G,
        ..Default::default()
    }
}

// ─── Analytic comparison ────────────────────────────────────────────────

#[test]
fn test_flat_launch_matches_free_fall() {
    let (h0, speed, dt) = (10.0, 5.0, 0.001);
    let mut projectile = Projectile::new(flat_launch(h0, speed, dt)).unwrap();
    let traj = projectile.solve().unwrap();

    let t_star = (2.0 * h0 / G).sqrt();
    let landing = traj.last().unwrap();
    println!("t* = {:.6}, landed at t = {:.6}, x = {:.6}", t_star, landing.t, landing.x);

    assert!(landing.t >= t_star, "landed before the analytic impact time");
    assert!(landing.t - t_star <= dt + 1e-12, "landed more than one step late");
    assert_abs_diff_eq!(landing.x, speed * landing.t, epsilon = 1e-9);
    assert_abs_diff_eq!(landing.x, speed * t_star, epsilon = speed * dt);
}

#[test]
fn test_flat_launch_every_sample_on_parabola() {
    // Without drag RK4 integrates the quadratic free fall exactly
    let mut projectile = Projectile::new(flat_launch(2.0, 3.0, 0.01)).unwrap();
    projectile.solve().unwrap();
    for s in projectile.trajectory().unwrap() {
        assert_abs_diff_eq!(s.x, 3.0 * s.t, epsilon = 1e-10);
        assert_abs_diff_eq!(s.y, 2.0 - 0.5 * G * s.t * s.t, epsilon = 1e-10);
    }
}

// ─── Drag-lagged coupling ───────────────────────────────────────────────

struct Axis {
    drag_a: f64,
    gravity: f64,
    speed: f64,
}

impl OdeSystem<2> for Axis {
    fn rhs(&self, _t: f64, y: &[f64; 2], dydt: &mut [f64; 2]) {
        dydt[0] = y[1];
        dydt[1] = -self.gravity - self.drag_a * self.speed * y[1];
    }
}

#[test]
fn test_speed_is_lagged_one_step() {
    // Reproduce the model by hand: speed from the previous step, frozen
    // across all stages of both axes.
    let params = SimulationParameters {
        dt: 0.05,
        drag_a: 0.01,
        speed: 40.0,
        angle: 30.0,
        gravity: G,
        ..Default::default()
    };
    let (vx0, vy0) = params.initial_velocity();
    let tab = Method::Classic4.tableau();
    let mut hx = RkStepper::new(tab, 0.0, [0.0, vx0], params.dt);
    let mut hy = RkStepper::new(tab, 0.0, [0.0, vy0], params.dt);

    let mut projectile = Projectile::new(params.clone()).unwrap();
    let traj = projectile.solve().unwrap();

    for expected in traj.samples().iter().skip(1) {
        let speed = hx.state()[1].hypot(hy.state()[1]);
        let sx = hx.advance(&Axis { drag_a: params.drag_a, gravity: 0.0, speed });
        let sy = hy.advance(&Axis { drag_a: params.drag_a, gravity: G, speed });
        assert_eq!(sx.t, expected.t);
        assert_abs_diff_eq!(sx.y[0], expected.x, epsilon = 1e-9);
        assert_abs_diff_eq!(sy.y[0], expected.y, epsilon = 1e-9);
    }
}

// ─── Reference scenario ─────────────────────────────────────────────────

#[test]
fn test_reference_scenario_from_json() {
    let scenario = ScenarioConfig::from_json_str(
        r#"{
            "dt": 0.025,
            "drag_a": 4e-5,
            "gravity": 9.81,
            "projectiles": [ { "mass": 1.0, "speed": 20.0, "angle": 45.0 } ]
        }"#,
    )
    .unwrap();

    let mut projectile = Projectile::new(scenario.parameters().remove(0)).unwrap();
    projectile.solve().unwrap();

    let all = projectile.results(0.0..=projectile.max_time().unwrap()).unwrap();
    assert_eq!((all[0].t, all[0].x, all[0].y), (0.0, 0.0, 0.0));
    assert_eq!(projectile.max_time().unwrap(), 2.9);

    let summary = projectile.summary().unwrap();
    assert_abs_diff_eq!(summary.range, 40.9735, epsilon = 1e-3);
    assert!(summary.apex_time > 1.3 && summary.apex_time < 1.5);
}

#[test]
fn test_scenario_batch_and_bounds() {
    let scenario = ScenarioConfig::from_json_str(
        r#"{
            "method": "Kutta-3rd",
            "projectiles": [
                { "label": "shallow", "mass": 1.0, "speed": 25.0, "angle": 20.0 },
                { "label": "broken", "mass": 0.0, "speed": 25.0, "angle": 40.0 },
                { "label": "steep", "mass": 1.0, "x0": -5.0, "y0": 3.0, "speed": 25.0, "angle": 70.0 }
            ]
        }"#,
    )
    .unwrap();

    let results = solve_batch(scenario.parameters(), Some(3)).unwrap();
    assert!(matches!(results[1], Err(SimulationError::InvalidParameters(_))));

    let solved: Vec<&Projectile> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(solved.len(), 2);
    assert!(solved.iter().all(|p| p.params().method == Method::Kutta3));

    let bounds = DisplayBounds::from_projectiles(solved.iter().copied()).unwrap();
    assert_eq!(bounds.x.0, -5.0);
    assert!(bounds.y.0 <= 0.0);

    let padded = bounds.padded(DEFAULT_PADDING);
    assert!(padded.x.0 < bounds.x.0 && padded.x.1 > bounds.x.1);
    assert!(padded.y.0 < bounds.y.0 && padded.y.1 > bounds.y.1);
}

// ─── Failure modes ──────────────────────────────────────────────────────

#[test]
fn test_weightless_vertical_launch_does_not_land() {
    let mut projectile = Projectile::new(SimulationParameters {
        drag_a: 0.0,
        y0: 1.0,
        speed: 5.0,
        angle: 90.0,
        gravity: 0.0,
        max_steps: 1_000,
        ..Default::default()
    })
    .unwrap();

    match projectile.solve() {
        Err(SimulationError::DidNotLand { steps, t }) => {
            assert_eq!(steps, 1_000);
            assert_abs_diff_eq!(t, 25.0, epsilon = 1e-9);
        }
        other => panic!("Expected DidNotLand, got {:?}", other),
    }
    assert!(!projectile.is_solved());
}

#[test]
fn test_unknown_method_name() {
    assert!(matches!(lookup("Heun"), Err(SimulationError::UnknownMethod(_))));
    assert!("Runge".parse::<Method>().is_err());
    assert_eq!(lookup("Ralston").unwrap().stages(), 2);
}
