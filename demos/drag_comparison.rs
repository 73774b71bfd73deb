//! Drag versus vacuum for the same launch, across every RK method.
//!
//! Launches a 1 kg projectile at 20 m/s and 45° and prints time of flight,
//! range and apex for each scheme, with and without the drag term.
//!
//! Run with:
//!   cargo run --example drag_comparison

use rk_projectile::{Method, Projectile, SimulationParameters, STANDARD_GRAVITY};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base = SimulationParameters {
        dt: 0.01,
        speed: 20.0,
        angle: 45.0,
        gravity: STANDARD_GRAVITY,
        ..Default::default()
    };

    // Vacuum time of flight and range from launch at ground level
    let (_, vy0) = base.initial_velocity();
    let tof_exact = 2.0 * vy0 / base.gravity;
    let range_exact = base.speed * base.speed * (2.0 * base.angle.to_radians()).sin() / base.gravity;

    println!("Launch: {} m/s at {}°, dt = {} s", base.speed, base.angle, base.dt);
    println!("  Vacuum (exact): t = {tof_exact:.4} s, range = {range_exact:.4} m");
    println!();
    println!(
        "{:<18} {:>10} {:>12} {:>10} {:>12}",
        "method", "t (vac)", "range (vac)", "t (drag)", "range (drag)"
    );

    for method in Method::ALL {
        let mut vacuum = Projectile::new(SimulationParameters {
            method,
            drag_a: 0.0,
            ..base.clone()
        })?;
        let mut dragged = Projectile::new(SimulationParameters {
            method,
            drag_a: 4e-3,
            ..base.clone()
        })?;
        vacuum.solve()?;
        dragged.solve()?;

        let v = vacuum.summary()?;
        let d = dragged.summary()?;
        println!(
            "{:<18} {:>10.3} {:>12.4} {:>10.3} {:>12.4}",
            method.name(),
            v.time_of_flight,
            v.range,
            d.time_of_flight,
            d.range
        );
    }

    Ok(())
}
