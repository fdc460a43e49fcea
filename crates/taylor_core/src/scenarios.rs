//! End-to-end runs of small physical systems through `EquationSystem`.

use crate::parameters::Parameters;
use crate::system::EquationSystem;
use anyhow::{anyhow, Result};
use approx::assert_relative_eq;

struct Lorenz {
    sigma: f64,
    rho: f64,
    beta: f64,
}

impl Lorenz {
    const CLASSIC: Lorenz = Lorenz {
        sigma: 10.0,
        rho: 28.0,
        beta: 8.0 / 3.0,
    };

    /// Stride is 2 for a first-order system: x = p[0], y = p[2], z = p[4].
    fn system(&self, x0: f64, y0: f64, z0: f64) -> Result<EquationSystem<'_>> {
        let mut system = EquationSystem::new(3, 1)?;
        system.set_governing_equation(0, |_t, p: &Parameters<f64>| {
            self.sigma * (p[2] - p[0])
        })?;
        system.set_governing_equation(1, |_t, p: &Parameters<f64>| {
            p[0] * (self.rho - p[4]) - p[2]
        })?;
        system.set_governing_equation(2, |_t, p: &Parameters<f64>| {
            p[0] * p[2] - self.beta * p[4]
        })?;
        system.set_initial_conditions(0, &[x0])?;
        system.set_initial_conditions(1, &[y0])?;
        system.set_initial_conditions(2, &[z0])?;
        Ok(system)
    }
}

struct MassSpringDamper<F> {
    mass: f64,
    damping: f64,
    stiffness: f64,
    forcing: F,
}

impl<F: Fn(f64) -> f64> MassSpringDamper<F> {
    fn system(&self, x0: f64, dx0: f64) -> Result<EquationSystem<'_>> {
        let mut system = EquationSystem::new(1, 2)?;
        system.set_governing_equation(0, |t, p: &Parameters<f64>| {
            (-self.damping * p[1] - self.stiffness * p[0] + (self.forcing)(t)) / self.mass
        })?;
        system.set_initial_conditions(0, &[x0, dx0])?;
        Ok(system)
    }
}

#[test]
fn harmonic_oscillator_tracks_cosine() -> Result<()> {
    let mut system = EquationSystem::new(1, 2)?;
    system.set_governing_equation(0, |_t, x: &Parameters<f64>| -x[0])?;
    system.set_initial_conditions(0, &[1.0, 0.0])?;
    system.solve(0.0, 0.01, 1.0)?;

    let time = system.time_series();
    let position = system.data_for(0, 0)?;
    assert_eq!(time.len(), 101);
    assert_eq!(position[0], 1.0);
    for (&t, &x) in time.iter().zip(position) {
        assert!((x - t.cos()).abs() < 1e-2, "x({t}) = {x}, cos = {}", t.cos());
    }
    assert_relative_eq!(*time.last().ok_or_else(|| anyhow!("empty"))?, 1.0, epsilon = 1e-9);
    Ok(())
}

#[test]
fn lorenz_coupling_reads_fresh_values_in_index_order() -> Result<()> {
    let lorenz = Lorenz::CLASSIC;
    let mut system = lorenz.system(0.1, 0.0, 0.01)?;
    let dt = 0.001;
    system.solve(0.0, dt, 20.0)?;

    let (x, dx) = (system.data_for(0, 0)?, system.data_for(0, 1)?);
    let (y, dy) = (system.data_for(1, 0)?, system.data_for(1, 1)?);
    let (z, dz) = (system.data_for(2, 0)?, system.data_for(2, 1)?);
    assert_eq!(x.len(), system.time_series().len());

    for s in 1..x.len() {
        assert_relative_eq!(x[s], x[s - 1] + dt * dx[s - 1], max_relative = 1e-12);
        // x sees only the previous step.
        assert_relative_eq!(dx[s], lorenz.sigma * (y[s - 1] - x[s - 1]), max_relative = 1e-12);
        // y sees x already advanced to step s.
        assert_relative_eq!(dy[s], x[s] * (lorenz.rho - z[s - 1]) - y[s - 1], max_relative = 1e-12);
        // z sees both x and y at step s.
        assert_relative_eq!(dz[s], x[s] * y[s] - lorenz.beta * z[s - 1], max_relative = 1e-12);
    }

    assert!(x.iter().all(|v| v.abs() < 25.0));
    assert!(y.iter().all(|v| v.abs() < 35.0));
    assert!(z.iter().all(|v| (-1.0..55.0).contains(v)));
    Ok(())
}

#[test]
fn lorenz_is_sensitive_to_initial_conditions() -> Result<()> {
    let lorenz = Lorenz::CLASSIC;
    let mut a = lorenz.system(0.1, 0.0, 0.01)?;
    let mut b = lorenz.system(0.1, 0.0, 0.0)?;
    a.solve(0.0, 0.001, 30.0)?;
    b.solve(0.0, 0.001, 30.0)?;

    let (xa, xb) = (a.data_for(0, 0)?, b.data_for(0, 0)?);
    assert!((xa[100] - xb[100]).abs() < 1e-2);
    let max_gap = xa
        .iter()
        .zip(xb)
        .map(|(p, q)| (p - q).abs())
        .fold(0.0, f64::max);
    assert!(max_gap > 1.0);
    Ok(())
}

#[test]
fn mass_spring_damper_settles_under_constant_force() -> Result<()> {
    let msd = MassSpringDamper {
        mass: 5.0,
        damping: 1.2,
        stiffness: 10.0,
        forcing: |_t: f64| 1.0,
    };
    let mut system = msd.system(0.0, 0.0)?;
    system.solve(0.0, 0.001, 60.0)?;

    let position = system.data_for(0, 0)?;
    let settled = 1.0 / msd.stiffness;
    assert_relative_eq!(*position.last().ok_or_else(|| anyhow!("empty"))?, settled, epsilon = 1e-3);
    assert!(position.iter().all(|&x| x < 2.0 * settled));
    Ok(())
}

#[test]
fn mass_spring_damper_stays_bounded_under_square_wave() -> Result<()> {
    let msd = MassSpringDamper {
        mass: 5.0,
        damping: 1.2,
        stiffness: 10.0,
        forcing: |t: f64| (0.25 * t).cos().signum(),
    };
    let mut system = msd.system(0.0, 0.0)?;
    system.solve(0.0, 0.001, 60.0)?;

    let solution = system.solution();
    let samples = solution
        .samples(0, 0)
        .ok_or_else(|| anyhow!("missing position series"))?;
    assert!(samples.map(|(_, x)| x).all(|x| x.abs() < 0.35));
    Ok(())
}
