//! conformal double pendulum demo

use conformal_demo::*;
use log::info;

fn main() -> conformal::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init(); // Log to stderr (more detail with `RUST_LOG=debug`).

    let pendulum = double_pendulum()?;
    let mut state = PhysicsState::new(vec![0.; pendulum.dof()]);
    let dt = 1e-3;
    for step in 0..=2000 {
        if step % 200 == 0 {
            let tip = state.tip(&pendulum)?;
            info!(
                "t = {:.1} s: tip at ({:.3}, {:.3}, {:.3}), kinetic energy {:.3} J",
                state.time,
                tip.x(),
                tip.y(),
                tip.z(),
                state.kinetic_energy(&pendulum)?
            );
        }
        state.step(&pendulum, dt)?;
    }
    Ok(())
}
