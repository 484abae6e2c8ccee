use anyhow::Result;
use std::path::Path;

use cavity2d::io::write_case;
use cavity2d::{FlowConfig, run_case};

fn main() -> Result<()> {
    let mut config = FlowConfig::new();
    config.points_x = 9;
    config.points_y = 9;
    config.lid_speed = 1.0;
    config.dt = 5e-4;
    config.n_steps = 400;
    config.save_interval = 50;

    println!(
        "Lid-driven cavity, {}x{} grid ({} dof), {} steps at dt={}",
        config.points_x,
        config.points_y,
        2 * config.points_x * config.points_y,
        config.n_steps,
        config.dt
    );

    let result = run_case(config)?;

    if let Some(final_s) = result.final_appellian() {
        println!("Final Appellian: {final_s:.6e}");
    }
    if let Some(last) = result.snapshots.last() {
        println!(
            "Step {}: max speed {:.4} m/s",
            last.step,
            last.max_speed()
        );
    }

    let path = Path::new("cavity_case.json");
    write_case(path, &result)?;
    println!("Case record written to {}", path.display());

    Ok(())
}
