//! # VELA Headless Demo
//!
//! Runs the full simulation chain with no window:
//! - a piloted racer flown by a synthetic stick signal
//! - a scripted fighter lapping a rectangular circuit
//!
//! Pass a TOML config path to override the racer tuning, the circuit
//! and the stick shaping. Outputs positions and pipeline telemetry.

use std::env;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use vela::{SimConfig, Simulation};
use vela::config::{
    action_bindings_from_config, apply_ship_tuning, flight_path_from_config,
    input_shaping_from_config,
};
use vela_flight::{
    Authority, FlightMode, FlightPath, Physics, ShipPreset, ThrusterSystem, Transform,
    UnifiedFlightControl,
};
use vela_input::Action;
use vela_shared::math::Vec3;

const INPUT_DT: f32 = 1.0 / 120.0;
const DURATION_SECS: f32 = 20.0;

fn main() -> ExitCode {
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║                  VELA - HEADLESS FLIGHT DEMO                     ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let config = match env::args().nth(1) {
        Some(path) => match SimConfig::load(Path::new(&path)) {
            Ok(config) => {
                println!("Loaded config from {path}");
                config
            }
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => SimConfig::default(),
    };

    let mut sim = Simulation::new(16);
    match action_bindings_from_config(&config.input.bindings) {
        Ok(bindings) => sim.set_bindings(bindings),
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    }

    // Piloted racer.
    let racer = sim
        .spawn_ship(ShipPreset::Racer, Vec3::ZERO)
        .expect("world has room");
    sim.set_player(racer);
    {
        let world = sim.world_mut();
        let mut physics = *world.get::<Physics>(racer).expect("racer physics");
        let mut thrusters = *world.get::<ThrusterSystem>(racer).expect("racer thrusters");
        apply_ship_tuning(&config.ship, &mut physics, &mut thrusters);
        let _ = world.set_component(racer, physics);
        let _ = world.set_component(racer, thrusters);

        let mut control = *world.get::<UnifiedFlightControl>(racer).expect("racer control");
        control.setup_manual_flight();
        control.input_config = input_shaping_from_config(&config.input);
        let _ = world.set_component(racer, control);
    }

    // Scripted fighter on a circuit.
    let fighter = sim
        .spawn_ship(ShipPreset::Fighter, Vec3::new(50.0, 10.0, 0.0))
        .expect("world has room");
    let path = if config.path.waypoints.is_empty() {
        FlightPath::circuit(10.0)
    } else {
        match flight_path_from_config(&config.path) {
            Ok(path) => path,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        }
    };
    {
        let world = sim.world_mut();
        let mut control = *world.get::<UnifiedFlightControl>(fighter).expect("fighter control");
        control.request_authority(Authority::Script, fighter);
        control.set_mode(FlightMode::Scripted);
        control.load_path(path);
        if let Err(err) = control.start_script() {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
        let _ = world.set_component(fighter, control);
    }

    println!("Racer mass:    {} kg", config.ship.mass);
    println!("Circuit size:  {} waypoints", {
        let world = sim.world();
        world
            .get::<UnifiedFlightControl>(fighter)
            .map_or(0, |c| c.path.len())
    });
    println!("Duration:      {DURATION_SECS} s simulated");
    println!();

    let start = Instant::now();
    let steps = (DURATION_SECS / INPUT_DT) as u32;
    for step in 0..steps {
        // Synthetic pilot: slow weave on the stick, steady forward burn.
        let t = step as f32 * INPUT_DT;
        let actions = sim.actions_mut();
        actions.set(Action::StickX, 0.4 * (t * 0.7).sin());
        actions.set(Action::StickY, 0.25 * (t * 0.4).cos());
        actions.set(Action::ThrustForward, 0.8);

        sim.tick(INPUT_DT);

        if step % (steps / 4) == 0 && step > 0 {
            report_positions(&sim, racer, fighter);
        }
    }
    let elapsed = start.elapsed();

    println!();
    println!("┌─ FINAL STATE ───────────────────────────────────────────────────┐");
    report_positions(&sim, racer, fighter);
    let telemetry = sim.input_telemetry();
    println!(
        "│ pipeline: phase {:?}, λ {:.2}, {} samples, budget_exceeded {}",
        telemetry.phase,
        telemetry.mixing_lambda,
        telemetry.samples_processed,
        telemetry.budget_exceeded,
    );
    println!("└─────────────────────────────────────────────────────────────────┘");
    println!();
    println!(
        "Simulated {:.0} s in {:.2} ms wall time ({} ticks)",
        sim.sim_time(),
        elapsed.as_secs_f64() * 1000.0,
        steps,
    );
    for stat in sim.stats() {
        println!(
            "  {:<10} {:>6} calls @ {:>6.1} Hz effective",
            stat.name, stat.calls, stat.effective_hz,
        );
    }
    sim.log_report();

    ExitCode::SUCCESS
}

fn report_positions(
    sim: &Simulation,
    racer: vela_core::EntityId,
    fighter: vela_core::EntityId,
) {
    let position = |id| {
        sim.world()
            .get::<Transform>(id)
            .map_or(Vec3::ZERO, |t| t.position)
    };
    let speed = |id| {
        sim.world()
            .get::<Physics>(id)
            .map_or(0.0, |p| p.velocity.length())
    };
    let r = position(racer);
    let f = position(fighter);
    println!(
        "│ t={:>5.1}s  racer ({:>7.1}, {:>6.1}, {:>7.1}) {:>5.1} m/s   fighter ({:>7.1}, {:>6.1}, {:>7.1}) {:>5.1} m/s",
        sim.sim_time(),
        r.x, r.y, r.z, speed(racer),
        f.x, f.y, f.z, speed(fighter),
    );
}
