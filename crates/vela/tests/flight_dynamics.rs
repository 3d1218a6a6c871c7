//! End-to-end flight tests through the assembled simulation: synthetic
//! actions in, scheduled systems, positions out.

use vela::Simulation;
use vela_flight::{
    Authority, FlightMode, FlightPath, Physics, ShipPreset, Transform, UnifiedFlightControl,
    Waypoint, WaypointKind,
};
use vela_input::Action;
use vela_shared::math::Vec3;

const DT: f32 = 1.0 / 120.0;

fn start_circuit(sim: &mut Simulation, id: vela_core::EntityId, path: FlightPath) {
    let world = sim.world_mut();
    let mut control = *world.get::<UnifiedFlightControl>(id).unwrap();
    control.request_authority(Authority::Script, id);
    control.set_mode(FlightMode::Scripted);
    control.load_path(path);
    control.start_script().unwrap();
    world.set_component(id, control).unwrap();
}

#[test]
fn scripted_ship_closes_on_first_waypoint() {
    let mut sim = Simulation::new(4);
    let ship = sim.spawn_ship(ShipPreset::Fighter, Vec3::ZERO).unwrap();
    start_circuit(&mut sim, ship, FlightPath::circuit(0.0));

    let target = Vec3::new(50.0, 0.0, 0.0);
    let initial = (target - Vec3::ZERO).length();

    for _ in 0..(12.0 / DT) as u32 {
        sim.tick(DT);
    }

    let position = sim.world().get::<Transform>(ship).unwrap().position;
    let distance = (target - position).length();
    assert!(
        distance < initial * 0.5,
        "ship should have closed on the waypoint: {distance} m of {initial} m left"
    );
}

#[test]
fn hover_waypoint_holds_station() {
    let spot = Vec3::new(5.0, 2.0, 5.0);
    let mut path = FlightPath::new();
    path.push(Waypoint {
        position: spot,
        kind: WaypointKind::Hover,
        hover_duration: 60.0,
        tolerance: 2.0,
        ..Waypoint::default()
    })
    .unwrap();

    let mut sim = Simulation::new(4);
    let ship = sim.spawn_ship(ShipPreset::Fighter, spot).unwrap();
    start_circuit(&mut sim, ship, path);

    for _ in 0..(4.0 / DT) as u32 {
        sim.tick(DT);
    }

    let position = sim.world().get::<Transform>(ship).unwrap().position;
    let drift = (position - spot).length();
    assert!(drift < 2.0, "hovering ship drifted {drift} m");
}

#[test]
fn stick_pitch_produces_positive_pitch_rate() {
    let mut sim = Simulation::new(4);
    let ship = sim.spawn_ship(ShipPreset::Fighter, Vec3::ZERO).unwrap();
    sim.set_player(ship);
    sim.actions_mut().set(Action::StickY, 1.0);

    for _ in 0..(1.0 / DT) as u32 {
        sim.tick(DT);
    }

    let physics = sim.world().get::<Physics>(ship).unwrap();
    assert!(
        physics.angular_velocity.x > 0.0,
        "full stick-up should pitch the ship: {:?}",
        physics.angular_velocity
    );
}

#[test]
fn identical_runs_are_deterministic() {
    let run = || {
        let mut sim = Simulation::new(4);
        let ship = sim.spawn_ship(ShipPreset::Fighter, Vec3::ZERO).unwrap();
        start_circuit(&mut sim, ship, FlightPath::circuit(10.0));
        for _ in 0..(4.0 / DT) as u32 {
            sim.tick(DT);
        }
        let transform = sim.world().get::<Transform>(ship).unwrap();
        let physics = sim.world().get::<Physics>(ship).unwrap();
        (
            transform.position.to_array(),
            physics.velocity.to_array(),
            physics.angular_velocity.to_array(),
        )
    };

    assert_eq!(run(), run(), "same inputs must replay bit-identically");
}

#[test]
fn boost_outruns_cruise() {
    let distance_after = |boost: f32| {
        let mut sim = Simulation::new(4);
        let ship = sim.spawn_ship(ShipPreset::Racer, Vec3::ZERO).unwrap();
        sim.set_player(ship);
        // Partial throttle: thruster commands saturate at 1, so boost
        // only shows up below full burn.
        sim.actions_mut().set(Action::ThrustForward, 0.3);
        sim.actions_mut().set(Action::Boost, boost);
        for _ in 0..(3.0 / DT) as u32 {
            sim.tick(DT);
        }
        sim.world().get::<Transform>(ship).unwrap().position.z
    };

    let cruise = distance_after(0.0);
    let boosted = distance_after(1.0);
    assert!(
        boosted > cruise * 1.5,
        "boost should clearly outrun cruise: {boosted} vs {cruise}"
    );
}
