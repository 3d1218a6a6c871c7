//! # Flight World Benchmark
//!
//! Tick cost of the control -> thrusters -> physics chain over fleets
//! of fully-equipped ships.
//!
//! Run with: `cargo bench --package vela_flight`

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vela_flight::systems::{control_update, physics_update, thruster_update, BehaviorRegistry, PilotCommand};
use vela_flight::{Physics, ShipPreset, ThrusterSystem, Transform, UnifiedFlightControl, World};
use vela_shared::math::Vec3;
use vela_core::EntityId;

const DT: f32 = 1.0 / 60.0;

fn spawn_fleet(world: &mut World, count: usize) {
    for i in 0..count {
        let id = world.create_entity().unwrap();
        world
            .set_component(id, Transform::at(Vec3::new(i as f32 * 10.0, 0.0, 0.0)))
            .unwrap();
        let mut physics = Physics::default();
        let mut thrusters = ThrusterSystem::default();
        ShipPreset::Fighter.apply(&mut physics, &mut thrusters);
        physics.velocity = Vec3::new(0.0, 0.0, 5.0);
        world.set_component(id, physics).unwrap();
        thrusters.set_linear_command(Vec3::new(0.0, 0.0, 0.7));
        world.set_component(id, thrusters).unwrap();
        world.add_component::<UnifiedFlightControl>(id).unwrap();
    }
}

fn bench_spawn(c: &mut Criterion) {
    let mut group = c.benchmark_group("spawn_fleet");
    for count in [64_usize, 512, 4096] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut world = World::new(count);
                spawn_fleet(&mut world, count);
                black_box(world.alive_count())
            });
        });
    }
    group.finish();
}

fn bench_physics_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("physics_tick");
    for count in [64_usize, 512, 4096] {
        let mut world = World::new(count);
        spawn_fleet(&mut world, count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                physics_update(&mut world, DT);
                black_box(world.alive_count())
            });
        });
    }
    group.finish();
}

fn bench_full_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("control_thruster_physics_tick");
    for count in [64_usize, 512, 4096] {
        let mut world = World::new(count);
        spawn_fleet(&mut world, count);
        let mut behaviors = BehaviorRegistry::new();
        let pilot = PilotCommand::default();
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                control_update(&mut world, EntityId::NULL, &pilot, &mut behaviors, DT);
                thruster_update(&mut world, DT);
                physics_update(&mut world, DT);
                black_box(world.alive_count())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_spawn, bench_physics_tick, bench_full_chain);
criterion_main!(benches);
