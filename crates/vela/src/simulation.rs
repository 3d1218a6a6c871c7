//! Scheduled simulation assembly.
//!
//! Wires the input pipeline into the flight control chain and runs the
//! whole thing off one [`Scheduler`]: input at 120 Hz, then control,
//! thrusters and physics at 60 Hz. The host owns a [`Simulation`] and
//! calls [`Simulation::tick`] once per frame with wall-clock delta.

use vela_core::{CoreResult, EntityId, Scheduler, SystemStats};
use vela_flight::systems::{control_update, physics_update, thruster_update, BehaviorRegistry, PilotCommand};
use vela_flight::{
    AutonomousBehavior, Physics, ShipPreset, ThrusterSystem, Transform, UnifiedFlightControl,
    World,
};
use vela_input::{ActionBindings, ActionBuffer, InputProcessor, InputService, Telemetry};
use vela_shared::math::{Vec2, Vec3, Vec6};

/// Input sampling rate. Twice the physics rate so the calibration
/// statistics see stick motion between physics steps.
const INPUT_HZ: f32 = 120.0;

/// Rate of the control, thruster and physics systems.
const SIM_HZ: f32 = 60.0;

/// Everything the scheduled systems touch, passed to each by the
/// scheduler as plain `&mut` state.
pub struct SimContext {
    /// Entity and component storage.
    pub world: World,
    /// Host-written action values, sampled by the input system.
    pub actions: ActionBuffer,
    /// Action routed to each pilot channel.
    pub bindings: ActionBindings,
    /// Four-layer adaptive stick pipeline.
    pub input: InputProcessor,
    /// Autonomous behaviors keyed by entity.
    pub behaviors: BehaviorRegistry,
    /// The entity the pilot command applies to.
    pub player: EntityId,
    /// Latest processed pilot command, refreshed by the input system.
    pub pilot: PilotCommand,
}

fn input_system(ctx: &mut SimContext, dt: f32) {
    let bindings = ctx.bindings;
    let raw = Vec2::new(
        ctx.actions.value(bindings.stick_x),
        ctx.actions.value(bindings.stick_y),
    );
    let processed = ctx.input.process(raw, dt);

    // The pipeline shapes the stick axes; the discrete thrust actions
    // come through unfiltered.
    let throttle =
        ctx.actions.value(bindings.thrust_forward) - ctx.actions.value(bindings.thrust_back);
    ctx.pilot.axes = Vec6::new(
        processed.pitch,
        processed.yaw,
        ctx.actions.value(bindings.roll),
        ctx.actions.value(bindings.strafe_x),
        ctx.actions.value(bindings.strafe_y),
        throttle,
    );
    ctx.pilot.boost = ctx.actions.value(bindings.boost);
    ctx.pilot.brake = ctx.actions.value(bindings.brake);
}

fn control_system(ctx: &mut SimContext, dt: f32) {
    let pilot = ctx.pilot;
    control_update(&mut ctx.world, ctx.player, &pilot, &mut ctx.behaviors, dt);
}

fn thruster_system(ctx: &mut SimContext, dt: f32) {
    thruster_update(&mut ctx.world, dt);
}

fn physics_system(ctx: &mut SimContext, dt: f32) {
    physics_update(&mut ctx.world, dt);
}

/// The assembled simulation: a world, an input pipeline and the
/// scheduler driving them.
pub struct Simulation {
    ctx: SimContext,
    scheduler: Scheduler<SimContext>,
}

impl Simulation {
    /// Creates a simulation with room for `capacity` entities over its
    /// lifetime.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let mut scheduler = Scheduler::new();
        scheduler.register("input", INPUT_HZ, input_system);
        scheduler.register("control", SIM_HZ, control_system);
        scheduler.register("thrusters", SIM_HZ, thruster_system);
        scheduler.register("physics", SIM_HZ, physics_system);

        Self {
            ctx: SimContext {
                world: World::new(capacity),
                actions: ActionBuffer::new(),
                bindings: ActionBindings::default(),
                input: InputProcessor::new(),
                behaviors: BehaviorRegistry::new(),
                player: EntityId::NULL,
                pilot: PilotCommand::default(),
            },
            scheduler,
        }
    }

    /// Advances the simulation by `dt` seconds of wall time. Systems
    /// run zero or one times each depending on their accumulators.
    pub fn tick(&mut self, dt: f32) {
        self.scheduler.tick(&mut self.ctx, dt);
    }

    /// Spawns a ship with a full component set tuned to `preset`.
    ///
    /// # Errors
    /// [`vela_core::CoreError::CapacityExhausted`] when the world is
    /// full.
    pub fn spawn_ship(&mut self, preset: ShipPreset, position: Vec3) -> CoreResult<EntityId> {
        let id = self.ctx.world.create_entity()?;
        self.ctx.world.set_component(id, Transform::at(position))?;

        let mut physics = Physics::default();
        let mut thrusters = ThrusterSystem::default();
        preset.apply(&mut physics, &mut thrusters);
        self.ctx.world.set_component(id, physics)?;
        self.ctx.world.set_component(id, thrusters)?;
        self.ctx.world.add_component::<UnifiedFlightControl>(id)?;
        tracing::debug!(?preset, index = id.index(), "spawned ship");
        Ok(id)
    }

    /// Marks `id` as the pilot-controlled entity.
    pub fn set_player(&mut self, id: EntityId) {
        self.ctx.player = id;
    }

    /// The pilot-controlled entity, [`EntityId::NULL`] if none.
    #[must_use]
    pub fn player(&self) -> EntityId {
        self.ctx.player
    }

    /// Attaches an autonomous behavior to an entity.
    pub fn register_behavior(&mut self, id: EntityId, behavior: Box<dyn AutonomousBehavior>) {
        self.ctx.behaviors.register(id, behavior);
    }

    /// Read access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.ctx.world
    }

    /// Mutable access to the world.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.ctx.world
    }

    /// The action buffer the host writes each frame.
    pub fn actions_mut(&mut self) -> &mut ActionBuffer {
        &mut self.ctx.actions
    }

    /// Reroutes the pilot channels onto different actions.
    pub fn set_bindings(&mut self, bindings: ActionBindings) {
        self.ctx.bindings = bindings;
    }

    /// Input pipeline telemetry snapshot.
    #[must_use]
    pub fn input_telemetry(&self) -> Telemetry {
        self.ctx.input.telemetry()
    }

    /// Per-system scheduler statistics.
    #[must_use]
    pub fn stats(&self) -> Vec<SystemStats> {
        self.scheduler.stats()
    }

    /// Logs the scheduler report through `tracing`.
    pub fn log_report(&self) {
        self.scheduler.log_report();
    }

    /// Accumulated simulated seconds.
    #[must_use]
    pub fn sim_time(&self) -> f32 {
        self.scheduler.sim_time()
    }
}
