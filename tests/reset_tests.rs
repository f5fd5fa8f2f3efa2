use glam::{Quat, Vec2, Vec3};
use ragdoll_playground::{
    backend::{SandboxBackend, SimulationBackend},
    config::{AssemblyConfig, DragConfig},
    core::{MotionMode, PartId},
    interaction::{
        CommandBuffer, DragController, DragState, GrabOutcome, PointerId, ResetCoordinator,
        ViewCamera,
    },
    rig::{presets, Ragdoll, RagdollAssembler},
    RagdollPlayground,
};

const DT: f32 = 1.0 / 60.0;

fn camera() -> ViewCamera {
    ViewCamera::looking_at(Vec3::new(0.0, 8.0, 12.0), Vec3::new(0.0, 8.0, 0.0))
}

fn figure() -> RagdollPlayground<SandboxBackend> {
    RagdollPlayground::from_table(
        &presets::stick_figure(Vec3::new(0.0, 7.0, 0.0)),
        AssemblyConfig::default(),
        SandboxBackend::new(),
        camera(),
        DragConfig::default(),
    )
    .unwrap()
}

/// Every tracked part at rest, at its rest position, under simulation.
fn assert_at_rest(pg: &RagdollPlayground<SandboxBackend>) {
    let backend = pg.backend();
    for part in pg.ragdoll().tracked_parts() {
        let handle = pg.ragdoll().handle(&part.id).unwrap();
        assert_eq!(backend.translation(handle), Some(part.rest_position), "{}", part.id);
        assert_eq!(backend.rotation(handle), Some(Quat::IDENTITY));
        assert_eq!(backend.linear_velocity(handle), Some(Vec3::ZERO));
        assert_eq!(backend.angular_velocity(handle), Some(Vec3::ZERO));
        assert_eq!(backend.motion_mode(handle), Some(MotionMode::Simulated));
        assert_ne!(pg.state(&part.id), DragState::Dragging);
    }
}

fn grab_head(pg: &mut RagdollPlayground<SandboxBackend>) -> PartId {
    let head = pg.ragdoll().rest_position(&PartId::new("head")).unwrap();
    let at = pg.camera().project(head).unwrap();
    let (part, outcome) = pg.pointer_down(PointerId::PRIMARY, at).unwrap();
    assert_eq!(outcome, GrabOutcome::Started);
    part
}

#[test]
fn reset_restores_rest_pose_after_falling() {
    let mut pg = figure();
    for _ in 0..120 {
        pg.tick(DT);
    }
    let root = pg.ragdoll().handle(&PartId::new("root")).unwrap();
    assert!(pg.backend().translation(root).unwrap().y < 7.0);

    let reset = pg.reset();

    assert_eq!(reset, 10);
    assert_at_rest(&pg);
}

#[test]
fn reset_is_idempotent() {
    let mut pg = figure();
    for _ in 0..30 {
        pg.tick(DT);
    }

    pg.reset();
    let first: Vec<_> = pg
        .ragdoll()
        .tracked_parts()
        .map(|part| {
            let handle = pg.ragdoll().handle(&part.id).unwrap();
            pg.backend().body(handle).unwrap().transform
        })
        .collect();
    let switches = pg.backend().mode_switches();

    pg.reset();
    let second: Vec<_> = pg
        .ragdoll()
        .tracked_parts()
        .map(|part| {
            let handle = pg.ragdoll().handle(&part.id).unwrap();
            pg.backend().body(handle).unwrap().transform
        })
        .collect();

    assert_eq!(first, second);
    assert_eq!(pg.backend().mode_switches(), switches);
    assert_at_rest(&pg);
}

#[test]
fn reset_mid_drag_ends_the_session() {
    let mut pg = figure();
    let part = grab_head(&mut pg);
    let head = pg.ragdoll().rest_position(&part).unwrap();
    for i in 1..=5 {
        let at = pg.camera().project(head + Vec3::X * 0.02 * i as f32).unwrap();
        pg.pointer_move(PointerId::PRIMARY, at);
        pg.tick(DT);
    }
    assert_eq!(pg.state(&part), DragState::Dragging);
    pg.drain_events();

    pg.reset();

    assert_at_rest(&pg);
    assert!(pg.controller().session(&part).is_none());

    // The pointer coming up later has nothing left to release.
    pg.pointer_up(PointerId::PRIMARY);
    assert!(pg.drain_events().is_empty());
    assert_at_rest(&pg);
}

#[test]
fn reset_after_velocity_cap() {
    let mut pg = figure();
    let part = grab_head(&mut pg);
    let far = pg.camera().project(Vec3::new(4.0, 9.0, 0.0)).unwrap();
    pg.pointer_move(PointerId::PRIMARY, far);
    pg.tick(DT);
    assert_eq!(pg.state(&part), DragState::VelocityCapped);

    pg.reset();

    assert_at_rest(&pg);
    assert!(pg.controller().sessions().next().is_none());
}

#[test]
fn reset_leaves_world_anchors_alone() {
    let pivots = [Vec3::new(-2.0, 3.5, 0.0), Vec3::new(2.0, 3.5, 0.0)];
    let mut pg = RagdollPlayground::from_table(
        &presets::hanging_pendulums(&pivots),
        AssemblyConfig::default(),
        SandboxBackend::new(),
        camera(),
        DragConfig::default(),
    )
    .unwrap();
    for _ in 0..10 {
        pg.tick(DT);
    }

    assert_eq!(pg.reset(), 2);

    let pivot = pg.ragdoll().handle(&PartId::new("pivot0")).unwrap();
    assert_eq!(pg.backend().motion_mode(pivot), Some(MotionMode::Anchored));
    assert_eq!(pg.backend().translation(pivot), Some(pivots[0]));
    assert_at_rest(&pg);
}

#[test]
fn missing_handles_are_skipped_not_fatal() {
    let blueprint = RagdollAssembler::default()
        .assemble(&presets::stick_figure(Vec3::ZERO))
        .unwrap();
    let mut backend = SandboxBackend::new();
    let ragdoll = Ragdoll::spawn(blueprint, &mut backend);
    let mut controller = DragController::new(DragConfig::default());
    let hand = PartId::new("handL");

    backend.remove_body(ragdoll.handle(&hand).unwrap());

    let mut out = CommandBuffer::new();
    let outcome = controller.pointer_down(
        PointerId::PRIMARY,
        Vec2::ZERO,
        &hand,
        &camera(),
        &ragdoll.view(&backend),
        &mut out,
    );
    assert_eq!(outcome, GrabOutcome::MissingHandle);
    assert!(out.is_empty());

    let planned = ResetCoordinator::plan(&ragdoll, &mut controller, &backend, &mut out);
    assert_eq!(planned, 9);
    assert!(out.commands().iter().all(|command| command.part() != &hand));

    assert_eq!(out.apply(&ragdoll, &mut backend), 9 * 5);
    assert_eq!(ResetCoordinator::reset(&ragdoll, &mut controller, &mut backend), 9);
}

#[test]
fn part_vanishing_mid_drag_drops_its_session() {
    let mut pg = figure();
    let part = grab_head(&mut pg);

    let handle = pg.ragdoll().handle(&part).unwrap();
    pg.backend_mut().remove_body(handle);
    pg.tick(DT);

    assert!(pg.controller().session(&part).is_none());
    assert_eq!(pg.reset(), 9);
}

#[test]
fn capped_part_vanishing_drops_its_session() {
    let mut pg = figure();
    let part = grab_head(&mut pg);
    let far = pg.camera().project(Vec3::new(4.0, 9.0, 0.0)).unwrap();
    pg.pointer_move(PointerId::PRIMARY, far);
    pg.tick(DT);
    assert_eq!(pg.state(&part), DragState::VelocityCapped);

    let handle = pg.ragdoll().handle(&part).unwrap();
    pg.backend_mut().remove_body(handle);
    pg.tick(DT);

    assert!(pg.controller().session(&part).is_none());
    assert_ne!(pg.state(&part), DragState::VelocityCapped);
}
