use approx::assert_abs_diff_eq;
use glam::{Vec2, Vec3};
use ragdoll_playground::{
    backend::{SandboxBackend, SimulationBackend},
    config::{AssemblyConfig, BodyDefaults, DragConfig},
    core::{BodyPart, MotionMode, PartId},
    interaction::{CancelReason, CursorHint, DragEvent, DragState, GrabOutcome, PointerId, ViewCamera},
    rig::presets,
    RagdollPlayground,
};

const DT: f32 = 1.0 / 60.0;

fn camera() -> ViewCamera {
    ViewCamera::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO)
}

fn undamped() -> AssemblyConfig {
    AssemblyConfig {
        bodies: BodyDefaults {
            linear_damping: 0.0,
            angular_damping: 0.0,
            friction: 1.0,
        },
        ..AssemblyConfig::default()
    }
}

fn playground(table: &[BodyPart]) -> RagdollPlayground<SandboxBackend> {
    RagdollPlayground::from_table(
        table,
        undamped(),
        SandboxBackend::without_gravity(),
        camera(),
        DragConfig::default(),
    )
    .unwrap()
}

fn single_box() -> RagdollPlayground<SandboxBackend> {
    playground(&[BodyPart::new("box", Vec3::ZERO, Vec3::splat(0.5))])
}

fn two_boxes() -> RagdollPlayground<SandboxBackend> {
    playground(&[
        BodyPart::new("left", Vec3::new(-2.0, 0.0, 0.0), Vec3::splat(0.5)),
        BodyPart::new("right", Vec3::new(2.0, 0.0, 0.0), Vec3::splat(0.5)),
    ])
}

fn ndc(pg: &RagdollPlayground<SandboxBackend>, point: Vec3) -> Vec2 {
    pg.camera().project(point).unwrap()
}

fn position(pg: &RagdollPlayground<SandboxBackend>, id: &str) -> Vec3 {
    let handle = pg.ragdoll().handle(&PartId::new(id)).unwrap();
    pg.backend().translation(handle).unwrap()
}

fn velocity(pg: &RagdollPlayground<SandboxBackend>, id: &str) -> Vec3 {
    let handle = pg.ragdoll().handle(&PartId::new(id)).unwrap();
    pg.backend().linear_velocity(handle).unwrap()
}

fn mode(pg: &RagdollPlayground<SandboxBackend>, id: &str) -> MotionMode {
    let handle = pg.ragdoll().handle(&PartId::new(id)).unwrap();
    pg.backend().motion_mode(handle).unwrap()
}

/// Moves `pointer` so that it sits over `point`, then ticks once.
fn drag_to(pg: &mut RagdollPlayground<SandboxBackend>, pointer: PointerId, point: Vec3) {
    let at = ndc(pg, point);
    pg.pointer_move(pointer, at);
    pg.tick(DT);
}

#[test]
fn grab_hands_control_over_immediately() {
    let mut pg = single_box();
    let id = PartId::new("box");
    assert_eq!(mode(&pg, "box"), MotionMode::Simulated);

    let at = ndc(&pg, Vec3::ZERO);
    let (part, outcome) = pg.pointer_down(PointerId::PRIMARY, at).unwrap();

    assert_eq!(part, id);
    assert_eq!(outcome, GrabOutcome::Started);
    assert_eq!(mode(&pg, "box"), MotionMode::UserControlled);
    assert_eq!(pg.state(&id), DragState::Dragging);
    assert_eq!(pg.cursor_hint(), CursorHint::Grabbing);
    assert_eq!(pg.backend().mode_switches(), 1);
    assert_eq!(
        pg.drain_events(),
        vec![DragEvent::Grabbed {
            part: id,
            pointer: PointerId::PRIMARY
        }]
    );
}

#[test]
fn steady_drag_converges_and_release_throws() {
    let mut pg = single_box();
    let id = PartId::new("box");
    let at = ndc(&pg, Vec3::ZERO);
    pg.pointer_down(PointerId::PRIMARY, at).unwrap();

    let v = Vec3::new(3.0, 1.5, 0.0);
    for i in 1..=60 {
        drag_to(&mut pg, PointerId::PRIMARY, v * DT * i as f32);
    }

    let estimate = pg.controller().session(&id).unwrap().velocity_estimate;
    assert_abs_diff_eq!(estimate.distance(v), 0.0, epsilon = 0.05);
    assert_abs_diff_eq!(position(&pg, "box").distance(v), 0.0, epsilon = 1e-3);
    assert_eq!(mode(&pg, "box"), MotionMode::UserControlled);

    let signal = &pg.debug_signals()[0];
    assert_abs_diff_eq!(signal.velocity_fraction, v.length() / 20.0, epsilon = 0.01);

    pg.drain_events();
    pg.pointer_up(PointerId::PRIMARY);

    assert_eq!(mode(&pg, "box"), MotionMode::Simulated);
    assert_abs_diff_eq!(velocity(&pg, "box").distance(estimate * 1.5), 0.0, epsilon = 1e-4);
    match pg.drain_events().as_slice() {
        [DragEvent::Released { part, throw: Some(throw) }] => {
            assert_eq!(part, &id);
            assert_abs_diff_eq!(throw.distance(estimate * 1.5), 0.0, epsilon = 1e-4);
        }
        other => panic!("expected one release, got {other:?}"),
    }
    assert_ne!(pg.state(&id), DragState::Dragging);
}

#[test]
fn slow_release_drops_without_throw() {
    let mut pg = single_box();
    let at = ndc(&pg, Vec3::ZERO);
    pg.pointer_down(PointerId::PRIMARY, at).unwrap();
    for _ in 0..5 {
        drag_to(&mut pg, PointerId::PRIMARY, Vec3::ZERO);
    }
    pg.drain_events();

    pg.pointer_up(PointerId::PRIMARY);

    assert_eq!(mode(&pg, "box"), MotionMode::Simulated);
    assert_eq!(velocity(&pg, "box"), Vec3::ZERO);
    assert!(matches!(
        pg.drain_events().as_slice(),
        [DragEvent::Released { throw: None, .. }]
    ));
}

#[test]
fn velocity_cap_fires_on_the_fast_tick_only() {
    let mut pg = single_box();
    let id = PartId::new("box");
    let at = ndc(&pg, Vec3::ZERO);
    pg.pointer_down(PointerId::PRIMARY, at).unwrap();

    let slow = Vec3::new(1.0, 0.0, 0.0);
    for i in 1..=5 {
        drag_to(&mut pg, PointerId::PRIMARY, slow * DT * i as f32);
        assert_eq!(pg.state(&id), DragState::Dragging, "capped early at tick {i}");
    }
    pg.drain_events();

    // One-tick jump of a full unit: 60 m/s at 60 Hz.
    let last = slow * DT * 5.0;
    drag_to(&mut pg, PointerId::PRIMARY, last + Vec3::X);

    assert_eq!(pg.state(&id), DragState::VelocityCapped);
    assert_eq!(mode(&pg, "box"), MotionMode::Simulated);
    let capped = match pg.drain_events().as_slice() {
        [DragEvent::VelocityCapped { part, velocity }] => {
            assert_eq!(part, &id);
            *velocity
        }
        other => panic!("expected one cap event, got {other:?}"),
    };
    assert_abs_diff_eq!(capped.length(), 20.0, epsilon = 1e-3);
    assert!(capped.x > 0.0);
    assert_abs_diff_eq!(velocity(&pg, "box").distance(capped), 0.0, epsilon = 1e-4);

    // The pointer no longer steers the part.
    let after_cap = position(&pg, "box");
    for _ in 0..10 {
        drag_to(&mut pg, PointerId::PRIMARY, Vec3::new(-4.0, -2.0, 0.0));
    }
    assert!(position(&pg, "box").x > after_cap.x);
    assert!(pg.drain_events().is_empty());
    assert_eq!(pg.backend().mode_switches(), 2);

    // Release after the cap is silent and leaves the velocity alone.
    let before_up = velocity(&pg, "box");
    pg.pointer_up(PointerId::PRIMARY);
    assert!(pg.drain_events().is_empty());
    assert_eq!(velocity(&pg, "box"), before_up);
    assert_eq!(pg.backend().mode_switches(), 2);
    assert_ne!(pg.state(&id), DragState::VelocityCapped);
}

#[test]
fn lower_cap_is_honoured() {
    let mut pg = RagdollPlayground::from_table(
        &[BodyPart::new("box", Vec3::ZERO, Vec3::splat(0.5))],
        undamped(),
        SandboxBackend::without_gravity(),
        camera(),
        DragConfig::default().with_max_velocity(5.0),
    )
    .unwrap();
    let at = ndc(&pg, Vec3::ZERO);
    pg.pointer_down(PointerId::PRIMARY, at).unwrap();
    pg.drain_events();

    // 6 m/s sample: under the default cap, over this one.
    drag_to(&mut pg, PointerId::PRIMARY, Vec3::new(0.1, 0.0, 0.0));

    match pg.drain_events().as_slice() {
        [DragEvent::VelocityCapped { velocity, .. }] => {
            assert_abs_diff_eq!(velocity.length(), 5.0, epsilon = 1e-3)
        }
        other => panic!("expected a cap, got {other:?}"),
    }
}

#[test]
fn zero_dt_tick_stays_finite() {
    let mut pg = single_box();
    let id = PartId::new("box");
    let at = ndc(&pg, Vec3::ZERO);
    pg.pointer_down(PointerId::PRIMARY, at).unwrap();

    let target = ndc(&pg, Vec3::new(0.01, 0.0, 0.0));
    pg.pointer_move(PointerId::PRIMARY, target);
    pg.tick(0.0);

    let estimate = pg.controller().session(&id).unwrap().velocity_estimate;
    assert!(estimate.is_finite());
    // 0.01 m over the 1/240 s floor, smoothed by 0.35.
    assert_abs_diff_eq!(estimate.x, 0.01 * 240.0 * 0.35, epsilon = 1e-2);
}

#[test]
fn pointer_leaving_cancels_every_drag() {
    let mut pg = two_boxes();
    let left = ndc(&pg, Vec3::new(-2.0, 0.0, 0.0));
    let right = ndc(&pg, Vec3::new(2.0, 0.0, 0.0));
    pg.pointer_down(PointerId(0), left).unwrap();
    pg.pointer_down(PointerId(1), right).unwrap();
    for i in 1..=10 {
        drag_to(&mut pg, PointerId(0), Vec3::new(-2.0 + 0.05 * i as f32, 0.0, 0.0));
    }
    pg.drain_events();

    pg.cancel(CancelReason::PointerLeft);

    assert_eq!(mode(&pg, "left"), MotionMode::Simulated);
    assert_eq!(mode(&pg, "right"), MotionMode::Simulated);
    assert!(pg.controller().sessions().next().is_none());
    assert_ne!(pg.cursor_hint(), CursorHint::Grabbing);

    let events = pg.drain_events();
    assert_eq!(events.len(), 2);
    assert!(events
        .iter()
        .all(|event| matches!(event, DragEvent::Released { .. })));
    // The moving part kept its momentum, the still one did not get any.
    assert!(velocity(&pg, "left").x > 0.0);
    assert_eq!(velocity(&pg, "right"), Vec3::ZERO);
}

#[test]
fn parts_are_dragged_independently() {
    let mut pg = two_boxes();
    let left_id = PartId::new("left");
    let right_id = PartId::new("right");
    let left = ndc(&pg, Vec3::new(-2.0, 0.0, 0.0));
    let right = ndc(&pg, Vec3::new(2.0, 0.0, 0.0));

    assert_eq!(pg.pointer_down(PointerId(0), left).unwrap().1, GrabOutcome::Started);
    assert_eq!(pg.pointer_down(PointerId(1), right).unwrap().1, GrabOutcome::Started);

    for i in 1..=10 {
        drag_to(&mut pg, PointerId(0), Vec3::new(-2.0, 0.05 * i as f32, 0.0));
    }

    assert_abs_diff_eq!(position(&pg, "left").y, 0.5, epsilon = 1e-3);
    assert_abs_diff_eq!(position(&pg, "right").distance(Vec3::new(2.0, 0.0, 0.0)), 0.0, epsilon = 1e-3);
    let right_speed = pg.controller().session(&right_id).unwrap().velocity_estimate.length();
    assert!(right_speed < 0.1);

    pg.pointer_up(PointerId(0));
    assert_eq!(mode(&pg, "left"), MotionMode::Simulated);
    assert_eq!(mode(&pg, "right"), MotionMode::UserControlled);
    assert_ne!(pg.state(&left_id), DragState::Dragging);
    assert_eq!(pg.state(&right_id), DragState::Dragging);
}

#[test]
fn second_grab_on_held_part_is_ignored() {
    let mut pg = single_box();
    let id = PartId::new("box");
    let at = ndc(&pg, Vec3::ZERO);
    pg.pointer_down(PointerId(0), at).unwrap();

    let (_, outcome) = pg.pointer_down(PointerId(1), at).unwrap();
    assert_eq!(outcome, GrabOutcome::AlreadyDragging);
    assert_eq!(pg.backend().mode_switches(), 1);
    assert_eq!(pg.controller().session(&id).unwrap().pointer, PointerId(0));

    // The intruding pointer does not own the session.
    pg.pointer_up(PointerId(1));
    assert_eq!(pg.state(&id), DragState::Dragging);
    assert_eq!(mode(&pg, "box"), MotionMode::UserControlled);
}

#[test]
fn suppression_cancels_and_blocks_grabs() {
    let mut pg = single_box();
    let id = PartId::new("box");
    let at = ndc(&pg, Vec3::ZERO);
    pg.pointer_down(PointerId::PRIMARY, at).unwrap();
    pg.drain_events();

    pg.set_suppressed(true);
    assert_eq!(mode(&pg, "box"), MotionMode::Simulated);
    assert!(matches!(
        pg.drain_events().as_slice(),
        [DragEvent::Released { .. }]
    ));

    let (_, outcome) = pg.pointer_down(PointerId::PRIMARY, at).unwrap();
    assert_eq!(outcome, GrabOutcome::Suppressed);
    assert_ne!(pg.state(&id), DragState::Dragging);

    pg.set_suppressed(false);
    let (_, outcome) = pg.pointer_down(PointerId::PRIMARY, at).unwrap();
    assert_eq!(outcome, GrabOutcome::Started);
}

#[test]
fn world_anchors_cannot_be_picked() {
    let mut pg = playground(&presets::rope(3, Vec3::ZERO));
    let at = ndc(&pg, Vec3::ZERO);

    assert!(pg.pointer_move(PointerId::PRIMARY, at).is_none());
    assert!(pg.pointer_down(PointerId::PRIMARY, at).is_none());
    assert_eq!(mode(&pg, "rope0"), MotionMode::Anchored);

    let at = ndc(&pg, Vec3::new(1.0, 0.0, 0.0));
    let (part, outcome) = pg.pointer_down(PointerId::PRIMARY, at).unwrap();
    assert_eq!(part, PartId::new("rope1"));
    assert!(outcome.started());
}

#[test]
fn hover_follows_the_pointer() {
    let mut pg = single_box();
    let id = PartId::new("box");

    let over = ndc(&pg, Vec3::ZERO);
    assert_eq!(pg.pointer_move(PointerId::PRIMARY, over), Some(id.clone()));
    assert_eq!(pg.state(&id), DragState::Hovering);
    assert_eq!(pg.cursor_hint(), CursorHint::Grab);

    let away = ndc(&pg, Vec3::new(3.0, 3.0, 0.0));
    assert_eq!(pg.pointer_move(PointerId::PRIMARY, away), None);
    assert_eq!(pg.state(&id), DragState::Idle);
    assert_eq!(pg.cursor_hint(), CursorHint::Default);
}

#[test]
fn grab_without_a_prior_move_still_hovers() {
    let mut pg = single_box();
    let id = PartId::new("box");

    let over = ndc(&pg, Vec3::ZERO);
    let (part, outcome) = pg.pointer_down(PointerId::PRIMARY, over).unwrap();
    assert_eq!(part, id);
    assert_eq!(outcome, GrabOutcome::Started);

    pg.pointer_up(PointerId::PRIMARY);
    assert_eq!(pg.state(&id), DragState::Hovering);
    assert_eq!(pg.cursor_hint(), CursorHint::Grab);

    let away = ndc(&pg, Vec3::new(3.0, 3.0, 0.0));
    assert_eq!(pg.pointer_move(PointerId::PRIMARY, away), None);
    assert_eq!(pg.state(&id), DragState::Idle);
    assert_eq!(pg.cursor_hint(), CursorHint::Default);
}

#[test]
fn hover_lasts_while_any_pointer_remains() {
    let mut pg = single_box();
    let id = PartId::new("box");
    let touch = PointerId(1);

    let over = ndc(&pg, Vec3::ZERO);
    let away = ndc(&pg, Vec3::new(3.0, 3.0, 0.0));
    pg.pointer_move(PointerId::PRIMARY, over);
    pg.pointer_move(touch, over);

    assert_eq!(pg.pointer_move(PointerId::PRIMARY, away), None);
    assert_eq!(pg.state(&id), DragState::Hovering);
    assert_eq!(pg.cursor_hint(), CursorHint::Grab);
    assert_eq!(pg.debug_signals().len(), 1);

    assert_eq!(pg.pointer_move(touch, away), None);
    assert_eq!(pg.state(&id), DragState::Idle);
    assert_eq!(pg.cursor_hint(), CursorHint::Default);
    assert!(pg.debug_signals().is_empty());
}
