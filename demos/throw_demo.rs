use ragdoll_playground::{rig::presets, *};

const DT: f32 = 1.0 / 60.0;

fn main() -> Result<()> {
    let pivots: Vec<Vec3> = presets::PENDULUM_PIVOTS.iter().copied().map(Vec3::from).collect();
    let mut table = presets::stick_figure(Vec3::new(0.0, presets::STICK_FIGURE_DROP_HEIGHT, 0.0));
    table.extend(presets::hanging_pendulums(&pivots));

    let mut playground = RagdollPlayground::from_table(
        &table,
        AssemblyConfig::default(),
        SandboxBackend::new(),
        ViewCamera::default(),
        DragConfig::default(),
    )?;

    let bar = PartId::new("pendulum3");
    let handle = playground.ragdoll().handle(&bar).expect("pendulum spawned");
    let start = playground.backend().translation(handle).expect("live body");

    let at = playground.camera().project(start).expect("bar in view");
    if let Some((part, outcome)) = playground.pointer_down(PointerId::PRIMARY, at) {
        println!("pointer down on {part}: {outcome:?}");
    }

    // Swipe sideways, speeding up until the cap kicks in.
    let right = playground.camera().forward().cross(Vec3::Y).normalize();
    let mut offset = 0.0;
    for frame in 0..40 {
        offset += 0.02 * (1.0 + frame as f32 * 0.2);
        let ndc = playground
            .camera()
            .project(start + right * offset)
            .expect("bar in view");
        playground.pointer_move(PointerId::PRIMARY, ndc);
        playground.tick(DT);

        for event in playground.drain_events() {
            println!("frame {frame:>2}: {event:?}");
        }
        if frame % 10 == 0 {
            for signal in playground.debug_signals() {
                println!(
                    "frame {frame:>2}: {} {:?} speed {:>3.0}%",
                    signal.part,
                    signal.state,
                    signal.velocity_fraction * 100.0
                );
            }
        }
    }
    playground.pointer_up(PointerId::PRIMARY);

    for _ in 0..60 {
        playground.tick(DT);
    }
    println!(
        "bar after one second of flight: {:?}",
        playground.backend().translation(handle)
    );

    let reset = playground.reset();
    println!(
        "reset {reset} parts, bar back at {:?}",
        playground.backend().translation(handle)
    );
    Ok(())
}
