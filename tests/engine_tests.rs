//! Integration tests for the swarm and field engines.
//!
//! These drive the public API the way a host would: build populations
//! through a sink, step them, and check what the sink received.

use swarmfield::{
    drift_step, Drifter, FieldConfig, FieldEngine, Follower, HeadlessSink, Layer, ManualHost,
    RenderSink, Scene, SceneConfig, SpawnContext, SwarmConfig, SwarmEngine, Vec2, Viewport,
};

fn viewport() -> Viewport {
    Viewport::new(1000.0, 600.0)
}

fn still_swarm(followers: Vec<Follower>, sink: &mut dyn RenderSink) -> SwarmEngine {
    let config = SwarmConfig {
        float_amplitude: 0.0,
        ..SwarmConfig::default()
    };
    SwarmEngine::with_followers(config, followers, sink)
}

// ============================================================================
// Swarm
// ============================================================================

#[test]
fn test_swarm_distance_never_grows_toward_still_target() {
    let mut sink = HeadlessSink::new();
    let mut spawn = SpawnContext::seeded(11);
    let config = SwarmConfig {
        float_amplitude: 0.0,
        ..SwarmConfig::default()
    };
    let mut swarm = SwarmEngine::create(config, &mut spawn, viewport(), &mut sink);
    let pointer = Vec2::new(120.0, 480.0);

    for frame in 0..30 {
        let before: Vec<f32> = swarm
            .followers()
            .iter()
            .map(|f| f.position.distance(pointer + f.offset()))
            .collect();
        swarm.step(frame as f32 / 60.0, pointer);

        for (f, d0) in swarm.followers().iter().zip(before) {
            let d1 = f.position.distance(pointer + f.offset());
            if d0 > 0.0 {
                assert!(d1 < d0, "frame {frame}: {d1} >= {d0}");
            } else {
                assert_eq!(d1, 0.0);
            }
        }
    }
}

#[test]
fn test_swarm_follow_rate_is_invariant() {
    let mut sink = HeadlessSink::new();
    let mut spawn = SpawnContext::seeded(3);
    let mut swarm = SwarmEngine::create(SwarmConfig::default(), &mut spawn, viewport(), &mut sink);
    let rates: Vec<f32> = swarm.followers().iter().map(|f| f.follow_rate()).collect();
    let offsets: Vec<Vec2> = swarm.followers().iter().map(|f| f.offset()).collect();

    for frame in 0..120 {
        let pointer = Vec2::new(frame as f32 * 7.0, 300.0);
        swarm.update(frame as f32 / 60.0, pointer, &mut sink);
    }

    for ((f, rate), offset) in swarm.followers().iter().zip(rates).zip(offsets) {
        assert_eq!(f.follow_rate(), rate);
        assert_eq!(f.offset(), offset);
        assert!(rate >= 0.03 && rate < 0.10);
    }
}

#[test]
fn test_swarm_full_catch_up() {
    let mut sink = HeadlessSink::new();
    let follower = Follower::new(Vec2::ZERO, Vec2::ZERO, 1.0, 0, 8.0);
    let mut swarm = still_swarm(vec![follower], &mut sink);

    swarm.update(0.0, Vec2::new(500.0, 300.0), &mut sink);

    assert_eq!(swarm.followers()[0].position, Vec2::new(500.0, 300.0));
    let pose = sink.pose(swarm.elements()[0]).unwrap();
    assert_eq!(pose.position, Vec2::new(500.0, 300.0));
}

#[test]
fn test_swarm_catch_up_from_offscreen() {
    let mut sink = HeadlessSink::new();
    let follower = Follower::new(Vec2::new(-400.0, 2000.0), Vec2::new(10.0, -5.0), 1.0, 3, 8.0);
    let mut swarm = still_swarm(vec![follower], &mut sink);

    swarm.step(0.0, Vec2::new(500.0, 300.0));
    assert_eq!(swarm.followers()[0].position, Vec2::new(510.0, 295.0));
}

#[test]
fn test_swarm_recreate_leaves_exact_count() {
    let mut sink = HeadlessSink::new();
    let mut spawn = SpawnContext::seeded(99);
    let config = SwarmConfig {
        count: 40,
        ..SwarmConfig::default()
    };

    let first = SwarmEngine::create(config.clone(), &mut spawn, viewport(), &mut sink);
    let second = SwarmEngine::create(config, &mut spawn, viewport(), &mut sink);

    assert_eq!(sink.len_layer(Layer::Swarm), 40);
    assert_eq!(sink.len(), 40);
    assert_eq!(second.len(), 40);
    // Old handles are gone for good
    for id in first.elements() {
        assert!(sink.element(*id).is_none());
    }
}

// ============================================================================
// Field
// ============================================================================

#[test]
fn test_field_axis_speed_is_invariant() {
    let mut sink = HeadlessSink::new();
    let mut spawn = SpawnContext::seeded(5);
    let small = Viewport::new(320.0, 240.0);
    let mut field = FieldEngine::create(FieldConfig::default(), &mut spawn, small, &mut sink);
    let speeds: Vec<Vec2> = field.drifters().iter().map(|d| d.velocity.abs()).collect();

    for _ in 0..5_000 {
        field.update(small, &mut sink);
    }

    for (d, speed) in field.drifters().iter().zip(speeds) {
        assert_eq!(d.velocity.abs(), speed);
    }
}

#[test]
fn test_field_reflects_on_moved_position() {
    let mut drifter = Drifter::new(Vec2::new(-250.0, 100.0), Vec2::new(-2.0, 0.0), 200.0);
    drift_step(&mut drifter, viewport());

    assert_eq!(drifter.position, Vec2::new(-252.0, 100.0));
    assert_eq!(drifter.velocity, Vec2::new(2.0, 0.0));
}

#[test]
fn test_field_stays_near_viewport() {
    let mut sink = HeadlessSink::new();
    let mut spawn = SpawnContext::seeded(8);
    let vp = viewport();
    let mut field = FieldEngine::create(FieldConfig::default(), &mut spawn, vp, &mut sink);

    for _ in 0..10_000 {
        field.step(vp);
        for d in field.drifters() {
            let slack = d.margin() + 2.0 * 1.5;
            assert!(d.position.x >= -slack && d.position.x <= vp.width + 2.0 * 1.5);
            assert!(d.position.y >= -slack && d.position.y <= vp.height + 2.0 * 1.5);
        }
    }
}

#[test]
fn test_field_rotation_wraps_in_pose() {
    let mut sink = HeadlessSink::new();
    let mut drifter = Drifter::new(Vec2::new(400.0, 300.0), Vec2::ZERO, 150.0);
    drifter.angular_velocity = 1.5;
    let mut field = FieldEngine::with_drifters(FieldConfig::default(), vec![drifter], &mut sink);

    for _ in 0..240 {
        field.update(viewport(), &mut sink);
    }

    assert_eq!(field.drifters()[0].rotation, 360.0);
    let pose = sink.pose(field.elements()[0]).unwrap();
    assert_eq!(pose.rotation, 0.0);
}

#[test]
fn test_field_recreate_replaces_elements() {
    let mut sink = HeadlessSink::new();
    let mut spawn = SpawnContext::seeded(1);
    FieldEngine::create(FieldConfig::default(), &mut spawn, viewport(), &mut sink);
    let config = FieldConfig {
        count: 3,
        ..FieldConfig::default()
    };
    FieldEngine::create(config, &mut spawn, viewport(), &mut sink);
    assert_eq!(sink.len_layer(Layer::Field), 3);
}

// ============================================================================
// Scene & scheduling
// ============================================================================

fn seeded_scene(seed: u64) -> Scene {
    let config = SceneConfig {
        seed: Some(seed),
        ..SceneConfig::default()
    };
    Scene::new(config, viewport()).unwrap()
}

#[test]
fn test_scene_recreate_makes_old_frame_stale() {
    let mut scene = seeded_scene(40);
    let mut host = ManualHost::new();
    let mut sink = HeadlessSink::new();
    scene.start(&mut host, &mut sink);
    let old = host.drain();

    scene.start_swarm(40, &mut host, &mut sink);
    scene.start_swarm(40, &mut host, &mut sink);
    assert_eq!(sink.len_layer(Layer::Swarm), 40);

    let swarm_before: Vec<Vec2> = scene
        .swarm()
        .unwrap()
        .followers()
        .iter()
        .map(|f| f.position)
        .collect();
    for token in old.iter().filter(|t| t.subsystem() == swarmfield::Subsystem::Swarm) {
        assert!(!scene.run_frame(*token, &mut host, &mut sink));
    }
    let swarm_after: Vec<Vec2> = scene
        .swarm()
        .unwrap()
        .followers()
        .iter()
        .map(|f| f.position)
        .collect();
    assert_eq!(swarm_before, swarm_after);

    // Only the newest swarm frame is live
    let live = host.drain();
    let swarm_frames: Vec<_> = live
        .iter()
        .filter(|t| t.subsystem() == swarmfield::Subsystem::Swarm)
        .collect();
    assert_eq!(swarm_frames.len(), 2);
    let fired: Vec<bool> = swarm_frames
        .iter()
        .map(|t| scene.run_frame(**t, &mut host, &mut sink))
        .collect();
    assert_eq!(fired, vec![false, true]);
}

#[test]
fn test_scene_each_frame_rearms_once() {
    let mut scene = seeded_scene(2);
    let mut host = ManualHost::new();
    let mut sink = HeadlessSink::new();
    scene.start(&mut host, &mut sink);

    for _ in 0..30 {
        let due = host.drain();
        assert_eq!(due.len(), 2);
        for token in due {
            assert!(scene.run_frame(token, &mut host, &mut sink));
        }
    }
}

#[test]
fn test_seeded_runs_are_identical() {
    fn run(seed: u64) -> Vec<(Vec2, f32)> {
        let mut scene = seeded_scene(seed);
        *scene.time_mut() = swarmfield::Time::fixed(1.0 / 60.0);
        let mut host = ManualHost::new();
        let mut sink = HeadlessSink::new();
        scene.start(&mut host, &mut sink);
        for frame in 0..90 {
            scene.pointer_moved(Vec2::new(100.0 + frame as f32 * 4.0, 200.0));
            for token in host.drain() {
                scene.run_frame(token, &mut host, &mut sink);
            }
        }
        sink.table()
            .iter_draw_order()
            .filter_map(|(_, e)| e.pose)
            .map(|p| (p.position, p.rotation))
            .collect()
    }

    assert_eq!(run(1234), run(1234));
    assert_ne!(run(1234), run(4321));
}

#[test]
fn test_swarm_frame_uses_latest_pointer() {
    let config = SceneConfig {
        seed: Some(6),
        swarm: Some(SwarmConfig {
            follow_rate: 1.0..1.0,
            float_amplitude: 0.0,
            ..SwarmConfig::default()
        }),
        field: None,
        ..SceneConfig::default()
    };
    let mut scene = Scene::new(config, viewport()).unwrap();
    let mut host = ManualHost::new();
    let mut sink = HeadlessSink::new();
    scene.start(&mut host, &mut sink);

    scene.pointer_moved(Vec2::new(10.0, 10.0));
    scene.pointer_moved(Vec2::new(900.0, 500.0));
    let due = host.drain();
    assert_eq!(due.len(), 1);
    assert!(scene.run_frame(due[0], &mut host, &mut sink));

    let swarm = scene.swarm().unwrap();
    for (f, id) in swarm.followers().iter().zip(swarm.elements()) {
        let expected = Vec2::new(900.0, 500.0) + f.offset();
        assert!(f.position.distance(expected) < 1e-3, "{} vs {}", f.position, expected);
        assert_eq!(sink.pose(*id).unwrap().position, f.position);
    }
}

#[test]
fn test_field_frame_bounces_off_resized_viewport() {
    let config = SceneConfig {
        seed: Some(17),
        swarm: None,
        ..SceneConfig::default()
    };
    let mut scene = Scene::new(config, viewport()).unwrap();
    let mut host = ManualHost::new();
    let mut sink = HeadlessSink::new();
    scene.start(&mut host, &mut sink);
    let before: Vec<Vec2> = scene.field().unwrap().drifters().iter().map(|d| d.velocity).collect();

    let tiny = Viewport::new(1.0, 1.0);
    scene.set_viewport(tiny);
    let due = host.drain();
    assert_eq!(due.len(), 1);
    assert!(scene.run_frame(due[0], &mut host, &mut sink));

    let mut flipped = 0;
    for (d, v0) in scene.field().unwrap().drifters().iter().zip(before) {
        if d.position.x > tiny.width {
            assert_eq!(d.velocity.x, -v0.x);
            flipped += 1;
        }
        if d.position.y > tiny.height {
            assert_eq!(d.velocity.y, -v0.y);
            flipped += 1;
        }
    }
    assert!(flipped > 0);
}
