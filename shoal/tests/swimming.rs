use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use shoal::heading::angle_difference;
use shoal::{BodyPlan, Fish, FishConfig, FishError, Placement, Scene, SceneBounds, SceneConfig, SegmentChain};

const EPS: f32 = 1e-3;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn spacing_holds(chain: &SegmentChain) -> bool {
    chain
        .segments()
        .windows(2)
        .all(|w| (w[0].position.distance(w[1].position) - chain.spacing()).abs() < EPS)
}

#[test]
fn eight_segment_chain_follows_its_head() {
    init();
    let mut chain = SegmentChain::new(Vec2::ZERO, 0.0, &[10.0; 8], 10.0).unwrap();

    chain.propagate(Placement::Bootstrap, 1);
    assert!((chain.segments()[1].position - Vec2::new(0.0, -10.0)).length() < EPS);
    assert!((chain.segments()[7].position - Vec2::new(0.0, -70.0)).length() < EPS);

    chain.advance_head(1.0);
    let segs = chain.segments();
    assert!((segs[0].position - Vec2::new(0.0, 1.0)).length() < EPS);

    // segment 1 turned toward the head and kept its distance; it now faces
    // the head (0) and sits on the 180 side of it
    assert!(segs[1].heading.abs() < EPS);
    assert!((segs[1].position - Vec2::new(0.0, -9.0)).length() < EPS);
    assert!((segs[0].position.distance(segs[1].position) - 10.0).abs() < EPS);
}

#[test]
fn spacing_survives_a_long_swim() {
    init();
    let bounds = SceneBounds::new(900.0, 700.0).unwrap();
    let mut rng = SmallRng::seed_from_u64(0xF15);
    let mut fish = Fish::new(FishConfig::new([0.6, 0.6, 0.8, 1.0], 2.5, 0.7), &bounds, &mut rng).unwrap();

    for frame in 0..5_000 {
        fish.tick(&bounds, &mut rng);
        if frame % 500 == 0 {
            assert!(spacing_holds(fish.chain()), "frame {frame}");
        }
        assert!(fish.chain().segments().iter().all(|s| (0.0..360.0).contains(&s.heading)));
    }
    assert!(spacing_holds(fish.chain()));
}

#[test]
fn fish_stay_near_the_viewport() {
    init();
    let (w, h) = (800.0, 600.0);
    let mut scene = Scene::with_config(SceneConfig::default(), w, h).unwrap();

    for _ in 0..20_000 {
        scene.tick(w, h);
    }

    // forced turns bring every fish back well before it can leave for good
    for fish in scene.fish() {
        let head = fish.chain().head().position;
        assert!(head.x.abs() < w, "{head}");
        assert!(head.y.abs() < h, "{head}");
    }
}

#[test]
fn seeded_scenes_replay_exactly() {
    init();
    let config = SceneConfig { seed: 42, ..SceneConfig::default() };
    let mut a = Scene::with_config(config.clone(), 640.0, 480.0).unwrap();
    let mut b = Scene::with_config(config, 640.0, 480.0).unwrap();

    for i in 0..300 {
        let width = if i < 150 { 640.0 } else { 960.0 };
        a.tick(width, 480.0);
        b.tick(width, 480.0);
    }
    assert_eq!(a.poses(), b.poses());
    assert_eq!(a.draw_list(), b.draw_list());

    let fresh = |seed| Scene::with_config(SceneConfig { seed, ..SceneConfig::default() }, 640.0, 480.0).unwrap();
    assert_ne!(fresh(42).poses(), fresh(43).poses());
}

#[test]
fn straight_fish_has_no_bend() {
    init();
    let bounds = SceneBounds::new(800.0, 600.0).unwrap();
    let cfg = FishConfig::new([1.0; 4], 10.0, 1.0).with_plan(BodyPlan::compact());
    let fish = Fish::at(cfg, &bounds, Vec2::ZERO, 30.0).unwrap();
    let pose = fish.pose();

    assert_eq!(pose.dorsal.base.bend, 0.0);
    assert_eq!(pose.tail.base.bend, 0.0);
    assert_eq!(angle_difference(90.0, 0.0), 90.0);
    assert_eq!(angle_difference(0.0, 90.0), -90.0);
}

#[test]
fn resize_approaches_the_new_proportion() {
    init();
    let mut scene = Scene::new(500.0, 500.0).unwrap();
    scene.spawn(FishConfig::new([1.0; 4], 4.0, 1.0)).unwrap();

    for _ in 0..30 {
        scene.on_resize(1000.0, 500.0);
    }
    let fish = &scene.fish()[0];
    assert!((fish.size() - 8.0).abs() < 1e-4);
    assert_eq!(fish.chain().spacing(), fish.size());

    // positions catch up with the new spacing on the next frame
    scene.tick(1000.0, 500.0);
    assert!(spacing_holds(scene.fish()[0].chain()));
}

#[test]
fn school_reads_from_json() {
    init();
    let json = r#"{
        "seed": 7,
        "school": [
            { "color": [0.7, 0.5, 0.2, 1.0], "size": 3.0, "velocity": 0.6 },
            { "color": [0.6, 0.6, 0.8, 1.0], "size": 2.5, "velocity": 0.7,
              "steering": { "range_jitter": 0.0 } }
        ]
    }"#;
    let config: SceneConfig = serde_json::from_str(json).unwrap();

    assert_eq!(config.canvas_scale, 0.25);
    assert_eq!(config.school.len(), 2);
    assert_eq!(config.school[1].steering.range_jitter, 0.0);
    assert_eq!(config.school[1].steering.forced_turn_step, 1.1);

    let scene = Scene::with_config(config, 640.0, 480.0).unwrap();
    assert_eq!(scene.fish().len(), 2);
}

#[test]
fn school_with_unusable_numbers_fails_to_build() {
    init();
    let school = |fish: &str| format!(r#"{{ "school": [ {fish} ] }}"#);

    let runaway = school(r#"{ "color": [1, 1, 1, 1], "size": 4.0, "velocity": 1.0, "scaling": { "carry": 3.0 } }"#);
    let config: SceneConfig = serde_json::from_str(&runaway).unwrap();
    let err = Scene::with_config(config, 500.0, 500.0).unwrap_err();
    assert_eq!(err, FishError::InvalidCarry(3.0));

    let inside_out = school(r#"{ "color": [1, 1, 1, 1], "size": 4.0, "velocity": 1.0, "plan": { "front_fin_length": -2.0 } }"#);
    let config: SceneConfig = serde_json::from_str(&inside_out).unwrap();
    let err = Scene::with_config(config, 500.0, 500.0).unwrap_err();
    assert_eq!(err, FishError::InvalidFinLength { part: "front fin", value: -2.0 });
}

#[test]
fn radii_stay_positive_through_resizes() {
    init();
    let mut scene = Scene::new(500.0, 500.0).unwrap();
    scene.spawn(FishConfig::new([1.0; 4], 4.0, 1.0)).unwrap();

    for width in [1500.0, 40.0, 3000.0, 1.0, 500.0] {
        scene.on_resize(width, 500.0);
        let fish = &scene.fish()[0];
        assert!(fish.size() > 0.0, "{width}");
        assert!(fish.chain().segments().iter().all(|s| s.radius > 0.0), "{width}");
    }
}
