//! Animation Tests
//!
//! Tests for:
//! - KeyframeTrack bracket selection, tie-breaking and invalid-time filtering
//! - KeyframeCursor agreement with the stateless lookup
//! - Pose evaluation: endpoints, midpoints, hold, shortest-arc slerp
//! - Visibility cross-fades and hard cuts
//! - Camera evaluation and easing curves
//! - Authored JSON parsing and validation

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use glam::{Quat, Vec3};

use assembly_viewer::animation::evaluate::evaluate_with_cursor;
use assembly_viewer::animation::values::Interpolatable;
use assembly_viewer::animation::{
    AnimationIssue, Bracket, CameraKeyframe, CameraTrack, Easing, EulerOrder, FadeMode,
    KeyframeCursor, KeyframeTransform, ObjectKeyframe, ObjectTrack, Rotation, StepAnimation,
    evaluate, evaluate_camera,
};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

fn key(time: f32, position: Vec3) -> ObjectKeyframe {
    ObjectKeyframe::new("Door", time, KeyframeTransform::from_position(position))
}

fn key_rot(time: f32, rotation: Quat) -> ObjectKeyframe {
    ObjectKeyframe::new(
        "Door",
        time,
        KeyframeTransform {
            rotation: Rotation::from_quat(rotation),
            ..KeyframeTransform::default()
        },
    )
}

// ============================================================================
// KeyframeTrack: Brackets
// ============================================================================

#[test]
fn track_sorts_unsorted_input() {
    let track = ObjectTrack::new(vec![
        key(2.0, Vec3::X * 2.0),
        key(0.0, Vec3::ZERO),
        key(1.0, Vec3::X),
    ]);

    let times: Vec<f32> = track.keys().iter().map(|k| k.time).collect();
    assert_eq!(times, vec![0.0, 1.0, 2.0]);
    assert!(approx(track.end_time(), 2.0));
}

#[test]
fn track_bracket_selects_prev_and_next() {
    let track = ObjectTrack::new(vec![
        key(0.0, Vec3::ZERO),
        key(1.0, Vec3::X),
        key(3.0, Vec3::Y),
    ]);

    for (q, expected_prev, expected_next) in [
        (0.0, 0.0, 1.0),
        (0.5, 0.0, 1.0),
        (1.0, 1.0, 3.0),
        (2.999, 1.0, 3.0),
    ] {
        match track.bracket(q) {
            Bracket::Between { prev, next, .. } => {
                assert!(approx(prev.time, expected_prev), "q={q}: prev {}", prev.time);
                assert!(approx(next.time, expected_next), "q={q}: next {}", next.time);
            }
            other => panic!("q={q}: expected Between, got {other:?}"),
        }
    }
}

#[test]
fn track_bracket_before_first_is_not_started() {
    let track = ObjectTrack::new(vec![key(1.0, Vec3::X), key(2.0, Vec3::Y)]);
    assert_eq!(track.bracket(0.5), Bracket::NotStarted);
    assert!(evaluate(&track, 0.5).is_none());
}

#[test]
fn track_bracket_at_or_after_last_holds() {
    let track = ObjectTrack::new(vec![key(0.0, Vec3::ZERO), key(2.0, Vec3::Y)]);

    for q in [2.0, 2.5, 100.0] {
        match track.bracket(q) {
            Bracket::Hold(prev) => assert!(approx(prev.time, 2.0)),
            other => panic!("q={q}: expected Hold, got {other:?}"),
        }
    }
}

#[test]
fn track_empty_has_no_pose() {
    let track = ObjectTrack::new(Vec::new());
    assert!(track.is_empty());
    assert_eq!(track.bracket(0.0), Bracket::NotStarted);
    assert!(evaluate(&track, 0.0).is_none());
}

#[test]
fn track_drops_invalid_times() {
    let track = ObjectTrack::new(vec![
        key(f32::NAN, Vec3::ONE),
        key(-1.0, Vec3::ONE),
        key(f32::INFINITY, Vec3::ONE),
        key(0.5, Vec3::X),
    ]);
    assert_eq!(track.len(), 1);
    assert!(approx(track.keys()[0].time, 0.5));
}

#[test]
fn track_ties_keep_authored_order() {
    // Two keyframes at t=1: the later authored one is `prev` from t=1 on.
    let track = ObjectTrack::new(vec![
        key(1.0, Vec3::X),
        key(0.0, Vec3::ZERO),
        key(1.0, Vec3::X * 2.0),
        key(2.0, Vec3::X * 4.0),
    ]);

    // Before the tie, `next` is the first authored of the pair.
    let before = evaluate(&track, 0.5).unwrap();
    assert!(approx_vec3(before.position, Vec3::X * 0.5));

    let at = evaluate(&track, 1.0).unwrap();
    assert!(approx_vec3(at.position, Vec3::X * 2.0));

    let after = evaluate(&track, 1.5).unwrap();
    assert!(approx_vec3(after.position, Vec3::X * 3.0));
}

#[test]
fn track_tiny_span_keeps_exact_endpoints() {
    // Spans far below f32::EPSILON still start exactly at `prev`.
    let track = ObjectTrack::new(vec![key(0.0, Vec3::ZERO), key(1e-7, Vec3::Y)]);

    match track.bracket(0.0) {
        Bracket::Between { factor, .. } => assert_eq!(factor, 0.0),
        other => panic!("expected Between, got {other:?}"),
    }

    let start = evaluate(&track, 0.0).unwrap();
    assert_eq!(start.position, Vec3::ZERO);

    let mid = evaluate(&track, 5e-8).unwrap();
    assert!(mid.position.is_finite());
    assert!(mid.position.y > 0.0 && mid.position.y < 1.0);

    let end = evaluate(&track, 1e-7).unwrap();
    assert!(approx_vec3(end.position, Vec3::Y));
}

// ============================================================================
// KeyframeCursor
// ============================================================================

#[test]
fn cursor_matches_stateless_lookup() {
    let track = ObjectTrack::new((0..20).map(|i| key(i as f32 * 0.5, Vec3::X * i as f32)));

    let mut cursor = KeyframeCursor::default();
    // Forward steps, a large jump, a rewind and a restart.
    let queries = [
        0.0, 0.1, 0.2, 0.6, 1.0, 1.01, 1.7, 6.3, 6.4, 2.2, 0.0, 9.5, 12.0, 3.3,
    ];
    for q in queries {
        assert_eq!(
            track.bracket_with_cursor(q, &mut cursor),
            track.bracket(q),
            "cursor disagrees at t={q}"
        );
    }
}

#[test]
fn cursor_on_empty_track() {
    let track = ObjectTrack::new(Vec::new());
    let mut cursor = KeyframeCursor::default();
    assert_eq!(track.bracket_with_cursor(1.0, &mut cursor), Bracket::NotStarted);
}

// ============================================================================
// Pose Evaluation
// ============================================================================

#[test]
fn evaluate_linear_midpoint() {
    let track = ObjectTrack::new(vec![key(0.0, Vec3::ZERO), key(10.0, Vec3::new(10.0, 0.0, 0.0))]);

    let pose = evaluate(&track, 5.0).unwrap();
    assert!(approx_vec3(pose.position, Vec3::new(5.0, 0.0, 0.0)));
    assert!(approx_vec3(pose.scale, Vec3::ONE));
}

#[test]
fn evaluate_exact_at_endpoints() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(-4.0, 0.5, 8.0);
    let track = ObjectTrack::new(vec![key(1.0, a), key(3.0, b)]);

    let start = evaluate(&track, 1.0).unwrap();
    assert_eq!(start.position, a);

    let end = evaluate(&track, 3.0).unwrap();
    assert_eq!(end.position, b);
}

#[test]
fn evaluate_scale_is_interpolated() {
    let mut small = key(0.0, Vec3::ZERO);
    small.transform.scale = Vec3::splat(0.5).into();
    let mut large = key(2.0, Vec3::ZERO);
    large.transform.scale = Vec3::splat(1.5).into();

    let track = ObjectTrack::new(vec![small, large]);
    let pose = evaluate(&track, 1.0).unwrap();
    assert!(approx_vec3(pose.scale, Vec3::ONE));
}

#[test]
fn evaluate_holds_last_pose() {
    let track = ObjectTrack::new(vec![key(0.0, Vec3::ZERO), key(2.0, Vec3::Y)]);
    let pose = evaluate(&track, 50.0).unwrap();
    assert_eq!(pose.position, Vec3::Y);
    assert!(pose.visible);
    assert!(approx(pose.opacity, 1.0));
}

#[test]
fn evaluate_rotation_slerp_quarter_turn() {
    let track = ObjectTrack::new(vec![
        key_rot(0.0, Quat::IDENTITY),
        key_rot(1.0, Quat::from_rotation_y(FRAC_PI_2)),
    ]);

    let pose = evaluate(&track, 0.5).unwrap();
    let expected = Quat::from_rotation_y(FRAC_PI_4);
    assert!(pose.rotation.angle_between(expected) < 1e-3);
}

#[test]
fn evaluate_rotation_takes_shortest_arc() {
    // 270 degrees about Y is the same orientation as -90 degrees; the
    // interpolation must take the 90 degree path.
    let end = Quat::from_rotation_y(3.0 * FRAC_PI_2);
    let track = ObjectTrack::new(vec![key_rot(0.0, Quat::IDENTITY), key_rot(1.0, end)]);

    let total = Quat::IDENTITY.angle_between(end);
    assert!(total < FRAC_PI_2 + 1e-3);

    let mut last_from_start = 0.0;
    for i in 0..=10 {
        let t = i as f32 / 10.0;
        let q = evaluate(&track, t).unwrap().rotation;
        let from_start = Quat::IDENTITY.angle_between(q);
        let to_end = q.angle_between(end);

        assert!(from_start + to_end <= total + 1e-3, "t={t}: detour");
        assert!(from_start + 1e-3 >= last_from_start, "t={t}: went backwards");
        last_from_start = from_start;
    }

    let mid = evaluate(&track, 0.5).unwrap().rotation;
    assert!((Quat::IDENTITY.angle_between(mid) - FRAC_PI_4).abs() < 1e-3);
}

#[test]
fn evaluate_euler_rotation_converts_to_quaternion() {
    let track = ObjectTrack::new(vec![ObjectKeyframe::new(
        "Door",
        0.0,
        KeyframeTransform {
            rotation: Rotation::euler(0.0, PI / 2.0, 0.0),
            ..KeyframeTransform::default()
        },
    )]);

    let pose = evaluate(&track, 0.0).unwrap();
    assert!(pose.rotation.angle_between(Quat::from_rotation_y(FRAC_PI_2)) < 1e-3);
}

#[test]
fn interpolatable_f32_and_vec3() {
    assert!(approx(f32::interpolate_linear(2.0, 4.0, 0.25), 2.5));
    assert!(approx_vec3(
        Vec3::interpolate_linear(Vec3::ZERO, Vec3::splat(2.0), 0.5),
        Vec3::ONE
    ));
}

// ============================================================================
// Visibility
// ============================================================================

#[test]
fn fade_in_opacity_equals_factor() {
    let track = ObjectTrack::new(vec![
        key(0.0, Vec3::ZERO).with_visible(false),
        key(2.0, Vec3::ZERO).with_visible(true),
    ]);

    let mut last = -1.0;
    for i in 0..=20 {
        let t = i as f32 * 0.1;
        let pose = evaluate(&track, t).unwrap();
        let f = (t / 2.0).clamp(0.0, 1.0);
        assert!(pose.visible, "t={t}: object must stay visible while fading");
        assert!(approx(pose.opacity, f), "t={t}: opacity {} != {f}", pose.opacity);
        assert!(pose.opacity >= last, "t={t}: opacity decreased");
        last = pose.opacity;
    }
}

#[test]
fn fade_out_opacity_is_one_minus_factor() {
    let track = ObjectTrack::new(vec![
        key(0.0, Vec3::ZERO),
        key(4.0, Vec3::ZERO).with_visible(false),
    ]);

    let pose = evaluate(&track, 1.0).unwrap();
    assert!(pose.visible);
    assert!(approx(pose.opacity, 0.75));

    // Once the hidden keyframe is reached it is held.
    let end = evaluate(&track, 4.0).unwrap();
    assert!(!end.visible);
    assert!(approx(end.opacity, 0.0));
}

#[test]
fn constant_visibility_snaps_opacity() {
    let hidden = ObjectTrack::new(vec![
        key(0.0, Vec3::ZERO).with_visible(false),
        key(1.0, Vec3::X).with_visible(false),
    ]);
    let pose = evaluate(&hidden, 0.5).unwrap();
    assert!(!pose.visible);
    assert!(approx(pose.opacity, 0.0));

    let shown = ObjectTrack::new(vec![key(0.0, Vec3::ZERO), key(1.0, Vec3::X)]);
    let pose = evaluate(&shown, 0.5).unwrap();
    assert!(pose.visible);
    assert!(approx(pose.opacity, 1.0));
}

#[test]
fn cut_mode_keeps_prev_visibility() {
    let track = ObjectTrack::new(vec![
        key(0.0, Vec3::ZERO).with_visible(false),
        key(2.0, Vec3::ZERO).with_visible(true),
    ]);

    let mut cursor = KeyframeCursor::default();
    let mid = evaluate_with_cursor(&track, 1.0, &mut cursor, FadeMode::Cut).unwrap();
    assert!(!mid.visible);
    assert!(approx(mid.opacity, 0.0));

    let end = evaluate_with_cursor(&track, 2.0, &mut cursor, FadeMode::Cut).unwrap();
    assert!(end.visible);
    assert!(approx(end.opacity, 1.0));
}

#[test]
fn missing_visible_means_visible() {
    let json = r#"{ "objectId": "Door", "time": 0 }"#;
    let key: ObjectKeyframe = serde_json::from_str(json).unwrap();
    assert!(key.visible.is_none());
    assert!(key.is_visible());
}

// ============================================================================
// Camera
// ============================================================================

#[test]
fn camera_linear_interpolation() {
    let track = CameraTrack::new(vec![
        CameraKeyframe::new(0.0, Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO),
        CameraKeyframe::new(2.0, Vec3::new(10.0, 0.0, 0.0), Vec3::Y),
    ]);

    let pose = evaluate_camera(&track, 1.0).unwrap();
    assert!(approx_vec3(pose.position, Vec3::new(5.0, 0.0, 5.0)));
    assert!(approx_vec3(pose.target, Vec3::new(0.0, 0.5, 0.0)));

    assert!(evaluate_camera(&CameraTrack::new(Vec::new()), 1.0).is_none());
}

#[test]
fn camera_easing_shapes_factor() {
    let mut end = CameraKeyframe::new(2.0, Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO);
    end.easing = Some(Easing::EaseIn);
    let track = CameraTrack::new(vec![
        CameraKeyframe::new(0.0, Vec3::ZERO, Vec3::ZERO),
        end,
    ]);

    let pose = evaluate_camera(&track, 1.0).unwrap();
    assert!(approx_vec3(pose.position, Vec3::new(2.5, 0.0, 0.0)));
}

#[test]
fn easing_curves() {
    assert!(approx(Easing::Linear.apply(0.3), 0.3));
    assert!(approx(Easing::EaseIn.apply(0.5), 0.25));
    assert!(approx(Easing::EaseOut.apply(0.5), 0.75));
    assert!(approx(Easing::EaseInOut.apply(0.25), 0.125));
    assert!(approx(Easing::EaseInOut.apply(0.75), 0.875));

    for easing in [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
        assert!(approx(easing.apply(0.0), 0.0), "{easing:?} at 0");
        assert!(approx(easing.apply(1.0), 1.0), "{easing:?} at 1");
    }
}

// ============================================================================
// Authored Data
// ============================================================================

const DOOR_JSON: &str = r#"{
    "duration": 2,
    "objectKeyframes": [
        {
            "objectId": "Cabinet/Door",
            "time": 0,
            "transform": {
                "position": { "x": 0, "y": 0, "z": 0 },
                "rotation": { "x": 0, "y": 0, "z": 0, "order": "XYZ" },
                "scale": { "x": 1, "y": 1, "z": 1 }
            },
            "visible": true
        },
        {
            "objectId": "Cabinet/Door",
            "time": 2,
            "transform": {
                "position": { "x": 0, "y": 1, "z": 0 },
                "rotation": { "x": 0, "y": 0.7071068, "z": 0, "w": 0.7071068 }
            }
        },
        {
            "objectId": "Cabinet/Shelf",
            "time": 1,
            "transform": { "position": { "x": 1 } },
            "visible": false
        }
    ],
    "cameraKeyframes": [
        {
            "time": 0,
            "position": { "x": 0, "y": 2, "z": 8 },
            "target": { "x": 0, "y": 0, "z": 0 },
            "easing": "easeInOut"
        },
        {
            "time": 2,
            "position": { "x": 4, "y": 2, "z": 4 },
            "target": { "x": 0, "y": 1, "z": 0 },
            "easing": "bounce"
        }
    ]
}"#;

#[test]
fn parse_step_animation_json() {
    let anim = StepAnimation::from_json_str(DOOR_JSON).unwrap();

    assert!(approx(anim.duration, 2.0));
    assert_eq!(anim.object_keyframes.len(), 3);
    assert_eq!(anim.camera_keyframes.len(), 2);
    assert_eq!(anim.object_ids(), vec!["Cabinet/Door", "Cabinet/Shelf"]);
    assert!(anim.validate().is_empty());

    let first = &anim.object_keyframes[0];
    assert!(matches!(
        first.transform.rotation,
        Rotation::Euler { order: EulerOrder::XYZ, .. }
    ));

    let second = &anim.object_keyframes[1];
    assert!(matches!(second.transform.rotation, Rotation::Quaternion { .. }));
    // Missing scale defaults to one.
    assert_eq!(Vec3::from(second.transform.scale), Vec3::ONE);
    assert!(
        second
            .transform
            .rotation
            .to_quat()
            .angle_between(Quat::from_rotation_y(FRAC_PI_2))
            < 1e-3
    );

    let shelf = &anim.object_keyframes[2];
    assert_eq!(Vec3::from(shelf.transform.position), Vec3::X);
    assert!(!shelf.is_visible());

    assert_eq!(anim.camera_keyframes[0].easing, Some(Easing::EaseInOut));
    // Unknown easing names fall back to linear.
    assert_eq!(anim.camera_keyframes[1].easing, Some(Easing::Linear));
}

#[test]
fn parse_missing_arrays_default_to_empty() {
    let anim = StepAnimation::from_json_str(r#"{ "duration": 3 }"#).unwrap();
    assert!(anim.is_empty());
    assert!(anim.object_ids().is_empty());
}

#[test]
fn parse_malformed_json_is_an_error() {
    assert!(StepAnimation::from_json_str(r#"{ "duration": "#).is_err());
}

#[test]
fn degenerate_quaternion_is_identity() {
    let rotation = Rotation::Quaternion { x: 0.0, y: 0.0, z: 0.0, w: 0.0 };
    assert_eq!(rotation.to_quat(), Quat::IDENTITY);
}

#[test]
fn playback_duration_sanitises() {
    let mut anim = StepAnimation {
        duration: 4.0,
        ..StepAnimation::default()
    };
    assert!(approx(anim.playback_duration(), 4.0));

    anim.duration = -1.0;
    assert!(approx(anim.playback_duration(), 0.0));

    anim.duration = f32::NAN;
    assert!(approx(anim.playback_duration(), 0.0));
}

#[test]
fn validate_reports_issues() {
    let mut bad = key(5.0, Vec3::ZERO);
    bad.object_id.clear();
    let mut non_finite = key(0.5, Vec3::ZERO);
    non_finite.transform.position.x = f32::NAN;

    let anim = StepAnimation {
        duration: 2.0,
        object_keyframes: vec![key(0.0, Vec3::ZERO), bad, non_finite],
        camera_keyframes: vec![CameraKeyframe::new(-1.0, Vec3::ZERO, Vec3::ZERO)],
    };

    let issues = anim.validate();
    assert!(issues.contains(&AnimationIssue::EmptyObjectId { index: 1 }));
    assert!(issues.contains(&AnimationIssue::KeyframeBeyondDuration {
        time: 5.0,
        duration: 2.0
    }));
    assert!(issues.contains(&AnimationIssue::NonFiniteTransform { index: 2 }));
    assert!(issues.contains(&AnimationIssue::InvalidCameraTime {
        index: 0,
        time: -1.0
    }));
    assert_eq!(issues.len(), 4);
}
