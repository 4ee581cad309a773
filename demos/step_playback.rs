//! Step Playback Demo
//!
//! Plays one assembly step against a small hand-built cabinet (or a glTF model
//! and steps file given on the command line) and prints the animated poses.
//!
//! ```text
//! cargo run --example step_playback
//! cargo run --example step_playback -- cabinet.glb steps.json
//! RUST_LOG=debug cargo run --example step_playback
//! ```

use std::sync::Arc;

use anyhow::{Context, bail};
use glam::{Quat, Vec3, Vec4};

use assembly_viewer::animation::{
    CameraKeyframe, Easing, KeyframeTransform, ObjectKeyframe, Rotation, Step, StepAnimation,
};
use assembly_viewer::scene::{Material, Node, ObjectResolver, Scene};
use assembly_viewer::utils::time::{Duration, Instant};
use assembly_viewer::{Viewer, ViewerSettings, load_model, load_steps};

fn demo_scene() -> Scene {
    let mut scene = Scene::new();
    scene.name = "Base Cabinet".into();

    let wood = scene.add_material(Material::new(Vec4::new(0.76, 0.6, 0.42, 1.0)).with_name("wood"));
    let metal =
        scene.add_material(Material::new(Vec4::new(0.7, 0.7, 0.72, 1.0)).with_name("metal"));

    let cabinet = scene.add_node(Node::with_name("Cabinet"));
    for name in ["Side_L", "Side_R", "Shelf"] {
        let part = scene.add_to_parent(Node::with_name(name), cabinet);
        scene.set_node_materials(part, &[wood]);
    }
    let door = scene.add_to_parent(Node::with_name("Door"), cabinet);
    scene.set_node_materials(door, &[wood]);
    let handle = scene.add_to_parent(Node::with_name("Handle"), door);
    scene.set_node_materials(handle, &[metal]);

    scene
}

fn demo_step() -> Step {
    let door_closed = KeyframeTransform {
        position: Vec3::new(1.2, 0.0, 0.0).into(),
        ..KeyframeTransform::default()
    };
    let door_open = KeyframeTransform {
        position: Vec3::new(0.0, 0.0, 0.3).into(),
        rotation: Rotation::from_quat(Quat::from_rotation_y(-1.2)),
        ..KeyframeTransform::default()
    };

    let mut orbit = CameraKeyframe::new(3.0, Vec3::new(3.0, 1.5, 3.0), Vec3::new(0.0, 0.5, 0.0));
    orbit.easing = Some(Easing::EaseInOut);

    let animation = StepAnimation {
        duration: 3.0,
        object_keyframes: vec![
            ObjectKeyframe::new("Cabinet/Door", 0.0, door_closed).with_visible(false),
            ObjectKeyframe::new("Cabinet/Door", 1.0, door_closed).with_visible(true),
            ObjectKeyframe::new("Cabinet/Door", 3.0, door_open),
            ObjectKeyframe::new("Cabinet/Shelf", 0.0, KeyframeTransform::default()),
        ],
        camera_keyframes: vec![
            CameraKeyframe::new(0.0, Vec3::new(0.0, 1.5, 5.0), Vec3::new(0.0, 0.5, 0.0)),
            orbit,
        ],
    };

    Step::new("attach-door", Some(animation))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (scene, steps) = match args.as_slice() {
        [] => (demo_scene(), vec![demo_step()]),
        [model, steps] => {
            let scene = load_model(model).with_context(|| format!("loading model {model}"))?;
            let steps = load_steps(steps).with_context(|| format!("loading steps {steps}"))?;
            (scene, steps)
        }
        _ => bail!("usage: step_playback [<model.glb> <steps.json>]"),
    };

    let Some(step) = steps.iter().find(|s| s.animation.is_some()) else {
        bail!("no step with an animation");
    };
    let animation = step.animation.clone().map(Arc::unwrap_or_clone).unwrap_or_default();

    log::info!(
        "Model `{}` exposes {} object ids",
        scene.name,
        ObjectResolver::collect_object_ids(&scene, scene.root()).len()
    );

    let settings = ViewerSettings::default();
    let frame_interval = settings.tick_interval();
    let mut viewer = Viewer::new(settings);
    viewer.on_model_loaded(Ok(scene));
    viewer.open_step(step);
    if !viewer.play() {
        bail!("step `{}` has nothing to play", step.id);
    }

    // Simulated frame callbacks with a deliberately uneven cadence.
    let start = Instant::now();
    let mut now = start;
    let mut frame = 0u32;
    loop {
        let report = viewer.frame(now);

        if frame % 30 == 0 || report.completed.is_some() {
            print_frame(&viewer, &animation, viewer.current_time());
        }
        if let Some(event) = report.completed {
            println!("completed: {event:?}");
            break;
        }

        let jitter = Duration::from_millis(u64::from(frame % 5) * 3);
        now += frame_interval + jitter;
        frame += 1;
        if now - start > Duration::from_secs(60) {
            bail!("animation did not complete within a minute of simulated time");
        }
    }

    println!(
        "{} frames, navigation {}",
        viewer.frame_count(),
        if viewer.can_navigate_forward() { "enabled" } else { "locked" }
    );
    Ok(())
}

fn print_frame(viewer: &Viewer, animation: &StepAnimation, time: f32) {
    let Some(scene) = viewer.scene() else {
        return;
    };
    println!("t = {time:.3}s");
    for object_id in animation.object_ids() {
        let Some(handle) = ObjectResolver::resolve(scene, scene.root(), object_id) else {
            println!("  {object_id:<16} (not in model)");
            continue;
        };
        let Some(node) = scene.get_node(handle) else {
            continue;
        };
        let opacity = node
            .materials
            .first()
            .and_then(|&m| scene.material(m))
            .map_or(1.0, Material::opacity);
        println!(
            "  {object_id:<16} pos {:>6.3?} visible {:<5} opacity {opacity:.2}",
            node.transform.position.to_array(),
            node.visible,
        );
    }
    println!(
        "  camera           pos {:>6.3?} target {:>6.3?}",
        viewer.camera.position().to_array(),
        viewer.camera.target().to_array(),
    );
}
