use bevy::prelude::*;

use crate::engine::assets::viewer_assets::ViewerAssets;
use crate::engine::scene::registry::{SceneRegistry, SceneRig};
use crate::engine::systems::render_loop::Viewport;
use crate::errors::{ViewerDiagnostic, report};

/// Request to make another registered scene active.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub enum SceneCommand {
    Select(String),
}

/// Tags every entity owned by a scene so the whole set can be swapped out.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct SceneMember(pub String);

pub fn handle_scene_commands(
    mut events: EventReader<SceneCommand>,
    mut registry: ResMut<SceneRegistry>,
    mut diagnostics: EventWriter<ViewerDiagnostic>,
) {
    for event in events.read() {
        match event {
            SceneCommand::Select(id) => {
                info!("Scene selection requested: {}", id);
                if let Err(err) = registry.activate(id) {
                    report(&err, &mut diagnostics);
                }
            }
        }
    }
}

/// Rebuild scene entities whenever the registry activates a scene.
///
/// The old members are despawned and the new camera, lights and models are
/// spawned through the same command buffer, so no frame ever shows a mix of
/// two scenes.
pub fn apply_active_scene(
    mut commands: Commands,
    registry: Res<SceneRegistry>,
    viewport: Res<Viewport>,
    viewer_assets: Option<Res<ViewerAssets>>,
    members: Query<Entity, With<SceneMember>>,
    mut applied_generation: Local<u64>,
) {
    if registry.generation() == *applied_generation {
        return;
    }
    *applied_generation = registry.generation();

    let Some(rig) = registry.active() else {
        return;
    };

    for entity in &members {
        commands.entity(entity).despawn();
    }

    spawn_camera(&mut commands, rig, viewport.aspect_ratio());
    spawn_lights(&mut commands, rig);
    spawn_models(&mut commands, rig, viewer_assets.as_deref());
}

fn spawn_camera(commands: &mut Commands, rig: &SceneRig, aspect_ratio: f32) {
    commands.spawn((
        Name::new(format!("{} camera", rig.scene_id)),
        SceneMember(rig.scene_id.clone()),
        Camera3d::default(),
        rig.camera.projection(aspect_ratio),
        rig.controls.transform(),
        rig.controls.clone(),
    ));
}

fn spawn_lights(commands: &mut Commands, rig: &SceneRig) {
    commands.insert_resource(ClearColor(rig.background));

    if let Some(directional) = &rig.lights.directional {
        commands.spawn((
            Name::new(format!("{} sun", rig.scene_id)),
            SceneMember(rig.scene_id.clone()),
            DirectionalLight {
                color: directional.color,
                illuminance: directional.illuminance(),
                shadows_enabled: true,
                ..default()
            },
            directional.transform(),
        ));
    }

    let ambient = match &rig.lights.ambient {
        Some(ambient) => AmbientLight {
            color: ambient.color,
            brightness: ambient.brightness(),
            ..default()
        },
        None => AmbientLight {
            brightness: 0.0,
            ..default()
        },
    };
    commands.insert_resource(ambient);
}

fn spawn_models(commands: &mut Commands, rig: &SceneRig, viewer_assets: Option<&ViewerAssets>) {
    if rig.models.is_empty() {
        return;
    }
    let Some(viewer_assets) = viewer_assets else {
        warn!("Scene '{}' has models but no assets are loaded", rig.scene_id);
        return;
    };

    for id in &rig.models {
        let Some(model) = viewer_assets.model(id) else {
            warn!("Scene '{}' references unknown model '{}'", rig.scene_id, id);
            continue;
        };
        commands.spawn((
            Name::new(model.id.clone()),
            SceneMember(rig.scene_id.clone()),
            SceneRoot(model.scene.clone()),
            Transform::from_scale(Vec3::splat(model.scale)),
        ));
    }
}
