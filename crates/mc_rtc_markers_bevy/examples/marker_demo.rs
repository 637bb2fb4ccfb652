//! Two interactive markers driven by a fake remote controller.
//!
//! The "hand" marker orbits the origin until you hold the space bar, which
//! drags it upwards. Releasing the space bar reports the new pose and the
//! remote takes over again. The "com" marker is read-only and ignores drags.

use bevy::{ecs::hierarchy::ChildOf, prelude::*};
use mc_rtc_markers::{AxisHandle, ControlAxis, ElementId, HandleKind, MarkerId, PoseSample};
use mc_rtc_markers_bevy::*;

#[derive(Resource)]
struct DemoMarkers {
    hand: MarkerId,
    com: MarkerId,
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(InteractiveMarkersPlugin::default())
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (
                (fake_remote, drag_with_keyboard).before(InteractiveMarkerStages::Input),
                decorate_handles.after(InteractiveMarkerStages::Sync),
                report_releases.after(InteractiveMarkerStages::Reconcile),
            ),
        )
        .run();
}

fn setup(mut commands: Commands, mut markers: ResMut<InteractiveMarkers>) {
    commands.spawn((
        PointLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0),
    ));
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(-4.0, -6.0, 5.0).looking_at(Vec3::ZERO, Vec3::Z),
    ));

    let hand = markers.add_marker(
        &ElementId::new(["Tasks", "RightHand"], "target"),
        ControlAxis::ALL,
    );
    let com = markers.add_marker(&ElementId::new(["Tasks"], "com"), ControlAxis::XYTHETA);
    commands.insert_resource(DemoMarkers { hand, com });
}

fn fake_remote(
    time: Res<Time>,
    demo: Res<DemoMarkers>,
    mut markers: ResMut<InteractiveMarkers>,
) {
    let t = time.elapsed_secs_f64();
    let orbit = PoseSample::from_xytheta(1.5 * t.cos(), 1.5 * t.sin(), t, 0.5);
    markers.update_marker(&demo.hand, false, &orbit);
    let com = PoseSample::from_xytheta(0.0, 0.0, 0.3, 0.0);
    markers.update_marker(&demo.com, true, &com);
}

fn drag_with_keyboard(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    roots: Query<(Entity, &InteractiveMarker, &Transform)>,
    demo: Res<DemoMarkers>,
    mut started: EventWriter<MarkerDragStarted>,
    mut moved: EventWriter<MarkerDragMoved>,
    mut ended: EventWriter<MarkerDragEnded>,
) {
    let Some((marker, _, tf)) = roots.iter().find(|(_, m, _)| m.id == demo.hand) else {
        return;
    };

    if keys.just_pressed(KeyCode::Space) {
        started.write(MarkerDragStarted { marker });
    } else if keys.pressed(KeyCode::Space) {
        let mut transform = *tf;
        transform.translation.z += time.delta_secs();
        moved.write(MarkerDragMoved { marker, transform });
    } else if keys.just_released(KeyCode::Space) {
        ended.write(MarkerDragEnded { marker });
    }
}

fn decorate_handles(
    mut commands: Commands,
    new_handles: Query<(Entity, &MarkerHandle), Added<MarkerHandle>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (e, handle) in &new_handles {
        let color = if handle.locked {
            Color::srgb(0.5, 0.5, 0.5)
        } else {
            match handle.handle {
                AxisHandle::TranslateX | AxisHandle::RotateX => Color::srgb(0.9, 0.1, 0.1),
                AxisHandle::TranslateY | AxisHandle::RotateY => Color::srgb(0.1, 0.9, 0.1),
                AxisHandle::TranslateZ | AxisHandle::RotateZ => Color::srgb(0.1, 0.1, 0.9),
            }
        };

        let (mesh, offset) = match handle.handle.kind() {
            HandleKind::Translate => (
                meshes.add(Cuboid::new(0.04, 0.04, 0.6)),
                Transform::from_xyz(0.0, 0.0, 0.3),
            ),
            HandleKind::Rotate => (
                meshes.add(Torus::new(0.38, 0.42)),
                Transform::from_rotation(Quat::from_rotation_x(90_f32.to_radians())),
            ),
        };

        commands
            .spawn((Mesh3d(mesh), MeshMaterial3d(materials.add(color)), offset))
            .insert(ChildOf(e));
    }
}

fn report_releases(mut released: EventReader<MarkerReleased>) {
    for MarkerReleased(moved) in released.read() {
        info!("Marker [{}] released at {:?}", moved.id, moved.pose.translation);
    }
}
