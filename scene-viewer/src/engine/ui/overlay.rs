use bevy::prelude::*;

use crate::engine::assets::viewer_assets::ViewerAssets;
use crate::engine::assets::viewer_manifest::ViewerManifest;
use crate::engine::session::controller::{SessionController, UiState};
use crate::engine::session::systems::SessionCommand;
use constants::ui::{
    BUTTON_COLOUR, BUTTON_HOVER_COLOUR, BUTTON_PRESSED_COLOUR, LOADING_LABEL,
    MUTE_BUTTON_SIZE_PX, PANEL_COLOUR, PROGRESS_BAR_HEIGHT_PX, PROGRESS_BAR_WIDTH_PX,
    PROGRESS_FILL_COLOUR, PROGRESS_TRACK_COLOUR, START_LABEL,
};

#[derive(Component)]
pub struct LoadingPanel;

#[derive(Component)]
pub struct LoadingLabel;

#[derive(Component)]
pub struct ProgressTrack;

#[derive(Component)]
pub struct ProgressFill;

#[derive(Component)]
pub struct StartButton;

#[derive(Component)]
pub struct InterfacePanel;

#[derive(Component)]
pub struct MuteButton;

fn rgb(colour: [f32; 3]) -> Color {
    Color::srgb(colour[0], colour[1], colour[2])
}

fn display(visible: bool) -> Display {
    if visible { Display::Flex } else { Display::None }
}

// Full-screen loading panel with label and progress bar
pub fn spawn_loading_overlay(mut commands: Commands) {
    commands
        .spawn((
            LoadingPanel,
            Name::new("LoadingPanel"),
            BackgroundColor(rgb(PANEL_COLOUR)),
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                row_gap: Val::Px(16.0),
                ..default()
            },
        ))
        .with_children(|panel| {
            panel.spawn((
                LoadingLabel,
                Name::new("LoadingLabel"),
                Text::new(LOADING_LABEL),
                TextFont { font_size: 18.0, ..default() },
                TextColor(Color::WHITE),
            ));

            panel
                .spawn((
                    ProgressTrack,
                    Name::new("ProgressTrack"),
                    BackgroundColor(rgb(PROGRESS_TRACK_COLOUR)),
                    Node {
                        width: Val::Px(PROGRESS_BAR_WIDTH_PX),
                        height: Val::Px(PROGRESS_BAR_HEIGHT_PX),
                        overflow: Overflow::clip(),
                        ..default()
                    },
                ))
                .with_children(|track| {
                    track.spawn((
                        ProgressFill,
                        Name::new("ProgressFill"),
                        BackgroundColor(rgb(PROGRESS_FILL_COLOUR)),
                        Node {
                            width: Val::Percent(0.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                    ));
                });
        });
}

/// Swap the default label for the manifest's once bootstrap has run.
pub fn apply_loading_label(
    manifest: Option<Res<ViewerManifest>>,
    mut labels: Query<&mut Text, With<LoadingLabel>>,
) {
    let Some(manifest) = manifest else { return };
    if !manifest.is_added() {
        return;
    }
    for mut text in &mut labels {
        *text = Text::new(manifest.ui.loading_label.clone());
    }
}

pub fn spawn_start_button(mut commands: Commands, panels: Query<Entity, With<LoadingPanel>>) {
    let Ok(panel) = panels.single() else { return };

    commands.entity(panel).with_children(|panel| {
        panel
            .spawn((
                StartButton,
                Button,
                Name::new("StartButton"),
                BackgroundColor(rgb(BUTTON_COLOUR)),
                BorderColor(Color::srgba(0.0, 0.0, 0.0, 0.25)),
                Node {
                    width: Val::Px(160.0),
                    height: Val::Px(40.0),
                    display: Display::Flex,
                    align_items: AlignItems::Center,
                    justify_content: JustifyContent::Center,
                    border: UiRect::all(Val::Px(1.0)),
                    ..default()
                },
            ))
            .with_children(|btn| {
                btn.spawn((
                    Text::new(START_LABEL),
                    TextFont { font_size: 18.0, ..default() },
                    TextColor(Color::WHITE),
                ));
            });
    });
}

// Corner panel holding the mute toggle
pub fn spawn_interface(
    mut commands: Commands,
    controller: Res<SessionController>,
    viewer_assets: Option<Res<ViewerAssets>>,
) {
    let icon = viewer_assets
        .map(|assets| assets.icon(controller.ui().mute_icon))
        .unwrap_or_default();

    commands
        .spawn((
            InterfacePanel,
            Name::new("InterfacePanel"),
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(12.0),
                right: Val::Px(12.0),
                display: display(controller.ui().interface_visible),
                ..default()
            },
        ))
        .with_children(|panel| {
            panel.spawn((
                MuteButton,
                Button,
                Name::new("MuteButton"),
                ImageNode::new(icon),
                BackgroundColor(rgb(BUTTON_COLOUR)),
                Node {
                    width: Val::Px(MUTE_BUTTON_SIZE_PX),
                    height: Val::Px(MUTE_BUTTON_SIZE_PX),
                    ..default()
                },
            ));
        });
}

pub fn update_progress_bar(
    controller: Res<SessionController>,
    mut fills: Query<&mut Node, With<ProgressFill>>,
) {
    if !controller.is_changed() {
        return;
    }
    let width = Val::Percent(controller.ui().progress * 100.0);
    for mut node in &mut fills {
        if node.width != width {
            node.width = width;
        }
    }
}

pub fn sync_overlay_visibility(
    controller: Res<SessionController>,
    mut nodes: ParamSet<(
        Query<&mut Node, With<LoadingPanel>>,
        Query<&mut Node, With<LoadingLabel>>,
        Query<&mut Node, With<ProgressTrack>>,
        Query<&mut Node, With<StartButton>>,
        Query<&mut Node, With<InterfacePanel>>,
    )>,
) {
    if !controller.is_changed() {
        return;
    }
    let ui: &UiState = controller.ui();

    for mut n in &mut nodes.p0() {
        n.display = display(ui.loading_panel_visible);
    }
    for mut n in &mut nodes.p1() {
        n.display = display(ui.loading_label_visible);
    }
    for mut n in &mut nodes.p2() {
        n.display = display(ui.progress_visible);
    }
    for mut n in &mut nodes.p3() {
        n.display = display(ui.start_button_visible);
    }
    for mut n in &mut nodes.p4() {
        n.display = display(ui.interface_visible);
    }
}

pub fn update_mute_icon(
    controller: Res<SessionController>,
    viewer_assets: Option<Res<ViewerAssets>>,
    mut icons: Query<&mut ImageNode, With<MuteButton>>,
) {
    if !controller.is_changed() {
        return;
    }
    let Some(viewer_assets) = viewer_assets else { return };
    let icon = viewer_assets.icon(controller.ui().mute_icon);
    for mut image in &mut icons {
        if image.image != icon {
            image.image = icon.clone();
        }
    }
}

// Start button begins the session
pub fn start_button_interaction(
    mut q: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>, With<StartButton>)>,
    mut session_commands: EventWriter<SessionCommand>,
) {
    for (interaction, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                session_commands.write(SessionCommand::Begin);
                *bg = BackgroundColor(rgb(BUTTON_PRESSED_COLOUR));
            }
            Interaction::Hovered => *bg = BackgroundColor(rgb(BUTTON_HOVER_COLOUR)),
            Interaction::None    => *bg = BackgroundColor(rgb(BUTTON_COLOUR)),
        }
    }
}

// Mute button toggles all channels together
pub fn mute_button_interaction(
    mut q: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>, With<MuteButton>)>,
    mut session_commands: EventWriter<SessionCommand>,
) {
    for (interaction, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                session_commands.write(SessionCommand::ToggleMute);
                *bg = BackgroundColor(rgb(BUTTON_PRESSED_COLOUR));
            }
            Interaction::Hovered => *bg = BackgroundColor(rgb(BUTTON_HOVER_COLOUR)),
            Interaction::None    => *bg = BackgroundColor(rgb(BUTTON_COLOUR)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::viewer_manifest::ViewerManifest;

    fn overlay_app() -> App {
        let mut controller = SessionController::new(&ViewerManifest::default().audio_channels);
        controller.set_progress(0.5);

        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(controller)
            .add_systems(Startup, spawn_loading_overlay)
            .add_systems(Update, (update_progress_bar, sync_overlay_visibility));
        app
    }

    fn node_display<T: Component>(app: &mut App) -> Display {
        let mut query = app.world_mut().query_filtered::<&Node, With<T>>();
        query.single(app.world()).map(|n| n.display).unwrap()
    }

    #[test]
    fn test_progress_fill_tracks_ui_state() {
        let mut app = overlay_app();
        app.update();

        let mut fills = app.world_mut().query_filtered::<&Node, With<ProgressFill>>();
        let width = fills.single(app.world()).map(|n| n.width).unwrap();
        assert_eq!(width, Val::Percent(50.0));
    }

    #[test]
    fn test_start_hides_progress_and_label() {
        let mut app = overlay_app();
        app.update();
        assert_eq!(node_display::<ProgressTrack>(&mut app), Display::Flex);

        app.world_mut().resource_mut::<SessionController>().start().unwrap();
        app.update();

        assert_eq!(node_display::<ProgressTrack>(&mut app), Display::None);
        assert_eq!(node_display::<LoadingLabel>(&mut app), Display::None);
        assert_eq!(node_display::<LoadingPanel>(&mut app), Display::Flex);
    }
}
