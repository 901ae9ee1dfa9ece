use bevy::prelude::*;
use bevy_egui::{
    egui::{self, Color32},
    EguiContexts, EguiPlugin,
};
use bevy_transform_mirror::prelude::*;

use crate::rig::ShowJointAxes;
use crate::rotator::Rotator;
use crate::settings::PlaygroundSettings;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin).add_systems(Update, ui);
    }
}

const MAX_DELAY_SECONDS: f64 = 5.0;
const MAX_ROTATION_SPEED: f32 = 360.0;

pub fn mirror_panel(ui: &mut egui::Ui, entity: Entity, mirror: &mut Mut<TransformMirror>) {
    ui.label(format!("Mirror {:?} of {:?}", entity, mirror.source()));

    let configured = mirror.mirror().is_configured();
    ui.horizontal(|ui| {
        ui.label("Status:");
        match configured {
            true => ui.colored_label(Color32::LIGHT_GREEN, "Mirroring"),
            false => ui.colored_label(Color32::LIGHT_RED, "Detached"),
        };
    });
    ui.label(format!("Pairs: {}", mirror.mirror().pairs().len()));
    ui.label(format!("Pending snapshots: {}", mirror.mirror().queue_len()));

    let mut delay = mirror.mirror().config().delay.as_secs();
    if ui
        .add(egui::Slider::new(&mut delay, 0.0..=MAX_DELAY_SECONDS).text("Delay (s)"))
        .changed()
    {
        match DelayWindow::from_secs(delay) {
            Ok(delay) => mirror.mirror_mut().set_delay(delay),
            Err(err) => warn!("{}", err),
        }
    }

    let mut mirror_scale = mirror.mirror().config().mirror_scale;
    if ui.checkbox(&mut mirror_scale, "Mirror Scale").changed() {
        mirror.mirror_mut().set_mirror_scale(mirror_scale);
    }

    ui.horizontal(|ui| {
        if ui.button("Rebuild Pairs").clicked() {
            info!("Rebuilding pairs of {:?}.", entity);
            mirror.request_setup();
        }
        if ui.button("Clear Pending").clicked() {
            mirror.mirror_mut().clear_pending();
        }
    });

    unmatched_list(ui, mirror.last_report());
}

fn unmatched_list(ui: &mut egui::Ui, report: Option<&SetupReport>) {
    let Some(report) = report else {
        return;
    };

    let unmatched: Vec<_> = report.unmatched_names().collect();
    if unmatched.is_empty() {
        return;
    }

    ui.add_space(5.0);
    ui.label("Unmatched Joints");
    egui::Frame::default()
        .inner_margin(6.0)
        .outer_margin(4.0)
        .stroke((1.0, Color32::DARK_GRAY))
        .rounding(10.0)
        .show(ui, |ui| {
            egui::ScrollArea::vertical()
                .max_height(120.0)
                .auto_shrink(false)
                .show(ui, |ui| {
                    for name in unmatched {
                        ui.label(name);
                    }
                });
        });
}

pub fn rotation_slider(
    ui: &mut egui::Ui,
    settings: &mut PlaygroundSettings,
    q_rotators: &mut Query<&mut Rotator>,
) {
    if ui
        .add(
            egui::Slider::new(&mut settings.rotation_speed, 0.0..=MAX_ROTATION_SPEED)
                .text("Rotation (deg/s)"),
        )
        .changed()
    {
        for mut rotator in q_rotators.iter_mut() {
            rotator.degrees_per_second = settings.rotation_speed;
        }
    }
}

fn ui(
    mut contexts: EguiContexts,
    mut q_mirrors: Query<(Entity, &mut TransformMirror)>,
    mut q_rotators: Query<&mut Rotator>,
    mut settings: ResMut<PlaygroundSettings>,
    mut show_joint_axes: ResMut<ShowJointAxes>,
) {
    let ctx = contexts.ctx_mut();

    egui::SidePanel::right("right_panel")
        .resizable(false)
        .show(ctx, |ui| {
            ui.heading("Delayed Mirror");
            ui.add_space(10.0);
            for (entity, mut mirror) in q_mirrors.iter_mut() {
                mirror_panel(ui, entity, &mut mirror);
                ui.separator();
            }
            ui.add_space(10.0);
            rotation_slider(ui, &mut settings, &mut q_rotators);
            ui.checkbox(&mut show_joint_axes.0, "Show Joint Axes");
        });
}
