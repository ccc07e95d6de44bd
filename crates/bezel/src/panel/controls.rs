//! Left side panel: sliders, wireframe, background, animation, view presets.

use crate::animation::AnimationPreset;
use crate::frame::FrameStats;
use crate::input::{ControlEvent, ControlPanel, InputSource};
use crate::math::Parameter;
use crate::render::hex_to_rgb;

/// Draw the control panel and feed every change into `panel`.
pub(crate) fn controls_panel(
    ctx: &egui::Context,
    panel: &mut ControlPanel,
    stats: Option<FrameStats>,
    fps: f32,
) {
    egui::SidePanel::left("controls_panel")
        .default_width(260.0)
        .resizable(false)
        .show(ctx, |ui| {
            ui.heading("Monitor");
            ui.separator();

            for parameter in Parameter::ALL {
                slider_row(ui, panel, parameter);
            }

            ui.separator();

            let mut wireframe = panel.wireframe();
            if ui.checkbox(&mut wireframe, "Wireframe").changed() {
                panel.set_wireframe(wireframe);
            }

            ui.horizontal(|ui| {
                ui.label("Background");
                let mut rgb = background_bytes(panel.background());
                if egui::color_picker::color_edit_button_srgb(ui, &mut rgb).changed() {
                    panel.set_background(format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2]));
                }
                ui.monospace(panel.background());
            });

            ui.separator();

            if ui.button(panel.animate_caption()).clicked() {
                panel.press_animate();
            }

            let mut preset = panel.preset();
            egui::ComboBox::from_label("Preset")
                .selected_text(preset.label())
                .show_ui(ui, |ui| {
                    for option in AnimationPreset::ALL {
                        ui.selectable_value(&mut preset, option, option.label());
                    }
                });
            if preset != panel.preset() {
                panel.choose_preset(preset);
            }

            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Reset").clicked() {
                    panel.request(ControlEvent::ResetView);
                }
                if ui.button("Save View").clicked() {
                    panel.request(ControlEvent::SavePreset);
                }
                if ui.button("Load View").clicked() {
                    panel.request(ControlEvent::LoadPreset);
                }
            });

            ui.separator();

            ui.label(format!("FPS: {fps:.0}"));
            if let Some(stats) = stats {
                ui.label(format!("Frame: {}", stats.frame));
                ui.label(format!(
                    "Draw calls: {} ({} indices)",
                    stats.draw_calls, stats.indices_drawn
                ));
                ui.label(format!("Animation: {}", stats.animation.name()));
            }

            ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
                ui.label("F12 to toggle");
            });
        });
}

fn slider_row(ui: &mut egui::Ui, panel: &mut ControlPanel, parameter: Parameter) {
    let mut value = panel.slider(parameter).value;
    ui.horizontal(|ui| {
        ui.label(parameter.label());
        let response = ui.add(egui::Slider::new(&mut value, parameter.range()).show_value(false));
        ui.monospace(&panel.slider(parameter).text);
        if response.changed() {
            panel.set_value(parameter, value);
        }
    });
}

/// Background as sRGB bytes for the color picker; white if unparsable.
fn background_bytes(hex: &str) -> [u8; 3] {
    match hex_to_rgb(hex) {
        Ok(rgb) => rgb.map(|c| (c * 255.0).round() as u8),
        Err(_) => [255, 255, 255],
    }
}
