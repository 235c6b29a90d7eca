//! Debug panels for the neighbourhood demo
//!
//! Panels only edit plain state; the frame driver picks the edits up on the
//! next frame.

use cgmath::Vector3;

use crate::gfx::lighting::{Attenuation, LightColors, LightState, SpotLight};
use crate::gun::GunManager;
use crate::neighbourhood::InspectorState;

/// Building, material and light controls
///
/// # Arguments
/// * `ui` - ImGui UI context
/// * `inspector` - Building and clear colour values
/// * `lights` - Light parameters uploaded to the lit shaders
pub fn inspector_panel(ui: &imgui::Ui, inspector: &mut InspectorState, lights: &mut LightState) {
    ui.window("Inspector").build(|| {
        ui.input_int("Chosen building", &mut inspector.chosen_building)
            .build();
        edit_vec3(&mut inspector.building_offset, |value| {
            ui.slider_config("Building offset", -10.0, 10.0)
                .build_array(value)
        });
        edit_vec3(&mut inspector.neighbourhood_position, |value| {
            ui.input_float3("Neighbourhood position", value).build()
        });
        edit_vec3(&mut inspector.houses_position, |value| {
            ui.input_float3("Houses position", value).build()
        });

        ui.text("Material");
        ui.slider("Shininess", 0.0, 256.0, &mut lights.shininess);
        ui.color_edit4("Clear color", &mut inspector.clear_color);

        if ui.collapsing_header("Directional light", imgui::TreeNodeFlags::DEFAULT_OPEN) {
            let dir = &mut lights.dir_light;
            ui.checkbox("Enabled##directional", &mut dir.active);
            edit_vec3(&mut dir.direction, |value| {
                ui.slider_config("Direction", -1.0, 1.0).build_array(value)
            });
            color_controls(ui, "", &mut dir.colors);
        }

        if ui.collapsing_header("Point light", imgui::TreeNodeFlags::empty()) {
            let point = &mut lights.point_light;
            ui.checkbox("Enabled##point", &mut point.active);
            color_controls(ui, "Point light ", &mut point.colors);
            attenuation_controls(ui, "Point light ", &mut point.attenuation);
        }

        for (i, spot) in lights.spot_lights.iter_mut().enumerate() {
            let label = format!("Spot light {}", i);
            if ui.collapsing_header(&label, imgui::TreeNodeFlags::empty()) {
                spot_controls(ui, &label, spot);
            }
        }

        let framerate = ui.io().framerate;
        ui.text(format!(
            "Application average {:.3} ms/frame ({:.1} FPS)",
            1000.0 / framerate.max(f32::EPSILON),
            framerate
        ));
    });
}

/// Rounds left in the chosen weapon
pub fn ammo_panel(ui: &imgui::Ui, guns: &GunManager) {
    ui.window("Ammo").build(|| match (guns.ammo(), guns.capacity()) {
        (Some(ammo), Some(capacity)) => ui.text(format!("{} / {}", ammo, capacity)),
        _ => ui.text("No weapon"),
    });
}

fn spot_controls(ui: &imgui::Ui, label: &str, spot: &mut SpotLight) {
    ui.checkbox(format!("Enabled##{}", label), &mut spot.active);
    edit_vec3(&mut spot.position, |value| {
        imgui::Drag::new(format!("{} position", label))
            .range(-10.0, 10.0)
            .speed(0.1)
            .build_array(ui, value)
    });
    edit_vec3(&mut spot.direction, |value| {
        ui.slider_config(format!("{} direction", label), -1.0, 1.0)
            .build_array(value)
    });

    let prefix = format!("{} ", label);
    color_controls(ui, &prefix, &mut spot.colors);
    attenuation_controls(ui, &prefix, &mut spot.attenuation);
    ui.input_float(format!("{}cut off", prefix), &mut spot.cut_off)
        .build();
    ui.input_float(format!("{}outer cut off", prefix), &mut spot.outer_cut_off)
        .build();
}

fn color_controls(ui: &imgui::Ui, prefix: &str, colors: &mut LightColors) {
    edit_vec3(&mut colors.ambient, |value| {
        ui.color_edit3(format!("{}ambient", prefix), value)
    });
    edit_vec3(&mut colors.diffuse, |value| {
        ui.color_edit3(format!("{}diffuse", prefix), value)
    });
    edit_vec3(&mut colors.specular, |value| {
        ui.color_edit3(format!("{}specular", prefix), value)
    });
}

fn attenuation_controls(ui: &imgui::Ui, prefix: &str, attenuation: &mut Attenuation) {
    ui.input_float(format!("{}constant", prefix), &mut attenuation.constant)
        .build();
    ui.input_float(format!("{}linear", prefix), &mut attenuation.linear)
        .build();
    ui.input_float(format!("{}quadratic", prefix), &mut attenuation.quadratic)
        .build();
}

/// Runs an array widget over a vector, writing back only on change
fn edit_vec3(value: &mut Vector3<f32>, widget: impl FnOnce(&mut [f32; 3]) -> bool) -> bool {
    let mut array: [f32; 3] = (*value).into();
    let changed = widget(&mut array);
    if changed {
        *value = array.into();
    }
    changed
}
