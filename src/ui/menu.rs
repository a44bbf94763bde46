use eframe::egui;

use crate::engine::protocol::EngineCommand;
use crate::model::save::SaveSlot;
use crate::ui::app::{App, StartView, SCENARIOS};
use crate::ui::settings_io;

pub fn draw_start_screen(ctx: &egui::Context, app: &mut App) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(12.0);
            ui.heading("Fateweaver");
            ui.weak("A story the server writes with you.");
        });
        ui.add_space(12.0);
        ui.separator();

        match app.start_view {
            StartView::MainMenu => draw_main_menu(ui, app),
            StartView::ScenarioChooser => draw_scenario_chooser(ui, app),
        }

        ui.add_space(16.0);
        ui.separator();
        draw_options(ui, app);
    });

    draw_confirm_delete(ctx, app);
    draw_menu_error(ctx, app);
}

fn draw_main_menu(ui: &mut egui::Ui, app: &mut App) {
    if ui.button("New Game").clicked() {
        app.start_view = StartView::ScenarioChooser;
        app.show_custom_area = false;
    }

    ui.add_space(8.0);
    ui.heading("Saved Games");

    if app.save_slots.is_empty() {
        ui.label("No saved games yet.");
        return;
    }

    let mut load: Option<SaveSlot> = None;
    let mut delete: Option<String> = None;

    egui::ScrollArea::vertical()
        .max_height(260.0)
        .show(ui, |ui| {
            for slot in &app.save_slots {
                ui.group(|ui| {
                    ui.horizontal(|ui| {
                        ui.vertical(|ui| {
                            ui.strong(slot.player_name());
                            ui.weak(slot.saved_label());
                        });
                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                if ui.button("Delete").clicked() {
                                    delete = Some(slot.save_id.clone());
                                }
                                if ui.button("Load").clicked() {
                                    load = Some(slot.clone());
                                }
                            },
                        );
                    });
                });
            }
        });

    if let Some(slot) = load {
        app.load_game(slot);
    }
    if let Some(save_id) = delete {
        app.pending_delete = Some(save_id);
    }
}

fn draw_scenario_chooser(ui: &mut egui::Ui, app: &mut App) {
    ui.heading("Choose Your Beginning");

    ui.horizontal(|ui| {
        ui.label("Character name");
        ui.add(egui::TextEdit::singleline(&mut app.name_input).hint_text("Adventurer"));
    });
    ui.add_space(8.0);

    let mut chosen: Option<&'static str> = None;
    for scenario in SCENARIOS {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.strong(scenario.title);
                    ui.weak(scenario.blurb);
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Begin").clicked() {
                        chosen = Some(scenario.id);
                    }
                });
            });
        });
    }
    if let Some(id) = chosen {
        app.start_new_game(id, None);
        return;
    }

    ui.group(|ui| {
        ui.strong("Custom");
        if !app.show_custom_area {
            ui.weak("Describe your own opening and let the server improvise.");
            if ui.button("Write one...").clicked() {
                app.show_custom_area = true;
            }
        } else {
            ui.add(
                egui::TextEdit::multiline(&mut app.custom_scenario)
                    .hint_text("Describe your custom scenario...")
                    .desired_rows(3),
            );
            let ready = !app.custom_scenario.trim().is_empty();
            if ui
                .add_enabled(ready, egui::Button::new("Begin Custom Game"))
                .clicked()
            {
                let text = app.custom_scenario.trim().to_string();
                app.start_new_game("custom", Some(text));
            }
        }
    });

    ui.add_space(8.0);
    if ui.button("Back").clicked() {
        app.start_view = StartView::MainMenu;
    }
}

fn draw_options(ui: &mut egui::Ui, app: &mut App) {
    ui.collapsing("Options", |ui| {
        ui.label("Server URL");
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut app.settings.server_url).desired_width(240.0),
            );
            if ui.button("Apply").clicked() {
                settings_io::save_settings(&app.settings);
                app.send(EngineCommand::SetServerUrl(app.settings.server_url.clone()));
            }
        });

        ui.label("UI Scale");
        let scale = ui.add(egui::Slider::new(&mut app.settings.ui_scale, 0.75..=2.0));
        if scale.drag_stopped() {
            settings_io::save_settings(&app.settings);
        }
    });
}

fn draw_confirm_delete(ctx: &egui::Context, app: &mut App) {
    let Some(save_id) = app.pending_delete.clone() else {
        return;
    };
    egui::Window::new("Delete save?")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label("Are you sure you want to permanently delete this save?");
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Delete").clicked() {
                    app.send(EngineCommand::DeleteSave(save_id.clone()));
                    app.pending_delete = None;
                }
                if ui.button("Cancel").clicked() {
                    app.pending_delete = None;
                }
            });
        });
}

fn draw_menu_error(ctx: &egui::Context, app: &mut App) {
    let Some(message) = app.menu_error.clone() else {
        return;
    };
    egui::Window::new("Error")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(message);
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                app.menu_error = None;
            }
        });
}
