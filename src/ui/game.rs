use eframe::egui;
use egui::{Color32, RichText};

use crate::engine::protocol::EngineCommand;
use crate::model::message::StoryEntry;
use crate::ui::app::{App, DetailsPanel, Modal};

pub fn draw_game_screen(ctx: &egui::Context, app: &mut App) {
    draw_hud(ctx, app);
    draw_action_bar(ctx, app);
    draw_story_log(ctx, app);
    draw_confirm_leave(ctx, app);
}

/* ---------- HUD ---------- */

fn draw_hud(ctx: &egui::Context, app: &mut App) {
    egui::TopBottomPanel::top("hud").show(ctx, |ui| {
        ui.add_space(4.0);

        ui.horizontal(|ui| match &app.snapshot {
            Some(state) => {
                let player = &state.player;
                ui.strong(&player.name);
                ui.separator();
                stat_bar(ui, "HP", player.hp, player.max_hp, Color32::from_rgb(170, 50, 50));
                stat_bar(
                    ui,
                    "Mana",
                    player.mana,
                    player.max_mana,
                    Color32::from_rgb(50, 90, 170),
                );
                ui.separator();
                ui.label(format!("Gold {}", player.currency_amount("gold")));
                ui.label(format!("Silver {}", player.currency_amount("silver")));
                ui.label(format!("Copper {}", player.currency_amount("copper")));
                if !state.current_location.is_empty() {
                    ui.separator();
                    ui.weak(&state.current_location);
                }
            }
            None => {
                ui.weak("...");
            }
        });

        ui.horizontal(|ui| {
            // The level-up window does not block clicks outside its rect,
            // so every button here checks the lock itself.
            let have_session = app.snapshot.is_some() && !app.level_up_open();

            for (label, panel) in [
                ("Character", DetailsPanel::Character),
                ("Inventory", DetailsPanel::Inventory),
                ("Skills", DetailsPanel::Skills),
            ] {
                let open = ui.add_enabled(have_session, egui::Button::new(label));
                if open.clicked() {
                    app.modal = Modal::Details(panel);
                }
            }
            ui.separator();

            let save_label = app
                .save_flash
                .as_ref()
                .map(|flash| flash.label)
                .unwrap_or("Save Game");
            if ui
                .add_enabled(have_session, egui::Button::new(save_label))
                .clicked()
            {
                app.send(EngineCommand::SaveGame);
            }

            if ui
                .add_enabled(
                    !app.input_locked() && app.snapshot.is_some(),
                    egui::Button::new("Hint"),
                )
                .clicked()
            {
                app.busy = true;
                app.send(EngineCommand::RequestHint);
            }

            if ui
                .add_enabled(!app.level_up_open(), egui::Button::new("Return to Menu"))
                .clicked()
            {
                app.confirm_leave = true;
            }
        });

        ui.add_space(4.0);
    });
}

/// HP/mana bar. The fraction is passed through unclamped on purpose: an
/// over-max value reads as an over-full bar, and the text always shows the
/// real numbers.
fn stat_bar(ui: &mut egui::Ui, label: &str, current: i64, max: i64, fill: Color32) {
    let fraction = if max > 0 {
        current as f32 / max as f32
    } else {
        0.0
    };
    ui.add(
        egui::ProgressBar::new(fraction)
            .desired_width(130.0)
            .fill(fill)
            .text(
                RichText::new(format!("{label} {current} / {max}"))
                    .color(Color32::WHITE)
                    .small(),
            ),
    );
}

/* ---------- Choices + input ---------- */

fn draw_action_bar(ctx: &egui::Context, app: &mut App) {
    let locked = app.input_locked();
    egui::TopBottomPanel::bottom("action_bar").show(ctx, |ui| {
        ui.add_space(4.0);

        if !app.choices.is_empty() {
            let mut clicked: Option<String> = None;
            ui.horizontal_wrapped(|ui| {
                for choice in &app.choices {
                    let label = choice.label();
                    if ui.add_enabled(!locked, egui::Button::new(&label)).clicked() {
                        clicked = Some(label);
                    }
                }
            });
            if let Some(action) = clicked {
                app.submit_action(action);
            }
            ui.add_space(4.0);
        }

        ui.horizontal(|ui| {
            let input = ui
                .add_enabled_ui(!locked, |ui| {
                    ui.add_sized(
                        [ui.available_width() - 64.0, 24.0],
                        egui::TextEdit::singleline(&mut app.action_input)
                            .hint_text("What do you do?"),
                    )
                })
                .inner;
            let entered = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let sent = ui
                .add_enabled(!locked, egui::Button::new("Send"))
                .clicked();

            if (entered || sent) && !locked {
                let action = app.action_input.trim().to_string();
                app.action_input.clear();
                app.submit_action(action);
                input.request_focus();
            }
        });

        ui.add_space(4.0);
    });
}

/* ---------- Story log ---------- */

fn draw_story_log(ctx: &egui::Context, app: &mut App) {
    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(app.autoscroll)
            .show(ui, |ui| {
                for entry in &app.log {
                    draw_entry(ui, entry);
                }
            });
    });
}

fn draw_entry(ui: &mut egui::Ui, entry: &StoryEntry) {
    ui.add_space(6.0);
    match entry {
        StoryEntry::Action(text) => {
            ui.label(RichText::new(format!("> {text}")).strong());
        }
        StoryEntry::Narration(text) => {
            ui.label(text);
        }
        StoryEntry::System(text) => {
            ui.label(RichText::new(text).italics().weak());
        }
    }
}

fn draw_confirm_leave(ctx: &egui::Context, app: &mut App) {
    if !app.confirm_leave {
        return;
    }
    egui::Window::new("Return to menu?")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label("Are you sure? Unsaved progress will be lost.");
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Leave").clicked() {
                    app.return_to_menu();
                }
                if ui.button("Cancel").clicked() {
                    app.confirm_leave = false;
                }
            });
        });
}
