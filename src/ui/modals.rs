use eframe::egui;

use crate::engine::protocol::EngineCommand;
use crate::ui::app::{App, DetailsPanel, Modal};

pub fn draw_modals(ctx: &egui::Context, app: &mut App) {
    match &app.modal {
        Modal::None => {}
        Modal::LevelUp(_) => draw_level_up(ctx, app),
        Modal::Details(panel) => {
            let panel = *panel;
            draw_details(ctx, app, panel);
        }
    }
}

/// The level-up prompt. No close button: the flow only leaves this modal
/// once the server has resolved the chosen stat.
fn draw_level_up(ctx: &egui::Context, app: &mut App) {
    let (stats, resolving) = match &app.modal {
        Modal::LevelUp(modal) => (modal.stats.clone(), modal.resolving),
        _ => return,
    };

    let mut picked: Option<String> = None;
    egui::Window::new("Level Up!")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label("You feel a surge of power. Choose a stat to increase:");
            ui.add_space(6.0);
            for stat in &stats {
                let label = format!("{} (+1)", title_case(stat));
                if ui.add_enabled(!resolving, egui::Button::new(label)).clicked() {
                    picked = Some(stat.clone());
                }
            }
            if resolving {
                ui.add_space(6.0);
                ui.weak("Consulting the fates...");
            }
        });

    if let Some(stat) = picked {
        if let Modal::LevelUp(modal) = &mut app.modal {
            modal.resolving = true;
        }
        app.busy = true;
        app.send(EngineCommand::ChooseLevelUpStat(stat));
    }
}

/// Read-only projections of the current snapshot, rebuilt every frame the
/// modal is open. No diffing.
fn draw_details(ctx: &egui::Context, app: &mut App, panel: DetailsPanel) {
    let Some(state) = app.snapshot.as_ref() else {
        app.modal = Modal::None;
        return;
    };
    let player = &state.player;

    let mut close = false;
    egui::Window::new(panel.title())
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            match panel {
                DetailsPanel::Character => {
                    egui::Grid::new("character_grid")
                        .num_columns(2)
                        .show(ui, |ui| {
                            ui.strong("Level:");
                            ui.label(player.level.to_string());
                            ui.end_row();
                            ui.strong("XP:");
                            ui.label(format!("{} / {}", player.xp, player.xp_to_next_level));
                            ui.end_row();
                            for (stat, value) in &player.stats {
                                ui.strong(format!("{}:", title_case(stat)));
                                ui.label(value.to_string());
                                ui.end_row();
                            }
                        });
                }
                DetailsPanel::Inventory => {
                    if player.inventory.is_empty() {
                        ui.label("Your inventory is empty.");
                    } else {
                        for (item, count) in &player.inventory {
                            ui.label(format!("{item} (x{count})"));
                        }
                    }
                }
                DetailsPanel::Skills => {
                    if player.skills.is_empty() {
                        ui.label("You have no skills.");
                    } else {
                        for (skill, details) in &player.skills {
                            ui.label(format!("{skill} (Cost: {} Mana)", details.cost));
                        }
                    }
                }
            }

            ui.add_space(8.0);
            if ui.button("Close").clicked() {
                close = true;
            }
        });

    if close {
        app.modal = Modal::None;
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_uppercases_only_the_first_letter() {
        assert_eq!(title_case("strength"), "Strength");
        assert_eq!(title_case("x"), "X");
        assert_eq!(title_case(""), "");
    }
}
