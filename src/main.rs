use anyhow::Context;
use clap::Parser;
use eframe::egui;
use fileexplorer::config::{init_logging, Args};
use fileexplorer::loader::TreeSource;
use fileexplorer::render_tree::RenderRow;
use fileexplorer::{
    ActionKind, Browser, HitTarget, NodeKind, Notification, NotificationLevel, PointerEvent,
};

const INDENT_PX: f32 = 18.0;
const MENU_MIN_WIDTH: f32 = 120.0;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let source = args.source();
    let root = source
        .load()
        .with_context(|| format!("loading {}", source.describe()))?;
    log::info!("loaded {}", source.describe());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 720.0])
            .with_title("File Explorer"),
        ..Default::default()
    };

    let app = ExplorerApp::new(Browser::with_log_sink(root), source);
    eframe::run_native(
        "File Explorer",
        options,
        Box::new(|cc| {
            configure_custom_style(&cc.egui_ctx);
            Box::new(app)
        }),
    )
    .map_err(|err| anyhow::anyhow!("{}", err))
}

fn configure_custom_style(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = egui::Color32::from_rgba_unmultiplied(30, 41, 59, 240);
    visuals.window_fill = egui::Color32::from_rgba_unmultiplied(30, 41, 59, 230);
    visuals.window_rounding = egui::Rounding::same(8.0);
    visuals.widgets.inactive.rounding = egui::Rounding::same(4.0);
    visuals.widgets.hovered.rounding = egui::Rounding::same(4.0);
    visuals.widgets.active.rounding = egui::Rounding::same(4.0);
    style.visuals = visuals;

    style.spacing.item_spacing = egui::vec2(8.0, 4.0);

    ctx.set_style(style);
}

struct ExplorerApp {
    browser: Browser,
    source: TreeSource,
    status: Option<Notification>,
}

impl ExplorerApp {
    fn new(browser: Browser, source: TreeSource) -> Self {
        Self {
            browser,
            source,
            status: None,
        }
    }

    fn reload(&mut self) {
        match self.source.load() {
            Ok(root) => {
                self.browser.replace_root(root);
                self.status = Some(Notification {
                    level: NotificationLevel::Info,
                    message: format!("Reloaded {}", self.source.describe()),
                });
            }
            Err(err) => {
                log::error!("reload failed: {}", err);
                self.status = Some(Notification {
                    level: NotificationLevel::Error,
                    message: format!("Reload failed: {}", err),
                });
            }
        }
    }

    fn row_text(row: &RenderRow) -> egui::RichText {
        match row.kind {
            NodeKind::Folder => {
                let marker = if row.expanded { "▾" } else { "▸" };
                egui::RichText::new(format!("{} 📁 {}", marker, row.name)).strong()
            }
            NodeKind::File => egui::RichText::new(format!("   📄 {}", row.name)),
        }
    }

    /// Draw the rows; returns the row press of this frame, if any.
    fn show_rows(&self, ui: &mut egui::Ui) -> Option<(HitTarget, PointerEvent)> {
        let mut pending = None;

        for row in self.browser.rows() {
            ui.horizontal(|ui| {
                ui.add_space(row.depth as f32 * INDENT_PX);
                let response = ui.selectable_label(row.selected, Self::row_text(&row));
                let pos = response
                    .interact_pointer_pos()
                    .unwrap_or(response.rect.left_bottom());

                if response.clicked() {
                    pending = Some((HitTarget::Row(row.path.clone()), PointerEvent::primary(pos.x, pos.y)));
                } else if response.secondary_clicked() {
                    pending = Some((HitTarget::Row(row.path.clone()), PointerEvent::secondary(pos.x, pos.y)));
                }
            });
        }

        pending
    }

    /// Draw the context menu when open; returns the action press, if any.
    fn show_menu(&self, ctx: &egui::Context) -> Option<(HitTarget, PointerEvent)> {
        let menu = self.browser.context_menu();
        if !menu.visible {
            return None;
        }

        let mut pending = None;
        egui::Area::new(egui::Id::new("file_context_menu"))
            .order(egui::Order::Foreground)
            .fixed_pos(egui::pos2(menu.x, menu.y))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_min_width(MENU_MIN_WIDTH);
                    for action in ActionKind::ALL {
                        let response = ui.button(action.label());
                        if response.clicked() {
                            let pos = response
                                .interact_pointer_pos()
                                .unwrap_or(response.rect.center());
                            pending = Some((HitTarget::MenuItem(action), PointerEvent::primary(pos.x, pos.y)));
                        }
                    }
                });
            });

        pending
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("File Explorer");
                ui.separator();
                ui.label(self.source.describe());
                if ui.button("Reload").clicked() {
                    self.reload();
                }
            });
        });

        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Selected: {}", self.browser.selected().unwrap_or("(none)")));
                if let Some(note) = &self.status {
                    ui.separator();
                    let color = match note.level {
                        NotificationLevel::Info => egui::Color32::LIGHT_GRAY,
                        NotificationLevel::Error => egui::Color32::LIGHT_RED,
                    };
                    ui.colored_label(color, note.message.as_str());
                }
            });
        });

        let panel = egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| self.show_rows(ui))
                .inner
        });
        let tree_rect = panel.response.rect;

        // The menu sits on top, so its press wins over the row underneath.
        let mut pending = self.show_menu(ctx).or(panel.inner);

        if pending.is_none() {
            let click = ctx.input(|i| {
                if i.pointer.primary_clicked() {
                    i.pointer.interact_pos()
                } else {
                    None
                }
            });
            if let Some(pos) = click.filter(|pos| tree_rect.contains(*pos)) {
                pending = Some((HitTarget::Background, PointerEvent::primary(pos.x, pos.y)));
            }
        }

        if let Some((target, mut event)) = pending {
            self.browser.dispatch(&target, &mut event);
            if let Some(note) = self.browser.drain_notifications().pop() {
                self.status = Some(note);
            }
        }
    }
}
