use eframe::egui;
use egui::{Color32, CornerRadius, RichText, ScrollArea, Stroke, Ui, ViewportBuilder};
use tracing_subscriber::EnvFilter;

mod config;
mod controller;
mod error;
mod hn_client;
mod models;
mod sort;
mod store;

use crate::config::Config;
use crate::controller::{SearchController, SearchStatus};
use crate::hn_client::HackerNewsClient;
use crate::models::Hit;
use crate::sort::{SortKey, SortState};

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() -> anyhow::Result<()> {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config, using defaults: {:#}", e);
            Config::default()
        }
    };
    init_tracing(&config);
    tracing::info!(base_url = %config.base_url, query = %config.default_query, "starting HN Search");

    let client = HackerNewsClient::new(&config)?;

    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([720.0, 480.0])
            .with_title("HN Search"),
        ..Default::default()
    };

    eframe::run_native(
        "HN Search",
        options,
        Box::new(move |cc| {
            // Wake the UI when a worker finishes, otherwise egui sleeps until the next input event
            let ctx = cc.egui_ctx.clone();
            let controller =
                SearchController::new(client, &config.default_query).with_notifier(move || ctx.request_repaint());
            Ok(Box::new(HnSearchApp::new(controller, &config.default_query)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))
}

struct AppTheme {
    background: Color32,
    card_background: Color32,
    text: Color32,
    secondary_text: Color32,
    highlight: Color32,
    separator: Color32,
    error: Color32,
    button_background: Color32,
    button_foreground: Color32,
    button_active_background: Color32,
    button_hover_background: Color32,
}

impl AppTheme {
    fn dark() -> Self {
        Self {
            background: Color32::from_rgb(18, 18, 18),
            card_background: Color32::from_rgb(30, 30, 30),
            text: Color32::from_rgb(240, 240, 240),
            secondary_text: Color32::from_rgb(180, 180, 180),
            highlight: Color32::from_rgb(255, 102, 0), // HN orange
            separator: Color32::from_rgb(60, 60, 60),
            error: Color32::from_rgb(239, 83, 80),
            button_background: Color32::from_rgb(66, 66, 66),
            button_foreground: Color32::from_rgb(240, 240, 240),
            button_active_background: Color32::from_rgb(255, 102, 0),
            button_hover_background: Color32::from_rgb(80, 80, 80),
        }
    }

    fn light() -> Self {
        Self {
            background: Color32::from_rgb(245, 245, 245),
            card_background: Color32::from_rgb(255, 255, 255),
            text: Color32::from_rgb(20, 20, 20),
            secondary_text: Color32::from_rgb(90, 90, 90),
            highlight: Color32::from_rgb(235, 92, 0),
            separator: Color32::from_rgb(200, 200, 200),
            error: Color32::from_rgb(198, 40, 40),
            button_background: Color32::from_rgb(235, 235, 235),
            button_foreground: Color32::from_rgb(20, 20, 20),
            button_active_background: Color32::from_rgb(235, 92, 0),
            button_hover_background: Color32::from_rgb(210, 210, 210),
        }
    }

    fn apply_to_ctx(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();

        style.visuals.panel_fill = self.background;
        style.visuals.window_fill = self.card_background;
        style.visuals.window_stroke = Stroke::new(1.0, self.separator);
        style.visuals.faint_bg_color = self.card_background;
        style.visuals.widgets.noninteractive.bg_fill = self.card_background;
        style.visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text);
        style.visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.separator);

        style.visuals.widgets.inactive.bg_fill = self.button_background;
        style.visuals.widgets.inactive.weak_bg_fill = self.button_background;
        style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.button_foreground);
        style.visuals.widgets.active.bg_fill = self.button_active_background;
        style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.button_foreground);
        style.visuals.widgets.hovered.bg_fill = self.button_hover_background;
        style.visuals.widgets.hovered.weak_bg_fill = self.button_hover_background;
        style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.button_foreground);

        style.visuals.selection.bg_fill = self.highlight;
        style.visuals.selection.stroke = Stroke::new(1.0, self.highlight);

        style.visuals.widgets.noninteractive.corner_radius = CornerRadius::same(4);
        style.visuals.widgets.inactive.corner_radius = CornerRadius::same(4);
        style.visuals.widgets.hovered.corner_radius = CornerRadius::same(4);
        style.visuals.widgets.active.corner_radius = CornerRadius::same(4);

        ctx.set_style(style);
    }
}

struct HnSearchApp {
    controller: SearchController<HackerNewsClient>,
    // Mirror of the search box; pushed into the session on every edit
    query_input: String,
    sort: SortState,
    theme: AppTheme,
    is_dark_mode: bool,
    mounted: bool,
}

impl HnSearchApp {
    fn new(controller: SearchController<HackerNewsClient>, default_query: &str) -> Self {
        Self {
            controller,
            query_input: default_query.to_string(),
            sort: SortState::default(),
            theme: AppTheme::dark(),
            is_dark_mode: true,
            mounted: false,
        }
    }

    fn toggle_theme(&mut self) {
        self.is_dark_mode = !self.is_dark_mode;
        self.theme = if self.is_dark_mode {
            AppTheme::dark()
        } else {
            AppTheme::light()
        };
    }

    fn open_link(&self, url: &str) {
        if let Err(e) = open::that(url) {
            tracing::warn!(url, error = %e, "failed to open link");
        }
    }

    fn render_header(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading(RichText::new("HN Search").color(self.theme.highlight).size(24.0));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let theme_icon = if self.is_dark_mode { "☀" } else { "☾" };
                let theme_btn = ui
                    .add(
                        egui::Button::new(RichText::new(theme_icon).color(self.theme.button_foreground).size(20.0))
                            .min_size(egui::Vec2::new(32.0, 32.0))
                            .corner_radius(CornerRadius::same(16))
                            .fill(self.theme.button_background),
                    )
                    .on_hover_text(if self.is_dark_mode {
                        "Switch to Light Mode"
                    } else {
                        "Switch to Dark Mode"
                    });

                if theme_btn.clicked() {
                    self.toggle_theme();
                }
            });
        });
    }

    fn render_search_box(&mut self, ui: &mut Ui) {
        let mut submitted = false;

        ui.horizontal(|ui| {
            let text_edit = ui.add_sized(
                [ui.available_width() - 90.0, 30.0],
                egui::TextEdit::singleline(&mut self.query_input)
                    .hint_text("Search stories...")
                    .text_color(self.theme.text)
                    .id(egui::Id::new("search_input")),
            );

            if text_edit.changed() {
                self.controller.set_query_text(self.query_input.clone());
            }
            if text_edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                submitted = true;
            }

            let search_btn = ui.add_sized(
                [80.0, 30.0],
                egui::Button::new(RichText::new("Search").color(self.theme.button_foreground))
                    .fill(self.theme.button_background),
            );
            if search_btn.clicked() {
                submitted = true;
            }
        });

        if submitted {
            let query = self.controller.session().query_text.clone();
            self.controller.submit(&query);
        }
    }

    fn render_error(&self, ui: &mut Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.label(RichText::new("Something went wrong.").color(self.theme.error).size(18.0));
            if let Some(err) = &self.controller.session().last_error {
                ui.add_space(6.0);
                ui.label(RichText::new(err.to_string()).color(self.theme.secondary_text).size(13.0).italics());
            }
            ui.add_space(40.0);
        });
    }

    fn render_sort_header(&self, ui: &mut Ui, column: SortKey, pending_sort: &mut Option<SortKey>) {
        let active = self.sort.key == column;
        let mut label = column.label().to_string();
        if let Some(arrow) = self.sort.arrow_for(column) {
            label.push(' ');
            label.push_str(arrow.glyph());
        }

        let color = if active { self.theme.highlight } else { self.theme.text };
        let header = ui.add(egui::Button::new(RichText::new(label).color(color).strong()).frame(false));
        if header.clicked() {
            *pending_sort = Some(column);
        }
    }

    fn render_results_table(&mut self, ui: &mut Ui) {
        let session = self.controller.session();
        if session.status == SearchStatus::Success && session.active_hits().is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);
                ui.label(
                    RichText::new(format!("No results found for '{}'", session.active_search_key))
                        .color(self.theme.secondary_text)
                        .size(16.0)
                        .italics(),
                );
                ui.add_space(20.0);
            });
            return;
        }

        let rows = self.sort.apply(session.active_hits());
        let now = chrono::Utc::now();

        // Applied after the grid so the session isn't borrowed while rendering
        let mut pending_sort = None;
        let mut pending_dismiss = None;
        let mut pending_open = None;

        let width = ui.available_width();
        egui::Grid::new("results_table")
            .num_columns(5)
            .striped(true)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                for column in SortKey::COLUMNS {
                    self.render_sort_header(ui, column, &mut pending_sort);
                }
                ui.label(RichText::new("Archive").color(self.theme.secondary_text).strong());
                ui.end_row();

                for hit in &rows {
                    self.render_row(ui, hit, now, width, &mut pending_dismiss, &mut pending_open);
                    ui.end_row();
                }
            });

        if let Some(column) = pending_sort {
            self.sort.toggle(column);
        }
        if let Some(object_id) = pending_dismiss {
            self.controller.dismiss(&object_id);
        }
        if let Some(url) = pending_open {
            self.open_link(&url);
        }
    }

    fn render_row(
        &self,
        ui: &mut Ui,
        hit: &Hit,
        now: chrono::DateTime<chrono::Utc>,
        width: f32,
        pending_dismiss: &mut Option<String>,
        pending_open: &mut Option<String>,
    ) {
        ui.vertical(|ui| {
            ui.set_max_width(width * 0.4);
            let title = ui
                .add(
                    egui::Label::new(RichText::new(hit.display_title()).color(self.theme.text).size(15.0).strong())
                        .sense(egui::Sense::click()),
                )
                .on_hover_cursor(egui::CursorIcon::PointingHand);
            if title.clicked() {
                *pending_open = Some(hit.link());
            }

            let mut meta = Vec::new();
            if let Some(domain) = hit.domain() {
                meta.push(domain);
            }
            if let Some(age) = hit.time_ago(now) {
                meta.push(age);
            }
            if !meta.is_empty() {
                ui.label(RichText::new(meta.join(" · ")).color(self.theme.secondary_text).size(12.0));
            }
        });

        ui.label(RichText::new(hit.author.as_deref().unwrap_or("")).color(self.theme.text));
        ui.label(RichText::new(optional_count(hit.num_comments)).color(self.theme.secondary_text));
        ui.label(RichText::new(optional_count(hit.points)).color(self.theme.secondary_text));

        let dismiss_btn = ui.add(
            egui::Button::new(RichText::new("Dismiss").color(self.theme.button_foreground).size(13.0))
                .fill(self.theme.button_background)
                .corner_radius(CornerRadius::same(4)),
        );
        if dismiss_btn.clicked() {
            *pending_dismiss = Some(hit.object_id.clone());
        }
    }

    fn render_more(&mut self, ui: &mut Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(12.0);
            if self.controller.session().is_loading() {
                ui.spinner();
            } else {
                let more_btn = ui.add(
                    egui::Button::new(RichText::new("More").color(self.theme.button_foreground).size(15.0))
                        .min_size(egui::Vec2::new(100.0, 30.0))
                        .corner_radius(CornerRadius::same(6))
                        .fill(self.theme.button_background),
                );
                if more_btn.clicked() {
                    self.controller.load_more();
                }
            }
            ui.add_space(12.0);
        });
    }
}

fn optional_count(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl eframe::App for HnSearchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.theme.apply_to_ctx(ctx);

        if !self.mounted {
            self.controller.mount();
            self.mounted = true;
        }
        self.controller.poll();

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_header(ui);
            ui.add(egui::Separator::default().spacing(12.0));

            self.render_search_box(ui);
            ui.add_space(8.0);

            ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                if self.controller.session().status == SearchStatus::Failed {
                    self.render_error(ui);
                } else {
                    self.render_results_table(ui);
                }
                self.render_more(ui);
            });
        });
    }
}
