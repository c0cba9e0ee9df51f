#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use chrono::{Duration, Local};
use egui_gantt::{
    io, Column, ColumnKind, ColumnWidth, GanttChart, GanttEvent, GanttOptions, Resource, Task,
    Theme,
};

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("Gantt Widget Demo"),
        ..Default::default()
    };

    eframe::run_native(
        "Gantt Widget Demo",
        options,
        Box::new(|cc| Ok(Box::new(DemoApp::new(cc)))),
    )
}

struct DemoApp {
    chart: GanttChart,
    file_path: Option<PathBuf>,
    status_message: String,
    event_log: Rc<RefCell<Vec<String>>>,
    show_log: bool,
    theme: Theme,
}

impl DemoApp {
    fn new(cc: &eframe::CreationContext<'_>) -> Self {
        egui_gantt::setup_fonts(&cc.egui_ctx);

        let mut chart = GanttChart::new(sample_tasks(), sample_options());
        let event_log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&event_log);
        chart.on_event(move |event| {
            let line = match event {
                GanttEvent::TaskAdded(task) => format!("added #{} '{}'", task.id, task.name),
                GanttEvent::TaskUpdated(task) => format!(
                    "updated #{} '{}' {} - {}",
                    task.id,
                    task.name,
                    task.start.format("%d/%m/%Y"),
                    task.end.format("%d/%m/%Y")
                ),
                GanttEvent::TaskDeleted(id) => format!("deleted #{id}"),
            };
            sink.borrow_mut().push(line);
        });

        Self {
            chart,
            file_path: None,
            status_message: "Ready".to_string(),
            event_log,
            show_log: true,
            theme: Theme::Light,
        }
    }

    fn open_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Task List", &["json"])
            .pick_file()
        {
            match io::load_tasks(&path) {
                Ok(tasks) => {
                    let count = tasks.len();
                    self.chart.set_tasks(tasks);
                    self.file_path = Some(path);
                    self.status_message = format!("Loaded {} tasks", count);
                }
                Err(e) => self.status_message = format!("Error loading: {}", e),
            }
        }
    }

    fn save_file(&mut self) {
        if let Some(path) = self.file_path.clone() {
            match io::save_tasks(self.chart.tasks(), &path) {
                Ok(()) => self.status_message = "Tasks saved".to_string(),
                Err(e) => self.status_message = format!("Error saving: {}", e),
            }
        } else {
            self.save_file_as();
        }
    }

    fn save_file_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Task List", &["json"])
            .set_file_name("tasks.json")
            .save_file()
        {
            self.file_path = Some(path.clone());
            match io::save_tasks(self.chart.tasks(), &path) {
                Ok(()) => self.status_message = "Tasks saved".to_string(),
                Err(e) => self.status_message = format!("Error saving: {}", e),
            }
        }
    }

    fn import_csv(&mut self) {
        // Replacing a non-empty list deserves a confirmation first.
        if !self.chart.tasks().is_empty() {
            let confirm = rfd::MessageDialog::new()
                .set_title("Import CSV")
                .set_description("This will replace the current task list. Continue?")
                .set_buttons(rfd::MessageButtons::YesNo)
                .show();
            if confirm != rfd::MessageDialogResult::Yes {
                return;
            }
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        {
            match io::import_csv(&path) {
                Ok((tasks, skipped)) => {
                    let count = tasks.len();
                    self.chart.set_tasks(tasks);
                    self.file_path = None;
                    self.status_message = if skipped > 0 {
                        format!("Imported {} tasks ({} rows skipped)", count, skipped)
                    } else {
                        format!("Imported {} tasks", count)
                    };
                }
                Err(e) => self.status_message = format!("CSV import failed: {}", e),
            }
        }
    }

    fn export_csv(&mut self) {
        if self.chart.tasks().is_empty() {
            self.status_message = "Nothing to export".to_string();
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name("tasks.csv")
            .save_file()
        {
            match io::export_csv(self.chart.tasks(), &path) {
                Ok(count) => self.status_message = format!("Exported {} tasks to CSV", count),
                Err(e) => self.status_message = format!("CSV export failed: {}", e),
            }
        }
    }

    fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.chart.set_theme(theme);
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui_gantt::ui::theme::apply_visuals(ctx, self.theme);

        let should_save = ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S));
        if should_save {
            self.save_file();
        }

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("  File  ", |ui| {
                    if ui.button("  Open...").clicked() {
                        self.open_file();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("  Save          Ctrl+S").clicked() {
                        self.save_file();
                        ui.close_menu();
                    }
                    if ui.button("  Save As...").clicked() {
                        self.save_file_as();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("  Import CSV...").clicked() {
                        self.import_csv();
                        ui.close_menu();
                    }
                    if ui.button("  Export CSV...").clicked() {
                        self.export_csv();
                        ui.close_menu();
                    }
                });

                ui.menu_button("  View  ", |ui| {
                    ui.label(egui::RichText::new("Theme").small().weak());
                    for (theme, label) in [
                        (Theme::Light, "Light"),
                        (Theme::Dark, "Dark"),
                        (Theme::Narrow, "Narrow"),
                    ] {
                        if ui.radio(self.theme == theme, label).clicked() {
                            self.set_theme(theme);
                            ui.close_menu();
                        }
                    }
                    ui.separator();
                    ui.checkbox(&mut self.show_log, "Event Log");
                });
            });
        });

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(egui::RichText::new(&self.status_message).size(11.0).weak());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!("{} tasks", self.chart.tasks().len()))
                                .size(11.0)
                                .weak(),
                        );
                    });
                });
            });

        if self.show_log {
            egui::SidePanel::right("event_log")
                .default_width(260.0)
                .show(ctx, |ui| {
                    ui.add_space(4.0);
                    ui.label(egui::RichText::new("Events").strong());
                    ui.separator();
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            for line in self.event_log.borrow().iter() {
                                ui.label(egui::RichText::new(line).size(11.0));
                            }
                        });
                });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::default().inner_margin(egui::Margin::ZERO))
            .show(ctx, |ui| {
                self.chart.show(ui);
            });
    }
}

fn sample_options() -> GanttOptions {
    GanttOptions {
        resources: vec![
            Resource::new(1, "Alice"),
            Resource::new(2, "Bob"),
            Resource::new(3, "Carol"),
        ],
        columns: Some(vec![
            Column::new("sl_no", "#", ColumnKind::Index, ColumnWidth::Fixed(36.0)),
            Column::new("name", "Task Name", ColumnKind::Text, ColumnWidth::Flex(1.0)),
            Column::new("start", "Start Date", ColumnKind::Date, ColumnWidth::Fixed(88.0)),
            Column::new("end", "End Date", ColumnKind::Date, ColumnWidth::Fixed(88.0)),
            Column::new(
                "progress",
                "Progress",
                ColumnKind::Percent,
                ColumnWidth::Fixed(70.0),
            ),
            Column::new(
                "assignedUser",
                "Assignees",
                ColumnKind::MultiSelect,
                ColumnWidth::Fixed(110.0),
            )
            .with_options_source("resources"),
        ]),
        ..GanttOptions::default()
    }
}

fn sample_tasks() -> Vec<Task> {
    let today = Local::now().date_naive();
    let day = |offset: i64| today + Duration::days(offset);

    let mut planning = Task::new(1, "Planning", day(-5), day(6));
    planning.progress = 70.0;
    planning.assignees = vec![1];

    let mut kickoff = Task::new(2, "Project Kickoff", day(-5), day(-3));
    kickoff.parent = Some(1);
    kickoff.progress = 100.0;
    kickoff.assignees = vec![1, 2];

    let mut requirements = Task::new(3, "Requirements", day(-2), day(6));
    requirements.parent = Some(1);
    requirements.progress = 55.0;
    requirements.dependencies = vec![2];
    requirements.assignees = vec![2];

    let mut design = Task::new(4, "UI Design", day(4), day(14));
    design.progress = 20.0;
    design.dependencies = vec![3];
    design.assignees = vec![3];

    let mut build = Task::new(5, "Implementation", day(10), day(28));
    build.dependencies = vec![4];
    build.assignees = vec![2, 3];

    let mut review = Task::new(6, "Review & Handover", day(29), day(32));
    review.dependencies = vec![5];
    review.assignees = vec![1, 2, 3];

    vec![planning, kickoff, requirements, design, build, review]
}
