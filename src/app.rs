use std::cell::Cell;
use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::Context;
use nannou::color::{srgba, Srgba};
use nannou::prelude::*;

use crate::config::{Rgb, SimulationConfig, Viewport};
use crate::controls::Control;
use crate::random::Random;
use crate::render::{replay, CommandList, Surface};
use crate::scheduler::FrameScheduler;
use crate::simulation::Simulation;

// 画面サイズ / Initial window size
const WINDOW_WIDTH: u32 = 1280;
const WINDOW_HEIGHT: u32 = 720;

const SEED_VAR: &str = "DOT_LINKS_SEED";
const SETTINGS_VAR: &str = "DOT_LINKS_SETTINGS";

/// Start-up options read from the environment.
#[derive(Debug, Clone, Default)]
pub struct Launch {
    pub seed: Option<u64>,
    pub settings_path: Option<PathBuf>,
}

impl Launch {
    /// Reads the seed and settings file path, and checks the file applies
    /// cleanly so a bad file fails before the window opens.
    pub fn from_env() -> anyhow::Result<Self> {
        let seed = match std::env::var(SEED_VAR) {
            Ok(raw) => Some(
                raw.parse::<u64>()
                    .with_context(|| format!("{SEED_VAR} must be an unsigned integer, got {raw:?}"))?,
            ),
            Err(_) => None,
        };
        let settings_path = std::env::var_os(SETTINGS_VAR).map(PathBuf::from);
        if let Some(path) = &settings_path {
            default_config()
                .with_settings_file(path)
                .with_context(|| format!("invalid settings file {}", path.display()))?;
        }
        Ok(Self {
            seed,
            settings_path,
        })
    }

    fn config_for(&self, viewport: Viewport) -> SimulationConfig {
        let base = SimulationConfig::for_viewport(viewport);
        let Some(path) = &self.settings_path else {
            return base;
        };
        base.with_settings_file(path).unwrap_or_else(|err| {
            tracing::warn!(%err, path = %path.display(), "ignoring settings file");
            base
        })
    }

    fn random(&self) -> Random {
        self.seed.map_or_else(Random::from_entropy, Random::from_seed)
    }
}

fn default_config() -> SimulationConfig {
    SimulationConfig::for_viewport(Viewport::new(WINDOW_WIDTH as f32, WINDOW_HEIGHT as f32))
}

// nannou の model 関数には引数を渡せないので起動オプションをここに置く
// nannou's model fn takes no arguments, so the launch options wait here.
static LAUNCH: OnceLock<Launch> = OnceLock::new();

// エントリポイント / Entry point
pub fn run(launch: Launch) {
    let _ = LAUNCH.set(launch);
    nannou::app(model).update(update).run();
}

struct Model {
    sim: Simulation,
    scheduler: FrameScheduler,
    // 直近の tick で記録された描画命令 / Draw calls recorded by the latest ticks
    commands: CommandList,
    // view が表示し終えた命令数 / How many commands the last view put on screen
    presented: Cell<usize>,
}

fn model(app: &App) -> Model {
    app.set_loop_mode(LoopMode::RefreshSync);
    app.new_window()
        .size(WINDOW_WIDTH, WINDOW_HEIGHT)
        .title("Dot Links")
        .view(view)
        .resized(resized)
        .key_pressed(key_pressed)
        .build()
        .expect("failed to build window");

    let launch = LAUNCH.get().cloned().unwrap_or_default();
    let rect = app.window_rect();
    let viewport = Viewport::new(rect.w(), rect.h());
    let config = launch.config_for(viewport);
    let sim = match Simulation::new(config, viewport, launch.random()) {
        Ok(sim) => sim,
        Err(err) => {
            tracing::warn!(%err, "falling back to default settings");
            Simulation::new(SimulationConfig::for_viewport(viewport), viewport, launch.random())
                .expect("default settings are valid")
        }
    };

    let mut scheduler = FrameScheduler::new(sim.config().tick_rate);
    scheduler.start();

    Model {
        sim,
        scheduler,
        commands: CommandList::new(),
        presented: Cell::new(0),
    }
}

// 更新 / Update
// 経過時間ぶんの tick を固定レートで回す。各 tick が1フレームを丸ごと描く。
// Run as many fixed-rate ticks as the elapsed time allows. Each tick draws a whole frame.
fn update(_app: &App, model: &mut Model, update: Update) {
    if !model.sim.config().refresh_every_frame {
        // 前回の view で描画済みの分だけ捨てる / Drop only what the previous view already drew
        let presented = model.presented.replace(0);
        model.commands.forget_presented(presented);
    }
    let ticks = model.scheduler.due_ticks(update.since_last);
    for _ in 0..ticks {
        model.sim.render_frame(&mut model.commands);
    }
}

fn resized(_app: &App, model: &mut Model, size: Vec2) {
    model
        .sim
        .resize(Viewport::new(size.x, size.y), &mut model.commands);
}

fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    let control = match key {
        Key::Space => {
            model.scheduler.toggle();
            return;
        }
        Key::R => {
            model.sim.regenerate();
            return;
        }
        Key::Up => Control::MoreDots,
        Key::Down => Control::FewerDots,
        Key::Right => Control::Faster,
        Key::Left => Control::Slower,
        Key::Equals => Control::LongerLinks,
        Key::Minus => Control::ShorterLinks,
        Key::RBracket => Control::BiggerDots,
        Key::LBracket => Control::SmallerDots,
        Key::Period => Control::ThickerLines,
        Key::Comma => Control::ThinnerLines,
        Key::C => Control::NextColor,
        Key::B => Control::NextBackground,
        Key::A => Control::ToggleDynamicAlpha,
        Key::F => Control::ToggleRefresh,
        _ => return,
    };

    let mut settings = model.sim.settings();
    control.apply(&mut settings);
    if let Err(err) = model.sim.apply_settings(&settings) {
        tracing::warn!(%err, ?control, "settings rejected");
        return;
    }
    model.scheduler.set_tick_rate(model.sim.config().tick_rate);
}

// 描画 / Render
fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    if frame.nth() == 0 && !model.commands.starts_with_clear() {
        draw.background().color(to_color(model.sim.config().background, 1.0));
    }
    let mut surface = NannouSurface::new(&draw, model.sim.viewport());
    replay(model.commands.commands(), &mut surface);
    model.presented.set(model.commands.len());
    draw.to_frame(app, &frame).unwrap();
}

/// `Surface` on top of a nannou `Draw`.
///
/// nannou puts the origin in the middle with y up, the simulation uses the
/// top-left corner with y down.
struct NannouSurface<'a> {
    draw: &'a Draw,
    half_width: f32,
    half_height: f32,
}

impl<'a> NannouSurface<'a> {
    fn new(draw: &'a Draw, viewport: Viewport) -> Self {
        Self {
            draw,
            half_width: viewport.width * 0.5,
            half_height: viewport.height * 0.5,
        }
    }

    fn point(&self, x: f32, y: f32) -> Point2 {
        pt2(x - self.half_width, self.half_height - y)
    }
}

impl Surface for NannouSurface<'_> {
    fn clear(&mut self, background: Rgb) {
        self.draw.background().color(to_color(background, 1.0));
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: f32) {
        self.draw
            .ellipse()
            .xy(self.point(x, y))
            .radius(radius)
            .color(to_color(color, alpha));
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb, alpha: f32) {
        self.draw
            .line()
            .start(self.point(from.0, from.1))
            .end(self.point(to.0, to.1))
            .weight(width)
            .color(to_color(color, alpha));
    }
}

fn to_color(rgb: Rgb, alpha: f32) -> Srgba {
    srgba(
        rgb.r as f32 / 255.0,
        rgb.g as f32 / 255.0,
        rgb.b as f32 / 255.0,
        alpha,
    )
}
