use crate::config::{Rgb, SimulationConfig};
use crate::dots::Dot;
use crate::links::for_each_link;

/// Something that can be painted on, in canvas coordinates.
pub trait Surface {
    fn clear(&mut self, background: Rgb);
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: f32);
    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb, alpha: f32);
}

/// Issues dot and link draws with the style taken from the current config.
#[derive(Debug)]
pub struct Renderer<'s, S: Surface> {
    surface: &'s mut S,
    radius: f32,
    line_width: f32,
    color: Rgb,
    background: Rgb,
    fill_alpha: f32,
}

impl<'s, S: Surface> Renderer<'s, S> {
    pub fn new(surface: &'s mut S, config: &SimulationConfig) -> Self {
        Self {
            surface,
            radius: config.point_radius,
            line_width: config.line_width,
            color: config.color,
            background: config.background,
            fill_alpha: config.max_alpha,
        }
    }

    pub fn clear(&mut self) {
        self.surface.clear(self.background);
    }

    pub fn draw_dot(&mut self, x: f32, y: f32) {
        self.surface
            .fill_circle(x, y, self.radius, self.color, self.fill_alpha);
    }

    pub fn draw_link(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, alpha: f32) {
        self.surface
            .stroke_line((x1, y1), (x2, y2), self.line_width, self.color, alpha);
    }
}

/// Paints one frame: optional clear, every link, then every dot on top.
pub fn draw_scene<S: Surface>(surface: &mut S, dots: &[Dot], config: &SimulationConfig) {
    let mut renderer = Renderer::new(surface, config);

    // 毎フレーム消す設定なら背景で塗りつぶす / Wipe to the background when refreshing every frame
    if config.refresh_every_frame {
        renderer.clear();
    }

    // 先に線を描く（距離が遠いほど薄く） / Lines first, fainter the longer they are
    for_each_link(dots, config, |link| {
        let (a, b) = (&dots[link.from], &dots[link.to]);
        renderer.draw_link(a.x, a.y, b.x, b.y, link.alpha);
    });
    // 点は線の上に描く / Dots go last so they sit above every line
    for dot in dots {
        renderer.draw_dot(dot.x, dot.y);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Clear(Rgb),
    Circle {
        x: f32,
        y: f32,
        radius: f32,
        color: Rgb,
        alpha: f32,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Rgb,
        alpha: f32,
    },
}

/// Records draw calls so they can be replayed later (or inspected in tests).
///
/// A clear throws away everything recorded before it.
#[derive(Debug, Clone, Default)]
pub struct CommandList {
    commands: Vec<DrawCommand>,
}

impl CommandList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Whether the recorded picture starts from a blank surface.
    pub fn starts_with_clear(&self) -> bool {
        matches!(self.commands.first(), Some(DrawCommand::Clear(_)))
    }

    /// Drops the first `count` commands, the ones already put on screen.
    /// Anything recorded after them is kept.
    pub fn forget_presented(&mut self, count: usize) {
        let count = count.min(self.commands.len());
        self.commands.drain(..count);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Surface for CommandList {
    fn clear(&mut self, background: Rgb) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(background));
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: f32) {
        self.commands.push(DrawCommand::Circle {
            x,
            y,
            radius,
            color,
            alpha,
        });
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb, alpha: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
            alpha,
        });
    }
}

/// Sends recorded commands to a real surface, in order.
pub fn replay<S: Surface>(commands: &[DrawCommand], surface: &mut S) {
    for command in commands {
        match *command {
            DrawCommand::Clear(background) => surface.clear(background),
            DrawCommand::Circle {
                x,
                y,
                radius,
                color,
                alpha,
            } => surface.fill_circle(x, y, radius, color, alpha),
            DrawCommand::Line {
                from,
                to,
                width,
                color,
                alpha,
            } => surface.stroke_line(from, to, width, color, alpha),
        }
    }
}
