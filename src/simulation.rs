use crate::config::{ConfigError, Settings, SimulationConfig, Viewport};
use crate::dots::DotStore;
use crate::motion::{self, Bounce};
use crate::random::Random;
use crate::render::{draw_scene, Surface};

/// Owns the config, the viewport and the dot population. Every change goes
/// through `&mut self`, so a tick never sees half-applied settings.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    viewport: Viewport,
    dots: DotStore,
    random: Random,
    bounces: Vec<Bounce>,
}

impl Simulation {
    pub fn new(config: SimulationConfig, viewport: Viewport, random: Random) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut sim = Self {
            config,
            viewport,
            dots: DotStore::new(),
            random,
            bounces: Vec::new(),
        };
        sim.regenerate();
        tracing::info!("\n{}", sim.config);
        Ok(sim)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn dots(&self) -> &DotStore {
        &self.dots
    }

    /// One tick: move, draw links and dots, then turn around at the walls.
    pub fn render_frame<S: Surface>(&mut self, surface: &mut S) {
        motion::advance(self.dots.as_mut_slice(), &self.config, self.viewport, &mut self.bounces);
        draw_scene(surface, self.dots.as_slice(), &self.config);
        motion::apply_bounces(self.dots.as_mut_slice(), &self.bounces);
    }

    /// Extra frame at the new size, then pull stray dots back in.
    pub fn resize<S: Surface>(&mut self, viewport: Viewport, surface: &mut S) {
        tracing::debug!(width = viewport.width, height = viewport.height, "viewport resized");
        self.viewport = viewport;
        self.render_frame(surface);
        self.dots
            .correct_out_of_bounds(&self.config, self.viewport, &mut self.random);
    }

    pub fn regenerate(&mut self) {
        self.dots
            .regenerate(&self.config, self.viewport, &mut self.random);
    }

    /// Applies the settings form. On error nothing changes.
    pub fn apply_settings(&mut self, settings: &Settings) -> Result<(), ConfigError> {
        let next = self.config.with_settings(settings)?;
        self.replace_config(next)
    }

    /// Swaps in a whole new config and regenerates the dots for it.
    pub fn replace_config(&mut self, config: SimulationConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.regenerate();
        tracing::info!("\n{}", self.config);
        Ok(())
    }

    pub fn settings(&self) -> Settings {
        Settings::from(&self.config)
    }
}
