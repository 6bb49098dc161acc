use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use turgles_engine::buffer::{BufferConfig, BufferManager, TurtleId};
use turgles_engine::render::upload_len;
use turgles_engine::{TurtleColor, TurtleModel};

/// Random-walk parameters.
#[derive(Debug, Clone)]
pub struct WalkConfig {
    pub turtles: usize,
    pub frames: u32,
    /// Side of the square world; turtles wrap at the edges.
    pub world_size: f32,
    /// Units per second.
    pub speed: f32,
    /// Mean absolute turn per frame, in degrees.
    pub degrees: f32,
    /// Fixed timestep, in seconds.
    pub dt: f32,
    /// Reshape and respawn a slice of the population every this many frames.
    pub churn_every: u32,
    pub churn_fraction: f32,
    pub seed: u64,
    pub shapes: Vec<String>,
    pub buffers: BufferConfig,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            turtles: 10_000,
            frames: 600,
            world_size: 1000.0,
            speed: 50.0,
            degrees: 15.0,
            dt: 1.0 / 60.0,
            churn_every: 60,
            churn_fraction: 0.05,
            seed: 0x7475_7267,
            shapes: ["classic", "turtle", "square", "circle", "triangle", "arrow"]
                .map(String::from)
                .to_vec(),
            buffers: BufferConfig::default(),
        }
    }
}

/// A population of turtles wandering over the buffer manager.
pub struct Walk {
    config: WalkConfig,
    manager: BufferManager,
    ids: Vec<TurtleId>,
    rng: StdRng,
}

impl Walk {
    pub fn new(config: WalkConfig) -> Result<Self> {
        anyhow::ensure!(!config.shapes.is_empty(), "at least one shape is required");
        anyhow::ensure!(config.degrees > 0.0, "mean turn must be positive");
        anyhow::ensure!(
            config.world_size.is_finite() && config.world_size > 0.0,
            "world size must be positive, got {}",
            config.world_size
        );

        let manager = BufferManager::new(config.buffers.clone())
            .context("invalid buffer configuration")?;
        let mut walk = Self {
            rng: StdRng::seed_from_u64(config.seed),
            ids: Vec::with_capacity(config.turtles),
            manager,
            config,
        };

        for _ in 0..walk.config.turtles {
            walk.spawn_one()?;
        }
        Ok(walk)
    }

    #[inline]
    pub fn manager(&self) -> &BufferManager {
        &self.manager
    }

    #[inline]
    pub fn ids(&self) -> &[TurtleId] {
        &self.ids
    }

    /// Turns and moves every turtle once.
    pub fn step(&mut self) -> Result<()> {
        let half = self.config.world_size / 2.0;
        let distance = self.config.speed * self.config.dt;
        let lambda = 1.0 / self.config.degrees;

        for &id in &self.ids {
            // Exponential turn minus its mean: zero-biased but heavy-tailed.
            let u: f32 = self.rng.r#gen();
            let turn = -(1.0 - u).ln() / lambda - self.config.degrees;

            let model = self.manager.model_mut(id)?;
            model.turn(turn);
            model.forward(distance);
            model.position = [wrap(model.position[0], half), wrap(model.position[1], half)];
        }
        Ok(())
    }

    /// Reshapes half of a random slice of turtles and respawns the other half.
    ///
    /// The population size is unchanged.
    pub fn churn(&mut self) -> Result<()> {
        let n = ((self.ids.len() as f32) * self.config.churn_fraction).ceil() as usize;

        for k in 0..n.min(self.ids.len()) {
            let slot = self.rng.gen_range(0..self.ids.len());
            let id = self.ids[slot];

            if k % 2 == 0 {
                let shape = self.random_shape();
                self.manager.set_shape(id, &shape)?;
            } else {
                self.manager.destroy_turtle(id)?;
                self.ids.swap_remove(slot);
                self.spawn_one()?;
            }
        }
        Ok(())
    }

    /// Bytes a renderer would upload this frame.
    pub fn upload_bytes(&self) -> usize {
        self.manager.shapes().map(upload_len).sum()
    }

    fn spawn_one(&mut self) -> Result<TurtleId> {
        let half = self.config.world_size / 2.0;
        let mut model = TurtleModel::new(
            self.rng.gen_range(-half..half),
            self.rng.gen_range(-half..half),
            self.rng.gen_range(0.0..360.0),
        );
        model.speed = self.config.speed;

        let color = TurtleColor::solid([
            self.rng.r#gen(),
            self.rng.r#gen(),
            self.rng.r#gen(),
            1.0,
        ]);

        let shape = self.random_shape();
        let id = self.manager.spawn(&shape, &model, &color)?;
        self.ids.push(id);
        Ok(id)
    }

    fn random_shape(&mut self) -> String {
        let i = self.rng.gen_range(0..self.config.shapes.len());
        self.config.shapes[i].clone()
    }
}

/// Wraps a coordinate back into `[-half, half]`.
pub fn wrap(v: f32, half: f32) -> f32 {
    if v > half {
        v - 2.0 * half
    } else if v < -half {
        v + 2.0 * half
    } else {
        v
    }
}
